use crate::config::SgdConfig;
use crate::error::Result;
use crate::models::classifier_trait::ClassifierModel;
use crate::models::sgd::SgdClassifier;

/// Build a boxed classifier model from an `SgdConfig`.
/// The config is validated here, so a returned model is always trainable.
pub fn build_model(config: SgdConfig) -> Result<Box<dyn ClassifierModel>> {
    Ok(Box::new(SgdClassifier::new(config)?))
}

/// Same as `build_model`, reading the config from a JSON document.
pub fn build_model_from_json(json: &str) -> Result<Box<dyn ClassifierModel>> {
    build_model(SgdConfig::from_json(json)?)
}
