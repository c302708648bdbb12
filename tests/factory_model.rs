use sparse_sgd::config::{LossFunction, Penalty, SgdConfig};
use sparse_sgd::math::{Array2, SparseVector};
use sparse_sgd::models::factory;
use sparse_sgd::{SgdError, SparseDataset};

fn tiny_dataset() -> SparseDataset {
    let x = Array2::from_shape_vec(
        (6, 2),
        vec![
            1.0, 0.0, // class 1
            0.0, 1.0, // class -1
            1.0, 0.1, // class 1
            0.0, 0.9, // class -1
            1.1, 0.0, // class 1
            0.0, 1.2, // class -1
        ],
    )
    .expect("failed to create feature matrix");
    SparseDataset::from_dense(&x, &[1, -1, 1, -1, 1, -1]).expect("failed to build dataset")
}

#[test]
fn test_factory_builds_and_predicts() {
    let data = tiny_dataset();
    let mut model = factory::build_model(SgdConfig::new(LossFunction::Hinge, Penalty::L2))
        .expect("valid config");
    assert_eq!(model.name(), "sgd");

    model.fit(&data).expect("fit");
    for (x, y) in data.iter() {
        assert_eq!(model.predict(x).unwrap(), y);
    }
    assert_eq!(
        model.predict_proba(data.row(0)),
        Err(SgdError::NotSupportedForLoss(LossFunction::Hinge))
    );
}

#[test]
fn test_factory_from_json_log_loss() {
    let data = tiny_dataset();
    let mut model = factory::build_model_from_json(r#"{"loss": "log", "n_iter": 5}"#)
        .expect("valid json config");
    model.fit(&data).expect("fit");

    let probs: Vec<f64> = data
        .rows()
        .iter()
        .map(|x| model.predict_proba(x).unwrap())
        .collect();
    assert_eq!(probs.len(), data.len());
    for (p, &y) in probs.iter().zip(data.labels()) {
        assert!((0.0..=1.0).contains(p));
        assert_eq!(*p > 0.5, y == 1);
    }
}

#[test]
fn test_factory_rejects_invalid_config() {
    let bad = SgdConfig {
        alpha: 0.0,
        ..Default::default()
    };
    assert!(matches!(
        factory::build_model(bad),
        Err(SgdError::InvalidConfiguration(_))
    ));
    assert!(factory::build_model_from_json(r#"{"penalty": "foobar"}"#).is_err());
}

#[test]
fn test_unfitted_model_through_trait() {
    let model = factory::build_model(SgdConfig::default()).unwrap();
    let x = SparseVector::from_dense(&[1.0, 1.0]);
    assert_eq!(model.decision_function(&x).unwrap(), 0.0);
    assert_eq!(model.predict(&x), Err(SgdError::NotFitted));
}
