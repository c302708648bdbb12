//! svmlight / libsvm text reader.
//!
//! One example per line: `<label> <index>:<value> <index>:<value> ... [# comment]`.
//! Blank lines and lines starting with `#` are skipped.
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};

use crate::data_handling::SparseDataset;
use crate::math::SparseVector;

/// Configuration for reading svmlight files.
#[derive(Debug, Clone, Default)]
pub struct SvmlightReaderConfig {
    /// Feature indices in the file start at 0 instead of 1.
    pub zero_based: bool,
    /// Dimensionality of the dataset. When `None` it is the largest index
    /// seen; when set, rows using a larger index are an error.
    pub n_features: Option<usize>,
}

/// Read an svmlight file with 1-based indices.
pub fn read_svmlight<P: AsRef<Path>>(path: P) -> Result<SparseDataset> {
    read_svmlight_with_config(path, &SvmlightReaderConfig::default())
}

pub fn read_svmlight_with_config<P: AsRef<Path>>(
    path: P,
    config: &SvmlightReaderConfig,
) -> Result<SparseDataset> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open svmlight file: {}", path.as_ref().display()))?;
    let data = parse_svmlight(BufReader::new(file), config)
        .with_context(|| format!("Failed to parse {}", path.as_ref().display()))?;
    log::debug!(
        "Loaded {} examples with {} features from {}",
        data.len(),
        data.n_features(),
        path.as_ref().display()
    );
    Ok(data)
}

/// Parse svmlight lines from any buffered reader.
pub fn parse_svmlight<R: BufRead>(reader: R, config: &SvmlightReaderConfig) -> Result<SparseDataset> {
    let mut rows = Vec::new();
    let mut labels = Vec::new();

    for (line_idx, line) in reader.lines().enumerate() {
        let line_no = line_idx + 1;
        let line = line.with_context(|| format!("Failed to read line {}", line_no))?;
        let content = line.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }

        let mut tokens = content.split_whitespace();
        let label_token = tokens
            .next()
            .ok_or_else(|| anyhow!("Missing label at line {}", line_no))?;
        labels.push(parse_label(label_token).with_context(|| format!("Invalid label at line {}", line_no))?);

        let mut pairs = Vec::new();
        for token in tokens {
            let (idx, value) = token
                .split_once(':')
                .ok_or_else(|| anyhow!("Expected <index>:<value>, got '{}' at line {}", token, line_no))?;
            let idx = idx
                .parse::<usize>()
                .with_context(|| format!("Invalid feature index '{}' at line {}", idx, line_no))?;
            let idx = if config.zero_based {
                idx
            } else {
                idx.checked_sub(1)
                    .ok_or_else(|| anyhow!("Feature index 0 in 1-based file at line {}", line_no))?
            };
            let value = value
                .parse::<f64>()
                .with_context(|| format!("Invalid feature value '{}' at line {}", value, line_no))?;
            pairs.push((idx, value));
        }
        rows.push(SparseVector::from_pairs(pairs).with_context(|| format!("Invalid example at line {}", line_no))?);
    }

    let data = match config.n_features {
        Some(n_features) => SparseDataset::new(rows, labels, n_features)?,
        None => SparseDataset::from_rows(rows, labels)?,
    };
    Ok(data)
}

/// Labels are integers, possibly written as `+1` or `2.0`.
fn parse_label(token: &str) -> Result<i32> {
    if let Ok(label) = token.parse::<i32>() {
        return Ok(label);
    }
    let value = token.parse::<f64>()?;
    if value.fract() != 0.0 || value.abs() > i32::MAX as f64 {
        bail!("class label must be an integer, got {}", token);
    }
    Ok(value as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_one_based_lines_with_comments() {
        let text = "# header\n+1 1:0.5 3:2\n\n-1 2:1.5 # trailing\n";
        let data = parse_svmlight(Cursor::new(text), &SvmlightReaderConfig::default()).unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data.n_features(), 3);
        assert_eq!(data.labels(), &[1, -1]);
        assert_eq!(data.row(0).indices(), &[0, 2]);
        assert_eq!(data.row(1).values(), &[1.5]);
    }

    #[test]
    fn zero_based_and_fixed_width() {
        let config = SvmlightReaderConfig {
            zero_based: true,
            n_features: Some(10),
        };
        let data = parse_svmlight(Cursor::new("2.0 0:1\n1 4:1\n"), &config).unwrap();
        assert_eq!(data.n_features(), 10);
        assert_eq!(data.labels(), &[2, 1]);
        assert_eq!(data.row(0).indices(), &[0]);
    }

    #[test]
    fn rejects_malformed_input() {
        let cfg = SvmlightReaderConfig::default();
        assert!(parse_svmlight(Cursor::new("1 0:1\n"), &cfg).is_err());
        assert!(parse_svmlight(Cursor::new("1 3=1\n"), &cfg).is_err());
        assert!(parse_svmlight(Cursor::new("0.5 1:1\n"), &cfg).is_err());
        assert!(parse_svmlight(Cursor::new("1 2:1 2:3\n"), &cfg).is_err());

        let narrow = SvmlightReaderConfig {
            zero_based: false,
            n_features: Some(1),
        };
        assert!(parse_svmlight(Cursor::new("1 2:1\n"), &narrow).is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = read_svmlight("/nonexistent/data.svm").unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/data.svm"));
    }
}
