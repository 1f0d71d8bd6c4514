use crate::error::{Error, Result};
use crate::label::LabelSet;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Character n-gram settings for the leading tokens of a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NgramConfig {
    /// Shortest n-gram emitted.
    pub min_n: usize,
    /// Longest n-gram emitted. N-grams are always shorter than their token.
    pub max_n: usize,
    /// How many tokens, from the start of the name, get n-grams.
    pub lead_count: usize,
    /// Prepended to prefix n-grams and appended to suffix n-grams.
    pub boundary_marker: String,
    /// Append the plain tokens after the n-grams. When false the n-grams replace them.
    pub include_tokens: bool,
}

impl Default for NgramConfig {
    fn default() -> Self {
        Self {
            min_n: 2,
            max_n: 10,
            lead_count: 1,
            boundary_marker: "#".to_string(),
            include_tokens: true,
        }
    }
}

/// Model and run configuration, passed explicitly to fitting and classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Additive smoothing value. Seeds first-seen counts and the unseen-token fallback.
    pub smoothing: u32,
    pub ngram: NgramConfig,
    /// Class labels. Their order fixes the class index.
    pub labels: Vec<String>,
    /// Split tag selecting the training rows; every other tag is test.
    pub train_split: String,
    /// Only write misclassified rows to the prediction files.
    pub misclassified_only: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            smoothing: 1,
            ngram: NgramConfig::default(),
            labels: vec!["Male".to_string(), "Female".to_string()],
            train_split: "Train".to_string(),
            misclassified_only: false,
        }
    }
}

impl Config {
    /// Reads a YAML file. Keys that are absent keep their default value.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let config: Config = serde_yaml::from_reader(BufReader::new(file))
            .map_err(|e| Error::InvalidConfig(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that would break counting or scoring.
    pub fn validate(&self) -> Result<()> {
        if self.smoothing == 0 {
            return Err(Error::InvalidConfig(
                "smoothing must be at least 1, unseen tokens would get zero probability".into(),
            ));
        }
        if self.smoothing.checked_add(1).is_none() {
            return Err(Error::InvalidConfig(format!(
                "smoothing must be below {}, first-seen counts start at smoothing + 1",
                u32::MAX
            )));
        }
        let ngram = &self.ngram;
        if ngram.min_n == 0 {
            return Err(Error::InvalidConfig("min_n must be at least 1".into()));
        }
        if ngram.max_n < ngram.min_n {
            return Err(Error::InvalidConfig(format!(
                "max_n ({}) is smaller than min_n ({})",
                ngram.max_n, ngram.min_n
            )));
        }
        if ngram.boundary_marker.is_empty() {
            return Err(Error::InvalidConfig("boundary marker is empty".into()));
        }
        if self.train_split.is_empty() {
            return Err(Error::InvalidConfig("train split tag is empty".into()));
        }
        self.label_set().map(|_| ())
    }

    /// Builds the label set from `labels`.
    pub fn label_set(&self) -> Result<LabelSet> {
        LabelSet::new(self.labels.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.smoothing, 1);
        assert_eq!(config.ngram.min_n, 2);
        assert_eq!(config.ngram.max_n, 10);
        assert_eq!(config.ngram.lead_count, 1);
        assert_eq!(config.label_set().unwrap().len(), 2);
    }

    #[test]
    fn rejects_bad_values() {
        let mut config = Config::default();
        config.smoothing = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.smoothing = u32::MAX;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = Config::default();
        config.smoothing = u32::MAX - 1;
        config.validate().unwrap();

        let mut config = Config::default();
        config.ngram.min_n = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.ngram.max_n = 1;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.ngram.boundary_marker.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.labels = vec!["Male".into(), "Male".into()];
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn yaml_overrides_only_given_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "smoothing: 3\nngram:\n  max_n: 11\nlabels: [A, B, C]").unwrap();

        let config = Config::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.smoothing, 3);
        assert_eq!(config.ngram.max_n, 11);
        assert_eq!(config.ngram.min_n, 2);
        assert_eq!(config.ngram.boundary_marker, "#");
        assert_eq!(config.labels, ["A", "B", "C"]);
        assert_eq!(config.train_split, "Train");
    }

    #[test]
    fn missing_yaml_file_is_an_input_error() {
        let err = Config::from_yaml_file(Path::new("/nonexistent/config.yml")).unwrap_err();
        assert!(err.is_input());
    }
}
