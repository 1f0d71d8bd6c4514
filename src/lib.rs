//! # ngram-gender
//!
//! Predict the gender label of a given name with a character n-gram Naive Bayes model.
//!
//! Names are stripped of punctuation, lowercased and split into tokens. The
//! leading tokens are expanded into boundary-marked prefix and suffix n-grams
//! (`#an`, `na#`, ...). A per-class frequency table over those features is fitted
//! on the training split, and any name is scored by summing log probabilities,
//! with additive smoothing for features a class never saw.
//!
//! ## Features
//! - Punctuation-deleting tokenizer and prefix/suffix n-gram expansion
//! - Multinomial Naive Bayes over an arbitrary, closed label set
//! - Label + probability prediction for ad-hoc names
//! - Per-class and overall accuracy with a confusion matrix
//! - Tab-separated dataset ingestion and prediction output
//!
//! ## Example
//! ```rust
//! use ngram_gender::{Config, Dataset, NaiveBayes};
//!
//! let tsv = "id\tname\tgender\tsplit\r\n\
//!            1\tAnna\tFemale\tTrain\r\n\
//!            2\tMarco\tMale\tTrain\r\n\
//!            3\tAnn\tFemale\tTest\r\n";
//! let config = Config::default();
//! let data = Dataset::from_reader(tsv.as_bytes(), &config).unwrap();
//! let model = NaiveBayes::fit(&config, data.train()).unwrap();
//!
//! let evaluation = model.evaluate(data.test()).unwrap();
//! assert_eq!(evaluation.overall().value(), Some(1.0));
//!
//! let (label, proba) = model.predict_with_proba("Annabel");
//! println!("Gender: {label}, P: {proba}");
//! ```

pub mod classifier;
pub mod config;
pub mod dataset;
pub mod error;
pub mod evaluate;
pub mod features;
pub mod label;
pub mod model;
pub mod report;

pub use classifier::Classification;
pub use config::{Config, NgramConfig};
pub use dataset::{Dataset, Record, Split};
pub use error::{Error, Result};
pub use evaluate::{Accuracy, Evaluation, Prediction};
pub use features::FeatureExtractor;
pub use label::{ClassLabel, LabelSet};
pub use model::{FeatureWeight, NaiveBayes};
