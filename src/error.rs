use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while loading data, fitting or writing predictions.
///
/// Input failures (`Io`, `Csv`, `MalformedRow`) abort the whole run. Configuration
/// failures (`UnknownLabel`, `InvalidConfig`) are raised before any counts are
/// touched. An empty class is never an error; see [`crate::Accuracy`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid delimited data: {0}")]
    Csv(#[from] csv::Error),

    #[error("row at line {line} has {fields} fields, expected 4")]
    MalformedRow { line: u64, fields: usize },

    #[error("label {label:?} is not part of the configured label set")]
    UnknownLabel { label: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// True for failures caused by the data source rather than the configuration.
    pub fn is_input(&self) -> bool {
        matches!(
            self,
            Error::Io { .. } | Error::Csv(_) | Error::MalformedRow { .. }
        )
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
