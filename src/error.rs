//! Error types for the distance engine and the loader boundary.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    /// A search was asked to run over an empty candidate set.
    #[error("empty input: {what}")]
    EmptyInput { what: String },

    /// A row failed validation while being loaded.
    #[error("invalid {dataset} row {row}: {message}")]
    Validation {
        dataset: String,
        row: usize,
        message: String,
    },
}

impl DataError {
    pub fn empty_input<S: Into<String>>(what: S) -> Self {
        Self::EmptyInput { what: what.into() }
    }

    pub fn validation<D: Into<String>, M: Into<String>>(
        dataset: D,
        row: usize,
        message: M,
    ) -> Self {
        Self::Validation {
            dataset: dataset.into(),
            row,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
