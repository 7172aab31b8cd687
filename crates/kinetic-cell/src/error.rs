//! Error types for cell construction.

use std::fmt;

/// Errors arising from cell construction.
#[derive(Debug, Clone, PartialEq)]
pub enum CellError {
    /// A periodic cell needs a finite, strictly positive side length.
    NonPositiveLength {
        /// The rejected length.
        length: f64,
    },
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveLength { length } => {
                write!(f, "cell side length must be finite and positive, got {length}")
            }
        }
    }
}

impl std::error::Error for CellError {}
