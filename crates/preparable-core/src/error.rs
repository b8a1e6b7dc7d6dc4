//! Error types for Preparable.

use std::fmt;

/// The main error type for Preparable operations.
///
/// Classification itself is total and never fails; errors only arise from
/// structural validation while a relation is being built.
#[derive(Debug)]
pub enum Error {
    /// A fragment failed structural validation at build time
    InvalidFragment(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidFragment(msg) => write!(f, "Invalid fragment: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// A specialized `Result` type for Preparable operations.
pub type Result<T> = std::result::Result<T, Error>;
