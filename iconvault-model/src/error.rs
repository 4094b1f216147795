use std::fmt::{self, Display};

/// Errors produced when parsing an icon identity string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// The input was not `namespace:name` with exactly one separator and two
    /// non-empty segments.
    InvalidFormat(String),
}

impl Display for KeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyError::InvalidFormat(input) => write!(
                f,
                "icon must be in the format 'namespace:name', got '{input}'"
            ),
        }
    }
}

impl std::error::Error for KeyError {}

/// Errors produced by model constructors other than key parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    InvalidColor(String),
    InvalidApiBase(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::InvalidColor(value) => {
                write!(f, "invalid hex color: {value}")
            }
            ModelError::InvalidApiBase(msg) => {
                write!(f, "invalid icon api base: {msg}")
            }
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
