use thiserror::Error;

/// Errors raised when a stored item does not have the expected shape.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Missing or invalid field: {0}")]
    MissingField(String),
    #[error("Unknown {field} value: {value}")]
    UnknownValue { field: &'static str, value: String },
    #[error("Discriminator mismatch: expected {expected}, found {found}")]
    DiscriminatorMismatch {
        expected: &'static str,
        found: String,
    },
    #[error("Key kind mismatch: expected {expected}, found {found}")]
    KindMismatch {
        expected: &'static str,
        found: String,
    },
}
