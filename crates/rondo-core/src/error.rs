//! Error types for Rondo

use thiserror::Error;

/// Top-level error type for Rondo operations
#[derive(Debug, Error)]
pub enum RondoError {
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Edit error: {0}")]
    Edit(#[from] EditError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors while decoding or encoding a circle file.
///
/// Decode-time errors are fatal for the load: no partial model is
/// produced. `EncodeOverflow` is fatal for the save only.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Malformed file: {0}")]
    MalformedFile(String),

    #[error("Corrupt options union: {0}")]
    CorruptUnion(String),

    #[error("Encode overflow: {0}")]
    EncodeOverflow(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors while applying a single edit to a loaded model.
///
/// All of these are local to the rejected edit; the model is left as
/// it was for every field the edit did not reach. The one documented
/// exception is `BufferSizeMismatch`, where a tensor edit's metadata
/// portion has already been applied when the buffer write is refused.
#[derive(Debug, Error)]
pub enum EditError {
    #[error("Operator has no options table")]
    NoOptionsTable,

    #[error("Unknown enum value `{value}` for {field}")]
    UnknownEnumValue { field: String, value: String },

    #[error("Unknown attribute `{0}` for this operator")]
    UnknownAttribute(String),

    #[error("Invalid value `{value}` for {field}: {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Buffer size mismatch: got {got} bytes, expected {expected}")]
    BufferSizeMismatch { got: usize, expected: usize },

    #[error("Index out of range: {what} {index}")]
    InvalidIndex { what: &'static str, index: usize },

    #[error("Unknown tensor type `{0}`")]
    UnknownTensorType(String),

    #[error("Attribute edit would change the operator's builtin kind; unsupported")]
    OpcodeChangeUnsupported,
}

impl EditError {
    pub fn invalid_value(field: &str, value: &str, reason: &str) -> Self {
        EditError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn unknown_enum(field: &str, value: &str) -> Self {
        EditError::UnknownEnumValue {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}
