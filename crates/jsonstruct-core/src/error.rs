//! Error types for struct tree access and JSON conversion.

use thiserror::Error;

/// Errors that can occur while reading a struct tree or converting it to and from JSON.
#[derive(Error, Debug)]
pub enum StructError {
    /// The input string was not valid JSON.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A slot was read whose container was allocated but never written to.
    /// `slot` is the key (struct mode) or `[index]` (list mode) that was read.
    #[error("value not set at {slot}")]
    ValueNotSet { slot: String },

    /// A struct read named a key with no entry.
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// A list read or pop named an index past the end.
    #[error("index {index} out of range for list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// NaN and the infinities have no JSON representation.
    #[error("number {0} has no JSON representation")]
    NonFiniteNumber(f64),

    /// A JSON number that could not be viewed as `f64`.
    #[error("number {0} cannot be stored in a struct tree")]
    UnrepresentableNumber(String),

    /// Container nesting went past `ConvertOptions::max_depth`.
    #[error("nesting depth exceeds the limit of {limit}")]
    DepthLimitExceeded { limit: usize },

    /// The target container and the JSON source are not the same shape.
    #[error("cannot fill a {expected} from a JSON {found}")]
    ContainerMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

/// Convenience alias used throughout jsonstruct-core.
pub type Result<T> = std::result::Result<T, StructError>;
