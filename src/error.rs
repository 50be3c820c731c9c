//! Error types for array and bytea decoding.

use thiserror::Error;

/// The main error type for codec operations.
#[derive(Debug, Error)]
pub enum ArrayError {
    /// The scanner met a byte that does not fit the array grammar.
    #[error("unable to parse array; unexpected {:?} at offset {offset}", byte_char(.byte))]
    Unexpected { byte: u8, offset: usize },

    /// A required byte was missing (opening brace, closing brace).
    #[error("unable to parse array; expected {:?} at offset {offset}", byte_char(.byte))]
    Expected { byte: u8, offset: usize },

    /// The element delimiter was empty.
    #[error("unable to parse array; delimiter must not be empty")]
    EmptyDelimiter,

    /// Sibling sub-arrays have different lengths.
    #[error("multidimensional arrays must have elements with matching dimensions")]
    MismatchedDimensions,

    /// A linear target was given a literal with more than one dimension.
    #[error("cannot convert ARRAY{} to {target}", render_dims(.dims))]
    Dimensions { dims: Vec<usize>, target: &'static str },

    /// A NULL element was found where the scalar type forbids it.
    #[error("parsing array element index {index}: cannot convert NULL to {scalar}")]
    NullElement { index: usize, scalar: &'static str },

    /// An element's text could not be converted to the scalar type.
    #[error("parsing array element index {index}: {message}")]
    InvalidElement { index: usize, message: String },

    /// The source value has a representation the target cannot be scanned from.
    #[error("cannot convert {found} to {target}")]
    UnsupportedSource {
        found: &'static str,
        target: &'static str,
    },

    /// A bytea escape was cut short.
    #[error("invalid bytea sequence {0}")]
    InvalidByteaSequence(String),

    /// A bytea escape was not followed by three octal digits.
    #[error("could not parse bytea value: {0}")]
    InvalidByteaValue(String),

    /// Hex-form bytea failed to decode.
    #[error("could not decode hex bytea: {0}")]
    Hex(#[from] hex::FromHexError),
}

impl ArrayError {
    /// Create an unexpected-byte error at the given offset.
    pub fn unexpected(byte: u8, offset: usize) -> Self {
        Self::Unexpected { byte, offset }
    }

    /// Create an expected-byte error at the given offset.
    pub fn expected(byte: u8, offset: usize) -> Self {
        Self::Expected { byte, offset }
    }

    /// Create an element conversion error.
    pub fn invalid_element(index: usize, message: impl Into<String>) -> Self {
        Self::InvalidElement {
            index,
            message: message.into(),
        }
    }
}

fn byte_char(byte: &u8) -> char {
    char::from(*byte)
}

/// Render a dimension vector as `[d1][d2]...`.
pub fn render_dims(dims: &[usize]) -> String {
    dims.iter().map(|d| format!("[{}]", d)).collect()
}

/// Result type alias for codec operations.
pub type ArrayResult<T> = Result<T, ArrayError>;
