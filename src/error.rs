//! Error types for the content stream codec.
//!
//! This module defines all error types that can occur while resolving,
//! tokenizing, grouping and unparsing content streams, as well as the errors
//! raised by the object literal codec and stream decoders underneath.

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during content stream processing.
#[derive(Debug, thiserror::Error)]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    /// The handle passed to a parse entry point is neither a page nor a stream
    #[error("Invalid input type: {0}")]
    InvalidInputType(String),

    /// A page's content reference resolved to something that cannot supply bytes
    ///
    /// Raised by the stream resolver and translated into [`Error::InvalidInputType`]
    /// by the public parse entry points.
    #[error("Content reference is not a stream or an array of streams (found {found})")]
    NotAByteSource {
        /// Type name of the object that was found instead
        found: String,
    },

    /// Lexical or structural error inside a content stream
    #[error("{message}")]
    ContentStream {
        /// 1-based line where the offending token began
        line: usize,
        /// Human readable description
        message: String,
    },

    /// Serializing an instruction sequence failed
    #[error("an error occurred while unparsing")]
    Unparse {
        /// The underlying formatting failure
        #[source]
        source: Box<Error>,
    },

    /// Object literal parse error at a byte offset
    #[error("Failed to parse object at byte {offset}: {reason}")]
    ParseError {
        /// Byte offset where error occurred
        offset: usize,
        /// Reason for parse failure
        reason: String,
    },

    /// Referenced object not found in the object store
    #[error("Object not found: {0} {1} R")]
    ObjectNotFound(u32, u16),

    /// Object has wrong type
    #[error("Invalid object type: expected {expected}, found {found}")]
    InvalidObjectType {
        /// Expected object type
        expected: String,
        /// Actual object type found
        found: String,
    },

    /// Circular reference detected while resolving
    #[error("Circular reference detected: object {0}")]
    CircularReference(crate::object::ObjectRef),

    /// Stream decoding error
    #[error("Stream decoding error: {0}")]
    Decode(String),

    /// Unsupported stream filter
    #[error("Unsupported filter: {0}")]
    UnsupportedFilter(String),

    /// Value cannot be represented in content stream syntax
    #[error("Unsupported value: {0}")]
    Unsupported(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a content stream error with the default templated message.
    pub fn content_stream_at(line: usize) -> Self {
        Error::ContentStream {
            line,
            message: format!("error encoding content stream at line {}", line),
        }
    }

    /// Build a content stream error with an explicit message.
    pub fn content_stream(line: usize, message: impl Into<String>) -> Self {
        let message = message.into();
        if message.is_empty() {
            return Self::content_stream_at(line);
        }
        Error::ContentStream { line, message }
    }

    /// Wrap a formatting failure as an unparse error.
    pub fn unparse(source: Error) -> Self {
        Error::Unparse {
            source: Box::new(source),
        }
    }

    /// The line number attached to a content stream error, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::ContentStream { line, .. } => Some(*line),
            _ => None,
        }
    }
}
