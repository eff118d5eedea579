//! Serialization of PDF objects back to bytes.
//!
//! The content stream unparser writes every operand through
//! [`ObjectSerializer`], configured with [`ObjectSerializer::content`] so that
//! values which cannot live inside a content stream are rejected.

mod object_serializer;

pub use object_serializer::ObjectSerializer;
