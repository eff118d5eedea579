// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::enum_variant_names)]
#![allow(clippy::should_implement_trait)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # PDF Content Codec
//!
//! Parse PDF content streams into instructions and write them back.
//!
//! A content stream is the postfix language that draws a page: operands
//! followed by the operator that consumes them. This crate reads a page (whose
//! content may be split over several streams) or a single stream into a list
//! of [`Instruction`]s, optionally keeping only a whitelist of operators, and
//! serializes instruction lists back to bytes such that parsing the output
//! gives the same instructions.
//!
//! ## Core Features
//!
//! - **Round trip**: `parse(unparse(xs)) == xs`, including inline images whose
//!   data happens to contain `EI`
//! - **Whitelisting**: keep only the operators you care about
//! - **Multi-stream pages**: `/Contents` arrays are joined into one stream
//! - **Filters**: `FlateDecode`, `ASCIIHexDecode` and `ASCII85Decode`
//! - **Diagnostics**: parse errors carry the line they occurred on
//! - **Callbacks**: drive your own [`content::ParserCallbacks`] instead of
//!   collecting instructions
//!
//! ## Quick Start
//!
//! ```
//! use pdf_content_codec::{parse_content_stream, unparse_content_stream};
//! use pdf_content_codec::document::Document;
//! use pdf_content_codec::object::{Dictionary, Object};
//!
//! let mut doc = Document::new();
//! let q = doc.add_object(Object::stream(Dictionary::new(), &b"q 1 0 0 1 72 720 cm"[..]));
//! let big_q = doc.add_object(Object::stream(Dictionary::new(), &b"Q"[..]));
//!
//! let mut page = Dictionary::new();
//! page.insert("Type".into(), Object::name("Page"));
//! page.insert(
//!     "Contents".into(),
//!     Object::Array(vec![Object::Reference(q), Object::Reference(big_q)]),
//! );
//!
//! let instructions = parse_content_stream(&doc, &Object::Dictionary(page), "")?;
//! assert_eq!(instructions.len(), 3);
//!
//! let bytes = unparse_content_stream(&instructions)?;
//! assert_eq!(bytes, b"q\n1 0 0 1 72 720 cm\nQ\n");
//! # Ok::<(), pdf_content_codec::Error>(())
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 (<http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license (<http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]

// Error handling
pub mod error;

// Object model and literal codec
pub mod lexer;
pub mod object;
pub mod parser;
/// Parser configuration options
pub mod parser_config;
pub mod writer;

// Stream decoders
pub mod decoders;

// Object store
pub mod document;

// Content streams
pub mod content;

pub use content::{
    parse_content_stream, parse_content_stream_with_options, unparse_content_stream, InlineImage,
    Instruction, Operand, Operator,
};
pub use document::{Document, ObjectResolver};
pub use error::{Error, Result};
pub use object::{Object, ObjectRef};

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
