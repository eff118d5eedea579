//! PDF content stream codec.
//!
//! Content streams are the postfix operator language that draws a page. This
//! module reads them into [`Instruction`]s and writes instructions back:
//!
//! - [`resolver`] turns a page or stream into one logical byte sequence
//! - [`tokenizer`] splits those bytes into operands, operators and inline images
//! - [`grouper`] assembles tokens into instructions and applies the whitelist
//! - [`unparser`] serializes instructions

pub mod grouper;
pub mod inline_image;
pub mod operators;
pub mod parser;
pub mod resolver;
pub mod tokenizer;
pub mod unparser;

pub use grouper::{OperandGrouper, ParserCallbacks};
pub use inline_image::InlineImage;
pub use operators::{Instruction, Operand, Operator, OperatorWhitelist};
pub use parser::{
    parse_content_bytes, parse_content_bytes_with_options, parse_content_stream,
    parse_content_stream_with_options, parse_with_callbacks,
};
pub use tokenizer::{ContentToken, ContentTokenizer, LocatedToken};
pub use unparser::unparse_content_stream;
