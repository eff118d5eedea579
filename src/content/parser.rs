//! Content stream parser.
//!
//! Content streams use postfix notation: operands come first and the operator
//! that consumes them closes the group.
//!
//! ```text
//! BT
//!   /F1 12 Tf
//!   100 700 Td
//!   (Hello, World!) Tj
//! ET
//! ```

use crate::content::grouper::{OperandGrouper, ParserCallbacks};
use crate::content::operators::{Instruction, OperatorWhitelist};
use crate::content::resolver::content_bytes;
use crate::content::tokenizer::ContentTokenizer;
use crate::document::ObjectResolver;
use crate::error::{Error, Result};
use crate::object::Object;
use crate::parser_config::ParserOptions;
use std::ops::ControlFlow;

/// Parse the content of a page or content stream into instructions.
///
/// `operators` is a whitespace-separated whitelist; when it is empty every
/// instruction is kept, otherwise instructions closed by other operators are
/// dropped along with their operands.
///
/// # Errors
///
/// - [`Error::InvalidInputType`] when `source` is not a page or stream, or the
///   page's `/Contents` is not a stream or array of streams
/// - [`Error::ContentStream`] on malformed content, carrying the line
/// - resolution and decoding errors unchanged
///
/// # Examples
///
/// ```
/// use pdf_content_codec::content::parse_content_stream;
/// use pdf_content_codec::document::Document;
/// use pdf_content_codec::object::{Dictionary, Object};
///
/// let doc = Document::new();
/// let stream = Object::stream(Dictionary::new(), &b"1 0 0 1 5 5 cm q 1 0 0 rg Q"[..]);
/// let instructions = parse_content_stream(&doc, &stream, "cm Q")?;
/// assert_eq!(instructions.len(), 2);
/// assert_eq!(instructions[0].operands.len(), 6);
/// # Ok::<(), pdf_content_codec::error::Error>(())
/// ```
pub fn parse_content_stream<R>(resolver: &R, source: &Object, operators: &str) -> Result<Vec<Instruction>>
where
    R: ObjectResolver + ?Sized,
{
    parse_content_stream_with_options(resolver, source, operators, &ParserOptions::default())
}

/// [`parse_content_stream`] with explicit parser options.
pub fn parse_content_stream_with_options<R>(
    resolver: &R,
    source: &Object,
    operators: &str,
    options: &ParserOptions,
) -> Result<Vec<Instruction>>
where
    R: ObjectResolver + ?Sized,
{
    let data = match content_bytes(resolver, source, options) {
        Ok(data) => data,
        Err(Error::NotAByteSource { found }) => {
            return Err(Error::InvalidInputType(format!(
                "page /Contents is not a stream or an array of streams (found {})",
                found
            )))
        },
        Err(e) => return Err(e),
    };
    parse_content_bytes_with_options(&data, operators, options)
}

/// Parse already decoded content stream bytes.
pub fn parse_content_bytes(data: &[u8], operators: &str) -> Result<Vec<Instruction>> {
    parse_content_bytes_with_options(data, operators, &ParserOptions::default())
}

/// [`parse_content_bytes`] with explicit parser options.
pub fn parse_content_bytes_with_options(
    data: &[u8],
    operators: &str,
    options: &ParserOptions,
) -> Result<Vec<Instruction>> {
    let mut grouper = OperandGrouper::new(OperatorWhitelist::parse(operators));
    parse_with_callbacks(data, options, &mut grouper)?;
    log::debug!(
        "Parsed {} instructions from {} bytes",
        grouper.instructions().len(),
        data.len()
    );
    Ok(grouper.into_instructions())
}

/// Tokenize `data` and hand every token to `callbacks`.
///
/// On a parse error nothing more is delivered and `handle_eof` is not called.
pub fn parse_with_callbacks<C>(data: &[u8], options: &ParserOptions, callbacks: &mut C) -> Result<()>
where
    C: ParserCallbacks + ?Sized,
{
    for token in ContentTokenizer::new(data, *options) {
        if callbacks.handle_token(token?).is_break() {
            return Ok(());
        }
    }
    callbacks.handle_eof();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::operators::Operand;
    use crate::content::tokenizer::LocatedToken;
    use crate::document::Document;
    use crate::object::Dictionary;

    #[test]
    fn test_parse_simple_text() {
        let ops = parse_content_bytes(b"BT /F1 12 Tf 100 700 Td (Hello) Tj ET", "").unwrap();
        let names: Vec<String> = ops.iter().map(|i| i.operator.to_string()).collect();
        assert_eq!(names, vec!["BT", "Tf", "Td", "Tj", "ET"]);
        assert_eq!(ops[1].operands[0], Operand::Object(Object::name("F1")));
    }

    #[test]
    fn test_parse_tj_array() {
        let ops = parse_content_bytes(b"[(Hel) -20 (lo)] TJ", "").unwrap();
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0].operands[0], Operand::Object(Object::Array(a)) if a.len() == 3));
    }

    #[test]
    fn test_parse_quote_operators() {
        let ops = parse_content_bytes(b"(a) ' 1 2 (b) \" T*", "").unwrap();
        let names: Vec<String> = ops.iter().map(|i| i.operator.to_string()).collect();
        assert_eq!(names, vec!["'", "\"", "T*"]);
        assert_eq!(ops[1].operands.len(), 3);
    }

    #[test]
    fn test_parse_empty_and_whitespace_only() {
        assert!(parse_content_bytes(b"", "").unwrap().is_empty());
        assert!(parse_content_bytes(b"  \n\t % nothing\n", "").unwrap().is_empty());
    }

    #[test]
    fn test_whitelist_applied() {
        let ops = parse_content_bytes(b"1 0 0 1 5 5 cm q 1 0 0 rg Q", "cm Q").unwrap();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].operator, "cm");
        assert_eq!(ops[1].operator, "Q");
        assert!(ops[1].operands.is_empty());
    }

    #[test]
    fn test_not_a_byte_source_becomes_invalid_input_type() {
        let mut dict = Dictionary::new();
        dict.insert("Type".into(), Object::name("Page"));
        dict.insert("Contents".into(), Object::Integer(1));
        let doc = Document::new();
        match parse_content_stream(&doc, &Object::Dictionary(dict), "") {
            Err(Error::InvalidInputType(message)) => assert!(message.contains("Integer")),
            other => panic!("expected InvalidInputType, got {:?}", other),
        }
    }

    struct Counter {
        operators: usize,
        limit: usize,
        saw_eof: bool,
    }

    impl ParserCallbacks for Counter {
        fn handle_token(&mut self, token: LocatedToken) -> ControlFlow<()> {
            if let crate::content::ContentToken::Operator(_) = token.token {
                self.operators += 1;
            }
            if self.operators >= self.limit {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        }

        fn handle_eof(&mut self) {
            self.saw_eof = true;
        }
    }

    #[test]
    fn test_custom_callbacks() {
        let mut counter = Counter {
            operators: 0,
            limit: usize::MAX,
            saw_eof: false,
        };
        parse_with_callbacks(b"q 1 w Q", &ParserOptions::default(), &mut counter).unwrap();
        assert_eq!(counter.operators, 3);
        assert!(counter.saw_eof);
    }

    #[test]
    fn test_callbacks_can_stop_early() {
        let mut counter = Counter {
            operators: 0,
            limit: 1,
            saw_eof: false,
        };
        // The malformed tail is never reached
        parse_with_callbacks(b"q ) Q", &ParserOptions::default(), &mut counter).unwrap();
        assert_eq!(counter.operators, 1);
        assert!(!counter.saw_eof);
    }
}
