//! Content stream tokenizer.
//!
//! Splits a logical content stream into operands, operators and inline
//! images. Operands are parsed whole by the object parser in direct mode, so
//! an array or dictionary operand is a single token. Every token records the
//! 1-based line it starts on together with its byte offset and length.
//!
//! Lines advance on LF and on a CR that is not followed by LF, wherever the
//! newline occurs (inside strings and inline image data included).

use crate::content::inline_image::InlineImage;
use crate::content::operators::Operator;
use crate::error::{Error, Result};
use crate::lexer::{is_whitespace, skip_ws, token, Token};
use crate::object::{Dictionary, Object};
use crate::parser::{describe, parse_direct_object};
use crate::parser_config::ParserOptions;

/// A lexical unit of a content stream.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentToken {
    /// An operand literal
    Operand(Object),
    /// An operator identifier
    Operator(Operator),
    /// A complete `BI ... ID ... EI` region
    InlineImage(InlineImage),
}

/// A token together with its position in the logical stream.
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedToken {
    /// The token
    pub token: ContentToken,
    /// 1-based line where the token starts
    pub line: usize,
    /// Byte offset of the first byte of the token
    pub offset: usize,
    /// Number of bytes the token spans
    pub length: usize,
}

/// Iterator over the tokens of a content stream.
///
/// Yields `Err` at most once; iteration ends after the first error.
///
/// ```
/// use pdf_content_codec::content::{ContentToken, ContentTokenizer};
/// use pdf_content_codec::parser_config::ParserOptions;
///
/// let tokens: Vec<_> = ContentTokenizer::new(b"q\n1 0 0 1 0 0 cm", ParserOptions::default())
///     .collect::<Result<_, _>>()?;
/// assert_eq!(tokens.len(), 8);
/// assert_eq!(tokens[7].line, 2);
/// assert!(matches!(tokens[7].token, ContentToken::Operator(_)));
/// # Ok::<(), pdf_content_codec::error::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ContentTokenizer<'a> {
    data: &'a [u8],
    pos: usize,
    line: usize,
    options: ParserOptions,
    failed: bool,
}

impl<'a> ContentTokenizer<'a> {
    /// Create a tokenizer over decoded content stream bytes.
    pub fn new(data: &'a [u8], options: ParserOptions) -> Self {
        Self {
            data,
            pos: 0,
            line: 1,
            options,
            failed: false,
        }
    }

    /// Line of the current position.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Move to `to`, counting the newlines passed over.
    fn advance(&mut self, to: usize) {
        for i in self.pos..to {
            match self.data[i] {
                b'\n' => self.line += 1,
                b'\r' if self.data.get(i + 1) != Some(&b'\n') => self.line += 1,
                _ => {},
            }
        }
        self.pos = to;
    }

    /// Offset of a suffix of `data`.
    fn offset_of(&self, rest: &[u8]) -> usize {
        self.data.len() - rest.len()
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.data[self.pos..];
        let to = match skip_ws(rest) {
            Ok((after, _)) => self.offset_of(after),
            Err(_) => self.pos,
        };
        self.advance(to);
    }

    fn next_token(&mut self) -> Result<Option<LocatedToken>> {
        self.skip_whitespace();
        if self.pos >= self.data.len() {
            return Ok(None);
        }

        let data = self.data;
        let start = self.pos;
        let line = self.line;
        let rest = &data[start..];

        let token = match token(rest) {
            Ok((after, Token::Keyword(b"BI"))) => {
                let after = self.offset_of(after);
                self.advance(after);
                ContentToken::InlineImage(self.read_inline_image(line)?)
            },
            Ok((after, Token::Keyword(word))) => {
                let after = self.offset_of(after);
                self.advance(after);
                ContentToken::Operator(Operator::new(word))
            },
            Ok(_) => {
                let obj = self.read_object(line)?;
                ContentToken::Operand(obj)
            },
            Err(nom::Err::Failure(e)) => {
                return Err(Error::content_stream(
                    line,
                    format!("malformed operand at line {}: {}", line, describe(e.code)),
                ))
            },
            Err(_) => {
                return Err(Error::content_stream(
                    line,
                    format!("unrecognized token at line {}", line),
                ))
            },
        };

        Ok(Some(LocatedToken {
            token,
            line,
            offset: start,
            length: self.pos - start,
        }))
    }

    /// Parse one direct object at the current position.
    fn read_object(&mut self, line: usize) -> Result<Object> {
        let data = self.data;
        let rest = &data[self.pos..];
        match parse_direct_object(rest, &self.options) {
            Ok((after, obj)) => {
                let after = self.offset_of(after);
                self.advance(after);
                Ok(obj)
            },
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(Error::content_stream(
                line,
                format!("malformed operand at line {}: {}", line, describe(e.code)),
            )),
            Err(nom::Err::Incomplete(_)) => Err(Error::content_stream_at(line)),
        }
    }

    /// Read the rest of an inline image; the position is just past `BI`.
    fn read_inline_image(&mut self, bi_line: usize) -> Result<InlineImage> {
        let no_id = || {
            Error::content_stream(
                bi_line,
                format!("inline image starting at line {} has no ID", bi_line),
            )
        };
        let data = self.data;
        let mut params = Dictionary::new();

        loop {
            self.skip_whitespace();
            if self.pos >= self.data.len() {
                return Err(no_id());
            }

            match token(&data[self.pos..]) {
                Ok((after, Token::Keyword(b"ID"))) => {
                    let after = self.offset_of(after);
                    self.advance(after);
                    break;
                },
                Ok((_, Token::Keyword(_))) => return Err(no_id()),
                Err(nom::Err::Error(_)) | Err(nom::Err::Incomplete(_)) => return Err(no_id()),
                // Operands, and hard lexer failures that read_object reports
                Ok(_) | Err(nom::Err::Failure(_)) => {},
            }

            let key = self.read_object(bi_line)?;
            self.skip_whitespace();
            if self.pos >= self.data.len() {
                return Err(no_id());
            }
            if let Ok((_, Token::Keyword(_))) = token(&data[self.pos..]) {
                return Err(no_id());
            }
            let value = self.read_object(bi_line)?;

            match key {
                Object::Name(name) => {
                    params.insert(name, value);
                },
                other if self.options.strict => {
                    return Err(Error::content_stream(
                        bi_line,
                        format!(
                            "inline image at line {} has a {} key",
                            bi_line,
                            other.type_name()
                        ),
                    ))
                },
                other => {
                    log::warn!(
                        "Dropping inline image entry with {} key at line {}",
                        other.type_name(),
                        bi_line
                    );
                },
            }
        }

        // A single whitespace byte separates ID from the data
        let mut data_start = self.pos;
        if data_start < data.len() && is_whitespace(data[data_start]) {
            data_start += 1;
        }

        let ei = find_inline_image_end(data, data_start).ok_or_else(|| {
            Error::content_stream(
                bi_line,
                format!("inline image starting at line {} has no EI", bi_line),
            )
        })?;
        let data_end = (ei - 1).max(data_start);
        let image_data = data[data_start..data_end].to_vec();
        self.advance(ei + 2);

        Ok(InlineImage::new(params, image_data))
    }
}

impl Iterator for ContentTokenizer<'_> {
    type Item = Result<LocatedToken>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_token() {
            Ok(token) => token.map(Ok),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            },
        }
    }
}

/// Find the `EI` that ends inline image data starting at `data_start`.
///
/// `EI` counts only when preceded by a whitespace byte and followed by
/// whitespace or the end of input. Returns the offset of the `E`.
pub(crate) fn find_inline_image_end(data: &[u8], data_start: usize) -> Option<usize> {
    (data_start.max(1)..data.len().saturating_sub(1)).find(|&p| {
        &data[p..p + 2] == b"EI"
            && is_whitespace(data[p - 1])
            && data.get(p + 2).map_or(true, |&b| is_whitespace(b))
    })
}
