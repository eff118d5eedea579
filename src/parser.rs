//! PDF object parser.
//!
//! Combines tokens from the lexer into complete objects (arrays,
//! dictionaries, strings, ...).
//!
//! # Architecture
//!
//! The parser uses a recursive descent approach:
//! 1. Read token from lexer
//! 2. Based on token type, decide how to parse
//! 3. For composite types (arrays, dicts), recursively parse contents
//!
//! Two modes exist. Full object syntax folds `id gen R` into a reference.
//! Content streams use direct mode, where `R` is just another operator and
//! references never appear.
//!
//! # Error Handling
//!
//! All parsing functions return `IResult` from nom. Unclosed arrays and
//! dictionaries and nesting beyond the configured limit are reported as
//! `nom::Err::Failure` so that callers do not backtrack past them.

use crate::error::{Error, Result};
use crate::lexer::{token, Token};
use crate::object::{Dictionary, Name, Object, ObjectRef};
use crate::parser_config::ParserOptions;
use nom::error::ErrorKind;
use nom::IResult;

/// Decode escape sequences in PDF literal strings.
///
/// PDF literal strings (enclosed in parentheses) support escape sequences
/// per ISO 32000-1:2008, Section 7.3.4.2:
///
/// - `\n` `\r` `\t` `\b` `\f` → the matching control character
/// - `\(` `\)` `\\` → the escaped character
/// - `\ddd` → byte with octal code (1-3 digits, high bits dropped)
/// - `\<newline>` → line continuation (ignored)
///
/// An unescaped end-of-line (CR, LF or CRLF) inside the string reads as a
/// single LF. Unknown escapes drop the backslash.
///
/// # Examples
///
/// ```
/// # use pdf_content_codec::parser::decode_literal_string_escapes;
/// let decoded = decode_literal_string_escapes(b"Section \\247 71.01");
/// assert_eq!(decoded, b"Section \xa7 71.01");
/// ```
pub fn decode_literal_string_escapes(raw: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(raw.len());
    let mut i = 0;

    while i < raw.len() {
        match raw[i] {
            b'\\' if i + 1 < raw.len() => {
                let escaped = raw[i + 1];
                i += 2;
                match escaped {
                    b'n' => result.push(b'\n'),
                    b'r' => result.push(b'\r'),
                    b't' => result.push(b'\t'),
                    b'b' => result.push(0x08),
                    b'f' => result.push(0x0C),
                    b'\n' => {},
                    b'\r' => {
                        if raw.get(i) == Some(&b'\n') {
                            i += 1;
                        }
                    },
                    b'0'..=b'7' => {
                        let mut value = u32::from(escaped - b'0');
                        let mut digits = 1;
                        while digits < 3 {
                            match raw.get(i) {
                                Some(&d @ b'0'..=b'7') => {
                                    value = value * 8 + u32::from(d - b'0');
                                    i += 1;
                                    digits += 1;
                                },
                                _ => break,
                            }
                        }
                        result.push((value & 0xFF) as u8);
                    },
                    other => result.push(other),
                }
            },
            b'\r' => {
                result.push(b'\n');
                i += 1;
                if raw.get(i) == Some(&b'\n') {
                    i += 1;
                }
            },
            byte => {
                result.push(byte);
                i += 1;
            },
        }
    }

    result
}

/// Decode the digits of a hexadecimal string.
///
/// Whitespace is ignored and an odd trailing digit is padded with `0`.
/// Non-hex bytes are skipped; the lexer never produces them.
pub fn decode_hex(hex_bytes: &[u8]) -> Vec<u8> {
    let digits: Vec<u8> = hex_bytes
        .iter()
        .filter_map(|&c| (c as char).to_digit(16).map(|d| d as u8))
        .collect();

    digits
        .chunks(2)
        .map(|pair| match pair {
            [high, low] => (high << 4) | low,
            [high] => high << 4,
            _ => 0,
        })
        .collect()
}

/// Recursive descent over lexer tokens with a nesting bound.
#[derive(Debug, Clone, Copy)]
struct ObjectParser {
    fold_references: bool,
    max_nesting: usize,
}

impl ObjectParser {
    fn parse<'a>(&self, input: &'a [u8], depth: usize) -> IResult<&'a [u8], Object> {
        let start = input;
        let (input, tok) = token(input)?;

        match tok {
            Token::Null => Ok((input, Object::Null)),
            Token::True => Ok((input, Object::Boolean(true))),
            Token::False => Ok((input, Object::Boolean(false))),
            Token::Integer(i) => {
                if self.fold_references {
                    if let Some((rest, reference)) = fold_reference(i, input) {
                        return Ok((rest, Object::Reference(reference)));
                    }
                }
                Ok((input, Object::Integer(i)))
            },
            Token::Real(r) => Ok((input, Object::Real(r))),
            Token::LiteralString(raw) => {
                Ok((input, Object::String(decode_literal_string_escapes(raw))))
            },
            Token::HexString(digits) => Ok((input, Object::String(decode_hex(digits)))),
            Token::Name(name) => Ok((input, Object::Name(Name::new(name)))),
            Token::ArrayStart => {
                self.check_depth(start, depth)?;
                self.parse_array(input, depth + 1)
            },
            Token::DictStart => {
                self.check_depth(start, depth)?;
                self.parse_dictionary(input, depth + 1)
            },
            Token::ArrayEnd | Token::DictEnd | Token::Keyword(_) => {
                Err(nom::Err::Error(nom::error::Error::new(start, ErrorKind::Tag)))
            },
        }
    }

    fn check_depth<'a>(
        &self,
        at: &'a [u8],
        depth: usize,
    ) -> std::result::Result<(), nom::Err<nom::error::Error<&'a [u8]>>> {
        if depth >= self.max_nesting {
            return Err(nom::Err::Failure(nom::error::Error::new(at, ErrorKind::TooLarge)));
        }
        Ok(())
    }

    fn parse_array<'a>(&self, input: &'a [u8], depth: usize) -> IResult<&'a [u8], Object> {
        let mut objects = Vec::new();
        let mut remaining = input;

        loop {
            match token(remaining) {
                Ok((rest, Token::ArrayEnd)) => return Ok((rest, Object::Array(objects))),
                Ok(_) => {
                    let (rest, obj) = self.parse(remaining, depth).map_err(into_failure)?;
                    objects.push(obj);
                    remaining = rest;
                },
                Err(nom::Err::Failure(e)) => return Err(nom::Err::Failure(e)),
                Err(_) => {
                    return Err(nom::Err::Failure(nom::error::Error::new(
                        remaining,
                        ErrorKind::Eof,
                    )))
                },
            }
        }
    }

    fn parse_dictionary<'a>(&self, input: &'a [u8], depth: usize) -> IResult<&'a [u8], Object> {
        let mut dict = Dictionary::new();
        let mut remaining = input;

        loop {
            match token(remaining) {
                Ok((rest, Token::DictEnd)) => return Ok((rest, Object::Dictionary(dict))),
                Ok((rest, Token::Name(key))) => {
                    let (rest, value) = self.parse(rest, depth).map_err(into_failure)?;
                    dict.insert(Name::new(key), value);
                    remaining = rest;
                },
                Ok(_) => {
                    return Err(nom::Err::Failure(nom::error::Error::new(
                        remaining,
                        ErrorKind::Tag,
                    )))
                },
                Err(nom::Err::Failure(e)) => return Err(nom::Err::Failure(e)),
                Err(_) => {
                    return Err(nom::Err::Failure(nom::error::Error::new(
                        remaining,
                        ErrorKind::Eof,
                    )))
                },
            }
        }
    }
}

/// Try to read `gen R` after an object number.
fn fold_reference(id: i64, input: &[u8]) -> Option<(&[u8], ObjectRef)> {
    let (rest, gen) = match token(input) {
        Ok((rest, Token::Integer(gen))) => (rest, gen),
        _ => return None,
    };
    match token(rest) {
        Ok((rest, Token::Keyword(b"R"))) => {
            let id = u32::try_from(id).ok()?;
            let gen = u16::try_from(gen).ok()?;
            Some((rest, ObjectRef::new(id, gen)))
        },
        _ => None,
    }
}

fn into_failure<I>(err: nom::Err<nom::error::Error<I>>) -> nom::Err<nom::error::Error<I>> {
    match err {
        nom::Err::Error(e) => nom::Err::Failure(e),
        other => other,
    }
}

/// Parse a PDF object in full object syntax, folding `id gen R` references.
///
/// Uses the default nesting limit.
pub fn parse_object(input: &[u8]) -> IResult<&[u8], Object> {
    parse_object_with_options(input, &ParserOptions::default())
}

/// Parse a PDF object in full object syntax with explicit options.
pub fn parse_object_with_options<'a>(
    input: &'a [u8],
    options: &ParserOptions,
) -> IResult<&'a [u8], Object> {
    ObjectParser {
        fold_references: true,
        max_nesting: options.max_nesting,
    }
    .parse(input, 0)
}

/// Parse a direct object as it appears in a content stream.
///
/// References are never folded, so `1 0 R` reads as the integer `1`.
pub fn parse_direct_object<'a>(
    input: &'a [u8],
    options: &ParserOptions,
) -> IResult<&'a [u8], Object> {
    ObjectParser {
        fold_references: false,
        max_nesting: options.max_nesting,
    }
    .parse(input, 0)
}

impl Object {
    /// Parse a single object literal from bytes.
    ///
    /// Leading and trailing whitespace and comments are allowed; anything else
    /// after the object is an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_content_codec::Object;
    ///
    /// let obj = Object::parse(b"<< /W 10 /H [1 2.5] >>").unwrap();
    /// assert_eq!(obj.as_dict().unwrap()["W"], Object::Integer(10));
    /// ```
    pub fn parse(input: &[u8]) -> Result<Object> {
        let offset_of = |rest: &[u8]| input.len() - rest.len();

        let (rest, obj) = parse_object(input).map_err(|e| match e {
            nom::Err::Error(e) | nom::Err::Failure(e) => Error::ParseError {
                offset: offset_of(e.input),
                reason: describe(e.code),
            },
            nom::Err::Incomplete(_) => Error::ParseError {
                offset: input.len(),
                reason: "unexpected end of input".to_string(),
            },
        })?;

        let (rest, _) = crate::lexer::skip_ws(rest).map_err(|_| Error::ParseError {
            offset: offset_of(rest),
            reason: "invalid trailing data".to_string(),
        })?;
        if !rest.is_empty() {
            return Err(Error::ParseError {
                offset: offset_of(rest),
                reason: "unexpected data after object".to_string(),
            });
        }
        Ok(obj)
    }
}

/// Human readable reason for a parser error kind.
pub(crate) fn describe(kind: ErrorKind) -> String {
    match kind {
        ErrorKind::TooLarge => "nesting too deep".to_string(),
        ErrorKind::Eof => "unterminated array or dictionary".to_string(),
        ErrorKind::Tag => "unexpected token".to_string(),
        ErrorKind::Float => "number out of range".to_string(),
        other => format!("malformed object ({})", other.description()),
    }
}
