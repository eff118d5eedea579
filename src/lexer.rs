//! PDF lexer (tokenizer) for object literals.
//!
//! Low-level tokenization of PDF syntax as it appears in content streams:
//! numbers, strings, names, the `true`/`false`/`null` keywords, array and
//! dictionary delimiters, and bare keywords. Bare keywords are runs of regular
//! characters that are not one of the literal keywords; inside content
//! streams they are operators, inside object syntax `R` marks a reference.
//!
//! Whitespace (space, \t, \r, \n, \0, \f) and comments (% to EOL) are skipped.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_till, take_while, take_while1},
    character::complete::{char, digit0, digit1, one_of},
    combinator::{map, opt, recognize, value},
    multi::many0,
    sequence::{pair, preceded, tuple},
    IResult,
};

/// Token types recognized by the lexer.
#[derive(Debug, PartialEq, Clone)]
pub enum Token<'a> {
    /// Integer number (e.g., 42, -123)
    Integer(i64),

    /// Real (floating-point) number (e.g., 3.14, -2.5, .5)
    Real(f64),

    /// Literal string bytes between the outer parentheses, escapes not decoded
    LiteralString(&'a [u8]),

    /// Hexadecimal string digits between `<` and `>`, whitespace preserved
    HexString(&'a [u8]),

    /// Name bytes without the leading `/`, `#XX` escapes decoded
    Name(Vec<u8>),

    /// Boolean true keyword
    True,

    /// Boolean false keyword
    False,

    /// Null keyword
    Null,

    /// Array start delimiter [
    ArrayStart,

    /// Array end delimiter ]
    ArrayEnd,

    /// Dictionary start delimiter <<
    DictStart,

    /// Dictionary end delimiter >>
    DictEnd,

    /// Any other run of regular characters (operators, `R`, `ID`, ...)
    Keyword(&'a [u8]),
}

/// PDF whitespace characters (ISO 32000-1:2008, Table 1).
pub fn is_whitespace(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\r' | b'\n' | 0x00 | 0x0C)
}

/// PDF delimiter characters (ISO 32000-1:2008, Table 2).
pub fn is_delimiter(c: u8) -> bool {
    matches!(c, b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%')
}

/// Characters that are neither whitespace nor delimiters.
pub fn is_regular(c: u8) -> bool {
    !is_whitespace(c) && !is_delimiter(c)
}

/// Parse one or more whitespace characters.
fn whitespace(input: &[u8]) -> IResult<&[u8], ()> {
    value((), take_while1(is_whitespace))(input)
}

/// Parse a comment (% to end of line, not including the EOL).
fn comment(input: &[u8]) -> IResult<&[u8], ()> {
    value((), preceded(char('%'), take_till(|c| c == b'\r' || c == b'\n')))(input)
}

/// Skip all whitespace and comments.
pub fn skip_ws(input: &[u8]) -> IResult<&[u8], ()> {
    value((), many0(alt((whitespace, comment))))(input)
}

/// Parse an integer or real number.
///
/// Accepts a leading sign and reals with no digits on one side of the point
/// (`.5`, `5.`). Integers too large for i64 are returned as reals; numbers
/// too large for f64 are a hard failure rather than infinity.
fn parse_number(input: &[u8]) -> IResult<&[u8], Token<'_>> {
    let (rest, text) = recognize(tuple((
        opt(one_of("+-")),
        alt((
            recognize(pair(digit1, opt(pair(char('.'), digit0)))),
            recognize(pair(char('.'), digit1)),
        )),
    )))(input)?;

    let fail = || nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Digit));
    let text = std::str::from_utf8(text).map_err(|_| fail())?;

    if !text.contains('.') {
        if let Ok(i) = text.parse::<i64>() {
            return Ok((rest, Token::Integer(i)));
        }
    }
    let r = text.parse::<f64>().map_err(|_| fail())?;
    if !r.is_finite() {
        return Err(nom::Err::Failure(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Float,
        )));
    }
    Ok((rest, Token::Real(r)))
}

/// Parse a literal string enclosed in parentheses.
///
/// Balanced nested parentheses are allowed, and `\` escapes the next byte so
/// that escaped parentheses do not count towards the nesting depth. The raw
/// bytes are returned; escape decoding happens in the parser.
fn parse_literal_string(input: &[u8]) -> IResult<&[u8], Token<'_>> {
    let (body, _) = char('(')(input)?;
    let mut depth = 1usize;
    let mut pos = 0;

    while pos < body.len() {
        match body[pos] {
            b'\\' => pos += 2,
            b'(' => {
                depth += 1;
                pos += 1;
            },
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&body[pos + 1..], Token::LiteralString(&body[..pos])));
                }
                pos += 1;
            },
            _ => pos += 1,
        }
    }

    Err(nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Eof)))
}

/// Parse a hexadecimal string enclosed in angle brackets.
///
/// Only hex digits and whitespace may appear between the brackets.
fn parse_hex_string(input: &[u8]) -> IResult<&[u8], Token<'_>> {
    if input.starts_with(b"<<") {
        return Err(nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Tag)));
    }

    let (rest, _) = char('<')(input)?;
    let (rest, digits) = take_while(|c: u8| c.is_ascii_hexdigit() || is_whitespace(c))(rest)?;
    let (rest, _) = char('>')(rest)?;
    Ok((rest, Token::HexString(digits)))
}

/// Decode #XX escape sequences in PDF names.
///
/// PDF Spec: ISO 32000-1:2008, Section 7.3.5 - Name Objects. Invalid
/// sequences are kept literally.
///
/// # Examples
///
/// ```
/// # use pdf_content_codec::lexer::decode_name_escapes;
/// assert_eq!(decode_name_escapes(b"A#20B#23C"), b"A B#C");
/// assert_eq!(decode_name_escapes(b"Type"), b"Type");
/// assert_eq!(decode_name_escapes(b"A#"), b"A#");
/// ```
pub fn decode_name_escapes(name: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(name.len());
    let mut i = 0;

    while i < name.len() {
        if name[i] == b'#' && i + 2 < name.len() {
            let high = (name[i + 1] as char).to_digit(16);
            let low = (name[i + 2] as char).to_digit(16);
            if let (Some(h), Some(l)) = (high, low) {
                result.push((h * 16 + l) as u8);
                i += 3;
                continue;
            }
        }
        result.push(name[i]);
        i += 1;
    }

    result
}

/// Parse a name starting with /.
///
/// Empty names (`/` followed by a delimiter) are accepted.
fn parse_name(input: &[u8]) -> IResult<&[u8], Token<'_>> {
    preceded(
        char('/'),
        map(take_while(is_regular), |bytes: &[u8]| Token::Name(decode_name_escapes(bytes))),
    )(input)
}

/// Parse array and dictionary delimiters.
fn parse_delimiter(input: &[u8]) -> IResult<&[u8], Token<'_>> {
    alt((
        value(Token::DictStart, tag(b"<<")),
        value(Token::DictEnd, tag(b">>")),
        value(Token::ArrayStart, tag(b"[")),
        value(Token::ArrayEnd, tag(b"]")),
    ))(input)
}

/// Parse a run of regular characters as a keyword.
///
/// `true`, `false` and `null` are only recognized when they make up the whole
/// run, so `nullify` is a keyword rather than `null` followed by `ify`.
fn parse_keyword(input: &[u8]) -> IResult<&[u8], Token<'_>> {
    map(take_while1(is_regular), |word: &[u8]| match word {
        b"true" => Token::True,
        b"false" => Token::False,
        b"null" => Token::Null,
        _ => Token::Keyword(word),
    })(input)
}

/// Parse a single token, skipping leading whitespace and comments.
///
/// Numbers are tried before keywords because digits are regular characters.
pub fn token(input: &[u8]) -> IResult<&[u8], Token<'_>> {
    let (input, _) = skip_ws(input)?;

    alt((
        parse_delimiter,
        parse_name,
        parse_literal_string,
        parse_hex_string,
        parse_number,
        parse_keyword,
    ))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Numbers
    // ========================================================================

    #[test]
    fn test_parse_integers() {
        assert_eq!(token(b"42"), Ok((&b""[..], Token::Integer(42))));
        assert_eq!(token(b"-123"), Ok((&b""[..], Token::Integer(-123))));
        assert_eq!(token(b"+17"), Ok((&b""[..], Token::Integer(17))));
        assert_eq!(token(b"0"), Ok((&b""[..], Token::Integer(0))));
    }

    #[test]
    fn test_parse_reals() {
        assert_eq!(token(b"-2.5"), Ok((&b""[..], Token::Real(-2.5))));
        assert_eq!(token(b".5"), Ok((&b""[..], Token::Real(0.5))));
        assert_eq!(token(b"5."), Ok((&b""[..], Token::Real(5.0))));
        assert_eq!(token(b"-.002"), Ok((&b""[..], Token::Real(-0.002))));
    }

    #[test]
    fn test_integer_overflow_becomes_real() {
        let (_, tok) = token(b"99999999999999999999").unwrap();
        assert!(matches!(tok, Token::Real(_)));
    }

    #[test]
    fn test_number_beyond_f64_fails() {
        let huge = vec![b'9'; 400];
        assert!(matches!(token(&huge), Err(nom::Err::Failure(_))));

        let mut huge_real = huge.clone();
        huge_real.extend_from_slice(b".5");
        assert!(matches!(token(&huge_real), Err(nom::Err::Failure(_))));
    }

    // ========================================================================
    // Strings
    // ========================================================================

    #[test]
    fn test_parse_literal_string() {
        assert_eq!(token(b"(Hello)"), Ok((&b""[..], Token::LiteralString(b"Hello"))));
        assert_eq!(token(b"()"), Ok((&b""[..], Token::LiteralString(b""))));
    }

    #[test]
    fn test_parse_literal_string_nested_and_escaped() {
        assert_eq!(
            token(b"(a (b) c)"),
            Ok((&b""[..], Token::LiteralString(b"a (b) c")))
        );
        assert_eq!(
            token(b"(Open \\( Close \\))"),
            Ok((&b""[..], Token::LiteralString(b"Open \\( Close \\)")))
        );
        assert_eq!(token(b"(a\\\\)"), Ok((&b""[..], Token::LiteralString(b"a\\\\"))));
    }

    #[test]
    fn test_unterminated_literal_string() {
        assert!(token(b"(never closed").is_err());
    }

    #[test]
    fn test_parse_hex_string() {
        assert_eq!(token(b"<48656C6C6F>"), Ok((&b""[..], Token::HexString(b"48656C6C6F"))));
        assert_eq!(token(b"<48 65>"), Ok((&b""[..], Token::HexString(b"48 65"))));
        assert_eq!(token(b"<>"), Ok((&b""[..], Token::HexString(b""))));
    }

    #[test]
    fn test_hex_string_rejects_non_hex() {
        assert!(token(b"<4G>").is_err());
    }

    // ========================================================================
    // Names
    // ========================================================================

    #[test]
    fn test_parse_name() {
        assert_eq!(token(b"/Type"), Ok((&b""[..], Token::Name(b"Type".to_vec()))));
        assert_eq!(token(b"/A#20B"), Ok((&b""[..], Token::Name(b"A B".to_vec()))));
        assert_eq!(token(b"/A#ZZ"), Ok((&b""[..], Token::Name(b"A#ZZ".to_vec()))));
    }

    #[test]
    fn test_name_escapes_outside_utf8() {
        assert_eq!(token(b"/F#E9"), Ok((&b""[..], Token::Name(vec![b'F', 0xE9]))));
        assert_eq!(token(b"/F\xE9 "), Ok((&b" "[..], Token::Name(vec![b'F', 0xE9]))));
    }

    #[test]
    fn test_name_stops_at_delimiter() {
        assert_eq!(token(b"/F1[1]"), Ok((&b"[1]"[..], Token::Name(b"F1".to_vec()))));
        assert_eq!(token(b"/ "), Ok((&b" "[..], Token::Name(Vec::new()))));
    }

    #[test]
    fn test_decode_name_escapes_directly() {
        assert_eq!(decode_name_escapes(b"A#2"), b"A#2");
        assert_eq!(decode_name_escapes(b"#41#42"), b"AB");
    }

    // ========================================================================
    // Keywords and delimiters
    // ========================================================================

    #[test]
    fn test_literal_keywords() {
        assert_eq!(token(b"true"), Ok((&b""[..], Token::True)));
        assert_eq!(token(b"false"), Ok((&b""[..], Token::False)));
        assert_eq!(token(b"null"), Ok((&b""[..], Token::Null)));
        assert_eq!(token(b"nullify"), Ok((&b""[..], Token::Keyword(b"nullify"))));
    }

    #[test]
    fn test_operator_keywords() {
        assert_eq!(token(b"Tj"), Ok((&b""[..], Token::Keyword(b"Tj"))));
        assert_eq!(token(b"T*"), Ok((&b""[..], Token::Keyword(b"T*"))));
        assert_eq!(token(b"'"), Ok((&b""[..], Token::Keyword(b"'"))));
        assert_eq!(token(b"f*("), Ok((&b"("[..], Token::Keyword(b"f*"))));
    }

    #[test]
    fn test_delimiters() {
        assert_eq!(token(b"<<"), Ok((&b""[..], Token::DictStart)));
        assert_eq!(token(b">>"), Ok((&b""[..], Token::DictEnd)));
        assert_eq!(token(b"["), Ok((&b""[..], Token::ArrayStart)));
        assert_eq!(token(b"]"), Ok((&b""[..], Token::ArrayEnd)));
    }

    // ========================================================================
    // Whitespace and comments
    // ========================================================================

    #[test]
    fn test_skip_whitespace_and_comments() {
        assert_eq!(token(b"  \n\t42"), Ok((&b""[..], Token::Integer(42))));
        assert_eq!(
            token(b"  % Comment\n  \t% Another\r\n  42"),
            Ok((&b""[..], Token::Integer(42)))
        );
    }

    #[test]
    fn test_token_sequence() {
        let mut input = &b"1 0 0 1 5 5 cm /F1 12 Tf"[..];
        let mut toks = Vec::new();
        while let Ok((rest, tok)) = token(input) {
            toks.push(tok);
            input = rest;
        }
        assert!(input.is_empty());
        assert_eq!(toks.len(), 10);
        assert_eq!(toks[6], Token::Keyword(b"cm"));
        assert_eq!(toks[7], Token::Name(b"F1".to_vec()));
    }

    #[test]
    fn test_character_classes() {
        assert!(is_whitespace(0x00));
        assert!(is_whitespace(0x0C));
        assert!(is_delimiter(b'%'));
        assert!(is_regular(b'*'));
        assert!(!is_regular(b'/'));
    }
}
