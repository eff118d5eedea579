//! Content stream instructions.
//!
//! An instruction is a group of operands closed by one operator. Operators are
//! kept as plain identifiers; no meaning is attached to them here, so unknown
//! or vendor-specific operators round-trip unchanged.

use crate::content::inline_image::InlineImage;
use crate::lexer::{is_regular, token, Token};
use crate::object::Object;
use std::collections::HashSet;
use std::fmt;

/// A content stream operator identifier (`Tj`, `cm`, `Do`, ...).
///
/// Stored as the raw bytes read from the stream, which need not be UTF-8.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Operator(Vec<u8>);

impl Operator {
    /// Marker operator of inline image instructions.
    ///
    /// The space guarantees it can never be lexed from a content stream.
    pub const INLINE_IMAGE: &'static str = "INLINE IMAGE";

    /// Create an operator from its identifier.
    pub fn new(name: impl Into<Vec<u8>>) -> Self {
        Operator(name.into())
    }

    /// The inline image marker operator.
    pub fn inline_image() -> Self {
        Operator::new(Self::INLINE_IMAGE)
    }

    /// The operator bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The operator as text, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    /// Whether this is the inline image marker.
    pub fn is_inline_image(&self) -> bool {
        self.0 == Self::INLINE_IMAGE.as_bytes()
    }

    /// Whether the identifier can be written to a content stream.
    ///
    /// It must lex back as a single keyword: regular characters only, not
    /// `true`/`false`/`null`, and not starting like a number. `BI` is excluded
    /// because it always opens an inline image.
    pub fn is_writable(&self) -> bool {
        let bytes = self.0.as_slice();
        if bytes.is_empty() || bytes == b"BI" || !bytes.iter().all(|&b| is_regular(b)) {
            return false;
        }
        matches!(token(bytes), Ok((rest, Token::Keyword(word))) if rest.is_empty() && word == bytes)
    }
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Operator({})", self.0.escape_ascii())
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

impl From<&str> for Operator {
    fn from(name: &str) -> Self {
        Operator::new(name)
    }
}

impl From<&[u8]> for Operator {
    fn from(name: &[u8]) -> Self {
        Operator::new(name)
    }
}

impl From<String> for Operator {
    fn from(name: String) -> Self {
        Operator::new(name)
    }
}

impl From<Vec<u8>> for Operator {
    fn from(name: Vec<u8>) -> Self {
        Operator(name)
    }
}

impl AsRef<[u8]> for Operator {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl PartialEq<str> for Operator {
    fn eq(&self, other: &str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl PartialEq<&str> for Operator {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}

/// An instruction operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Any direct object: number, string, name, array, dictionary, boolean, null
    Object(Object),
    /// The single operand of an inline image instruction
    InlineImage(InlineImage),
}

impl Operand {
    /// The object, unless this is an inline image.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Operand::Object(obj) => Some(obj),
            Operand::InlineImage(_) => None,
        }
    }
}

impl From<Object> for Operand {
    fn from(obj: Object) -> Self {
        Operand::Object(obj)
    }
}

impl From<InlineImage> for Operand {
    fn from(image: InlineImage) -> Self {
        Operand::InlineImage(image)
    }
}

/// Operands followed by the operator that consumes them.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    /// Operands in argument order
    pub operands: Vec<Operand>,
    /// The closing operator
    pub operator: Operator,
}

impl Instruction {
    /// Create an instruction.
    pub fn new(operands: Vec<Operand>, operator: impl Into<Operator>) -> Self {
        Self {
            operands,
            operator: operator.into(),
        }
    }

    /// Create an instruction from plain objects.
    ///
    /// ```
    /// use pdf_content_codec::content::Instruction;
    /// use pdf_content_codec::Object;
    ///
    /// let tf = Instruction::with_objects(vec![Object::name("F1"), Object::Integer(12)], "Tf");
    /// assert_eq!(tf.operands.len(), 2);
    /// ```
    pub fn with_objects(operands: Vec<Object>, operator: impl Into<Operator>) -> Self {
        Self::new(operands.into_iter().map(Operand::Object).collect(), operator)
    }

    /// Wrap an inline image in its marker instruction.
    pub fn inline_image(image: InlineImage) -> Self {
        Self {
            operands: vec![Operand::InlineImage(image)],
            operator: Operator::inline_image(),
        }
    }

    /// Whether this is an inline image instruction.
    pub fn is_inline_image(&self) -> bool {
        self.operator.is_inline_image()
    }

    /// The image carried by an inline image instruction.
    pub fn as_inline_image(&self) -> Option<&InlineImage> {
        match (self.is_inline_image(), self.operands.as_slice()) {
            (true, [Operand::InlineImage(image)]) => Some(image),
            _ => None,
        }
    }
}

/// Set of operators to keep while parsing.
///
/// An empty whitelist keeps everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperatorWhitelist {
    operators: HashSet<Vec<u8>>,
}

impl OperatorWhitelist {
    /// Build a whitelist from a whitespace-separated list of operators.
    pub fn parse(operators: &str) -> Self {
        Self {
            operators: operators
                .split_whitespace()
                .map(|op| op.as_bytes().to_vec())
                .collect(),
        }
    }

    /// Whether every operator is accepted.
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// Whether instructions closed by `operator` are kept.
    ///
    /// Inline images are kept when any of `BI`, `ID` or `EI` is listed.
    pub fn allows(&self, operator: &Operator) -> bool {
        if self.operators.is_empty() {
            return true;
        }
        if operator.is_inline_image() {
            return [b"BI", b"ID", b"EI"]
                .iter()
                .any(|op| self.operators.contains(op.as_slice()));
        }
        self.operators.contains(operator.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Dictionary;

    #[test]
    fn test_operator_basics() {
        let op = Operator::from("Tj");
        assert_eq!(op, "Tj");
        assert_eq!(op.as_str(), Some("Tj"));
        assert_eq!(op.to_string(), "Tj");
        assert!(!op.is_inline_image());
        assert!(Operator::inline_image().is_inline_image());
    }

    #[test]
    fn test_operator_writability() {
        assert!(Operator::new("T*").is_writable());
        assert!(Operator::new("'").is_writable());
        assert!(!Operator::new("").is_writable());
        assert!(!Operator::new("a b").is_writable());
        assert!(!Operator::new("a/b").is_writable());
        assert!(!Operator::new("null").is_writable());
        assert!(!Operator::new("12").is_writable());
        assert!(!Operator::new("1x").is_writable());
        assert!(Operator::new("-x").is_writable());
        assert!(!Operator::new("BI").is_writable());
        assert!(!Operator::inline_image().is_writable());
    }

    #[test]
    fn test_operator_bytes_outside_utf8() {
        let op = Operator::from(&b"x\xE9"[..]);
        assert_eq!(op.as_bytes(), b"x\xE9");
        assert!(op.as_str().is_none());
        assert!(op.is_writable());
        assert_eq!(format!("{:?}", op), "Operator(x\\xe9)");
        assert!(!OperatorWhitelist::parse("x").allows(&op));
    }

    #[test]
    fn test_whitelist_empty_allows_all() {
        let whitelist = OperatorWhitelist::parse("  ");
        assert!(whitelist.is_empty());
        assert!(whitelist.allows(&Operator::new("anything")));
    }

    #[test]
    fn test_whitelist_membership() {
        let whitelist = OperatorWhitelist::parse("cm Q");
        assert!(whitelist.allows(&Operator::new("cm")));
        assert!(whitelist.allows(&Operator::new("Q")));
        assert!(!whitelist.allows(&Operator::new("q")));
        assert!(!whitelist.allows(&Operator::inline_image()));
    }

    #[test]
    fn test_whitelist_inline_image_aliases() {
        for ops in ["BI", "ID", "EI", "q EI"] {
            assert!(OperatorWhitelist::parse(ops).allows(&Operator::inline_image()));
        }
    }

    #[test]
    fn test_instruction_inline_image_accessor() {
        let image = InlineImage::new(Dictionary::new(), vec![1, 2, 3]);
        let instruction = Instruction::inline_image(image.clone());
        assert!(instruction.is_inline_image());
        assert_eq!(instruction.as_inline_image(), Some(&image));

        let plain = Instruction::with_objects(vec![], "q");
        assert!(plain.as_inline_image().is_none());
    }
}
