//! PDF object serialization.
//!
//! Serializes PDF objects to their byte representation according to
//! PDF specification ISO 32000-1:2008. Output always parses back to an equal
//! object: reals keep a decimal point, names escape every byte that is not a
//! regular character, and dictionaries keep their insertion order.

use crate::error::{Error, Result};
use crate::object::{Dictionary, Name, Object, ObjectRef};
use std::io::Write;

/// Serializer for PDF objects.
///
/// Converts PDF Object types to their byte representation following
/// the PDF specification syntax rules.
#[derive(Debug, Clone)]
pub struct ObjectSerializer {
    /// Whether indirect references may be written
    allow_references: bool,
}

impl Default for ObjectSerializer {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectSerializer {
    /// Create a serializer for full object syntax.
    pub fn new() -> Self {
        Self {
            allow_references: true,
        }
    }

    /// Create a serializer for content stream operands.
    ///
    /// Indirect references are rejected since content streams cannot hold them.
    pub fn content() -> Self {
        Self {
            allow_references: false,
        }
    }

    /// Serialize an object to bytes.
    pub fn serialize(&self, obj: &Object) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_object(&mut buf, obj)?;
        Ok(buf)
    }

    /// Serialize an object to a string (for debugging).
    pub fn serialize_to_string(&self, obj: &Object) -> Result<String> {
        Ok(String::from_utf8_lossy(&self.serialize(obj)?).into_owned())
    }

    /// Write an object to a buffer.
    pub fn write_object<W: Write>(&self, w: &mut W, obj: &Object) -> Result<()> {
        match obj {
            Object::Null => write!(w, "null")?,
            Object::Boolean(b) => write!(w, "{}", b)?,
            Object::Integer(i) => write!(w, "{}", i)?,
            Object::Real(r) => self.write_real(w, *r)?,
            Object::String(s) => self.write_string(w, s)?,
            Object::Name(n) => self.write_name(w, n)?,
            Object::Array(arr) => self.write_array(w, arr)?,
            Object::Dictionary(dict) => self.write_dictionary(w, dict)?,
            Object::Stream { .. } => {
                return Err(Error::Unsupported("stream objects cannot be written inline".to_string()))
            },
            Object::Reference(r) => self.write_reference(w, *r)?,
        }
        Ok(())
    }

    /// Write a real number.
    ///
    /// Shortest representation that parses back to the same value, always with
    /// a decimal point so it never reads back as an integer.
    fn write_real<W: Write>(&self, w: &mut W, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(Error::Unsupported(format!("non-finite real {}", value)));
        }
        let formatted = value.to_string();
        if formatted.contains('.') {
            write!(w, "{}", formatted)?;
        } else {
            write!(w, "{}.0", formatted)?;
        }
        Ok(())
    }

    /// Write a PDF string.
    ///
    /// Uses literal string syntax `(...)` with proper escaping,
    /// or hex string syntax `<...>` for binary data.
    fn write_string<W: Write>(&self, w: &mut W, data: &[u8]) -> Result<()> {
        let is_printable = data
            .iter()
            .all(|&b| b == b'\n' || b == b'\r' || b == b'\t' || (0x20..=0x7E).contains(&b));

        if is_printable {
            w.write_all(b"(")?;
            for &byte in data {
                match byte {
                    b'(' => w.write_all(b"\\(")?,
                    b')' => w.write_all(b"\\)")?,
                    b'\\' => w.write_all(b"\\\\")?,
                    b'\n' => w.write_all(b"\\n")?,
                    b'\r' => w.write_all(b"\\r")?,
                    b'\t' => w.write_all(b"\\t")?,
                    _ => w.write_all(&[byte])?,
                }
            }
            w.write_all(b")")?;
        } else {
            w.write_all(b"<")?;
            for byte in data {
                write!(w, "{:02X}", byte)?;
            }
            w.write_all(b">")?;
        }
        Ok(())
    }

    /// Write a PDF name.
    ///
    /// Names start with `/`; anything outside the printable regular characters
    /// (and `#` itself) is written as `#XX`.
    fn write_name<W: Write>(&self, w: &mut W, name: &Name) -> Result<()> {
        w.write_all(b"/")?;
        for &byte in name.as_bytes() {
            if is_plain_name_byte(byte) {
                w.write_all(&[byte])?;
            } else {
                write!(w, "#{:02X}", byte)?;
            }
        }
        Ok(())
    }

    /// Write a PDF array.
    fn write_array<W: Write>(&self, w: &mut W, arr: &[Object]) -> Result<()> {
        w.write_all(b"[")?;
        for (i, obj) in arr.iter().enumerate() {
            if i > 0 {
                w.write_all(b" ")?;
            }
            self.write_object(w, obj)?;
        }
        w.write_all(b"]")?;
        Ok(())
    }

    /// Write a PDF dictionary in insertion order.
    fn write_dictionary<W: Write>(&self, w: &mut W, dict: &Dictionary) -> Result<()> {
        w.write_all(b"<<")?;
        for (i, (key, value)) in dict.iter().enumerate() {
            if i > 0 {
                w.write_all(b" ")?;
            }
            self.write_name(w, key)?;
            w.write_all(b" ")?;
            self.write_object(w, value)?;
        }
        w.write_all(b">>")?;
        Ok(())
    }

    fn write_reference<W: Write>(&self, w: &mut W, r: ObjectRef) -> Result<()> {
        if !self.allow_references {
            return Err(Error::Unsupported(format!(
                "indirect reference {} in content stream",
                r
            )));
        }
        write!(w, "{} {} R", r.id, r.gen)?;
        Ok(())
    }
}

fn is_plain_name_byte(byte: u8) -> bool {
    (0x21..=0x7E).contains(&byte)
        && !matches!(
            byte,
            b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%' | b'#'
        )
}
