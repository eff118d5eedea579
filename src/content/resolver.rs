//! Turning a page or stream into one logical content stream.
//!
//! A page's `/Contents` may be a single stream or an array of streams whose
//! concatenation forms the page content. Streams are decoded through their
//! filters and joined with a newline so that a token can never straddle two
//! streams.

use crate::document::ObjectResolver;
use crate::error::{Error, Result};
use crate::object::Object;
use crate::parser_config::ParserOptions;

/// Collect the decoded content bytes of a page or content stream.
///
/// References are followed first. A page without `/Contents` (or with a null
/// one) has empty content. When `/Contents` is neither a stream nor an array
/// of streams the result is [`Error::NotAByteSource`]; any other input that is
/// not a page or stream is [`Error::InvalidInputType`].
pub fn content_bytes<R>(resolver: &R, source: &Object, options: &ParserOptions) -> Result<Vec<u8>>
where
    R: ObjectResolver + ?Sized,
{
    let source = resolver.resolve_object(source)?;

    match &source {
        Object::Stream { .. } => source.decode_stream_data_with_options(options),
        Object::Dictionary(dict) if source.is_page() => match dict.get("Contents") {
            Some(contents) => page_contents(resolver, contents, options),
            None => {
                log::debug!("Page has no /Contents; treating as empty");
                Ok(Vec::new())
            },
        },
        other => Err(Error::InvalidInputType(format!(
            "not a stream or page (found {})",
            other.type_name()
        ))),
    }
}

fn page_contents<R>(resolver: &R, contents: &Object, options: &ParserOptions) -> Result<Vec<u8>>
where
    R: ObjectResolver + ?Sized,
{
    match resolver.resolve_object(contents)? {
        Object::Null => Ok(Vec::new()),
        stream @ Object::Stream { .. } => stream.decode_stream_data_with_options(options),
        Object::Array(items) => {
            let mut combined = Vec::new();
            for (i, item) in items.iter().enumerate() {
                let item = resolver.resolve_object(item)?;
                if !item.is_stream() {
                    return Err(Error::NotAByteSource {
                        found: format!("{} in /Contents array", item.type_name()),
                    });
                }
                if i > 0 {
                    combined.push(b'\n');
                }
                combined.extend_from_slice(&item.decode_stream_data_with_options(options)?);
            }
            log::debug!("Joined {} content streams into {} bytes", items.len(), combined.len());
            Ok(combined)
        },
        other => Err(Error::NotAByteSource {
            found: other.type_name().to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::object::{Dictionary, ObjectRef};

    fn stream(data: &'static [u8]) -> Object {
        Object::stream(Dictionary::new(), data)
    }

    fn page(contents: Option<Object>) -> Object {
        let mut dict = Dictionary::new();
        dict.insert("Type".into(), Object::name("Page"));
        if let Some(contents) = contents {
            dict.insert("Contents".into(), contents);
        }
        Object::Dictionary(dict)
    }

    fn bytes(doc: &Document, source: &Object) -> Result<Vec<u8>> {
        content_bytes(doc, source, &ParserOptions::default())
    }

    #[test]
    fn test_direct_stream() {
        let doc = Document::new();
        assert_eq!(bytes(&doc, &stream(b"q Q")).unwrap(), b"q Q");
    }

    #[test]
    fn test_referenced_stream() {
        let mut doc = Document::new();
        let r = doc.add_object(stream(b"BT ET"));
        assert_eq!(bytes(&doc, &Object::Reference(r)).unwrap(), b"BT ET");
    }

    #[test]
    fn test_page_with_stream_array() {
        let mut doc = Document::new();
        let a = doc.add_object(stream(b"q"));
        let b = doc.add_object(stream(b"Q"));
        let contents = Object::Array(vec![Object::Reference(a), Object::Reference(b)]);
        assert_eq!(bytes(&doc, &page(Some(contents))).unwrap(), b"q\nQ");
    }

    #[test]
    fn test_page_with_indirect_array() {
        let mut doc = Document::new();
        let a = doc.add_object(stream(b"1 w"));
        let arr = doc.add_object(Object::Array(vec![Object::Reference(a), stream(b"S")]));
        let page_ref = doc.add_object(page(Some(Object::Reference(arr))));
        assert_eq!(bytes(&doc, &Object::Reference(page_ref)).unwrap(), b"1 w\nS");
    }

    #[test]
    fn test_page_without_contents_is_empty() {
        let doc = Document::new();
        assert!(bytes(&doc, &page(None)).unwrap().is_empty());
        assert!(bytes(&doc, &page(Some(Object::Null))).unwrap().is_empty());
    }

    #[test]
    fn test_bad_contents_is_not_a_byte_source() {
        let doc = Document::new();
        match bytes(&doc, &page(Some(Object::Integer(5)))) {
            Err(Error::NotAByteSource { found }) => assert_eq!(found, "Integer"),
            other => panic!("expected NotAByteSource, got {:?}", other),
        }
        let mixed = Object::Array(vec![stream(b"q"), Object::name("Q")]);
        assert!(matches!(
            bytes(&doc, &page(Some(mixed))),
            Err(Error::NotAByteSource { .. })
        ));
    }

    #[test]
    fn test_other_inputs_rejected() {
        let doc = Document::new();
        assert!(matches!(bytes(&doc, &Object::Integer(3)), Err(Error::InvalidInputType(_))));
        let mut not_page = Dictionary::new();
        not_page.insert("Type".into(), Object::name("Pages"));
        assert!(matches!(
            bytes(&doc, &Object::Dictionary(not_page)),
            Err(Error::InvalidInputType(_))
        ));
    }

    #[test]
    fn test_missing_reference_propagates() {
        let doc = Document::new();
        assert!(matches!(
            bytes(&doc, &page(Some(Object::Reference(ObjectRef::new(9, 0))))),
            Err(Error::ObjectNotFound(9, 0))
        ));
    }
}
