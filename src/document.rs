//! In-memory PDF object store.
//!
//! Content streams and the pages that own them live in a document's object
//! table. The codec only needs to follow indirect references, which is what
//! the [`ObjectResolver`] trait captures; [`Document`] is a simple
//! implementation backed by a hash map, handy for building pages by hand.

use crate::content::{self, Instruction};
use crate::error::{Error, Result};
use crate::object::{Object, ObjectRef};
use std::collections::{HashMap, HashSet};

/// Maximum number of references followed in one chain.
const MAX_RECURSION_DEPTH: usize = 100;

/// Source of indirect objects.
pub trait ObjectResolver {
    /// Load the object stored under `obj_ref`.
    fn resolve(&self, obj_ref: ObjectRef) -> Result<Object>;

    /// Follow references until a direct object is reached.
    ///
    /// Direct objects are returned as-is. Reference cycles fail with
    /// [`Error::CircularReference`].
    fn resolve_object(&self, obj: &Object) -> Result<Object> {
        let mut current = obj.clone();
        let mut seen = HashSet::new();

        while let Object::Reference(obj_ref) = current {
            if !seen.insert(obj_ref) || seen.len() > MAX_RECURSION_DEPTH {
                log::error!("Circular reference detected for object {}", obj_ref);
                return Err(Error::CircularReference(obj_ref));
            }
            log::trace!("Resolving {}", obj_ref);
            current = self.resolve(obj_ref)?;
        }

        Ok(current)
    }
}

/// PDF object table held in memory.
///
/// # Example
///
/// ```
/// use pdf_content_codec::document::Document;
/// use pdf_content_codec::object::{Dictionary, Object};
///
/// let mut doc = Document::new();
/// let stream = doc.add_object(Object::stream(Dictionary::new(), &b"q 1 0 0 1 0 0 cm Q"[..]));
///
/// let mut page = Dictionary::new();
/// page.insert("Type".into(), Object::name("Page"));
/// page.insert("Contents".into(), Object::Reference(stream));
/// let page = doc.add_object(Object::Dictionary(page));
///
/// let instructions = doc.page_instructions(page, "cm")?;
/// assert_eq!(instructions.len(), 1);
/// # Ok::<(), pdf_content_codec::error::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Document {
    objects: HashMap<ObjectRef, Object>,
    next_id: u32,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self {
            objects: HashMap::new(),
            next_id: 1,
        }
    }

    /// Store an object under the next free object number.
    ///
    /// Numbers count up from the highest one in use. Once `u32::MAX` is taken
    /// the lowest unused number is handed out instead.
    pub fn add_object(&mut self, obj: Object) -> ObjectRef {
        let mut id = self.next_id.max(1);
        if self.objects.contains_key(&ObjectRef::new(id, 0)) {
            let free = (1..=u32::MAX).find(|&n| !self.objects.contains_key(&ObjectRef::new(n, 0)));
            if let Some(free) = free {
                log::debug!("Object numbers exhausted at {}, reusing {}", id, free);
                id = free;
            }
        }
        let obj_ref = ObjectRef::new(id, 0);
        self.next_id = id.saturating_add(1);
        self.objects.insert(obj_ref, obj);
        obj_ref
    }

    /// Store an object under an explicit reference, replacing any previous one.
    pub fn set_object(&mut self, obj_ref: ObjectRef, obj: Object) -> Option<Object> {
        self.next_id = self.next_id.max(obj_ref.id.saturating_add(1));
        self.objects.insert(obj_ref, obj)
    }

    /// Borrow a stored object.
    pub fn get_object(&self, obj_ref: ObjectRef) -> Result<&Object> {
        self.objects
            .get(&obj_ref)
            .ok_or(Error::ObjectNotFound(obj_ref.id, obj_ref.gen))
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the document holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Parse the content of a page (or content stream) stored in this document.
    ///
    /// `operators` is a space-separated whitelist; empty keeps everything.
    pub fn page_instructions(&self, page: ObjectRef, operators: &str) -> Result<Vec<Instruction>> {
        content::parse_content_stream(self, &Object::Reference(page), operators)
    }
}

impl ObjectResolver for Document {
    fn resolve(&self, obj_ref: ObjectRef) -> Result<Object> {
        self.get_object(obj_ref).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_object_assigns_sequential_numbers() {
        let mut doc = Document::new();
        assert!(doc.is_empty());
        let a = doc.add_object(Object::Integer(1));
        let b = doc.add_object(Object::Integer(2));
        assert_eq!(a, ObjectRef::new(1, 0));
        assert_eq!(b, ObjectRef::new(2, 0));
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_set_object_advances_next_id() {
        let mut doc = Document::new();
        assert!(doc.set_object(ObjectRef::new(10, 0), Object::Null).is_none());
        assert_eq!(doc.add_object(Object::Null), ObjectRef::new(11, 0));
        let previous = doc.set_object(ObjectRef::new(10, 0), Object::Integer(5));
        assert_eq!(previous, Some(Object::Null));
    }

    #[test]
    fn test_object_numbers_at_u32_max() {
        let mut doc = Document::new();
        doc.set_object(ObjectRef::new(u32::MAX, 0), Object::Integer(1));

        let next = doc.add_object(Object::Integer(2));
        assert_eq!(next, ObjectRef::new(1, 0));
        let after = doc.add_object(Object::Integer(3));
        assert_eq!(after, ObjectRef::new(2, 0));

        assert_eq!(doc.len(), 3);
        assert_eq!(doc.get_object(ObjectRef::new(u32::MAX, 0)).unwrap(), &Object::Integer(1));
    }

    #[test]
    fn test_add_object_skips_numbers_in_use() {
        let mut doc = Document::new();
        doc.set_object(ObjectRef::new(u32::MAX, 0), Object::Null);
        doc.set_object(ObjectRef::new(1, 0), Object::Null);
        assert_eq!(doc.add_object(Object::Null), ObjectRef::new(2, 0));
        assert_eq!(doc.len(), 3);
    }

    #[test]
    fn test_get_missing_object() {
        let doc = Document::new();
        match doc.get_object(ObjectRef::new(3, 0)) {
            Err(Error::ObjectNotFound(3, 0)) => {},
            other => panic!("expected ObjectNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_object_follows_chain() {
        let mut doc = Document::new();
        let target = doc.add_object(Object::Integer(42));
        let middle = doc.add_object(Object::Reference(target));
        let resolved = doc.resolve_object(&Object::Reference(middle)).unwrap();
        assert_eq!(resolved, Object::Integer(42));
        assert_eq!(doc.resolve_object(&Object::Boolean(true)).unwrap(), Object::Boolean(true));
    }

    #[test]
    fn test_resolve_object_detects_cycle() {
        let mut doc = Document::new();
        let a = ObjectRef::new(1, 0);
        let b = ObjectRef::new(2, 0);
        doc.set_object(a, Object::Reference(b));
        doc.set_object(b, Object::Reference(a));
        assert!(matches!(
            doc.resolve_object(&Object::Reference(a)),
            Err(Error::CircularReference(_))
        ));
    }
}
