//! Schema registry and `$ref` resolution.
//!
//! Internal references (`#/definitions/Foo`) are walked as JSON Pointers.
//! External references are matched against registered keys with a loose,
//! bidirectional suffix rule so that `./schemas/person.json`, `person.json`
//! and `https://example.org/person.json` all find each other.

use indexmap::IndexMap;
use serde_json::Value;

use crate::data::SchemaDocument;

/// Loaded documents, both in upload order and keyed for reference lookup.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    documents: Vec<SchemaDocument>,
    keys: IndexMap<String, usize>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document.
    ///
    /// The document is always appended to the ordered sequence. A key that is
    /// already taken now points at the new document.
    pub fn register(&mut self, document: SchemaDocument) -> usize {
        let idx = self.documents.len();
        if let Some(prev) = self.keys.insert(document.key.clone(), idx) {
            debug!(
                "schema key `{}` re-registered, replacing document #{prev}",
                document.key
            );
        }
        self.documents.push(document);
        idx
    }

    /// Documents in upload order.
    pub fn documents(&self) -> &[SchemaDocument] {
        &self.documents
    }

    /// Exact key lookup.
    pub fn by_key(&self, key: &str) -> Option<&SchemaDocument> {
        self.keys.get(key).map(|&idx| &self.documents[idx])
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Resolve `reference` relative to `base`.
    ///
    /// Returns `None` when nothing matches; callers keep the `$ref` node
    /// unexpanded and carry on.
    pub fn resolve<'a>(&'a self, reference: &str, base: &'a Value) -> Option<&'a Value> {
        self.resolve_with_root(reference, base, base)
            .map(|(node, _)| node)
    }

    /// Resolve `reference` from `base`, a node inside the document `root`.
    ///
    /// Internal references are walked from `base` first and from `root` when
    /// that fails. Returns the target together with the root of the document
    /// it lives in, which becomes the root for references found inside it.
    pub fn resolve_with_root<'a>(
        &'a self,
        reference: &str,
        base: &'a Value,
        root: &'a Value,
    ) -> Option<(&'a Value, &'a Value)> {
        if let Some(fragment) = reference.strip_prefix('#') {
            return walk_pointer(base, fragment)
                .or_else(|| walk_pointer(root, fragment))
                .map(|node| (node, root));
        }

        let (target, fragment) = match reference.split_once('#') {
            Some((target, fragment)) => (target, Some(fragment)),
            None => (reference, None),
        };

        let doc = self.find_external(target)?;
        let node = match fragment {
            Some(fragment) if !fragment.is_empty() => walk_pointer(&doc.schema, fragment)?,
            _ => &doc.schema,
        };
        Some((node, &doc.schema))
    }

    /// Locate a registered document for an external reference.
    ///
    /// The first key (in registration order) that is a suffix of `target`, or
    /// of which `target` is a suffix, wins. Exact lookup is the fallback.
    pub fn find_external(&self, target: &str) -> Option<&SchemaDocument> {
        if !target.is_empty() {
            let hit = self.keys.iter().find(|(key, _)| {
                !key.is_empty() && (target.ends_with(key.as_str()) || key.ends_with(target))
            });
            if let Some((key, &idx)) = hit {
                trace!("`{target}` matched registered key `{key}`");
                return Some(&self.documents[idx]);
            }
        }
        self.by_key(target)
    }
}

/// Walk a JSON Pointer fragment (the part after `#`).
///
/// Any missing segment yields `None`; there is no partial result.
fn walk_pointer<'a>(base: &'a Value, fragment: &str) -> Option<&'a Value> {
    if fragment.is_empty() {
        return Some(base);
    }
    if fragment.starts_with('/') {
        base.pointer(fragment)
    } else {
        base.pointer(&format!("/{fragment}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(schema: Value, name: &str) -> SchemaDocument {
        SchemaDocument::from_value(schema, name).unwrap()
    }

    #[test]
    fn test_internal_reference() {
        let reg = SchemaRegistry::new();
        let base = json!({
            "definitions": {
                "Demographics": {"title": "Demographics", "properties": {"age": {}}},
                "a/b": {"title": "Escaped"}
            }
        });

        let found = reg.resolve("#/definitions/Demographics", &base).unwrap();
        assert_eq!(found["title"], "Demographics");

        let escaped = reg.resolve("#/definitions/a~1b", &base).unwrap();
        assert_eq!(escaped["title"], "Escaped");

        assert_eq!(reg.resolve("#", &base), Some(&base));
        assert!(reg.resolve("#/definitions/Missing", &base).is_none());
        assert!(reg.resolve("#/nope/Demographics", &base).is_none());
    }

    #[test]
    fn test_external_suffix_match() {
        let mut reg = SchemaRegistry::new();
        reg.register(doc(json!({"title": "Person"}), "person.json"));
        reg.register(doc(
            json!({"$id": "https://example.org/schemas/visit.json", "title": "Visit"}),
            "visit.json",
        ));
        let base = json!({});

        // key is a suffix of the reference
        let found = reg.resolve("./schemas/person.json", &base).unwrap();
        assert_eq!(found["title"], "Person");

        // reference is a suffix of the key
        let found = reg.resolve("schemas/visit.json", &base).unwrap();
        assert_eq!(found["title"], "Visit");

        assert!(reg.resolve("unknown.json", &base).is_none());
    }

    #[test]
    fn test_external_with_fragment() {
        let mut reg = SchemaRegistry::new();
        reg.register(doc(
            json!({"$defs": {"Address": {"title": "Address"}}}),
            "common.json",
        ));
        let base = json!({});

        let found = reg.resolve("common.json#/$defs/Address", &base).unwrap();
        assert_eq!(found["title"], "Address");
        assert!(reg.resolve("common.json#/$defs/Phone", &base).is_none());
        assert!(reg.resolve("common.json#", &base).is_some());
    }

    #[test]
    fn test_internal_falls_back_to_root() {
        let reg = SchemaRegistry::new();
        let root = json!({
            "definitions": {"Code": {"title": "Code"}},
            "properties": {"items": {"type": "object"}}
        });
        let nested = &root["properties"]["items"];

        assert!(reg.resolve("#/definitions/Code", nested).is_none());
        let (found, found_root) = reg
            .resolve_with_root("#/definitions/Code", nested, &root)
            .unwrap();
        assert_eq!(found["title"], "Code");
        assert!(std::ptr::eq(found_root, &root));
    }

    #[test]
    fn test_external_switches_root() {
        let mut reg = SchemaRegistry::new();
        reg.register(doc(json!({"$defs": {"Id": {"type": "string"}}}), "ids.json"));
        let base = json!({});

        let (found, found_root) = reg
            .resolve_with_root("ids.json#/$defs/Id", &base, &base)
            .unwrap();
        assert_eq!(found["type"], "string");
        assert!(found_root.get("$defs").is_some());
    }

    #[test]
    fn test_shared_suffix_first_registered_wins() {
        let mut reg = SchemaRegistry::new();
        reg.register(doc(json!({"title": "Staff"}), "staff/person.json"));
        reg.register(doc(json!({"title": "Patient"}), "patient/person.json"));
        let base = json!({});

        // both keys end with `person.json`; registration order decides
        let found = reg.resolve("person.json", &base).unwrap();
        assert_eq!(found["title"], "Staff");

        let found = reg.resolve("patient/person.json", &base).unwrap();
        assert_eq!(found["title"], "Patient");
    }

    #[test]
    fn test_last_registered_wins_on_key_collision() {
        let mut reg = SchemaRegistry::new();
        reg.register(doc(json!({"title": "Old"}), "a.json"));
        reg.register(doc(json!({"title": "New"}), "a.json"));

        assert_eq!(reg.len(), 2);
        assert_eq!(reg.by_key("a.json").unwrap().title(), Some("New"));
        assert_eq!(reg.documents()[0].title(), Some("Old"));
    }
}
