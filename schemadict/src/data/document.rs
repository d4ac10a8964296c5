use serde_json::Value;

use crate::error::{DictError, Result};

/// Raw input handed to [`SchemaSet::load`](crate::session::SchemaSet::load).
///
/// The loading layer (file picker, URL fetcher) is responsible for turning
/// its sources into text; the engine only ever sees these pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    /// JSON text of one schema document.
    pub text: String,
    /// File name, path or URL the text came from.
    pub name: String,
}

impl SourceText {
    /// Create a new input pair.
    pub fn new(text: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            name: name.into(),
        }
    }
}

/// A parsed JSON Schema document together with its registration key.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    /// `$id` when present, otherwise the source name.
    pub key: String,
    /// Name of the input this document was parsed from.
    pub source_name: String,
    /// Parsed schema. Always a JSON object.
    pub schema: Value,
}

impl SchemaDocument {
    /// Parse a source into a document.
    ///
    /// # Errors
    ///
    /// Returns [`DictError::Parse`] for malformed JSON and
    /// [`DictError::NotAnObject`] when the top level is not an object.
    pub fn parse(source: &SourceText) -> Result<Self> {
        let schema: Value =
            serde_json::from_str(&source.text).map_err(|source_err| DictError::Parse {
                name: source.name.clone(),
                source: source_err,
            })?;
        Self::from_value(schema, &source.name)
    }

    /// Wrap an already parsed value.
    pub fn from_value(schema: Value, source_name: &str) -> Result<Self> {
        if !schema.is_object() {
            return Err(DictError::NotAnObject {
                name: source_name.to_string(),
            });
        }

        let key = match schema.get("$id").and_then(Value::as_str) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => source_name.to_string(),
        };

        Ok(Self {
            key,
            source_name: source_name.to_string(),
            schema,
        })
    }

    /// The document's `title`, if it has a non-empty one.
    pub fn title(&self) -> Option<&str> {
        title_of(&self.schema)
    }

    /// The document's `description`, if it has a non-empty one.
    pub fn description(&self) -> Option<&str> {
        description_of(&self.schema)
    }

    /// Whether this document is a dataset wrapper: `type: array` with `items`.
    pub fn is_array_wrapper(&self) -> bool {
        is_array_wrapper(&self.schema)
    }

    /// Whether this document looks like a record schema.
    pub fn is_object_candidate(&self) -> bool {
        has_type(&self.schema, "object")
            || self
                .schema
                .get("properties")
                .and_then(Value::as_object)
                .is_some_and(|props| !props.is_empty())
    }
}

/// Make source names presentable as section labels.
///
/// A trailing `.json` is stripped and underscores become spaces. Each name
/// keeps as many trailing path segments as it takes to tell the names apart.
///
/// `site_a/visit.json` and `site_b/visit.json` become `site a/visit` and
/// `site b/visit`; names that are already distinct stay at their file name.
pub fn distinct_source_names(names: &[&str]) -> Vec<String> {
    let segments: Vec<usize> = names.iter().map(|n| path_segments(n).len()).collect();
    let mut depth = vec![1; names.len()];

    loop {
        let labels: Vec<String> = names
            .iter()
            .zip(&depth)
            .map(|(name, &d)| source_label(name, d))
            .collect();

        let mut grew = false;
        for (i, label) in labels.iter().enumerate() {
            let clash = labels
                .iter()
                .enumerate()
                .any(|(j, other)| j != i && other == label);
            if clash && depth[i] < segments[i] {
                depth[i] += 1;
                grew = true;
            }
        }
        if !grew {
            return labels;
        }
    }
}

fn path_segments(name: &str) -> Vec<&str> {
    let stem = name.strip_suffix(".json").unwrap_or(name);
    stem.split('/').filter(|s| !s.is_empty()).collect()
}

fn source_label(name: &str, depth: usize) -> String {
    let segments = path_segments(name);
    let start = segments.len().saturating_sub(depth);
    segments[start..].join("/").replace('_', " ")
}

/// Whether `schema.type` is `ty`, or is an array of types containing `ty`.
pub fn has_type(schema: &Value, ty: &str) -> bool {
    match schema.get("type") {
        Some(Value::String(s)) => s == ty,
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some(ty)),
        _ => false,
    }
}

/// `type: array` with a non-empty `items` value.
pub fn is_array_wrapper(schema: &Value) -> bool {
    has_type(schema, "array")
        && schema
            .get("items")
            .and_then(Value::as_object)
            .is_some_and(|items| !items.is_empty())
}

pub(crate) fn title_of(schema: &Value) -> Option<&str> {
    schema
        .get("title")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

pub(crate) fn description_of(schema: &Value) -> Option<&str> {
    schema
        .get("description")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_prefers_id() {
        let doc = SchemaDocument::from_value(
            json!({"$id": "https://example.org/person.json", "type": "object"}),
            "person.json",
        )
        .unwrap();
        assert_eq!(doc.key, "https://example.org/person.json");
        assert_eq!(doc.source_name, "person.json");

        let doc = SchemaDocument::from_value(json!({"type": "object"}), "person.json").unwrap();
        assert_eq!(doc.key, "person.json");
    }

    #[test]
    fn test_parse_errors() {
        let err = SchemaDocument::parse(&SourceText::new("{not json", "bad.json")).unwrap_err();
        assert!(matches!(err, DictError::Parse { ref name, .. } if name == "bad.json"));

        let err = SchemaDocument::parse(&SourceText::new("[1, 2]", "list.json")).unwrap_err();
        assert!(matches!(err, DictError::NotAnObject { .. }));
    }

    #[test]
    fn test_distinct_source_names() {
        assert_eq!(
            distinct_source_names(&[
                "person_details.json",
                "schemas/visit_a.json",
                "https://example.org/x/lab_result.json",
                "notes.schema",
            ]),
            vec!["person details", "visit a", "lab result", "notes.schema"]
        );
        assert_eq!(
            distinct_source_names(&["site_a/visit.json", "site_b/visit.json", "lab.json"]),
            vec!["site a/visit", "site b/visit", "lab"]
        );
        assert_eq!(
            distinct_source_names(&["x/common/visit.json", "y/common/visit.json"]),
            vec!["x/common/visit", "y/common/visit"]
        );
        assert_eq!(
            distinct_source_names(&["a/visit.json", "b/lab.json"]),
            vec!["visit", "lab"]
        );
        assert_eq!(
            distinct_source_names(&["visit.json", "visit.json"]),
            vec!["visit", "visit"]
        );
    }

    #[test]
    fn test_candidates() {
        let wrapper =
            SchemaDocument::from_value(json!({"type": "array", "items": {"$ref": "row.json"}}), "w")
                .unwrap();
        assert!(wrapper.is_array_wrapper());
        assert!(!wrapper.is_object_candidate());

        let empty_items =
            SchemaDocument::from_value(json!({"type": "array", "items": {}}), "w").unwrap();
        assert!(!empty_items.is_array_wrapper());

        let untyped =
            SchemaDocument::from_value(json!({"properties": {"a": {}}}), "o").unwrap();
        assert!(untyped.is_object_candidate());

        let nullable = json!({"type": ["object", "null"]});
        assert!(has_type(&nullable, "object"));
        assert!(!has_type(&nullable, "array"));
    }
}
