//! Keyword classification policy.
//!
//! Every key of a property schema falls into exactly one class:
//!
//! | Class | Keywords | Rendered as |
//! |-------|----------|-------------|
//! | [`Structural`](KeywordClass::Structural) | `$schema`, `$id`, `$ref`, `properties`, `items`, `allOf`, `anyOf`, `oneOf` | nothing |
//! | [`DefaultColumn`](KeywordClass::DefaultColumn) | `name`, `description`, `type`, `enum`, `enumDescriptions` | fixed columns |
//! | [`Consolidated`](KeywordClass::Consolidated) | `required`, `const`, min/max pairs, `pattern`, `multipleOf`, `uniqueItems` | the constraints summary |
//! | [`Free`](KeywordClass::Free) | anything else | optional columns |

use serde_json::Value;

/// Consumed by the extractor, never shown.
pub const STRUCTURAL_KEYWORDS: &[&str] = &[
    "$schema",
    "$id",
    "$ref",
    "properties",
    "items",
    "allOf",
    "anyOf",
    "oneOf",
];

/// Always mapped to one of the fixed default columns.
pub const DEFAULT_COLUMN_KEYWORDS: &[&str] =
    &["name", "description", "type", "enum", "enumDescriptions"];

/// Folded into the constraints summary, in summary order.
pub const CONSOLIDATED_KEYWORDS: &[&str] = &[
    "required",
    "const",
    "minimum",
    "maximum",
    "exclusiveMinimum",
    "exclusiveMaximum",
    "minLength",
    "maxLength",
    "minItems",
    "maxItems",
    "minProperties",
    "maxProperties",
    "pattern",
    "multipleOf",
    "uniqueItems",
];

/// How a schema keyword is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordClass {
    Structural,
    DefaultColumn,
    Consolidated,
    Free,
}

impl KeywordClass {
    /// Classify a keyword.
    pub fn of(keyword: &str) -> Self {
        if STRUCTURAL_KEYWORDS.contains(&keyword) {
            Self::Structural
        } else if DEFAULT_COLUMN_KEYWORDS.contains(&keyword) {
            Self::DefaultColumn
        } else if CONSOLIDATED_KEYWORDS.contains(&keyword) {
            Self::Consolidated
        } else {
            Self::Free
        }
    }
}

/// Whether a keyword is kept out of usage stats and dynamic columns.
pub fn is_excluded(keyword: &str) -> bool {
    KeywordClass::of(keyword) != KeywordClass::Free
}

/// Summarize the consolidated keywords of a property.
///
/// `required` is the row's flag from its parent schema; a property-level
/// `required` array (listing an object's own required children) is not a
/// statement about the property itself and is ignored.
pub fn constraints_summary(schema: &Value, required: bool) -> String {
    let mut parts = Vec::new();
    if required {
        parts.push("required".to_string());
    }

    // first entry is `required`, taken from the row flag above
    for &keyword in CONSOLIDATED_KEYWORDS.iter().skip(1) {
        let Some(value) = schema.get(keyword) else {
            continue;
        };
        match (keyword, value) {
            ("uniqueItems", Value::Bool(false)) => {}
            ("uniqueItems", Value::Bool(true)) => parts.push("unique items".to_string()),
            _ => parts.push(format!("{keyword}: {}", display_value(value))),
        }
    }

    parts.join("; ")
}

/// Strings verbatim, everything else as compact JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify() {
        assert_eq!(KeywordClass::of("$ref"), KeywordClass::Structural);
        assert_eq!(KeywordClass::of("allOf"), KeywordClass::Structural);
        assert_eq!(KeywordClass::of("enumDescriptions"), KeywordClass::DefaultColumn);
        assert_eq!(KeywordClass::of("maxLength"), KeywordClass::Consolidated);
        assert_eq!(KeywordClass::of("format"), KeywordClass::Free);
        assert_eq!(KeywordClass::of("title"), KeywordClass::Free);
        assert_eq!(KeywordClass::of("x-unit"), KeywordClass::Free);

        assert!(is_excluded("required"));
        assert!(is_excluded("$schema"));
        assert!(!is_excluded("default"));
    }

    #[test]
    fn test_constraints_summary() {
        let schema = json!({
            "type": "string",
            "pattern": "^[A-Z]{2}$",
            "minLength": 2,
            "maxLength": 2,
            "uniqueItems": false
        });
        assert_eq!(
            constraints_summary(&schema, true),
            "required; minLength: 2; maxLength: 2; pattern: ^[A-Z]{2}$"
        );

        let schema = json!({"const": "v1", "uniqueItems": true, "minimum": 0.5});
        assert_eq!(
            constraints_summary(&schema, false),
            "const: v1; minimum: 0.5; unique items"
        );

        let object = json!({"type": "object", "required": ["a"]});
        assert_eq!(constraints_summary(&object, false), "");
    }
}
