//! Keyword usage statistics over extracted rows.

use indexmap::IndexMap;
use serde::Serialize;

use crate::{data::PropertyRow, keyword::is_excluded};

/// How many rows use a free keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordUsageStat {
    pub keyword: String,
    pub count: usize,
}

/// Tally the free keywords used by `rows`.
///
/// Each row counts at most once per keyword. The result is sorted by count,
/// highest first; equal counts keep the order keywords were first seen in.
pub fn collect_keyword_usage(rows: &[PropertyRow<'_>]) -> Vec<KeywordUsageStat> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();

    for row in rows {
        let Some(map) = row.schema.as_object() else {
            continue;
        };
        for key in map.keys().filter(|k| !is_excluded(k)) {
            *counts.entry(key.as_str()).or_default() += 1;
        }
    }

    let mut stats: Vec<KeywordUsageStat> = counts
        .into_iter()
        .map(|(keyword, count)| KeywordUsageStat {
            keyword: keyword.to_string(),
            count,
        })
        .collect();
    // stable: ties stay in discovery order
    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn row(schema: &Value) -> PropertyRow<'_> {
        PropertyRow {
            category: None,
            name: "x".to_string(),
            schema,
            required: false,
            array_parent: None,
        }
    }

    #[test]
    fn test_counts_sorted_descending() {
        let schemas = [
            json!({"type": "string", "default": "a", "format": "date"}),
            json!({"type": "string", "format": "email", "required": ["x"]}),
            json!({"$ref": "#/x", "format": "uri", "pattern": "^h"}),
        ];
        let rows: Vec<_> = schemas.iter().map(row).collect();

        let stats = collect_keyword_usage(&rows);
        assert_eq!(
            stats,
            vec![
                KeywordUsageStat {
                    keyword: "format".to_string(),
                    count: 3
                },
                KeywordUsageStat {
                    keyword: "default".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_ties_keep_discovery_order() {
        let schemas = [
            json!({"title": "A", "examples": [1]}),
            json!({"deprecated": true, "examples": [2]}),
            json!({"readOnly": true, "title": "B"}),
        ];
        let rows: Vec<_> = schemas.iter().map(row).collect();

        let order: Vec<_> = collect_keyword_usage(&rows)
            .into_iter()
            .map(|s| (s.keyword, s.count))
            .collect();
        assert_eq!(
            order,
            [
                ("title".to_string(), 2),
                ("examples".to_string(), 2),
                ("deprecated".to_string(), 1),
                ("readOnly".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_excluded_never_reported() {
        let schemas = [
            json!({"required": [], "$ref": "a", "enum": [1], "minimum": 0}),
            json!({"required": [], "$ref": "b", "uniqueItems": true}),
        ];
        let rows: Vec<_> = schemas.iter().map(row).collect();
        assert!(collect_keyword_usage(&rows).is_empty());
        assert!(collect_keyword_usage(&[]).is_empty());
    }
}
