//! Property extraction: flattening a schema node into table rows.
//!
//! For one schema node the rows are, in order:
//!
//! 1. one row per entry of `properties`, in declaration order, each followed
//!    directly by the rows of its `items` when it is an array of objects;
//! 2. the rows of every `allOf` entry, in declaration order.
//!
//! Array-of-objects expansions get their own `"<name> — array items"` section
//! unless categories are forced, in which case they stay in the parent's
//! section. Either way, expanded rows remember the originating property in
//! [`PropertyRow::array_parent`].

use std::ptr;

use serde_json::Value;

use crate::{
    data::{PropertyRow, document::has_type, document::title_of},
    resolver::SchemaRegistry,
};

/// Suffix of the section label given to array-of-objects expansions.
pub const ARRAY_ITEMS_SUFFIX: &str = " — array items";

/// Extract rows from `schema`, treating it as the root of its own document.
///
/// # Arguments
///
/// * `registry` - Loaded documents, used to resolve `$ref`s in `allOf`.
/// * `schema` - The node whose `properties`/`allOf` become rows.
/// * `category` - Section label for the rows emitted at this level.
/// * `force_category` - Keep every row in `category` instead of deriving
///   labels from array properties and referenced sub-schema titles.
pub fn extract<'a>(
    registry: &'a SchemaRegistry,
    schema: &'a Value,
    category: Option<&str>,
    force_category: bool,
) -> Vec<PropertyRow<'a>> {
    extract_in(registry, schema, schema, category, force_category)
}

/// Like [`extract`], for a `schema` node that lives inside the document `root`.
pub fn extract_in<'a>(
    registry: &'a SchemaRegistry,
    root: &'a Value,
    schema: &'a Value,
    category: Option<&str>,
    force_category: bool,
) -> Vec<PropertyRow<'a>> {
    let extractor = Extractor {
        registry,
        force_category,
    };
    let mut active = Vec::new();
    extractor.walk(schema, root, category, &mut active)
}

struct Extractor<'a> {
    registry: &'a SchemaRegistry,
    force_category: bool,
}

impl<'a> Extractor<'a> {
    fn walk(
        &self,
        schema: &'a Value,
        root: &'a Value,
        category: Option<&str>,
        active: &mut Vec<&'a Value>,
    ) -> Vec<PropertyRow<'a>> {
        if active.iter().any(|node| ptr::eq(*node, schema)) {
            warn!("reference cycle detected, skipping repeated schema node");
            return Vec::new();
        }
        active.push(schema);

        let mut rows = self.properties(schema, root, category, active);
        rows.extend(self.all_of(schema, root, category, active));

        active.pop();
        rows
    }

    fn properties(
        &self,
        schema: &'a Value,
        root: &'a Value,
        category: Option<&str>,
        active: &mut Vec<&'a Value>,
    ) -> Vec<PropertyRow<'a>> {
        let Some(props) = schema.get("properties").and_then(Value::as_object) else {
            return Vec::new();
        };

        let required: Vec<&str> = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let mut rows = Vec::with_capacity(props.len());
        for (name, prop) in props {
            rows.push(PropertyRow {
                category: category.map(str::to_string),
                name: name.clone(),
                schema: prop,
                required: required.contains(&name.as_str()),
                array_parent: None,
            });

            let Some(items) = object_items(prop) else {
                continue;
            };

            let sub_category = if self.force_category {
                category.map(str::to_string)
            } else {
                Some(format!("{name}{ARRAY_ITEMS_SUFFIX}"))
            };

            let mut nested = self.walk(items, root, sub_category.as_deref(), active);
            for row in &mut nested {
                if row.array_parent.is_none() {
                    row.array_parent = Some(name.clone());
                }
            }
            rows.extend(nested);
        }
        rows
    }

    fn all_of(
        &self,
        schema: &'a Value,
        root: &'a Value,
        category: Option<&str>,
        active: &mut Vec<&'a Value>,
    ) -> Vec<PropertyRow<'a>> {
        let Some(entries) = schema.get("allOf").and_then(Value::as_array) else {
            return Vec::new();
        };

        let mut rows = Vec::new();
        for entry in entries {
            let Some(reference) = entry.get("$ref").and_then(Value::as_str) else {
                rows.extend(self.walk(entry, root, category, active));
                continue;
            };

            match self.registry.resolve_with_root(reference, schema, root) {
                Some((resolved, resolved_root)) => {
                    let sub_category = if self.force_category {
                        category
                    } else {
                        title_of(resolved).or(category)
                    };
                    rows.extend(self.walk(resolved, resolved_root, sub_category, active));
                }
                None => debug!("allOf reference `{reference}` not resolved, skipping"),
            }
        }
        rows
    }
}

/// The `items` of an array property whose items declare `properties`.
fn object_items(prop: &Value) -> Option<&Value> {
    if !has_type(prop, "array") {
        return None;
    }
    prop.get("items")
        .filter(|items| items.get("properties").is_some_and(Value::is_object))
}
