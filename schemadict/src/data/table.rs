use serde::Serialize;
use serde_json::Value;

use crate::data::document::{description_of, title_of};

/// Title used for a dataset wrapper when neither it nor its row schema has one.
pub const DEFAULT_DATASET_TITLE: &str = "Dataset Schema";
/// Title of a table combined from several object schemas.
pub const COMBINED_TITLE: &str = "Combined Data Dictionary";
/// Title used for a single object schema without one.
pub const DEFAULT_TITLE: &str = "Data Dictionary";

/// One flattened variable of the data dictionary.
///
/// `schema` borrows the property's own sub-schema from the loaded document so
/// renderers can reach every original keyword.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRow<'a> {
    /// Section label, `None` for top-level rows.
    pub category: Option<String>,
    /// Property key. Unique only within its parent `properties` map.
    pub name: String,
    /// The property's sub-schema.
    pub schema: &'a Value,
    /// Listed in the parent schema's `required` array.
    pub required: bool,
    /// Name of the array-of-objects property this row was expanded from.
    pub array_parent: Option<String>,
}

/// The assembled data dictionary handed to renderers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableModel<'a> {
    pub title: String,
    pub description: String,
    pub properties: Vec<PropertyRow<'a>>,
}

impl<'a> TableModel<'a> {
    /// Table for a dataset wrapper (`type: array` with `items`).
    ///
    /// Title and description come from the wrapper, then the row schema, then
    /// fall back to [`DEFAULT_DATASET_TITLE`] and an empty description.
    pub fn dataset(
        wrapper: &Value,
        row_schema: Option<&Value>,
        properties: Vec<PropertyRow<'a>>,
    ) -> Self {
        let title = title_of(wrapper)
            .or_else(|| row_schema.and_then(title_of))
            .unwrap_or(DEFAULT_DATASET_TITLE);
        let description = description_of(wrapper)
            .or_else(|| row_schema.and_then(description_of))
            .unwrap_or_default();

        Self {
            title: title.to_string(),
            description: description.to_string(),
            properties,
        }
    }

    /// Table combined from several independently supplied object schemas.
    ///
    /// `titles` are the distinct document titles in upload order; `documents`
    /// is the number of combined documents.
    pub fn combined(titles: &[&str], documents: usize, properties: Vec<PropertyRow<'a>>) -> Self {
        let description = if titles.is_empty() {
            format!("Combined from {documents} schema files")
        } else {
            format!("Combined from: {}", titles.join(", "))
        };

        Self {
            title: COMBINED_TITLE.to_string(),
            description,
            properties,
        }
    }

    /// Table for a single object schema.
    pub fn single(schema: &Value, properties: Vec<PropertyRow<'a>>) -> Self {
        Self {
            title: title_of(schema).unwrap_or(DEFAULT_TITLE).to_string(),
            description: description_of(schema).unwrap_or_default().to_string(),
            properties,
        }
    }

    /// Distinct categories in first-appearance order.
    pub fn categories(&self) -> Vec<Option<&str>> {
        let mut out: Vec<Option<&str>> = Vec::new();
        for row in &self.properties {
            let cat = row.category.as_deref();
            if !out.contains(&cat) {
                out.push(cat);
            }
        }
        out
    }
}
