//! # schemadict
//!
//! Turn one or more JSON Schema documents into a flat data dictionary: one
//! row per variable, grouped into sections, ready to be rendered as a table.
//!
//! ## Features
//!
//! - `$ref` resolution within a document (JSON Pointer) and across loaded
//!   documents (loose `$id`/file-name matching)
//! - `allOf` composition, with referenced sub-schema titles as sections
//! - Array-of-objects properties flattened into tagged sub-rows
//! - Dataset wrappers (`type: array` + `items`), single object schemas, and
//!   several object schemas combined into one table with a section per file
//! - Keyword usage statistics to suggest extra columns
//! - CSV, Markdown, JSON and plain-text renderers
//!
//! ## Quick Start
//!
//! ```rust
//! use schemadict::{SchemaSet, SourceText};
//!
//! let schema = r#"{
//!     "title": "Patient",
//!     "type": "object",
//!     "required": ["id"],
//!     "properties": {
//!         "id": {"type": "string"},
//!         "born": {"type": "string", "format": "date"}
//!     }
//! }"#;
//!
//! let mut set = SchemaSet::new();
//! assert!(set.load(&[SourceText::new(schema, "patient.json")]).unwrap());
//!
//! let table = set.table_data().unwrap();
//! assert_eq!(table.title, "Patient");
//! assert_eq!(table.properties.len(), 2);
//! assert!(table.properties[0].required);
//! assert_eq!(set.keyword_usage_stats()[0].keyword, "format");
//! ```
//!
//! ## Modules
//!
//! - [`data`] - Documents, rows and the table model
//! - [`resolver`] - Schema registry and `$ref` resolution
//! - [`extract`] - Flattening schema nodes into rows
//! - [`keyword`] - Keyword classification policy
//! - [`stats`] - Keyword usage statistics
//! - [`session`] - Loading schema sets and assembling tables
//! - [`export`] - Column model and renderers
//! - [`error`] - Error types and result definitions

#[macro_use]
extern crate log;

/// Documents, rows and the table model.
pub mod data;

/// Error types and result definitions.
pub mod error;

/// Column model and renderers.
pub mod export;

/// Flattening schema nodes into rows.
pub mod extract;

/// Keyword classification policy.
pub mod keyword;

/// Schema registry and `$ref` resolution.
pub mod resolver;

/// Loading schema sets and assembling tables.
pub mod session;

/// Keyword usage statistics.
pub mod stats;

pub use data::{PropertyRow, SchemaDocument, SourceText, TableModel};
pub use error::{DictError, Result};
pub use export::Column;
pub use serde_json::Value;
pub use session::{SchemaSet, TableKind};
pub use stats::KeywordUsageStat;
