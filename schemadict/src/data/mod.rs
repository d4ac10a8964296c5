//! Data structures shared by the extraction engine and renderers.
//!
//! - [`document`] - Parsed schema documents and raw inputs
//! - [`table`] - Flattened rows and the assembled table model

/// Parsed schema documents and raw inputs.
pub mod document;

/// Flattened rows and the table model.
pub mod table;

pub use document::{SchemaDocument, SourceText};
pub use table::{PropertyRow, TableModel};
