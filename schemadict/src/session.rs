//! Schema set management.
//!
//! A [`SchemaSet`] owns everything produced by one `load` call: the parsed
//! documents, the chosen main schema and the keyword usage stats. It is
//! either empty or loaded; a new `load` replaces the previous session
//! wholesale, it never merges into it.
//!
//! # Main schema selection
//!
//! 1. The last dataset wrapper (`type: array` with `items`) wins.
//! 2. Otherwise the first object schema (`type: object` or non-empty
//!    `properties`) seen before any wrapper.
//! 3. Otherwise the first document.
//!
//! # Table assembly
//!
//! | Case | When | Rows |
//! |------|------|------|
//! | Dataset | main schema is a wrapper | its (resolved) `items` |
//! | Combined | more than one non-wrapper document | every document, one section each |
//! | Single | otherwise | the main schema |

use std::collections::HashMap;

use crate::{
    data::{SchemaDocument, SourceText, TableModel, document::distinct_source_names},
    error::Result,
    extract::{extract, extract_in},
    resolver::SchemaRegistry,
    stats::{KeywordUsageStat, collect_keyword_usage},
};

/// Which assembly rule produced the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// Dataset wrapper around a row schema.
    Dataset,
    /// Several object schemas combined into sections.
    Combined,
    /// One object schema.
    Single,
}

/// A processing session over a set of schema documents.
#[derive(Debug, Clone, Default)]
pub struct SchemaSet {
    state: SessionState,
}

#[derive(Debug, Clone, Default)]
enum SessionState {
    #[default]
    Empty,
    Loaded(LoadedSet),
}

#[derive(Debug, Clone)]
struct LoadedSet {
    registry: SchemaRegistry,
    main: usize,
    keyword_stats: Vec<KeywordUsageStat>,
}

impl SchemaSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a batch of schema sources, replacing the current session.
    ///
    /// Returns `Ok(true)` when a main schema was identified and `Ok(false)`
    /// when none was (including an empty batch). The previous session is
    /// discarded before parsing starts, so a failed load leaves the set empty.
    ///
    /// # Errors
    ///
    /// Any source that is not a JSON object aborts the whole batch.
    pub fn load(&mut self, sources: &[SourceText]) -> Result<bool> {
        self.clear();

        let mut registry = SchemaRegistry::new();
        let mut array_candidate: Option<usize> = None;
        let mut object_candidate: Option<usize> = None;

        for source in sources {
            let doc = SchemaDocument::parse(source)?;
            let is_wrapper = doc.is_array_wrapper();
            let is_object = doc.is_object_candidate();
            let idx = registry.register(doc);

            if is_wrapper {
                if let Some(prev) = array_candidate {
                    warn!(
                        "multiple dataset schemas supplied; `{}` replaces `{}`",
                        source.name,
                        registry.documents()[prev].source_name
                    );
                }
                array_candidate = Some(idx);
            } else if is_object && array_candidate.is_none() && object_candidate.is_none() {
                object_candidate = Some(idx);
            }
        }

        let main = array_candidate
            .or(object_candidate)
            .or_else(|| (!registry.is_empty()).then_some(0));
        let Some(main) = main else {
            debug!("no main schema among {} documents", sources.len());
            return Ok(false);
        };

        let mut loaded = LoadedSet {
            registry,
            main,
            keyword_stats: Vec::new(),
        };
        let keyword_stats = collect_keyword_usage(&loaded.table().properties);
        loaded.keyword_stats = keyword_stats;

        info!(
            "loaded {} schema documents, main schema `{}` ({:?})",
            loaded.registry.len(),
            loaded.main_document().key,
            loaded.kind()
        );
        self.state = SessionState::Loaded(loaded);
        Ok(true)
    }

    /// Drop the current session.
    pub fn clear(&mut self) {
        self.state = SessionState::Empty;
    }

    /// Whether a main schema has been identified.
    pub fn is_loaded(&self) -> bool {
        matches!(self.state, SessionState::Loaded(_))
    }

    /// Assemble the data dictionary.
    ///
    /// Returns `None` while the set is empty. Repeated calls on the same
    /// session produce identical tables.
    pub fn table_data(&self) -> Option<TableModel<'_>> {
        self.loaded().map(LoadedSet::table)
    }

    /// Which assembly rule [`table_data`](Self::table_data) follows.
    pub fn table_kind(&self) -> Option<TableKind> {
        self.loaded().map(LoadedSet::kind)
    }

    /// Keyword usage over the current table's rows, most used first.
    pub fn keyword_usage_stats(&self) -> &[KeywordUsageStat] {
        self.loaded()
            .map(|l| l.keyword_stats.as_slice())
            .unwrap_or_default()
    }

    /// The document anchoring the table.
    pub fn main_schema(&self) -> Option<&SchemaDocument> {
        self.loaded().map(LoadedSet::main_document)
    }

    /// Loaded documents in upload order.
    pub fn documents(&self) -> &[SchemaDocument] {
        self.loaded()
            .map(|l| l.registry.documents())
            .unwrap_or_default()
    }

    fn loaded(&self) -> Option<&LoadedSet> {
        match &self.state {
            SessionState::Empty => None,
            SessionState::Loaded(loaded) => Some(loaded),
        }
    }
}

impl LoadedSet {
    fn main_document(&self) -> &SchemaDocument {
        &self.registry.documents()[self.main]
    }

    fn kind(&self) -> TableKind {
        if self.main_document().is_array_wrapper() {
            TableKind::Dataset
        } else if self.object_documents().len() > 1 {
            TableKind::Combined
        } else {
            TableKind::Single
        }
    }

    fn object_documents(&self) -> Vec<&SchemaDocument> {
        self.registry
            .documents()
            .iter()
            .filter(|doc| !doc.is_array_wrapper())
            .collect()
    }

    fn table(&self) -> TableModel<'_> {
        match self.kind() {
            TableKind::Dataset => self.dataset_table(),
            TableKind::Combined => self.combined_table(),
            TableKind::Single => {
                let main = &self.main_document().schema;
                TableModel::single(main, extract(&self.registry, main, None, false))
            }
        }
    }

    fn dataset_table(&self) -> TableModel<'_> {
        let wrapper = &self.main_document().schema;
        let items = &wrapper["items"];

        let row_schema = match items.get("$ref").and_then(|r| r.as_str()) {
            Some(reference) => {
                let resolved = self.registry.resolve_with_root(reference, wrapper, wrapper);
                if resolved.is_none() {
                    warn!("dataset items reference `{reference}` could not be resolved");
                }
                resolved
            }
            None => Some((items, wrapper)),
        };

        let rows = row_schema
            .map(|(schema, root)| extract_in(&self.registry, root, schema, None, false))
            .unwrap_or_default();
        TableModel::dataset(wrapper, row_schema.map(|(schema, _)| schema), rows)
    }

    fn combined_table(&self) -> TableModel<'_> {
        let documents = self.object_documents();

        let mut title_counts: HashMap<&str, usize> = HashMap::new();
        let mut titles: Vec<&str> = Vec::new();
        for title in documents.iter().filter_map(|doc| doc.title()) {
            let count = title_counts.entry(title).or_default();
            if *count == 0 {
                titles.push(title);
            }
            *count += 1;
        }

        // untitled and duplicate-title documents are labelled by source name
        let unique_titles: Vec<Option<&str>> = documents
            .iter()
            .map(|doc| doc.title().filter(|title| title_counts[title] == 1))
            .collect();
        let unlabelled: Vec<&str> = documents
            .iter()
            .zip(&unique_titles)
            .filter(|(_, title)| title.is_none())
            .map(|(doc, _)| doc.source_name.as_str())
            .collect();
        let mut source_names = distinct_source_names(&unlabelled).into_iter();

        let mut rows = Vec::new();
        for (doc, title) in documents.iter().zip(&unique_titles) {
            let category = match title {
                Some(title) => title.to_string(),
                None => source_names.next().unwrap_or_default(),
            };
            debug!("combining `{}` as section `{category}`", doc.source_name);
            rows.extend(extract(&self.registry, &doc.schema, Some(&category), true));
        }

        TableModel::combined(&titles, documents.len(), rows)
    }
}
