//! Application context and state management.
//!
//! [`AppContext`] holds the effective configuration and the loaded schema set
//! for one invocation, and knows how to render the result.

use std::{path::Path, time::Duration};

use anyhow::{Context, bail};
use colored::Colorize;
use schemadict::{
    Column, SchemaSet,
    export::{self, normalize_columns},
};

use crate::{
    config::{DictConfig, OutputFormat},
    source::load_sources,
};

/// The main application context holding all state.
#[derive(Debug, Default)]
pub struct AppContext {
    /// Effective configuration (file values with command-line overrides).
    pub config: DictConfig,
    /// Schemas loaded for this invocation.
    pub schemas: SchemaSet,
}

impl AppContext {
    pub fn new(config: DictConfig) -> Self {
        Self {
            config,
            schemas: SchemaSet::new(),
        }
    }

    /// Read all sources and load them as one schema set.
    ///
    /// # Errors
    ///
    /// Returns an error if any source cannot be read or parsed, or if none
    /// of them can anchor a table.
    pub async fn load(&mut self, sources: &[String]) -> anyhow::Result<()> {
        let timeout = Duration::from_secs(self.config.fetch_timeout_secs);
        let texts = load_sources(sources, timeout).await?;

        if !self.schemas.load(&texts)? {
            bail!(
                "no usable schema found: supply a `type: \"array\"` dataset schema \
                 or a `type: \"object\"` schema"
            );
        }

        if let Some(main) = self.schemas.main_schema() {
            eprintln!(
                "{}",
                format!(
                    "Loaded {} schema(s), main schema: {}",
                    self.schemas.documents().len(),
                    main.key
                )
                .bold()
                .purple()
            );
        }
        Ok(())
    }

    /// Columns to render: configured (or default) columns, then the most used
    /// free keywords as suggested, without duplicates.
    pub fn columns(&self) -> Vec<Column> {
        let mut columns = self.config.base_columns();
        columns.extend(Column::suggested(
            self.schemas.keyword_usage_stats(),
            self.config.suggested_columns,
        ));
        normalize_columns(columns)
    }

    /// Render the loaded table in the configured format.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is loaded or rendering fails.
    pub fn render(&self) -> anyhow::Result<String> {
        let Some(table) = self.schemas.table_data() else {
            bail!("no schema loaded");
        };
        let columns = self.columns();

        let mut buf = Vec::new();
        match self.config.format {
            OutputFormat::Table => {
                let mut text = format!("{}\n", table.title);
                if !table.description.is_empty() {
                    text.push_str(&format!("{}\n", table.description));
                }
                text.push('\n');
                text.push_str(&export::render_text(&table, &columns));
                return Ok(text);
            }
            OutputFormat::Csv => export::write_csv(&table, &columns, &mut buf)?,
            OutputFormat::Markdown => export::write_markdown(&table, &columns, &mut buf)?,
            OutputFormat::Json => {
                export::write_json(&table, self.schemas.keyword_usage_stats(), &mut buf)?
            }
        }
        Ok(String::from_utf8(buf)?)
    }

    /// Keyword usage stats as aligned `keyword  count` lines.
    pub fn render_stats(&self) -> String {
        let stats = self.schemas.keyword_usage_stats();
        let width = stats.iter().map(|s| s.keyword.len()).max().unwrap_or(0);
        stats
            .iter()
            .map(|s| format!("{:<width$}  {}\n", s.keyword, s.count))
            .collect()
    }

    /// Write `content` to the configured output file, or stdout.
    pub async fn emit(&self, content: &str) -> anyhow::Result<()> {
        match &self.config.output {
            Some(path) => {
                write_output(path, content).await?;
                eprintln!("{}", format!("Written to {}", path.display()).green());
            }
            None => print!("{content}"),
        }
        Ok(())
    }
}

async fn write_output(path: &Path, content: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn loaded(config: DictConfig, schemas: &[(&str, &str)]) -> AppContext {
        let dir = tempfile::tempdir().unwrap();
        let mut args = Vec::new();
        for (name, text) in schemas {
            let path = dir.path().join(name);
            std::fs::write(&path, text).unwrap();
            args.push(path.display().to_string());
        }
        let mut ctx = AppContext::new(config);
        ctx.load(&args).await.unwrap();
        ctx
    }

    const VISIT: &str = r#"{
        "title": "Visit",
        "type": "object",
        "properties": {
            "date": {"type": "string", "format": "date", "description": "Visit date"},
            "site": {"type": "string", "format": "uri", "default": "main"}
        }
    }"#;

    #[tokio::test]
    async fn test_suggested_columns() {
        let config = DictConfig {
            columns: vec!["name".to_string()],
            suggested_columns: 5,
            ..Default::default()
        };
        let ctx = loaded(config, &[("visit.json", VISIT)]).await;
        assert_eq!(
            ctx.columns(),
            vec![
                Column::Name,
                Column::Keyword("format".to_string()),
                Column::Keyword("default".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_render_csv() {
        let config = DictConfig {
            format: OutputFormat::Csv,
            columns: vec!["name".to_string(), "format".to_string()],
            ..Default::default()
        };
        let ctx = loaded(config, &[("visit.json", VISIT)]).await;
        assert_eq!(ctx.render().unwrap(), "Name,format\ndate,date\nsite,uri\n");
        assert_eq!(ctx.render_stats(), "format   2\ndefault  1\n");
    }

    #[tokio::test]
    async fn test_no_main_schema() {
        let mut ctx = AppContext::default();
        let err = ctx.load(&[]).await.unwrap_err();
        assert!(err.to_string().contains("no usable schema"));
        assert!(ctx.render().is_err());
    }
}
