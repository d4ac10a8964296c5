//! Loading schema text from local files and URLs.
//!
//! All sources of one invocation are read concurrently; results are handed
//! on in command-line order so section order follows the order given.

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, bail};
use futures::future::join_all;
use schemadict::SourceText;

/// A place to read one schema document from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Local file.
    Path(PathBuf),
    /// `http://` or `https://` URL.
    Url(String),
}

impl Source {
    /// Classify a command-line argument.
    pub fn parse(arg: &str) -> Self {
        if arg.starts_with("http://") || arg.starts_with("https://") {
            Source::Url(arg.to_string())
        } else {
            Source::Path(PathBuf::from(arg))
        }
    }

    /// Name handed to the schema set; reference matching relies on it.
    pub fn name(&self) -> String {
        match self {
            Source::Path(path) => path.display().to_string(),
            Source::Url(url) => url.clone(),
        }
    }

    async fn read(&self, client: &reqwest::Client) -> anyhow::Result<String> {
        match self {
            Source::Path(path) => tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display())),
            Source::Url(url) => fetch(client, url).await,
        }
    }
}

/// Convert a GitHub URL to its raw content URL.
///
/// - `https://github.com/user/repo/blob/branch/path/file` becomes
///   `https://raw.githubusercontent.com/user/repo/branch/path/file`
/// - raw URLs and other hosts are returned unchanged
pub fn convert_to_raw_url(url: &str) -> String {
    if url.contains("raw.githubusercontent.com") || url.contains("raw.github.com") {
        return url.to_string();
    }

    if url.contains("://github.com/") && url.contains("/blob/") {
        let converted = url
            .replacen("://github.com/", "://raw.githubusercontent.com/", 1)
            .replacen("/blob/", "/", 1);
        debug!("converting GitHub URL to raw: {url} -> {converted}");
        return converted;
    }

    url.to_string()
}

async fn fetch(client: &reqwest::Client, url: &str) -> anyhow::Result<String> {
    let download_url = convert_to_raw_url(url);
    info!("fetching schema from {download_url}");

    let mut request = client.get(&download_url);
    if download_url.contains("github.com") || download_url.contains("githubusercontent.com") {
        // GitHub rejects requests without a User-Agent
        request = request.header("User-Agent", "dictool-schema-loader");
    }

    let response = request
        .send()
        .await
        .with_context(|| format!("Failed to download {url}"))?;

    if !response.status().is_success() {
        bail!("HTTP error {}: {url}", response.status());
    }

    response
        .text()
        .await
        .with_context(|| format!("Failed to read response body from {url}"))
}

/// Read every source, concurrently, preserving argument order.
///
/// # Errors
///
/// Fails when any source cannot be read; all failures are reported together.
pub async fn load_sources(args: &[String], timeout: Duration) -> anyhow::Result<Vec<SourceText>> {
    let sources: Vec<Source> = args.iter().map(|a| Source::parse(a)).collect();

    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .context("Failed to create HTTP client")?;

    let results = join_all(sources.iter().map(|s| s.read(&client))).await;

    let mut texts = Vec::with_capacity(sources.len());
    let mut failures = Vec::new();
    for (source, result) in sources.iter().zip(results) {
        match result {
            Ok(text) => texts.push(SourceText::new(text, source.name())),
            Err(e) => failures.push(format!("{e:#}")),
        }
    }

    if !failures.is_empty() {
        bail!(
            "failed to load {} of {} sources:\n  {}",
            failures.len(),
            sources.len(),
            failures.join("\n  ")
        );
    }
    Ok(texts)
}
