//! # dictool
//!
//! Command-line front-end for [`schemadict`]: reads JSON Schema files and
//! URLs, builds the data dictionary and prints it as a terminal table, CSV,
//! Markdown or JSON.
//!
//! ## Features
//!
//! - Local files and `http(s)` URLs, fetched concurrently with a timeout
//! - GitHub `blob` URLs rewritten to raw content URLs
//! - Column selection, with the most used schema keywords suggested as extra
//!   columns
//! - Optional `.dictool.toml` configuration file
//!
//! ## Modules
//!
//! - [`config`] - Configuration file types
//! - [`ctx`] - Application context and rendering
//! - [`source`] - Loading schema text from files and URLs

/// Configuration file types.
pub mod config;

/// Application context and state management.
pub mod ctx;

/// Loading schema text from files and URLs.
pub mod source;

#[macro_use]
extern crate log;
