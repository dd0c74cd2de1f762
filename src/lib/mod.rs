//! Comment-preserving YAML configuration files.
//!
//! `serde_yaml` throws comments away when it parses a document. This library keeps
//! them by rewriting every comment line into a synthetic `_COMMENT_<n>` entry before
//! parsing, and turning those entries back into comments when the document is saved.
//! Because the structural writer flattens all spacing, the save path also puts back a
//! readable blank-line layout.
//!
//! # Features
//!
//! - **Comment preservation**: comments survive load/save cycles at their original
//!   indentation and in their original order
//! - **Readable layout**: groups are separated by single blank lines on save, or not at
//!   all in compact mode
//! - **Atomic saves**: content goes through a temporary file that replaces the target
//! - **Optional tracing**: Detailed logging when the `tracing` feature is enabled
//!
//! # Example
//!
//! ```rust,no_run
//! use commented_config::file::{ConfigFileHelper, FormatOptions};
//! use std::path::PathBuf;
//!
//! let options = FormatOptions {
//!     path: PathBuf::from("config.yml"),
//!     compact: false,
//! };
//!
//! let document = ConfigFileHelper::format_with_options(options).unwrap();
//! println!("{} comments", document.comment_count());
//! ```

pub mod decode;
pub mod document;
pub mod encode;
pub mod file;
pub mod layout;
pub mod line;
