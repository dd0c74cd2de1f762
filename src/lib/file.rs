//! Loading and saving commented YAML files.
//!
//! # Load
//!
//! 1. Reject directories, create the parent directories and an empty file if needed
//! 2. Read the file and turn its comments into `_COMMENT_<n>` entries
//! 3. Parse the result with `serde_yaml` into a [`ConfigDocument`]
//!
//! # Save
//!
//! 1. Serialize the document with `serde_yaml`
//! 2. Turn the `_COMMENT_<n>` entries back into comments
//! 3. Re-space the text and write it through a temporary file that replaces the target,
//!    keeping the target's permissions and any symlink pointing at it
//!
//! Nothing coordinates two callers working on the same file at once; callers that
//! share a path have to serialize their access themselves.
//!
//! # Examples
//!
//! ```rust,no_run
//! use commented_config::file::ConfigFileHelper;
//!
//! let mut document = ConfigFileHelper::load("config.yml").unwrap();
//! document.set("server.port", 8080).unwrap();
//! ConfigFileHelper::save_document(&document, false).unwrap();
//! ```

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};

#[cfg(feature = "tracing")]
use tracing::{debug, info};

use crate::decode::decode;
use crate::document::ConfigDocument;
use crate::encode::{Encoded, count_comments, encode};
use crate::layout::normalize;

/// Entry point for reading and writing commented YAML files.
pub struct ConfigFileHelper;

impl ConfigFileHelper {
  /// Loads `path` into a [`ConfigDocument`].
  ///
  /// A missing file is created empty, together with its parent directories, and loads
  /// as an empty document with no comments.
  pub fn load<P: AsRef<Path>>(path: P) -> Result<ConfigDocument, ConfigError> {
    let path = path.as_ref();

    #[cfg(feature = "tracing")]
    debug!(?path, "Loading config");

    if path.is_dir() {
      return Err(ConfigError::IsDirectory(path.to_path_buf()));
    }

    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
      && !parent.exists()
    {
      #[cfg(feature = "tracing")]
      debug!(?parent, "Creating parent directories");
      fs::create_dir_all(parent).map_err(ConfigError::CreateParent)?;
    }

    if !path.exists() {
      #[cfg(feature = "tracing")]
      debug!(?path, "Creating empty config file");
      File::create(path).map_err(ConfigError::CreateFile)?;
    }

    let source = Self::read_source(path)?;
    let comments = count_comments(&source);
    let Encoded { text, .. } = encode(&source);

    let root = if text.trim().is_empty() {
      Value::Mapping(Mapping::new())
    } else {
      match serde_yaml::from_str::<Value>(&text).map_err(ConfigError::Parse)? {
        Value::Null => Value::Mapping(Mapping::new()),
        root => root,
      }
    };

    #[cfg(feature = "tracing")]
    info!(?path, comments, "Loaded config");

    Ok(ConfigDocument::new(path.to_path_buf(), root, comments))
  }

  /// Reads `path` and encodes its comments.
  ///
  /// A file that does not exist yields an empty result; any other read failure is an
  /// error.
  pub fn read_encoded<P: AsRef<Path>>(path: P) -> Result<Encoded, ConfigError> {
    Self::read_source(path).map(|source| encode(&source))
  }

  /// Reads `path`, treating a file that does not exist as empty.
  fn read_source<P: AsRef<Path>>(path: P) -> Result<String, ConfigError> {
    match fs::read_to_string(path) {
      Ok(source) => Ok(source),
      Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(String::new()),
      Err(err) => Err(ConfigError::Read(err)),
    }
  }

  /// Writes serializer output to `path` with its comments restored.
  ///
  /// `compact` disables the decorative blank lines between groups.
  pub fn save<P: AsRef<Path>>(serialized: &str, path: P, compact: bool) -> Result<(), ConfigError> {
    let path = path.as_ref();

    #[cfg(feature = "tracing")]
    debug!(?path, compact, "Saving config");

    let content = normalize(&decode(serialized), compact);
    write_atomic(path, &content).map_err(ConfigError::Write)?;

    #[cfg(feature = "tracing")]
    info!(?path, "Saved config");

    Ok(())
  }

  /// Serializes `document` and saves it back to the file it was loaded from.
  pub fn save_document(document: &ConfigDocument, compact: bool) -> Result<(), ConfigError> {
    let serialized = document.to_yaml_string()?;
    Self::save(&serialized, document.path(), compact)
  }

  /// Loads a file and saves it straight back, normalizing its layout in place.
  pub fn format_with_options(options: FormatOptions) -> Result<ConfigDocument, ConfigError> {
    let FormatOptions { path, compact } = options;

    let document = Self::load(&path)?;
    Self::save_document(&document, compact)?;

    Ok(document)
  }
}

/// Writes to a temporary sibling of `path`, then renames it over `path`.
///
/// An existing target is resolved through symlinks first and its permissions are
/// carried over, so the link and the file mode survive the save.
fn write_atomic(path: &Path, content: &str) -> io::Result<()> {
  let (target, permissions) = match fs::canonicalize(path) {
    Ok(target) => {
      let permissions = fs::metadata(&target)?.permissions();
      (target, Some(permissions))
    }
    Err(err) if err.kind() == io::ErrorKind::NotFound => (path.to_path_buf(), None),
    Err(err) => return Err(err),
  };

  let temp_name = format!(
    ".{}.{}.tmp",
    target
      .file_name()
      .map(|name| name.to_string_lossy())
      .unwrap_or_default(),
    std::process::id()
  );
  let temp_path = target.with_file_name(temp_name);

  let written = write_temp(&temp_path, content, permissions)
    .and_then(|()| fs::rename(&temp_path, &target));
  if written.is_err() {
    let _ = fs::remove_file(&temp_path);
  }

  written
}

fn write_temp(temp_path: &Path, content: &str, permissions: Option<fs::Permissions>) -> io::Result<()> {
  let mut file = File::create(temp_path)?;
  if let Some(permissions) = permissions {
    file.set_permissions(permissions)?;
  }
  file.write_all(content.as_bytes())?;
  file.sync_all()
}

/// Errors that can occur while loading or saving a config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// The path names a directory
  #[error("Cannot create configuration from directory: {}", .0.display())]
  IsDirectory(PathBuf),
  /// Error creating the parent directories of a new file
  #[error("Failed to create parent directories: {0}")]
  CreateParent(io::Error),
  /// Error creating a new empty file
  #[error("Failed to create config file: {0}")]
  CreateFile(io::Error),
  /// Error reading the config file
  #[error("Read error: {0}")]
  Read(io::Error),
  /// Error writing the config file
  #[error("Write error: {0}")]
  Write(io::Error),
  /// The encoded content is not valid YAML
  #[error("Parse error: {0}")]
  Parse(serde_yaml::Error),
  /// A value could not be serialized to YAML
  #[error("Serialize error: {0}")]
  Serialize(serde_yaml::Error),
}

/// Options for normalizing a config file in place.
pub struct FormatOptions {
  /// The config file to rewrite.
  pub path: PathBuf,
  /// Separate entries by single newlines only.
  pub compact: bool,
}
