//! The parsed configuration document.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_yaml::{Mapping, Value};

#[cfg(feature = "tracing")]
use tracing::trace;

use crate::encode::{comment_index, synthetic_key};
use crate::file::ConfigError;

const KEY_SEPARATOR: char = '.';

/// A YAML document loaded through [`crate::file::ConfigFileHelper::load`].
///
/// Comments live in the tree as `_COMMENT_<n>` string entries, next to the keys they
/// were written above.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDocument {
  path: PathBuf,
  root: Value,
  comments: usize,
}

impl ConfigDocument {
  pub fn new(path: PathBuf, root: Value, comments: usize) -> Self {
    Self {
      path,
      root,
      comments,
    }
  }

  /// File this document was loaded from and is saved back to.
  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn root(&self) -> &Value {
    &self.root
  }

  /// Number of comments the document carries, including ones added since loading.
  pub fn comment_count(&self) -> usize {
    self.comments
  }

  /// Looks up a value by dot-separated path, e.g. `server.port`.
  pub fn get(&self, key: &str) -> Option<&Value> {
    key
      .split(KEY_SEPARATOR)
      .try_fold(&self.root, |node, part| node.get(part))
  }

  /// Stores `value` under a dot-separated path.
  ///
  /// Missing intermediate mappings are created; a non-mapping value in the way is
  /// replaced by a mapping.
  pub fn set<T: Serialize>(&mut self, key: &str, value: T) -> Result<(), ConfigError> {
    let value = serde_yaml::to_value(value).map_err(ConfigError::Serialize)?;

    #[cfg(feature = "tracing")]
    trace!(key, "Setting value");

    let (parents, leaf) = match key.rsplit_once(KEY_SEPARATOR) {
      Some((parents, leaf)) => (Some(parents), leaf),
      None => (None, key),
    };

    let mut node = &mut self.root;
    for part in parents.into_iter().flat_map(|parents| parents.split(KEY_SEPARATOR)) {
      node = mapping_mut(node)
        .entry(Value::from(part))
        .or_insert_with(|| Value::Mapping(Mapping::new()));
    }
    mapping_mut(node).insert(Value::from(leaf), value);

    Ok(())
  }

  /// Appends comment lines at the end of the top-level mapping.
  ///
  /// Each line is written out as `# <line>` on the next save.
  pub fn add_comments<I, S>(&mut self, lines: I)
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let root = mapping_mut(&mut self.root);

    for line in lines {
      let line = line.as_ref();
      let text = if line.is_empty() {
        String::new()
      } else {
        format!(" {line}")
      };

      root.insert(Value::from(synthetic_key(self.comments)), Value::from(text));
      self.comments += 1;
    }
  }

  /// Comment texts held in the tree, in index order, without their `#`.
  pub fn comments(&self) -> Vec<&str> {
    let mut found = Vec::new();
    collect_comments(&self.root, &mut found);
    found.sort_by_key(|(index, _)| *index);
    found.into_iter().map(|(_, text)| text).collect()
  }

  /// Serializes the tree, synthetic entries included.
  ///
  /// An empty document serializes to an empty string rather than `{}`.
  pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
    match &self.root {
      Value::Null => Ok(String::new()),
      Value::Mapping(map) if map.is_empty() => Ok(String::new()),
      root => serde_yaml::to_string(root).map_err(ConfigError::Serialize),
    }
  }
}

fn mapping_mut(node: &mut Value) -> &mut Mapping {
  match node {
    Value::Mapping(map) => map,
    other => {
      *other = Value::Mapping(Mapping::new());
      mapping_mut(other)
    }
  }
}

fn collect_comments<'a>(node: &'a Value, found: &mut Vec<(usize, &'a str)>) {
  match node {
    Value::Mapping(map) => {
      for (key, value) in map {
        match (key.as_str().and_then(comment_index), value.as_str()) {
          (Some(index), Some(text)) => found.push((index, text)),
          _ => collect_comments(value, found),
        }
      }
    }
    Value::Sequence(items) => items.iter().for_each(|item| collect_comments(item, found)),
    _ => {}
  }
}
