//! Comment-to-key encoding.
//!
//! `serde_yaml` drops comments, so before parsing every comment line is rewritten
//! into a synthetic scalar entry that the parser keeps like any other key:
//!
//! ```text
//! # Server settings          _COMMENT_0: ' Server settings'
//! server:              =>    server:
//!   # it's the port            _COMMENT_1: ' it''s the port'
//!   port: 8080                 port: 8080
//! ```
//!
//! Indices follow file order, so the serialized document lists the comments in the
//! same relative order they were read in.

#[cfg(feature = "tracing")]
use tracing::{debug, trace};

use crate::line::{LineKind, SourceLine};

/// Key prefix of a synthetic comment entry; the comment index follows it.
pub const COMMENT_KEY_PREFIX: &str = "_COMMENT_";

/// Parser-ready text together with the number of comments it carries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Encoded {
  pub text: String,
  pub comments: usize,
}

/// Rewrites every comment line of `source` into a `_COMMENT_<n>` entry.
///
/// Every other line passes through unchanged, and the output has exactly one line per
/// input line.
pub fn encode(source: &str) -> Encoded {
  #[cfg(feature = "tracing")]
  debug!("Encoding {} lines", source.lines().count());

  let mut encoded = Encoded {
    text: String::with_capacity(source.len()),
    comments: 0,
  };

  for line in source.lines().map(SourceLine::from) {
    match line.comment_text() {
      Some(comment) => {
        #[cfg(feature = "tracing")]
        trace!(index = encoded.comments, "Encoding comment: {:?}", comment);

        encoded.text.push_str(line.indentation());
        encoded.text.push_str(&synthetic_entry(encoded.comments, comment));
        encoded.comments += 1;
      }
      None => encoded.text.push_str(line.text),
    }
    encoded.text.push('\n');
  }

  #[cfg(feature = "tracing")]
  debug!("Encoded {} comments", encoded.comments);

  encoded
}

/// Number of comment lines in `source`, without encoding anything.
pub fn count_comments(source: &str) -> usize {
  source
    .lines()
    .map(SourceLine::from)
    .filter(|line| line.kind == LineKind::Comment)
    .count()
}

/// The key used for the comment with the given index.
pub fn synthetic_key(index: usize) -> String {
  format!("{COMMENT_KEY_PREFIX}{index}")
}

/// Parses the index back out of a synthetic key.
pub fn comment_index(key: &str) -> Option<usize> {
  key.strip_prefix(COMMENT_KEY_PREFIX)?.parse().ok()
}

fn synthetic_entry(index: usize, comment: &str) -> String {
  format!("{}: '{}'", synthetic_key(index), escape(comment))
}

/// Single-quoted scalars escape `'` by doubling it.
fn escape(comment: &str) -> String {
  comment.replace('\'', "''")
}
