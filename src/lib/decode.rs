//! Key-to-comment decoding, the inverse of [`crate::encode`].

use std::borrow::Cow;

#[cfg(feature = "tracing")]
use tracing::{debug, trace};

use crate::line::{COMMENT_PREFIX, LineKind, SourceLine};

/// Any line whose key starts with this is treated as a synthetic comment entry.
const COMMENT_KEY_MARKER: &str = "_COMMENT";

/// Turns the synthetic entries of serialized YAML back into `#` comment lines.
///
/// A comment that directly follows a content line gets a blank line in front of it;
/// [`crate::layout::normalize`] decides later which of those separators survive.
pub fn decode(serialized: &str) -> String {
  #[cfg(feature = "tracing")]
  debug!("Decoding {} lines", serialized.lines().count());

  let mut output = String::with_capacity(serialized.len());
  let mut last_had_content = false;

  for line in serialized.lines() {
    match decode_comment(line) {
      Some(comment) => {
        #[cfg(feature = "tracing")]
        trace!("Decoded comment: {:?}", comment);

        if last_had_content {
          output.push('\n');
        }
        output.push_str(&comment);
        last_had_content = false;
      }
      None => {
        output.push_str(line);
        last_had_content = SourceLine::from(line).kind == LineKind::Content;
      }
    }
    output.push('\n');
  }

  output
}

/// Decodes one `_COMMENT_<n>: <scalar>` line, keeping its indentation.
///
/// Returns `None` for every other line.
pub fn decode_comment(line: &str) -> Option<String> {
  let line = SourceLine::from(line);
  if !line.rest().starts_with(COMMENT_KEY_MARKER) {
    return None;
  }

  let (_, scalar) = line.rest().split_once(':')?;
  let text = unquote(scalar.trim());

  // `#'foo` comes from the writer quoting a scalar that began with a quote
  let text = match text.strip_prefix('\'') {
    Some(quoted) => Cow::Owned(format!(" {}", quoted.strip_suffix('\'').unwrap_or(quoted))),
    None => text,
  };

  Some(format!("{}{}{}", line.indentation(), COMMENT_PREFIX, text))
}

/// Returns the text of a serialized scalar.
///
/// Single-quoted scalars are unescaped directly. Any other style the writer picked
/// is handed back to `serde_yaml`, falling back to the raw text.
fn unquote(scalar: &str) -> Cow<'_, str> {
  if let Some(inner) = scalar
    .strip_prefix('\'')
    .and_then(|rest| rest.strip_suffix('\''))
  {
    return if inner.contains("''") {
      Cow::Owned(inner.replace("''", "'"))
    } else {
      Cow::Borrowed(inner)
    };
  }

  match serde_yaml::from_str::<String>(scalar) {
    Ok(text) => Cow::Owned(text),
    Err(_) => Cow::Borrowed(scalar),
  }
}
