//! Blank-line layout for decoded YAML.
//!
//! The structural writer emits one entry per line with no grouping at all. The layout
//! pass puts back the kind of spacing people write by hand:
//!
//! 1. **Spacing pass**: existing blank lines are dropped and the remaining lines are
//!    folded through a [`FormattingState`]. A blank line is inserted in front of a line
//!    whenever one of the [`SEPARATION_RULES`] fires.
//! 2. **Collapse pass**: whitespace-only lines are emptied and blank runs are capped at
//!    a single line.
//!
//! Since the output only depends on the non-blank lines of the input, normalizing twice
//! gives the same text as normalizing once.

#[cfg(feature = "tracing")]
use tracing::{debug, trace};

use crate::line::{LineKind, SourceLine};

/// Comments indented deeper than this after their `#` count as nested.
const NESTED_COMMENT_INDENT: usize = 3;

pub type SeparationRule = fn(&FormattingState, &SourceLine<'_>) -> bool;

/// Rules that ask for a blank line in front of the current line.
pub const SEPARATION_RULES: &[(&str, SeparationRule)] = &[
  ("indent-changed", indent_changed),
  ("comment-dedented", comment_dedented),
  ("consecutive-content", consecutive_content),
  ("comment-after-content", comment_after_content),
];

/// What the spacing pass remembers about the line it just emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormattingState {
  pub last_had_content: bool,
  pub last_indent: Option<usize>,
  pub last_comment_indent: Option<usize>,
  /// Set for list items; only holds for the line that set it.
  pub force_compact: bool,
}

impl FormattingState {
  /// State while looking at `line`.
  pub fn enter(self, line: &SourceLine<'_>) -> Self {
    FormattingState {
      force_compact: line.is_list_item(),
      ..self
    }
  }

  /// State handed to the line after `line`.
  pub fn leave(self, line: &SourceLine<'_>) -> Self {
    FormattingState {
      last_had_content: line.kind == LineKind::Content,
      last_indent: Some(line.indent),
      last_comment_indent: line.comment_indent(),
      force_compact: false,
    }
  }

  /// Whether a blank line goes in front of `line`.
  pub fn separates(&self, line: &SourceLine<'_>, compact: bool) -> bool {
    if compact || self.force_compact {
      return false;
    }

    // a value never gets split from the line that continues it
    if self.last_had_content && line.kind != LineKind::Comment {
      return false;
    }

    SEPARATION_RULES.iter().any(|(_name, rule)| {
      let fired = rule(self, line);

      #[cfg(feature = "tracing")]
      if fired {
        trace!(rule = _name, "Separating line: {:?}", line.text);
      }

      fired
    })
  }
}

fn indent_changed(state: &FormattingState, line: &SourceLine<'_>) -> bool {
  state.last_indent.is_some_and(|indent| indent != line.indent)
}

fn comment_dedented(state: &FormattingState, line: &SourceLine<'_>) -> bool {
  line
    .comment_indent()
    .is_some_and(|indent| indent <= NESTED_COMMENT_INDENT)
    && state
      .last_comment_indent
      .is_some_and(|indent| indent > NESTED_COMMENT_INDENT)
}

fn consecutive_content(state: &FormattingState, line: &SourceLine<'_>) -> bool {
  state.last_had_content && line.kind == LineKind::Content
}

fn comment_after_content(state: &FormattingState, line: &SourceLine<'_>) -> bool {
  state.last_had_content && line.kind == LineKind::Comment
}

/// Re-spaces `text` and caps blank runs at one line.
///
/// With `compact` set no separating blank lines are inserted at all.
pub fn normalize(text: &str, compact: bool) -> String {
  #[cfg(feature = "tracing")]
  debug!(compact, "Normalizing {} lines", text.lines().count());

  collapse(&space(text, compact))
}

fn space(text: &str, compact: bool) -> String {
  let (output, _) = text
    .lines()
    .map(SourceLine::from)
    .filter(|line| line.kind != LineKind::Blank)
    .fold(
      (String::with_capacity(text.len()), FormattingState::default()),
      |(mut output, state), line| {
        let state = state.enter(&line);
        if state.separates(&line, compact) {
          output.push('\n');
        }
        output.push_str(line.text);
        output.push('\n');
        (output, state.leave(&line))
      },
    );

  output
}

fn collapse(text: &str) -> String {
  let mut output = String::with_capacity(text.len());
  let mut blank_run = 0;

  for line in text.lines().map(SourceLine::from) {
    if line.kind == LineKind::Blank {
      blank_run += 1;
      if blank_run < 2 {
        output.push('\n');
      }
    } else {
      blank_run = 0;
      output.push_str(line.text);
      output.push('\n');
    }
  }

  output
}
