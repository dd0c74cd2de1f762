pub const COMMENT_PREFIX: &str = "#";
const LIST_ITEM_PREFIX: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
  Content,
  Comment,
  Blank,
}

/// A single line of text tagged with its kind and leading-whitespace width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'a> {
  pub text: &'a str,
  pub kind: LineKind,
  pub indent: usize,
}

impl<'a> From<&'a str> for SourceLine<'a> {
  fn from(text: &'a str) -> Self {
    let body = text.trim();

    let kind = if body.is_empty() {
      LineKind::Blank
    } else if body.starts_with(COMMENT_PREFIX) {
      LineKind::Comment
    } else {
      LineKind::Content
    };

    SourceLine {
      text,
      kind,
      indent: text.len() - text.trim_start().len(),
    }
  }
}

impl<'a> SourceLine<'a> {
  /// Leading whitespace, exactly as written.
  pub fn indentation(&self) -> &'a str {
    &self.text[..self.indent]
  }

  /// The line without its leading whitespace.
  pub fn rest(&self) -> &'a str {
    &self.text[self.indent..]
  }

  /// Text following the `#` of a comment line, untouched.
  pub fn comment_text(&self) -> Option<&'a str> {
    match self.kind {
      LineKind::Comment => self.rest().strip_prefix(COMMENT_PREFIX),
      _ => None,
    }
  }

  /// Width of the whitespace between `#` and the comment's first word.
  pub fn comment_indent(&self) -> Option<usize> {
    self
      .comment_text()
      .map(|text| text.trim_end())
      .map(|text| text.len() - text.trim_start().len())
  }

  pub fn is_list_item(&self) -> bool {
    self.kind == LineKind::Content && self.rest().starts_with(LIST_ITEM_PREFIX)
  }
}
