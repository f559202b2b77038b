//! Reader configuration.

use serde::Deserialize;

/// Which physical line terminators are accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEndings {
  /// CRLF and bare LF both end a physical line.
  #[default]
  Lenient,
  /// Only CRLF ends a physical line; a bare LF rejects the logical line it
  /// belongs to with [`Error::BareLineFeed`](crate::Error::BareLineFeed).
  Strict,
}

/// Options for [`LineReader`](crate::LineReader) and
/// [`Fields`](crate::Fields).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReaderOptions {
  pub line_endings: LineEndings,
}

impl ReaderOptions {
  pub fn strict() -> Self {
    Self {
      line_endings: LineEndings::Strict,
    }
  }
}
