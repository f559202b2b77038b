//! Error types for the calline-core content-line reader.

use thiserror::Error;

/// Why a single logical line could not be parsed into a
/// [`Field`](crate::Field).
///
/// Offsets are byte positions into the unfolded logical line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
  #[error("content line has no name")]
  EmptyName,

  #[error(
    "invalid byte {byte:#04x} in name at offset {offset} (must be \
     alphanumeric or '-')"
  )]
  InvalidNameChar { byte: u8, offset: usize },

  #[error("unexpected end of input while reading parameter at offset {offset}")]
  UnexpectedEnd { offset: usize },

  #[error("empty parameter name at offset {offset}")]
  EmptyParamName { offset: usize },

  #[error("expected '=' after parameter name, found {byte:#04x} at offset {offset}")]
  MissingParamEquals { byte: u8, offset: usize },

  #[error("illegal byte {byte:#04x} in parameter value at offset {offset}")]
  InvalidParamChar { byte: u8, offset: usize },

  #[error("quoted parameter value starting at offset {offset} is not terminated")]
  UnterminatedQuote { offset: usize },

  #[error("illegal byte {byte:#04x} in quoted parameter value at offset {offset}")]
  InvalidQuotedChar { byte: u8, offset: usize },

  #[error("content line has no value (expected ':' at offset {offset})")]
  MissingValue { offset: usize },

  #[error("invalid UTF-8 at offset {offset}")]
  InvalidUtf8 { offset: usize },
}

/// Errors surfaced while reading content lines from a byte stream.
#[derive(Debug, Error)]
pub enum Error {
  /// The underlying reader failed. Fatal for the whole sequence.
  #[error("read error: {0}")]
  Io(#[from] std::io::Error),

  /// The sequence was advanced after a fatal read error.
  #[error("reader already failed; no further lines can be read")]
  Poisoned,

  #[error("line {line}: CR not followed by LF at offset {offset}")]
  BareCarriageReturn { line: usize, offset: usize },

  #[error("line {line}: LF inside content line at offset {offset}")]
  StrayLineFeed { line: usize, offset: usize },

  /// Only reported under [`LineEndings::Strict`](crate::LineEndings).
  #[error("line {line}: physical line terminated by bare LF")]
  BareLineFeed { line: usize },

  #[error("line {line}: {source}")]
  Parse {
    line:   usize,
    #[source]
    source: ParseError,
  },
}

impl Error {
  /// Whether the error ends the sequence for good.
  ///
  /// Non-fatal errors reject one logical line; the next call moves on to the
  /// following line.
  pub fn is_fatal(&self) -> bool { matches!(self, Self::Io(_) | Self::Poisoned) }

  /// The 1-based physical line the error points at, if any.
  pub fn line(&self) -> Option<usize> {
    match self {
      Self::Io(_) | Self::Poisoned => None,
      Self::BareCarriageReturn { line, .. }
      | Self::StrayLineFeed { line, .. }
      | Self::BareLineFeed { line }
      | Self::Parse { line, .. } => Some(*line),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
