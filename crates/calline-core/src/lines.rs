//! Logical-line reconstruction (RFC 5545 §3.1 folding).
//!
//! Pipeline:
//!   BufRead
//!     └─ read_physical()  → one transport line, terminator stripped
//!          └─ LineReader   → RawLine (continuations gathered, CRLF-joined)
//!               └─ RawLine::unfold() → logical line bytes for the parser

use std::io::{self, BufRead};

use crate::{
  error::{Error, Result},
  options::{LineEndings, ReaderOptions},
};

// ─── Types ───────────────────────────────────────────────────────────────────

/// One logical line as gathered from the source, before unfolding.
///
/// `bytes` holds every physical line of the logical line, each terminated by
/// CRLF regardless of how it was terminated in the source: `"b\r\n c\r\n"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
  /// 1-based number of the first physical line.
  pub line:  usize,
  pub bytes: Vec<u8>,
}

impl RawLine {
  /// Remove fold markers (CRLF followed by SP or HTAB) and the final CRLF.
  ///
  /// Any CR or LF left over after that is illegal content.
  pub fn unfold(&self) -> Result<Vec<u8>> {
    let body = self.bytes.strip_suffix(b"\r\n").unwrap_or(&self.bytes);
    let mut out = Vec::with_capacity(body.len());
    let mut i = 0;
    while let Some(&c) = body.get(i) {
      match c {
        b'\r' => match (body.get(i + 1), body.get(i + 2)) {
          (Some(b'\n'), Some(b' ' | b'\t')) => i += 3,
          (Some(b'\n'), _) => {
            return Err(Error::StrayLineFeed {
              line:   self.line,
              offset: out.len(),
            });
          }
          _ => {
            return Err(Error::BareCarriageReturn {
              line:   self.line,
              offset: out.len(),
            });
          }
        },
        b'\n' => {
          return Err(Error::StrayLineFeed {
            line:   self.line,
            offset: out.len(),
          });
        }
        _ => {
          out.push(c);
          i += 1;
        }
      }
    }
    Ok(out)
  }
}

/// One transport line with its terminator removed.
#[derive(Debug)]
struct Physical {
  bytes:   Vec<u8>,
  number:  usize,
  bare_lf: bool,
}

impl Physical {
  fn is_continuation(&self) -> bool {
    matches!(self.bytes.first(), Some(b' ' | b'\t'))
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
  Reading,
  Exhausted,
  Failed,
}

// ─── LineReader ──────────────────────────────────────────────────────────────

/// Lazily splits a byte stream into [`RawLine`]s.
///
/// Yields `None` once the source is drained. After a read error every further
/// call yields [`Error::Poisoned`].
///
/// Every physical line that is not a continuation starts a logical line, so a
/// blank line (including trailing blank lines at the end of a file) is
/// yielded as an empty line and later fails to parse as a field.
#[derive(Debug)]
pub struct LineReader<R> {
  src:     R,
  options: ReaderOptions,
  state:   State,
  /// Line read ahead that starts the next logical line.
  pending: Option<Physical>,
  read:    usize,
}

impl<R: BufRead> LineReader<R> {
  pub fn new(src: R) -> Self { Self::with_options(src, ReaderOptions::default()) }

  pub fn with_options(src: R, options: ReaderOptions) -> Self {
    Self {
      src,
      options,
      state: State::Reading,
      pending: None,
      read: 0,
    }
  }

  /// Read one physical line. `None` when the source has no bytes left.
  ///
  /// A CR ending an unterminated last line counts as its terminator and is
  /// dropped, the same as before an LF.
  fn read_physical(&mut self) -> io::Result<Option<Physical>> {
    let mut bytes = Vec::new();
    if self.src.read_until(b'\n', &mut bytes)? == 0 {
      return Ok(None);
    }
    self.read += 1;

    let mut bare_lf = false;
    if bytes.last() == Some(&b'\n') {
      bytes.pop();
      if bytes.last() == Some(&b'\r') {
        bytes.pop();
      } else {
        bare_lf = true;
      }
    } else if bytes.last() == Some(&b'\r') {
      bytes.pop();
    }

    Ok(Some(Physical {
      bytes,
      number: self.read,
      bare_lf,
    }))
  }

  /// Gather the next logical line. The inner `Result` carries per-line
  /// rejections; the outer one is a read failure.
  fn read_logical(&mut self) -> io::Result<Option<Result<RawLine>>> {
    let first = match self.pending.take() {
      Some(p) => p,
      None => match self.read_physical()? {
        Some(p) => p,
        None => return Ok(None),
      },
    };

    let line = first.number;
    let mut bare_lf_at = first.bare_lf.then_some(first.number);
    let mut bytes = first.bytes;
    bytes.extend_from_slice(b"\r\n");

    while let Some(next) = self.read_physical()? {
      if !next.is_continuation() {
        self.pending = Some(next);
        break;
      }
      if next.bare_lf && bare_lf_at.is_none() {
        bare_lf_at = Some(next.number);
      }
      bytes.extend_from_slice(&next.bytes);
      bytes.extend_from_slice(b"\r\n");
    }

    tracing::trace!(line, len = bytes.len(), "gathered logical line");

    if let (LineEndings::Strict, Some(at)) =
      (self.options.line_endings, bare_lf_at)
    {
      return Ok(Some(Err(Error::BareLineFeed { line: at })));
    }
    Ok(Some(Ok(RawLine { line, bytes })))
  }
}

impl<R: BufRead> Iterator for LineReader<R> {
  type Item = Result<RawLine>;

  fn next(&mut self) -> Option<Self::Item> {
    match self.state {
      State::Exhausted => return None,
      State::Failed => return Some(Err(Error::Poisoned)),
      State::Reading => {}
    }

    match self.read_logical() {
      Ok(Some(line)) => Some(line),
      Ok(None) => {
        self.state = State::Exhausted;
        None
      }
      Err(err) => {
        tracing::warn!(after_line = self.read, error = %err, "read failed");
        self.state = State::Failed;
        Some(Err(Error::Io(err)))
      }
    }
  }
}
