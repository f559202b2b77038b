//! The reader that drives both stages: gather, unfold, parse.

use std::io::BufRead;

use crate::{
  error::{Error, Result},
  field::Field,
  lines::{LineReader, RawLine},
  options::ReaderOptions,
  parse::parse_field,
};

/// Iterator of parsed [`Field`]s over a byte stream.
///
/// A rejected line yields one `Err` and the next call continues with the
/// following logical line, unless the error [is fatal](Error::is_fatal).
#[derive(Debug)]
pub struct Fields<R> {
  lines: LineReader<R>,
}

impl<R: BufRead> Fields<R> {
  pub fn new(src: R) -> Self { Self::with_options(src, ReaderOptions::default()) }

  pub fn with_options(src: R, options: ReaderOptions) -> Self {
    Self {
      lines: LineReader::with_options(src, options),
    }
  }
}

fn parse_raw(raw: &RawLine) -> Result<Field> {
  let logical = raw.unfold()?;
  parse_field(&logical).map_err(|source| Error::Parse {
    line: raw.line,
    source,
  })
}

impl<R: BufRead> Iterator for Fields<R> {
  type Item = Result<Field>;

  fn next(&mut self) -> Option<Self::Item> {
    let result = self.lines.next()?.and_then(|raw| parse_raw(&raw));
    match &result {
      Ok(field) => tracing::trace!(name = %field.name, "parsed field"),
      Err(err) if !err.is_fatal() => {
        tracing::debug!(line = ?err.line(), error = %err, "rejected content line");
      }
      Err(_) => {}
    }
    Some(result)
  }
}
