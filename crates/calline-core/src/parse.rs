//! Content-line field parser (RFC 5545 §3.1).
//!
//! Grammar, in one left-to-right pass over the unfolded line:
//!
//! ```text
//! contentline = name *(";" param) ":" value
//! param       = param-name "=" param-value *("," param-value)
//! param-value = quoted / unquoted
//! ```
//!
//! Works on bytes because the grammar is defined over ASCII; text outside the
//! structural bytes is only decoded as UTF-8 once a piece is complete.

use crate::{
  error::ParseError,
  field::{Field, Params},
};

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Read position over one logical line.
struct Cursor<'a> {
  input: &'a [u8],
  pos:   usize,
}

impl<'a> Cursor<'a> {
  fn new(input: &'a [u8]) -> Self { Self { input, pos: 0 } }

  fn peek(&self) -> Option<u8> { self.input.get(self.pos).copied() }

  fn at(&self, offset: usize) -> Option<u8> {
    self.input.get(self.pos + offset).copied()
  }

  fn bump(&mut self) { self.pos += 1; }

  fn is_empty(&self) -> bool { self.pos >= self.input.len() }

  /// Advance while `keep` holds and return the bytes passed over.
  fn take_while(&mut self, mut keep: impl FnMut(u8) -> bool) -> &'a [u8] {
    let input = self.input;
    let start = self.pos;
    while self.peek().is_some_and(&mut keep) {
      self.bump();
    }
    &input[start..self.pos]
  }

  fn rest(&mut self) -> &'a [u8] {
    let input = self.input;
    let rest = &input[self.pos..];
    self.pos = self.input.len();
    rest
  }
}

// ─── Byte classes ────────────────────────────────────────────────────────────

fn is_name_byte(c: u8) -> bool { c.is_ascii_alphanumeric() || c == b'-' }

/// Control bytes, including HTAB, are never allowed in parameter values.
fn is_control(c: u8) -> bool { c < b' ' || c == 0x7f }

fn decode(bytes: &[u8], start: usize) -> Result<String, ParseError> {
  String::from_utf8(bytes.to_vec()).map_err(|e| ParseError::InvalidUtf8 {
    offset: start + e.utf8_error().valid_up_to(),
  })
}

// ─── Grammar ─────────────────────────────────────────────────────────────────

/// Outcome of looking for one more parameter.
enum Step {
  Param(String, Vec<String>),
  Done,
}

/// Parse one logical line (no trailing CRLF, no folds) into a [`Field`].
pub fn parse_field(line: &[u8]) -> Result<Field, ParseError> {
  let mut cur = Cursor::new(line);

  let name = read_name(&mut cur)?;
  if name.is_empty() {
    return Err(ParseError::EmptyName);
  }

  let mut params = Params::new();
  while let Step::Param(key, values) = read_param(&mut cur)? {
    params.insert(key, values);
  }

  match cur.peek() {
    Some(b':') => cur.bump(),
    _ => return Err(ParseError::MissingValue { offset: cur.pos }),
  }
  let start = cur.pos;
  let value = decode(cur.rest(), start)?;

  Ok(Field {
    name,
    params,
    value,
  })
}

/// Read a token up to `:`, `;`, `=` or the end of the line.
fn read_name(cur: &mut Cursor<'_>) -> Result<String, ParseError> {
  let name = cur.take_while(is_name_byte);
  match cur.peek() {
    None | Some(b':' | b';' | b'=') => {}
    Some(byte) => {
      return Err(ParseError::InvalidNameChar {
        byte,
        offset: cur.pos,
      });
    }
  }
  // Name bytes are ASCII.
  Ok(name.iter().map(|&b| b as char).collect())
}

fn read_param(cur: &mut Cursor<'_>) -> Result<Step, ParseError> {
  if cur.peek() != Some(b';') {
    return Ok(Step::Done);
  }
  cur.bump();

  let key_at = cur.pos;
  let key = read_name(cur)?;
  if key.is_empty() {
    return Err(ParseError::EmptyParamName { offset: key_at });
  }
  match cur.peek() {
    None => return Err(ParseError::UnexpectedEnd { offset: cur.pos }),
    Some(b'=') => cur.bump(),
    Some(byte) => {
      return Err(ParseError::MissingParamEquals {
        byte,
        offset: cur.pos,
      });
    }
  }

  let mut values = Vec::new();
  while !cur.is_empty() {
    let value = if cur.peek() == Some(b'"') {
      read_quoted(cur)?
    } else {
      read_unquoted(cur)?
    };
    values.push(value);

    if cur.peek() == Some(b',') {
      cur.bump();
    } else {
      break;
    }
  }

  Ok(Step::Param(key, values))
}

fn read_unquoted(cur: &mut Cursor<'_>) -> Result<String, ParseError> {
  let start = cur.pos;
  let raw = cur.take_while(|c| !matches!(c, b',' | b';' | b':'));
  if let Some(i) = raw.iter().position(|&c| is_control(c) || c == b'"') {
    return Err(ParseError::InvalidParamChar {
      byte:   raw[i],
      offset: start + i,
    });
  }
  decode(raw, start)
}

/// Read `"..."`, leaving the cursor just past the closing quote.
fn read_quoted(cur: &mut Cursor<'_>) -> Result<String, ParseError> {
  let open = cur.pos;
  if cur.at(1).is_none() {
    return Err(ParseError::UnterminatedQuote { offset: open });
  }
  cur.bump();

  let start = cur.pos;
  let raw = cur.take_while(|c| c != b'"');
  if let Some(i) = raw.iter().position(|&c| is_control(c)) {
    return Err(ParseError::InvalidQuotedChar {
      byte:   raw[i],
      offset: start + i,
    });
  }
  if cur.is_empty() {
    return Err(ParseError::UnterminatedQuote { offset: open });
  }
  cur.bump();
  decode(raw, start)
}
