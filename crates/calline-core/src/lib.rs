//! RFC 5545 content-line reader.
//!
//! Undoes line folding on a byte stream and splits each logical line into a
//! [`Field`]: a name, its parameters, and the raw value text. Pure
//! synchronous; no knowledge of calendar components or value types.
//!
//! # Quick start
//!
//! ```no_run
//! let ics = "BEGIN:VEVENT\r\nSUMMARY;LANGUAGE=en:Team\r\n  sync\r\nEND:VEVENT\r\n";
//! for field in calline_core::fields(ics.as_bytes()) {
//!   let field = field.unwrap();
//!   println!("{} = {:?}", field.name, field.value);
//! }
//! ```
//!
//! Lines may end in CRLF or, by default, a bare LF; see [`LineEndings`].

pub mod error;
mod field;
mod fields;
mod lines;
mod options;
mod parse;

use std::io::{BufReader, Read};

pub use error::{Error, ParseError, Result};
pub use field::{Field, Params};
pub use fields::Fields;
pub use lines::{LineReader, RawLine};
pub use options::{LineEndings, ReaderOptions};
pub use parse::parse_field;

/// Read fields from `src` with default options.
pub fn fields<R: Read>(src: R) -> Fields<BufReader<R>> {
  fields_with(src, ReaderOptions::default())
}

pub fn fields_with<R: Read>(
  src: R,
  options: ReaderOptions,
) -> Fields<BufReader<R>> {
  Fields::with_options(BufReader::new(src), options)
}

#[cfg(test)]
mod tests;
