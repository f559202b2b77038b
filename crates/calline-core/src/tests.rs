//! End-to-end tests: byte stream in, fields out.

use std::io::{self, BufReader, Read};

use crate::{
  Error, Field, Fields, LineEndings, ParseError, ReaderOptions, fields,
  fields_with,
};

fn field(name: &str, params: Vec<(&str, Vec<&str>)>, value: &str) -> Field {
  Field {
    name:   name.to_string(),
    params: params
      .into_iter()
      .map(|(k, vs)| (k, vs.into_iter().map(String::from).collect::<Vec<_>>()))
      .collect(),
    value:  value.to_string(),
  }
}

fn parse_all(input: &str) -> Vec<Result<Field, Error>> {
  fields(input.as_bytes()).collect()
}

// ─── Happy path ──────────────────────────────────────────────────────────────

#[test]
fn empty_input_yields_nothing() {
  assert!(parse_all("").is_empty());
}

#[test]
fn folded_description_keeps_literal_space() {
  let got: Vec<Field> = fields(&b"DESCRIPTION:This\r\n  is a long\r\n"[..])
    .collect::<Result<_, _>>()
    .unwrap();
  assert_eq!(got, [field("DESCRIPTION", vec![], "This is a long")]);
}

#[test]
fn small_event() {
  let ics = "BEGIN:VEVENT\r\n\
             UID:19970610T172345Z-AF23B2@example.com\r\n\
             DTSTART;TZID=America/New_York:19970714T170000\r\n\
             ATTENDEE;RSVP=TRUE;ROLE=REQ-PARTICIPANT:MAILTO:jsmith@host.com\r\n\
             SUMMARY:Bastille Day \r\n Party\r\n\
             END:VEVENT\r\n";
  let got: Vec<Field> = fields(ics.as_bytes())
    .collect::<Result<_, _>>()
    .unwrap();
  assert_eq!(got, [
    field("BEGIN", vec![], "VEVENT"),
    field("UID", vec![], "19970610T172345Z-AF23B2@example.com"),
    field("DTSTART", vec![("TZID", vec!["America/New_York"])], "19970714T170000"),
    field(
      "ATTENDEE",
      vec![("RSVP", vec!["TRUE"]), ("ROLE", vec!["REQ-PARTICIPANT"])],
      "MAILTO:jsmith@host.com"
    ),
    field("SUMMARY", vec![], "Bastille Day Party"),
    field("END", vec![], "VEVENT"),
  ]);
}

#[test]
fn folded_quoted_parameter() {
  let ics = "ATTENDEE;DELEGATED-TO=\"mailto:a@x\",\r\n \"mailto:b@x\":mailto:c@x";
  let got = parse_all(ics);
  assert_eq!(got.len(), 1);
  let got = got.into_iter().next().unwrap().unwrap();
  assert_eq!(
    got,
    field(
      "ATTENDEE",
      vec![("DELEGATED-TO", vec!["mailto:a@x", "mailto:b@x"])],
      "mailto:c@x"
    )
  );
}

#[test]
fn bare_lf_accepted_by_default() {
  let got: Vec<Field> = fields(&b"A:1\nB:2\n x\n"[..])
    .collect::<Result<_, _>>()
    .unwrap();
  assert_eq!(got, [field("A", vec![], "1"), field("B", vec![], "2x")]);
}

// ─── Errors ──────────────────────────────────────────────────────────────────

#[test]
fn bad_line_does_not_stop_the_stream() {
  let got = parse_all("A:1\r\n;VALUE=DATE:19970304\r\nB:2\r\n");
  assert_eq!(got.len(), 3);
  assert_eq!(got[0].as_ref().unwrap(), &field("A", vec![], "1"));
  assert!(matches!(got[1], Err(Error::Parse {
    line:   2,
    source: ParseError::EmptyName,
  })));
  assert_eq!(got[2].as_ref().unwrap(), &field("B", vec![], "2"));
}

#[test]
fn parse_errors_carry_first_physical_line() {
  let got = parse_all("A:1\r\nRDATE;VALUE=\r\n \"DATE:19970304\r\n");
  assert!(matches!(got[1], Err(Error::Parse {
    line:   2,
    source: ParseError::UnterminatedQuote { offset: 12 },
  })));
}

#[test]
fn missing_value_through_reader() {
  let got = parse_all("RDATE;VALUE=DATE\r\n");
  assert!(matches!(got[..], [Err(Error::Parse {
    source: ParseError::MissingValue { .. },
    ..
  })]));
}

#[test]
fn bare_cr_rejected_then_reader_continues() {
  let got = parse_all("SUMMARY:a\rb\r\nC:3\r\n");
  assert!(matches!(got[0], Err(Error::BareCarriageReturn {
    line:   1,
    offset: 9,
  })));
  assert_eq!(got[1].as_ref().unwrap(), &field("C", vec![], "3"));
}

#[test]
fn trailing_blank_line_is_an_empty_name() {
  let got = parse_all("A:1\r\n\r\n");
  assert_eq!(got.len(), 2);
  assert!(matches!(got[1], Err(Error::Parse {
    source: ParseError::EmptyName,
    ..
  })));
}

#[test]
fn each_trailing_blank_line_is_reported() {
  let got = parse_all("A:1\r\n\r\n\r\n");
  assert_eq!(got.len(), 3);
  assert_eq!(got[0].as_ref().unwrap(), &field("A", vec![], "1"));
  assert!(matches!(got[1], Err(Error::Parse {
    line:   2,
    source: ParseError::EmptyName,
  })));
  assert!(matches!(got[2], Err(Error::Parse {
    line:   3,
    source: ParseError::EmptyName,
  })));
}

#[test]
fn cr_ending_the_input_is_a_terminator() {
  let got: Vec<Field> = fields(&b"A:x\r"[..]).collect::<Result<_, _>>().unwrap();
  assert_eq!(got, [field("A", vec![], "x")]);
}

#[test]
fn strict_line_endings() {
  let opts = ReaderOptions {
    line_endings: LineEndings::Strict,
  };
  let got: Vec<_> = fields_with(&b"A:1\r\nB:2\nC:3"[..], opts).collect();
  assert_eq!(got.len(), 3);
  assert!(got[0].is_ok());
  assert!(matches!(got[1], Err(Error::BareLineFeed { line: 2 })));
  assert_eq!(got[2].as_ref().unwrap(), &field("C", vec![], "3"));
}

/// Hands out one byte per read, then fails.
struct Trickle {
  data: &'static [u8],
}

impl Read for Trickle {
  fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
    match self.data.split_first() {
      Some((&b, rest)) if !buf.is_empty() => {
        buf[0] = b;
        self.data = rest;
        Ok(1)
      }
      Some(_) => Ok(0),
      None => Err(io::Error::new(io::ErrorKind::ConnectionReset, "gone")),
    }
  }
}

#[test]
fn read_error_is_fatal() {
  let src = BufReader::new(Trickle {
    data: b"A:1\r\nB:2\r\n",
  });
  let mut it = Fields::new(src);
  assert_eq!(it.next().unwrap().unwrap(), field("A", vec![], "1"));

  let err = it.next().unwrap().unwrap_err();
  assert!(err.is_fatal());
  assert!(matches!(err, Error::Io(ref e) if e.kind() == io::ErrorKind::ConnectionReset));

  for _ in 0..3 {
    assert!(matches!(it.next(), Some(Err(Error::Poisoned))));
  }
}

#[test]
fn parsing_same_input_twice_is_identical() {
  let ics = "X-A;P=\"1\",2:v\r\nR_DATE:x\r\n";
  let first: Vec<String> =
    parse_all(ics).iter().map(|r| format!("{r:?}")).collect();
  let second: Vec<String> =
    parse_all(ics).iter().map(|r| format!("{r:?}")).collect();
  assert_eq!(first, second);
}
