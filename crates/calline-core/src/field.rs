//! The parsed form of one content line.

use std::{collections::BTreeMap, str::FromStr};

use serde::Serialize;

use crate::error::ParseError;

// ─── Field ───────────────────────────────────────────────────────────────────

/// One content line: `NAME;PARAM=VALUE[,VALUE...]...:VALUE`.
///
/// Names keep the case they were written in. `value` is the raw text after
/// the value separator; no unescaping is done here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Field {
  pub name:   String,
  pub params: Params,
  pub value:  String,
}

impl FromStr for Field {
  type Err = ParseError;

  /// Parse a single logical (already unfolded) line.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    crate::parse::parse_field(s.as_bytes())
  }
}

// ─── Params ──────────────────────────────────────────────────────────────────

/// Parameters of a [`Field`], keyed by exact parameter name.
///
/// Each key maps to its values in the order they were written. Inserting a
/// key that is already present replaces its values entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, Vec<String>>);

impl Params {
  pub fn new() -> Self { Self::default() }

  pub fn contains(&self, name: &str) -> bool { self.0.contains_key(name) }

  /// The values of `name`, in written order.
  pub fn get(&self, name: &str) -> Option<&[String]> {
    self.0.get(name).map(Vec::as_slice)
  }

  /// Set `name` to `values`, returning whatever it replaced.
  pub fn insert(
    &mut self,
    name: impl Into<String>,
    values: Vec<String>,
  ) -> Option<Vec<String>> {
    self.0.insert(name.into(), values)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
    self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
  }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl<'a> IntoIterator for &'a Params {
  type Item = (&'a String, &'a Vec<String>);
  type IntoIter = std::collections::btree_map::Iter<'a, String, Vec<String>>;

  fn into_iter(self) -> Self::IntoIter { self.0.iter() }
}

impl<K: Into<String>> FromIterator<(K, Vec<String>)> for Params {
  fn from_iter<I: IntoIterator<Item = (K, Vec<String>)>>(iter: I) -> Self {
    let mut params = Self::new();
    for (name, values) in iter {
      params.insert(name, values);
    }
    params
  }
}
