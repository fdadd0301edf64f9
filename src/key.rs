//! Derived keys identify a diff item by location.

use std::fmt;

use crate::export::{DiffDetail, DiffKind};

const SEPARATOR: char = '/';

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DerivedKey(String);

impl DerivedKey {
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for DerivedKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Computes the key for one diff detail.
///
/// Array changes are keyed by `path/index`, every other kind by `path` alone.
pub fn derive(detail: &DiffDetail) -> DerivedKey {
  match &detail.kind {
    DiffKind::Array(index) => DerivedKey(format!("{}{SEPARATOR}{index}", detail.path)),
    _ => DerivedKey(detail.path.clone())
  }
}
