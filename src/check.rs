//! Uniqueness check over the derived keys of an export.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::path::Path;

use anyhow::Result;

use crate::error::{Duplicate, DuplicateKeys};
use crate::export::{self, DiffItem};
use crate::key::{self, DerivedKey};
use crate::profile;

/// Outcome of a successful check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
  pub unique: usize
}

impl fmt::Display for Report {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} unique paths", self.unique)
  }
}

/// Occurrences of each derived key, in first-seen order.
#[derive(Debug, Default)]
pub struct KeyCounts {
  positions: HashMap<DerivedKey, usize>,
  entries:   Vec<(DerivedKey, Vec<String>)>
}

impl KeyCounts {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add(&mut self, item: &DiffItem) {
    match self.positions.entry(key::derive(&item.diff)) {
      Entry::Occupied(entry) => self.entries[*entry.get()].1.push(item.describe()),
      Entry::Vacant(entry) => {
        self.entries.push((entry.key().clone(), vec![item.describe()]));
        entry.insert(self.entries.len() - 1);
      }
    }
  }

  /// Number of distinct keys seen so far.
  pub fn unique(&self) -> usize {
    self.entries.len()
  }

  pub fn duplicates(&self) -> Vec<Duplicate> {
    self
      .entries
      .iter()
      .filter(|(_, occurrences)| occurrences.len() > 1)
      .map(|(key, occurrences)| Duplicate { key: key.to_string(), occurrences: occurrences.clone() })
      .collect()
  }
}

impl<'a> FromIterator<&'a DiffItem> for KeyCounts {
  fn from_iter<I: IntoIterator<Item = &'a DiffItem>>(items: I) -> Self {
    let mut counts = Self::new();
    for item in items {
      counts.add(item);
    }
    counts
  }
}

/// Verifies that every item derives a distinct key.
///
/// # Arguments
/// * `items` - The flattened items of an export
///
/// # Returns
/// * `Result<Report, DuplicateKeys>` - The number of distinct keys, or every key
///   that occurs more than once
pub fn check_unique<'a>(items: impl IntoIterator<Item = &'a DiffItem>) -> Result<Report, DuplicateKeys> {
  let counts: KeyCounts = items.into_iter().collect();
  log::debug!("Derived {} distinct keys", counts.unique());

  let duplicates = counts.duplicates();
  if !duplicates.is_empty() {
    return Err(DuplicateKeys { duplicates });
  }

  Ok(Report { unique: counts.unique() })
}

/// Loads the export at `path` and checks it.
pub fn check_file(path: &Path) -> Result<Report> {
  let export = {
    profile!("Load diff export");
    export::load(path)?
  };
  log::debug!("Loaded {} items from {}", export.len(), path.display());

  profile!("Check derived keys", export.len());
  Ok(check_unique(export.items())?)
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::export::DiffExport;

  fn export(value: serde_json::Value) -> DiffExport {
    DiffExport::from_value(value).unwrap()
  }

  #[test]
  fn test_report_format() {
    assert_eq!(Report { unique: 2 }.to_string(), "2 unique paths");
    assert_eq!(Report { unique: 0 }.to_string(), "0 unique paths");
  }

  #[test]
  fn test_counts_keep_first_seen_order() {
    let export = export(json!([
      { "diff": { "kind": "E", "path": "b" } },
      { "diff": { "kind": "E", "path": "a" } },
      { "diff": { "kind": "E", "path": "b" } },
      { "diff": { "kind": "N", "path": "a" } }
    ]));
    let counts: KeyCounts = export.items().collect();
    let duplicates = counts.duplicates();

    assert_eq!(counts.unique(), 2);
    assert_eq!(duplicates[0].key, "b");
    assert_eq!(duplicates[0].occurrences, ["$[0]", "$[2]"]);
    assert_eq!(duplicates[1].key, "a");
    assert_eq!(duplicates[1].occurrences, ["$[1]", "$[3]"]);
  }

  #[test]
  fn test_duplicates_name_the_producing_rule() {
    let export = export(json!({
      "x-enum-added": { "items": [{ "diff": { "kind": "E", "path": "a" } }] },
      "other": { "items": [{ "ruleName": "x-ms-enum", "diff": { "kind": "E", "path": "a" } }] }
    }));
    let duplicates = export.items().collect::<KeyCounts>().duplicates();

    assert_eq!(duplicates[0].occurrences, [
      r#"$["x-enum-added"].items[0] (x-enum-added)"#,
      r#"$["other"].items[0] (x-ms-enum)"#
    ]);
  }

  #[test]
  fn test_empty_export_has_no_keys() {
    assert_eq!(check_unique(export(json!([])).items()), Ok(Report { unique: 0 }));
  }

  #[test]
  fn test_same_path_different_index_is_unique() {
    let export = export(json!([
      { "diff": { "kind": "A", "path": "a/b", "index": 0 } },
      { "diff": { "kind": "A", "path": "a/b", "index": 1 } },
      { "diff": { "kind": "E", "path": "a/b" } }
    ]));
    assert_eq!(check_unique(export.items()), Ok(Report { unique: 3 }));
  }

  #[test]
  fn test_same_path_same_index_is_duplicate() {
    let export = export(json!([
      { "diff": { "kind": "A", "path": "a/b", "index": 0 } },
      { "diff": { "kind": "A", "path": "a/b", "index": 0 } }
    ]));
    let error = check_unique(export.items()).unwrap_err();

    assert_eq!(error.duplicates.len(), 1);
    assert_eq!(error.duplicates[0].key, "a/b/0");
    assert_eq!(error.duplicates[0].count(), 2);
  }

  #[test]
  fn test_kind_does_not_disambiguate() {
    let export = export(json!([
      { "diff": { "kind": "N", "path": "x" } },
      { "diff": { "kind": "D", "path": "x" } }
    ]));
    assert!(check_unique(export.items()).is_err());
  }
}
