//! Loading and normalizing diff exports.
//!
//! A diff export is written either as a flat array of items or, when the
//! producer groups violations by rule, as an object mapping each rule name to
//! `{ "count": n, "items": [...] }`. Both shapes are validated here and exposed
//! through [`DiffExport::items`] as one ordered sequence.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde_json::{Map, Number, Value};

use crate::error::{ExportError, SchemaError};

/// The top-level document, tagged by the shape it was written in.
#[derive(Debug, Clone, PartialEq)]
pub enum DiffExport {
  Flat(Vec<DiffItem>),
  Grouped(Vec<DiffGroup>)
}

/// One named group of a grouped export. The name is the rule that produced
/// its items.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffGroup {
  pub name:  String,
  pub items: Vec<DiffItem>
}

/// A single changed element.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffItem {
  /// Where the item sits in the document, e.g. `$["rule"].items[2]`.
  pub location:  String,
  /// The item's `ruleName`, or the name of its group when it has none.
  pub rule_name: Option<String>,
  pub diff:      DiffDetail
}

impl DiffItem {
  /// Location plus producing rule, e.g. `$[3] (x-ms-enum)`.
  pub fn describe(&self) -> String {
    match &self.rule_name {
      Some(rule) => format!("{} ({rule})", self.location),
      None => self.location.clone()
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiffDetail {
  pub kind: DiffKind,
  pub path: String
}

/// The `kind` tag of a diff detail.
///
/// Only [`DiffKind::Array`] changes how a key is derived, and it is the only
/// kind that carries an index.
#[derive(Debug, Clone, PartialEq)]
pub enum DiffKind {
  New,
  Deleted,
  Edited,
  Array(Index),
  Other(String)
}

impl DiffKind {
  pub const ARRAY_TAG: &'static str = "A";

  pub fn tag(&self) -> &str {
    match self {
      DiffKind::New => "N",
      DiffKind::Deleted => "D",
      DiffKind::Edited => "E",
      DiffKind::Array(_) => Self::ARRAY_TAG,
      DiffKind::Other(tag) => tag
    }
  }
}

impl fmt::Display for DiffKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.tag())
  }
}

/// Position of an array change, either numeric or textual.
#[derive(Debug, Clone, PartialEq)]
pub enum Index {
  Number(Number),
  Text(String)
}

impl fmt::Display for Index {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Index::Number(number) => write!(f, "{number}"),
      Index::Text(text) => f.write_str(text)
    }
  }
}

/// Reads and validates the export at `path`.
pub fn load(path: impl AsRef<Path>) -> Result<DiffExport, ExportError> {
  let path = path.as_ref();
  log::debug!("Reading diff export from {}", path.display());

  let contents = fs::read_to_string(path).map_err(|source| ExportError::Io { path: path.to_path_buf(), source })?;
  contents.parse()
}

impl FromStr for DiffExport {
  type Err = ExportError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let value: Value = serde_json::from_str(s)?;
    Ok(Self::from_value(value)?)
  }
}

impl DiffExport {
  /// Validates an already parsed JSON document.
  pub fn from_value(value: Value) -> Result<Self, SchemaError> {
    match value {
      Value::Array(items) => {
        log::debug!("Diff export is a flat list of {} items", items.len());
        parse_items(items, "$").map(DiffExport::Flat)
      },
      Value::Object(groups) => {
        log::debug!("Diff export is grouped into {} groups", groups.len());
        groups
          .into_iter()
          .map(|(name, group)| -> Result<DiffGroup, SchemaError> {
            let group = DiffGroup::from_value(name, group)?;
            log::debug!("Group {:?} holds {} items", group.name, group.items.len());
            Ok(group)
          })
          .collect::<Result<Vec<_>, _>>()
          .map(DiffExport::Grouped)
      },
      other => Err(SchemaError::UnexpectedShape { found: type_name(&other) })
    }
  }

  /// All items in document order, regardless of shape.
  pub fn items(&self) -> impl Iterator<Item = &DiffItem> + '_ {
    let (flat, groups) = match self {
      DiffExport::Flat(items) => (items.as_slice(), [].as_slice()),
      DiffExport::Grouped(groups) => ([].as_slice(), groups.as_slice())
    };

    flat.iter().chain(groups.iter().flat_map(|group| group.items.iter()))
  }

  pub fn into_items(self) -> Vec<DiffItem> {
    match self {
      DiffExport::Flat(items) => items,
      DiffExport::Grouped(groups) => groups.into_iter().flat_map(|group| group.items).collect()
    }
  }

  pub fn len(&self) -> usize {
    match self {
      DiffExport::Flat(items) => items.len(),
      DiffExport::Grouped(groups) => groups.iter().map(|group| group.items.len()).sum()
    }
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

impl DiffGroup {
  fn from_value(name: String, value: Value) -> Result<Self, SchemaError> {
    let location = format!("$[{name:?}]");
    let Value::Object(mut group) = value else {
      return Err(SchemaError::ExpectedObject { location });
    };

    let items = match group.remove("items") {
      Some(Value::Array(items)) => items,
      Some(_) => return Err(SchemaError::InvalidType { location, field: "items", expected: "an array" }),
      None => return Err(SchemaError::MissingField { location, field: "items" })
    };

    let count = group.get("count").and_then(Value::as_u64);
    if let Some(count) = count.filter(|&count| count != items.len() as u64) {
      log::warn!("{location}: group count is {count} but it holds {} items", items.len());
    }

    let mut items = parse_items(items, &format!("{location}.items"))?;
    for item in items.iter_mut().filter(|item| item.rule_name.is_none()) {
      item.rule_name = Some(name.clone());
    }
    Ok(Self { name, items })
  }
}

fn parse_items(items: Vec<Value>, location: &str) -> Result<Vec<DiffItem>, SchemaError> {
  items
    .into_iter()
    .enumerate()
    .map(|(i, item)| DiffItem::from_value(item, format!("{location}[{i}]")))
    .collect()
}

impl DiffItem {
  fn from_value(value: Value, location: String) -> Result<Self, SchemaError> {
    let Value::Object(item) = value else {
      return Err(SchemaError::ExpectedObject { location });
    };

    let diff = require(&item, &location, "diff")?
      .as_object()
      .ok_or_else(|| SchemaError::InvalidType { location: location.clone(), field: "diff", expected: "an object" })?;
    let diff = DiffDetail::from_object(diff, &format!("{location}.diff"))?;

    Ok(Self {
      rule_name: optional_str(&item, "ruleName"),
      location,
      diff
    })
  }
}

impl DiffDetail {
  fn from_object(diff: &Map<String, Value>, location: &str) -> Result<Self, SchemaError> {
    let kind = require_str(diff, location, "kind")?;
    let path = require_str(diff, location, "path")?.to_string();

    let kind = match kind {
      DiffKind::ARRAY_TAG => DiffKind::Array(match require(diff, location, "index")? {
        Value::Number(number) => Index::Number(number.clone()),
        Value::String(text) => Index::Text(text.clone()),
        _ => return Err(invalid(location, "index", "an integer or a string"))
      }),
      "N" => DiffKind::New,
      "D" => DiffKind::Deleted,
      "E" => DiffKind::Edited,
      other => DiffKind::Other(other.to_string())
    };

    Ok(Self { kind, path })
  }
}

fn require<'a>(object: &'a Map<String, Value>, location: &str, field: &'static str) -> Result<&'a Value, SchemaError> {
  object
    .get(field)
    .ok_or_else(|| SchemaError::MissingField { location: location.to_string(), field })
}

fn require_str<'a>(object: &'a Map<String, Value>, location: &str, field: &'static str) -> Result<&'a str, SchemaError> {
  require(object, location, field)?
    .as_str()
    .ok_or_else(|| invalid(location, field, "a string"))
}

fn optional_str(object: &Map<String, Value>, field: &str) -> Option<String> {
  object.get(field).and_then(Value::as_str).map(str::to_string)
}

fn invalid(location: &str, field: &'static str, expected: &'static str) -> SchemaError {
  SchemaError::InvalidType { location: location.to_string(), field, expected }
}

fn type_name(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Array(_) => "an array",
    Value::Object(_) => "an object"
  }
}
