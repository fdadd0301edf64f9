//! Error types for the diff-keys checker.
//!
//! Library operations return the typed errors below. The binary wraps them in
//! `anyhow` for context and uses [`exit_code`] to map a failure back onto the
//! process exit status.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Exit status for a run whose export contains duplicate derived keys.
pub const EXIT_DUPLICATES: u8 = 1;
/// Exit status for an export that cannot be read, parsed or understood.
pub const EXIT_MALFORMED: u8 = 2;
/// Exit status for invalid settings.
pub const EXIT_CONFIG: u8 = 3;

/// Failure to turn a file into a [`DiffExport`](crate::export::DiffExport).
#[derive(Error, Debug)]
pub enum ExportError {
  #[error("Failed to read diff export at {}", .path.display())]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error
  },

  #[error("Diff export is not valid JSON")]
  Parse(#[from] serde_json::Error),

  #[error(transparent)]
  Schema(#[from] SchemaError)
}

/// The export parsed as JSON but does not have the expected structure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
  #[error("{location}: missing field `{field}`")]
  MissingField { location: String, field: &'static str },

  #[error("{location}: field `{field}` must be {expected}")]
  InvalidType {
    location: String,
    field:    &'static str,
    expected: &'static str
  },

  #[error("{location}: expected an object")]
  ExpectedObject { location: String },

  #[error("top-level value must be an array of items or an object of groups, found {found}")]
  UnexpectedShape { found: &'static str }
}

impl SchemaError {
  /// Name of the offending field, if the error is tied to one.
  pub fn field(&self) -> Option<&'static str> {
    match self {
      SchemaError::MissingField { field, .. } | SchemaError::InvalidType { field, .. } => Some(*field),
      SchemaError::ExpectedObject { .. } | SchemaError::UnexpectedShape { .. } => None
    }
  }
}

/// A derived key seen more than once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duplicate {
  pub key:         String,
  /// Location of each occurrence, followed by its rule when known.
  pub occurrences: Vec<String>
}

impl Duplicate {
  pub fn count(&self) -> usize {
    self.occurrences.len()
  }
}

impl fmt::Display for Duplicate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} ({} occurrences: {})", self.key, self.count(), self.occurrences.join(", "))
  }
}

/// Derived keys are not unique across the export.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{} derived key(s) occur more than once:\n{}", .duplicates.len(), list(.duplicates))]
pub struct DuplicateKeys {
  pub duplicates: Vec<Duplicate>
}

fn list(duplicates: &[Duplicate]) -> String {
  duplicates
    .iter()
    .map(|duplicate| format!("  {duplicate}"))
    .collect::<Vec<_>>()
    .join("\n")
}

/// Picks the process exit status for a failed run.
///
/// Duplicate keys map to [`EXIT_DUPLICATES`], anything wrong with the input
/// file to [`EXIT_MALFORMED`] and settings failures to [`EXIT_CONFIG`].
/// Unclassified errors are treated as malformed input.
///
/// # Examples
///
/// ```
/// use anyhow::anyhow;
/// use keys::error::{exit_code, DuplicateKeys, EXIT_DUPLICATES, EXIT_MALFORMED};
///
/// let error = anyhow::Error::new(DuplicateKeys { duplicates: vec![] });
/// assert_eq!(exit_code(&error), EXIT_DUPLICATES);
/// assert_eq!(exit_code(&anyhow!("something else")), EXIT_MALFORMED);
/// ```
pub fn exit_code(error: &anyhow::Error) -> u8 {
  if error.downcast_ref::<DuplicateKeys>().is_some() {
    return EXIT_DUPLICATES;
  }

  if error.downcast_ref::<config::ConfigError>().is_some() {
    return EXIT_CONFIG;
  }

  EXIT_MALFORMED
}
