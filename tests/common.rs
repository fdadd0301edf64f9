#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use anyhow::Result;
use serde_json::Value;
use tempfile::TempDir;

pub const DEFAULT_EXPORT: &str = "output/diff.json";

/// A scratch working directory holding diff exports.
pub struct TestWorkspace {
  pub dir: TempDir
}

impl Default for TestWorkspace {
  fn default() -> Self {
    Self { dir: TempDir::new().unwrap() }
  }
}

impl TestWorkspace {
  pub fn path(&self) -> &Path {
    self.dir.path()
  }

  pub fn write(&self, name: &str, content: &str) -> Result<PathBuf> {
    let file_path = self.dir.path().join(name);
    if let Some(parent) = file_path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&file_path, content)?;
    Ok(file_path)
  }

  pub fn write_export(&self, value: &Value) -> Result<PathBuf> {
    self.write(DEFAULT_EXPORT, &serde_json::to_string_pretty(value)?)
  }

  /// Runs the binary from inside the workspace with a clean environment.
  pub fn run(&self, args: &[&str]) -> Output {
    self.command().args(args).output().unwrap()
  }

  pub fn command(&self) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_diff-keys"));
    cmd
      .current_dir(self.dir.path())
      .env_remove("RUST_LOG")
      .env_remove("DIFF_KEYS_EXPORT_PATH")
      .env_remove("DIFF_KEYS_VERBOSE");
    cmd
  }
}

pub fn item(kind: &str, path: &str) -> Value {
  serde_json::json!({ "diff": { "kind": kind, "path": path } })
}

pub fn array_item(path: &str, index: Value) -> Value {
  serde_json::json!({ "diff": { "kind": "A", "path": path, "index": index } })
}
