use std::path::PathBuf;

use serde::Deserialize;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use anyhow::{Context, Result};

// Constants
const DEFAULT_EXPORT_PATH: &str = "output/diff.json";
const CONFIG_FILE: &str = "diff-keys.ini";
const ENV_PREFIX: &str = "DIFF_KEYS";

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct App {
  pub export_path: PathBuf,
  pub verbose:     bool
}

impl App {
  /// Loads settings from `diff-keys.ini` in the working directory, if present,
  /// then from `DIFF_KEYS_*` environment variables.
  pub fn new() -> Result<Self> {
    dotenv::dotenv().ok();

    let builder = Config::builder()
      .add_source(File::new(CONFIG_FILE, FileFormat::Ini).required(false))
      .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));

    Self::from_builder(builder)
  }

  /// Applies defaults beneath whatever sources `builder` already holds.
  pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
    let config = builder
      .set_default("export_path", DEFAULT_EXPORT_PATH)?
      .set_default("verbose", false)?
      .build()?;

    config
      .try_deserialize()
      .with_context(|| format!("Failed to deserialize settings. Check {CONFIG_FILE} and {ENV_PREFIX}_* variables"))
  }
}
