//! Converter configuration describing input tables and theme output.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::extract::DEFAULT_EXTRACTOR;
use crate::matching::DEFAULT_SCORE_THRESHOLD;
use crate::output::parse_inherits;

const DEFAULT_CONFIG_FILE: &str = "iconbridge.config.json";

/// Themes a converted theme falls back to for icons it does not provide.
pub const DEFAULT_INHERITS: &str = "breeze-dark,breeze,Adwaita,hicolor";

/// Pixel size declared for every generated icon directory.
pub const DEFAULT_ICON_SIZE: u32 = 512;

/// Discoverable converter configuration. Paths are relative to the base directory.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
  /// Mapping table JSON file.
  pub mappings_file: String,
  /// Optional synonym table JSON file.
  pub synonyms_file: String,
  /// Directory generated themes are written into.
  pub output_dir: String,
  /// Comma separated list of parent themes.
  pub inherits: String,
  /// Fixed icon size declared in the theme.
  pub icon_size: u32,
  /// Minimum score accepted by the fuzzy fallback.
  pub score_threshold: u32,
  /// Decompiler executable used for extraction.
  pub extractor: String,
  /// Parent directory for scratch extraction directories, defaults to the system temp dir.
  pub scratch_dir: Option<String>,
}

impl Default for ConverterConfig {
  fn default() -> Self {
    Self {
      mappings_file: "Config/mappings.json".into(),
      synonyms_file: "Config/synonyms.json".into(),
      output_dir: "Converted".into(),
      inherits: DEFAULT_INHERITS.into(),
      icon_size: DEFAULT_ICON_SIZE,
      score_threshold: DEFAULT_SCORE_THRESHOLD,
      extractor: DEFAULT_EXTRACTOR.into(),
      scratch_dir: None,
    }
  }
}

impl ConverterConfig {
  /// Attempt to load configuration from the provided directory.
  ///
  /// When the configuration file does not exist or fails to parse we fall back to the
  /// defaults so a bare checkout with a `Config/` folder works out of the box.
  pub fn discover(base_dir: &Path) -> Self {
    let candidate = base_dir.join(DEFAULT_CONFIG_FILE);
    Self::from_path(&candidate).unwrap_or_default()
  }

  /// Read configuration from a specific JSON file.
  pub fn from_path(path: &Path) -> Option<Self> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
  }

  /// Mapping table path resolved against the base directory.
  pub fn mappings_path(&self, base_dir: &Path) -> PathBuf {
    base_dir.join(&self.mappings_file)
  }

  /// Synonym table path resolved against the base directory.
  pub fn synonyms_path(&self, base_dir: &Path) -> PathBuf {
    base_dir.join(&self.synonyms_file)
  }

  /// Per-job options for a conversion rooted at `base_dir`.
  pub fn to_options(&self, base_dir: &Path) -> ConversionOptions {
    ConversionOptions {
      output_dir: base_dir.join(&self.output_dir),
      inherits: parse_inherits(&self.inherits),
      icon_size: self.icon_size,
      score_threshold: self.score_threshold,
      scratch_dir: self.scratch_dir.as_ref().map(|dir| base_dir.join(dir)),
    }
  }
}

/// Options for a single conversion job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionOptions {
  /// Directory the theme root is created in.
  pub output_dir: PathBuf,
  /// Parent themes listed in the descriptor.
  pub inherits: Vec<String>,
  /// Fixed icon size declared in the theme.
  pub icon_size: u32,
  /// Minimum score accepted by the fuzzy fallback.
  pub score_threshold: u32,
  /// Parent directory for the scratch extraction directory.
  pub scratch_dir: Option<PathBuf>,
}

impl ConversionOptions {
  /// Default options writing into `output_dir`.
  pub fn new(output_dir: impl Into<PathBuf>) -> Self {
    Self {
      output_dir: output_dir.into(),
      inherits: parse_inherits(DEFAULT_INHERITS),
      icon_size: DEFAULT_ICON_SIZE,
      score_threshold: DEFAULT_SCORE_THRESHOLD,
      scratch_dir: None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn falls_back_to_defaults_without_config_file() {
    let temp = tempdir().unwrap();
    let config = ConverterConfig::discover(temp.path());

    assert_eq!(config.score_threshold, 50);
    assert_eq!(
      config.mappings_path(temp.path()),
      temp.path().join("Config/mappings.json")
    );
  }

  #[test]
  fn reads_partial_config_file() {
    let temp = tempdir().unwrap();
    fs::write(
      temp.path().join(DEFAULT_CONFIG_FILE),
      r#"{"score_threshold": 80, "inherits": "hicolor", "scratch_dir": "tmp"}"#,
    )
    .unwrap();

    let config = ConverterConfig::discover(temp.path());
    let options = config.to_options(temp.path());

    assert_eq!(options.score_threshold, 80);
    assert_eq!(options.inherits, vec!["hicolor".to_string()]);
    assert_eq!(options.icon_size, DEFAULT_ICON_SIZE);
    assert_eq!(options.scratch_dir, Some(temp.path().join("tmp")));
    assert_eq!(options.output_dir, temp.path().join("Converted"));
  }

  #[test]
  fn invalid_config_uses_defaults() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join(DEFAULT_CONFIG_FILE), "{oops").unwrap();

    let config = ConverterConfig::discover(temp.path());
    assert_eq!(config.extractor, DEFAULT_EXTRACTOR);
  }
}
