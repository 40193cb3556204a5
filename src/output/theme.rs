//! Theme directory layout and the `index.theme` descriptor.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use regex::Regex;

use crate::models::Category;

/// File name of the freedesktop theme descriptor.
pub const THEME_DESCRIPTOR_FILE: &str = "index.theme";

/// Theme name used when nothing usable survives sanitising.
pub const FALLBACK_THEME_NAME: &str = "icon_theme";

/// Where the icons of one generated theme are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeLayout {
  /// Theme name, also the theme root directory name.
  pub name: String,
  /// Theme root directory.
  pub root: PathBuf,
  /// Fixed pixel size of every icon directory.
  pub icon_size: u32,
}

impl ThemeLayout {
  /// Layout for `<output_dir>/<name>`.
  pub fn new(output_dir: &Path, name: &str, icon_size: u32) -> Self {
    Self {
      name: name.to_string(),
      root: output_dir.join(name),
      icon_size,
    }
  }

  /// Relative directory of a category, e.g. `apps/512x512`.
  pub fn relative_dir(&self, category: Category) -> String {
    format!(
      "{}/{size}x{size}",
      category.dir_name(),
      size = self.icon_size
    )
  }

  /// Absolute directory of a category.
  pub fn dir(&self, category: Category) -> PathBuf {
    self
      .root
      .join(category.dir_name())
      .join(format!("{size}x{size}", size = self.icon_size))
  }

  /// Create both category directories.
  pub fn create_dirs(&self) -> Result<()> {
    for category in [Category::Apps, Category::Places] {
      let dir = self.dir(category);
      fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir.display()))?;
    }
    Ok(())
  }

  /// Render the `index.theme` contents.
  pub fn render_descriptor(&self, inherits: &[String]) -> String {
    let apps = self.relative_dir(Category::Apps);
    let places = self.relative_dir(Category::Places);
    let mut text = format!(
      "[Icon Theme]\nName={name}\nComment=Converted by IconBridge\nInherits={inherits}\nDirectories={apps},{places}\n",
      name = self.name,
      inherits = inherits.join(","),
    );
    for (dir, category) in [(apps, Category::Apps), (places, Category::Places)] {
      text.push_str(&format!(
        "\n[{dir}]\nSize={size}\nContext={context}\nType=Fixed\n",
        size = self.icon_size,
        context = category.context(),
      ));
    }
    text
  }

  /// Write `index.theme` at the theme root.
  pub fn write_descriptor(&self, inherits: &[String]) -> Result<()> {
    fs::create_dir_all(&self.root)
      .with_context(|| format!("failed to create {}", self.root.display()))?;
    let target = self.root.join(THEME_DESCRIPTOR_FILE);
    fs::write(&target, self.render_descriptor(inherits))
      .with_context(|| format!("failed to write {}", target.display()))
  }
}

fn non_alphanumeric() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| Regex::new(r"[^a-zA-Z0-9]+").expect("invalid theme name regex"))
}

/// Derive a theme name from an archive path, e.g. `My Icons-v2.apk` -> `My_Icons_v2`.
pub fn sanitize_theme_name(archive: &Path) -> String {
  let stem = archive
    .file_stem()
    .map(|stem| stem.to_string_lossy().to_string())
    .unwrap_or_default();
  let name = non_alphanumeric()
    .replace_all(&stem, "_")
    .trim_matches('_')
    .to_string();
  if name.is_empty() {
    FALLBACK_THEME_NAME.to_string()
  } else {
    name
  }
}

/// Split a comma separated inheritance chain, dropping blanks.
pub fn parse_inherits(raw: &str) -> Vec<String> {
  raw
    .split(',')
    .map(str::trim)
    .filter(|value| !value.is_empty())
    .map(str::to_string)
    .collect()
}
