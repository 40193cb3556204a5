//! Moving a generated theme into the user's icon directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use directories::BaseDirs;
use log::debug;

/// `~/.local/share/icons` or the platform equivalent.
pub fn default_install_base() -> Result<PathBuf> {
  let dirs = BaseDirs::new().ok_or_else(|| anyhow!("failed to locate the home directory"))?;
  Ok(dirs.data_dir().join("icons"))
}

/// Move `theme_root` into `install_base`, replacing a previous install of the same name.
pub fn install_theme(theme_root: &Path, install_base: &Path) -> Result<PathBuf> {
  let name = theme_root
    .file_name()
    .ok_or_else(|| anyhow!("{} has no theme name", theme_root.display()))?;
  fs::create_dir_all(install_base)
    .with_context(|| format!("failed to create {}", install_base.display()))?;

  let destination = install_base.join(name);
  if destination.exists() {
    fs::remove_dir_all(&destination)
      .with_context(|| format!("failed to remove {}", destination.display()))?;
  }

  if let Err(err) = fs::rename(theme_root, &destination) {
    debug!("rename failed ({err}), copying {} instead", theme_root.display());
    copy_tree(theme_root, &destination)?;
    fs::remove_dir_all(theme_root)
      .with_context(|| format!("failed to remove {}", theme_root.display()))?;
  }

  Ok(destination)
}

fn copy_tree(source: &Path, destination: &Path) -> Result<()> {
  fs::create_dir_all(destination)
    .with_context(|| format!("failed to create {}", destination.display()))?;

  for entry in
    fs::read_dir(source).with_context(|| format!("failed to read {}", source.display()))?
  {
    let entry = entry?;
    let target = destination.join(entry.file_name());
    if entry.file_type()?.is_dir() {
      copy_tree(&entry.path(), &target)?;
    } else {
      fs::copy(entry.path(), &target).with_context(|| {
        format!(
          "failed to copy {} to {}",
          entry.path().display(),
          target.display()
        )
      })?;
    }
  }
  Ok(())
}
