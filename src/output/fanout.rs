//! Writing one resolved image under many theme names.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use image::{ImageFormat, RgbaImage};
use log::{debug, warn};

/// Extension of every file written into the theme.
pub const OUTPUT_EXTENSION: &str = "png";

/// Decode an image and normalise it to 8-bit RGBA.
pub fn decode_rgba(source: &Path) -> Result<RgbaImage> {
  let image =
    image::open(source).with_context(|| format!("failed to decode {}", source.display()))?;
  Ok(image.to_rgba8())
}

/// Encode an RGBA image as PNG at `<dest_dir>/<name>.png`.
pub fn write_png(image: &RgbaImage, dest_dir: &Path, name: &str) -> Result<PathBuf> {
  if name.is_empty() || name.contains(['/', '\\']) {
    bail!("`{name}` is not a valid icon name");
  }
  let target = dest_dir.join(format!("{name}.{OUTPUT_EXTENSION}"));
  image
    .save_with_format(&target, ImageFormat::Png)
    .with_context(|| format!("failed to write {}", target.display()))?;
  Ok(target)
}

/// Decode `source` once and write an independent PNG copy for every target name.
///
/// Failures are isolated per target. Returns how many targets were written.
pub fn write_fan_out(source: &Path, dest_dir: &Path, targets: &[String]) -> usize {
  if targets.is_empty() {
    return 0;
  }
  if let Err(err) = fs::create_dir_all(dest_dir) {
    warn!("failed to create {}: {err}", dest_dir.display());
    return 0;
  }

  let image = match decode_rgba(source) {
    Ok(image) => image,
    Err(err) => {
      warn!("{err:#}");
      return 0;
    }
  };

  let mut written = 0;
  for name in targets {
    match write_png(&image, dest_dir, name) {
      Ok(target) => {
        debug!("{} -> {}", source.display(), target.display());
        written += 1;
      }
      Err(err) => warn!("{err:#}"),
    }
  }
  written
}
