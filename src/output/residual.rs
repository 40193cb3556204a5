//! Copy-through of indexed images that no mapping claimed.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use log::{debug, warn};

use crate::index::ResourceIndex;
use crate::output::fanout::{decode_rgba, write_png};

/// Re-encode every indexed image whose name is not yet claimed, under its own name.
///
/// Written names are added to `claimed`. Returns how many images were copied.
pub fn collect_residual_icons(
  index: &ResourceIndex,
  dest_dir: &Path,
  claimed: &mut BTreeSet<String>,
) -> usize {
  if let Err(err) = fs::create_dir_all(dest_dir) {
    warn!("failed to create {}: {err}", dest_dir.display());
    return 0;
  }

  let mut count = 0;
  for (name, source) in index.iter() {
    if claimed.contains(name) {
      continue;
    }

    let written = decode_rgba(source).and_then(|image| write_png(&image, dest_dir, name));
    match written {
      Ok(target) => {
        debug!("kept unmapped {} as {}", source.display(), target.display());
        claimed.insert(name.to_string());
        count += 1;
      }
      Err(err) => warn!("{err:#}"),
    }
  }
  count
}
