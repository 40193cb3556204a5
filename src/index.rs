//! Index of drawable images found in an extracted resource tree.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

/// Marker identifying drawable resource folders.
pub const DRAWABLE_FOLDER_MARKER: &str = "drawable";

/// Density qualifiers from lowest to highest priority.
pub const DENSITY_PRIORITY: [&str; 6] = ["mdpi", "hdpi", "xhdpi", "xxhdpi", "xxxhdpi", "nodpi"];

const IMAGE_EXTENSIONS: [&str; 2] = ["png", "webp"];

/// Mapping from lower-cased image stem to the file that provides it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceIndex {
    files: BTreeMap<String, PathBuf>,
}

impl ResourceIndex {
    /// Index every drawable folder below `res_root`.
    ///
    /// Folders without a density qualifier are read first, then qualified folders in
    /// ascending density, so the last write for a name is the highest resolution one.
    /// A missing root produces an empty index.
    pub fn build(res_root: &Path) -> Self {
        let mut index = Self::default();
        let entries = match fs::read_dir(res_root) {
            Ok(entries) => entries,
            Err(err) => {
                debug!("no resources indexed from {}: {err}", res_root.display());
                return index;
            }
        };

        let mut folders: Vec<(Option<usize>, String, PathBuf)> = entries
            .flatten()
            .filter(|entry| entry.file_type().is_ok_and(|ft| ft.is_dir()))
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().to_string();
                name.contains(DRAWABLE_FOLDER_MARKER)
                    .then(|| (density_rank(&name), name, entry.path()))
            })
            .collect();
        folders.sort();

        for (_, name, path) in folders {
            let before = index.len();
            index.index_folder(&path);
            debug!("indexed {name}: {} names total (was {before})", index.len());
        }

        index
    }

    fn index_folder(&mut self, folder: &Path) {
        let entries = match fs::read_dir(folder) {
            Ok(entries) => entries,
            Err(err) => {
                warn!("skipping unreadable folder {}: {err}", folder.display());
                return;
            }
        };

        for entry in entries.flatten() {
            if !entry.file_type().is_ok_and(|ft| ft.is_file()) {
                continue;
            }
            let path = entry.path();
            let Some(stem) = indexable_stem(&path) else {
                continue;
            };
            self.files.insert(stem, path);
        }
    }

    /// Register a file under an explicit name.
    pub fn insert(&mut self, name: &str, path: impl Into<PathBuf>) {
        self.files.insert(name.to_lowercase(), path.into());
    }

    /// Case-insensitive lookup of an image by name.
    pub fn get(&self, name: &str) -> Option<&Path> {
        self.entry(name).map(|(_, path)| path)
    }

    /// Case-insensitive lookup returning the indexed name alongside its file.
    pub fn entry(&self, name: &str) -> Option<(&str, &Path)> {
        self.files
            .get_key_value(name)
            .or_else(|| self.files.get_key_value(&name.to_lowercase()))
            .map(|(name, path)| (name.as_str(), path.as_path()))
    }

    /// Returns `true` when a name is indexed.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate indexed names and paths in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.files
            .iter()
            .map(|(name, path)| (name.as_str(), path.as_path()))
    }

    /// Number of indexed names.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` when nothing was indexed.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Position of the folder's density qualifier in [`DENSITY_PRIORITY`], if it has one.
pub fn density_rank(folder_name: &str) -> Option<usize> {
    folder_name
        .split('-')
        .skip(1)
        .find_map(|qualifier| DENSITY_PRIORITY.iter().position(|tier| *tier == qualifier))
}

fn indexable_stem(path: &Path) -> Option<String> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    if !IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        return None;
    }
    let stem = path.file_stem()?.to_string_lossy().to_lowercase();
    (!stem.is_empty()).then_some(stem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(path: &Path, contents: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn ranks_density_qualifiers() {
        assert_eq!(density_rank("drawable"), None);
        assert_eq!(density_rank("drawable-v24"), None);
        assert_eq!(density_rank("drawable-mdpi"), Some(0));
        assert_eq!(density_rank("drawable-xxxhdpi-v4"), Some(4));
        assert_eq!(density_rank("drawable-nodpi"), Some(5));
        assert!(density_rank("drawable-hdpi") < density_rank("drawable-xhdpi"));
    }

    #[test]
    fn missing_root_yields_empty_index() {
        let temp = tempdir().unwrap();
        let index = ResourceIndex::build(&temp.path().join("res"));
        assert!(index.is_empty());
    }

    #[test]
    fn higher_density_overrides_lower_density() {
        let temp = tempdir().unwrap();
        let res = temp.path();
        touch(&res.join("drawable/clock.png"), "plain");
        touch(&res.join("drawable-xxxhdpi/clock.png"), "xxxhdpi");
        touch(&res.join("drawable-hdpi/clock.png"), "hdpi");
        touch(&res.join("drawable-mdpi/clock.png"), "mdpi");
        touch(&res.join("drawable-xhdpi/camera.webp"), "xhdpi");

        let index = ResourceIndex::build(res);

        assert_eq!(index.len(), 2);
        let clock = index.get("clock").expect("clock should be indexed");
        assert_eq!(fs::read_to_string(clock).unwrap(), "xxxhdpi");
        assert!(index.contains("camera"));
    }

    #[test]
    fn indexes_only_images_in_drawable_folders() {
        let temp = tempdir().unwrap();
        let res = temp.path();
        touch(&res.join("drawable/notes.xml"), "<shape/>");
        touch(&res.join("drawable/readme.txt"), "text");
        touch(&res.join("mipmap-hdpi/launcher.png"), "mipmap");
        touch(&res.join("values/strings.png"), "odd");
        touch(&res.join("drawable-nodpi/wallpaper.png"), "png");

        let index = ResourceIndex::build(res);

        let names: Vec<&str> = index.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["wallpaper"]);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let temp = tempdir().unwrap();
        let res = temp.path();
        touch(&res.join("drawable/Icon.PNG"), "png");

        let index = ResourceIndex::build(res);

        assert!(index.contains("icon"));
        assert!(index.contains("ICON"));
    }
}
