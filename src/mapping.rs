//! Mapping and synonym tables driving icon resolution.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use serde::Deserialize;
use serde::de::{self, IgnoredAny, MapAccess, Visitor};

/// Reserved key that carries free-form notes inside a mapping document.
pub const COMMENT_KEY: &str = "__COMMENT__";

/// One mapping entry: a source identifier and the theme names it feeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
  /// Package name or `resource_folder*` key.
  pub source_id: String,
  /// Theme icon basenames, without extension.
  pub targets: Vec<String>,
}

/// Ordered mapping from source identifiers to target icon names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingTable {
  entries: Vec<MappingEntry>,
  positions: BTreeMap<String, usize>,
}

/// Errors that can occur while loading the mapping table.
#[derive(Debug, thiserror::Error)]
pub enum MappingTableError {
  /// Failed to read the mapping file from disk.
  #[error("failed to read {}: {source}", .path.display())]
  Io {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: std::io::Error,
  },
  /// Failed to parse the JSON mapping file.
  #[error("failed to parse {}: {source}", .path.display())]
  Parse {
    /// Path that caused the error.
    path: PathBuf,
    /// Source parse error.
    source: serde_json::Error,
  },
  /// A target name is not a plain basename.
  #[error("target `{target}` of `{key}` must not contain path separators")]
  InvalidTarget {
    /// Source identifier owning the target.
    key: String,
    /// Offending target name.
    target: String,
  },
}

impl MappingTable {
  /// Load the mapping table. A missing or invalid file is fatal.
  pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, MappingTableError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| MappingTableError::Io {
      path: path.to_path_buf(),
      source,
    })?;
    let table = Self::from_json(&contents).map_err(|source| MappingTableError::Parse {
      path: path.to_path_buf(),
      source,
    })?;
    table.validate()?;
    Ok(table)
  }

  /// Parse a mapping document from a JSON string.
  pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
    serde_json::from_str(contents)
  }

  /// Build a table from already split entries, merging repeated keys.
  pub fn from_entries<I, K>(entries: I) -> Self
  where
    I: IntoIterator<Item = (K, Vec<String>)>,
    K: Into<String>,
  {
    let mut table = Self::default();
    for (key, targets) in entries {
      table.push(key.into(), targets);
    }
    table
  }

  /// Iterate entries in document order.
  pub fn iter(&self) -> impl Iterator<Item = &MappingEntry> {
    self.entries.iter()
  }

  /// Targets configured for a source identifier.
  pub fn targets(&self, source_id: &str) -> Option<&[String]> {
    self
      .positions
      .get(source_id)
      .map(|&index| self.entries[index].targets.as_slice())
  }

  /// Returns `true` when the identifier is configured.
  pub fn contains(&self, source_id: &str) -> bool {
    self.positions.contains_key(source_id)
  }

  /// Number of configured source identifiers.
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Returns `true` when the table has no entries.
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  fn push(&mut self, key: String, targets: Vec<String>) {
    if key == COMMENT_KEY {
      return;
    }
    match self.positions.get(&key) {
      Some(&index) => self.entries[index].targets.extend(targets),
      None => {
        self.positions.insert(key.clone(), self.entries.len());
        self.entries.push(MappingEntry {
          source_id: key,
          targets,
        });
      }
    }
  }

  fn validate(&self) -> Result<(), MappingTableError> {
    for entry in &self.entries {
      if let Some(target) = entry
        .targets
        .iter()
        .find(|target| target.contains(['/', '\\']))
      {
        return Err(MappingTableError::InvalidTarget {
          key: entry.source_id.clone(),
          target: target.clone(),
        });
      }
    }
    Ok(())
  }
}

/// A mapping value: one target name or a list of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum TargetNames {
  One(String),
  Many(Vec<String>),
}

impl From<TargetNames> for Vec<String> {
  fn from(value: TargetNames) -> Self {
    match value {
      TargetNames::One(name) => vec![name],
      TargetNames::Many(names) => names,
    }
  }
}

impl<'de> Deserialize<'de> for MappingTable {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: de::Deserializer<'de>,
  {
    struct TableVisitor;

    impl<'de> Visitor<'de> for TableVisitor {
      type Value = MappingTable;

      fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object mapping source identifiers to target names")
      }

      fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
      where
        A: MapAccess<'de>,
      {
        let mut table = MappingTable::default();
        while let Some(key) = map.next_key::<String>()? {
          if key == COMMENT_KEY {
            map.next_value::<IgnoredAny>()?;
            continue;
          }
          let targets: TargetNames = map.next_value()?;
          table.push(key, targets.into());
        }
        Ok(table)
      }
    }

    deserializer.deserialize_map(TableVisitor)
  }
}

/// Extra search terms per source identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct SynonymTable {
  terms: BTreeMap<String, Vec<String>>,
}

impl SynonymTable {
  /// Load the synonym table, degrading to an empty table when the file is missing or malformed.
  pub fn load_or_default(path: impl AsRef<Path>) -> Self {
    let path = path.as_ref();
    let contents = match fs::read_to_string(path) {
      Ok(contents) => contents,
      Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Self::default(),
      Err(err) => {
        warn!("ignoring synonyms at {}: {err}", path.display());
        return Self::default();
      }
    };

    match serde_json::from_str::<BTreeMap<String, Vec<String>>>(&contents) {
      Ok(mut terms) => {
        terms.remove(COMMENT_KEY);
        Self { terms }
      }
      Err(err) => {
        warn!("ignoring malformed synonyms at {}: {err}", path.display());
        Self::default()
      }
    }
  }

  /// Synonyms registered for an identifier.
  pub fn get(&self, source_id: &str) -> &[String] {
    self
      .terms
      .get(source_id)
      .map(Vec::as_slice)
      .unwrap_or_default()
  }

  /// Register synonyms for an identifier.
  pub fn insert(&mut self, source_id: impl Into<String>, terms: Vec<String>) {
    self.terms.insert(source_id.into(), terms);
  }
}
