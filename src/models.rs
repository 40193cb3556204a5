//! Data structures shared by the stages of a conversion job.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde::Serialize;

/// Key prefix marking a mapping entry as a places-category icon.
pub const PLACES_KEY_PREFIX: &str = "resource_folder";

/// Theme context a resolved icon is written into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
  /// Application launcher icons.
  Apps,
  /// Folder and location icons.
  Places,
}

impl Category {
  /// Derive the category structurally from a source identifier.
  pub fn of(source_id: &str) -> Self {
    if source_id.starts_with(PLACES_KEY_PREFIX) {
      Self::Places
    } else {
      Self::Apps
    }
  }

  /// Directory name used for the category inside the theme root.
  pub fn dir_name(self) -> &'static str {
    match self {
      Self::Apps => "apps",
      Self::Places => "places",
    }
  }

  /// Value of the `Context` key in the theme descriptor.
  pub fn context(self) -> &'static str {
    match self {
      Self::Apps => "Applications",
      Self::Places => "Places",
    }
  }
}

/// Resolution path that satisfied (or failed to satisfy) a source identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionTier {
  /// Matched through the filter declaration document.
  FilterMatch,
  /// A criterion equals an indexed name.
  DirectExact,
  /// A criterion with a well known icon prefix equals an indexed name.
  DirectPrefix,
  /// Best fuzzy score over the whole index, above the threshold.
  Scored,
  /// Nothing acceptable was found.
  Failed,
}

/// Outcome counters for one conversion job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConversionStats {
  /// Identifiers resolved through the filter declaration.
  pub filter_match: usize,
  /// Identifiers resolved by exact name.
  pub direct_exact: usize,
  /// Identifiers resolved by prefixed name.
  pub direct_prefix: usize,
  /// Identifiers resolved by fuzzy score.
  pub scored: usize,
  /// Identifiers left unresolved.
  pub failed: usize,
}

impl ConversionStats {
  /// Count one outcome.
  pub fn record(&mut self, tier: ResolutionTier) {
    match tier {
      ResolutionTier::FilterMatch => self.filter_match += 1,
      ResolutionTier::DirectExact => self.direct_exact += 1,
      ResolutionTier::DirectPrefix => self.direct_prefix += 1,
      ResolutionTier::Scored => self.scored += 1,
      ResolutionTier::Failed => self.failed += 1,
    }
  }

  /// Number of identifiers that were resolved by any tier.
  pub fn resolved(&self) -> usize {
    self.filter_match + self.direct_exact + self.direct_prefix + self.scored
  }
}

/// Package to drawable declarations parsed from `appfilter.xml`.
///
/// Drawables are kept per package in first-seen order with duplicates removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterDeclaration {
  packages: BTreeMap<String, Vec<String>>,
}

impl FilterDeclaration {
  /// Register a drawable for a package, ignoring repeats.
  pub fn insert(&mut self, package: impl Into<String>, drawable: impl Into<String>) {
    let drawable = drawable.into();
    let drawables = self.packages.entry(package.into()).or_default();
    if !drawables.contains(&drawable) {
      drawables.push(drawable);
    }
  }

  /// Drawable candidates declared for a package.
  pub fn drawables(&self, package: &str) -> Option<&[String]> {
    self.packages.get(package).map(Vec::as_slice)
  }

  /// Number of distinct packages declared.
  pub fn len(&self) -> usize {
    self.packages.len()
  }

  /// Returns `true` when no declarations were found.
  pub fn is_empty(&self) -> bool {
    self.packages.is_empty()
  }
}

/// Per-job bookkeeping of what has already been satisfied.
#[derive(Debug, Clone)]
pub struct ResolutionRecord {
  /// Source identifiers already resolved.
  pub processed_packages: BTreeSet<String>,
  /// Target names already written.
  pub processed_linux_names: BTreeSet<String>,
  /// Output directory for each category.
  pub destinations: BTreeMap<&'static str, PathBuf>,
  /// Outcome counters for the job.
  pub stats: ConversionStats,
  /// Number of files written for mapping entries.
  pub mapped_outputs: usize,
}

impl ResolutionRecord {
  /// Create an empty record writing into the given category directories.
  pub fn new(apps_dir: PathBuf, places_dir: PathBuf) -> Self {
    let mut destinations = BTreeMap::new();
    destinations.insert(Category::Apps.dir_name(), apps_dir);
    destinations.insert(Category::Places.dir_name(), places_dir);
    Self {
      processed_packages: BTreeSet::new(),
      processed_linux_names: BTreeSet::new(),
      destinations,
      stats: ConversionStats::default(),
      mapped_outputs: 0,
    }
  }

  /// Output directory for a category.
  pub fn destination(&self, category: Category) -> &PathBuf {
    &self.destinations[category.dir_name()]
  }

  /// Targets of an entry that have not been written yet.
  pub fn missing_targets(&self, targets: &[String]) -> Vec<String> {
    targets
      .iter()
      .filter(|target| !self.processed_linux_names.contains(*target))
      .cloned()
      .collect()
  }

  /// Mark a source identifier and its written targets as satisfied.
  pub fn mark_resolved<'t>(&mut self, source_id: &str, targets: impl IntoIterator<Item = &'t String>) {
    self.processed_packages.insert(source_id.to_string());
    self
      .processed_linux_names
      .extend(targets.into_iter().cloned());
  }
}

/// Summary of a finished conversion job.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
  /// Root directory of the generated theme.
  pub theme_root: PathBuf,
  /// Outcome counters per resolution tier.
  pub stats: ConversionStats,
  /// Files written for mapping entries.
  pub mapped_outputs: usize,
  /// Files copied through by the residual collector.
  pub residual_outputs: usize,
}
