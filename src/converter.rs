//! Conversion job orchestrator: extraction, indexing, resolution and output.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};
use log::info;
use tempfile::TempDir;

use crate::appfilter::{APPFILTER_RELATIVE_PATH, load_filter_declaration};
use crate::config::{ConversionOptions, ConverterConfig};
use crate::extract::ResourceExtractor;
use crate::index::ResourceIndex;
use crate::mapping::{MappingTable, MappingTableError, SynonymTable};
use crate::matching::StrategyChain;
use crate::models::{Category, ConversionReport, ResolutionRecord};
use crate::output::{ThemeLayout, collect_residual_icons};
use crate::resolve::{MatchContext, resolve_fallback_matches, resolve_filter_matches};

/// Directory holding drawable folders inside an extracted archive.
pub const RESOURCE_DIR: &str = "res";

/// Errors that abort a conversion job.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
  /// The mapping table could not be loaded.
  #[error(transparent)]
  Config(#[from] MappingTableError),
  /// The extraction tool is not installed.
  #[error("`{tool}` is not installed or not in PATH")]
  ToolNotFound {
    /// Tool that was looked up.
    tool: String,
  },
  /// The extraction tool exited unsuccessfully.
  #[error("`{tool}` failed with {status}")]
  Extraction {
    /// Tool that was run.
    tool: String,
    /// Exit status reported by the tool.
    status: ExitStatus,
  },
}

/// Converts icon-pack archives into themes using one mapping configuration.
///
/// Tables are shared read-only; every job gets its own index, record and scratch directory.
#[derive(Debug, Clone)]
pub struct IconConverter {
  mappings: Arc<MappingTable>,
  synonyms: Arc<SynonymTable>,
  options: ConversionOptions,
}

impl IconConverter {
  /// Create a converter for the provided tables.
  pub fn new(mappings: MappingTable, synonyms: SynonymTable, options: ConversionOptions) -> Self {
    Self {
      mappings: Arc::new(mappings),
      synonyms: Arc::new(synonyms),
      options,
    }
  }

  /// Load tables named by `config`. A broken mapping table is fatal, synonyms are optional.
  pub fn from_config(config: &ConverterConfig, base_dir: &Path) -> Result<Self> {
    let mappings = MappingTable::load_from_path(config.mappings_path(base_dir))
      .map_err(ConversionError::from)?;
    let synonyms = SynonymTable::load_or_default(config.synonyms_path(base_dir));
    Ok(Self::new(mappings, synonyms, config.to_options(base_dir)))
  }

  /// Options used for every job.
  pub fn options(&self) -> &ConversionOptions {
    &self.options
  }

  /// Mutable access to the job options.
  pub fn options_mut(&mut self) -> &mut ConversionOptions {
    &mut self.options
  }

  /// Layout of the theme generated for `theme_name`.
  pub fn layout(&self, theme_name: &str) -> ThemeLayout {
    ThemeLayout::new(&self.options.output_dir, theme_name, self.options.icon_size)
  }

  /// Extract `archive` into a scratch directory and convert it into the theme `theme_name`.
  ///
  /// The scratch directory is removed when the job ends, whether it succeeds or not.
  pub fn convert_archive<E>(
    &self,
    extractor: &E,
    archive: &Path,
    theme_name: &str,
  ) -> Result<ConversionReport>
  where
    E: ResourceExtractor + ?Sized,
  {
    let layout = self.layout(theme_name);
    layout.create_dirs()?;
    layout.write_descriptor(&self.options.inherits)?;

    let scratch = self.scratch_dir(theme_name)?;
    extractor.extract(archive, scratch.path())?;

    let report = self.convert_extracted(scratch.path(), &layout);
    scratch
      .close()
      .context("failed to remove scratch extraction directory")?;
    Ok(report)
  }

  /// Convert an already extracted archive tree into `layout`.
  pub fn convert_extracted(&self, extracted_root: &Path, layout: &ThemeLayout) -> ConversionReport {
    let index = ResourceIndex::build(&extracted_root.join(RESOURCE_DIR));
    let declaration = load_filter_declaration(&extracted_root.join(APPFILTER_RELATIVE_PATH));
    info!(
      "{}: indexed {} images, {} filter declarations",
      layout.name,
      index.len(),
      declaration.len()
    );

    let mut record = ResolutionRecord::new(layout.dir(Category::Apps), layout.dir(Category::Places));
    let context = MatchContext {
      mappings: &self.mappings,
      synonyms: &self.synonyms,
      index: &index,
    };
    resolve_filter_matches(context, &declaration, &mut record);
    resolve_fallback_matches(
      context,
      &StrategyChain::fallback(self.options.score_threshold),
      &mut record,
    );

    let residual_outputs = collect_residual_icons(
      &index,
      &layout.dir(Category::Apps),
      &mut record.processed_linux_names,
    );

    let stats = record.stats;
    info!(
      "{}: {} icons written ({} filter, {} exact, {} prefix, {} scored, {} failed), {} unmapped kept",
      layout.name,
      record.mapped_outputs,
      stats.filter_match,
      stats.direct_exact,
      stats.direct_prefix,
      stats.scored,
      stats.failed,
      residual_outputs
    );

    ConversionReport {
      theme_root: layout.root.clone(),
      stats,
      mapped_outputs: record.mapped_outputs,
      residual_outputs,
    }
  }

  /// Run a job on a background thread and hand its outcome to `on_complete`.
  pub fn spawn<E, F>(
    &self,
    extractor: E,
    archive: PathBuf,
    theme_name: String,
    on_complete: F,
  ) -> JoinHandle<()>
  where
    E: ResourceExtractor + Send + 'static,
    F: FnOnce(Result<ConversionReport>) + Send + 'static,
  {
    let converter = self.clone();
    thread::spawn(move || {
      let outcome = converter.convert_archive(&extractor, &archive, &theme_name);
      on_complete(outcome);
    })
  }

  fn scratch_dir(&self, theme_name: &str) -> Result<TempDir> {
    let mut builder = tempfile::Builder::new();
    let prefix = format!("iconbridge-{theme_name}-");
    builder.prefix(&prefix);
    match &self.options.scratch_dir {
      Some(parent) => {
        fs::create_dir_all(parent)
          .with_context(|| format!("failed to create {}", parent.display()))?;
        builder
          .tempdir_in(parent)
          .with_context(|| format!("failed to create scratch directory in {}", parent.display()))
      }
      None => builder
        .tempdir()
        .context("failed to create scratch directory"),
    }
  }
}
