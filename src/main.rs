use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use clap::Parser;
use serde::Serialize;

use iconbridge::output::{default_install_base, install_theme, sanitize_theme_name};
use iconbridge::{Apktool, ConversionReport, ConverterConfig, IconConverter};

/// iconbridge - convert an Android icon-pack APK into a freedesktop icon theme
#[derive(Debug, Parser)]
#[command(name = "iconbridge", version, about, long_about = None)]
struct Cli {
  /// Icon-pack archive to convert.
  #[arg(value_name = "APK")]
  apk: PathBuf,

  /// Move the generated theme into the user's icon directory.
  #[arg(short, long)]
  install: bool,

  /// Comma separated parent themes written to index.theme.
  #[arg(long, value_name = "THEMES")]
  inherits: Option<String>,

  /// Directory holding iconbridge.config.json and the Config/ tables.
  #[arg(long, value_name = "DIR")]
  base_dir: Option<PathBuf>,

  /// Mapping table, relative to the base directory.
  #[arg(long, value_name = "FILE")]
  mappings: Option<PathBuf>,

  /// Synonym table, relative to the base directory.
  #[arg(long, value_name = "FILE")]
  synonyms: Option<PathBuf>,

  /// Directory generated themes are written into.
  #[arg(short, long, value_name = "DIR")]
  output: Option<PathBuf>,

  /// Minimum fuzzy score accepted by the fallback lookup.
  #[arg(long, value_name = "SCORE")]
  threshold: Option<u32>,

  /// Emit the conversion report as JSON instead of human-readable text.
  #[arg(long)]
  json: bool,

  /// Enable verbose (debug-level) logging output.
  #[arg(short, long)]
  verbose: bool,
}

impl Cli {
  fn apply(&self, config: &mut ConverterConfig) {
    if let Some(inherits) = &self.inherits {
      config.inherits = inherits.clone();
    }
    if let Some(path) = &self.mappings {
      config.mappings_file = path.to_string_lossy().into_owned();
    }
    if let Some(path) = &self.synonyms {
      config.synonyms_file = path.to_string_lossy().into_owned();
    }
    if let Some(path) = &self.output {
      config.output_dir = path.to_string_lossy().into_owned();
    }
    if let Some(threshold) = self.threshold {
      config.score_threshold = threshold;
    }
  }
}

#[derive(Debug, Serialize)]
struct Summary<'a> {
  theme: &'a str,
  #[serde(flatten)]
  report: &'a ConversionReport,
  installed_to: Option<&'a Path>,
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  // iconbridge info+ on stderr; --verbose enables debug; RUST_LOG overrides
  let level = if cli.verbose {
    log::LevelFilter::Debug
  } else {
    log::LevelFilter::Info
  };
  env_logger::Builder::new()
    .filter_module("iconbridge", level)
    .parse_default_env()
    .target(env_logger::Target::Stderr)
    .format_timestamp(None)
    .format_module_path(false)
    .format_target(false)
    .init();

  ensure!(cli.apk.is_file(), "archive {} does not exist", cli.apk.display());

  let base_dir = match &cli.base_dir {
    Some(dir) => dir.clone(),
    None => std::env::current_dir().context("failed to resolve working directory")?,
  };
  let mut config = ConverterConfig::discover(&base_dir);
  cli.apply(&mut config);

  let converter = IconConverter::from_config(&config, &base_dir)?;
  let extractor = Apktool::locate(&config.extractor)?;
  let theme = sanitize_theme_name(&cli.apk);

  let mut report = converter.convert_archive(&extractor, &cli.apk, &theme)?;
  let installed = if cli.install {
    let target = install_theme(&report.theme_root, &default_install_base()?)?;
    report.theme_root = target.clone();
    Some(target)
  } else {
    None
  };

  if cli.json {
    let summary = Summary {
      theme: &theme,
      report: &report,
      installed_to: installed.as_deref(),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    return Ok(());
  }

  let stats = report.stats;
  println!("Theme:          {theme}");
  println!("Location:       {}", report.theme_root.display());
  println!("Filter matches: {}", stats.filter_match);
  println!("Exact matches:  {}", stats.direct_exact);
  println!("Prefix matches: {}", stats.direct_prefix);
  println!("Scored matches: {}", stats.scored);
  println!("Unresolved:     {}", stats.failed);
  println!("Icons written:  {}", report.mapped_outputs);
  println!("Unmapped kept:  {}", report.residual_outputs);
  if installed.is_some() {
    println!("Installed; select the theme in your desktop settings.");
  }
  Ok(())
}
