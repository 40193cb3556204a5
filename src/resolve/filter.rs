//! First pass: resolve packages declared in `appfilter.xml`.

use log::debug;

use crate::matching::{best_match, generate_criteria};
use crate::models::{Category, FilterDeclaration, ResolutionRecord, ResolutionTier};
use crate::output::write_fan_out;
use crate::resolve::MatchContext;

/// Resolve every mapped package that the filter declaration names.
///
/// The best scoring declared drawable is written to all of the package's targets. A best
/// score of `0` counts as no match and leaves the package to the fallback pass.
pub fn resolve_filter_matches(
  context: MatchContext<'_>,
  declaration: &FilterDeclaration,
  record: &mut ResolutionRecord,
) {
  if declaration.is_empty() {
    return;
  }

  for entry in context.mappings.iter() {
    let source_id = entry.source_id.as_str();
    if record.processed_packages.contains(source_id) {
      continue;
    }
    let Some(drawables) = declaration.drawables(source_id) else {
      continue;
    };

    let criteria = generate_criteria(source_id, &entry.targets, context.synonyms.get(source_id));
    let Some((drawable, score)) = best_match(drawables.iter().map(String::as_str), &criteria)
    else {
      debug!("{source_id}: no declared drawable resembles {criteria:?}");
      continue;
    };
    let Some(source) = context.index.get(drawable) else {
      debug!("{source_id}: declared drawable `{drawable}` was not extracted");
      continue;
    };

    let destination = record.destination(Category::of(source_id)).clone();
    let written = write_fan_out(source, &destination, &entry.targets);
    if written == 0 {
      continue;
    }

    debug!("{source_id}: filter match `{drawable}` (score {score})");
    record.mapped_outputs += written;
    record.mark_resolved(source_id, &entry.targets);
    record.stats.record(ResolutionTier::FilterMatch);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::index::ResourceIndex;
  use crate::mapping::{MappingTable, SynonymTable};
  use crate::output::decode_rgba;
  use crate::resolve::fixtures::{image_at, record, strings};
  use tempfile::tempdir;

  #[test]
  fn fans_out_declared_drawable_once() {
    let temp = tempdir().unwrap();
    image_at(&temp.path().join("res/drawable/foobar.png"), 9);
    let index = ResourceIndex::build(&temp.path().join("res"));
    let mappings =
      MappingTable::from_entries([("com.foo.bar", strings(&["foo-icon", "foo-icon-alt"]))]);
    let synonyms = SynonymTable::default();
    let mut declaration = FilterDeclaration::default();
    declaration.insert("com.foo.bar", "foobar");
    let (mut record, apps, _) = record(temp.path());

    let context = MatchContext {
      mappings: &mappings,
      synonyms: &synonyms,
      index: &index,
    };
    resolve_filter_matches(context, &declaration, &mut record);

    assert_eq!(record.stats.filter_match, 1);
    assert_eq!(record.mapped_outputs, 2);
    assert_eq!(
      decode_rgba(&apps.join("foo-icon.png")).unwrap(),
      decode_rgba(&apps.join("foo-icon-alt.png")).unwrap()
    );
    assert!(record.processed_packages.contains("com.foo.bar"));
    assert!(record.processed_linux_names.contains("foo-icon-alt"));
  }

  #[test]
  fn prefers_best_scoring_declared_drawable() {
    let temp = tempdir().unwrap();
    image_at(&temp.path().join("res/drawable/telegram_alt.png"), 1);
    image_at(&temp.path().join("res/drawable/telegram.png"), 2);
    let index = ResourceIndex::build(&temp.path().join("res"));
    let mappings =
      MappingTable::from_entries([("org.telegram.messenger", strings(&["telegram"]))]);
    let synonyms = SynonymTable::default();
    let mut declaration = FilterDeclaration::default();
    declaration.insert("org.telegram.messenger", "telegram_alt");
    declaration.insert("org.telegram.messenger", "telegram");
    let (mut record, apps, _) = record(temp.path());

    let context = MatchContext {
      mappings: &mappings,
      synonyms: &synonyms,
      index: &index,
    };
    resolve_filter_matches(context, &declaration, &mut record);

    assert_eq!(
      decode_rgba(&apps.join("telegram.png")).unwrap(),
      decode_rgba(&temp.path().join("res/drawable/telegram.png")).unwrap()
    );
  }

  #[test]
  fn zero_score_leaves_package_unresolved() {
    let temp = tempdir().unwrap();
    image_at(&temp.path().join("res/drawable/zz_unrelated.png"), 3);
    let index = ResourceIndex::build(&temp.path().join("res"));
    let mappings = MappingTable::from_entries([("com.foo.bar", strings(&["foo-icon"]))]);
    let synonyms = SynonymTable::default();
    let mut declaration = FilterDeclaration::default();
    declaration.insert("com.foo.bar", "zz_unrelated");
    let (mut record, apps, _) = record(temp.path());

    let context = MatchContext {
      mappings: &mappings,
      synonyms: &synonyms,
      index: &index,
    };
    resolve_filter_matches(context, &declaration, &mut record);

    assert_eq!(record.stats.filter_match, 0);
    assert!(record.processed_packages.is_empty());
    assert!(!apps.join("foo-icon.png").exists());
  }

  #[test]
  fn writes_places_keys_into_places_directory() {
    let temp = tempdir().unwrap();
    image_at(&temp.path().join("res/drawable-xxhdpi/folder_downloads.png"), 4);
    let index = ResourceIndex::build(&temp.path().join("res"));
    let mappings = MappingTable::from_entries([(
      "resource_folder_downloads",
      strings(&["folder-download"]),
    )]);
    let synonyms = SynonymTable::default();
    let mut declaration = FilterDeclaration::default();
    declaration.insert("resource_folder_downloads", "folder_downloads");
    let (mut record, apps, places) = record(temp.path());

    let context = MatchContext {
      mappings: &mappings,
      synonyms: &synonyms,
      index: &index,
    };
    resolve_filter_matches(context, &declaration, &mut record);

    assert!(places.join("folder-download.png").exists());
    assert!(!apps.join("folder-download.png").exists());
  }
}
