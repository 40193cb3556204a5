//! Second pass: resolve remaining mapping entries against the whole index.

use log::{debug, warn};

use crate::matching::{StrategyChain, generate_criteria};
use crate::models::{Category, ResolutionRecord, ResolutionTier};
use crate::output::write_fan_out;
use crate::resolve::MatchContext;

/// Resolve every mapping entry the filter pass left open.
///
/// Only targets that are still missing get written. Entries without an acceptable match
/// are counted as failed and left alone.
pub fn resolve_fallback_matches(
  context: MatchContext<'_>,
  chain: &StrategyChain,
  record: &mut ResolutionRecord,
) {
  for entry in context.mappings.iter() {
    let source_id = entry.source_id.as_str();
    if record.processed_packages.contains(source_id) {
      continue;
    }
    let missing = record.missing_targets(&entry.targets);
    if missing.is_empty() {
      continue;
    }

    let criteria = generate_criteria(source_id, &entry.targets, context.synonyms.get(source_id));
    let Some(resolution) = chain.resolve(&criteria, context.index) else {
      debug!("{source_id}: no match for {criteria:?}");
      record.stats.record(ResolutionTier::Failed);
      continue;
    };

    debug!(
      "{source_id}: {:?} match `{}`",
      resolution.tier, resolution.name
    );
    record.stats.record(resolution.tier);

    let destination = record.destination(Category::of(source_id)).clone();
    let written = write_fan_out(resolution.path, &destination, &missing);
    if written == 0 {
      warn!("{source_id}: `{}` could not be written", resolution.name);
      continue;
    }
    record.mapped_outputs += written;
    record.mark_resolved(source_id, &missing);
  }
}
