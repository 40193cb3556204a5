//! Resolution passes turning mapping entries into written theme icons.

mod fallback;
mod filter;

pub use fallback::resolve_fallback_matches;
pub use filter::resolve_filter_matches;

use crate::index::ResourceIndex;
use crate::mapping::{MappingTable, SynonymTable};

/// Read-only inputs shared by every resolution pass of a job.
#[derive(Debug, Clone, Copy)]
pub struct MatchContext<'a> {
  /// Source identifier to target name table.
  pub mappings: &'a MappingTable,
  /// Extra search terms per source identifier.
  pub synonyms: &'a SynonymTable,
  /// Images available in the extracted resources.
  pub index: &'a ResourceIndex,
}
