//! Helpers for matching source identifiers against indexed drawable names.
//!
//! Search-term generation, filename scoring, and the ordered lookup strategies live in
//! separate submodules so each can be tested on its own. The filter-declaration pass and
//! the fallback pass share all of them.

mod criteria;
mod score;
mod strategy;

pub use criteria::{clean_target_name, generate_criteria};
pub use score::{EXACT_SCORE, ICON_PREFIXES, best_match, score_filename, strip_icon_prefix};
pub use strategy::{
    DEFAULT_SCORE_THRESHOLD, ExactLookup, PrefixLookup, Resolution, ResolutionStrategy,
    ScoredLookup, StrategyChain,
};
