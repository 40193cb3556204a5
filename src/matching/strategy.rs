use std::path::Path;

use crate::index::ResourceIndex;
use crate::matching::score::{ICON_PREFIXES, best_match};
use crate::models::ResolutionTier;

/// Minimum fuzzy score accepted by [`ScoredLookup`] unless configured otherwise.
pub const DEFAULT_SCORE_THRESHOLD: u32 = 50;

/// An indexed image chosen for a set of criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution<'i> {
    /// Indexed name of the chosen image.
    pub name: &'i str,
    /// File backing the chosen image.
    pub path: &'i Path,
    /// Tier that produced the match.
    pub tier: ResolutionTier,
}

/// One way of resolving criteria against the resource index.
pub trait ResolutionStrategy {
    /// Tier reported when this strategy succeeds.
    fn tier(&self) -> ResolutionTier;

    /// Name of the matching indexed image, if any.
    fn find<'i>(&self, criteria: &[String], index: &'i ResourceIndex) -> Option<&'i str>;
}

/// A criterion equals an indexed name.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactLookup;

impl ResolutionStrategy for ExactLookup {
    fn tier(&self) -> ResolutionTier {
        ResolutionTier::DirectExact
    }

    fn find<'i>(&self, criteria: &[String], index: &'i ResourceIndex) -> Option<&'i str> {
        criteria
            .iter()
            .find_map(|term| indexed_name(index, &term.to_lowercase()))
    }
}

/// A criterion behind one of the usual icon prefixes equals an indexed name.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefixLookup;

impl ResolutionStrategy for PrefixLookup {
    fn tier(&self) -> ResolutionTier {
        ResolutionTier::DirectPrefix
    }

    fn find<'i>(&self, criteria: &[String], index: &'i ResourceIndex) -> Option<&'i str> {
        criteria.iter().find_map(|term| {
            let term = term.to_lowercase();
            ICON_PREFIXES
                .iter()
                .find_map(|prefix| indexed_name(index, &format!("{prefix}{term}")))
        })
    }
}

/// Best fuzzy score over every indexed name, accepted at or above a threshold.
#[derive(Debug, Clone, Copy)]
pub struct ScoredLookup {
    /// Minimum accepted score.
    pub threshold: u32,
}

impl Default for ScoredLookup {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SCORE_THRESHOLD,
        }
    }
}

impl ResolutionStrategy for ScoredLookup {
    fn tier(&self) -> ResolutionTier {
        ResolutionTier::Scored
    }

    fn find<'i>(&self, criteria: &[String], index: &'i ResourceIndex) -> Option<&'i str> {
        let (name, score) = best_match(index.iter().map(|(name, _)| name), criteria)?;
        (score >= self.threshold).then_some(name)
    }
}

/// Strategies tried in order, first success wins.
pub struct StrategyChain {
    strategies: Vec<Box<dyn ResolutionStrategy>>,
}

impl StrategyChain {
    /// Exact, then prefixed, then scored lookup.
    pub fn fallback(threshold: u32) -> Self {
        Self {
            strategies: vec![
                Box::new(ExactLookup),
                Box::new(PrefixLookup),
                Box::new(ScoredLookup { threshold }),
            ],
        }
    }

    /// Resolve criteria with the first strategy that finds an image.
    pub fn resolve<'i>(&self, criteria: &[String], index: &'i ResourceIndex) -> Option<Resolution<'i>> {
        self.strategies.iter().find_map(|strategy| {
            let name = strategy.find(criteria, index)?;
            let path = index.get(name)?;
            Some(Resolution {
                name,
                path,
                tier: strategy.tier(),
            })
        })
    }
}

impl Default for StrategyChain {
    fn default() -> Self {
        Self::fallback(DEFAULT_SCORE_THRESHOLD)
    }
}

fn indexed_name<'i>(index: &'i ResourceIndex, name: &str) -> Option<&'i str> {
    index.entry(name).map(|(indexed, _)| indexed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(names: &[&str]) -> ResourceIndex {
        let mut index = ResourceIndex::default();
        for name in names {
            index.insert(name, format!("/res/drawable/{name}.png"));
        }
        index
    }

    fn terms(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn exact_lookup_follows_criteria_order() {
        let index = index(&["spotify", "music"]);
        let found = ExactLookup.find(&terms(&["Music", "spotify"]), &index);
        assert_eq!(found, Some("music"));
    }

    #[test]
    fn prefix_lookup_tries_known_prefixes() {
        let index = index(&["launcher_maps"]);
        assert_eq!(PrefixLookup.find(&terms(&["maps"]), &index), Some("launcher_maps"));
        assert_eq!(ExactLookup.find(&terms(&["maps"]), &index), None);
    }

    #[test]
    fn scored_lookup_honours_threshold() {
        let index = index(&["mytelegram"]);
        let criteria = terms(&["telegram"]);
        assert_eq!(ScoredLookup::default().find(&criteria, &index), Some("mytelegram"));
        assert_eq!(ScoredLookup { threshold: 71 }.find(&criteria, &index), None);
    }

    #[test]
    fn chain_short_circuits_on_first_success() {
        let index = index(&["camera", "ic_camera", "camera_pro"]);
        let chain = StrategyChain::default();

        let resolution = chain
            .resolve(&terms(&["camera"]), &index)
            .expect("camera should resolve");
        assert_eq!(resolution.tier, ResolutionTier::DirectExact);
        assert_eq!(resolution.name, "camera");
        assert_eq!(resolution.path, Path::new("/res/drawable/camera.png"));

        let resolution = chain
            .resolve(&terms(&["pro"]), &index)
            .expect("pro should resolve by score");
        assert_eq!(resolution.tier, ResolutionTier::Scored);
        assert_eq!(resolution.name, "camera_pro");
    }

    #[test]
    fn chain_reports_nothing_below_threshold() {
        let index = index(&["weather_cloud"]);
        assert!(StrategyChain::default().resolve(&terms(&["downloads"]), &index).is_none());
    }
}
