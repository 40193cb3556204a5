use std::collections::BTreeSet;

/// Last package segments that say nothing about the application.
const GENERIC_PACKAGE_SEGMENTS: [&str; 3] = ["android", "app", "mobile"];

/// Vendor fragments removed from target names before they are used as search terms.
const TARGET_NOISE: [&str; 3] = ["org.", "com.", "kde."];

/// Prefix shared by synthetic resource keys.
const RESOURCE_KEY_PREFIX: &str = "resource_";

/// Generate the ordered search terms used to find an image for a source identifier.
///
/// Terms come from the identifier itself, any registered synonyms, and the configured
/// target names. Order is a ranking hint for the direct lookups; scoring does not
/// depend on it. Empty and repeated terms are dropped.
pub fn generate_criteria(source_id: &str, targets: &[String], synonyms: &[String]) -> Vec<String> {
    let mut builder = CriteriaBuilder::default();

    builder.add_identifier_terms(source_id);
    builder.add_synonyms(synonyms);
    builder.add_resource_key_term(source_id);
    builder.add_target_terms(targets);

    builder.finish()
}

#[derive(Default)]
struct CriteriaBuilder {
    seen: BTreeSet<String>,
    result: Vec<String>,
}

impl CriteriaBuilder {
    fn add_identifier_terms(&mut self, source_id: &str) {
        if !source_id.contains('.') {
            self.push(source_id.to_string());
            return;
        }

        self.push(source_id.replace('.', "_"));
        if let Some(last) = source_id.rsplit('.').next() {
            if !GENERIC_PACKAGE_SEGMENTS.contains(&last) {
                self.push(last.to_string());
            }
        }
    }

    fn add_synonyms(&mut self, synonyms: &[String]) {
        for synonym in synonyms {
            self.push(synonym.clone());
        }
    }

    fn add_resource_key_term(&mut self, source_id: &str) {
        if let Some(stripped) = source_id.strip_prefix(RESOURCE_KEY_PREFIX) {
            self.push(stripped.to_string());
        }
    }

    fn add_target_terms(&mut self, targets: &[String]) {
        for target in targets {
            self.push(clean_target_name(target));
        }
    }

    fn finish(self) -> Vec<String> {
        self.result
    }

    fn push(&mut self, term: String) {
        if term.is_empty() {
            return;
        }
        if self.seen.insert(term.clone()) {
            self.result.push(term);
        }
    }
}

/// Reduce a theme icon name such as `org.kde.konsole` or `folder-download` to a search term.
pub fn clean_target_name(target: &str) -> String {
    let mut cleaned = target.to_string();
    for noise in TARGET_NOISE {
        cleaned = cleaned.replace(noise, "");
    }
    let cleaned = cleaned.replace('-', "_");
    match cleaned.rsplit_once('.') {
        Some((_, last)) => last.to_string(),
        None => cleaned,
    }
}
