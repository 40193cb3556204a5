/// Prefixes commonly prepended to launcher drawables.
pub const ICON_PREFIXES: [&str; 4] = ["ic_", "icon_", "app_", "launcher_"];

/// Score for a name equal to a wanted term.
pub const EXACT_SCORE: u32 = 1000;
const TOKEN_SCORE: u32 = 800;
const TOKEN_PENALTY: u32 = 20;
const ACRONYM_SCORE: u32 = 600;
const PREFIX_SCORE: u32 = 500;
const SUBSTRING_PENALTY: i64 = 10;

/// Remove the first matching [`ICON_PREFIXES`] entry from a lower-cased name.
pub fn strip_icon_prefix(name: &str) -> &str {
    ICON_PREFIXES
        .iter()
        .find_map(|prefix| name.strip_prefix(prefix))
        .unwrap_or(name)
}

/// Score a candidate file name against wanted terms. Higher is better, `0` means no match.
pub fn score_filename(filename: &str, wanted: &[String]) -> u32 {
    let lowered = filename.to_lowercase();
    let cleaned = strip_icon_prefix(&lowered);

    wanted
        .iter()
        .map(|term| score_term(cleaned, &term.to_lowercase()))
        .max()
        .unwrap_or(0)
}

fn score_term(cleaned: &str, term: &str) -> u32 {
    if term.is_empty() || cleaned.is_empty() {
        return 0;
    }
    if cleaned == term {
        return EXACT_SCORE;
    }

    let tokens: Vec<&str> = cleaned.split(['_', '-']).collect();
    if tokens.contains(&term) {
        let penalty = TOKEN_PENALTY.saturating_mul((tokens.len() - 1) as u32);
        return TOKEN_SCORE.saturating_sub(penalty);
    }

    if acronym(term).is_some_and(|acronym| acronym == cleaned) {
        return ACRONYM_SCORE;
    }

    if cleaned.starts_with(term) {
        return PREFIX_SCORE;
    }

    match cleaned.find(term) {
        Some(position) => {
            let mut score = (100 * term.len() / cleaned.len()) as i64;
            if position != 0 {
                score -= SUBSTRING_PENALTY;
            }
            score.max(0) as u32
        }
        None => 0,
    }
}

/// First letters of a multi-part term, e.g. `google_play_store` -> `gps`.
fn acronym(term: &str) -> Option<String> {
    let parts: Vec<&str> = term.split(['_', '-']).filter(|part| !part.is_empty()).collect();
    if parts.len() < 2 {
        return None;
    }
    Some(parts.iter().filter_map(|part| part.chars().next()).collect())
}

/// Pick the best scoring name, preferring the shorter name on ties.
///
/// Names scoring `0` never win.
pub fn best_match<'n, I>(names: I, wanted: &[String]) -> Option<(&'n str, u32)>
where
    I: IntoIterator<Item = &'n str>,
{
    let mut best: Option<(&'n str, u32)> = None;
    for name in names {
        let score = score_filename(name, wanted);
        if score == 0 {
            continue;
        }
        best = match best {
            Some((current, current_score))
                if score < current_score
                    || (score == current_score && name.len() >= current.len()) =>
            {
                Some((current, current_score))
            }
            _ => Some((name, score)),
        };
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn exact_match_after_prefix_and_case_folding() {
        assert_eq!(score_filename("Firefox", &terms(&["firefox"])), 1000);
        assert_eq!(score_filename("ic_firefox", &terms(&["FIREFOX"])), 1000);
        assert_eq!(score_filename("launcher_firefox", &terms(&["firefox"])), 1000);
    }

    #[test]
    fn strips_only_one_leading_prefix() {
        assert_eq!(strip_icon_prefix("icon_ic_mail"), "ic_mail");
        assert_eq!(strip_icon_prefix("weather_ic_cloud"), "weather_ic_cloud");
    }

    #[test]
    fn token_match_penalises_extra_tokens() {
        let wanted = terms(&["bar"]);
        assert_eq!(score_filename("foo_bar", &wanted), 780);
        assert_eq!(score_filename("foo-bar-baz", &wanted), 760);

        let mut previous = score_filename("bar", &wanted);
        let mut name = String::from("bar");
        for extra in ["x", "y", "z", "w"] {
            name = format!("{extra}_{name}");
            let score = score_filename(&name, &wanted);
            assert!(score <= previous, "{name} scored {score} > {previous}");
            previous = score;
        }
    }

    #[test]
    fn acronym_matches_multi_part_terms() {
        assert_eq!(score_filename("gps", &terms(&["google_play_store"])), 600);
        assert_eq!(score_filename("g", &terms(&["google"])), 0);
    }

    #[test]
    fn prefix_and_substring_scores() {
        assert_eq!(score_filename("telegramx", &terms(&["telegram"])), 500);
        assert_eq!(score_filename("mytelegram", &terms(&["telegram"])), 70);
        assert_eq!(score_filename("unrelated", &terms(&["telegram"])), 0);
    }

    #[test]
    fn keeps_best_term() {
        let wanted = terms(&["zzz", "mail", "gmail"]);
        assert_eq!(score_filename("gmail", &wanted), 1000);
    }

    #[test]
    fn empty_inputs_score_zero() {
        assert_eq!(score_filename("ic_", &terms(&["mail"])), 0);
        assert_eq!(score_filename("mail", &terms(&[""])), 0);
        assert_eq!(score_filename("mail", &[]), 0);
    }

    #[test]
    fn best_match_prefers_shorter_names_on_ties() {
        let wanted = terms(&["camera"]);
        let names = ["camera_alt_big", "camera_alt", "gallery"];
        assert_eq!(best_match(names, &wanted), Some(("camera_alt", 780)));

        let names = ["camera_pro", "camera_x", "camera_y"];
        assert_eq!(best_match(names, &wanted), Some(("camera_x", 780)));
    }

    #[test]
    fn best_match_ignores_zero_scores() {
        assert_eq!(best_match(["alpha", "beta"], &terms(&["camera"])), None);
    }
}
