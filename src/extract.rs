use crate::fuzzy::partial_ratio;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

// Verb alternations shared by the pattern table, English plus Slovak.
const ACQUIRE_VERBS: &str = "acquires|is acquiring|agrees to acquire|to acquire|acquired|buys|to buy|purchases|preberá|prevezme|kupuje|kúpi|odkúpi\\w*|získava|získa";
const PASSIVE_VERBS: &str = "acquired|bought|purchased|to be acquired|taken over|prevzatá|prevzaté|odkúpená|kúpená";

const ACQUISITION_NOUN_PREFIX: &str =
    "(?:acquisition|takeover|purchase|akvizíci\\w*|prevzat\\w*)\\s+(?:of\\s+|spoločnosti\\s+|firmy\\s+)?";

static VERB_TARGET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        "(?i)(?:to acquire|to buy|is acquiring|acquires|acquisition of|buys|preberá|prevezme|kupuje|kúpi|odkúpi|akvizíci\\w*\\s+(?:spoločnosti|firmy)|prevzati\\w*\\s+(?:spoločnosti|firmy))\\s+(.{2,120})",
    )
    .expect("valid target regex")
});

// Everything from a deal-qualifier word onward is dropped from a capture.
static QUALIFIER_CUT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s+(?:for|worth|valued|in a|in an|deal|transaction|za|v hodnote|transakci\w*|v obchode)\b")
        .expect("valid qualifier regex")
});

/// Extraction strategies in trial order. Bidirectional patterns that name
/// both parties come before the loose unidirectional ones, so a headline
/// mentioning both companies attributes the target correctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetPattern {
    /// "<Acquirer> acquires/buys/preberá <Target>"
    AcquirerVerbTarget,
    /// "acquisition of <Target> by <Acquirer>"
    AcquisitionOfTargetByAcquirer,
    /// "<Target> acquired/bought by <Acquirer>"
    TargetPassiveByAcquirer,
    /// "to acquire <Target>" with no acquirer anchor
    VerbTarget,
}

pub const PATTERN_ORDER: &[TargetPattern] = &[
    TargetPattern::AcquirerVerbTarget,
    TargetPattern::AcquisitionOfTargetByAcquirer,
    TargetPattern::TargetPassiveByAcquirer,
    TargetPattern::VerbTarget,
];

impl TargetPattern {
    fn capture(&self, acquirer: Option<&str>, text: &str) -> Option<String> {
        let re = match self {
            TargetPattern::AcquirerVerbTarget => {
                let acq = regex::escape(acquirer?);
                Regex::new(&format!(r"(?i){acq}[^.!?\n]*?\s+(?:{ACQUIRE_VERBS})\s+(.{{2,120}})"))
                    .ok()?
            }
            TargetPattern::AcquisitionOfTargetByAcquirer => {
                let acq = regex::escape(acquirer?);
                Regex::new(&format!(
                    r"(?i){ACQUISITION_NOUN_PREFIX}(.{{2,120}}?)\s+(?:by|zo strany|od)\s+{acq}"
                ))
                .ok()?
            }
            TargetPattern::TargetPassiveByAcquirer => {
                let acq = regex::escape(acquirer?);
                Regex::new(&format!(
                    r"(?i)([^.!?\n]{{2,120}}?)\s+(?:{PASSIVE_VERBS})\s+(?:by|spoločnosťou|firmou)\s+{acq}"
                ))
                .ok()?
            }
            TargetPattern::VerbTarget => {
                return VERB_TARGET_RE
                    .captures(text)
                    .map(|captures| captures[1].to_string())
            }
        };
        re.captures(text).map(|captures| captures[1].to_string())
    }
}

/// Apply the pattern table to the title first (densest signal) and then to
/// the full candidate text, returning the first capture that survives
/// cleanup.
pub fn extract_target(
    acquirer: Option<&str>,
    title: &str,
    full_text: &str,
    reject_threshold: u8,
) -> Option<String> {
    for text in [title, full_text] {
        for pattern in PATTERN_ORDER {
            if let Some(raw) = pattern.capture(acquirer, text) {
                if let Some(target) = clean_target(&raw, acquirer, reject_threshold) {
                    debug!("Target '{}' extracted via {:?}", target, pattern);
                    return Some(target);
                }
            }
        }
    }
    None
}

/// Single-word captures that name a role rather than a company.
const GENERIC_PLACEHOLDERS: &[&str] = &[
    "company", "firm", "target", "business", "rival", "spoločnosť", "spoločnosti", "firma",
    "firmu", "podnik", "konkurenta",
];

fn clean_target(raw: &str, acquirer: Option<&str>, reject_threshold: u8) -> Option<String> {
    let mut candidate = raw;

    // Headline prefixes like "Breaking:" sneak into passive-pattern captures.
    if let Some(idx) = candidate.rfind(':') {
        candidate = &candidate[idx + 1..];
    }
    // Stop at the end of the clause.
    if let Some(idx) = candidate.find(|c: char| matches!(c, '.' | ',' | ';' | '!' | '?' | '\n')) {
        candidate = &candidate[..idx];
    }
    // Drop trailing amount/qualifier clauses ("... for $2 billion").
    if let Some(m) = QUALIFIER_CUT_RE.find(candidate) {
        candidate = &candidate[..m.start()];
    }

    let candidate = candidate
        .trim_matches(|c: char| c.is_whitespace() || "\"'“”‘’()[]«»-–—,.;:".contains(c))
        .to_string();

    if candidate.chars().count() < 2 {
        return None;
    }
    if let Some(acq) = acquirer {
        let similarity = partial_ratio(&candidate, acq).max(partial_ratio(acq, &candidate));
        if similarity >= reject_threshold {
            return None;
        }
    }
    let lowered = candidate.to_lowercase();
    if !lowered.contains(char::is_whitespace) && GENERIC_PLACEHOLDERS.contains(&lowered.as_str()) {
        return None;
    }

    Some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(acquirer: Option<&str>, text: &str) -> Option<String> {
        extract_target(acquirer, text, text, 90)
    }

    #[test]
    fn acquirer_verb_target() {
        let target = extract(Some("Acme Corp"), "Acme Corp to acquire Widget Inc for $120 million");
        assert_eq!(target.as_deref(), Some("Widget Inc"));
    }

    #[test]
    fn acquirer_verb_with_intervening_words() {
        let target = extract(
            Some("Acme Corp"),
            "Acme Corp announces agreement to acquire Widget Inc in a $2 billion deal",
        );
        assert_eq!(target.as_deref(), Some("Widget Inc"));
    }

    #[test]
    fn acquisition_of_target_by_acquirer() {
        let target = extract(
            Some("Acme Corp"),
            "Regulators cleared the acquisition of Widget Inc by Acme Corp on Friday",
        );
        assert_eq!(target.as_deref(), Some("Widget Inc"));
    }

    #[test]
    fn target_passive_by_acquirer() {
        let target = extract(Some("Acme Corp"), "Widget Inc acquired by Acme Corp");
        assert_eq!(target.as_deref(), Some("Widget Inc"));
    }

    #[test]
    fn loose_pattern_without_acquirer() {
        let target = extract(None, "Board approves plan to acquire Widget Inc next quarter");
        assert_eq!(target.as_deref(), Some("Widget Inc next quarter"));
    }

    #[test]
    fn slovak_phrasings() {
        let target = extract(Some("Acme"), "Acme preberá Widget za 300 miliónov eur");
        assert_eq!(target.as_deref(), Some("Widget"));

        let target = extract(None, "Akvizícia spoločnosti Widget bola dokončená");
        assert_eq!(target.as_deref(), Some("Widget bola dokončená"));
    }

    #[test]
    fn qualifier_clause_is_cut() {
        let target = extract(Some("Acme Corp"), "Acme Corp buys Widget Inc worth €500 million");
        assert_eq!(target.as_deref(), Some("Widget Inc"));
        let target = extract(Some("Acme Corp"), "Acme Corp buys Widget Inc in a landmark transaction");
        assert_eq!(target.as_deref(), Some("Widget Inc"));
    }

    #[test]
    fn never_returns_the_acquirer_itself() {
        // The passive pattern would otherwise capture the acquirer's own name.
        let target = extract(Some("Acme Corp"), "Acme Corp to acquire Acme Corp");
        assert_eq!(target, None);
    }

    #[test]
    fn generic_placeholders_rejected() {
        assert_eq!(extract(Some("Acme Corp"), "Acme Corp to acquire company"), None);
        assert_eq!(extract(Some("Acme"), "Acme preberá firmu"), None);
    }

    #[test]
    fn bidirectional_patterns_tried_before_loose_ones() {
        // The loose "acquisition of <X>" pattern alone would capture
        // "Widget Inc by Acme Corp"; the bidirectional one must win.
        let target = extract(
            Some("Acme Corp"),
            "Shareholders welcomed the acquisition of Widget Inc by Acme Corp",
        );
        assert_eq!(target.as_deref(), Some("Widget Inc"));
    }

    #[test]
    fn no_pattern_yields_none() {
        assert_eq!(extract(Some("Acme Corp"), "Acme Corp reports record earnings"), None);
    }

    #[test]
    fn surrounding_quotes_trimmed() {
        let target = extract(Some("Acme Corp"), "Acme Corp buys \"Widget Inc\"");
        assert_eq!(target.as_deref(), Some("Widget Inc"));
    }
}
