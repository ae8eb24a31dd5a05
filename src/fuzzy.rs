use strsim::jaro_winkler;

/// Partial similarity of `needle` against free text, scaled to 0-100.
///
/// Case-insensitive. An exact substring scores 100; otherwise the needle is
/// slid over word windows of the haystack (needle word count, one narrower,
/// one wider) and the best Jaro-Winkler similarity wins. This tolerates the
/// kind of minor wording drift company names pick up inside a sentence
/// ("Acme Corp." vs "Acme Corporation").
pub fn partial_ratio(needle: &str, haystack: &str) -> u8 {
    let needle = needle.to_lowercase();
    let haystack = haystack.to_lowercase();
    if needle.trim().is_empty() || haystack.trim().is_empty() {
        return 0;
    }
    if haystack.contains(&needle) {
        return 100;
    }

    let hay_words: Vec<&str> = haystack.split_whitespace().collect();
    let needle_words = needle.split_whitespace().count().max(1);

    let mut best = jaro_winkler(&needle, &haystack);
    for width in [needle_words.saturating_sub(1).max(1), needle_words, needle_words + 1] {
        if width > hay_words.len() {
            continue;
        }
        for window in hay_words.windows(width) {
            let candidate = window.join(" ");
            let sim = jaro_winkler(&needle, &candidate);
            if sim > best {
                best = sim;
            }
        }
    }

    (best * 100.0).round().clamp(0.0, 100.0) as u8
}
