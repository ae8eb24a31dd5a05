/// Keyword stems that mark a headline or article as an acquisition story.
///
/// Matched as case-insensitive substrings, so one stem covers the inflected
/// forms ("acqui" hits acquire/acquires/acquisition, "akvizíc" hits
/// akvizícia/akvizíciu/akvizície). English plus Slovak, the language of the
/// feeds this watcher was built for. Deliberately recall-heavy; the alias
/// matcher downstream does the narrowing.
const ACQUISITION_KEYWORDS: &[&str] = &[
    // English
    "acqui",
    "merger",
    "merges with",
    "takeover",
    "buyout",
    "buys",
    "to buy",
    "purchase",
    // Slovak
    "akvizíc",
    "prevzat",
    "preber",
    "kupuje",
    "kúpi",
    "odkúp",
    "fúzi",
    "zlúčen",
];

/// Pure boolean gate: does this text talk about an acquisition or merger?
///
/// No attempt is made to tell announced intent from a completed deal.
pub fn is_acquisition(text: &str) -> bool {
    let text = text.to_lowercase();
    ACQUISITION_KEYWORDS.iter().any(|keyword| text.contains(keyword))
}
