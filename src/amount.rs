use regex::Regex;
use std::sync::LazyLock;

/// A normalized deal amount: absolute value in the stated currency.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedAmount {
    pub amount: f64,
    pub currency: String,
}

// Currency token, numeric literal (either separator convention), optional
// scale word. English plus Slovak scale words ("mld." / "mil." / "miliarda" /
// "milión" in their inflected forms).
static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(\$|€|£|\bUSD\b|\bEUR\b|\bGBP\b)\s*([0-9][0-9\s.,]*)(?:\s*(billion|million|miliárd\w*|miliard\w*|milión\w*|mld\.?|mil\.?|bn\b|mn\b|m\b|b\b))?",
    )
    .expect("valid amount regex")
});

/// Find the first monetary figure in `text` and normalize it.
///
/// `$2.5 billion` becomes 2_500_000_000 USD, `€300 million` becomes
/// 300_000_000 EUR. Absence of a figure is a normal outcome, not an error.
pub fn extract_amount(text: &str) -> Option<ParsedAmount> {
    let captures = AMOUNT_RE.captures(text)?;
    let currency = currency_code(&captures[1]);
    let mut amount = parse_numeric_literal(&captures[2])?;
    if let Some(scale) = captures.get(3) {
        amount *= scale_factor(scale.as_str());
    }
    Some(ParsedAmount { amount, currency })
}

fn currency_code(token: &str) -> String {
    match token {
        "$" => "USD".to_string(),
        "€" => "EUR".to_string(),
        "£" => "GBP".to_string(),
        other => other.to_uppercase(),
    }
}

fn scale_factor(word: &str) -> f64 {
    let word = word.to_lowercase();
    let billion = word.starts_with('b')
        || word.starts_with("miliard")
        || word.starts_with("miliárd")
        || word.starts_with("mld");
    if billion {
        1_000_000_000.0
    } else {
        1_000_000.0
    }
}

/// Parse a numeric literal accepting both separator conventions:
/// "2.5", "2,5", "1,200", "1 200" and "1.234.567" all resolve sensibly.
/// When both separators appear, the one occurring last is the decimal point.
fn parse_numeric_literal(raw: &str) -> Option<f64> {
    let compact: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();
    let compact = compact.trim_matches(|c: char| c == '.' || c == ',');
    if compact.is_empty() {
        return None;
    }

    let dots = compact.matches('.').count();
    let commas = compact.matches(',').count();
    let normalized = match (dots, commas) {
        (0, 0) => compact.to_string(),
        (_, 0) => {
            if dots > 1 {
                compact.replace('.', "")
            } else {
                compact.to_string()
            }
        }
        (0, _) => {
            let tail = compact.rsplit(',').next().unwrap_or("");
            if commas == 1 && tail.len() <= 2 {
                compact.replace(',', ".")
            } else {
                compact.replace(',', "")
            }
        }
        (_, _) => {
            if compact.rfind('.') > compact.rfind(',') {
                compact.replace(',', "")
            } else {
                compact.replace('.', "").replace(',', ".")
            }
        }
    };

    normalized.parse().ok()
}
