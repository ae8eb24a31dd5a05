/// Coarse, explainable confidence for a detected event.
///
/// Base 0.5 for clearing the classifier and alias match, +0.4 when a deal
/// amount was extracted, +0.1 when a target was extracted. Used to annotate
/// events for a human reader, never to gate emission.
pub fn confidence(has_amount: bool, has_target: bool) -> f64 {
    let mut score = 0.5;
    if has_amount {
        score += 0.4;
    }
    if has_target {
        score += 0.1;
    }
    score
}
