//! Gems score computation.

/// Computes the hidden-gems score for one movie.
///
/// `rating * log10(vote_count + 1) / (popularity + 1)` — rewards a high
/// rating backed by votes while discounting already-popular titles.
/// Non-finite intermediate values collapse to 0, so the result is
/// always finite and >= 0 (popularity >= 0 keeps the denominator >= 1).
#[must_use]
pub fn gems_score(vote_average: f64, vote_count: u64, popularity: f64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let votes = vote_count as f64;
    let raw = vote_average * (votes + 1.0).log10() / (popularity + 1.0);
    if raw.is_finite() { raw.max(0.0) } else { 0.0 }
}
