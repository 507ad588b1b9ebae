//! Pure race arithmetic shared by the engine, the arena and tests.

use super::entities::{DieValue, Outcome};

/// Decide a race from the two cumulative scores.
///
/// The local player is checked first, so if both sides sit at or above the
/// target in the same evaluation the local player wins. The engine never
/// produces that situation because it evaluates after every single roll.
#[must_use]
pub fn resolve_outcome(local_score: u32, opponent_score: u32, target: u32) -> Outcome {
    if local_score >= target {
        Outcome::Won
    } else if opponent_score >= target {
        Outcome::Lost
    } else {
        Outcome::Continue
    }
}

/// Add a roll to a running score, saturating instead of wrapping.
#[must_use]
pub fn advance_score(score: u32, roll: DieValue) -> u32 {
    score.saturating_add(u32::from(roll))
}
