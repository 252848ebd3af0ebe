//! Match result and end conditions

use serde::{Deserialize, Serialize};

use crate::game::state::{MatchState, PlayerSide};

/// Reason why match ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchEndReason {
    /// A player reached the winning score
    ScoreLimit,
    /// The match clock ran out
    TimeExpired,
}

/// Final result handed to the game-over screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub score: (u32, u32),
    /// Seconds left on the clock, never negative
    pub remaining_time: f64,
    /// `None` on a draw
    pub winner: Option<PlayerSide>,
    pub reason: MatchEndReason,
}

/// Check if match should end
///
/// The score limit wins over the clock when both apply on the same tick.
pub fn check_match_end(state: &MatchState, winning_score: u32) -> Option<MatchEndReason> {
    if state.score.iter().any(|&s| s >= winning_score) {
        return Some(MatchEndReason::ScoreLimit);
    }
    if state.remaining_time <= 0.0 {
        return Some(MatchEndReason::TimeExpired);
    }
    None
}

/// Determine match result from match state
pub fn determine_result(state: &MatchState, reason: MatchEndReason) -> MatchResult {
    let [one, two] = state.score;
    let winner = match one.cmp(&two) {
        std::cmp::Ordering::Greater => Some(PlayerSide::One),
        std::cmp::Ordering::Less => Some(PlayerSide::Two),
        std::cmp::Ordering::Equal => None,
    };

    MatchResult {
        score: (one, two),
        remaining_time: state.remaining_time.max(0.0),
        winner,
        reason,
    }
}
