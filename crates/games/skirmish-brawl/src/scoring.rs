use serde::{Deserialize, Serialize};

use skirmish_core::game_trait::PlayerId;

/// Points for winning the match outright.
pub const WIN_POINTS: i32 = 10;
/// Points for each side when both run out of stocks on the same tick.
pub const DRAW_POINTS: i32 = 5;
/// Points per stock left at the end.
pub const STOCK_POINTS: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    Winner(PlayerId),
    Draw,
}

impl MatchOutcome {
    pub fn winner(self) -> Option<PlayerId> {
        match self {
            MatchOutcome::Winner(id) => Some(id),
            MatchOutcome::Draw => None,
        }
    }
}

/// Decide the match from `(id, stocks)` per fighter. `None` while both have stocks.
pub fn decide_outcome(fighters: [(PlayerId, u8); 2]) -> Option<MatchOutcome> {
    let [(a, a_stocks), (b, b_stocks)] = fighters;
    match (a_stocks == 0, b_stocks == 0) {
        (false, false) => None,
        (true, true) => Some(MatchOutcome::Draw),
        (true, false) => Some(MatchOutcome::Winner(b)),
        (false, true) => Some(MatchOutcome::Winner(a)),
    }
}

/// Final score for one fighter.
pub fn calculate_score(id: PlayerId, stocks: u8, outcome: Option<MatchOutcome>) -> i32 {
    let result = match outcome {
        Some(MatchOutcome::Winner(w)) if w == id => WIN_POINTS,
        Some(MatchOutcome::Draw) => DRAW_POINTS,
        _ => 0,
    };
    result + i32::from(stocks) * STOCK_POINTS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ongoing_match_has_no_outcome() {
        assert_eq!(decide_outcome([(1, 2), (2, 1)]), None);
    }

    #[test]
    fn last_fighter_standing_wins() {
        assert_eq!(
            decide_outcome([(1, 0), (2, 1)]),
            Some(MatchOutcome::Winner(2))
        );
        assert_eq!(
            decide_outcome([(1, 3), (2, 0)]),
            Some(MatchOutcome::Winner(1))
        );
    }

    #[test]
    fn simultaneous_wipe_is_a_draw() {
        let outcome = decide_outcome([(1, 0), (2, 0)]);
        assert_eq!(outcome, Some(MatchOutcome::Draw));
        assert_eq!(outcome.and_then(MatchOutcome::winner), None);
    }

    #[test]
    fn scores() {
        let won = Some(MatchOutcome::Winner(2));
        assert_eq!(calculate_score(2, 2, won), 16);
        assert_eq!(calculate_score(1, 0, won), 0);
        assert_eq!(calculate_score(1, 0, Some(MatchOutcome::Draw)), 5);
        assert_eq!(calculate_score(1, 3, None), 9);
    }
}
