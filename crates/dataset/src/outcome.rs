//! Game results as reward scalars

use chess_core::Color;
use serde::{Deserialize, Serialize};

use crate::error::DatasetError;

/// Default discount factor for rewards that lie several moves in the future.
pub const GAMMA: f32 = 0.99;

/// Result of a game as recorded in its `Result` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    WhiteWins,
    BlackWins,
    Draw,
    /// `*`: game still in progress or result unknown
    Unfinished,
}

impl GameOutcome {
    pub fn from_result(result: &str) -> Result<Self, DatasetError> {
        match result.trim() {
            "1-0" => Ok(GameOutcome::WhiteWins),
            "0-1" => Ok(GameOutcome::BlackWins),
            "1/2-1/2" => Ok(GameOutcome::Draw),
            "*" => Ok(GameOutcome::Unfinished),
            other => Err(DatasetError::MalformedRecord(format!(
                "unknown result '{other}'"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GameOutcome::WhiteWins => "1-0",
            GameOutcome::BlackWins => "0-1",
            GameOutcome::Draw => "1/2-1/2",
            GameOutcome::Unfinished => "*",
        }
    }

    pub fn is_decided(self) -> bool {
        self != GameOutcome::Unfinished
    }

    /// +1 win, 0 draw, -1 loss for `color`. Unfinished games score 0.
    pub fn score(self, color: Color) -> f32 {
        let white = match self {
            GameOutcome::WhiteWins => 1.0,
            GameOutcome::BlackWins => -1.0,
            GameOutcome::Draw | GameOutcome::Unfinished => 0.0,
        };
        match color {
            Color::White => white,
            Color::Black => -white,
        }
    }
}

/// `gamma^moves_remaining * score`
pub fn discounted(score: f32, moves_remaining: u32, gamma: f32) -> f32 {
    gamma.powi(moves_remaining as i32) * score
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_result() {
        assert_eq!(GameOutcome::from_result("1-0").unwrap(), GameOutcome::WhiteWins);
        assert_eq!(GameOutcome::from_result("0-1").unwrap(), GameOutcome::BlackWins);
        assert_eq!(GameOutcome::from_result(" 1/2-1/2 ").unwrap(), GameOutcome::Draw);
        assert_eq!(GameOutcome::from_result("*").unwrap(), GameOutcome::Unfinished);
        assert!(matches!(
            GameOutcome::from_result("2-0"),
            Err(DatasetError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_score_perspective() {
        assert_eq!(GameOutcome::WhiteWins.score(Color::White), 1.0);
        assert_eq!(GameOutcome::WhiteWins.score(Color::Black), -1.0);
        assert_eq!(GameOutcome::BlackWins.score(Color::White), -1.0);
        assert_eq!(GameOutcome::Draw.score(Color::Black), 0.0);
        assert!(!GameOutcome::Unfinished.is_decided());
    }

    #[test]
    fn test_discounted() {
        assert_eq!(discounted(1.0, 0, GAMMA), 1.0);
        assert!((discounted(-1.0, 2, GAMMA) + 0.9801).abs() < 1e-6);
        assert_eq!(discounted(0.0, 10, GAMMA), 0.0);
    }

    #[test]
    fn test_result_text_round_trip() {
        for o in [
            GameOutcome::WhiteWins,
            GameOutcome::BlackWins,
            GameOutcome::Draw,
            GameOutcome::Unfinished,
        ] {
            assert_eq!(GameOutcome::from_result(o.as_str()).unwrap(), o);
        }
    }
}
