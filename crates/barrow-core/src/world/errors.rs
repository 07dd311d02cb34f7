//! Error and terminal-outcome types.
//!
//! Ordinary rule failures never surface here; they become in-fiction
//! messages and no-op outcomes. These types cover genuine lookup errors and
//! the one unwinding path the engine has: the game ending.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::monster::MonsterId;
use crate::object::ObjectId;

/// Recoverable engine errors, produced by entity lookups and validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("position ({x}, {y}) is outside the level")]
    OutOfBounds { x: i32, y: i32 },

    #[error("no object with id {0:?}")]
    UnknownObject(ObjectId),

    #[error("no monster with id {0:?}")]
    UnknownMonster(MonsterId),
}

/// How the fatal blow is phrased on the death line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KillerMode {
    /// "killed by a falling rock" / "killed by an arrow"
    ByAn,
    /// "killed by the wrath of ..." (no article added)
    By,
    /// The text stands alone ("petrified by a cockatrice").
    Plain,
}

/// The tagged reason for a death, shared by every fatal path so that death
/// messages and delayed-death bookkeeping stay consistent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Killer {
    pub mode: KillerMode,
    pub what: String,
}

impl Killer {
    pub fn by_an(what: impl Into<String>) -> Self {
        Self {
            mode: KillerMode::ByAn,
            what: what.into(),
        }
    }

    pub fn by(what: impl Into<String>) -> Self {
        Self {
            mode: KillerMode::By,
            what: what.into(),
        }
    }

    pub fn plain(what: impl Into<String>) -> Self {
        Self {
            mode: KillerMode::Plain,
            what: what.into(),
        }
    }

    /// Render the "killed by ..." clause for the death line.
    pub fn describe(&self) -> String {
        match self.mode {
            KillerMode::ByAn => {
                let article = match self.what.chars().next() {
                    Some(c) if "aeiouAEIOU".contains(c) => "an",
                    _ => "a",
                };
                format!("killed by {} {}", article, self.what)
            }
            KillerMode::By => format!("killed by {}", self.what),
            KillerMode::Plain => self.what.clone(),
        }
    }
}

/// The manner of the ending, distinct from who or what caused it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DoneHow {
    Died,
    Stoned,
    Drowned,
    Burned,
    Suffocated,
}

/// A finished game: routed through one path so save cleanup always runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ending {
    pub how: DoneHow,
    pub killer: Killer,
}

impl std::fmt::Display for Ending {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.killer.describe())
    }
}

/// Unwinds an in-progress turn back to the host. Resolvers return
/// `Result<_, EngineSignal>` and propagate with `?`; the host catches this
/// at the turn entry point.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineSignal {
    #[error("game over: {0}")]
    GameOver(Ending),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_killer_article_selection() {
        assert_eq!(Killer::by_an("arrow").describe(), "killed by an arrow");
        assert_eq!(
            Killer::by_an("falling rock").describe(),
            "killed by a falling rock"
        );
        assert_eq!(
            Killer::by("the wrath of Moloch").describe(),
            "killed by the wrath of Moloch"
        );
        assert_eq!(
            Killer::plain("petrified by a cockatrice").describe(),
            "petrified by a cockatrice"
        );
    }

    #[test]
    fn test_ending_serde_round_trip() {
        let ending = Ending {
            how: DoneHow::Burned,
            killer: Killer::by_an("fire trap"),
        };
        let json = serde_json::to_string(&ending).unwrap();
        let back: Ending = serde_json::from_str(&json).unwrap();
        assert_eq!(ending, back);
    }
}
