//! Discrete turn actions: requests, outcomes, and the throw resolver.

mod throw;

pub use throw::{dothrow, mthrow, multishot_count, throw_range, ThrowOutcome};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::monster::MonsterId;
use crate::object::ObjectId;

/// A compass direction, or the actor's own square.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Direction {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
    /// Zero vector; most actions reject it.
    Here,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::NorthEast => (1, -1),
            Direction::NorthWest => (-1, -1),
            Direction::SouthEast => (1, 1),
            Direction::SouthWest => (-1, 1),
            Direction::Here => (0, 0),
        }
    }

    pub fn is_zero(self) -> bool {
        self == Direction::Here
    }

    /// Direction most closely matching a delta. `(0, 0)` maps to `Here`.
    pub fn from_delta(dx: i32, dy: i32) -> Direction {
        match (dx.signum(), dy.signum()) {
            (0, -1) => Direction::North,
            (0, 1) => Direction::South,
            (1, 0) => Direction::East,
            (-1, 0) => Direction::West,
            (1, -1) => Direction::NorthEast,
            (-1, -1) => Direction::NorthWest,
            (1, 1) => Direction::SouthEast,
            (-1, 1) => Direction::SouthWest,
            _ => Direction::Here,
        }
    }
}

/// Who is performing an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Actor {
    Player,
    Monster(MonsterId),
}

impl Actor {
    pub fn is_player(self) -> bool {
        self == Actor::Player
    }
}

/// One discrete turn-action, as handed to a resolver. Ephemeral; never
/// persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionRequest {
    pub actor: Actor,
    pub item: ObjectId,
    pub target: Option<MonsterId>,
    pub dir: Option<Direction>,
    /// Explicit cap on multishot count, if the player named one.
    pub limit: Option<u32>,
}

impl ActionRequest {
    pub fn throw(item: ObjectId) -> ActionRequest {
        ActionRequest {
            actor: Actor::Player,
            item,
            target: None,
            dir: None,
            limit: None,
        }
    }

    pub fn with_dir(mut self, dir: Direction) -> ActionRequest {
        self.dir = Some(dir);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> ActionRequest {
        self.limit = Some(limit);
        self
    }
}

/// How a resolved action turned out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The action ran and the turn is spent.
    Done,
    /// The actor backed out before anything happened.
    Cancelled,
    /// The rules refused the action; no turn spent.
    Refused,
}
