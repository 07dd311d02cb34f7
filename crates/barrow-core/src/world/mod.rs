//! The game session: context object, errors, endings.

pub mod context;
pub mod errors;

pub use context::Game;
pub use errors::{DoneHow, Ending, EngineError, EngineSignal, Killer, KillerMode};
