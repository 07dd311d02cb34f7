//! The interface the engine calls on its embedding display layer.
//!
//! The engine never renders. It asks for input through blocking prompts
//! (`None` always means the player cancelled) and reports changes through
//! `notify` and `request_redraw`.

use std::collections::VecDeque;

use crate::action::Direction;
use crate::monster::Species;
use crate::object::ObjectId;

/// Who witnessed the event a message describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Witness {
    /// The player did it or it happened to them.
    Player,
    /// A monster the player can currently see.
    Seen,
    /// Something happened out of sight (sounds, hunches).
    Unseen,
}

/// Message weight, used by front ends for coloring and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    ActionOk,
    StatusGood,
    StatusBad,
    Debug,
}

/// Routing tag attached to every message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channel {
    pub witness: Witness,
    pub severity: Severity,
}

impl Channel {
    pub const fn player(severity: Severity) -> Self {
        Self {
            witness: Witness::Player,
            severity,
        }
    }

    pub const fn seen(severity: Severity) -> Self {
        Self {
            witness: Witness::Seen,
            severity,
        }
    }

    pub const fn unseen(severity: Severity) -> Self {
        Self {
            witness: Witness::Unseen,
            severity,
        }
    }

    pub const fn debug() -> Self {
        Self {
            witness: Witness::Player,
            severity: Severity::Debug,
        }
    }
}

/// Part of the display that went stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Cell { x: i8, y: i8 },
    Full,
}

/// Services the engine consumes from the front end. Prompts block; a `None`
/// answer is a cancel and the engine guarantees it unwinds any partial state.
pub trait Ui {
    fn choose_direction(&mut self, prompt: &str) -> Option<Direction>;

    /// Pick one of the offered items. The engine pre-filters the candidates.
    fn choose_object(&mut self, prompt: &str, choices: &[ObjectId]) -> Option<ObjectId>;

    fn choose_species(&mut self, prompt: &str) -> Option<Species>;

    fn notify(&mut self, message: &str, channel: Channel);

    fn request_redraw(&mut self, region: Region);
}

/// A `Ui` that answers prompts from pre-loaded scripts and records
/// everything the engine tells it. Used by tests and headless drivers.
#[derive(Debug, Default)]
pub struct ScriptedUi {
    pub directions: VecDeque<Option<Direction>>,
    pub object_picks: VecDeque<Option<ObjectId>>,
    pub species_picks: VecDeque<Option<Species>>,
    pub messages: Vec<(String, Channel)>,
    pub redraws: Vec<Region>,
}

impl ScriptedUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_direction(mut self, dir: Option<Direction>) -> Self {
        self.directions.push_back(dir);
        self
    }

    /// True if any recorded message contains the fragment.
    pub fn saw(&self, fragment: &str) -> bool {
        self.messages.iter().any(|(m, _)| m.contains(fragment))
    }

    /// All message texts on the given witness tier.
    pub fn tier(&self, witness: Witness) -> Vec<&str> {
        self.messages
            .iter()
            .filter(|(_, c)| c.witness == witness)
            .map(|(m, _)| m.as_str())
            .collect()
    }
}

impl Ui for ScriptedUi {
    fn choose_direction(&mut self, _prompt: &str) -> Option<Direction> {
        self.directions.pop_front().flatten()
    }

    fn choose_object(&mut self, _prompt: &str, choices: &[ObjectId]) -> Option<ObjectId> {
        match self.object_picks.pop_front() {
            Some(pick) => pick.filter(|id| choices.contains(id)),
            None => choices.first().copied(),
        }
    }

    fn choose_species(&mut self, _prompt: &str) -> Option<Species> {
        self.species_picks.pop_front().flatten()
    }

    fn notify(&mut self, message: &str, channel: Channel) {
        self.messages.push((message.to_string(), channel));
    }

    fn request_redraw(&mut self, region: Region) {
        self.redraws.push(region);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_ui_answers_in_order() {
        let mut ui = ScriptedUi::new()
            .with_direction(Some(Direction::North))
            .with_direction(None);
        assert_eq!(ui.choose_direction("?"), Some(Direction::North));
        assert_eq!(ui.choose_direction("?"), None);
        assert_eq!(ui.choose_direction("?"), None);
    }

    #[test]
    fn test_scripted_ui_records_messages() {
        let mut ui = ScriptedUi::new();
        ui.notify("You feel fine.", Channel::player(Severity::Info));
        ui.notify("It growls.", Channel::unseen(Severity::StatusBad));
        assert!(ui.saw("feel fine"));
        assert_eq!(ui.tier(Witness::Unseen), vec!["It growls."]);
    }
}
