//! Potion and scroll effects.

pub mod potion;
pub mod scroll;

pub use potion::{dopotion, mquaff, potionhit};
pub use scroll::doscroll;

/// What applying an effect revealed to the actor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EffectFeedback {
    /// The actor noticed anything at all happen.
    pub perceptible: bool,
    /// The actor now knows what kind of item this was.
    pub learned: bool,
}

impl EffectFeedback {
    pub fn obvious() -> EffectFeedback {
        EffectFeedback { perceptible: true, learned: true }
    }

    pub fn felt() -> EffectFeedback {
        EffectFeedback { perceptible: true, learned: false }
    }

    pub fn nothing() -> EffectFeedback {
        EffectFeedback::default()
    }
}
