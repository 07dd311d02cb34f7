//! Monsters: species templates, instances, creation, census.

mod makemon;
mod monst;
mod permonst;

pub use makemon::{makemon, mondead, pick_species, Vitals, VitalsRegistry, EXTINCT_AT};
pub use monst::{Monster, MonsterId, StatusTimers};
pub use permonst::{MonsterTemplate, Size, Species, SpeciesFlags};
