//! Monster instances.

use serde::{Deserialize, Serialize};

use crate::monster::permonst::{Species, SpeciesFlags};
use crate::object::{Object, ObjectId};

/// Stable identifier for a monster instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonsterId(pub u32);

impl MonsterId {
    pub const NONE: MonsterId = MonsterId(0);

    pub fn next(self) -> MonsterId {
        MonsterId(self.0 + 1)
    }
}

/// Countdown timers for transient conditions. Zero means not active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTimers {
    pub sleep: u16,
    pub paralysis: u16,
    pub confusion: u16,
    pub stun: u16,
    pub blind: u16,
    pub flee: u16,
    pub speed: u16,
}

impl StatusTimers {
    pub fn tick(&mut self) {
        self.sleep = self.sleep.saturating_sub(1);
        self.paralysis = self.paralysis.saturating_sub(1);
        self.confusion = self.confusion.saturating_sub(1);
        self.stun = self.stun.saturating_sub(1);
        self.blind = self.blind.saturating_sub(1);
        self.flee = self.flee.saturating_sub(1);
        self.speed = self.speed.saturating_sub(1);
    }
}

/// One live monster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Monster {
    pub id: MonsterId,
    pub species: Species,
    pub x: i32,
    pub y: i32,
    pub hp: i32,
    pub hpmax: i32,
    pub level: u8,
    pub peaceful: bool,
    pub tame: bool,
    pub cancelled: bool,
    pub invisible: bool,
    /// Turns still held by a trap at this cell. Zero means free.
    pub trapped_turns: u16,
    pub timers: StatusTimers,
    pub inventory: Vec<Object>,
    pub quest_leader: bool,
}

impl Monster {
    pub fn new(id: MonsterId, species: Species, x: i32, y: i32, hp: i32, level: u8) -> Monster {
        Monster {
            id,
            species,
            x,
            y,
            hp,
            hpmax: hp,
            level,
            peaceful: species.flags().contains(SpeciesFlags::PEACEFUL),
            tame: false,
            cancelled: false,
            invisible: false,
            trapped_turns: 0,
            timers: StatusTimers::default(),
            inventory: Vec::new(),
            quest_leader: false,
        }
    }

    pub fn name(&self) -> &'static str {
        self.species.name()
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn is_asleep(&self) -> bool {
        self.timers.sleep > 0
    }

    pub fn is_confused(&self) -> bool {
        self.timers.confusion > 0
    }

    pub fn can_act(&self) -> bool {
        self.timers.sleep == 0 && self.timers.paralysis == 0
    }

    pub fn is_hostile(&self) -> bool {
        !self.peaceful && !self.tame
    }

    /// Effective armor class.
    pub fn ac(&self) -> i32 {
        i32::from(self.species.template().ac)
    }

    pub fn wake(&mut self) {
        self.timers.sleep = 0;
    }

    /// Hostility after taking a hit; peaceful monsters turn on their
    /// attacker, tame ones stay tame.
    pub fn provoke(&mut self) {
        if !self.tame {
            self.peaceful = false;
        }
    }

    pub fn take_damage(&mut self, dmg: i32) {
        self.hp -= dmg;
    }

    pub fn heal(&mut self, amount: i32) {
        self.hp = (self.hp + amount).min(self.hpmax);
    }

    /// Carried item by id.
    pub fn carried(&self, id: ObjectId) -> Option<&Object> {
        self.inventory.iter().find(|o| o.id == id)
    }

    pub fn remove_carried(&mut self, id: ObjectId) -> Option<Object> {
        let idx = self.inventory.iter().position(|o| o.id == id)?;
        Some(self.inventory.remove(idx))
    }
}
