//! The player: attributes, role, intrinsics, pack.

use bitflags::bitflags;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use barrow_rng::GameRng;

use crate::object::{ArmorSlot, ObjKind, ObjLocation, Object, ObjectId, Skill, WornMask};

/// The six basic attributes. Plain 3..=25 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub str_: u8,
    pub dex: u8,
    pub con: u8,
    pub int: u8,
    pub wis: u8,
    pub cha: u8,
}

impl Default for Attributes {
    fn default() -> Attributes {
        Attributes { str_: 10, dex: 10, con: 10, int: 10, wis: 10, cha: 10 }
    }
}

impl Attributes {
    pub fn get(&self, which: Attr) -> u8 {
        match which {
            Attr::Str => self.str_,
            Attr::Dex => self.dex,
            Attr::Con => self.con,
            Attr::Int => self.int,
            Attr::Wis => self.wis,
            Attr::Cha => self.cha,
        }
    }

    pub fn set(&mut self, which: Attr, value: u8) {
        let v = value.clamp(3, 25);
        match which {
            Attr::Str => self.str_ = v,
            Attr::Dex => self.dex = v,
            Attr::Con => self.con = v,
            Attr::Int => self.int = v,
            Attr::Wis => self.wis = v,
            Attr::Cha => self.cha = v,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter)]
pub enum Attr {
    Str,
    Dex,
    Con,
    Int,
    Wis,
    Cha,
}

/// Character classes with distinct throwing behavior.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter, Default,
)]
pub enum Role {
    Barbarian,
    CaveDweller,
    Monk,
    Priest,
    Ranger,
    Rogue,
    Samurai,
    #[default]
    Valkyrie,
    Wizard,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter, Default,
)]
pub enum Race {
    #[default]
    Human,
    Elf,
    Dwarf,
    Gnome,
    Orc,
}

/// Weapon proficiency tiers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub enum SkillRank {
    #[default]
    Unskilled,
    Basic,
    Skilled,
    Expert,
}

bitflags! {
    /// Intrinsic properties. Timed conditions live in `PlayerTimers`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Properties: u32 {
        const FIRE_RES = 0x0000_0001;
        const COLD_RES = 0x0000_0002;
        const SLEEP_RES = 0x0000_0004;
        const SHOCK_RES = 0x0000_0008;
        const POISON_RES = 0x0000_0010;
        const ACID_RES = 0x0000_0020;
        const MAGIC_RES = 0x0000_0040;
        const STONE_RES = 0x0000_0080;
        const FREE_ACTION = 0x0000_0100;
        const SEE_INVIS = 0x0000_0200;
        const SEARCHING = 0x0000_0400;
        const LEVITATION = 0x0000_0800;
        const FLYING = 0x0000_1000;
        const FUMBLING = 0x0000_2000;
        const TELEPATHY = 0x0000_4000;
    }
}

impl Serialize for Properties {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u32(self.bits())
    }
}

impl<'de> Deserialize<'de> for Properties {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(Properties::from_bits_truncate(u32::deserialize(d)?))
    }
}

/// Countdown timers for the player's transient conditions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerTimers {
    pub blind: u16,
    pub confusion: u16,
    pub stun: u16,
    pub hallucination: u16,
    pub paralysis: u16,
    pub sleep: u16,
    pub levitation: u16,
    pub invisibility: u16,
    pub see_invis: u16,
    pub speed: u16,
}

/// What the player is currently held by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeldIn {
    BearTrap,
    Pit,
    Web,
}

/// The player character.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct You {
    pub x: i32,
    pub y: i32,
    pub hp: i32,
    pub hpmax: i32,
    pub pw: i32,
    pub pwmax: i32,
    pub level: u32,
    /// Highest experience level reached; lost levels restore up to this.
    pub levelmax: u32,
    pub exp: u32,
    pub attrs: Attributes,
    /// Ceiling each attribute restores to.
    pub attrs_max: Attributes,
    pub luck: i8,
    pub role: Role,
    pub race: Race,
    pub skills: HashMap<Skill, SkillRank>,
    pub intrinsics: Properties,
    pub timers: PlayerTimers,
    pub inventory: Vec<Object>,
    pub wielded: Option<ObjectId>,
    pub quivered: Option<ObjectId>,
    /// Punishment: chained to a heavy iron ball.
    pub punished: bool,
    pub ball: Option<ObjectId>,
    pub chain: Option<ObjectId>,
    /// Turns still held in place, with what holds us.
    pub trapped_turns: u16,
    pub held_in: Option<HeldIn>,
}

impl Default for You {
    fn default() -> You {
        You {
            x: 0,
            y: 0,
            hp: 16,
            hpmax: 16,
            pw: 2,
            pwmax: 2,
            level: 1,
            levelmax: 1,
            exp: 0,
            attrs: Attributes::default(),
            attrs_max: Attributes::default(),
            luck: 0,
            role: Role::default(),
            race: Race::default(),
            skills: HashMap::new(),
            intrinsics: Properties::empty(),
            timers: PlayerTimers::default(),
            inventory: Vec::new(),
            wielded: None,
            quivered: None,
            punished: false,
            ball: None,
            chain: None,
            trapped_turns: 0,
            held_in: None,
        }
    }
}

impl You {
    pub fn new(role: Role, race: Race) -> You {
        You { role, race, ..You::default() }
    }

    pub fn is_blind(&self) -> bool {
        self.timers.blind > 0
    }

    pub fn is_confused(&self) -> bool {
        self.timers.confusion > 0
    }

    pub fn is_stunned(&self) -> bool {
        self.timers.stun > 0
    }

    pub fn is_hallucinating(&self) -> bool {
        self.timers.hallucination > 0
    }

    pub fn can_move(&self) -> bool {
        self.timers.paralysis == 0 && self.timers.sleep == 0
    }

    /// Off the ground, one way or another.
    pub fn is_airborne(&self) -> bool {
        self.timers.levitation > 0
            || self
                .intrinsics
                .intersects(Properties::LEVITATION.union(Properties::FLYING))
    }

    pub fn resists_fire(&self) -> bool {
        self.intrinsics.contains(Properties::FIRE_RES)
    }

    pub fn resists_cold(&self) -> bool {
        self.intrinsics.contains(Properties::COLD_RES)
    }

    pub fn resists_sleep(&self) -> bool {
        self.intrinsics.contains(Properties::SLEEP_RES)
    }

    pub fn resists_poison(&self) -> bool {
        self.intrinsics.contains(Properties::POISON_RES)
    }

    pub fn resists_magic(&self) -> bool {
        self.intrinsics.contains(Properties::MAGIC_RES)
    }

    pub fn has_free_action(&self) -> bool {
        self.intrinsics.contains(Properties::FREE_ACTION)
    }

    pub fn skill_rank(&self, skill: Skill) -> SkillRank {
        self.skills.get(&skill).copied().unwrap_or_default()
    }

    /// Armor class; lower is better. 10 base, minus worn armor and
    /// enchantment, minus a worn ring of protection.
    pub fn uac(&self) -> i32 {
        let mut ac = 10;
        for obj in &self.inventory {
            if obj.is_worn_armor() {
                ac -= i32::from(obj.kind.template().ac) + i32::from(obj.spe);
            } else if obj.worn.contains(WornMask::RING)
                && obj.kind == ObjKind::RingOfProtection
            {
                ac -= i32::from(obj.spe);
            }
        }
        ac
    }

    pub fn carried(&self, id: ObjectId) -> Option<&Object> {
        self.inventory.iter().find(|o| o.id == id)
    }

    pub fn carried_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        self.inventory.iter_mut().find(|o| o.id == id)
    }

    pub fn wielded_item(&self) -> Option<&Object> {
        self.wielded.and_then(|id| self.carried(id))
    }

    pub fn quivered_item(&self) -> Option<&Object> {
        self.quivered.and_then(|id| self.carried(id))
    }

    pub fn worn_in(&self, slot: ArmorSlot) -> Option<&Object> {
        self.inventory
            .iter()
            .find(|o| o.is_worn_armor() && o.kind.template().slot == Some(slot))
    }

    /// Take an item into the pack, merging into an existing stack when
    /// possible. Returns the id the item ended up under.
    pub fn add_to_inventory(&mut self, mut obj: Object) -> ObjectId {
        obj.loc = ObjLocation::Invent;
        if let Some(stack) = self.inventory.iter_mut().find(|o| o.mergable(&obj)) {
            let id = stack.id;
            stack.absorb(obj);
            return id;
        }
        let id = obj.id;
        self.inventory.push(obj);
        id
    }

    /// Remove an item from the pack, unreadying it first.
    pub fn remove_from_inventory(&mut self, id: ObjectId) -> Option<Object> {
        let idx = self.inventory.iter().position(|o| o.id == id)?;
        if self.wielded == Some(id) {
            self.wielded = None;
        }
        if self.quivered == Some(id) {
            self.quivered = None;
        }
        let mut obj = self.inventory.remove(idx);
        obj.worn = WornMask::empty();
        obj.loc = ObjLocation::Free;
        Some(obj)
    }

    pub fn gold(&self) -> u32 {
        self.inventory
            .iter()
            .filter(|o| o.kind == ObjKind::Gold)
            .map(|o| o.quan)
            .sum()
    }

    pub fn change_luck(&mut self, delta: i8) {
        self.luck = self.luck.saturating_add(delta).clamp(-13, 13);
    }

    pub fn heal(&mut self, amount: i32) {
        self.hp = (self.hp + amount).min(self.hpmax);
    }

    pub fn take_damage(&mut self, dmg: i32) {
        self.hp -= dmg;
    }

    /// Gain an experience level.
    pub fn pluslvl(&mut self, rng: &mut GameRng) {
        self.level += 1;
        self.levelmax = self.levelmax.max(self.level);
        let hp_gain = rng.rnd(8) as i32;
        self.hpmax += hp_gain;
        self.hp += hp_gain;
        let pw_gain = rng.rnd(3) as i32;
        self.pwmax += pw_gain;
        self.pw += pw_gain;
    }

    /// Lose an experience level, to a floor of 1.
    pub fn losexp(&mut self, rng: &mut GameRng) {
        if self.level <= 1 {
            return;
        }
        self.level -= 1;
        let hp_loss = rng.rnd(8) as i32;
        self.hpmax = (self.hpmax - hp_loss).max(1);
        self.hp = self.hp.min(self.hpmax);
        let pw_loss = rng.rnd(3) as i32;
        self.pwmax = (self.pwmax - pw_loss).max(0);
        self.pw = self.pw.min(self.pwmax);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{mksobj, Buc};

    fn worn(kind: ObjKind, spe: i8, id: u32) -> Object {
        let mut rng = GameRng::new(1);
        let mut obj = mksobj(kind, false, &mut rng, ObjectId(id));
        obj.spe = spe;
        obj.worn = match kind.template().slot {
            Some(ArmorSlot::Body) => WornMask::BODY,
            Some(ArmorSlot::Helmet) => WornMask::HELMET,
            Some(ArmorSlot::Shield) => WornMask::SHIELD,
            Some(ArmorSlot::Gloves) => WornMask::GLOVES,
            Some(ArmorSlot::Cloak) => WornMask::CLOAK,
            None => WornMask::RING,
        };
        obj
    }

    #[test]
    fn test_uac_counts_worn_armor() {
        let mut you = You::default();
        assert_eq!(you.uac(), 10);
        you.inventory.push(worn(ObjKind::LeatherArmor, 1, 1));
        assert_eq!(you.uac(), 7);
        you.inventory.push(worn(ObjKind::SmallShield, 0, 2));
        assert_eq!(you.uac(), 6);
        you.inventory.push(worn(ObjKind::RingOfProtection, 2, 3));
        assert_eq!(you.uac(), 4);
    }

    #[test]
    fn test_unworn_armor_does_not_count() {
        let mut you = You::default();
        let mut rng = GameRng::new(1);
        you.inventory.push(mksobj(ObjKind::PlateMail, false, &mut rng, ObjectId(1)));
        assert_eq!(you.uac(), 10);
    }

    #[test]
    fn test_inventory_merges_stacks() {
        let mut you = You::default();
        let mut rng = GameRng::new(1);
        let mut a = mksobj(ObjKind::Dart, false, &mut rng, ObjectId(1));
        a.quan = 5;
        let mut b = mksobj(ObjKind::Dart, false, &mut rng, ObjectId(2));
        b.quan = 3;
        let id_a = you.add_to_inventory(a);
        let id_b = you.add_to_inventory(b);
        assert_eq!(id_a, id_b);
        assert_eq!(you.inventory.len(), 1);
        assert_eq!(you.inventory[0].quan, 8);
    }

    #[test]
    fn test_remove_unwields() {
        let mut you = You::default();
        let mut rng = GameRng::new(1);
        let obj = mksobj(ObjKind::Dagger, false, &mut rng, ObjectId(7));
        let id = you.add_to_inventory(obj);
        you.wielded = Some(id);
        let removed = you.remove_from_inventory(id);
        assert!(removed.is_some());
        assert_eq!(you.wielded, None);
    }

    #[test]
    fn test_level_gain_and_loss() {
        let mut you = You::default();
        let mut rng = GameRng::new(42);
        let hp0 = you.hpmax;
        you.pluslvl(&mut rng);
        assert_eq!(you.level, 2);
        assert_eq!(you.levelmax, 2);
        assert!(you.hpmax > hp0);
        you.losexp(&mut rng);
        assert_eq!(you.level, 1);
        assert_eq!(you.levelmax, 2);
    }

    #[test]
    fn test_luck_clamps() {
        let mut you = You::default();
        you.luck = 12;
        you.change_luck(5);
        assert_eq!(you.luck, 13);
        you.luck = -12;
        you.change_luck(-5);
        assert_eq!(you.luck, -13);
    }

    #[test]
    fn test_gold_total() {
        let mut you = You::default();
        let mut gold = Object::new(ObjectId(1), ObjKind::Gold);
        gold.quan = 40;
        you.add_to_inventory(gold);
        assert_eq!(you.gold(), 40);
        let plain = Object::new(ObjectId(2), ObjKind::Apple);
        assert_eq!(plain.buc, Buc::Uncursed);
        you.add_to_inventory(plain);
        assert_eq!(you.gold(), 40);
    }
}
