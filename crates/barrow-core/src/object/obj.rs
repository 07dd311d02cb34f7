//! Item instances and their mutable state.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::monster::{MonsterId, Species};
use crate::object::objclass::{ObjClass, ObjKind, Material};

/// Stable identifier for an item instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

impl ObjectId {
    pub const NONE: ObjectId = ObjectId(0);

    pub fn next(self) -> ObjectId {
        ObjectId(self.0 + 1)
    }
}

/// Blessed/uncursed/cursed status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Buc {
    Blessed,
    #[default]
    Uncursed,
    Cursed,
}

impl Buc {
    pub fn sign(self) -> i32 {
        match self {
            Buc::Blessed => 1,
            Buc::Uncursed => 0,
            Buc::Cursed => -1,
        }
    }
}

bitflags! {
    /// Where an item is worn or readied.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct WornMask: u16 {
        const BODY = 0x0001;
        const CLOAK = 0x0002;
        const HELMET = 0x0004;
        const SHIELD = 0x0008;
        const GLOVES = 0x0010;
        const RING = 0x0020;
        const WIELDED = 0x0040;
        const QUIVERED = 0x0080;
        const BALL = 0x0100;
        const CHAIN = 0x0200;
    }
}

impl WornMask {
    pub const ARMOR: WornMask = WornMask::BODY
        .union(WornMask::CLOAK)
        .union(WornMask::HELMET)
        .union(WornMask::SHIELD)
        .union(WornMask::GLOVES);
}

impl Serialize for WornMask {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u16(self.bits())
    }
}

impl<'de> Deserialize<'de> for WornMask {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(WornMask::from_bits_truncate(u16::deserialize(d)?))
    }
}

bitflags! {
    /// Elemental charges an item can carry.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ItemProps: u8 {
        const FLAME = 0x01;
        const FROST = 0x02;
    }
}

impl Serialize for ItemProps {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u8(self.bits())
    }
}

impl<'de> Deserialize<'de> for ItemProps {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(ItemProps::from_bits_truncate(u8::deserialize(d)?))
    }
}

/// Where an item currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjLocation {
    /// On the map at a cell.
    Floor { x: i32, y: i32 },
    /// In the player's pack.
    Invent,
    /// Carried by a monster.
    MonInvent(MonsterId),
    /// Inside a container item.
    Inside(ObjectId),
    /// Detached, mid-flight or being moved.
    Free,
}

/// Named unique items with special rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Artifact {
    Mjollnir,
    QuestTalisman,
}

/// One item instance. Stacks share one `Object` with `quan > 1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Object {
    pub id: ObjectId,
    pub kind: ObjKind,
    pub quan: u32,
    /// Enchantment, or charges for chargeable kinds.
    pub spe: i8,
    pub buc: Buc,
    pub buc_known: bool,
    /// Enchantment and charge count known.
    pub known: bool,
    /// Appearance seen by the player.
    pub dknown: bool,
    /// Burn/rust damage, 0..=3.
    pub eroded: u8,
    /// Corrode/rot damage, 0..=3.
    pub eroded2: u8,
    pub erodeproof: bool,
    pub locked: bool,
    pub trapped: bool,
    pub broken: bool,
    pub poisoned: bool,
    pub greased: bool,
    pub unpaid: bool,
    pub no_charge: bool,
    pub lit: bool,
    /// Times this item has been recharged.
    pub recharged: u8,
    pub oname: Option<String>,
    pub artifact: Option<Artifact>,
    pub props: ItemProps,
    /// For corpses and statues.
    pub corpse_species: Option<Species>,
    pub worn: WornMask,
    pub loc: ObjLocation,
}

impl Object {
    /// A plain, uncursed, unenchanted instance.
    pub fn new(id: ObjectId, kind: ObjKind) -> Object {
        Object {
            id,
            kind,
            quan: 1,
            spe: 0,
            buc: Buc::Uncursed,
            buc_known: false,
            known: false,
            dknown: false,
            eroded: 0,
            eroded2: 0,
            erodeproof: false,
            locked: false,
            trapped: false,
            broken: false,
            poisoned: false,
            greased: false,
            unpaid: false,
            no_charge: false,
            lit: false,
            recharged: 0,
            oname: None,
            artifact: None,
            props: ItemProps::empty(),
            corpse_species: None,
            worn: WornMask::empty(),
            loc: ObjLocation::Free,
        }
    }

    pub fn is_cursed(&self) -> bool {
        self.buc == Buc::Cursed
    }

    pub fn is_blessed(&self) -> bool {
        self.buc == Buc::Blessed
    }

    pub fn bless(&mut self) {
        self.buc = Buc::Blessed;
    }

    pub fn curse(&mut self) {
        self.buc = Buc::Cursed;
    }

    pub fn uncurse(&mut self) {
        self.buc = Buc::Uncursed;
    }

    /// Worst of the two erosion tracks.
    pub fn greatest_erosion(&self) -> i32 {
        i32::from(self.eroded.max(self.eroded2))
    }

    /// Weight of this stack, not counting container contents.
    pub fn own_weight(&self) -> u32 {
        if self.kind == ObjKind::Gold {
            return (self.quan + 50) / 100;
        }
        u32::from(self.kind.template().weight) * self.quan
    }

    pub fn is_weapon(&self) -> bool {
        self.kind.class() == ObjClass::Weapon
    }

    pub fn is_armor(&self) -> bool {
        self.kind.class() == ObjClass::Armor
    }

    pub fn is_container(&self) -> bool {
        matches!(self.kind, ObjKind::Sack | ObjKind::LargeBox | ObjKind::Chest)
    }

    pub fn is_worn_armor(&self) -> bool {
        self.is_armor() && self.worn.intersects(WornMask::ARMOR)
    }

    /// Shatters when it strikes something solid.
    pub fn breaks_on_impact(&self) -> bool {
        self.artifact.is_none()
            && self.kind.template().material == Material::Glass
            && self.kind.class() != ObjClass::Gem
    }

    /// Whether `other` can be absorbed into this stack.
    pub fn mergable(&self, other: &Object) -> bool {
        self.kind == other.kind
            && self.spe == other.spe
            && self.buc == other.buc
            && self.buc_known == other.buc_known
            && self.known == other.known
            && self.dknown == other.dknown
            && self.eroded == other.eroded
            && self.eroded2 == other.eroded2
            && self.erodeproof == other.erodeproof
            && self.poisoned == other.poisoned
            && self.greased == other.greased
            && self.unpaid == other.unpaid
            && self.no_charge == other.no_charge
            && self.broken == other.broken
            && !self.lit
            && !other.lit
            && self.oname == other.oname
            && self.artifact.is_none()
            && other.artifact.is_none()
            && self.props == other.props
            && self.corpse_species == other.corpse_species
            && self.worn.is_empty()
            && other.worn.is_empty()
            && !self.is_container()
    }

    /// Absorb `other` into this stack. Caller checked `mergable`.
    pub fn absorb(&mut self, other: Object) {
        self.quan += other.quan;
    }

    /// Detach `num` items into a new stack carrying `id`.
    ///
    /// Caller guarantees `0 < num < self.quan`.
    pub fn split_off(&mut self, num: u32, id: ObjectId) -> Object {
        debug_assert!(num > 0 && num < self.quan);
        self.quan -= num;
        let mut part = self.clone();
        part.id = id;
        part.quan = num;
        part.worn = WornMask::empty();
        part.loc = ObjLocation::Free;
        part
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::objclass::PotionKind;

    #[test]
    fn test_merge_requires_matching_state() {
        let a = Object::new(ObjectId(1), ObjKind::Arrow);
        let mut b = Object::new(ObjectId(2), ObjKind::Arrow);
        assert!(a.mergable(&b));
        b.spe = 1;
        assert!(!a.mergable(&b));
        b.spe = 0;
        b.poisoned = true;
        assert!(!a.mergable(&b));
    }

    #[test]
    fn test_split_preserves_total() {
        let mut stack = Object::new(ObjectId(1), ObjKind::Dart);
        stack.quan = 7;
        let part = stack.split_off(3, ObjectId(2));
        assert_eq!(stack.quan, 4);
        assert_eq!(part.quan, 3);
        assert_eq!(part.kind, ObjKind::Dart);
        assert_eq!(part.id, ObjectId(2));
    }

    #[test]
    fn test_gold_weight_rounds() {
        let mut gold = Object::new(ObjectId(1), ObjKind::Gold);
        gold.quan = 49;
        assert_eq!(gold.own_weight(), 0);
        gold.quan = 150;
        assert_eq!(gold.own_weight(), 2);
    }

    #[test]
    fn test_breaks_on_impact() {
        let potion = Object::new(ObjectId(1), ObjKind::Potion(PotionKind::Healing));
        assert!(potion.breaks_on_impact());
        let glass_gem = Object::new(ObjectId(2), ObjKind::WorthlessGlass);
        assert!(!glass_gem.breaks_on_impact());
        let dagger = Object::new(ObjectId(3), ObjKind::Dagger);
        assert!(!dagger.breaks_on_impact());
    }

    #[test]
    fn test_greatest_erosion() {
        let mut obj = Object::new(ObjectId(1), ObjKind::Arrow);
        obj.eroded = 1;
        obj.eroded2 = 3;
        assert_eq!(obj.greatest_erosion(), 3);
    }
}
