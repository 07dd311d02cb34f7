//! Species templates.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::EnumIter;

/// Body size, used for damage dice selection and trap effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Size {
    Tiny,
    Small,
    Medium,
    Large,
    Huge,
}

bitflags! {
    /// Species capabilities and resistances.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SpeciesFlags: u32 {
        const FLIES = 0x0000_0001;
        const SWIMS = 0x0000_0002;
        const AMPHIBIOUS = 0x0000_0004;
        const UNDEAD = 0x0000_0008;
        const MINDLESS = 0x0000_0010;
        const ANIMAL = 0x0000_0020;
        const NOHANDS = 0x0000_0040;
        const POISON_RES = 0x0000_0080;
        const FIRE_RES = 0x0000_0100;
        const COLD_RES = 0x0000_0200;
        const SLEEP_RES = 0x0000_0400;
        const SHOCK_RES = 0x0000_0800;
        const ACID_RES = 0x0000_1000;
        const STONE_RES = 0x0000_2000;
        const MAGIC_RES = 0x0000_4000;
        /// Turns victims to stone on touch.
        const PETRIFIES = 0x0000_8000;
        /// Never leaves a corpse.
        const NOCORPSE = 0x0001_0000;
        /// Exempt from random generation.
        const NOGEN = 0x0002_0000;
        /// Cannot be genocided.
        const NOGENO = 0x0004_0000;
        /// Generated peaceful unless provoked.
        const PEACEFUL = 0x0008_0000;
        /// Attracted to gold and gems.
        const COVETS_GOLD = 0x0010_0000;
    }
}

impl Serialize for SpeciesFlags {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u32(self.bits())
    }
}

impl<'de> Deserialize<'de> for SpeciesFlags {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(SpeciesFlags::from_bits_truncate(u32::deserialize(d)?))
    }
}

/// Every monster species the engine knows.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, PartialOrd, Ord,
)]
pub enum Species {
    GridBug,
    Newt,
    SewerRat,
    GiantRat,
    Jackal,
    Kobold,
    LargeKobold,
    Gnome,
    GnomeLord,
    GnomeKing,
    Dwarf,
    DwarfKing,
    HillOrc,
    Imp,
    FloatingEye,
    GiantAnt,
    SoldierAnt,
    FireAnt,
    KillerBee,
    QueenBee,
    Wolf,
    Warg,
    PitViper,
    Ogre,
    OgreKing,
    Troll,
    Leprechaun,
    GiantEel,
    Lichen,
    RedMold,
    HumanZombie,
    Ghoul,
    Wraith,
    Ghost,
    Vampire,
    Lich,
    Soldier,
    Sergeant,
    Lieutenant,
    Captain,
    Chickatrice,
    Cockatrice,
    WhiteUnicorn,
    GrayUnicorn,
    BlackUnicorn,
    AlignedPriest,
    Shopkeeper,
}

/// Read-only description of one species.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonsterTemplate {
    pub name: &'static str,
    pub symbol: char,
    /// Base level; hit dice and difficulty gating key off this.
    pub level: u8,
    pub speed: u8,
    pub ac: i8,
    pub size: Size,
    pub flags: SpeciesFlags,
    /// Random-generation weight. Zero only for `NOGEN` species.
    pub freq: u8,
    /// Corpse weight.
    pub weight: u16,
}

const fn tmpl(
    name: &'static str,
    symbol: char,
    level: u8,
    speed: u8,
    ac: i8,
    size: Size,
    flags: SpeciesFlags,
    freq: u8,
    weight: u16,
) -> MonsterTemplate {
    MonsterTemplate { name, symbol, level, speed, ac, size, flags, freq, weight }
}

impl Species {
    pub fn template(self) -> MonsterTemplate {
        use SpeciesFlags as F;
        match self {
            Species::GridBug => tmpl(
                "grid bug", 'x', 0, 12, 9, Size::Tiny,
                F::ANIMAL.union(F::NOHANDS).union(F::SHOCK_RES), 3, 15,
            ),
            Species::Newt => tmpl(
                "newt", ':', 0, 6, 8, Size::Tiny,
                F::ANIMAL.union(F::NOHANDS).union(F::SWIMS).union(F::AMPHIBIOUS), 5, 10,
            ),
            Species::SewerRat => tmpl(
                "sewer rat", 'r', 0, 12, 7, Size::Tiny,
                F::ANIMAL.union(F::NOHANDS), 7, 20,
            ),
            Species::GiantRat => tmpl(
                "giant rat", 'r', 1, 10, 7, Size::Small,
                F::ANIMAL.union(F::NOHANDS), 6, 30,
            ),
            Species::Jackal => tmpl(
                "jackal", 'd', 0, 12, 7, Size::Small,
                F::ANIMAL.union(F::NOHANDS), 6, 300,
            ),
            Species::Kobold => tmpl(
                "kobold", 'k', 0, 6, 10, Size::Small,
                F::POISON_RES, 5, 400,
            ),
            Species::LargeKobold => tmpl(
                "large kobold", 'k', 1, 6, 10, Size::Small,
                F::POISON_RES, 4, 450,
            ),
            Species::Gnome => tmpl("gnome", 'G', 1, 6, 10, Size::Small, F::empty(), 5, 650),
            Species::GnomeLord => {
                tmpl("gnome lord", 'G', 2, 8, 10, Size::Small, F::empty(), 3, 700)
            }
            Species::GnomeKing => tmpl(
                "gnome king", 'G', 3, 10, 10, Size::Small, F::NOGEN, 0, 750,
            ),
            Species::Dwarf => tmpl("dwarf", 'h', 2, 6, 10, Size::Medium, F::empty(), 4, 900),
            Species::DwarfKing => tmpl(
                "dwarf king", 'h', 6, 6, 10, Size::Medium, F::NOGEN, 0, 900,
            ),
            Species::HillOrc => tmpl("hill orc", 'o', 1, 9, 10, Size::Medium, F::empty(), 5, 1000),
            Species::Imp => tmpl(
                "imp", 'i', 3, 12, 2, Size::Tiny,
                F::NOCORPSE, 2, 20,
            ),
            Species::FloatingEye => tmpl(
                "floating eye", 'e', 2, 1, 9, Size::Small,
                F::FLIES.union(F::NOHANDS).union(F::AMPHIBIOUS), 3, 10,
            ),
            Species::GiantAnt => tmpl(
                "giant ant", 'a', 2, 18, 3, Size::Tiny,
                F::ANIMAL.union(F::NOHANDS), 4, 10,
            ),
            Species::SoldierAnt => tmpl(
                "soldier ant", 'a', 3, 18, 3, Size::Tiny,
                F::ANIMAL.union(F::NOHANDS).union(F::POISON_RES), 3, 20,
            ),
            Species::FireAnt => tmpl(
                "fire ant", 'a', 3, 18, 3, Size::Tiny,
                F::ANIMAL.union(F::NOHANDS).union(F::FIRE_RES), 3, 30,
            ),
            Species::KillerBee => tmpl(
                "killer bee", 'a', 1, 18, -1, Size::Tiny,
                F::ANIMAL.union(F::NOHANDS).union(F::FLIES).union(F::POISON_RES), 4, 5,
            ),
            Species::QueenBee => tmpl(
                "queen bee", 'a', 9, 24, -4, Size::Tiny,
                F::ANIMAL
                    .union(F::NOHANDS)
                    .union(F::FLIES)
                    .union(F::POISON_RES)
                    .union(F::NOGEN),
                0, 5,
            ),
            Species::Wolf => tmpl(
                "wolf", 'd', 5, 12, 4, Size::Medium,
                F::ANIMAL.union(F::NOHANDS), 4, 500,
            ),
            Species::Warg => tmpl(
                "warg", 'd', 7, 12, 4, Size::Medium,
                F::ANIMAL.union(F::NOHANDS), 2, 850,
            ),
            Species::PitViper => tmpl(
                "pit viper", 'S', 6, 15, 2, Size::Medium,
                F::ANIMAL.union(F::NOHANDS).union(F::SWIMS).union(F::POISON_RES), 2, 100,
            ),
            Species::Ogre => tmpl("ogre", 'O', 5, 10, 5, Size::Large, F::empty(), 3, 1600),
            Species::OgreKing => tmpl(
                "ogre king", 'O', 9, 14, 4, Size::Large, F::NOGEN, 0, 1700,
            ),
            Species::Troll => tmpl("troll", 'T', 7, 12, 4, Size::Large, F::empty(), 2, 800),
            Species::Leprechaun => tmpl(
                "leprechaun", 'l', 5, 15, 8, Size::Tiny,
                F::COVETS_GOLD, 2, 60,
            ),
            Species::GiantEel => tmpl(
                "giant eel", ';', 5, 9, -1, Size::Huge,
                F::ANIMAL.union(F::NOHANDS).union(F::SWIMS).union(F::NOGEN), 0, 200,
            ),
            Species::Lichen => tmpl(
                "lichen", 'F', 0, 1, 9, Size::Small,
                F::MINDLESS.union(F::NOHANDS).union(F::STONE_RES), 4, 20,
            ),
            Species::RedMold => tmpl(
                "red mold", 'F', 4, 0, 9, Size::Small,
                F::MINDLESS.union(F::NOHANDS).union(F::FIRE_RES).union(F::POISON_RES), 2, 50,
            ),
            Species::HumanZombie => tmpl(
                "human zombie", 'Z', 2, 6, 8, Size::Medium,
                F::UNDEAD.union(F::MINDLESS).union(F::POISON_RES).union(F::SLEEP_RES), 3, 1450,
            ),
            Species::Ghoul => tmpl(
                "ghoul", 'Z', 3, 6, 6, Size::Medium,
                F::UNDEAD.union(F::POISON_RES).union(F::SLEEP_RES), 2, 400,
            ),
            Species::Wraith => tmpl(
                "wraith", 'W', 6, 12, 4, Size::Medium,
                F::UNDEAD
                    .union(F::FLIES)
                    .union(F::POISON_RES)
                    .union(F::SLEEP_RES)
                    .union(F::COLD_RES)
                    .union(F::NOCORPSE),
                2, 0,
            ),
            Species::Ghost => tmpl(
                "ghost", ' ', 10, 3, -5, Size::Medium,
                F::UNDEAD
                    .union(F::MINDLESS)
                    .union(F::FLIES)
                    .union(F::POISON_RES)
                    .union(F::SLEEP_RES)
                    .union(F::COLD_RES)
                    .union(F::NOCORPSE)
                    .union(F::NOGEN),
                0, 0,
            ),
            Species::Vampire => tmpl(
                "vampire", 'V', 10, 12, 1, Size::Medium,
                F::UNDEAD.union(F::FLIES).union(F::POISON_RES).union(F::SLEEP_RES), 1, 1450,
            ),
            Species::Lich => tmpl(
                "lich", 'L', 11, 6, 0, Size::Medium,
                F::UNDEAD
                    .union(F::POISON_RES)
                    .union(F::SLEEP_RES)
                    .union(F::COLD_RES)
                    .union(F::NOCORPSE),
                1, 1200,
            ),
            Species::Soldier => tmpl(
                "soldier", '@', 6, 10, 3, Size::Medium, F::NOGEN, 0, 1450,
            ),
            Species::Sergeant => tmpl(
                "sergeant", '@', 8, 10, 0, Size::Medium, F::NOGEN, 0, 1450,
            ),
            Species::Lieutenant => tmpl(
                "lieutenant", '@', 10, 10, -2, Size::Medium, F::NOGEN, 0, 1450,
            ),
            Species::Captain => tmpl(
                "captain", '@', 12, 10, -3, Size::Medium, F::NOGEN, 0, 1450,
            ),
            Species::Chickatrice => tmpl(
                "chickatrice", 'c', 4, 4, 8, Size::Tiny,
                F::ANIMAL.union(F::NOHANDS).union(F::PETRIFIES).union(F::STONE_RES), 1, 10,
            ),
            Species::Cockatrice => tmpl(
                "cockatrice", 'c', 5, 6, 6, Size::Small,
                F::ANIMAL.union(F::NOHANDS).union(F::PETRIFIES).union(F::STONE_RES), 2, 30,
            ),
            Species::WhiteUnicorn => tmpl(
                "white unicorn", 'u', 4, 24, 2, Size::Large,
                F::ANIMAL.union(F::NOHANDS).union(F::POISON_RES), 2, 1300,
            ),
            Species::GrayUnicorn => tmpl(
                "gray unicorn", 'u', 4, 24, 2, Size::Large,
                F::ANIMAL.union(F::NOHANDS).union(F::POISON_RES), 1, 1300,
            ),
            Species::BlackUnicorn => tmpl(
                "black unicorn", 'u', 4, 24, 2, Size::Large,
                F::ANIMAL.union(F::NOHANDS).union(F::POISON_RES), 1, 1300,
            ),
            Species::AlignedPriest => tmpl(
                "aligned priest", '@', 12, 12, 10, Size::Medium,
                F::NOGEN.union(F::NOGENO).union(F::PEACEFUL), 0, 1450,
            ),
            Species::Shopkeeper => tmpl(
                "shopkeeper", '@', 12, 18, 0, Size::Medium,
                F::NOGEN.union(F::NOGENO).union(F::PEACEFUL), 0, 1450,
            ),
        }
    }

    pub fn name(self) -> &'static str {
        self.template().name
    }

    pub fn flags(self) -> SpeciesFlags {
        self.template().flags
    }

    pub fn is_undead(self) -> bool {
        self.flags().contains(SpeciesFlags::UNDEAD)
    }

    pub fn is_animal(self) -> bool {
        self.flags().contains(SpeciesFlags::ANIMAL)
    }

    pub fn flies(self) -> bool {
        self.flags().contains(SpeciesFlags::FLIES)
    }

    pub fn swims(self) -> bool {
        self.flags()
            .intersects(SpeciesFlags::SWIMS.union(SpeciesFlags::AMPHIBIOUS))
    }

    pub fn resists_fire(self) -> bool {
        self.flags().contains(SpeciesFlags::FIRE_RES)
    }

    pub fn resists_poison(self) -> bool {
        self.flags().contains(SpeciesFlags::POISON_RES)
    }

    pub fn resists_sleep(self) -> bool {
        self.flags()
            .intersects(SpeciesFlags::SLEEP_RES.union(SpeciesFlags::UNDEAD))
    }

    pub fn can_be_genocided(self) -> bool {
        !self.flags().contains(SpeciesFlags::NOGENO)
    }

    /// Eligible for unconstrained random generation.
    pub fn random_gen(self) -> bool {
        !self.flags().contains(SpeciesFlags::NOGEN) && self.template().freq > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_nogen_species_have_zero_freq() {
        for sp in Species::iter() {
            let t = sp.template();
            if t.flags.contains(SpeciesFlags::NOGEN) {
                assert_eq!(t.freq, 0, "{} has NOGEN but freq {}", t.name, t.freq);
            } else {
                assert!(t.freq > 0, "{} lacks NOGEN but has freq 0", t.name);
            }
        }
    }

    #[test]
    fn test_undead_resist_sleep() {
        assert!(Species::HumanZombie.resists_sleep());
        assert!(Species::Lich.resists_sleep());
        assert!(!Species::Jackal.resists_sleep());
    }

    #[test]
    fn test_protected_species() {
        assert!(!Species::Shopkeeper.can_be_genocided());
        assert!(!Species::AlignedPriest.can_be_genocided());
        assert!(Species::Kobold.can_be_genocided());
    }
}
