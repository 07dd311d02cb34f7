//! Random item creation.
//!
//! `mksobj` rolls the mutable state a freshly made item gets: stack
//! size, enchantment, blessing, poison, locks. `mkobj` first picks a
//! kind from class probability tables.

use barrow_rng::GameRng;

use crate::object::obj::{Buc, Object, ObjectId};
use crate::object::objclass::{ObjClass, ObjKind, PotionKind, ScrollKind, Skill};

/// Class mix for unconstrained random items.
const CLASS_PROBS: &[(u32, ObjClass)] = &[
    (10, ObjClass::Weapon),
    (10, ObjClass::Armor),
    (20, ObjClass::Food),
    (8, ObjClass::Tool),
    (8, ObjClass::Gem),
    (16, ObjClass::Potion),
    (16, ObjClass::Scroll),
    (4, ObjClass::Spellbook),
    (4, ObjClass::Wand),
    (3, ObjClass::Ring),
];

const WEAPONS: &[ObjKind] = &[
    ObjKind::Arrow,
    ObjKind::ElvenArrow,
    ObjKind::OrcishArrow,
    ObjKind::CrossbowBolt,
    ObjKind::Dart,
    ObjKind::Shuriken,
    ObjKind::Boomerang,
    ObjKind::Dagger,
    ObjKind::ElvenDagger,
    ObjKind::OrcishDagger,
    ObjKind::Knife,
    ObjKind::Spear,
    ObjKind::Javelin,
    ObjKind::Club,
    ObjKind::Mace,
    ObjKind::WarHammer,
    ObjKind::Quarterstaff,
    ObjKind::Bow,
    ObjKind::ElvenBow,
    ObjKind::OrcishBow,
    ObjKind::Sling,
    ObjKind::Crossbow,
];

const ARMOR: &[ObjKind] = &[
    ObjKind::LeatherArmor,
    ObjKind::PlateMail,
    ObjKind::Helmet,
    ObjKind::SmallShield,
    ObjKind::LeatherGloves,
    ObjKind::GauntletsOfPower,
    ObjKind::ElvenCloak,
];

const FOOD: &[ObjKind] = &[ObjKind::FoodRation, ObjKind::Apple, ObjKind::RoyalJelly];

const TOOLS: &[ObjKind] = &[
    ObjKind::PickAxe,
    ObjKind::SkeletonKey,
    ObjKind::TinWhistle,
    ObjKind::OilLamp,
    ObjKind::Sack,
    ObjKind::LargeBox,
    ObjKind::Chest,
    ObjKind::WaxCandle,
    ObjKind::TallowCandle,
];

const GEMS: &[ObjKind] = &[
    ObjKind::Diamond,
    ObjKind::Ruby,
    ObjKind::WorthlessGlass,
    ObjKind::FlintStone,
];

const RINGS: &[ObjKind] = &[ObjKind::RingOfProtection, ObjKind::RingOfSearching];

const WANDS: &[ObjKind] = &[ObjKind::WandOfStriking, ObjKind::WandOfSleep];

const POTIONS: &[ObjKind] = &[
    ObjKind::Potion(PotionKind::Healing),
    ObjKind::Potion(PotionKind::ExtraHealing),
    ObjKind::Potion(PotionKind::FullHealing),
    ObjKind::Potion(PotionKind::GainLevel),
    ObjKind::Potion(PotionKind::GainEnergy),
    ObjKind::Potion(PotionKind::GainAbility),
    ObjKind::Potion(PotionKind::RestoreAbility),
    ObjKind::Potion(PotionKind::Confusion),
    ObjKind::Potion(PotionKind::Blindness),
    ObjKind::Potion(PotionKind::Paralysis),
    ObjKind::Potion(PotionKind::Sleeping),
    ObjKind::Potion(PotionKind::Hallucination),
    ObjKind::Potion(PotionKind::Speed),
    ObjKind::Potion(PotionKind::Levitation),
    ObjKind::Potion(PotionKind::Invisibility),
    ObjKind::Potion(PotionKind::SeeInvisible),
    ObjKind::Potion(PotionKind::ObjectDetection),
    ObjKind::Potion(PotionKind::MonsterDetection),
    ObjKind::Potion(PotionKind::Acid),
    ObjKind::Potion(PotionKind::Sickness),
    ObjKind::Potion(PotionKind::FruitJuice),
    ObjKind::Potion(PotionKind::Booze),
    ObjKind::Potion(PotionKind::Water),
];

const SCROLLS: &[ObjKind] = &[
    ObjKind::Scroll(ScrollKind::EnchantArmor),
    ObjKind::Scroll(ScrollKind::DestroyArmor),
    ObjKind::Scroll(ScrollKind::EnchantWeapon),
    ObjKind::Scroll(ScrollKind::RemoveCurse),
    ObjKind::Scroll(ScrollKind::Identify),
    ObjKind::Scroll(ScrollKind::Teleportation),
    ObjKind::Scroll(ScrollKind::GoldDetection),
    ObjKind::Scroll(ScrollKind::FoodDetection),
    ObjKind::Scroll(ScrollKind::Light),
    ObjKind::Scroll(ScrollKind::Fire),
    ObjKind::Scroll(ScrollKind::Earth),
    ObjKind::Scroll(ScrollKind::CreateMonster),
    ObjKind::Scroll(ScrollKind::Taming),
    ObjKind::Scroll(ScrollKind::ScareMonster),
    ObjKind::Scroll(ScrollKind::ConfuseMonster),
    ObjKind::Scroll(ScrollKind::MagicMapping),
    ObjKind::Scroll(ScrollKind::Genocide),
    ObjKind::Scroll(ScrollKind::Punishment),
    ObjKind::Scroll(ScrollKind::Charging),
];

/// Kinds eligible for random generation within a class.
pub fn kinds_in(class: ObjClass) -> &'static [ObjKind] {
    match class {
        ObjClass::Weapon => WEAPONS,
        ObjClass::Armor => ARMOR,
        ObjClass::Food => FOOD,
        ObjClass::Tool => TOOLS,
        ObjClass::Gem => GEMS,
        ObjClass::Ring => RINGS,
        ObjClass::Wand => WANDS,
        ObjClass::Potion => POTIONS,
        ObjClass::Scroll => SCROLLS,
        ObjClass::Spellbook => &[ObjKind::Spellbook],
        ObjClass::Coin => &[ObjKind::Gold],
        ObjClass::Rock => &[ObjKind::Rock],
        ObjClass::Ball => &[ObjKind::HeavyIronBall],
        ObjClass::Chain => &[ObjKind::IronChain],
    }
}

fn random_class(rng: &mut GameRng) -> ObjClass {
    let total: u32 = CLASS_PROBS.iter().map(|(w, _)| w).sum();
    let mut roll = rng.rn2(total);
    for &(w, class) in CLASS_PROBS {
        if roll < w {
            return class;
        }
        roll -= w;
    }
    ObjClass::Food
}

/// Leave blessed/cursed alone if set; otherwise 1-in-`chance` to pick
/// one of the two at even odds.
pub fn blessorcurse(obj: &mut Object, chance: u32, rng: &mut GameRng) {
    if obj.buc != Buc::Uncursed {
        return;
    }
    if rng.rn2(chance) == 0 {
        if rng.rn2(2) == 0 {
            obj.curse();
        } else {
            obj.bless();
        }
    }
}

fn init_weapon(obj: &mut Object, rng: &mut GameRng) {
    if obj.kind.is_multigen() {
        obj.quan = rng.rn1(6, 6) as u32;
    }
    if rng.rn2(11) == 0 {
        obj.spe = rng.rne(3, 5) as i8;
        if rng.rn2(2) == 0 {
            obj.bless();
        }
    } else if rng.rn2(10) == 0 {
        obj.curse();
        obj.spe = -(rng.rne(3, 5) as i8);
    } else {
        blessorcurse(obj, 10, rng);
    }
    let poisonable = matches!(obj.kind.template().skill, Skill::Dart) || obj.kind.is_ammo();
    if poisonable && rng.rn2(100) == 0 {
        obj.poisoned = true;
    }
}

fn init_armor(obj: &mut Object, rng: &mut GameRng) {
    if rng.rn2(10) != 0 && rng.rn2(11) == 0 {
        obj.curse();
        obj.spe = -(rng.rne(3, 5) as i8);
    } else if rng.rn2(10) == 0 {
        if rng.rn2(2) == 0 {
            obj.bless();
        }
        obj.spe = rng.rne(3, 5) as i8;
    } else {
        blessorcurse(obj, 10, rng);
    }
}

fn init_ring(obj: &mut Object, rng: &mut GameRng) {
    if obj.kind != ObjKind::RingOfProtection {
        blessorcurse(obj, 3, rng);
        return;
    }
    blessorcurse(obj, 3, rng);
    if rng.rn2(10) != 0 {
        obj.spe = if rng.rn2(2) == 0 {
            rng.rne(3, 5) as i8
        } else {
            -(rng.rne(3, 5) as i8)
        };
    }
    if obj.spe < 0 && rng.rn2(5) != 0 {
        obj.curse();
    }
}

fn init_tool(obj: &mut Object, rng: &mut GameRng) {
    match obj.kind {
        ObjKind::LargeBox | ObjKind::Chest => {
            obj.locked = rng.rn2(5) != 0;
            obj.trapped = rng.rn2(10) == 0;
        }
        ObjKind::WaxCandle | ObjKind::TallowCandle => {
            obj.quan = rng.rn1(2, 3) as u32;
        }
        ObjKind::OilLamp => {
            blessorcurse(obj, 5, rng);
        }
        _ => {}
    }
}

/// Create a specific kind. `init` rolls random state; otherwise the
/// item comes out plain and uncursed.
pub fn mksobj(kind: ObjKind, init: bool, rng: &mut GameRng, id: ObjectId) -> Object {
    let mut obj = Object::new(id, kind);
    if !init {
        return obj;
    }
    match kind.class() {
        ObjClass::Weapon => init_weapon(&mut obj, rng),
        ObjClass::Armor => init_armor(&mut obj, rng),
        ObjClass::Ring => init_ring(&mut obj, rng),
        ObjClass::Tool => init_tool(&mut obj, rng),
        ObjClass::Potion | ObjClass::Scroll => blessorcurse(&mut obj, 4, rng),
        ObjClass::Wand => obj.spe = rng.rn1(5, 4) as i8,
        ObjClass::Spellbook => blessorcurse(&mut obj, 17, rng),
        ObjClass::Gem if kind == ObjKind::FlintStone => {
            obj.quan = if rng.rn2(2) == 0 { rng.rn1(6, 6) as u32 } else { 1 };
        }
        ObjClass::Rock if kind == ObjKind::Rock => {
            obj.quan = rng.rn1(6, 6) as u32;
        }
        _ => {}
    }
    obj
}

/// Create a random item, optionally pinned to one class.
pub fn mkobj(class: Option<ObjClass>, init: bool, rng: &mut GameRng, id: ObjectId) -> Object {
    let class = class.unwrap_or_else(|| random_class(rng));
    let kinds = kinds_in(class);
    let kind = rng.choose(kinds).copied().unwrap_or(ObjKind::FoodRation);
    mksobj(kind, init, rng, id)
}

/// A pile of gold worth `amount`.
pub fn mkgold(amount: u32, id: ObjectId) -> Object {
    let mut gold = Object::new(id, ObjKind::Gold);
    gold.quan = amount.max(1);
    gold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mksobj_multigen_quantity() {
        let mut rng = GameRng::new(7);
        for _ in 0..64 {
            let obj = mksobj(ObjKind::Arrow, true, &mut rng, ObjectId(1));
            assert!((6..=11).contains(&obj.quan), "quan {}", obj.quan);
        }
    }

    #[test]
    fn test_mksobj_enchantment_bounds() {
        let mut rng = GameRng::new(99);
        for _ in 0..256 {
            let obj = mksobj(ObjKind::Dagger, true, &mut rng, ObjectId(1));
            assert!((-5..=5).contains(&obj.spe), "spe {}", obj.spe);
            if obj.spe < 0 {
                assert!(obj.is_cursed());
            }
        }
    }

    #[test]
    fn test_blessorcurse_respects_existing_state() {
        let mut rng = GameRng::new(3);
        let mut obj = Object::new(ObjectId(1), ObjKind::Dagger);
        obj.bless();
        for _ in 0..32 {
            blessorcurse(&mut obj, 1, &mut rng);
        }
        assert!(obj.is_blessed());
    }

    #[test]
    fn test_uninit_item_is_plain() {
        let mut rng = GameRng::new(11);
        let obj = mksobj(ObjKind::Spear, false, &mut rng, ObjectId(4));
        assert_eq!(obj.spe, 0);
        assert_eq!(obj.buc, Buc::Uncursed);
        assert_eq!(obj.quan, 1);
    }

    #[test]
    fn test_mkobj_random_class_stays_in_class() {
        let mut rng = GameRng::new(21);
        for _ in 0..64 {
            let obj = mkobj(Some(ObjClass::Potion), true, &mut rng, ObjectId(1));
            assert_eq!(obj.kind.class(), ObjClass::Potion);
        }
    }

    #[test]
    fn test_wand_charges() {
        let mut rng = GameRng::new(5);
        for _ in 0..32 {
            let obj = mksobj(ObjKind::WandOfStriking, true, &mut rng, ObjectId(1));
            assert!((4..=8).contains(&obj.spe), "charges {}", obj.spe);
        }
    }
}
