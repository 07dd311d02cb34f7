//! Shared combat arithmetic: damage dice, to-hit pieces, erosion.

use barrow_rng::GameRng;

use crate::monster::{Monster, Size};
use crate::object::{Material, ObjClass, ObjKind, Object};

/// Weapon damage against a target, size-split dice plus enchantment
/// minus erosion. Never negative.
pub fn dmgval(obj: &Object, large_target: bool, rng: &mut GameRng) -> i32 {
    let tmpl = obj.kind.template();
    let (n, d) = if large_target { tmpl.ldam } else { tmpl.sdam };
    let mut dmg = if n > 0 && d > 0 {
        rng.dice(u32::from(n), u32::from(d)) as i32
    } else {
        // improvised missile
        1
    };
    dmg += i32::from(obj.spe);
    dmg -= obj.greatest_erosion();
    dmg.max(0)
}

/// Whether a monster counts as a large target for damage dice.
pub fn is_large(mon: &Monster) -> bool {
    mon.species.template().size >= Size::Large
}

/// Effective armor class of a monster.
pub fn find_mac(mon: &Monster) -> i32 {
    mon.ac()
}

/// Ranged to-hit falloff: free inside two cells, then one per cell up
/// to four.
pub fn dist_penalty(distance: i32) -> i32 {
    (2 - distance).min(0).max(-4)
}

/// Missile to-hit adjustment from dexterity.
pub fn dex_tier(dex: u8) -> i32 {
    match dex {
        0..=3 => -3,
        4..=5 => -2,
        6..=7 => -1,
        8..=14 => 0,
        d => i32::from(d) - 14,
    }
}

/// Monster missile against the player: flat level-scaled roll against
/// armor class.
pub fn thitu(uac: i32, tlev: i32, rng: &mut GameRng) -> bool {
    (rng.rnd(20) as i32) <= uac + tlev
}

/// Can a flying object slip between iron bars? Coins and gems always
/// fit; skinny weapons make it half the time; everything else clangs
/// off.
pub fn passes_bars(kind: ObjKind, rng: &mut GameRng) -> bool {
    match kind.class() {
        ObjClass::Coin | ObjClass::Gem => true,
        ObjClass::Weapon => {
            let skinny = matches!(
                kind,
                ObjKind::Arrow
                    | ObjKind::ElvenArrow
                    | ObjKind::OrcishArrow
                    | ObjKind::Ya
                    | ObjKind::CrossbowBolt
                    | ObjKind::Dart
                    | ObjKind::Shuriken
                    | ObjKind::Knife
                    | ObjKind::Dagger
                    | ObjKind::ElvenDagger
                    | ObjKind::OrcishDagger
                    | ObjKind::Spear
                    | ObjKind::Javelin
            );
            skinny && rng.one_in(2)
        }
        ObjClass::Potion => rng.one_in(2),
        _ => false,
    }
}

/// Rust or corrode an item one step, respecting erodeproofing and the
/// three-step cap. Returns true when the item actually degraded.
pub fn erode_obj(obj: &mut Object, corrosive: bool) -> bool {
    if obj.erodeproof {
        return false;
    }
    let vulnerable = match obj.kind.template().material {
        Material::Iron | Material::Metal => true,
        Material::Leather | Material::Cloth | Material::Wood | Material::Paper => corrosive,
        _ => false,
    };
    if !vulnerable {
        return false;
    }
    let counter = if corrosive { &mut obj.eroded2 } else { &mut obj.eroded };
    if *counter >= 3 {
        return false;
    }
    *counter += 1;
    true
}
