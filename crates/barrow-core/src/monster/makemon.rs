//! Monster creation, death, and the species census.

use barrow_rng::GameRng;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::dungeon::Level;
use crate::monster::monst::{Monster, MonsterId};
use crate::monster::permonst::{Size, Species, SpeciesFlags};
use crate::object::{mkgold, mksobj, ObjKind, ObjLocation};

/// Births after which a species stops being generated.
pub const EXTINCT_AT: u32 = 120;

/// Per-species population record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vitals {
    pub born: u32,
    pub died: u32,
    pub genocided: bool,
}

/// Census of every species that has been born, died, or been wiped out.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VitalsRegistry {
    counts: HashMap<Species, Vitals>,
}

impl VitalsRegistry {
    pub fn new() -> VitalsRegistry {
        VitalsRegistry::default()
    }

    pub fn entry(&self, species: Species) -> Vitals {
        self.counts.get(&species).copied().unwrap_or_default()
    }

    pub fn note_born(&mut self, species: Species) {
        self.counts.entry(species).or_default().born += 1;
    }

    pub fn note_death(&mut self, species: Species) {
        self.counts.entry(species).or_default().died += 1;
    }

    pub fn genocide(&mut self, species: Species) {
        self.counts.entry(species).or_default().genocided = true;
    }

    pub fn is_genocided(&self, species: Species) -> bool {
        self.entry(species).genocided
    }

    /// New instances of this species may still be created.
    pub fn available(&self, species: Species) -> bool {
        let v = self.entry(species);
        !v.genocided && v.born < EXTINCT_AT
    }
}

/// Pick a species for unconstrained generation at the given depth.
///
/// Candidates are weighted by generation frequency within a difficulty
/// window around the depth. Widens the window rather than failing when
/// the census has thinned the pool out.
pub fn pick_species(depth: u32, vitals: &VitalsRegistry, rng: &mut GameRng) -> Option<Species> {
    let hi = depth.saturating_add(2);
    for lo in [depth / 6, 0] {
        let pool: Vec<Species> = Species::iter()
            .filter(|sp| sp.random_gen() && vitals.available(*sp))
            .filter(|sp| {
                let lvl = u32::from(sp.template().level);
                lvl >= lo && lvl <= hi
            })
            .collect();
        let total: u32 = pool.iter().map(|sp| u32::from(sp.template().freq)).sum();
        if total == 0 {
            continue;
        }
        let mut roll = rng.rn2(total);
        for sp in pool {
            let w = u32::from(sp.template().freq);
            if roll < w {
                return Some(sp);
            }
            roll -= w;
        }
    }
    None
}

/// Level scaling for monsters generated deeper than their base level.
fn adj_lev(base: u8, depth: u32) -> u8 {
    let base = i32::from(base);
    let excess = (depth as i32 - base) / 4;
    (base + excess.max(0)).clamp(0, 30) as u8
}

fn starting_inventory(mon: &mut Monster, depth: u32, level: &mut Level, rng: &mut GameRng) {
    match mon.species {
        Species::Leprechaun => {
            let amount = rng.dice(u32::from(mon.level).max(1), 30);
            let mut gold = mkgold(amount, level.new_object_id());
            gold.loc = ObjLocation::MonInvent(mon.id);
            mon.inventory.push(gold);
        }
        Species::Soldier | Species::Sergeant | Species::Lieutenant | Species::Captain => {
            let weapon_kind = if rng.rn2(2) == 0 { ObjKind::Spear } else { ObjKind::Dagger };
            let mut weapon = mksobj(weapon_kind, true, rng, level.new_object_id());
            weapon.loc = ObjLocation::MonInvent(mon.id);
            mon.inventory.push(weapon);
            if rng.rn2(3) == 0 {
                let mut shield = mksobj(ObjKind::SmallShield, true, rng, level.new_object_id());
                shield.loc = ObjLocation::MonInvent(mon.id);
                mon.inventory.push(shield);
            }
        }
        Species::HillOrc if depth > 2 && rng.rn2(3) == 0 => {
            let mut arrows = mksobj(ObjKind::OrcishArrow, true, rng, level.new_object_id());
            arrows.loc = ObjLocation::MonInvent(mon.id);
            mon.inventory.push(arrows);
            let mut bow = mksobj(ObjKind::OrcishBow, true, rng, level.new_object_id());
            bow.loc = ObjLocation::MonInvent(mon.id);
            mon.inventory.push(bow);
        }
        _ => {}
    }
}

/// Create a monster at `(x, y)`.
///
/// `species` of `None` picks one for the depth. Returns `None` when the
/// cell is occupied or unsuitable, or the species cannot be created.
pub fn makemon(
    species: Option<Species>,
    x: i32,
    y: i32,
    depth: u32,
    level: &mut Level,
    vitals: &mut VitalsRegistry,
    rng: &mut GameRng,
) -> Option<MonsterId> {
    if level.monster_at(x, y).is_some() {
        return None;
    }
    let sp = match species {
        Some(sp) if vitals.available(sp) => sp,
        Some(_) => return None,
        None => pick_species(depth, vitals, rng)?,
    };
    let tmpl = sp.template();
    if !level.tile(x, y)?.is_walkable() && !sp.flies() && !sp.swims() {
        return None;
    }
    let lvl = adj_lev(tmpl.level, depth);
    let hp = if lvl == 0 { rng.rnd(4) as i32 } else { rng.dice(u32::from(lvl), 8) as i32 };
    let id = level.new_monster_id();
    let mut mon = Monster::new(id, sp, x, y, hp, lvl);
    starting_inventory(&mut mon, depth, level, rng);
    vitals.note_born(sp);
    level.monsters.push(mon);
    Some(id)
}

/// Remove a dead monster, drop its load, and maybe leave a corpse.
pub fn mondead(
    level: &mut Level,
    id: MonsterId,
    vitals: &mut VitalsRegistry,
    rng: &mut GameRng,
) -> Option<Species> {
    let idx = level.monsters.iter().position(|m| m.id == id)?;
    let mon = level.monsters.remove(idx);
    vitals.note_death(mon.species);
    let (x, y) = (mon.x, mon.y);
    for mut obj in mon.inventory {
        obj.loc = ObjLocation::Free;
        level.place_object(obj, x, y);
    }
    let tmpl = mon.species.template();
    let leaves_corpse = !tmpl.flags.contains(SpeciesFlags::NOCORPSE)
        && tmpl.weight > 0
        && (tmpl.size > Size::Tiny || rng.rn2(2) == 0);
    if leaves_corpse {
        let mut corpse = mksobj(ObjKind::Corpse, false, rng, level.new_object_id());
        corpse.corpse_species = Some(mon.species);
        level.place_object(corpse, x, y);
    }
    Some(mon.species)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_census_counts() {
        let mut v = VitalsRegistry::new();
        v.note_born(Species::Jackal);
        v.note_born(Species::Jackal);
        v.note_death(Species::Jackal);
        assert_eq!(v.entry(Species::Jackal).born, 2);
        assert_eq!(v.entry(Species::Jackal).died, 1);
        assert!(v.available(Species::Jackal));
    }

    #[test]
    fn test_genocide_blocks_creation() {
        let mut v = VitalsRegistry::new();
        v.genocide(Species::Kobold);
        assert!(!v.available(Species::Kobold));
        let mut rng = GameRng::new(1);
        for _ in 0..64 {
            if let Some(sp) = pick_species(1, &v, &mut rng) {
                assert_ne!(sp, Species::Kobold);
            }
        }
    }

    #[test]
    fn test_extinction_threshold() {
        let mut v = VitalsRegistry::new();
        for _ in 0..EXTINCT_AT {
            v.note_born(Species::Newt);
        }
        assert!(!v.available(Species::Newt));
        assert!(!v.is_genocided(Species::Newt));
    }

    #[test]
    fn test_pick_species_respects_depth_window() {
        let v = VitalsRegistry::new();
        let mut rng = GameRng::new(17);
        for _ in 0..64 {
            let sp = pick_species(1, &v, &mut rng).unwrap();
            assert!(sp.template().level <= 3, "{} too deep for level 1", sp.name());
        }
    }

    #[test]
    fn test_adj_lev_scales_with_depth() {
        assert_eq!(adj_lev(0, 1), 0);
        assert_eq!(adj_lev(1, 1), 1);
        assert_eq!(adj_lev(1, 9), 3);
        assert_eq!(adj_lev(5, 25), 10);
    }
}
