//! Special rooms: election, room selection, and stocking.
//!
//! When a level is born it may dedicate one ordinary room to a themed
//! purpose. Which theme is depth-gated; which room takes it follows the
//! stairs-avoiding circular scan in `pick_room`.
//!
//! Species-availability draws (anything the genocide census can veto)
//! use the gameplay stream; placement and layout draws use the level
//! generation stream, so layout stays a function of (seed, depth).

use barrow_rng::GameRng;

use crate::dungeon::cell::Terrain;
use crate::dungeon::level::{Level, LevelFlags};
use crate::dungeon::room::RoomType;
use crate::dungeon::shop::{stock_shop, ShopKind};
use crate::monster::{makemon, pick_species, Species, VitalsRegistry};
use crate::object::{mkgold, mksobj, ObjKind};

/// Sleep timer for monsters stocked asleep. They stay down until
/// something wakes them.
const ASLEEP: u16 = u16::MAX;

/// Depth-gated election of a special room type, rolled once per level.
/// The shop marker's archetype is a placeholder; `stock_shop` picks the
/// real one from the room's floor area.
pub fn pick_special_type(depth: u32, rng: &mut GameRng) -> Option<RoomType> {
    if depth >= 2 && rng.rn2(depth) < 3 {
        Some(RoomType::Shop(ShopKind::General))
    } else if depth >= 4 && rng.one_in(6) {
        Some(RoomType::Court)
    } else if depth >= 5 && rng.one_in(8) {
        Some(RoomType::LeprechaunHall)
    } else if depth >= 6 && rng.one_in(7) {
        Some(RoomType::Zoo)
    } else if depth >= 8 && rng.one_in(5) {
        Some(RoomType::Temple)
    } else if depth >= 9 && rng.one_in(5) {
        Some(RoomType::Beehive)
    } else if depth >= 11 && rng.one_in(6) {
        Some(RoomType::Morgue)
    } else if depth >= 12 && rng.one_in(5) {
        Some(RoomType::Anthole)
    } else if depth >= 14 && rng.one_in(4) {
        Some(RoomType::Barracks)
    } else if depth >= 15 && rng.one_in(6) {
        Some(RoomType::Swamp)
    } else if depth >= 16 && rng.one_in(8) {
        Some(RoomType::CockatriceNest)
    } else {
        None
    }
}

/// Room containing the given stairway, if any.
fn stairs_room(level: &Level, up: bool) -> Option<usize> {
    level
        .stairs
        .iter()
        .find(|s| s.up == up)
        .and_then(|s| level.room_index_at(s.x, s.y))
}

/// Pick an ordinary room for conversion: circular scan from a random
/// start. The up-stairs room is always out; the down-stairs room is out
/// when `strict`, else two times in three; rooms with several doors
/// only pass one time in five.
pub fn pick_room(level: &Level, strict: bool, rng: &mut GameRng) -> Option<usize> {
    let n = level.rooms.len();
    if n == 0 {
        return None;
    }
    let upstairs = stairs_room(level, true);
    let downstairs = stairs_room(level, false);
    let start = rng.rn2(n as u32) as usize;
    for k in 0..n {
        let i = (start + k) % n;
        let room = &level.rooms[i];
        if room.rtype.is_special() || room.irregular {
            continue;
        }
        if upstairs == Some(i) {
            continue;
        }
        if downstairs == Some(i) && (strict || rng.rn2(3) != 0) {
            continue;
        }
        if room.doorct > 1 && rng.rn2(5) != 0 {
            continue;
        }
        return Some(i);
    }
    None
}

/// Per-room-type monster selector.
pub type Selector = fn(u32, &VitalsRegistry, &mut GameRng) -> Option<Species>;

/// Strategy map from room type to its inhabitant selector. Shops and
/// ordinary rooms have none.
pub fn monster_selector(rtype: RoomType) -> Option<Selector> {
    match rtype {
        RoomType::Court => Some(courtmon),
        RoomType::Zoo => Some(zoomon),
        RoomType::Morgue => Some(morguemon),
        RoomType::Beehive => Some(beemon),
        RoomType::Barracks => Some(squadmon),
        RoomType::Anthole => Some(antmon),
        RoomType::Swamp => Some(swampmon),
        RoomType::LeprechaunHall => Some(lepmon),
        RoomType::CockatriceNest => Some(nestmon),
        RoomType::Temple | RoomType::Ordinary | RoomType::Shop(_) => None,
    }
}

fn avail(sp: Species, vitals: &VitalsRegistry) -> Option<Species> {
    if vitals.available(sp) {
        Some(sp)
    } else {
        None
    }
}

fn courtmon(depth: u32, vitals: &VitalsRegistry, rng: &mut GameRng) -> Option<Species> {
    let i = rng.rn2(60) + rng.rn2(3 * depth.max(1));
    let pick = if i > 85 {
        Species::Troll
    } else if i > 60 {
        Species::Ogre
    } else if i > 45 {
        Species::HillOrc
    } else if i > 30 {
        Species::Wolf
    } else if i > 15 {
        Species::GnomeLord
    } else {
        Species::LargeKobold
    };
    avail(pick, vitals).or_else(|| pick_species(depth, vitals, rng))
}

fn zoomon(depth: u32, vitals: &VitalsRegistry, rng: &mut GameRng) -> Option<Species> {
    pick_species(depth, vitals, rng)
}

fn morguemon(depth: u32, vitals: &VitalsRegistry, rng: &mut GameRng) -> Option<Species> {
    let i = rng.rn2(100);
    let pick = if i > 66 {
        if depth > 15 && rng.one_in(4) {
            Species::Lich
        } else if depth > 12 && rng.one_in(3) {
            Species::Vampire
        } else {
            Species::Wraith
        }
    } else if i > 33 {
        Species::Ghoul
    } else if i > 10 {
        Species::HumanZombie
    } else {
        Species::Ghost
    };
    avail(pick, vitals).or_else(|| avail(Species::HumanZombie, vitals))
}

fn beemon(_depth: u32, vitals: &VitalsRegistry, _rng: &mut GameRng) -> Option<Species> {
    avail(Species::KillerBee, vitals)
}

fn squadmon(_depth: u32, vitals: &VitalsRegistry, rng: &mut GameRng) -> Option<Species> {
    let i = rng.rn2(100);
    let pick = if i < 60 {
        Species::Soldier
    } else if i < 85 {
        Species::Sergeant
    } else if i < 97 {
        Species::Lieutenant
    } else {
        Species::Captain
    };
    avail(pick, vitals).or_else(|| avail(Species::Soldier, vitals))
}

fn antmon(depth: u32, vitals: &VitalsRegistry, rng: &mut GameRng) -> Option<Species> {
    let pick = if depth > 16 && rng.one_in(3) {
        Species::FireAnt
    } else if rng.one_in(2) {
        Species::SoldierAnt
    } else {
        Species::GiantAnt
    };
    avail(pick, vitals).or_else(|| avail(Species::GiantAnt, vitals))
}

fn swampmon(_depth: u32, vitals: &VitalsRegistry, _rng: &mut GameRng) -> Option<Species> {
    avail(Species::GiantEel, vitals)
}

fn lepmon(_depth: u32, vitals: &VitalsRegistry, _rng: &mut GameRng) -> Option<Species> {
    avail(Species::Leprechaun, vitals)
}

fn nestmon(_depth: u32, vitals: &VitalsRegistry, rng: &mut GameRng) -> Option<Species> {
    let pick = if rng.one_in(3) {
        Species::Chickatrice
    } else {
        Species::Cockatrice
    };
    avail(pick, vitals).or_else(|| avail(Species::Cockatrice, vitals))
}

/// Place one inhabitant asleep at a cell, drawing the species on the
/// gameplay stream.
fn stock_mon(
    level: &mut Level,
    sel: Selector,
    x: i32,
    y: i32,
    depth: u32,
    vitals: &mut VitalsRegistry,
    core: &mut GameRng,
) {
    let Some(sp) = sel(depth, vitals, core) else { return };
    if let Some(id) = makemon(Some(sp), x, y, depth, level, vitals, core) {
        if let Some(mon) = level.monster_mut(id) {
            mon.timers.sleep = ASLEEP;
        }
    }
}

/// Elect, pick, and stock one special room on a freshly built level.
pub fn mk_special_room(
    level: &mut Level,
    depth: u32,
    vitals: &mut VitalsRegistry,
    grng: &mut GameRng,
    core: &mut GameRng,
) {
    let Some(rtype) = pick_special_type(depth, grng) else { return };
    let strict = rtype == RoomType::Temple;
    let Some(idx) = pick_room(level, strict, grng) else { return };
    stock_room(level, idx, rtype, depth, vitals, grng, core);
}

/// Convert an ordinary room into `rtype` and fill it.
pub fn stock_room(
    level: &mut Level,
    room_idx: usize,
    rtype: RoomType,
    depth: u32,
    vitals: &mut VitalsRegistry,
    grng: &mut GameRng,
    core: &mut GameRng,
) {
    if rtype.is_shop() {
        stock_shop(level, room_idx, depth, vitals, grng);
        return;
    }
    let room = level.rooms[room_idx].clone();

    match rtype {
        RoomType::Court => {
            let mut throne = room.somexy(grng);
            for _ in 0..10 {
                if level.stairs_at(throne.0, throne.1).is_none() {
                    break;
                }
                throne = room.somexy(grng);
            }
            let (tx, ty) = throne;
            level.set_terrain(tx, ty, Terrain::Throne);
            let gold = mkgold(grng.rnd(50 * depth.max(1)), level.new_object_id());
            level.place_object(gold, tx, ty);
            let mut chest = mksobj(ObjKind::Chest, true, grng, level.new_object_id());
            chest.locked = true;
            let (cx, cy) = room.somexy(grng);
            level.place_object(chest, cx, cy);
            for x in room.lx..=room.hx {
                for y in room.ly..=room.hy {
                    if (x, y) == (tx, ty) || level.stairs_at(x, y).is_some() {
                        continue;
                    }
                    stock_mon(level, courtmon, x, y, depth, vitals, core);
                }
            }
        }
        RoomType::Zoo => {
            for x in room.lx..=room.hx {
                for y in room.ly..=room.hy {
                    if level.stairs_at(x, y).is_some() {
                        continue;
                    }
                    stock_mon(level, zoomon, x, y, depth, vitals, core);
                    let gold = mkgold(grng.rnd(10 * depth.max(1)), level.new_object_id());
                    level.place_object(gold, x, y);
                }
            }
        }
        RoomType::Morgue => {
            for x in room.lx..=room.hx {
                for y in room.ly..=room.hy {
                    if level.stairs_at(x, y).is_some() {
                        continue;
                    }
                    stock_mon(level, morguemon, x, y, depth, vitals, core);
                    match grng.rn2(12) {
                        0 => level.set_terrain(x, y, Terrain::Grave),
                        1 | 2 => {
                            let mut corpse =
                                mksobj(ObjKind::Corpse, false, grng, level.new_object_id());
                            corpse.corpse_species = pick_species(depth, vitals, core);
                            level.place_object(corpse, x, y);
                        }
                        3 => {
                            let chest =
                                mksobj(ObjKind::Chest, true, grng, level.new_object_id());
                            level.place_object(chest, x, y);
                        }
                        _ => {}
                    }
                }
            }
            level.flags |= LevelFlags::GRAVEYARD;
        }
        RoomType::Beehive => {
            let (qx, qy) = room.center();
            if let Some(id) = makemon(Some(Species::QueenBee), qx, qy, depth, level, vitals, core)
            {
                if let Some(mon) = level.monster_mut(id) {
                    mon.timers.sleep = ASLEEP;
                }
            }
            for x in room.lx..=room.hx {
                for y in room.ly..=room.hy {
                    if level.stairs_at(x, y).is_some() {
                        continue;
                    }
                    stock_mon(level, beemon, x, y, depth, vitals, core);
                    if grng.one_in(3) {
                        let jelly =
                            mksobj(ObjKind::RoyalJelly, false, grng, level.new_object_id());
                        level.place_object(jelly, x, y);
                    }
                }
            }
        }
        RoomType::Barracks => {
            let squad = 3 + grng.rn2(4);
            for _ in 0..squad {
                let (x, y) = room.somexy(grng);
                stock_mon(level, squadmon, x, y, depth, vitals, core);
            }
        }
        RoomType::Anthole => {
            for x in room.lx..=room.hx {
                for y in room.ly..=room.hy {
                    if level.stairs_at(x, y).is_some() {
                        continue;
                    }
                    if grng.rn2(3) != 0 {
                        stock_mon(level, antmon, x, y, depth, vitals, core);
                    }
                    if grng.one_in(5) {
                        let kind = if grng.one_in(3) {
                            ObjKind::Apple
                        } else {
                            ObjKind::FoodRation
                        };
                        let food = mksobj(kind, false, grng, level.new_object_id());
                        level.place_object(food, x, y);
                    }
                }
            }
        }
        RoomType::Swamp => {
            for x in room.lx..=room.hx {
                for y in room.ly..=room.hy {
                    if level.stairs_at(x, y).is_some() || level.monster_at(x, y).is_some() {
                        continue;
                    }
                    if (x + y) % 2 == 0 {
                        level.set_terrain(x, y, Terrain::Pool);
                        if grng.one_in(4) {
                            stock_mon(level, swampmon, x, y, depth, vitals, core);
                        }
                    }
                }
            }
        }
        RoomType::Temple => {
            let (ax, ay) = room.center();
            level.set_terrain(ax, ay, Terrain::Altar);
            makemon(Some(Species::AlignedPriest), ax, ay, depth, level, vitals, core);
        }
        RoomType::LeprechaunHall => {
            for x in room.lx..=room.hx {
                for y in room.ly..=room.hy {
                    if level.stairs_at(x, y).is_some() {
                        continue;
                    }
                    if grng.one_in(2) {
                        stock_mon(level, lepmon, x, y, depth, vitals, core);
                    } else if grng.one_in(3) {
                        let gold = mkgold(grng.rnd(20 * depth.max(1)), level.new_object_id());
                        level.place_object(gold, x, y);
                    }
                }
            }
        }
        RoomType::CockatriceNest => {
            for x in room.lx..=room.hx {
                for y in room.ly..=room.hy {
                    if level.stairs_at(x, y).is_some() {
                        continue;
                    }
                    if grng.rn2(3) != 0 {
                        stock_mon(level, nestmon, x, y, depth, vitals, core);
                    }
                    if grng.one_in(5) {
                        let mut statue =
                            mksobj(ObjKind::Statue, false, grng, level.new_object_id());
                        statue.corpse_species = pick_species(depth, vitals, core);
                        level.place_object(statue, x, y);
                    }
                }
            }
        }
        RoomType::Ordinary | RoomType::Shop(_) => {}
    }

    level.rooms[room_idx].rtype = rtype;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::level::Stairway;
    use crate::dungeon::room::Room;

    fn three_room_level() -> Level {
        let mut level = Level::new(10);
        level.add_room(Room::new(3, 2, 10, 7, true));
        level.add_room(Room::new(20, 2, 28, 8, true));
        level.add_room(Room::new(40, 10, 50, 18, true));
        level
    }

    #[test]
    fn test_no_special_rooms_at_depth_one() {
        let mut rng = GameRng::new(3);
        for _ in 0..256 {
            assert_eq!(pick_special_type(1, &mut rng), None);
        }
    }

    #[test]
    fn test_election_sees_variety_when_deep() {
        let mut rng = GameRng::new(11);
        let mut kinds = Vec::new();
        for _ in 0..512 {
            if let Some(t) = pick_special_type(20, &mut rng) {
                if !kinds.contains(&t) {
                    kinds.push(t);
                }
            }
        }
        assert!(kinds.len() >= 4, "only saw {kinds:?}");
    }

    #[test]
    fn test_pick_room_avoids_stairs_rooms() {
        let mut level = three_room_level();
        level.stairs.push(Stairway { x: 5, y: 4, up: true });
        level.stairs.push(Stairway { x: 24, y: 5, up: false });
        let mut rng = GameRng::new(7);
        for _ in 0..64 {
            let idx = pick_room(&level, true, &mut rng).expect("room available");
            assert_eq!(idx, 2);
        }
    }

    #[test]
    fn test_pick_room_none_when_everything_taken() {
        let mut level = three_room_level();
        for room in &mut level.rooms {
            room.rtype = RoomType::Zoo;
        }
        let mut rng = GameRng::new(7);
        assert_eq!(pick_room(&level, false, &mut rng), None);
    }

    #[test]
    fn test_court_gets_throne_chest_and_sleepers() {
        let mut level = three_room_level();
        let mut vitals = VitalsRegistry::new();
        let mut grng = GameRng::new(21);
        let mut core = GameRng::new(22);
        stock_room(&mut level, 0, RoomType::Court, 8, &mut vitals, &mut grng, &mut core);

        let room = level.rooms[0].clone();
        assert_eq!(room.rtype, RoomType::Court);
        let mut has_throne = false;
        for x in room.lx..=room.hx {
            for y in room.ly..=room.hy {
                if level.terrain(x, y) == Terrain::Throne {
                    has_throne = true;
                }
            }
        }
        assert!(has_throne);
        assert!(level.objects.iter().any(|o| o.kind == ObjKind::Chest && o.locked));
        assert!(!level.monsters.is_empty());
        assert!(level.monsters.iter().all(|m| m.is_asleep()));
    }

    #[test]
    fn test_morgue_flags_graveyard() {
        let mut level = three_room_level();
        let mut vitals = VitalsRegistry::new();
        let mut grng = GameRng::new(5);
        let mut core = GameRng::new(6);
        stock_room(&mut level, 1, RoomType::Morgue, 12, &mut vitals, &mut grng, &mut core);
        assert!(level.flags.contains(LevelFlags::GRAVEYARD));
        assert!(level
            .monsters
            .iter()
            .all(|m| m.species.is_undead() || m.species == Species::Ghost));
    }

    #[test]
    fn test_beehive_has_queen() {
        let mut level = three_room_level();
        let mut vitals = VitalsRegistry::new();
        let mut grng = GameRng::new(2);
        let mut core = GameRng::new(3);
        stock_room(&mut level, 2, RoomType::Beehive, 10, &mut vitals, &mut grng, &mut core);
        assert_eq!(
            level.monsters.iter().filter(|m| m.species == Species::QueenBee).count(),
            1
        );
        assert!(level.monsters.iter().any(|m| m.species == Species::KillerBee));
    }

    #[test]
    fn test_swamp_pools_hold_eels() {
        let mut level = three_room_level();
        let mut vitals = VitalsRegistry::new();
        let mut grng = GameRng::new(14);
        let mut core = GameRng::new(15);
        stock_room(&mut level, 2, RoomType::Swamp, 16, &mut vitals, &mut grng, &mut core);
        let room = level.rooms[2].clone();
        let pools = (room.lx..=room.hx)
            .flat_map(|x| (room.ly..=room.hy).map(move |y| (x, y)))
            .filter(|&(x, y)| level.terrain(x, y) == Terrain::Pool)
            .count();
        assert!(pools > 0);
        for mon in &level.monsters {
            assert_eq!(mon.species, Species::GiantEel);
            assert_eq!(level.terrain(mon.x, mon.y), Terrain::Pool);
        }
    }

    #[test]
    fn test_temple_altar_and_priest() {
        let mut level = three_room_level();
        let mut vitals = VitalsRegistry::new();
        let mut grng = GameRng::new(8);
        let mut core = GameRng::new(9);
        stock_room(&mut level, 0, RoomType::Temple, 9, &mut vitals, &mut grng, &mut core);
        let (ax, ay) = level.rooms[0].center();
        assert_eq!(level.terrain(ax, ay), Terrain::Altar);
        let priest = level.monster_at(ax, ay).expect("priest at altar");
        assert_eq!(priest.species, Species::AlignedPriest);
        assert!(priest.peaceful);
    }

    #[test]
    fn test_genocide_empties_the_hive() {
        let mut level = three_room_level();
        let mut vitals = VitalsRegistry::new();
        vitals.genocide(Species::KillerBee);
        vitals.genocide(Species::QueenBee);
        let mut grng = GameRng::new(2);
        let mut core = GameRng::new(3);
        stock_room(&mut level, 2, RoomType::Beehive, 10, &mut vitals, &mut grng, &mut core);
        assert!(level.monsters.is_empty());
    }

    #[test]
    fn test_selector_map_covers_monster_rooms() {
        for rtype in [
            RoomType::Court,
            RoomType::Zoo,
            RoomType::Morgue,
            RoomType::Beehive,
            RoomType::Barracks,
            RoomType::Anthole,
            RoomType::Swamp,
            RoomType::LeprechaunHall,
            RoomType::CockatriceNest,
        ] {
            assert!(monster_selector(rtype).is_some(), "{rtype:?}");
        }
        assert!(monster_selector(RoomType::Ordinary).is_none());
        assert!(monster_selector(RoomType::Temple).is_none());
    }
}
