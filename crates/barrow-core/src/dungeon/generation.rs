//! Building a whole level: rooms, corridors, doors, stairs, traps,
//! inhabitants, and at most one special room.
//!
//! Layout draws all come from the per-depth generation stream, so the
//! map is a pure function of (seed, depth). Population draws that the
//! genocide census can veto come from the gameplay stream instead.

use barrow_rng::{GameRng, RngPool};

use crate::consts::MAXNROFROOMS;
use crate::dungeon::cell::{DoorMask, Terrain};
use crate::dungeon::cavern::{mkmap, CavernSpec};
use crate::dungeon::corridor::makecorridors;
use crate::dungeon::level::{Level, Stairway};
use crate::dungeon::rect::RectPool;
use crate::dungeon::room::Room;
use crate::dungeon::special_rooms::mk_special_room;
use crate::dungeon::trap::mktrap;
use crate::monster::{makemon, VitalsRegistry};
use crate::object::mkobj;

/// Widest floor a generated room may have.
const MAX_ROOM_W: i32 = 13;
const MAX_ROOM_H: i32 = 7;

/// Fit a room into the free-space pool. Fifty placement attempts, then
/// give up; the pool is usually exhausted well before the room cap.
fn try_place(pool: &RectPool, depth: u32, grng: &mut GameRng) -> Option<Room> {
    for _ in 0..50 {
        let free = pool.random(grng)?;
        let max_w = (free.width() - 2).min(MAX_ROOM_W);
        let max_h = (free.height() - 2).min(MAX_ROOM_H);
        if max_w < 2 || max_h < 2 {
            continue;
        }
        let w = 2 + grng.rn2((max_w - 1) as u32) as i32;
        let h = 2 + grng.rn2((max_h - 1) as u32) as i32;
        let lx = free.lx + 1 + grng.rn2((free.width() - w - 1) as u32) as i32;
        let ly = free.ly + 1 + grng.rn2((free.height() - h - 1) as u32) as i32;
        // shallow levels are mostly lit, deep ones mostly dark
        let lit = grng.rnd(depth.max(1)) < 10;
        return Some(Room::new(lx, ly, lx + w - 1, ly + h - 1, lit));
    }
    None
}

/// Place rooms until the pool or the cap runs out, then carve them
/// left to right so corridor phases see neighbors in x order.
fn makerooms(level: &mut Level, depth: u32, grng: &mut GameRng) -> u32 {
    let mut pool = RectPool::new();
    let mut placed: Vec<Room> = Vec::new();
    while placed.len() < MAXNROFROOMS {
        let Some(room) = try_place(&pool, depth, grng) else { break };
        pool.split_around(&room.outer());
        placed.push(room);
    }
    placed.sort_by_key(|r| r.lx);
    for room in placed {
        level.add_room(room);
    }
    pool.dropped
}

/// Assign final door states. Joining leaves bare doorways; here they
/// become open, closed, locked, or secret, and deep closed doors can
/// carry a trap.
fn finish_doors(level: &mut Level, depth: u32, grng: &mut GameRng) {
    for (x, y) in level.doors.clone() {
        let mut mask = match grng.rn2(5) {
            0 => DoorMask::empty(),
            1 => DoorMask::OPEN,
            2 | 3 => DoorMask::CLOSED,
            _ => DoorMask::CLOSED | DoorMask::LOCKED,
        };
        let secret = grng.one_in(8);
        if secret {
            mask = DoorMask::CLOSED;
        }
        if mask.is_shut() && depth >= 5 && grng.one_in(8) {
            mask |= DoorMask::TRAPPED;
        }
        if let Some(tile) = level.tile_mut(x, y) {
            if secret {
                tile.typ = Terrain::SecretDoor;
            }
            tile.doormask = mask;
        }
    }
}

/// Put the stairs in two different rooms when there are two to use.
fn mkstairs(level: &mut Level, grng: &mut GameRng) {
    let n = level.rooms.len();
    if n == 0 {
        return;
    }
    let up_room = grng.rn2(n as u32) as usize;
    let down_room = if n > 1 {
        let mut r = grng.rn2(n as u32 - 1) as usize;
        if r >= up_room {
            r += 1;
        }
        r
    } else {
        up_room
    };
    for (room_idx, up) in [(up_room, true), (down_room, false)] {
        let room = level.rooms[room_idx].clone();
        for _ in 0..50 {
            let (x, y) = room.somexy(grng);
            if level.stairs_at(x, y).is_some()
                || !level.tile(x, y).is_some_and(|t| t.is_walkable())
            {
                continue;
            }
            level.set_terrain(x, y, Terrain::Stairs);
            level.stairs.push(Stairway { x, y, up });
            break;
        }
    }
}

/// Scatter level furniture, floor loot, and starting monsters.
fn populate(
    level: &mut Level,
    depth: u32,
    vitals: &mut VitalsRegistry,
    grng: &mut GameRng,
    core: &mut GameRng,
) {
    for i in 0..level.rooms.len() {
        let room = level.rooms[i].clone();
        if room.rtype.is_special() {
            continue;
        }
        if grng.one_in(2) {
            let (x, y) = room.somexy(grng);
            makemon(None, x, y, depth, level, vitals, core);
        }
        if grng.one_in(3) {
            let (x, y) = room.somexy(grng);
            if level.tile(x, y).is_some_and(|t| t.is_walkable()) {
                let id = level.new_object_id();
                let obj = mkobj(None, true, grng, id);
                level.place_object(obj, x, y);
            }
        }
        if grng.one_in(6) {
            let (x, y) = room.somexy(grng);
            if level.terrain(x, y) == Terrain::Room {
                level.set_terrain(x, y, Terrain::Fountain);
            }
        }
    }
    for _ in 0..grng.rn2(depth / 3 + 2) {
        mktrap(level, depth, grng);
    }
}

/// A cave level: cellular map, stairs on open floor, the usual traps
/// and monsters, no rooms-and-doors structure.
fn mk_cavern_level(
    level: &mut Level,
    depth: u32,
    vitals: &mut VitalsRegistry,
    grng: &mut GameRng,
    core: &mut GameRng,
) {
    let spec = CavernSpec {
        lit: depth < 10,
        ..CavernSpec::default()
    };
    mkmap(level, &spec, grng);

    let mut open: Vec<(i32, i32)> = Vec::new();
    for x in 0..crate::consts::COLNO {
        for y in 0..crate::consts::ROWNO {
            if level.tile(x, y).is_some_and(|t| t.is_walkable()) {
                open.push((x, y));
            }
        }
    }
    if open.is_empty() {
        return;
    }
    for up in [true, false] {
        let (x, y) = open[grng.rn2(open.len() as u32) as usize];
        if level.stairs_at(x, y).is_none() {
            level.set_terrain(x, y, Terrain::Stairs);
            level.stairs.push(Stairway { x, y, up });
        }
    }
    for _ in 0..grng.rn2(depth / 3 + 2) {
        mktrap(level, depth, grng);
    }
    for _ in 0..3 + grng.rn2(4) {
        let (x, y) = open[grng.rn2(open.len() as u32) as usize];
        makemon(None, x, y, depth, level, vitals, core);
    }
}

/// Build the level for a depth.
pub fn mklev(depth: u32, rng: &mut RngPool, vitals: &mut VitalsRegistry) -> Level {
    let mut grng = rng.level_stream(depth.min(255) as u8);
    let core = rng.core();
    let mut level = Level::new(depth);

    if depth >= 13 && grng.one_in(8) {
        mk_cavern_level(&mut level, depth, vitals, &mut grng, core);
        return level;
    }

    makerooms(&mut level, depth, &mut grng);
    makecorridors(&mut level, &mut grng);
    finish_doors(&mut level, depth, &mut grng);
    mkstairs(&mut level, &mut grng);
    mk_special_room(&mut level, depth, vitals, &mut grng, core);
    populate(&mut level, depth, vitals, &mut grng, core);
    level
}
