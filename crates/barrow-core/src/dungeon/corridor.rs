//! Corridors and doors.
//!
//! Rooms are joined in four phases: adjacent pairs, pairs two apart,
//! anything still cut off from room 0, then a few extra corridors for
//! variety. Connectivity is tracked with equivalence classes so phase
//! three can see exactly which rooms are still isolated.

use barrow_rng::GameRng;

use crate::dungeon::cell::{DoorMask, Terrain};
use crate::dungeon::level::Level;
use crate::dungeon::room::Room;

/// Which rooms can already reach each other.
#[derive(Debug, Clone)]
pub struct ConnectivityTracker {
    class: Vec<usize>,
}

impl ConnectivityTracker {
    pub fn new(num_rooms: usize) -> ConnectivityTracker {
        ConnectivityTracker {
            class: (0..num_rooms).collect(),
        }
    }

    pub fn are_connected(&self, a: usize, b: usize) -> bool {
        a < self.class.len() && b < self.class.len() && self.class[a] == self.class[b]
    }

    pub fn merge(&mut self, a: usize, b: usize) {
        if a >= self.class.len() || b >= self.class.len() {
            return;
        }
        let old = self.class[b];
        let new = self.class[a];
        for c in &mut self.class {
            if *c == old {
                *c = new;
            }
        }
    }

    pub fn all_connected(&self) -> bool {
        self.class.windows(2).all(|w| w[0] == w[1])
    }
}

/// True when a cardinal neighbor is a door. Doors are never placed
/// directly beside another door.
pub fn bydoor(level: &Level, x: i32, y: i32) -> bool {
    [(x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)]
        .iter()
        .any(|&(nx, ny)| level.terrain(nx, ny).is_door())
}

/// A wall cell may take a door if it is a plain wall, not adjacent to
/// an existing door, and not a room corner.
pub fn okdoor(level: &Level, room: &Room, x: i32, y: i32) -> bool {
    if !level.terrain(x, y).is_wall() || bydoor(level, x, y) {
        return false;
    }
    let corner_x = x == room.lx - 1 || x == room.hx + 1;
    let corner_y = y == room.ly - 1 || y == room.hy + 1;
    !(corner_x && corner_y)
}

/// Pick a door position on `room`'s wall facing `target`. Tries random
/// spots on the facing wall first, then walks the whole perimeter.
pub fn finddpos(level: &Level, room: &Room, target: &Room, rng: &mut GameRng) -> Option<(i32, i32)> {
    let (rx, ry) = room.center();
    let (tx, ty) = target.center();
    let horizontal_approach = (tx - rx).abs() > (ty - ry).abs();

    for _ in 0..8 {
        let (x, y) = if horizontal_approach {
            let x = if tx > rx { room.hx + 1 } else { room.lx - 1 };
            (x, room.ly + rng.rn2(room.height() as u32) as i32)
        } else {
            let y = if ty > ry { room.hy + 1 } else { room.ly - 1 };
            (room.lx + rng.rn2(room.width() as u32) as i32, y)
        };
        if okdoor(level, room, x, y) {
            return Some((x, y));
        }
    }

    // fall back to scanning every wall cell
    for x in room.lx - 1..=room.hx + 1 {
        for y in [room.ly - 1, room.hy + 1] {
            if okdoor(level, room, x, y) {
                return Some((x, y));
            }
        }
    }
    for y in room.ly..=room.hy {
        for x in [room.lx - 1, room.hx + 1] {
            if okdoor(level, room, x, y) {
                return Some((x, y));
            }
        }
    }
    None
}

/// Turn a wall cell into a doorway and note it on the room. Secret
/// doors keep looking like wall until discovered.
pub fn add_door(level: &mut Level, room_idx: usize, x: i32, y: i32, mask: DoorMask, secret: bool) {
    if let Some(tile) = level.tile_mut(x, y) {
        tile.typ = if secret { Terrain::SecretDoor } else { Terrain::Door };
        tile.doormask = mask;
    }
    level.doors.push((x, y));
    if let Some(room) = level.rooms.get_mut(room_idx) {
        room.doorct += 1;
    }
}

/// Dig a wandering corridor from one cell to another. Steps are biased
/// toward the target with random detours; walls along the way become
/// corridor so a door pass can claim them later. Gives up after a
/// bounded number of steps; callers needing a guarantee re-check
/// connectivity afterwards.
pub fn dig_corridor(
    level: &mut Level,
    from: (i32, i32),
    to: (i32, i32),
    fill: Terrain,
    allow_secret: bool,
    rng: &mut GameRng,
) {
    let (mut x, mut y) = from;
    let (tx, ty) = to;
    let mut steps = 0;
    const MAX_STEPS: i32 = 500;

    while (x != tx || y != ty) && steps < MAX_STEPS {
        steps += 1;
        let dx = tx - x;
        let dy = ty - y;
        let (mx, my) = if dx.abs() > dy.abs() {
            if rng.rn2(dx.unsigned_abs() + 1) > 0 || dy == 0 {
                (dx.signum(), 0)
            } else {
                (0, dy.signum())
            }
        } else if dy.abs() > dx.abs() {
            if rng.rn2(dy.unsigned_abs() + 1) > 0 || dx == 0 {
                (0, dy.signum())
            } else {
                (dx.signum(), 0)
            }
        } else if rng.one_in(2) {
            (dx.signum(), 0)
        } else {
            (0, dy.signum())
        };
        x += mx;
        y += my;
        if !Level::isok(x, y) {
            return;
        }
        match level.terrain(x, y) {
            Terrain::Stone => {
                let t = if allow_secret && rng.rn2(100) == 0 {
                    Terrain::SecretCorridor
                } else {
                    fill
                };
                level.set_terrain(x, y, t);
            }
            t if t.is_wall() => {
                level.set_terrain(x, y, fill);
            }
            Terrain::Corridor | Terrain::SecretCorridor | Terrain::Room | Terrain::Door => {}
            _ => return,
        }
    }
}

/// Corridor between two arbitrary cells. Used by the cave joiner,
/// which has no rooms or doors to respect.
pub fn dig_between(
    level: &mut Level,
    from: (i32, i32),
    to: (i32, i32),
    fill: Terrain,
    rng: &mut GameRng,
) {
    dig_corridor(level, from, to, fill, false, rng);
}

/// Join two rooms: pick facing door positions, dig between them, cut
/// the doorways, and merge the connectivity classes.
fn join(
    level: &mut Level,
    a: usize,
    b: usize,
    tracker: &mut ConnectivityTracker,
    nxcor: bool,
    rng: &mut GameRng,
) {
    if a >= level.rooms.len() || b >= level.rooms.len() || a == b {
        return;
    }
    let room_a = level.rooms[a].clone();
    let room_b = level.rooms[b].clone();
    let Some((ax, ay)) = finddpos(level, &room_a, &room_b, rng) else {
        return;
    };
    let Some((bx, by)) = finddpos(level, &room_b, &room_a, rng) else {
        return;
    };
    dig_corridor(level, (ax, ay), (bx, by), Terrain::Corridor, nxcor, rng);
    add_door(level, a, ax, ay, DoorMask::empty(), false);
    add_door(level, b, bx, by, DoorMask::empty(), false);
    tracker.merge(a, b);
}

/// The four-phase room joining pass.
pub fn makecorridors(level: &mut Level, rng: &mut GameRng) {
    let n = level.rooms.len();
    if n < 2 {
        return;
    }
    let mut tracker = ConnectivityTracker::new(n);

    // phase 1: neighbors in placement order
    for i in 0..n - 1 {
        join(level, i, i + 1, &mut tracker, false, rng);
        // roughly half the time stop early to leave work for phase 2
        if rng.rn2(50) == 0 {
            break;
        }
    }

    // phase 2: rooms two apart, when not already connected
    for i in 0..n.saturating_sub(2) {
        if !tracker.are_connected(i, i + 2) {
            join(level, i, i + 2, &mut tracker, false, rng);
        }
    }

    // phase 3: anything still cut off from room 0
    for i in 1..n {
        if !tracker.are_connected(0, i) {
            join(level, 0, i, &mut tracker, false, rng);
        }
    }

    // phase 4: a few extra corridors for loops
    if n > 2 {
        for _ in 0..rng.rn2(n as u32) {
            let a = rng.rn2(n as u32) as usize;
            let b = rng.rn2(n as u32 - 2) as usize;
            let b = if b >= a { b + 2 } else { b };
            if b < n {
                join(level, a, b, &mut tracker, true, rng);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_room_level() -> Level {
        let mut level = Level::new(1);
        level.add_room(Room::new(5, 5, 10, 9, true));
        level.add_room(Room::new(40, 5, 46, 9, true));
        level
    }

    #[test]
    fn test_tracker_merge() {
        let mut t = ConnectivityTracker::new(4);
        assert!(!t.are_connected(0, 1));
        t.merge(0, 1);
        t.merge(2, 3);
        assert!(t.are_connected(0, 1));
        assert!(t.are_connected(2, 3));
        assert!(!t.are_connected(1, 2));
        assert!(!t.all_connected());
        t.merge(1, 3);
        assert!(t.all_connected());
    }

    #[test]
    fn test_makecorridors_connects_rooms() {
        for seed in [1u64, 7, 99] {
            let mut level = two_room_level();
            let mut rng = GameRng::new(seed);
            makecorridors(&mut level, &mut rng);
            let a = level.rooms[0].center();
            let b = level.rooms[1].center();
            assert!(reaches(&level, a, b), "seed {seed}: rooms not joined");
            assert!(level.rooms.iter().all(|r| r.doorct > 0));
        }
    }

    #[test]
    fn test_doors_never_adjacent() {
        let mut level = two_room_level();
        let mut rng = GameRng::new(3);
        makecorridors(&mut level, &mut rng);
        for &(x, y) in &level.doors {
            for &(nx, ny) in &[(x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)] {
                if level.doors.contains(&(nx, ny)) {
                    panic!("doors at ({x},{y}) and ({nx},{ny}) touch");
                }
            }
        }
    }

    #[test]
    fn test_dig_straightish_path_lands() {
        let mut level = Level::new(1);
        // clear a band of floor so the dig has somewhere legal to end
        let mut rng = GameRng::new(11);
        dig_corridor(&mut level, (5, 10), (30, 10), Terrain::Corridor, false, &mut rng);
        assert!(reaches(&level, (5, 10), (30, 10)));
    }

    fn reaches(level: &Level, from: (i32, i32), to: (i32, i32)) -> bool {
        let mut seen = vec![false; (crate::consts::COLNO * crate::consts::ROWNO) as usize];
        let mut stack = vec![from];
        while let Some((x, y)) = stack.pop() {
            if (x, y) == to {
                return true;
            }
            if !Level::isok(x, y) {
                continue;
            }
            let idx = (x * crate::consts::ROWNO + y) as usize;
            if seen[idx] {
                continue;
            }
            seen[idx] = true;
            let walkable = level.tile(x, y).is_some_and(|t| t.is_walkable()) || (x, y) == from;
            if !walkable {
                continue;
            }
            for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
                stack.push((x + dx, y + dy));
            }
        }
        false
    }
}
