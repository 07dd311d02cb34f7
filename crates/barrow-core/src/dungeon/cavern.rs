//! Cave levels grown by cellular smoothing.
//!
//! The interior is seeded with random foreground cells, smoothed by
//! neighbor-count passes, then the surviving regions are registered as
//! irregular rooms, joined with corridors, and walled off.

use serde::{Deserialize, Serialize};

use barrow_rng::GameRng;

use crate::consts::{COLNO, MAXNROFROOMS, NO_ROOM, ROWNO};
use crate::dungeon::cell::Terrain;
use crate::dungeon::corridor::dig_between;
use crate::dungeon::level::{Level, LevelFlags};
use crate::dungeon::rect::Rect;
use crate::dungeon::room::Room;

/// Interior width and height the passes operate on.
const WIDTH: i32 = COLNO - 2;
const HEIGHT: i32 = ROWNO - 2;

/// Regions at or below this many cells are erased instead of kept.
const MIN_REGION: usize = 3;

const DIRS: [(i32, i32); 8] =
    [(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (-1, 1), (0, 1), (1, 1)];

/// Recipe for one cave map.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CavernSpec {
    pub fg: Terrain,
    pub bg: Terrain,
    pub smoothed: bool,
    pub join: bool,
    pub lit: bool,
    pub walled: bool,
}

impl Default for CavernSpec {
    fn default() -> CavernSpec {
        CavernSpec {
            fg: Terrain::Room,
            bg: Terrain::Stone,
            smoothed: true,
            join: true,
            lit: false,
            walled: true,
        }
    }
}

fn get_map(level: &Level, x: i32, y: i32, bg: Terrain) -> Terrain {
    if x <= 0 || y < 0 || x > WIDTH || y >= HEIGHT {
        return bg;
    }
    level.terrain(x, y)
}

fn fg_neighbors(level: &Level, x: i32, y: i32, spec: &CavernSpec) -> u32 {
    DIRS.iter()
        .filter(|(dx, dy)| get_map(level, x + dx, y + dy, spec.bg) == spec.fg)
        .count() as u32
}

fn init_map(level: &mut Level, spec: &CavernSpec) {
    for x in 1..COLNO {
        for y in 0..ROWNO {
            level.set_terrain(x, y, spec.bg);
        }
    }
}

/// Seed two fifths of the interior with foreground.
fn init_fill(level: &mut Level, spec: &CavernSpec, rng: &mut GameRng) {
    let limit = WIDTH * HEIGHT * 2 / 5;
    let mut count = 0;
    while count < limit {
        let x = rng.rn1((WIDTH - 1) as u32, 2);
        let y = rng.rnd((HEIGHT - 1) as u32) as i32;
        if level.terrain(x, y) == spec.bg {
            level.set_terrain(x, y, spec.fg);
            count += 1;
        }
    }
}

/// Life-like step, in place: lonely cells die, crowded cells fill.
fn pass_one(level: &mut Level, spec: &CavernSpec) {
    for x in 2..=WIDTH {
        for y in 1..HEIGHT {
            match fg_neighbors(level, x, y, spec) {
                0..=2 => level.set_terrain(x, y, spec.bg),
                5..=8 => level.set_terrain(x, y, spec.fg),
                _ => {}
            }
        }
    }
}

/// Knock out cells with exactly five foreground neighbors, into a
/// scratch copy so the pass reads a consistent snapshot.
fn pass_two(level: &mut Level, spec: &CavernSpec) {
    let mut scratch = Vec::with_capacity((WIDTH * HEIGHT) as usize);
    for x in 2..=WIDTH {
        for y in 1..HEIGHT {
            let t = if fg_neighbors(level, x, y, spec) == 5 {
                spec.bg
            } else {
                get_map(level, x, y, spec.bg)
            };
            scratch.push((x, y, t));
        }
    }
    for (x, y, t) in scratch {
        level.set_terrain(x, y, t);
    }
}

/// Erode cells with fewer than three foreground neighbors.
fn pass_three(level: &mut Level, spec: &CavernSpec) {
    let mut scratch = Vec::with_capacity((WIDTH * HEIGHT) as usize);
    for x in 2..=WIDTH {
        for y in 1..HEIGHT {
            let t = if fg_neighbors(level, x, y, spec) < 3 {
                spec.bg
            } else {
                get_map(level, x, y, spec.bg)
            };
            scratch.push((x, y, t));
        }
    }
    for (x, y, t) in scratch {
        level.set_terrain(x, y, t);
    }
}

/// Scanline flood fill over untagged foreground, diagonal reach
/// included. Tags filled tiles with `room_id` and returns the cells
/// plus their bounding box.
fn flood_region(
    level: &mut Level,
    sx: i32,
    sy: i32,
    fg: Terrain,
    room_id: u8,
) -> (Vec<(i32, i32)>, Rect) {
    let fillable = |level: &Level, x: i32, y: i32| {
        level
            .tile(x, y)
            .is_some_and(|t| t.typ == fg && t.room_id == NO_ROOM)
    };
    let mut cells = Vec::new();
    let mut bounds = Rect::new(sx, sy, sx, sy);
    let mut stack = vec![(sx, sy)];
    while let Some((x, y)) = stack.pop() {
        if !fillable(level, x, y) {
            continue;
        }
        let mut x0 = x;
        while fillable(level, x0 - 1, y) {
            x0 -= 1;
        }
        let mut x1 = x;
        while fillable(level, x1 + 1, y) {
            x1 += 1;
        }
        for xx in x0..=x1 {
            if let Some(tile) = level.tile_mut(xx, y) {
                tile.room_id = room_id;
            }
            cells.push((xx, y));
            bounds.lx = bounds.lx.min(xx);
            bounds.hx = bounds.hx.max(xx);
            bounds.ly = bounds.ly.min(y);
            bounds.hy = bounds.hy.max(y);
        }
        for yy in [y - 1, y + 1] {
            for xx in x0 - 1..=x1 + 1 {
                if fillable(level, xx, yy) {
                    stack.push((xx, yy));
                }
            }
        }
    }
    (cells, bounds)
}

/// Find every foreground region; keep the real ones as irregular
/// rooms, erase the holes, and dig corridors until the whole map is
/// one component.
fn join_map(level: &mut Level, spec: &CavernSpec, rng: &mut GameRng) {
    let mut anchors: Vec<(i32, i32)> = Vec::new();
    for x in 2..=WIDTH {
        for y in 1..HEIGHT {
            let tagged = level
                .tile(x, y)
                .is_some_and(|t| t.typ == spec.fg && t.room_id == NO_ROOM);
            if !tagged {
                continue;
            }
            let room_id = (crate::consts::ROOMOFFSET as usize + level.rooms.len()) as u8;
            let (cells, bounds) = flood_region(level, x, y, spec.fg, room_id);
            if cells.len() > MIN_REGION && level.rooms.len() < MAXNROFROOMS as usize * 2 {
                let mut room =
                    Room::new(bounds.lx, bounds.ly, bounds.hx, bounds.hy, spec.lit);
                room.irregular = true;
                level.register_room(room);
                anchors.push(cells[0]);
            } else {
                for (cx, cy) in cells {
                    if let Some(tile) = level.tile_mut(cx, cy) {
                        tile.typ = spec.bg;
                        tile.room_id = NO_ROOM;
                    }
                }
            }
        }
    }

    // chain neighbors, then force any region a randomized dig missed
    for i in 1..anchors.len() {
        dig_between(level, anchors[i - 1], anchors[i], Terrain::Corridor, rng);
    }
    for i in 1..anchors.len() {
        if !region_reaches(level, anchors[0], anchors[i]) {
            dig_straight(level, anchors[0], anchors[i]);
        }
    }
}

/// Walkability flood check between two cells.
fn region_reaches(level: &Level, from: (i32, i32), to: (i32, i32)) -> bool {
    let mut seen = vec![false; (COLNO * ROWNO) as usize];
    let mut stack = vec![from];
    while let Some((x, y)) = stack.pop() {
        if (x, y) == to {
            return true;
        }
        if !Level::isok(x, y) || seen[(x * ROWNO + y) as usize] {
            continue;
        }
        seen[(x * ROWNO + y) as usize] = true;
        if !level.terrain(x, y).is_walkable() {
            continue;
        }
        for (dx, dy) in DIRS {
            stack.push((x + dx, y + dy));
        }
    }
    false
}

/// L-shaped dig that cannot fail. Fallback when the randomized walk
/// gives up.
fn dig_straight(level: &mut Level, from: (i32, i32), to: (i32, i32)) {
    let (mut x, mut y) = from;
    while x != to.0 {
        x += (to.0 - x).signum();
        if level.terrain(x, y) == Terrain::Stone {
            level.set_terrain(x, y, Terrain::Corridor);
        }
    }
    while y != to.1 {
        y += (to.1 - y).signum();
        if level.terrain(x, y) == Terrain::Stone {
            level.set_terrain(x, y, Terrain::Corridor);
        }
    }
}

/// Turn stone bordering floor into walls. A floor neighbor in another
/// row makes a horizontal wall; one in the same row, vertical.
fn wallify(level: &mut Level) {
    for x in 1..COLNO {
        for y in 0..ROWNO {
            if level.terrain(x, y) != Terrain::Stone {
                continue;
            }
            for yy in y - 1..=y + 1 {
                for xx in x - 1..=x + 1 {
                    if level.terrain(xx, yy) == Terrain::Room {
                        let (typ, horiz) =
                            if yy != y { (Terrain::HWall, true) } else { (Terrain::VWall, false) };
                        if let Some(tile) = level.tile_mut(x, y) {
                            tile.typ = typ;
                            tile.horizontal = horiz;
                        }
                    }
                }
            }
        }
    }
}

fn finish_map(level: &mut Level, spec: &CavernSpec) {
    if spec.walled {
        wallify(level);
    }
    for x in 1..COLNO {
        for y in 0..ROWNO {
            let t = level.terrain(x, y);
            let lit_here = spec.lit
                && ((t == spec.fg && !spec.fg.is_rock())
                    || (t == spec.bg && !spec.bg.is_rock())
                    || (spec.walled && t.is_wall()));
            // lava glows regardless of the level's light
            if lit_here || t == Terrain::Lava {
                if let Some(tile) = level.tile_mut(x, y) {
                    tile.lit = true;
                }
            }
        }
    }
}

/// Grow a cave map over the level.
pub fn mkmap(level: &mut Level, spec: &CavernSpec, rng: &mut GameRng) {
    init_map(level, spec);
    init_fill(level, spec, rng);
    pass_one(level, spec);
    pass_two(level, spec);
    if spec.smoothed {
        pass_three(level, spec);
        pass_three(level, spec);
    }
    if spec.join {
        join_map(level, spec, rng);
    }
    finish_map(level, spec);
    if spec.walled && spec.join {
        level.flags |= LevelFlags::CAVERNOUS;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cave(seed: u64) -> Level {
        let mut level = Level::new(10);
        let mut rng = GameRng::new(seed);
        mkmap(&mut level, &CavernSpec::default(), &mut rng);
        level
    }

    fn floor_cells(level: &Level) -> Vec<(i32, i32)> {
        let mut out = Vec::new();
        for x in 0..COLNO {
            for y in 0..ROWNO {
                if level.terrain(x, y).is_walkable() {
                    out.push((x, y));
                }
            }
        }
        out
    }

    #[test]
    fn test_cave_has_substantial_floor() {
        let level = cave(0xCAFE);
        let floor = floor_cells(&level);
        assert!(floor.len() > 150, "only {} floor cells", floor.len());
        assert!(level.flags.contains(LevelFlags::CAVERNOUS));
    }

    #[test]
    fn test_cave_fully_connected() {
        for seed in [1u64, 2, 3, 0xBEEF, 0x1234_5678] {
            let level = cave(seed);
            let floor = floor_cells(&level);
            let start = floor[0];
            for &cell in &floor {
                assert!(
                    region_reaches(&level, start, cell),
                    "seed {seed}: {cell:?} unreachable from {start:?}"
                );
            }
        }
    }

    #[test]
    fn test_no_tiny_regions_survive() {
        let level = cave(42);
        for room in &level.rooms {
            assert!(room.irregular);
            assert!(room.area() > MIN_REGION as i32);
        }
    }

    #[test]
    fn test_walls_border_floor() {
        let level = cave(7);
        for x in 1..COLNO - 1 {
            for y in 1..ROWNO - 1 {
                if level.terrain(x, y) == Terrain::Room {
                    for (dx, dy) in DIRS {
                        let t = level.terrain(x + dx, y + dy);
                        assert_ne!(t, Terrain::Stone, "bare stone beside floor at ({x},{y})");
                    }
                }
            }
        }
    }

    #[test]
    fn test_lava_always_lit() {
        let mut level = Level::new(12);
        let spec = CavernSpec {
            fg: Terrain::Lava,
            bg: Terrain::Stone,
            lit: false,
            walled: false,
            join: false,
            smoothed: true,
        };
        let mut rng = GameRng::new(9);
        mkmap(&mut level, &spec, &mut rng);
        let mut lava = 0;
        for x in 0..COLNO {
            for y in 0..ROWNO {
                if level.terrain(x, y) == Terrain::Lava {
                    lava += 1;
                    assert!(level.tile(x, y).unwrap().lit, "dark lava at ({x},{y})");
                }
            }
        }
        assert!(lava > 0);
    }

    #[test]
    fn test_deterministic_for_seed() {
        let a = cave(555);
        let b = cave(555);
        for x in 0..COLNO {
            for y in 0..ROWNO {
                assert_eq!(a.terrain(x, y), b.terrain(x, y));
            }
        }
    }
}
