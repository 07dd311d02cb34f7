//! One dungeon level: terrain grid, rooms, doors, traps, monsters,
//! floor objects, stairs.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::consts::{COLNO, NO_ROOM, ROOMOFFSET, ROWNO};
use crate::dungeon::cell::{Terrain, Tile};
use crate::dungeon::room::Room;
use crate::dungeon::shop::ShopInfo;
use crate::dungeon::trap::Trap;
use crate::monster::{Monster, MonsterId};
use crate::object::{ObjLocation, Object, ObjectId};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct LevelFlags: u8 {
        /// A morgue was generated here.
        const GRAVEYARD = 0x01;
        const HAS_SHOP = 0x02;
        /// Cave level grown from cellular smoothing, no rooms.
        const CAVERNOUS = 0x04;
    }
}

impl Serialize for LevelFlags {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u8(self.bits())
    }
}

impl<'de> Deserialize<'de> for LevelFlags {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(LevelFlags::from_bits_truncate(u8::deserialize(d)?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stairway {
    pub x: i32,
    pub y: i32,
    pub up: bool,
}

/// Squared euclidean distance.
pub fn dist2(x0: i32, y0: i32, x1: i32, y1: i32) -> i32 {
    let dx = x0 - x1;
    let dy = y0 - y1;
    dx * dx + dy * dy
}

/// Chebyshev distance, the number of king moves.
pub fn distmin(x0: i32, y0: i32, x1: i32, y1: i32) -> i32 {
    (x0 - x1).abs().max((y0 - y1).abs())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    pub depth: u32,
    grid: Vec<Tile>,
    pub rooms: Vec<Room>,
    pub doors: Vec<(i32, i32)>,
    pub traps: Vec<Trap>,
    pub monsters: Vec<Monster>,
    pub objects: Vec<Object>,
    pub stairs: Vec<Stairway>,
    pub shops: Vec<ShopInfo>,
    pub flags: LevelFlags,
    next_object_id: ObjectId,
    next_monster_id: MonsterId,
}

impl Level {
    /// Solid stone, no features.
    pub fn new(depth: u32) -> Level {
        Level {
            depth,
            grid: vec![Tile::stone(); (COLNO * ROWNO) as usize],
            rooms: Vec::new(),
            doors: Vec::new(),
            traps: Vec::new(),
            monsters: Vec::new(),
            objects: Vec::new(),
            stairs: Vec::new(),
            shops: Vec::new(),
            flags: LevelFlags::empty(),
            next_object_id: ObjectId(1),
            next_monster_id: MonsterId(1),
        }
    }

    pub fn isok(x: i32, y: i32) -> bool {
        x >= 0 && x < COLNO && y >= 0 && y < ROWNO
    }

    fn idx(x: i32, y: i32) -> usize {
        (x * ROWNO + y) as usize
    }

    pub fn tile(&self, x: i32, y: i32) -> Option<&Tile> {
        if Level::isok(x, y) {
            Some(&self.grid[Level::idx(x, y)])
        } else {
            None
        }
    }

    pub fn tile_mut(&mut self, x: i32, y: i32) -> Option<&mut Tile> {
        if Level::isok(x, y) {
            Some(&mut self.grid[Level::idx(x, y)])
        } else {
            None
        }
    }

    /// Terrain at a cell; out of bounds reads as stone.
    pub fn terrain(&self, x: i32, y: i32) -> Terrain {
        self.tile(x, y).map_or(Terrain::Stone, |t| t.typ)
    }

    pub fn set_terrain(&mut self, x: i32, y: i32, typ: Terrain) {
        if let Some(tile) = self.tile_mut(x, y) {
            tile.typ = typ;
        }
    }

    pub fn new_object_id(&mut self) -> ObjectId {
        let id = self.next_object_id;
        self.next_object_id = id.next();
        id
    }

    pub fn new_monster_id(&mut self) -> MonsterId {
        let id = self.next_monster_id;
        self.next_monster_id = id.next();
        id
    }

    /// Carve a room into the grid and register it. Walls go on the
    /// cells just outside the floor bounds.
    pub fn add_room(&mut self, room: Room) {
        let room_id = ROOMOFFSET + self.rooms.len() as u8;
        for x in room.lx - 1..=room.hx + 1 {
            for y in room.ly - 1..=room.hy + 1 {
                let Some(tile) = self.tile_mut(x, y) else { continue };
                if room.contains(x, y) {
                    tile.typ = Terrain::Room;
                    tile.room_id = room_id;
                    tile.lit = room.rlit;
                } else if tile.typ == Terrain::Stone {
                    tile.typ = if y == room.ly - 1 || y == room.hy + 1 {
                        Terrain::HWall
                    } else {
                        Terrain::VWall
                    };
                    tile.horizontal = y == room.ly - 1 || y == room.hy + 1;
                    tile.lit = room.rlit;
                }
            }
        }
        self.rooms.push(room);
    }

    /// Register a room without touching the grid. Used for irregular
    /// regions whose tiles already exist; the caller tags `room_id`
    /// on them itself. Returns the id to tag with.
    pub fn register_room(&mut self, room: Room) -> u8 {
        let room_id = ROOMOFFSET + self.rooms.len() as u8;
        self.rooms.push(room);
        room_id
    }

    /// Index of the room whose floor covers a cell.
    pub fn room_index_at(&self, x: i32, y: i32) -> Option<usize> {
        let id = self.tile(x, y)?.room_id;
        if id == NO_ROOM {
            return None;
        }
        let idx = (id - ROOMOFFSET) as usize;
        if idx < self.rooms.len() {
            Some(idx)
        } else {
            None
        }
    }

    pub fn room_at(&self, x: i32, y: i32) -> Option<&Room> {
        self.room_index_at(x, y).map(|i| &self.rooms[i])
    }

    pub fn monster(&self, id: MonsterId) -> Option<&Monster> {
        self.monsters.iter().find(|m| m.id == id)
    }

    pub fn monster_mut(&mut self, id: MonsterId) -> Option<&mut Monster> {
        self.monsters.iter_mut().find(|m| m.id == id)
    }

    pub fn monster_at(&self, x: i32, y: i32) -> Option<&Monster> {
        self.monsters.iter().find(|m| m.x == x && m.y == y)
    }

    pub fn monster_at_mut(&mut self, x: i32, y: i32) -> Option<&mut Monster> {
        self.monsters.iter_mut().find(|m| m.x == x && m.y == y)
    }

    pub fn object(&self, id: ObjectId) -> Option<&Object> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    pub fn objects_at(&self, x: i32, y: i32) -> impl Iterator<Item = &Object> {
        self.objects
            .iter()
            .filter(move |o| o.loc == ObjLocation::Floor { x, y })
    }

    /// Put an object on the floor, merging into a matching stack if
    /// one is already there. Returns the id it ended up under.
    pub fn place_object(&mut self, mut obj: Object, x: i32, y: i32) -> ObjectId {
        obj.loc = ObjLocation::Floor { x, y };
        let target = self
            .objects
            .iter_mut()
            .find(|o| o.loc == ObjLocation::Floor { x, y } && o.mergable(&obj));
        if let Some(stack) = target {
            let id = stack.id;
            stack.absorb(obj);
            return id;
        }
        let id = obj.id;
        self.objects.push(obj);
        id
    }

    pub fn remove_object(&mut self, id: ObjectId) -> Option<Object> {
        let idx = self.objects.iter().position(|o| o.id == id)?;
        let mut obj = self.objects.remove(idx);
        obj.loc = ObjLocation::Free;
        Some(obj)
    }

    pub fn boulder_at(&self, x: i32, y: i32) -> bool {
        self.objects_at(x, y)
            .any(|o| o.kind == crate::object::ObjKind::Boulder)
    }

    pub fn trap_at(&self, x: i32, y: i32) -> Option<&Trap> {
        self.traps.iter().find(|t| t.x == x && t.y == y)
    }

    pub fn trap_at_mut(&mut self, x: i32, y: i32) -> Option<&mut Trap> {
        self.traps.iter_mut().find(|t| t.x == x && t.y == y)
    }

    pub fn remove_trap_at(&mut self, x: i32, y: i32) {
        self.traps.retain(|t| t.x != x || t.y != y);
    }

    pub fn stairs_at(&self, x: i32, y: i32) -> Option<&Stairway> {
        self.stairs.iter().find(|s| s.x == x && s.y == y)
    }

    /// Straight-line visibility between two cells, endpoints excluded.
    pub fn has_line_of_sight(&self, x0: i32, y0: i32, x1: i32, y1: i32) -> bool {
        let (mut x, mut y) = (x0, y0);
        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx - dy;
        loop {
            if x == x1 && y == y1 {
                return true;
            }
            if (x, y) != (x0, y0) && self.terrain(x, y).blocks_sight() {
                return false;
            }
            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x += sx;
            }
            if e2 < dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Rouse sleeping monsters near a noise.
    pub fn wake_nearby(&mut self, x: i32, y: i32, dist_sq: i32) {
        for mon in &mut self.monsters {
            if dist2(mon.x, mon.y, x, y) <= dist_sq {
                mon.wake();
            }
        }
    }
}
