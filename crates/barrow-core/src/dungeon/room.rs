//! Rooms and their types.

use serde::{Deserialize, Serialize};

use barrow_rng::GameRng;

use crate::dungeon::rect::Rect;
use crate::dungeon::shop::ShopKind;

/// What a room is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RoomType {
    #[default]
    Ordinary,
    Court,
    Swamp,
    Beehive,
    Morgue,
    Barracks,
    Zoo,
    Temple,
    LeprechaunHall,
    CockatriceNest,
    Anthole,
    Shop(ShopKind),
}

impl RoomType {
    pub fn is_shop(self) -> bool {
        matches!(self, RoomType::Shop(_))
    }

    pub fn is_special(self) -> bool {
        self != RoomType::Ordinary
    }
}

/// One room. `lx..=hx` by `ly..=hy` is the floor; walls sit just
/// outside those bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub lx: i32,
    pub ly: i32,
    pub hx: i32,
    pub hy: i32,
    pub rtype: RoomType,
    pub rlit: bool,
    pub doorct: u8,
    pub irregular: bool,
    pub needjoining: bool,
}

impl Room {
    pub fn new(lx: i32, ly: i32, hx: i32, hy: i32, rlit: bool) -> Room {
        Room {
            lx,
            ly,
            hx,
            hy,
            rtype: RoomType::Ordinary,
            rlit,
            doorct: 0,
            irregular: false,
            needjoining: true,
        }
    }

    /// Floor area only.
    pub fn inner(&self) -> Rect {
        Rect::new(self.lx, self.ly, self.hx, self.hy)
    }

    /// Floor plus enclosing walls.
    pub fn outer(&self) -> Rect {
        Rect::new(self.lx - 1, self.ly - 1, self.hx + 1, self.hy + 1)
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.lx && x <= self.hx && y >= self.ly && y <= self.hy
    }

    /// Inside the walls or on them.
    pub fn contains_or_wall(&self, x: i32, y: i32) -> bool {
        x >= self.lx - 1 && x <= self.hx + 1 && y >= self.ly - 1 && y <= self.hy + 1
    }

    pub fn width(&self) -> i32 {
        self.hx - self.lx + 1
    }

    pub fn height(&self) -> i32 {
        self.hy - self.ly + 1
    }

    pub fn area(&self) -> i32 {
        self.width() * self.height()
    }

    pub fn center(&self) -> (i32, i32) {
        ((self.lx + self.hx) / 2, (self.ly + self.hy) / 2)
    }

    /// Random floor position.
    pub fn somexy(&self, rng: &mut GameRng) -> (i32, i32) {
        let x = rng.rn1(self.width() as u32, self.lx);
        let y = rng.rn1(self.height() as u32, self.ly);
        (x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        let room = Room::new(10, 5, 14, 8, true);
        assert_eq!(room.width(), 5);
        assert_eq!(room.height(), 4);
        assert_eq!(room.area(), 20);
        assert!(room.contains(10, 5));
        assert!(room.contains(14, 8));
        assert!(!room.contains(15, 8));
        assert!(room.contains_or_wall(15, 9));
        assert!(!room.contains_or_wall(16, 9));
    }

    #[test]
    fn test_somexy_stays_inside() {
        let room = Room::new(3, 3, 9, 6, false);
        let mut rng = GameRng::new(5);
        for _ in 0..64 {
            let (x, y) = room.somexy(&mut rng);
            assert!(room.contains(x, y), "({x},{y}) outside room");
        }
    }

    #[test]
    fn test_room_type_classes() {
        assert!(RoomType::Shop(ShopKind::General).is_shop());
        assert!(RoomType::Shop(ShopKind::General).is_special());
        assert!(RoomType::Morgue.is_special());
        assert!(!RoomType::Ordinary.is_special());
    }
}
