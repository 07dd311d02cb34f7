//! Tiles and terrain.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Terrain occupying one tile.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum Terrain {
    #[default]
    Stone = 0,
    VWall,
    HWall,
    IronBars,
    Tree,
    SecretDoor,
    Pool,
    Moat,
    Lava,
    Door,
    SecretCorridor,
    Corridor,
    Room,
    Stairs,
    Fountain,
    Throne,
    Sink,
    Grave,
    Altar,
}

impl Terrain {
    pub fn is_wall(self) -> bool {
        matches!(self, Terrain::VWall | Terrain::HWall)
    }

    /// Solid rock for digging and passage purposes. Secret doors and
    /// corridors look and act like rock until discovered.
    pub fn is_rock(self) -> bool {
        matches!(
            self,
            Terrain::Stone
                | Terrain::VWall
                | Terrain::HWall
                | Terrain::Tree
                | Terrain::SecretDoor
                | Terrain::SecretCorridor
        )
    }

    pub fn is_door(self) -> bool {
        matches!(self, Terrain::Door | Terrain::SecretDoor)
    }

    pub fn is_pool(self) -> bool {
        matches!(self, Terrain::Pool | Terrain::Moat)
    }

    /// Open floor-like terrain a walker can stand on.
    pub fn is_walkable(self) -> bool {
        matches!(
            self,
            Terrain::Door
                | Terrain::Corridor
                | Terrain::SecretCorridor
                | Terrain::Room
                | Terrain::Stairs
                | Terrain::Fountain
                | Terrain::Throne
                | Terrain::Sink
                | Terrain::Grave
                | Terrain::Altar
        )
    }

    /// Terrain that stops a flying missile outright. Doors and iron bars
    /// need their own checks (door state, pass-through roll).
    pub fn blocks_missiles(self) -> bool {
        matches!(
            self,
            Terrain::Stone
                | Terrain::VWall
                | Terrain::HWall
                | Terrain::Tree
                | Terrain::SecretDoor
                | Terrain::SecretCorridor
        )
    }

    pub fn blocks_sight(self) -> bool {
        self.is_rock()
    }

    /// A surface that shatters breakables landing on it.
    pub fn is_hard_surface(self) -> bool {
        !matches!(
            self,
            Terrain::Pool | Terrain::Moat | Terrain::Lava | Terrain::Sink
        )
    }

    pub fn symbol(self) -> char {
        match self {
            Terrain::Stone => ' ',
            Terrain::VWall => '|',
            Terrain::HWall => '-',
            Terrain::IronBars => '#',
            Terrain::Tree => '#',
            Terrain::SecretDoor => '|',
            Terrain::Pool | Terrain::Moat => '}',
            Terrain::Lava => '}',
            Terrain::Door => '+',
            Terrain::SecretCorridor => '#',
            Terrain::Corridor => '#',
            Terrain::Room => '.',
            Terrain::Stairs => '>',
            Terrain::Fountain => '{',
            Terrain::Throne => '\\',
            Terrain::Sink => '#',
            Terrain::Grave => '|',
            Terrain::Altar => '_',
        }
    }
}

bitflags! {
    /// Door state. Empty bits mean a bare doorway.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DoorMask: u8 {
        const BROKEN  = 0x01;
        const OPEN    = 0x02;
        const CLOSED  = 0x04;
        const LOCKED  = 0x08;
        const TRAPPED = 0x10;
    }
}

impl Serialize for DoorMask {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DoorMask {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(DoorMask::from_bits_truncate(bits))
    }
}

impl DoorMask {
    /// A shut door, whether merely closed or also locked, blocks passage.
    pub fn is_shut(self) -> bool {
        self.intersects(DoorMask::CLOSED | DoorMask::LOCKED)
    }
}

/// One grid cell of a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tile {
    pub typ: Terrain,

    /// Lit at level-generation time or by later effects.
    pub lit: bool,

    /// Owning room id (list index + ROOMOFFSET), or NO_ROOM.
    pub room_id: u8,

    /// Scratch marker for region walks during generation.
    pub edge: bool,

    /// Wall or door orientation.
    pub horizontal: bool,

    /// Known to the player (mapped or previously seen).
    pub seen: bool,

    pub doormask: DoorMask,
}

impl Tile {
    pub const fn stone() -> Self {
        Self {
            typ: Terrain::Stone,
            lit: false,
            room_id: 0,
            edge: false,
            horizontal: false,
            seen: false,
            doormask: DoorMask::empty(),
        }
    }

    pub const fn floor() -> Self {
        Self {
            typ: Terrain::Room,
            ..Self::stone()
        }
    }

    pub const fn corridor() -> Self {
        Self {
            typ: Terrain::Corridor,
            ..Self::stone()
        }
    }

    /// True when a walking actor can occupy this tile.
    pub fn is_walkable(&self) -> bool {
        if self.typ == Terrain::Door {
            return !self.doormask.is_shut();
        }
        self.typ.is_walkable()
    }

    /// True when a missile flies on past this tile.
    pub fn passable_for_missile(&self) -> bool {
        if self.typ.blocks_missiles() {
            return false;
        }
        if self.typ == Terrain::Door {
            return !self.doormask.is_shut();
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_door_blocks() {
        let mut tile = Tile::stone();
        tile.typ = Terrain::Door;
        tile.doormask = DoorMask::CLOSED;
        assert!(!tile.is_walkable());
        assert!(!tile.passable_for_missile());

        tile.doormask = DoorMask::OPEN;
        assert!(tile.is_walkable());
        assert!(tile.passable_for_missile());

        tile.doormask = DoorMask::empty();
        assert!(tile.is_walkable());
    }

    #[test]
    fn test_rock_classification() {
        assert!(Terrain::Stone.is_rock());
        assert!(Terrain::SecretDoor.is_rock());
        assert!(Terrain::SecretCorridor.is_rock());
        assert!(!Terrain::Corridor.is_rock());
        assert!(!Terrain::Pool.is_rock());
    }

    #[test]
    fn test_doormask_serde_as_bits() {
        let mask = DoorMask::LOCKED | DoorMask::TRAPPED;
        let json = serde_json::to_string(&mask).unwrap();
        assert_eq!(json, "24");
        let back: DoorMask = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mask);
    }

    #[test]
    fn test_liquid_is_not_hard_surface() {
        assert!(!Terrain::Pool.is_hard_surface());
        assert!(!Terrain::Lava.is_hard_surface());
        assert!(Terrain::Room.is_hard_surface());
    }
}
