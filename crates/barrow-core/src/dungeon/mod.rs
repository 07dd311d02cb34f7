//! Dungeon levels: terrain, layout generation, rooms, traps.

pub mod cavern;
pub mod cell;
pub mod corridor;
pub mod generation;
pub mod level;
pub mod rect;
pub mod room;
pub mod shop;
pub mod special_rooms;
pub mod trap;

pub use cell::{DoorMask, Terrain, Tile};
pub use generation::mklev;
pub use level::{dist2, distmin, Level, LevelFlags, Stairway};
pub use room::{Room, RoomType};
pub use trap::{dotrap, mintrap, MintrapResult, Trap, TrapFlags, TrapKind};
