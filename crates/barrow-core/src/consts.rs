//! Engine-wide constants.

/// Level grid width in columns.
pub const COLNO: i32 = 80;

/// Level grid height in rows.
pub const ROWNO: i32 = 21;

/// Most rooms a level will track.
pub const MAXNROFROOMS: usize = 40;

/// Room id stored on a tile for "not inside any room".
pub const NO_ROOM: u8 = 0;

/// Tile room ids are the room's list index plus this offset.
pub const ROOMOFFSET: u8 = 1;

/// Longest flight of a monster-thrown missile, in tiles.
pub const BOLT_LIM: i32 = 8;

/// Most traps a level will track.
pub const MAXTRAPS: usize = 60;
