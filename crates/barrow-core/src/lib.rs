//! barrow-core: dungeon simulation engine.
//!
//! All game rules live here with no I/O dependencies: level generation,
//! the trap engine, throwing and ranged combat, potion and scroll
//! effects. The embedding front end supplies a [`ui::Ui`] implementation
//! and drives resolvers with a mutable [`world::Game`] context; nothing
//! in the crate touches a global.

pub mod action;
pub mod combat;
pub mod consts;
pub mod dungeon;
pub mod magic;
pub mod monster;
pub mod object;
pub mod player;
pub mod ui;
pub mod world;
