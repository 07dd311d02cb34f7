//! Traps: creation, discovery, and the trigger state machine.
//!
//! A trap's life is undiscovered -> seen -> (sprung)* -> gone or
//! persistent. The payload enum carries only the fields its variant
//! actually uses; the serialized form is the tagged-union encoding the
//! save layer requires.
//!
//! Players and monsters resolve each variant through separate
//! procedures. The asymmetries between them are deliberate and kept.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use barrow_rng::GameRng;

use crate::consts::MAXTRAPS;
use crate::dungeon::level::Level;
use crate::monster::{pick_species, MonsterId};
use crate::object::{mksobj, ArmorSlot, ObjClass, ObjKind};
use crate::player::HeldIn;
use crate::ui::{Region, Severity, Ui};
use crate::world::context::{capitalize, Game};
use crate::world::errors::{DoneHow, EngineSignal, Killer};

/// Trap behavior variants. Each payload carries only the state that
/// variant actually uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrapKind {
    /// `fired` is set once the trap has shot; a fired trap may quietly
    /// run out of ammunition.
    Arrow { fired: bool },
    Dart { fired: bool },
    FallingRock { fired: bool },
    SqueakyBoard,
    BearTrap,
    SleepGas,
    Rust,
    Fire,
    Pit,
    SpikedPit,
    Hole,
    Trapdoor,
    Teleport,
    LevelTeleport,
    Web,
    Statue,
    Magic,
    AntiMagic,
    Polymorph,
    Landmine,
    RollingBoulder { launch_x: i32, launch_y: i32 },
    MagicPortal { dest_depth: u32 },
    VibratingSquare,
}

impl TrapKind {
    pub fn name(&self) -> &'static str {
        match self {
            TrapKind::Arrow { .. } => "arrow trap",
            TrapKind::Dart { .. } => "dart trap",
            TrapKind::FallingRock { .. } => "falling rock trap",
            TrapKind::SqueakyBoard => "squeaky board",
            TrapKind::BearTrap => "bear trap",
            TrapKind::SleepGas => "sleeping gas trap",
            TrapKind::Rust => "rust trap",
            TrapKind::Fire => "fire trap",
            TrapKind::Pit => "pit",
            TrapKind::SpikedPit => "spiked pit",
            TrapKind::Hole => "hole",
            TrapKind::Trapdoor => "trap door",
            TrapKind::Teleport => "teleportation trap",
            TrapKind::LevelTeleport => "level teleporter",
            TrapKind::Web => "web",
            TrapKind::Statue => "statue trap",
            TrapKind::Magic => "magic trap",
            TrapKind::AntiMagic => "anti-magic field",
            TrapKind::Polymorph => "polymorph trap",
            TrapKind::Landmine => "land mine",
            TrapKind::RollingBoulder { .. } => "rolling boulder trap",
            TrapKind::MagicPortal { .. } => "magic portal",
            TrapKind::VibratingSquare => "vibrating square",
        }
    }

    /// Traps that need the victim's weight on the ground. Levitating
    /// and flying actors pass over these.
    pub fn is_ground_trap(&self) -> bool {
        matches!(
            self,
            TrapKind::SqueakyBoard
                | TrapKind::BearTrap
                | TrapKind::Pit
                | TrapKind::SpikedPit
                | TrapKind::Hole
                | TrapKind::Trapdoor
                | TrapKind::Landmine
        )
    }

    /// Traps with no escape roll even when known: stepping on them is
    /// the activation, awareness or not.
    pub fn no_escape_roll(&self) -> bool {
        matches!(
            self,
            TrapKind::MagicPortal { .. } | TrapKind::VibratingSquare | TrapKind::AntiMagic
        )
    }

    /// Disarm difficulty for `untrap`, higher is harder.
    pub fn difficulty(&self) -> i32 {
        match self {
            TrapKind::SqueakyBoard | TrapKind::VibratingSquare => 0,
            TrapKind::Arrow { .. } | TrapKind::Dart { .. } | TrapKind::FallingRock { .. } => 2,
            TrapKind::BearTrap | TrapKind::Web => 3,
            TrapKind::Pit | TrapKind::SpikedPit => 4,
            TrapKind::Landmine | TrapKind::RollingBoulder { .. } => 6,
            _ => 8,
        }
    }
}

/// One trap on the map. At most one per tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trap {
    pub x: i32,
    pub y: i32,
    pub seen: bool,
    /// Dug or dropped by the player; such traps never bill anyone.
    pub madeby_u: bool,
    pub kind: TrapKind,
}

bitflags! {
    /// Modifiers threaded through a trigger.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TrapFlags: u8 {
        /// Announce nothing (used when a bigger event owns the messaging).
        const NOMESSAGE = 0x01;
        /// Deny the escape roll (shoved in, fell in, shot in).
        const FORCEBUNGLE = 0x02;
        /// Set while one trap resolution triggers another, so a land
        /// mine opening a pit cannot loop forever.
        const RECURSIVE = 0x04;
    }
}

/// How a monster's encounter with a trap ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintrapResult {
    NoTrap,
    Escaped,
    Hurt,
    Caught,
    /// Dead, or gone from this level (hole, trapdoor, portal).
    Gone,
}

/// Place a trap. Refuses occupied tiles, stairs, doors, and a full
/// trap table (soft cap).
pub fn maketrap(level: &mut Level, x: i32, y: i32, kind: TrapKind) -> bool {
    if level.traps.len() >= MAXTRAPS
        || level.trap_at(x, y).is_some()
        || level.stairs_at(x, y).is_some()
        || level.terrain(x, y).is_door()
        || !level.tile(x, y).is_some_and(|t| t.is_walkable())
    {
        return false;
    }
    level.traps.push(Trap { x, y, seen: false, madeby_u: false, kind });
    true
}

/// Weighted random trap kind for a depth. Shallow levels exclude the
/// nastier variants outright.
pub fn random_trap_kind(depth: u32, rng: &mut GameRng) -> TrapKind {
    let d = depth as i32;
    let choices: &[(u32, fn() -> TrapKind)] = &[
        (10, || TrapKind::Arrow { fired: false }),
        (10, || TrapKind::Dart { fired: false }),
        (8, || TrapKind::FallingRock { fired: false }),
        (5, || TrapKind::SqueakyBoard),
        (8, || TrapKind::BearTrap),
        (10, || TrapKind::Pit),
        (if d > 3 { 8 } else { 2 }, || TrapKind::SpikedPit),
        (if d > 2 { 6 } else { 2 }, || TrapKind::SleepGas),
        (5, || TrapKind::Rust),
        (if d > 4 { 6 } else { 2 }, || TrapKind::Fire),
        (6, || TrapKind::Web),
        (if d > 1 { 5 } else { 0 }, || TrapKind::Teleport),
        (if d > 6 { 3 } else { 0 }, || TrapKind::LevelTeleport),
        (if d > 3 { 4 } else { 0 }, || TrapKind::Hole),
        (if d > 4 { 4 } else { 0 }, || TrapKind::Trapdoor),
        (if d > 3 { 4 } else { 0 }, || TrapKind::Magic),
        (if d > 5 { 3 } else { 0 }, || TrapKind::AntiMagic),
        (if d > 7 { 2 } else { 0 }, || TrapKind::Polymorph),
        (if d > 1 { 5 } else { 0 }, || TrapKind::Landmine),
        (if d > 4 { 4 } else { 0 }, || TrapKind::RollingBoulder {
            launch_x: 0,
            launch_y: 0,
        }),
        (if d > 4 { 2 } else { 0 }, || TrapKind::Statue),
    ];
    let total: u32 = choices.iter().map(|(w, _)| w).sum();
    let mut roll = rng.rn2(total);
    for (w, make) in choices {
        if roll < *w {
            return make();
        }
        roll -= w;
    }
    TrapKind::Pit
}

/// Scatter a random trap somewhere legal in a room-style level.
pub fn mktrap(level: &mut Level, depth: u32, rng: &mut GameRng) {
    for _ in 0..50 {
        if level.rooms.is_empty() {
            return;
        }
        let room = level.rooms[rng.rn2(level.rooms.len() as u32) as usize].clone();
        let (x, y) = room.somexy(rng);
        let mut kind = random_trap_kind(depth, rng);
        if let TrapKind::RollingBoulder { .. } = kind {
            // launch point sits a few cells away along a random axis
            kind = TrapKind::RollingBoulder {
                launch_x: x + if rng.one_in(2) { 4 } else { -4 },
                launch_y: y,
            };
        }
        if maketrap(level, x, y, kind) {
            return;
        }
    }
}

/// Reveal a trap to the player.
pub fn seetrap(level: &mut Level, ui: &mut dyn Ui, x: i32, y: i32) {
    if let Some(trap) = level.trap_at_mut(x, y) {
        if !trap.seen {
            trap.seen = true;
            ui.request_redraw(Region::Cell { x: x as i8, y: y as i8 });
        }
    }
}

/// Disarm attempt on a trap at `(x, y)`. Success is dexterity-scaled
/// against the trap's difficulty, clamped to 5..=95 percent.
pub fn untrap(game: &mut Game, ui: &mut dyn Ui, x: i32, y: i32) -> Result<bool, EngineSignal> {
    let Some(trap) = game.level.trap_at(x, y) else {
        game.pline(ui, "You find no trap there.");
        return Ok(false);
    };
    let kind = trap.kind.clone();
    let dex = i32::from(game.you.attrs.dex);
    let chance = (50 + 5 * (dex - 10) - 5 * kind.difficulty()).clamp(5, 95) as u32;
    if game.core().percent(chance) {
        game.level.remove_trap_at(x, y);
        match kind {
            TrapKind::Arrow { .. } => {
                let id = game.level.new_object_id();
                let arrow = mksobj(ObjKind::Arrow, false, game.core(), id);
                game.level.place_object(arrow, x, y);
                game.pline(ui, "You disarm the arrow trap and retrieve the arrow.");
            }
            TrapKind::Dart { .. } => {
                let id = game.level.new_object_id();
                let dart = mksobj(ObjKind::Dart, false, game.core(), id);
                game.level.place_object(dart, x, y);
                game.pline(ui, "You disarm the dart trap and retrieve the dart.");
            }
            _ => game.pline(ui, &format!("You disarm the {}.", kind.name())),
        }
        ui.request_redraw(Region::Cell { x: x as i8, y: y as i8 });
        Ok(true)
    } else if game.core().one_in(5) && (x, y) == (game.you.x, game.you.y) {
        game.pline_sev(ui, "You set it off!", Severity::StatusBad);
        dotrap(game, ui, TrapFlags::FORCEBUNGLE)?;
        Ok(false)
    } else {
        game.pline(ui, &format!("You fail to disarm the {}.", kind.name()));
        Ok(false)
    }
}

/// The player steps onto (or pokes) the trap on their own square.
pub fn dotrap(game: &mut Game, ui: &mut dyn Ui, flags: TrapFlags) -> Result<(), EngineSignal> {
    let (x, y) = (game.you.x, game.you.y);
    let Some(trap) = game.level.trap_at(x, y) else {
        return Ok(());
    };
    let kind = trap.kind.clone();
    let was_seen = trap.seen;
    seetrap(&mut game.level, ui, x, y);

    // Known traps can usually be sidestepped. Confusion, fumbling, and
    // being flung in remove the chance.
    if was_seen
        && !kind.no_escape_roll()
        && !flags.contains(TrapFlags::FORCEBUNGLE)
        && !game.you.is_confused()
        && !game.you.is_stunned()
        && !game
            .you
            .intrinsics
            .contains(crate::player::Properties::FUMBLING)
        && game.core().rn2(5) != 0
    {
        if !flags.contains(TrapFlags::NOMESSAGE) {
            game.pline(ui, &format!("You escape the {}.", kind.name()));
        }
        return Ok(());
    }

    if kind.is_ground_trap() && game.you.is_airborne() {
        if !flags.contains(TrapFlags::NOMESSAGE) {
            game.pline(ui, &format!("You float over the {}.", kind.name()));
        }
        return Ok(());
    }

    // A fired missile trap may be out of ammunition.
    if let TrapKind::Arrow { fired: true }
    | TrapKind::Dart { fired: true }
    | TrapKind::FallingRock { fired: true } = kind
    {
        if game.core().one_in(15) {
            game.pline(ui, "You hear a loud click!");
            game.level.remove_trap_at(x, y);
            ui.request_redraw(Region::Cell { x: x as i8, y: y as i8 });
            return Ok(());
        }
    }

    match kind {
        TrapKind::Arrow { .. } => trap_arrow_player(game, ui, x, y),
        TrapKind::Dart { .. } => trap_dart_player(game, ui, x, y),
        TrapKind::FallingRock { .. } => trap_rock_player(game, ui, x, y),
        TrapKind::SqueakyBoard => trap_board_player(game, ui, x, y),
        TrapKind::BearTrap => trap_beartrap_player(game, ui),
        TrapKind::SleepGas => trap_sleepgas_player(game, ui),
        TrapKind::Rust => trap_rust_player(game, ui),
        TrapKind::Fire => trap_fire_player(game, ui),
        TrapKind::Pit => trap_pit_player(game, ui, false),
        TrapKind::SpikedPit => trap_pit_player(game, ui, true),
        TrapKind::Hole => trap_fall_player(game, ui, "You fall through a hole!"),
        TrapKind::Trapdoor => trap_fall_player(game, ui, "A trap door opens up under you!"),
        TrapKind::Teleport => trap_teleport_player(game, ui),
        TrapKind::LevelTeleport => trap_levelport_player(game, ui),
        TrapKind::Web => trap_web_player(game, ui),
        TrapKind::Statue => trap_statue(game, ui, x, y),
        TrapKind::Magic => trap_magic_player(game, ui, x, y),
        TrapKind::AntiMagic => trap_antimagic_player(game, ui),
        TrapKind::Polymorph => trap_poly_player(game, ui),
        TrapKind::Landmine => trap_landmine_player(game, ui, x, y, flags),
        TrapKind::RollingBoulder { .. } => trap_boulder_player(game, ui, x, y),
        TrapKind::MagicPortal { dest_depth } => {
            game.pline(ui, "You activated a magic portal!");
            game.pending_level = Some(dest_depth);
            Ok(())
        }
        TrapKind::VibratingSquare => {
            game.pline(ui, "You feel a strange vibration beneath your feet.");
            Ok(())
        }
    }
}

fn mark_fired(level: &mut Level, x: i32, y: i32) {
    if let Some(trap) = level.trap_at_mut(x, y) {
        trap.kind = match trap.kind.clone() {
            TrapKind::Arrow { .. } => TrapKind::Arrow { fired: true },
            TrapKind::Dart { .. } => TrapKind::Dart { fired: true },
            TrapKind::FallingRock { .. } => TrapKind::FallingRock { fired: true },
            other => other,
        };
    }
}

fn trap_arrow_player(game: &mut Game, ui: &mut dyn Ui, x: i32, y: i32) -> Result<(), EngineSignal> {
    mark_fired(&mut game.level, x, y);
    let id = game.level.new_object_id();
    let arrow = mksobj(ObjKind::Arrow, false, game.core(), id);
    if game.core().one_in(4) {
        game.pline(ui, "An arrow shoots out at you, but misses!");
    } else {
        game.pline_sev(ui, "An arrow shoots out at you and hits!", Severity::StatusBad);
        let dmg = game.core().rnd(6) as i32;
        game.losehp(dmg, Killer::by_an("arrow"), DoneHow::Died)?;
    }
    game.level.place_object(arrow, x, y);
    Ok(())
}

fn trap_dart_player(game: &mut Game, ui: &mut dyn Ui, x: i32, y: i32) -> Result<(), EngineSignal> {
    mark_fired(&mut game.level, x, y);
    let id = game.level.new_object_id();
    let mut dart = mksobj(ObjKind::Dart, false, game.core(), id);
    if game.core().one_in(4) {
        game.pline(ui, "A little dart shoots out at you, but misses!");
    } else {
        game.pline_sev(ui, "A little dart shoots out at you and hits!", Severity::StatusBad);
        let mut dmg = game.core().rnd(3) as i32;
        if game.core().one_in(6) {
            dart.poisoned = true;
            if game.you.resists_poison() {
                game.pline(ui, "The poison doesn't seem to affect you.");
            } else {
                game.pline_sev(ui, "The dart was poisoned!", Severity::StatusBad);
                dmg += game.core().rnd(6) as i32;
            }
        }
        game.losehp(dmg, Killer::by_an("poisoned dart"), DoneHow::Died)?;
    }
    game.level.place_object(dart, x, y);
    Ok(())
}

fn trap_rock_player(game: &mut Game, ui: &mut dyn Ui, x: i32, y: i32) -> Result<(), EngineSignal> {
    mark_fired(&mut game.level, x, y);
    game.pline_sev(ui, "A trap door in the ceiling opens and a rock falls on your head!", Severity::StatusBad);
    let dmg = if game.you.worn_in(ArmorSlot::Helmet).is_some() {
        game.pline(ui, "Fortunately, you are wearing a hard helmet.");
        game.core().rnd(2) as i32
    } else {
        game.core().dice(2, 6) as i32
    };
    let id = game.level.new_object_id();
    let rock = mksobj(ObjKind::Rock, false, game.core(), id);
    game.level.place_object(rock, x, y);
    game.losehp(dmg, Killer::by_an("falling rock"), DoneHow::Died)
}

fn trap_board_player(game: &mut Game, ui: &mut dyn Ui, x: i32, y: i32) -> Result<(), EngineSignal> {
    game.pline(ui, "A board beneath you squeaks loudly.");
    game.level.wake_nearby(x, y, 144);
    Ok(())
}

fn trap_beartrap_player(game: &mut Game, ui: &mut dyn Ui) -> Result<(), EngineSignal> {
    game.pline_sev(ui, "A bear trap closes on your foot!", Severity::StatusBad);
    game.you.trapped_turns = game.core().rn1(4, 4) as u16;
    game.you.held_in = Some(HeldIn::BearTrap);
    let dmg = game.core().dice(2, 4) as i32;
    game.losehp(dmg, Killer::by_an("bear trap"), DoneHow::Died)
}

fn trap_sleepgas_player(game: &mut Game, ui: &mut dyn Ui) -> Result<(), EngineSignal> {
    game.pline(ui, "A cloud of gas puts you to sleep!");
    if game.you.resists_sleep() {
        game.pline(ui, "You yawn.");
    } else {
        game.you.timers.sleep = game.core().rnd(25) as u16;
    }
    Ok(())
}

fn trap_rust_player(game: &mut Game, ui: &mut dyn Ui) -> Result<(), EngineSignal> {
    match game.core().rn2(5) {
        0 => {
            game.pline(ui, "A gush of water hits you on the head!");
            if let Some(helmet) = game.you.worn_in(ArmorSlot::Helmet) {
                let id = helmet.id;
                let msg = format!("Your {} rusts.", helmet.kind.name());
                if let Some(h) = game.you.carried_mut(id) {
                    if !h.erodeproof {
                        h.eroded = (h.eroded + 1).min(3);
                        game.pline(ui, &msg);
                    }
                }
            }
        }
        1 | 2 => {
            game.pline(ui, "A gush of water hits your body!");
            if let Some(armor) = game.you.worn_in(ArmorSlot::Body) {
                let id = armor.id;
                let msg = format!("Your {} rusts.", armor.kind.name());
                if let Some(a) = game.you.carried_mut(id) {
                    if !a.erodeproof {
                        a.eroded = (a.eroded + 1).min(3);
                        game.pline(ui, &msg);
                    }
                }
            }
        }
        3 => {
            game.pline(ui, "A gush of water hits your weapon!");
            if let Some(id) = game.you.wielded {
                if let Some(w) = game.you.carried_mut(id) {
                    if w.kind.template().material == crate::object::Material::Iron
                        && !w.erodeproof
                    {
                        w.eroded = (w.eroded + 1).min(3);
                        let msg = format!("Your {} rusts.", w.kind.name());
                        game.pline(ui, &msg);
                    }
                }
            }
        }
        _ => game.pline(ui, "A gush of water hits you!"),
    }
    Ok(())
}

fn trap_fire_player(game: &mut Game, ui: &mut dyn Ui) -> Result<(), EngineSignal> {
    game.pline_sev(ui, "A tower of flame erupts from the floor!", Severity::StatusBad);
    if game.you.resists_fire() {
        game.pline(ui, "You are uninjured.");
        return Ok(());
    }
    // flames can catch carried scrolls
    if game.core().one_in(3) {
        if let Some(pos) = game
            .you
            .inventory
            .iter()
            .position(|o| o.kind.class() == ObjClass::Scroll)
        {
            let id = game.you.inventory[pos].id;
            if let Some(burned) = game.you.remove_from_inventory(id) {
                game.pline_sev(
                    ui,
                    &format!("Your {} catches fire and burns!", burned.kind.name()),
                    Severity::StatusBad,
                );
            }
        }
    }
    let dmg = game.core().dice(2, 4) as i32;
    game.losehp(dmg, Killer::by_an("tower of flame"), DoneHow::Burned)
}

fn trap_pit_player(game: &mut Game, ui: &mut dyn Ui, spiked: bool) -> Result<(), EngineSignal> {
    game.pline_sev(ui, "You fall into a pit!", Severity::StatusBad);
    game.you.trapped_turns = game.core().rn1(6, 2) as u16;
    game.you.held_in = Some(HeldIn::Pit);
    if spiked {
        game.pline_sev(ui, "You land on a set of sharp iron spikes!", Severity::StatusBad);
        let mut dmg = game.core().rnd(10) as i32;
        if game.core().one_in(6) && !game.you.resists_poison() {
            game.pline_sev(ui, "The spikes were poisoned!", Severity::StatusBad);
            dmg += game.core().rnd(6) as i32;
        }
        game.losehp(dmg, Killer::plain("killed by a fall onto poison spikes"), DoneHow::Died)
    } else {
        let dmg = game.core().rnd(6) as i32;
        game.losehp(dmg, Killer::by_an("pit"), DoneHow::Died)
    }
}

fn trap_fall_player(game: &mut Game, ui: &mut dyn Ui, msg: &str) -> Result<(), EngineSignal> {
    game.pline_sev(ui, msg, Severity::StatusBad);
    game.pending_level = Some(game.level.depth + 1);
    Ok(())
}

/// Random open cell for teleport arrivals.
fn rloc(level: &Level, rng: &mut GameRng) -> Option<(i32, i32)> {
    for _ in 0..500 {
        let x = rng.rn2(crate::consts::COLNO as u32) as i32;
        let y = rng.rn2(crate::consts::ROWNO as u32) as i32;
        if level.tile(x, y).is_some_and(|t| t.is_walkable()) && level.monster_at(x, y).is_none() {
            return Some((x, y));
        }
    }
    None
}

fn trap_teleport_player(game: &mut Game, ui: &mut dyn Ui) -> Result<(), EngineSignal> {
    if let Some((x, y)) = rloc(&game.level, game.rng.core()) {
        game.you.x = x;
        game.you.y = y;
        game.pline(ui, "You feel a wrenching sensation.");
        ui.request_redraw(Region::Full);
    } else {
        game.pline(ui, "You feel a momentary jolt.");
    }
    Ok(())
}

fn trap_levelport_player(game: &mut Game, ui: &mut dyn Ui) -> Result<(), EngineSignal> {
    game.pline(ui, "You are momentarily blinded by a flash of light.");
    let delta = game.core().rnd(3);
    game.pending_level = Some(game.level.depth + delta);
    Ok(())
}

fn trap_web_player(game: &mut Game, ui: &mut dyn Ui) -> Result<(), EngineSignal> {
    game.pline(ui, "You stumble into a spider web!");
    if game.you.attrs.str_ > 17 {
        game.pline(ui, "You tear through the web!");
        game.level.remove_trap_at(game.you.x, game.you.y);
    } else {
        game.pline_sev(ui, "You are caught in the web.", Severity::StatusBad);
        game.you.trapped_turns = game.core().rn1(6, 1) as u16;
        game.you.held_in = Some(HeldIn::Web);
    }
    Ok(())
}

/// Animate the statue on the trap's square, player- and monster-
/// triggered alike.
fn trap_statue(game: &mut Game, ui: &mut dyn Ui, x: i32, y: i32) -> Result<(), EngineSignal> {
    let statue = game
        .level
        .objects_at(x, y)
        .filter(|o| o.kind == ObjKind::Statue)
        .find_map(|o| o.corpse_species.map(|sp| (o.id, sp)));
    game.level.remove_trap_at(x, y);
    let Some((statue_id, species)) = statue else {
        return Ok(());
    };
    game.level.remove_object(statue_id);
    // the spot is occupied, so the animation appears adjacent
    for (dx, dy) in [(0, 0), (1, 0), (-1, 0), (0, 1), (0, -1)] {
        let depth = game.level.depth;
        if crate::monster::makemon(
            Some(species),
            x + dx,
            y + dy,
            depth,
            &mut game.level,
            &mut game.vitals,
            game.rng.core(),
        )
        .is_some()
        {
            game.pline_sev(ui, "The statue comes to life!", Severity::StatusBad);
            ui.request_redraw(Region::Full);
            break;
        }
    }
    Ok(())
}

fn trap_magic_player(game: &mut Game, ui: &mut dyn Ui, x: i32, y: i32) -> Result<(), EngineSignal> {
    match game.core().rn2(4) {
        0 => {
            game.pline(ui, "You are enveloped in a cloud of gas!");
        }
        1 => {
            game.pline(ui, "A shiver runs up and down your spine!");
        }
        2 => {
            game.pline(ui, "You hear distant howling.");
        }
        _ => {
            // the trap spits out a hostile
            let depth = game.level.depth;
            for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
                if crate::monster::makemon(
                    None,
                    x + dx,
                    y + dy,
                    depth,
                    &mut game.level,
                    &mut game.vitals,
                    game.rng.core(),
                )
                .is_some()
                {
                    game.pline_sev(ui, "You have a sense of deja vu.", Severity::StatusBad);
                    break;
                }
            }
        }
    }
    Ok(())
}

fn trap_antimagic_player(game: &mut Game, ui: &mut dyn Ui) -> Result<(), EngineSignal> {
    if game.you.resists_magic() {
        game.pline(ui, "You feel momentarily lethargic.");
    } else {
        game.pline_sev(ui, "You feel your magical energy drain away!", Severity::StatusBad);
        let drain = game.core().rn1(10, 5);
        game.you.pw = (game.you.pw - drain).max(0);
    }
    Ok(())
}

fn trap_poly_player(game: &mut Game, ui: &mut dyn Ui) -> Result<(), EngineSignal> {
    if game.you.resists_magic() {
        game.pline(ui, "You feel momentarily different.");
        game.level.remove_trap_at(game.you.x, game.you.y);
    } else {
        game.pline(ui, "You feel a change coming over you.");
    }
    Ok(())
}

fn trap_landmine_player(
    game: &mut Game,
    ui: &mut dyn Ui,
    x: i32,
    y: i32,
    flags: TrapFlags,
) -> Result<(), EngineSignal> {
    game.pline_sev(ui, "KAABLAMM!!!  You triggered a land mine!", Severity::StatusBad);
    game.level.wake_nearby(x, y, 400);
    // the blast leaves a pit where the mine was
    if let Some(trap) = game.level.trap_at_mut(x, y) {
        trap.kind = TrapKind::Pit;
        trap.seen = true;
    }
    let dmg = game.core().rnd(16) as i32;
    game.losehp(dmg, Killer::by_an("land mine"), DoneHow::Died)?;
    if !flags.contains(TrapFlags::RECURSIVE) {
        dotrap(game, ui, TrapFlags::RECURSIVE | TrapFlags::FORCEBUNGLE)?;
    }
    Ok(())
}

fn trap_boulder_player(game: &mut Game, ui: &mut dyn Ui, x: i32, y: i32) -> Result<(), EngineSignal> {
    game.pline_sev(ui, "Click!  You trigger a rolling boulder trap!", Severity::StatusBad);
    let dmg = game.core().dice(3, 6) as i32;
    let id = game.level.new_object_id();
    let boulder = mksobj(ObjKind::Boulder, false, game.core(), id);
    game.level.place_object(boulder, x, y);
    if game.core().one_in(2) {
        game.level.remove_trap_at(x, y);
    }
    game.losehp(dmg, Killer::by_an("rolling boulder"), DoneHow::Died)
}

/// A monster steps onto a trap.
pub fn mintrap(
    game: &mut Game,
    ui: &mut dyn Ui,
    id: MonsterId,
    flags: TrapFlags,
) -> MintrapResult {
    let Some(mon) = game.level.monster(id) else {
        return MintrapResult::NoTrap;
    };
    let (x, y) = (mon.x, mon.y);
    let Some(trap) = game.level.trap_at(x, y) else {
        return MintrapResult::NoTrap;
    };
    let kind = trap.kind.clone();
    let was_seen = trap.seen;
    let species = mon.species;

    if kind.is_ground_trap() && species.flies() {
        return MintrapResult::Escaped;
    }
    if was_seen
        && !kind.no_escape_roll()
        && !flags.contains(TrapFlags::FORCEBUNGLE)
        && game.core().rn2(5) != 0
    {
        return MintrapResult::Escaped;
    }

    match kind {
        TrapKind::Arrow { .. } => {
            mark_fired(&mut game.level, x, y);
            let dmg = game.core().rnd(6) as i32;
            mintrap_hit(game, ui, id, dmg, "An arrow shoots out and hits")
        }
        TrapKind::Dart { .. } => {
            mark_fired(&mut game.level, x, y);
            let mut dmg = game.core().rnd(3) as i32;
            if game.core().one_in(6) && !species.resists_poison() {
                dmg += game.core().rnd(6) as i32;
            }
            mintrap_hit(game, ui, id, dmg, "A little dart shoots out and hits")
        }
        TrapKind::FallingRock { .. } => {
            mark_fired(&mut game.level, x, y);
            let dmg = game.core().dice(2, 6) as i32;
            let rock_id = game.level.new_object_id();
            let rock = mksobj(ObjKind::Rock, false, game.core(), rock_id);
            game.level.place_object(rock, x, y);
            mintrap_hit(game, ui, id, dmg, "A rock falls on")
        }
        TrapKind::SqueakyBoard => {
            if let Some(mon) = game.level.monster(id) {
                game.mon_message(
                    ui,
                    mon,
                    Severity::Info,
                    &format!("A board beneath {} squeaks loudly.", game.mon_name(mon)),
                    Some("You hear a distant squeak."),
                );
            }
            game.level.wake_nearby(x, y, 144);
            MintrapResult::Hurt
        }
        TrapKind::BearTrap => {
            if species.template().size <= crate::monster::Size::Small {
                return MintrapResult::Escaped;
            }
            let turns = game.core().rn1(4, 4) as u16;
            let dmg = game.core().dice(2, 4) as i32;
            if let Some(mon) = game.level.monster_mut(id) {
                mon.trapped_turns = turns;
            }
            seetrap(&mut game.level, ui, x, y);
            if let Some(mon) = game.level.monster(id) {
                game.mon_message(
                    ui,
                    mon,
                    Severity::ActionOk,
                    &format!("{} is caught in a bear trap!", capitalize(&game.mon_name(mon))),
                    Some("You hear the roaring of an angry bear!"),
                );
            }
            match game.hurt_mon(ui, id, dmg) {
                Some(_) => MintrapResult::Gone,
                None => MintrapResult::Caught,
            }
        }
        TrapKind::SleepGas => {
            if !species.resists_sleep() {
                let turns = game.core().rnd(25) as u16;
                if let Some(mon) = game.level.monster_mut(id) {
                    mon.timers.sleep = turns;
                }
                if let Some(mon) = game.level.monster(id) {
                    game.mon_message(
                        ui,
                        mon,
                        Severity::Info,
                        &format!("{} falls asleep!", capitalize(&game.mon_name(mon))),
                        None,
                    );
                }
            }
            MintrapResult::Hurt
        }
        TrapKind::Rust => {
            // rusts the monster's weapon, nothing more
            if let Some(mon) = game.level.monster_mut(id) {
                if let Some(w) = mon.inventory.iter_mut().find(|o| {
                    o.is_weapon() && o.kind.template().material == crate::object::Material::Iron
                }) {
                    if !w.erodeproof {
                        w.eroded = (w.eroded + 1).min(3);
                    }
                }
            }
            MintrapResult::Hurt
        }
        TrapKind::Fire => {
            if species.resists_fire() {
                return MintrapResult::Escaped;
            }
            let dmg = game.core().dice(2, 4) as i32;
            mintrap_hit(game, ui, id, dmg, "A tower of flame engulfs")
        }
        TrapKind::Pit | TrapKind::SpikedPit => {
            let spiked = kind == TrapKind::SpikedPit;
            let turns = game.core().rn1(6, 2) as u16;
            let dmg = if spiked {
                game.core().rnd(10) as i32
            } else {
                game.core().rnd(6) as i32
            };
            if let Some(mon) = game.level.monster_mut(id) {
                mon.trapped_turns = turns;
            }
            seetrap(&mut game.level, ui, x, y);
            if let Some(mon) = game.level.monster(id) {
                game.mon_message(
                    ui,
                    mon,
                    Severity::Info,
                    &format!("{} falls into a pit!", capitalize(&game.mon_name(mon))),
                    None,
                );
            }
            match game.hurt_mon(ui, id, dmg) {
                Some(_) => MintrapResult::Gone,
                None => MintrapResult::Caught,
            }
        }
        TrapKind::Hole | TrapKind::Trapdoor => {
            if let Some(mon) = game.level.monster(id) {
                game.mon_message(
                    ui,
                    mon,
                    Severity::Info,
                    &format!("{} falls through a hole!", capitalize(&game.mon_name(mon))),
                    None,
                );
            }
            // the monster migrates to the next level down; from this
            // level's point of view it is simply gone
            if let Some(idx) = game.level.monsters.iter().position(|m| m.id == id) {
                game.level.monsters.remove(idx);
            }
            MintrapResult::Gone
        }
        TrapKind::Teleport => {
            if let Some((nx, ny)) = rloc(&game.level, game.rng.core()) {
                if let Some(mon) = game.level.monster_mut(id) {
                    mon.x = nx;
                    mon.y = ny;
                }
                ui.request_redraw(Region::Full);
            }
            MintrapResult::Hurt
        }
        TrapKind::LevelTeleport => {
            if let Some(idx) = game.level.monsters.iter().position(|m| m.id == id) {
                game.level.monsters.remove(idx);
            }
            MintrapResult::Gone
        }
        TrapKind::Web => {
            if species.template().size >= crate::monster::Size::Large {
                game.level.remove_trap_at(x, y);
                return MintrapResult::Escaped;
            }
            let turns = game.core().rn1(6, 1) as u16;
            if let Some(mon) = game.level.monster_mut(id) {
                mon.trapped_turns = turns;
            }
            if let Some(mon) = game.level.monster(id) {
                game.mon_message(
                    ui,
                    mon,
                    Severity::Info,
                    &format!("{} is caught in a web.", capitalize(&game.mon_name(mon))),
                    None,
                );
            }
            MintrapResult::Caught
        }
        TrapKind::Statue => {
            let _ = trap_statue(game, ui, x, y);
            MintrapResult::Hurt
        }
        TrapKind::Magic | TrapKind::VibratingSquare | TrapKind::MagicPortal { .. } => {
            // magic traps fizzle for monsters; portals are keyed to the player
            MintrapResult::Escaped
        }
        TrapKind::AntiMagic => {
            if let Some(mon) = game.level.monster_mut(id) {
                mon.cancelled = true;
            }
            MintrapResult::Hurt
        }
        TrapKind::Polymorph => {
            let depth = game.level.depth;
            let new_species = pick_species(depth, &game.vitals, game.rng.core());
            if let Some(sp) = new_species {
                let hp = game.core().dice(u32::from(sp.template().level).max(1), 8) as i32;
                if let Some(mon) = game.level.monster_mut(id) {
                    mon.species = sp;
                    mon.hp = hp;
                    mon.hpmax = hp;
                    mon.level = sp.template().level;
                }
                if let Some(mon) = game.level.monster(id) {
                    game.mon_message(
                        ui,
                        mon,
                        Severity::Info,
                        &format!("A change comes over {}!", game.mon_name(mon)),
                        None,
                    );
                }
            }
            MintrapResult::Hurt
        }
        TrapKind::Landmine => {
            game.level.wake_nearby(x, y, 400);
            if let Some(trap) = game.level.trap_at_mut(x, y) {
                trap.kind = TrapKind::Pit;
                trap.seen = true;
            }
            let dmg = game.core().rnd(16) as i32;
            if let Some(mon) = game.level.monster(id) {
                game.mon_message(
                    ui,
                    mon,
                    Severity::StatusBad,
                    "KAABLAMM!!!  You hear an explosion in the distance!",
                    Some("KAABLAMM!!!  You hear an explosion in the distance!"),
                );
            }
            mintrap_hit(game, ui, id, dmg, "The blast engulfs")
        }
        TrapKind::RollingBoulder { .. } => {
            let dmg = game.core().dice(3, 6) as i32;
            let boulder_id = game.level.new_object_id();
            let boulder = mksobj(ObjKind::Boulder, false, game.core(), boulder_id);
            game.level.place_object(boulder, x, y);
            if game.core().one_in(2) {
                game.level.remove_trap_at(x, y);
            }
            mintrap_hit(game, ui, id, dmg, "A boulder rolls into")
        }
    }
}

fn mintrap_hit(
    game: &mut Game,
    ui: &mut dyn Ui,
    id: MonsterId,
    dmg: i32,
    verb: &str,
) -> MintrapResult {
    if let Some(mon) = game.level.monster(id) {
        game.mon_message(
            ui,
            mon,
            Severity::Info,
            &format!("{} {}!", verb, game.mon_name(mon)),
            None,
        );
    }
    match game.hurt_mon(ui, id, dmg) {
        Some(_) => MintrapResult::Gone,
        None => MintrapResult::Hurt,
    }
}
