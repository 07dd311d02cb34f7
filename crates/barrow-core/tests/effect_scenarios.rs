//! Potion and scroll effects exercised against generated levels, the
//! way a session would reach them.

use barrow_core::action::{ActionRequest, Actor};
use barrow_core::consts::{COLNO, ROWNO};
use barrow_core::dungeon::mklev;
use barrow_core::magic::{dopotion, doscroll};
use barrow_core::monster::{Monster, Species};
use barrow_core::object::{Buc, ObjKind, Object, ObjectId, PotionKind, ScrollKind};
use barrow_core::ui::ScriptedUi;
use barrow_core::world::Game;

fn game_on_level(seed: u64, depth: u32) -> Game {
    let mut game = Game::new(seed);
    game.level = mklev(depth, &mut game.rng, &mut game.vitals);
    // start the player on the up staircase, as arrival would
    if let Some(s) = game.level.stairs.iter().find(|s| s.up) {
        game.you.x = s.x;
        game.you.y = s.y;
    }
    game
}

fn give(game: &mut Game, kind: ObjKind, buc: Buc, quan: u32) -> ObjectId {
    let mut obj = Object::new(ObjectId(9000), kind);
    obj.buc = buc;
    obj.quan = quan;
    game.you.add_to_inventory(obj)
}

fn use_item(item: ObjectId) -> ActionRequest {
    ActionRequest {
        actor: Actor::Player,
        item,
        target: None,
        dir: None,
        limit: None,
    }
}

#[test]
fn test_blessed_healing_restores_the_wounded() {
    let mut game = game_on_level(21, 1);
    game.you.hp = 1;
    let item = give(&mut game, ObjKind::Potion(PotionKind::Healing), Buc::Blessed, 2);

    let mut ui = ScriptedUi::new();
    dopotion(&mut game, &mut ui, use_item(item)).unwrap();

    assert!(game.you.hp >= 9, "blessed healing rolls at least 8");
    assert!(game.you.hp <= game.you.hpmax);
    assert_eq!(game.you.inventory[0].quan, 1, "one dose per quaff");
}

#[test]
fn test_teleport_scroll_lands_on_open_floor() {
    let mut game = game_on_level(22, 3);
    let item = give(&mut game, ObjKind::Scroll(ScrollKind::Teleportation), Buc::Uncursed, 1);

    let mut ui = ScriptedUi::new();
    doscroll(&mut game, &mut ui, use_item(item)).unwrap();

    assert!(
        game.level
            .tile(game.you.x, game.you.y)
            .is_some_and(|t| t.is_walkable()),
        "teleport landed on ({}, {})",
        game.you.x,
        game.you.y
    );
    assert_eq!(game.pending_level, None);
    assert!(game.you.inventory.is_empty(), "the scroll is spent");
}

#[test]
fn test_cursed_teleport_sends_the_reader_deeper() {
    let mut game = game_on_level(23, 4);
    let item = give(&mut game, ObjKind::Scroll(ScrollKind::Teleportation), Buc::Cursed, 1);

    let mut ui = ScriptedUi::new();
    doscroll(&mut game, &mut ui, use_item(item)).unwrap();

    let dest = game.pending_level.expect("cursed teleport migrates levels");
    assert!((5..=7).contains(&dest), "from depth 4, landed {dest}");
}

#[test]
fn test_magic_mapping_reveals_a_generated_level() {
    let mut game = game_on_level(24, 5);
    let item = give(&mut game, ObjKind::Scroll(ScrollKind::MagicMapping), Buc::Uncursed, 1);

    let mut ui = ScriptedUi::new();
    doscroll(&mut game, &mut ui, use_item(item)).unwrap();

    for x in 0..COLNO {
        for y in 0..ROWNO {
            assert!(
                game.level.tile(x, y).is_none_or(|t| t.seen),
                "cell ({x},{y}) still unmapped"
            );
        }
    }
}

#[test]
fn test_genocide_scroll_clears_a_live_level() {
    let mut game = game_on_level(25, 2);
    for i in 0..3 {
        let id = game.level.new_monster_id();
        game.level
            .monsters
            .push(Monster::new(id, Species::Jackal, 2 + i, 2, 6, 1));
    }
    let item = give(&mut game, ObjKind::Scroll(ScrollKind::Genocide), Buc::Uncursed, 1);

    let mut ui = ScriptedUi::new();
    ui.species_picks.push_back(Some(Species::Jackal));
    doscroll(&mut game, &mut ui, use_item(item)).unwrap();

    assert!(ui.saw("Wiped out all jackals."));
    assert!(game.vitals.is_genocided(Species::Jackal));
    assert!(
        game.level.monsters.iter().all(|m| m.species != Species::Jackal),
        "a jackal survived its own genocide"
    );
}
