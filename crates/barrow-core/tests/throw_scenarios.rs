//! End-to-end throwing through the public API: a player, a level, a
//! target, and the messages a session would actually print.

use barrow_core::action::{dothrow, multishot_count, ActionRequest, Direction};
use barrow_core::dungeon::{Level, Terrain};
use barrow_core::monster::{Monster, MonsterId, Species};
use barrow_core::object::{mksobj, ObjKind, ObjectId};
use barrow_core::player::{Role, SkillRank, You};
use barrow_core::ui::ScriptedUi;
use barrow_core::world::Game;
use barrow_rng::GameRng;
use proptest::prelude::*;

fn open_arena(seed: u64) -> Game {
    let mut game = Game::new(seed);
    let mut level = Level::new(1);
    for x in 1..40 {
        for y in 1..18 {
            level.set_terrain(x, y, Terrain::Room);
            if let Some(t) = level.tile_mut(x, y) {
                t.lit = true;
            }
        }
    }
    game.level = level;
    game.you.x = 5;
    game.you.y = 5;
    game
}

fn wolf_at(game: &mut Game, x: i32, y: i32, hp: i32) -> MonsterId {
    let id = game.level.new_monster_id();
    game.level.monsters.push(Monster::new(id, Species::Wolf, x, y, hp, 5));
    id
}

fn dagger(id: u32) -> barrow_core::object::Object {
    let mut rng = GameRng::new(1);
    mksobj(ObjKind::Dagger, false, &mut rng, ObjectId(id))
}

#[test]
fn test_sure_shot_lands_and_drops_at_the_target() {
    // luck and level push the to-hit ceiling past any d20 roll
    let mut game = open_arena(11);
    game.you.luck = 10;
    game.you.level = 30;
    let wolf = wolf_at(&mut game, 8, 5, 200);
    let item = game.you.add_to_inventory(dagger(1));

    let mut ui = ScriptedUi::new();
    let req = ActionRequest::throw(item).with_dir(Direction::East);
    dothrow(&mut game, &mut ui, req).unwrap();

    assert!(ui.saw("The dagger hits the wolf."), "messages: {:?}", ui.messages);
    let wolf = game.level.monster(wolf).unwrap();
    assert!(wolf.hp < 200, "hit landed but dealt no damage");
    assert!(game.you.inventory.is_empty());
    // daggers do not snap; the missile comes to rest on the floor
    assert_eq!(game.level.objects.len(), 1);
    assert_eq!(game.level.objects[0].kind, ObjKind::Dagger);
}

#[test]
fn test_hopeless_shot_always_misses() {
    // rock-bottom luck drives the ceiling below every possible roll
    let mut game = open_arena(12);
    game.you.luck = -13;
    let wolf = wolf_at(&mut game, 8, 5, 40);
    let item = game.you.add_to_inventory(dagger(1));

    let mut ui = ScriptedUi::new();
    dothrow(&mut game, &mut ui, ActionRequest::throw(item).with_dir(Direction::East)).unwrap();

    assert!(ui.saw("The dagger misses the wolf."), "messages: {:?}", ui.messages);
    assert_eq!(game.level.monster(wolf).unwrap().hp, 40);
    // the wolf's cell ended the walk; the dagger rests there
    assert_eq!(game.level.objects.len(), 1);
    assert!(game.level.objects_at(8, 5).any(|o| o.kind == ObjKind::Dagger));
}

#[test]
fn test_volley_peels_singles_off_the_stack() {
    let mut game = open_arena(13);
    game.you.role = Role::Rogue;
    game.you.skills.insert(barrow_core::object::Skill::Dagger, SkillRank::Expert);
    game.you.luck = 10;
    game.you.level = 30;
    wolf_at(&mut game, 9, 5, 500);
    let mut stack = dagger(1);
    stack.quan = 6;
    let item = game.you.add_to_inventory(stack);

    let mut ui = ScriptedUi::new();
    dothrow(&mut game, &mut ui, ActionRequest::throw(item).with_dir(Direction::East)).unwrap();

    let left = game.you.inventory.first().map_or(0, |o| o.quan);
    let flown: u32 = game.level.objects.iter().map(|o| o.quan).sum();
    assert_eq!(left + flown, 6, "daggers vanished or duplicated in flight");
    assert!(flown >= 1);
}

#[test]
fn test_throw_against_the_wall_stops_short() {
    let mut game = open_arena(14);
    // two cells of floor, then solid stone
    let item = game.you.add_to_inventory(dagger(1));
    game.you.x = 37;
    game.you.y = 5;

    let mut ui = ScriptedUi::new();
    dothrow(&mut game, &mut ui, ActionRequest::throw(item).with_dir(Direction::East)).unwrap();

    assert_eq!(game.level.objects.len(), 1);
    let rest = &game.level.objects[0];
    let (x, y) = match rest.loc {
        barrow_core::object::ObjLocation::Floor { x, y } => (x, y),
        ref other => panic!("missile ended {other:?}"),
    };
    assert!(game.level.tile(x, y).is_some_and(|t| t.is_walkable()));
    assert!(x <= 39);
}

proptest! {
    #[test]
    fn test_multishot_stays_within_stack_and_limit(
        quan in 1u32..8,
        limit in proptest::option::of(1u32..4),
        seed in any::<u64>(),
        expert in any::<bool>(),
    ) {
        let mut you = You::default();
        you.role = Role::Rogue;
        if expert {
            you.skills.insert(barrow_core::object::Skill::Dagger, SkillRank::Expert);
        }
        let mut stack = dagger(1);
        stack.quan = quan;
        let mut rng = GameRng::new(seed);
        let count = multishot_count(&you, &stack, None, limit, &mut rng);
        prop_assert!(count >= 1);
        prop_assert!(count <= quan);
        if let Some(cap) = limit {
            prop_assert!(count <= cap.max(1));
        }
    }
}

#[test]
fn test_gold_never_volleys() {
    let you = You::default();
    let mut rng = GameRng::new(9);
    let mut gold = barrow_core::object::Object::new(ObjectId(1), ObjKind::Gold);
    gold.quan = 50;
    assert_eq!(multishot_count(&you, &gold, None, None, &mut rng), 1);
}
