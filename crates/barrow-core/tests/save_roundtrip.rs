//! Persistence round trips over the whole session object. The RNG pool
//! persists as its seed, so a restored game replays a fresh pool's
//! stream rather than resuming mid-sequence.

use barrow_core::consts::{COLNO, ROWNO};
use barrow_core::dungeon::mklev;
use barrow_core::object::{Buc, ObjKind, Object, ObjectId, PotionKind};
use barrow_core::world::Game;
use barrow_rng::{RngPool, Stream};

fn played_game(seed: u64) -> Game {
    let mut game = Game::new(seed);
    game.level = mklev(3, &mut game.rng, &mut game.vitals);
    game.you.x = 10;
    game.you.y = 5;
    game.you.hp = 11;
    game.turn = 482;
    let mut potion = Object::new(ObjectId(9000), ObjKind::Potion(PotionKind::Healing));
    potion.buc = Buc::Blessed;
    potion.quan = 2;
    game.you.add_to_inventory(potion);
    game
}

#[test]
fn test_game_round_trip_preserves_world() {
    let game = played_game(0xBEEF);
    let json = serde_json::to_string(&game).unwrap();
    let restored: Game = serde_json::from_str(&json).unwrap();

    assert_eq!(restored.turn, game.turn);
    assert_eq!(restored.you.hp, game.you.hp);
    assert_eq!((restored.you.x, restored.you.y), (game.you.x, game.you.y));
    assert_eq!(restored.you.inventory.len(), game.you.inventory.len());
    assert_eq!(restored.you.inventory[0].quan, 2);
    assert_eq!(restored.you.inventory[0].buc, Buc::Blessed);

    assert_eq!(restored.level.depth, game.level.depth);
    assert_eq!(restored.level.rooms.len(), game.level.rooms.len());
    assert_eq!(restored.level.monsters.len(), game.level.monsters.len());
    assert_eq!(restored.level.traps.len(), game.level.traps.len());
    for x in 0..COLNO {
        for y in 0..ROWNO {
            assert_eq!(
                restored.level.terrain(x, y),
                game.level.terrain(x, y),
                "terrain at ({x},{y})"
            );
        }
    }
}

#[test]
fn test_restored_pool_replays_from_seed() {
    let game = played_game(31337);
    let json = serde_json::to_string(&game).unwrap();
    let mut restored: Game = serde_json::from_str(&json).unwrap();

    assert_eq!(restored.rng.seed(), 31337);
    let mut fresh = RngPool::new(31337);
    for _ in 0..50 {
        assert_eq!(restored.core().rn2(1000), fresh.core().rn2(1000));
    }
    for _ in 0..20 {
        assert_eq!(
            restored.rng.stream(Stream::ArmorEnchant).rnd(8),
            fresh.stream(Stream::ArmorEnchant).rnd(8)
        );
    }
}

#[test]
fn test_door_masks_survive_serde() {
    let game = played_game(0xD00D);
    let json = serde_json::to_string(&game).unwrap();
    let restored: Game = serde_json::from_str(&json).unwrap();
    for &(x, y) in &game.level.doors {
        let before = game.level.tile(x, y).unwrap();
        let after = restored.level.tile(x, y).unwrap();
        assert_eq!(before.typ, after.typ);
        assert_eq!(before.doormask, after.doormask, "door mask at ({x},{y})");
    }
}
