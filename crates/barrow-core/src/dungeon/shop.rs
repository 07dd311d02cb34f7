//! Shops: archetypes, stocking, and the shopkeeper's bill.

use serde::{Deserialize, Serialize};

use barrow_rng::GameRng;

use crate::dungeon::level::Level;
use crate::dungeon::room::RoomType;
use crate::monster::{makemon, MonsterId, Species, VitalsRegistry};
use crate::object::{mkobj, ObjClass, ObjKind, ObjLocation, Object, ObjectId};

/// Shop archetypes and their selection weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShopKind {
    General,
    Food,
    Weapon,
    Armor,
    Tool,
    Book,
    Ring,
    Wand,
    Candle,
}

/// Floor area above which the rare single-class shops are skipped;
/// big rooms get shops that can actually fill them.
const BIG_SHOP_AREA: i32 = 20;

const SHOP_WEIGHTS: &[(ShopKind, u32)] = &[
    (ShopKind::General, 44),
    (ShopKind::Food, 16),
    (ShopKind::Weapon, 14),
    (ShopKind::Armor, 10),
    (ShopKind::Tool, 8),
    (ShopKind::Book, 4),
    (ShopKind::Ring, 2),
    (ShopKind::Wand, 1),
    (ShopKind::Candle, 1),
];

impl ShopKind {
    pub fn name(self) -> &'static str {
        match self {
            ShopKind::General => "general store",
            ShopKind::Food => "delicatessen",
            ShopKind::Weapon => "weapon shop",
            ShopKind::Armor => "armor shop",
            ShopKind::Tool => "tool shop",
            ShopKind::Book => "bookstore",
            ShopKind::Ring => "jewelry store",
            ShopKind::Wand => "wand shop",
            ShopKind::Candle => "lighting store",
        }
    }

    /// Item class the archetype stocks; `None` means any class.
    pub fn stock_class(self) -> Option<ObjClass> {
        match self {
            ShopKind::General => None,
            ShopKind::Food => Some(ObjClass::Food),
            ShopKind::Weapon => Some(ObjClass::Weapon),
            ShopKind::Armor => Some(ObjClass::Armor),
            ShopKind::Tool => Some(ObjClass::Tool),
            ShopKind::Book => Some(ObjClass::Spellbook),
            ShopKind::Ring => Some(ObjClass::Ring),
            ShopKind::Wand => Some(ObjClass::Wand),
            ShopKind::Candle => Some(ObjClass::Tool),
        }
    }

    /// Pick an archetype by weight. Big rooms exclude the wand and
    /// book archetypes.
    pub fn pick(area: i32, rng: &mut GameRng) -> ShopKind {
        let eligible: Vec<(ShopKind, u32)> = SHOP_WEIGHTS
            .iter()
            .filter(|(k, _)| {
                area <= BIG_SHOP_AREA || !matches!(k, ShopKind::Wand | ShopKind::Book)
            })
            .copied()
            .collect();
        let total: u32 = eligible.iter().map(|(_, w)| w).sum();
        let mut roll = rng.rn2(total);
        for (kind, w) in eligible {
            if roll < w {
                return kind;
            }
            roll -= w;
        }
        ShopKind::General
    }
}

/// One unpaid item on the shopkeeper's books.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillEntry {
    pub obj: ObjectId,
    pub price: u32,
    pub quan: u32,
}

/// A shop on the current level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopInfo {
    pub room: usize,
    pub kind: ShopKind,
    pub shk: MonsterId,
    pub bill: Vec<BillEntry>,
}

impl ShopInfo {
    pub fn debt(&self) -> u32 {
        self.bill.iter().map(|e| e.price * e.quan).sum()
    }

    pub fn add_to_bill(&mut self, obj: &Object) {
        let price = obj.kind.template().price.max(1) as u32;
        self.bill.push(BillEntry { obj: obj.id, price, quan: obj.quan });
    }

    pub fn strike_from_bill(&mut self, id: ObjectId) {
        self.bill.retain(|e| e.obj != id);
    }
}

/// Shop whose room covers the cell, if any.
pub fn shop_at(level: &Level, x: i32, y: i32) -> Option<usize> {
    let room_idx = level.room_index_at(x, y)?;
    level.shops.iter().position(|s| s.room == room_idx)
}

/// Tools a shopkeeper confiscates on sight: anything that opens locks.
pub fn shk_snatches(kind: ObjKind) -> bool {
    matches!(kind, ObjKind::SkeletonKey | ObjKind::PickAxe)
}

/// Turn a room into a shop: pick the archetype, post the shopkeeper by
/// the door, and lay wares on every free floor cell.
pub fn stock_shop(
    level: &mut Level,
    room_idx: usize,
    depth: u32,
    vitals: &mut VitalsRegistry,
    rng: &mut GameRng,
) {
    let room = level.rooms[room_idx].clone();
    let kind = ShopKind::pick(room.area(), rng);

    // shopkeeper stands just inside the door
    let door = level
        .doors
        .iter()
        .copied()
        .find(|&(dx, dy)| room.contains_or_wall(dx, dy));
    let (sx, sy) = match door {
        Some((dx, dy)) => {
            let x = dx.clamp(room.lx, room.hx);
            let y = dy.clamp(room.ly, room.hy);
            (x, y)
        }
        None => room.center(),
    };
    let Some(shk) = makemon(Some(Species::Shopkeeper), sx, sy, depth, level, vitals, rng) else {
        return;
    };

    for x in room.lx..=room.hx {
        for y in room.ly..=room.hy {
            if (x, y) == (sx, sy) || level.stairs_at(x, y).is_some() {
                continue;
            }
            if !level.tile(x, y).is_some_and(|t| t.is_walkable()) {
                continue;
            }
            // leave a few gaps so the player can walk
            if rng.rn2(4) == 0 {
                continue;
            }
            let id = level.new_object_id();
            let mut ware = mkobj(kind.stock_class(), true, rng, id);
            if kind == ShopKind::Candle
                && !matches!(ware.kind, ObjKind::WaxCandle | ObjKind::TallowCandle | ObjKind::OilLamp)
            {
                ware = mkobj(Some(ObjClass::Tool), true, rng, id);
            }
            ware.no_charge = false;
            ware.loc = ObjLocation::Free;
            level.place_object(ware, x, y);
        }
    }

    level.rooms[room_idx].rtype = RoomType::Shop(kind);
    level.shops.push(ShopInfo { room: room_idx, kind, shk, bill: Vec::new() });
    level.flags |= crate::dungeon::level::LevelFlags::HAS_SHOP;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::room::Room;

    #[test]
    fn test_big_rooms_exclude_wand_and_book() {
        let mut rng = GameRng::new(2);
        for _ in 0..256 {
            let kind = ShopKind::pick(BIG_SHOP_AREA + 1, &mut rng);
            assert!(!matches!(kind, ShopKind::Wand | ShopKind::Book), "{kind:?}");
        }
    }

    #[test]
    fn test_small_rooms_eventually_get_rare_shops() {
        let mut rng = GameRng::new(5);
        let mut saw_rare = false;
        for _ in 0..2048 {
            if matches!(ShopKind::pick(12, &mut rng), ShopKind::Wand | ShopKind::Book) {
                saw_rare = true;
                break;
            }
        }
        assert!(saw_rare);
    }

    #[test]
    fn test_stock_shop_places_keeper_and_wares() {
        let mut level = Level::new(5);
        level.add_room(Room::new(10, 5, 16, 9, true));
        let mut vitals = VitalsRegistry::new();
        let mut rng = GameRng::new(9);
        stock_shop(&mut level, 0, 5, &mut vitals, &mut rng);

        assert_eq!(level.shops.len(), 1);
        let shop = &level.shops[0];
        assert_eq!(shop.room, 0);
        let shk = level.monster(shop.shk).expect("shopkeeper exists");
        assert_eq!(shk.species, Species::Shopkeeper);
        assert!(level.rooms[0].rtype.is_shop());
        assert!(level.objects.len() > 5, "shop stocked {} items", level.objects.len());
    }

    #[test]
    fn test_bill_arithmetic() {
        let mut shop = ShopInfo {
            room: 0,
            kind: ShopKind::General,
            shk: MonsterId(1),
            bill: Vec::new(),
        };
        let mut apple = Object::new(ObjectId(9), ObjKind::Apple);
        apple.quan = 3;
        shop.add_to_bill(&apple);
        assert_eq!(shop.debt(), 21);
        shop.strike_from_bill(ObjectId(9));
        assert_eq!(shop.debt(), 0);
    }

    #[test]
    fn test_snatch_set() {
        assert!(shk_snatches(ObjKind::SkeletonKey));
        assert!(shk_snatches(ObjKind::PickAxe));
        assert!(!shk_snatches(ObjKind::Dagger));
    }
}
