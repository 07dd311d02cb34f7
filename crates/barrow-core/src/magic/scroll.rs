//! Scroll effects.
//!
//! Reading consumes the scroll before the effect lands; blindness
//! refuses the read outright and keeps the scroll. Enchant-armor
//! over-enchant vanishing and the identify batch size draw from their
//! own dedicated streams so level layout replay stays undisturbed.

use barrow_rng::Stream;

use crate::action::{ActionOutcome, ActionRequest};
use crate::combat::{dmgval, is_large};
use crate::consts::{COLNO, ROWNO};
use crate::dungeon::level::distmin;
use crate::magic::EffectFeedback;
use crate::monster::{makemon, MonsterId};
use crate::object::{mksobj, Buc, ObjClass, ObjKind, ObjectId, ScrollKind, WornMask};
use crate::ui::{Region, Severity, Ui};
use crate::world::context::{capitalize, Game};
use crate::world::errors::{DoneHow, EngineSignal, Killer};

const NEIGHBORS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// The player reads a scroll from the pack.
pub fn doscroll(
    game: &mut Game,
    ui: &mut dyn Ui,
    req: ActionRequest,
) -> Result<ActionOutcome, EngineSignal> {
    if game.you.is_blind() {
        game.pline(ui, "You can't read anything while blind.");
        return Ok(ActionOutcome::Refused);
    }
    let (kind, buc, quan) = match game.you.carried(req.item) {
        Some(obj) => match obj.kind {
            ObjKind::Scroll(kind) => (kind, obj.buc, obj.quan),
            _ => {
                game.impossible(ui, "tried to read a non-scroll");
                return Ok(ActionOutcome::Refused);
            }
        },
        None => {
            game.impossible(ui, "tried to read an item not in the pack");
            return Ok(ActionOutcome::Refused);
        }
    };
    game.pline(ui, "As you read the scroll, it disappears.");
    if quan > 1 {
        if let Some(stack) = game.you.carried_mut(req.item) {
            stack.quan -= 1;
        }
    } else {
        game.you.remove_from_inventory(req.item);
    }

    let feedback = seffect(game, ui, kind, buc)?;
    if !feedback.perceptible {
        game.pline(ui, "You have a strange feeling for a moment, then it passes.");
    }
    if feedback.learned {
        for obj in &mut game.you.inventory {
            if obj.kind == ObjKind::Scroll(kind) {
                obj.known = true;
                obj.dknown = true;
            }
        }
    }
    Ok(ActionOutcome::Done)
}

fn worn_armor_ids(game: &Game) -> Vec<ObjectId> {
    game.you
        .inventory
        .iter()
        .filter(|o| o.is_worn_armor())
        .map(|o| o.id)
        .collect()
}

fn seffect(
    game: &mut Game,
    ui: &mut dyn Ui,
    kind: ScrollKind,
    buc: Buc,
) -> Result<EffectFeedback, EngineSignal> {
    let sign = buc.sign();
    match kind {
        ScrollKind::EnchantArmor => {
            let worn = worn_armor_ids(game);
            let target = {
                let rng = game.rng.core();
                rng.choose(&worn).copied()
            };
            let Some(target) = target else {
                game.pline(ui, "Your skin glows for a moment.");
                return Ok(EffectFeedback::felt());
            };
            let (name, spe) = match game.you.carried(target) {
                Some(obj) => (obj.kind.name(), obj.spe),
                None => return Ok(EffectFeedback::nothing()),
            };
            if sign < 0 {
                if let Some(obj) = game.you.carried_mut(target) {
                    obj.spe -= 1;
                }
                let line = format!("Your {name} glows black for a moment.");
                game.pline_sev(ui, &line, Severity::StatusBad);
            } else if spe > 3 && game.stream(Stream::ArmorEnchant).rn2(spe as u32) != 0 {
                game.you.remove_from_inventory(target);
                let line = format!(
                    "Your {name} violently glows silver for a while, then evaporates."
                );
                game.pline_sev(ui, &line, Severity::StatusBad);
            } else {
                if let Some(obj) = game.you.carried_mut(target) {
                    obj.spe += 1;
                }
                let line = format!("Your {name} glows silver for a moment.");
                game.pline_sev(ui, &line, Severity::StatusGood);
            }
            Ok(EffectFeedback::obvious())
        }
        ScrollKind::DestroyArmor => {
            let worn = worn_armor_ids(game);
            let target = {
                let rng = game.rng.core();
                rng.choose(&worn).copied()
            };
            let Some(target) = target else {
                game.pline(ui, "Your skin itches.");
                return Ok(EffectFeedback::felt());
            };
            let name = match game.you.carried(target) {
                Some(obj) => obj.kind.name(),
                None => return Ok(EffectFeedback::nothing()),
            };
            game.you.remove_from_inventory(target);
            let line = format!("Your {name} crumbles to dust!");
            game.pline_sev(ui, &line, Severity::StatusBad);
            Ok(EffectFeedback::obvious())
        }
        ScrollKind::EnchantWeapon => {
            let target = game
                .you
                .wielded
                .filter(|id| game.you.carried(*id).is_some_and(|o| o.is_weapon()));
            let Some(target) = target else {
                game.pline(ui, "Your hands twitch.");
                return Ok(EffectFeedback::felt());
            };
            let (name, spe) = match game.you.carried(target) {
                Some(obj) => (obj.kind.name(), obj.spe),
                None => return Ok(EffectFeedback::nothing()),
            };
            if sign < 0 {
                if let Some(obj) = game.you.carried_mut(target) {
                    obj.spe -= 1;
                }
                let line = format!("Your {name} glows black for a moment.");
                game.pline_sev(ui, &line, Severity::StatusBad);
            } else if spe > 5 && game.core().rn2(spe as u32) != 0 {
                game.you.remove_from_inventory(target);
                let line = format!(
                    "Your {name} violently glows blue for a while, then evaporates."
                );
                game.pline_sev(ui, &line, Severity::StatusBad);
            } else {
                if let Some(obj) = game.you.carried_mut(target) {
                    obj.spe += 1;
                }
                let line = format!("Your {name} glows blue for a moment.");
                game.pline_sev(ui, &line, Severity::StatusGood);
            }
            Ok(EffectFeedback::obvious())
        }
        ScrollKind::RemoveCurse => {
            if sign < 0 {
                game.pline(ui, "You feel like you need some help.");
                return Ok(EffectFeedback::felt());
            }
            let wielded = game.you.wielded;
            let quivered = game.you.quivered;
            let mut touched = false;
            for obj in &mut game.you.inventory {
                let in_use = !obj.worn.is_empty()
                    || Some(obj.id) == wielded
                    || Some(obj.id) == quivered;
                if (sign > 0 || in_use) && obj.is_cursed() {
                    obj.uncurse();
                    obj.buc_known = false;
                    touched = true;
                }
            }
            game.pline_sev(
                ui,
                "You feel like someone is helping you.",
                Severity::StatusGood,
            );
            Ok(EffectFeedback {
                perceptible: true,
                learned: touched,
            })
        }
        ScrollKind::Identify => {
            let mut budget = if sign < 0 {
                1usize
            } else {
                let roll = game.stream(Stream::IdentifyCount).rn2(5);
                if roll == 4 {
                    usize::MAX
                } else {
                    (roll as usize).max(1)
                }
            };
            let mut identified = 0;
            while budget > 0 {
                let candidates: Vec<ObjectId> = game
                    .you
                    .inventory
                    .iter()
                    .filter(|o| !o.known || !o.dknown || !o.buc_known)
                    .map(|o| o.id)
                    .collect();
                if candidates.is_empty() {
                    break;
                }
                let Some(pick) = ui.choose_object("What do you want to identify?", &candidates)
                else {
                    break;
                };
                if let Some(obj) = game.you.carried_mut(pick) {
                    obj.known = true;
                    obj.dknown = true;
                    obj.buc_known = true;
                }
                if let Some(obj) = game.you.carried(pick) {
                    let line = format!("You identify the {}.", obj.kind.name());
                    game.pline(ui, &line);
                }
                identified += 1;
                if budget != usize::MAX {
                    budget -= 1;
                }
            }
            if identified == 0 {
                return Ok(EffectFeedback::nothing());
            }
            Ok(EffectFeedback::obvious())
        }
        ScrollKind::Teleportation => {
            if sign < 0 {
                let drop = game.core().rnd(3) as u32;
                game.pending_level = Some(game.level.depth + drop);
                game.pline_sev(ui, "The floor opens up under you!", Severity::StatusBad);
                return Ok(EffectFeedback::obvious());
            }
            for _ in 0..200 {
                let x = game.core().rn2(COLNO as u32) as i32;
                let y = game.core().rn2(ROWNO as u32) as i32;
                let free = game.level.tile(x, y).is_some_and(|t| t.is_walkable())
                    && game.level.monster_at(x, y).is_none()
                    && (x, y) != (game.you.x, game.you.y);
                if free {
                    game.you.x = x;
                    game.you.y = y;
                    game.pline(ui, "You feel a wrenching sensation.");
                    ui.request_redraw(Region::Full);
                    return Ok(EffectFeedback::obvious());
                }
            }
            Ok(EffectFeedback::nothing())
        }
        ScrollKind::GoldDetection => {
            let mut spots: Vec<(i32, i32)> = game
                .level
                .objects
                .iter()
                .filter(|o| o.kind == ObjKind::Gold)
                .filter_map(|o| match o.loc {
                    crate::object::ObjLocation::Floor { x, y } => Some((x, y)),
                    _ => None,
                })
                .collect();
            for mon in &game.level.monsters {
                if mon.inventory.iter().any(|o| o.kind == ObjKind::Gold) {
                    spots.push((mon.x, mon.y));
                }
            }
            if spots.is_empty() {
                game.pline(ui, "You feel materially poor.");
                return Ok(EffectFeedback::obvious());
            }
            for (x, y) in spots {
                if let Some(tile) = game.level.tile_mut(x, y) {
                    tile.seen = true;
                }
            }
            game.pline(ui, "You feel very greedy, and sense gold!");
            ui.request_redraw(Region::Full);
            Ok(EffectFeedback::obvious())
        }
        ScrollKind::FoodDetection => {
            let spots: Vec<(i32, i32)> = game
                .level
                .objects
                .iter()
                .filter(|o| o.kind.class() == ObjClass::Food)
                .filter_map(|o| match o.loc {
                    crate::object::ObjLocation::Floor { x, y } => Some((x, y)),
                    _ => None,
                })
                .collect();
            if spots.is_empty() {
                game.pline(ui, "Your nose twitches.");
                return Ok(EffectFeedback::felt());
            }
            for (x, y) in spots {
                if let Some(tile) = game.level.tile_mut(x, y) {
                    tile.seen = true;
                }
            }
            game.pline(ui, "Your nose tingles and you smell food.");
            ui.request_redraw(Region::Full);
            Ok(EffectFeedback::obvious())
        }
        ScrollKind::Light => {
            let (ux, uy) = (game.you.x, game.you.y);
            let bounds = match game.level.room_index_at(ux, uy) {
                Some(idx) => {
                    let room = &game.level.rooms[idx];
                    (room.lx, room.ly, room.hx, room.hy)
                }
                None => (ux - 2, uy - 2, ux + 2, uy + 2),
            };
            let lit = sign >= 0;
            for x in bounds.0..=bounds.2 {
                for y in bounds.1..=bounds.3 {
                    if let Some(tile) = game.level.tile_mut(x, y) {
                        tile.lit = lit;
                    }
                }
            }
            if lit {
                game.pline(ui, "A lit field surrounds you!");
            } else {
                game.pline_sev(ui, "Suddenly, darkness surrounds you.", Severity::StatusBad);
            }
            ui.request_redraw(Region::Full);
            Ok(EffectFeedback::obvious())
        }
        ScrollKind::Fire => {
            game.pline_sev(ui, "The scroll erupts in a tower of flame!", Severity::StatusBad);
            if game.you.resists_fire() {
                game.pline(ui, "You are uninjured.");
            } else {
                let dmg = game.core().rnd(6) as i32;
                game.losehp(dmg, Killer::by_an("scroll of fire"), DoneHow::Burned)?;
            }
            let (ux, uy) = (game.you.x, game.you.y);
            let nearby: Vec<MonsterId> = game
                .level
                .monsters
                .iter()
                .filter(|m| distmin(m.x, m.y, ux, uy) <= 1)
                .map(|m| m.id)
                .collect();
            for id in nearby {
                let resists = game
                    .level
                    .monster(id)
                    .is_some_and(|m| m.species.resists_fire());
                if resists {
                    continue;
                }
                let dmg = game.core().dice(2, 6) as i32;
                if let Some(mon) = game.level.monster(id) {
                    let line = format!(
                        "{} is caught in the flames!",
                        capitalize(&game.mon_name(mon))
                    );
                    game.mon_message(ui, mon, Severity::ActionOk, &line, None);
                }
                game.hurt_mon(ui, id, dmg);
            }
            Ok(EffectFeedback::obvious())
        }
        ScrollKind::Earth => {
            game.pline_sev(ui, "The ceiling rumbles above you!", Severity::StatusBad);
            let (ux, uy) = (game.you.x, game.you.y);
            let mut cells: Vec<(i32, i32)> = Vec::new();
            if sign >= 0 {
                for (dx, dy) in NEIGHBORS {
                    cells.push((ux + dx, uy + dy));
                }
            }
            if sign <= 0 {
                cells.push((ux, uy));
            }
            for (x, y) in cells {
                let open = game.level.tile(x, y).is_some_and(|t| t.is_walkable());
                if !open {
                    continue;
                }
                let oid = game.level.new_object_id();
                let boulder = {
                    let rng = game.rng.core();
                    mksobj(ObjKind::Boulder, false, rng, oid)
                };
                let target = game.level.monster_at(x, y).map(|m| (m.id, is_large(m)));
                if let Some((mid, large)) = target {
                    let dmg = dmgval(&boulder, large, game.rng.core());
                    if let Some(mon) = game.level.monster(mid) {
                        let line = format!(
                            "{} is hit by a boulder!",
                            capitalize(&game.mon_name(mon))
                        );
                        game.mon_message(ui, mon, Severity::ActionOk, &line, None);
                    }
                    game.hurt_mon(ui, mid, dmg);
                } else if (x, y) == (ux, uy) {
                    let dmg = dmgval(&boulder, false, game.rng.core());
                    game.pline_sev(ui, "You are hit by a boulder!", Severity::StatusBad);
                    game.losehp(dmg, Killer::by_an("scroll of earth"), DoneHow::Died)?;
                }
                game.level.place_object(boulder, x, y);
            }
            ui.request_redraw(Region::Full);
            Ok(EffectFeedback::obvious())
        }
        ScrollKind::CreateMonster => {
            let want = if sign < 0 { 1 + game.core().rn2(3) } else { 1 };
            let depth = game.level.depth;
            let (ux, uy) = (game.you.x, game.you.y);
            let mut made = 0;
            for (dx, dy) in NEIGHBORS {
                if made >= want {
                    break;
                }
                let created = makemon(
                    None,
                    ux + dx,
                    uy + dy,
                    depth,
                    &mut game.level,
                    &mut game.vitals,
                    game.rng.core(),
                );
                if created.is_some() {
                    made += 1;
                }
            }
            if made == 0 {
                return Ok(EffectFeedback::nothing());
            }
            if made == 1 {
                game.pline(ui, "A monster appears from nowhere!");
            } else {
                game.pline(ui, "Monsters appear from nowhere!");
            }
            ui.request_redraw(Region::Full);
            Ok(EffectFeedback::obvious())
        }
        ScrollKind::Taming => {
            let (ux, uy) = (game.you.x, game.you.y);
            let nearby: Vec<MonsterId> = game
                .level
                .monsters
                .iter()
                .filter(|m| distmin(m.x, m.y, ux, uy) <= 1)
                .map(|m| m.id)
                .collect();
            if nearby.is_empty() {
                game.pline(ui, "You feel charismatic!");
                return Ok(EffectFeedback::felt());
            }
            for id in nearby {
                if let Some(mon) = game.level.monster_mut(id) {
                    mon.tame = true;
                    mon.peaceful = true;
                    mon.timers.flee = 0;
                }
                if let Some(mon) = game.level.monster(id) {
                    let line = format!(
                        "{} suddenly looks calmer.",
                        capitalize(&game.mon_name(mon))
                    );
                    game.mon_message(ui, mon, Severity::ActionOk, &line, None);
                }
            }
            Ok(EffectFeedback::obvious())
        }
        ScrollKind::ScareMonster => {
            game.pline(ui, "You hear maniacal laughter close by.");
            let had_monsters = !game.level.monsters.is_empty();
            let dur = game.core().rn1(10, 5) as u16;
            for mon in &mut game.level.monsters {
                if !mon.tame {
                    mon.timers.flee = mon.timers.flee.saturating_add(dur);
                    mon.wake();
                }
            }
            if had_monsters {
                Ok(EffectFeedback::obvious())
            } else {
                Ok(EffectFeedback::felt())
            }
        }
        ScrollKind::ConfuseMonster => {
            game.pline(ui, "Your hands begin to glow red.");
            let (ux, uy) = (game.you.x, game.you.y);
            let nearby: Vec<MonsterId> = game
                .level
                .monsters
                .iter()
                .filter(|m| distmin(m.x, m.y, ux, uy) <= 1)
                .map(|m| m.id)
                .collect();
            for id in nearby {
                let dur = game.core().rn1(10, 5) as u16;
                if let Some(mon) = game.level.monster_mut(id) {
                    mon.timers.confusion = mon.timers.confusion.saturating_add(dur);
                }
                if let Some(mon) = game.level.monster(id) {
                    let line =
                        format!("{} looks confused.", capitalize(&game.mon_name(mon)));
                    game.mon_message(ui, mon, Severity::ActionOk, &line, None);
                }
            }
            Ok(EffectFeedback::obvious())
        }
        ScrollKind::MagicMapping => {
            if sign < 0 {
                game.pline(ui, "Unfortunately, you can't grasp the details.");
                return Ok(EffectFeedback::felt());
            }
            for x in 0..COLNO {
                for y in 0..ROWNO {
                    if let Some(tile) = game.level.tile_mut(x, y) {
                        tile.seen = true;
                    }
                }
            }
            game.pline(ui, "A map coalesces in your mind!");
            ui.request_redraw(Region::Full);
            Ok(EffectFeedback::obvious())
        }
        ScrollKind::Genocide => {
            let Some(sp) = ui.choose_species("What monster do you want to genocide?") else {
                game.pline(ui, "You decide against genocide.");
                return Ok(EffectFeedback::obvious());
            };
            if !sp.can_be_genocided() {
                game.pline(
                    ui,
                    "A thunderous voice booms through the caverns: \"No, mortal!\"",
                );
                return Ok(EffectFeedback::obvious());
            }
            if sign < 0 {
                // a foul misprint summons what it was meant to erase
                let want = 3 + game.core().rn2(3);
                let depth = game.level.depth;
                let (ux, uy) = (game.you.x, game.you.y);
                let mut made = 0;
                for (dx, dy) in NEIGHBORS {
                    if made >= want {
                        break;
                    }
                    let created = makemon(
                        Some(sp),
                        ux + dx,
                        uy + dy,
                        depth,
                        &mut game.level,
                        &mut game.vitals,
                        game.rng.core(),
                    );
                    if created.is_some() {
                        made += 1;
                    }
                }
                let line = format!("Sent in some {}s!", sp.name());
                game.pline_sev(ui, &line, Severity::StatusBad);
                ui.request_redraw(Region::Full);
                return Ok(EffectFeedback::obvious());
            }
            game.vitals.genocide(sp);
            let before = game.level.monsters.len();
            game.level.monsters.retain(|m| m.species != sp);
            let killed = before - game.level.monsters.len();
            for _ in 0..killed {
                game.vitals.note_death(sp);
            }
            let line = format!("Wiped out all {}s.", sp.name());
            game.pline_sev(ui, &line, Severity::ActionOk);
            ui.request_redraw(Region::Full);
            Ok(EffectFeedback::obvious())
        }
        ScrollKind::Punishment => {
            if sign > 0 {
                game.pline(ui, "You feel guilty.");
                return Ok(EffectFeedback::felt());
            }
            if game.you.punished {
                game.pline_sev(ui, "Your punishment gets worse.", Severity::StatusBad);
                return Ok(EffectFeedback::obvious());
            }
            let ball_id = game.level.new_object_id();
            let chain_id = game.level.new_object_id();
            let (mut ball, mut chain) = {
                let rng = game.rng.core();
                (
                    mksobj(ObjKind::HeavyIronBall, false, rng, ball_id),
                    mksobj(ObjKind::IronChain, false, rng, chain_id),
                )
            };
            ball.worn = WornMask::BALL;
            chain.worn = WornMask::CHAIN;
            let bid = game.you.add_to_inventory(ball);
            let cid = game.you.add_to_inventory(chain);
            game.you.punished = true;
            game.you.ball = Some(bid);
            game.you.chain = Some(cid);
            game.pline_sev(
                ui,
                "You are being punished for your misbehavior!",
                Severity::StatusBad,
            );
            Ok(EffectFeedback::obvious())
        }
        ScrollKind::Charging => {
            let wands: Vec<ObjectId> = game
                .you
                .inventory
                .iter()
                .filter(|o| o.kind.class() == ObjClass::Wand)
                .map(|o| o.id)
                .collect();
            if wands.is_empty() {
                game.pline(ui, "You feel charged up.");
                return Ok(EffectFeedback::felt());
            }
            let Some(pick) = ui.choose_object("What do you want to charge?", &wands) else {
                return Ok(EffectFeedback::nothing());
            };
            let (name, recharged) = match game.you.carried(pick) {
                Some(obj) => (obj.kind.name(), obj.recharged),
                None => return Ok(EffectFeedback::nothing()),
            };
            if game.core().rn2(7) < u32::from(recharged) {
                game.you.remove_from_inventory(pick);
                let line = format!("Your {name} vibrates violently and explodes!");
                game.pline_sev(ui, &line, Severity::StatusBad);
                return Ok(EffectFeedback::obvious());
            }
            if sign < 0 {
                if let Some(obj) = game.you.carried_mut(pick) {
                    obj.spe = 0;
                }
                let line = format!("Your {name} vibrates briefly.");
                game.pline_sev(ui, &line, Severity::StatusBad);
            } else {
                let boost = if sign > 0 { game.core().rnd(4) as i8 } else { 1 };
                if let Some(obj) = game.you.carried_mut(pick) {
                    obj.spe = obj.spe.saturating_add(boost);
                    obj.recharged += 1;
                }
                let line = format!("Your {name} glows briefly.");
                game.pline_sev(ui, &line, Severity::StatusGood);
            }
            Ok(EffectFeedback::obvious())
        }
    }
}
