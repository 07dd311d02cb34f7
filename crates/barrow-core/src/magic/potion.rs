//! Potion effects: quaffing, thrown-flask shatter, monster quaffing.
//!
//! Every formula is scaled by the curse/bless tri-state through
//! `sign` (-1 cursed, 0 uncursed, +1 blessed). Healing only raises the
//! hit-point ceiling when the roll overflows it.

use barrow_rng::GameRng;

use crate::action::{ActionOutcome, ActionRequest};
use crate::magic::EffectFeedback;
use crate::monster::MonsterId;
use crate::object::{Buc, ObjKind, Object, PotionKind};
use crate::player::{Attr, You};
use crate::ui::{Channel, Region, Severity, Ui};
use crate::world::context::Game;
use crate::world::errors::{DoneHow, EngineSignal, Killer};

/// Apply a heal roll; the ceiling only moves when the roll overflows it.
fn healup(you: &mut You, heal: i32, overflow_gain: i32, cure_blind: bool, cure_hallu: bool) {
    if you.hp + heal > you.hpmax {
        you.hpmax += overflow_gain;
    }
    you.hp = (you.hp + heal).min(you.hpmax);
    if cure_blind {
        you.timers.blind = 0;
    }
    if cure_hallu {
        you.timers.hallucination = 0;
    }
}

fn random_attr(rng: &mut GameRng) -> Attr {
    match rng.rn2(6) {
        0 => Attr::Str,
        1 => Attr::Dex,
        2 => Attr::Con,
        3 => Attr::Int,
        4 => Attr::Wis,
        _ => Attr::Cha,
    }
}

fn attr_adjective(attr: Attr) -> &'static str {
    match attr {
        Attr::Str => "strong",
        Attr::Dex => "agile",
        Attr::Con => "healthy",
        Attr::Int => "smart",
        Attr::Wis => "wise",
        Attr::Cha => "charismatic",
    }
}

/// The player drinks a potion from the pack. Consumes one dose before
/// the effect lands; an imperceptible effect still reports the telltale
/// peculiar feeling.
pub fn dopotion(
    game: &mut Game,
    ui: &mut dyn Ui,
    req: ActionRequest,
) -> Result<ActionOutcome, EngineSignal> {
    let (kind, buc, quan) = match game.you.carried(req.item) {
        Some(obj) => match obj.kind {
            ObjKind::Potion(kind) => (kind, obj.buc, obj.quan),
            _ => {
                game.impossible(ui, "tried to quaff a non-potion");
                return Ok(ActionOutcome::Refused);
            }
        },
        None => {
            game.impossible(ui, "tried to quaff an item not in the pack");
            return Ok(ActionOutcome::Refused);
        }
    };
    // the vessel is spent whatever the contents do
    if quan > 1 {
        if let Some(stack) = game.you.carried_mut(req.item) {
            stack.quan -= 1;
        }
    } else {
        game.you.remove_from_inventory(req.item);
    }

    let feedback = peffect(game, ui, kind, buc)?;
    if !feedback.perceptible {
        game.pline(ui, "You have a peculiar feeling for a moment, then it passes.");
    }
    if feedback.learned {
        for obj in &mut game.you.inventory {
            if obj.kind == ObjKind::Potion(kind) {
                obj.known = true;
                obj.dknown = true;
            }
        }
    }
    Ok(ActionOutcome::Done)
}

fn peffect(
    game: &mut Game,
    ui: &mut dyn Ui,
    kind: PotionKind,
    buc: Buc,
) -> Result<EffectFeedback, EngineSignal> {
    let sign = buc.sign();
    match kind {
        PotionKind::Healing => {
            let heal = game.core().dice((6 + 2 * sign) as u32, 4) as i32;
            let gain = if sign >= 0 { 1 } else { 0 };
            healup(&mut game.you, heal, gain, sign >= 0, false);
            game.pline_sev(ui, "You feel better.", Severity::StatusGood);
            Ok(EffectFeedback::obvious())
        }
        PotionKind::ExtraHealing => {
            let heal = game.core().dice((6 + 2 * sign) as u32, 8) as i32;
            let gain = match buc {
                Buc::Blessed => 5,
                Buc::Uncursed => 2,
                Buc::Cursed => 0,
            };
            healup(&mut game.you, heal, gain, true, sign >= 0);
            game.pline_sev(ui, "You feel much better.", Severity::StatusGood);
            Ok(EffectFeedback::obvious())
        }
        PotionKind::FullHealing => {
            let gain = (4 + 4 * sign).max(0);
            healup(&mut game.you, 400, gain, true, true);
            game.pline_sev(ui, "You feel completely healed.", Severity::StatusGood);
            Ok(EffectFeedback::obvious())
        }
        PotionKind::GainLevel => {
            if sign < 0 {
                if game.level.depth > 1 {
                    game.pending_level = Some(game.level.depth - 1);
                    game.pline(ui, "You rise up, through the ceiling!");
                } else {
                    game.pline(ui, "You hit your head on the ceiling.");
                }
                return Ok(EffectFeedback::obvious());
            }
            let rng = game.rng.core();
            game.you.pluslvl(rng);
            game.pline_sev(ui, "You feel more experienced.", Severity::StatusGood);
            Ok(EffectFeedback::obvious())
        }
        PotionKind::GainEnergy => {
            if sign < 0 {
                let loss = game.core().rnd(6) as i32;
                game.you.pw = (game.you.pw - loss).max(0);
                game.pline_sev(ui, "You feel lackluster.", Severity::StatusBad);
            } else {
                let rolls = if sign > 0 { 2 } else { 1 };
                let gain = game.core().dice(rolls, 6) as i32;
                game.you.pw += gain;
                if game.you.pw > game.you.pwmax {
                    game.you.pwmax += 1;
                    game.you.pw = game.you.pwmax;
                }
                game.pline_sev(
                    ui,
                    "Magical energies course through your body.",
                    Severity::StatusGood,
                );
            }
            Ok(EffectFeedback::obvious())
        }
        PotionKind::GainAbility => {
            if sign < 0 {
                let attr = random_attr(game.core());
                let cur = game.you.attrs.get(attr);
                game.you.attrs.set(attr, cur.saturating_sub(1));
                game.pline_sev(ui, "You feel weaker for a moment.", Severity::StatusBad);
                return Ok(EffectFeedback::felt());
            }
            if sign > 0 {
                for attr in [Attr::Str, Attr::Dex, Attr::Con, Attr::Int, Attr::Wis, Attr::Cha] {
                    let raised = game.you.attrs.get(attr) + 1;
                    game.you.attrs.set(attr, raised);
                    let ceil = game.you.attrs_max.get(attr).max(game.you.attrs.get(attr));
                    game.you.attrs_max.set(attr, ceil);
                }
                game.pline_sev(ui, "You feel full of power!", Severity::StatusGood);
            } else {
                let attr = random_attr(game.core());
                let raised = game.you.attrs.get(attr) + 1;
                game.you.attrs.set(attr, raised);
                let ceil = game.you.attrs_max.get(attr).max(game.you.attrs.get(attr));
                game.you.attrs_max.set(attr, ceil);
                let msg = format!("You feel {}!", attr_adjective(attr));
                game.pline_sev(ui, &msg, Severity::StatusGood);
            }
            Ok(EffectFeedback::obvious())
        }
        PotionKind::RestoreAbility => {
            if sign < 0 {
                game.pline(ui, "Ulch!  This makes you feel mediocre!");
                return Ok(EffectFeedback::felt());
            }
            let mut restored = false;
            for attr in [Attr::Str, Attr::Dex, Attr::Con, Attr::Int, Attr::Wis, Attr::Cha] {
                let ceiling = game.you.attrs_max.get(attr);
                if game.you.attrs.get(attr) < ceiling {
                    game.you.attrs.set(attr, ceiling);
                    restored = true;
                }
            }
            if restored {
                game.pline_sev(ui, "Wow!  This makes you feel great!", Severity::StatusGood);
                Ok(EffectFeedback::obvious())
            } else {
                game.pline(ui, "Ahh, a refreshing drink.");
                Ok(EffectFeedback::felt())
            }
        }
        PotionKind::Confusion => {
            let dur = game.core().rn1(7, 16 - 8 * sign) as u16;
            let msg = if game.you.is_confused() {
                "You are even more confused than before."
            } else {
                "Huh, What?  Where am I?"
            };
            game.you.timers.confusion = game.you.timers.confusion.saturating_add(dur);
            game.pline_sev(ui, msg, Severity::StatusBad);
            Ok(EffectFeedback::obvious())
        }
        PotionKind::Blindness => {
            let dur = game.core().rn1(200, 250 - 125 * sign) as u16;
            let msg = if game.you.is_blind() {
                "The darkness around you deepens."
            } else {
                "A cloud of darkness falls upon you."
            };
            game.you.timers.blind = game.you.timers.blind.saturating_add(dur);
            game.pline_sev(ui, msg, Severity::StatusBad);
            ui.request_redraw(Region::Full);
            Ok(EffectFeedback::obvious())
        }
        PotionKind::Paralysis => {
            if game.you.has_free_action() {
                game.pline(ui, "You stiffen momentarily.");
                return Ok(EffectFeedback::obvious());
            }
            let dur = game.core().rn1(10, 25 - 12 * sign) as u16;
            game.you.timers.paralysis = game.you.timers.paralysis.saturating_add(dur);
            game.pline_sev(ui, "Your feet are frozen to the floor!", Severity::StatusBad);
            Ok(EffectFeedback::obvious())
        }
        PotionKind::Sleeping => {
            if game.you.resists_sleep() {
                game.pline(ui, "You yawn.");
                return Ok(EffectFeedback::obvious());
            }
            let dur = game.core().rn1(10, 25 - 12 * sign) as u16;
            game.you.timers.sleep = game.you.timers.sleep.saturating_add(dur);
            game.pline_sev(ui, "You suddenly fall asleep!", Severity::StatusBad);
            Ok(EffectFeedback::obvious())
        }
        PotionKind::Hallucination => {
            let dur = game.core().rn1(200, 600 - 300 * sign) as u16;
            game.you.timers.hallucination = game.you.timers.hallucination.saturating_add(dur);
            game.pline_sev(ui, "Oh wow!  Everything looks so cosmic!", Severity::StatusBad);
            Ok(EffectFeedback::obvious())
        }
        PotionKind::Speed => {
            let msg = if game.you.timers.speed > 0 {
                "Your quickness feels more natural."
            } else {
                "You are suddenly moving much faster."
            };
            let dur = game.core().rn1(10, 100 + 60 * sign) as u16;
            game.you.timers.speed = game.you.timers.speed.saturating_add(dur);
            game.pline_sev(ui, msg, Severity::StatusGood);
            Ok(EffectFeedback::obvious())
        }
        PotionKind::Levitation => {
            let dur = game.core().rn1(140, 10) as u16;
            game.you.timers.levitation = game.you.timers.levitation.saturating_add(dur);
            game.pline(ui, "You start to float in the air!");
            if sign < 0 {
                game.pline_sev(ui, "You hit your head on the ceiling.", Severity::StatusBad);
                game.losehp(1, Killer::by("colliding with the ceiling"), DoneHow::Died)?;
            }
            Ok(EffectFeedback::obvious())
        }
        PotionKind::Invisibility => {
            let dur = game.core().rn1(15, 31) as u16;
            game.you.timers.invisibility = game.you.timers.invisibility.saturating_add(dur);
            if game.you.is_blind() {
                return Ok(EffectFeedback::nothing());
            }
            game.pline(ui, "Gee!  All of a sudden, you can't see yourself.");
            ui.request_redraw(Region::Cell {
                x: game.you.x as i8,
                y: game.you.y as i8,
            });
            Ok(EffectFeedback::obvious())
        }
        PotionKind::SeeInvisible => {
            let dur = game.core().rn1(100, 50) as u16;
            game.you.timers.see_invis = game.you.timers.see_invis.saturating_add(dur);
            if game.you.is_blind() && sign >= 0 {
                game.you.timers.blind = 0;
                game.pline_sev(ui, "You can see again.", Severity::StatusGood);
                return Ok(EffectFeedback::felt());
            }
            Ok(EffectFeedback::nothing())
        }
        PotionKind::ObjectDetection => {
            let spots: Vec<(i32, i32)> = game
                .level
                .objects
                .iter()
                .filter_map(|o| match o.loc {
                    crate::object::ObjLocation::Floor { x, y } => Some((x, y)),
                    _ => None,
                })
                .collect();
            if spots.is_empty() {
                game.pline(ui, "You sense a lack of objects nearby.");
                return Ok(EffectFeedback::obvious());
            }
            for (x, y) in spots {
                if let Some(tile) = game.level.tile_mut(x, y) {
                    tile.seen = true;
                }
            }
            game.pline(ui, "You sense the presence of objects.");
            ui.request_redraw(Region::Full);
            Ok(EffectFeedback::obvious())
        }
        PotionKind::MonsterDetection => {
            if game.level.monsters.is_empty() {
                game.pline(ui, "You feel lonely.");
                return Ok(EffectFeedback::obvious());
            }
            let spots: Vec<(i32, i32)> =
                game.level.monsters.iter().map(|m| (m.x, m.y)).collect();
            for (x, y) in spots {
                if let Some(tile) = game.level.tile_mut(x, y) {
                    tile.seen = true;
                }
            }
            game.pline(ui, "You sense the presence of monsters.");
            ui.request_redraw(Region::Full);
            Ok(EffectFeedback::obvious())
        }
        PotionKind::Acid => {
            let dmg = if game.you.intrinsics.contains(crate::player::Properties::ACID_RES) {
                1
            } else {
                game.core().dice(if sign < 0 { 2 } else { 1 }, 10) as i32
            };
            game.pline_sev(ui, "This burns a lot!", Severity::StatusBad);
            game.losehp(dmg, Killer::by_an("potion of acid"), DoneHow::Died)?;
            Ok(EffectFeedback::obvious())
        }
        PotionKind::Sickness => {
            game.pline_sev(ui, "Yecch!  This stuff tastes like poison.", Severity::StatusBad);
            if game.you.resists_poison() {
                game.pline(ui, "You seem unaffected by it.");
                return Ok(EffectFeedback::felt());
            }
            let cur = game.you.attrs.get(Attr::Str);
            game.you.attrs.set(Attr::Str, cur.saturating_sub(1));
            let dmg = game.core().rnd(10) as i32;
            game.losehp(dmg, Killer::by_an("contaminated potion"), DoneHow::Died)?;
            Ok(EffectFeedback::felt())
        }
        PotionKind::FruitJuice => {
            if sign < 0 {
                game.pline(ui, "Yecch!  This tastes rotten.");
            } else {
                game.pline(ui, "This tastes like fruit juice.");
            }
            Ok(EffectFeedback::obvious())
        }
        PotionKind::Booze => {
            game.pline(ui, "Ooph!  This tastes like liquid fire!");
            let dur = game.core().dice(3, 8) as u16;
            game.you.timers.confusion = game.you.timers.confusion.saturating_add(dur);
            if sign < 0 {
                game.pline_sev(ui, "You pass out.", Severity::StatusBad);
                let nap = game.core().rnd(15) as u16;
                game.you.timers.sleep = game.you.timers.sleep.saturating_add(nap);
            }
            Ok(EffectFeedback::obvious())
        }
        PotionKind::Water => {
            game.pline(ui, "This tastes like water.");
            if sign > 0 {
                game.pline_sev(ui, "You feel full of awe.", Severity::StatusGood);
            }
            // an unholy dose is indistinguishable by taste
            Ok(EffectFeedback {
                perceptible: true,
                learned: sign == 0,
            })
        }
    }
}

/// A thrown flask shatters at `(x, y)`, possibly on a monster's head.
/// The vapors give the monster a muted version of the quaffed effect.
pub fn potionhit(
    game: &mut Game,
    ui: &mut dyn Ui,
    target: Option<MonsterId>,
    obj: &Object,
    x: i32,
    y: i32,
) -> Result<(), EngineSignal> {
    let ObjKind::Potion(kind) = obj.kind else {
        game.impossible(ui, "potionhit with a non-potion");
        return Ok(());
    };
    match target {
        Some(id) => {
            if let Some(mon) = game.level.monster(id) {
                let line = format!(
                    "The flask crashes on {}'s head and shatters.",
                    game.mon_name(mon)
                );
                game.mon_message(ui, mon, Severity::Info, &line, Some("You hear a crash."));
            }
            // the flask itself is a feeble blow
            if game.hurt_mon(ui, id, 1).is_none() {
                vapor_effect(game, ui, id, kind)?;
            }
        }
        None => {
            if game.can_see(x, y) {
                game.pline(ui, "The flask shatters.");
            } else {
                ui.notify("You hear a crash.", Channel::unseen(Severity::Info));
            }
        }
    }
    game.level.wake_nearby(x, y, 25);
    Ok(())
}

fn vapor_effect(
    game: &mut Game,
    ui: &mut dyn Ui,
    id: MonsterId,
    kind: PotionKind,
) -> Result<(), EngineSignal> {
    match kind {
        PotionKind::Healing | PotionKind::ExtraHealing | PotionKind::FullHealing => {
            let heal = match kind {
                PotionKind::Healing => game.core().dice(1, 8) as i32,
                PotionKind::ExtraHealing => game.core().dice(2, 8) as i32,
                _ => 400,
            };
            if let Some(mon) = game.level.monster_mut(id) {
                mon.heal(heal);
            }
            if let Some(mon) = game.level.monster(id) {
                let line = format!("{} looks sound and hale again.",
                    crate::world::context::capitalize(&game.mon_name(mon)));
                game.mon_message(ui, mon, Severity::Info, &line, None);
            }
        }
        PotionKind::Sleeping => {
            let nap = game.core().rnd(12) as u16;
            let mut slept = false;
            if let Some(mon) = game.level.monster_mut(id) {
                if !mon.species.resists_sleep() {
                    mon.timers.sleep = mon.timers.sleep.saturating_add(nap);
                    slept = true;
                }
            }
            if slept {
                if let Some(mon) = game.level.monster(id) {
                    let line = format!("{} falls asleep.",
                        crate::world::context::capitalize(&game.mon_name(mon)));
                    game.mon_message(ui, mon, Severity::ActionOk, &line, None);
                }
            }
        }
        PotionKind::Confusion | PotionKind::Booze => {
            let dur = game.core().rnd(5) as u16;
            if let Some(mon) = game.level.monster_mut(id) {
                mon.timers.confusion = mon.timers.confusion.saturating_add(dur);
            }
            if let Some(mon) = game.level.monster(id) {
                let line = format!("{} looks confused.",
                    crate::world::context::capitalize(&game.mon_name(mon)));
                game.mon_message(ui, mon, Severity::ActionOk, &line, None);
            }
        }
        PotionKind::Blindness => {
            let dur = game.core().rnd(50) as u16;
            if let Some(mon) = game.level.monster_mut(id) {
                mon.timers.blind = mon.timers.blind.saturating_add(dur);
            }
            if let Some(mon) = game.level.monster(id) {
                let line = format!("{} is blinded.",
                    crate::world::context::capitalize(&game.mon_name(mon)));
                game.mon_message(ui, mon, Severity::ActionOk, &line, None);
            }
        }
        PotionKind::Paralysis => {
            let dur = game.core().rnd(5) as u16;
            if let Some(mon) = game.level.monster_mut(id) {
                mon.timers.paralysis = mon.timers.paralysis.saturating_add(dur);
            }
            if let Some(mon) = game.level.monster(id) {
                let line = format!("{} is frozen in place!",
                    crate::world::context::capitalize(&game.mon_name(mon)));
                game.mon_message(ui, mon, Severity::ActionOk, &line, None);
            }
        }
        PotionKind::Acid => {
            let dmg = game.core().dice(1, 10) as i32;
            let burned = game
                .level
                .monster(id)
                .is_some_and(|m| !m.species.flags().contains(
                    crate::monster::SpeciesFlags::ACID_RES,
                ));
            if burned {
                if let Some(mon) = game.level.monster(id) {
                    let line = format!("{} is burned by the acid!",
                        crate::world::context::capitalize(&game.mon_name(mon)));
                    game.mon_message(ui, mon, Severity::ActionOk, &line, None);
                }
                game.hurt_mon(ui, id, dmg);
            }
        }
        PotionKind::Invisibility => {
            if let Some(mon) = game.level.monster(id) {
                let line = format!("Suddenly, {} vanishes!", game.mon_name(mon));
                game.mon_message(ui, mon, Severity::Info, &line, None);
            }
            if let Some(mon) = game.level.monster_mut(id) {
                mon.invisible = true;
            }
        }
        _ => {}
    }
    Ok(())
}

/// A monster drinks a potion it is carrying.
pub fn mquaff(
    game: &mut Game,
    ui: &mut dyn Ui,
    id: MonsterId,
    kind: PotionKind,
    buc: Buc,
) -> Result<(), EngineSignal> {
    let sign = buc.sign();
    match kind {
        PotionKind::Healing | PotionKind::ExtraHealing | PotionKind::FullHealing => {
            let heal = match kind {
                PotionKind::Healing => game.core().dice((6 + 2 * sign) as u32, 4) as i32,
                PotionKind::ExtraHealing => game.core().dice((6 + 2 * sign) as u32, 8) as i32,
                _ => 400,
            };
            if let Some(mon) = game.level.monster_mut(id) {
                mon.heal(heal);
            }
            if let Some(mon) = game.level.monster(id) {
                let line = format!("{} looks better.",
                    crate::world::context::capitalize(&game.mon_name(mon)));
                game.mon_message(ui, mon, Severity::Info, &line, None);
            }
        }
        PotionKind::Speed => {
            let dur = game.core().rn1(10, 10) as u16;
            if let Some(mon) = game.level.monster_mut(id) {
                mon.timers.speed = mon.timers.speed.saturating_add(dur);
            }
            if let Some(mon) = game.level.monster(id) {
                let line = format!("{} is suddenly moving faster.",
                    crate::world::context::capitalize(&game.mon_name(mon)));
                game.mon_message(ui, mon, Severity::Info, &line, None);
            }
        }
        PotionKind::Invisibility => {
            if let Some(mon) = game.level.monster(id) {
                let line = format!("Suddenly, {} vanishes!", game.mon_name(mon));
                game.mon_message(ui, mon, Severity::Info, &line, None);
            }
            if let Some(mon) = game.level.monster_mut(id) {
                mon.invisible = true;
            }
        }
        PotionKind::Confusion => {
            let dur = game.core().rn1(7, 16 - 8 * sign) as u16;
            if let Some(mon) = game.level.monster_mut(id) {
                mon.timers.confusion = mon.timers.confusion.saturating_add(dur);
            }
            if let Some(mon) = game.level.monster(id) {
                let line = format!("{} staggers about.",
                    crate::world::context::capitalize(&game.mon_name(mon)));
                game.mon_message(ui, mon, Severity::Info, &line, None);
            }
        }
        PotionKind::Blindness => {
            let dur = game.core().rn1(200, 250 - 125 * sign) as u16;
            if let Some(mon) = game.level.monster_mut(id) {
                mon.timers.blind = mon.timers.blind.saturating_add(dur);
            }
        }
        PotionKind::Paralysis => {
            let dur = game.core().rn1(10, 25 - 12 * sign) as u16;
            if let Some(mon) = game.level.monster_mut(id) {
                mon.timers.paralysis = mon.timers.paralysis.saturating_add(dur);
            }
            if let Some(mon) = game.level.monster(id) {
                let line = format!("{} is frozen in place!",
                    crate::world::context::capitalize(&game.mon_name(mon)));
                game.mon_message(ui, mon, Severity::Info, &line, None);
            }
        }
        PotionKind::Sleeping => {
            let resists = game
                .level
                .monster(id)
                .is_some_and(|m| m.species.resists_sleep());
            if !resists {
                let dur = game.core().rn1(10, 25 - 12 * sign) as u16;
                if let Some(mon) = game.level.monster_mut(id) {
                    mon.timers.sleep = mon.timers.sleep.saturating_add(dur);
                }
                if let Some(mon) = game.level.monster(id) {
                    let line = format!("{} falls asleep.",
                        crate::world::context::capitalize(&game.mon_name(mon)));
                    game.mon_message(ui, mon, Severity::Info, &line, None);
                }
            }
        }
        PotionKind::Acid => {
            let resists = game.level.monster(id).is_some_and(|m| {
                m.species.flags().contains(crate::monster::SpeciesFlags::ACID_RES)
            });
            if !resists {
                let dmg = game.core().dice(if sign < 0 { 2 } else { 1 }, 10) as i32;
                if let Some(mon) = game.level.monster(id) {
                    let line = format!("{} shrieks in pain!",
                        crate::world::context::capitalize(&game.mon_name(mon)));
                    game.mon_message(ui, mon, Severity::ActionOk, &line, None);
                }
                game.hurt_mon(ui, id, dmg);
            }
        }
        // the remaining kinds do nothing a monster's body registers
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Actor;
    use crate::dungeon::cell::Terrain;
    use crate::dungeon::level::Level;
    use crate::monster::{Monster, Species};
    use crate::object::{mksobj, ObjectId};
    use crate::player::Properties;
    use crate::ui::ScriptedUi;

    fn flat_level() -> Level {
        let mut level = Level::new(1);
        for x in 1..30 {
            for y in 1..15 {
                level.set_terrain(x, y, Terrain::Room);
                if let Some(t) = level.tile_mut(x, y) {
                    t.lit = true;
                }
            }
        }
        level
    }

    fn game_on_flat(seed: u64) -> Game {
        let mut game = Game::new(seed);
        game.level = flat_level();
        game.you.x = 5;
        game.you.y = 5;
        game
    }

    fn potion(kind: PotionKind, buc: Buc, quan: u32, id: u32) -> Object {
        let mut rng = GameRng::new(1);
        let mut obj = mksobj(ObjKind::Potion(kind), false, &mut rng, ObjectId(id));
        obj.buc = buc;
        obj.quan = quan;
        obj
    }

    fn quaff(game: &mut Game, ui: &mut ScriptedUi, obj: Object) -> ActionOutcome {
        let id = game.you.add_to_inventory(obj);
        let req = ActionRequest {
            actor: Actor::Player,
            item: id,
            target: None,
            dir: None,
            limit: None,
        };
        dopotion(game, ui, req).unwrap()
    }

    #[test]
    fn test_cursed_healing_never_overheals() {
        let mut game = game_on_flat(3);
        let mut ui = ScriptedUi::new();
        game.you.hp = game.you.hpmax;
        let max0 = game.you.hpmax;
        quaff(&mut game, &mut ui, potion(PotionKind::Healing, Buc::Cursed, 1, 90));
        assert_eq!(game.you.hp, max0);
        assert_eq!(game.you.hpmax, max0);
        assert!(ui.saw("You feel better."));
    }

    #[test]
    fn test_blessed_healing_grows_ceiling_on_overflow() {
        let mut game = game_on_flat(3);
        let mut ui = ScriptedUi::new();
        game.you.hp = game.you.hpmax;
        let max0 = game.you.hpmax;
        quaff(&mut game, &mut ui, potion(PotionKind::Healing, Buc::Blessed, 1, 90));
        assert_eq!(game.you.hpmax, max0 + 1);
        assert_eq!(game.you.hp, game.you.hpmax);
    }

    #[test]
    fn test_healing_below_max_leaves_ceiling_alone() {
        let mut game = game_on_flat(3);
        let mut ui = ScriptedUi::new();
        game.you.hpmax = 100;
        game.you.hp = 10;
        quaff(&mut game, &mut ui, potion(PotionKind::Healing, Buc::Blessed, 1, 90));
        assert_eq!(game.you.hpmax, 100);
        // blessed healing rolls 8d4
        assert!(game.you.hp >= 18 && game.you.hp <= 42);
    }

    #[test]
    fn test_full_healing_gain_by_tier() {
        for (buc, gain) in [(Buc::Blessed, 8), (Buc::Uncursed, 4), (Buc::Cursed, 0)] {
            let mut game = game_on_flat(3);
            let mut ui = ScriptedUi::new();
            game.you.hp = 1;
            let max0 = game.you.hpmax;
            quaff(&mut game, &mut ui, potion(PotionKind::FullHealing, buc, 1, 90));
            assert_eq!(game.you.hpmax, max0 + gain);
            assert_eq!(game.you.hp, game.you.hpmax);
        }
    }

    #[test]
    fn test_confusion_duration_scales_with_curse() {
        let mut game = game_on_flat(3);
        let mut ui = ScriptedUi::new();
        quaff(&mut game, &mut ui, potion(PotionKind::Confusion, Buc::Blessed, 1, 90));
        let blessed = game.you.timers.confusion;
        assert!((8..=14).contains(&blessed), "blessed duration {blessed}");

        let mut game = game_on_flat(3);
        quaff(&mut game, &mut ui, potion(PotionKind::Confusion, Buc::Cursed, 1, 91));
        let cursed = game.you.timers.confusion;
        assert!((24..=30).contains(&cursed), "cursed duration {cursed}");
    }

    #[test]
    fn test_sleep_resistance_yawns() {
        let mut game = game_on_flat(3);
        let mut ui = ScriptedUi::new();
        game.you.intrinsics |= Properties::SLEEP_RES;
        quaff(&mut game, &mut ui, potion(PotionKind::Sleeping, Buc::Uncursed, 1, 90));
        assert_eq!(game.you.timers.sleep, 0);
        assert!(ui.saw("You yawn."));
    }

    #[test]
    fn test_free_action_shrugs_off_paralysis() {
        let mut game = game_on_flat(3);
        let mut ui = ScriptedUi::new();
        game.you.intrinsics |= Properties::FREE_ACTION;
        quaff(&mut game, &mut ui, potion(PotionKind::Paralysis, Buc::Uncursed, 1, 90));
        assert_eq!(game.you.timers.paralysis, 0);
        assert!(ui.saw("stiffen momentarily"));
    }

    #[test]
    fn test_imperceptible_effect_feels_peculiar() {
        let mut game = game_on_flat(3);
        let mut ui = ScriptedUi::new();
        quaff(&mut game, &mut ui, potion(PotionKind::SeeInvisible, Buc::Uncursed, 2, 90));
        assert!(game.you.timers.see_invis >= 50);
        assert!(ui.saw("peculiar feeling"));
        // nothing perceptible, so the remaining dose stays unidentified
        let left = game.you.inventory.iter().find(|o| o.quan == 1);
        assert!(!left.is_some_and(|o| o.known));
    }

    #[test]
    fn test_quaffing_consumes_one_dose() {
        let mut game = game_on_flat(3);
        let mut ui = ScriptedUi::new();
        quaff(&mut game, &mut ui, potion(PotionKind::FruitJuice, Buc::Uncursed, 3, 90));
        assert_eq!(game.you.inventory.len(), 1);
        assert_eq!(game.you.inventory[0].quan, 2);
        // the taste gave it away
        assert!(game.you.inventory[0].known);
    }

    #[test]
    fn test_cursed_gain_level_rises_through_ceiling() {
        let mut game = game_on_flat(3);
        let mut ui = ScriptedUi::new();
        game.level.depth = 5;
        quaff(&mut game, &mut ui, potion(PotionKind::GainLevel, Buc::Cursed, 1, 90));
        assert_eq!(game.pending_level, Some(4));
        assert!(ui.saw("rise up, through the ceiling"));
        assert_eq!(game.you.level, 1);
    }

    #[test]
    fn test_acid_death_names_the_potion() {
        let mut game = game_on_flat(3);
        let mut ui = ScriptedUi::new();
        game.you.hp = 1;
        let id = game.you.add_to_inventory(potion(PotionKind::Acid, Buc::Cursed, 1, 90));
        let req = ActionRequest {
            actor: Actor::Player,
            item: id,
            target: None,
            dir: None,
            limit: None,
        };
        let err = dopotion(&mut game, &mut ui, req).unwrap_err();
        let EngineSignal::GameOver(ending) = err;
        assert_eq!(ending.killer.describe(), "killed by a potion of acid");
    }

    #[test]
    fn test_shattered_blindness_flask_blinds_monster() {
        let mut game = game_on_flat(3);
        let mut ui = ScriptedUi::new();
        let id = game.level.new_monster_id();
        game.level.monsters.push(Monster::new(id, Species::Wolf, 8, 5, 20, 5));
        let flask = potion(PotionKind::Blindness, Buc::Uncursed, 1, 90);
        potionhit(&mut game, &mut ui, Some(id), &flask, 8, 5).unwrap();
        assert!(ui.saw("crashes on the wolf's head"));
        let mon = game.level.monster(id).unwrap();
        assert!(mon.timers.blind > 0);
        assert_eq!(mon.hp, 19);
    }

    #[test]
    fn test_shatter_out_of_sight_is_just_a_crash() {
        let mut game = game_on_flat(3);
        let mut ui = ScriptedUi::new();
        game.you.timers.blind = 10;
        let flask = potion(PotionKind::Healing, Buc::Uncursed, 1, 90);
        potionhit(&mut game, &mut ui, None, &flask, 20, 10).unwrap();
        assert!(ui.saw("You hear a crash."));
    }

    #[test]
    fn test_monster_quaffs_healing() {
        let mut game = game_on_flat(3);
        let mut ui = ScriptedUi::new();
        let id = game.level.new_monster_id();
        let mut mon = Monster::new(id, Species::Ogre, 8, 5, 30, 5);
        mon.hp = 5;
        game.level.monsters.push(mon);
        mquaff(&mut game, &mut ui, id, PotionKind::Healing, Buc::Uncursed).unwrap();
        let mon = game.level.monster(id).unwrap();
        assert!(mon.hp > 5);
        assert!(ui.saw("The ogre looks better."));
    }

    #[test]
    fn test_vapor_sleep_skips_resistant_species() {
        let mut game = game_on_flat(3);
        let mut ui = ScriptedUi::new();
        let id = game.level.new_monster_id();
        game.level.monsters.push(Monster::new(id, Species::HumanZombie, 8, 5, 20, 2));
        let flask = potion(PotionKind::Sleeping, Buc::Uncursed, 1, 90);
        potionhit(&mut game, &mut ui, Some(id), &flask, 8, 5).unwrap();
        assert_eq!(game.level.monster(id).unwrap().timers.sleep, 0);
    }
}
