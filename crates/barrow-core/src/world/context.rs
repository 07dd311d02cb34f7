//! The per-session game context.
//!
//! Everything that used to be ambient state lives here and is passed by
//! `&mut` into every resolver entry point: the player, the current
//! level, the species census, and the random streams. Nothing in the
//! engine touches a global.

use serde::{Deserialize, Serialize};

use barrow_rng::{GameRng, RngPool, Stream};

use crate::dungeon::level::{distmin, Level};
use crate::monster::{mondead, Monster, MonsterId, Species, VitalsRegistry};
use crate::player::You;
use crate::ui::{Channel, Region, Severity, Ui, Witness};
use crate::world::errors::{DoneHow, Ending, EngineSignal, Killer};

/// One game session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub you: You,
    pub level: Level,
    pub vitals: VitalsRegistry,
    pub rng: RngPool,
    pub turn: u64,
    /// Set when a slow death (sickness, delayed stoning) is underway,
    /// so the eventual death line names the original cause.
    pub delayed_killer: Option<Killer>,
    /// A trap or effect asked to move the player to another depth.
    /// Level migration itself is the host's job.
    pub pending_level: Option<u32>,
    /// Invariant-violation log. Never fatal; read by tests and debug UIs.
    diagnostics: Vec<String>,
}

impl Game {
    pub fn new(seed: u64) -> Game {
        Game {
            you: You::default(),
            level: Level::new(1),
            vitals: VitalsRegistry::new(),
            rng: RngPool::new(seed),
            turn: 0,
            delayed_killer: None,
            pending_level: None,
            diagnostics: Vec::new(),
        }
    }

    /// The gameplay stream.
    pub fn core(&mut self) -> &mut GameRng {
        self.rng.core()
    }

    pub fn stream(&mut self, id: Stream) -> &mut GameRng {
        self.rng.stream(id)
    }

    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    /// A should-never-happen state. Log it, tell debug listeners, and
    /// let the caller degrade to a no-op. Never aborts.
    pub fn impossible(&mut self, ui: &mut dyn Ui, msg: &str) {
        self.diagnostics.push(msg.to_string());
        ui.notify(msg, Channel::debug());
    }

    /// Message about something the player did or felt.
    pub fn pline(&self, ui: &mut dyn Ui, msg: &str) {
        ui.notify(msg, Channel::player(Severity::Info));
    }

    pub fn pline_sev(&self, ui: &mut dyn Ui, msg: &str, severity: Severity) {
        ui.notify(msg, Channel::player(severity));
    }

    /// Can the player currently see the cell? Adjacent cells are felt
    /// even in the dark; farther ones need light and a clear line.
    pub fn can_see(&self, x: i32, y: i32) -> bool {
        if self.you.is_blind() {
            return false;
        }
        if distmin(self.you.x, self.you.y, x, y) <= 1 {
            return true;
        }
        let lit = self.level.tile(x, y).is_some_and(|t| t.lit);
        lit && self.level.has_line_of_sight(self.you.x, self.you.y, x, y)
    }

    /// Can the player see this monster itself (not just its cell)?
    pub fn can_see_mon(&self, mon: &Monster) -> bool {
        self.can_see(mon.x, mon.y)
            && (!mon.invisible
                || self.you.timers.see_invis > 0
                || self.you.intrinsics.contains(crate::player::Properties::SEE_INVIS))
    }

    /// Which witness tier a message about this monster belongs on.
    pub fn witness(&self, mon: &Monster) -> Witness {
        if self.can_see_mon(mon) {
            Witness::Seen
        } else {
            Witness::Unseen
        }
    }

    /// Message about a monster, phrased for whoever can witness it.
    /// `unseen` of `None` means out-of-sight events pass silently.
    pub fn mon_message(
        &self,
        ui: &mut dyn Ui,
        mon: &Monster,
        severity: Severity,
        seen: &str,
        unseen: Option<&str>,
    ) {
        match self.witness(mon) {
            Witness::Seen => ui.notify(seen, Channel::seen(severity)),
            _ => {
                if let Some(msg) = unseen {
                    ui.notify(msg, Channel::unseen(severity));
                }
            }
        }
    }

    /// "The jackal" / "it", by visibility.
    pub fn mon_name(&self, mon: &Monster) -> String {
        if self.can_see_mon(mon) {
            format!("the {}", mon.name())
        } else {
            "it".to_string()
        }
    }

    /// Build the one ending every fatal path routes through.
    pub fn done(&mut self, how: DoneHow, killer: Killer) -> EngineSignal {
        let killer = self.delayed_killer.take().unwrap_or(killer);
        EngineSignal::GameOver(Ending { how, killer })
    }

    /// Player takes damage; death unwinds through the single ending
    /// path with the tagged killer.
    pub fn losehp(
        &mut self,
        dmg: i32,
        killer: Killer,
        how: DoneHow,
    ) -> Result<(), EngineSignal> {
        self.you.take_damage(dmg);
        if self.you.hp <= 0 {
            return Err(self.done(how, killer));
        }
        Ok(())
    }

    /// Damage a monster; on death, remove it synchronously and report.
    /// Returns the species if the monster died.
    pub fn hurt_mon(
        &mut self,
        ui: &mut dyn Ui,
        id: MonsterId,
        dmg: i32,
    ) -> Option<Species> {
        {
            let mon = self.level.monster_mut(id)?;
            mon.take_damage(dmg);
            mon.provoke();
            mon.wake();
            if mon.is_alive() {
                return None;
            }
        }
        let (x, y, seen_msg, witness) = {
            let mon = self.level.monster(id)?;
            (
                mon.x,
                mon.y,
                format!("{} is killed!", capitalize(&self.mon_name(mon))),
                self.witness(mon),
            )
        };
        match witness {
            Witness::Seen => ui.notify(&seen_msg, Channel::seen(Severity::ActionOk)),
            _ => ui.notify("You hear a death rattle.", Channel::unseen(Severity::Info)),
        }
        let species = mondead(&mut self.level, id, &mut self.vitals, self.rng.core());
        ui.request_redraw(Region::Cell {
            x: x as i8,
            y: y as i8,
        });
        species
    }
}

pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::ScriptedUi;

    #[test]
    fn test_impossible_records_and_notifies() {
        let mut game = Game::new(1);
        let mut ui = ScriptedUi::new();
        game.impossible(&mut ui, "jackal tried to read a scroll");
        assert_eq!(game.diagnostics().len(), 1);
        assert!(ui.saw("jackal tried to read"));
        assert_eq!(ui.messages[0].1.severity, Severity::Debug);
    }

    #[test]
    fn test_losehp_survivable() {
        let mut game = Game::new(1);
        game.you.hp = 10;
        assert!(game
            .losehp(4, Killer::by_an("dart"), DoneHow::Died)
            .is_ok());
        assert_eq!(game.you.hp, 6);
    }

    #[test]
    fn test_losehp_fatal_routes_through_ending() {
        let mut game = Game::new(1);
        game.you.hp = 3;
        let err = game
            .losehp(5, Killer::by_an("arrow"), DoneHow::Died)
            .unwrap_err();
        let EngineSignal::GameOver(ending) = err;
        assert_eq!(ending.killer.describe(), "killed by an arrow");
    }

    #[test]
    fn test_delayed_killer_wins() {
        let mut game = Game::new(1);
        game.delayed_killer = Some(Killer::plain("petrified by a cockatrice"));
        game.you.hp = 1;
        let err = game
            .losehp(2, Killer::by_an("bear trap"), DoneHow::Died)
            .unwrap_err();
        let EngineSignal::GameOver(ending) = err;
        assert_eq!(ending.killer.describe(), "petrified by a cockatrice");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("the jackal"), "The jackal");
        assert_eq!(capitalize(""), "");
    }
}
