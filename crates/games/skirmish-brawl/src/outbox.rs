use skirmish_core::events::{BurstKind, GameEvent};

use crate::abilities::GravityWell;
use crate::projectile::Projectile;
use crate::schedule::ScheduledAction;

/// A sub-effect requested during a tick, to run `delay` seconds later.
#[derive(Debug, Clone, PartialEq)]
pub struct DeferredAction {
    pub delay: f32,
    /// Slot of the fighter that caused it.
    pub source: usize,
    /// The source fighter's life generation at the time of the request.
    pub life: u32,
    pub action: ScheduledAction,
}

/// Everything fighters and abilities produce during one tick.
///
/// Fighters never touch the match-owned collections directly; the controller
/// drains the outbox after both fighters have updated.
#[derive(Debug, Default)]
pub struct TickOutbox {
    pub events: Vec<GameEvent>,
    pub projectiles: Vec<Projectile>,
    pub deferred: Vec<DeferredAction>,
    pub wells: Vec<GravityWell>,
}

impl TickOutbox {
    pub fn event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn burst(&mut self, kind: BurstKind, x: f32, y: f32) {
        self.events.push(GameEvent::ParticleBurst { kind, x, y });
    }

    pub fn shake(&mut self, magnitude: f32) {
        self.events.push(GameEvent::ScreenShake { magnitude });
    }

    pub fn spawn(&mut self, projectile: Projectile) {
        self.projectiles.push(projectile);
    }

    pub fn defer(&mut self, delay: f32, source: usize, life: u32, action: ScheduledAction) {
        self.deferred.push(DeferredAction {
            delay,
            source,
            life,
            action,
        });
    }

    pub fn well(&mut self, well: GravityWell) {
        self.wells.push(well);
    }
}
