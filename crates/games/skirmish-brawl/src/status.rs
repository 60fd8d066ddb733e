use serde::{Deserialize, Serialize};

use skirmish_core::effect::{ActiveEffect, EffectKind};

/// Timed status effects a fighter can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    /// Absorbs hits; each absorbed hit spends 1.0 of the remaining time.
    Shield,
    /// Reflects the next melee hit back onto the attacker.
    Counter,
    /// Movement slowed to a crawl and horizontal input ignored.
    Frozen,
    /// Faster movement and harder hits.
    Berserker,
    /// Doubled movement speed.
    TimeBoost,
    /// Melee hits deal more damage and charge the ultimate faster.
    DashAttack,
    /// Falling slam; landing releases a shockwave.
    Slam,
    /// Ultimate dash; contact with the opponent launches them.
    Blitz,
}

impl EffectKind for StatusKind {
    fn duration(&self) -> f32 {
        match self {
            StatusKind::Shield => 3.0,
            StatusKind::Counter => 2.0,
            StatusKind::Frozen => 2.0,
            StatusKind::Berserker => 5.0,
            StatusKind::TimeBoost => 3.0,
            StatusKind::DashAttack => 0.5,
            StatusKind::Slam => 1.5,
            StatusKind::Blitz => 1.0,
        }
    }
}

pub type StatusEffect = ActiveEffect<StatusKind>;

/// The set of active statuses on one fighter. At most one entry per kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusSet {
    effects: Vec<StatusEffect>,
}

impl StatusSet {
    /// Apply `kind` for its default duration.
    pub fn apply(&mut self, kind: StatusKind) {
        self.apply_for(kind, kind.duration());
    }

    /// Apply `kind` for `secs`. An active effect keeps whichever remaining time is larger.
    pub fn apply_for(&mut self, kind: StatusKind, secs: f32) {
        if secs <= 0.0 {
            return;
        }
        match self.effects.iter_mut().find(|e| e.kind == kind) {
            Some(existing) => existing.remaining = existing.remaining.max(secs),
            None => self.effects.push(ActiveEffect::with_remaining(kind, secs)),
        }
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind && !e.is_expired())
    }

    pub fn remaining(&self, kind: StatusKind) -> f32 {
        self.effects
            .iter()
            .find(|e| e.kind == kind)
            .map_or(0.0, |e| e.remaining)
    }

    /// Spend `amount` of an effect's budget, dropping it once exhausted.
    pub fn consume(&mut self, kind: StatusKind, amount: f32) {
        if let Some(e) = self.effects.iter_mut().find(|e| e.kind == kind) {
            e.consume(amount);
        }
        self.effects.retain(|e| !e.is_expired());
    }

    pub fn remove(&mut self, kind: StatusKind) {
        self.effects.retain(|e| e.kind != kind);
    }

    pub fn tick(&mut self, dt: f32) {
        for e in &mut self.effects {
            e.tick(dt);
        }
        self.effects.retain(|e| !e.is_expired());
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    /// Movement multiplier contributed by statuses.
    pub fn speed_multiplier(&self) -> f32 {
        let mut mult = 1.0;
        if self.has(StatusKind::Berserker) {
            mult *= 1.5;
        }
        if self.has(StatusKind::Frozen) {
            mult *= 0.1;
        }
        if self.has(StatusKind::TimeBoost) {
            mult *= 2.0;
        }
        mult
    }
}
