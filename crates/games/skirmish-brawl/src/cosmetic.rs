use serde::{Deserialize, Serialize};

use skirmish_core::effect::{ActiveEffect, EffectKind};
use skirmish_core::events::{BurstKind, GameEvent};

/// Minimum time a screen shake lasts once requested.
const SHAKE_TIME: f32 = 0.12;

/// Short-lived overlays the renderer draws on top of the stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CosmeticKind {
    HitSpark,
    Lightning,
    MuzzleFlash,
    ScreenFlash,
}

impl EffectKind for CosmeticKind {
    fn duration(&self) -> f32 {
        match self {
            CosmeticKind::HitSpark => 0.15,
            CosmeticKind::Lightning => 0.3,
            CosmeticKind::MuzzleFlash => 0.1,
            CosmeticKind::ScreenFlash => 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cosmetic {
    pub effect: ActiveEffect<CosmeticKind>,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenShake {
    pub time: f32,
    pub magnitude: f32,
}

/// Cosmetic state derived from tick events. Never read by the simulation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cosmetics {
    pub overlays: Vec<Cosmetic>,
    pub shake: ScreenShake,
}

impl Cosmetics {
    /// Turn the events of one tick into overlays and shake.
    pub fn record(&mut self, events: &[GameEvent]) {
        for event in events {
            match *event {
                GameEvent::ParticleBurst { kind, x, y } => match kind {
                    BurstKind::Hit => self.push(CosmeticKind::HitSpark, x, y),
                    BurstKind::MuzzleFlash => self.push(CosmeticKind::MuzzleFlash, x, y),
                    BurstKind::Lightning => {
                        self.push(CosmeticKind::Lightning, x, y);
                        self.push(CosmeticKind::ScreenFlash, 0.0, 0.0);
                    },
                    _ => {},
                },
                GameEvent::ScreenShake { magnitude } => {
                    self.shake.time = self.shake.time.max(SHAKE_TIME);
                    self.shake.magnitude = self.shake.magnitude.max(magnitude);
                },
                _ => {},
            }
        }
    }

    fn push(&mut self, kind: CosmeticKind, x: f32, y: f32) {
        self.overlays.push(Cosmetic {
            effect: ActiveEffect::new(kind),
            x,
            y,
        });
    }

    pub fn tick(&mut self, dt: f32) {
        for overlay in &mut self.overlays {
            overlay.effect.tick(dt);
        }
        self.overlays.retain(|o| !o.effect.is_expired());
        self.shake.time = (self.shake.time - dt).max(0.0);
        if self.shake.time <= 0.0 {
            self.shake.magnitude = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lightning_adds_screen_flash() {
        let mut c = Cosmetics::default();
        c.record(&[GameEvent::ParticleBurst {
            kind: BurstKind::Lightning,
            x: 10.0,
            y: 20.0,
        }]);
        let kinds: Vec<_> = c.overlays.iter().map(|o| o.effect.kind).collect();
        assert_eq!(kinds, vec![CosmeticKind::Lightning, CosmeticKind::ScreenFlash]);

        c.tick(0.2);
        assert_eq!(c.overlays.len(), 1);
        c.tick(0.2);
        assert!(c.overlays.is_empty());
    }

    #[test]
    fn shake_keeps_strongest() {
        let mut c = Cosmetics::default();
        c.record(&[
            GameEvent::ScreenShake { magnitude: 7.0 },
            GameEvent::ScreenShake { magnitude: 3.0 },
        ]);
        assert_eq!(c.shake.magnitude, 7.0);
        assert_eq!(c.shake.time, SHAKE_TIME);
        c.tick(0.2);
        assert_eq!(c.shake, ScreenShake::default());
    }

    #[test]
    fn other_bursts_are_ignored() {
        let mut c = Cosmetics::default();
        c.record(&[GameEvent::ParticleBurst {
            kind: BurstKind::Jump,
            x: 0.0,
            y: 0.0,
        }]);
        assert!(c.overlays.is_empty());
    }
}
