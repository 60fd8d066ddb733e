use rand::Rng;
use serde::{Deserialize, Serialize};

use skirmish_core::events::{BurstKind, GameEvent};
use skirmish_core::game_trait::PlayerId;

use crate::collision::{Rect, rects_overlap};
use crate::fighter::FighterState;
use crate::outbox::TickOutbox;
use crate::rng::roll;
use crate::stage::Stage;
use crate::status::StatusKind;

/// How far past the side edges a projectile may travel before it is discarded.
const SIDE_MARGIN: f32 = 50.0;
const HITSTUN: f32 = 0.15;

/// Projectile categories. Each kind fixes size, damage, knockback and lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectileKind {
    Fireball,
    Lightning,
    Ultimate,
    Hazard,
}

/// Fixed per-kind parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileSpec {
    pub w: f32,
    pub h: f32,
    pub damage: f32,
    pub knockback: f32,
    pub life: f32,
    pub gravity: bool,
    pub color: &'static str,
}

impl ProjectileKind {
    pub fn spec(self) -> ProjectileSpec {
        match self {
            ProjectileKind::Fireball => ProjectileSpec {
                w: 18.0,
                h: 18.0,
                damage: 8.0,
                knockback: 260.0,
                life: 2.5,
                gravity: true,
                color: "#ff5555",
            },
            ProjectileKind::Lightning => ProjectileSpec {
                w: 12.0,
                h: 40.0,
                damage: 10.0,
                knockback: 200.0,
                life: 0.3,
                gravity: false,
                color: "#ffff55",
            },
            ProjectileKind::Ultimate => ProjectileSpec {
                w: 40.0,
                h: 40.0,
                damage: 25.0,
                knockback: 500.0,
                life: 1.8,
                gravity: true,
                color: "#ff00ff",
            },
            ProjectileKind::Hazard => ProjectileSpec {
                w: 24.0,
                h: 24.0,
                damage: 6.0,
                knockback: 220.0,
                life: 4.0,
                gravity: true,
                color: "#ff9933",
            },
        }
    }

    /// Ultimate-class projectiles ignore shields.
    pub fn pierces_shield(self) -> bool {
        self == ProjectileKind::Ultimate
    }

    fn launch_y(self) -> f32 {
        if self == ProjectileKind::Ultimate {
            -400.0
        } else {
            -260.0
        }
    }

    fn invulnerability(self) -> f32 {
        if self == ProjectileKind::Ultimate { 0.3 } else { 0.1 }
    }

    fn shake(self) -> f32 {
        if self == ProjectileKind::Ultimate { 12.0 } else { 6.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub kind: ProjectileKind,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub w: f32,
    pub h: f32,
    /// `None` for environment hazards, which can hit either fighter.
    pub owner: Option<PlayerId>,
    pub damage: f32,
    pub knockback: f32,
    /// Vertical launch applied on hit.
    pub lift: f32,
    pub life: f32,
    /// Knockback direction used when the projectile has no horizontal speed.
    pub facing: f32,
}

impl Projectile {
    pub fn new(
        kind: ProjectileKind,
        x: f32,
        y: f32,
        vx: f32,
        vy: f32,
        owner: Option<PlayerId>,
    ) -> Self {
        let spec = kind.spec();
        Self {
            kind,
            x,
            y,
            vx,
            vy: if spec.gravity { vy } else { 0.0 },
            w: spec.w,
            h: spec.h,
            owner,
            damage: spec.damage,
            knockback: spec.knockback,
            lift: kind.launch_y(),
            life: spec.life,
            facing: if vx < 0.0 { -1.0 } else { 1.0 },
        }
    }

    /// Scale damage by the firing fighter's power stat.
    pub fn with_power(mut self, power: f32) -> Self {
        self.damage *= power;
        self
    }

    /// Replace the per-kind hit tuning.
    pub fn with_impact(mut self, damage: f32, knockback: f32, lift: f32) -> Self {
        self.damage = damage;
        self.knockback = knockback;
        self.lift = lift;
        self
    }

    pub fn with_facing(mut self, facing: f32) -> Self {
        self.facing = if facing < 0.0 { -1.0 } else { 1.0 };
        self
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    pub fn is_live(&self) -> bool {
        self.life > 0.0
    }

    pub fn color(&self) -> &'static str {
        self.kind.spec().color
    }

    /// Move one step and age. Leaving the playfield ends the projectile.
    pub fn advance(&mut self, dt: f32, gravity: f32, stage: &Stage) {
        if self.kind.spec().gravity {
            self.vy += gravity * dt;
        }
        self.x += self.vx * dt;
        self.y += self.vy * dt;
        self.life -= dt;
        if self.y > stage.height || self.x < -SIDE_MARGIN || self.x > stage.width + SIDE_MARGIN {
            self.life = 0.0;
        }
    }

    fn push_direction(&self) -> f32 {
        if self.vx != 0.0 {
            self.vx.signum()
        } else {
            self.facing
        }
    }

    /// Test against both fighters and apply at most one hit.
    pub fn resolve_hits(&mut self, fighters: &mut [FighterState; 2], out: &mut TickOutbox) {
        if !self.is_live() {
            return;
        }
        for target in fighters.iter_mut() {
            if self.owner == Some(target.id) || !target.is_hittable() {
                continue;
            }
            if !rects_overlap(&self.rect(), &target.rect()) {
                continue;
            }
            self.life = 0.0;
            let (cx, cy) = target.center();

            if target.statuses.has(StatusKind::Shield) && !self.kind.pierces_shield() {
                target.statuses.consume(StatusKind::Shield, 1.0);
                out.burst(BurstKind::Shield, cx, cy);
                return;
            }

            let knockback = (self.push_direction() * self.knockback, self.lift);
            target.hurt(self.damage, knockback);
            target.invulnerable = self.kind.invulnerability();
            target.hitstun = HITSTUN;
            out.event(GameEvent::Hit {
                attacker: self.owner,
                defender: target.id,
                damage: self.damage,
                knockback,
            });
            out.burst(BurstKind::Hit, cx, cy);
            out.shake(self.kind.shake());
            return;
        }
    }
}

/// Drops hazard projectiles from the top of the stage on a fixed interval.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HazardGenerator {
    pub timer: f32,
}

impl HazardGenerator {
    pub fn tick(
        &mut self,
        dt: f32,
        interval: f32,
        rng_state: &mut u64,
        stage: &Stage,
    ) -> Option<Projectile> {
        self.timer += dt;
        if self.timer < interval {
            return None;
        }
        self.timer -= interval;
        let spec = ProjectileKind::Hazard.spec();
        let span = stage.width - spec.w;
        let x = if span > 0.0 {
            roll(rng_state, |rng| rng.random_range(0.0..span))
        } else {
            0.0
        };
        Some(Projectile::new(
            ProjectileKind::Hazard,
            x,
            -spec.h,
            0.0,
            0.0,
            None,
        ))
    }
}
