//! Special and ultimate ability catalog.
//!
//! Every ability is a plain function over an [`AbilityContext`]. Abilities
//! mutate the two fighters directly and hand anything that outlives the tick
//! (projectiles, wells, delayed steps) to the [`TickOutbox`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use skirmish_core::events::{BurstKind, GameEvent};
use skirmish_core::game_trait::PlayerId;

use crate::collision::rects_overlap;
use crate::combat::{self, AttackDirection};
use crate::config::BrawlConfig;
use crate::fighter::FighterState;
use crate::input::Control;
use crate::outbox::TickOutbox;
use crate::projectile::{Projectile, ProjectileKind};
use crate::schedule::{ScheduledAction, ScheduledEntry};
use crate::stage::Stage;
use crate::status::StatusKind;

const ATTACK_COOLDOWN: f32 = 0.25;
const SPECIAL_LOCKOUT: f32 = 0.3;
const SPECIAL_COOLDOWN: f32 = 0.8;
const ULTIMATE_COOLDOWN: f32 = 3.0;

const FIREBALL_SPEED: f32 = 500.0;
const BOLT_DAMAGE: f32 = 12.0;
const BOLT_KNOCKBACK: (f32, f32) = (300.0, -200.0);
const TELEPORT_BEHIND: f32 = 60.0;
const TELEPORT_STEP: f32 = 150.0;
const TELEPORT_INVULNERABILITY: f32 = 0.3;
const COMBO_HITS: u8 = 3;
const COMBO_INTERVAL: f32 = 0.2;
const DASH_SPEED: f32 = 800.0;
const SLAM_LAUNCH: f32 = 300.0;
const SHOCKWAVE_REACH: (f32, f32) = (120.0, 80.0);

const BARRAGE_SHOTS: u8 = 5;
const BARRAGE_INTERVAL: f32 = 0.1;
const BARRAGE_SPREAD: f32 = 0.3;
const BARRAGE_SPEED: f32 = 700.0;
const BLITZ_SPEED: f32 = 1200.0;
const BLITZ_INVULNERABILITY: f32 = 1.0;
const CHRONOS_DURATION: f32 = 3.0;
const STORM_STRIKES: u8 = 3;
const STORM_INTERVAL: f32 = 0.15;

pub const WELL_OFFSET: f32 = 150.0;
pub const WELL_RADIUS: f32 = 200.0;
pub const WELL_DURATION: f32 = 3.0;
const WELL_STRENGTH: f32 = 90_000.0;
const WELL_MAX_ACCEL: f32 = 2400.0;

/// Everything an ability may touch when it fires.
pub struct AbilityContext<'a> {
    pub me: &'a mut FighterState,
    pub target: &'a mut FighterState,
    pub stage: &'a Stage,
    pub config: &'a BrawlConfig,
    pub out: &'a mut TickOutbox,
}

pub type AbilityFn = fn(&mut AbilityContext<'_>);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Special {
    Fireball,
    Lightning,
    Shield,
    Teleport,
    Multi,
    Dash,
    Slam,
    Counter,
    Freeze,
    Berserker,
}

impl Special {
    pub const ALL: [Special; 10] = [
        Special::Fireball,
        Special::Lightning,
        Special::Shield,
        Special::Teleport,
        Special::Multi,
        Special::Dash,
        Special::Slam,
        Special::Counter,
        Special::Freeze,
        Special::Berserker,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Special::Fireball => "fireball",
            Special::Lightning => "lightning",
            Special::Shield => "shield",
            Special::Teleport => "teleport",
            Special::Multi => "multi",
            Special::Dash => "dash",
            Special::Slam => "slam",
            Special::Counter => "counter",
            Special::Freeze => "freeze",
            Special::Berserker => "berserker",
        }
    }

    pub fn effect(self) -> AbilityFn {
        match self {
            Special::Fireball => special_fireball,
            Special::Lightning => special_lightning,
            Special::Shield => special_shield,
            Special::Teleport => special_teleport,
            Special::Multi => special_multi,
            Special::Dash => special_dash,
            Special::Slam => special_slam,
            Special::Counter => special_counter,
            Special::Freeze => special_freeze,
            Special::Berserker => special_berserker,
        }
    }
}

impl fmt::Display for Special {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Special {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Special::ALL
            .into_iter()
            .find(|sp| sp.as_str() == s)
            .ok_or_else(|| format!("unknown special '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ultimate {
    Barrage,
    Blitz,
    GravityWell,
    Chronos,
    Storm,
}

impl Ultimate {
    pub const ALL: [Ultimate; 5] = [
        Ultimate::Barrage,
        Ultimate::Blitz,
        Ultimate::GravityWell,
        Ultimate::Chronos,
        Ultimate::Storm,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Ultimate::Barrage => "barrage",
            Ultimate::Blitz => "blitz",
            Ultimate::GravityWell => "gravity_well",
            Ultimate::Chronos => "chronos",
            Ultimate::Storm => "storm",
        }
    }

    pub fn effect(self) -> AbilityFn {
        match self {
            Ultimate::Barrage => ultimate_barrage,
            Ultimate::Blitz => ultimate_blitz,
            Ultimate::GravityWell => ultimate_gravity_well,
            Ultimate::Chronos => ultimate_chronos,
            Ultimate::Storm => ultimate_storm,
        }
    }
}

impl fmt::Display for Ultimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ultimate {
    type Err = String;

    /// Accepts `fireball` and `dash` as aliases for `barrage` and `blitz`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fireball" => Ok(Ultimate::Barrage),
            "dash" => Ok(Ultimate::Blitz),
            _ => Ultimate::ALL
                .into_iter()
                .find(|u| u.as_str() == s)
                .ok_or_else(|| format!("unknown ultimate '{s}'")),
        }
    }
}

/// Edge-triggered special, ultimate and attack, in that order.
pub fn fire_triggers(ctx: &mut AbilityContext<'_>) {
    if ctx.me.input.was_just_pressed(Control::Special)
        && ctx.me.special_cooldown <= 0.0
        && ctx.me.attack_cooldown <= 0.0
        && ctx.me.hitstun <= 0.0
        && let Some(special) = ctx.me.special
    {
        ctx.me.attack_cooldown = SPECIAL_LOCKOUT;
        ctx.me.special_cooldown = SPECIAL_COOLDOWN;
        ctx.out.event(GameEvent::AbilityUsed {
            player_id: ctx.me.id,
            ability: special.as_str().to_string(),
        });
        (special.effect())(ctx);
    }

    if ctx.me.input.was_just_pressed(Control::Ultimate)
        && ctx.me.has_full_charge()
        && ctx.me.ultimate_cooldown <= 0.0
        && let Some(ultimate) = ctx.me.ultimate
    {
        ctx.me.ultimate_cooldown = ULTIMATE_COOLDOWN;
        ctx.me.charge = 0.0;
        ctx.out.event(GameEvent::AbilityUsed {
            player_id: ctx.me.id,
            ability: ultimate.as_str().to_string(),
        });
        (ultimate.effect())(ctx);
    }

    if ctx.me.input.was_just_pressed(Control::Attack)
        && ctx.me.attack_cooldown <= 0.0
        && ctx.me.hitstun <= 0.0
    {
        ctx.me.attack_cooldown = ATTACK_COOLDOWN / ctx.me.stats.speed;
        let dir = AttackDirection::from_input(&ctx.me.input);
        combat::resolve_melee(ctx.me, ctx.target, dir, ctx.out);
    }
}

fn special_fireball(ctx: &mut AbilityContext<'_>) {
    let me = &*ctx.me;
    let power = me.stats.power;
    ctx.out.spawn(
        Projectile::new(
            ProjectileKind::Fireball,
            me.x + me.w / 2.0,
            me.y + 30.0,
            me.facing * FIREBALL_SPEED * power,
            -20.0,
            Some(me.id),
        )
        .with_power(power),
    );
    let flash_x = if me.facing > 0.0 { me.x + me.w } else { me.x };
    ctx.out.burst(BurstKind::MuzzleFlash, flash_x, me.y + 25.0);
}

fn special_lightning(ctx: &mut AbilityContext<'_>) {
    if !ctx.target.alive || (ctx.target.x - ctx.me.x).abs() >= ctx.stage.width / 2.0 {
        return;
    }
    let bolt = lightning_on(ctx.target, ctx.me.id, ctx.me.facing)
        .with_impact(BOLT_DAMAGE, BOLT_KNOCKBACK.0, BOLT_KNOCKBACK.1)
        .with_power(ctx.me.stats.power);
    ctx.out.spawn(bolt);
    let (cx, cy) = ctx.target.center();
    ctx.out.burst(BurstKind::Lightning, cx, cy);
}

fn special_shield(ctx: &mut AbilityContext<'_>) {
    ctx.me.statuses.apply(StatusKind::Shield);
    let (cx, cy) = ctx.me.center();
    ctx.out.burst(BurstKind::Shield, cx, cy);
}

fn special_teleport(ctx: &mut AbilityContext<'_>) {
    let lockout = ctx.config.ledge_regrab_lockout;
    let me = &mut *ctx.me;
    let (cx, cy) = me.center();
    ctx.out.burst(BurstKind::Teleport, cx, cy);

    me.release_ledge(lockout);
    let held = if me.input.is_down(Control::Left) {
        Some(-1.0)
    } else if me.input.is_down(Control::Right) {
        Some(1.0)
    } else {
        None
    };
    match held {
        Some(dir) => me.x += dir * TELEPORT_STEP,
        None => {
            me.x = ctx.target.x - ctx.target.facing * TELEPORT_BEHIND;
            me.y = ctx.target.y;
        },
    }
    me.x = me.x.clamp(0.0, (ctx.stage.width - me.w).max(0.0));
    me.invulnerable = me.invulnerable.max(TELEPORT_INVULNERABILITY);

    let (cx, cy) = me.center();
    ctx.out.burst(BurstKind::Teleport, cx, cy);
}

fn special_multi(ctx: &mut AbilityContext<'_>) {
    for step in 0..COMBO_HITS {
        ctx.out.defer(
            COMBO_INTERVAL * f32::from(step),
            ctx.me.slot,
            ctx.me.life,
            ScheduledAction::ComboHit { step },
        );
    }
}

fn special_dash(ctx: &mut AbilityContext<'_>) {
    let me = &mut *ctx.me;
    me.release_ledge(ctx.config.ledge_regrab_lockout);
    me.vx += me.facing * DASH_SPEED * me.stats.speed;
    me.statuses.apply(StatusKind::DashAttack);
    let (cx, cy) = me.center();
    ctx.out.burst(BurstKind::Dash, cx, cy);
}

fn special_slam(ctx: &mut AbilityContext<'_>) {
    let me = &mut *ctx.me;
    me.release_ledge(ctx.config.ledge_regrab_lockout);
    me.vy = -SLAM_LAUNCH;
    me.grounded = false;
    me.statuses.apply(StatusKind::Slam);
}

fn special_counter(ctx: &mut AbilityContext<'_>) {
    ctx.me.statuses.apply(StatusKind::Counter);
}

fn special_freeze(ctx: &mut AbilityContext<'_>) {
    if ctx.target.alive {
        ctx.target.statuses.apply(StatusKind::Frozen);
    }
}

fn special_berserker(ctx: &mut AbilityContext<'_>) {
    ctx.me.statuses.apply(StatusKind::Berserker);
}

fn ultimate_barrage(ctx: &mut AbilityContext<'_>) {
    for index in 0..BARRAGE_SHOTS {
        ctx.out.defer(
            BARRAGE_INTERVAL * f32::from(index),
            ctx.me.slot,
            ctx.me.life,
            ScheduledAction::BarrageShot { index },
        );
    }
    ctx.out.shake(15.0);
}

fn ultimate_blitz(ctx: &mut AbilityContext<'_>) {
    let me = &mut *ctx.me;
    me.release_ledge(ctx.config.ledge_regrab_lockout);
    me.vx = me.facing * BLITZ_SPEED;
    me.invulnerable = me.invulnerable.max(BLITZ_INVULNERABILITY);
    me.statuses.apply(StatusKind::Blitz);
    let (cx, cy) = me.center();
    ctx.out.burst(BurstKind::Dash, cx, cy);
    ctx.out.shake(12.0);
}

fn ultimate_gravity_well(ctx: &mut AbilityContext<'_>) {
    let (cx, cy) = ctx.me.center();
    ctx.out.well(GravityWell {
        owner: ctx.me.id,
        target: ctx.target.id,
        x: cx + ctx.me.facing * WELL_OFFSET,
        y: cy,
        radius: WELL_RADIUS,
        remaining: WELL_DURATION,
    });
}

fn ultimate_chronos(ctx: &mut AbilityContext<'_>) {
    if ctx.target.alive {
        ctx.target
            .statuses
            .apply_for(StatusKind::Frozen, CHRONOS_DURATION);
    }
    ctx.me
        .statuses
        .apply_for(StatusKind::TimeBoost, CHRONOS_DURATION);
}

fn ultimate_storm(ctx: &mut AbilityContext<'_>) {
    for i in 0..STORM_STRIKES {
        ctx.out.defer(
            STORM_INTERVAL * f32::from(i),
            ctx.me.slot,
            ctx.me.life,
            ScheduledAction::StormStrike,
        );
    }
}

/// A lightning bolt dropped on `target`'s current position.
fn lightning_on(target: &FighterState, owner: PlayerId, facing: f32) -> Projectile {
    let spec = ProjectileKind::Lightning.spec();
    Projectile::new(
        ProjectileKind::Lightning,
        target.x + target.w / 2.0 - spec.w / 2.0,
        target.y + 10.0,
        0.0,
        0.0,
        Some(owner),
    )
    .with_facing(facing)
}

/// Run one due scheduler entry. Entries whose source died or respawned since
/// scheduling are dropped.
pub fn run_scheduled(
    entry: &ScheduledEntry,
    me: &mut FighterState,
    target: &mut FighterState,
    out: &mut TickOutbox,
) {
    if !me.alive || me.life != entry.life {
        tracing::trace!(
            player_id = me.id,
            action = ?entry.action,
            "Skipped stale scheduled action"
        );
        return;
    }

    match entry.action {
        ScheduledAction::ComboHit { step } => {
            if !target.alive
                || (target.x - me.x).abs() >= 100.0
                || (target.y - me.y).abs() >= 80.0
            {
                return;
            }
            let n = f32::from(step) + 1.0;
            let knockback = (me.facing * 150.0 * n, -100.0 * n);
            combat::strike(Some(me.id), target, 4.0 * me.stats.power, knockback, out);
        },
        ScheduledAction::BarrageShot { index } => {
            let angle = (f32::from(index) - 2.0) * BARRAGE_SPREAD;
            out.spawn(
                Projectile::new(
                    ProjectileKind::Ultimate,
                    me.x + me.w / 2.0,
                    me.y + 30.0,
                    angle.cos() * BARRAGE_SPEED * me.facing,
                    angle.sin() * BARRAGE_SPEED,
                    Some(me.id),
                )
                .with_power(me.stats.power),
            );
        },
        ScheduledAction::StormStrike => {
            if !target.alive {
                tracing::trace!(player_id = me.id, "Storm strike has no target");
                return;
            }
            out.spawn(lightning_on(target, me.id, me.facing).with_power(me.stats.power));
            let (cx, cy) = target.center();
            out.burst(BurstKind::Lightning, cx, cy);
        },
    }
}

/// Landing while slamming: hit anything close with a shockwave.
pub fn slam_shockwave(me: &mut FighterState, target: &mut FighterState, out: &mut TickOutbox) {
    let (fx, fy) = me.feet();
    out.burst(BurstKind::Shockwave, fx, fy);
    out.shake(8.0);

    let (reach_x, reach_y) = SHOCKWAVE_REACH;
    if (target.x - me.x).abs() >= reach_x || (target.y - me.y).abs() >= reach_y {
        return;
    }
    let dir = if target.x >= me.x { 1.0 } else { -1.0 };
    combat::strike(
        Some(me.id),
        target,
        9.0 * me.stats.power,
        (dir * 250.0, -450.0),
        out,
    );
}

/// Blitz contact: the first touch launches the opponent and ends the blitz.
pub fn blitz_contact(me: &mut FighterState, target: &mut FighterState, out: &mut TickOutbox) {
    if !me.statuses.has(StatusKind::Blitz)
        || !target.is_hittable()
        || !rects_overlap(&me.rect(), &target.rect())
    {
        return;
    }
    me.statuses.remove(StatusKind::Blitz);
    let dr = 1.0 / target.stats.defense;
    let knockback = (me.facing * 700.0 * dr, -500.0 * dr);
    if combat::strike(Some(me.id), target, 18.0 * me.stats.power, knockback, out) {
        out.shake(12.0);
    }
}

/// A short-lived attractor that pulls one fighter toward its centre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GravityWell {
    pub owner: PlayerId,
    pub target: PlayerId,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub remaining: f32,
}

impl GravityWell {
    /// Accelerate `fighter` toward the well if it is the target and in range.
    pub fn pull(&self, fighter: &mut FighterState, dt: f32) {
        if fighter.id != self.target || !fighter.alive || fighter.is_hanging() {
            return;
        }
        let (cx, cy) = fighter.center();
        let dx = self.x - cx;
        let dy = self.y - cy;
        let d = (dx * dx + dy * dy).sqrt();
        if d <= 0.0 || d > self.radius {
            return;
        }
        let accel = (WELL_STRENGTH / d).min(WELL_MAX_ACCEL);
        fighter.vx += dx / d * accel * dt;
        fighter.vy += dy / d * accel * dt;
    }

    pub fn tick(&mut self, dt: f32) {
        self.remaining = (self.remaining - dt).max(0.0);
    }

    pub fn is_expired(&self) -> bool {
        self.remaining <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FighterLoadout;

    struct Duel {
        stage: Stage,
        config: BrawlConfig,
        a: FighterState,
        b: FighterState,
        out: TickOutbox,
    }

    impl Duel {
        fn new() -> Self {
            let stage = Stage::default();
            let mut a = FighterState::new(1, 0, &FighterLoadout::for_slot(0), &stage);
            let mut b = FighterState::new(2, 1, &FighterLoadout::for_slot(1), &stage);
            a.x = 400.0;
            a.y = 540.0;
            b.x = 600.0;
            b.y = 540.0;
            Self {
                stage,
                config: BrawlConfig::default(),
                a,
                b,
                out: TickOutbox::default(),
            }
        }

        fn cast(&mut self, f: AbilityFn) {
            f(&mut AbilityContext {
                me: &mut self.a,
                target: &mut self.b,
                stage: &self.stage,
                config: &self.config,
                out: &mut self.out,
            });
        }

        fn triggers(&mut self) {
            fire_triggers(&mut AbilityContext {
                me: &mut self.a,
                target: &mut self.b,
                stage: &self.stage,
                config: &self.config,
                out: &mut self.out,
            });
        }
    }

    #[test]
    fn ids_roundtrip_and_aliases() {
        for s in Special::ALL {
            assert_eq!(s.as_str().parse::<Special>(), Ok(s));
        }
        for u in Ultimate::ALL {
            assert_eq!(u.as_str().parse::<Ultimate>(), Ok(u));
        }
        assert_eq!("fireball".parse::<Ultimate>(), Ok(Ultimate::Barrage));
        assert_eq!("dash".parse::<Ultimate>(), Ok(Ultimate::Blitz));
        assert!("meteor".parse::<Special>().is_err());
    }

    #[test]
    fn special_trigger_sets_cooldowns_and_fires() {
        let mut d = Duel::new();
        d.a.input.press(Control::Special);
        d.a.input.begin_tick(0.0);
        d.triggers();
        assert_eq!(d.a.attack_cooldown, SPECIAL_LOCKOUT);
        assert_eq!(d.a.special_cooldown, SPECIAL_COOLDOWN);
        assert_eq!(d.out.projectiles.len(), 1);
        assert_eq!(d.out.projectiles[0].vx, 500.0);
        assert!(d.out.events.contains(&GameEvent::AbilityUsed {
            player_id: 1,
            ability: "fireball".to_string(),
        }));
    }

    #[test]
    fn special_blocked_by_hitstun_and_cooldown() {
        let mut d = Duel::new();
        d.a.hitstun = 0.1;
        d.a.input.press(Control::Special);
        d.a.input.begin_tick(0.0);
        d.triggers();
        assert!(d.out.projectiles.is_empty());

        d.a.hitstun = 0.0;
        d.a.special_cooldown = 0.2;
        d.triggers();
        assert!(d.out.projectiles.is_empty());
    }

    #[test]
    fn empty_special_slot_is_a_noop() {
        let mut d = Duel::new();
        d.a.special = None;
        d.a.input.press(Control::Special);
        d.a.input.begin_tick(0.0);
        d.triggers();
        assert_eq!(d.a.special_cooldown, 0.0);
        assert!(d.out.events.is_empty());
    }

    #[test]
    fn ultimate_needs_full_charge_and_consumes_it() {
        let mut d = Duel::new();
        d.a.charge = 99.0;
        d.a.input.press(Control::Ultimate);
        d.a.input.begin_tick(0.0);
        d.triggers();
        assert_eq!(d.a.ultimate_cooldown, 0.0);

        d.a.charge = 100.0;
        d.triggers();
        assert_eq!(d.a.charge, 0.0);
        assert_eq!(d.a.ultimate_cooldown, ULTIMATE_COOLDOWN);
        assert_eq!(d.out.deferred.len(), BARRAGE_SHOTS as usize);
    }

    #[test]
    fn attack_cooldown_scales_with_speed() {
        let mut d = Duel::new();
        d.a.stats.speed = 2.0;
        d.a.input.press(Control::Attack);
        d.a.input.begin_tick(0.0);
        d.triggers();
        assert_eq!(d.a.attack_cooldown, 0.125);
    }

    #[test]
    fn lightning_requires_half_stage_range() {
        let mut d = Duel::new();
        d.a.stats.power = 1.5;
        d.cast(special_lightning);
        assert_eq!(d.out.projectiles.len(), 1);
        let mut bolt = d.out.projectiles[0].clone();
        assert_eq!(bolt.kind, ProjectileKind::Lightning);

        let mut fighters = [d.a.clone(), d.b.clone()];
        let mut out = TickOutbox::default();
        bolt.resolve_hits(&mut fighters, &mut out);
        assert!(out.events.contains(&GameEvent::Hit {
            attacker: Some(1),
            defender: 2,
            damage: 18.0,
            knockback: (300.0, -200.0),
        }));
        assert_eq!(fighters[1].damage, 18.0);

        d.out = TickOutbox::default();
        d.b.x = d.a.x + d.stage.width / 2.0 + 1.0;
        d.cast(special_lightning);
        assert!(d.out.projectiles.is_empty());
    }

    #[test]
    fn teleport_behind_target() {
        let mut d = Duel::new();
        d.b.facing = -1.0;
        d.cast(special_teleport);
        assert_eq!(d.a.x, 660.0);
        assert_eq!(d.a.invulnerable, TELEPORT_INVULNERABILITY);
    }

    #[test]
    fn teleport_in_held_direction() {
        let mut d = Duel::new();
        d.a.input.press(Control::Left);
        d.a.input.begin_tick(0.0);
        d.cast(special_teleport);
        assert_eq!(d.a.x, 250.0);
        assert_eq!(d.a.y, 540.0);
    }

    #[test]
    fn multi_schedules_three_hits() {
        let mut d = Duel::new();
        d.cast(special_multi);
        let delays: Vec<f32> = d.out.deferred.iter().map(|x| x.delay).collect();
        assert_eq!(delays.len(), 3);
        assert_eq!(delays[0], 0.0);
        assert!((delays[2] - 0.4).abs() < 1e-6);
    }

    #[test]
    fn dash_and_slam_set_status() {
        let mut d = Duel::new();
        d.cast(special_dash);
        assert_eq!(d.a.vx, 800.0);
        assert!(d.a.statuses.has(StatusKind::DashAttack));
        d.cast(special_slam);
        assert_eq!(d.a.vy, -300.0);
        assert!(d.a.statuses.has(StatusKind::Slam));
    }

    #[test]
    fn freeze_and_chronos() {
        let mut d = Duel::new();
        d.cast(special_freeze);
        assert_eq!(d.b.statuses.remaining(StatusKind::Frozen), 2.0);
        d.cast(ultimate_chronos);
        assert_eq!(d.b.statuses.remaining(StatusKind::Frozen), 3.0);
        assert_eq!(d.a.statuses.remaining(StatusKind::TimeBoost), 3.0);
    }

    #[test]
    fn blitz_launches_on_contact_once() {
        let mut d = Duel::new();
        d.cast(ultimate_blitz);
        assert_eq!(d.a.vx, 1200.0);
        assert_eq!(d.a.invulnerable, 1.0);
        d.b.x = d.a.x + 10.0;
        blitz_contact(&mut d.a, &mut d.b, &mut d.out);
        assert_eq!(d.b.damage, 18.0);
        assert!(!d.a.statuses.has(StatusKind::Blitz));
        d.b.invulnerable = 0.0;
        blitz_contact(&mut d.a, &mut d.b, &mut d.out);
        assert_eq!(d.b.damage, 18.0);
    }

    #[test]
    fn shockwave_hits_nearby_target() {
        let mut d = Duel::new();
        d.b.x = d.a.x + 100.0;
        slam_shockwave(&mut d.a, &mut d.b, &mut d.out);
        assert_eq!(d.b.damage, 9.0);
        assert_eq!((d.b.vx, d.b.vy), (250.0, -450.0));
    }

    #[test]
    fn combo_hit_requires_proximity_and_current_life() {
        let mut d = Duel::new();
        d.b.x = d.a.x + 50.0;
        let entry = ScheduledEntry {
            at: 0.0,
            seq: 0,
            source: 0,
            life: d.a.life,
            action: ScheduledAction::ComboHit { step: 1 },
        };
        run_scheduled(&entry, &mut d.a, &mut d.b, &mut d.out);
        assert_eq!(d.b.damage, 4.0);
        assert_eq!((d.b.vx, d.b.vy), (300.0, -200.0));

        let stale = ScheduledEntry {
            life: d.a.life + 1,
            ..entry
        };
        d.b.invulnerable = 0.0;
        run_scheduled(&stale, &mut d.a, &mut d.b, &mut d.out);
        assert_eq!(d.b.damage, 4.0);
    }

    #[test]
    fn barrage_shot_angles() {
        let mut d = Duel::new();
        let entry = ScheduledEntry {
            at: 0.0,
            seq: 0,
            source: 0,
            life: d.a.life,
            action: ScheduledAction::BarrageShot { index: 2 },
        };
        run_scheduled(&entry, &mut d.a, &mut d.b, &mut d.out);
        let shot = &d.out.projectiles[0];
        assert_eq!(shot.kind, ProjectileKind::Ultimate);
        assert_eq!((shot.vx, shot.vy), (700.0, 0.0));
    }

    #[test]
    fn well_pulls_target_and_skips_center() {
        let mut d = Duel::new();
        let (cx, cy) = d.b.center();
        let mut well = GravityWell {
            owner: 1,
            target: 2,
            x: cx - 100.0,
            y: cy,
            radius: WELL_RADIUS,
            remaining: WELL_DURATION,
        };
        well.pull(&mut d.b, 0.1);
        assert!((d.b.vx + 90.0).abs() < 1e-3);

        d.b.vx = 0.0;
        well.x = cx;
        well.pull(&mut d.b, 0.1);
        assert_eq!(d.b.vx, 0.0);

        well.pull(&mut d.a, 0.1);
        assert_eq!(d.a.vx, 0.0);

        well.tick(5.0);
        assert!(well.is_expired());
    }
}
