use serde::{Deserialize, Serialize};

use skirmish_core::events::{BurstKind, GameEvent};
use skirmish_core::game_trait::PlayerId;

use crate::collision::{Rect, rects_overlap};
use crate::fighter::FighterState;
use crate::input::{Control, InputState};
use crate::outbox::TickOutbox;
use crate::status::StatusKind;

const BASE_DAMAGE: f32 = 10.0;
const DASH_ATTACK_DAMAGE: f32 = 12.0;
const BERSERKER_DAMAGE_MULT: f32 = 1.4;
const COUNTER_DAMAGE: f32 = 8.0;
const HIT_INVULNERABILITY: f32 = 0.1;
const HIT_CHARGE: f32 = 8.0;
const DASH_HIT_CHARGE: f32 = 15.0;
/// Hitstun for non-melee strikes (combo hits, shockwaves, blitz contact).
const STRIKE_HITSTUN: f32 = 0.15;

/// Melee swing direction, chosen from held input when the attack fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackDirection {
    Horizontal,
    Up,
    Down,
}

impl AttackDirection {
    pub fn from_input(input: &InputState) -> Self {
        if input.is_down(Control::Up) {
            AttackDirection::Up
        } else if input.is_down(Control::Down) {
            AttackDirection::Down
        } else {
            AttackDirection::Horizontal
        }
    }
}

/// The hitbox a swing in `dir` covers.
pub fn melee_hitbox(attacker: &FighterState, dir: AttackDirection) -> Rect {
    match dir {
        AttackDirection::Horizontal => {
            let reach = (50.0 + (attacker.damage * 0.5).min(200.0)) * attacker.stats.power;
            let x = if attacker.facing > 0.0 {
                attacker.x + attacker.w
            } else {
                attacker.x - reach
            };
            Rect::new(x, attacker.y + 20.0, reach, 30.0)
        },
        AttackDirection::Up => Rect::new(
            attacker.x - 10.0,
            attacker.y - 50.0,
            attacker.w + 20.0,
            50.0,
        ),
        AttackDirection::Down => Rect::new(
            attacker.x - 10.0,
            attacker.y + attacker.h,
            attacker.w + 20.0,
            40.0,
        ),
    }
}

/// What a melee swing did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeleeOutcome {
    Whiff,
    /// The defender's counter turned the swing back on the attacker.
    Countered,
    /// The defender's shield took the swing.
    Blocked,
    Hit { damage: f32, knockback: (f32, f32) },
}

/// Knockback for a melee hit, given the defender's damage before the hit.
pub fn melee_knockback(
    dir: AttackDirection,
    facing: f32,
    power: f32,
    defense: f32,
    prior_damage: f32,
) -> (f32, f32) {
    let od = prior_damage;
    let kf = (10.0 + od * 0.1) * power;
    let dr = 1.0 / defense;
    match dir {
        AttackDirection::Horizontal => (
            facing * kf * 20.0 * dr * (1.0 + od * 0.006),
            -350.0 * dr * (1.0 + od * 0.01),
        ),
        AttackDirection::Up => (facing * kf * 4.0 * dr, -550.0 * dr * (1.0 + od * 0.012)),
        AttackDirection::Down => (facing * kf * 6.0 * dr, 500.0 * dr * (1.0 + od * 0.01)),
    }
}

/// Resolve a melee swing from `attacker` against `defender`.
pub fn resolve_melee(
    attacker: &mut FighterState,
    defender: &mut FighterState,
    dir: AttackDirection,
    out: &mut TickOutbox,
) -> MeleeOutcome {
    if !defender.is_hittable() || !rects_overlap(&melee_hitbox(attacker, dir), &defender.rect()) {
        return MeleeOutcome::Whiff;
    }

    if defender.statuses.has(StatusKind::Counter) {
        defender.statuses.remove(StatusKind::Counter);
        let knockback = (-attacker.facing * 400.0, -300.0);
        attacker.hurt(COUNTER_DAMAGE, knockback);
        out.event(GameEvent::Hit {
            attacker: Some(defender.id),
            defender: attacker.id,
            damage: COUNTER_DAMAGE,
            knockback,
        });
        let (cx, cy) = attacker.center();
        out.burst(BurstKind::Hit, cx, cy);
        return MeleeOutcome::Countered;
    }

    if defender.statuses.has(StatusKind::Shield) {
        defender.statuses.consume(StatusKind::Shield, 1.0);
        let (cx, cy) = defender.center();
        out.burst(BurstKind::Shield, cx, cy);
        out.shake(3.0);
        return MeleeOutcome::Blocked;
    }

    let dashing = attacker.statuses.has(StatusKind::DashAttack);
    let base = if dashing {
        DASH_ATTACK_DAMAGE
    } else {
        BASE_DAMAGE
    };
    let berserk = if attacker.statuses.has(StatusKind::Berserker) {
        BERSERKER_DAMAGE_MULT
    } else {
        1.0
    };
    let damage = base * attacker.stats.power * berserk / defender.stats.defense;
    let knockback = melee_knockback(
        dir,
        attacker.facing,
        attacker.stats.power,
        defender.stats.defense,
        defender.damage,
    );

    defender.hurt(damage, knockback);
    defender.hitstun = 0.2 / defender.stats.speed;
    defender.invulnerable = HIT_INVULNERABILITY;
    attacker.add_charge(if dashing { DASH_HIT_CHARGE } else { HIT_CHARGE });

    out.event(GameEvent::Hit {
        attacker: Some(attacker.id),
        defender: defender.id,
        damage,
        knockback,
    });
    let (cx, cy) = defender.center();
    out.burst(BurstKind::Hit, cx, cy);
    out.shake(if dashing { 10.0 } else { 7.0 });

    MeleeOutcome::Hit { damage, knockback }
}

/// A direct ability hit. Shields absorb it; counters do not apply.
/// Returns whether damage was dealt.
pub fn strike(
    attacker: Option<PlayerId>,
    target: &mut FighterState,
    damage: f32,
    knockback: (f32, f32),
    out: &mut TickOutbox,
) -> bool {
    if !target.is_hittable() {
        return false;
    }
    let (cx, cy) = target.center();
    if target.statuses.has(StatusKind::Shield) {
        target.statuses.consume(StatusKind::Shield, 1.0);
        out.burst(BurstKind::Shield, cx, cy);
        return false;
    }
    target.hurt(damage, knockback);
    target.hitstun = target.hitstun.max(STRIKE_HITSTUN);
    target.invulnerable = HIT_INVULNERABILITY;
    out.event(GameEvent::Hit {
        attacker,
        defender: target.id,
        damage,
        knockback,
    });
    out.burst(BurstKind::Hit, cx, cy);
    true
}
