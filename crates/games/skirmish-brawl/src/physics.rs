use skirmish_core::events::{BurstKind, GameEvent};

use crate::abilities::{self, AbilityContext};
use crate::collision::distance;
use crate::config::BrawlConfig;
use crate::fighter::{FighterState, LedgeGrab};
use crate::input::Control;
use crate::outbox::TickOutbox;
use crate::stage::{LEDGE_RISE, Stage};
use crate::status::StatusKind;

/// Slack above a platform top that still counts as "was above it last frame".
const PLATFORM_LAND_TOLERANCE: f32 = 1.0;
/// How far below a platform's top a falling fighter can still be caught.
const PLATFORM_CATCH_DEPTH: f32 = 200.0;

/// Shared, read-only inputs to a fighter update.
pub struct TickEnv<'a> {
    pub stage: &'a Stage,
    pub config: &'a BrawlConfig,
    pub dt: f32,
}

/// What happened to a held ledge this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgeAction {
    Held,
    Climbed,
    Dropped,
}

/// Advance one fighter by one tick against its opponent.
pub fn tick_fighter(
    me: &mut FighterState,
    target: &mut FighterState,
    env: &TickEnv<'_>,
    out: &mut TickOutbox,
) {
    let TickEnv { stage, config, dt } = *env;

    if !me.alive {
        me.tick_respawn(dt, stage);
        return;
    }

    if !me.is_hanging() {
        apply_horizontal(me, config, dt);
        me.vy += config.gravity * dt;
        update_jump(me, config, dt, out);
    }

    abilities::fire_triggers(&mut AbilityContext {
        me: &mut *me,
        target: &mut *target,
        stage,
        config,
        out: &mut *out,
    });

    if !me.is_hanging() {
        try_grab_ledge(me, stage, config);
    }
    let pinned = match me.ledge {
        Some(_) => handle_ledge(me, stage, config) != LedgeAction::Dropped,
        None => false,
    };

    if !pinned {
        integrate(me, stage, dt);
        let landed = resolve_collisions(me, stage, dt);
        if landed && me.statuses.has(StatusKind::Slam) {
            me.statuses.remove(StatusKind::Slam);
            abilities::slam_shockwave(me, target, out);
        }
    }

    abilities::blitz_contact(me, target, out);

    if me.should_ko(stage, config) {
        knock_out(me, config, out);
        return;
    }

    me.tick_timers(dt);
    me.add_charge(config.charge_regen_rate * dt);
}

/// Horizontal acceleration, facing, friction and the speed cap.
pub fn apply_horizontal(me: &mut FighterState, config: &BrawlConfig, dt: f32) {
    let mult = me.stats.speed * me.statuses.speed_multiplier();
    let frozen = me.statuses.has(StatusKind::Frozen);
    let accel = if me.grounded {
        config.ground_accel
    } else {
        config.air_accel
    } * mult;
    let max_speed = config.max_run_speed * mult;

    let left = !frozen && me.input.is_down(Control::Left);
    let right = !frozen && me.input.is_down(Control::Right);
    if left {
        me.vx -= accel * dt;
        me.facing = -1.0;
    }
    if right {
        me.vx += accel * dt;
        me.facing = 1.0;
    }
    if !left && !right {
        me.vx *= if me.grounded {
            config.ground_friction
        } else {
            config.air_friction
        };
    }
    me.vx = me.vx.clamp(-max_speed, max_speed);
}

/// Coyote window, jump buffer and the ground/air jump.
pub fn update_jump(me: &mut FighterState, config: &BrawlConfig, dt: f32, out: &mut TickOutbox) {
    if me.grounded {
        me.coyote_timer = config.coyote_time;
    } else {
        me.coyote_timer = (me.coyote_timer - dt).max(0.0);
    }
    if me.input.was_just_pressed(Control::Up) {
        me.jump_buffer = config.jump_buffer;
    } else {
        me.jump_buffer = (me.jump_buffer - dt).max(0.0);
    }
    if me.jump_buffer <= 0.0 {
        return;
    }

    if me.grounded || me.coyote_timer > 0.0 {
        me.vy = -config.ground_jump_speed;
        me.grounded = false;
        me.on_platform = None;
        me.coyote_timer = 0.0;
        me.jump_buffer = 0.0;
        me.air_jumps = 1;
    } else if me.air_jumps > 0
        && (!config.air_jump_requires_double_tap
            || me
                .input
                .is_double_tap(Control::Up, config.double_tap_window_ms))
    {
        me.vy = -config.air_jump_speed;
        me.air_jumps = 0;
        me.jump_buffer = 0.0;
    } else {
        return;
    }
    let (fx, fy) = me.feet();
    out.burst(BurstKind::Jump, fx, fy);
}

/// Catch the nearest ledge anchor while falling.
pub fn try_grab_ledge(me: &mut FighterState, stage: &Stage, config: &BrawlConfig) {
    if me.vy <= 0.0 || me.grounded || me.ledge_lockout > 0.0 || me.ledge.is_some() {
        return;
    }
    let (fx, fy) = me.feet();
    for (i, p) in stage.platforms.iter().enumerate() {
        // Only a fighter that has dropped past the top can hang from it.
        if fy < p.y {
            continue;
        }
        for (ax, ay) in p.ledge_anchors() {
            if distance(fx, fy, ax, ay) < config.ledge_grab_radius {
                me.ledge = Some(LedgeGrab {
                    anchor_x: ax,
                    anchor_y: ay,
                    platform: i,
                });
                me.vx = 0.0;
                me.vy = 0.0;
                me.jump_buffer = 0.0;
                return;
            }
        }
    }
}

/// Climb with `up`, drop with `down`, otherwise keep hanging.
pub fn handle_ledge(me: &mut FighterState, stage: &Stage, config: &BrawlConfig) -> LedgeAction {
    let Some(grab) = me.ledge else {
        return LedgeAction::Dropped;
    };
    me.vx = 0.0;
    me.vy = 0.0;
    me.grounded = false;
    me.on_platform = None;

    let Some(platform) = stage.platforms.get(grab.platform) else {
        me.release_ledge(config.ledge_regrab_lockout);
        return LedgeAction::Dropped;
    };

    if me.input.is_down(Control::Up) {
        me.release_ledge(config.ledge_regrab_lockout);
        me.y = grab.anchor_y + LEDGE_RISE - me.h;
        me.x = me
            .x
            .clamp(platform.x, (platform.x + platform.width - me.w).max(platform.x));
        me.grounded = true;
        me.on_platform = Some(grab.platform);
        me.air_jumps = 0;
        return LedgeAction::Climbed;
    }
    if me.input.is_down(Control::Down) {
        me.release_ledge(config.ledge_regrab_lockout);
        me.vy = config.ledge_drop_speed;
        return LedgeAction::Dropped;
    }
    LedgeAction::Held
}

/// Move by velocity and clamp to the side walls. No vertical clamp.
pub fn integrate(me: &mut FighterState, stage: &Stage, dt: f32) {
    me.x += me.vx * dt;
    me.y += me.vy * dt;
    me.x = me.x.clamp(0.0, (stage.width - me.w).max(0.0));
}

/// Ground and one-way platform collision. Returns true when the fighter
/// touched down this tick after being airborne.
pub fn resolve_collisions(me: &mut FighterState, stage: &Stage, dt: f32) -> bool {
    let was_grounded = me.grounded;
    me.grounded = false;
    me.on_platform = None;

    // Only catch fighters that crossed the ground line this tick; anything
    // already below it keeps falling toward the KO line.
    let bottom = me.y + me.h;
    if bottom > stage.ground_y
        && bottom - me.vy * dt <= stage.ground_y + PLATFORM_LAND_TOLERANCE
    {
        me.y = stage.ground_y - me.h;
        me.vy = 0.0;
        me.grounded = true;
    }

    for (i, p) in stage.platforms.iter().enumerate() {
        if me.x + me.w <= p.x || me.x >= p.x + p.width {
            continue;
        }
        let bottom = me.y + me.h;
        let prev_bottom = bottom - me.vy * dt;
        if me.vy >= 0.0
            && prev_bottom <= p.y + PLATFORM_LAND_TOLERANCE
            && bottom > p.y
            && bottom < p.y + p.height + PLATFORM_CATCH_DEPTH
        {
            me.y = p.y - me.h;
            me.vy = 0.0;
            me.grounded = true;
            me.on_platform = Some(i);
        }
    }

    me.grounded && !was_grounded
}

fn knock_out(me: &mut FighterState, config: &BrawlConfig, out: &mut TickOutbox) {
    let (cx, cy) = me.center();
    let stocks = me.lose_stock(config.respawn_delay);
    tracing::info!(player_id = me.id, stocks, "Fighter knocked out");
    out.event(GameEvent::Ko { player_id: me.id });
    out.event(GameEvent::StockUpdate {
        player_id: me.id,
        stocks,
    });
    out.burst(BurstKind::Ko, cx, cy);
    out.shake(14.0);
}
