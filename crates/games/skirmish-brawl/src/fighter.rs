use serde::{Deserialize, Serialize};

use skirmish_core::game_trait::PlayerId;

use crate::abilities::{Special, Ultimate};
use crate::collision::Rect;
use crate::config::{BrawlConfig, FighterLoadout, Stats};
use crate::input::{ControlScheme, InputState};
use crate::stage::{SpawnPoint, Stage};
use crate::status::StatusSet;

pub const FIGHTER_WIDTH: f32 = 40.0;
pub const FIGHTER_HEIGHT: f32 = 60.0;
/// Ultimate charge needed to fire an ultimate.
pub const MAX_CHARGE: f32 = 100.0;

/// A held ledge: the anchor the fighter hangs from and the platform it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LedgeGrab {
    pub anchor_x: f32,
    pub anchor_y: f32,
    pub platform: usize,
}

/// Full per-fighter simulation state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FighterState {
    pub id: PlayerId,
    /// 0-based slot; selects the spawn point and default bindings.
    pub slot: usize,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub vx: f32,
    pub vy: f32,
    /// +1 facing right, -1 facing left.
    pub facing: f32,
    pub grounded: bool,
    pub on_platform: Option<usize>,
    pub damage: f32,
    pub stocks: u8,
    pub alive: bool,
    pub respawn_timer: f32,
    pub controls: ControlScheme,
    pub input: InputState,
    pub attack_cooldown: f32,
    pub special_cooldown: f32,
    pub ultimate_cooldown: f32,
    pub hitstun: f32,
    pub invulnerable: f32,
    pub ledge: Option<LedgeGrab>,
    pub ledge_lockout: f32,
    pub special: Option<Special>,
    pub ultimate: Option<Ultimate>,
    pub stats: Stats,
    pub charge: f32,
    pub statuses: StatusSet,
    pub air_jumps: u8,
    pub coyote_timer: f32,
    pub jump_buffer: f32,
    /// Bumped on every respawn; scheduled sub-effects from an older life are void.
    pub life: u32,
    pub is_cpu: bool,
}

impl FighterState {
    pub fn new(id: PlayerId, slot: usize, loadout: &FighterLoadout, stage: &Stage) -> Self {
        let spawn = stage.spawn_for(slot);
        Self {
            id,
            slot,
            x: spawn.x,
            y: spawn.y,
            w: FIGHTER_WIDTH,
            h: FIGHTER_HEIGHT,
            vx: 0.0,
            vy: 0.0,
            facing: if slot == 0 { 1.0 } else { -1.0 },
            grounded: false,
            on_platform: None,
            damage: 0.0,
            stocks: 3,
            alive: true,
            respawn_timer: 0.0,
            controls: ControlScheme::for_slot(slot),
            input: InputState::default(),
            attack_cooldown: 0.0,
            special_cooldown: 0.0,
            ultimate_cooldown: 0.0,
            hitstun: 0.0,
            invulnerable: 0.0,
            ledge: None,
            ledge_lockout: 0.0,
            special: loadout.special,
            ultimate: loadout.ultimate,
            stats: loadout.stats.clamped(),
            charge: 0.0,
            statuses: StatusSet::default(),
            air_jumps: 0,
            coyote_timer: 0.0,
            jump_buffer: 0.0,
            life: 0,
            is_cpu: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Bottom-centre of the box.
    pub fn feet(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h)
    }

    pub fn is_hanging(&self) -> bool {
        self.ledge.is_some()
    }

    /// Can be struck right now.
    pub fn is_hittable(&self) -> bool {
        self.alive && self.invulnerable <= 0.0
    }

    /// Reset everything for a new match with full stocks.
    pub fn spawn(&mut self, stage: &Stage, stocks: u8) {
        let spawn = stage.spawn_for(self.slot);
        self.place_at(spawn);
        self.facing = if self.slot == 0 { 1.0 } else { -1.0 };
        self.damage = 0.0;
        self.stocks = stocks.max(1);
        self.alive = true;
        self.respawn_timer = 0.0;
        self.input.clear();
        self.attack_cooldown = 0.0;
        self.special_cooldown = 0.0;
        self.ultimate_cooldown = 0.0;
        self.charge = 0.0;
        self.life = self.life.wrapping_add(1);
    }

    /// Return to the spawn point after a KO. No-op for a living fighter or one
    /// with no stocks left.
    pub fn respawn(&mut self, stage: &Stage) {
        if self.alive || self.stocks == 0 {
            return;
        }
        let spawn = stage.spawn_for(self.slot);
        self.place_at(spawn);
        self.damage = 0.0;
        self.alive = true;
        self.respawn_timer = 0.0;
        self.life = self.life.wrapping_add(1);
    }

    fn place_at(&mut self, spawn: SpawnPoint) {
        self.x = spawn.x;
        self.y = spawn.y;
        self.vx = 0.0;
        self.vy = 0.0;
        self.grounded = false;
        self.on_platform = None;
        self.ledge = None;
        self.ledge_lockout = 0.0;
        self.hitstun = 0.0;
        self.invulnerable = 0.0;
        self.statuses.clear();
        self.air_jumps = 0;
        self.coyote_timer = 0.0;
        self.jump_buffer = 0.0;
    }

    /// Take one stock and leave play. Returns the stocks remaining.
    pub fn lose_stock(&mut self, respawn_delay: f32) -> u8 {
        self.stocks = self.stocks.saturating_sub(1);
        self.alive = false;
        self.ledge = None;
        self.grounded = false;
        self.on_platform = None;
        self.respawn_timer = if self.stocks > 0 { respawn_delay } else { 0.0 };
        self.stocks
    }

    /// Count down while out of play. Returns true on the tick the fighter reappears.
    pub fn tick_respawn(&mut self, dt: f32, stage: &Stage) -> bool {
        if self.alive || self.stocks == 0 {
            return false;
        }
        self.respawn_timer = (self.respawn_timer - dt).max(0.0);
        if self.respawn_timer <= 0.0 {
            self.respawn(stage);
            return true;
        }
        false
    }

    /// Accumulate damage and add knockback to the current velocity.
    pub fn hurt(&mut self, damage: f32, knockback: (f32, f32)) {
        self.damage += damage.max(0.0);
        self.vx += knockback.0;
        self.vy += knockback.1;
        // Getting launched breaks a ledge hold.
        if self.ledge.is_some() && (knockback.0 != 0.0 || knockback.1 != 0.0) {
            self.ledge = None;
        }
    }

    pub fn add_charge(&mut self, amount: f32) {
        self.charge = (self.charge + amount).clamp(0.0, MAX_CHARGE);
    }

    pub fn has_full_charge(&self) -> bool {
        self.charge >= MAX_CHARGE
    }

    /// Let go of a held ledge and start the re-grab lockout.
    pub fn release_ledge(&mut self, lockout: f32) {
        if self.ledge.take().is_some() {
            self.ledge_lockout = lockout;
        }
    }

    /// Whether this fighter should lose a stock right now.
    pub fn should_ko(&self, stage: &Stage, config: &BrawlConfig) -> bool {
        if !self.alive {
            return false;
        }
        if self.y > stage.height + config.ko_margin {
            return true;
        }
        config.enhanced_ko && self.damage >= config.ko_damage_threshold
    }

    /// Decrement every countdown, clamping at zero.
    pub fn tick_timers(&mut self, dt: f32) {
        let dec = |v: &mut f32| *v = (*v - dt).max(0.0);
        dec(&mut self.attack_cooldown);
        dec(&mut self.special_cooldown);
        dec(&mut self.ultimate_cooldown);
        dec(&mut self.hitstun);
        dec(&mut self.invulnerable);
        dec(&mut self.ledge_lockout);
        self.statuses.tick(dt);
    }
}

/// Borrow `fighters[slot]` and its opponent at the same time.
pub fn pair_mut(
    fighters: &mut [FighterState; 2],
    slot: usize,
) -> (&mut FighterState, &mut FighterState) {
    let [a, b] = fighters;
    if slot == 0 { (a, b) } else { (b, a) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StatusKind;

    fn fighter() -> (FighterState, Stage) {
        let stage = Stage::default();
        let f = FighterState::new(1, 0, &FighterLoadout::for_slot(0), &stage);
        (f, stage)
    }

    #[test]
    fn new_fighter_starts_at_spawn() {
        let (f, stage) = fighter();
        let spawn = stage.spawn_for(0);
        assert_eq!((f.x, f.y), (spawn.x, spawn.y));
        assert_eq!(f.facing, 1.0);
        assert!(f.alive);
    }

    #[test]
    fn lose_stock_saturates() {
        let (mut f, _) = fighter();
        f.stocks = 1;
        assert_eq!(f.lose_stock(2.0), 0);
        assert_eq!(f.respawn_timer, 0.0);
        assert_eq!(f.lose_stock(2.0), 0);
        assert!(!f.alive);
    }

    #[test]
    fn respawn_on_alive_fighter_is_noop() {
        let (mut f, stage) = fighter();
        f.x = 700.0;
        f.damage = 40.0;
        let before = f.clone();
        f.respawn(&stage);
        assert_eq!(f, before);
    }

    #[test]
    fn respawn_after_delay() {
        let (mut f, stage) = fighter();
        f.damage = 90.0;
        f.statuses.apply(StatusKind::Berserker);
        f.lose_stock(2.0);
        let life = f.life;
        assert!(!f.tick_respawn(1.0, &stage));
        assert!(f.tick_respawn(1.0, &stage));
        assert!(f.alive);
        assert_eq!(f.damage, 0.0);
        assert_eq!(f.stocks, 2);
        assert_eq!(f.life, life + 1);
        assert!(!f.statuses.has(StatusKind::Berserker));
    }

    #[test]
    fn eliminated_fighter_never_respawns() {
        let (mut f, stage) = fighter();
        f.stocks = 1;
        f.lose_stock(2.0);
        for _ in 0..10 {
            assert!(!f.tick_respawn(1.0, &stage));
        }
        assert!(!f.alive);
    }

    #[test]
    fn charge_clamps() {
        let (mut f, _) = fighter();
        f.add_charge(250.0);
        assert_eq!(f.charge, MAX_CHARGE);
        assert!(f.has_full_charge());
        f.add_charge(-500.0);
        assert_eq!(f.charge, 0.0);
    }

    #[test]
    fn damage_threshold_ko_respects_toggle() {
        let (mut f, stage) = fighter();
        let mut config = BrawlConfig::default();
        f.damage = 175.0;
        assert!(f.should_ko(&stage, &config));
        config.enhanced_ko = false;
        assert!(!f.should_ko(&stage, &config));
        f.y = stage.height + 301.0;
        assert!(f.should_ko(&stage, &config));
    }

    #[test]
    fn timers_clamp_at_zero() {
        let (mut f, _) = fighter();
        f.attack_cooldown = 0.1;
        f.hitstun = 0.05;
        f.tick_timers(1.0);
        assert_eq!(f.attack_cooldown, 0.0);
        assert_eq!(f.hitstun, 0.0);
    }

    #[test]
    fn hurt_ignores_negative_damage() {
        let (mut f, _) = fighter();
        f.hurt(-5.0, (10.0, -20.0));
        assert_eq!(f.damage, 0.0);
        assert_eq!((f.vx, f.vy), (10.0, -20.0));
    }
}
