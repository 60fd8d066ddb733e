pub mod abilities;
pub mod bot;
pub mod collision;
pub mod combat;
pub mod config;
pub mod cosmetic;
pub mod error;
pub mod fighter;
pub mod input;
pub mod outbox;
pub mod physics;
pub mod projectile;
pub mod rng;
pub mod schedule;
pub mod scoring;
pub mod stage;
pub mod status;

use serde::{Deserialize, Serialize};

use skirmish_core::arena_game_boilerplate;
use skirmish_core::events::GameEvent;
use skirmish_core::game_trait::{
    ArenaGame, GameConfig, GameMetadata, PlayerId, PlayerInputs, PlayerScore,
};
use skirmish_core::player::Player;

use abilities::GravityWell;
use config::{BrawlConfig, MatchOptions};
use cosmetic::Cosmetics;
use fighter::{FighterState, pair_mut};
use input::ControlFrame;
use outbox::TickOutbox;
use physics::TickEnv;
use projectile::{HazardGenerator, Projectile};
use schedule::Scheduler;
use scoring::MatchOutcome;
use stage::Stage;

/// Complete, serializable match state. Restoring it resumes the exact same
/// trajectory, including the CPU's random draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrawlState {
    /// Match clock in seconds. Frozen while paused.
    pub clock: f32,
    pub fighters: [FighterState; 2],
    pub projectiles: Vec<Projectile>,
    pub wells: Vec<GravityWell>,
    pub scheduler: Scheduler,
    pub hazards: HazardGenerator,
    pub rng_state: u64,
    pub cosmetics: Cosmetics,
    pub stage: Stage,
    pub options: MatchOptions,
    pub round_complete: bool,
    pub outcome: Option<MatchOutcome>,
}

impl BrawlState {
    fn new(options: MatchOptions, stage: Stage, ids: [PlayerId; 2]) -> Self {
        let fighters = [0, 1].map(|slot| {
            let mut f = FighterState::new(ids[slot], slot, &options.fighters[slot], &stage);
            f.spawn(&stage, options.stocks);
            f.is_cpu = slot == 1 && options.cpu;
            f
        });
        Self {
            clock: 0.0,
            fighters,
            projectiles: Vec::new(),
            wells: Vec::new(),
            scheduler: Scheduler::default(),
            hazards: HazardGenerator::default(),
            rng_state: options.seed,
            cosmetics: Cosmetics::default(),
            stage,
            options,
            round_complete: false,
            outcome: None,
        }
    }

    pub fn fighter(&self, player_id: PlayerId) -> Option<&FighterState> {
        self.fighters.iter().find(|f| f.id == player_id)
    }

    fn fighter_mut(&mut self, player_id: PlayerId) -> Option<&mut FighterState> {
        self.fighters.iter_mut().find(|f| f.id == player_id)
    }
}

/// The two-player platform fighter.
pub struct BrawlMatch {
    state: BrawlState,
    paused: bool,
    game_config: BrawlConfig,
}

impl BrawlMatch {
    pub fn new() -> Self {
        Self::with_config(BrawlConfig::load())
    }

    pub fn with_config(config: BrawlConfig) -> Self {
        Self {
            state: BrawlState::new(MatchOptions::default(), Stage::default(), [1, 2]),
            paused: false,
            game_config: config.sanitized(),
        }
    }

    pub fn state(&self) -> &BrawlState {
        &self.state
    }

    pub fn config(&self) -> &BrawlConfig {
        &self.game_config
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Replace a fighter's held controls. Presses since the last tick are latched.
    /// A CPU-driven fighter ignores outside controls.
    pub fn set_controls(&mut self, player_id: PlayerId, frame: ControlFrame) {
        match self.state.fighter_mut(player_id) {
            Some(f) if f.is_cpu => tracing::trace!(player_id, "Ignored controls for CPU fighter"),
            Some(f) => f.input.set_frame(frame),
            None => tracing::debug!(player_id, "Dropped controls for unknown fighter"),
        }
    }

    /// Route a raw key event to whichever human fighter binds `code`.
    /// Returns whether any fighter consumed it.
    pub fn key_event(&mut self, code: &str, down: bool) -> bool {
        let mut consumed = false;
        for f in self.state.fighters.iter_mut().filter(|f| !f.is_cpu) {
            consumed |= f.input.apply_key(&f.controls, code, down);
        }
        consumed
    }

    /// Start the same matchup again from full stocks.
    pub fn rematch(&mut self) {
        let ids = self.state.fighters.each_ref().map(|f| f.id);
        let options = self.state.options.clone();
        let stage = self.state.stage.clone();
        self.state = BrawlState::new(options, stage, ids);
        self.paused = false;
        tracing::info!("Rematch started");
    }

    /// Append everything the outbox collected to the match-owned collections.
    fn absorb(&mut self, out: &mut TickOutbox, events: &mut Vec<GameEvent>) {
        let now = self.state.clock;
        self.state.projectiles.append(&mut out.projectiles);
        self.state.wells.append(&mut out.wells);
        for d in out.deferred.drain(..) {
            self.state
                .scheduler
                .schedule(now + d.delay, d.source, d.life, d.action);
        }
        events.append(&mut out.events);
    }

    fn check_match_over(&mut self, events: &mut Vec<GameEvent>) {
        let [a, b] = &self.state.fighters;
        let Some(outcome) = scoring::decide_outcome([(a.id, a.stocks), (b.id, b.stocks)]) else {
            return;
        };
        self.state.round_complete = true;
        self.state.outcome = Some(outcome);
        tracing::info!(?outcome, clock = self.state.clock, "Match over");
        events.push(GameEvent::MatchOver {
            winner: outcome.winner(),
        });
    }
}

impl Default for BrawlMatch {
    fn default() -> Self {
        Self::with_config(BrawlConfig::default())
    }
}

impl ArenaGame for BrawlMatch {
    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "Skirmish Brawl".to_string(),
            description: "Knock your rival off their last stock with melee, specials and ultimates."
                .to_string(),
            min_players: 2,
            max_players: 2,
        }
    }

    fn init(&mut self, players: &[Player], config: &GameConfig) {
        let mut options = MatchOptions::from_game_config(config);
        if players.get(1).is_some_and(|p| p.is_cpu) {
            options.cpu = true;
        }
        let ids = [0, 1].map(|slot| players.get(slot).map_or(slot as PlayerId + 1, |p| p.id));
        let stage = stage::load_stage(options.stage);
        tracing::info!(
            stage = %options.stage,
            stocks = options.stocks,
            cpu = options.cpu,
            seed = options.seed,
            "Match initialized"
        );
        self.state = BrawlState::new(options, stage, ids);
        self.paused = false;
    }

    fn update(&mut self, dt: f32, inputs: &PlayerInputs) -> Vec<GameEvent> {
        if self.paused || self.state.round_complete {
            return Vec::new();
        }
        if !dt.is_finite() || dt <= 0.0 {
            tracing::debug!(dt, "Ignored tick with invalid dt");
            return Vec::new();
        }
        let dt = dt.min(self.game_config.max_dt);

        for (&player_id, bytes) in &inputs.inputs {
            self.apply_input(player_id, bytes);
        }

        self.state.clock += dt;
        let now = self.state.clock;
        let mut events = Vec::new();
        let mut out = TickOutbox::default();

        let state = &mut self.state;
        if state.options.cpu {
            let [human, cpu] = &mut state.fighters;
            let frame = bot::generate_bot_input(
                cpu,
                human,
                &mut state.rng_state,
                state.options.difficulty,
            );
            cpu.input.set_frame(frame);
        }
        for f in &mut state.fighters {
            f.input.begin_tick(now);
        }

        let env = TickEnv {
            stage: &state.stage,
            config: &self.game_config,
            dt,
        };
        {
            let [a, b] = &mut state.fighters;
            physics::tick_fighter(a, b, &env, &mut out);
            physics::tick_fighter(b, a, &env, &mut out);
        }
        self.absorb(&mut out, &mut events);

        for entry in self.state.scheduler.drain_due(now) {
            let (me, target) = pair_mut(&mut self.state.fighters, entry.source);
            abilities::run_scheduled(&entry, me, target, &mut out);
        }
        self.absorb(&mut out, &mut events);

        let state = &mut self.state;
        for well in &mut state.wells {
            for f in &mut state.fighters {
                well.pull(f, dt);
            }
            well.tick(dt);
        }
        state.wells.retain(|w| !w.is_expired());

        if state.options.hazards
            && let Some(hazard) = state.hazards.tick(
                dt,
                self.game_config.hazard_interval,
                &mut state.rng_state,
                &state.stage,
            )
        {
            tracing::trace!(x = hazard.x, "Hazard dropped");
            state.projectiles.push(hazard);
        }

        for p in &mut state.projectiles {
            p.advance(dt, self.game_config.projectile_gravity, &state.stage);
            p.resolve_hits(&mut state.fighters, &mut out);
        }
        state.projectiles.retain(Projectile::is_live);
        self.absorb(&mut out, &mut events);

        self.state.cosmetics.record(&events);
        self.state.cosmetics.tick(dt);

        self.check_match_over(&mut events);
        events
    }

    arena_game_boilerplate!(state_type: BrawlState);

    fn apply_input(&mut self, player_id: PlayerId, input: &[u8]) {
        match rmp_serde::from_slice::<ControlFrame>(input) {
            Ok(frame) => self.set_controls(player_id, frame),
            Err(e) => {
                tracing::debug!(player_id, error = %e, "Dropped malformed control frame");
            },
        }
    }

    fn round_results(&self) -> Vec<PlayerScore> {
        self.state
            .fighters
            .iter()
            .map(|f| PlayerScore {
                player_id: f.id,
                score: scoring::calculate_score(f.id, f.stocks, self.state.outcome),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Control;
    use skirmish_core::test_helpers::{self, default_config, make_players};

    const DT: f32 = 1.0 / 60.0;

    fn started() -> BrawlMatch {
        let mut game = BrawlMatch::default();
        game.init(&make_players(2), &default_config(3));
        game
    }

    fn tap(control: Control) -> Vec<u8> {
        rmp_serde::to_vec(&ControlFrame::default().with(control)).unwrap()
    }

    #[test]
    fn contract_init() {
        let mut game = BrawlMatch::default();
        test_helpers::contract_init_creates_player_state(&mut game, 2);
    }

    #[test]
    fn contract_apply_input() {
        let mut game = started();
        test_helpers::contract_apply_input_changes_state(&mut game, &tap(Control::Right), 1);
    }

    #[test]
    fn contract_update() {
        let mut game = started();
        test_helpers::contract_update_advances_time(&mut game);
    }

    #[test]
    fn contract_roundtrip() {
        let mut game = started();
        test_helpers::run_game_ticks(&mut game, 30, DT);
        test_helpers::contract_state_roundtrip_preserves(&mut game);
    }

    #[test]
    fn contract_pause() {
        let mut game = started();
        test_helpers::contract_pause_stops_updates(&mut game);
    }

    #[test]
    fn contract_results() {
        let game = started();
        test_helpers::contract_round_results_complete(&game, 2);
    }

    #[test]
    fn init_reads_custom_options() {
        let mut config = default_config(2);
        config
            .custom
            .insert("stage".to_string(), serde_json::json!("small"));
        config
            .custom
            .insert("cpu".to_string(), serde_json::json!(true));
        let mut game = BrawlMatch::default();
        game.init(&make_players(2), &config);
        assert_eq!(game.state.fighters[0].stocks, 2);
        assert_eq!(game.state.stage.platforms.len(), 1);
        assert!(game.state.fighters[1].is_cpu);
        assert!(!game.state.fighters[0].is_cpu);
    }

    #[test]
    fn non_finite_dt_is_ignored() {
        let mut game = started();
        let before = game.serialize_state();
        assert!(game.update(f32::NAN, &PlayerInputs::default()).is_empty());
        game.update(f32::INFINITY, &PlayerInputs::default());
        game.update(-1.0, &PlayerInputs::default());
        assert_eq!(before, game.serialize_state());
    }

    #[test]
    fn dt_is_clamped() {
        let mut game = started();
        game.update(1.0, &PlayerInputs::default());
        assert!((game.state.clock - 1.0 / 30.0).abs() < 1e-6);
    }

    #[test]
    fn malformed_input_is_dropped() {
        let mut game = started();
        let before = game.state.fighters[0].input.clone();
        game.apply_input(1, &[0xc1, 0xff, 0x00]);
        assert_eq!(game.state.fighters[0].input, before);
    }

    #[test]
    fn key_events_route_by_binding() {
        let mut game = started();
        assert!(game.key_event("KeyD", true));
        assert!(game.key_event("ArrowLeft", true));
        assert!(!game.key_event("KeyZ", true));
        game.update(DT, &PlayerInputs::default());
        assert!(game.state.fighters[0].input.is_down(Control::Right));
        assert!(game.state.fighters[1].input.is_down(Control::Left));
    }

    #[test]
    fn inputs_in_update_are_applied() {
        let mut game = started();
        let mut inputs = PlayerInputs::default();
        inputs.inputs.insert(2, tap(Control::Left));
        game.update(DT, &inputs);
        assert!(game.state.fighters[1].input.is_down(Control::Left));
    }

    #[test]
    fn multi_first_hit_lands_same_tick() {
        let mut game = started();
        game.state.options.fighters[0].special = Some(abilities::Special::Multi);
        game.rematch();
        let [a, b] = &mut game.state.fighters;
        a.x = 500.0;
        a.y = 540.0;
        a.grounded = true;
        b.x = 560.0;
        b.y = 540.0;
        b.grounded = true;

        game.apply_input(1, &tap(Control::Special));
        let events = game.update(DT, &PlayerInputs::default());
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::Hit {
                attacker: Some(1),
                defender: 2,
                ..
            }
        )));
        assert_eq!(game.state.scheduler.len(), 2);
    }

    #[test]
    fn scheduled_hits_drop_after_respawn() {
        let mut game = started();
        game.state.options.fighters[0].special = Some(abilities::Special::Multi);
        game.rematch();
        game.apply_input(1, &tap(Control::Special));
        game.update(DT, &PlayerInputs::default());
        assert_eq!(game.state.scheduler.len(), 2);

        let f = &mut game.state.fighters[0];
        f.lose_stock(0.0);
        f.respawn(&game.state.stage);
        let damage_before = game.state.fighters[1].damage;
        for _ in 0..40 {
            game.update(DT, &PlayerInputs::default());
        }
        assert!(game.state.scheduler.is_empty());
        assert_eq!(game.state.fighters[1].damage, damage_before);
    }

    #[test]
    fn cpu_match_is_deterministic() {
        let mut config = default_config(3);
        config
            .custom
            .insert("cpu".to_string(), serde_json::json!(true));
        config
            .custom
            .insert("difficulty".to_string(), serde_json::json!("hard"));
        let mut a = BrawlMatch::default();
        let mut b = BrawlMatch::default();
        a.init(&make_players(2), &config);
        b.init(&make_players(2), &config);
        for _ in 0..600 {
            a.update(DT, &PlayerInputs::default());
            b.update(DT, &PlayerInputs::default());
        }
        assert_eq!(a.serialize_state(), b.serialize_state());
    }

    #[test]
    fn rematch_restores_stocks() {
        let mut game = started();
        game.state.fighters[0].lose_stock(2.0);
        game.state.fighters[1].damage = 80.0;
        game.rematch();
        assert_eq!(game.state.fighters[0].stocks, 3);
        assert!(game.state.fighters[0].alive);
        assert_eq!(game.state.fighters[1].damage, 0.0);
        assert_eq!(game.state.clock, 0.0);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn frame_strategy() -> impl Strategy<Value = ControlFrame> {
            prop::array::uniform7(any::<bool>()).prop_map(|b| ControlFrame {
                left: b[0],
                right: b[1],
                up: b[2],
                down: b[3],
                attack: b[4],
                special: b[5],
                ultimate: b[6],
            })
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(48))]

            #[test]
            fn fighter_invariants_hold(
                frames in prop::collection::vec((frame_strategy(), frame_strategy()), 1..240),
                seed in any::<u64>(),
            ) {
                let mut config = default_config(3);
                config.custom.insert("seed".to_string(), serde_json::json!(seed));
                config.custom.insert("hazards".to_string(), serde_json::json!(true));
                let mut game = BrawlMatch::default();
                game.init(&make_players(2), &config);
                for (f1, f2) in frames {
                    game.set_controls(1, f1);
                    game.set_controls(2, f2);
                    game.update(DT, &PlayerInputs::default());
                    for f in &game.state().fighters {
                        prop_assert!(f.damage >= 0.0);
                        prop_assert!(f.stocks <= 3);
                        prop_assert!((0.0..=100.0).contains(&f.charge));
                        prop_assert!(!(f.grounded && f.is_hanging()));
                        prop_assert!(f.on_platform.is_none() || f.grounded);
                        prop_assert!(f.attack_cooldown >= 0.0);
                        prop_assert!(f.hitstun >= 0.0);
                    }
                }
            }
        }
    }
}
