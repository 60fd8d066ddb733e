pub mod effect;
pub mod events;
pub mod game_trait;
pub mod player;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::collections::HashMap;

    use crate::events::GameEvent;
    use crate::game_trait::{ArenaGame, GameConfig, PlayerId, PlayerInputs, PlayerScore};
    use crate::player::{Player, PlayerColor};

    /// Create `n` test players with sequential IDs starting at 1.
    pub fn make_players(n: usize) -> Vec<Player> {
        (0..n)
            .map(|i| Player {
                id: i as PlayerId + 1,
                display_name: format!("Player{}", i + 1),
                color: PlayerColor::PALETTE[i % PlayerColor::PALETTE.len()],
                is_cpu: false,
            })
            .collect()
    }

    /// Create a default GameConfig with the given stock count.
    pub fn default_config(stock_count: u8) -> GameConfig {
        GameConfig {
            stock_count,
            custom: HashMap::new(),
        }
    }

    /// Run N game ticks with empty inputs, returning all accumulated events.
    pub fn run_game_ticks(game: &mut dyn ArenaGame, n: usize, dt: f32) -> Vec<GameEvent> {
        let empty = PlayerInputs::default();
        let mut all_events = Vec::new();
        for _ in 0..n {
            all_events.extend(game.update(dt, &empty));
        }
        all_events
    }

    /// Assert that the game's serialized state differs from `before`.
    pub fn assert_game_state_changed(game: &dyn ArenaGame, before: &[u8]) {
        let after = game.serialize_state();
        assert_ne!(
            before,
            &after[..],
            "Game state should have changed after operation"
        );
    }

    // ================================================================
    // Game Trait Contract Tests
    // ================================================================
    // Every ArenaGame implementation must pass these. Game crates call
    // them from their own #[cfg(test)] modules with a concrete instance.

    /// After init() with N players, serialize_state() must return non-empty bytes.
    pub fn contract_init_creates_player_state(game: &mut dyn ArenaGame, player_count: usize) {
        let players = make_players(player_count);
        game.init(&players, &default_config(3));
        let state = game.serialize_state();
        assert!(
            !state.is_empty(),
            "serialize_state() must return non-empty bytes after init"
        );
    }

    /// apply_input() with valid data followed by update() must change state.
    pub fn contract_apply_input_changes_state(
        game: &mut dyn ArenaGame,
        valid_input: &[u8],
        player_id: PlayerId,
    ) {
        let before = game.serialize_state();
        game.apply_input(player_id, valid_input);
        game.update(1.0 / 60.0, &PlayerInputs::default());
        assert_game_state_changed(game, &before);
    }

    /// update() with dt>0 must advance the match clock.
    pub fn contract_update_advances_time(game: &mut dyn ArenaGame) {
        let before = game.serialize_state();
        game.update(1.0 / 60.0, &PlayerInputs::default());
        assert_game_state_changed(game, &before);
    }

    /// serialize_state → apply_state roundtrip must be stable.
    pub fn contract_state_roundtrip_preserves(game: &mut dyn ArenaGame) {
        let state_a = game.serialize_state();
        game.apply_state(&state_a);
        let state_b = game.serialize_state();
        assert_eq!(
            state_a, state_b,
            "State must be identical after serialize→apply→serialize"
        );
    }

    /// pause() must freeze the simulation, resume() must unfreeze it.
    pub fn contract_pause_stops_updates(game: &mut dyn ArenaGame) {
        game.pause();
        let before = game.serialize_state();
        let empty = PlayerInputs::default();
        game.update(1.0 / 60.0, &empty);
        let during_pause = game.serialize_state();
        assert_eq!(before, during_pause, "State must not change while paused");

        game.resume();
        game.update(1.0 / 60.0, &empty);
        assert_game_state_changed(game, &during_pause);
    }

    /// round_results() must return an entry for each fighter.
    pub fn contract_round_results_complete(
        game: &dyn ArenaGame,
        expected_players: usize,
    ) -> Vec<PlayerScore> {
        let results = game.round_results();
        assert_eq!(
            results.len(),
            expected_players,
            "round_results must have one entry per fighter"
        );
        results
    }
}
