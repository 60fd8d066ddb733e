use std::time::Duration;

use tokio::sync::watch;

use skirmish_brawl::bot::{self, Difficulty};
use skirmish_brawl::{BrawlMatch, BrawlState};
use skirmish_core::events::GameEvent;
use skirmish_core::game_trait::{ArenaGame, PlayerId, PlayerInputs, PlayerScore};
use skirmish_core::player::{Player, PlayerColor};

use crate::config::HostConfig;

/// Salt for the host's own autopilot generator, kept apart from the match RNG.
const AUTOPILOT_SALT: u64 = 0x5EED_F00D;

/// One published tick. Observers get their own copy and never touch the match.
#[derive(Debug, Clone)]
pub struct TickSnapshot {
    pub tick: u64,
    pub state: BrawlState,
}

/// How a hosted match ended.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchReport {
    pub ticks: u64,
    pub clock: f32,
    pub winner: Option<PlayerId>,
    pub completed: bool,
    pub results: Vec<PlayerScore>,
}

pub fn make_players(config: &HostConfig) -> Vec<Player> {
    config
        .names
        .iter()
        .enumerate()
        .map(|(i, name)| Player {
            id: i as PlayerId + 1,
            display_name: name.clone(),
            color: PlayerColor::PALETTE[i % PlayerColor::PALETTE.len()],
            is_cpu: i == 1 && config.match_options.cpu,
        })
        .collect()
}

/// Run one match to completion (or the time limit), publishing every tick on `tx`.
pub async fn run_match(
    mut game: BrawlMatch,
    config: &HostConfig,
    tx: watch::Sender<Option<TickSnapshot>>,
) -> MatchReport {
    let players = make_players(config);
    game.init(&players, &config.match_options.to_game_config());

    let tick_rate = game.tick_rate();
    let dt = 1.0 / tick_rate;
    let mut interval = tokio::time::interval(Duration::from_secs_f32(dt));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let difficulty = config
        .match_options
        .difficulty
        .parse::<Difficulty>()
        .unwrap_or_default();
    let mut autopilot_rng = config.match_options.seed ^ AUTOPILOT_SALT;
    let mut tick: u64 = 0;
    let mut winner = None;

    tracing::info!(
        tick_rate,
        realtime = config.realtime,
        autopilot = config.autopilot,
        "Match loop starting"
    );

    while !game.is_round_complete() && game.state().clock < config.max_match_secs {
        if config.realtime {
            interval.tick().await;
        } else {
            tokio::task::yield_now().await;
        }

        let mut inputs = PlayerInputs::default();
        if config.autopilot {
            let [me, target] = &game.state().fighters;
            let frame = bot::generate_bot_input(me, target, &mut autopilot_rng, difficulty);
            match rmp_serde::to_vec(&frame) {
                Ok(bytes) => {
                    inputs.inputs.insert(me.id, bytes);
                },
                Err(e) => tracing::error!(tick, error = %e, "Failed to encode autopilot input"),
            }
        }

        tick += 1;
        let events = game.update(dt, &inputs);
        for event in &events {
            log_event(tick, event);
            if let GameEvent::MatchOver { winner: w } = event {
                winner = *w;
            }
        }

        tx.send_replace(Some(TickSnapshot {
            tick,
            state: game.state().clone(),
        }));
    }

    let completed = game.is_round_complete();
    if !completed {
        tracing::warn!(
            clock = game.state().clock,
            "Match hit the time limit without a winner"
        );
    }
    MatchReport {
        ticks: tick,
        clock: game.state().clock,
        winner,
        completed,
        results: game.round_results(),
    }
}

fn log_event(tick: u64, event: &GameEvent) {
    match event {
        GameEvent::Hit {
            attacker,
            defender,
            damage,
            ..
        } => tracing::debug!(tick, ?attacker, defender, damage, "Hit"),
        GameEvent::AbilityUsed { player_id, ability } => {
            tracing::debug!(tick, player_id, ability = %ability, "Ability used");
        },
        GameEvent::StockUpdate { player_id, stocks } => {
            tracing::info!(tick, player_id, stocks, "Stocks changed");
        },
        _ => tracing::trace!(tick, ?event, "Event"),
    }
}

/// Follow published snapshots until the host drops its sender.
/// Returns the last tick seen.
pub async fn observe(mut rx: watch::Receiver<Option<TickSnapshot>>) -> u64 {
    let mut last_tick = 0;
    let mut last_stocks = None;
    while rx.changed().await.is_ok() {
        let snapshot = rx.borrow_and_update();
        let Some(snap) = snapshot.as_ref() else {
            continue;
        };
        last_tick = snap.tick;
        let [a, b] = &snap.state.fighters;
        let stocks = (a.stocks, b.stocks);
        if last_stocks != Some(stocks) {
            tracing::info!(
                tick = snap.tick,
                p1_stocks = a.stocks,
                p2_stocks = b.stocks,
                p1_damage = a.damage,
                p2_damage = b.damage,
                "Scoreboard"
            );
            last_stocks = Some(stocks);
        }
    }
    last_tick
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_brawl::config::BrawlConfig;

    fn fast_config() -> HostConfig {
        let mut config = HostConfig {
            realtime: false,
            autopilot: true,
            max_match_secs: 20.0,
            ..HostConfig::default()
        };
        config.match_options.difficulty = "hard".to_string();
        config
    }

    #[tokio::test]
    async fn runs_and_publishes_every_tick() {
        let config = fast_config();
        let (tx, rx) = watch::channel(None);
        let observer = tokio::spawn(observe(rx));

        let report = run_match(BrawlMatch::with_config(BrawlConfig::default()), &config, tx).await;
        let seen = observer.await.unwrap();

        assert!(report.ticks > 0);
        assert_eq!(seen, report.ticks);
        assert_eq!(report.results.len(), 2);
        assert!(report.completed || report.clock >= config.max_match_secs);
    }

    #[tokio::test]
    async fn same_seed_same_report() {
        let config = fast_config();
        let (tx_a, _rx_a) = watch::channel(None);
        let (tx_b, _rx_b) = watch::channel(None);
        let a = run_match(BrawlMatch::with_config(BrawlConfig::default()), &config, tx_a).await;
        let b = run_match(BrawlMatch::with_config(BrawlConfig::default()), &config, tx_b).await;
        assert_eq!(a, b);
    }

    #[test]
    fn cpu_flag_marks_second_player() {
        let players = make_players(&HostConfig::default());
        assert_eq!(players.len(), 2);
        assert!(!players[0].is_cpu);
        assert!(players[1].is_cpu);
    }
}
