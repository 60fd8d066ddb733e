use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use skirmish_brawl::BrawlMatch;
use skirmish_headless::config::HostConfig;
use skirmish_headless::runner::{self, TickSnapshot};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let subscriber = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env());
    if std::env::var("SKIRMISH_LOG_JSON").is_ok_and(|v| v == "1") {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let path = std::env::args().nth(1);
    let config = HostConfig::load(path.as_deref());
    tracing::info!("Skirmish headless host starting");

    let (tx, rx) = watch::channel::<Option<TickSnapshot>>(None);
    let observer = tokio::spawn(runner::observe(rx));

    let report = runner::run_match(BrawlMatch::new(), &config, tx).await;
    if let Err(e) = observer.await {
        tracing::error!(error = %e, "Snapshot observer failed");
    }

    match report.winner {
        Some(id) if report.completed => {
            tracing::info!(winner = id, ticks = report.ticks, "Match finished");
        },
        None if report.completed => tracing::info!(ticks = report.ticks, "Match drawn"),
        _ => tracing::info!(ticks = report.ticks, "Match stopped at the time limit"),
    }
    for score in &report.results {
        tracing::info!(player_id = score.player_id, score = score.score, "Final score");
    }
}
