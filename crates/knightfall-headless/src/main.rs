use std::str::FromStr;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use knightfall_coop::config::KnightfallConfig;
use knightfall_headless::game_loop::{SimBroadcast, SimCommand, SimSessionConfig, spawn_session};

/// Value of the first `--name=value` argument matching `prefix`.
fn arg<T: FromStr>(prefix: &str) -> Option<T> {
    std::env::args()
        .skip(1)
        .find_map(|a| a.strip_prefix(prefix).map(String::from))
        .and_then(|v| v.parse::<T>().ok())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let secs = arg::<u64>("--secs=").unwrap_or(30);
    let max_ticks = arg::<u64>("--ticks=");

    let mut game = KnightfallConfig::load();
    if let Some(seed) = arg::<u64>("--seed=") {
        game.seed = Some(seed);
    }
    tracing::info!(
        secs,
        seed = ?game.seed,
        tick_rate = game.tick_rate_hz,
        "Starting headless session"
    );

    let (cmd_tx, mut broadcast_rx, handle) = spawn_session(SimSessionConfig {
        game,
        bots: true,
        autostart: true,
        max_ticks,
    });

    let deadline = tokio::time::sleep(Duration::from_secs(secs));
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            msg = broadcast_rx.recv() => {
                match msg {
                    Some(SimBroadcast::Event(event)) => tracing::info!(?event, "Game event"),
                    Some(SimBroadcast::Snapshot { .. }) => {},
                    Some(SimBroadcast::Ended) | None => break,
                }
            }
            _ = &mut deadline => {
                tracing::info!(secs, "Time limit reached, stopping session");
                let _ = cmd_tx.send(SimCommand::Stop);
                break;
            }
        }
    }

    match handle.await {
        Ok(summary) => tracing::info!(
            ticks = summary.ticks,
            outcome = ?summary.outcome,
            score = summary.final_score.score,
            level = summary.final_score.level,
            pickups = summary.final_score.total_pickups,
            "Session finished"
        ),
        Err(e) => tracing::error!(error = %e, "Session task failed"),
    }
}
