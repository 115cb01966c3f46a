use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use knightfall_coop::config::KnightfallConfig;
use knightfall_coop::mode::MenuInput;
use knightfall_coop::{InputEvent, KnightfallGame};
use knightfall_core::game_trait::{GameEvent, ScoreSnapshot, SessionOutcome, SimGame};
use knightfall_core::player::PlayerSlot;

use crate::bot::generate_bot_input;

/// Commands sent from the host front end to the tick loop.
#[derive(Debug)]
pub enum SimCommand {
    /// MessagePack-encoded [`InputEvent`].
    Input(Vec<u8>),
    Stop,
}

/// Messages sent from the tick loop to the host front end.
#[derive(Debug, Clone)]
pub enum SimBroadcast {
    /// Serialized `SessionState` after a tick.
    Snapshot { frame: u64, state: Vec<u8> },
    Event(GameEvent),
    /// Signal that the loop has exited.
    Ended,
}

/// Configuration for a headless session.
#[derive(Debug, Clone, Default)]
pub struct SimSessionConfig {
    pub game: KnightfallConfig,
    /// Drive both knights with the built-in bot during active play.
    pub bots: bool,
    /// Skip the intro and start a session from the main menu.
    pub autostart: bool,
    /// Stop after this many ticks.
    pub max_ticks: Option<u64>,
}

/// What the loop observed before exiting.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub ticks: u64,
    pub outcome: Option<SessionOutcome>,
    pub final_score: ScoreSnapshot,
}

/// Spawn a session tick loop as a tokio task.
/// Returns the command sender, the broadcast receiver and the task handle.
pub fn spawn_session(
    config: SimSessionConfig,
) -> (
    mpsc::UnboundedSender<SimCommand>,
    mpsc::UnboundedReceiver<SimBroadcast>,
    JoinHandle<SessionSummary>,
) {
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (broadcast_tx, broadcast_rx) = mpsc::unbounded_channel();

    let handle = tokio::spawn(async move {
        let mut game = KnightfallGame::with_config(config.game.clone());
        run_tick_loop(&mut game, &config, cmd_rx, broadcast_tx).await
    });

    (cmd_tx, broadcast_rx, handle)
}

fn apply_event(game: &mut KnightfallGame, event: InputEvent) {
    match rmp_serde::to_vec(&event) {
        Ok(bytes) => game.apply_input(&bytes),
        Err(e) => tracing::error!(error = %e, "Failed to encode input"),
    }
}

async fn run_tick_loop(
    game: &mut KnightfallGame,
    config: &SimSessionConfig,
    mut cmd_rx: mpsc::UnboundedReceiver<SimCommand>,
    broadcast_tx: mpsc::UnboundedSender<SimBroadcast>,
) -> SessionSummary {
    let metadata = game.metadata();
    tracing::info!(
        game = %metadata.name,
        players = metadata.player_count,
        bots = config.bots,
        "Session loop starting"
    );

    if config.autostart {
        // Intro -> main menu -> start.
        apply_event(game, InputEvent::Menu(MenuInput::Confirm));
        apply_event(game, InputEvent::Menu(MenuInput::Confirm));
    }

    let tick_rate = game.tick_rate();
    let dt = 1.0 / tick_rate;
    let mut interval = tokio::time::interval(Duration::from_secs_f32(dt));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let mut ticks: u64 = 0;
    let mut outcome = None;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if config.bots && game.is_active() {
                    for slot in PlayerSlot::ALL {
                        for event in generate_bot_input(game.state(), slot) {
                            apply_event(game, event);
                        }
                    }
                }

                ticks += 1;
                let events = game.update(dt);

                let _ = broadcast_tx.send(SimBroadcast::Snapshot {
                    frame: game.state().frame,
                    state: game.serialize_state(),
                });

                let mut quit = false;
                for event in events {
                    match &event {
                        GameEvent::SessionEnded { outcome: o } => outcome = Some(*o),
                        GameEvent::QuitRequested => quit = true,
                        _ => {},
                    }
                    let _ = broadcast_tx.send(SimBroadcast::Event(event));
                }

                if quit {
                    tracing::info!(ticks, "Quit requested");
                    break;
                }
                if game.is_session_over() {
                    tracing::info!(ticks, outcome = ?outcome, "Session over");
                    break;
                }
                if config.max_ticks.is_some_and(|max| ticks >= max) {
                    tracing::debug!(ticks, "Tick limit reached");
                    break;
                }
            }
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(SimCommand::Input(data)) => game.apply_input(&data),
                    Some(SimCommand::Stop) | None => {
                        break;
                    },
                }
            }
        }
    }

    let _ = broadcast_tx.send(SimBroadcast::Ended);

    SessionSummary {
        ticks,
        outcome,
        final_score: game.state().scores.snapshot(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use knightfall_coop::SessionState;
    use knightfall_coop::mode::Mode;

    fn fast_config() -> SimSessionConfig {
        let mut game = KnightfallConfig::default();
        game.tick_rate_hz = 1000.0;
        game.seed = Some(3);
        SimSessionConfig {
            game,
            ..SimSessionConfig::default()
        }
    }

    async fn drain(rx: &mut mpsc::UnboundedReceiver<SimBroadcast>) -> Vec<SimBroadcast> {
        let mut all = Vec::new();
        while let Some(msg) = rx.recv().await {
            let ended = matches!(msg, SimBroadcast::Ended);
            all.push(msg);
            if ended {
                break;
            }
        }
        all
    }

    #[tokio::test]
    async fn session_runs_until_tick_limit() {
        let config = SimSessionConfig {
            autostart: true,
            max_ticks: Some(30),
            ..fast_config()
        };
        let (_cmd_tx, mut rx, handle) = spawn_session(config);

        let all = drain(&mut rx).await;
        let summary = handle.await.expect("loop should not panic");

        assert_eq!(summary.ticks, 30);
        assert_eq!(summary.outcome, None);
        let snapshots = all
            .iter()
            .filter(|m| matches!(m, SimBroadcast::Snapshot { .. }))
            .count();
        assert_eq!(snapshots, 30);
        assert!(
            all.iter()
                .any(|m| matches!(m, SimBroadcast::Event(GameEvent::SessionStarted))),
            "autostart should start a session"
        );
        assert!(matches!(all.last(), Some(SimBroadcast::Ended)));
    }

    #[tokio::test]
    async fn snapshots_decode_to_session_state() {
        let config = SimSessionConfig {
            autostart: true,
            max_ticks: Some(5),
            ..fast_config()
        };
        let (_cmd_tx, mut rx, handle) = spawn_session(config);
        let all = drain(&mut rx).await;
        handle.await.expect("loop should not panic");

        let Some(SimBroadcast::Snapshot { frame, state }) = all
            .iter()
            .rev()
            .find(|m| matches!(m, SimBroadcast::Snapshot { .. }))
        else {
            panic!("expected a snapshot");
        };
        let decoded: SessionState = rmp_serde::from_slice(state).expect("snapshot decodes");
        assert_eq!(decoded.frame, *frame);
        assert_eq!(decoded.frame, 5);
        assert_eq!(decoded.mode.mode, Mode::ActivePlay);
    }

    #[tokio::test]
    async fn stop_command_ends_loop() {
        let (cmd_tx, mut rx, handle) = spawn_session(fast_config());
        // Wait for the loop to tick at least once.
        let first = rx.recv().await.expect("should receive broadcast");
        assert!(matches!(first, SimBroadcast::Snapshot { .. }));

        cmd_tx.send(SimCommand::Stop).expect("loop is running");
        let all = drain(&mut rx).await;
        let summary = handle.await.expect("loop should not panic");
        assert!(matches!(all.last(), Some(SimBroadcast::Ended)));
        assert!(summary.ticks >= 1);
    }

    #[tokio::test]
    async fn dropped_sender_ends_loop() {
        let (cmd_tx, mut rx, handle) = spawn_session(fast_config());
        drop(cmd_tx);
        let all = drain(&mut rx).await;
        handle.await.expect("loop should not panic");
        assert!(matches!(all.last(), Some(SimBroadcast::Ended)));
    }

    #[tokio::test]
    async fn input_reaches_game() {
        let (cmd_tx, mut rx, handle) = spawn_session(fast_config());
        let confirm =
            rmp_serde::to_vec(&InputEvent::Menu(MenuInput::Confirm)).expect("input encodes");
        cmd_tx.send(SimCommand::Input(confirm)).expect("loop is running");

        let mut reached_menu = false;
        while let Some(msg) = rx.recv().await {
            if let SimBroadcast::Snapshot { state, .. } = msg {
                let decoded: SessionState =
                    rmp_serde::from_slice(&state).expect("snapshot decodes");
                if decoded.mode.mode == Mode::Menu {
                    reached_menu = true;
                    break;
                }
            }
        }
        cmd_tx.send(SimCommand::Stop).expect("loop is running");
        handle.await.expect("loop should not panic");
        assert!(reached_menu, "confirm on the intro should open the menu");
    }

    #[tokio::test]
    async fn quit_from_pause_ends_loop() {
        let config = SimSessionConfig {
            autostart: true,
            ..fast_config()
        };
        let (cmd_tx, mut rx, handle) = spawn_session(config);
        // Pause, move the cursor to Quit, confirm.
        for input in [
            MenuInput::Cancel,
            MenuInput::Down,
            MenuInput::Down,
            MenuInput::Confirm,
        ] {
            let bytes = rmp_serde::to_vec(&InputEvent::Menu(input)).expect("input encodes");
            cmd_tx.send(SimCommand::Input(bytes)).expect("loop is running");
        }

        let all = drain(&mut rx).await;
        let summary = handle.await.expect("loop should not panic");
        assert!(
            all.iter()
                .any(|m| matches!(m, SimBroadcast::Event(GameEvent::QuitRequested)))
        );
        assert_eq!(summary.outcome, Some(SessionOutcome::Abandoned));
    }

    #[tokio::test]
    async fn bots_move_the_knights() {
        let config = SimSessionConfig {
            autostart: true,
            bots: true,
            max_ticks: Some(60),
            ..fast_config()
        };
        let spawn_x = {
            let game = KnightfallGame::with_config(config.game.clone());
            game.state().characters.each_ref().map(|c| c.x)
        };
        let (_cmd_tx, mut rx, handle) = spawn_session(config);
        let all = drain(&mut rx).await;
        handle.await.expect("loop should not panic");

        let Some(SimBroadcast::Snapshot { state, .. }) = all
            .iter()
            .rev()
            .find(|m| matches!(m, SimBroadcast::Snapshot { .. }))
        else {
            panic!("expected a snapshot");
        };
        let decoded: SessionState = rmp_serde::from_slice(state).expect("snapshot decodes");
        let moved = decoded
            .characters
            .iter()
            .zip(spawn_x)
            .any(|(c, x)| (c.x - x).abs() > 1.0);
        assert!(moved, "bots should chase the first pickup batch");
    }
}
