pub mod character;
pub mod config;
pub mod coop;
pub mod effects;
pub mod hostile;
pub mod level;
pub mod mode;
pub mod physics;
pub mod pickups;
pub mod scheduler;
pub mod scoring;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use knightfall_core::game_trait::{
    DeathCause, GameEvent, GameMetadata, ScoreSnapshot, SessionOutcome, SimGame,
};
use knightfall_core::geometry::Aabb;
use knightfall_core::player::{PlayerColor, PlayerSlot};
use knightfall_core::sim_game_boilerplate;

use character::Character;
use config::{KnightfallConfig, PhysicsConfig};
use effects::{COLLECT_BURST, DAMAGE_BURST, Particle, REVIVE_BURST, spawn_burst, tick_particles};
use hostile::{
    HostileActor, Projectile, advance_projectiles, damage_for_level, resolve_projectile_hits,
};
use level::Level;
use mode::{MenuInput, Mode, ModeCommand, ModeState};
use physics::{MoveOutcome, tick_character};
use pickups::{Pickup, batch_cleared, batch_size, spawn_batch};
use scheduler::{DeferredKind, Scheduler, SessionId};
use scoring::{ScoreBoard, ScoreObserver};

/// Horizontal direction key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveDirection {
    Negative,
    Positive,
}

/// Host input, MessagePack-encoded for [`SimGame::apply_input`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Key-down (`held: true`) or key-up of a direction key.
    Move {
        slot: PlayerSlot,
        direction: MoveDirection,
        held: bool,
    },
    /// Jump key-down. Edge-triggered.
    Jump { slot: PlayerSlot },
    Menu(MenuInput),
}

/// Serializable snapshot of the whole session, handed to renderers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub session_id: SessionId,
    pub mode: ModeState,
    pub scores: ScoreBoard,
    pub characters: [Character; 2],
    pub level: Level,
    pub pickups: Vec<Pickup>,
    pub hostiles: Vec<HostileActor>,
    pub projectiles: Vec<Projectile>,
    pub particles: Vec<Particle>,
    pub gravity: f32,
    /// Advanced on every host tick, in every mode.
    pub frame: u64,
    /// Seconds of active play since the session started.
    pub clock: f64,
}

impl SessionState {
    pub fn new(level: Level, config: &KnightfallConfig) -> Self {
        let characters = PlayerSlot::ALL.map(|slot| {
            let (x, y) = level.spawn(slot);
            Character::new(slot, x, y)
        });
        let hostiles = place_hostiles(&level, config);
        Self {
            session_id: SessionId::new(),
            mode: ModeState::default(),
            scores: ScoreBoard::default(),
            characters,
            level,
            pickups: Vec::new(),
            hostiles,
            projectiles: Vec::new(),
            particles: Vec::new(),
            gravity: config.physics.gravity,
            frame: 0,
            clock: 0.0,
        }
    }

    pub fn character(&self, slot: PlayerSlot) -> &Character {
        &self.characters[slot.index()]
    }

    pub fn both_dead(&self) -> bool {
        self.characters.iter().all(|c| c.is_dead)
    }

    /// Fresh counters and entities under a new session id. The mode is left
    /// to the state machine.
    fn reset(&mut self, config: &KnightfallConfig) {
        self.session_id = SessionId::new();
        self.scores.reset();
        for c in self.characters.iter_mut() {
            c.reset_for_session();
        }
        self.pickups.clear();
        self.hostiles = place_hostiles(&self.level, config);
        self.projectiles.clear();
        self.particles.clear();
        self.gravity = config.physics.gravity;
        self.clock = 0.0;
    }
}

fn place_hostiles(level: &Level, config: &KnightfallConfig) -> Vec<HostileActor> {
    level
        .hostile_spawns
        .iter()
        .map(|&(x, y)| HostileActor::new(x, y, config.hostile.attack_delay))
        .collect()
}

/// The two-knight cooperative platformer.
pub struct KnightfallGame {
    config: KnightfallConfig,
    state: SessionState,
    scheduler: Scheduler,
    rng: StdRng,
    /// Counters as last reported to the host.
    last_reported: ScoreSnapshot,
    observer: Option<Box<dyn ScoreObserver>>,
    /// Events raised by input handling, returned by the next `update`.
    pending_events: Vec<GameEvent>,
}

impl KnightfallGame {
    pub fn new() -> Self {
        Self::with_config(KnightfallConfig::default())
    }

    pub fn with_config(config: KnightfallConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let state = SessionState::new(Level::castle(), &config);
        let last_reported = state.scores.snapshot();
        Self {
            config,
            state,
            scheduler: Scheduler::default(),
            rng,
            last_reported,
            observer: None,
            pending_events: Vec::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn config(&self) -> &KnightfallConfig {
        &self.config
    }

    /// Register a callback for (score, level, total pickups) changes.
    pub fn set_score_observer(&mut self, observer: impl ScoreObserver + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn handle_input(&mut self, input: InputEvent) {
        match input {
            InputEvent::Move {
                slot,
                direction: MoveDirection::Negative,
                held,
            } => self.set_move_negative(slot, held),
            InputEvent::Move {
                slot,
                direction: MoveDirection::Positive,
                held,
            } => self.set_move_positive(slot, held),
            InputEvent::Jump { slot } => self.press_jump(slot),
            InputEvent::Menu(menu) => self.menu_input(menu),
        }
    }

    /// Key presses only register during active play for a living
    /// character; releases always do.
    pub fn set_move_negative(&mut self, slot: PlayerSlot, held: bool) {
        if held && !self.accepts_press(slot) {
            return;
        }
        self.state.characters[slot.index()].input.move_negative = held;
    }

    pub fn set_move_positive(&mut self, slot: PlayerSlot, held: bool) {
        if held && !self.accepts_press(slot) {
            return;
        }
        self.state.characters[slot.index()].input.move_positive = held;
    }

    /// Latch a jump for the next movement tick. Only takes effect if the
    /// character is still grounded on that tick.
    pub fn press_jump(&mut self, slot: PlayerSlot) {
        if self.accepts_press(slot) {
            self.state.characters[slot.index()].input.jump = true;
        }
    }

    fn accepts_press(&self, slot: PlayerSlot) -> bool {
        self.state.mode.is_active() && self.state.character(slot).is_alive()
    }

    pub fn menu_input(&mut self, input: MenuInput) {
        match self.state.mode.handle(input) {
            ModeCommand::None => {},
            ModeCommand::StartSession => self.start_session(),
            ModeCommand::AbandonSession => self.abandon_session(),
            ModeCommand::Quit => {
                self.abandon_session();
                self.pending_events.push(GameEvent::QuitRequested);
            },
            ModeCommand::ResetScores => {
                self.scheduler.cancel_session(self.state.session_id);
                self.state.scores.reset();
                self.report_score();
            },
        }
    }

    fn start_session(&mut self) {
        self.reset_session();
        let count = batch_size(self.state.scores.level, &self.config.progression);
        self.state.pickups = spawn_batch(
            &self.state.level,
            count,
            self.config.progression.pickup_radius,
            &mut self.rng,
        );
        tracing::info!(session = %self.state.session_id, "Session started");
        self.pending_events.push(GameEvent::SessionStarted);
        self.report_score();
    }

    fn abandon_session(&mut self) {
        tracing::info!(session = %self.state.session_id, "Session abandoned, back to menu");
        self.pending_events.push(GameEvent::SessionEnded {
            outcome: SessionOutcome::Abandoned,
        });
        self.reset_session();
        self.report_score();
    }

    /// Cancel the old session's deferred work in the same step as the reset,
    /// so nothing scheduled before it can touch the new entities.
    fn reset_session(&mut self) {
        let dropped = self.scheduler.cancel_session(self.state.session_id);
        if dropped > 0 {
            tracing::debug!(dropped, "Cancelled deferred actions of previous session");
        }
        self.state.reset(&self.config);
    }

    fn end_session(&mut self, outcome: SessionOutcome) {
        if self.state.mode.end_session(outcome) {
            tracing::info!(
                session = %self.state.session_id,
                ?outcome,
                score = self.state.scores.score,
                level = self.state.scores.level,
                "Session ended"
            );
            self.pending_events.push(GameEvent::SessionEnded { outcome });
        }
    }

    fn report_score(&mut self) {
        let snapshot = self.state.scores.snapshot();
        if snapshot == self.last_reported {
            return;
        }
        self.last_reported = snapshot;
        if let Some(observer) = self.observer.as_mut() {
            observer.score_changed(snapshot);
        }
        self.pending_events.push(GameEvent::ScoreChanged(snapshot));
    }

    fn record_death(&mut self, slot: PlayerSlot, cause: DeathCause) {
        let penalized = self.state.scores.apply_death_penalty();
        tracing::debug!(?slot, ?cause, penalized, "Character died");
        self.pending_events.push(GameEvent::CharacterDied { slot, cause });
    }

    fn tick_active(&mut self, dt: f32) {
        self.state.clock += f64::from(dt);
        self.run_due_actions();
        self.run_physics();
        self.run_coop();
        self.run_hostiles();
        if self.run_pickups() {
            return;
        }
        if self.state.both_dead() {
            self.end_session(SessionOutcome::Defeat);
        }
        tick_particles(&mut self.state.particles);
    }

    fn run_due_actions(&mut self) {
        for kind in self
            .scheduler
            .take_due(self.state.clock, self.state.session_id)
        {
            match kind {
                DeferredKind::RespawnPickups { level } => {
                    let count = batch_size(level, &self.config.progression);
                    self.state.pickups = spawn_batch(
                        &self.state.level,
                        count,
                        self.config.progression.pickup_radius,
                        &mut self.rng,
                    );
                    tracing::debug!(level, count, "Placed new pickup batch");
                },
            }
        }
    }

    fn run_physics(&mut self) {
        let physics = PhysicsConfig {
            gravity: self.state.gravity,
            ..self.config.physics
        };
        for slot in PlayerSlot::ALL {
            let character = &mut self.state.characters[slot.index()];
            if tick_character(character, &self.state.level, &physics) == MoveOutcome::FellOut {
                self.record_death(slot, DeathCause::Fall);
            }
        }
    }

    fn run_coop(&mut self) {
        for slot in coop::tick_revives(&mut self.state.characters, &self.config.coop) {
            let (x, y) = self.state.characters[slot.index()].center();
            spawn_burst(
                &mut self.state.particles,
                x,
                y,
                REVIVE_BURST,
                PlayerColor::GREEN,
                &mut self.rng,
            );
            self.pending_events.push(GameEvent::CharacterRevived { slot });
        }

        let interval = self.config.coop.heal_effect_interval;
        if coop::tick_healing(&mut self.state.characters, &self.config.coop)
            && interval > 0
            && self.state.frame % interval == 0
        {
            for c in &self.state.characters {
                let (x, y) = c.center();
                spawn_burst(
                    &mut self.state.particles,
                    x,
                    y,
                    1,
                    PlayerColor::GREEN,
                    &mut self.rng,
                );
            }
        }
    }

    fn run_hostiles(&mut self) {
        let shots = hostile::tick_hostiles(
            &mut self.state.hostiles,
            &self.state.characters,
            &mut self.rng,
            &self.config.hostile,
        );
        self.state.projectiles.extend(shots);

        let area = Aabb::new(0.0, 0.0, self.state.level.width, self.state.level.height);
        advance_projectiles(&mut self.state.projectiles, &area, &self.config.hostile);

        let damage = damage_for_level(self.state.scores.level, &self.config.hostile);
        let hits = resolve_projectile_hits(
            &mut self.state.projectiles,
            &mut self.state.characters,
            damage,
            &self.config.hostile,
        );
        self.state.projectiles.retain(|p| p.active);

        for hit in hits {
            spawn_burst(
                &mut self.state.particles,
                hit.x,
                hit.y,
                DAMAGE_BURST,
                PlayerColor::DAMAGE,
                &mut self.rng,
            );
            if hit.killed {
                self.record_death(hit.slot, DeathCause::Projectile);
            }
        }
    }

    /// Returns true when this tick won the session.
    fn run_pickups(&mut self) -> bool {
        pickups::tick_pulse(&mut self.state.pickups);
        let taken = pickups::collect(&mut self.state.pickups, &self.state.characters);
        for pickup in taken {
            self.state.scores.collect(&self.config.progression);
            let color = self.state.characters[pickup.slot.index()].profile.color;
            for burst_color in [PlayerColor::GOLD, color] {
                spawn_burst(
                    &mut self.state.particles,
                    pickup.x,
                    pickup.y,
                    COLLECT_BURST,
                    burst_color,
                    &mut self.rng,
                );
            }
            self.pending_events.push(GameEvent::PickupCollected { slot: pickup.slot });

            if self.state.scores.reached_victory(&self.config.progression) {
                self.end_session(SessionOutcome::Victory);
                return true;
            }
        }

        if batch_cleared(&self.state.pickups) {
            self.level_up();
        }
        false
    }

    fn level_up(&mut self) {
        self.state.scores.level_up();
        let level = self.state.scores.level;
        for c in self.state.characters.iter_mut() {
            c.max_speed += self.config.progression.level_speed_bonus;
        }
        self.state.pickups.clear();

        let fire_at = self.state.clock + f64::from(self.config.progression.respawn_delay_secs);
        self.scheduler.schedule(
            self.state.session_id,
            fire_at,
            DeferredKind::RespawnPickups { level },
        );
        tracing::debug!(level, "Level up");
        self.pending_events.push(GameEvent::LevelUp { level });
    }
}

impl Default for KnightfallGame {
    fn default() -> Self {
        Self::new()
    }
}

impl SimGame for KnightfallGame {
    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "Knightfall".to_string(),
            description: "Two knights, one castle, fifty shields.".to_string(),
            player_count: 2,
        }
    }

    fn update(&mut self, dt: f32) -> Vec<GameEvent> {
        self.state.frame = self.state.frame.wrapping_add(1);
        if self.state.mode.is_active() {
            self.tick_active(dt);
        }
        self.report_score();
        std::mem::take(&mut self.pending_events)
    }

    fn apply_input(&mut self, input: &[u8]) {
        match rmp_serde::from_slice::<InputEvent>(input) {
            Ok(event) => self.handle_input(event),
            Err(e) => tracing::debug!(error = %e, "Dropped malformed input"),
        }
    }

    sim_game_boilerplate!(state_type: SessionState);

    fn tick_rate(&self) -> f32 {
        self.config.tick_rate_hz
    }

    fn is_active(&self) -> bool {
        self.state.mode.is_active()
    }

    fn is_session_over(&self) -> bool {
        matches!(self.state.mode.mode, Mode::Victory | Mode::Defeat)
    }
}
