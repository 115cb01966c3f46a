pub mod game_trait;
pub mod geometry;
pub mod player;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::game_trait::{GameEvent, SimGame};

    /// Nominal tick length at 60 Hz.
    pub const TICK_DT: f32 = 1.0 / 60.0;

    /// Run N game ticks, returning all accumulated events.
    pub fn run_game_ticks(game: &mut dyn SimGame, n: usize, dt: f32) -> Vec<GameEvent> {
        let mut all_events = Vec::new();
        for _ in 0..n {
            all_events.extend(game.update(dt));
        }
        all_events
    }

    /// Assert that the game's serialized state differs from `before`.
    pub fn assert_game_state_changed(game: &dyn SimGame, before: &[u8]) {
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
    // Every SimGame implementation must pass these. Game crates call them
    // from their own #[cfg(test)] modules with a concrete game instance.

    /// serialize_state() must return non-empty bytes.
    pub fn contract_state_nonempty(game: &dyn SimGame) {
        let state = game.serialize_state();
        assert!(
            !state.is_empty(),
            "serialize_state() must return non-empty bytes"
        );
    }

    /// An active game must change state over a tick.
    pub fn contract_active_update_changes_state(game: &mut dyn SimGame) {
        assert!(game.is_active(), "game must be active for this contract");
        let before = game.serialize_state();
        game.update(TICK_DT);
        assert_game_state_changed(game, &before);
    }

    /// Garbage input bytes must be dropped without touching state.
    pub fn contract_malformed_input_ignored(game: &mut dyn SimGame) {
        let before = game.serialize_state();
        game.apply_input(&[0xc1, 0xff, 0x00]);
        let after = game.serialize_state();
        assert_eq!(before, after, "Malformed input must not change state");
    }

    /// serialize_state → apply_state must be stable after one roundtrip.
    pub fn contract_state_roundtrip_preserves(game: &mut dyn SimGame) {
        let state_a = game.serialize_state();
        game.apply_state(&state_a);
        let state_b = game.serialize_state();
        assert_eq!(
            state_a, state_b,
            "State must be stable after serialize→apply→serialize roundtrip"
        );
    }

    /// Malformed snapshots must be ignored.
    pub fn contract_malformed_state_ignored(game: &mut dyn SimGame) {
        let before = game.serialize_state();
        game.apply_state(&[0x00, 0x01, 0x02]);
        let after = game.serialize_state();
        assert_eq!(before, after, "Malformed state must be ignored");
    }
}
