use serde::{Deserialize, Serialize};

use knightfall_core::game_trait::ScoreSnapshot;

use crate::config::ProgressionConfig;

/// Session counters shown to the players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBoard {
    pub score: u32,
    /// 1-based level counter.
    pub level: u32,
    /// Pickups held toward the victory quota (net of death penalties).
    pub total_pickups: u32,
}

impl Default for ScoreBoard {
    fn default() -> Self {
        Self {
            score: 0,
            level: 1,
            total_pickups: 0,
        }
    }
}

impl ScoreBoard {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Award one pickup: `score_per_pickup * level` points.
    pub fn collect(&mut self, config: &ProgressionConfig) {
        self.score = self
            .score
            .saturating_add(config.score_per_pickup.saturating_mul(self.level));
        self.total_pickups = self.total_pickups.saturating_add(1);
    }

    /// Remove one pickup for a death. Returns false (and changes nothing)
    /// when there was none to lose.
    pub fn apply_death_penalty(&mut self) -> bool {
        if self.total_pickups == 0 {
            return false;
        }
        self.total_pickups -= 1;
        true
    }

    pub fn level_up(&mut self) {
        self.level = self.level.saturating_add(1);
    }

    pub fn reached_victory(&self, config: &ProgressionConfig) -> bool {
        self.total_pickups >= config.victory_pickups
    }

    pub fn snapshot(&self) -> ScoreSnapshot {
        ScoreSnapshot {
            score: self.score,
            level: self.level,
            total_pickups: self.total_pickups,
        }
    }
}

/// Receives every change of (score, level, total pickups).
pub trait ScoreObserver: Send {
    fn score_changed(&mut self, snapshot: ScoreSnapshot);
}

impl<F> ScoreObserver for F
where
    F: FnMut(ScoreSnapshot) + Send,
{
    fn score_changed(&mut self, snapshot: ScoreSnapshot) {
        self(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_scales_with_level() {
        let cfg = ProgressionConfig::default();
        let mut board = ScoreBoard::default();
        board.collect(&cfg);
        assert_eq!(board.score, 10);
        board.level_up();
        board.level_up();
        board.collect(&cfg);
        assert_eq!(board.score, 40);
        assert_eq!(board.total_pickups, 2);
    }

    #[test]
    fn death_penalty_never_goes_negative() {
        let mut board = ScoreBoard::default();
        assert!(!board.apply_death_penalty());
        assert_eq!(board.total_pickups, 0);

        board.total_pickups = 2;
        assert!(board.apply_death_penalty());
        assert_eq!(board.total_pickups, 1);
    }

    #[test]
    fn victory_at_quota() {
        let cfg = ProgressionConfig::default();
        let mut board = ScoreBoard {
            total_pickups: 49,
            ..ScoreBoard::default()
        };
        assert!(!board.reached_victory(&cfg));
        board.collect(&cfg);
        assert!(board.reached_victory(&cfg));
    }

    #[test]
    fn reset_restores_level_one() {
        let mut board = ScoreBoard {
            score: 300,
            level: 4,
            total_pickups: 12,
        };
        board.reset();
        assert_eq!(
            board.snapshot(),
            ScoreSnapshot {
                score: 0,
                level: 1,
                total_pickups: 0
            }
        );
    }

    #[test]
    fn closures_are_observers() {
        let mut seen = Vec::new();
        {
            let mut observer = |s: ScoreSnapshot| seen.push(s.score);
            observer.score_changed(ScoreSnapshot::default());
        }
        assert_eq!(seen, vec![0]);
    }
}
