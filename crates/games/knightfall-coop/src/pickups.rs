use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use knightfall_core::geometry::circle_touches_box;
use knightfall_core::player::PlayerSlot;

use crate::character::Character;
use crate::config::ProgressionConfig;
use crate::level::Level;

/// Height of a pickup's center above its platform's top edge.
pub const HOVER_HEIGHT: f32 = 40.0;
/// Pulse phase advance per active tick.
pub const PULSE_STEP: f32 = 0.1;

/// A collectible counting toward the victory quota.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pickup {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub collected: bool,
    /// Animation phase.
    pub pulse: f32,
}

impl Pickup {
    pub fn new(x: f32, y: f32, radius: f32) -> Self {
        Self {
            x,
            y,
            radius,
            collected: false,
            pulse: 0.0,
        }
    }
}

/// A pickup taken this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collection {
    pub slot: PlayerSlot,
    pub x: f32,
    pub y: f32,
}

/// Number of pickups in the batch for `level`.
pub fn batch_size(level: u32, config: &ProgressionConfig) -> usize {
    config
        .base_batch
        .saturating_add(level)
        .min(config.max_batch) as usize
}

/// Place `count` pickups above randomly chosen floating platforms.
///
/// A level with no floating platforms yields an empty batch.
pub fn spawn_batch(
    level: &Level,
    count: usize,
    radius: f32,
    rng: &mut impl Rng,
) -> Vec<Pickup> {
    let platforms: Vec<_> = level.platforms().collect();
    if platforms.is_empty() {
        tracing::debug!("Level has no platforms, skipping pickup batch");
        return Vec::new();
    }
    (0..count)
        .filter_map(|_| platforms.choose(rng))
        .map(|platform| {
            let (cx, _) = platform.bounds.center();
            Pickup::new(cx, platform.bounds.top() - HOVER_HEIGHT, radius)
        })
        .collect()
}

/// Advance pulse animations of uncollected pickups.
pub fn tick_pulse(pickups: &mut [Pickup]) {
    for p in pickups.iter_mut().filter(|p| !p.collected) {
        p.pulse += PULSE_STEP;
    }
}

/// Mark pickups touched by a living character as collected.
///
/// Already-collected pickups never trigger again. Slot one is tested first.
pub fn collect(pickups: &mut [Pickup], characters: &[Character; 2]) -> Vec<Collection> {
    let mut taken = Vec::new();
    for p in pickups.iter_mut().filter(|p| !p.collected) {
        if let Some(c) = characters
            .iter()
            .find(|c| c.is_alive() && circle_touches_box(&c.bounds(), p.x, p.y, p.radius))
        {
            p.collected = true;
            taken.push(Collection {
                slot: c.slot,
                x: p.x,
                y: p.y,
            });
        }
    }
    taken
}

/// True once a non-empty batch has been fully collected.
pub fn batch_cleared(pickups: &[Pickup]) -> bool {
    !pickups.is_empty() && pickups.iter().all(|p| p.collected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn pair() -> [Character; 2] {
        [
            Character::new(PlayerSlot::One, 150.0, 700.0),
            Character::new(PlayerSlot::Two, 1000.0, 700.0),
        ]
    }

    #[test]
    fn batch_size_grows_then_caps() {
        let cfg = ProgressionConfig::default();
        assert_eq!(batch_size(1, &cfg), 4);
        assert_eq!(batch_size(4, &cfg), 7);
        assert_eq!(batch_size(5, &cfg), 8);
        assert_eq!(batch_size(40, &cfg), 8);
    }

    #[test]
    fn batch_sits_above_platforms() {
        let level = Level::castle();
        let mut rng = StdRng::seed_from_u64(9);
        let batch = spawn_batch(&level, 8, 20.0, &mut rng);
        assert_eq!(batch.len(), 8);
        for p in &batch {
            assert!(!p.collected);
            let on_platform = level.platforms().any(|o| {
                let (cx, _) = o.bounds.center();
                cx == p.x && o.bounds.top() - HOVER_HEIGHT == p.y
            });
            assert!(on_platform, "pickup at ({}, {}) not above a platform", p.x, p.y);
        }
    }

    #[test]
    fn no_platforms_means_empty_batch() {
        let level = Level::empty(1200.0, 800.0);
        let mut rng = StdRng::seed_from_u64(10);
        assert!(spawn_batch(&level, 5, 20.0, &mut rng).is_empty());
    }

    #[test]
    fn collection_is_idempotent() {
        let chars = pair();
        let (cx, cy) = chars[1].center();
        let mut pickups = vec![Pickup::new(cx, cy, 20.0), Pickup::new(600.0, 100.0, 20.0)];

        let taken = collect(&mut pickups, &chars);
        assert_eq!(taken.len(), 1);
        assert_eq!(taken[0].slot, PlayerSlot::Two);
        assert!(pickups[0].collected);
        assert!(!pickups[1].collected);

        assert!(collect(&mut pickups, &chars).is_empty(), "still overlapping");
    }

    #[test]
    fn corpses_do_not_collect() {
        let mut chars = pair();
        chars[0].kill();
        let (cx, cy) = chars[0].center();
        let mut pickups = vec![Pickup::new(cx, cy, 20.0)];
        assert!(collect(&mut pickups, &chars).is_empty());
        assert!(!pickups[0].collected);
    }

    #[test]
    fn cleared_requires_every_pickup() {
        let mut pickups = vec![Pickup::new(0.0, 0.0, 20.0), Pickup::new(1.0, 0.0, 20.0)];
        assert!(!batch_cleared(&pickups));
        pickups[0].collected = true;
        assert!(!batch_cleared(&pickups));
        pickups[1].collected = true;
        assert!(batch_cleared(&pickups));
        assert!(!batch_cleared(&[]));
    }

    #[test]
    fn pulse_advances_only_while_uncollected() {
        let mut pickups = vec![Pickup::new(0.0, 0.0, 20.0), Pickup::new(1.0, 0.0, 20.0)];
        pickups[1].collected = true;
        tick_pulse(&mut pickups);
        tick_pulse(&mut pickups);
        assert!((pickups[0].pulse - 0.2).abs() < 1e-6);
        assert_eq!(pickups[1].pulse, 0.0);
    }
}
