use rand::Rng;
use serde::{Deserialize, Serialize};

use knightfall_core::player::PlayerColor;

/// Life lost per tick; a particle lasts 50 ticks.
pub const LIFE_DECAY: f32 = 0.02;
/// Downward acceleration per tick.
pub const PARTICLE_GRAVITY: f32 = 0.2;

/// Burst sizes per event.
pub const REVIVE_BURST: usize = 30;
pub const COLLECT_BURST: usize = 20;
pub const DAMAGE_BURST: usize = 8;

/// Cosmetic particle. Never affects simulation state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Remaining life in `[0, 1]`.
    pub life: f32,
    pub size: f32,
    pub color: PlayerColor,
}

impl Particle {
    pub fn new(x: f32, y: f32, color: PlayerColor, rng: &mut impl Rng) -> Self {
        Self {
            x,
            y,
            vx: rng.random_range(-4.0..4.0),
            vy: rng.random_range(-4.0..4.0),
            life: 1.0,
            size: rng.random_range(3.0..8.0),
            color,
        }
    }

    pub fn update(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
        self.life -= LIFE_DECAY;
        self.vy += PARTICLE_GRAVITY;
    }

    pub fn is_expired(&self) -> bool {
        self.life <= 0.0
    }
}

/// Push `count` particles of one color at a point.
pub fn spawn_burst(
    particles: &mut Vec<Particle>,
    x: f32,
    y: f32,
    count: usize,
    color: PlayerColor,
    rng: &mut impl Rng,
) {
    particles.extend((0..count).map(|_| Particle::new(x, y, color, rng)));
}

/// Age every particle and drop the expired ones.
pub fn tick_particles(particles: &mut Vec<Particle>) {
    for p in particles.iter_mut() {
        p.update();
    }
    particles.retain(|p| !p.is_expired());
}
