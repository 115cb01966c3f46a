use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

use knightfall_core::geometry::{Aabb, circle_touches_box, direction};
use knightfall_core::player::PlayerSlot;

use crate::character::Character;
use crate::config::HostileConfig;

/// Hostile actor box width.
pub const HOSTILE_WIDTH: f32 = 50.0;
/// Hostile actor box height.
pub const HOSTILE_HEIGHT: f32 = 60.0;
/// Ticks the attack animation stays visible after a cast.
pub const ATTACK_ANIMATION_TICKS: u32 = 15;

/// Ranged spellcaster. Stationary; fires at a random living character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostileActor {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Ticks until the next cast. Zero means ready.
    pub attack_cooldown: u32,
    pub attack_delay: u32,
    pub frame: u64,
    pub attacking: bool,
    /// Ticks since the last cast while `attacking` is set.
    pub attack_frame: u32,
}

impl HostileActor {
    pub fn new(x: f32, y: f32, attack_delay: u32) -> Self {
        Self {
            x,
            y,
            width: HOSTILE_WIDTH,
            height: HOSTILE_HEIGHT,
            attack_cooldown: 0,
            attack_delay,
            frame: 0,
            attacking: false,
            attack_frame: 0,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }

    pub fn center(&self) -> (f32, f32) {
        self.bounds().center()
    }

    fn tick_animation(&mut self) {
        self.frame = self.frame.wrapping_add(1);
        if self.attacking {
            self.attack_frame += 1;
            if self.attack_frame >= ATTACK_ANIMATION_TICKS {
                self.attacking = false;
                self.attack_frame = 0;
            }
        }
    }
}

/// A non-homing spell. Velocity is fixed when it is cast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub active: bool,
    /// Recent positions, oldest first.
    pub trail: VecDeque<(f32, f32)>,
}

impl Projectile {
    /// Cast from `from` toward `to`. Coincident points give a motionless
    /// projectile rather than a NaN velocity.
    pub fn aimed(from: (f32, f32), to: (f32, f32), speed: f32, radius: f32) -> Self {
        let (vx, vy) = direction(from, to)
            .map(|(dx, dy)| (dx * speed, dy * speed))
            .unwrap_or((0.0, 0.0));
        Self {
            x: from.0,
            y: from.1,
            vx,
            vy,
            radius,
            active: true,
            trail: VecDeque::new(),
        }
    }

    /// Move one tick, record the new position in the trail and deactivate
    /// outside `area`.
    pub fn advance(&mut self, area: &Aabb, trail_length: usize) {
        if !self.active {
            return;
        }
        self.x += self.vx;
        self.y += self.vy;
        self.trail.push_back((self.x, self.y));
        while self.trail.len() > trail_length {
            self.trail.pop_front();
        }

        if self.x < area.left()
            || self.x > area.right()
            || self.y < area.top()
            || self.y > area.bottom()
        {
            self.active = false;
        }
    }
}

/// A projectile that struck a character this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileHit {
    pub slot: PlayerSlot,
    /// Impact point, for the damage burst.
    pub x: f32,
    pub y: f32,
    /// The hit reduced the character to zero health.
    pub killed: bool,
}

/// Damage dealt by one projectile at `level` (1-based).
pub fn damage_for_level(level: u32, config: &HostileConfig) -> f32 {
    config.base_damage + level.saturating_sub(1) as f32 * config.damage_per_level
}

/// Count down every hostile's cooldown, or cast at a uniformly chosen living
/// character once it has reached zero. A tick spent counting down never
/// casts, so shots are `attack_delay + 1` ticks apart. With no living target
/// the hostile stays ready.
pub fn tick_hostiles(
    hostiles: &mut [HostileActor],
    characters: &[Character; 2],
    rng: &mut impl Rng,
    config: &HostileConfig,
) -> Vec<Projectile> {
    let targets: Vec<&Character> = characters.iter().filter(|c| c.is_alive()).collect();
    let mut spawned = Vec::new();

    for hostile in hostiles.iter_mut() {
        hostile.tick_animation();
        if hostile.attack_cooldown > 0 {
            hostile.attack_cooldown -= 1;
            continue;
        }
        if targets.is_empty() {
            continue;
        }

        let target = targets[rng.random_range(0..targets.len())];
        spawned.push(Projectile::aimed(
            hostile.center(),
            target.center(),
            config.projectile_speed,
            config.projectile_radius,
        ));
        hostile.attacking = true;
        hostile.attack_frame = 0;
        hostile.attack_cooldown = hostile.attack_delay;
    }

    spawned
}

/// Move all projectiles one tick within `area`.
pub fn advance_projectiles(projectiles: &mut [Projectile], area: &Aabb, config: &HostileConfig) {
    for p in projectiles.iter_mut() {
        p.advance(area, config.trail_length);
    }
}

/// Test active projectiles against living characters. Each projectile hits at
/// most one character, applying knockback and `damage`.
pub fn resolve_projectile_hits(
    projectiles: &mut [Projectile],
    characters: &mut [Character; 2],
    damage: f32,
    config: &HostileConfig,
) -> Vec<ProjectileHit> {
    let mut hits = Vec::new();
    for p in projectiles.iter_mut().filter(|p| p.active) {
        let Some(character) = characters
            .iter_mut()
            .find(|c| c.is_alive() && circle_touches_box(&c.bounds(), p.x, p.y, p.radius))
        else {
            continue;
        };

        p.active = false;
        character.speed_y = config.knockback;
        let killed = character.apply_damage(damage);
        tracing::debug!(slot = ?character.slot, damage, killed, "Projectile hit");
        hits.push(ProjectileHit {
            slot: character.slot,
            x: p.x,
            y: p.y,
            killed,
        });
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn area() -> Aabb {
        Aabb::new(0.0, 0.0, 1200.0, 800.0)
    }

    fn pair() -> [Character; 2] {
        [
            Character::new(PlayerSlot::One, 150.0, 700.0),
            Character::new(PlayerSlot::Two, 1000.0, 700.0),
        ]
    }

    fn caster() -> HostileActor {
        HostileActor::new(575.0, 100.0, 40)
    }

    #[test]
    fn damage_scales_with_level() {
        let cfg = HostileConfig::default();
        assert_eq!(damage_for_level(1, &cfg), 10.0);
        assert_eq!(damage_for_level(2, &cfg), 15.0);
        assert_eq!(damage_for_level(5, &cfg), 30.0);
    }

    #[test]
    fn fires_on_first_tick_then_after_full_countdown() {
        let cfg = HostileConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut hostiles = vec![caster()];
        let chars = pair();

        let mut fire_ticks = Vec::new();
        for tick in 0..124 {
            if !tick_hostiles(&mut hostiles, &chars, &mut rng, &cfg).is_empty() {
                fire_ticks.push(tick);
            }
        }
        assert_eq!(fire_ticks, vec![0, 41, 82, 123]);
        assert_eq!(hostiles[0].attack_cooldown, cfg.attack_delay);
    }

    #[test]
    fn waits_while_no_target_is_alive() {
        let cfg = HostileConfig::default();
        let mut rng = StdRng::seed_from_u64(4);
        let mut hostiles = vec![caster()];
        let mut chars = pair();
        chars[0].kill();
        chars[1].kill();

        for _ in 0..10 {
            assert!(tick_hostiles(&mut hostiles, &chars, &mut rng, &cfg).is_empty());
        }
        assert_eq!(hostiles[0].attack_cooldown, 0);

        chars[1].revive();
        let shots = tick_hostiles(&mut hostiles, &chars, &mut rng, &cfg);
        assert_eq!(shots.len(), 1);
        assert!(shots[0].vx > 0.0, "only slot two is alive");
    }

    #[test]
    fn targets_both_characters_over_time() {
        let cfg = HostileConfig::default();
        let mut rng = StdRng::seed_from_u64(5);
        let chars = pair();
        let (mut left, mut right) = (0, 0);
        for _ in 0..200 {
            let mut hostiles = vec![caster()];
            for shot in tick_hostiles(&mut hostiles, &chars, &mut rng, &cfg) {
                if shot.vx < 0.0 {
                    left += 1;
                } else {
                    right += 1;
                }
            }
        }
        assert_eq!(left + right, 200);
        assert!(left > 50 && right > 50, "left={left} right={right}");
    }

    #[test]
    fn attack_animation_clears() {
        let cfg = HostileConfig::default();
        let mut rng = StdRng::seed_from_u64(6);
        let mut hostiles = vec![caster()];
        let chars = pair();
        tick_hostiles(&mut hostiles, &chars, &mut rng, &cfg);
        assert!(hostiles[0].attacking);
        for _ in 0..ATTACK_ANIMATION_TICKS {
            tick_hostiles(&mut hostiles, &chars, &mut rng, &cfg);
        }
        assert!(!hostiles[0].attacking);
    }

    #[test]
    fn aimed_velocity_has_constant_speed() {
        let p = Projectile::aimed((0.0, 0.0), (30.0, 40.0), 4.0, 12.0);
        assert!((p.vx - 2.4).abs() < 1e-5);
        assert!((p.vy - 3.2).abs() < 1e-5);
        assert!(p.active);
    }

    #[test]
    fn coincident_target_gives_no_movement() {
        let mut p = Projectile::aimed((100.0, 100.0), (100.0, 100.0), 4.0, 12.0);
        assert_eq!((p.vx, p.vy), (0.0, 0.0));
        p.advance(&area(), 10);
        assert_eq!((p.x, p.y), (100.0, 100.0));
        assert!(p.x.is_finite() && p.y.is_finite());
    }

    #[test]
    fn trail_is_bounded_oldest_first() {
        let mut p = Projectile::aimed((10.0, 400.0), (1000.0, 400.0), 4.0, 12.0);
        for _ in 0..25 {
            p.advance(&area(), 10);
        }
        assert_eq!(p.trail.len(), 10);
        let first = p.trail.front().map(|t| t.0).unwrap_or_default();
        let last = p.trail.back().map(|t| t.0).unwrap_or_default();
        assert!(first < last);
        assert_eq!(p.trail.back().copied(), Some((p.x, p.y)));
    }

    #[test]
    fn trail_starts_at_first_moved_position() {
        let mut p = Projectile::aimed((100.0, 400.0), (1000.0, 400.0), 4.0, 12.0);
        p.advance(&area(), 10);
        assert_eq!((p.x, p.y), (104.0, 400.0));
        assert_eq!(p.trail.iter().copied().collect::<Vec<_>>(), vec![(104.0, 400.0)]);
    }

    #[test]
    fn leaves_play_area_and_deactivates() {
        let mut p = Projectile::aimed((1195.0, 400.0), (1300.0, 400.0), 4.0, 12.0);
        p.advance(&area(), 10);
        assert!(!p.active);
        let (x, y) = (p.x, p.y);
        p.advance(&area(), 10);
        assert_eq!((p.x, p.y), (x, y), "inactive projectiles stay put");
    }

    #[test]
    fn hit_applies_damage_and_knockback() {
        let cfg = HostileConfig::default();
        let mut chars = pair();
        let (cx, cy) = chars[0].center();
        let mut shots = vec![Projectile::aimed((cx, cy), (cx, cy + 1.0), 0.0, 12.0)];

        let hits = resolve_projectile_hits(&mut shots, &mut chars, 20.0, &cfg);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].slot, PlayerSlot::One);
        assert!(!hits[0].killed);
        assert!(!shots[0].active);
        assert_eq!(chars[0].health, 80.0);
        assert_eq!(chars[0].speed_y, -5.0);
        assert_eq!(chars[1].health, 100.0);
    }

    #[test]
    fn lethal_hit_leaves_corpse_in_place() {
        let cfg = HostileConfig::default();
        let mut chars = pair();
        chars[1].health = 10.0;
        let (cx, cy) = chars[1].center();
        let mut shots = vec![Projectile::aimed((cx, cy), (cx + 1.0, cy), 0.0, 12.0)];

        let hits = resolve_projectile_hits(&mut shots, &mut chars, 10.0, &cfg);
        assert!(hits[0].killed);
        assert!(chars[1].is_dead);
        assert_eq!(chars[1].health, 0.0);
        assert_eq!(chars[1].x, 1000.0);
    }

    #[test]
    fn one_projectile_hits_at_most_one_character() {
        let cfg = HostileConfig::default();
        let mut chars = pair();
        chars[1].x = chars[0].x;
        let (cx, cy) = chars[0].center();
        let mut shots = vec![Projectile::aimed((cx, cy), (cx, cy - 1.0), 0.0, 12.0)];

        let hits = resolve_projectile_hits(&mut shots, &mut chars, 10.0, &cfg);
        assert_eq!(hits.len(), 1);
        let damaged = chars.iter().filter(|c| c.health < 100.0).count();
        assert_eq!(damaged, 1);
    }

    #[test]
    fn corpses_are_not_hit() {
        let cfg = HostileConfig::default();
        let mut chars = pair();
        chars[0].kill();
        let (cx, cy) = chars[0].center();
        let mut shots = vec![Projectile::aimed((cx, cy), (cx, cy - 1.0), 0.0, 12.0)];

        assert!(resolve_projectile_hits(&mut shots, &mut chars, 10.0, &cfg).is_empty());
        assert!(shots[0].active);
    }
}
