use serde::{Deserialize, Serialize};

use knightfall_core::geometry::Aabb;
use knightfall_core::player::{PlayerColor, PlayerSlot};

/// Character box width.
pub const CHARACTER_WIDTH: f32 = 40.0;
/// Character box height.
pub const CHARACTER_HEIGHT: f32 = 60.0;
/// Starting and maximum health.
pub const MAX_HEALTH: f32 = 100.0;

/// Facing direction, used by presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

/// Held-key intent for one character. Every field is always populated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterInput {
    pub move_negative: bool,
    pub move_positive: bool,
    /// Latched on key-down, consumed by the next movement tick.
    pub jump: bool,
}

/// Menu-page stat bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterStats {
    pub speed: u8,
    pub jump: u8,
    pub agility: u8,
    pub power: u8,
}

/// Presentation-only identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterProfile {
    pub name: String,
    pub title: String,
    pub description: String,
    pub stats: CharacterStats,
    pub color: PlayerColor,
}

/// Starting movement tuning for a slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    pub max_speed: f32,
    pub jump_power: f32,
}

impl Tuning {
    pub fn for_slot(slot: PlayerSlot) -> Self {
        match slot {
            PlayerSlot::One => Tuning {
                max_speed: 8.0,
                jump_power: -12.0,
            },
            PlayerSlot::Two => Tuning {
                max_speed: 6.0,
                jump_power: -15.0,
            },
        }
    }
}

impl CharacterProfile {
    pub fn for_slot(slot: PlayerSlot) -> Self {
        match slot {
            PlayerSlot::One => CharacterProfile {
                name: "BLUE".to_string(),
                title: "Blue Knight".to_string(),
                description: "Swift as the wind, the fastest knight of the realm.".to_string(),
                stats: CharacterStats {
                    speed: 5,
                    jump: 4,
                    agility: 5,
                    power: 4,
                },
                color: PlayerColor::BLUE,
            },
            PlayerSlot::Two => CharacterProfile {
                name: "RED".to_string(),
                title: "Red Knight".to_string(),
                description: "Strong legs carry him over the highest ramparts.".to_string(),
                stats: CharacterStats {
                    speed: 4,
                    jump: 5,
                    agility: 4,
                    power: 4,
                },
                color: PlayerColor::RED,
            },
        }
    }
}

/// State of a single knight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub slot: PlayerSlot,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed_x: f32,
    pub speed_y: f32,
    pub max_speed: f32,
    pub jump_power: f32,
    pub on_ground: bool,
    pub facing: Facing,
    pub input: CharacterInput,
    pub profile: CharacterProfile,
    pub health: f32,
    pub max_health: f32,
    pub is_dead: bool,
    /// Revive timer in ticks, `0..=revive_ticks`.
    pub revive_progress: f32,
    pub spawn_x: f32,
    pub spawn_y: f32,
    /// Animation counter, advanced every active tick while alive.
    pub frame: u64,
}

impl Character {
    pub fn new(slot: PlayerSlot, spawn_x: f32, spawn_y: f32) -> Self {
        let tuning = Tuning::for_slot(slot);
        Self {
            slot,
            x: spawn_x,
            y: spawn_y,
            width: CHARACTER_WIDTH,
            height: CHARACTER_HEIGHT,
            speed_x: 0.0,
            speed_y: 0.0,
            max_speed: tuning.max_speed,
            jump_power: tuning.jump_power,
            on_ground: false,
            facing: Facing::Right,
            input: CharacterInput::default(),
            profile: CharacterProfile::for_slot(slot),
            health: MAX_HEALTH,
            max_health: MAX_HEALTH,
            is_dead: false,
            revive_progress: 0.0,
            spawn_x,
            spawn_y,
            frame: 0,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }

    pub fn center(&self) -> (f32, f32) {
        self.bounds().center()
    }

    pub fn is_alive(&self) -> bool {
        !self.is_dead
    }

    /// Restore spawn position, velocity, health and death flags for a new
    /// session. Held keys survive; a latched jump does not.
    pub fn reset_for_session(&mut self) {
        let tuning = Tuning::for_slot(self.slot);
        self.x = self.spawn_x;
        self.y = self.spawn_y;
        self.speed_x = 0.0;
        self.speed_y = 0.0;
        self.max_speed = tuning.max_speed;
        self.on_ground = false;
        self.facing = Facing::Right;
        self.input.jump = false;
        self.health = self.max_health;
        self.is_dead = false;
        self.revive_progress = 0.0;
    }

    /// Subtract health, clamping at zero. Returns true if this hit killed a
    /// living character; the death flags are set in the same call.
    pub fn apply_damage(&mut self, amount: f32) -> bool {
        if self.is_dead {
            return false;
        }
        self.health = (self.health - amount).clamp(0.0, self.max_health);
        if self.health <= 0.0 {
            self.kill();
            return true;
        }
        false
    }

    /// Add health, clamped at `max_health`. Dead characters are not healed.
    pub fn heal(&mut self, amount: f32) {
        if self.is_dead || self.health >= self.max_health {
            return;
        }
        self.health = (self.health + amount).min(self.max_health);
    }

    /// Mark dead in place: the corpse stays where it is.
    pub fn kill(&mut self) {
        self.health = 0.0;
        self.is_dead = true;
        self.revive_progress = 0.0;
    }

    /// Fall death: kill and move the corpse back to the spawn point.
    pub fn kill_by_fall(&mut self) {
        self.kill();
        self.x = self.spawn_x;
        self.y = self.spawn_y;
        self.speed_x = 0.0;
        self.speed_y = 0.0;
    }

    /// Bring a dead character back with full health.
    pub fn revive(&mut self) {
        self.is_dead = false;
        self.health = self.max_health;
        self.revive_progress = 0.0;
    }
}
