use crate::character::{Character, Facing};
use crate::config::PhysicsConfig;
use crate::level::Level;

/// Result of one movement tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Dead characters do not move.
    Skipped,
    Moved,
    /// Dropped below the play area: the character is now dead at its spawn.
    FellOut,
}

/// Advance one character by one tick against the level's static geometry.
///
/// Order: jump, horizontal intent, gravity, horizontal wall pass, upward wall
/// pass, landing pass, fall-out check. Walls only block upward vertical
/// motion; downward contact is handled by the landing pass alone.
pub fn tick_character(
    character: &mut Character,
    level: &Level,
    config: &PhysicsConfig,
) -> MoveOutcome {
    // The jump latch is edge-triggered: consumed or discarded every tick.
    let jump = std::mem::take(&mut character.input.jump);

    if character.is_dead {
        return MoveOutcome::Skipped;
    }

    if jump && character.on_ground {
        character.speed_y = character.jump_power;
        character.on_ground = false;
    }

    apply_horizontal_intent(character, config);

    character.speed_y = (character.speed_y + config.gravity).min(config.max_fall_speed);

    resolve_horizontal(character, level);
    resolve_upward(character, level);
    resolve_landing(character, level, config);

    character.frame = character.frame.wrapping_add(1);

    if character.y > level.height {
        character.kill_by_fall();
        return MoveOutcome::FellOut;
    }

    MoveOutcome::Moved
}

fn apply_horizontal_intent(character: &mut Character, config: &PhysicsConfig) {
    if character.input.move_negative {
        character.speed_x = -character.max_speed;
        character.facing = Facing::Left;
    } else if character.input.move_positive {
        character.speed_x = character.max_speed;
        character.facing = Facing::Right;
    } else {
        character.speed_x *= config.friction;
    }
}

pub(crate) fn resolve_horizontal(character: &mut Character, level: &Level) {
    let candidate = character.bounds().at(character.x + character.speed_x, character.y);
    if level.walls().any(|wall| candidate.overlaps(&wall.bounds)) {
        character.speed_x = 0.0;
    } else {
        character.x = candidate.x;
    }
}

pub(crate) fn resolve_upward(character: &mut Character, level: &Level) {
    let candidate = character.bounds().at(character.x, character.y + character.speed_y);
    if character.speed_y < 0.0 && level.walls().any(|wall| candidate.overlaps(&wall.bounds)) {
        character.speed_y = 0.0;
    } else {
        character.y = candidate.y;
    }
}

pub(crate) fn resolve_landing(character: &mut Character, level: &Level, config: &PhysicsConfig) {
    character.on_ground = false;
    for surface in level.surfaces() {
        let body = character.bounds();
        let s = &surface.bounds;
        if body.overlaps_x(s)
            && body.bottom() > s.top()
            && body.bottom() < s.bottom() + config.landing_tolerance
            && character.speed_y >= 0.0
        {
            character.y = s.top() - character.height;
            character.speed_y = 0.0;
            character.on_ground = true;
        }
    }
}
