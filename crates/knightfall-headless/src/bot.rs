use knightfall_coop::{InputEvent, MoveDirection, SessionState};
use knightfall_core::player::PlayerSlot;

/// Horizontal distance inside which the bot stops steering.
const DEAD_ZONE: f32 = 10.0;

/// How far above the bot's center a target must be before it jumps.
const JUMP_THRESHOLD: f32 = 30.0;

/// Generate inputs for the knight in `slot` based on the current state.
///
/// A fallen partner takes priority over pickups, so the bot walks over to
/// start the revive. Always emits both direction keys so a stale press
/// from the previous tick is released.
pub fn generate_bot_input(state: &SessionState, slot: PlayerSlot) -> Vec<InputEvent> {
    let me = state.character(slot);
    if me.is_dead {
        return steer(slot, None);
    }
    let (cx, cy) = me.center();

    let partner = state.character(slot.partner());
    let target = if partner.is_dead {
        Some(partner.center())
    } else {
        nearest_pickup(state, cx, cy)
    };
    let Some((tx, ty)) = target else {
        return steer(slot, None);
    };

    let dx = tx - cx;
    let direction = if dx < -DEAD_ZONE {
        Some(MoveDirection::Negative)
    } else if dx > DEAD_ZONE {
        Some(MoveDirection::Positive)
    } else {
        None
    };

    let mut inputs = steer(slot, direction);
    if me.on_ground && ty < cy - JUMP_THRESHOLD {
        inputs.push(InputEvent::Jump { slot });
    }
    inputs
}

fn nearest_pickup(state: &SessionState, x: f32, y: f32) -> Option<(f32, f32)> {
    state
        .pickups
        .iter()
        .filter(|p| !p.collected)
        .map(|p| (p.x, p.y))
        .min_by(|a, b| {
            let da = (a.0 - x).powi(2) + (a.1 - y).powi(2);
            let db = (b.0 - x).powi(2) + (b.1 - y).powi(2);
            da.total_cmp(&db)
        })
}

fn steer(slot: PlayerSlot, direction: Option<MoveDirection>) -> Vec<InputEvent> {
    [MoveDirection::Negative, MoveDirection::Positive]
        .into_iter()
        .map(|d| InputEvent::Move {
            slot,
            direction: d,
            held: direction == Some(d),
        })
        .collect()
}
