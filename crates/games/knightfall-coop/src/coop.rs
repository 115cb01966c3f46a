use knightfall_core::geometry::center_distance;
use knightfall_core::player::PlayerSlot;

use crate::character::Character;
use crate::config::CoopConfig;

/// Advance the revive timer of `dead` given its partner's position.
///
/// Returns true when this tick completed the revive.
pub fn tick_revive(dead: &mut Character, partner: &Character, config: &CoopConfig) -> bool {
    if !dead.is_dead || partner.is_dead {
        return false;
    }

    let dist = center_distance(&dead.bounds(), &partner.bounds());
    if dist < config.revive_radius {
        dead.revive_progress = (dead.revive_progress + 1.0).min(config.revive_ticks);
        if dead.revive_progress >= config.revive_ticks {
            dead.revive();
            return true;
        }
    } else {
        dead.revive_progress = (dead.revive_progress - config.revive_decay).max(0.0);
    }
    false
}

/// Run the revive check for both ordered (dead, partner) pairs.
/// Returns the slots revived this tick.
pub fn tick_revives(characters: &mut [Character; 2], config: &CoopConfig) -> Vec<PlayerSlot> {
    let mut revived = Vec::new();
    for slot in PlayerSlot::ALL {
        let (dead, partner) = pair_mut(characters, slot);
        if tick_revive(dead, partner, config) {
            tracing::debug!(?slot, "Character revived by partner");
            revived.push(slot);
        }
    }
    revived
}

/// Passive mutual healing. Returns true while the pair is in healing range.
pub fn tick_healing(characters: &mut [Character; 2], config: &CoopConfig) -> bool {
    let [a, b] = characters;
    if a.is_dead || b.is_dead {
        return false;
    }
    if center_distance(&a.bounds(), &b.bounds()) >= config.heal_radius {
        return false;
    }
    a.heal(config.heal_per_tick);
    b.heal(config.heal_per_tick);
    true
}

/// Split the pair into (`slot`'s character, partner).
fn pair_mut(characters: &mut [Character; 2], slot: PlayerSlot) -> (&mut Character, &Character) {
    let [a, b] = characters;
    match slot {
        PlayerSlot::One => (a, b),
        PlayerSlot::Two => (b, a),
    }
}
