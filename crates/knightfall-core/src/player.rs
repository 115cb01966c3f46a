use serde::{Deserialize, Serialize};

/// One of the two fixed player slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    pub const ALL: [PlayerSlot; 2] = [PlayerSlot::One, PlayerSlot::Two];

    pub fn index(self) -> usize {
        match self {
            PlayerSlot::One => 0,
            PlayerSlot::Two => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(PlayerSlot::One),
            1 => Some(PlayerSlot::Two),
            _ => None,
        }
    }

    pub fn partner(self) -> Self {
        match self {
            PlayerSlot::One => PlayerSlot::Two,
            PlayerSlot::Two => PlayerSlot::One,
        }
    }
}

/// RGB color tag used by presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Default for PlayerColor {
    fn default() -> Self {
        Self::BLUE
    }
}

impl PlayerColor {
    pub const BLUE: PlayerColor = PlayerColor {
        r: 52,
        g: 152,
        b: 219,
    };
    pub const RED: PlayerColor = PlayerColor {
        r: 231,
        g: 76,
        b: 60,
    };
    pub const GOLD: PlayerColor = PlayerColor {
        r: 255,
        g: 215,
        b: 0,
    };
    pub const GREEN: PlayerColor = PlayerColor {
        r: 46,
        g: 204,
        b: 113,
    };
    pub const DAMAGE: PlayerColor = PlayerColor {
        r: 255,
        g: 0,
        b: 0,
    };
}
