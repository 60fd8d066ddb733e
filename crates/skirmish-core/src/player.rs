use serde::{Deserialize, Serialize};

use crate::game_trait::PlayerId;

/// A participant in a local match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub display_name: String,
    pub color: PlayerColor,
    /// Driven by the scripted opponent instead of the input capture layer.
    pub is_cpu: bool,
}

/// Avatar color selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Default for PlayerColor {
    fn default() -> Self {
        Self::PALETTE[0]
    }
}

impl PlayerColor {
    /// Predefined palette; the first two are the default player 1 / player 2 colors.
    pub const PALETTE: &[PlayerColor] = &[
        PlayerColor {
            r: 255,
            g: 204,
            b: 51,
        }, // Amber
        PlayerColor {
            r: 51,
            g: 204,
            b: 255,
        }, // Sky
        PlayerColor {
            r: 255,
            g: 87,
            b: 87,
        }, // Red
        PlayerColor {
            r: 46,
            g: 213,
            b: 115,
        }, // Green
    ];

    /// Hex string (`#rrggbb`) for presentation layers that want CSS colors.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_palette_hex() {
        assert_eq!(PlayerColor::PALETTE[0].to_hex(), "#ffcc33");
        assert_eq!(PlayerColor::PALETTE[1].to_hex(), "#33ccff");
    }
}
