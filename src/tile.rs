//! Semantic tile kinds and their on-disk byte encodings.

/// A single cell's semantic content, independent of the on-disk representation.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub enum Tile {
    #[default]
    Floor,
    Wall,
    Teleport,
    Block,
    Exit,
    Player,
    Fire,
    Dirt,
    Popup,
    Turtle,
    Water,
    ToggleWall,
    ToggleFloor,
    ToggleButton,
    Trap,
    TrapButton,
}

impl Tile {
    /// The byte this tile writes as. Player always writes the "south-facing"
    /// code; the three other facings only ever appear on read.
    pub fn encoding(self) -> u8 {
        match self {
            Tile::Floor => 0x00,
            Tile::Wall => 0x01,
            Tile::Teleport => 0x29,
            Tile::Block => 0x0A,
            Tile::Exit => 0x15,
            Tile::Player => 0x6E,
            Tile::Fire => 0x04,
            Tile::Dirt => 0x0C,
            Tile::Popup => 0x24,
            Tile::Turtle => 0x25,
            Tile::Water => 0x03,
            Tile::ToggleWall => 0x12,
            Tile::ToggleFloor => 0x13,
            Tile::ToggleButton => 0x2A,
            Tile::Trap => 0x2D,
            Tile::TrapButton => 0x2C,
        }
    }

    /// Decodes a byte into a tile, or `None` for an unrecognized code (the
    /// caller logs a once-per-level warning and falls back to `Floor`).
    pub fn from_code(code: u8) -> Option<Tile> {
        Some(match code {
            0x00 => Tile::Floor,
            0x01 => Tile::Wall,
            0x29 => Tile::Teleport,
            0x0A => Tile::Block,
            0x15 => Tile::Exit,
            0x6C | 0x6D | 0x6E | 0x6F => Tile::Player,
            0x04 => Tile::Fire,
            0x0C => Tile::Dirt,
            0x24 => Tile::Popup,
            0x25 => Tile::Turtle,
            0x03 => Tile::Water,
            0x12 => Tile::ToggleWall,
            0x13 => Tile::ToggleFloor,
            0x2A => Tile::ToggleButton,
            0x2D => Tile::Trap,
            0x2C => Tile::TrapButton,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_round_trips_for_every_writable_tile() {
        let tiles = [
            Tile::Floor,
            Tile::Wall,
            Tile::Teleport,
            Tile::Block,
            Tile::Exit,
            Tile::Player,
            Tile::Fire,
            Tile::Dirt,
            Tile::Popup,
            Tile::Turtle,
            Tile::Water,
            Tile::ToggleWall,
            Tile::ToggleFloor,
            Tile::ToggleButton,
            Tile::Trap,
            Tile::TrapButton,
        ];
        for tile in tiles {
            assert_eq!(Tile::from_code(tile.encoding()), Some(tile));
        }
    }

    #[test]
    fn unknown_code_decodes_to_none() {
        assert_eq!(Tile::from_code(0xEE), None);
    }

    #[test]
    fn all_player_facings_decode_to_player() {
        for code in [0x6C, 0x6D, 0x6E, 0x6F] {
            assert_eq!(Tile::from_code(code), Some(Tile::Player));
        }
    }
}
