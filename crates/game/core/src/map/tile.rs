use crate::ecs::{RenderGlyph, Tile};

/// Terrain classification of one generated cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TileKind {
    #[default]
    Wall,
    Floor,
    /// Walkable but blocks sight.
    Door,
    StairsDown,
}

impl TileKind {
    pub const fn walkable(self) -> bool {
        !matches!(self, TileKind::Wall)
    }

    pub const fn blocks_light(self) -> bool {
        matches!(self, TileKind::Wall)
    }

    /// Whether sight and light pass through. Doors are opaque to both, since
    /// the opacity grid treats `Transparent(false)` like `blocks_light`.
    pub const fn transparent(self) -> bool {
        matches!(self, TileKind::Floor | TileKind::StairsDown)
    }

    pub const fn tile(self) -> Tile {
        Tile {
            walkable: self.walkable(),
            blocks_light: self.blocks_light(),
        }
    }

    pub const fn glyph(self) -> RenderGlyph {
        match self {
            TileKind::Wall => RenderGlyph::new('#', 0x808080, 0),
            TileKind::Floor => RenderGlyph::new('.', 0x404040, -1),
            TileKind::Door => RenderGlyph::new('+', 0xA0522D, 0),
            TileKind::StairsDown => RenderGlyph::new('>', 0xFFFF00, 0),
        }
    }
}
