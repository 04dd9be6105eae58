use serde::{Deserialize, Serialize};

/// What a cell holds, fixed once the board is generated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileType {
    Count0,
    Count1,
    Count2,
    Count3,
    Count4,
    Count5,
    Count6,
    Count7,
    Count8,
    Bomb,
}

impl TileType {
    const COUNTS: [TileType; 9] = [
        Self::Count0,
        Self::Count1,
        Self::Count2,
        Self::Count3,
        Self::Count4,
        Self::Count5,
        Self::Count6,
        Self::Count7,
        Self::Count8,
    ];

    /// Safe tile with `count` adjacent bombs, `None` when `count > 8`.
    pub const fn from_count(count: u8) -> Option<Self> {
        if (count as usize) < Self::COUNTS.len() {
            Some(Self::COUNTS[count as usize])
        } else {
            None
        }
    }

    /// Adjacent bomb count for safe tiles, `None` for bombs.
    pub const fn count(self) -> Option<u8> {
        use TileType::*;
        match self {
            Count0 => Some(0),
            Count1 => Some(1),
            Count2 => Some(2),
            Count3 => Some(3),
            Count4 => Some(4),
            Count5 => Some(5),
            Count6 => Some(6),
            Count7 => Some(7),
            Count8 => Some(8),
            Bomb => None,
        }
    }

    pub const fn is_bomb(self) -> bool {
        matches!(self, Self::Bomb)
    }

    /// Zero tiles are the ones that cascade when revealed.
    pub const fn is_zero(self) -> bool {
        matches!(self, Self::Count0)
    }
}

/// Visibility of a tile. Only hidden tiles carry a flag, and nothing leaves `Revealed`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cover {
    #[default]
    Hidden,
    Flagged,
    Revealed,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    kind: TileType,
    cover: Cover,
}

impl Tile {
    pub const fn new(kind: TileType) -> Self {
        Self {
            kind,
            cover: Cover::Hidden,
        }
    }

    pub const fn kind(self) -> TileType {
        self.kind
    }

    pub const fn cover(self) -> Cover {
        self.cover
    }

    pub const fn is_hidden(self) -> bool {
        !matches!(self.cover, Cover::Revealed)
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self.cover, Cover::Flagged)
    }

    pub const fn is_revealed(self) -> bool {
        matches!(self.cover, Cover::Revealed)
    }

    /// Reveals a hidden, unflagged tile. Returns whether anything changed.
    pub fn reveal(&mut self) -> bool {
        if matches!(self.cover, Cover::Hidden) {
            self.cover = Cover::Revealed;
            true
        } else {
            false
        }
    }

    /// Reveals regardless of the flag, dropping it. Used for the end-of-game bomb sweep.
    pub(crate) fn force_reveal(&mut self) -> bool {
        let changed = self.is_hidden();
        self.cover = Cover::Revealed;
        changed
    }

    /// Flags a hidden tile. Returns whether anything changed.
    pub fn flag(&mut self) -> bool {
        if matches!(self.cover, Cover::Hidden) {
            self.cover = Cover::Flagged;
            true
        } else {
            false
        }
    }

    /// Removes a flag. Returns whether anything changed.
    pub fn unflag(&mut self) -> bool {
        if matches!(self.cover, Cover::Flagged) {
            self.cover = Cover::Hidden;
            true
        } else {
            false
        }
    }

    /// What a player is allowed to see of this tile.
    pub const fn view(self) -> TileView {
        match self.cover {
            Cover::Hidden => TileView::Hidden,
            Cover::Flagged => TileView::Flagged,
            Cover::Revealed => TileView::Revealed(self.kind),
        }
    }
}

/// Canonical player-visible state of a tile, the type is only exposed once revealed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileView {
    #[default]
    Hidden,
    Flagged,
    Revealed(TileType),
}

impl TileView {
    pub const fn kind(self) -> Option<TileType> {
        match self {
            Self::Revealed(kind) => Some(kind),
            Self::Hidden | Self::Flagged => None,
        }
    }

    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged)
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::Flagged)
    }
}
