#![no_std]

extern crate alloc;

use alloc::collections::BTreeSet;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use error::*;
pub use generator::*;
pub use reveal::{Cascade, reveal, reveal_bombs};
pub use session::*;
pub use snapshot::*;
pub use tile::*;
pub use types::*;

mod board;
mod error;
mod generator;
mod reveal;
mod session;
mod snapshot;
mod tile;
mod types;

/// Cells kept free of bombs around the first reveal.
pub const SAFE_ZONE_CELLS: CellCount = 9;

/// Validated board parameters, fixed for the lifetime of a session.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGameConfig")]
pub struct GameConfig {
    /// `(rows, cols)`
    pub size: Coord2,
    pub bombs: CellCount,
}

#[derive(Deserialize)]
struct RawGameConfig {
    size: Coord2,
    bombs: CellCount,
}

impl TryFrom<RawGameConfig> for GameConfig {
    type Error = GameError;

    fn try_from(raw: RawGameConfig) -> Result<Self> {
        Self::new(raw.size, raw.bombs)
    }
}

impl GameConfig {
    pub(crate) const fn new_unchecked(size: Coord2, bombs: CellCount) -> Self {
        Self { size, bombs }
    }

    /// Checks that the board has cells and room for every bomb outside the 3×3 opening.
    pub fn new(size: Coord2, bombs: CellCount) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::EmptyBoard);
        }

        let config = Self::new_unchecked(size, bombs);
        let capacity = config.capacity();
        if u32::from(bombs) + u32::from(SAFE_ZONE_CELLS) > u32::from(config.total_cells()) {
            return Err(GameError::TooManyBombs { bombs, capacity });
        }
        Ok(config)
    }

    pub const fn rows(&self) -> Coord {
        self.size.0
    }

    pub const fn cols(&self) -> Coord {
        self.size.1
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    /// Most bombs a board of this size accepts.
    pub const fn capacity(&self) -> CellCount {
        self.total_cells().saturating_sub(SAFE_ZONE_CELLS)
    }

    /// Re-checks a config that may not have gone through [`GameConfig::new`].
    pub fn validate(self) -> Result<Self> {
        Self::new(self.size, self.bombs)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    /// Whether the flag was placed or removed.
    pub const fn applied(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    /// Newly revealed positions.
    Revealed(BTreeSet<Coord2>),
    /// Newly revealed positions, the last safe tiles on the board.
    Won(BTreeSet<Coord2>),
    /// The bomb at `triggered` went off, `bombs` holds every bomb position.
    HitBomb {
        triggered: Coord2,
        bombs: BTreeSet<Coord2>,
    },
}

impl RevealOutcome {
    pub const fn has_update(&self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed(_) => true,
            Won(_) => true,
            HitBomb { .. } => true,
        }
    }

    /// Positions a front end needs to redraw.
    pub fn positions(&self) -> impl Iterator<Item = Coord2> + '_ {
        use RevealOutcome::*;
        let positions = match self {
            NoChange => None,
            Revealed(opened) | Won(opened) => Some(opened),
            HitBomb { bombs, .. } => Some(bombs),
        };
        positions.into_iter().flatten().copied()
    }
}
