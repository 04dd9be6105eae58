use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Read-only copy of what the player can see, for front ends to render from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    tiles: Array2<TileView>,
}

impl Snapshot {
    pub fn from_board(board: &Board) -> Self {
        Self {
            tiles: board.views(),
        }
    }

    /// All tiles hidden, the view of a game that has not started.
    pub fn hidden(size: Coord2) -> Self {
        Self {
            tiles: Array2::default(size.to_nd_index()),
        }
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.tiles.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn get(&self, coords: Coord2) -> Option<TileView> {
        in_bounds(coords, self.size()).then(|| self.tiles[coords.to_nd_index()])
    }

    /// Every tile with its position, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (Coord2, TileView)> + '_ {
        iter_coords(self.size()).map(|coords| (coords, self[coords]))
    }

    /// Rows of tiles, in order, for line-oriented renderers.
    pub fn rows(&self) -> impl Iterator<Item = impl Iterator<Item = TileView> + '_> + '_ {
        self.tiles.rows().into_iter().map(|row| row.into_iter().copied())
    }

    pub fn revealed_count(&self) -> usize {
        self.tiles.iter().filter(|view| !view.is_hidden()).count()
    }

    pub fn flagged_count(&self) -> usize {
        self.tiles.iter().filter(|view| view.is_flagged()).count()
    }
}

impl Index<Coord2> for Snapshot {
    type Output = TileView;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.tiles[coords.to_nd_index()]
    }
}
