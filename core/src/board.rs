use core::num::Saturating;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Fully classified grid of tiles, indexed by `(row, col)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    tiles: Array2<Tile>,
    bomb_count: CellCount,
    revealed_safe: Saturating<CellCount>,
    flagged: Saturating<CellCount>,
}

impl Board {
    /// Classifies every cell of `bomb_mask`, `true` marking a bomb.
    pub fn from_bomb_mask(bomb_mask: &Array2<bool>) -> Self {
        let bomb_count = bomb_mask.iter().filter(|&&is_bomb| is_bomb).count() as CellCount;
        let tiles = Array2::from_shape_fn(bomb_mask.dim(), |(row, col)| {
            let coords = (row as Coord, col as Coord);
            if bomb_mask[coords.to_nd_index()] {
                return Tile::new(TileType::Bomb);
            }
            let adjacent = bomb_mask
                .iter_neighbors(coords)
                .filter(|&pos| bomb_mask[pos.to_nd_index()])
                .count();
            // at most 8 neighbors
            Tile::new(TileType::from_count(adjacent as u8).unwrap_or(TileType::Count8))
        });

        Self {
            tiles,
            bomb_count,
            revealed_safe: Saturating(0),
            flagged: Saturating(0),
        }
    }

    pub fn from_bomb_coords(size: Coord2, bomb_coords: &[Coord2]) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::EmptyBoard);
        }

        let mut bomb_mask: Array2<bool> = Array2::default(size.to_nd_index());
        for &coords in bomb_coords {
            if !in_bounds(coords, size) {
                return Err(GameError::InvalidCoords);
            }
            bomb_mask[coords.to_nd_index()] = true;
        }

        Ok(Self::from_bomb_mask(&bomb_mask))
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.tiles.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if in_bounds(coords, self.size()) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn tile(&self, coords: Coord2) -> Option<Tile> {
        in_bounds(coords, self.size()).then(|| self.tiles[coords.to_nd_index()])
    }

    pub fn total_cells(&self) -> CellCount {
        self.tiles.len() as CellCount
    }

    pub fn bomb_count(&self) -> CellCount {
        self.bomb_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.bomb_count
    }

    pub fn revealed_safe_count(&self) -> CellCount {
        self.revealed_safe.0
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged.0
    }

    /// Every non-bomb tile is revealed.
    pub fn is_cleared(&self) -> bool {
        self.revealed_safe.0 == self.safe_cell_count()
    }

    pub fn adjacent_bomb_count(&self, coords: Coord2) -> u8 {
        self.iter_neighbors(coords)
            .filter(|&pos| self[pos].kind().is_bomb())
            .count() as u8
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.tiles.iter_neighbors(coords)
    }

    pub fn iter_coords(&self) -> impl Iterator<Item = Coord2> + use<> {
        iter_coords(self.size())
    }

    pub fn bomb_coords(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.iter_coords().filter(|&pos| self[pos].kind().is_bomb())
    }

    pub(crate) fn reveal(&mut self, coords: Coord2) -> bool {
        let tile = &mut self.tiles[coords.to_nd_index()];
        let changed = tile.reveal();
        if changed && !tile.kind().is_bomb() {
            self.revealed_safe += 1;
        }
        changed
    }

    pub(crate) fn force_reveal(&mut self, coords: Coord2) -> bool {
        let tile = &mut self.tiles[coords.to_nd_index()];
        if tile.is_flagged() {
            self.flagged -= 1;
        }
        let changed = tile.force_reveal();
        if changed && !tile.kind().is_bomb() {
            self.revealed_safe += 1;
        }
        changed
    }

    pub(crate) fn flag(&mut self, coords: Coord2) -> bool {
        let changed = self.tiles[coords.to_nd_index()].flag();
        if changed {
            self.flagged += 1;
        }
        changed
    }

    pub(crate) fn unflag(&mut self, coords: Coord2) -> bool {
        let changed = self.tiles[coords.to_nd_index()].unflag();
        if changed {
            self.flagged -= 1;
        }
        changed
    }

    pub(crate) fn views(&self) -> Array2<TileView> {
        self.tiles.map(|tile| tile.view())
    }
}

impl Index<Coord2> for Board {
    type Output = Tile;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.tiles[coords.to_nd_index()]
    }
}
