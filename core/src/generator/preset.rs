use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use super::*;

/// Fixed bomb layout, handy for puzzles and reproducible games.
///
/// Only the origin tile itself is checked for safety, the surrounding block is not reserved.
/// Repeated positions count once.
#[derive(Clone, Debug, PartialEq)]
pub struct PresetBoardGenerator {
    bombs: Vec<Coord2>,
}

impl PresetBoardGenerator {
    pub fn new(bombs: impl IntoIterator<Item = Coord2>) -> Self {
        let unique: BTreeSet<Coord2> = bombs.into_iter().collect();
        Self {
            bombs: unique.into_iter().collect(),
        }
    }

    pub fn bomb_count(&self) -> usize {
        self.bombs.len()
    }
}

impl BoardGenerator for PresetBoardGenerator {
    fn generate(&mut self, config: GameConfig, origin: Coord2) -> Result<Board> {
        if !in_bounds(origin, config.size) {
            return Err(GameError::InvalidCoords);
        }
        if self.bombs.contains(&origin) {
            return Err(GameError::UnsafeOrigin);
        }

        let board = Board::from_bomb_coords(config.size, &self.bombs)?;
        if board.bomb_count() != config.bombs {
            log::warn!(
                "Preset layout has {} bombs, config declares {}",
                board.bomb_count(),
                config.bombs
            );
            return Err(GameError::BombCountMismatch {
                expected: config.bombs,
                actual: board.bomb_count(),
            });
        }
        Ok(board)
    }
}
