use alloc::vec::Vec;
use ndarray::Array2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::*;

/// Uniform placement outside the opening area, driven by an injected random source.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomBoardGenerator<R = SmallRng> {
    rng: R,
}

impl RandomBoardGenerator {
    pub fn from_seed(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(SmallRng::from_os_rng())
    }
}

impl<R: Rng> RandomBoardGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> BoardGenerator for RandomBoardGenerator<R> {
    fn generate(&mut self, config: GameConfig, origin: Coord2) -> Result<Board> {
        let size = config.size;
        if !in_bounds(origin, size) {
            return Err(GameError::InvalidCoords);
        }

        let mut bomb_mask: Array2<bool> = Array2::default(size.to_nd_index());
        for coords in safe_zone(size, origin) {
            // temporarily mark the opening so it's excluded from the candidates
            bomb_mask[coords.to_nd_index()] = true;
        }
        let mut candidates: Vec<Coord2> = iter_coords(size)
            .filter(|&coords| !bomb_mask[coords.to_nd_index()])
            .collect();
        bomb_mask.fill(false);

        let bombs = usize::from(config.bombs);
        if bombs > candidates.len() {
            log::warn!(
                "Cannot place {} bombs around {:?}, only {} cells available",
                bombs,
                origin,
                candidates.len()
            );
            return Err(GameError::TooManyBombs {
                bombs: config.bombs,
                capacity: candidates.len() as CellCount,
            });
        }

        // partial Fisher-Yates, the first `bombs` entries end up a uniform sample
        for i in 0..bombs {
            let pick = self.rng.random_range(i..candidates.len());
            candidates.swap(i, pick);
        }
        for &coords in &candidates[..bombs] {
            bomb_mask[coords.to_nd_index()] = true;
        }

        let board = Board::from_bomb_mask(&bomb_mask);
        log::debug!(
            "Generated {}x{} board with {} bombs, safe around {:?}",
            size.0,
            size.1,
            board.bomb_count(),
            origin
        );
        Ok(board)
    }
}
