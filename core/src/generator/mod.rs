use crate::*;
pub use preset::*;
pub use random::*;

mod preset;
mod random;

/// Produces the board for a session once the first move is known.
pub trait BoardGenerator {
    /// Builds a board of `config` dimensions that is safe to open at `origin`.
    ///
    /// Fails with [`GameError::InvalidCoords`] when `origin` is outside the board.
    fn generate(&mut self, config: GameConfig, origin: Coord2) -> Result<Board>;
}

/// The clipped 3×3 block around `origin` that must stay bomb-free.
pub fn safe_zone(size: Coord2, origin: Coord2) -> impl Iterator<Item = Coord2> {
    core::iter::once(origin).chain(NeighborIter::new(origin, size))
}
