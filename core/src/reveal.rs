use alloc::collections::{BTreeSet, VecDeque};

use crate::*;

/// Result of a single reveal request against a board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Cascade {
    /// Positions that went from hidden to revealed, empty when nothing changed.
    Opened(BTreeSet<Coord2>),
    /// The requested tile was a bomb.
    Detonated(Coord2),
}

impl Cascade {
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::Opened(opened) if opened.is_empty())
    }
}

/// Reveals the tile at `coords`, flooding outward through zero tiles.
///
/// Out-of-bounds, already revealed and flagged targets are left alone and yield an empty set.
/// Flagged tiles met during the flood are skipped as well, so every position in the result
/// was hidden and unflagged before the call.
pub fn reveal(board: &mut Board, coords: Coord2) -> Cascade {
    let Some(tile) = board.tile(coords) else {
        return Cascade::Opened(BTreeSet::new());
    };

    if !matches!(tile.cover(), Cover::Hidden) {
        return Cascade::Opened(BTreeSet::new());
    }

    if tile.kind().is_bomb() {
        board.reveal(coords);
        return Cascade::Detonated(coords);
    }

    let mut opened = BTreeSet::new();
    let mut to_visit = Worklist::new(coords);

    while let Some(visit_coords) = to_visit.pop() {
        if !board.reveal(visit_coords) {
            continue;
        }
        opened.insert(visit_coords);

        if board[visit_coords].kind().is_zero() {
            for pos in board.iter_neighbors(visit_coords) {
                if matches!(board[pos].cover(), Cover::Hidden) {
                    to_visit.push(pos);
                }
            }
        }
    }

    log::trace!("Revealed {} tiles from {:?}", opened.len(), coords);
    Cascade::Opened(opened)
}

/// FIFO of positions to open, each position accepted at most once.
struct Worklist {
    queue: VecDeque<Coord2>,
    queued: BTreeSet<Coord2>,
}

impl Worklist {
    fn new(start: Coord2) -> Self {
        Self {
            queue: VecDeque::from([start]),
            queued: BTreeSet::from([start]),
        }
    }

    fn push(&mut self, coords: Coord2) -> bool {
        let fresh = self.queued.insert(coords);
        if fresh {
            self.queue.push_back(coords);
        }
        fresh
    }

    fn pop(&mut self) -> Option<Coord2> {
        self.queue.pop_front()
    }
}

/// Reveals every bomb on the board, flagged or not, returning their positions.
pub fn reveal_bombs(board: &mut Board) -> BTreeSet<Coord2> {
    let bombs: BTreeSet<Coord2> = board.bomb_coords().collect();
    for &coords in &bombs {
        board.force_reveal(coords);
    }
    bombs
}
