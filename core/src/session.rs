use core::time::Duration;
use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::*;

/// Valid transitions:
/// - NotStarted -> InProgress
/// - InProgress -> Won
/// - InProgress -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    /// No move yet, the board does not exist
    #[default]
    NotStarted,
    InProgress,
    Won,
    Lost,
}

impl GameState {
    pub const fn is_started(self) -> bool {
        !matches!(self, Self::NotStarted)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Flag counter as shown to the player, `remaining` goes negative when over-flagged.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BombStatus {
    pub remaining: isize,
    pub total: CellCount,
}

#[derive(Copy, Clone, Debug)]
struct Finish {
    ended_at: Instant,
    won: bool,
    triggered: Option<Coord2>,
}

#[derive(Clone, Debug)]
struct Round {
    board: Board,
    started_at: Instant,
    finish: Option<Finish>,
}

impl Round {
    fn end(&mut self, won: bool, triggered: Option<Coord2>) {
        if self.finish.is_some() {
            return;
        }
        let ended_at = Instant::now();
        log::debug!(
            "Game {} after {:?}",
            if won { "won" } else { "lost" },
            ended_at.duration_since(self.started_at)
        );
        self.finish = Some(Finish {
            ended_at,
            won,
            triggered,
        });
    }
}

#[derive(Clone, Debug)]
enum Phase {
    NotStarted,
    Started(Round),
}

/// Represents a game from the first click to a win or a loss.
///
/// The board is only generated on the first reveal, so that the opening area can be centred on
/// it. Every mutating operation has a `try_` form reporting why a move was rejected, and a plain
/// form that treats rejections as no-ops.
#[derive(Clone, Debug)]
pub struct GameSession<G = RandomBoardGenerator> {
    config: GameConfig,
    generator: G,
    phase: Phase,
}

impl GameSession {
    /// New session with an entropy-seeded generator.
    pub fn new(rows: Coord, cols: Coord, bombs: CellCount) -> Result<Self> {
        let config = GameConfig::new((rows, cols), bombs)?;
        Self::with_generator(config, RandomBoardGenerator::from_entropy())
    }

    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self> {
        Self::with_generator(config, RandomBoardGenerator::from_seed(seed))
    }
}

impl<G: BoardGenerator> GameSession<G> {
    /// Fails like [`GameConfig::new`] when `config` is not a feasible board.
    pub fn with_generator(config: GameConfig, generator: G) -> Result<Self> {
        Ok(Self {
            config: config.validate()?,
            generator,
            phase: Phase::NotStarted,
        })
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn size(&self) -> Coord2 {
        self.config.size
    }

    pub fn state(&self) -> GameState {
        match &self.phase {
            Phase::NotStarted => GameState::NotStarted,
            Phase::Started(Round { finish: None, .. }) => GameState::InProgress,
            Phase::Started(Round {
                finish: Some(finish),
                ..
            }) => {
                if finish.won {
                    GameState::Won
                } else {
                    GameState::Lost
                }
            }
        }
    }

    pub fn is_started(&self) -> bool {
        self.state().is_started()
    }

    pub fn is_finished(&self) -> bool {
        self.state().is_finished()
    }

    pub fn is_won(&self) -> bool {
        matches!(self.state(), GameState::Won)
    }

    pub fn is_lost(&self) -> bool {
        matches!(self.state(), GameState::Lost)
    }

    /// Time since the first reveal, frozen once the game ends, `None` before it starts.
    pub fn elapsed(&self) -> Option<Duration> {
        let round = self.round()?;
        let until = round
            .finish
            .map_or_else(Instant::now, |finish| finish.ended_at);
        Some(until.duration_since(round.started_at))
    }

    pub fn bomb_status(&self) -> BombStatus {
        let total = self.config.bombs;
        let flagged = self.round().map_or(0, |round| round.board.flagged_count());
        BombStatus {
            remaining: (total as isize) - (flagged as isize),
            total,
        }
    }

    /// Bombs left to flag, see [`BombStatus::remaining`].
    pub fn bombs_remaining(&self) -> isize {
        self.bomb_status().remaining
    }

    /// The bomb that ended a lost game.
    pub fn triggered_bomb(&self) -> Option<Coord2> {
        self.round()?.finish?.triggered
    }

    pub fn tile_at(&self, coords: Coord2) -> Option<TileView> {
        if !in_bounds(coords, self.size()) {
            return None;
        }
        Some(match self.round() {
            Some(round) => round.board[coords].view(),
            None => TileView::Hidden,
        })
    }

    pub fn snapshot(&self) -> Snapshot {
        match self.round() {
            Some(round) => Snapshot::from_board(&round.board),
            None => Snapshot::hidden(self.size()),
        }
    }

    /// Reveals a tile, generating the board first if this is the opening move.
    ///
    /// Revealed and flagged targets give [`RevealOutcome::NoChange`].
    pub fn try_reveal_tile(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        use RevealOutcome::*;

        self.check_not_finished()?;
        let coords = self.validate_coords(coords)?;

        if matches!(self.phase, Phase::NotStarted) {
            let board = self.generator.generate(self.config, coords)?;
            log::debug!("Game started at {:?}", coords);
            self.phase = Phase::Started(Round {
                board,
                started_at: Instant::now(),
                finish: None,
            });
        }

        let round = self.round_mut()?;
        Ok(match reveal::reveal(&mut round.board, coords) {
            Cascade::Detonated(triggered) => {
                let bombs = reveal::reveal_bombs(&mut round.board);
                round.end(false, Some(triggered));
                HitBomb { triggered, bombs }
            }
            Cascade::Opened(opened) if opened.is_empty() => NoChange,
            Cascade::Opened(opened) => {
                if round.board.is_cleared() {
                    round.end(true, None);
                    Won(opened)
                } else {
                    Revealed(opened)
                }
            }
        })
    }

    pub fn reveal_tile(&mut self, coords: Coord2) -> RevealOutcome {
        self.try_reveal_tile(coords).unwrap_or_else(|err| {
            log::debug!("Reveal at {:?} ignored: {}", coords, err);
            RevealOutcome::NoChange
        })
    }

    /// Flags a hidden tile; revealed or already flagged tiles give [`MarkOutcome::NoChange`].
    pub fn try_flag_tile(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        self.mark(coords, Board::flag)
    }

    pub fn flag_tile(&mut self, coords: Coord2) -> MarkOutcome {
        self.try_flag_tile(coords).unwrap_or(MarkOutcome::NoChange)
    }

    pub fn try_unflag_tile(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        self.mark(coords, Board::unflag)
    }

    pub fn unflag_tile(&mut self, coords: Coord2) -> MarkOutcome {
        self.try_unflag_tile(coords).unwrap_or(MarkOutcome::NoChange)
    }

    /// Flags a hidden tile or unflags a flagged one.
    pub fn try_toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        self.mark(coords, |board, coords| board.flag(coords) || board.unflag(coords))
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> MarkOutcome {
        self.try_toggle_flag(coords).unwrap_or(MarkOutcome::NoChange)
    }

    fn mark(
        &mut self,
        coords: Coord2,
        apply: impl FnOnce(&mut Board, Coord2) -> bool,
    ) -> Result<MarkOutcome> {
        self.check_not_finished()?;
        let coords = self.validate_coords(coords)?;
        let round = self.round_mut()?;

        Ok(if apply(&mut round.board, coords) {
            MarkOutcome::Changed
        } else {
            MarkOutcome::NoChange
        })
    }

    fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if in_bounds(coords, self.size()) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }

    fn round(&self) -> Option<&Round> {
        match &self.phase {
            Phase::NotStarted => None,
            Phase::Started(round) => Some(round),
        }
    }

    fn round_mut(&mut self) -> Result<&mut Round> {
        match &mut self.phase {
            Phase::NotStarted => Err(GameError::NotStarted),
            Phase::Started(round) => Ok(round),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::collections::BTreeSet;

    fn preset(size: Coord2, bombs: &[Coord2]) -> GameSession<PresetBoardGenerator> {
        let config = GameConfig::new(size, bombs.len() as CellCount).unwrap();
        GameSession::with_generator(config, PresetBoardGenerator::new(bombs.iter().copied()))
            .unwrap()
    }

    #[test]
    fn construction_validates_parameters() {
        assert!(GameSession::new(9, 9, 10).is_ok());
        assert!(GameSession::new(5, 5, 16).is_ok());
        assert_eq!(
            GameSession::new(5, 5, 17).err(),
            Some(GameError::TooManyBombs {
                bombs: 17,
                capacity: 16
            })
        );
        assert_eq!(GameSession::new(0, 9, 0).err(), Some(GameError::EmptyBoard));
        assert!(GameSession::new(1, 1, 1).is_err());
    }

    #[test]
    fn explicit_generator_cannot_skip_validation() {
        let infeasible = GameConfig::new_unchecked((1, 1), 1);

        assert_eq!(
            GameSession::with_generator(infeasible, RandomBoardGenerator::from_seed(0)).err(),
            Some(GameError::TooManyBombs {
                bombs: 1,
                capacity: 0
            })
        );
        assert_eq!(
            GameSession::with_seed(GameConfig::new_unchecked((0, 3), 0), 0).err(),
            Some(GameError::EmptyBoard)
        );
        assert!(
            GameSession::with_generator(
                GameConfig::new_unchecked((1, 5), 1),
                PresetBoardGenerator::new([(0, 2)])
            )
            .is_err()
        );
    }

    #[test]
    fn new_session_has_no_board() {
        let session = GameSession::new(9, 9, 10).unwrap();

        assert_eq!(session.state(), GameState::NotStarted);
        assert!(!session.is_started());
        assert_eq!(session.elapsed(), None);
        assert_eq!(
            session.bomb_status(),
            BombStatus {
                remaining: 10,
                total: 10
            }
        );
        assert_eq!(session.tile_at((4, 4)), Some(TileView::Hidden));
        assert_eq!(session.tile_at((9, 0)), None);
        assert!(session.snapshot().iter().all(|(_, view)| view == TileView::Hidden));
    }

    #[test]
    fn first_reveal_is_always_safe() {
        for seed in 0..16 {
            let config = GameConfig::new((9, 9), 72).unwrap();
            let mut session = GameSession::with_seed(config, seed).unwrap();
            let origin = ((seed % 9) as Coord, (seed * 5 % 9) as Coord);

            let outcome = session.reveal_tile(origin);

            assert!(matches!(outcome, RevealOutcome::Revealed(_) | RevealOutcome::Won(_)));
            assert!(session.is_started());
            assert!(session.elapsed().is_some());
            let round = session.round().unwrap();
            for coords in safe_zone(config.size, origin) {
                assert!(!round.board[coords].kind().is_bomb());
            }
            assert_eq!(round.board.bomb_count(), 72);
        }
    }

    #[test]
    fn mismatched_layout_leaves_session_unstarted() {
        let config = GameConfig::new((4, 4), 2).unwrap();
        let mut session =
            GameSession::with_generator(config, PresetBoardGenerator::new([(3, 3), (3, 3)]))
                .unwrap();

        assert_eq!(
            session.try_reveal_tile((0, 0)),
            Err(GameError::BombCountMismatch {
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(session.state(), GameState::NotStarted);
        assert_eq!(session.elapsed(), None);
    }

    #[test]
    fn opening_move_out_of_bounds_leaves_session_unstarted() {
        let mut session = GameSession::new(4, 4, 3).unwrap();

        assert_eq!(
            session.try_reveal_tile((4, 0)),
            Err(GameError::InvalidCoords)
        );
        assert_eq!(session.reveal_tile((0, 4)), RevealOutcome::NoChange);
        assert_eq!(session.state(), GameState::NotStarted);
    }

    #[test]
    fn flagging_requires_a_started_game() {
        let mut session = GameSession::new(4, 4, 3).unwrap();

        assert_eq!(session.try_flag_tile((0, 0)), Err(GameError::NotStarted));
        assert_eq!(session.flag_tile((0, 0)), MarkOutcome::NoChange);
        assert_eq!(session.try_unflag_tile((0, 0)), Err(GameError::NotStarted));
        assert_eq!(session.try_flag_tile((7, 0)), Err(GameError::InvalidCoords));
    }

    // 2x5 with one bomb:
    // [0, 1, B, 1, 0]
    // [0, 1, 1, 1, 0]
    fn row_session() -> GameSession<PresetBoardGenerator> {
        preset((2, 5), &[(0, 2)])
    }

    #[test]
    fn flag_protects_and_unflag_releases() {
        let mut session = row_session();
        session.reveal_tile((0, 0));
        assert!(session.tile_at((0, 3)).is_some_and(TileView::is_hidden));

        assert_eq!(session.flag_tile((0, 3)), MarkOutcome::Changed);
        assert_eq!(session.flag_tile((0, 3)), MarkOutcome::NoChange);
        assert_eq!(session.reveal_tile((0, 3)), RevealOutcome::NoChange);
        assert_eq!(session.tile_at((0, 3)), Some(TileView::Flagged));

        assert_eq!(session.unflag_tile((0, 3)), MarkOutcome::Changed);
        assert_eq!(session.unflag_tile((0, 3)), MarkOutcome::NoChange);
        assert_eq!(
            session.reveal_tile((0, 3)),
            RevealOutcome::Revealed(BTreeSet::from([(0, 3)]))
        );
    }

    #[test]
    fn flagging_revealed_tile_is_rejected() {
        let mut session = row_session();
        session.reveal_tile((0, 0));

        assert_eq!(session.try_flag_tile((0, 0)), Ok(MarkOutcome::NoChange));
        assert_eq!(session.tile_at((0, 0)), Some(TileView::Revealed(TileType::Count0)));
    }

    #[test]
    fn bomb_status_tracks_flags() {
        let mut session = row_session();
        session.reveal_tile((0, 0));

        session.flag_tile((0, 2));
        session.flag_tile((0, 3));
        assert_eq!(session.bombs_remaining(), -1);
        session.toggle_flag((0, 3));
        assert_eq!(
            session.bomb_status(),
            BombStatus {
                remaining: 0,
                total: 1
            }
        );
    }

    #[test]
    fn revealing_every_safe_tile_wins_and_freezes_clock() {
        let mut session = row_session();

        let first = session.reveal_tile((0, 0));
        assert_eq!(
            first,
            RevealOutcome::Revealed(BTreeSet::from([(0, 0), (0, 1), (1, 0), (1, 1)]))
        );
        assert_eq!(session.state(), GameState::InProgress);

        let right = session.reveal_tile((0, 4));
        assert_eq!(
            right,
            RevealOutcome::Revealed(BTreeSet::from([(0, 3), (0, 4), (1, 3), (1, 4)]))
        );
        assert_eq!(session.state(), GameState::InProgress);

        let last = session.reveal_tile((1, 2));
        assert_eq!(last, RevealOutcome::Won(BTreeSet::from([(1, 2)])));
        assert!(session.is_won());
        assert!(!session.is_lost());
        assert_eq!(session.triggered_bomb(), None);

        let frozen = session.elapsed();
        assert!(frozen.is_some());
        assert_eq!(session.elapsed(), frozen);
        assert_eq!(session.try_reveal_tile((0, 2)), Err(GameError::AlreadyEnded));
        assert_eq!(session.try_flag_tile((0, 2)), Err(GameError::AlreadyEnded));
        assert_eq!(session.try_flag_tile((9, 9)), Err(GameError::AlreadyEnded));
        assert_eq!(session.try_reveal_tile((9, 9)), Err(GameError::AlreadyEnded));
        assert_eq!(session.tile_at((0, 2)), Some(TileView::Hidden));
    }

    #[test]
    fn zero_bomb_board_is_won_on_first_reveal() {
        let config = GameConfig::new((3, 3), 0).unwrap();
        let mut session = GameSession::with_seed(config, 1).unwrap();

        let outcome = session.reveal_tile((1, 1));

        assert_eq!(outcome.positions().count(), 9);
        assert!(matches!(outcome, RevealOutcome::Won(_)));
        assert!(session.is_won());
    }

    #[test]
    fn hitting_a_bomb_reveals_all_bombs() {
        let mut session = preset((4, 4), &[(0, 3), (3, 3), (3, 0)]);
        session.reveal_tile((0, 0));
        session.flag_tile((3, 3));

        let outcome = session.reveal_tile((0, 3));

        assert_eq!(
            outcome,
            RevealOutcome::HitBomb {
                triggered: (0, 3),
                bombs: BTreeSet::from([(0, 3), (3, 0), (3, 3)]),
            }
        );
        assert!(session.is_lost());
        assert_eq!(session.triggered_bomb(), Some((0, 3)));
        assert_eq!(session.tile_at((3, 3)), Some(TileView::Revealed(TileType::Bomb)));
        assert_eq!(session.tile_at((3, 0)), Some(TileView::Revealed(TileType::Bomb)));
        assert_eq!(session.elapsed(), session.elapsed());
        assert_eq!(session.reveal_tile((1, 1)), RevealOutcome::NoChange);
    }

    #[test]
    fn revealing_revealed_tile_changes_nothing() {
        let mut session = GameSession::with_seed(GameConfig::new((16, 16), 40).unwrap(), 9).unwrap();
        session.reveal_tile((8, 8));
        let before = session.snapshot();

        assert_eq!(session.reveal_tile((8, 8)), RevealOutcome::NoChange);
        assert_eq!(session.snapshot(), before);
    }
}
