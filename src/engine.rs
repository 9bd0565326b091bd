use alloc::collections::VecDeque;
use core::num::Saturating;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameStatus {
    fn default() -> Self {
        Self::InProgress
    }
}

/// One game of minesweeper: the owned board plus all mutable bookkeeping.
///
/// The renderer reads this through the accessor methods and forwards user
/// intents to [`Game::reveal_cell`] and [`Game::toggle_flag`]; a reset
/// replaces the whole value rather than transitioning a finished game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Game {
    config: GameConfig,
    board: Board,
    status: GameStatus,
    safe_cells_left: Saturating<CellCount>,
    flagged_count: Saturating<CellCount>,
    started: bool,
}

impl Game {
    pub fn new(generator: impl BoardGenerator, config: GameConfig) -> Result<Self> {
        let config = GameConfig::new(config.size, config.mines)?;
        let board = generator.generate(config)?;
        Ok(Self::with_board(board))
    }

    /// Starts a game on a pre-built board, e.g. one from
    /// [`Board::from_mine_coords`].
    pub fn with_board(board: Board) -> Self {
        let config = board.game_config();
        Self {
            config,
            board,
            status: Default::default(),
            safe_cells_left: Saturating(config.safe_cell_count()),
            flagged_count: Saturating(0),
            started: false,
        }
    }

    /// Discards the current game and generates a fresh one. The old
    /// board, counters, and status are replaced wholesale.
    pub fn reset(&mut self, generator: impl BoardGenerator, config: GameConfig) -> Result<()> {
        *self = Self::new(generator, config)?;
        Ok(())
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn size(&self) -> Coord2 {
        self.board.size()
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.board[coords]
    }

    /// Non-mine cells still hidden; the game is won when this hits zero.
    pub fn safe_cells_left(&self) -> CellCount {
        self.safe_cells_left.0
    }

    /// The "remaining flags" counter shown next to the flag icon: total
    /// mines minus currently placed flags. Goes negative when the player
    /// flags more cells than there are mines.
    pub fn mines_left(&self) -> isize {
        (self.board.mine_count() as isize) - (self.flagged_count.0 as isize)
    }

    /// Whether the first reveal has happened. The embedding UI keys its
    /// elapsed-time ticker off this: start counting when it turns true,
    /// stop when [`Game::status`] becomes terminal.
    pub fn started(&self) -> bool {
        self.started
    }

    /// Reveals a hidden cell.
    ///
    /// Out-of-bounds coordinates are an error; a finished game, an
    /// already-revealed target, or a flagged target is a silent no-op.
    /// Revealing a mine opens every mine on the board and loses the game;
    /// revealing a zero cell cascades through the connected zero region
    /// and its rim.
    pub fn reveal_cell(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        use RevealOutcome::*;

        let coords = self.board.validate_coords(coords)?;

        if self.status.is_finished() {
            return Ok(NoChange);
        }
        let cell = self.board[coords];
        if cell.revealed || cell.flagged {
            return Ok(NoChange);
        }

        self.started = true;

        Ok(match cell.value {
            CellValue::Mine => {
                self.explode();
                Exploded
            }
            CellValue::Adjacent(0) => {
                self.flood_reveal(coords);
                self.win_or(Revealed)
            }
            CellValue::Adjacent(_) => {
                self.reveal_one(coords);
                self.win_or(Revealed)
            }
        })
    }

    /// Toggles the flag on a hidden cell. No-op on a finished game or a
    /// revealed cell; out-of-bounds coordinates are an error.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagOutcome> {
        use FlagOutcome::*;

        let coords = self.board.validate_coords(coords)?;

        if self.status.is_finished() || self.board[coords].revealed {
            return Ok(NoChange);
        }

        let flagged = !self.board[coords].flagged;
        self.board[coords].flagged = flagged;
        if flagged {
            self.flagged_count += 1;
        } else {
            self.flagged_count -= 1;
        }
        Ok(Changed)
    }

    /// Opens every mine cell, leaving all other cells and the safe-cell
    /// counter untouched, and ends the game as lost. Flags stay where the
    /// player put them so the renderer can show which were wrong.
    fn explode(&mut self) {
        for cell in self.board.cells_mut().iter_mut() {
            if cell.value.is_mine() {
                cell.revealed = true;
            }
        }
        self.status = GameStatus::Lost;
        log::debug!("Mine revealed, game lost");
    }

    /// Breadth-first cascade from a zero cell, using an explicit work
    /// queue instead of recursion so large boards cannot overflow the
    /// stack. The revealed flag doubles as the visited set.
    ///
    /// Flagged neighbors are opened by the cascade even though they block
    /// a direct click; a zero cell has no adjacent mines, so every cell
    /// the cascade reaches is safe.
    fn flood_reveal(&mut self, start: Coord2) {
        let mut to_visit = VecDeque::from([start]);

        while let Some(coords) = to_visit.pop_front() {
            if self.board[coords].revealed {
                continue;
            }
            self.reveal_one(coords);

            if self.board[coords].value.is_zero() {
                to_visit.extend(
                    self.board
                        .iter_neighbors(coords)
                        .filter(|&pos| self.board[pos].is_hidden()),
                );
            }
        }
    }

    /// The single shared reveal primitive used by both the direct-click
    /// path and the flood cascade: opens one safe hidden cell, clears any
    /// flag on it, and decrements the win counter.
    fn reveal_one(&mut self, coords: Coord2) {
        let cell = &mut self.board[coords];
        debug_assert!(!cell.value.is_mine());

        cell.revealed = true;
        if cell.flagged {
            cell.flagged = false;
            self.flagged_count -= 1;
        }
        self.safe_cells_left -= 1;
    }

    /// Promotes the outcome to a win once every safe cell is open.
    fn win_or(&mut self, outcome: RevealOutcome) -> RevealOutcome {
        if self.safe_cells_left.0 == 0 {
            self.status = GameStatus::Won;
            log::debug!("All safe cells revealed, game won");
            RevealOutcome::Won
        } else {
            outcome
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(size: Coord2, mines: &[Coord2]) -> Game {
        Game::with_board(Board::from_mine_coords(size, mines).unwrap())
    }

    #[test]
    fn fresh_game_counters_match_configuration() {
        let game = game((4, 5), &[(0, 0), (3, 4), (2, 2)]);

        assert_eq!(game.status(), GameStatus::InProgress);
        assert_eq!(game.safe_cells_left(), 4 * 5 - 3);
        assert_eq!(game.mines_left(), 3);
        assert!(!game.started());
    }

    #[test]
    fn revealing_a_numbered_cell_opens_only_that_cell() {
        // the sole mine is diagonally adjacent, so (1, 1) must read 1
        let mut game = game((2, 2), &[(0, 0)]);

        let outcome = game.reveal_cell((1, 1)).unwrap();

        assert_eq!(outcome, RevealOutcome::Revealed);
        assert_eq!(game.cell_at((1, 1)).value, CellValue::Adjacent(1));
        assert!(game.cell_at((1, 1)).revealed);
        assert_eq!(game.safe_cells_left(), 2);
        assert_eq!(game.status(), GameStatus::InProgress);
        assert!(game.started());
    }

    #[test]
    fn revealing_a_mine_opens_all_mines_and_nothing_else() {
        let mut game = game((3, 3), &[(0, 0), (2, 2)]);
        let safe_before = game.safe_cells_left();

        let outcome = game.reveal_cell((0, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::Exploded);
        assert_eq!(game.status(), GameStatus::Lost);
        assert!(game.cell_at((0, 0)).revealed);
        assert!(game.cell_at((2, 2)).revealed);
        // mine clicks never touch safe cells or the win counter
        assert_eq!(game.safe_cells_left(), safe_before);
        assert!(!game.cell_at((1, 1)).revealed);
        assert_eq!(game.board().revealed_count(), 2);
    }

    #[test]
    fn zero_mine_board_floods_entirely_from_one_click() {
        let mut game = game((3, 3), &[]);

        let outcome = game.reveal_cell((0, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::Won);
        assert_eq!(game.status(), GameStatus::Won);
        assert_eq!(game.safe_cells_left(), 0);
        assert_eq!(game.board().revealed_count(), 9);
    }

    #[test]
    fn flood_stops_at_numbered_rim() {
        // zero region on the left of a 4x4 grid, mines along the right edge
        let mut game = game((4, 4), &[(0, 3), (1, 3), (2, 3), (3, 3)]);

        let outcome = game.reveal_cell((0, 0)).unwrap();

        // columns 0 and 1 are zero cells, column 2 is the numbered rim
        assert_eq!(outcome, RevealOutcome::Won);
        assert!(game.cell_at((1, 2)).revealed);
        assert_eq!(game.cell_at((1, 2)).value, CellValue::Adjacent(3));
        assert!(!game.cell_at((1, 3)).revealed);
        assert_eq!(game.board().revealed_count(), game.board().safe_cell_count());
    }

    #[test]
    fn flag_toggle_round_trips_counter_and_state() {
        let mut game = game((3, 3), &[(1, 1)]);

        assert_eq!(game.toggle_flag((0, 0)).unwrap(), FlagOutcome::Changed);
        assert!(game.cell_at((0, 0)).flagged);
        assert_eq!(game.mines_left(), 0);

        assert_eq!(game.toggle_flag((0, 0)).unwrap(), FlagOutcome::Changed);
        assert!(!game.cell_at((0, 0)).flagged);
        assert_eq!(game.mines_left(), 1);
    }

    #[test]
    fn over_flagging_drives_the_counter_negative() {
        let mut game = game((2, 2), &[(0, 0)]);

        game.toggle_flag((0, 1)).unwrap();
        game.toggle_flag((1, 0)).unwrap();

        assert_eq!(game.mines_left(), -1);
    }

    #[test]
    fn flag_blocks_direct_click_but_not_flood_cascade() {
        let mut game = game((3, 3), &[(2, 2)]);
        game.toggle_flag((0, 1)).unwrap();

        // direct click on the flagged cell is a guarded no-op
        assert_eq!(game.reveal_cell((0, 1)).unwrap(), RevealOutcome::NoChange);
        assert!(!game.cell_at((0, 1)).revealed);

        // but the cascade from the adjacent zero cell opens it anyway
        game.reveal_cell((0, 0)).unwrap();
        assert!(game.cell_at((0, 1)).revealed);
        assert!(!game.cell_at((0, 1)).flagged);
        assert_eq!(game.mines_left(), 1);
    }

    #[test]
    fn flagged_mine_is_not_opened_by_direct_click() {
        let mut game = game((2, 2), &[(0, 0)]);
        game.toggle_flag((0, 0)).unwrap();

        assert_eq!(game.reveal_cell((0, 0)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(game.status(), GameStatus::InProgress);
    }

    #[test]
    fn finished_game_ignores_further_moves() {
        let mut game = game((2, 2), &[(0, 0)]);
        game.reveal_cell((0, 0)).unwrap();
        assert_eq!(game.status(), GameStatus::Lost);

        assert_eq!(game.reveal_cell((1, 1)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(game.toggle_flag((1, 1)).unwrap(), FlagOutcome::NoChange);
        assert!(!game.cell_at((1, 1)).revealed);
        assert!(!game.cell_at((1, 1)).flagged);
    }

    #[test]
    fn won_game_is_terminal_too() {
        let mut game = game((2, 1), &[(0, 0)]);

        assert_eq!(game.reveal_cell((1, 0)).unwrap(), RevealOutcome::Won);
        assert_eq!(game.toggle_flag((0, 0)).unwrap(), FlagOutcome::NoChange);
        assert_eq!(game.reveal_cell((1, 0)).unwrap(), RevealOutcome::NoChange);
    }

    #[test]
    fn revealing_an_open_cell_is_a_no_op() {
        let mut game = game((2, 2), &[(0, 0)]);
        game.reveal_cell((1, 1)).unwrap();

        let safe_before = game.safe_cells_left();
        assert_eq!(game.reveal_cell((1, 1)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(game.safe_cells_left(), safe_before);
    }

    #[test]
    fn flagging_a_revealed_cell_is_a_no_op() {
        let mut game = game((2, 2), &[(0, 0)]);
        game.reveal_cell((1, 1)).unwrap();

        assert_eq!(game.toggle_flag((1, 1)).unwrap(), FlagOutcome::NoChange);
        assert_eq!(game.mines_left(), 1);
    }

    #[test]
    fn out_of_bounds_coordinates_are_an_error() {
        let mut game = game((2, 2), &[(0, 0)]);

        assert_eq!(game.reveal_cell((2, 0)), Err(GameError::OutOfBounds));
        assert_eq!(game.toggle_flag((0, 2)), Err(GameError::OutOfBounds));
    }

    #[test]
    fn reset_mid_game_restores_counters_and_timer_signal() {
        let config = GameConfig::new((5, 5), 4).unwrap();
        let mut game = Game::new(RandomBoardGenerator::new(1), config).unwrap();

        // flag a couple of cells and open one safe cell somewhere
        let mut flagged = 0;
        for row in 0..5 {
            for col in 0..5 {
                if flagged < 2 && game.cell_at((row, col)).value.is_mine() {
                    game.toggle_flag((row, col)).unwrap();
                    flagged += 1;
                }
            }
        }
        assert_eq!(game.mines_left(), 2);

        game.reset(RandomBoardGenerator::new(2), config).unwrap();

        assert_eq!(game.status(), GameStatus::InProgress);
        assert_eq!(game.mines_left(), 4);
        assert_eq!(game.safe_cells_left(), 21);
        assert!(!game.started());
        assert_eq!(game.board().revealed_count(), 0);
    }

    #[test]
    fn win_requires_every_safe_cell_including_flood_path() {
        // two separate zero regions joined through numbered cells
        let mut game = game((3, 3), &[(1, 1)]);

        let outcome = game.reveal_cell((0, 0)).unwrap();
        // every cell around the central mine reads 1, so only one opens
        assert_eq!(outcome, RevealOutcome::Revealed);

        for coords in [(0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1)] {
            assert_eq!(game.status(), GameStatus::InProgress);
            game.reveal_cell(coords).unwrap();
        }
        assert_eq!(game.reveal_cell((2, 2)).unwrap(), RevealOutcome::Won);
        assert_eq!(game.status(), GameStatus::Won);
        assert_eq!(game.safe_cells_left(), 0);
    }

    #[test]
    fn started_flag_trips_on_first_reveal_even_a_mine() {
        let mut game = game((2, 2), &[(0, 0)]);
        assert!(!game.started());

        // guarded calls do not start the clock
        game.toggle_flag((1, 1)).unwrap();
        game.reveal_cell((1, 1)).unwrap(); // flagged, no-op
        assert!(!game.started());
        game.toggle_flag((1, 1)).unwrap();

        game.reveal_cell((0, 0)).unwrap();
        assert!(game.started());
    }
}
