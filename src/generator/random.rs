use super::*;
use ndarray::Array2;

/// Places the configured number of mines uniformly at random, without
/// replacement. Deterministic for a given seed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RandomBoardGenerator {
    seed: u64,
}

impl RandomBoardGenerator {
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl BoardGenerator for RandomBoardGenerator {
    fn generate(self, config: GameConfig) -> Result<Board> {
        use rand::prelude::*;

        let config = GameConfig::new(config.size, config.mines)?;
        let total_cells = config.total_cells();

        // optimize for full boards
        if config.mines == total_cells {
            return Ok(Board::from_mine_mask(Array2::from_elem(
                config.size.to_nd_index(),
                true,
            )));
        }

        let mut mine_mask: Array2<bool> = Array2::default(config.size.to_nd_index());
        let mut free_cells = total_cells;
        let mut mines_placed = 0;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        {
            let cells = mine_mask.as_slice_mut().expect("layout should be standard");
            while mines_placed < config.mines {
                // pick the n-th still-free cell, skipping placed mines
                let mut place: CellCount = rng.random_range(0..free_cells);
                for (i, cell) in cells.iter_mut().enumerate() {
                    let i = i as CellCount;
                    if *cell {
                        place += 1;
                    }
                    if i == place {
                        *cell = true;
                        mines_placed += 1;
                        free_cells -= 1;
                        break;
                    }
                }
            }
        }

        let board = Board::from_mine_mask(mine_mask);
        if board.mine_count() != config.mines {
            log::warn!(
                "Generated board mine count mismatch, actual: {}, requested: {}",
                board.mine_count(),
                config.mines
            );
        }
        Ok(board)
    }
}
