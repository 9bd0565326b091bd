use serde::{Deserialize, Serialize};

/// Contents of a single grid position, fixed at board generation.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Mine,
    /// Count of mines among the up-to-8 Moore neighbors, 0..=8.
    Adjacent(u8),
}

impl CellValue {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }

    pub const fn is_zero(self) -> bool {
        matches!(self, Self::Adjacent(0))
    }
}

impl Default for CellValue {
    fn default() -> Self {
        Self::Adjacent(0)
    }
}

/// One grid position as the renderer sees it.
///
/// `revealed` is monotonic: it only ever goes false to true. `flagged`
/// toggles freely while the cell is hidden and is forced back to false
/// the moment the cell is revealed through normal play.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub value: CellValue,
    pub revealed: bool,
    pub flagged: bool,
}

impl Cell {
    pub const fn is_hidden(self) -> bool {
        !self.revealed
    }
}
