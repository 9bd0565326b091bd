use crate::*;
pub use random::*;

mod random;

/// Builds a fresh board for a validated configuration. Generators are
/// consumed by value; they hold no state across games.
pub trait BoardGenerator {
    fn generate(self, config: GameConfig) -> Result<Board>;
}
