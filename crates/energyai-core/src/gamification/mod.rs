//! Points, streaks and levels.
//!
//! Pure arithmetic shared by the progression model and the configuration
//! layer. Nothing here owns state.

mod levels;
mod rewards;
pub mod streak;

pub use levels::LevelTable;
pub use rewards::RewardConfig;
