//! # EnergyAI Academy Core Library
//!
//! This library provides the learning-progression logic for EnergyAI Academy,
//! a micro-learning course on AI for renewable-energy professionals. All
//! operations are available through the `energyai` CLI; other front ends are
//! thin layers over the same core.
//!
//! ## Architecture
//!
//! - **Progression model**: Curriculum of modules and microlessons with
//!   sequential unlocking, learner counters, badges and a leaderboard
//! - **Gamification**: Reward amounts, streak multiplier and level thresholds
//! - **Storage**: SQLite key-value store and TOML-based configuration
//! - **Practice lab**: Prompt templates with deferred, cancellable responses
//! - **Site**: Static file server for the course web pages
//!
//! ## Key Components
//!
//! - [`ProgressionModel`]: State holder that validates and applies learner intents
//! - [`Seed`]: Course data the model starts from
//! - [`Store`]: Session persistence
//! - [`Config`]: Application configuration management

pub mod achievements;
pub mod curriculum;
pub mod error;
pub mod events;
pub mod gamification;
pub mod leaderboard;
pub mod model;
pub mod practice;
pub mod progress;
pub mod seed;
pub mod site;
pub mod storage;

pub use achievements::{Achievement, Criterion};
pub use curriculum::{Microlesson, Module, Status, UnlockRequirement};
pub use error::{ConfigError, CoreError, ProgressError, Result, SeedError, StorageError};
pub use events::{Event, SubscriptionId};
pub use gamification::{LevelTable, RewardConfig};
pub use leaderboard::{Leaderboard, LeaderboardEntry, PositionChange};
pub use model::{CurriculumState, DailyLogin, LessonCompletion, LessonStart, ProgressionModel};
pub use practice::{PracticeLab, PromptTemplate, Ticket};
pub use progress::{ProgressExport, ProgressSnapshot, UserProgress};
pub use seed::Seed;
pub use storage::{Config, Store};

/// Build a model from configuration: the configured seed file (or the
/// built-in course) with the configured rewards and levels.
///
/// # Errors
/// Returns [`SeedError`] if the seed cannot be read or is inconsistent.
pub fn model_from_config(config: &Config) -> Result<ProgressionModel, SeedError> {
    let seed = match &config.seed_path {
        Some(path) => Seed::load(path)?,
        None => Seed::embedded()?,
    };
    ProgressionModel::from_seed(seed, config.rewards.clone(), config.levels.clone())
}
