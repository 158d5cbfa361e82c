use serde::{Deserialize, Serialize};

/// Point values for learner actions and the streak bonus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardConfig {
    #[serde(default = "default_daily_login")]
    pub daily_login: u64,
    #[serde(default = "default_lesson_start")]
    pub lesson_start: u64,
    #[serde(default = "default_lesson_complete")]
    pub lesson_complete: u64,
    #[serde(default = "default_quiz_pass")]
    pub quiz_pass: u64,
    #[serde(default = "default_practice")]
    pub practice: u64,
    /// Applied to every award while the streak is at or above `streak_threshold`.
    #[serde(default = "default_streak_multiplier")]
    pub streak_multiplier: f64,
    #[serde(default = "default_streak_threshold")]
    pub streak_threshold: u32,
    /// Minimum quiz score (0..=1) that earns `quiz_pass`.
    #[serde(default = "default_quiz_pass_score")]
    pub quiz_pass_score: f64,
}

fn default_daily_login() -> u64 {
    10
}
fn default_lesson_start() -> u64 {
    5
}
fn default_lesson_complete() -> u64 {
    50
}
fn default_quiz_pass() -> u64 {
    100
}
fn default_practice() -> u64 {
    25
}
fn default_streak_multiplier() -> f64 {
    1.5
}
fn default_streak_threshold() -> u32 {
    7
}
fn default_quiz_pass_score() -> f64 {
    0.8
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            daily_login: default_daily_login(),
            lesson_start: default_lesson_start(),
            lesson_complete: default_lesson_complete(),
            quiz_pass: default_quiz_pass(),
            practice: default_practice(),
            streak_multiplier: default_streak_multiplier(),
            streak_threshold: default_streak_threshold(),
            quiz_pass_score: default_quiz_pass_score(),
        }
    }
}

impl RewardConfig {
    pub fn multiplier_for(&self, streak_days: u32) -> f64 {
        if streak_days >= self.streak_threshold {
            self.streak_multiplier
        } else {
            1.0
        }
    }

    /// `floor(amount * multiplier)` for the given streak. Exact when the
    /// multiplier is 1; otherwise saturates at `u64::MAX`.
    pub fn apply_multiplier(&self, amount: u64, streak_days: u32) -> u64 {
        let multiplier = self.multiplier_for(streak_days);
        if multiplier == 1.0 {
            return amount;
        }
        (amount as f64 * multiplier).floor() as u64
    }
}
