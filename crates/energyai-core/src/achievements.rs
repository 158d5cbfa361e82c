//! Badge definitions and their automatic unlock rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::progress::UserProgress;

/// Condition under which an achievement unlocks on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Criterion {
    LessonsCompleted(u32),
    ModulesCompleted(u32),
    StreakDays(u32),
    TotalPoints(u64),
    PracticeSessions(u32),
    Level(u32),
}

impl Criterion {
    pub fn is_met(&self, progress: &UserProgress) -> bool {
        match *self {
            Criterion::LessonsCompleted(n) => progress.completed_lessons >= n,
            Criterion::ModulesCompleted(n) => progress.completed_modules >= n,
            Criterion::StreakDays(n) => progress.streak_days >= n,
            Criterion::TotalPoints(n) => progress.total_points >= n,
            Criterion::PracticeSessions(n) => progress.practice_sessions >= n,
            Criterion::Level(n) => progress.level >= n,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub points: u32,
    #[serde(default)]
    pub earned: bool,
    /// Present exactly when `earned` is true.
    #[serde(default)]
    pub earned_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub criterion: Option<Criterion>,
}

impl Achievement {
    /// Marks the badge earned. Returns false if it already was.
    pub(crate) fn earn(&mut self, at: DateTime<Utc>) -> bool {
        if self.earned {
            return false;
        }
        self.earned = true;
        self.earned_at = Some(at);
        true
    }

    pub fn is_consistent(&self) -> bool {
        self.earned || self.earned_at.is_none()
    }
}
