//! Learner progress aggregate and its exported forms.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Per-user counters. Serialized in camelCase because it is stored under
/// the `userProgress` key the mobile app already uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProgress {
    /// Mean module progress, 0..=1.
    pub overall_progress: f64,
    pub total_points: u64,
    pub streak_days: u32,
    pub level: u32,
    pub level_title: String,
    pub completed_modules: u32,
    pub total_modules: u32,
    pub completed_lessons: u32,
    pub study_minutes: u64,
    pub practice_sessions: u32,
    pub prompt_tests: u32,
    pub quiz_count: u32,
    pub average_quiz_score: f64,
    pub current_module: Option<u32>,
    pub current_lesson: Option<String>,
}

impl UserProgress {
    pub fn overall_percent(&self) -> u32 {
        (self.overall_progress * 100.0).round() as u32
    }

    /// Fold a new score into the running average.
    pub(crate) fn push_quiz_score(&mut self, score: f64) {
        let n = self.quiz_count as f64;
        self.average_quiz_score = (self.average_quiz_score * n + score) / (n + 1.0);
        self.quiz_count += 1;
    }
}

/// Starting counters from seed data. Derived fields (level, counts,
/// overall progress) are always recomputed from the curriculum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProgressSeed {
    pub total_points: u64,
    pub streak_days: u32,
    pub study_minutes: u64,
    pub practice_sessions: u32,
    pub prompt_tests: u32,
    pub quiz_count: u32,
    pub average_quiz_score: f64,
}

/// Immutable point-in-time copy of [`UserProgress`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub progress: UserProgress,
    pub taken_at: DateTime<Utc>,
}

/// The downloadable `energyai-progress.json` document. Field names are
/// fixed by existing consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressExport {
    pub user_id: String,
    pub completed_modules: u32,
    pub current_module: Option<u32>,
    /// Minutes.
    pub total_time_spent: u64,
    /// Whole percent.
    pub overall_progress: u32,
    pub export_date: String,
}

impl ProgressExport {
    pub fn from_progress(user_id: &str, progress: &UserProgress, at: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.to_string(),
            completed_modules: progress.completed_modules,
            current_module: progress.current_module,
            total_time_spent: progress.study_minutes,
            overall_progress: progress.overall_percent(),
            export_date: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub const FILE_NAME: &'static str = "energyai-progress.json";
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn running_quiz_average() {
        let mut p = UserProgress {
            quiz_count: 2,
            average_quiz_score: 0.9,
            ..Default::default()
        };
        p.push_quiz_score(0.6);
        assert_eq!(p.quiz_count, 3);
        assert!((p.average_quiz_score - 0.8).abs() < 1e-9);
    }

    #[test]
    fn export_uses_legacy_field_names() {
        let progress = UserProgress {
            overall_progress: 0.2,
            completed_modules: 1,
            current_module: Some(2),
            study_minutes: 56,
            ..Default::default()
        };
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap();
        let json = serde_json::to_value(ProgressExport::from_progress("user123", &progress, at))
            .unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "userId": "user123",
                "completedModules": 1,
                "currentModule": 2,
                "totalTimeSpent": 56,
                "overallProgress": 20,
                "exportDate": "2024-06-01T08:30:00.000Z"
            })
        );
    }

    #[test]
    fn stored_progress_tolerates_missing_fields() {
        let p: UserProgress = serde_json::from_str(r#"{"totalPoints": 1250, "streakDays": 7}"#)
            .unwrap();
        assert_eq!(p.total_points, 1250);
        assert_eq!(p.streak_days, 7);
        assert_eq!(p.practice_sessions, 0);
    }
}
