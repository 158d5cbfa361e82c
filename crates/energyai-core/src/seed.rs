//! Static course data loaded once at session start.
//!
//! The default course is compiled in from `seed/course.toml`. A different
//! file can be supplied through `Config::seed_path`; it must follow the
//! same schema and pass the same invariant checks.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::achievements::Achievement;
use crate::curriculum::{validate_curriculum, Module};
use crate::error::SeedError;
use crate::leaderboard::{Leaderboard, LeaderboardEntry};
use crate::progress::ProgressSeed;

const EMBEDDED_COURSE: &str = include_str!("../seed/course.toml");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seed {
    /// Schema/content version; stored state from another version is ignored.
    pub version: u32,
    #[serde(default)]
    pub progress: ProgressSeed,
    pub modules: Vec<Module>,
    #[serde(default)]
    pub achievements: Vec<Achievement>,
    #[serde(default)]
    pub leaderboard: Vec<LeaderboardEntry>,
}

impl Seed {
    /// The course shipped with the binary.
    ///
    /// # Errors
    /// Only fails if the embedded file itself is broken.
    pub fn embedded() -> Result<Self, SeedError> {
        Self::from_toml_str(EMBEDDED_COURSE)
    }

    /// Parse and validate seed TOML.
    ///
    /// # Errors
    /// Returns [`SeedError::Parse`] for malformed TOML and
    /// [`SeedError::Invariant`] for inconsistent data.
    pub fn from_toml_str(content: &str) -> Result<Self, SeedError> {
        let mut seed: Seed = toml::from_str(content)?;
        for module in &mut seed.modules {
            module.recompute_progress();
        }
        seed.validate()?;
        Ok(seed)
    }

    /// Read a seed file from disk.
    ///
    /// # Errors
    /// See [`Seed::from_toml_str`]; I/O failures become [`SeedError::Io`].
    pub fn load(path: &Path) -> Result<Self, SeedError> {
        let content = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), SeedError> {
        validate_curriculum(&self.modules)?;

        let mut ids = HashSet::new();
        for a in &self.achievements {
            if !ids.insert(a.id.as_str()) {
                return Err(SeedError::Invariant(format!(
                    "duplicate achievement id {}",
                    a.id
                )));
            }
            if !a.is_consistent() {
                return Err(SeedError::Invariant(format!(
                    "achievement {} has an earned date but is not earned",
                    a.id
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.progress.average_quiz_score) {
            return Err(SeedError::Invariant(
                "average quiz score must be within 0..=1".into(),
            ));
        }

        Leaderboard::rank(self.leaderboard.clone())?;
        Ok(())
    }

    pub fn ranked_leaderboard(&self) -> Result<Leaderboard, SeedError> {
        Leaderboard::rank(self.leaderboard.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curriculum::Status;

    #[test]
    fn embedded_course_is_valid() {
        let seed = Seed::embedded().unwrap();
        assert_eq!(seed.modules.len(), 5);
        assert_eq!(seed.modules[0].status, Status::Completed);
        assert_eq!(seed.modules[1].current_lesson().unwrap().id, "2.3");
        assert!((seed.modules[1].progress - 2.0 / 6.0).abs() < 1e-9);
        assert_eq!(seed.achievements.len(), 6);
        assert_eq!(seed.leaderboard.len(), 5);
    }

    #[test]
    fn seeded_progress_is_recomputed_not_trusted() {
        let content = EMBEDDED_COURSE.replacen(
            "status = \"completed\"\nicon = \"🧠\"",
            "status = \"completed\"\nprogress = 0.1\nicon = \"🧠\"",
            1,
        );
        let seed = Seed::from_toml_str(&content).unwrap();
        assert_eq!(seed.modules[0].progress, 1.0);
    }

    #[test]
    fn inconsistent_achievement_is_rejected() {
        let content = EMBEDDED_COURSE.replacen(
            "points = 150\n",
            "points = 150\nearned_at = \"2024-05-01T00:00:00Z\"\n",
            1,
        );
        assert!(matches!(
            Seed::from_toml_str(&content),
            Err(SeedError::Invariant(_))
        ));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(
            Seed::from_toml_str("version = ["),
            Err(SeedError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Seed::load(Path::new("/nonexistent/course.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/course.toml"));
    }
}
