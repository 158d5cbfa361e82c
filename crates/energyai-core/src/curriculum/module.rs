use serde::{Deserialize, Serialize};

use super::{Microlesson, Status};

/// Prerequisite for a module: another module must be completed first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockRequirement {
    pub after_module: u32,
    /// Text shown on the locked card, e.g. "Hoàn thành Mô-đun 2".
    pub hint: String,
}

/// A unit of curriculum content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub id: u32,
    pub title: String,
    pub duration_secs: u64,
    #[serde(default)]
    pub lessons: Vec<Microlesson>,
    pub status: Status,
    /// Fraction of lessons completed; always recomputed, never trusted from input.
    #[serde(default)]
    pub progress: f64,
    pub icon: String,
    #[serde(default)]
    pub unlock: Option<UnlockRequirement>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub learning_objectives: Vec<String>,
    #[serde(default)]
    pub key_outcome: Option<String>,
}

impl Module {
    pub fn lesson(&self, lesson_id: &str) -> Option<&Microlesson> {
        self.lessons.iter().find(|l| l.id == lesson_id)
    }

    pub(crate) fn lesson_index(&self, lesson_id: &str) -> Option<usize> {
        self.lessons.iter().position(|l| l.id == lesson_id)
    }

    pub fn current_lesson(&self) -> Option<&Microlesson> {
        self.lessons.iter().find(|l| l.status == Status::Current)
    }

    pub fn completed_count(&self) -> usize {
        self.lessons.iter().filter(|l| l.is_completed()).count()
    }

    /// True only for a module with lessons, all of them completed.
    pub fn all_lessons_completed(&self) -> bool {
        !self.lessons.is_empty() && self.lessons.iter().all(Microlesson::is_completed)
    }

    pub fn duration_min(&self) -> u64 {
        self.duration_secs / 60
    }

    pub(crate) fn recompute_progress(&mut self) {
        self.progress = if self.lessons.is_empty() {
            0.0
        } else {
            self.completed_count() as f64 / self.lessons.len() as f64
        };
    }

    /// Locked -> Current, opening the first lesson that is still locked.
    /// Returns false when the module was not locked.
    pub(crate) fn unlock(&mut self) -> bool {
        if self.status != Status::Locked {
            return false;
        }
        self.status = Status::Current;
        if self.current_lesson().is_none() {
            if let Some(first) = self
                .lessons
                .iter_mut()
                .find(|l| l.status == Status::Locked)
            {
                first.status = Status::Current;
            }
        }
        true
    }
}
