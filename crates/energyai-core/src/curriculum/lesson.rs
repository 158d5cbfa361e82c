use serde::{Deserialize, Serialize};

use super::Status;

/// A short lesson, owned by exactly one [`super::Module`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Microlesson {
    /// Unique within the owning module, conventionally `"<moduleId>.<index>"`.
    pub id: String,
    pub title: String,
    pub duration_secs: u64,
    /// Points shown next to the lesson in the path view.
    pub points: u32,
    pub status: Status,
    /// Set the first time the learner opens the lesson.
    #[serde(default)]
    pub started: bool,
}

impl Microlesson {
    pub fn duration_min(&self) -> u64 {
        self.duration_secs / 60
    }

    pub fn is_completed(&self) -> bool {
        self.status == Status::Completed
    }
}
