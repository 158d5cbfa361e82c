mod lesson;
mod module;
mod validate;

pub use lesson::Microlesson;
pub use module::{Module, UnlockRequirement};
pub use validate::validate_curriculum;

use serde::{Deserialize, Serialize};

/// Lifecycle shared by modules and microlessons.
///
/// ```text
/// Locked -> Current -> Completed
/// ```
///
/// `Completed` is terminal and `Locked -> Completed` is never allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Completed,
    Current,
    Locked,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Completed => "completed",
            Status::Current => "current",
            Status::Locked => "locked",
        }
    }

    pub fn is_unlocked(&self) -> bool {
        !matches!(self, Status::Locked)
    }
}
