use std::collections::{HashMap, HashSet};

use super::{Module, Status};
use crate::error::SeedError;

/// Check every curriculum invariant on a freshly loaded module list.
///
/// # Errors
/// Returns [`SeedError::Invariant`] naming the first violation found.
pub fn validate_curriculum(modules: &[Module]) -> Result<(), SeedError> {
    let mut statuses: HashMap<u32, Status> = HashMap::new();
    for m in modules {
        if statuses.insert(m.id, m.status).is_some() {
            return Err(invariant(format!("duplicate module id {}", m.id)));
        }
    }

    for m in modules {
        validate_lessons(m)?;

        if m.status == Status::Completed && !m.all_lessons_completed() {
            return Err(invariant(format!(
                "module {} is completed but has unfinished lessons",
                m.id
            )));
        }
        if m.all_lessons_completed() && m.status != Status::Completed {
            return Err(invariant(format!(
                "module {} has every lesson completed but is {}",
                m.id,
                m.status.as_str()
            )));
        }
        if m.status == Status::Locked && m.lessons.iter().any(|l| l.status.is_unlocked()) {
            return Err(invariant(format!(
                "module {} is locked but has unlocked lessons",
                m.id
            )));
        }
        if m.status == Status::Current && !m.lessons.is_empty() && m.current_lesson().is_none() {
            return Err(invariant(format!(
                "module {} is current but no lesson is current",
                m.id
            )));
        }

        let requirement_met = match &m.unlock {
            None => true,
            Some(req) => {
                if req.after_module == m.id {
                    return Err(invariant(format!("module {} requires itself", m.id)));
                }
                match statuses.get(&req.after_module) {
                    Some(status) => *status == Status::Completed,
                    None => {
                        return Err(invariant(format!(
                            "module {} requires unknown module {}",
                            m.id, req.after_module
                        )))
                    }
                }
            }
        };
        if requirement_met == (m.status == Status::Locked) {
            return Err(invariant(format!(
                "module {} is {} but its unlock requirement is {}",
                m.id,
                m.status.as_str(),
                if requirement_met { "met" } else { "unmet" }
            )));
        }
    }
    Ok(())
}

/// Lesson statuses must read `Completed* Current? Locked*`.
fn validate_lessons(m: &Module) -> Result<(), SeedError> {
    let mut ids = HashSet::new();
    // 0 = completed run, 1 = current seen, 2 = locked run
    let mut phase = 0u8;
    for lesson in &m.lessons {
        if !ids.insert(lesson.id.as_str()) {
            return Err(invariant(format!(
                "duplicate lesson id {} in module {}",
                lesson.id, m.id
            )));
        }
        let ok = match lesson.status {
            Status::Completed => phase == 0,
            Status::Current => phase == 0,
            Status::Locked => true,
        };
        if !ok {
            return Err(invariant(format!(
                "lesson {} in module {} breaks sequential unlock",
                lesson.id, m.id
            )));
        }
        phase = match lesson.status {
            Status::Completed => phase,
            Status::Current => 1,
            Status::Locked => 2,
        };
    }
    Ok(())
}

fn invariant(message: String) -> SeedError {
    SeedError::Invariant(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curriculum::{Microlesson, UnlockRequirement};

    fn lesson(id: &str, status: Status) -> Microlesson {
        Microlesson {
            id: id.into(),
            title: id.into(),
            duration_secs: 420,
            points: 50,
            status,
            started: false,
        }
    }

    fn module(id: u32, status: Status, after: Option<u32>, lessons: Vec<Microlesson>) -> Module {
        Module {
            id,
            title: format!("Module {id}"),
            duration_secs: 2520,
            lessons,
            status,
            progress: 0.0,
            icon: "📚".into(),
            unlock: after.map(|after_module| UnlockRequirement {
                after_module,
                hint: format!("Complete module {after_module}"),
            }),
            description: None,
            learning_objectives: Vec::new(),
            key_outcome: None,
        }
    }

    fn valid_pair() -> Vec<Module> {
        vec![
            module(
                1,
                Status::Current,
                None,
                vec![lesson("1.1", Status::Completed), lesson("1.2", Status::Current)],
            ),
            module(
                2,
                Status::Locked,
                Some(1),
                vec![lesson("2.1", Status::Locked)],
            ),
        ]
    }

    #[test]
    fn accepts_consistent_curriculum() {
        assert!(validate_curriculum(&valid_pair()).is_ok());
    }

    #[test]
    fn rejects_two_current_lessons() {
        let mut modules = valid_pair();
        modules[0].lessons[0].status = Status::Current;
        assert!(validate_curriculum(&modules).is_err());
    }

    #[test]
    fn rejects_completed_after_locked() {
        let mut modules = valid_pair();
        modules[0].lessons = vec![
            lesson("1.1", Status::Current),
            lesson("1.2", Status::Locked),
            lesson("1.3", Status::Completed),
        ];
        assert!(validate_curriculum(&modules).is_err());
    }

    #[test]
    fn rejects_unlocked_module_with_unmet_requirement() {
        let mut modules = valid_pair();
        modules[1].status = Status::Current;
        modules[1].lessons[0].status = Status::Current;
        assert!(validate_curriculum(&modules).is_err());
    }

    #[test]
    fn rejects_locked_module_with_met_requirement() {
        let mut modules = valid_pair();
        modules[0].status = Status::Completed;
        modules[0].lessons[1].status = Status::Completed;
        assert!(validate_curriculum(&modules).is_err());
    }

    #[test]
    fn rejects_unknown_prerequisite() {
        let mut modules = valid_pair();
        modules[1].unlock = Some(UnlockRequirement {
            after_module: 9,
            hint: String::new(),
        });
        assert!(validate_curriculum(&modules).is_err());
    }

    #[test]
    fn rejects_duplicate_lesson_ids() {
        let mut modules = valid_pair();
        modules[0].lessons[1].id = "1.1".into();
        assert!(validate_curriculum(&modules).is_err());
    }
}
