//! Property tests for the progression model.
//!
//! Random sequences of learner intents are applied to the built-in course;
//! after every step the curriculum and counters must stay consistent.

use energyai_core::{LevelTable, ProgressionModel, RewardConfig, Seed, Status};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Intent {
    Start(u32, String),
    Complete(u32, String),
    Award(u64),
    Practice,
    Quiz(f64),
}

fn lesson_ref() -> impl Strategy<Value = (u32, String)> {
    (1u32..=5, 1u32..=6).prop_map(|(m, l)| (m, format!("{m}.{l}")))
}

fn intent() -> impl Strategy<Value = Intent> {
    prop_oneof![
        3 => lesson_ref().prop_map(|(m, l)| Intent::Start(m, l)),
        6 => lesson_ref().prop_map(|(m, l)| Intent::Complete(m, l)),
        1 => (0u64..500).prop_map(Intent::Award),
        1 => Just(Intent::Practice),
        1 => (0.0f64..=1.0).prop_map(Intent::Quiz),
    ]
}

fn model() -> ProgressionModel {
    ProgressionModel::from_seed(
        Seed::embedded().unwrap(),
        RewardConfig::default(),
        LevelTable::default(),
    )
    .unwrap()
}

fn apply(m: &mut ProgressionModel, intent: &Intent) {
    match intent {
        Intent::Start(module, lesson) => {
            let _ = m.start_or_resume_microlesson(*module, lesson);
        }
        Intent::Complete(module, lesson) => {
            let _ = m.complete_microlesson(*module, lesson);
        }
        Intent::Award(amount) => {
            m.award_points(*amount, "test");
        }
        Intent::Practice => {
            m.record_practice_attempt();
        }
        Intent::Quiz(score) => {
            let _ = m.record_quiz_score(*score);
        }
    }
}

proptest! {
    #[test]
    fn curriculum_stays_consistent(intents in prop::collection::vec(intent(), 1..80)) {
        let mut m = model();
        let levels = LevelTable::default();
        let mut last_points = m.progress().total_points;
        let mut last_level = m.progress().level;

        for intent in &intents {
            apply(&mut m, intent);
            let p = m.progress();

            prop_assert!(p.total_points >= last_points);
            prop_assert!(p.level >= last_level);
            prop_assert_eq!(p.level, levels.level_for(p.total_points));
            last_points = p.total_points;
            last_level = p.level;

            prop_assert!(p.completed_modules <= p.total_modules);
            prop_assert!((0.0..=1.0).contains(&p.overall_progress));
            prop_assert!((0.0..=1.0).contains(&p.average_quiz_score));

            for module in m.modules() {
                let total = module.lessons.len() as f64;
                let done = module.completed_count() as f64;
                prop_assert!((module.progress - done / total).abs() < 1e-9);

                let current = module
                    .lessons
                    .iter()
                    .filter(|l| l.status == Status::Current)
                    .count();
                prop_assert!(current <= 1);
                prop_assert_eq!(
                    module.status == Status::Completed,
                    module.all_lessons_completed()
                );
                if module.status == Status::Locked {
                    prop_assert!(module.lessons.iter().all(|l| l.status == Status::Locked));
                }
            }

            for a in m.achievements() {
                prop_assert!(a.is_consistent());
            }
        }

        prop_assert!(m.curriculum_state().modules.len() == 5);
    }

    #[test]
    fn completing_twice_equals_completing_once(
        intents in prop::collection::vec(intent(), 0..30),
        target in lesson_ref(),
    ) {
        let mut m = model();
        for intent in &intents {
            apply(&mut m, intent);
        }
        if m.complete_microlesson(target.0, &target.1).is_ok() {
            let modules = m.modules().to_vec();
            let progress = m.progress().clone();
            prop_assert!(m.complete_microlesson(target.0, &target.1).is_err());
            prop_assert_eq!(m.modules(), modules.as_slice());
            prop_assert_eq!(m.progress(), &progress);
        }
    }

    #[test]
    fn multiplier_only_applies_from_threshold(amount in 0u64..10_000, streak in 0u32..30) {
        let rewards = RewardConfig::default();
        let awarded = rewards.apply_multiplier(amount, streak);
        if streak >= 7 {
            prop_assert_eq!(awarded, (amount as f64 * 1.5).floor() as u64);
        } else {
            prop_assert_eq!(awarded, amount);
        }
    }
}
