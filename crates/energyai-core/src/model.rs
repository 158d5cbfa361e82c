//! Progression model: the learner's curriculum, counters and badges.
//!
//! The model is a plain owned value. Views read snapshots through the
//! accessors and send intents through the `&mut self` operations, so two
//! rapid "complete lesson" taps are serialized and the second one sees
//! `AlreadyCompleted`.
//!
//! Every operation validates its preconditions before touching state.
//! Events raised along the way are buffered and delivered to subscribers
//! only once the operation has finished.
//!
//! ## Usage
//!
//! ```ignore
//! let mut model = ProgressionModel::from_seed(Seed::embedded()?, rewards, levels)?;
//! let mut events = model.subscribe_channel();
//! model.complete_microlesson(2, "2.3")?;
//! while let Ok(event) = events.try_recv() { /* notify */ }
//! ```

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::achievements::Achievement;
use crate::curriculum::{validate_curriculum, Module, Status};
use crate::error::{ProgressError, SeedError};
use crate::events::{Event, EventBus, SubscriptionId};
use crate::gamification::{streak, LevelTable, RewardConfig};
use crate::leaderboard::Leaderboard;
use crate::progress::{ProgressExport, ProgressSnapshot, UserProgress};
use crate::seed::Seed;

/// Outcome of [`ProgressionModel::start_or_resume_microlesson`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LessonStart {
    pub module_id: u32,
    pub lesson_id: String,
    /// True the first time the lesson is opened. Display only.
    pub first_visit: bool,
    /// The lesson was already completed and is being revisited.
    pub review: bool,
    pub points_awarded: u64,
}

/// Outcome of [`ProgressionModel::complete_microlesson`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LessonCompletion {
    pub module_id: u32,
    pub lesson_id: String,
    pub points_awarded: u64,
    /// Next lesson in the same module that moved from Locked to Current.
    pub unlocked_lesson: Option<String>,
    pub module_completed: bool,
    /// Modules that moved from Locked to Current because this one completed.
    pub unlocked_modules: Vec<u32>,
}

/// Outcome of a login on a new calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyLogin {
    pub date: NaiveDate,
    pub points_awarded: u64,
    pub streak_days: u32,
}

/// Curriculum and badge state persisted between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurriculumState {
    pub seed_version: u32,
    pub modules: Vec<Module>,
    pub achievements: Vec<Achievement>,
}

#[derive(Debug)]
pub struct ProgressionModel {
    modules: Vec<Module>,
    achievements: Vec<Achievement>,
    leaderboard: Leaderboard,
    progress: UserProgress,
    last_login: Option<NaiveDate>,
    rewards: RewardConfig,
    levels: LevelTable,
    seed_version: u32,
    bus: EventBus,
    pending: Vec<Event>,
}

impl ProgressionModel {
    /// Build a session from seed data.
    ///
    /// Derived fields (level, counts, overall progress) are computed here and
    /// badges whose criterion is already met are marked earned. No subscriber
    /// can exist yet, so nothing is announced.
    ///
    /// # Errors
    /// Returns [`SeedError::Invariant`] if the seed is inconsistent.
    pub fn from_seed(
        seed: Seed,
        rewards: RewardConfig,
        levels: LevelTable,
    ) -> Result<Self, SeedError> {
        seed.validate()?;
        let leaderboard = seed.ranked_leaderboard()?;
        let progress = UserProgress {
            total_points: seed.progress.total_points,
            streak_days: seed.progress.streak_days,
            study_minutes: seed.progress.study_minutes,
            practice_sessions: seed.progress.practice_sessions,
            prompt_tests: seed.progress.prompt_tests,
            quiz_count: seed.progress.quiz_count,
            average_quiz_score: seed.progress.average_quiz_score,
            ..Default::default()
        };
        let mut model = Self {
            modules: seed.modules,
            achievements: seed.achievements,
            leaderboard,
            progress,
            last_login: None,
            rewards,
            levels,
            seed_version: seed.version,
            bus: EventBus::default(),
            pending: Vec::new(),
        };
        model.rederive();
        Ok(model)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn module(&self, id: u32) -> Result<&Module, ProgressError> {
        self.modules
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| ProgressError::module_not_found(id))
    }

    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }

    pub fn progress(&self) -> &UserProgress {
        &self.progress
    }

    pub fn last_login(&self) -> Option<NaiveDate> {
        self.last_login
    }

    pub fn rewards(&self) -> &RewardConfig {
        &self.rewards
    }

    pub fn levels(&self) -> &LevelTable {
        &self.levels
    }

    pub fn seed_version(&self) -> u32 {
        self.seed_version
    }

    /// Leaderboard with the current user's points synced and ranks recomputed.
    pub fn leaderboard(&self) -> Leaderboard {
        self.leaderboard.with_user_points(self.progress.total_points)
    }

    pub fn export_progress_snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            progress: self.progress.clone(),
            taken_at: Utc::now(),
        }
    }

    pub fn export_progress(&self, user_id: &str) -> ProgressExport {
        ProgressExport::from_progress(user_id, &self.progress, Utc::now())
    }

    pub fn curriculum_state(&self) -> CurriculumState {
        CurriculumState {
            seed_version: self.seed_version,
            modules: self.modules.clone(),
            achievements: self.achievements.clone(),
        }
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe<F>(&mut self, mut callback: F) -> SubscriptionId
    where
        F: FnMut(&Event) + Send + 'static,
    {
        self.bus.subscribe(Box::new(move |event| {
            callback(event);
            true
        }))
    }

    /// Subscribe through a channel; convenient for front ends that drain
    /// notifications after each intent. The subscription ends on the first
    /// publish after the receiver is dropped.
    pub fn subscribe_channel(&mut self) -> mpsc::UnboundedReceiver<Event> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.bus
            .subscribe(Box::new(move |event| tx.send(event.clone()).is_ok()));
        rx
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    // ── Session restore ──────────────────────────────────────────────

    /// Replace seeded curriculum state with state saved by an earlier session.
    ///
    /// Returns `Ok(false)` and keeps the seed when the saved state belongs to
    /// another seed version or a different module set.
    ///
    /// # Errors
    /// Returns [`SeedError::Invariant`] if the saved state is inconsistent.
    pub fn restore_curriculum(&mut self, state: CurriculumState) -> Result<bool, SeedError> {
        if state.seed_version != self.seed_version {
            debug!(
                saved = state.seed_version,
                current = self.seed_version,
                "ignoring curriculum saved for another seed version"
            );
            return Ok(false);
        }
        let same_shape = state.modules.len() == self.modules.len()
            && state
                .modules
                .iter()
                .zip(&self.modules)
                .all(|(saved, seeded)| saved.id == seeded.id);
        if !same_shape {
            return Ok(false);
        }

        let mut modules = state.modules;
        for m in &mut modules {
            m.recompute_progress();
        }
        validate_curriculum(&modules)?;
        self.modules = modules;

        for saved in state.achievements.iter().filter(|a| a.earned) {
            if let Some(a) = self.achievements.iter_mut().find(|a| a.id == saved.id) {
                a.earned = true;
                a.earned_at = saved.earned_at.or(a.earned_at).or_else(|| Some(Utc::now()));
            }
        }
        self.rederive();
        Ok(true)
    }

    /// Adopt counters saved by an earlier session. Derived fields are
    /// recomputed from the current curriculum.
    pub fn restore_progress(&mut self, saved: UserProgress) {
        self.progress = saved;
        self.rederive();
    }

    pub fn restore_last_login(&mut self, date: Option<NaiveDate>) {
        self.last_login = date;
    }

    // ── Intents ──────────────────────────────────────────────────────

    /// Open a lesson. Every start or resume of an unfinished lesson earns
    /// the lesson-start reward; completed lessons can be reviewed without
    /// changing status or earning points.
    ///
    /// # Errors
    /// `NotFound` for unknown ids, `LessonLocked` for a locked lesson,
    /// `InvalidState` if the owning module is locked.
    pub fn start_or_resume_microlesson(
        &mut self,
        module_id: u32,
        lesson_id: &str,
    ) -> Result<LessonStart, ProgressError> {
        let (mi, li) = self.locate(module_id, lesson_id)?;
        let lesson = &self.modules[mi].lessons[li];
        if lesson.status == Status::Locked {
            return Err(ProgressError::LessonLocked(lesson_id.to_string()));
        }
        if self.modules[mi].status == Status::Locked {
            return Err(ProgressError::InvalidState(format!(
                "module {module_id} is locked"
            )));
        }

        // An unlocked lesson that is not completed is already the module's
        // single Current lesson, so opening it never changes any status.
        let review = lesson.status == Status::Completed;
        let first_visit = !lesson.started;
        self.modules[mi].lessons[li].started = true;

        let points_awarded = if review {
            0
        } else {
            self.grant(
                self.rewards.lesson_start,
                format!("Bắt đầu bài {lesson_id}"),
            )
        };
        debug!(module_id, lesson_id, first_visit, review, "lesson opened");
        self.refresh_aggregates();
        self.evaluate_achievements();
        self.flush();

        Ok(LessonStart {
            module_id,
            lesson_id: lesson_id.to_string(),
            first_visit,
            review,
            points_awarded,
        })
    }

    /// Mark a lesson completed, unlock what follows and award points.
    ///
    /// # Errors
    /// `NotFound`, `LessonLocked` (a lesson must be Current before it can be
    /// completed), `AlreadyCompleted` (nothing changes, no points), or
    /// `InvalidState` if the owning module is locked.
    pub fn complete_microlesson(
        &mut self,
        module_id: u32,
        lesson_id: &str,
    ) -> Result<LessonCompletion, ProgressError> {
        let (mi, li) = self.locate(module_id, lesson_id)?;
        match self.modules[mi].lessons[li].status {
            Status::Locked => return Err(ProgressError::LessonLocked(lesson_id.to_string())),
            Status::Completed => {
                return Err(ProgressError::AlreadyCompleted(lesson_id.to_string()))
            }
            Status::Current => {}
        }
        if self.modules[mi].status == Status::Locked {
            return Err(ProgressError::InvalidState(format!(
                "module {module_id} is locked"
            )));
        }

        let mut unlocked_lesson = None;
        let mut module_completed = false;
        let minutes;
        {
            let module = &mut self.modules[mi];
            let lesson = &mut module.lessons[li];
            lesson.status = Status::Completed;
            lesson.started = true;
            minutes = lesson.duration_min();

            if let Some(next) = module.lessons.get_mut(li + 1) {
                if next.status == Status::Locked {
                    next.status = Status::Current;
                    unlocked_lesson = Some(next.id.clone());
                }
            }
            module.recompute_progress();
            if module.all_lessons_completed() {
                module.status = Status::Completed;
                module_completed = true;
            }
        }

        let mut unlocked_modules = Vec::new();
        if module_completed {
            info!(module_id, "module completed");
            for m in self.modules.iter_mut().filter(|m| {
                m.unlock
                    .as_ref()
                    .is_some_and(|req| req.after_module == module_id)
            }) {
                if m.unlock() {
                    m.recompute_progress();
                    info!(module_id = m.id, "module unlocked");
                    unlocked_modules.push(m.id);
                }
            }
        }

        self.progress.study_minutes = self.progress.study_minutes.saturating_add(minutes);
        self.refresh_aggregates();
        let points_awarded = self.grant(
            self.rewards.lesson_complete,
            format!("Hoàn thành bài {lesson_id}"),
        );
        debug!(module_id, lesson_id, points_awarded, "lesson completed");
        self.evaluate_achievements();
        self.flush();

        Ok(LessonCompletion {
            module_id,
            lesson_id: lesson_id.to_string(),
            points_awarded,
            unlocked_lesson,
            module_completed,
            unlocked_modules,
        })
    }

    /// Add points, applying the streak multiplier. Returns the amount added.
    pub fn award_points(&mut self, amount: u64, reason: &str) -> u64 {
        let awarded = self.grant(amount, reason.to_string());
        self.evaluate_achievements();
        self.flush();
        awarded
    }

    /// Raise the level if total points allow it. Returns the new level when
    /// it changed.
    pub fn check_level_up(&mut self) -> Option<u32> {
        let level = self.level_up();
        self.flush();
        level
    }

    /// Record a login on `today`. Calling it again on the same day returns
    /// `None` and changes nothing.
    pub fn record_daily_login(&mut self, today: NaiveDate) -> Option<DailyLogin> {
        let streak_days = streak::next_streak(self.last_login, today, self.progress.streak_days)?;
        // The multiplier uses the streak as it stood before this login.
        let points_awarded = self.grant(self.rewards.daily_login, "Đăng nhập hằng ngày".into());
        self.progress.streak_days = streak_days;
        self.last_login = Some(today);
        debug!(%today, streak_days, "daily login recorded");
        self.evaluate_achievements();
        self.flush();
        Some(DailyLogin {
            date: today,
            points_awarded,
            streak_days,
        })
    }

    /// A practice-lab template was used.
    pub fn record_practice_attempt(&mut self) -> u64 {
        self.progress.practice_sessions += 1;
        let awarded = self.grant(self.rewards.practice, "Sử dụng Phòng Thực Hành".into());
        self.evaluate_achievements();
        self.flush();
        awarded
    }

    /// A prompt was submitted in the practice lab.
    pub fn record_prompt_test(&mut self) -> u64 {
        self.progress.prompt_tests += 1;
        let awarded = self.grant(self.rewards.practice, "Kiểm tra Prompt".into());
        self.evaluate_achievements();
        self.flush();
        awarded
    }

    /// Fold a quiz score (0..=1) into the running average; a passing score
    /// earns the quiz reward.
    ///
    /// # Errors
    /// `InvalidState` when the score is outside 0..=1.
    pub fn record_quiz_score(&mut self, score: f64) -> Result<u64, ProgressError> {
        if !(0.0..=1.0).contains(&score) {
            return Err(ProgressError::InvalidState(format!(
                "quiz score {score} is outside 0..=1"
            )));
        }
        self.progress.push_quiz_score(score);
        let awarded = if score >= self.rewards.quiz_pass_score {
            self.grant(self.rewards.quiz_pass, "Vượt qua bài kiểm tra".into())
        } else {
            0
        };
        self.evaluate_achievements();
        self.flush();
        Ok(awarded)
    }

    /// Mark an achievement earned. Returns false if it already was.
    ///
    /// # Errors
    /// `NotFound` for an unknown id.
    pub fn unlock_achievement(&mut self, id: &str) -> Result<bool, ProgressError> {
        let idx = self
            .achievements
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| ProgressError::achievement_not_found(id))?;
        let now = Utc::now();
        let unlocked = self.achievements[idx].earn(now);
        if unlocked {
            info!(achievement = id, "achievement unlocked");
            self.pending.push(Event::AchievementUnlocked {
                id: id.to_string(),
                at: now,
            });
        }
        self.flush();
        Ok(unlocked)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn locate(&self, module_id: u32, lesson_id: &str) -> Result<(usize, usize), ProgressError> {
        let mi = self
            .modules
            .iter()
            .position(|m| m.id == module_id)
            .ok_or_else(|| ProgressError::module_not_found(module_id))?;
        let li = self.modules[mi]
            .lesson_index(lesson_id)
            .ok_or_else(|| ProgressError::lesson_not_found(lesson_id))?;
        Ok((mi, li))
    }

    fn grant(&mut self, amount: u64, reason: String) -> u64 {
        let awarded = self
            .rewards
            .apply_multiplier(amount, self.progress.streak_days);
        self.progress.total_points = self.progress.total_points.saturating_add(awarded);
        debug!(awarded, reason = %reason, total = self.progress.total_points, "points awarded");
        self.pending.push(Event::PointsAwarded {
            amount: awarded,
            reason,
            at: Utc::now(),
        });
        self.level_up();
        awarded
    }

    fn level_up(&mut self) -> Option<u32> {
        let level = self.levels.level_for(self.progress.total_points);
        if level <= self.progress.level {
            return None;
        }
        self.progress.level = level;
        self.progress.level_title = self.levels.title_for(level);
        info!(level, "level up");
        self.pending.push(Event::LevelUp {
            new_level: level,
            title: self.progress.level_title.clone(),
            at: Utc::now(),
        });
        Some(level)
    }

    fn refresh_aggregates(&mut self) {
        let p = &mut self.progress;
        p.total_modules = self.modules.len() as u32;
        p.completed_modules = self
            .modules
            .iter()
            .filter(|m| m.status == Status::Completed)
            .count() as u32;
        p.completed_lessons = self
            .modules
            .iter()
            .map(|m| m.completed_count() as u32)
            .sum();
        p.overall_progress = if self.modules.is_empty() {
            0.0
        } else {
            self.modules.iter().map(|m| m.progress).sum::<f64>() / self.modules.len() as f64
        };
        let current = self.modules.iter().find(|m| m.status == Status::Current);
        p.current_module = current.map(|m| m.id);
        p.current_lesson = current
            .and_then(Module::current_lesson)
            .map(|l| l.id.clone());
    }

    fn evaluate_achievements(&mut self) {
        let now = Utc::now();
        for a in self.achievements.iter_mut().filter(|a| !a.earned) {
            let met = a.criterion.is_some_and(|c| c.is_met(&self.progress));
            if met && a.earn(now) {
                info!(achievement = %a.id, "achievement unlocked");
                self.pending.push(Event::AchievementUnlocked {
                    id: a.id.clone(),
                    at: now,
                });
            }
        }
    }

    /// Recompute every derived field without announcing anything. Used at
    /// session start, where the level is derived rather than "reached".
    fn rederive(&mut self) {
        self.refresh_aggregates();
        self.progress.level = self.levels.level_for(self.progress.total_points);
        self.progress.level_title = self.levels.title_for(self.progress.level);
        self.evaluate_achievements();
        self.pending.clear();
    }

    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let events = std::mem::take(&mut self.pending);
        self.bus.publish(events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> ProgressionModel {
        ProgressionModel::from_seed(
            Seed::embedded().unwrap(),
            RewardConfig::default(),
            LevelTable::default(),
        )
        .unwrap()
    }

    #[test]
    fn seed_derives_aggregates() {
        let m = model();
        let p = m.progress();
        assert_eq!(p.total_modules, 5);
        assert_eq!(p.completed_modules, 1);
        assert_eq!(p.completed_lessons, 8);
        assert_eq!(p.current_module, Some(2));
        assert_eq!(p.current_lesson.as_deref(), Some("2.3"));
        assert_eq!(p.level, 3);
    }

    #[test]
    fn module_lookup_reports_not_found() {
        let m = model();
        assert_eq!(m.module(2).unwrap().id, 2);
        assert_eq!(m.module(42).unwrap_err(), ProgressError::module_not_found(42));
    }

    #[test]
    fn starting_locked_lesson_fails_without_side_effects() {
        let mut m = model();
        let before = m.progress().clone();
        assert_eq!(
            m.start_or_resume_microlesson(2, "2.4").unwrap_err(),
            ProgressError::LessonLocked("2.4".into())
        );
        assert_eq!(m.progress(), &before);
    }

    #[test]
    fn every_resume_of_current_lesson_earns_start_reward() {
        let mut m = model();
        m.restore_progress(UserProgress {
            streak_days: 0,
            ..m.progress().clone()
        });
        let before = m.progress().total_points;
        let statuses = |m: &ProgressionModel| -> Vec<Status> {
            m.module(2).unwrap().lessons.iter().map(|l| l.status).collect()
        };
        let seeded = statuses(&m);
        let first = m.start_or_resume_microlesson(2, "2.3").unwrap();
        assert!(!first.first_visit);
        assert_eq!(first.points_awarded, 5);
        let again = m.start_or_resume_microlesson(2, "2.3").unwrap();
        assert_eq!(again.points_awarded, 5);
        assert_eq!(m.progress().total_points, before + 10);
        assert_eq!(statuses(&m), seeded);
    }

    #[test]
    fn dropped_channel_receiver_is_unsubscribed() {
        let mut m = model();
        let rx = m.subscribe_channel();
        let mut live = m.subscribe_channel();
        assert_eq!(m.bus.len(), 2);
        drop(rx);
        m.award_points(1, "after drop");
        assert_eq!(m.bus.len(), 1);
        assert!(live.try_recv().is_ok());
    }

    #[test]
    fn first_visit_is_reported_once() {
        let mut m = model();
        m.complete_microlesson(2, "2.3").unwrap();
        assert!(m.start_or_resume_microlesson(2, "2.4").unwrap().first_visit);
        assert!(!m.start_or_resume_microlesson(2, "2.4").unwrap().first_visit);
    }

    #[test]
    fn reviewing_completed_lesson_keeps_status() {
        let mut m = model();
        let start = m.start_or_resume_microlesson(2, "2.1").unwrap();
        assert!(start.review);
        assert_eq!(start.points_awarded, 0);
        let module = m.module(2).unwrap();
        assert_eq!(module.lesson("2.1").unwrap().status, Status::Completed);
        assert_eq!(module.current_lesson().unwrap().id, "2.3");
    }

    #[test]
    fn restore_ignores_other_seed_version() {
        let mut m = model();
        let mut state = m.curriculum_state();
        state.seed_version += 1;
        state.modules[1].lessons[2].status = Status::Completed;
        assert!(!m.restore_curriculum(state).unwrap());
        assert_eq!(m.module(2).unwrap().current_lesson().unwrap().id, "2.3");
    }

    #[test]
    fn restore_rejects_inconsistent_state() {
        let mut m = model();
        let mut state = m.curriculum_state();
        state.modules[1].lessons[4].status = Status::Completed;
        assert!(m.restore_curriculum(state).is_err());
    }

    #[test]
    fn quiz_score_out_of_range_is_invalid() {
        let mut m = model();
        assert!(matches!(
            m.record_quiz_score(1.5),
            Err(ProgressError::InvalidState(_))
        ));
        assert!(m.record_quiz_score(f64::NAN).is_err());
    }

    #[test]
    fn passing_quiz_updates_average_and_awards() {
        let mut m = model();
        let awarded = m.record_quiz_score(0.9).unwrap();
        assert_eq!(awarded, 150);
        assert_eq!(m.progress().quiz_count, 2);
        assert!((m.progress().average_quiz_score - 0.91).abs() < 1e-9);
        assert_eq!(m.record_quiz_score(0.5).unwrap(), 0);
    }
}
