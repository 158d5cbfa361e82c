//! Daily-login streak rule.

use chrono::NaiveDate;

/// Streak after a login on `today`.
///
/// Returns `None` when the learner already logged in today. Otherwise the
/// streak grows by one if the previous login was exactly yesterday and
/// restarts at 1 in every other case (first login, a gap, or a clock that
/// moved backwards).
pub fn next_streak(last_login: Option<NaiveDate>, today: NaiveDate, streak: u32) -> Option<u32> {
    match last_login {
        Some(last) if last == today => None,
        Some(last) if today.pred_opt() == Some(last) => Some(streak.saturating_add(1)),
        _ => Some(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn same_day_is_noop() {
        assert_eq!(next_streak(Some(date("2024-06-01")), date("2024-06-01"), 4), None);
    }

    #[test]
    fn consecutive_day_extends() {
        assert_eq!(next_streak(Some(date("2024-05-31")), date("2024-06-01"), 4), Some(5));
    }

    #[test]
    fn gap_or_first_login_resets() {
        assert_eq!(next_streak(Some(date("2024-05-29")), date("2024-06-01"), 4), Some(1));
        assert_eq!(next_streak(None, date("2024-06-01"), 0), Some(1));
        assert_eq!(next_streak(Some(date("2024-06-02")), date("2024-06-01"), 4), Some(1));
    }
}
