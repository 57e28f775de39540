//! Day rollover
//!
//! Archives yesterday, resets per-day counters and keeps the study streak.

use chrono::NaiveDate;

use super::grade::sync_level;
use super::report::Notification;
use crate::config::EngineConfig;
use crate::progression::{check_achievements, SkillEffects};
use crate::save::{ProgressionState, DATE_FORMAT};

/// What a rollover did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rollover {
    /// A new day started and per-day counters were reset
    pub day_changed: bool,
    pub notifications: Vec<Notification>,
}

/// Bring `state` up to `today`.
///
/// Safe to call repeatedly: on a day already rolled over only the level
/// refresh and achievement check run.
pub fn roll_over(state: &mut ProgressionState, today: NaiveDate, config: &EngineConfig) -> Rollover {
    let today_str = today.format(DATE_FORMAT).to_string();
    let yesterday_str = today
        .pred_opt()
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default();

    let mut rollover = Rollover::default();

    if state.last_study_date == yesterday_str {
        state.study_streak = state.study_streak.saturating_add(1);
    } else if state.last_study_date != today_str {
        state.study_streak = 1;
    }

    if state.date != today_str {
        state.high_score = state.high_score.max(state.daily_xp);

        if !state.date.is_empty() && state.daily_xp > 0 {
            state.xp_history.insert(state.date.clone(), state.daily_xp);
        }

        log::info!(
            "New day {}: archived {} XP from {:?}",
            today_str,
            state.daily_xp,
            state.date
        );

        state.daily_xp = 0;
        state.multiplier = 1.0;
        state.streak = 0;
        state.date = today_str.clone();
        state.last_study_date = today_str.clone();

        let bonus = SkillEffects::new(&state.skills).daily_bonus();
        if bonus > 0 {
            state.daily_xp = state.daily_xp.saturating_add(bonus);
            state.total_xp = state.total_xp.saturating_add(bonus);
            rollover.notifications.push(Notification::DailyBonus { xp: bonus });
        }

        rollover.day_changed = true;
    }

    rollover.notifications.extend(sync_level(state, config));

    let unlocked = check_achievements(state, &config.xp, &today_str);
    rollover
        .notifications
        .extend(unlocked.into_iter().map(Notification::from));

    rollover
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save::AchievementRecord;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
    }

    fn played_on(d: u32) -> ProgressionState {
        let mut state = ProgressionState::fresh(&day(d).format(DATE_FORMAT).to_string());
        state.daily_xp = 80;
        state.total_xp = 80;
        state.multiplier = 2.4;
        state.streak = 7;
        state
    }

    #[test]
    fn test_next_day_archives_and_resets() {
        let mut state = played_on(10);
        let rollover = roll_over(&mut state, day(11), &EngineConfig::default());

        assert!(rollover.day_changed);
        assert_eq!(state.xp_history.get("2024-04-10"), Some(&80));
        assert_eq!(state.high_score, 80);
        assert_eq!(state.daily_xp, 0);
        assert_eq!(state.multiplier, 1.0);
        assert_eq!(state.streak, 0);
        assert_eq!(state.date, "2024-04-11");
        assert_eq!(state.study_streak, 2);
        assert_eq!(state.total_xp, 80);
    }

    #[test]
    fn test_same_day_is_idempotent() {
        let mut state = played_on(10);
        roll_over(&mut state, day(11), &EngineConfig::default());
        state.daily_xp = 40;
        state.multiplier = 1.6;
        state.streak = 3;

        let rollover = roll_over(&mut state, day(11), &EngineConfig::default());
        assert!(!rollover.day_changed);
        assert_eq!(state.daily_xp, 40);
        assert_eq!(state.multiplier, 1.6);
        assert_eq!(state.streak, 3);
        assert_eq!(state.study_streak, 2);
        assert_eq!(state.xp_history.len(), 1);
    }

    #[test]
    fn test_gap_resets_study_streak() {
        let mut state = played_on(10);
        state.study_streak = 5;
        roll_over(&mut state, day(14), &EngineConfig::default());
        assert_eq!(state.study_streak, 1);
    }

    #[test]
    fn test_empty_or_negative_day_not_archived() {
        let mut state = ProgressionState::default();
        state.daily_xp = 30;
        roll_over(&mut state, day(3), &EngineConfig::default());
        assert!(state.xp_history.is_empty());
        assert_eq!(state.high_score, 30);
        assert_eq!(state.study_streak, 1);

        let mut state = played_on(10);
        state.daily_xp = -10;
        roll_over(&mut state, day(11), &EngineConfig::default());
        assert!(state.xp_history.is_empty());
        assert_eq!(state.high_score, 0);
    }

    #[test]
    fn test_daily_bonus() {
        let mut state = played_on(10);
        state.skills.insert("daily_bonus".to_string(), 2);
        state.achievements.insert(
            "skill_starter".to_string(),
            AchievementRecord {
                earned: true,
                date: "2024-04-01".to_string(),
            },
        );

        let rollover = roll_over(&mut state, day(11), &EngineConfig::default());
        assert_eq!(rollover.notifications[0], Notification::DailyBonus { xp: 50 });
        assert_eq!(state.daily_xp, 50);
        assert_eq!(state.total_xp, 130);
        assert_eq!(state.level, 2);
        assert_eq!(state.skill_points, 1);
        assert_eq!(rollover.notifications.len(), 2);
    }

    #[test]
    fn test_bonus_saturates_total() {
        let mut state = played_on(10);
        state.total_xp = i64::MAX - 10;
        state.level = 100;
        state.skills.insert("daily_bonus".to_string(), 1);

        roll_over(&mut state, day(11), &EngineConfig::default());
        assert_eq!(state.total_xp, i64::MAX);
        assert_eq!(state.daily_xp, 25);
        assert!(state.has_achievement("novice"));
    }

    #[test]
    fn test_week_long_streak_unlocks_persistent() {
        let mut state = played_on(1);
        let config = EngineConfig::default();
        let mut unlocked = Vec::new();
        for d in 2..=7 {
            unlocked.extend(roll_over(&mut state, day(d), &config).notifications);
        }
        assert_eq!(state.study_streak, 7);
        assert!(unlocked.iter().any(|n| matches!(
            n,
            Notification::AchievementUnlocked { id: "persistent", .. }
        )));
        assert!(state.has_achievement("persistent"));
    }
}
