//! End-to-end engine tests against a JSON state file.
//!
//! Each test gets its own temp directory, a manual clock and a fixed random
//! source so runs are deterministic.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use rand::rngs::mock::StepRng;

use reviewxp::engine::{ManualClock, Notification};
use reviewxp::save::AchievementRecord;
use reviewxp::{Engine, Grade, JsonFileStore, ProgressionState, StateStore};

const TODAY: &str = "2024-11-20";

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 11, 20).unwrap()
}

fn engine_at(path: &Path, clock: &ManualClock, roll: u64) -> Engine {
    Engine::new(JsonFileStore::new(path))
        .with_clock(clock.clone())
        .with_rng(StepRng::new(roll, 0))
}

fn seed(path: &Path, state: &ProgressionState) {
    JsonFileStore::new(path).save(state).unwrap();
}

fn earned(id: &str) -> (String, AchievementRecord) {
    (
        id.to_string(),
        AchievementRecord {
            earned: true,
            date: "2024-11-01".to_string(),
        },
    )
}

#[test]
fn four_goods_build_multiplier_and_streak() {
    let dir = tempfile::tempdir().unwrap();
    let clock = ManualClock::new(today());
    let mut engine = engine_at(&dir.path().join("state.json"), &clock, 0);
    engine.initialize();

    let mut multipliers = Vec::new();
    for _ in 0..4 {
        multipliers.push(engine.process_grade(Grade::Good).new_multiplier);
    }

    assert_eq!(multipliers, vec![1.2, 1.4, 1.6, 1.8]);
    assert_eq!(engine.state().streak, 4);
    assert_eq!(engine.state().daily_xp, 6 + 7 + 8 + 9);
}

#[test]
fn again_after_streak_takes_flat_penalty() {
    let dir = tempfile::tempdir().unwrap();
    let clock = ManualClock::new(today());
    let mut engine = engine_at(&dir.path().join("state.json"), &clock, 0);
    engine.initialize();
    for _ in 0..4 {
        engine.process_grade(Grade::Good);
    }

    let outcome = engine.process_grade(Grade::Again);
    assert_eq!(outcome.earned_xp, -5);
    assert_eq!(outcome.new_multiplier, 1.3);
    assert_eq!(engine.state().streak, 0);
    assert_eq!(engine.state().total_xp, 30 - 5);
}

#[test]
fn crossing_first_threshold_grants_one_point() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    let mut state = ProgressionState::fresh(TODAY);
    state.total_xp = 90;
    state.daily_xp = 90;
    state.multiplier = 4.6;
    state.skills.insert("xp_boost".to_string(), 2);
    state.achievements.extend([earned("skill_starter"), earned("multiplier_king")]);
    seed(&path, &state);

    let clock = ManualClock::new(today());
    let mut engine = engine_at(&path, &clock, 0);
    engine.initialize();

    // 10 base * 1.2 boost * 5.0 multiplier
    let outcome = engine.process_grade(Grade::Easy);
    assert_eq!(outcome.earned_xp, 60);
    assert_eq!(engine.state().total_xp, 150);
    assert!(outcome.leveled_up);
    assert_eq!(outcome.new_level, 2);
    assert_eq!(engine.state().skill_points, 1);
}

#[test]
fn streak_shield_holds_with_low_roll() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    let mut state = ProgressionState::fresh(TODAY);
    state.skills.insert("streak_shield".to_string(), 3);
    state.achievements.extend([earned("skill_starter")]);
    seed(&path, &state);

    let clock = ManualClock::new(today());
    let mut engine = engine_at(&path, &clock, 0);
    engine.initialize();
    for _ in 0..3 {
        engine.process_grade(Grade::Good);
    }

    for _ in 0..5 {
        let outcome = engine.process_grade(Grade::Hard);
        assert!(outcome.shielded);
        assert_eq!(engine.state().streak, 3);
    }
}

#[test]
fn streak_shield_fails_with_high_roll() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    let mut state = ProgressionState::fresh(TODAY);
    state.skills.insert("streak_shield".to_string(), 3);
    seed(&path, &state);

    let clock = ManualClock::new(today());
    let mut engine = engine_at(&path, &clock, u64::MAX);
    engine.initialize();
    engine.process_grade(Grade::Good);

    let outcome = engine.process_grade(Grade::Hard);
    assert!(!outcome.shielded);
    assert_eq!(engine.state().streak, 0);
}

#[test]
fn reload_same_day_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    let clock = ManualClock::new(today());

    let mut engine = engine_at(&path, &clock, 0);
    engine.initialize();
    for grade in [Grade::Good, Grade::Easy, Grade::Hard, Grade::Good] {
        engine.process_grade(grade);
    }
    let before = engine.state().clone();
    drop(engine);

    let mut reloaded = engine_at(&path, &clock, 0);
    assert!(reloaded.initialize().is_empty());
    assert_eq!(*reloaded.state(), before);

    // A second load on the same day resets nothing and archives nothing
    let mut again = engine_at(&path, &clock, 0);
    again.initialize();
    assert_eq!(*again.state(), before);
    assert!(again.xp_history().is_empty());
}

#[test]
fn next_day_load_archives_and_applies_bonus() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    let mut state = ProgressionState::fresh(TODAY);
    state.daily_xp = 120;
    state.total_xp = 500;
    state.high_score = 90;
    state.multiplier = 3.0;
    state.streak = 12;
    state.skills.insert("daily_bonus".to_string(), 1);
    state.achievements.extend([earned("skill_starter"), earned("combo_master")]);
    seed(&path, &state);

    let clock = ManualClock::new(today());
    clock.advance_days(1);
    let mut engine = engine_at(&path, &clock, 0);
    let notes = engine.initialize();

    assert_eq!(notes.first(), Some(&Notification::DailyBonus { xp: 25 }));
    let s = engine.state();
    assert_eq!(s.xp_history.get(TODAY), Some(&120));
    assert_eq!(s.high_score, 120);
    assert_eq!(s.daily_xp, 25);
    assert_eq!(s.total_xp, 525);
    assert_eq!(s.multiplier, 1.0);
    assert_eq!(s.streak, 0);
    assert_eq!(s.study_streak, 2);
    assert_eq!(s.date, "2024-11-21");
}

#[test]
fn old_record_is_backfilled() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    fs::write(
        &path,
        r#"{"daily_xp": 10, "total_xp": 260, "multiplier": 1.4, "streak": 2,
            "high_score": 75, "date": "2024-11-20", "level": 3}"#,
    )
    .unwrap();

    let clock = ManualClock::new(today());
    let mut engine = engine_at(&path, &clock, 0);
    engine.initialize();

    let s = engine.state();
    assert_eq!(s.total_xp, 260);
    assert_eq!(s.multiplier, 1.4);
    assert_eq!(s.level, 3);
    assert_eq!(s.skill_points, 0);
    assert!(s.skills.is_empty());
    assert_eq!(s.study_streak, 1);

    let on_disk = fs::read_to_string(&path).unwrap();
    assert!(on_disk.contains("\"xp_history\""));
    assert!(on_disk.contains("\"last_study_date\""));
}

#[test]
fn unreadable_file_starts_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    fs::write(&path, "\u{0}\u{0}garbage").unwrap();

    let clock = ManualClock::new(today());
    let mut engine = engine_at(&path, &clock, 0);
    engine.initialize();

    assert_eq!(*engine.state(), ProgressionState::fresh(TODAY));
    let reloaded = JsonFileStore::new(&path).load().unwrap();
    assert_eq!(reloaded, ProgressionState::fresh(TODAY));
}

#[test]
fn multiplier_stays_in_bounds() {
    let dir = tempfile::tempdir().unwrap();
    let clock = ManualClock::new(today());
    let mut engine = engine_at(&dir.path().join("state.json"), &clock, 0);
    engine.initialize();

    let pattern = [
        Grade::Easy, Grade::Easy, Grade::Again, Grade::Good, Grade::Hard,
        Grade::Easy, Grade::Easy, Grade::Easy, Grade::Good, Grade::Again,
    ];
    for grade in pattern.iter().cycle().take(200) {
        let outcome = engine.process_grade(*grade);
        assert!((1.0..=5.0).contains(&outcome.new_multiplier));
    }
}

#[test]
fn achievements_pay_out_once() {
    let dir = tempfile::tempdir().unwrap();
    let clock = ManualClock::new(today());
    let mut engine = engine_at(&dir.path().join("state.json"), &clock, 0);
    engine.initialize();

    let mut unlocked = Vec::new();
    for _ in 0..12 {
        unlocked.extend(engine.process_grade(Grade::Good).new_achievements);
    }
    assert_eq!(unlocked, vec!["combo_master"]);
    let date = engine.state().achievements["combo_master"].date.clone();

    clock.advance_days(1);
    for _ in 0..12 {
        assert!(engine.process_grade(Grade::Good).new_achievements.is_empty());
    }
    assert_eq!(engine.state().achievements["combo_master"].date, date);
}

#[test]
fn achievement_reward_level_waits_for_next_event() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    let mut state = ProgressionState::fresh(TODAY);
    state.total_xp = 90;
    state.multiplier = 4.6;
    state.skills.insert("xp_boost".to_string(), 2);
    state.achievements.extend([earned("skill_starter")]);
    seed(&path, &state);

    let clock = ManualClock::new(today());
    let mut engine = engine_at(&path, &clock, 0);
    engine.initialize();

    // 90 + 60 reaches level 2; multiplier_king's 100 XP then lands on 250
    let outcome = engine.process_grade(Grade::Easy);
    assert_eq!(outcome.new_achievements, vec!["multiplier_king"]);
    assert_eq!(engine.state().total_xp, 250);
    assert_eq!(engine.state().level, 2);
    assert_eq!(engine.state().skill_points, 1);

    let next = engine.process_grade(Grade::Good);
    assert!(next.leveled_up);
    assert_eq!(next.new_level, 3);
    assert_eq!(next.notifications.first(), Some(&Notification::LevelUp { level: 3, skill_points: 1 }));
    assert_eq!(engine.state().level, 3);
    assert_eq!(engine.state().skill_points, 2);
}
