use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use focusquest_lib::{
    badges::BadgeCatalog,
    db::{Database, DEFAULT_USER_ID},
    progression::StreakMode,
    session::SessionController,
    FocusError,
};
use tempfile::{tempdir, TempDir};

fn setup(mode: StreakMode) -> (TempDir, SessionController) {
    let dir = tempdir().unwrap();
    let db = Database::new(dir.path().join("focusquest.sqlite3")).unwrap();
    let controller = SessionController::new(db, Arc::new(BadgeCatalog::predefined()), mode);
    (dir, controller)
}

fn noon(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()
}

/// Starts a session at `at` and completes it 25 minutes later.
async fn focus_at(
    controller: &SessionController,
    at: DateTime<Utc>,
) -> focusquest_lib::session::CompletionOutcome {
    let session = controller
        .start_session_at(DEFAULT_USER_ID, 25, at)
        .await
        .unwrap();
    controller
        .complete_session_at(&session.id, at + Duration::minutes(25))
        .await
        .unwrap()
}

#[tokio::test]
async fn first_session_earns_xp_without_level_up() {
    let (_dir, controller) = setup(StreakMode::AnyNewDay);

    let outcome = focus_at(&controller, noon(1)).await;
    assert_eq!(outcome.xp_earned, 50);
    assert!(!outcome.leveled_up);
    assert_eq!(outcome.user.user.xp, 50);
    assert_eq!(outcome.user.user.level, 1);
    assert_eq!(outcome.user.xp_for_next_level, 100);
    assert_eq!(outcome.user.xp_progress_percentage, 50.0);
    assert!(outcome.new_badges.is_empty());
}

#[tokio::test]
async fn crossing_a_hundred_levels_up() {
    let (_dir, controller) = setup(StreakMode::AnyNewDay);

    let db = controller.database();
    let mut user = db.load_user(DEFAULT_USER_ID).await.unwrap().unwrap();
    user.xp = 80;
    db.save_user(&user).await.unwrap();

    let outcome = focus_at(&controller, noon(1)).await;
    assert!(outcome.leveled_up);
    assert_eq!(outcome.user.user.xp, 130);
    assert_eq!(outcome.user.user.level, 2);
}

#[tokio::test]
async fn five_sessions_reach_level_three_without_total_badges() {
    let (_dir, controller) = setup(StreakMode::AnyNewDay);

    let mut last = None;
    for i in 0..5 {
        last = Some(focus_at(&controller, noon(1) + Duration::hours(i)).await);
    }
    let last = last.unwrap();
    assert_eq!(last.user.user.xp, 250);
    assert_eq!(last.user.user.level, 3);
    assert_eq!(last.user.user.current_streak, 1);

    let overview = controller.get_user_badges(DEFAULT_USER_ID).await.unwrap();
    assert!(overview
        .earned
        .iter()
        .all(|earned| !earned.badge.id.starts_with("total_")));
    assert_eq!(overview.total_earned, 0);
}

#[tokio::test]
async fn lifecycle_errors_leave_state_untouched() {
    let (_dir, controller) = setup(StreakMode::AnyNewDay);

    let missing = controller.complete_session_at("no-such-session", noon(1)).await;
    assert!(matches!(missing, Err(FocusError::NotFound(_))));

    let zero = controller.start_session_at(DEFAULT_USER_ID, 0, noon(1)).await;
    assert!(matches!(zero, Err(FocusError::InvalidInput(_))));

    let outcome = focus_at(&controller, noon(1)).await;
    let twice = controller
        .complete_session_at(&outcome.session.id, noon(2))
        .await;
    assert!(matches!(twice, Err(FocusError::InvalidInput(_))));

    let profile = controller
        .get_user_profile(DEFAULT_USER_ID)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(profile.user.xp, 50);
    assert_eq!(profile.user.current_streak, 1);
    assert_eq!(
        profile.user.last_session_date,
        Some(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
    );
}

#[tokio::test]
async fn three_days_in_a_row_unlock_streak_badge_once() {
    let (_dir, controller) = setup(StreakMode::ConsecutiveDays);

    let day1 = focus_at(&controller, noon(1)).await;
    assert_eq!(day1.user.user.current_streak, 1);
    let day2 = focus_at(&controller, noon(2)).await;
    assert_eq!(day2.user.user.current_streak, 2);
    assert!(day2.new_badges.is_empty());

    let day3 = focus_at(&controller, noon(3)).await;
    assert_eq!(day3.user.user.current_streak, 3);
    let unlocked: Vec<&str> = day3.new_badges.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(unlocked, vec!["streak_3"]);

    let same_day = focus_at(&controller, noon(3) + Duration::hours(2)).await;
    assert_eq!(same_day.user.user.current_streak, 3);
    assert!(same_day.new_badges.is_empty());

    let rechecked = controller
        .check_and_award_badges_at(DEFAULT_USER_ID, noon(3))
        .await
        .unwrap();
    assert!(rechecked.is_empty());

    let overview = controller.get_user_badges(DEFAULT_USER_ID).await.unwrap();
    assert_eq!(overview.total_earned, 1);
    assert_eq!(overview.earned[0].badge.id, "streak_3");
}

#[tokio::test]
async fn streak_modes_differ_after_a_gap() {
    let (_legacy_dir, legacy) = setup(StreakMode::AnyNewDay);
    focus_at(&legacy, noon(1)).await;
    let after_gap = focus_at(&legacy, noon(5)).await;
    assert_eq!(after_gap.user.user.current_streak, 2);

    let (_strict_dir, strict) = setup(StreakMode::ConsecutiveDays);
    focus_at(&strict, noon(1)).await;
    focus_at(&strict, noon(2)).await;
    let after_gap = focus_at(&strict, noon(5)).await;
    assert_eq!(after_gap.user.user.current_streak, 1);
    assert_eq!(after_gap.user.user.longest_streak, 2);
}

#[tokio::test]
async fn ten_sessions_in_a_week_unlock_weekly_badge() {
    let (_dir, controller) = setup(StreakMode::AnyNewDay);

    for i in 0..9 {
        let outcome = focus_at(&controller, noon(1) + Duration::hours(i)).await;
        assert!(outcome.new_badges.iter().all(|b| b.id != "weekly_10"));
    }
    let tenth = focus_at(&controller, noon(2)).await;
    assert!(tenth.new_badges.iter().any(|b| b.id == "weekly_10"));
}

#[tokio::test]
async fn history_and_read_views() {
    let (_dir, controller) = setup(StreakMode::AnyNewDay);

    for day in 1..=3 {
        focus_at(&controller, noon(day)).await;
    }
    let pending = controller
        .start_session_at(DEFAULT_USER_ID, 25, noon(3) + Duration::hours(3))
        .await
        .unwrap();

    let recent = controller
        .get_user_sessions(DEFAULT_USER_ID, Some(2))
        .await
        .unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].id, pending.id);
    assert!(recent[0].started_at > recent[1].started_at);

    let all = controller
        .get_user_sessions(DEFAULT_USER_ID, None)
        .await
        .unwrap();
    assert_eq!(all.len(), 4);

    let now = noon(3) + Duration::hours(4);
    let stats = controller
        .get_user_statistics_at(DEFAULT_USER_ID, now)
        .await
        .unwrap();
    assert_eq!(stats.total_sessions, 4);
    assert_eq!(stats.completed_sessions, 3);
    assert_eq!(stats.total_focus_minutes, 75);
    assert_eq!(stats.average_focus_minutes, 25.0);
    assert_eq!(stats.completion_rate, 75.0);
    assert_eq!(stats.weekly_sessions, 4);

    let daily = controller
        .get_daily_activity_at(DEFAULT_USER_ID, 7, now)
        .await
        .unwrap();
    assert_eq!(daily.len(), 7);
    assert_eq!(daily[6].date, NaiveDate::from_ymd_opt(2024, 3, 3).unwrap());
    assert_eq!(
        daily.iter().map(|d| d.completed).collect::<Vec<_>>(),
        vec![0, 0, 0, 0, 1, 1, 1]
    );

    let weekly = controller
        .get_weekly_comparison_at(DEFAULT_USER_ID, now)
        .await
        .unwrap();
    assert_eq!(weekly.this_week.completed, 3);
    assert_eq!(weekly.this_week.focus_minutes, 75);
    assert_eq!(weekly.last_week.completed, 0);
    assert!(!weekly.last_week_available);
}
