//! Session history rollups.
//!
//! Weekly and monthly figures use rolling windows of 7 and 30 days measured
//! back from the evaluation time, not calendar weeks or months.

mod types;

pub use types::{DailyActivity, PeriodSummary, Statistics, WeeklyComparison};

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use crate::db::PomodoroSession;

pub const WEEK_WINDOW: Duration = Duration::days(7);
pub const MONTH_WINDOW: Duration = Duration::days(30);

/// Widest daily activity series served, one leap year.
pub const MAX_ACTIVITY_DAYS: u32 = 366;

pub const LAST_WEEK_UNAVAILABLE_NOTE: &str =
    "last week comparison is not implemented yet; lastWeek is always zero";

#[derive(Default)]
struct Tally {
    sessions: u32,
    completed: u32,
    focus_minutes: u32,
}

fn tally<'a>(sessions: impl IntoIterator<Item = &'a PomodoroSession>) -> Tally {
    sessions.into_iter().fold(Tally::default(), |mut acc, session| {
        acc.sessions += 1;
        if session.is_completed() {
            acc.completed += 1;
            acc.focus_minutes = acc.focus_minutes.saturating_add(session.duration_minutes);
        }
        acc
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Totals over every session plus the rolling weekly and monthly slices.
/// Empty input yields zeros rather than a division fault.
pub fn aggregate(user_id: i64, sessions: &[PomodoroSession], now: DateTime<Utc>) -> Statistics {
    let all = tally(sessions);
    let week_start = now - WEEK_WINDOW;
    let month_start = now - MONTH_WINDOW;
    let weekly = tally(sessions.iter().filter(|s| s.started_at >= week_start));
    let monthly = tally(sessions.iter().filter(|s| s.started_at >= month_start));

    let average_focus_minutes = if all.completed > 0 {
        f64::from(all.focus_minutes) / f64::from(all.completed)
    } else {
        0.0
    };
    let completion_rate = if all.sessions > 0 {
        f64::from(all.completed) / f64::from(all.sessions) * 100.0
    } else {
        0.0
    };

    Statistics {
        user_id,
        total_sessions: all.sessions,
        completed_sessions: all.completed,
        total_focus_minutes: all.focus_minutes,
        average_focus_minutes: round2(average_focus_minutes),
        completion_rate: round2(completion_rate),
        weekly_sessions: weekly.sessions,
        weekly_completed: weekly.completed,
        weekly_focus_minutes: weekly.focus_minutes,
        monthly_sessions: monthly.sessions,
        monthly_completed: monthly.completed,
        monthly_focus_minutes: monthly.focus_minutes,
    }
}

/// One entry per calendar day for the `days` days ending on `now`'s date,
/// oldest first. Completed sessions are bucketed by the date of
/// `completed_at` in `now`'s time zone; days without any report zeros.
pub fn daily_activity<Tz: TimeZone>(
    sessions: &[PomodoroSession],
    days: u32,
    now: DateTime<Tz>,
) -> Vec<DailyActivity> {
    let tz = now.timezone();
    let today = now.date_naive();

    let mut buckets: HashMap<NaiveDate, (u32, u32)> = HashMap::new();
    for session in sessions.iter().filter(|s| s.is_completed()) {
        if let Some(completed_at) = session.completed_at {
            let date = completed_at.with_timezone(&tz).date_naive();
            let entry = buckets.entry(date).or_default();
            entry.0 += 1;
            entry.1 = entry.1.saturating_add(session.duration_minutes);
        }
    }

    (0..days)
        .rev()
        .filter_map(|back| today.checked_sub_signed(Duration::days(i64::from(back))))
        .map(|date| {
            let (completed, focus_minutes) = buckets.get(&date).copied().unwrap_or_default();
            DailyActivity {
                date,
                completed,
                focus_minutes,
            }
        })
        .collect()
}

/// `this_week_sessions` are the sessions started in the trailing 7 days.
/// The previous week is not computed; it is reported as zero and flagged.
pub fn weekly_comparison(this_week_sessions: &[PomodoroSession]) -> WeeklyComparison {
    let this_week = tally(this_week_sessions);
    WeeklyComparison {
        this_week: PeriodSummary {
            completed: this_week.completed,
            focus_minutes: this_week.focus_minutes,
        },
        last_week: PeriodSummary::default(),
        last_week_available: false,
        note: LAST_WEEK_UNAVAILABLE_NOTE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn pending(started_at: DateTime<Utc>, minutes: u32) -> PomodoroSession {
        PomodoroSession::start(1, minutes, started_at)
    }

    fn completed(started_at: DateTime<Utc>, minutes: u32) -> PomodoroSession {
        let mut session = pending(started_at, minutes);
        session
            .complete(minutes * 2, started_at + Duration::minutes(i64::from(minutes)))
            .unwrap();
        session
    }

    fn noon(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn empty_history_has_no_division_fault() {
        let stats = aggregate(1, &[], Utc::now());
        assert_eq!(stats.total_sessions, 0);
        assert_eq!(stats.completed_sessions, 0);
        assert_eq!(stats.completion_rate, 0.0);
        assert_eq!(stats.average_focus_minutes, 0.0);
    }

    #[test]
    fn only_pending_sessions() {
        let now = Utc::now();
        let stats = aggregate(1, &[pending(now, 25), pending(now, 25)], now);
        assert_eq!(stats.total_sessions, 2);
        assert_eq!(stats.completion_rate, 0.0);
        assert_eq!(stats.average_focus_minutes, 0.0);
    }

    #[test]
    fn totals_and_windows() {
        let now = noon(2024, 6, 30);
        let sessions = vec![
            completed(now - Duration::days(1), 25),
            completed(now - Duration::days(3), 50),
            pending(now - Duration::days(2), 25),
            completed(now - Duration::days(20), 15),
            completed(now - Duration::days(45), 30),
            pending(now - Duration::days(60), 25),
        ];

        let stats = aggregate(7, &sessions, now);
        assert_eq!(stats.user_id, 7);
        assert_eq!(stats.total_sessions, 6);
        assert_eq!(stats.completed_sessions, 4);
        assert_eq!(stats.total_focus_minutes, 120);
        assert_eq!(stats.average_focus_minutes, 30.0);
        assert_eq!(stats.completion_rate, 66.67);

        assert_eq!(stats.weekly_sessions, 3);
        assert_eq!(stats.weekly_completed, 2);
        assert_eq!(stats.weekly_focus_minutes, 75);

        assert_eq!(stats.monthly_sessions, 4);
        assert_eq!(stats.monthly_completed, 3);
        assert_eq!(stats.monthly_focus_minutes, 90);
    }

    #[test]
    fn daily_activity_is_dense_and_oldest_first() {
        let now = noon(2024, 6, 30);
        let yesterday = now - Duration::days(1);
        let sessions = vec![completed(yesterday - Duration::hours(1), 25)];

        let days = daily_activity(&sessions, 7, now);
        assert_eq!(days.len(), 7);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2024, 6, 24).unwrap());
        assert_eq!(days[6].date, NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());

        let active: Vec<&DailyActivity> = days.iter().filter(|d| d.completed > 0).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].date, NaiveDate::from_ymd_opt(2024, 6, 29).unwrap());
        assert_eq!(active[0].completed, 1);
        assert_eq!(active[0].focus_minutes, 25);
        assert!(days
            .iter()
            .filter(|d| d.date != active[0].date)
            .all(|d| d.completed == 0 && d.focus_minutes == 0));
    }

    #[test]
    fn daily_activity_groups_same_day_and_ignores_old_or_pending() {
        let now = noon(2024, 6, 30);
        let sessions = vec![
            completed(now - Duration::hours(3), 25),
            completed(now - Duration::hours(2), 50),
            pending(now - Duration::hours(1), 25),
            completed(now - Duration::days(12), 25),
        ];

        let days = daily_activity(&sessions, 3, now);
        assert_eq!(days.len(), 3);
        assert_eq!(days[2].completed, 2);
        assert_eq!(days[2].focus_minutes, 75);
        assert_eq!(days.iter().map(|d| d.completed).sum::<u32>(), 2);
    }

    #[test]
    fn focus_minute_sums_saturate_instead_of_wrapping() {
        let now = noon(2024, 6, 30);
        let sessions: Vec<PomodoroSession> = (1..=3)
            .map(|hours| {
                let mut session = pending(now - Duration::hours(hours), u32::MAX / 2);
                session.complete(u32::MAX - 1, now).unwrap();
                session
            })
            .collect();

        let stats = aggregate(1, &sessions, now);
        assert_eq!(stats.completed_sessions, 3);
        assert_eq!(stats.total_focus_minutes, u32::MAX);

        let days = daily_activity(&sessions, 1, now);
        assert_eq!(days[0].completed, 3);
        assert_eq!(days[0].focus_minutes, u32::MAX);
    }

    #[test]
    fn zero_days_is_empty() {
        assert!(daily_activity(&[], 0, Utc::now()).is_empty());
    }

    #[test]
    fn weekly_comparison_flags_stubbed_last_week() {
        let now = Utc::now();
        let this_week = vec![
            completed(now - Duration::days(1), 25),
            completed(now - Duration::days(2), 25),
            pending(now, 25),
        ];

        let comparison = weekly_comparison(&this_week);
        assert_eq!(comparison.this_week.completed, 2);
        assert_eq!(comparison.this_week.focus_minutes, 50);
        assert_eq!(comparison.last_week, PeriodSummary::default());
        assert!(!comparison.last_week_available);
        assert!(!comparison.note.is_empty());
    }
}
