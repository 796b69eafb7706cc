//! Calendar / Schedule Resolver
//!
//! Fixed 6-day push/pull/legs cycle, Monday to Saturday, with Sunday off.
//! Everything here is a pure function of the date and (optionally) a snapshot
//! of the workout history.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::models::{WorkoutData, WorkoutType};

/// Training days per calendar week in the cycle
pub const TRAINING_DAYS_PER_WEEK: u32 = 6;

/// Upper bound on how far back a streak walk looks
const STREAK_LOOKBACK_DAYS: u32 = 365;

const CYCLE: [WorkoutType; 6] = [
    WorkoutType::Push,
    WorkoutType::Pull,
    WorkoutType::Legs,
    WorkoutType::Push,
    WorkoutType::Pull,
    WorkoutType::Legs,
];

pub fn workout_type_for_date(date: NaiveDate) -> WorkoutType {
    match date.weekday() {
        Weekday::Sun => WorkoutType::Rest,
        day => CYCLE[day.num_days_from_monday() as usize % CYCLE.len()],
    }
}

pub fn is_training_day(date: NaiveDate) -> bool {
    workout_type_for_date(date) != WorkoutType::Rest
}

/// Earliest training day strictly after `date`
pub fn next_training_day(date: NaiveDate) -> NaiveDate {
    let mut d = date + Duration::days(1);
    // At most one rest day per week, so this runs at most twice.
    for _ in 0..7 {
        if is_training_day(d) {
            break;
        }
        d += Duration::days(1);
    }
    d
}

/// "Tue, Oct 1 - PULL"
pub fn next_training_message(date: NaiveDate) -> String {
    let next = next_training_day(date);
    format!(
        "{} - {}",
        next.format("%a, %b %-d"),
        workout_type_for_date(next).as_str().to_uppercase()
    )
}

/// Monday of the calendar week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

// ---------------------------------------------------------------------------
/// Week numbering and set schedule
// ---------------------------------------------------------------------------

/// Week 1 is the week of the first logged session (or today, for a new user).
pub fn week_number(first_session: Option<NaiveDate>, date: NaiveDate) -> u32 {
    match first_session {
        Some(first) => {
            let days = (date - first).num_days().max(0);
            (days / 7) as u32 + 1
        }
        None => 1,
    }
}

/// Step function from week number to sets per exercise.
/// `steps` holds `(from_week, sets)` pairs in ascending week order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetSchedule {
    pub steps: Vec<(u32, u32)>,
}

impl Default for SetSchedule {
    fn default() -> Self {
        Self {
            steps: vec![(1, 2), (3, 3)],
        }
    }
}

impl SetSchedule {
    pub fn sets_for_week(&self, week: u32) -> usize {
        self.steps
            .iter()
            .take_while(|(from_week, _)| *from_week <= week)
            .last()
            .or(self.steps.first())
            .map(|(_, sets)| (*sets).max(1) as usize)
            .unwrap_or(1)
    }
}

// ---------------------------------------------------------------------------
/// Completion statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekProgress {
    pub completed: u32,
    pub total: u32,
}

fn is_logged(data: &WorkoutData, date: NaiveDate) -> bool {
    data.get(&date).is_some_and(|s| s.is_logged())
}

pub fn training_days_completed_this_week(date: NaiveDate, data: &WorkoutData) -> WeekProgress {
    let start = week_start(date);
    let completed = (0..7)
        .map(|i| start + Duration::days(i))
        .filter(|d| is_logged(data, *d))
        .count() as u32;

    WeekProgress {
        completed,
        total: TRAINING_DAYS_PER_WEEK,
    }
}

/// Consecutive logged training days ending yesterday. Rest days are skipped,
/// the first unlogged training day stops the count.
pub fn training_streak(date: NaiveDate, data: &WorkoutData) -> u32 {
    let mut streak = 0;
    let mut check = date - Duration::days(1);

    for _ in 0..STREAK_LOOKBACK_DAYS {
        if is_training_day(check) {
            if !is_logged(data, check) {
                break;
            }
            streak += 1;
        }
        check -= Duration::days(1);
    }

    streak
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyStats {
    pub sessions_completed: u32,
    pub total_sets: u32,
    /// Sessions this week minus last week; None when last week is empty
    pub vs_last_week: Option<i64>,
}

pub fn weekly_stats(date: NaiveDate, data: &WorkoutData) -> WeeklyStats {
    let this_start = week_start(date);
    let last_start = this_start - Duration::days(7);

    let tally = |start: NaiveDate| -> (u32, u32) {
        data.range(start..start + Duration::days(7))
            .filter(|(_, s)| s.is_logged())
            .fold((0, 0), |(sessions, sets), (_, s)| {
                (sessions + 1, sets + s.total_sets() as u32)
            })
    };

    let (sessions_completed, total_sets) = tally(this_start);
    let (last_sessions, _) = tally(last_start);

    WeeklyStats {
        sessions_completed,
        total_sets,
        vs_last_week: (last_sessions > 0)
            .then(|| sessions_completed as i64 - last_sessions as i64),
    }
}
