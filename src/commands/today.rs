//! Today's plan: what the user sees before starting a workout

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::Unit;
use crate::models::WorkoutType;
use crate::progression::{is_deload_week, previous_value, should_increase_difficulty, targets};
use crate::schedule::{
  next_training_message, training_days_completed_this_week, training_streak, week_number, weekly_stats,
  workout_type_for_date, WeekProgress, WeeklyStats,
};
use crate::session::SessionSettings;
use crate::storage::{
  first_session_date_or_default, load_or_bootstrap_profile, try_load_workout_data, WorkoutStore,
};
use crate::tiers::exercises_for_workout;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedExercise {
  pub key: String,
  pub name: String,
  pub unit: Unit,
  pub instruction: String,
  pub video_id: Option<String>,
  pub targets: Vec<u32>,
  /// Last session's value per set
  pub previous: Vec<Option<u32>>,
  /// Last logged session maxed every set
  pub increase_difficulty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodayPlan {
  pub date: NaiveDate,
  pub workout_type: WorkoutType,
  pub week_number: u32,
  pub deload: bool,
  pub sets_per_exercise: usize,
  pub exercises: Vec<PlannedExercise>,
  pub completed_today: bool,
  pub mobility_done: bool,
  pub streak: u32,
  pub week_progress: WeekProgress,
  pub weekly_stats: WeeklyStats,
  /// e.g. "Tue, Oct 8 - PULL"
  pub next_training: String,
}

/// Build the plan for `date`. Never fails: unreadable storage gives a
/// first-day plan.
pub async fn today_plan<S: WorkoutStore + ?Sized>(
  store: &S,
  settings: &SessionSettings,
  date: NaiveDate,
) -> TodayPlan {
  let history = try_load_workout_data(store).await;
  let first_session = first_session_date_or_default(store).await;
  let profile = load_or_bootstrap_profile(store, history.as_ref(), Utc::now()).await;
  let data = history.unwrap_or_default();

  let workout_type = workout_type_for_date(date);
  let week = week_number(first_session, date);

  let exercises = exercises_for_workout(workout_type, &profile.tiers)
    .into_iter()
    .map(|exercise| {
      let targets = targets(exercise.key, week, date, &data, &settings.sets);
      let previous = (0..targets.len())
        .map(|set| previous_value(exercise.key, set, date, &data))
        .collect();
      PlannedExercise {
        key: exercise.key.to_string(),
        name: exercise.name.to_string(),
        unit: exercise.unit,
        instruction: exercise.instruction.to_string(),
        video_id: exercise.video_id.map(str::to_string),
        targets,
        previous,
        increase_difficulty: should_increase_difficulty(exercise.key, &data),
      }
    })
    .collect();

  let mobility_done = store.mobility_done(date).await.unwrap_or_else(|e| {
    warn!(error = %e, "Failed to read mobility marker");
    false
  });

  TodayPlan {
    date,
    workout_type,
    week_number: week,
    deload: is_deload_week(week),
    sets_per_exercise: settings.sets.sets_for_week(week),
    exercises,
    completed_today: data.get(&date).is_some_and(|s| s.is_logged()),
    mobility_done,
    streak: training_streak(date, &data),
    week_progress: training_days_completed_this_week(date, &data),
    weekly_stats: weekly_stats(date, &data),
    next_training: next_training_message(date),
  }
}
