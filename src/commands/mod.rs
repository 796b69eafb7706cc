//! Command layer: the calls a front end makes outside a live workout.
//!
//! Reads degrade to defaults when storage fails. Writes report failures as
//! plain strings for display.

pub mod today;

use chrono::NaiveDate;
use tracing::info;

use crate::schedule::{weekly_stats, WeeklyStats};
use crate::storage::{load_workout_data_or_default, WorkoutStore};

pub use today::{today_plan, PlannedExercise, TodayPlan};

pub async fn get_weekly_stats<S: WorkoutStore + ?Sized>(store: &S, date: NaiveDate) -> WeeklyStats {
  let data = load_workout_data_or_default(store).await;
  weekly_stats(date, &data)
}

/// Record that the rest-day mobility routine was done on `date`
pub async fn mark_mobility_done<S: WorkoutStore + ?Sized>(store: &S, date: NaiveDate) -> Result<(), String> {
  store
    .set_mobility_done(date)
    .await
    .map_err(|e| format!("Failed to save mobility session: {}", e))?;
  info!(%date, "Mobility done");
  Ok(())
}
