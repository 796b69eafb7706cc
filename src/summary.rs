//! End-of-session summary
//!
//! Built once when a workout completes, from the logged values and the
//! history that already includes today's session.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::{Exercise, Unit};
use crate::models::{WorkoutData, WorkoutType};
use crate::progression::{previous_value, TierDecision, TierEvaluation, MAX_REPS};
use crate::schedule::{training_days_completed_this_week, training_streak, WeekProgress};

/// Total-session counts that get called out
pub const MILESTONES: [u32; 6] = [10, 25, 50, 100, 200, 365];

/// ---------------------------------------------------------------------------
/// First-Set Comparison
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
  Improved,
  Decreased,
  Same,
  /// No previous value to compare against
  #[serde(rename = "none")]
  NoHistory,
}

pub fn compare_first_set(current: Option<u32>, previous: Option<u32>) -> Comparison {
  match (current, previous) {
    (Some(cur), Some(prev)) if cur > prev => Comparison::Improved,
    (Some(cur), Some(prev)) if cur < prev => Comparison::Decreased,
    (Some(_), Some(_)) => Comparison::Same,
    _ => Comparison::NoHistory,
  }
}

/// Milestone hit by a total logged-session count, if any
pub fn milestone_for(total_sessions: u32) -> Option<u32> {
  MILESTONES.iter().copied().find(|m| *m == total_sessions)
}

/// ---------------------------------------------------------------------------
/// Summary
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseResult {
  pub key: String,
  pub name: String,
  pub unit: Unit,
  pub values: Vec<u32>,
  pub comparison: Comparison,
  /// Every logged value at the ceiling
  pub maxed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
  pub date: NaiveDate,
  pub workout_type: WorkoutType,
  pub week_number: u32,
  pub exercises: Vec<ExerciseResult>,
  pub maxed_exercises: Vec<String>,
  pub advanced_slots: Vec<String>,
  pub regressed_slots: Vec<String>,
  pub milestone: Option<u32>,
  pub week_progress: WeekProgress,
  pub streak: u32,
  /// False when the session record could not be written
  pub persisted: bool,
}

pub struct SummaryInput<'a> {
  pub date: NaiveDate,
  pub workout_type: WorkoutType,
  pub week_number: u32,
  pub exercises: &'a [&'static Exercise],
  pub logged: &'a BTreeMap<String, Vec<u32>>,
  pub evaluations: &'a [(&'static str, TierEvaluation)],
  /// History including today's session
  pub data: &'a WorkoutData,
  pub persisted: bool,
}

impl SessionSummary {
  pub fn build(input: SummaryInput<'_>) -> Self {
    let mut exercises: Vec<ExerciseResult> = Vec::new();
    for exercise in input.exercises {
      if exercises.iter().any(|e| e.key == exercise.key) {
        continue;
      }
      let Some(values) = input.logged.get(exercise.key).filter(|v| !v.is_empty()) else {
        continue;
      };
      let previous = previous_value(exercise.key, 0, input.date, input.data);
      exercises.push(ExerciseResult {
        key: exercise.key.to_string(),
        name: exercise.name.to_string(),
        unit: exercise.unit,
        values: values.clone(),
        comparison: compare_first_set(values.first().copied(), previous),
        maxed: values.iter().all(|v| *v >= MAX_REPS),
      });
    }

    let maxed_exercises = exercises
      .iter()
      .filter(|e| e.maxed)
      .map(|e| e.key.clone())
      .collect();

    let slots_with = |decision: TierDecision| -> Vec<String> {
      input
        .evaluations
        .iter()
        .filter(|(_, eval)| eval.decision == decision)
        .map(|(slot, _)| slot.to_string())
        .collect()
    };

    let total_sessions = input.data.values().filter(|s| s.is_logged()).count() as u32;

    Self {
      date: input.date,
      workout_type: input.workout_type,
      week_number: input.week_number,
      exercises,
      maxed_exercises,
      advanced_slots: slots_with(TierDecision::Advanced),
      regressed_slots: slots_with(TierDecision::Regressed),
      milestone: milestone_for(total_sessions),
      week_progress: training_days_completed_this_week(input.date, input.data),
      // Streak counts up to yesterday; look from tomorrow so today is included
      streak: training_streak(input.date + Duration::days(1), input.data),
      persisted: input.persisted,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog;
  use crate::test_utils::mock_session;

  fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 10, day).unwrap()
  }

  #[test]
  fn test_compare_first_set() {
    assert_eq!(compare_first_set(Some(12), Some(10)), Comparison::Improved);
    assert_eq!(compare_first_set(Some(9), Some(10)), Comparison::Decreased);
    assert_eq!(compare_first_set(Some(10), Some(10)), Comparison::Same);
    assert_eq!(compare_first_set(Some(10), None), Comparison::NoHistory);
    assert_eq!(
      serde_json::to_string(&Comparison::NoHistory).unwrap(),
      "\"none\""
    );
  }

  #[test]
  fn test_milestones() {
    assert_eq!(milestone_for(10), Some(10));
    assert_eq!(milestone_for(365), Some(365));
    assert_eq!(milestone_for(11), None);
    assert_eq!(milestone_for(0), None);
  }

  #[test]
  fn test_build_summary() {
    let row = catalog::exercise("trx_row").unwrap();
    let face_pull = catalog::exercise("face_pull").unwrap();

    // Tue 8th and Wed 9th logged, Mon 7th logged too
    let mut data = WorkoutData::new();
    data.insert(d(7), mock_session(WorkoutType::Push, &[("trx_pushup", &[10, 10])]));
    data.insert(d(8), mock_session(WorkoutType::Pull, &[("trx_row", &[10, 10])]));
    let mut logged = BTreeMap::new();
    logged.insert("trx_row".to_string(), vec![12, 11]);
    logged.insert("face_pull".to_string(), vec![20, 20]);
    data.insert(
      d(9),
      mock_session(WorkoutType::Pull, &[("trx_row", &[12, 11]), ("face_pull", &[20, 20])]),
    );

    let evaluations = [(
      "pull_rear_delt",
      TierEvaluation {
        decision: TierDecision::Advanced,
        previous_tier: 0,
        new_tier: 1,
      },
    )];

    let summary = SessionSummary::build(SummaryInput {
      date: d(9),
      workout_type: WorkoutType::Pull,
      week_number: 1,
      exercises: &[row, face_pull],
      logged: &logged,
      evaluations: &evaluations,
      data: &data,
      persisted: true,
    });

    assert_eq!(summary.exercises.len(), 2);
    assert_eq!(summary.exercises[0].comparison, Comparison::Improved);
    assert_eq!(summary.exercises[1].comparison, Comparison::NoHistory);
    assert_eq!(summary.maxed_exercises, vec!["face_pull".to_string()]);
    assert_eq!(summary.advanced_slots, vec!["pull_rear_delt".to_string()]);
    assert!(summary.regressed_slots.is_empty());
    assert_eq!(summary.milestone, None);
    assert_eq!(summary.week_progress.completed, 3);
    assert_eq!(summary.week_progress.total, 6);
    assert_eq!(summary.streak, 3);
  }

  #[test]
  fn test_unlogged_exercises_are_left_out() {
    let row = catalog::exercise("trx_row").unwrap();
    let data = WorkoutData::new();
    let summary = SessionSummary::build(SummaryInput {
      date: d(9),
      workout_type: WorkoutType::Pull,
      week_number: 1,
      exercises: &[row],
      logged: &BTreeMap::new(),
      evaluations: &[],
      data: &data,
      persisted: false,
    });
    assert!(summary.exercises.is_empty());
    assert!(!summary.persisted);
  }
}
