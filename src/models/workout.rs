use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Serialized form of a calendar date: sortable `YYYY-MM-DD`
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

pub fn date_key(date: NaiveDate) -> String {
  date.format(DATE_KEY_FORMAT).to_string()
}

pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
  NaiveDate::parse_from_str(key, DATE_KEY_FORMAT).ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutType {
  Push,
  Pull,
  Legs,
  Rest,
}

impl WorkoutType {
  pub fn as_str(&self) -> &'static str {
    match self {
      WorkoutType::Push => "push",
      WorkoutType::Pull => "pull",
      WorkoutType::Legs => "legs",
      WorkoutType::Rest => "rest",
    }
  }
}

impl std::fmt::Display for WorkoutType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl std::str::FromStr for WorkoutType {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "push" => Ok(Self::Push),
      "pull" => Ok(Self::Pull),
      "legs" => Ok(Self::Legs),
      "rest" => Ok(Self::Rest),
      _ => Err(format!("Unknown workout type: {}", s)),
    }
  }
}

/// One trained day. `sets` maps exercise key to the ordered per-set values
/// (reps, or held seconds for timed exercises).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutSession {
  pub logged_at: Option<DateTime<Utc>>,
  pub week_number: u32,
  pub workout_type: WorkoutType,
  #[serde(default)]
  pub sets: BTreeMap<String, Vec<u32>>,
}

impl WorkoutSession {
  pub fn is_logged(&self) -> bool {
    self.logged_at.is_some()
  }

  pub fn values_for(&self, exercise_key: &str) -> Option<&[u32]> {
    self.sets.get(exercise_key).map(Vec::as_slice)
  }

  pub fn total_sets(&self) -> usize {
    self.sets.values().map(Vec::len).sum()
  }
}

/// Full history keyed by calendar date. `BTreeMap` keeps date order, which is
/// the order every "most recent prior session" lookup relies on.
pub type WorkoutData = BTreeMap<NaiveDate, WorkoutSession>;
