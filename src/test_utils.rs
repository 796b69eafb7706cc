//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Mock data factories
//! - A store that always fails, for boundary fallback tests

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use sqlx::SqlitePool;
use std::collections::BTreeMap;

use crate::models::{UserProfile, WorkoutData, WorkoutSession, WorkoutType};
use crate::schedule::workout_type_for_date;
use crate::storage::{MemoryStore, StorageError, WorkoutStore};

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  // Run migrations
  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// A logged week-1 session with the given values per exercise
pub fn mock_session(workout_type: WorkoutType, sets: &[(&str, &[u32])]) -> WorkoutSession {
  WorkoutSession {
    logged_at: Some(Utc::now()),
    week_number: 1,
    workout_type,
    sets: sets
      .iter()
      .map(|(key, values)| (key.to_string(), values.to_vec()))
      .collect::<BTreeMap<_, _>>(),
  }
}

/// Profile with the given slots set to the given tiers
pub fn mock_profile(tiers: &[(&str, i64)]) -> UserProfile {
  let mut profile = UserProfile::new(Utc::now());
  for (slot, tier) in tiers {
    profile.tiers.insert(slot.to_string(), *tier);
  }
  profile
}

/// Log every training day from `start` for `days` days, each exercise at
/// `value`. Rest days are skipped.
pub fn seed_history(start: NaiveDate, days: i64, exercise_key: &str, value: u32) -> WorkoutData {
  (0..days)
    .map(|i| start + Duration::days(i))
    .filter_map(|date| {
      let workout_type = workout_type_for_date(date);
      (workout_type != WorkoutType::Rest)
        .then(|| (date, mock_session(workout_type, &[(exercise_key, &[value, value])])))
    })
    .collect()
}

/// ---------------------------------------------------------------------------
/// Failing Stores
/// ---------------------------------------------------------------------------

/// Every call fails as if the backing store were gone
pub struct FailingStore;

fn unavailable() -> StorageError {
  StorageError::Unavailable("test store".into())
}

#[async_trait]
impl WorkoutStore for FailingStore {
  async fn load_workout_data(&self) -> Result<WorkoutData, StorageError> {
    Err(unavailable())
  }

  async fn save_session(&self, _date: NaiveDate, _session: &WorkoutSession) -> Result<(), StorageError> {
    Err(unavailable())
  }

  async fn first_session_date(&self) -> Result<Option<NaiveDate>, StorageError> {
    Err(unavailable())
  }

  async fn set_first_session_date(&self, _date: NaiveDate) -> Result<(), StorageError> {
    Err(unavailable())
  }

  async fn load_profile(&self) -> Result<Option<UserProfile>, StorageError> {
    Err(unavailable())
  }

  async fn save_profile(&self, _profile: &UserProfile) -> Result<(), StorageError> {
    Err(unavailable())
  }

  async fn mobility_done(&self, _date: NaiveDate) -> Result<bool, StorageError> {
    Err(unavailable())
  }

  async fn set_mobility_done(&self, _date: NaiveDate) -> Result<(), StorageError> {
    Err(unavailable())
  }
}

/// History reads fail, everything else goes to the wrapped store
pub struct HistoryFailsStore {
  pub inner: MemoryStore,
}

impl HistoryFailsStore {
  pub fn new(inner: MemoryStore) -> Self {
    Self { inner }
  }
}

#[async_trait]
impl WorkoutStore for HistoryFailsStore {
  async fn load_workout_data(&self) -> Result<WorkoutData, StorageError> {
    Err(unavailable())
  }

  async fn save_session(&self, date: NaiveDate, session: &WorkoutSession) -> Result<(), StorageError> {
    self.inner.save_session(date, session).await
  }

  async fn first_session_date(&self) -> Result<Option<NaiveDate>, StorageError> {
    self.inner.first_session_date().await
  }

  async fn set_first_session_date(&self, date: NaiveDate) -> Result<(), StorageError> {
    self.inner.set_first_session_date(date).await
  }

  async fn load_profile(&self) -> Result<Option<UserProfile>, StorageError> {
    self.inner.load_profile().await
  }

  async fn save_profile(&self, profile: &UserProfile) -> Result<(), StorageError> {
    self.inner.save_profile(profile).await
  }

  async fn mobility_done(&self, date: NaiveDate) -> Result<bool, StorageError> {
    self.inner.mobility_done(date).await
  }

  async fn set_mobility_done(&self, date: NaiveDate) -> Result<(), StorageError> {
    self.inner.set_mobility_done(date).await
  }
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    // Verify key tables exist
    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('workout_sessions', 'kv_store')"
    )
    .fetch_all(&pool)
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 2, "Expected 2 tables, got {}", tables.len());

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_mock_factories_create_valid_data() {
    let session = mock_session(WorkoutType::Legs, &[("calf_raise", &[15, 16])]);
    assert!(session.is_logged());
    assert_eq!(session.values_for("calf_raise"), Some(&[15, 16][..]));

    let profile = mock_profile(&[("pull_vertical", 2)]);
    assert_eq!(profile.tier("pull_vertical"), 2);
    assert_eq!(profile.tier("push_press"), 0);
  }

  #[test]
  fn test_seed_history_skips_rest_days() {
    // Monday 2024-10-07 through Sunday 2024-10-13
    let start = NaiveDate::from_ymd_opt(2024, 10, 7).unwrap();
    let data = seed_history(start, 7, "trx_row", 10);
    assert_eq!(data.len(), 6);
    assert!(!data.contains_key(&NaiveDate::from_ymd_opt(2024, 10, 13).unwrap()));
  }
}
