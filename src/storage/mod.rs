//! Storage boundary
//!
//! The engine only talks to `WorkoutStore`. Implementations report failures
//! as `StorageError`; callers at the session boundary log them and fall back
//! to defaults, so a broken store never stops a workout.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use crate::models::{UserProfile, WorkoutData, WorkoutSession};

/// Record keys in the key-value table
pub const FIRST_SESSION_KEY: &str = "liftday_first_session";
pub const USER_PROFILE_KEY: &str = "liftday_user_profile";
pub const MOBILITY_DONE_KEY: &str = "liftday_mobility_done";

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Migration failed: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),

  #[error("Serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("Invalid date key: {0}")]
  InvalidDateKey(String),

  #[error("Storage unavailable: {0}")]
  Unavailable(String),
}

/// ---------------------------------------------------------------------------
/// Store Interface
/// ---------------------------------------------------------------------------

#[async_trait]
pub trait WorkoutStore: Send + Sync {
  async fn load_workout_data(&self) -> Result<WorkoutData, StorageError>;

  /// Replace the whole record for `date`
  async fn save_session(&self, date: NaiveDate, session: &WorkoutSession) -> Result<(), StorageError>;

  async fn first_session_date(&self) -> Result<Option<NaiveDate>, StorageError>;

  /// No-op when a first session date is already stored
  async fn set_first_session_date(&self, date: NaiveDate) -> Result<(), StorageError>;

  async fn load_profile(&self) -> Result<Option<UserProfile>, StorageError>;

  async fn save_profile(&self, profile: &UserProfile) -> Result<(), StorageError>;

  async fn mobility_done(&self, date: NaiveDate) -> Result<bool, StorageError>;

  async fn set_mobility_done(&self, date: NaiveDate) -> Result<(), StorageError>;
}

#[async_trait]
impl<S: WorkoutStore + ?Sized> WorkoutStore for Arc<S> {
  async fn load_workout_data(&self) -> Result<WorkoutData, StorageError> {
    (**self).load_workout_data().await
  }

  async fn save_session(&self, date: NaiveDate, session: &WorkoutSession) -> Result<(), StorageError> {
    (**self).save_session(date, session).await
  }

  async fn first_session_date(&self) -> Result<Option<NaiveDate>, StorageError> {
    (**self).first_session_date().await
  }

  async fn set_first_session_date(&self, date: NaiveDate) -> Result<(), StorageError> {
    (**self).set_first_session_date(date).await
  }

  async fn load_profile(&self) -> Result<Option<UserProfile>, StorageError> {
    (**self).load_profile().await
  }

  async fn save_profile(&self, profile: &UserProfile) -> Result<(), StorageError> {
    (**self).save_profile(profile).await
  }

  async fn mobility_done(&self, date: NaiveDate) -> Result<bool, StorageError> {
    (**self).mobility_done(date).await
  }

  async fn set_mobility_done(&self, date: NaiveDate) -> Result<(), StorageError> {
    (**self).set_mobility_done(date).await
  }
}

/// ---------------------------------------------------------------------------
/// Boundary Fallbacks
/// ---------------------------------------------------------------------------

/// Full history, or `None` when the store can't be read
pub async fn try_load_workout_data<S: WorkoutStore + ?Sized>(store: &S) -> Option<WorkoutData> {
  store
    .load_workout_data()
    .await
    .map_err(|e| warn!(error = %e, "Failed to load workout data, starting from empty history"))
    .ok()
}

/// Full history, or empty history when the store can't be read
pub async fn load_workout_data_or_default<S: WorkoutStore + ?Sized>(store: &S) -> WorkoutData {
  try_load_workout_data(store).await.unwrap_or_default()
}

pub async fn first_session_date_or_default<S: WorkoutStore + ?Sized>(store: &S) -> Option<NaiveDate> {
  store.first_session_date().await.unwrap_or_else(|e| {
    warn!(error = %e, "Failed to load first session date");
    None
  })
}

/// Stored profile, or a new one. Users with logged history but no profile
/// get the migrated profile so they don't restart at beginner variants.
///
/// `history` is `None` when the history read failed. A newly built profile
/// is saved right away, but only when the history was actually read.
pub async fn load_or_bootstrap_profile<S: WorkoutStore + ?Sized>(
  store: &S,
  history: Option<&WorkoutData>,
  now: DateTime<Utc>,
) -> UserProfile {
  match store.load_profile().await {
    Ok(Some(profile)) => return profile,
    Ok(None) => {}
    Err(e) => warn!(error = %e, "Failed to load profile, rebuilding"),
  }

  let Some(data) = history else {
    warn!("History unavailable, using a temporary profile");
    return UserProfile::new(now);
  };

  let profile = if data.values().any(|s| s.is_logged()) {
    info!("Existing history without a profile, migrating");
    UserProfile::migrated(now)
  } else {
    UserProfile::new(now)
  };

  if let Err(e) = store.save_profile(&profile).await {
    warn!(error = %e, "Failed to save new profile");
  }
  profile
}
