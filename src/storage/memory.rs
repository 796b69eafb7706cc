use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::{Mutex, MutexGuard};

use super::{StorageError, WorkoutStore};
use crate::models::{UserProfile, WorkoutData, WorkoutSession};

#[derive(Debug, Default, Clone)]
struct MemoryState {
  data: WorkoutData,
  first_session: Option<NaiveDate>,
  profile: Option<UserProfile>,
  mobility_done: Option<NaiveDate>,
}

/// In-process store for tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryStore {
  state: Mutex<MemoryState>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_data(data: WorkoutData) -> Self {
    Self {
      state: Mutex::new(MemoryState {
        data,
        ..MemoryState::default()
      }),
    }
  }

  fn lock(&self) -> MutexGuard<'_, MemoryState> {
    self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }

  /// Snapshot of the stored sessions
  pub fn data(&self) -> WorkoutData {
    self.lock().data.clone()
  }

  pub fn profile(&self) -> Option<UserProfile> {
    self.lock().profile.clone()
  }

  pub fn set_profile(&self, profile: UserProfile) {
    self.lock().profile = Some(profile);
  }

  pub fn set_first_session(&self, date: NaiveDate) {
    self.lock().first_session = Some(date);
  }
}

#[async_trait]
impl WorkoutStore for MemoryStore {
  async fn load_workout_data(&self) -> Result<WorkoutData, StorageError> {
    Ok(self.lock().data.clone())
  }

  async fn save_session(&self, date: NaiveDate, session: &WorkoutSession) -> Result<(), StorageError> {
    self.lock().data.insert(date, session.clone());
    Ok(())
  }

  async fn first_session_date(&self) -> Result<Option<NaiveDate>, StorageError> {
    Ok(self.lock().first_session)
  }

  async fn set_first_session_date(&self, date: NaiveDate) -> Result<(), StorageError> {
    self.lock().first_session.get_or_insert(date);
    Ok(())
  }

  async fn load_profile(&self) -> Result<Option<UserProfile>, StorageError> {
    Ok(self.lock().profile.clone())
  }

  async fn save_profile(&self, profile: &UserProfile) -> Result<(), StorageError> {
    self.lock().profile = Some(profile.clone());
    Ok(())
  }

  async fn mobility_done(&self, date: NaiveDate) -> Result<bool, StorageError> {
    Ok(self.lock().mobility_done == Some(date))
  }

  async fn set_mobility_done(&self, date: NaiveDate) -> Result<(), StorageError> {
    self.lock().mobility_done = Some(date);
    Ok(())
  }
}
