//! Best-effort platform feedback: sounds, haptics, notifications, wake lock.
//!
//! None of these may affect the workout state machine. Every method has a
//! no-op default and callers swallow failures.

#[derive(Debug, thiserror::Error)]
pub enum CueError {
  #[error("Feature unavailable: {0}")]
  Unavailable(String),

  #[error("Permission denied: {0}")]
  PermissionDenied(String),
}

pub trait Cues: Send + Sync {
  fn session_started(&self) -> Result<(), CueError> {
    Ok(())
  }

  fn set_logged(&self, _hit_target: bool) -> Result<(), CueError> {
    Ok(())
  }

  /// Fired once each at 3, 2 and 1 seconds of rest left
  fn countdown_tick(&self, _seconds_left: u32) -> Result<(), CueError> {
    Ok(())
  }

  fn rest_complete(&self) -> Result<(), CueError> {
    Ok(())
  }

  fn rest_skipped(&self) -> Result<(), CueError> {
    Ok(())
  }

  fn next_exercise(&self, _name: &str) -> Result<(), CueError> {
    Ok(())
  }

  fn exercise_ready(&self) -> Result<(), CueError> {
    Ok(())
  }

  fn set_undone(&self) -> Result<(), CueError> {
    Ok(())
  }

  fn session_complete(&self) -> Result<(), CueError> {
    Ok(())
  }

  /// Local notification for when rest ends while the app is in background
  fn schedule_rest_notification(&self, _seconds: u32) -> Result<(), CueError> {
    Ok(())
  }

  fn cancel_rest_notification(&self) -> Result<(), CueError> {
    Ok(())
  }

  fn acquire_wake_lock(&self) -> Result<(), CueError> {
    Ok(())
  }

  fn release_wake_lock(&self) -> Result<(), CueError> {
    Ok(())
  }
}

/// Headless hosts and tests
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCues;

impl Cues for NoopCues {}

impl<K: Cues + ?Sized> Cues for std::sync::Arc<K> {
  fn session_started(&self) -> Result<(), CueError> {
    (**self).session_started()
  }
  fn set_logged(&self, hit_target: bool) -> Result<(), CueError> {
    (**self).set_logged(hit_target)
  }
  fn countdown_tick(&self, seconds_left: u32) -> Result<(), CueError> {
    (**self).countdown_tick(seconds_left)
  }
  fn rest_complete(&self) -> Result<(), CueError> {
    (**self).rest_complete()
  }
  fn rest_skipped(&self) -> Result<(), CueError> {
    (**self).rest_skipped()
  }
  fn next_exercise(&self, name: &str) -> Result<(), CueError> {
    (**self).next_exercise(name)
  }
  fn exercise_ready(&self) -> Result<(), CueError> {
    (**self).exercise_ready()
  }
  fn set_undone(&self) -> Result<(), CueError> {
    (**self).set_undone()
  }
  fn session_complete(&self) -> Result<(), CueError> {
    (**self).session_complete()
  }
  fn schedule_rest_notification(&self, seconds: u32) -> Result<(), CueError> {
    (**self).schedule_rest_notification(seconds)
  }
  fn cancel_rest_notification(&self) -> Result<(), CueError> {
    (**self).cancel_rest_notification()
  }
  fn acquire_wake_lock(&self) -> Result<(), CueError> {
    (**self).acquire_wake_lock()
  }
  fn release_wake_lock(&self) -> Result<(), CueError> {
    (**self).release_wake_lock()
  }
}
