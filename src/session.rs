//! Live Workout Session
//!
//! One `Workout` drives a single day's session through
//! idle -> exercising -> resting -> transitioning -> complete.
//!
//! Key principles:
//! - Only completion writes anything: quitting leaves storage untouched
//! - Rest time is read from the injected clock on every observation, so a
//!   host that was suspended catches up on its next `tick`/`resume`
//! - Storage and cue failures are logged and swallowed here, never surfaced

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::catalog::{self, Exercise};
use crate::config::AppConfig;
use crate::cues::{CueError, Cues};
use crate::models::{UserProfile, WorkoutData, WorkoutSession, WorkoutType};
use crate::progression::{self, evaluate_tier_progress, ProgressionRules};
use crate::schedule::{self, SetSchedule};
use crate::storage::{
  first_session_date_or_default, load_or_bootstrap_profile, try_load_workout_data, WorkoutStore,
};
use crate::summary::{SessionSummary, SummaryInput};
use crate::tiers::{exercises_for_workout, resolve_exercise_key};
use crate::timer::{Clock, RestCountdown};

/// Countdown cues fire at these seconds remaining
const COUNTDOWN_CUE_SECS: u32 = 3;

/// ---------------------------------------------------------------------------
/// Settings & State
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
  pub rest_seconds: u32,
  pub sets: SetSchedule,
  pub rules: ProgressionRules,
}

impl Default for SessionSettings {
  fn default() -> Self {
    Self::from(&AppConfig::default())
  }
}

impl From<&AppConfig> for SessionSettings {
  fn from(config: &AppConfig) -> Self {
    Self {
      rest_seconds: config.rest_seconds,
      sets: config.sets.clone(),
      rules: config.rules.clone(),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutState {
  Idle,
  Exercising,
  Resting,
  /// Announcing the next exercise
  Transitioning,
  Complete,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
  #[error("No exercises scheduled for a {0} day")]
  RestDay(WorkoutType),

  #[error("Cannot {event} while {state:?}")]
  InvalidTransition {
    event: &'static str,
    state: WorkoutState,
  },
}

fn swallow(cue: &'static str, result: Result<(), CueError>) {
  if let Err(e) = result {
    debug!(cue, error = %e, "Cue failed");
  }
}

/// ---------------------------------------------------------------------------
/// Workout
/// ---------------------------------------------------------------------------

pub struct Workout<S, C, K> {
  store: S,
  clock: C,
  cues: K,
  settings: SessionSettings,

  date: NaiveDate,
  workout_type: WorkoutType,
  week_number: u32,
  data: WorkoutData,
  first_session: Option<NaiveDate>,
  profile: UserProfile,
  exercises: Vec<&'static Exercise>,

  state: WorkoutState,
  exercise_index: usize,
  set_index: usize,
  logged: BTreeMap<String, Vec<u32>>,
  rest: Option<RestCountdown>,
  last_countdown_cue: Option<u32>,
  notification_pending: bool,
  summary: Option<SessionSummary>,
}

impl<S: WorkoutStore, C: Clock, K: Cues> Workout<S, C, K> {
  /// Load history and profile for `date`. Never fails: an unreadable store
  /// yields empty history and a fresh profile.
  pub async fn load(store: S, clock: C, cues: K, settings: SessionSettings, date: NaiveDate) -> Self {
    let history = try_load_workout_data(&store).await;
    let first_session = first_session_date_or_default(&store).await;
    let profile = load_or_bootstrap_profile(&store, history.as_ref(), clock.now()).await;
    let data = history.unwrap_or_default();

    let workout_type = schedule::workout_type_for_date(date);
    let week_number = schedule::week_number(first_session, date);
    let exercises = exercises_for_workout(workout_type, &profile.tiers);

    debug!(%date, %workout_type, week_number, exercises = exercises.len(), "Workout loaded");

    Self {
      store,
      clock,
      cues,
      settings,
      date,
      workout_type,
      week_number,
      data,
      first_session,
      profile,
      exercises,
      state: WorkoutState::Idle,
      exercise_index: 0,
      set_index: 0,
      logged: BTreeMap::new(),
      rest: None,
      last_countdown_cue: None,
      notification_pending: false,
      summary: None,
    }
  }

  // -------------------------------------------------------------------------
  // Read access
  // -------------------------------------------------------------------------

  pub fn state(&self) -> WorkoutState {
    self.state
  }

  pub fn date(&self) -> NaiveDate {
    self.date
  }

  pub fn workout_type(&self) -> WorkoutType {
    self.workout_type
  }

  pub fn week_number(&self) -> u32 {
    self.week_number
  }

  pub fn is_deload(&self) -> bool {
    progression::is_deload_week(self.week_number)
  }

  pub fn exercises(&self) -> &[&'static Exercise] {
    &self.exercises
  }

  pub fn exercise_index(&self) -> usize {
    self.exercise_index
  }

  pub fn set_index(&self) -> usize {
    self.set_index
  }

  pub fn sets_per_exercise(&self) -> usize {
    self.settings.sets.sets_for_week(self.week_number)
  }

  pub fn current_exercise(&self) -> Option<&'static Exercise> {
    self.exercises.get(self.exercise_index).copied()
  }

  pub fn current_targets(&self) -> Vec<u32> {
    match self.current_exercise() {
      Some(exercise) => progression::targets(
        exercise.key,
        self.week_number,
        self.date,
        &self.data,
        &self.settings.sets,
      ),
      None => Vec::new(),
    }
  }

  pub fn current_target(&self) -> Option<u32> {
    self.current_targets().get(self.set_index).copied()
  }

  /// Last session's value for the current exercise and set
  pub fn previous_value(&self) -> Option<u32> {
    let exercise = self.current_exercise()?;
    progression::previous_value(exercise.key, self.set_index, self.date, &self.data)
  }

  pub fn logged_values(&self, exercise_key: &str) -> &[u32] {
    self.logged.get(exercise_key).map(Vec::as_slice).unwrap_or(&[])
  }

  /// Seconds of rest left, or None when not resting
  pub fn rest_remaining(&self) -> Option<u32> {
    self.rest.map(|rest| rest.remaining_secs(self.clock.now()))
  }

  pub fn is_rest_paused(&self) -> bool {
    self.rest.is_some_and(|rest| rest.is_paused())
  }

  pub fn profile(&self) -> &UserProfile {
    &self.profile
  }

  pub fn data(&self) -> &WorkoutData {
    &self.data
  }

  pub fn summary(&self) -> Option<&SessionSummary> {
    self.summary.as_ref()
  }

  fn invalid(&self, event: &'static str) -> SessionError {
    SessionError::InvalidTransition {
      event,
      state: self.state,
    }
  }

  // -------------------------------------------------------------------------
  // Transitions
  // -------------------------------------------------------------------------

  /// Begin (or redo) today's workout. Resets everything logged so far.
  pub fn start(&mut self) -> Result<(), SessionError> {
    if !matches!(self.state, WorkoutState::Idle | WorkoutState::Complete) {
      return Err(self.invalid("start"));
    }

    // Tiers may have moved since load if a session was completed
    self.exercises = exercises_for_workout(self.workout_type, &self.profile.tiers);
    if self.exercises.is_empty() {
      return Err(SessionError::RestDay(self.workout_type));
    }

    self.exercise_index = 0;
    self.set_index = 0;
    self.logged.clear();
    self.rest = None;
    self.last_countdown_cue = None;
    self.summary = None;
    self.state = WorkoutState::Exercising;

    swallow("acquire_wake_lock", self.cues.acquire_wake_lock());
    swallow("session_started", self.cues.session_started());
    info!(date = %self.date, workout_type = %self.workout_type, week = self.week_number, "Workout started");
    Ok(())
  }

  /// Record one set for the current exercise
  pub async fn log_set(&mut self, value: u32) -> Result<WorkoutState, SessionError> {
    if self.state != WorkoutState::Exercising {
      return Err(self.invalid("log a set"));
    }
    let Some(exercise) = self.current_exercise() else {
      return Err(self.invalid("log a set"));
    };

    let hit_target = self.current_target().map_or(true, |t| value >= t);
    self.logged.entry(exercise.key.to_string()).or_default().push(value);
    swallow("set_logged", self.cues.set_logged(hit_target));
    debug!(exercise = exercise.key, set = self.set_index, value, "Set logged");

    let last_set = self.set_index + 1 >= self.sets_per_exercise();
    let last_exercise = self.exercise_index + 1 >= self.exercises.len();
    if last_set && last_exercise {
      self.complete().await;
    } else {
      self.rest = Some(RestCountdown::start(self.clock.now(), self.settings.rest_seconds));
      self.last_countdown_cue = None;
      self.state = WorkoutState::Resting;
    }
    Ok(self.state)
  }

  /// Observe the rest countdown. Fires the 3-2-1 cues and advances once the
  /// rest period is over, however long ago that was.
  pub async fn tick(&mut self) -> WorkoutState {
    if self.state != WorkoutState::Resting {
      return self.state;
    }
    let Some(rest) = self.rest else {
      return self.state;
    };

    let remaining = rest.remaining_secs(self.clock.now());
    if remaining == 0 {
      swallow("rest_complete", self.cues.rest_complete());
      self.advance_after_rest().await;
    } else if remaining <= COUNTDOWN_CUE_SECS && self.last_countdown_cue.map_or(true, |last| remaining < last) {
      self.last_countdown_cue = Some(remaining);
      swallow("countdown_tick", self.cues.countdown_tick(remaining));
    }
    self.state
  }

  /// End the rest period now
  pub async fn skip_rest(&mut self) -> Result<WorkoutState, SessionError> {
    if self.state != WorkoutState::Resting {
      return Err(self.invalid("skip rest"));
    }
    swallow("rest_skipped", self.cues.rest_skipped());
    self.advance_after_rest().await;
    Ok(self.state)
  }

  pub fn toggle_pause(&mut self) -> Result<(), SessionError> {
    if self.state != WorkoutState::Resting {
      return Err(self.invalid("pause"));
    }
    let now = self.clock.now();
    if let Some(rest) = self.rest.as_mut() {
      rest.toggle_pause(now);
      debug!(paused = rest.is_paused(), "Rest pause toggled");
    }
    Ok(())
  }

  /// Host is going to the background. Schedules a notification for the end
  /// of rest so the user hears about it while we are not running.
  pub fn suspend(&mut self) {
    let Some(rest) = self.rest.filter(|r| !r.is_paused()) else {
      return;
    };
    if self.state != WorkoutState::Resting {
      return;
    }
    let remaining = rest.remaining_secs(self.clock.now());
    if remaining > 0 {
      swallow(
        "schedule_rest_notification",
        self.cues.schedule_rest_notification(remaining),
      );
      self.notification_pending = true;
    }
  }

  /// Host is back in the foreground: drop the pending notification and
  /// catch up on whatever time passed.
  pub async fn resume(&mut self) -> WorkoutState {
    self.cancel_notification();
    self.tick().await
  }

  /// Done announcing the next exercise
  pub fn finish_transition(&mut self) -> Result<(), SessionError> {
    if self.state != WorkoutState::Transitioning {
      return Err(self.invalid("finish transition"));
    }
    self.state = WorkoutState::Exercising;
    swallow("exercise_ready", self.cues.exercise_ready());
    Ok(())
  }

  /// Take back the set just logged and redo it
  pub fn undo(&mut self) -> Result<(), SessionError> {
    if self.state != WorkoutState::Resting {
      return Err(self.invalid("undo"));
    }
    if let Some(exercise) = self.current_exercise() {
      if let Some(values) = self.logged.get_mut(exercise.key) {
        values.pop();
        if values.is_empty() {
          self.logged.remove(exercise.key);
        }
      }
    }

    self.rest = None;
    self.cancel_notification();
    self.state = WorkoutState::Exercising;
    swallow("set_undone", self.cues.set_undone());
    debug!(exercise = self.exercise_index, set = self.set_index, "Set undone");
    Ok(())
  }

  /// Abandon the session. Nothing logged today is kept.
  pub fn quit(&mut self) {
    if self.state == WorkoutState::Idle {
      return;
    }
    self.logged.clear();
    self.rest = None;
    self.cancel_notification();
    self.exercise_index = 0;
    self.set_index = 0;
    self.state = WorkoutState::Idle;
    swallow("release_wake_lock", self.cues.release_wake_lock());
    info!(date = %self.date, "Workout quit");
  }

  // -------------------------------------------------------------------------
  // Internals
  // -------------------------------------------------------------------------

  fn cancel_notification(&mut self) {
    if self.notification_pending {
      self.notification_pending = false;
      swallow("cancel_rest_notification", self.cues.cancel_rest_notification());
    }
  }

  async fn advance_after_rest(&mut self) {
    self.rest = None;
    self.cancel_notification();

    if self.set_index + 1 < self.sets_per_exercise() {
      self.set_index += 1;
      self.state = WorkoutState::Exercising;
      swallow("exercise_ready", self.cues.exercise_ready());
    } else if self.exercise_index + 1 < self.exercises.len() {
      self.exercise_index += 1;
      self.set_index = 0;
      self.state = WorkoutState::Transitioning;
      if let Some(next) = self.current_exercise() {
        swallow("next_exercise", self.cues.next_exercise(next.name));
      }
    } else {
      self.complete().await;
    }
  }

  /// Persist the session, fold the tier evaluator over the day's
  /// progressing slots and build the summary.
  async fn complete(&mut self) {
    let now = self.clock.now();
    self.rest = None;
    self.cancel_notification();

    let session = WorkoutSession {
      logged_at: Some(now),
      week_number: self.week_number,
      workout_type: self.workout_type,
      sets: self.logged.clone(),
    };

    let persisted = match self.store.save_session(self.date, &session).await {
      Ok(()) => true,
      Err(e) => {
        warn!(date = %self.date, error = %e, "Failed to save session");
        false
      }
    };
    if self.first_session.is_none() {
      if let Err(e) = self.store.set_first_session_date(self.date).await {
        warn!(error = %e, "Failed to record first session date");
      }
      self.first_session = Some(self.date);
    }
    self.data.insert(self.date, session);

    let mut evaluations = Vec::new();
    for chain in catalog::chains_for_workout(self.workout_type).filter(|c| !c.fixed) {
      let key = resolve_exercise_key(chain, &self.profile.tiers);
      let values = self.logged.get(key).map(Vec::as_slice).unwrap_or(&[]);
      let evaluation = evaluate_tier_progress(
        &mut self.profile,
        chain,
        values,
        self.week_number,
        &self.settings.rules,
      );
      evaluations.push((chain.slot_id, evaluation));
    }
    if let Err(e) = self.store.save_profile(&self.profile).await {
      warn!(error = %e, "Failed to save profile");
    }

    let summary = SessionSummary::build(SummaryInput {
      date: self.date,
      workout_type: self.workout_type,
      week_number: self.week_number,
      exercises: &self.exercises,
      logged: &self.logged,
      evaluations: &evaluations,
      data: &self.data,
      persisted,
    });
    info!(
      date = %self.date,
      sets = session_sets(&self.logged),
      advanced = summary.advanced_slots.len(),
      regressed = summary.regressed_slots.len(),
      persisted,
      "Workout complete"
    );
    self.summary = Some(summary);
    self.state = WorkoutState::Complete;

    swallow("session_complete", self.cues.session_complete());
    swallow("release_wake_lock", self.cues.release_wake_lock());
  }
}

fn session_sets(logged: &BTreeMap<String, Vec<u32>>) -> usize {
  logged.values().map(Vec::len).sum()
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
