//! End-to-end workouts against the in-memory store and a manual clock

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;

use liftday::cues::NoopCues;
use liftday::models::{WorkoutSession, WorkoutType};
use liftday::progression::is_deload_week;
use liftday::timer::ManualClock;
use liftday::{MemoryStore, SessionSettings, Workout, WorkoutState, WorkoutStore};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn morning(day: NaiveDate) -> DateTime<Utc> {
  day.and_hms_opt(7, 0, 0).unwrap().and_utc()
}

/// Run a whole workout on `day`, logging `value` for every set and waiting
/// out each rest on the clock.
async fn run_workout(store: &Arc<MemoryStore>, day: NaiveDate, value: u32) -> Vec<WorkoutState> {
  let clock = Arc::new(ManualClock::new(morning(day)));
  let mut workout = Workout::load(store.clone(), clock.clone(), NoopCues, SessionSettings::default(), day).await;
  workout.start().unwrap();

  let mut seen = vec![workout.state()];
  loop {
    let state = workout.log_set(value).await.unwrap();
    seen.push(state);
    match state {
      WorkoutState::Complete => break,
      WorkoutState::Resting => {
        clock.advance_secs(90);
        let after = workout.tick().await;
        seen.push(after);
        if after == WorkoutState::Transitioning {
          workout.finish_transition().unwrap();
          seen.push(workout.state());
        }
      }
      other => panic!("unexpected state after logging: {:?}", other),
    }
  }
  seen
}

#[tokio::test]
async fn final_set_goes_straight_to_complete() {
  let store = Arc::new(MemoryStore::new());
  let monday = date(2024, 10, 7);

  let seen = run_workout(&store, monday, 10).await;

  // 4 exercises x 2 sets: 7 rests, never one after the last set
  let rests = seen.iter().filter(|s| **s == WorkoutState::Resting).count();
  assert_eq!(rests, 7);
  assert_eq!(seen.last(), Some(&WorkoutState::Complete));
  assert_ne!(seen[seen.len() - 2], WorkoutState::Resting);

  let data = store.load_workout_data().await.unwrap();
  let session = &data[&monday];
  assert_eq!(session.workout_type, WorkoutType::Push);
  assert_eq!(session.total_sets(), 8);
  assert_eq!(store.first_session_date().await.unwrap(), Some(monday));
}

#[tokio::test]
async fn quit_leaves_existing_record_untouched() {
  let tuesday = date(2024, 10, 8);
  let mut sets = BTreeMap::new();
  sets.insert("trx_row".to_string(), vec![14, 13]);
  let existing = WorkoutSession {
    logged_at: Some(morning(tuesday)),
    week_number: 1,
    workout_type: WorkoutType::Pull,
    sets,
  };

  let store = Arc::new(MemoryStore::new());
  store.save_session(tuesday, &existing).await.unwrap();
  let before = store.data();

  let clock = Arc::new(ManualClock::new(morning(tuesday)));
  let mut workout = Workout::load(store.clone(), clock.clone(), NoopCues, SessionSettings::default(), tuesday).await;
  workout.start().unwrap();
  workout.log_set(9).await.unwrap();
  clock.advance_secs(90);
  workout.tick().await;
  workout.log_set(9).await.unwrap();
  workout.quit();

  assert_eq!(workout.state(), WorkoutState::Idle);
  assert_eq!(store.data(), before);
}

#[tokio::test]
async fn backgrounded_rest_catches_up_in_one_step() {
  let store = Arc::new(MemoryStore::new());
  let wednesday = date(2024, 10, 9);
  let clock = Arc::new(ManualClock::new(morning(wednesday)));
  let mut workout = Workout::load(store, clock.clone(), NoopCues, SessionSettings::default(), wednesday).await;

  workout.start().unwrap();
  workout.log_set(12).await.unwrap();
  workout.suspend();
  clock.advance_secs(45 * 60);

  assert_eq!(workout.resume().await, WorkoutState::Exercising);
  assert_eq!(workout.exercise_index(), 0);
  assert_eq!(workout.set_index(), 1);
}

#[tokio::test]
async fn tiers_progress_across_weeks() {
  let store = Arc::new(MemoryStore::new());

  // Tuesdays and Fridays are pull days. Max every set on each of them.
  let pull_days = [
    date(2024, 10, 1),
    date(2024, 10, 4),
    date(2024, 10, 8),
    date(2024, 10, 11),
  ];
  for day in pull_days {
    run_workout(&store, day, 20).await;
  }

  // Critical slot: one maxed session per tier, capped at the last variant
  let profile = store.profile().unwrap();
  assert_eq!(profile.tier("pull_vertical"), 2);

  let data = store.load_workout_data().await.unwrap();
  assert_eq!(data[&pull_days[0]].values_for("trx_row_steep"), Some(&[20, 20][..]));
  assert_eq!(
    data[&pull_days[1]].values_for("trx_kneeling_lat_pulldown"),
    Some(&[20, 20][..])
  );
  // Top of the chain: same exercise as the fixed isolation slot
  assert!(data[&pull_days[2]].values_for("trx_kneeling_lat_pulldown").is_none());
  assert!(data[&pull_days[3]].values_for("trx_straight_arm_pulldown").is_some());
}

#[tokio::test]
async fn deload_week_freezes_tiers_and_cuts_targets() {
  let store = Arc::new(MemoryStore::new());
  let first = date(2024, 9, 2);
  store.set_first_session(first);

  // Week 4 starts 21 days after the first session
  let deload_tuesday = date(2024, 9, 24);
  let mut sets = BTreeMap::new();
  sets.insert("trx_row_steep".to_string(), vec![15, 15, 15]);
  store
    .save_session(
      date(2024, 9, 20),
      &WorkoutSession {
        logged_at: Some(morning(date(2024, 9, 20))),
        week_number: 3,
        workout_type: WorkoutType::Pull,
        sets,
      },
    )
    .await
    .unwrap();

  let clock = Arc::new(ManualClock::new(morning(deload_tuesday)));
  let workout = Workout::load(store.clone(), clock, NoopCues, SessionSettings::default(), deload_tuesday).await;
  assert_eq!(workout.week_number(), 4);
  assert!(is_deload_week(workout.week_number()));
  assert_eq!(workout.current_targets(), vec![12, 12, 12]);

  run_workout(&store, deload_tuesday, 20).await;
  assert_eq!(store.profile().unwrap().tier("pull_vertical"), 0);
}
