//! Rep-Target and Tier Progression Engine
//!
//! Two pieces of logic drive a user's progress:
//! - rep targets: +1 over last session's average, clamped to [6, 20], with a
//!   20% cut every 4th (deload) week
//! - tier progression: a per-slot state machine that moves the user along
//!   the slot's exercise chain after streaks of maxed-out sessions, and back
//!   down after streaks of failed ones
//!
//! Key principles:
//! - Pure and total: no I/O, no errors, out-of-range input is clamped
//! - Deload weeks freeze tier changes
//! - Partial credit never accumulates: a mixed session resets both streaks

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::{Priority, TierChain};
use crate::models::{TierProgress, UserProfile, WorkoutData, WorkoutType};
use crate::schedule::SetSchedule;
use crate::tiers::resolve_tier;

pub const MIN_REPS: u32 = 6;
pub const MAX_REPS: u32 = 20;
pub const START_REPS: u32 = 8;

/// Consecutive failing sessions before a slot drops a tier
pub const SESSIONS_TO_REGRESS: u32 = 2;

/// Every 4th week (4, 8, 12, ...) is a deload week
pub fn is_deload_week(week_number: u32) -> bool {
    week_number > 0 && week_number % 4 == 0
}

// ---------------------------------------------------------------------------
// History Lookups
// ---------------------------------------------------------------------------

/// Most recent date strictly before `date` with a logged session
pub fn previous_session_date(date: NaiveDate, data: &WorkoutData) -> Option<NaiveDate> {
    data.range(..date)
        .rev()
        .find(|(_, session)| session.is_logged())
        .map(|(d, _)| *d)
}

/// Value logged for the same set index in the previous session
pub fn previous_value(
    exercise_key: &str,
    set_index: usize,
    date: NaiveDate,
    data: &WorkoutData,
) -> Option<u32> {
    let prev = previous_session_date(date, data)?;
    data.get(&prev)?
        .values_for(exercise_key)?
        .get(set_index)
        .copied()
}

/// True when the latest session that logged this exercise maxed every set
pub fn should_increase_difficulty(exercise_key: &str, data: &WorkoutData) -> bool {
    data.values()
        .rev()
        .find_map(|s| s.values_for(exercise_key).filter(|v| !v.is_empty()))
        .is_some_and(|values| values.iter().all(|v| *v >= MAX_REPS))
}

// ---------------------------------------------------------------------------
// Target Calculator
// ---------------------------------------------------------------------------

/// Per-set targets for `exercise_key` on `date`. Every set shares one target.
pub fn targets(
    exercise_key: &str,
    week_number: u32,
    date: NaiveDate,
    data: &WorkoutData,
    schedule: &SetSchedule,
) -> Vec<u32> {
    let sets = schedule.sets_for_week(week_number);

    let prev_values = previous_session_date(date, data)
        .and_then(|prev| data.get(&prev))
        .and_then(|session| session.values_for(exercise_key))
        .filter(|values| !values.is_empty());

    let target = match prev_values {
        None => START_REPS,
        Some(values) => {
            // u64 so corrupt stored values can't overflow
            let avg = values.iter().map(|v| *v as u64).sum::<u64>() / values.len() as u64;
            let target = if is_deload_week(week_number) {
                // floor(avg * 0.8) without float rounding
                (avg * 4 / 5).max(MIN_REPS as u64)
            } else {
                (avg + 1).clamp(MIN_REPS as u64, MAX_REPS as u64)
            };
            u32::try_from(target).unwrap_or(u32::MAX)
        }
    };

    vec![target; sets]
}

// ---------------------------------------------------------------------------
/// Session Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionClass {
    /// Every value >= MAX_REPS (and at least one value)
    AllMax,
    /// Some value < MIN_REPS
    AnyMin,
    Neutral,
}

impl SessionClass {
    pub fn classify(values: &[u32]) -> Self {
        if !values.is_empty() && values.iter().all(|v| *v >= MAX_REPS) {
            SessionClass::AllMax
        } else if values.iter().any(|v| *v < MIN_REPS) {
            SessionClass::AnyMin
        } else {
            SessionClass::Neutral
        }
    }
}

// ---------------------------------------------------------------------------
/// Advancement Caps: cross-slot constraints
// ---------------------------------------------------------------------------

/// Slots matching `workout_type` + `priority` are held while their tier is at
/// or above the current tier of `ceiling_slot`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancementCap {
    pub workout_type: WorkoutType,
    pub priority: Priority,
    pub ceiling_slot: String,
}

impl AdvancementCap {
    fn applies_to(&self, chain: &TierChain) -> bool {
        chain.workout_type == self.workout_type && chain.priority == self.priority
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionRules {
    pub caps: Vec<AdvancementCap>,
}

impl Default for ProgressionRules {
    fn default() -> Self {
        Self {
            // Pressing can't outrun the vertical pull
            caps: vec![AdvancementCap {
                workout_type: WorkoutType::Push,
                priority: Priority::Support,
                ceiling_slot: "pull_vertical".to_string(),
            }],
        }
    }
}

// ---------------------------------------------------------------------------
/// Tier Decision: what the evaluator did for one slot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierDecision {
    /// Fixed chain, never progresses
    Fixed,
    /// Deload week, no changes
    Frozen,
    /// Held by an advancement cap, no changes
    Capped,
    /// Streaks updated, tier unchanged
    Hold,
    Advanced,
    Regressed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierEvaluation {
    pub decision: TierDecision,
    pub previous_tier: i64,
    pub new_tier: i64,
}

impl TierEvaluation {
    fn unchanged(decision: TierDecision, tier: i64) -> Self {
        Self {
            decision,
            previous_tier: tier,
            new_tier: tier,
        }
    }
}

// ---------------------------------------------------------------------------
// Tier Progression Evaluator
// ---------------------------------------------------------------------------

/// Update `profile` for one slot after a completed session.
///
/// `values` are the session's logged values for the chain's active exercise.
/// Advancement is applied before regression, and regression steps down from
/// the already-advanced tier.
pub fn evaluate_tier_progress(
    profile: &mut UserProfile,
    chain: &TierChain,
    values: &[u32],
    week_number: u32,
    rules: &ProgressionRules,
) -> TierEvaluation {
    let current_tier = resolve_tier(chain, &profile.tiers) as i64;

    if chain.fixed {
        return TierEvaluation::unchanged(TierDecision::Fixed, current_tier);
    }
    if is_deload_week(week_number) {
        debug!(slot = chain.slot_id, week_number, "Deload week, tier frozen");
        return TierEvaluation::unchanged(TierDecision::Frozen, current_tier);
    }

    let capped_by = rules
        .caps
        .iter()
        .filter(|cap| cap.applies_to(chain))
        .find(|cap| current_tier >= profile.tier(&cap.ceiling_slot));
    if let Some(cap) = capped_by {
        debug!(
            slot = chain.slot_id,
            ceiling = %cap.ceiling_slot,
            current_tier,
            "Advancement capped"
        );
        return TierEvaluation::unchanged(TierDecision::Capped, current_tier);
    }

    let mut progress = profile.progress(chain.slot_id);
    match SessionClass::classify(values) {
        SessionClass::AllMax => {
            progress.consecutive_max_sessions += 1;
            progress.consecutive_min_sessions = 0;
        }
        SessionClass::AnyMin => {
            progress.consecutive_min_sessions += 1;
            progress.consecutive_max_sessions = 0;
        }
        SessionClass::Neutral => {
            progress = TierProgress::default();
        }
    }

    let mut new_tier = current_tier;

    if progress.consecutive_max_sessions >= chain.priority.sessions_to_advance()
        && current_tier < chain.max_tier()
    {
        new_tier = current_tier + 1;
        progress.consecutive_max_sessions = 0;
    }

    if progress.consecutive_min_sessions >= SESSIONS_TO_REGRESS && current_tier > 0 {
        new_tier -= 1;
        progress.consecutive_min_sessions = 0;
    }

    if new_tier != current_tier || profile.tiers.contains_key(chain.slot_id) {
        profile.tiers.insert(chain.slot_id.to_string(), new_tier);
    }
    profile
        .tier_progress
        .insert(chain.slot_id.to_string(), progress);

    let decision = match new_tier.cmp(&current_tier) {
        std::cmp::Ordering::Greater => TierDecision::Advanced,
        std::cmp::Ordering::Less => TierDecision::Regressed,
        std::cmp::Ordering::Equal => TierDecision::Hold,
    };
    if decision != TierDecision::Hold {
        info!(
            slot = chain.slot_id,
            from = current_tier,
            to = new_tier,
            exercise = chain.exercises[new_tier as usize],
            "Tier {:?}",
            decision
        );
    }

    TierEvaluation {
        decision,
        previous_tier: current_tier,
        new_tier,
    }
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------
