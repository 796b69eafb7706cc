//! Tier Resolver: which variant of a slot's chain the user performs today.

use crate::catalog::{self, Exercise, TierChain};
use crate::models::{TierMap, WorkoutType};

/// Stored tier for the chain's slot, clamped into the chain's valid range
pub fn resolve_tier(chain: &TierChain, tiers: &TierMap) -> usize {
    let stored = tiers.get(chain.slot_id).copied().unwrap_or(0);
    stored.clamp(0, chain.max_tier().max(0)) as usize
}

/// Never fails: out-of-range or negative stored tiers are clamped.
pub fn resolve_exercise_key(chain: &TierChain, tiers: &TierMap) -> &'static str {
    chain.exercises[resolve_tier(chain, tiers)]
}

/// Today's exercise list for a workout day, one per slot in catalog order.
/// Keys missing from the catalog are dropped.
pub fn exercises_for_workout(workout_type: WorkoutType, tiers: &TierMap) -> Vec<&'static Exercise> {
    catalog::chains_for_workout(workout_type)
        .filter_map(|chain| catalog::exercise(resolve_exercise_key(chain, tiers)))
        .collect()
}
