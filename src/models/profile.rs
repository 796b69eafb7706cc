use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Slot id -> tier index. Stored values are not trusted: resolution clamps.
pub type TierMap = BTreeMap<String, i64>;

/// Slots seeded at tier 1 for users whose history predates tier tracking.
/// Their old fixed routine already used the second exercise of these chains.
pub const MIGRATED_SLOTS: &[&str] = &["push_press", "legs_squat", "legs_posterior"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierProgress {
  pub consecutive_max_sessions: u32,
  pub consecutive_min_sessions: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
  #[serde(default)]
  pub tiers: TierMap,
  #[serde(default)]
  pub tier_progress: BTreeMap<String, TierProgress>,
  pub created_at: DateTime<Utc>,
}

impl UserProfile {
  /// Fresh profile: every slot at tier 0
  pub fn new(created_at: DateTime<Utc>) -> Self {
    Self {
      tiers: TierMap::new(),
      tier_progress: BTreeMap::new(),
      created_at,
    }
  }

  /// Profile for a user with session history but no profile record
  pub fn migrated(created_at: DateTime<Utc>) -> Self {
    let mut profile = Self::new(created_at);
    for slot in MIGRATED_SLOTS {
      profile.tiers.insert((*slot).to_string(), 1);
    }
    profile
  }

  /// Stored tier for a slot, 0 when absent
  pub fn tier(&self, slot_id: &str) -> i64 {
    self.tiers.get(slot_id).copied().unwrap_or(0)
  }

  pub fn progress(&self, slot_id: &str) -> TierProgress {
    self.tier_progress.get(slot_id).copied().unwrap_or_default()
  }
}
