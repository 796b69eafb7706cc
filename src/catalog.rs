//! Exercise Catalog
//!
//! Static registry of exercises and tier chains. A tier chain is the ordered
//! list of exercise variants for one training slot, easiest first. The user's
//! tier index for the slot picks the variant they perform.
//!
//! Both tables are plain `static` data: built at compile time, never mutated.

use serde::{Deserialize, Serialize};

use crate::models::WorkoutType;

// ---------------------------------------------------------------------------
/// Exercise
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Reps,
    Seconds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Exercise {
    pub key: &'static str,
    pub name: &'static str,
    pub unit: Unit,
    pub instruction: &'static str,
    pub video_id: Option<&'static str>,
    pub workout_type: WorkoutType,
}

// ---------------------------------------------------------------------------
/// Priority: how fast a slot advances
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    Support,
    Indirect,
    Aesthetic,
}

impl Priority {
    /// Consecutive all-max sessions needed before the slot advances a tier
    pub fn sessions_to_advance(&self) -> u32 {
        match self {
            Priority::Critical => 1,
            Priority::High | Priority::Support => 2,
            Priority::Indirect | Priority::Aesthetic => 3,
        }
    }
}

// ---------------------------------------------------------------------------
/// Tier Chain
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierChain {
    pub slot_id: &'static str,
    pub workout_type: WorkoutType,
    /// Single exercise, never progresses
    pub fixed: bool,
    pub priority: Priority,
    pub exercises: &'static [&'static str],
}

impl TierChain {
    pub fn max_tier(&self) -> i64 {
        self.exercises.len() as i64 - 1
    }
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

const fn reps(
    key: &'static str,
    name: &'static str,
    instruction: &'static str,
    video_id: Option<&'static str>,
    workout_type: WorkoutType,
) -> Exercise {
    Exercise {
        key,
        name,
        unit: Unit::Reps,
        instruction,
        video_id,
        workout_type,
    }
}

pub static EXERCISES: &[Exercise] = &[
    // Push
    reps(
        "incline_pushup",
        "INCLINE PUSH-UP",
        "Hands on a bench or counter, body in one line. Lower chest to the edge, press back up.",
        None,
        WorkoutType::Push,
    ),
    reps(
        "trx_pushup",
        "TRX PUSH-UP",
        "Hands in the handles, body straight. Lower chest between the handles and press up.",
        Some("OlUqeytSoxE"),
        WorkoutType::Push,
    ),
    reps(
        "pike_pushup",
        "PIKE PUSH-UP",
        "Hips high in a pike. Bend elbows and lower the head toward the floor, then press up.",
        Some("XckEEwa1BPI"),
        WorkoutType::Push,
    ),
    reps(
        "decline_pike_pushup",
        "DECLINE PIKE PUSH-UP",
        "Feet on a chair, hips stacked over shoulders. Lower the head toward the floor, press up.",
        None,
        WorkoutType::Push,
    ),
    reps(
        "band_lateral_raise",
        "BAND LATERAL RAISE",
        "Stand on the band. Raise arms out to shoulder height with soft elbows, lower slowly.",
        Some("7_bIc8s_YDY"),
        WorkoutType::Push,
    ),
    reps(
        "trx_t_raise",
        "TRX T RAISE",
        "Face the anchor and lean back. Open straight arms into a T, squeeze, return slowly.",
        None,
        WorkoutType::Push,
    ),
    reps(
        "trx_y_raise",
        "TRX Y RAISE",
        "Face the anchor and lean back. Raise arms into a Y overhead, thumbs up, control the return.",
        Some("SdSZwVpun28"),
        WorkoutType::Push,
    ),
    // Pull
    reps(
        "pull_up",
        "PULL-UP",
        "Dead hang. Pull chest to the bar, lower to a full stretch. Use a chair for help if needed.",
        Some("Hdc7Mw6BIEE"),
        WorkoutType::Pull,
    ),
    reps(
        "trx_row_steep",
        "TRX ROW (STEEP)",
        "Walk the feet back so the body is near upright. Pull chest to the handles, lower slowly.",
        None,
        WorkoutType::Pull,
    ),
    reps(
        "trx_kneeling_lat_pulldown",
        "TRX KNEELING LAT PULLDOWN",
        "Kneel facing away from a high anchor. Drive elbows down to the ribs, let the lats stretch.",
        None,
        WorkoutType::Pull,
    ),
    reps(
        "trx_straight_arm_pulldown",
        "TRX STRAIGHT-ARM PULLDOWN",
        "High anchor, arms locked. Sweep the arms down to the hips and squeeze the lats.",
        Some("MrL7odiwMEY"),
        WorkoutType::Pull,
    ),
    reps(
        "trx_row",
        "TRX ROW",
        "Hang under the straps, body straight. Pull chest to the handles, squeeze shoulder blades.",
        Some("fW_jdwZT804"),
        WorkoutType::Pull,
    ),
    reps(
        "face_pull",
        "TRX FACE PULL",
        "Lean back on the straps. Pull handles to the face with elbows high and wide.",
        Some("Jbyoxer58j4"),
        WorkoutType::Pull,
    ),
    // Legs
    reps(
        "trx_assisted_squat",
        "TRX ASSISTED SQUAT",
        "Hold the straps, sit back to parallel, stand up tall. Use the arms only as needed.",
        None,
        WorkoutType::Legs,
    ),
    reps(
        "bulgarian_split_squat",
        "BULGARIAN SPLIT SQUAT",
        "Rear foot on a chair. Lower the front knee to 90 degrees, press up. All reps, then switch.",
        Some("hiLF_pF3EJM"),
        WorkoutType::Legs,
    ),
    reps(
        "pistol_squat_progression",
        "PISTOL SQUAT PROGRESSION",
        "One leg, straps for balance. Lower slowly on one leg and press back up. Alternate legs.",
        Some("ul-yPBFwhnw"),
        WorkoutType::Legs,
    ),
    reps(
        "glute_bridge",
        "GLUTE BRIDGE",
        "On the back, knees bent. Drive hips up until the body is straight, pause, lower.",
        None,
        WorkoutType::Legs,
    ),
    reps(
        "trx_hamstring_curl",
        "TRX HAMSTRING CURL",
        "Heels in the cradles, face up. Lift hips and curl heels to glutes, keep hips up throughout.",
        Some("JcJ2i2gUW3o"),
        WorkoutType::Legs,
    ),
    reps(
        "calf_raise",
        "CALF RAISE",
        "Balls of the feet on a step. Rise onto the toes, lower heels below the step.",
        Some("k8ipHzKeAkQ"),
        WorkoutType::Legs,
    ),
];

pub static TIER_CHAINS: &[TierChain] = &[
    // Push day
    TierChain {
        slot_id: "push_press",
        workout_type: WorkoutType::Push,
        fixed: false,
        priority: Priority::Support,
        exercises: &["incline_pushup", "trx_pushup", "pike_pushup"],
    },
    TierChain {
        slot_id: "push_press_variation",
        workout_type: WorkoutType::Push,
        fixed: false,
        priority: Priority::Support,
        exercises: &["trx_pushup", "pike_pushup", "decline_pike_pushup"],
    },
    TierChain {
        slot_id: "push_side_delt",
        workout_type: WorkoutType::Push,
        fixed: true,
        priority: Priority::Critical,
        exercises: &["trx_t_raise"],
    },
    TierChain {
        slot_id: "push_overhead",
        workout_type: WorkoutType::Push,
        fixed: true,
        priority: Priority::High,
        exercises: &["trx_y_raise"],
    },
    // Pull day
    TierChain {
        slot_id: "pull_vertical",
        workout_type: WorkoutType::Pull,
        fixed: false,
        priority: Priority::Critical,
        exercises: &[
            "trx_row_steep",
            "trx_kneeling_lat_pulldown",
            "trx_straight_arm_pulldown",
        ],
    },
    TierChain {
        slot_id: "pull_row",
        workout_type: WorkoutType::Pull,
        fixed: true,
        priority: Priority::High,
        exercises: &["trx_row"],
    },
    TierChain {
        slot_id: "pull_rear_delt",
        workout_type: WorkoutType::Pull,
        fixed: true,
        priority: Priority::Critical,
        exercises: &["face_pull"],
    },
    TierChain {
        slot_id: "pull_lat_isolation",
        workout_type: WorkoutType::Pull,
        fixed: true,
        priority: Priority::Critical,
        exercises: &["trx_straight_arm_pulldown"],
    },
    // Legs day
    TierChain {
        slot_id: "legs_squat",
        workout_type: WorkoutType::Legs,
        fixed: false,
        priority: Priority::Indirect,
        exercises: &[
            "trx_assisted_squat",
            "bulgarian_split_squat",
            "pistol_squat_progression",
        ],
    },
    TierChain {
        slot_id: "legs_squat_variation",
        workout_type: WorkoutType::Legs,
        fixed: true,
        priority: Priority::Indirect,
        exercises: &["bulgarian_split_squat"],
    },
    TierChain {
        slot_id: "legs_posterior",
        workout_type: WorkoutType::Legs,
        fixed: false,
        priority: Priority::Indirect,
        exercises: &["glute_bridge", "trx_hamstring_curl"],
    },
    TierChain {
        slot_id: "legs_calf",
        workout_type: WorkoutType::Legs,
        fixed: true,
        priority: Priority::Aesthetic,
        exercises: &["calf_raise"],
    },
];

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

pub fn exercise(key: &str) -> Option<&'static Exercise> {
    EXERCISES.iter().find(|e| e.key == key)
}

pub fn chain(slot_id: &str) -> Option<&'static TierChain> {
    TIER_CHAINS.iter().find(|c| c.slot_id == slot_id)
}

/// Chains for a workout day, in catalog order. Empty for rest days.
pub fn chains_for_workout(workout_type: WorkoutType) -> impl Iterator<Item = &'static TierChain> {
    TIER_CHAINS
        .iter()
        .filter(move |c| c.workout_type == workout_type)
}
