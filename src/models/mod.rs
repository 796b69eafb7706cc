pub mod profile;
pub mod workout;

pub use profile::{TierMap, TierProgress, UserProfile};
pub use workout::{date_key, parse_date_key, WorkoutData, WorkoutSession, WorkoutType};
