pub mod catalog;
pub mod commands;
pub mod config;
pub mod cues;
pub mod db;
pub mod logging;
pub mod models;
pub mod progression;
pub mod schedule;
pub mod session;
pub mod storage;
pub mod summary;
pub mod tiers;
pub mod timer;

#[cfg(test)]
mod test_utils;

pub use config::AppConfig;
pub use db::AppState;
pub use session::{SessionSettings, Workout, WorkoutState};
pub use storage::{MemoryStore, SqliteStore, StorageError, WorkoutStore};
