use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Row, SqlitePool};
use std::collections::BTreeMap;
use tracing::warn;

use super::{StorageError, WorkoutStore, FIRST_SESSION_KEY, MOBILITY_DONE_KEY, USER_PROFILE_KEY};
use crate::models::{date_key, parse_date_key, UserProfile, WorkoutData, WorkoutSession, WorkoutType};

/// `WorkoutStore` backed by SQLite: one row per session, plus a key-value
/// table for single records.
#[derive(Debug, Clone)]
pub struct SqliteStore {
  pool: SqlitePool,
}

impl SqliteStore {
  pub fn new(pool: SqlitePool) -> Self {
    Self { pool }
  }

  pub fn pool(&self) -> &SqlitePool {
    &self.pool
  }

  async fn get_value(&self, key: &str) -> Result<Option<String>, StorageError> {
    let value = sqlx::query_scalar::<_, String>("SELECT value FROM kv_store WHERE key = ?")
      .bind(key)
      .fetch_optional(&self.pool)
      .await?;
    Ok(value)
  }

  async fn put_value(&self, key: &str, value: &str) -> Result<(), StorageError> {
    sqlx::query(
      r#"
      INSERT INTO kv_store (key, value, updated_at)
      VALUES (?1, ?2, ?3)
      ON CONFLICT(key) DO UPDATE SET
        value = excluded.value,
        updated_at = excluded.updated_at
      "#,
    )
    .bind(key)
    .bind(value)
    .bind(Utc::now().to_rfc3339())
    .execute(&self.pool)
    .await?;
    Ok(())
  }
}

/// Parse one `workout_sessions` row. Returns None (and logs) for corrupt rows.
fn session_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Option<(NaiveDate, WorkoutSession)>, StorageError> {
  let key: String = row.try_get("date_key")?;
  let logged_at: Option<String> = row.try_get("logged_at")?;
  let week_number: i64 = row.try_get("week_number")?;
  let workout_type: String = row.try_get("workout_type")?;
  let sets_json: String = row.try_get("sets_json")?;

  let Some(date) = parse_date_key(&key) else {
    warn!(date_key = %key, "Skipping session with invalid date key");
    return Ok(None);
  };
  let Ok(workout_type) = workout_type.parse::<WorkoutType>() else {
    warn!(date_key = %key, %workout_type, "Skipping session with unknown workout type");
    return Ok(None);
  };
  let sets: BTreeMap<String, Vec<u32>> = match serde_json::from_str(&sets_json) {
    Ok(sets) => sets,
    Err(e) => {
      warn!(date_key = %key, error = %e, "Skipping session with corrupt sets");
      return Ok(None);
    }
  };

  Ok(Some((
    date,
    WorkoutSession {
      logged_at: logged_at.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
          .map(|dt| dt.with_timezone(&Utc))
          .ok()
      }),
      week_number: week_number.max(0) as u32,
      workout_type,
      sets,
    },
  )))
}

#[async_trait]
impl WorkoutStore for SqliteStore {
  async fn load_workout_data(&self) -> Result<WorkoutData, StorageError> {
    let rows = sqlx::query(
      r#"
      SELECT date_key, logged_at, week_number, workout_type, sets_json
      FROM workout_sessions
      ORDER BY date_key
      "#,
    )
    .fetch_all(&self.pool)
    .await?;

    let mut data = WorkoutData::new();
    for row in &rows {
      if let Some((date, session)) = session_from_row(row)? {
        data.insert(date, session);
      }
    }
    Ok(data)
  }

  async fn save_session(&self, date: NaiveDate, session: &WorkoutSession) -> Result<(), StorageError> {
    let sets_json = serde_json::to_string(&session.sets)?;

    // Single statement: the row is replaced whole or not at all
    sqlx::query(
      r#"
      INSERT INTO workout_sessions (date_key, logged_at, week_number, workout_type, sets_json, updated_at)
      VALUES (?1, ?2, ?3, ?4, ?5, ?6)
      ON CONFLICT(date_key) DO UPDATE SET
        logged_at = excluded.logged_at,
        week_number = excluded.week_number,
        workout_type = excluded.workout_type,
        sets_json = excluded.sets_json,
        updated_at = excluded.updated_at
      "#,
    )
    .bind(date_key(date))
    .bind(session.logged_at.map(|d| d.to_rfc3339()))
    .bind(session.week_number as i64)
    .bind(session.workout_type.as_str())
    .bind(&sets_json)
    .bind(Utc::now().to_rfc3339())
    .execute(&self.pool)
    .await?;

    Ok(())
  }

  async fn first_session_date(&self) -> Result<Option<NaiveDate>, StorageError> {
    match self.get_value(FIRST_SESSION_KEY).await? {
      Some(key) => parse_date_key(&key)
        .map(Some)
        .ok_or(StorageError::InvalidDateKey(key)),
      None => Ok(None),
    }
  }

  async fn set_first_session_date(&self, date: NaiveDate) -> Result<(), StorageError> {
    sqlx::query("INSERT OR IGNORE INTO kv_store (key, value) VALUES (?1, ?2)")
      .bind(FIRST_SESSION_KEY)
      .bind(date_key(date))
      .execute(&self.pool)
      .await?;
    Ok(())
  }

  async fn load_profile(&self) -> Result<Option<UserProfile>, StorageError> {
    match self.get_value(USER_PROFILE_KEY).await? {
      Some(json) => Ok(Some(serde_json::from_str(&json)?)),
      None => Ok(None),
    }
  }

  async fn save_profile(&self, profile: &UserProfile) -> Result<(), StorageError> {
    let json = serde_json::to_string(profile)?;
    self.put_value(USER_PROFILE_KEY, &json).await
  }

  async fn mobility_done(&self, date: NaiveDate) -> Result<bool, StorageError> {
    Ok(self.get_value(MOBILITY_DONE_KEY).await?.as_deref() == Some(date_key(date).as_str()))
  }

  async fn set_mobility_done(&self, date: NaiveDate) -> Result<(), StorageError> {
    self.put_value(MOBILITY_DONE_KEY, &date_key(date)).await
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
