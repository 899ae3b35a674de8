//! SQLite-backed per-user document store.
//!
//! Implements the schedule, forecast and message-log ports over the single
//! `user_documents` table. Each (user, path) row holds one JSON document and
//! a version counter used for optimistic concurrency on the schedule.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use daybook_core::conversation::MessageLog;
use daybook_core::forecast::ForecastStore;
use daybook_core::schedule::{ScheduleSnapshot, ScheduleStore};
use daybook_domain::constants::{FORECAST_PATH, MESSAGES_PATH, SCHEDULE_PATH};
use daybook_domain::{
    Activity, ChatMessage, DaybookError, ForecastRecord, Result as DomainResult,
};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::task;
use tracing::debug;

use super::manager::{map_sql_error, DbManager};
use crate::errors::InfraError;

const SELECT_DOCUMENT: &str =
    "SELECT body_json, version FROM user_documents WHERE user_id = ?1 AND path = ?2";
const UPSERT_DOCUMENT: &str = "INSERT INTO user_documents (user_id, path, body_json, version, updated_at)
     VALUES (?1, ?2, ?3, ?4, ?5)
     ON CONFLICT(user_id, path) DO UPDATE SET
         body_json = excluded.body_json,
         version = excluded.version,
         updated_at = excluded.updated_at";
const DELETE_DOCUMENT: &str = "DELETE FROM user_documents WHERE user_id = ?1 AND path = ?2";

/// Document store implementing every persistence port of the core.
pub struct SqliteUserStore {
    db: Arc<DbManager>,
}

impl SqliteUserStore {
    /// Construct a store backed by the shared database manager.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    async fn blocking<T, F>(&self, work: F) -> DomainResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> DomainResult<T> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> DomainResult<T> {
            let mut conn = db.get_connection()?;
            work(&mut *conn)
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl ScheduleStore for SqliteUserStore {
    async fn load_schedule(&self, user_id: &str) -> DomainResult<ScheduleSnapshot> {
        let user_id = user_id.to_string();
        self.blocking(move |conn| {
            let snapshot = match read_document::<Vec<Activity>>(conn, &user_id, SCHEDULE_PATH)? {
                Some((activities, version)) => ScheduleSnapshot { activities, version },
                None => ScheduleSnapshot::default(),
            };
            Ok(snapshot)
        })
        .await
    }

    async fn save_schedule(
        &self,
        user_id: &str,
        activities: &[Activity],
        expected_version: u64,
    ) -> DomainResult<u64> {
        let user_id = user_id.to_string();
        let body = to_json(activities)?;
        self.blocking(move |conn| {
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(map_sql_error)?;

            let current = current_version(&tx, &user_id, SCHEDULE_PATH)?;
            if current != expected_version {
                return Err(DaybookError::Conflict(format!(
                    "schedule for user {user_id} changed concurrently (expected version {expected_version}, found {current})"
                )));
            }

            let next = current + 1;
            write_document(&tx, &user_id, SCHEDULE_PATH, &body, next)?;
            tx.commit().map_err(map_sql_error)?;

            debug!(user_id = %user_id, version = next, "schedule saved");
            Ok(next)
        })
        .await
    }
}

#[async_trait]
impl ForecastStore for SqliteUserStore {
    async fn load_forecast(&self, user_id: &str) -> DomainResult<Option<ForecastRecord>> {
        let user_id = user_id.to_string();
        self.blocking(move |conn| {
            Ok(read_document::<ForecastRecord>(conn, &user_id, FORECAST_PATH)?.map(|(record, _)| record))
        })
        .await
    }

    async fn save_forecast(&self, user_id: &str, record: &ForecastRecord) -> DomainResult<()> {
        let user_id = user_id.to_string();
        let body = to_json(record)?;
        self.blocking(move |conn| {
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(map_sql_error)?;
            let next = current_version(&tx, &user_id, FORECAST_PATH)? + 1;
            write_document(&tx, &user_id, FORECAST_PATH, &body, next)?;
            tx.commit().map_err(map_sql_error)
        })
        .await
    }

    async fn delete_forecast(&self, user_id: &str) -> DomainResult<()> {
        let user_id = user_id.to_string();
        self.blocking(move |conn| delete_document(conn, &user_id, FORECAST_PATH)).await
    }
}

#[async_trait]
impl MessageLog for SqliteUserStore {
    async fn load_messages(&self, user_id: &str) -> DomainResult<Vec<ChatMessage>> {
        let user_id = user_id.to_string();
        self.blocking(move |conn| {
            Ok(read_document::<Vec<ChatMessage>>(conn, &user_id, MESSAGES_PATH)?
                .map(|(messages, _)| messages)
                .unwrap_or_default())
        })
        .await
    }

    async fn append_message(&self, user_id: &str, message: &ChatMessage) -> DomainResult<()> {
        let user_id = user_id.to_string();
        let message = message.clone();
        self.blocking(move |conn| {
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(map_sql_error)?;

            let (mut messages, version) =
                read_document::<Vec<ChatMessage>>(&tx, &user_id, MESSAGES_PATH)?.unwrap_or_default();
            messages.push(message);

            write_document(&tx, &user_id, MESSAGES_PATH, &to_json(&messages)?, version + 1)?;
            tx.commit().map_err(map_sql_error)
        })
        .await
    }

    async fn clear_messages(&self, user_id: &str) -> DomainResult<()> {
        let user_id = user_id.to_string();
        self.blocking(move |conn| delete_document(conn, &user_id, MESSAGES_PATH)).await
    }
}

fn read_document<T: DeserializeOwned>(
    conn: &Connection,
    user_id: &str,
    path: &str,
) -> DomainResult<Option<(T, u64)>> {
    let row = conn
        .query_row(SELECT_DOCUMENT, params![user_id, path], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })
        .optional()
        .map_err(map_sql_error)?;

    row.map(|(body, version)| {
        let value = serde_json::from_str::<T>(&body).map_err(|err| DaybookError::from(InfraError::from(err)))?;
        Ok((value, version_from_sql(version)))
    })
    .transpose()
}

fn current_version(conn: &Connection, user_id: &str, path: &str) -> DomainResult<u64> {
    let version = conn
        .query_row(
            "SELECT version FROM user_documents WHERE user_id = ?1 AND path = ?2",
            params![user_id, path],
            |row| row.get::<_, i64>(0),
        )
        .optional()
        .map_err(map_sql_error)?;
    Ok(version.map_or(0, version_from_sql))
}

fn write_document(conn: &Connection, user_id: &str, path: &str, body: &str, version: u64) -> DomainResult<()> {
    let version = i64::try_from(version)
        .map_err(|_| DaybookError::Database(format!("document version {version} out of range")))?;
    conn.execute(UPSERT_DOCUMENT, params![user_id, path, body, version, Utc::now().timestamp()])
        .map_err(map_sql_error)?;
    Ok(())
}

fn delete_document(conn: &Connection, user_id: &str, path: &str) -> DomainResult<()> {
    conn.execute(DELETE_DOCUMENT, params![user_id, path]).map_err(map_sql_error)?;
    Ok(())
}

fn version_from_sql(version: i64) -> u64 {
    u64::try_from(version).unwrap_or(0)
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> DomainResult<String> {
    serde_json::to_string(value).map_err(|err| DaybookError::from(InfraError::from(err)))
}

fn map_join_error(err: task::JoinError) -> DaybookError {
    DaybookError::Internal(format!("blocking database task failed: {err}"))
}
