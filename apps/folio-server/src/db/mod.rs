//! Database module for SQLite persistence
//!
//! Handles documents, extracted pages and annotations.

mod annotations;
mod documents;
mod pages;
mod schema;

pub use annotations::*;
pub use documents::*;
pub use pages::*;
pub use schema::*;

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::query_builder::Separated;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Encode, Sqlite, Type};
use std::str::FromStr;
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::error::Result;
use crate::patch::Field;

/// Create a new database connection pool
pub async fn create_pool(config: &DatabaseConfig) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

    let mut pool_options = SqlitePoolOptions::new().max_connections(config.max_connections.max(1));

    // An in-memory database dies with its connection.
    if config.url.contains(":memory:") {
        pool_options = pool_options
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>);
    }

    let pool = pool_options.connect_with(options).await?;

    // Run migrations
    initialize_schema(&pool).await?;

    Ok(pool)
}

/// Current time in the stored timestamp format
pub(crate) fn now() -> String {
    timestamp(&Utc::now())
}

/// RFC 3339, UTC, `Z` suffix
pub(crate) fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Append `column = ?` to an UPDATE's SET list when the field was supplied
pub(crate) fn push_field<'args, T>(
    set: &mut Separated<'_, 'args, Sqlite, &'static str>,
    column: &str,
    field: Field<T>,
) where
    T: 'args + Encode<'args, Sqlite> + Type<Sqlite> + Send,
{
    match field {
        Field::Absent => {}
        Field::Null => {
            set.push(format!("{} = ", column))
                .push_bind_unseparated(None::<T>);
        }
        Field::Value(value) => {
            set.push(format!("{} = ", column))
                .push_bind_unseparated(value);
        }
    }
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    create_pool(&DatabaseConfig::in_memory())
        .await
        .expect("in-memory pool")
}
