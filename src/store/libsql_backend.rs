//! libSQL backend — durable `RosterStore` implementation.
//!
//! One row per (category, position) entry. `save` swaps the whole roster in a
//! single transaction so a concurrent `load` never sees a mix of old and new
//! category lists.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use libsql::{params, Connection, Database};
use tracing::info;

use crate::error::StoreError;
use crate::roster::model::{Category, WeeklyRoster};
use crate::store::traits::RosterStore;

/// libSQL roster store. `libsql::Connection` is `Send + Sync` and safe for
/// concurrent async use.
pub struct LibSqlRosterStore {
    #[allow(dead_code)]
    db: Arc<Database>,
    conn: Connection,
}

impl LibSqlRosterStore {
    /// Open (or create) a local database file and initialize the schema.
    pub async fn new_local(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Open(format!("Failed to create database directory: {e}")))?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| StoreError::Open(format!("Failed to open libSQL database: {e}")))?;

        let conn = db
            .connect()
            .map_err(|e| StoreError::Open(format!("Failed to create connection: {e}")))?;

        let store = Self {
            db: Arc::new(db),
            conn,
        };
        store.init_schema().await?;
        info!(path = %path.display(), "Roster database opened");
        Ok(store)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, StoreError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| StoreError::Open(format!("Failed to create in-memory database: {e}")))?;

        let conn = db
            .connect()
            .map_err(|e| StoreError::Open(format!("Failed to create connection: {e}")))?;

        let store = Self {
            db: Arc::new(db),
            conn,
        };
        store.init_schema().await?;
        Ok(store)
    }

    fn conn(&self) -> &Connection {
        &self.conn
    }

    async fn init_schema(&self) -> Result<(), StoreError> {
        self.conn()
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS roster_entries (
                    category TEXT NOT NULL,
                    position INTEGER NOT NULL,
                    name TEXT NOT NULL,
                    PRIMARY KEY (category, position)
                );",
            )
            .await
            .map_err(|e| StoreError::Open(format!("init_schema: {e}")))?;
        Ok(())
    }
}

#[async_trait]
impl RosterStore for LibSqlRosterStore {
    async fn load(&self) -> Result<WeeklyRoster, StoreError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT category, name FROM roster_entries ORDER BY category, position ASC",
                (),
            )
            .await
            .map_err(|e| StoreError::Query(format!("load: {e}")))?;

        let mut roster = WeeklyRoster::empty();
        while let Ok(Some(row)) = rows.next().await {
            let tag: String = row
                .get(0)
                .map_err(|e| StoreError::Query(format!("load row: {e}")))?;
            let name: String = row
                .get(1)
                .map_err(|e| StoreError::Query(format!("load row: {e}")))?;
            match Category::from_tag(&tag) {
                Some(cat) => roster.entries_mut(cat).push(name),
                None => tracing::warn!(category = %tag, "Skipping roster row with unknown category"),
            }
        }
        Ok(roster)
    }

    async fn save(&self, roster: &WeeklyRoster) -> Result<(), StoreError> {
        let tx = self
            .conn()
            .transaction()
            .await
            .map_err(|e| StoreError::Transaction(format!("save begin: {e}")))?;

        tx.execute("DELETE FROM roster_entries", ())
            .await
            .map_err(|e| StoreError::Transaction(format!("save delete: {e}")))?;

        for cat in Category::ALL {
            for (position, name) in roster.entries(cat).iter().enumerate() {
                tx.execute(
                    "INSERT INTO roster_entries (category, position, name) VALUES (?1, ?2, ?3)",
                    params![cat.type_tag(), position as i64, name.as_str()],
                )
                .await
                .map_err(|e| StoreError::Transaction(format!("save insert: {e}")))?;
            }
        }

        tx.commit()
            .await
            .map_err(|e| StoreError::Transaction(format!("save commit: {e}")))?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.conn()
            .execute("DELETE FROM roster_entries", ())
            .await
            .map_err(|e| StoreError::Query(format!("clear: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::parser::parse;

    #[tokio::test]
    async fn load_before_save_is_empty() {
        let store = LibSqlRosterStore::new_memory().await.unwrap();
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_load_round_trip_preserves_order() {
        let store = LibSqlRosterStore::new_memory().await.unwrap();
        let roster = parse("救急\nA\nB\nAM院内\nC\nD\nPM院内\nE\nF\n残り番\nG\nH\nI\nJ");
        store.save(&roster).await.unwrap();
        assert_eq!(store.load().await.unwrap(), roster);
    }

    #[tokio::test]
    async fn save_replaces_prior_roster() {
        let store = LibSqlRosterStore::new_memory().await.unwrap();
        let first = parse("救急\nA\nB\nC\nAM院内\nD\nPM院内\nE\n残り番\nF");
        let second = parse("救急\nX\nAM院内\nY\nPM院内\nZ\n残り番\nW");
        store.save(&first).await.unwrap();
        store.save(&second).await.unwrap();
        assert_eq!(store.load().await.unwrap(), second);
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let store = LibSqlRosterStore::new_memory().await.unwrap();
        let roster = parse("救急\nA\nAM院内\nB\nPM院内\nC\n残り番\nD");
        store.save(&roster).await.unwrap();

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_empty());
        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn roster_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.db");

        let roster = parse("救急\n田中\nAM院内\n佐藤\nPM院内\n鈴木\n残り番\n高橋\n伊藤");
        {
            let store = LibSqlRosterStore::new_local(&path).await.unwrap();
            store.save(&roster).await.unwrap();
        }

        let store = LibSqlRosterStore::new_local(&path).await.unwrap();
        assert_eq!(store.load().await.unwrap(), roster);
    }
}
