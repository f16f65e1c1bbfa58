//! In-memory roster store — for tests and DB-less deployments.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::roster::WeeklyRoster;
use crate::store::traits::RosterStore;

/// Holds the roster behind an `RwLock` and swaps it as a whole value, so
/// readers never observe a partially-written roster.
#[derive(Debug, Default)]
pub struct MemoryRosterStore {
    roster: RwLock<WeeklyRoster>,
}

impl MemoryRosterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RosterStore for MemoryRosterStore {
    async fn load(&self) -> Result<WeeklyRoster, StoreError> {
        Ok(self.roster.read().await.clone())
    }

    async fn save(&self, roster: &WeeklyRoster) -> Result<(), StoreError> {
        *self.roster.write().await = roster.clone();
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        *self.roster.write().await = WeeklyRoster::empty();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::parser::parse;

    #[tokio::test]
    async fn load_before_save_is_empty() {
        let store = MemoryRosterStore::new();
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_load_round_trip() {
        let store = MemoryRosterStore::new();
        let roster = parse("救急\nA\nAM院内\nB\nPM院内\nC\n残り番\nD\nE");
        store.save(&roster).await.unwrap();
        assert_eq!(store.load().await.unwrap(), roster);
    }

    #[tokio::test]
    async fn save_replaces_wholesale() {
        let store = MemoryRosterStore::new();
        let first = parse("救急\nA\nAM院内\nB\nPM院内\nC\n残り番\nD");
        let second = parse("救急\nX\nAM院内\nY\nPM院内\nZ\n残り番\nW");
        store.save(&first).await.unwrap();
        store.save(&second).await.unwrap();
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, second);
        assert_eq!(loaded.emergency, ["X"]);
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let store = MemoryRosterStore::new();
        let roster = parse("救急\nA\nAM院内\nB\nPM院内\nC\n残り番\nD");
        store.save(&roster).await.unwrap();

        store.clear().await.unwrap();
        let once = store.load().await.unwrap();
        store.clear().await.unwrap();
        let twice = store.load().await.unwrap();

        assert!(once.is_empty());
        assert_eq!(once, twice);
    }
}
