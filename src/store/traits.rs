//! Roster store contract.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::roster::WeeklyRoster;

/// Durable owner of the single live `WeeklyRoster`.
///
/// Implementations must expose the roster as an atomically-swapped whole: a
/// `load` concurrent with a `save` or `clear` sees either the old roster or the
/// new one, never a mix of category lists.
#[async_trait]
pub trait RosterStore: Send + Sync {
    /// Current roster. The empty roster if nothing was ever saved or the store
    /// was cleared.
    async fn load(&self) -> Result<WeeklyRoster, StoreError>;

    /// Replace any prior roster wholesale.
    async fn save(&self, roster: &WeeklyRoster) -> Result<(), StoreError>;

    /// Reset to the empty roster. Idempotent.
    async fn clear(&self) -> Result<(), StoreError>;
}
