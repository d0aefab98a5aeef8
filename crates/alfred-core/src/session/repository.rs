//! Session repository trait.
//!
//! Defines the interface for session persistence operations.

use super::model::Session;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract repository for managing session persistence.
///
/// This trait defines the contract for persisting and retrieving sessions,
/// decoupling the engine from the specific storage mechanism (JSON files,
/// a database, an in-memory map in tests). The engine serializes turns per
/// session id, so implementations do not need their own per-user locking.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Finds a session by the owning user's id.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Session))`: session found
    /// - `Ok(None)`: no stored session for this user
    /// - `Err(_)`: storage error
    async fn find_by_id(&self, user_id: &str) -> Result<Option<Session>>;

    /// Saves a session, overwriting any previous record for the same user.
    async fn save(&self, session: &Session) -> Result<()>;

    /// Deletes a user's session. Deleting a missing session is not an error.
    async fn delete(&self, user_id: &str) -> Result<()>;
}
