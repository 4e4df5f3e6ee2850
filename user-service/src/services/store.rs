use crate::models::{NewUser, User, UserChanges};
use crate::services::UserServiceError;
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

/// Persistence for user records.
///
/// Implementations only fail with `UserServiceError::StoreUnavailable`;
/// absence is reported through `Option`/`bool` so handlers decide on 404.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list(&self) -> Result<Vec<User>, UserServiceError>;

    async fn get(&self, id: ObjectId) -> Result<Option<User>, UserServiceError>;

    /// Insert and return the stored record with its assigned identifier.
    async fn insert(&self, user: NewUser) -> Result<User, UserServiceError>;

    /// Merge `changes` into the record and return it as it is after the update.
    async fn update(
        &self,
        id: ObjectId,
        changes: UserChanges,
    ) -> Result<Option<User>, UserServiceError>;

    /// Returns whether a record was removed.
    async fn delete(&self, id: ObjectId) -> Result<bool, UserServiceError>;

    async fn ping(&self) -> Result<(), UserServiceError>;
}
