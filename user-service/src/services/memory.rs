use crate::models::{NewUser, User, UserChanges};
use crate::services::{UserServiceError, UserStore};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Process-local store for tests and local runs without MongoDB.
///
/// `set_available(false)` makes every call fail as if the server were down.
pub struct InMemoryUserStore {
    users: Mutex<BTreeMap<ObjectId, User>>,
    available: AtomicBool,
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(BTreeMap::new()),
            available: AtomicBool::new(true),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.users.lock().map(|users| users.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn users(&self) -> Result<MutexGuard<'_, BTreeMap<ObjectId, User>>, UserServiceError> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(UserServiceError::StoreUnavailable(anyhow::anyhow!(
                "in-memory store marked unavailable"
            )));
        }
        self.users.lock().map_err(|e| {
            UserServiceError::StoreUnavailable(anyhow::anyhow!("user store mutex poisoned: {}", e))
        })
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn list(&self) -> Result<Vec<User>, UserServiceError> {
        Ok(self.users()?.values().cloned().collect())
    }

    async fn get(&self, id: ObjectId) -> Result<Option<User>, UserServiceError> {
        Ok(self.users()?.get(&id).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, UserServiceError> {
        let mut users = self.users()?;
        let user = user.into_user(ObjectId::new());
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(
        &self,
        id: ObjectId,
        changes: UserChanges,
    ) -> Result<Option<User>, UserServiceError> {
        let mut users = self.users()?;
        Ok(users.get_mut(&id).map(|user| {
            changes.apply(user);
            user.clone()
        }))
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, UserServiceError> {
        Ok(self.users()?.remove(&id).is_some())
    }

    async fn ping(&self) -> Result<(), UserServiceError> {
        self.users().map(|_| ())
    }
}
