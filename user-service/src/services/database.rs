use crate::config::MongoConfig;
use crate::models::{NewUser, User, UserChanges};
use crate::services::{UserServiceError, UserStore};
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::{ClientOptions, FindOneAndUpdateOptions, FindOptions, ReturnDocument},
    Client as MongoClient, Collection,
};
use secrecy::ExposeSecret;
use std::time::Duration;

#[derive(Clone)]
pub struct MongoUserStore {
    client: MongoClient,
    users: Collection<User>,
}

impl MongoUserStore {
    /// Build the client. The driver connects lazily; call `ping` to verify
    /// the server is reachable.
    pub async fn connect(config: &MongoConfig) -> Result<Self, UserServiceError> {
        tracing::info!(
            database = %config.database,
            collection = %config.collection,
            "Connecting to MongoDB"
        );

        let mut options = ClientOptions::parse(config.uri.expose_secret())
            .await
            .map_err(|e| {
                tracing::error!("Failed to parse MongoDB connection string: {}", e);
                UserServiceError::from(e)
            })?;

        let timeout = Duration::from_secs(config.connect_timeout_secs);
        options.app_name = Some("user-service".to_string());
        options.connect_timeout = Some(timeout);
        options.server_selection_timeout = Some(timeout);

        let client = MongoClient::with_options(options)?;
        let users = client
            .database(&config.database)
            .collection::<User>(&config.collection);

        Ok(Self { client, users })
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn list(&self) -> Result<Vec<User>, UserServiceError> {
        let options = FindOptions::builder().sort(doc! { "_id": 1 }).build();
        let cursor = self.users.find(doc! {}, options).await?;
        let users: Vec<User> = cursor.try_collect().await?;
        Ok(users)
    }

    async fn get(&self, id: ObjectId) -> Result<Option<User>, UserServiceError> {
        let user = self.users.find_one(doc! { "_id": id }, None).await?;
        Ok(user)
    }

    async fn insert(&self, user: NewUser) -> Result<User, UserServiceError> {
        let result = self
            .users
            .clone_with_type::<NewUser>()
            .insert_one(&user, None)
            .await?;

        let id = result.inserted_id.as_object_id().ok_or_else(|| {
            UserServiceError::StoreUnavailable(anyhow::anyhow!(
                "store assigned a non-ObjectId identifier: {}",
                result.inserted_id
            ))
        })?;

        Ok(user.into_user(id))
    }

    async fn update(
        &self,
        id: ObjectId,
        changes: UserChanges,
    ) -> Result<Option<User>, UserServiceError> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let user = self
            .users
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$set": changes.to_set_document() },
                options,
            )
            .await?;
        Ok(user)
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, UserServiceError> {
        let result = self.users.delete_one(doc! { "_id": id }, None).await?;
        Ok(result.deleted_count > 0)
    }

    async fn ping(&self) -> Result<(), UserServiceError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                UserServiceError::from(e)
            })?;
        Ok(())
    }
}
