//! User registration and credential checks

use crate::entity::UserRecord;
use crate::error::{Error, Result};
use crate::repository::RepositoryFactory;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// User lifecycle over the shared repository.
#[derive(Clone)]
pub struct UserService {
    repo: Arc<RepositoryFactory>,
}

impl UserService {
    /// Create the service.
    pub fn new(repo: Arc<RepositoryFactory>) -> Self {
        Self { repo }
    }

    /// Register a new user and return their freshly minted api key.
    pub async fn create_user(&self) -> Result<String> {
        let api_key = Uuid::new_v4().to_string();
        let user = UserRecord {
            api_key: api_key.clone(),
            wallet_count: 0,
        };
        self.repo.users().create(&user).await?;

        info!("registered new user");
        Ok(api_key)
    }

    /// Fetch a user record, failing if the api key is unknown.
    pub async fn get_user(&self, api_key: &str) -> Result<UserRecord> {
        self.repo
            .users()
            .read(api_key)
            .await?
            .ok_or_else(|| Error::UserNotFound {
                api_key: api_key.to_string(),
            })
    }

    /// Whether an api key belongs to a registered user.
    pub async fn user_valid(&self, api_key: &str) -> Result<bool> {
        Ok(self.repo.users().read(api_key).await?.is_some())
    }
}
