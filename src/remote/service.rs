use crate::queue::registry::ActionHandlerRegistry;
use crate::queue::types::ActionType;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Operations the hosted backend must expose for queued actions to be replayed.
#[async_trait]
pub trait RemoteDataService: Send + Sync {
    async fn insert_check_in(&self, record: &serde_json::Value) -> Result<()>;

    async fn insert_like(&self, record: &serde_json::Value) -> Result<()>;

    async fn insert_message(&self, record: &serde_json::Value) -> Result<()>;

    async fn update_profile(&self, user_id: &str, fields: &serde_json::Value) -> Result<()>;
}

/// Payload shape for `update-profile` actions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileUpdate {
    pub user_id: String,
    pub updates: serde_json::Value,
}

/// Registers one handler per built-in action type, each forwarding to `remote`.
pub fn register_remote_handlers(
    registry: &ActionHandlerRegistry,
    remote: Arc<dyn RemoteDataService>,
) {
    let service = remote.clone();
    registry.register(ActionType::CheckIn, move |action| {
        let service = service.clone();
        async move { service.insert_check_in(&action.payload).await }
    });

    let service = remote.clone();
    registry.register(ActionType::LikePlace, move |action| {
        let service = service.clone();
        async move { service.insert_like(&action.payload).await }
    });

    let service = remote.clone();
    registry.register(ActionType::SendMessage, move |action| {
        let service = service.clone();
        async move { service.insert_message(&action.payload).await }
    });

    let service = remote;
    registry.register(ActionType::UpdateProfile, move |action| {
        let service = service.clone();
        async move {
            let update: ProfileUpdate = serde_json::from_value(action.payload)
                .with_context(|| format!("Malformed update-profile payload in action {}", action.id))?;
            service.update_profile(&update.user_id, &update.updates).await
        }
    });
}
