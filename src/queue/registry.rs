//! Action Handler Registry
//!
//! Maps action types (e.g. `check-in`) to the async closures that apply them to
//! the remote data service. Adding a new kind of action is a registration, not
//! an edit to the queue.

use super::types::*;

use anyhow::Result;
use dashmap::DashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Type alias for a thread-safe, asynchronous action handler.
/// It takes a snapshot of the queued action and resolves to `Result<()>`.
pub type ActionHandlerFn =
    Arc<dyn Fn(QueuedAction) -> Pin<Box<dyn Future<Output = Result<()>> + Send>> + Send + Sync>;

/// Registry holding the mapping between action types and their implementation.
pub struct ActionHandlerRegistry {
    handlers: DashMap<ActionType, ActionHandlerFn>,
}

impl ActionHandlerRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers a handler for an action type, replacing any previous one.
    pub fn register<F, Fut>(&self, action_type: ActionType, handler: F)
    where
        F: Fn(QueuedAction) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        // Box::pin erases the concrete future type so different async fns share one map.
        let handler_fn: ActionHandlerFn = Arc::new(move |action: QueuedAction| {
            Box::pin(handler(action)) as Pin<Box<dyn Future<Output = Result<()>> + Send>>
        });

        tracing::info!("Registered action handler: {}", action_type);
        self.handlers.insert(action_type, handler_fn);
    }

    /// Returns a cloned handle to the handler, if any.
    pub fn get(&self, action_type: &ActionType) -> Option<ActionHandlerFn> {
        self.handlers
            .get(action_type)
            .map(|entry| entry.value().clone())
    }

    /// Looks up the handler for the action's type and runs it.
    ///
    /// # Returns
    /// * `Ok(())` if the handler succeeded.
    /// * `Err` if the handler failed or no handler exists for the type.
    pub async fn execute(&self, action: &QueuedAction) -> Result<()> {
        let Some(handler_fn) = self.get(&action.action_type) else {
            let error = format!("Unknown action type: {}", action.action_type);
            tracing::error!("{}", error);
            return Err(anyhow::anyhow!(error));
        };

        tracing::debug!(
            "Executing action {} with handler '{}'",
            action.id,
            action.action_type
        );
        handler_fn(action.clone()).await
    }

    /// Returns all registered action types.
    pub fn list_handlers(&self) -> Vec<ActionType> {
        self.handlers
            .iter()
            .map(|entry| entry.key().clone())
            .collect()
    }

    pub fn has_handler(&self, action_type: &ActionType) -> bool {
        self.handlers.contains_key(action_type)
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl Default for ActionHandlerRegistry {
    fn default() -> Self {
        Self {
            handlers: DashMap::new(),
        }
    }
}
