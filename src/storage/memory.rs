use super::store::ActionStore;
use crate::queue::types::{ActionId, ActionType, QueuedAction, now_ms};

use anyhow::Result;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// In-process store. Nothing survives a restart.
pub struct MemoryStore {
    actions: DashMap<ActionId, QueuedAction>,
    next_id: AtomicU64,
    closed: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            actions: DashMap::new(),
            next_id: AtomicU64::new(1),
            closed: AtomicBool::new(false),
        }
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(anyhow::anyhow!("Action store is closed"));
        }
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionStore for MemoryStore {
    fn insert(&self, action_type: ActionType, payload: serde_json::Value) -> Result<QueuedAction> {
        self.ensure_open()?;

        let id = ActionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let action = QueuedAction {
            id,
            action_type,
            payload,
            enqueued_at: now_ms(),
            retry_count: 0,
        };
        self.actions.insert(id, action.clone());

        tracing::trace!("Stored action {} in memory", id);
        Ok(action)
    }

    fn get_all(&self) -> Result<Vec<QueuedAction>> {
        self.ensure_open()?;

        let mut actions: Vec<QueuedAction> = self
            .actions
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        actions.sort_by_key(|action| action.id);
        Ok(actions)
    }

    fn get(&self, id: ActionId) -> Result<Option<QueuedAction>> {
        self.ensure_open()?;
        Ok(self.actions.get(&id).map(|entry| entry.value().clone()))
    }

    fn update(&self, action: &QueuedAction) -> Result<()> {
        self.ensure_open()?;

        match self.actions.get_mut(&action.id) {
            Some(mut entry) => {
                *entry = action.clone();
                Ok(())
            }
            None => Err(anyhow::anyhow!("Action {} not found", action.id)),
        }
    }

    fn delete(&self, id: ActionId) -> Result<()> {
        self.ensure_open()?;
        self.actions.remove(&id);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.ensure_open()?;
        self.actions.clear();
        Ok(())
    }

    fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
