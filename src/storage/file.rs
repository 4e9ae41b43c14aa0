//! File-backed action store.
//!
//! The whole queue lives in one JSON document. Every mutation rewrites the
//! document to a sibling temp file, flushes it to disk, renames it over the
//! original and flushes the directory entry. A crash or power loss mid-write
//! leaves either the old or the new contents on disk, never a torn file.

use super::store::ActionStore;
use crate::queue::types::{ActionId, ActionType, QueuedAction, now_ms};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// On-disk layout. `next_id` is persisted so ids are never reused after a restart.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    next_id: u64,
    actions: Vec<QueuedAction>,
}

struct StoreState {
    next_id: u64,
    actions: BTreeMap<ActionId, QueuedAction>,
    closed: bool,
}

pub struct FileStore {
    path: PathBuf,
    state: Mutex<StoreState>,
}

impl FileStore {
    /// Opens the store at `path`, creating parent directories as needed.
    ///
    /// A missing file is an empty queue. A file that is empty or does not parse
    /// is an error rather than being silently treated as an empty queue.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }

        let document = if path.exists() {
            let raw = std::fs::read(&path)
                .with_context(|| format!("Failed to read action store {}", path.display()))?;
            if raw.is_empty() {
                return Err(anyhow::anyhow!(
                    "Action store {} is empty; refusing to reset the queue",
                    path.display()
                ));
            }
            serde_json::from_slice::<StoreDocument>(&raw)
                .with_context(|| format!("Corrupt action store {}", path.display()))?
        } else {
            StoreDocument::default()
        };

        let actions: BTreeMap<ActionId, QueuedAction> = document
            .actions
            .into_iter()
            .map(|action| (action.id, action))
            .collect();

        // Guard against a hand-edited file whose counter lags behind its contents.
        let highest = actions.keys().next_back().map(|id| id.0).unwrap_or(0);
        let next_id = document.next_id.max(highest + 1).max(1);

        tracing::info!(
            "Opened action store {} ({} pending, next id {})",
            path.display(),
            actions.len(),
            next_id
        );

        Ok(Self {
            path,
            state: Mutex::new(StoreState {
                next_id,
                actions,
                closed: false,
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, StoreState>> {
        let state = self
            .state
            .lock()
            .map_err(|_| anyhow::anyhow!("Action store lock poisoned"))?;
        if state.closed {
            return Err(anyhow::anyhow!("Action store is closed"));
        }
        Ok(state)
    }

    fn persist(&self, state: &StoreState) -> Result<()> {
        let document = StoreDocument {
            next_id: state.next_id,
            actions: state.actions.values().cloned().collect(),
        };
        let bytes = serde_json::to_vec_pretty(&document)?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let mut file = File::create(&tmp)
            .with_context(|| format!("Failed to create {}", tmp.display()))?;
        file.write_all(&bytes)
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        file.sync_all()
            .with_context(|| format!("Failed to flush {}", tmp.display()))?;
        drop(file);

        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        sync_parent_dir(&self.path);
        Ok(())
    }
}

/// Makes the rename itself durable. Not every platform lets a directory be
/// opened for syncing, so failures are only logged.
fn sync_parent_dir(path: &Path) {
    let Some(parent) = path.parent() else {
        return;
    };
    let parent = if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    };

    if let Err(e) = File::open(parent).and_then(|dir| dir.sync_all()) {
        tracing::trace!("Could not sync directory {}: {}", parent.display(), e);
    }
}

impl ActionStore for FileStore {
    fn insert(&self, action_type: ActionType, payload: serde_json::Value) -> Result<QueuedAction> {
        let mut state = self.lock()?;

        let id = ActionId(state.next_id);
        let action = QueuedAction {
            id,
            action_type,
            payload,
            enqueued_at: now_ms(),
            retry_count: 0,
        };
        state.next_id += 1;
        state.actions.insert(id, action.clone());

        if let Err(e) = self.persist(&state) {
            // Roll back the in-memory view so it keeps matching the disk. The id
            // stays consumed.
            state.actions.remove(&id);
            return Err(e);
        }

        Ok(action)
    }

    fn get_all(&self) -> Result<Vec<QueuedAction>> {
        let state = self.lock()?;
        Ok(state.actions.values().cloned().collect())
    }

    fn get(&self, id: ActionId) -> Result<Option<QueuedAction>> {
        let state = self.lock()?;
        Ok(state.actions.get(&id).cloned())
    }

    fn update(&self, action: &QueuedAction) -> Result<()> {
        let mut state = self.lock()?;

        let previous = match state.actions.get_mut(&action.id) {
            Some(entry) => std::mem::replace(entry, action.clone()),
            None => return Err(anyhow::anyhow!("Action {} not found", action.id)),
        };

        if let Err(e) = self.persist(&state) {
            state.actions.insert(action.id, previous);
            return Err(e);
        }
        Ok(())
    }

    fn delete(&self, id: ActionId) -> Result<()> {
        let mut state = self.lock()?;

        let Some(previous) = state.actions.remove(&id) else {
            return Ok(());
        };

        if let Err(e) = self.persist(&state) {
            state.actions.insert(id, previous);
            return Err(e);
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut state = self.lock()?;

        let previous = std::mem::take(&mut state.actions);
        if let Err(e) = self.persist(&state) {
            state.actions = previous;
            return Err(e);
        }
        Ok(())
    }

    fn close(&self) -> Result<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| anyhow::anyhow!("Action store lock poisoned"))?;
        if state.closed {
            return Ok(());
        }

        self.persist(&state)?;
        state.closed = true;

        tracing::info!("Closed action store {}", self.path.display());
        Ok(())
    }
}
