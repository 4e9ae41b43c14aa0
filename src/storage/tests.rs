//! Storage Module Tests
//!
//! Validates both store backends against the `ActionStore` contract.
//!
//! ## Test Scopes
//! - **MemoryStore**: Id assignment, ordering, update/delete semantics, close.
//! - **FileStore**: Everything above plus persistence across reopen, id reuse
//!   across restarts and corrupt-file handling.

#[cfg(test)]
mod tests {
    use crate::queue::types::{ActionId, ActionType};
    use crate::storage::file::FileStore;
    use crate::storage::memory::MemoryStore;
    use crate::storage::store::ActionStore;
    use std::path::PathBuf;

    fn temp_store_path() -> PathBuf {
        std::env::temp_dir()
            .join("nightlife-core-tests")
            .join(format!("{}.json", uuid::Uuid::new_v4()))
    }

    /// Contract checks shared by both backends.
    fn exercise_contract(store: &dyn ActionStore) {
        let first = store
            .insert(ActionType::CheckIn, serde_json::json!({"venue_id": "v1"}))
            .unwrap();
        let second = store
            .insert(ActionType::LikePlace, serde_json::json!({"place_id": "v2"}))
            .unwrap();
        let third = store
            .insert(ActionType::SendMessage, serde_json::json!({"body": "hi"}))
            .unwrap();

        // Ids increase and start with retry_count = 0
        assert!(first.id < second.id && second.id < third.id);
        assert_eq!(first.retry_count, 0);

        // get_all is insertion order
        let ids: Vec<ActionId> = store.get_all().unwrap().iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![first.id, second.id, third.id]);

        // update replaces by id
        let mut bumped = second.clone();
        bumped.retry_count = 2;
        store.update(&bumped).unwrap();
        assert_eq!(store.get(second.id).unwrap().unwrap().retry_count, 2);

        // delete is idempotent
        store.delete(first.id).unwrap();
        store.delete(first.id).unwrap();
        assert!(store.get(first.id).unwrap().is_none());

        // update of a missing id is an error
        assert!(store.update(&first).is_err());

        // ids are not reused after delete
        let fourth = store
            .insert(ActionType::CheckIn, serde_json::json!({"venue_id": "v4"}))
            .unwrap();
        assert!(fourth.id > third.id);

        store.clear().unwrap();
        assert!(store.get_all().unwrap().is_empty());

        // closed stores refuse every operation
        store.close().unwrap();
        assert!(store.get_all().is_err());
        assert!(store
            .insert(ActionType::CheckIn, serde_json::json!({}))
            .is_err());
        assert!(store.delete(second.id).is_err());
    }

    // ============================================================
    // MEMORY STORE
    // ============================================================

    #[test]
    fn test_memory_store_contract() {
        let store = MemoryStore::new();
        exercise_contract(&store);
    }

    #[test]
    fn test_memory_store_len() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        store
            .insert(ActionType::CheckIn, serde_json::json!({}))
            .unwrap();

        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_memory_store_concurrent_inserts_get_unique_ids() {
        let store = std::sync::Arc::new(MemoryStore::new());

        let workers: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        store
                            .insert(ActionType::LikePlace, serde_json::json!({}))
                            .unwrap();
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        let all = store.get_all().unwrap();
        assert_eq!(all.len(), 400);
        let mut ids: Vec<u64> = all.iter().map(|a| a.id.0).collect();
        ids.dedup();
        assert_eq!(ids.len(), 400);
    }

    // ============================================================
    // FILE STORE
    // ============================================================

    #[test]
    fn test_file_store_contract() {
        let path = temp_store_path();
        let store = FileStore::open(&path).unwrap();

        exercise_contract(&store);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let path = temp_store_path();

        let (first, second) = {
            let store = FileStore::open(&path).unwrap();
            let first = store
                .insert(ActionType::CheckIn, serde_json::json!({"venue_id": "v1"}))
                .unwrap();
            let mut second = store
                .insert(ActionType::UpdateProfile, serde_json::json!({"user_id": "u1"}))
                .unwrap();
            second.retry_count = 1;
            store.update(&second).unwrap();
            store.close().unwrap();
            (first, second)
        };

        let reopened = FileStore::open(&path).unwrap();
        let all = reopened.get_all().unwrap();

        assert_eq!(all, vec![first, second]);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_file_store_never_reuses_ids_after_restart() {
        let path = temp_store_path();

        let last = {
            let store = FileStore::open(&path).unwrap();
            store
                .insert(ActionType::CheckIn, serde_json::json!({}))
                .unwrap();
            let last = store
                .insert(ActionType::CheckIn, serde_json::json!({}))
                .unwrap();
            // Deleting the newest entry must not free its id.
            store.delete(last.id).unwrap();
            last
        };

        let reopened = FileStore::open(&path).unwrap();
        let next = reopened
            .insert(ActionType::CheckIn, serde_json::json!({}))
            .unwrap();

        assert!(next.id > last.id);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_file_store_rejects_corrupt_file() {
        let path = temp_store_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"{ not json").unwrap();

        assert!(FileStore::open(&path).is_err());

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_file_store_rejects_empty_file() {
        let path = temp_store_path();
        {
            let store = FileStore::open(&path).unwrap();
            store
                .insert(ActionType::CheckIn, serde_json::json!({"venue_id": "v1"}))
                .unwrap();
        }

        // A truncated file must not reopen as a fresh queue with next id 1.
        std::fs::write(&path, b"").unwrap();

        let result = FileStore::open(&path);
        assert!(result.is_err());
        assert!(result.err().unwrap().to_string().contains("is empty"));

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_file_store_writes_complete_document_in_place() {
        let path = temp_store_path();
        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.path(), path.as_path());

        let action = store
            .insert(ActionType::LikePlace, serde_json::json!({"place_id": "v2"}))
            .unwrap();

        // The document on disk is whole and the temp file has been renamed away.
        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw["next_id"], action.id.0 + 1);
        assert_eq!(raw["actions"][0]["action_type"], "like-place");

        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        assert!(!std::path::Path::new(&tmp).exists());

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_file_store_keeps_unknown_action_types() {
        let path = temp_store_path();
        {
            let store = FileStore::open(&path).unwrap();
            store
                .insert(ActionType::from("rsvp-event"), serde_json::json!({"event": 7}))
                .unwrap();
        }

        let reopened = FileStore::open(&path).unwrap();
        let all = reopened.get_all().unwrap();

        assert_eq!(all[0].action_type, ActionType::Other("rsvp-event".to_string()));

        let _ = std::fs::remove_file(path);
    }
}
