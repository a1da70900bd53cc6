//! Association lists.
//!
//! Realm membership is kept in key-value LISTs. Every list item is a JSON
//! array (a batch) of records; readers concatenate all batches. The backend
//! cannot edit list items in place, so removing one record rewrites the
//! list:
//!
//! - **add one**: append a one-element batch;
//! - **remove one**: read everything, swap-remove the record, delete the
//!   key, append the remaining records as a single batch;
//! - **replace all**: delete the key, append the full batch.
//!
//! An absent or empty list reads as `ZeroLength`. A list whose only batch
//! is `[]` reads as an empty collection.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use ferrum_core::error::AppError;
use ferrum_core::result::AppResult;

use super::KvIdentityStore;

impl KvIdentityStore {
    /// Read and flatten every batch of the list at `key`.
    pub(crate) async fn read_list<T: DeserializeOwned>(
        &self,
        kind: &str,
        key: &str,
    ) -> AppResult<Vec<T>> {
        let batches = self.kv.lrange(key).await?;
        if batches.is_empty() {
            warn!(kind, key, "Received zero list items");
            return Err(AppError::zero_length(format!("{kind} list '{key}' is empty")));
        }

        let mut items = Vec::new();
        for batch in &batches {
            let portion: Vec<T> = serde_json::from_str(batch).map_err(|e| {
                AppError::with_source(
                    ferrum_core::ErrorKind::Serialization,
                    format!("{kind} list '{key}' holds a malformed batch"),
                    e,
                )
            })?;
            items.extend(portion);
        }
        Ok(items)
    }

    /// Append `items` to the list at `key` as one batch.
    ///
    /// With `replace` the list is deleted first, so it ends up holding
    /// exactly `items`.
    pub(crate) async fn write_list<T: Serialize + Sync>(
        &self,
        key: &str,
        items: &[T],
        replace: bool,
    ) -> AppResult<()> {
        let batch = serde_json::to_string(items)?;
        if replace {
            // A missing list needs no delete.
            self.kv.delete(key).await?;
        }
        self.kv.rpush(key, &batch).await
    }

    /// Append one record to the list at `key`.
    pub(crate) async fn append_entry<T: Serialize + Sync>(&self, key: &str, item: &T) -> AppResult<()> {
        self.write_list(key, std::slice::from_ref(item), false).await
    }

    /// Remove the first record matching `matches` and rewrite the list.
    ///
    /// Returns the removed record. An empty list is `ZeroLength`; a list
    /// without a matching record is `NotFound`.
    pub(crate) async fn remove_entry<T, F>(&self, kind: &str, key: &str, matches: F) -> AppResult<T>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        F: Fn(&T) -> bool + Send,
    {
        let mut items: Vec<T> = self.read_list(kind, key).await?;
        let Some(index) = items.iter().position(|item| matches(item)) else {
            return Err(AppError::not_found(format!("no matching entry in {kind} list '{key}'")));
        };
        let removed = items.swap_remove(index);
        self.write_list(key, &items, true).await?;
        debug!(kind, key, remaining = items.len(), "Association entry removed");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use ferrum_core::ErrorKind;
    use ferrum_core::traits::kv::KeyValueStore;
    use ferrum_entity::identifier::ExtendedIdentifier;

    use crate::kv::test_support::make_store;

    const KEY: &str = "fe.realm_r1_clients";

    fn ident(name: &str) -> ExtendedIdentifier {
        ExtendedIdentifier::new(Uuid::new_v4(), name)
    }

    #[tokio::test]
    async fn test_absent_list_is_zero_length() {
        let (store, _) = make_store();
        let err = store
            .read_list::<ExtendedIdentifier>("realm clients", KEY)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ZeroLength);
    }

    #[tokio::test]
    async fn test_batches_are_flattened() {
        let (store, backend) = make_store();
        store.write_list(KEY, &[ident("a"), ident("b")], true).await.unwrap();
        store.append_entry(KEY, &ident("c")).await.unwrap();

        assert_eq!(backend.lrange(KEY).await.unwrap().len(), 2);
        let names: Vec<String> = store
            .read_list::<ExtendedIdentifier>("realm clients", KEY)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_remove_swaps_and_rewrites_single_batch() {
        let (store, backend) = make_store();
        for name in ["a", "b", "c"] {
            store.append_entry(KEY, &ident(name)).await.unwrap();
        }

        let removed: ExtendedIdentifier = store
            .remove_entry("realm clients", KEY, |e: &ExtendedIdentifier| e.name == "a")
            .await
            .unwrap();
        assert_eq!(removed.name, "a");

        let batches = backend.lrange(KEY).await.unwrap();
        assert_eq!(batches.len(), 1);
        let names: Vec<String> = store
            .read_list::<ExtendedIdentifier>("realm clients", KEY)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        // The last record takes the removed one's place.
        assert_eq!(names, vec!["c", "b"]);
    }

    #[tokio::test]
    async fn test_remove_last_leaves_empty_batch() {
        let (store, backend) = make_store();
        store.append_entry(KEY, &ident("a")).await.unwrap();
        store
            .remove_entry("realm clients", KEY, |e: &ExtendedIdentifier| e.name == "a")
            .await
            .unwrap();

        assert_eq!(backend.lrange(KEY).await.unwrap(), vec!["[]"]);
        assert!(
            store
                .read_list::<ExtendedIdentifier>("realm clients", KEY)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_remove_missing_is_not_found() {
        let (store, _) = make_store();
        store.append_entry(KEY, &ident("a")).await.unwrap();
        let err = store
            .remove_entry("realm clients", KEY, |e: &ExtendedIdentifier| e.name == "zzz")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
