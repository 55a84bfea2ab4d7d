//! In-memory store backend.
//!
//! The mock stand-in for the remote store during local development and in
//! tests. It replays the same call shape as the remote backend and fans
//! out change notifications to subscribers synchronously with the
//! mutation. Note that "synchronously" still means the notification races
//! the caller's own continuation once it crosses the channel, which is why
//! the widget applies promotions eagerly instead of waiting for its own
//! echo.
//!
//! Each `MemoryStore` owns its document collection and subscriber list;
//! there is no module-level state, so independent widgets and test
//! harnesses can each hold their own instance.

use crate::document::{DocId, Document, Patch, FIELD_CREATED_AT};
use crate::store::{
    compare_field, ChangeKind, DocChange, DocumentStore, SortDirection, StoreError, Subscription,
};
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;

/// In-memory document collection with change fan-out.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    /// Documents in insertion order.
    docs: Vec<(DocId, Document)>,
    subscribers: Vec<(u64, mpsc::UnboundedSender<DocChange>)>,
    next_subscriber: u64,
    /// Last timestamp handed out, so server timestamps never go backwards
    /// within one instance.
    last_timestamp: Option<DateTime<Utc>>,
}

impl Inner {
    fn server_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let ts = match self.last_timestamp {
            Some(last) if now < last => last,
            _ => now,
        };
        self.last_timestamp = Some(ts);
        ts
    }

    fn notify(&mut self, kind: ChangeKind, id: &DocId, doc: &Document) {
        let change = DocChange {
            kind,
            id: id.clone(),
            doc: doc.clone(),
        };
        // Subscribers that dropped their end are pruned as a side effect.
        self.subscribers
            .retain(|(_, tx)| tx.send(change.clone()).is_ok());
    }

    fn doc_mut(&mut self, id: &DocId) -> Option<&mut Document> {
        self.docs
            .iter_mut()
            .find(|(doc_id, _)| doc_id == id)
            .map(|(_, doc)| doc)
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> anyhow::Result<MutexGuard<'_, Inner>> {
        self.inner.lock().map_err(|_| anyhow!("store lock poisoned"))
    }

    /// Delete a document and notify subscribers with a `Removed` change.
    ///
    /// Not part of [`DocumentStore`]: no widget operation deletes comments,
    /// but subscribers have to handle removal and test harnesses need a way
    /// to produce one.
    pub fn remove(&self, id: &DocId) -> anyhow::Result<()> {
        let mut inner = self.lock()?;
        let idx = inner
            .docs
            .iter()
            .position(|(doc_id, _)| doc_id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        let (id, doc) = inner.docs.remove(idx);
        inner.notify(ChangeKind::Removed, &id, &doc);
        Ok(())
    }

    /// Number of documents currently stored.
    pub fn len(&self) -> usize {
        self.inner.lock().map(|inner| inner.docs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn add(&self, mut doc: Document) -> anyhow::Result<DocId> {
        let mut inner = self.lock()?;
        let ts = inner.server_timestamp();
        doc.insert(FIELD_CREATED_AT.to_string(), Value::String(ts.to_rfc3339()));
        let id = DocId::generate();
        inner.docs.push((id.clone(), doc.clone()));
        inner.notify(ChangeKind::Added, &id, &doc);
        log::debug!("added document {id}");
        Ok(id)
    }

    async fn update(&self, id: &DocId, patch: Patch) -> anyhow::Result<()> {
        let mut inner = self.lock()?;
        let doc = inner
            .doc_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        patch.apply(doc);
        let snapshot = doc.clone();
        inner.notify(ChangeKind::Modified, id, &snapshot);
        Ok(())
    }

    async fn query_eq(
        &self,
        field: &str,
        value: &Value,
    ) -> anyhow::Result<Vec<(DocId, Document)>> {
        let inner = self.lock()?;
        Ok(inner
            .docs
            .iter()
            .filter(|(_, doc)| doc.get(field) == Some(value))
            .cloned()
            .collect())
    }

    async fn batch_update(&self, updates: Vec<(DocId, Patch)>) -> anyhow::Result<()> {
        let mut inner = self.lock()?;
        // Validate the whole batch before touching anything, so a missing
        // id cannot leave a half-applied batch behind.
        for (id, _) in &updates {
            if inner.doc_mut(id).is_none() {
                return Err(StoreError::NotFound(id.clone()).into());
            }
        }
        let mut snapshots = Vec::with_capacity(updates.len());
        for (id, patch) in &updates {
            let doc = inner
                .doc_mut(id)
                .ok_or_else(|| StoreError::NotFound(id.clone()))?;
            patch.apply(doc);
            snapshots.push((id.clone(), doc.clone()));
        }
        // Notifications only after every entry applied.
        for (id, snapshot) in snapshots {
            inner.notify(ChangeKind::Modified, &id, &snapshot);
        }
        Ok(())
    }

    async fn subscribe_ordered(
        &self,
        order_field: &str,
        direction: SortDirection,
    ) -> anyhow::Result<Subscription> {
        let mut inner = self.lock()?;

        let mut snapshot: Vec<(DocId, Document)> = inner.docs.clone();
        snapshot.sort_by(|(_, a), (_, b)| {
            let ord = compare_field(a.get(order_field), b.get(order_field));
            match direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });

        let (tx, rx) = mpsc::unbounded_channel();
        for (id, doc) in snapshot {
            // Initial synthetic Added per existing document.
            let _ = tx.send(DocChange {
                kind: ChangeKind::Added,
                id,
                doc,
            });
        }

        let sub_id = inner.next_subscriber;
        inner.next_subscriber += 1;
        inner.subscribers.push((sub_id, tx));
        log::debug!("subscriber {sub_id} attached");

        let handle = Arc::clone(&self.inner);
        let cancel = Box::new(move || {
            if let Ok(mut inner) = handle.lock() {
                inner.subscribers.retain(|(id, _)| *id != sub_id);
            }
        });
        Ok(Subscription::new(rx, cancel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Patch;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().unwrap().clone()
    }

    #[tokio::test]
    async fn test_add_assigns_id_and_timestamp() {
        let store = MemoryStore::new();
        let id = store.add(doc(json!({"message": "hi"}))).await.unwrap();
        let results = store.query_eq("message", &json!("hi")).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, id);
        assert!(results[0].1.contains_key(FIELD_CREATED_AT));
    }

    #[tokio::test]
    async fn test_timestamps_non_decreasing() {
        let store = MemoryStore::new();
        store.add(doc(json!({"n": 1}))).await.unwrap();
        store.add(doc(json!({"n": 2}))).await.unwrap();
        let a = store.query_eq("n", &json!(1)).await.unwrap();
        let b = store.query_eq("n", &json!(2)).await.unwrap();
        let ts = |d: &Document| {
            chrono::DateTime::parse_from_rfc3339(d[FIELD_CREATED_AT].as_str().unwrap()).unwrap()
        };
        assert!(ts(&a[0].1) <= ts(&b[0].1));
    }

    #[tokio::test]
    async fn test_update_missing_document_fails() {
        let store = MemoryStore::new();
        let err = store
            .update(&DocId::from("nope"), Patch::new().set("x", 1))
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<StoreError>().is_some());
    }

    #[tokio::test]
    async fn test_increment_applies_against_stored_value() {
        let store = MemoryStore::new();
        let id = store.add(doc(json!({"upvotes": 0}))).await.unwrap();
        // Two callers each increment from the same stale read of 0.
        store
            .update(&id, Patch::new().increment("upvotes", 1))
            .await
            .unwrap();
        store
            .update(&id, Patch::new().increment("upvotes", 1))
            .await
            .unwrap();
        let results = store.query_eq("upvotes", &json!(2)).await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_batch_with_missing_id_changes_nothing() {
        let store = MemoryStore::new();
        let id = store.add(doc(json!({"flag": false}))).await.unwrap();
        let mut sub = store
            .subscribe_ordered(FIELD_CREATED_AT, SortDirection::Ascending)
            .await
            .unwrap();
        assert_eq!(sub.try_next().unwrap().kind, ChangeKind::Added);

        let result = store
            .batch_update(vec![
                (id.clone(), Patch::new().set("flag", true)),
                (DocId::from("missing"), Patch::new().set("flag", true)),
            ])
            .await;
        assert!(result.is_err());
        // The existing document is untouched and no notification went out.
        let results = store.query_eq("flag", &json!(false)).await.unwrap();
        assert_eq!(results.len(), 1);
        assert!(sub.try_next().is_none());
    }

    #[tokio::test]
    async fn test_batch_notifies_after_all_applied() {
        let store = MemoryStore::new();
        let a = store.add(doc(json!({"flag": true}))).await.unwrap();
        let b = store.add(doc(json!({"flag": false}))).await.unwrap();
        let mut sub = store
            .subscribe_ordered(FIELD_CREATED_AT, SortDirection::Ascending)
            .await
            .unwrap();
        while sub.try_next().is_some() {}

        store
            .batch_update(vec![
                (a.clone(), Patch::new().set("flag", false)),
                (b.clone(), Patch::new().set("flag", true)),
            ])
            .await
            .unwrap();

        // By the time the first notification is visible, both writes have
        // landed: no observable zero-or-two-answers state.
        let first = sub.try_next().unwrap();
        assert_eq!(first.kind, ChangeKind::Modified);
        let flagged = store.query_eq("flag", &json!(true)).await.unwrap();
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].0, b);
    }

    #[tokio::test]
    async fn test_subscribe_initial_snapshot_sorted() {
        let store = MemoryStore::new();
        // Insert out of order on the sort field.
        store.add(doc(json!({"rank": 2}))).await.unwrap();
        store.add(doc(json!({"rank": 1}))).await.unwrap();
        store.add(doc(json!({"rank": 3}))).await.unwrap();

        let mut sub = store
            .subscribe_ordered("rank", SortDirection::Ascending)
            .await
            .unwrap();
        let ranks: Vec<i64> = std::iter::from_fn(|| sub.try_next())
            .map(|c| c.doc["rank"].as_i64().unwrap())
            .collect();
        assert_eq!(ranks, vec![1, 2, 3]);

        let mut sub = store
            .subscribe_ordered("rank", SortDirection::Descending)
            .await
            .unwrap();
        let ranks: Vec<i64> = std::iter::from_fn(|| sub.try_next())
            .map(|c| c.doc["rank"].as_i64().unwrap())
            .collect();
        assert_eq!(ranks, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_live_changes_delivered_in_mutation_order() {
        let store = MemoryStore::new();
        let mut sub = store
            .subscribe_ordered(FIELD_CREATED_AT, SortDirection::Ascending)
            .await
            .unwrap();

        let id = store.add(doc(json!({"message": "a"}))).await.unwrap();
        store
            .update(&id, Patch::new().set("message", "b"))
            .await
            .unwrap();
        store.remove(&id).unwrap();

        let kinds: Vec<ChangeKind> = std::iter::from_fn(|| sub.try_next())
            .map(|c| c.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![ChangeKind::Added, ChangeKind::Modified, ChangeKind::Removed]
        );
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_delivery() {
        let store = MemoryStore::new();
        let sub = store
            .subscribe_ordered(FIELD_CREATED_AT, SortDirection::Ascending)
            .await
            .unwrap();
        sub.unsubscribe();
        store.add(doc(json!({"message": "late"}))).await.unwrap();

        // A fresh subscription still works and sees the document.
        let mut sub = store
            .subscribe_ordered(FIELD_CREATED_AT, SortDirection::Ascending)
            .await
            .unwrap();
        assert_eq!(sub.try_next().unwrap().kind, ChangeKind::Added);
        assert!(sub.try_next().is_none());
    }
}
