//! Remote store backend over a document-collection REST dialect.
//!
//! Endpoints, relative to `{base_url}`:
//!
//! - `POST   /collections/{c}` - add a document, response `{"id": "..."}`
//! - `PATCH  /collections/{c}/{id}` - merge fields; numeric increments are
//!   sent as `{"field": {"__increment": n}}` and resolved server-side
//! - `GET    /collections/{c}` - list all documents
//! - `GET    /collections/{c}?field=&equals=` - equality query
//! - `POST   /collections/{c}:batchUpdate` - apply several patches as one
//!   mutation
//!
//! The "real-time" part of the contract is a polling loop: the
//! subscription task periodically lists the collection and diffs it
//! against the previous snapshot into Added/Modified/Removed changes.
//! Nothing is guaranteed about ordering across round-trips, and no
//! timeouts or retries are layered on top; a hung request simply never
//! produces a change.

use crate::document::{DocId, Document, FieldOp, Patch};
use crate::store::{
    compare_field, ChangeKind, DocChange, DocumentStore, SortDirection, Subscription,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Remote document store client.
#[derive(Debug, Clone)]
pub struct RestStore {
    http: reqwest::Client,
    base_url: String,
    collection: String,
    poll_interval: Duration,
}

#[derive(Debug, Deserialize)]
struct AddResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct DocEntry {
    id: String,
    doc: Document,
}

impl RestStore {
    pub fn new(base_url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            collection: collection.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    fn collection_url(&self) -> String {
        format!("{}/collections/{}", self.base_url, self.collection)
    }

    async fn list_all(&self) -> anyhow::Result<Vec<(DocId, Document)>> {
        let entries: Vec<DocEntry> = self
            .http
            .get(self.collection_url())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(entries
            .into_iter()
            .map(|e| (DocId::from(e.id), e.doc))
            .collect())
    }
}

/// Serialize a patch to its wire form: plain values for sets, an
/// `{"__increment": n}` directive for increments.
fn wire_patch(patch: &Patch) -> Document {
    let mut wire = Document::new();
    for (field, op) in patch.ops() {
        let value = match op {
            FieldOp::Set(value) => value.clone(),
            FieldOp::Increment(n) => json!({ "__increment": n }),
        };
        wire.insert(field.clone(), value);
    }
    wire
}

/// Diff two snapshots into change notifications, in snapshot order for
/// additions and modifications, with removals last.
fn diff_snapshots(
    previous: &HashMap<DocId, Document>,
    current: &[(DocId, Document)],
) -> Vec<DocChange> {
    let mut changes = Vec::new();
    for (id, doc) in current {
        match previous.get(id) {
            None => changes.push(DocChange {
                kind: ChangeKind::Added,
                id: id.clone(),
                doc: doc.clone(),
            }),
            Some(old) if old != doc => changes.push(DocChange {
                kind: ChangeKind::Modified,
                id: id.clone(),
                doc: doc.clone(),
            }),
            Some(_) => {}
        }
    }
    for (id, doc) in previous {
        if !current.iter().any(|(cur_id, _)| cur_id == id) {
            changes.push(DocChange {
                kind: ChangeKind::Removed,
                id: id.clone(),
                doc: doc.clone(),
            });
        }
    }
    changes
}

#[async_trait]
impl DocumentStore for RestStore {
    async fn add(&self, doc: Document) -> anyhow::Result<DocId> {
        let response: AddResponse = self
            .http
            .post(self.collection_url())
            .json(&doc)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        log::debug!("added remote document {}", response.id);
        Ok(DocId::from(response.id))
    }

    async fn update(&self, id: &DocId, patch: Patch) -> anyhow::Result<()> {
        self.http
            .patch(format!("{}/{}", self.collection_url(), id))
            .json(&wire_patch(&patch))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn query_eq(
        &self,
        field: &str,
        value: &Value,
    ) -> anyhow::Result<Vec<(DocId, Document)>> {
        let entries: Vec<DocEntry> = self
            .http
            .get(self.collection_url())
            .query(&[("field", field), ("equals", &value.to_string())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(entries
            .into_iter()
            .map(|e| (DocId::from(e.id), e.doc))
            .collect())
    }

    async fn batch_update(&self, updates: Vec<(DocId, Patch)>) -> anyhow::Result<()> {
        let body: Vec<Value> = updates
            .iter()
            .map(|(id, patch)| json!({ "id": id, "patch": wire_patch(patch) }))
            .collect();
        self.http
            .post(format!("{}:batchUpdate", self.collection_url()))
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn subscribe_ordered(
        &self,
        order_field: &str,
        direction: SortDirection,
    ) -> anyhow::Result<Subscription> {
        let mut snapshot = self.list_all().await?;
        snapshot.sort_by(|(_, a), (_, b)| {
            let ord = compare_field(a.get(order_field), b.get(order_field));
            match direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });

        let (tx, rx) = mpsc::unbounded_channel();
        let mut known: HashMap<DocId, Document> = HashMap::new();
        for (id, doc) in snapshot {
            known.insert(id.clone(), doc.clone());
            let _ = tx.send(DocChange {
                kind: ChangeKind::Added,
                id,
                doc,
            });
        }

        let store = self.clone();
        let poll_interval = self.poll_interval;
        let task = tokio::spawn(async move {
            loop {
                tokio::time::sleep(poll_interval).await;
                let current = match store.list_all().await {
                    Ok(current) => current,
                    Err(e) => {
                        log::warn!("poll of {} failed: {e}", store.collection);
                        continue;
                    }
                };
                for change in diff_snapshots(&known, &current) {
                    if tx.send(change).is_err() {
                        return;
                    }
                }
                known = current.into_iter().collect();
            }
        });

        let cancel = Box::new(move || task.abort());
        Ok(Subscription::new(rx, cancel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_wire_patch_set_and_increment() {
        let patch = Patch::new().set("is_answer", true).increment("upvotes", 1);
        let wire = wire_patch(&patch);
        assert_eq!(wire["is_answer"], json!(true));
        assert_eq!(wire["upvotes"], json!({"__increment": 1}));
    }

    #[test]
    fn test_diff_detects_addition_and_modification() {
        let mut previous = HashMap::new();
        previous.insert(DocId::from("a"), doc(json!({"upvotes": 0})));
        let current = vec![
            (DocId::from("a"), doc(json!({"upvotes": 1}))),
            (DocId::from("b"), doc(json!({"message": "new"}))),
        ];
        let changes = diff_snapshots(&previous, &current);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].kind, ChangeKind::Modified);
        assert_eq!(changes[0].id, DocId::from("a"));
        assert_eq!(changes[1].kind, ChangeKind::Added);
        assert_eq!(changes[1].id, DocId::from("b"));
    }

    #[test]
    fn test_diff_detects_removal() {
        let mut previous = HashMap::new();
        previous.insert(DocId::from("gone"), doc(json!({"message": "x"})));
        let changes = diff_snapshots(&previous, &[]);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind, ChangeKind::Removed);
    }

    #[test]
    fn test_diff_unchanged_document_is_silent() {
        let mut previous = HashMap::new();
        previous.insert(DocId::from("a"), doc(json!({"message": "same"})));
        let current = vec![(DocId::from("a"), doc(json!({"message": "same"})))];
        assert!(diff_snapshots(&previous, &current).is_empty());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let store = RestStore::new("https://api.example.com/", "comments");
        assert_eq!(
            store.collection_url(),
            "https://api.example.com/collections/comments"
        );
    }
}
