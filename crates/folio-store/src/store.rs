//! The `DocumentStore` trait and change notification types.

use crate::document::{DocId, Document, Patch};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::cmp::Ordering;
use tokio::sync::mpsc;

/// What happened to a document.
///
/// `Removed` is part of the contract for completeness; no comment-widget
/// operation deletes documents, but subscribers must still handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
}

/// One change to one document, delivered to subscribers.
#[derive(Debug, Clone)]
pub struct DocChange {
    pub kind: ChangeKind,
    pub id: DocId,
    /// Snapshot of the document after the change (the last known snapshot
    /// for `Removed`).
    pub doc: Document,
}

/// Sort direction for the initial snapshot of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Errors a store backend can report beyond plain transport failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document not found: {0}")]
    NotFound(DocId),
}

/// A live change feed, handed out by [`DocumentStore::subscribe_ordered`].
///
/// Delivery stops when the subscription is dropped or explicitly
/// unsubscribed.
pub struct Subscription {
    rx: mpsc::UnboundedReceiver<DocChange>,
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub(crate) fn new(
        rx: mpsc::UnboundedReceiver<DocChange>,
        cancel: Box<dyn FnOnce() + Send>,
    ) -> Self {
        Self {
            rx,
            cancel: Some(cancel),
        }
    }

    /// Wait for the next change. Returns `None` once the store is gone and
    /// all buffered changes are drained.
    pub async fn next(&mut self) -> Option<DocChange> {
        self.rx.recv().await
    }

    /// Take a buffered change without waiting, if one is ready.
    pub fn try_next(&mut self) -> Option<DocChange> {
        self.rx.try_recv().ok()
    }

    /// Stop delivery now instead of at drop time.
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

/// Document collection with change notifications.
///
/// Implementations can be in-process ([`crate::MemoryStore`]) or remote
/// ([`crate::RestStore`]); the widget only ever sees this trait.
///
/// # Ordering
///
/// Changes for a single store instance are delivered in the order that
/// instance applied the underlying mutations. Nothing is guaranteed across
/// independent instances or across network round-trips.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create a new document. The store assigns the identifier and a
    /// server-side `created_at` timestamp that is monotonically
    /// non-decreasing per instance, then notifies subscribers with an
    /// `Added` change.
    async fn add(&self, doc: Document) -> anyhow::Result<DocId>;

    /// Merge `patch` into an existing document and notify subscribers with
    /// a `Modified` change. Increments resolve against the stored value at
    /// commit time.
    async fn update(&self, id: &DocId, patch: Patch) -> anyhow::Result<()>;

    /// All documents whose `field` equals `value`, as point-in-time
    /// snapshots.
    async fn query_eq(&self, field: &str, value: &Value)
        -> anyhow::Result<Vec<(DocId, Document)>>;

    /// Apply several updates as one mutation. All-or-nothing from the
    /// caller's perspective: a missing identifier fails the whole batch
    /// before any change is applied or any subscriber notified.
    async fn batch_update(&self, updates: Vec<(DocId, Patch)>) -> anyhow::Result<()>;

    /// Subscribe to the collection. Delivers one synthetic `Added` change
    /// per existing document, sorted by `order_field` in `direction`, then
    /// live changes as they occur.
    async fn subscribe_ordered(
        &self,
        order_field: &str,
        direction: SortDirection,
    ) -> anyhow::Result<Subscription>;
}

/// Compare two optional field values for snapshot ordering.
///
/// Timestamps are stored as RFC 3339 strings whose subsecond precision can
/// vary, so strings that parse as timestamps compare as instants rather
/// than lexicographically. Missing fields sort first.
pub fn compare_field(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => compare_values(a, b),
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(a), Value::String(b)) => {
            match (parse_timestamp(a), parse_timestamp(b)) {
                (Some(a), Some(b)) => a.cmp(&b),
                _ => a.cmp(b),
            }
        }
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compare_numbers() {
        assert_eq!(
            compare_field(Some(&json!(1)), Some(&json!(2))),
            Ordering::Less
        );
    }

    #[test]
    fn test_compare_missing_sorts_first() {
        assert_eq!(compare_field(None, Some(&json!(0))), Ordering::Less);
    }

    #[test]
    fn test_compare_timestamps_with_mixed_precision() {
        // Lexicographic comparison would order these the other way around
        // ('Z' > '.'), so these must parse as instants.
        let early = json!("2024-05-01T10:00:00Z");
        let late = json!("2024-05-01T10:00:00.500Z");
        assert_eq!(compare_field(Some(&early), Some(&late)), Ordering::Less);
    }

    #[test]
    fn test_compare_plain_strings() {
        assert_eq!(
            compare_field(Some(&json!("alice")), Some(&json!("bob"))),
            Ordering::Less
        );
    }
}
