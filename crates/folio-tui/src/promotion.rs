//! "Mark as answer" promotion against the store.
//!
//! Promotion is a single batched mutation: clear the flag on every sibling
//! currently flagged, set it on the target. Batching keeps the
//! single-answer-per-thread invariant atomic from an external observer's
//! perspective; no settled state ever shows zero or two answers.

use folio_store::comment::{FIELD_IS_ANSWER, FIELD_PARENT};
use folio_store::{CommentRecord, DocId, DocumentStore};
use serde_json::Value;

fn parent_value(parent: &DocId) -> Value {
    Value::String(parent.as_str().to_string())
}

/// Promote `target` to the answer of the thread under `parent`.
///
/// Only replies are promoted; callers guarantee `target` is a reply of
/// `parent`. After this resolves the caller applies the same state to its
/// view eagerly, because the store's notifications may lag (or race the
/// caller's continuation even when delivered synchronously).
pub async fn promote_reply(
    store: &dyn DocumentStore,
    parent: &DocId,
    target: &DocId,
) -> anyhow::Result<()> {
    let siblings = store.query_eq(FIELD_PARENT, &parent_value(parent)).await?;

    let mut updates = Vec::new();
    for (id, doc) in &siblings {
        let flagged = doc
            .get(FIELD_IS_ANSWER)
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if flagged && id != target {
            updates.push((id.clone(), CommentRecord::answer_patch(false)));
        }
    }
    updates.push((target.clone(), CommentRecord::answer_patch(true)));

    store.batch_update(updates).await
}

/// Point-in-time check whether the thread under `parent` already has an
/// answer. Used to gate the promote affordance when a thread is first
/// selected; deliberately not a live subscription, so it can go stale.
pub async fn has_existing_answer(
    store: &dyn DocumentStore,
    parent: &DocId,
) -> anyhow::Result<bool> {
    let siblings = store.query_eq(FIELD_PARENT, &parent_value(parent)).await?;
    Ok(siblings.iter().any(|(_, doc)| {
        doc.get(FIELD_IS_ANSWER)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ThreadSet;
    use folio_store::document::FIELD_CREATED_AT;
    use folio_store::{MemoryStore, SortDirection, Subscription};
    use pretty_assertions::assert_eq;

    async fn seed_thread(store: &MemoryStore) -> (DocId, DocId, DocId) {
        let parent = store
            .add(
                CommentRecord::top_level("ada", "a@e", "question")
                    .to_document()
                    .unwrap(),
            )
            .await
            .unwrap();
        let a = store
            .add(
                CommentRecord::reply(parent.clone(), "bob", "b@e", "answer a")
                    .to_document()
                    .unwrap(),
            )
            .await
            .unwrap();
        let b = store
            .add(
                CommentRecord::reply(parent.clone(), "cleo", "c@e", "answer b")
                    .to_document()
                    .unwrap(),
            )
            .await
            .unwrap();
        (parent, a, b)
    }

    async fn answers_in_store(store: &MemoryStore, parent: &DocId) -> Vec<DocId> {
        store
            .query_eq(FIELD_PARENT, &parent_value(parent))
            .await
            .unwrap()
            .into_iter()
            .filter(|(_, doc)| doc[FIELD_IS_ANSWER] == serde_json::json!(true))
            .map(|(id, _)| id)
            .collect()
    }

    #[tokio::test]
    async fn test_promotion_sets_exactly_one_answer() {
        let store = MemoryStore::new();
        let (parent, a, _) = seed_thread(&store).await;
        promote_reply(&store, &parent, &a).await.unwrap();
        assert_eq!(answers_in_store(&store, &parent).await, vec![a]);
    }

    #[tokio::test]
    async fn test_promoting_b_after_a_moves_the_flag() {
        let store = MemoryStore::new();
        let (parent, a, b) = seed_thread(&store).await;
        promote_reply(&store, &parent, &a).await.unwrap();
        promote_reply(&store, &parent, &b).await.unwrap();
        assert_eq!(answers_in_store(&store, &parent).await, vec![b]);
    }

    #[tokio::test]
    async fn test_any_promotion_sequence_keeps_invariant() {
        let store = MemoryStore::new();
        let (parent, a, b) = seed_thread(&store).await;
        for target in [&a, &b, &b, &a, &b] {
            promote_reply(&store, &parent, target).await.unwrap();
            let answers = answers_in_store(&store, &parent).await;
            assert_eq!(answers, vec![target.clone()]);
        }
    }

    #[tokio::test]
    async fn test_has_existing_answer_is_point_in_time() {
        let store = MemoryStore::new();
        let (parent, a, _) = seed_thread(&store).await;
        assert!(!has_existing_answer(&store, &parent).await.unwrap());
        promote_reply(&store, &parent, &a).await.unwrap();
        assert!(has_existing_answer(&store, &parent).await.unwrap());
    }

    fn drain(sub: &mut Subscription, threads: &mut ThreadSet) {
        while let Some(change) = sub.try_next() {
            threads.apply(&change);
        }
    }

    #[tokio::test]
    async fn test_widget_loop_eager_apply_then_notifications() {
        let store = MemoryStore::new();
        let other = store
            .add(
                CommentRecord::top_level("dan", "d@e", "unrelated")
                    .to_document()
                    .unwrap(),
            )
            .await
            .unwrap();
        let (parent, a, b) = seed_thread(&store).await;

        let mut sub = store
            .subscribe_ordered(FIELD_CREATED_AT, SortDirection::Ascending)
            .await
            .unwrap();
        let mut threads = ThreadSet::new();
        drain(&mut sub, &mut threads);
        assert_eq!(threads.rows().len(), 4);

        // The widget's promotion path: commit the batch, apply eagerly,
        // then let the store's notifications echo into the same state.
        promote_reply(&store, &parent, &b).await.unwrap();
        threads.apply_promotion(&parent, &b);

        let tops: Vec<DocId> = threads.top_level().map(|n| n.id.clone()).collect();
        assert_eq!(tops, vec![parent.clone(), other.clone()]);
        let replies: Vec<DocId> = threads
            .replies_of(threads.get(&parent).unwrap())
            .map(|n| n.id.clone())
            .collect();
        assert_eq!(replies, vec![b.clone(), a.clone()]);

        drain(&mut sub, &mut threads);
        // Idempotent: the echoed Modified changes leave the order and the
        // single answer untouched.
        let tops: Vec<DocId> = threads.top_level().map(|n| n.id.clone()).collect();
        assert_eq!(tops, vec![parent.clone(), other]);
        assert!(threads.has_answer(&parent));
        let flagged: Vec<DocId> = threads
            .replies_of(threads.get(&parent).unwrap())
            .filter(|r| r.record.is_answer)
            .map(|r| r.id.clone())
            .collect();
        assert_eq!(flagged, vec![b]);
    }

    #[tokio::test]
    async fn test_n_upvotes_increase_count_by_n() {
        let store = MemoryStore::new();
        let (parent, a, _) = seed_thread(&store).await;

        let mut sub = store
            .subscribe_ordered(FIELD_CREATED_AT, SortDirection::Ascending)
            .await
            .unwrap();
        let mut threads = ThreadSet::new();
        drain(&mut sub, &mut threads);

        // Interleave upvotes with another mutation on the same document.
        for n in 0..3 {
            store
                .update(&a, CommentRecord::upvote_patch())
                .await
                .unwrap();
            if n == 1 {
                promote_reply(&store, &parent, &a).await.unwrap();
            }
        }
        drain(&mut sub, &mut threads);
        assert_eq!(threads.get(&a).unwrap().record.upvotes, 3);
    }
}
