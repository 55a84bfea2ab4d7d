//! Owned view-state for the comment widget.
//!
//! The store is the source of truth; this map is the derived, disposable
//! projection the articles page renders from. Every change notification is
//! applied here, and rendering walks the ordering lists instead of
//! re-querying anything.
//!
//! Ordering policy: top-level comments append in arrival order and replies
//! append under their parent, but a promoted answer floats - the parent
//! moves to the front of the page and the answer to the front of the reply
//! list. That holds both at initial load (the subscription replays an
//! already-flagged reply) and on live promotion.

use folio_store::comment::CommentRecord;
use folio_store::{ChangeKind, DocChange, DocId};
use std::collections::HashMap;

/// One comment with its display state.
#[derive(Debug, Clone)]
pub struct CommentNode {
    pub id: DocId,
    pub record: CommentRecord,
    /// Ordered reply ids; only populated on top-level nodes.
    pub replies: Vec<DocId>,
}

/// A row in the rendered comment list.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    pub node: &'a CommentNode,
    pub is_reply: bool,
}

/// The threaded comment view-state.
#[derive(Debug, Default)]
pub struct ThreadSet {
    nodes: HashMap<DocId, CommentNode>,
    /// Ordered top-level comment ids.
    top: Vec<DocId>,
    /// Replies that arrived before their parent, keyed by parent id.
    /// Notification order across documents is arbitrary, so this happens
    /// during initial replay.
    orphans: HashMap<DocId, Vec<DocId>>,
}

impl ThreadSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &DocId) -> Option<&CommentNode> {
        self.nodes.get(id)
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_empty()
    }

    /// Top-level comments in display order.
    pub fn top_level(&self) -> impl Iterator<Item = &CommentNode> {
        self.top.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Replies of a top-level comment in display order.
    pub fn replies_of<'a>(
        &'a self,
        parent: &'a CommentNode,
    ) -> impl Iterator<Item = &'a CommentNode> {
        parent.replies.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Flatten the display order into rows for rendering and selection.
    pub fn rows(&self) -> Vec<Row<'_>> {
        let mut rows = Vec::new();
        for parent in self.top_level() {
            rows.push(Row {
                node: parent,
                is_reply: false,
            });
            for reply in self.replies_of(parent) {
                rows.push(Row {
                    node: reply,
                    is_reply: true,
                });
            }
        }
        rows
    }

    /// Whether any attached reply of `parent` is flagged as the answer.
    pub fn has_answer(&self, parent: &DocId) -> bool {
        self.nodes.get(parent).is_some_and(|p| {
            p.replies
                .iter()
                .filter_map(|id| self.nodes.get(id))
                .any(|r| r.record.is_answer)
        })
    }

    /// Apply one store change notification.
    pub fn apply(&mut self, change: &DocChange) {
        if change.kind == ChangeKind::Removed {
            self.remove(&change.id);
            return;
        }
        let record = match CommentRecord::from_document(&change.doc) {
            Ok(record) => record,
            Err(e) => {
                log::warn!("ignoring malformed comment {}: {e}", change.id);
                return;
            }
        };
        match change.kind {
            ChangeKind::Added => self.add(change.id.clone(), record),
            ChangeKind::Modified => self.modify(&change.id, record),
            ChangeKind::Removed => unreachable!(),
        }
    }

    /// Eagerly apply a committed promotion without waiting for the store's
    /// change notifications (which may be delayed, or arrive synchronously
    /// and still race this caller). The notifications that do arrive later
    /// are idempotent against this state.
    pub fn apply_promotion(&mut self, parent: &DocId, target: &DocId) {
        let Some(parent_node) = self.nodes.get(parent) else {
            return;
        };
        for reply_id in parent_node.replies.clone() {
            if let Some(reply) = self.nodes.get_mut(&reply_id) {
                reply.record.is_answer = reply_id == *target;
            }
        }
        self.float_answer(parent, target);
    }

    fn add(&mut self, id: DocId, record: CommentRecord) {
        if let Some(existing) = self.nodes.get_mut(&id) {
            // Subscription replay can repeat a document; refresh in place
            // instead of duplicating a row.
            existing.record = record.clone();
        } else {
            let parent = record.parent.clone();
            self.nodes.insert(
                id.clone(),
                CommentNode {
                    id: id.clone(),
                    record: record.clone(),
                    replies: Vec::new(),
                },
            );
            match parent {
                None => {
                    self.top.push(id.clone());
                    self.attach_orphans(&id);
                }
                Some(parent_id) => {
                    if self.nodes.contains_key(&parent_id) {
                        if let Some(parent) = self.nodes.get_mut(&parent_id) {
                            parent.replies.push(id.clone());
                        }
                    } else {
                        self.orphans.entry(parent_id).or_default().push(id.clone());
                    }
                }
            }
        }
        // An answer already flagged at add time floats immediately, so
        // promoted answers top the page on initial load too.
        if record.is_answer {
            if let Some(parent_id) = record.parent {
                self.float_answer(&parent_id, &id);
            }
        }
    }

    fn modify(&mut self, id: &DocId, record: CommentRecord) {
        let Some(node) = self.nodes.get_mut(id) else {
            log::warn!("modified notification for unknown comment {id}");
            return;
        };
        let became_answer = record.is_answer && !node.record.is_answer;
        let parent = record.parent.clone();
        node.record = record;
        if became_answer {
            if let Some(parent_id) = parent {
                self.float_answer(&parent_id, id);
            }
        }
    }

    fn remove(&mut self, id: &DocId) {
        let Some(node) = self.nodes.remove(id) else {
            return;
        };
        match node.record.parent {
            None => {
                self.top.retain(|t| t != id);
                // Replies of a removed parent go back to waiting; they are
                // not displayed without their thread.
                if !node.replies.is_empty() {
                    self.orphans.insert(id.clone(), node.replies);
                }
            }
            Some(parent_id) => {
                if let Some(parent) = self.nodes.get_mut(&parent_id) {
                    parent.replies.retain(|r| r != id);
                }
                if let Some(waiting) = self.orphans.get_mut(&parent_id) {
                    waiting.retain(|r| r != id);
                }
            }
        }
    }

    fn attach_orphans(&mut self, parent_id: &DocId) {
        let Some(waiting) = self.orphans.remove(parent_id) else {
            return;
        };
        if let Some(parent) = self.nodes.get_mut(parent_id) {
            parent.replies = waiting.clone();
        }
        let flagged = waiting
            .iter()
            .find(|id| self.nodes.get(*id).is_some_and(|r| r.record.is_answer))
            .cloned();
        if let Some(answer) = flagged {
            self.float_answer(parent_id, &answer);
        }
    }

    /// Move `parent` to the front of the page and `target` to the front of
    /// the parent's reply list.
    fn float_answer(&mut self, parent_id: &DocId, target: &DocId) {
        if let Some(pos) = self.top.iter().position(|id| id == parent_id) {
            let id = self.top.remove(pos);
            self.top.insert(0, id);
        }
        if let Some(parent) = self.nodes.get_mut(parent_id) {
            if let Some(pos) = parent.replies.iter().position(|id| id == target) {
                let id = parent.replies.remove(pos);
                parent.replies.insert(0, id);
            }
        }
    }
}
