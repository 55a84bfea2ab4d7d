//! Typed comment record layered over the untyped document map.
//!
//! A comment with a `parent` is a reply; one without is a top-level
//! comment. The answer flag only means anything on a reply, so the typed
//! layer forbids it on top-level comments by construction: only
//! [`CommentRecord::reply`] produces the flag path, and
//! [`CommentRecord::from_document`] drops a stray flag when `parent` is
//! null. The document layer still accepts the field, so foreign documents
//! carrying it stay readable.

use crate::document::{DocId, Document, Patch};
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Field names as they appear on the wire and in queries.
pub const FIELD_PARENT: &str = "parent";
pub const FIELD_UPVOTES: &str = "upvotes";
pub const FIELD_IS_ANSWER: &str = "is_answer";

/// A single comment or reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub author: String,
    pub email: String,
    pub message: String,
    /// Server-assigned on add; `None` until the document is stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub upvotes: u32,
    /// The top-level comment this replies to; `None` for top-level
    /// comments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<DocId>,
    #[serde(default)]
    pub is_answer: bool,
}

impl CommentRecord {
    /// A new top-level comment.
    pub fn top_level(
        author: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            author: author.into(),
            email: email.into(),
            message: message.into(),
            created_at: None,
            upvotes: 0,
            parent: None,
            is_answer: false,
        }
    }

    /// A new reply under `parent`.
    pub fn reply(
        parent: DocId,
        author: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            parent: Some(parent),
            ..Self::top_level(author, email, message)
        }
    }

    pub fn is_reply(&self) -> bool {
        self.parent.is_some()
    }

    /// Serialize into a store document.
    pub fn to_document(&self) -> anyhow::Result<Document> {
        match serde_json::to_value(self).context("serializing comment")? {
            serde_json::Value::Object(map) => Ok(map),
            _ => unreachable!("a struct serializes to an object"),
        }
    }

    /// Read a comment back from a store document. A stray answer flag on a
    /// top-level comment is dropped.
    pub fn from_document(doc: &Document) -> anyhow::Result<Self> {
        let mut record: Self = serde_json::from_value(serde_json::Value::Object(doc.clone()))
            .context("deserializing comment")?;
        if record.parent.is_none() {
            record.is_answer = false;
        }
        Ok(record)
    }

    /// The increment-one patch for an upvote. Increment-only: the stored
    /// count never goes down.
    pub fn upvote_patch() -> Patch {
        Patch::new().increment(FIELD_UPVOTES, 1)
    }

    /// The patch flipping the answer flag.
    pub fn answer_patch(is_answer: bool) -> Patch {
        Patch::new().set(FIELD_IS_ANSWER, is_answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_reply_roundtrip() {
        let record = CommentRecord::reply(DocId::from("parent-1"), "ada", "ada@example.com", "yes");
        let doc = record.to_document().unwrap();
        assert_eq!(doc[FIELD_PARENT], json!("parent-1"));
        let back = CommentRecord::from_document(&doc).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_top_level_answer_flag_is_dropped() {
        let mut doc = CommentRecord::top_level("ada", "ada@example.com", "hello")
            .to_document()
            .unwrap();
        doc.insert(FIELD_IS_ANSWER.to_string(), json!(true));
        let record = CommentRecord::from_document(&doc).unwrap();
        assert!(!record.is_answer);
    }

    #[test]
    fn test_reply_answer_flag_is_kept() {
        let mut doc = CommentRecord::reply(DocId::from("p"), "ada", "a@e", "hi")
            .to_document()
            .unwrap();
        doc.insert(FIELD_IS_ANSWER.to_string(), json!(true));
        let record = CommentRecord::from_document(&doc).unwrap();
        assert!(record.is_answer);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let doc = json!({"author": "ada", "email": "a@e", "message": "hi"});
        let record = CommentRecord::from_document(doc.as_object().unwrap()).unwrap();
        assert_eq!(record.upvotes, 0);
        assert_eq!(record.parent, None);
        assert!(!record.is_answer);
        assert_eq!(record.created_at, None);
    }

    #[test]
    fn test_created_at_survives_store_assignment() {
        let doc = json!({
            "author": "ada",
            "email": "a@e",
            "message": "hi",
            "created_at": "2024-05-01T10:00:00+00:00",
        });
        let record = CommentRecord::from_document(doc.as_object().unwrap()).unwrap();
        assert!(record.created_at.is_some());
    }
}
