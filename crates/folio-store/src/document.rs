//! Documents and patches.
//!
//! A document is an untyped JSON field map; the store never interprets
//! fields beyond the timestamp it assigns on add and the numeric fields a
//! patch increments.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Field the store assigns on add with a server-side timestamp.
pub const FIELD_CREATED_AT: &str = "created_at";

/// Opaque, store-assigned document identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocId(String);

impl DocId {
    /// Generate a fresh identifier (used by the in-memory backend; the
    /// remote backend assigns its own).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for DocId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DocId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for DocId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A document's fields.
pub type Document = serde_json::Map<String, Value>;

/// A single field mutation within a [`Patch`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOp {
    /// Overwrite the field with a value.
    Set(Value),
    /// Add to the stored numeric value. Applied against what the store
    /// holds at commit time, never against a caller's stale read. A missing
    /// or non-numeric stored value counts as zero.
    Increment(i64),
}

/// An ordered set of field mutations merged into an existing document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    ops: Vec<(String, FieldOp)>,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `field` to `value`.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.ops.push((field.into(), FieldOp::Set(value.into())));
        self
    }

    /// Increment `field` by `n`.
    pub fn increment(mut self, field: impl Into<String>, n: i64) -> Self {
        self.ops.push((field.into(), FieldOp::Increment(n)));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> &[(String, FieldOp)] {
        &self.ops
    }

    /// Merge this patch into `doc`, resolving increments against the
    /// values currently stored in `doc`.
    pub fn apply(&self, doc: &mut Document) {
        for (field, op) in &self.ops {
            match op {
                FieldOp::Set(value) => {
                    doc.insert(field.clone(), value.clone());
                }
                FieldOp::Increment(n) => {
                    let current = doc.get(field).and_then(Value::as_i64).unwrap_or(0);
                    doc.insert(field.clone(), Value::from(current + n));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_patch_set_overwrites() {
        let mut d = doc(json!({"message": "old"}));
        Patch::new().set("message", "new").apply(&mut d);
        assert_eq!(d["message"], json!("new"));
    }

    #[test]
    fn test_patch_increment_relative_to_stored() {
        let mut d = doc(json!({"upvotes": 3}));
        Patch::new().increment("upvotes", 1).apply(&mut d);
        assert_eq!(d["upvotes"], json!(4));
    }

    #[test]
    fn test_patch_increment_missing_field_counts_as_zero() {
        let mut d = doc(json!({}));
        Patch::new().increment("upvotes", 2).apply(&mut d);
        assert_eq!(d["upvotes"], json!(2));
    }

    #[test]
    fn test_patch_increment_non_numeric_counts_as_zero() {
        let mut d = doc(json!({"upvotes": "lots"}));
        Patch::new().increment("upvotes", 1).apply(&mut d);
        assert_eq!(d["upvotes"], json!(1));
    }

    #[test]
    fn test_patch_ops_apply_in_order() {
        let mut d = doc(json!({}));
        Patch::new()
            .set("upvotes", 10)
            .increment("upvotes", 5)
            .apply(&mut d);
        assert_eq!(d["upvotes"], json!(15));
    }

    #[test]
    fn test_doc_id_roundtrip() {
        let id = DocId::from("doc-1");
        assert_eq!(id.as_str(), "doc-1");
        assert_eq!(id.to_string(), "doc-1");
    }
}
