//! Comment document store with interchangeable backends
//!
//! This crate provides the document store behind the comment widget. The
//! design follows a single capability trait with two implementations
//! selected at startup, so nothing about a concrete backend leaks into the
//! widget.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │               DocumentStore trait                │
//! │  - add()            - batch_update()             │
//! │  - update()         - subscribe_ordered()        │
//! │  - query_eq()                                    │
//! └─────────────────────────────────────────────────┘
//!                        │
//!        ┌───────────────┴───────────────┐
//!        ▼                               ▼
//! ┌─────────────────┐         ┌─────────────────────┐
//! │ MemoryStore     │         │ RestStore           │
//! │ (in-process)    │         │ (remote, polling)   │
//! └─────────────────┘         └─────────────────────┘
//! ```
//!
//! Documents are plain JSON field maps; [`comment::CommentRecord`] is the
//! typed comment layered on top. Mutations notify every live subscription
//! with a [`DocChange`], in the order the store applied them.

pub mod comment;
pub mod document;
pub mod memory;
pub mod rest;
pub mod store;

pub use comment::CommentRecord;
pub use document::{DocId, Document, FieldOp, Patch};
pub use memory::MemoryStore;
pub use rest::RestStore;
pub use store::{ChangeKind, DocChange, DocumentStore, SortDirection, StoreError, Subscription};
