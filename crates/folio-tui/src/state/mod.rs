//! Application state.

pub mod app;
pub mod forms;
pub mod repos;
pub mod threads;

pub use app::{AppState, Focus};
pub use forms::{CommentForm, FormField, ReplyForm};
pub use repos::{RepoListState, FETCH_ERROR_PLACEHOLDER};
pub use threads::{CommentNode, ThreadSet};
