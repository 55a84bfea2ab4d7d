//! Actions delivered to the reducer.
//!
//! Key handling mutates state directly; actions are what asynchronous work
//! reports back through the channel the main loop drains each tick.

use folio_github::RepoCard;
use folio_store::{DocChange, DocId};

/// Which form a successful submission came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormKind {
    TopLevel,
    Reply,
}

#[derive(Debug)]
pub enum Action {
    /// A change notification from the comment store subscription.
    Store(DocChange),

    /// Repository fetch finished.
    ReposLoaded(Vec<RepoCard>),
    /// Repository fetch failed; the page shows one static placeholder.
    ReposFailed,

    /// A comment or reply was stored; reset the originating form.
    CommentAdded(FormKind),

    /// The promotion batch was committed; apply it eagerly.
    PromotionCommitted { parent: DocId, target: DocId },

    /// Point-in-time answer check for one thread finished.
    AnswerStateLoaded { parent: DocId, has_answer: bool },
}
