//! Asynchronous side effects.
//!
//! The main thread renders and handles input only; everything that talks
//! to the store or the GitHub API runs on the tokio runtime and reports
//! back as an [`Action`] over the channel the main loop drains. Store and
//! fetch failures are logged and produce no state change beyond what the
//! action says - the form simply does not clear, the page simply does not
//! update.

use crate::actions::{Action, FormKind};
use crate::promotion;
use folio_github::RepoSource;
use folio_store::document::FIELD_CREATED_AT;
use folio_store::{CommentRecord, DocId, DocumentStore, SortDirection};
use std::sync::mpsc::Sender;
use std::sync::Arc;

pub struct Effects {
    store: Arc<dyn DocumentStore>,
    repos: Arc<dyn RepoSource>,
    handle: tokio::runtime::Handle,
    tx: Sender<Action>,
}

impl Effects {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        repos: Arc<dyn RepoSource>,
        handle: tokio::runtime::Handle,
        tx: Sender<Action>,
    ) -> Self {
        Self {
            store,
            repos,
            handle,
            tx,
        }
    }

    /// Subscribe to the comment collection and pump every change into the
    /// action channel for the lifetime of the app.
    pub fn spawn_subscription(&self) {
        let store = Arc::clone(&self.store);
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            let mut sub = match store
                .subscribe_ordered(FIELD_CREATED_AT, SortDirection::Ascending)
                .await
            {
                Ok(sub) => sub,
                Err(e) => {
                    log::error!("comment subscription failed: {e:#}");
                    return;
                }
            };
            while let Some(change) = sub.next().await {
                if tx.send(Action::Store(change)).is_err() {
                    break;
                }
            }
        });
    }

    pub fn load_repositories(&self, user: String) {
        let repos = Arc::clone(&self.repos);
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            match repos.fetch_repositories(&user).await {
                Ok(cards) => {
                    let _ = tx.send(Action::ReposLoaded(cards));
                }
                Err(e) => {
                    log::error!("Error fetching repositories: {e:#}");
                    let _ = tx.send(Action::ReposFailed);
                }
            }
        });
    }

    /// Store a new comment or reply.
    pub fn submit(&self, record: CommentRecord, kind: FormKind) {
        let store = Arc::clone(&self.store);
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            let doc = match record.to_document() {
                Ok(doc) => doc,
                Err(e) => {
                    log::error!("could not serialize comment: {e:#}");
                    return;
                }
            };
            match store.add(doc).await {
                // The Added notification renders the comment; the action
                // only clears the form.
                Ok(id) => {
                    log::info!("comment {id} stored");
                    let _ = tx.send(Action::CommentAdded(kind));
                }
                Err(e) => log::error!("could not store comment: {e:#}"),
            }
        });
    }

    pub fn upvote(&self, id: DocId) {
        let store = Arc::clone(&self.store);
        self.handle.spawn(async move {
            if let Err(e) = store.update(&id, CommentRecord::upvote_patch()).await {
                log::error!("upvote of {id} failed: {e:#}");
            }
        });
    }

    /// Run the promotion protocol, then report the commit so the reducer
    /// can apply it eagerly.
    pub fn promote(&self, parent: DocId, target: DocId) {
        let store = Arc::clone(&self.store);
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            match promotion::promote_reply(store.as_ref(), &parent, &target).await {
                Ok(()) => {
                    let _ = tx.send(Action::PromotionCommitted { parent, target });
                }
                Err(e) => log::error!("promotion of {target} failed: {e:#}"),
            }
        });
    }

    /// One-time answer check gating the promote affordance of a thread.
    pub fn check_answer(&self, parent: DocId) {
        let store = Arc::clone(&self.store);
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            match promotion::has_existing_answer(store.as_ref(), &parent).await {
                Ok(has_answer) => {
                    let _ = tx.send(Action::AnswerStateLoaded { parent, has_answer });
                }
                Err(e) => log::error!("answer check for {parent} failed: {e:#}"),
            }
        });
    }
}
