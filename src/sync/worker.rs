//! Background sync worker.
//!
//! Each message performs exactly one read and at most one write. Failures
//! are logged and dropped: nothing is retried and nothing is reported back
//! to the sender.

use std::thread::{self, JoinHandle};

use anyhow::{Context, Result, bail};
use crossbeam::channel::{self, Sender};

use super::document::SyncMessage;
use super::store::DocumentStore;
use crate::log;

/// What handling one message did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Inserted { rev: String },
    Updated { rev: String },
    Failed,
}

/// Store `msg.document` in `msg.database`.
///
/// An existing record's revision is copied onto the incoming document
/// before writing it, so the newest message always wins unless another
/// writer gets between the read and the write.
pub fn handle_message(store: &DocumentStore, msg: SyncMessage) -> SyncOutcome {
    let SyncMessage {
        database,
        mut document,
    } = msg;
    let id = document.id.clone();

    let db = match store.database(&database) {
        Ok(db) => db,
        Err(e) => {
            log!("error"; "sync: cannot open database `{database}`: {e}");
            return SyncOutcome::Failed;
        }
    };

    let existing = match db.get(&id) {
        Ok(existing) => existing,
        Err(e) => {
            log!("error"; "sync: failed to read `{id}` from `{database}`: {e}");
            return SyncOutcome::Failed;
        }
    };

    match existing {
        Some(current) => {
            document.rev = current.rev;
            match db.put(document) {
                Ok(rev) => {
                    log!("sync"; "updated `{id}` in `{}` ({rev})", db.name());
                    SyncOutcome::Updated { rev }
                }
                Err(e) => {
                    log!("error"; "sync: failed to update `{id}` in `{}`: {e}", db.name());
                    SyncOutcome::Failed
                }
            }
        }
        None => match db.put(document) {
            Ok(rev) => {
                log!("sync"; "inserted `{id}` into `{}` ({rev})", db.name());
                SyncOutcome::Inserted { rev }
            }
            Err(e) => {
                log!("error"; "sync: failed to insert `{id}` into `{}`: {e}", db.name());
                SyncOutcome::Failed
            }
        },
    }
}

/// Dedicated thread handling messages one at a time, in arrival order.
pub struct SyncWorker {
    tx: Option<Sender<SyncMessage>>,
    handle: Option<JoinHandle<()>>,
}

impl SyncWorker {
    pub fn spawn(store: DocumentStore) -> Result<Self> {
        let (tx, rx) = channel::unbounded::<SyncMessage>();
        let handle = thread::Builder::new()
            .name("sync-worker".into())
            .spawn(move || {
                for msg in rx {
                    handle_message(&store, msg);
                }
                if let Err(e) = store.flush() {
                    log!("error"; "sync: flush failed: {e}");
                }
            })
            .context("Failed to spawn sync worker")?;

        Ok(Self {
            tx: Some(tx),
            handle: Some(handle),
        })
    }

    /// Queue a message. There is no reply.
    pub fn post(&self, msg: SyncMessage) -> Result<()> {
        let Some(tx) = &self.tx else {
            bail!("sync worker is shut down");
        };
        tx.send(msg).context("sync worker stopped")
    }

    /// Close the channel and wait for queued messages to be handled.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for SyncWorker {
    fn drop(&mut self) {
        self.stop();
    }
}
