//! Document synchronization into the local store.
//!
//! Messages of the form
//!
//! ```json
//! { "database": "hal-settings", "document": { "_id": "ui", "collapsed": true } }
//! ```
//!
//! are handled by [`handle_message`], either directly or through a
//! [`SyncWorker`] thread.

mod document;
mod store;
mod worker;


pub use document::{Document, SyncMessage};
pub use store::DocumentStore;
pub use worker::SyncWorker;
