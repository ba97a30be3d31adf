//! `sync` command: feed documents through the sync worker.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use super::common::read_input;
use crate::config::HalConfig;
use crate::log;
use crate::sync::{Document, DocumentStore, SyncMessage, SyncWorker};

/// Either one document or an array of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum Input {
    Many(Vec<Document>),
    One(Document),
}

pub fn sync_documents(
    config: &HalConfig,
    database: &str,
    store_dir: Option<&Path>,
    input: &Path,
) -> Result<()> {
    let documents = parse_documents(&read_input(input)?)
        .with_context(|| format!("Failed to parse documents from {}", input.display()))?;

    let dir = store_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.sync.store_dir());
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    let store = DocumentStore::open(&dir)
        .with_context(|| format!("Failed to open document store at {}", dir.display()))?;

    let count = documents.len();
    let worker = SyncWorker::spawn(store.clone())?;
    for document in documents {
        worker.post(SyncMessage {
            database: database.to_string(),
            document,
        })?;
    }
    worker.shutdown();

    let stored = store.database(database)?.len();
    log!("sync"; "{count} document(s) handled, `{database}` holds {stored}");
    Ok(())
}

fn parse_documents(text: &str) -> Result<Vec<Document>> {
    Ok(match serde_json::from_str::<Input>(text)? {
        Input::Many(documents) => documents,
        Input::One(document) => vec![document],
    })
}
