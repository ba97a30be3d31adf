//! sled-backed document store.
//!
//! One sled tree per database, documents stored as JSON keyed by `_id`.
//! Writes use optimistic concurrency: the caller must present the revision
//! currently stored (none for a new document), and the write itself is a
//! compare-and-swap against the bytes that revision was read from.

use std::path::Path;

use thiserror::Error;

use super::document::Document;

/// Hex characters of the payload digest kept in a revision.
const DIGEST_LEN: usize = 32;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document `{id}` update conflict: stored revision is {}", .stored.as_deref().unwrap_or("<none>"))]
    Conflict { id: String, stored: Option<String> },

    #[error("storage error: {0}")]
    Storage(#[from] sled::Error),

    #[error("invalid document data: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Handle to a store directory. Clones share the same underlying database.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    db: sled::Db,
}

impl DocumentStore {
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        Ok(Self { db: sled::open(dir)? })
    }

    /// In-memory store removed on drop.
    #[cfg(test)]
    pub fn temporary() -> Result<Self, StoreError> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self { db })
    }

    pub fn database(&self, name: &str) -> Result<Database, StoreError> {
        Ok(Database {
            name: name.to_string(),
            tree: self.db.open_tree(name)?,
        })
    }

    /// Names of databases holding at least one document.
    #[cfg(test)]
    pub fn database_names(&self) -> Vec<String> {
        self.db
            .tree_names()
            .into_iter()
            .filter_map(|name| String::from_utf8(name.to_vec()).ok())
            .filter(|name| !name.starts_with("__sled"))
            .filter(|name| self.db.open_tree(name).is_ok_and(|t| !t.is_empty()))
            .collect()
    }

    pub fn flush(&self) -> Result<(), StoreError> {
        self.db.flush()?;
        Ok(())
    }
}

/// A named collection of documents.
#[derive(Debug, Clone)]
pub struct Database {
    name: String,
    tree: sled::Tree,
}

impl Database {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, id: &str) -> Result<Option<Document>, StoreError> {
        self.tree
            .get(id.as_bytes())?
            .map(|bytes| serde_json::from_slice(&bytes).map_err(StoreError::from))
            .transpose()
    }

    /// Write `doc`, returning its new revision.
    ///
    /// `doc.rev` must equal the stored revision: `None` for a document that
    /// does not exist yet. Anything else is a [`StoreError::Conflict`], as is
    /// losing the compare-and-swap to a concurrent writer.
    pub fn put(&self, mut doc: Document) -> Result<String, StoreError> {
        let key = doc.id.clone();
        let current = self.tree.get(key.as_bytes())?;
        let stored = match &current {
            Some(bytes) => Some(serde_json::from_slice::<Document>(bytes)?),
            None => None,
        };
        let stored_rev = stored.as_ref().and_then(|d| d.rev.clone());

        if doc.rev != stored_rev {
            return Err(StoreError::Conflict {
                id: key,
                stored: stored_rev,
            });
        }

        let generation = stored.as_ref().map_or(0, Document::generation) + 1;
        let rev = format!("{generation}-{}", digest(&doc)?);
        doc.rev = Some(rev.clone());
        let bytes = serde_json::to_vec(&doc)?;

        match self.tree.compare_and_swap(key.as_bytes(), current, Some(bytes))? {
            Ok(()) => Ok(rev),
            Err(_) => Err(StoreError::Conflict {
                stored: self.get(&key)?.and_then(|d| d.rev),
                id: key,
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    #[cfg(test)]
    pub(super) fn insert_raw(&self, id: &str, bytes: &[u8]) {
        self.tree.insert(id.as_bytes(), bytes).unwrap();
    }
}

/// Leading hex of the BLAKE3 hash of the document payload.
fn digest(doc: &Document) -> Result<String, serde_json::Error> {
    let payload = serde_json::to_vec(&doc.fields)?;
    let mut hex = hex::encode(blake3::hash(&payload).as_bytes());
    hex.truncate(DIGEST_LEN);
    Ok(hex)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn database() -> Database {
        DocumentStore::temporary().unwrap().database("settings").unwrap()
    }

    #[test]
    fn test_insert_then_get() {
        let db = database();
        let rev = db.put(Document::new("ui").with("collapsed", true)).unwrap();

        assert!(rev.starts_with("1-"));
        assert_eq!(rev.len(), 2 + DIGEST_LEN);

        let stored = db.get("ui").unwrap().unwrap();
        assert_eq!(stored.rev.as_deref(), Some(rev.as_str()));
        assert_eq!(stored.fields["collapsed"], serde_json::json!(true));
        assert_eq!(db.len(), 1);
    }

    #[test]
    fn test_update_increments_generation() {
        let db = database();
        let rev1 = db.put(Document::new("ui").with("n", 1)).unwrap();

        let mut doc = Document::new("ui").with("n", 2);
        doc.rev = Some(rev1.clone());
        let rev2 = db.put(doc).unwrap();

        assert!(rev2.starts_with("2-"));
        assert_ne!(rev1[2..], rev2[2..]);
        assert_eq!(db.len(), 1);
    }

    #[test]
    fn test_same_payload_same_digest() {
        let a = database();
        let b = database();
        let rev_a = a.put(Document::new("x").with("k", "v")).unwrap();
        let rev_b = b.put(Document::new("y").with("k", "v")).unwrap();
        assert_eq!(rev_a, rev_b);
    }

    #[test]
    fn test_stale_revision_conflicts() {
        let db = database();
        let rev1 = db.put(Document::new("ui").with("n", 1)).unwrap();
        let mut doc = Document::new("ui").with("n", 2);
        doc.rev = Some(rev1.clone());
        db.put(doc).unwrap();

        let mut stale = Document::new("ui").with("n", 3);
        stale.rev = Some(rev1);
        let err = db.put(stale).unwrap_err();
        assert!(matches!(err, StoreError::Conflict { ref id, .. } if id == "ui"));
    }

    #[test]
    fn test_missing_revision_on_existing_conflicts() {
        let db = database();
        db.put(Document::new("ui")).unwrap();
        assert!(matches!(
            db.put(Document::new("ui")),
            Err(StoreError::Conflict { .. })
        ));
    }

    #[test]
    fn test_revision_for_missing_document_conflicts() {
        let db = database();
        let mut doc = Document::new("ghost");
        doc.rev = Some("4-abc".into());
        assert!(matches!(db.put(doc), Err(StoreError::Conflict { stored: None, .. })));
        assert!(db.is_empty());
    }

    #[test]
    fn test_databases_are_separate() {
        let store = DocumentStore::temporary().unwrap();
        let a = store.database("a").unwrap();
        let b = store.database("b").unwrap();
        a.put(Document::new("doc")).unwrap();

        assert_eq!(a.len(), 1);
        assert!(b.get("doc").unwrap().is_none());

        let mut names = store.database_names();
        names.sort();
        assert_eq!(names, vec!["a".to_string()]);
    }
}
