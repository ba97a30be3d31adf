//! Documents and sync messages.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A stored document: identifier, revision and an opaque JSON payload.
///
/// ```json
/// { "_id": "settings", "_rev": "2-9f86d081884c7d659a2feaa0c55ad015", "theme": "dark" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(rename = "_rev", default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,

    /// Every other field, preserved verbatim.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Document {
    #[cfg(test)]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rev: None,
            fields: Map::new(),
        }
    }

    #[cfg(test)]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Generation of the current revision (`0` when never written).
    pub fn generation(&self) -> u64 {
        self.rev.as_deref().map_or(0, revision_generation)
    }
}

/// Generation part of a `<generation>-<digest>` revision.
///
/// Malformed revisions count as generation `0`.
fn revision_generation(rev: &str) -> u64 {
    rev.split_once('-')
        .and_then(|(generation, _)| generation.parse().ok())
        .unwrap_or(0)
}

/// A request to store `document` in `database`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncMessage {
    pub database: String,
    pub document: Document,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_shape() {
        let msg: SyncMessage = serde_json::from_value(json!({
            "database": "hal-settings",
            "document": { "_id": "ui", "_rev": "3-abc", "collapsed": true, "nested": { "a": [1, 2] } }
        }))
        .unwrap();

        assert_eq!(msg.database, "hal-settings");
        assert_eq!(msg.document.id, "ui");
        assert_eq!(msg.document.rev.as_deref(), Some("3-abc"));
        assert_eq!(msg.document.fields["collapsed"], json!(true));
        assert_eq!(msg.document.fields["nested"], json!({ "a": [1, 2] }));
        assert_eq!(msg.document.generation(), 3);
    }

    #[test]
    fn test_missing_id_rejected() {
        let result: Result<Document, _> = serde_json::from_value(json!({ "a": 1 }));
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_omits_missing_rev() {
        let doc = Document::new("ui").with("collapsed", false);
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({ "_id": "ui", "collapsed": false })
        );
        assert_eq!(doc.generation(), 0);
    }

    #[test]
    fn test_revision_generation() {
        assert_eq!(revision_generation("12-ff"), 12);
        assert_eq!(revision_generation("garbage"), 0);
        assert_eq!(revision_generation("x-ff"), 0);
    }
}
