//! Append-only store of committed artifact versions.
//!
//! Records are created at commit time (or root creation), never mutated and
//! never deleted. There is deliberately no update or delete operation: the
//! version history stays tamper-evident and trivially serializable.

use std::collections::HashMap;

use serde::Serialize;

use iconforge_core::error::CoreError;
use iconforge_core::hashing::content_digest;
use iconforge_core::types::{ArtifactId, Timestamp};

// ---------------------------------------------------------------------------
// ArtifactRecord
// ---------------------------------------------------------------------------

/// A committed, immutable version of the image with parent linkage.
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactRecord {
    /// Opaque unique identifier, generated at creation.
    pub id: ArtifactId,
    /// The record this version was derived from; `None` for roots.
    pub parent_id: Option<ArtifactId>,
    /// Canonical serialized SVG payload as returned by the engine.
    pub svg: String,
    /// The instruction that produced this record from its parent; `None`
    /// for roots.
    pub user_input: Option<String>,
    /// SHA-256 hex digest of `svg`, computed at commit time.
    pub content_digest: String,
    /// Creation timestamp, for ordering and debugging only.
    pub created_at: Timestamp,
}

impl ArtifactRecord {
    /// Build a root record (uploaded or generated from scratch).
    pub fn root(id: ArtifactId, svg: String) -> Self {
        let content_digest = content_digest(&svg);
        Self {
            id,
            parent_id: None,
            svg,
            user_input: None,
            content_digest,
            created_at: chrono::Utc::now(),
        }
    }

    /// Build a record derived from `parent_id` by an edit instruction.
    pub fn derived(
        id: ArtifactId,
        parent_id: ArtifactId,
        svg: String,
        user_input: String,
    ) -> Self {
        let content_digest = content_digest(&svg);
        Self {
            id,
            parent_id: Some(parent_id),
            svg,
            user_input: Some(user_input),
            content_digest,
            created_at: chrono::Utc::now(),
        }
    }

    /// Whether this record has no parent.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

// ---------------------------------------------------------------------------
// RecordStore
// ---------------------------------------------------------------------------

/// Session-lifetime map from record id to [`ArtifactRecord`] with write-once
/// semantics.
///
/// The controller guarantees insert preconditions by construction (fresh
/// UUIDs, parents committed first), so failed inserts indicate an internal
/// defect rather than a recoverable caller error. They are still surfaced as
/// errors so the graph can stay consistent instead of panicking.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: HashMap<ArtifactId, ArtifactRecord>,
}

impl RecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record.
    ///
    /// Fails with [`CoreError::Conflict`] if the id is already present, or
    /// [`CoreError::NotFound`] if the record names a parent that is not in
    /// the store.
    pub fn insert(&mut self, record: ArtifactRecord) -> Result<(), CoreError> {
        if self.records.contains_key(&record.id) {
            return Err(CoreError::Conflict(format!(
                "Record id {} already exists",
                record.id
            )));
        }
        if let Some(parent_id) = &record.parent_id {
            if !self.records.contains_key(parent_id) {
                return Err(CoreError::NotFound {
                    entity: "parent record",
                    id: parent_id.clone(),
                });
            }
        }
        self.records.insert(record.id.clone(), record);
        Ok(())
    }

    /// Look up a record by id.
    pub fn get(&self, id: &str) -> Option<&ArtifactRecord> {
        self.records.get(id)
    }

    /// Whether a record with this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Number of committed records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over all committed records in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &ArtifactRecord> {
        self.records.values()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn root(id: &str) -> ArtifactRecord {
        ArtifactRecord::root(id.to_string(), "<svg/>".to_string())
    }

    // -- Construction --------------------------------------------------------

    #[test]
    fn root_record_has_no_parent_or_input() {
        let record = root("r1");
        assert!(record.is_root());
        assert!(record.parent_id.is_none());
        assert!(record.user_input.is_none());
    }

    #[test]
    fn derived_record_links_parent_and_input() {
        let record = ArtifactRecord::derived(
            "c1".to_string(),
            "r1".to_string(),
            "<svg blue/>".to_string(),
            "make it blue".to_string(),
        );
        assert!(!record.is_root());
        assert_eq!(record.parent_id.as_deref(), Some("r1"));
        assert_eq!(record.user_input.as_deref(), Some("make it blue"));
    }

    #[test]
    fn digest_is_computed_from_payload() {
        let a = root("r1");
        let b = ArtifactRecord::root("r2".to_string(), "<svg/>".to_string());
        assert_eq!(a.content_digest, b.content_digest);
        assert_eq!(a.content_digest.len(), 64);
    }

    // -- Insert invariants ---------------------------------------------------

    #[test]
    fn insert_root_then_child_succeeds() {
        let mut store = RecordStore::new();
        store.insert(root("r1")).unwrap();
        let child = ArtifactRecord::derived(
            "c1".to_string(),
            "r1".to_string(),
            "<svg blue/>".to_string(),
            "make it blue".to_string(),
        );
        store.insert(child).unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.contains("c1"));
    }

    #[test]
    fn insert_rejects_duplicate_id() {
        let mut store = RecordStore::new();
        store.insert(root("r1")).unwrap();
        let err = store.insert(root("r1")).unwrap_err();
        assert_matches!(err, CoreError::Conflict(_));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn insert_rejects_dangling_parent() {
        let mut store = RecordStore::new();
        let orphan = ArtifactRecord::derived(
            "c1".to_string(),
            "missing".to_string(),
            "<svg/>".to_string(),
            "grow".to_string(),
        );
        let err = store.insert(orphan).unwrap_err();
        assert_matches!(err, CoreError::NotFound { .. });
        assert!(store.is_empty());
    }

    #[test]
    fn inserted_record_is_returned_unchanged() {
        let mut store = RecordStore::new();
        let record = root("r1");
        let digest = record.content_digest.clone();
        store.insert(record).unwrap();

        let fetched = store.get("r1").unwrap();
        assert_eq!(fetched.id, "r1");
        assert_eq!(fetched.svg, "<svg/>");
        assert_eq!(fetched.content_digest, digest);
    }

    #[test]
    fn get_missing_returns_none() {
        let store = RecordStore::new();
        assert!(store.get("nope").is_none());
    }

    // -- Serialization -------------------------------------------------------

    #[test]
    fn records_serialize_for_replay() {
        let record = root("r1");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], "r1");
        assert!(json["parent_id"].is_null());
        assert_eq!(json["svg"], "<svg/>");
        assert_eq!(json["content_digest"].as_str().unwrap().len(), 64);
    }
}
