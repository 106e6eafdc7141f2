/// Artifact and canvas node identifiers are opaque strings (UUID v4,
/// hyphenated). A node shares the id of the record it projects.
pub type ArtifactId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
