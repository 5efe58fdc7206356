use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::timestamp::Timestamp;

use super::VersionName;

/// The lifecycle state of a version.
///
/// A version transitions `Staged → Committed` exactly once, through the commit
/// protocol's single metadata write. A committed version is never mutated again.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionState {
    /// Created but not yet committed; mutable and invisible to readers.
    #[display("staged")]
    Staged,
    /// Committed; immutable.
    #[display("committed")]
    Committed,
}

/// The persisted document describing a version node.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct VersionMetadata {
    /// The name of the parent version.
    pub prev_version: VersionName,
    /// The lifecycle state.
    pub state: VersionState,
    /// The commit timestamp; present only once committed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
}

impl VersionMetadata {
    /// Metadata for a newly staged version with parent `prev_version`.
    #[must_use]
    pub fn new_staged(prev_version: VersionName) -> Self {
        Self {
            prev_version,
            state: VersionState::Staged,
            timestamp: None,
        }
    }

    /// Returns true if the version has been committed.
    #[must_use]
    pub fn is_committed(&self) -> bool {
        self.state == VersionState::Committed
    }
}

#[cfg(test)]
mod tests {
    use crate::version::FIRST_VERSION;

    use super::*;

    #[test]
    fn version_metadata_staged() {
        let metadata = VersionMetadata::new_staged(VersionName::first());
        assert!(!metadata.is_committed());
        assert!(metadata.timestamp.is_none());
        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["state"], "staged");
        assert_eq!(json["prev_version"], FIRST_VERSION);
        assert!(json.get("timestamp").is_none());
    }

    #[test]
    fn version_metadata_round_trip() {
        let metadata = VersionMetadata {
            prev_version: VersionName::new("r1").unwrap(),
            state: VersionState::Committed,
            timestamp: Some(Timestamp::now()),
        };
        let json = serde_json::to_string(&metadata).unwrap();
        let parsed: VersionMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, metadata);
        assert!(parsed.is_committed());
    }
}
