use serde::{Deserialize, Serialize};

use crate::dataset::{ArrayShape, Attributes, DataType, FillValue, SliceDescriptor};

/// A node in a version's entry tree: a container group or a dataset view.
///
/// The set of node kinds is closed. A document written by an external tool with an
/// unrecognized `node_type` is rejected during
/// [`branch`](crate::graph::VersionGraph::branch) with
/// [`BranchError::UnsupportedEntry`](crate::graph::BranchError::UnsupportedEntry).
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(tag = "node_type", rename_all = "lowercase")]
pub enum EntryMetadata {
    /// A container group with child entries.
    Group,
    /// A dataset entry, materialized as a composite view over raw chunks.
    Dataset(DatasetMetadata),
}

/// The composite-view document for a dataset entry.
///
/// Describes how to reconstruct the entry from the pool's immutable raw chunks: the
/// logical shape, the element type, the slice descriptors, and the entry's attribute
/// map and fill value. Copying this document from a parent version to a child copies
/// the entry by reference; no chunk bytes move.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct DatasetMetadata {
    /// The logical shape of the entry.
    pub shape: ArrayShape,
    /// The element type of the entry.
    pub data_type: DataType,
    /// The fill value for unwritten regions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_value: Option<FillValue>,
    /// The entry's attribute map.
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    /// The slice descriptors mapping the entry onto raw chunks.
    pub slices: Vec<SliceDescriptor>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_document() {
        let json = serde_json::to_value(EntryMetadata::Group).unwrap();
        assert_eq!(json["node_type"], "group");
        let parsed: EntryMetadata = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, EntryMetadata::Group);
    }

    #[test]
    fn dataset_document_round_trip() {
        let mut attributes = Attributes::new();
        attributes.insert("units".to_string(), "K".into());
        let metadata = EntryMetadata::Dataset(DatasetMetadata {
            shape: vec![4, 6],
            data_type: DataType::Float64,
            fill_value: Some(0.0f64.into()),
            attributes,
            slices: Vec::new(),
        });
        let json = serde_json::to_string(&metadata).unwrap();
        let parsed: EntryMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, metadata);
    }

    #[test]
    fn unknown_node_type_is_rejected() {
        let result =
            serde_json::from_str::<EntryMetadata>(r#"{"node_type": "committed_reference"}"#);
        assert!(result.is_err());
    }
}
