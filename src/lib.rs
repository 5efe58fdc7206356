//! A rust library for versioning chunked multidimensional arrays in a key-value store.
//!
//! A [`VersionGraph`](graph::VersionGraph) manages named snapshots (versions) of a tree
//! of dataset entries. Versions are cheap to create: branching copies entry documents
//! by reference, and the array bytes live in a content-deduplicated [`pool`] of
//! immutable raw chunks shared across versions. A version is staged, mutable, and
//! invisible to readers until the [`commit`] protocol makes it durable in a single
//! metadata write.
//!
//! Everything persists through the minimal key-value interface in [`storage`], with an
//! in-memory store provided.
//!
//! ## Example
//! ```
//! # use std::collections::BTreeMap;
//! # use std::sync::Arc;
//! use versioned_arrays::commit::CommitOptions;
//! use versioned_arrays::dataset::{DataType, DatasetUpdate, DenseArray};
//! use versioned_arrays::graph::VersionGraph;
//! use versioned_arrays::storage::MemoryStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(MemoryStore::new());
//! let graph = VersionGraph::create(store)?;
//!
//! // Stage a version, give it some data, and commit it.
//! let staged = graph.branch(Some("r0"), None)?;
//! let array = DenseArray::from_elements(vec![2, 2], DataType::Int32, &[1i32, 2, 3, 4])?;
//! let updates = BTreeMap::from([("data".to_string(), DatasetUpdate::from(array))]);
//! graph.commit(&staged, &updates, &CommitOptions::default())?;
//!
//! assert_eq!(graph.current_version()?.as_str(), "r0");
//! let view = graph.dataset_view("r0", "data")?;
//! assert_eq!(view.shape, vec![2, 2]);
//! # Ok(())
//! # }
//! ```

#![warn(unused_variables)]
#![warn(dead_code)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![deny(clippy::missing_panics_doc)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod commit;
pub mod dataset;
pub mod graph;
pub mod pool;
pub mod storage;
pub mod timestamp;
pub mod version;
