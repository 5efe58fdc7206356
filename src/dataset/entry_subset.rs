use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ArrayShape;

/// The extent of one chunk within a dataset entry, in element space.
///
/// `start` is inclusive and `end` is exclusive, dimension by dimension. The logical
/// shape of an entry assembled from chunk slices is the component-wise maximum of their
/// `end` bounds.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display, Serialize, Deserialize)]
#[display("[{start:?}..{end:?})")]
pub struct EntrySubset {
    start: Vec<u64>,
    end: Vec<u64>,
}

/// An incompatible dimensionality error.
#[derive(Clone, Debug, Error)]
#[error("incompatible dimensionality {_0}, expected {_1}")]
pub struct IncompatibleDimensionalityError(usize, usize);

impl IncompatibleDimensionalityError {
    /// Create a new incompatible dimensionality error.
    #[must_use]
    pub const fn new(got: usize, expected: usize) -> Self {
        Self(got, expected)
    }
}

impl EntrySubset {
    /// Create a new entry subset from an inclusive `start` and exclusive `end`.
    ///
    /// # Errors
    ///
    /// Returns [`IncompatibleDimensionalityError`] if the lengths of `start` and `end`
    /// do not match.
    pub fn new(start: Vec<u64>, end: Vec<u64>) -> Result<Self, IncompatibleDimensionalityError> {
        if start.len() == end.len() {
            debug_assert!(std::iter::zip(&start, &end).all(|(s, e)| e >= s));
            Ok(Self { start, end })
        } else {
            Err(IncompatibleDimensionalityError::new(end.len(), start.len()))
        }
    }

    /// The number of dimensions.
    #[must_use]
    pub fn dimensionality(&self) -> usize {
        self.start.len()
    }

    /// The inclusive start of the subset.
    #[must_use]
    pub fn start(&self) -> &[u64] {
        &self.start
    }

    /// The exclusive end of the subset.
    #[must_use]
    pub fn end(&self) -> &[u64] {
        &self.end
    }

    /// The shape of the subset.
    #[must_use]
    pub fn shape(&self) -> ArrayShape {
        std::iter::zip(&self.start, &self.end)
            .map(|(start, end)| end.saturating_sub(*start))
            .collect()
    }
}
