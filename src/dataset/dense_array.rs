use thiserror::Error;

use super::{ArrayShape, DataType};

/// A dense in-memory array: a logical shape, an element type, and the element bytes in
/// row-major order.
#[derive(Clone, PartialEq, Debug)]
pub struct DenseArray {
    shape: ArrayShape,
    data_type: DataType,
    bytes: Vec<u8>,
}

/// The byte length of an array does not match its shape and element type.
#[derive(Debug, Error)]
#[error("{got} bytes do not match shape {shape:?} of {data_type} (expected {expected})")]
pub struct InvalidBytesLengthError {
    got: usize,
    expected: usize,
    shape: ArrayShape,
    data_type: DataType,
}

impl DenseArray {
    /// Create a new dense array from raw `bytes` in row-major order.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidBytesLengthError`] if the length of `bytes` does not equal the
    /// element count of `shape` times the size of `data_type`.
    pub fn new(
        shape: ArrayShape,
        data_type: DataType,
        bytes: Vec<u8>,
    ) -> Result<Self, InvalidBytesLengthError> {
        let elements = shape.iter().product::<u64>();
        let expected = usize::try_from(elements).unwrap_or(usize::MAX) * data_type.size();
        if bytes.len() == expected {
            Ok(Self {
                shape,
                data_type,
                bytes,
            })
        } else {
            Err(InvalidBytesLengthError {
                got: bytes.len(),
                expected,
                shape,
                data_type,
            })
        }
    }

    /// Create a new dense array from a slice of typed elements in row-major order.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidBytesLengthError`] if the elements do not match `shape` and
    /// `data_type`.
    pub fn from_elements<T: bytemuck::Pod>(
        shape: ArrayShape,
        data_type: DataType,
        elements: &[T],
    ) -> Result<Self, InvalidBytesLengthError> {
        Self::new(shape, data_type, bytemuck::cast_slice(elements).to_vec())
    }

    /// An array with no elements, used to register a sparse entry with the pool.
    #[must_use]
    pub fn empty(data_type: DataType) -> Self {
        Self {
            shape: vec![0],
            data_type,
            bytes: Vec::new(),
        }
    }

    /// The logical shape of the array.
    #[must_use]
    pub fn shape(&self) -> &[u64] {
        &self.shape
    }

    /// The element type of the array.
    #[must_use]
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// The element bytes in row-major order.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The number of elements.
    #[must_use]
    pub fn num_elements(&self) -> u64 {
        self.shape.iter().product()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_array_from_elements() {
        let array =
            DenseArray::from_elements(vec![2, 3], DataType::Int32, &[1i32, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(array.shape(), &[2, 3]);
        assert_eq!(array.num_elements(), 6);
        assert_eq!(array.bytes().len(), 24);
    }

    #[test]
    fn dense_array_length_mismatch() {
        assert!(DenseArray::new(vec![2, 2], DataType::Float64, vec![0; 16]).is_err());
        assert!(DenseArray::from_elements(vec![3], DataType::Int16, &[1i16, 2]).is_err());
    }

    #[test]
    fn dense_array_empty() {
        let array = DenseArray::empty(DataType::Float32);
        assert_eq!(array.num_elements(), 0);
        assert!(array.bytes().is_empty());
    }

    #[test]
    fn dense_array_zero_dimensional() {
        // A zero-dimensional array holds exactly one element.
        let array = DenseArray::from_elements(vec![], DataType::UInt8, &[7u8]).unwrap();
        assert_eq!(array.num_elements(), 1);
    }
}
