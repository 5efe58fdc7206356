use serde::{Deserialize, Serialize};

/// The fill value of a dataset entry.
///
/// Provides an element value, as native-endian bytes, for regions of an entry that have
/// never been written.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct FillValue(Vec<u8>);

impl core::fmt::Display for FillValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl FillValue {
    /// The fill value bytes for one element.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// The size of the fill value in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.0.len()
    }
}

impl From<Vec<u8>> for FillValue {
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

impl From<bool> for FillValue {
    fn from(value: bool) -> Self {
        Self(vec![u8::from(value)])
    }
}

macro_rules! fill_value_from_number {
    ($type:ty) => {
        impl From<$type> for FillValue {
            fn from(value: $type) -> Self {
                Self(value.to_ne_bytes().to_vec())
            }
        }
    };
}

fill_value_from_number!(u8);
fill_value_from_number!(u16);
fill_value_from_number!(u32);
fill_value_from_number!(u64);
fill_value_from_number!(i8);
fill_value_from_number!(i16);
fill_value_from_number!(i32);
fill_value_from_number!(i64);
fill_value_from_number!(f32);
fill_value_from_number!(f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_value_bytes() {
        assert_eq!(FillValue::from(true).as_slice(), &[1]);
        assert_eq!(FillValue::from(0u8).size(), 1);
        assert_eq!(FillValue::from(0i64).size(), 8);
        assert_eq!(FillValue::from(1.5f32).as_slice(), 1.5f32.to_ne_bytes());
    }
}
