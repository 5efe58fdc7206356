use derive_more::Display;
use serde::{Deserialize, Serialize};

/// The element type of a dataset entry.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// `bool` (1 byte per element).
    #[display("bool")]
    Bool,
    /// `int8`.
    #[display("int8")]
    Int8,
    /// `int16`.
    #[display("int16")]
    Int16,
    /// `int32`.
    #[display("int32")]
    Int32,
    /// `int64`.
    #[display("int64")]
    Int64,
    /// `uint8`.
    #[display("uint8")]
    UInt8,
    /// `uint16`.
    #[display("uint16")]
    UInt16,
    /// `uint32`.
    #[display("uint32")]
    UInt32,
    /// `uint64`.
    #[display("uint64")]
    UInt64,
    /// `float32`.
    #[display("float32")]
    Float32,
    /// `float64`.
    #[display("float64")]
    Float64,
}

impl DataType {
    /// The fixed size in bytes of one element.
    #[must_use]
    pub const fn size(&self) -> usize {
        match self {
            Self::Bool | Self::Int8 | Self::UInt8 => 1,
            Self::Int16 | Self::UInt16 => 2,
            Self::Int32 | Self::UInt32 | Self::Float32 => 4,
            Self::Int64 | Self::UInt64 | Self::Float64 => 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_type_size() {
        assert_eq!(DataType::Bool.size(), 1);
        assert_eq!(DataType::Int16.size(), 2);
        assert_eq!(DataType::Float32.size(), 4);
        assert_eq!(DataType::UInt64.size(), 8);
    }

    #[test]
    fn data_type_serde() {
        assert_eq!(
            serde_json::to_string(&DataType::Float64).unwrap(),
            r#""float64""#
        );
        let data_type: DataType = serde_json::from_str(r#""uint16""#).unwrap();
        assert_eq!(data_type, DataType::UInt16);
        assert_eq!(data_type.to_string(), "uint16");
    }
}
