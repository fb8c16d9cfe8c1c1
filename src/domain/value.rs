//! Structured value: the generic map/sequence/scalar tree nodes serialize into.
//!
//! Every field container converts to and from a [`StructuredValue`]. The value
//! itself converts to JSON text through serde, so persisted snapshots and
//! in-memory values share one contract.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};

/// Ordered field-name → value mapping.
pub type StructuredMap = BTreeMap<String, StructuredValue>;

/// Tagged variant over the shapes a serialized node may take.
///
/// Serialized untagged, so the JSON form is the natural one
/// (`{"id": 3, "streamType": "UNICAST"}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum StructuredValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    /// Only used for unsigned values above `i64::MAX`.
    UInt(u64),
    Str(String),
    Seq(Vec<StructuredValue>),
    Map(StructuredMap),
}

impl StructuredValue {
    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) | Self::UInt(_) => "integer",
            Self::Str(_) => "string",
            Self::Seq(_) => "sequence",
            Self::Map(_) => "mapping",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::UInt(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Int(i) => u64::try_from(*i).ok(),
            Self::UInt(u) => Some(*u),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[StructuredValue]> {
        match self {
            Self::Seq(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&StructuredMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Render as JSON text.
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }

    /// Parse JSON text. Floats are not part of the value model and are rejected.
    pub fn from_json(text: &str) -> DomainResult<Self> {
        serde_json::from_str(text).map_err(|e| DomainError::malformed("json", e.to_string()))
    }
}

impl fmt::Display for StructuredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_json(false) {
            Ok(text) => f.write_str(&text),
            Err(_) => Err(fmt::Error),
        }
    }
}

impl From<bool> for StructuredValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

macro_rules! from_small_int {
    ($($t:ty),*) => {
        $(impl From<$t> for StructuredValue {
            fn from(v: $t) -> Self {
                Self::Int(i64::from(v))
            }
        })*
    };
}

from_small_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for StructuredValue {
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(i) => Self::Int(i),
            Err(_) => Self::UInt(v),
        }
    }
}

impl From<&str> for StructuredValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for StructuredValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<Vec<StructuredValue>> for StructuredValue {
    fn from(v: Vec<StructuredValue>) -> Self {
        Self::Seq(v)
    }
}

impl From<StructuredMap> for StructuredValue {
    fn from(v: StructuredMap) -> Self {
        Self::Map(v)
    }
}

/// Typed, error-reporting view over one node's serialized mapping.
///
/// Field containers use it in `from_structured` so that missing or mistyped
/// attributes all surface as [`DomainError::MalformedState`] naming the node.
/// Keys the reader is never asked about are ignored.
#[derive(Debug, Clone, Copy)]
pub struct FieldReader<'a> {
    node: &'static str,
    map: &'a StructuredMap,
}

impl<'a> FieldReader<'a> {
    pub fn new(node: &'static str, value: &'a StructuredValue) -> DomainResult<Self> {
        let map = value.as_map().ok_or_else(|| {
            DomainError::malformed(node, format!("expected mapping, got {}", value.kind()))
        })?;
        Ok(Self { node, map })
    }

    fn present(&self, key: &str) -> Option<&'a StructuredValue> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    fn required(&self, key: &str) -> DomainResult<&'a StructuredValue> {
        self.present(key)
            .ok_or_else(|| DomainError::malformed(self.node, format!("missing required field '{key}'")))
    }

    fn wrong_shape(&self, key: &str, expected: &str, got: &StructuredValue) -> DomainError {
        DomainError::malformed(
            self.node,
            format!("field '{key}' expected {expected}, got {got}"),
        )
    }

    fn to_int<T: TryFrom<i64>>(&self, key: &str, value: &StructuredValue) -> DomainResult<T> {
        value
            .as_i64()
            .and_then(|i| T::try_from(i).ok())
            .ok_or_else(|| self.wrong_shape(key, std::any::type_name::<T>(), value))
    }

    pub fn required_int<T: TryFrom<i64>>(&self, key: &str) -> DomainResult<T> {
        let value = self.required(key)?;
        self.to_int(key, value)
    }

    pub fn optional_int<T: TryFrom<i64>>(&self, key: &str) -> DomainResult<Option<T>> {
        self.present(key).map(|v| self.to_int(key, v)).transpose()
    }

    pub fn required_str(&self, key: &str) -> DomainResult<&'a str> {
        let value = self.required(key)?;
        value
            .as_str()
            .ok_or_else(|| self.wrong_shape(key, "string", value))
    }

    pub fn optional_str(&self, key: &str) -> DomainResult<Option<&'a str>> {
        self.present(key)
            .map(|v| v.as_str().ok_or_else(|| self.wrong_shape(key, "string", v)))
            .transpose()
    }

    /// Sequence under `key`; absent means empty.
    pub fn seq(&self, key: &str) -> DomainResult<&'a [StructuredValue]> {
        match self.present(key) {
            None => Ok(&[]),
            Some(v) => v.as_seq().ok_or_else(|| self.wrong_shape(key, "sequence", v)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_large_unsigned_stays_unsigned() {
        assert_eq!(StructuredValue::from(u64::MAX), StructuredValue::UInt(u64::MAX));
        assert_eq!(StructuredValue::from(7u64), StructuredValue::Int(7));
    }

    #[test]
    fn test_json_rejects_floats() {
        assert!(StructuredValue::from_json(r#"{"weight": 1.5}"#).is_err());
    }

    #[test]
    fn test_reader_treats_null_as_absent() {
        let value = StructuredValue::from_json(r#"{"id": 1, "weight": null}"#).unwrap();
        let reader = FieldReader::new("test", &value).unwrap();
        assert_eq!(reader.optional_int::<i32>("weight").unwrap(), None);
        assert_eq!(reader.required_int::<u8>("id").unwrap(), 1);
    }

    #[test]
    fn test_reader_reports_out_of_range_int() {
        let value = StructuredValue::from_json(r#"{"id": 300}"#).unwrap();
        let reader = FieldReader::new("test", &value).unwrap();
        assert!(matches!(
            reader.required_int::<u8>("id"),
            Err(DomainError::MalformedState { node: "test", .. })
        ));
    }
}
