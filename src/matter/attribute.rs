//! Attribute identifiers and raw attribute values.
//!
//! Node dumps from the Matter client key every attribute by a
//! `"<endpoint>/<cluster>/<attribute>"` path string and carry plain JSON
//! values. Discovery schemas only care about the cluster/attribute pair, so
//! the endpoint-agnostic [`AttributeId`] is kept separate from the fully
//! qualified [`AttributePath`].

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Cluster-scoped attribute identifier, independent of the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributeId {
    pub cluster_id: u32,
    pub attribute_id: u32,
}

impl AttributeId {
    pub const fn new(cluster_id: u32, attribute_id: u32) -> Self {
        Self {
            cluster_id,
            attribute_id,
        }
    }

    /// Qualify this attribute with an endpoint.
    pub const fn on_endpoint(self, endpoint_id: u16) -> AttributePath {
        AttributePath {
            endpoint_id,
            cluster_id: self.cluster_id,
            attribute_id: self.attribute_id,
        }
    }
}

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04X}/0x{:04X}", self.cluster_id, self.attribute_id)
    }
}

/// Fully qualified attribute location on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributePath {
    pub endpoint_id: u16,
    pub cluster_id: u32,
    pub attribute_id: u32,
}

impl AttributePath {
    pub const fn new(endpoint_id: u16, cluster_id: u32, attribute_id: u32) -> Self {
        Self {
            endpoint_id,
            cluster_id,
            attribute_id,
        }
    }

    pub const fn attribute(&self) -> AttributeId {
        AttributeId::new(self.cluster_id, self.attribute_id)
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.endpoint_id, self.cluster_id, self.attribute_id
        )
    }
}

impl FromStr for AttributePath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidAttributePath(s.to_string());

        let mut parts = s.split('/');
        let (Some(endpoint), Some(cluster), Some(attribute), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        Ok(Self {
            endpoint_id: endpoint.trim().parse().map_err(|_| invalid())?,
            cluster_id: cluster.trim().parse().map_err(|_| invalid())?,
            attribute_id: attribute.trim().parse().map_err(|_| invalid())?,
        })
    }
}

impl Serialize for AttributePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AttributePath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Raw attribute value as cached by the Matter client.
///
/// `Null` is the nullable sentinel and is distinct from `Int(0)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<AttributeValue>),
    Struct(BTreeMap<String, AttributeValue>),
}

impl AttributeValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[AttributeValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Look up a struct field. Matter structs in node dumps are keyed by
    /// field tag rendered as a string (`"0"`, `"1"`, ...).
    pub fn field(&self, tag: u8) -> Option<&AttributeValue> {
        match self {
            Self::Struct(fields) => fields.get(tag.to_string().as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => write!(f, "{s:?}"),
            other => match serde_json::to_string(other) {
                Ok(json) => f.write_str(&json),
                Err(_) => f.write_str("<unprintable>"),
            },
        }
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_attribute_path() {
        let path: AttributePath = "1/92/1".parse().unwrap();
        assert_eq!(path, AttributePath::new(1, 0x005C, 1));
        assert_eq!(path.to_string(), "1/92/1");
        assert_eq!(path.attribute(), AttributeId::new(0x005C, 1));
    }

    #[test]
    fn test_parse_attribute_path_rejects_garbage() {
        for bad in ["", "1/2", "1/2/3/4", "a/2/3", "1/-2/3", "70000/1/1"] {
            let err = bad.parse::<AttributePath>().unwrap_err();
            assert!(matches!(err, Error::InvalidAttributePath(ref s) if s == bad));
        }
    }

    #[test]
    fn test_null_is_not_zero() {
        let null: AttributeValue = serde_json::from_str("null").unwrap();
        let zero: AttributeValue = serde_json::from_str("0").unwrap();
        assert!(null.is_null());
        assert_eq!(zero, AttributeValue::Int(0));
        assert_ne!(null, zero);
        assert_eq!(null.as_int(), None);
    }

    #[test]
    fn test_struct_fields_by_tag() {
        let value: AttributeValue =
            serde_json::from_str(r#"{"0": 117, "1": 1}"#).unwrap();
        assert_eq!(value.field(0), Some(&AttributeValue::Int(117)));
        assert_eq!(value.field(1).and_then(AttributeValue::as_int), Some(1));
        assert_eq!(value.field(2), None);
    }

    #[test]
    fn test_path_as_map_key() {
        let map: BTreeMap<AttributePath, AttributeValue> =
            serde_json::from_str(r#"{"1/96/4": 1, "0/29/0": []}"#).unwrap();
        assert_eq!(
            map.get(&AttributePath::new(1, 96, 4)),
            Some(&AttributeValue::Int(1))
        );
        assert_eq!(
            map.get(&AttributePath::new(0, 29, 0)),
            Some(&AttributeValue::List(vec![]))
        );
    }
}
