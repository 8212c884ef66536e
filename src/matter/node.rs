//! Node and endpoint views over the Matter client's attribute cache.
//!
//! A [`MatterNode`] is the client's snapshot of one commissioned device. A
//! [`MatterEndpoint`] borrows a node and exposes just one endpoint: its
//! supported attributes and device types. Neither owns protocol state; the
//! adapter keeps the node cache current from attribute reports.

use super::attribute::{AttributeId, AttributePath, AttributeValue};
use super::clusters::descriptor::{self, DescriptorAttribute};
use super::device_types::DeviceType;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Cached state of one Matter node, in the client's node-dump shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatterNode {
    pub node_id: u64,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(default)]
    pub attributes: BTreeMap<AttributePath, AttributeValue>,
}

fn default_available() -> bool {
    true
}

impl MatterNode {
    pub fn new(node_id: u64) -> Self {
        Self {
            node_id,
            available: true,
            attributes: BTreeMap::new(),
        }
    }

    /// Builder-style attribute insertion, mostly for tests and fixtures.
    pub fn with_attribute(mut self, path: AttributePath, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(path, value.into());
        self
    }

    /// Parse a node dump from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a node dump from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Synchronous read of a cached attribute value.
    pub fn get_attribute_value(&self, path: &AttributePath) -> Option<&AttributeValue> {
        self.attributes.get(path)
    }

    /// Store a reported attribute value, returning the previous one.
    pub fn set_attribute_value(
        &mut self,
        path: AttributePath,
        value: AttributeValue,
    ) -> Option<AttributeValue> {
        self.attributes.insert(path, value)
    }

    /// Ids of every endpoint that reports at least one attribute.
    pub fn endpoint_ids(&self) -> BTreeSet<u16> {
        self.attributes.keys().map(|p| p.endpoint_id).collect()
    }

    pub fn endpoint(&self, endpoint_id: u16) -> Option<MatterEndpoint<'_>> {
        self.endpoint_ids()
            .contains(&endpoint_id)
            .then(|| MatterEndpoint::new(self, endpoint_id))
    }

    pub fn endpoints(&self) -> impl Iterator<Item = MatterEndpoint<'_>> {
        self.endpoint_ids()
            .into_iter()
            .map(move |id| MatterEndpoint::new(self, id))
    }
}

/// Borrowed view of one endpoint of a node.
#[derive(Debug, Clone)]
pub struct MatterEndpoint<'a> {
    node: &'a MatterNode,
    endpoint_id: u16,
    device_types: Vec<DeviceType>,
}

impl<'a> MatterEndpoint<'a> {
    fn new(node: &'a MatterNode, endpoint_id: u16) -> Self {
        let device_types = node
            .get_attribute_value(&DescriptorAttribute::DeviceTypeList.id().on_endpoint(endpoint_id))
            .map(descriptor::device_types)
            .unwrap_or_default();
        Self {
            node,
            endpoint_id,
            device_types,
        }
    }

    pub fn node_id(&self) -> u64 {
        self.node.node_id
    }

    pub fn endpoint_id(&self) -> u16 {
        self.endpoint_id
    }

    pub fn available(&self) -> bool {
        self.node.available
    }

    pub fn device_types(&self) -> &[DeviceType] {
        &self.device_types
    }

    pub fn has_device_type(&self, device_type: &DeviceType) -> bool {
        self.device_types.iter().any(|dt| dt.is(device_type))
    }

    /// Whether the endpoint exposes the attribute (null values count as
    /// exposed; only missing keys do not).
    pub fn has_attribute(&self, attribute: AttributeId) -> bool {
        self.node
            .attributes
            .contains_key(&attribute.on_endpoint(self.endpoint_id))
    }

    /// Every attribute this endpoint exposes.
    pub fn attributes(&self) -> impl Iterator<Item = AttributeId> + '_ {
        self.node
            .attributes
            .keys()
            .filter(|p| p.endpoint_id == self.endpoint_id)
            .map(AttributePath::attribute)
    }

    /// Current cached value of an attribute on this endpoint.
    pub fn get_matter_attribute_value(&self, attribute: AttributeId) -> Option<&'a AttributeValue> {
        self.node
            .get_attribute_value(&attribute.on_endpoint(self.endpoint_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matter::clusters::smoke_co_alarm::SmokeCoAlarmAttribute;
    use crate::matter::device_types::{DEV_TYPE_DISHWASHER, DEV_TYPE_SMOKE_CO_ALARM};

    const NODE_JSON: &str = r#"{
        "node_id": 7,
        "attributes": {
            "0/29/0": [{"0": 22, "1": 1}],
            "1/29/0": [{"0": 118, "1": 1}],
            "1/92/1": 0,
            "1/92/2": null
        }
    }"#;

    #[test]
    fn test_endpoints_from_dump() {
        let node = MatterNode::from_json(NODE_JSON).unwrap();
        assert!(node.available);
        assert_eq!(node.endpoint_ids(), BTreeSet::from([0, 1]));

        let ep = node.endpoint(1).unwrap();
        assert_eq!(ep.node_id(), 7);
        assert!(ep.has_device_type(&DEV_TYPE_SMOKE_CO_ALARM));
        assert!(!ep.has_device_type(&DEV_TYPE_DISHWASHER));
        assert!(node.endpoint(2).is_none());
    }

    #[test]
    fn test_from_file() {
        let node = MatterNode::from_file("fixtures/nodes/dishwasher.json").unwrap();
        assert_eq!(node.node_id, 2);
        let ep = node.endpoint(1).unwrap();
        assert!(ep.has_device_type(&DEV_TYPE_DISHWASHER));

        assert!(matches!(
            MatterNode::from_file("fixtures/nodes/missing.json"),
            Err(crate::error::Error::IoError(_))
        ));
    }

    #[test]
    fn test_null_attribute_is_still_exposed() {
        let node = MatterNode::from_json(NODE_JSON).unwrap();
        let ep = node.endpoint(1).unwrap();
        assert!(ep.has_attribute(SmokeCoAlarmAttribute::COState.id()));
        assert_eq!(
            ep.get_matter_attribute_value(SmokeCoAlarmAttribute::COState.id()),
            Some(&AttributeValue::Null)
        );
        assert!(!ep.has_attribute(SmokeCoAlarmAttribute::BatteryAlert.id()));
        assert_eq!(ep.attributes().count(), 3);
    }

    #[test]
    fn test_set_attribute_value() {
        let mut node = MatterNode::from_json(NODE_JSON).unwrap();
        let path = SmokeCoAlarmAttribute::SmokeState.id().on_endpoint(1);
        let previous = node.set_attribute_value(path, AttributeValue::Int(1));
        assert_eq!(previous, Some(AttributeValue::Int(0)));
        assert_eq!(node.get_attribute_value(&path), Some(&AttributeValue::Int(1)));
    }
}
