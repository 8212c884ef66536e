//! Descriptor cluster (0x001D).
//!
//! Every endpoint carries a Descriptor; its DeviceTypeList tells which
//! device types the endpoint implements.

use super::super::attribute::{AttributeId, AttributeValue};
use super::super::device_types::DeviceType;
use strum::FromRepr;

/// Matter Cluster ID for Descriptor
pub const CLUSTER_ID: u32 = 0x001D;

/// Attribute IDs for the Descriptor cluster
#[derive(Clone, Copy, Debug, Eq, PartialEq, FromRepr)]
#[repr(u32)]
pub enum DescriptorAttribute {
    /// List of DeviceTypeStruct { 0: device type, 1: revision }
    DeviceTypeList = 0x0000,
    ServerList = 0x0001,
    ClientList = 0x0002,
    PartsList = 0x0003,
}

impl DescriptorAttribute {
    pub const fn id(self) -> AttributeId {
        AttributeId::new(CLUSTER_ID, self as u32)
    }
}

/// Decode a DeviceTypeList value. Malformed entries are skipped.
pub fn device_types(value: &AttributeValue) -> Vec<DeviceType> {
    let Some(entries) = value.as_list() else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let dtype = entry.field(0)?.as_int()?;
            let drev = entry.field(1).and_then(AttributeValue::as_int).unwrap_or(1);
            Some(DeviceType::new(
                u32::try_from(dtype).ok()?,
                u16::try_from(drev).ok()?,
            ))
        })
        .collect()
}
