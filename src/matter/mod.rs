//! Matter data model as seen through the protocol client.
//!
//! This module organizes the read side of the Matter data model:
//! - `attribute`: attribute ids, paths and raw values
//! - `clusters`: cluster ids, attribute ids and enum decoders
//! - `device_types`: device type constants used by discovery
//! - `node`: cached node snapshots and endpoint views

pub mod attribute;
pub mod clusters;
pub mod device_types;
pub mod node;

pub use attribute::{AttributeId, AttributePath, AttributeValue};
pub use device_types::DeviceType;
pub use node::{MatterEndpoint, MatterNode};
