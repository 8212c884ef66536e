//! Endpoint discovery.
//!
//! - `schema`: discovery schema records and entity descriptions
//! - `registry`: ordered, first-match-wins schema lookup
//! - `projection`: raw attribute values to platform values

pub mod projection;
pub mod registry;
pub mod schema;

pub use projection::{Projection, project};
pub use registry::{DiscoveryMode, SchemaRegistry};
pub use schema::{DeviceClass, DiscoverySchema, EntityDescription, Platform};
