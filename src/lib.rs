//! Matter entity discovery library.
//!
//! Maps endpoints reported by a Matter protocol client onto home-automation
//! entities: an ordered table of discovery schemas decides which entity
//! class handles an endpoint, and per-entity projections turn raw cluster
//! attribute values into platform state.

pub mod adapter;
pub mod config;
pub mod discovery;
pub mod entity;
pub mod error;
pub mod matter;

pub use adapter::{MatterAdapter, MatterEvent, StateUpdate};
pub use discovery::{DiscoverySchema, SchemaRegistry};
pub use error::{DecodeError, Error, Result};
