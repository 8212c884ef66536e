//! Entities bound to discovered Matter endpoints.
//!
//! Each entity class reads its attributes from the endpoint view on every
//! update and recomputes the state it shows on the host platform:
//! - `binary_sensor`: smoke and carbon monoxide alarm sensors
//! - `dishwasher`: operational state of a dishwasher

pub mod binary_sensor;
pub mod dishwasher;

use crate::discovery::{DiscoverySchema, EntityDescription, Platform};
use crate::matter::{AttributeId, MatterEndpoint};
use serde::Serialize;
use std::collections::BTreeMap;

pub use binary_sensor::SmokeCoSensor;
pub use dishwasher::Dishwasher;

/// Platform-level value of an entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StateValue {
    Bool(bool),
    Text(String),
}

impl StateValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// What the host framework displays for an entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityState {
    pub available: bool,
    /// `None` is the unknown state.
    pub state: Option<StateValue>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<&'static str, serde_json::Value>,
}

impl EntityState {
    pub fn unknown(available: bool) -> Self {
        Self {
            available,
            state: None,
            attributes: BTreeMap::new(),
        }
    }
}

/// Binding between a schema and the endpoint it matched.
#[derive(Debug, Clone)]
pub struct EntityInfo {
    pub node_id: u64,
    pub endpoint_id: u16,
    pub platform: Platform,
    pub description: EntityDescription,
    pub primary_attribute: AttributeId,
    pub watched_attributes: Vec<AttributeId>,
}

impl EntityInfo {
    /// Bind a matched schema to an endpoint. Returns `None` for a schema
    /// without required attributes, which a registry never holds.
    pub fn new(schema: &DiscoverySchema, endpoint: &MatterEndpoint<'_>) -> Option<Self> {
        Some(Self {
            node_id: endpoint.node_id(),
            endpoint_id: endpoint.endpoint_id(),
            platform: schema.platform,
            description: schema.entity_description,
            primary_attribute: schema.primary_attribute()?,
            watched_attributes: schema.watched_attributes(),
        })
    }

    /// Stable id: `<node>-<endpoint>-<description key>`.
    pub fn unique_id(&self) -> String {
        format!("{}-{}-{}", self.node_id, self.endpoint_id, self.description.key)
    }

    pub fn is_watching(&self, attribute: AttributeId) -> bool {
        self.watched_attributes.contains(&attribute)
    }
}

/// Entity classes a discovery schema can instantiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityClass {
    SmokeCoSensor,
    Dishwasher,
}

impl EntityClass {
    pub fn instantiate(self, info: EntityInfo) -> Box<dyn MatterEntity> {
        match self {
            Self::SmokeCoSensor => Box::new(SmokeCoSensor::new(info)),
            Self::Dishwasher => Box::new(Dishwasher::new(info)),
        }
    }
}

/// An entity backed by one Matter endpoint.
pub trait MatterEntity: Send + Sync {
    fn info(&self) -> &EntityInfo;

    /// Re-read the endpoint's attributes and recompute state.
    fn update_from_device(&mut self, endpoint: &MatterEndpoint<'_>);

    fn state(&self) -> EntityState;

    fn unique_id(&self) -> String {
        self.info().unique_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::SchemaRegistry;
    use crate::matter::{AttributeValue, MatterNode};
    use crate::matter::clusters::smoke_co_alarm::SmokeCoAlarmAttribute;

    #[test]
    fn test_entity_info_from_schema() {
        let node = MatterNode::new(5)
            .with_attribute(SmokeCoAlarmAttribute::SmokeState.id().on_endpoint(2), AttributeValue::Int(0));
        let ep = node.endpoint(2).unwrap();
        let registry = SchemaRegistry::builtin();
        let schema = registry.match_endpoint(&ep).unwrap();

        let info = EntityInfo::new(schema, &ep).unwrap();
        assert_eq!(info.unique_id(), "5-2-SmokeStateSensor");
        assert_eq!(info.platform, Platform::BinarySensor);
        assert_eq!(info.primary_attribute, SmokeCoAlarmAttribute::SmokeState.id());
        assert!(info.is_watching(SmokeCoAlarmAttribute::SmokeState.id()));
        assert!(!info.is_watching(SmokeCoAlarmAttribute::COState.id()));
    }

    #[test]
    fn test_state_serialization() {
        let mut state = EntityState::unknown(true);
        assert_eq!(
            serde_json::to_value(&state).unwrap(),
            serde_json::json!({"available": true, "state": null})
        );
        state.state = Some(StateValue::Text("running".into()));
        state.attributes.insert("countdown_time", serde_json::json!(30));
        assert_eq!(
            serde_json::to_value(&state).unwrap(),
            serde_json::json!({"available": true, "state": "running", "attributes": {"countdown_time": 30}})
        );
    }
}
