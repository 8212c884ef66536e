//! Dishwasher entity (OperationalState cluster 0x0060).
//!
//! The displayed state is the decoded OperationalState. Because that enum is
//! closed, a code outside it makes the entity unavailable until the device
//! reports a valid state again; the error goes to the log only.

use super::{EntityClass, EntityInfo, EntityState, MatterEntity, StateValue};
use crate::discovery::{DiscoverySchema, EntityDescription, Platform};
use crate::error::DecodeError;
use crate::matter::clusters::operational_state::{
    self, ErrorState, OperationalCommand, OperationalState, OperationalStateAttribute,
};
use crate::matter::device_types::DEV_TYPE_DISHWASHER;
use crate::matter::{AttributeValue, MatterEndpoint};
use log::{debug, warn};

pub struct Dishwasher {
    info: EntityInfo,
    available: bool,
    operational_state: Result<Option<OperationalState>, DecodeError>,
    current_phase: Option<String>,
    countdown_time: Option<i64>,
    operational_error: Option<Result<ErrorState, i64>>,
    accepted_commands: Vec<OperationalCommand>,
}

impl Dishwasher {
    pub fn new(info: EntityInfo) -> Self {
        Self {
            info,
            available: true,
            operational_state: Ok(None),
            current_phase: None,
            countdown_time: None,
            operational_error: None,
            accepted_commands: Vec::new(),
        }
    }

    pub fn operational_state(&self) -> Result<Option<OperationalState>, &DecodeError> {
        self.operational_state.as_ref().map(|s| *s)
    }

    pub fn current_phase(&self) -> Option<&str> {
        self.current_phase.as_deref()
    }

    pub fn accepted_commands(&self) -> &[OperationalCommand] {
        &self.accepted_commands
    }
}

impl MatterEntity for Dishwasher {
    fn info(&self) -> &EntityInfo {
        &self.info
    }

    fn update_from_device(&mut self, endpoint: &MatterEndpoint<'_>) {
        let read = |attr: OperationalStateAttribute| {
            endpoint
                .get_matter_attribute_value(attr.id())
                .unwrap_or(&AttributeValue::Null)
        };

        self.available = endpoint.available();
        self.operational_state = OperationalState::decode(read(OperationalStateAttribute::OperationalState));
        if let Err(e) = &self.operational_state {
            warn!("{}: {}", self.info.unique_id(), e);
        }

        self.current_phase = operational_state::current_phase_name(
            read(OperationalStateAttribute::PhaseList),
            read(OperationalStateAttribute::CurrentPhase),
        );
        self.countdown_time = read(OperationalStateAttribute::CountdownTime).as_int();
        self.operational_error =
            operational_state::error_state(read(OperationalStateAttribute::OperationalError));
        self.accepted_commands =
            operational_state::accepted_commands(read(OperationalStateAttribute::AcceptedCommandList));

        debug!(
            "{}: state={:?} phase={:?} countdown={:?}",
            self.info.unique_id(),
            self.operational_state,
            self.current_phase,
            self.countdown_time
        );
    }

    fn state(&self) -> EntityState {
        let Ok(operational_state) = &self.operational_state else {
            return EntityState::unknown(false);
        };

        let mut state = EntityState::unknown(self.available);
        state.state = operational_state.map(|s| StateValue::Text(s.to_string()));

        if let Some(phase) = &self.current_phase {
            state.attributes.insert("current_phase", serde_json::json!(phase));
        }
        if let Some(countdown) = self.countdown_time {
            state.attributes.insert("countdown_time", serde_json::json!(countdown));
        }
        match &self.operational_error {
            Some(Ok(ErrorState::NoError)) | None => {}
            Some(Ok(error)) => {
                let name: &str = error.as_ref();
                state.attributes.insert("operational_error", serde_json::json!(name));
            }
            Some(Err(code)) => {
                state.attributes.insert("operational_error", serde_json::json!(code));
            }
        }
        if !self.accepted_commands.is_empty() {
            state.attributes.insert(
                "supported_commands",
                serde_json::json!(self.accepted_commands),
            );
        }
        state
    }
}

/// Discovery schemas for the dishwasher platform.
pub fn discovery_schemas() -> Vec<DiscoverySchema> {
    vec![DiscoverySchema {
        platform: Platform::Dishwasher,
        entity_description: EntityDescription::new("MatterDishwasher")
            .with_translation_key("dishwasher"),
        entity_class: EntityClass::Dishwasher,
        required_attributes: vec![
            OperationalStateAttribute::PhaseList.id(),
            OperationalStateAttribute::CurrentPhase.id(),
            OperationalStateAttribute::OperationalState.id(),
            OperationalStateAttribute::OperationalStateList.id(),
        ],
        optional_attributes: vec![
            OperationalStateAttribute::FeatureMap.id(),
            OperationalStateAttribute::GeneratedCommandList.id(),
            OperationalStateAttribute::AcceptedCommandList.id(),
            OperationalStateAttribute::CountdownTime.id(),
            OperationalStateAttribute::OperationalError.id(),
        ],
        device_type: Some(DEV_TYPE_DISHWASHER),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matter::{AttributeId, MatterNode};

    fn dishwasher_node(state: AttributeValue) -> MatterNode {
        let on_ep = |attr: OperationalStateAttribute| attr.id().on_endpoint(1);
        MatterNode::new(9)
            .with_attribute(
                AttributeId::new(0x001D, 0).on_endpoint(1),
                serde_json::from_str::<AttributeValue>(r#"[{"0": 117, "1": 1}]"#).unwrap(),
            )
            .with_attribute(
                on_ep(OperationalStateAttribute::PhaseList),
                serde_json::from_str::<AttributeValue>(r#"["prewash", "wash", "dry"]"#).unwrap(),
            )
            .with_attribute(on_ep(OperationalStateAttribute::CurrentPhase), AttributeValue::Int(1))
            .with_attribute(
                on_ep(OperationalStateAttribute::OperationalStateList),
                AttributeValue::List(vec![]),
            )
            .with_attribute(on_ep(OperationalStateAttribute::OperationalState), state)
    }

    fn dishwasher_for(node: &MatterNode) -> Dishwasher {
        let schemas = discovery_schemas();
        let ep = node.endpoint(1).unwrap();
        assert!(schemas[0].matches(&ep));
        let mut dishwasher = Dishwasher::new(EntityInfo::new(&schemas[0], &ep).unwrap());
        dishwasher.update_from_device(&ep);
        dishwasher
    }

    #[test]
    fn test_paused() {
        let node = dishwasher_node(AttributeValue::Int(2));
        let dishwasher = dishwasher_for(&node);
        assert_eq!(dishwasher.operational_state(), Ok(Some(OperationalState::Paused)));
        assert_eq!(dishwasher.current_phase(), Some("wash"));

        let state = dishwasher.state();
        assert!(state.available);
        assert_eq!(state.state, Some(StateValue::Text("paused".into())));
        assert_eq!(state.attributes.get("current_phase"), Some(&serde_json::json!("wash")));
    }

    #[test]
    fn test_out_of_range_state_is_unavailable() {
        let node = dishwasher_node(AttributeValue::Int(9));
        let dishwasher = dishwasher_for(&node);
        assert!(dishwasher.operational_state().is_err());
        assert_eq!(dishwasher.state(), EntityState::unknown(false));
    }

    #[test]
    fn test_recovers_after_valid_state() {
        let mut node = dishwasher_node(AttributeValue::Int(9));
        let mut dishwasher = dishwasher_for(&node);
        node.set_attribute_value(
            OperationalStateAttribute::OperationalState.id().on_endpoint(1),
            AttributeValue::Int(1),
        );
        dishwasher.update_from_device(&node.endpoint(1).unwrap());
        assert_eq!(dishwasher.state().state, Some(StateValue::Text("running".into())));
        assert!(dishwasher.state().available);
    }

    #[test]
    fn test_null_state_is_unknown() {
        let node = dishwasher_node(AttributeValue::Null);
        let dishwasher = dishwasher_for(&node);
        let state = dishwasher.state();
        assert!(state.available);
        assert_eq!(state.state, None);
    }

    #[test]
    fn test_optional_attributes() {
        let node = dishwasher_node(AttributeValue::Int(1))
            .with_attribute(OperationalStateAttribute::CountdownTime.id().on_endpoint(1), AttributeValue::Int(1800))
            .with_attribute(
                OperationalStateAttribute::AcceptedCommandList.id().on_endpoint(1),
                serde_json::from_str::<AttributeValue>("[0, 1, 2, 3]").unwrap(),
            )
            .with_attribute(
                OperationalStateAttribute::OperationalError.id().on_endpoint(1),
                serde_json::from_str::<AttributeValue>(r#"{"0": 2}"#).unwrap(),
            );
        let state = dishwasher_for(&node).state();
        assert_eq!(state.attributes.get("countdown_time"), Some(&serde_json::json!(1800)));
        assert_eq!(
            state.attributes.get("supported_commands"),
            Some(&serde_json::json!(["pause", "stop", "start", "resume"]))
        );
        assert_eq!(
            state.attributes.get("operational_error"),
            Some(&serde_json::json!("unable_to_complete_operation"))
        );
    }

    #[test]
    fn test_schema_attribute_order() {
        let schemas = discovery_schemas();
        assert_eq!(schemas[0].primary_attribute(), Some(OperationalStateAttribute::PhaseList.id()));
        let watched = schemas[0].watched_attributes();
        assert_eq!(watched.len(), 9);
        assert_eq!(watched[2], OperationalStateAttribute::OperationalState.id());
    }

    #[test]
    fn test_missing_optional_attributes_do_not_matter() {
        let node = dishwasher_node(AttributeValue::Int(0));
        let state = dishwasher_for(&node).state();
        assert_eq!(state.state, Some(StateValue::Text("stopped".into())));
        assert!(!state.attributes.contains_key("countdown_time"));
        assert!(!state.attributes.contains_key("supported_commands"));
        assert!(!state.attributes.contains_key("operational_error"));
    }
}
