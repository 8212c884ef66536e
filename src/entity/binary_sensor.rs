//! Smoke and carbon monoxide binary sensors (SmokeCoAlarm cluster 0x005C).

use super::{EntityClass, EntityInfo, EntityState, MatterEntity, StateValue};
use crate::discovery::projection::{co_state_to_ha, smoke_state_to_ha};
use crate::discovery::{DeviceClass, DiscoverySchema, EntityDescription, Platform};
use crate::matter::clusters::feature_map;
use crate::matter::clusters::smoke_co_alarm::{self, AlarmKind, SmokeCoAlarmAttribute};
use crate::matter::{AttributeValue, MatterEndpoint};
use log::debug;

/// Binary sensor projecting an AlarmStateEnum attribute to "problem
/// detected".
pub struct SmokeCoSensor {
    info: EntityInfo,
    available: bool,
    is_on: Option<StateValue>,
    supported_alarms: Vec<AlarmKind>,
}

impl SmokeCoSensor {
    pub fn new(info: EntityInfo) -> Self {
        Self {
            info,
            available: true,
            is_on: None,
            supported_alarms: Vec::new(),
        }
    }

    pub fn is_on(&self) -> Option<bool> {
        self.is_on.as_ref().and_then(StateValue::as_bool)
    }
}

impl MatterEntity for SmokeCoSensor {
    fn info(&self) -> &EntityInfo {
        &self.info
    }

    fn update_from_device(&mut self, endpoint: &MatterEndpoint<'_>) {
        self.available = endpoint.available();

        let value = endpoint.get_matter_attribute_value(self.info.primary_attribute);
        self.is_on = match value {
            None | Some(AttributeValue::Null) => None,
            Some(raw) => match self.info.description.measurement_to_ha {
                Some(convert) => convert(raw),
                None => match raw {
                    AttributeValue::Bool(b) => Some(StateValue::Bool(*b)),
                    _ => None,
                },
            },
        };

        self.supported_alarms = smoke_co_alarm::supported_alarms(feature_map(
            endpoint.get_matter_attribute_value(SmokeCoAlarmAttribute::FeatureMap.id()),
        ));

        debug!(
            "{}: {} -> {:?}",
            self.info.unique_id(),
            value.map(ToString::to_string).unwrap_or_else(|| "missing".to_string()),
            self.is_on
        );
    }

    fn state(&self) -> EntityState {
        let mut state = EntityState::unknown(self.available);
        state.state = self.is_on.clone();
        if !self.supported_alarms.is_empty() {
            state.attributes.insert(
                "supported_alarms",
                serde_json::json!(self.supported_alarms),
            );
        }
        state
    }
}

/// Discovery schemas for the binary_sensor platform.
pub fn discovery_schemas() -> Vec<DiscoverySchema> {
    vec![
        DiscoverySchema {
            platform: Platform::BinarySensor,
            entity_description: EntityDescription::new("SmokeStateSensor")
                .with_device_class(DeviceClass::Smoke)
                .with_measurement_to_ha(smoke_state_to_ha),
            entity_class: EntityClass::SmokeCoSensor,
            required_attributes: vec![SmokeCoAlarmAttribute::SmokeState.id()],
            optional_attributes: vec![SmokeCoAlarmAttribute::FeatureMap.id()],
            device_type: None,
        },
        DiscoverySchema {
            platform: Platform::BinarySensor,
            entity_description: EntityDescription::new("COStateSensor")
                .with_device_class(DeviceClass::CarbonMonoxide)
                .with_measurement_to_ha(co_state_to_ha),
            entity_class: EntityClass::SmokeCoSensor,
            required_attributes: vec![SmokeCoAlarmAttribute::COState.id()],
            optional_attributes: vec![SmokeCoAlarmAttribute::FeatureMap.id()],
            device_type: None,
        },
    ]
}
