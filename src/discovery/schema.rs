//! Discovery schema records.
//!
//! A schema is plain data: which platform it feeds, which attributes an
//! endpoint must (and may) expose, an optional device-type constraint, and
//! the entity class plus description to instantiate on a match.

use super::projection::Projection;
use crate::entity::EntityClass;
use crate::error::{Error, Result};
use crate::matter::{AttributeId, DeviceType, MatterEndpoint};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Host platform an entity is announced on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Platform {
    BinarySensor,
    Dishwasher,
}

/// Device class hint for the host framework's UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DeviceClass {
    Smoke,
    CarbonMonoxide,
}

/// Static metadata attached one-to-one with a discovery schema.
#[derive(Debug, Clone, Copy)]
pub struct EntityDescription {
    pub key: &'static str,
    pub translation_key: Option<&'static str>,
    pub device_class: Option<DeviceClass>,
    pub measurement_to_ha: Option<Projection>,
}

impl EntityDescription {
    pub const fn new(key: &'static str) -> Self {
        Self {
            key,
            translation_key: None,
            device_class: None,
            measurement_to_ha: None,
        }
    }

    pub const fn with_translation_key(mut self, translation_key: &'static str) -> Self {
        self.translation_key = Some(translation_key);
        self
    }

    pub const fn with_device_class(mut self, device_class: DeviceClass) -> Self {
        self.device_class = Some(device_class);
        self
    }

    pub const fn with_measurement_to_ha(mut self, projection: Projection) -> Self {
        self.measurement_to_ha = Some(projection);
        self
    }
}

/// Rule mapping an endpoint's attribute signature to an entity class.
#[derive(Debug, Clone)]
pub struct DiscoverySchema {
    pub platform: Platform,
    pub entity_description: EntityDescription,
    pub entity_class: EntityClass,
    /// Must all be present on the endpoint. The first one is the primary
    /// attribute the entity reports.
    pub required_attributes: Vec<AttributeId>,
    /// Watched for updates when present, never needed for a match.
    pub optional_attributes: Vec<AttributeId>,
    pub device_type: Option<DeviceType>,
}

impl DiscoverySchema {
    /// Reject schemas that could match every endpoint.
    pub fn validate(&self) -> Result<()> {
        if self.required_attributes.is_empty() {
            return Err(Error::InvalidSchema(format!(
                "{}: required attributes must not be empty",
                self.entity_description.key
            )));
        }
        Ok(())
    }

    pub fn primary_attribute(&self) -> Option<AttributeId> {
        self.required_attributes.first().copied()
    }

    /// Required plus optional attributes, without duplicates, in declaration
    /// order.
    pub fn watched_attributes(&self) -> Vec<AttributeId> {
        let mut watched: Vec<AttributeId> = Vec::new();
        for attr in self
            .required_attributes
            .iter()
            .chain(self.optional_attributes.iter())
        {
            if !watched.contains(attr) {
                watched.push(*attr);
            }
        }
        watched
    }

    /// Whether this schema accepts the endpoint: every required attribute is
    /// exposed and, if a device type is declared, the endpoint carries it.
    pub fn matches(&self, endpoint: &MatterEndpoint<'_>) -> bool {
        if let Some(device_type) = &self.device_type {
            if !endpoint.has_device_type(device_type) {
                return false;
            }
        }
        self.required_attributes
            .iter()
            .all(|attr| endpoint.has_attribute(*attr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matter::{AttributeValue, MatterNode};
    use crate::matter::device_types::DEV_TYPE_SMOKE_CO_ALARM;

    fn schema(required: Vec<AttributeId>, device_type: Option<DeviceType>) -> DiscoverySchema {
        DiscoverySchema {
            platform: Platform::BinarySensor,
            entity_description: EntityDescription::new("Test"),
            entity_class: EntityClass::SmokeCoSensor,
            required_attributes: required,
            optional_attributes: vec![],
            device_type,
        }
    }

    #[test]
    fn test_validate_rejects_empty_required() {
        let err = schema(vec![], None).validate().unwrap_err();
        assert!(matches!(err, Error::InvalidSchema(_)));
        assert!(schema(vec![AttributeId::new(1, 1)], None).validate().is_ok());
    }

    #[test]
    fn test_watched_attributes_dedup() {
        let a = AttributeId::new(0x60, 4);
        let b = AttributeId::new(0x60, 0);
        let mut s = schema(vec![a, b, a], None);
        s.optional_attributes = vec![b, AttributeId::new(0x60, 2)];
        assert_eq!(
            s.watched_attributes(),
            vec![a, b, AttributeId::new(0x60, 2)]
        );
        assert_eq!(s.primary_attribute(), Some(a));
    }

    #[test]
    fn test_matches_device_type_constraint() {
        let attr = AttributeId::new(0x5C, 1);
        let node = MatterNode::new(1).with_attribute(attr.on_endpoint(1), AttributeValue::Int(0));
        let ep = node.endpoint(1).unwrap();

        assert!(schema(vec![attr], None).matches(&ep));
        // No DeviceTypeList on the endpoint, so a constrained schema fails
        assert!(!schema(vec![attr], Some(DEV_TYPE_SMOKE_CO_ALARM)).matches(&ep));
        assert!(!schema(vec![attr, AttributeId::new(0x5C, 2)], None).matches(&ep));
    }

    #[test]
    fn test_platform_names() {
        assert_eq!(Platform::BinarySensor.to_string(), "binary_sensor");
        assert_eq!("dishwasher".parse::<Platform>().unwrap(), Platform::Dishwasher);
        assert!("climate".parse::<Platform>().is_err());
    }
}
