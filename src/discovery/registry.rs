//! Ordered schema registry.
//!
//! Schemas are scanned in declaration order and the first one that accepts
//! an endpoint wins. Overlapping schemas are expected (a single-attribute
//! sensor schema next to a richer multi-attribute one); order is what makes
//! the outcome deterministic.

use super::schema::{DiscoverySchema, Platform};
use crate::entity::{binary_sensor, dishwasher};
use crate::error::Result;
use crate::matter::{AttributeId, MatterEndpoint};
use log::debug;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::LazyLock;
use strum::{Display, EnumString};

/// Built-in schemas, in match order. Built once, never mutated.
static DISCOVERY_SCHEMAS: LazyLock<Vec<DiscoverySchema>> = LazyLock::new(|| {
    let mut schemas = binary_sensor::discovery_schemas();
    schemas.extend(dishwasher::discovery_schemas());
    schemas
});

/// How many entities an endpoint may produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DiscoveryMode {
    /// The earliest matching schema only.
    #[default]
    FirstMatch,
    /// Every matching schema whose primary attribute is not already claimed
    /// by an earlier match on the same endpoint.
    AllMatches,
}

#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: Cow<'static, [DiscoverySchema]>,
    disabled_platforms: Vec<Platform>,
}

impl SchemaRegistry {
    /// Build a registry from an explicit schema list.
    pub fn new(schemas: Vec<DiscoverySchema>) -> Result<Self> {
        for schema in &schemas {
            schema.validate()?;
        }
        Ok(Self {
            schemas: Cow::Owned(schemas),
            disabled_platforms: Vec::new(),
        })
    }

    /// Registry over the built-in smoke/CO and dishwasher schemas.
    pub fn builtin() -> Self {
        Self {
            schemas: Cow::Borrowed(DISCOVERY_SCHEMAS.as_slice()),
            disabled_platforms: Vec::new(),
        }
    }

    /// Skip every schema feeding one of these platforms.
    pub fn with_disabled_platforms(mut self, platforms: impl IntoIterator<Item = Platform>) -> Self {
        self.disabled_platforms.extend(platforms);
        self
    }

    /// Enabled schemas, in match order.
    pub fn schemas(&self) -> impl Iterator<Item = &DiscoverySchema> {
        self.schemas
            .iter()
            .filter(|s| !self.disabled_platforms.contains(&s.platform))
    }

    pub fn len(&self) -> usize {
        self.schemas().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The earliest schema accepting the endpoint, or `None` for an
    /// unsupported endpoint.
    pub fn match_endpoint(&self, endpoint: &MatterEndpoint<'_>) -> Option<&DiscoverySchema> {
        self.matches(endpoint).next()
    }

    /// Every schema accepting the endpoint, in match order.
    pub fn matches<'r, 'e>(
        &'r self,
        endpoint: &'e MatterEndpoint<'_>,
    ) -> impl Iterator<Item = &'r DiscoverySchema> {
        self.schemas().filter(move |s| s.matches(endpoint))
    }

    /// Schemas to instantiate for an endpoint under the given mode.
    pub fn discover(&self, endpoint: &MatterEndpoint<'_>, mode: DiscoveryMode) -> Vec<&DiscoverySchema> {
        let found: Vec<&DiscoverySchema> = match mode {
            DiscoveryMode::FirstMatch => self.match_endpoint(endpoint).into_iter().collect(),
            DiscoveryMode::AllMatches => {
                let mut claimed: Vec<AttributeId> = Vec::new();
                let mut found = Vec::new();
                for schema in self.matches(endpoint) {
                    let Some(primary) = schema.primary_attribute() else {
                        continue;
                    };
                    if claimed.contains(&primary) {
                        continue;
                    }
                    claimed.push(primary);
                    found.push(schema);
                }
                found
            }
        };

        if found.is_empty() {
            debug!(
                "Node {} endpoint {}: no discovery schema matched",
                endpoint.node_id(),
                endpoint.endpoint_id()
            );
        }
        found
    }
}
