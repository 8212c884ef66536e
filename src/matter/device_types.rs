//! Device type definitions used by the discovery schemas.
//!
//! Device types are read from the Descriptor cluster of each endpoint and
//! follow the Matter device library specification.

use serde::{Deserialize, Serialize};

/// A Matter device type as advertised in an endpoint's DeviceTypeList.
///
/// Only `dtype` takes part in schema matching; the revision is kept for
/// logging and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceType {
    pub dtype: u32,
    pub drev: u16,
}

impl DeviceType {
    pub const fn new(dtype: u32, drev: u16) -> Self {
        Self { dtype, drev }
    }

    /// Same device type, regardless of revision.
    pub const fn is(&self, other: &DeviceType) -> bool {
        self.dtype == other.dtype
    }

    /// Human readable name for known device types.
    pub fn name(&self) -> Option<&'static str> {
        KNOWN_DEVICE_TYPES
            .iter()
            .find(|(dt, _)| dt.is(self))
            .map(|(_, name)| *name)
    }
}

/// Matter Root Node device type
///
/// Device Type ID: 0x0016 (22 decimal)
/// Device Type Revision: 1
pub const DEV_TYPE_ROOT_NODE: DeviceType = DeviceType {
    dtype: 0x0016,
    drev: 1,
};

/// Matter Dishwasher device type
///
/// Device Type ID: 0x0075 (117 decimal)
/// Device Type Revision: 1
///
/// Required clusters:
/// - OperationalState (0x0060)
/// - Descriptor (standard)
pub const DEV_TYPE_DISHWASHER: DeviceType = DeviceType {
    dtype: 0x0075,
    drev: 1,
};

/// Matter Smoke CO Alarm device type
///
/// Device Type ID: 0x0076 (118 decimal)
/// Device Type Revision: 1
///
/// Required clusters:
/// - SmokeCoAlarm (0x005C)
/// - Descriptor (standard)
pub const DEV_TYPE_SMOKE_CO_ALARM: DeviceType = DeviceType {
    dtype: 0x0076,
    drev: 1,
};

const KNOWN_DEVICE_TYPES: &[(DeviceType, &str)] = &[
    (DEV_TYPE_ROOT_NODE, "RootNode"),
    (DEV_TYPE_DISHWASHER, "Dishwasher"),
    (DEV_TYPE_SMOKE_CO_ALARM, "SmokeCoAlarm"),
];
