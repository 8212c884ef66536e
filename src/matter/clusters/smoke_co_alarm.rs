//! SmokeCoAlarm cluster (0x005C).
//!
//! Smoke and carbon monoxide alarms report each sensed hazard as an
//! AlarmStateEnum attribute (Normal / Warning / Critical).

use super::super::attribute::AttributeId;
use super::{capabilities_from_bitmap, global};
use serde::Serialize;
use strum::{AsRefStr, FromRepr};

/// Matter Cluster ID for SmokeCoAlarm
pub const CLUSTER_ID: u32 = 0x005C;

/// Feature flags for SmokeCoAlarm
pub mod features {
    /// Smoke Alarm feature (SMOKE)
    pub const SMOKE_ALARM: u32 = 0x01;
    /// CO Alarm feature (CO)
    pub const CO_ALARM: u32 = 0x02;
}

/// Attribute IDs for the SmokeCoAlarm cluster
#[derive(Clone, Copy, Debug, Eq, PartialEq, FromRepr)]
#[repr(u32)]
pub enum SmokeCoAlarmAttribute {
    ExpressedState = 0x0000,
    SmokeState = 0x0001,
    COState = 0x0002,
    BatteryAlert = 0x0003,
    DeviceMuted = 0x0004,
    TestInProgress = 0x0005,
    HardwareFaultAlert = 0x0006,
    EndOfServiceAlert = 0x0007,
    InterconnectSmokeAlarm = 0x0008,
    InterconnectCOAlarm = 0x0009,
    ContaminationState = 0x000A,
    SmokeSensitivityLevel = 0x000B,
    ExpiryDate = 0x000C,
    FeatureMap = global::FEATURE_MAP,
}

impl SmokeCoAlarmAttribute {
    pub const fn id(self) -> AttributeId {
        AttributeId::new(CLUSTER_ID, self as u32)
    }
}

/// AlarmStateEnum shared by SmokeState, COState, BatteryAlert and the
/// interconnect attributes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, FromRepr)]
#[repr(u8)]
pub enum AlarmState {
    Normal = 0x00,
    Warning = 0x01,
    Critical = 0x02,
}

/// Hazards a SmokeCoAlarm server can sense, from its FeatureMap.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AlarmKind {
    Smoke,
    CarbonMonoxide,
}

const FEATURE_ALARMS: &[(u32, AlarmKind)] = &[
    (features::SMOKE_ALARM, AlarmKind::Smoke),
    (features::CO_ALARM, AlarmKind::CarbonMonoxide),
];

/// Hazards advertised by a FeatureMap value.
pub fn supported_alarms(feature_map: u32) -> Vec<AlarmKind> {
    capabilities_from_bitmap(feature_map, FEATURE_ALARMS)
}
