//! OperationalState cluster (0x0060).
//!
//! Lets a controller monitor (and, where supported, change) the run state of
//! any appliance whose operation is a state machine: dishwashers, laundry
//! washers, ovens. The common states below are fixed by the cluster; derived
//! clusters may only extend them with explicitly declared states, so an
//! unknown code is a decode error rather than a pass-through.

use super::super::attribute::{AttributeId, AttributeValue};
use super::global;
use crate::error::DecodeError;
use serde::Serialize;
use strum::{AsRefStr, Display, FromRepr};

/// Matter Cluster ID for OperationalState
pub const CLUSTER_ID: u32 = 0x0060;

/// Attribute IDs for the OperationalState cluster
#[derive(Clone, Copy, Debug, Eq, PartialEq, FromRepr)]
#[repr(u32)]
pub enum OperationalStateAttribute {
    /// Names of the phases the device goes through for the selected mode
    PhaseList = 0x0000,
    /// Index into PhaseList of the phase being performed
    CurrentPhase = 0x0001,
    /// Estimated seconds until the operation completes
    CountdownTime = 0x0002,
    /// Operational states the device exposes
    OperationalStateList = 0x0003,
    /// Current operational state
    OperationalState = 0x0004,
    /// ErrorStateStruct describing the current error, if any
    OperationalError = 0x0005,
    GeneratedCommandList = global::GENERATED_COMMAND_LIST,
    AcceptedCommandList = global::ACCEPTED_COMMAND_LIST,
    FeatureMap = global::FEATURE_MAP,
}

impl OperationalStateAttribute {
    pub const fn id(self) -> AttributeId {
        AttributeId::new(CLUSTER_ID, self as u32)
    }
}

/// Common operational states.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, FromRepr, Display, AsRefStr, Serialize)]
#[repr(u8)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OperationalState {
    Stopped = 0x00,
    Running = 0x01,
    Paused = 0x02,
    Error = 0x03,
}

impl OperationalState {
    /// Decode an integer state code.
    pub fn from_code(code: i64) -> Result<Self, DecodeError> {
        u8::try_from(code)
            .ok()
            .and_then(Self::from_repr)
            .ok_or_else(|| DecodeError::new("OperationalState", code))
    }

    /// Decode a raw OperationalState attribute value.
    ///
    /// The null sentinel decodes to `Ok(None)`; integers outside the closed
    /// set and non-integer values fail.
    pub fn decode(value: &AttributeValue) -> Result<Option<Self>, DecodeError> {
        match value {
            AttributeValue::Null => Ok(None),
            AttributeValue::Int(code) => Self::from_code(*code).map(Some),
            other => Err(DecodeError::new("OperationalState", other)),
        }
    }
}

/// ErrorStateEnum carried in the OperationalError struct.
#[derive(Clone, Copy, Debug, Eq, PartialEq, FromRepr, AsRefStr)]
#[repr(u8)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorState {
    NoError = 0x00,
    UnableToStartOrResume = 0x01,
    UnableToCompleteOperation = 0x02,
    CommandInvalidInState = 0x03,
}

/// Read the error state id out of an OperationalError struct value.
///
/// Manufacturer-specific ids fall outside [`ErrorState`] and come back as
/// `Err(code)` so callers can still report them.
pub fn error_state(value: &AttributeValue) -> Option<Result<ErrorState, i64>> {
    let code = value.field(0)?.as_int()?;
    Some(
        u8::try_from(code)
            .ok()
            .and_then(ErrorState::from_repr)
            .ok_or(code),
    )
}

/// Commands of the OperationalState cluster.
#[derive(Clone, Copy, Debug, Eq, PartialEq, FromRepr, AsRefStr, Serialize)]
#[repr(u8)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OperationalCommand {
    Pause = 0x00,
    Stop = 0x01,
    Start = 0x02,
    Resume = 0x03,
    OperationalCommandResponse = 0x04,
}

/// Commands a server accepts, from its AcceptedCommandList.
///
/// Unknown command ids and response-only commands are left out.
pub fn accepted_commands(value: &AttributeValue) -> Vec<OperationalCommand> {
    value
        .as_list()
        .unwrap_or_default()
        .iter()
        .filter_map(AttributeValue::as_int)
        .filter_map(|id| u8::try_from(id).ok())
        .filter_map(OperationalCommand::from_repr)
        .filter(|cmd| *cmd != OperationalCommand::OperationalCommandResponse)
        .collect()
}

/// Name of the phase currently being performed.
///
/// A null PhaseList or CurrentPhase means the device does not expose
/// phases; an index past the end of the list is treated the same way.
pub fn current_phase_name(phase_list: &AttributeValue, current_phase: &AttributeValue) -> Option<String> {
    let index = usize::try_from(current_phase.as_int()?).ok()?;
    phase_list
        .as_list()?
        .get(index)?
        .as_str()
        .map(str::to_string)
}
