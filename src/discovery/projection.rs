//! Attribute projection: raw enum codes to platform values.
//!
//! Each projection is a fixed `(code, value)` table plus an explicit
//! fallback. Protocol revisions may add enum codes a table predates, so an
//! unknown code projects to "absent" instead of failing.

use crate::entity::StateValue;
use crate::matter::AttributeValue;
use crate::matter::clusters::smoke_co_alarm::AlarmState;

/// Value conversion attached to an entity description.
pub type Projection = fn(&AttributeValue) -> Option<StateValue>;

/// Project a raw attribute value through an enum table.
///
/// The null sentinel, non-integer values and codes missing from the table
/// all yield `None`. Pure: the same input always gives the same output.
pub fn project<T: Clone>(raw: &AttributeValue, table: &[(i64, T)]) -> Option<T> {
    let code = match raw {
        AttributeValue::Null => return None,
        AttributeValue::Int(code) => *code,
        _ => return None,
    };

    table
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, value)| value.clone())
}

/// SmokeState to "problem detected".
pub const SMOKE_STATE_TABLE: &[(i64, bool)] = &[
    (AlarmState::Normal as i64, true),
    (AlarmState::Warning as i64, true),
    (AlarmState::Critical as i64, false),
];

/// COState to "problem detected".
pub const CO_STATE_TABLE: &[(i64, bool)] = &[
    (AlarmState::Normal as i64, true),
    (AlarmState::Warning as i64, true),
    (AlarmState::Critical as i64, false),
];

pub fn smoke_state_to_ha(raw: &AttributeValue) -> Option<StateValue> {
    project(raw, SMOKE_STATE_TABLE).map(StateValue::Bool)
}

pub fn co_state_to_ha(raw: &AttributeValue) -> Option<StateValue> {
    project(raw, CO_STATE_TABLE).map(StateValue::Bool)
}
