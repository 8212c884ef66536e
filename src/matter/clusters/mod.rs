//! Matter cluster identifiers and enumerations consumed by the entity mapping.
//!
//! Only the read side is modelled here: attribute ids, enum codes and the
//! decode rules for each. Encoding commands is the protocol client's job.

use super::attribute::AttributeValue;

pub mod descriptor;
pub mod operational_state;
pub mod smoke_co_alarm;

/// Attribute ids shared by every cluster.
pub mod global {
    /// List of command ids the server generates (responses)
    pub const GENERATED_COMMAND_LIST: u32 = 0xFFF8;
    /// List of command ids the server accepts
    pub const ACCEPTED_COMMAND_LIST: u32 = 0xFFF9;
    /// List of attribute ids the server supports
    pub const ATTRIBUTE_LIST: u32 = 0xFFFB;
    /// Bitmap of optional cluster features
    pub const FEATURE_MAP: u32 = 0xFFFC;
    /// Cluster revision
    pub const CLUSTER_REVISION: u32 = 0xFFFD;
}

/// Expand a feature bitmap into the capabilities whose bit is set.
///
/// `table` pairs each feature bit with the capability it enables; the
/// result keeps table order so callers get a stable list.
pub fn capabilities_from_bitmap<T: Copy>(bitmap: u32, table: &[(u32, T)]) -> Vec<T> {
    table
        .iter()
        .filter(|(bit, _)| bitmap & bit != 0)
        .map(|(_, capability)| *capability)
        .collect()
}

/// Read a FeatureMap attribute value. Anything but a non-negative integer
/// that fits in 32 bits reads as "no features".
pub fn feature_map(value: Option<&AttributeValue>) -> u32 {
    value
        .and_then(AttributeValue::as_int)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq)]
    enum Cap {
        A,
        B,
        C,
    }

    #[test]
    fn test_capabilities_from_bitmap() {
        let table = [(0x1, Cap::A), (0x2, Cap::B), (0x8, Cap::C)];
        assert_eq!(capabilities_from_bitmap(0b1001, &table), vec![Cap::A, Cap::C]);
        assert_eq!(capabilities_from_bitmap(0, &table), vec![]);
        // Unknown bits are ignored
        assert_eq!(capabilities_from_bitmap(0x10 | 0x2, &table), vec![Cap::B]);
    }

    #[test]
    fn test_feature_map() {
        assert_eq!(feature_map(Some(&AttributeValue::Int(3))), 3);
        assert_eq!(feature_map(Some(&AttributeValue::Null)), 0);
        assert_eq!(feature_map(Some(&AttributeValue::Int(-1))), 0);
        assert_eq!(feature_map(None), 0);
    }
}
