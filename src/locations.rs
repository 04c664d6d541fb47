//! Location metadata and limited-access classification.
//!
//! Shelving locations carry delivery policy alongside their display data.
//! A location is "limited access" when every item there must be requested
//! for delivery rather than fetched from the shelf; the classifier drives
//! the "Limited" availability status.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::source::{LocationRow, SourceConnection};

/// Normalized location metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Location identifier.
    pub location_id: u32,
    /// Location code, as it appears in holding 852 `$b` subfields.
    pub code: String,
    /// Display name from the shelving-location table.
    pub display_name: String,
    /// Whether the location is suppressed from public discovery.
    pub suppressed: bool,
    /// Whether every item here must be requested for delivery.
    pub always_requestable: bool,
    /// Public label from the delivery-policy registry.
    pub label: String,
}

impl From<LocationRow> for Location {
    fn from(row: LocationRow) -> Self {
        Location {
            location_id: row.location_id,
            code: row.code,
            display_name: row.display_name,
            suppressed: row.suppressed == "Y",
            always_requestable: row.always_requestable,
            label: row.label,
        }
    }
}

/// The full location table keyed by location id, in source order.
pub fn all_locations(conn: &mut impl SourceConnection) -> Result<IndexMap<u32, Location>> {
    let mut locations = IndexMap::new();
    for row in conn.location_rows()? {
        locations.insert(row.location_id, Location::from(row));
    }
    Ok(locations)
}

/// Whether a location code names a limited-access location.
///
/// Limited iff the location is always-requestable or its label mentions
/// `Reference` (exact case). Unknown codes are full access.
pub fn is_limited_access(conn: &mut impl SourceConnection, code: &str) -> Result<bool> {
    Ok(conn.location_row(code)?.is_some_and(|row| limited(&row)))
}

fn limited(row: &LocationRow) -> bool {
    row.always_requestable || row.label.contains("Reference")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(code: &str, always_requestable: bool, label: &str) -> LocationRow {
        LocationRow {
            location_id: 7,
            code: code.to_string(),
            display_name: code.to_string(),
            suppressed: "N".to_string(),
            always_requestable,
            label: label.to_string(),
        }
    }

    #[test]
    fn test_always_requestable_is_limited() {
        assert!(limited(&row("num", true, "Numismatics Collection")));
    }

    #[test]
    fn test_reference_label_is_limited() {
        assert!(limited(&row("fref", false, "Firestone Library - Reference")));
    }

    #[test]
    fn test_reference_match_is_case_sensitive() {
        assert!(!limited(&row("x", false, "reference shelf")));
    }

    #[test]
    fn test_ordinary_stacks_are_full_access() {
        assert!(!limited(&row("f", false, "Firestone Library")));
    }

    #[test]
    fn test_suppression_flag_normalizes() {
        let mut raw = row("sup", false, "Hidden");
        raw.suppressed = "Y".to_string();
        assert!(Location::from(raw).suppressed);
    }
}
