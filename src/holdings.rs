//! Field extraction for holding records.
//!
//! Holding records carry their shelving data in a handful of fields: 852
//! (location and call number) and the 866 run of textual holdings notes.
//! [`HoldingFields`] names the accessors the rest of the engine uses so
//! that the field/subfield conventions live in one place.

use crate::error::{CatalogError, Result};
use crate::ids::HoldingId;
use crate::record::Record;

/// Accessors for the holding-record fields the engine relies on.
pub trait HoldingFields {
    /// The holding id from control field 001.
    ///
    /// # Errors
    ///
    /// `MissingField` when the record has no 001, `InvalidRecord` when the
    /// 001 value is not numeric.
    fn holding_id(&self) -> Result<HoldingId>;

    /// The shelving location code: first `$b` of the first 852 field.
    fn location_code(&self) -> Option<&str>;

    /// Call number assembled from the first 852 field's `$h` and `$i`
    /// subfields, joined with single spaces in field order. `None` when
    /// the record carries no call-number subfields.
    fn call_number(&self) -> Option<String>;

    /// Public holdings notes: for each 866 field, the first `$a` (textual
    /// holdings) followed by the first `$z` (public note), each when
    /// present.
    fn holdings_notes(&self) -> Vec<String>;
}

impl HoldingFields for Record {
    fn holding_id(&self) -> Result<HoldingId> {
        let raw = self.control_number().ok_or_else(|| {
            CatalogError::MissingField("holding record has no 001 control number".to_string())
        })?;
        raw.parse().map_err(|_| {
            CatalogError::InvalidRecord(format!("holding control number {raw:?} is not numeric"))
        })
    }

    fn location_code(&self) -> Option<&str> {
        self.get_field("852")?.get_subfield('b')
    }

    fn call_number(&self) -> Option<String> {
        let parts = self.get_field("852")?.get_subfields(&['h', 'i']);
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }

    fn holdings_notes(&self) -> Vec<String> {
        let mut notes = Vec::new();
        for field in self.fields_by_tag("866") {
            if let Some(text_holdings) = field.get_subfield('a') {
                notes.push(text_holdings.to_string());
            }
            if let Some(public_note) = field.get_subfield('z') {
                notes.push(public_note.to_string());
            }
        }
        notes
    }
}
