//! The availability decision engine.
//!
//! Availability answers "can a patron get this?" per holding without
//! fetching full item data. The decision is a prioritized chain: the
//! highest-ranked circulating item speaks for the holding; with no items,
//! acquisitions status, then electronic and limited-access shelving
//! classify the holding. [`full_holding_availability`] is the slower
//! per-item listing for a single holding.
//!
//! Status strings are the legacy vocabulary ("Not Charged", "Charged",
//! "On Shelf", "Online", "Limited", order messages), passed through
//! verbatim so downstream displays keep working.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::Result;
use crate::holdings::HoldingFields;
use crate::ids::{BibId, HoldingId, ItemId};
use crate::items::{self, Item};
use crate::locations;
use crate::orders;
use crate::record::Record;
use crate::retrieval;
use crate::source::SourceConnection;

/// How many holdings the short-form availability reports per bib.
const BRIEF_HOLDINGS_LIMIT: usize = 2;

/// Availability of one holding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingAvailability {
    /// Whether the holding has more than one circulating item.
    pub more_items: bool,
    /// The holding's shelving location code.
    pub location: String,
    /// Reserve location code, present when the deciding item is on
    /// course reserve and shelved at a temporary location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_reserve: Option<String>,
    /// The availability status message.
    pub status: String,
}

/// Availability of one item within a holding listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAvailability {
    /// Barcode, when one is attached.
    pub barcode: Option<String>,
    /// Item identifier.
    pub id: ItemId,
    /// Reserve location code, present when the item is on course reserve.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_reserve: Option<String>,
    /// Copy number. Reserve items always carry it; others only when it
    /// differs from 1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copy_number: Option<u32>,
    /// The availability status message.
    pub status: String,
    /// Enumeration caption, rendered `ENUM (CHRON)` when both are known.
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enumeration: Option<String>,
}

/// Short-form availability for a batch of bibs.
///
/// Reports the first [`BRIEF_HOLDINGS_LIMIT`] unsuppressed holdings of
/// each bib. A bib with no holdings maps to an empty holding map.
pub fn availability(
    conn: &mut impl SourceConnection,
    bibs: &[BibId],
) -> Result<IndexMap<BibId, IndexMap<HoldingId, HoldingAvailability>>> {
    let mut by_bib = IndexMap::new();
    for &bib in bibs {
        let holdings = retrieval::holding_records(conn, bib)?;
        let mut by_holding = IndexMap::new();
        for record in holdings.iter().take(BRIEF_HOLDINGS_LIMIT) {
            let (holding, entry) = holding_availability(conn, bib, record)?;
            by_holding.insert(holding, entry);
        }
        by_bib.insert(bib, by_holding);
    }
    Ok(by_bib)
}

/// Availability across every unsuppressed holding of a single bib.
pub fn full_availability(
    conn: &mut impl SourceConnection,
    bib: BibId,
) -> Result<IndexMap<HoldingId, HoldingAvailability>> {
    let mut by_holding = IndexMap::new();
    for record in retrieval::holding_records(conn, bib)? {
        let (holding, entry) = holding_availability(conn, bib, &record)?;
        by_holding.insert(holding, entry);
    }
    Ok(by_holding)
}

fn holding_availability(
    conn: &mut impl SourceConnection,
    bib: BibId,
    record: &Record,
) -> Result<(HoldingId, HoldingAvailability)> {
    let holding = record.holding_id()?;
    let location = match record.location_code() {
        Some(code) => code.to_string(),
        None => {
            debug!(%holding, "holding record has no 852 location");
            String::new()
        }
    };

    let item_ids = conn.item_ids(holding)?;
    let more_items = item_ids.len() > 1;

    let deciding_item = match item_ids.first() {
        Some(&item) => {
            let brief = items::brief_item(conn, item)?;
            if brief.is_none() {
                debug!(%holding, %item, "item id listed but row absent");
            }
            brief
        }
        None => None,
    };

    let mut on_reserve = None;
    let status = match deciding_item {
        Some(item) => {
            if item.on_reserve {
                // brief rows carry no permanent location to fall back on
                on_reserve = item.temp_location;
            }
            if locations::is_limited_access(conn, &location)? {
                "Limited".to_string()
            } else {
                item.status
            }
        }
        None => {
            if let Some(order) = orders::order_status(conn, bib)? {
                order
            } else if location.starts_with("elf") {
                "Online".to_string()
            } else if locations::is_limited_access(conn, &location)? {
                "Limited".to_string()
            } else {
                "On Shelf".to_string()
            }
        }
    };

    trace!(%bib, %holding, %status, "holding availability resolved");
    Ok((
        holding,
        HoldingAvailability {
            more_items,
            location,
            on_reserve,
            status,
        },
    ))
}

/// The per-item availability listing for one holding.
pub fn full_holding_availability(
    conn: &mut impl SourceConnection,
    holding: HoldingId,
) -> Result<Vec<ItemAvailability>> {
    let items = items::items_for_holding(conn, holding)?;
    let mut listing = Vec::with_capacity(items.len());
    for item in items {
        listing.push(item_availability(conn, item)?);
    }
    Ok(listing)
}

fn item_availability(conn: &mut impl SourceConnection, item: Item) -> Result<ItemAvailability> {
    let Item {
        id,
        status,
        on_reserve,
        temp_location,
        perm_location,
        enumeration,
        chronology,
        copy_number,
        barcode,
        ..
    } = item;

    let (status, reserve_location, copy_number) = if on_reserve {
        (status, temp_location.or(perm_location), copy_number)
    } else {
        let home = perm_location.as_deref().unwrap_or_default();
        let status = if locations::is_limited_access(conn, home)? {
            "Limited".to_string()
        } else {
            status
        };
        (status, None, copy_number.filter(|&n| n != 1))
    };

    let enumeration = enumeration.map(|mut caption| {
        if let Some(chronology) = chronology {
            caption.push_str(&format!(" ({chronology})"));
        }
        caption
    });

    Ok(ItemAvailability {
        barcode,
        id,
        on_reserve: reserve_location,
        copy_number,
        status,
        enumeration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_holding_availability_wire_shape() {
        let entry = HoldingAvailability {
            more_items: false,
            location: "f".to_string(),
            on_reserve: None,
            status: "Not Charged".to_string(),
        };

        // absent reserve vanishes and key order is stable
        assert_eq!(
            serde_json::to_string(&entry).unwrap(),
            r#"{"more_items":false,"location":"f","status":"Not Charged"}"#
        );
    }

    #[test]
    fn test_item_availability_wire_shape() {
        let entry = ItemAvailability {
            barcode: Some("32101024738938".to_string()),
            id: ItemId(36736),
            on_reserve: None,
            copy_number: None,
            status: "Charged".to_string(),
            enumeration: Some("v.24 (2011)".to_string()),
        };

        assert_eq!(
            serde_json::to_string(&entry).unwrap(),
            r#"{"barcode":"32101024738938","id":36736,"status":"Charged","enum":"v.24 (2011)"}"#
        );
    }
}
