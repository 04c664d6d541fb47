//! Item status resolution.
//!
//! Items come back from the source in two row shapes: the full row with
//! shelving and copy data, and a brief row carrying just enough for an
//! availability answer. Both normalize into [`Item`], with the columns a
//! brief fetch never sees left as `None`.
//!
//! Items whose every status falls in the terminal exclusion set never
//! reach this module: the source contract omits their ids and answers
//! `None` for their rows (see [`crate::source::EXCLUDED_ITEM_STATUSES`]).

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::ids::{HoldingId, ItemId};
use crate::source::{BriefItemRow, ItemRow, SourceConnection};

/// A normalized circulation item.
///
/// Serialization keeps the legacy wire names (`enum` for enumeration) and
/// drops the columns a brief fetch leaves unpopulated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Item identifier.
    pub id: ItemId,
    /// Status description for the item's current status.
    pub status: String,
    /// Whether the item is on course reserve.
    pub on_reserve: bool,
    /// Temporary location code, when shelved away from home.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_location: Option<String>,
    /// Permanent location code. `None` on brief fetches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perm_location: Option<String>,
    /// Enumeration caption. `None` on brief fetches or unnumbered items.
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enumeration: Option<String>,
    /// Chronology caption.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chronology: Option<String>,
    /// Copy number within the holding. `None` on brief fetches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copy_number: Option<u32>,
    /// Sequence number ranking the item within its holding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_sequence_number: Option<u32>,
    /// Date the current status was applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_date: Option<NaiveDate>,
    /// Barcode, when one is attached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Item {
            id: row.item_id,
            status: row.status,
            on_reserve: row.on_reserve == "Y",
            temp_location: row.temp_location,
            perm_location: Some(row.perm_location),
            enumeration: row.enumeration,
            chronology: row.chronology,
            copy_number: Some(row.copy_number),
            item_sequence_number: Some(row.item_sequence_number),
            status_date: row.status_date,
            barcode: row.barcode,
        }
    }
}

impl From<BriefItemRow> for Item {
    fn from(row: BriefItemRow) -> Self {
        Item {
            id: row.item_id,
            status: row.status,
            on_reserve: row.on_reserve == "Y",
            temp_location: row.temp_location,
            perm_location: None,
            enumeration: None,
            chronology: None,
            copy_number: None,
            item_sequence_number: None,
            status_date: None,
            barcode: None,
        }
    }
}

/// Fetches the full row for one item. `None` when the item does not exist
/// or is status-excluded.
pub fn full_item(conn: &mut impl SourceConnection, item: ItemId) -> Result<Option<Item>> {
    Ok(conn.full_item_row(item)?.map(Item::from))
}

/// Fetches the brief row for one item.
pub fn brief_item(conn: &mut impl SourceConnection, item: ItemId) -> Result<Option<Item>> {
    Ok(conn.brief_item_row(item)?.map(Item::from))
}

/// Fetches full items for every id attached to the holding, in the
/// source's relevance order (descending sequence number).
pub fn items_for_holding(
    conn: &mut impl SourceConnection,
    holding: HoldingId,
) -> Result<Vec<Item>> {
    let ids = conn.item_ids(holding)?;
    let mut items = Vec::with_capacity(ids.len());
    for id in ids {
        match conn.full_item_row(id)? {
            Some(row) => items.push(Item::from(row)),
            // The id list and the row fetch disagree on exclusion
            None => debug!(%holding, item = %id, "item id listed but row absent"),
        }
    }
    Ok(items)
}

/// The status vocabulary: status code to description, in source order.
pub fn item_statuses(conn: &mut impl SourceConnection) -> Result<IndexMap<u16, String>> {
    let mut statuses = IndexMap::new();
    for row in conn.status_rows()? {
        statuses.insert(row.code, row.description);
    }
    Ok(statuses)
}
