//! Grouped item listings for a bibliographic record.
//!
//! The aggregation walks every unsuppressed holding of a bib, collects its
//! circulating items, and groups the results by shelving location code.
//! Titles with no circulating items at all fall back to a synthetic
//! `"order"` group holding the raw acquisitions lines, so consumers can
//! present on-order titles alongside held ones.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::holdings::HoldingFields;
use crate::ids::{BibId, HoldingId};
use crate::items::{self, Item};
use crate::orders::{self, Order};
use crate::retrieval;
use crate::source::SourceConnection;

/// One holding's contribution to a location group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingItems {
    /// The holding record id.
    pub holding_id: HoldingId,
    /// Call number from the holding's 852 field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_number: Option<String>,
    /// Public holdings notes from the 866 run.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub notes: Vec<String>,
    /// The holding's items, highest sequence number first.
    pub items: Vec<Item>,
}

/// The members of one location group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocationItems {
    /// Holdings shelved at this location.
    Holdings(Vec<HoldingItems>),
    /// Raw order lines, under the synthetic `"order"` key.
    Orders(Vec<Order>),
}

/// Items of a bib grouped by shelving location code.
///
/// Holdings sharing a location collect under one key; the location never
/// repeats inside the members. Holdings with no circulating items
/// contribute nothing. When *no* holding has items and order lines exist,
/// the single `"order"` group carries them instead.
pub fn items_for_bib(
    conn: &mut impl SourceConnection,
    bib: BibId,
) -> Result<IndexMap<String, LocationItems>> {
    let mut grouped: IndexMap<String, Vec<HoldingItems>> = IndexMap::new();

    for holding in retrieval::holding_records(conn, bib)? {
        let holding_id = holding.holding_id()?;
        let mut items = items::items_for_holding(conn, holding_id)?;
        if items.is_empty() {
            continue;
        }
        sort_by_descending_sequence(&mut items);

        let location = match holding.location_code() {
            Some(code) => code.to_string(),
            None => {
                debug!(%holding_id, "holding record has no 852 location");
                String::new()
            }
        };
        grouped.entry(location).or_default().push(HoldingItems {
            holding_id,
            call_number: holding.call_number(),
            notes: holding.holdings_notes(),
            items,
        });
    }

    let mut listing: IndexMap<String, LocationItems> = grouped
        .into_iter()
        .map(|(location, holdings)| (location, LocationItems::Holdings(holdings)))
        .collect();

    if listing.is_empty() {
        let orders = orders::orders(conn, bib)?;
        if !orders.is_empty() {
            listing.insert("order".to_string(), LocationItems::Orders(orders));
        }
    }
    Ok(listing)
}

fn sort_by_descending_sequence(items: &mut [Item]) {
    // stable ascending sort then reverse, so ties keep reversed source order
    items.sort_by_key(|item| item.item_sequence_number);
    items.reverse();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ItemId;

    fn item(id: u64, sequence: u32) -> Item {
        Item {
            id: ItemId(id),
            status: "Not Charged".to_string(),
            on_reserve: false,
            temp_location: None,
            perm_location: Some("f".to_string()),
            enumeration: None,
            chronology: None,
            copy_number: Some(1),
            item_sequence_number: Some(sequence),
            status_date: None,
            barcode: None,
        }
    }

    #[test]
    fn test_sort_is_descending_by_sequence() {
        let mut items = vec![item(1, 1), item(3, 3), item(2, 2)];
        sort_by_descending_sequence(&mut items);

        let ids: Vec<u64> = items.iter().map(|i| i.id.0).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_holding_items_omits_empty_notes() {
        let group = HoldingItems {
            holding_id: HoldingId(22204),
            call_number: Some("PS3511.I9".to_string()),
            notes: Vec::new(),
            items: vec![item(1, 1)],
        };

        let value = serde_json::to_value(&group).unwrap();
        assert_eq!(value["holding_id"], 22204);
        assert!(value.get("notes").is_none());
    }

    #[test]
    fn test_order_group_serializes_bare_lines() {
        let listing = LocationItems::Orders(vec![Order {
            date: None,
            li_status: 0,
            po_status: 0,
        }]);

        let value = serde_json::to_value(&listing).unwrap();
        assert_eq!(value[0]["li_status"], 0);
    }
}
