//! Order status resolution and serial issue lookup.
//!
//! Acquisitions data answers two questions for the engine: "is this title
//! on order?" (the availability fallback when a holding has no items) and
//! "which serial issues have arrived?". Status codes follow the legacy
//! purchase-order schema; only a small whitelist of codes produces a
//! public message.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ids::{BibId, HoldingId};
use crate::source::{OrderRow, SourceConnection};

const PO_PENDING: u16 = 0;
const PO_APPROVED: u16 = 1;
const PO_RECEIVED_PARTIAL: u16 = 3;
const PO_RECEIVED_COMPLETE: u16 = 4;
const PO_STATUS_WHITELIST: [u16; 4] = [
    PO_PENDING,
    PO_APPROVED,
    PO_RECEIVED_PARTIAL,
    PO_RECEIVED_COMPLETE,
];

const LINE_ITEM_PENDING: u16 = 0;
const LINE_ITEM_RECEIVED_COMPLETE: u16 = 1;
const LINE_ITEM_APPROVED: u16 = 8;
const LINE_ITEM_RECEIVED_PARTIAL: u16 = 9;
const LINE_ITEM_STATUS_WHITELIST: [u16; 4] = [
    LINE_ITEM_PENDING,
    LINE_ITEM_RECEIVED_COMPLETE,
    LINE_ITEM_APPROVED,
    LINE_ITEM_RECEIVED_PARTIAL,
];

/// One order line as exposed to consumers.
///
/// Unlike [`OrderRow`] this drops the bib id (callers asked by bib) and
/// keeps the legacy wire names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Date the line-item status was applied.
    pub date: Option<NaiveDate>,
    /// Line-item status code.
    pub li_status: u16,
    /// Purchase-order status code.
    pub po_status: u16,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Order {
            date: row.status_date,
            li_status: row.line_item_status,
            po_status: row.po_status,
        }
    }
}

/// All order lines for a bibliographic record, most recent first.
pub fn orders(conn: &mut impl SourceConnection, bib: BibId) -> Result<Vec<Order>> {
    Ok(conn.order_rows(bib)?.into_iter().map(Order::from).collect())
}

/// The public order-status message for a bibliographic record.
///
/// The most recent order line answers. Lines qualify when the PO status or
/// the line-item status is whitelisted; the message is "Order Received" for
/// a completely received line, "Pending Order" for a pending one and
/// "On-Order" otherwise, with the status date appended as ` MM-DD-YYYY`
/// when known. No order or no qualifying line is `None`.
pub fn order_status(conn: &mut impl SourceConnection, bib: BibId) -> Result<Option<String>> {
    Ok(conn.order_rows(bib)?.first().and_then(status_message))
}

fn status_message(row: &OrderRow) -> Option<String> {
    if !PO_STATUS_WHITELIST.contains(&row.po_status)
        && !LINE_ITEM_STATUS_WHITELIST.contains(&row.line_item_status)
    {
        return None;
    }
    let mut status = match row.line_item_status {
        LINE_ITEM_RECEIVED_COMPLETE => "Order Received".to_string(),
        LINE_ITEM_PENDING => "Pending Order".to_string(),
        _ => "On-Order".to_string(),
    };
    if let Some(date) = row.status_date {
        status.push_str(&format!(" {}", date.format("%m-%d-%Y")));
    }
    Some(status)
}

/// Enumeration/chronology captions of received serial issues for a
/// holding. Zero rows is `None`, so callers can distinguish "no current
/// issues" from a populated list without inspecting emptiness.
pub fn current_issues(
    conn: &mut impl SourceConnection,
    holding: HoldingId,
) -> Result<Option<Vec<String>>> {
    let issues = conn.issue_rows(holding)?;
    if issues.is_empty() {
        Ok(None)
    } else {
        Ok(Some(issues))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(po_status: u16, line_item_status: u16, status_date: Option<NaiveDate>) -> OrderRow {
        OrderRow {
            bib_id: BibId(4609321),
            po_status,
            line_item_status,
            status_date,
        }
    }

    #[test]
    fn test_received_complete_line() {
        assert_eq!(
            status_message(&row(4, LINE_ITEM_RECEIVED_COMPLETE, None)),
            Some("Order Received".to_string())
        );
    }

    #[test]
    fn test_pending_line() {
        assert_eq!(
            status_message(&row(0, LINE_ITEM_PENDING, None)),
            Some("Pending Order".to_string())
        );
    }

    #[test]
    fn test_other_whitelisted_line_is_on_order() {
        assert_eq!(
            status_message(&row(1, LINE_ITEM_APPROVED, None)),
            Some("On-Order".to_string())
        );
    }

    #[test]
    fn test_po_whitelist_alone_qualifies() {
        // line-item code outside the whitelist, PO code inside
        assert_eq!(
            status_message(&row(PO_RECEIVED_COMPLETE, 7, None)),
            Some("On-Order".to_string())
        );
    }

    #[test]
    fn test_unwhitelisted_line_has_no_message() {
        assert_eq!(status_message(&row(2, 7, None)), None);
    }

    #[test]
    fn test_date_suffix_format() {
        let date = NaiveDate::from_ymd_opt(2011, 3, 30).unwrap();
        assert_eq!(
            status_message(&row(4, LINE_ITEM_RECEIVED_COMPLETE, Some(date))),
            Some("Order Received 03-30-2011".to_string())
        );
    }

    #[test]
    fn test_order_drops_bib_id_and_keeps_wire_names() {
        let order = Order::from(row(4, 1, None));
        let value = serde_json::to_value(&order).unwrap();

        assert_eq!(value["po_status"], 4);
        assert_eq!(value["li_status"], 1);
        assert!(value["date"].is_null());
        assert!(value.get("bib_id").is_none());
    }
}
