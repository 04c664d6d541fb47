//! Row-source abstraction over the legacy catalog schema.
//!
//! The engine never constructs queries or speaks to a database. Callers
//! supply a [`ConnectionProvider`]; each logical catalog operation acquires
//! one connection from it and runs every nested lookup on that connection.
//! [`SourceConnection`] is the complete set of row lookups the engine
//! performs, one method per query shape, returning typed columns. The
//! in-memory implementation in [`crate::memory`] backs the test suites.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ids::{BibId, HoldingId, ItemId};
use crate::patrons::PatronIdentifier;

/// Item status codes that mark an item as withdrawn from circulation.
///
/// Items whose every status row carries one of these codes are invisible to
/// the engine: [`SourceConnection::item_ids`] omits them and the row fetches
/// return `None` for them.
pub const EXCLUDED_ITEM_STATUSES: [u16; 8] = [5, 6, 16, 19, 20, 21, 23, 24];

/// One full item row: circulation status joined with shelving and copy data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRow {
    /// Item identifier.
    pub item_id: ItemId,
    /// Status description for the item's current (non-excluded) status.
    pub status: String,
    /// Raw reserve flag, `"Y"` or `"N"`.
    pub on_reserve: String,
    /// Temporary location code, when the item is shelved away from home.
    pub temp_location: Option<String>,
    /// Permanent location code.
    pub perm_location: String,
    /// Enumeration caption (volume numbering), when present.
    pub enumeration: Option<String>,
    /// Chronology caption (issue dating), when present.
    pub chronology: Option<String>,
    /// Copy number within the holding.
    pub copy_number: u32,
    /// Sequence number ranking the item within its holding.
    pub item_sequence_number: u32,
    /// Date the current status was applied.
    pub status_date: Option<NaiveDate>,
    /// Barcode, when one is attached.
    pub barcode: Option<String>,
}

/// The abbreviated item row used on the availability fast path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BriefItemRow {
    /// Item identifier.
    pub item_id: ItemId,
    /// Status description for the item's current (non-excluded) status.
    pub status: String,
    /// Raw reserve flag, `"Y"` or `"N"`.
    pub on_reserve: String,
    /// Temporary location code, when the item is shelved away from home.
    pub temp_location: Option<String>,
}

/// One acquisitions row: a purchase-order line for a bibliographic record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRow {
    /// Bibliographic record the line was ordered for.
    pub bib_id: BibId,
    /// Purchase-order status code.
    pub po_status: u16,
    /// Line-item status code.
    pub line_item_status: u16,
    /// Date the line-item status was applied.
    pub status_date: Option<NaiveDate>,
}

/// One row of the item status vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRow {
    /// Status code.
    pub code: u16,
    /// Human-readable status description.
    pub description: String,
}

/// One row of location metadata, merged from the shelving-location table
/// and the delivery-policy registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRow {
    /// Location identifier.
    pub location_id: u32,
    /// Location code, as it appears in holding 852 `$b` subfields.
    pub code: String,
    /// Display name from the shelving-location table.
    pub display_name: String,
    /// Raw suppression flag, `"Y"` or `"N"`.
    pub suppressed: String,
    /// Whether every item at this location must be requested for delivery.
    pub always_requestable: bool,
    /// Public label from the delivery-policy registry.
    pub label: String,
}

/// One patron row with its active barcode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatronRow {
    /// Patron identifier (primary key).
    pub patron_id: u64,
    /// Network login id, when one is recorded.
    pub net_id: Option<String>,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Active barcode.
    pub barcode: Option<String>,
    /// Barcode status code; the active-barcode join pins this to `1`.
    pub barcode_status: Option<u16>,
    /// Date the barcode status was applied.
    pub barcode_status_date: Option<NaiveDate>,
    /// Institution-assigned id (nine digits).
    pub university_id: Option<String>,
    /// Patron group id.
    pub patron_group: Option<u32>,
    /// Scheduled purge date.
    pub purge_date: Option<NaiveDate>,
    /// Account expiration date.
    pub expire_date: Option<NaiveDate>,
}

/// Yields connections to the row source.
///
/// A provider is cheap to share; acquisition cost and pooling strategy
/// belong to the implementor. The engine acquires exactly one connection
/// per logical operation and drops it when the operation returns, on the
/// error path included.
pub trait ConnectionProvider {
    /// The connection type this provider yields.
    type Connection<'a>: SourceConnection
    where
        Self: 'a;

    /// Acquires a connection for one logical operation.
    fn acquire(&self) -> Result<Self::Connection<'_>>;
}

/// The fixed set of row lookups the engine performs.
///
/// Methods take `&mut self` so implementations may reuse statement handles
/// or buffers between calls. Absence is `None` or an empty collection,
/// never an error; errors are reserved for connection and query failure.
pub trait SourceConnection {
    /// Suppression flag row for a bibliographic record, `"Y"` or `"N"`.
    /// `None` when the record has no flag row.
    fn bib_suppress_flag(&mut self, bib: BibId) -> Result<Option<String>>;

    /// Suppression flag row for a holding record, `"Y"` or `"N"`.
    fn holding_suppress_flag(&mut self, holding: HoldingId) -> Result<Option<String>>;

    /// Raw record segments for a bibliographic record, in sequence order.
    /// Empty when the record does not exist.
    fn bib_segments(&mut self, bib: BibId) -> Result<Vec<Vec<u8>>>;

    /// Raw record segments for a holding record, in sequence order.
    fn holding_segments(&mut self, holding: HoldingId) -> Result<Vec<Vec<u8>>>;

    /// Holding ids attached to a bibliographic record, in attachment order.
    fn holding_ids(&mut self, bib: BibId) -> Result<Vec<HoldingId>>;

    /// Reverse lookup from a holding to its bibliographic record.
    fn bib_id_for_holding(&mut self, holding: HoldingId) -> Result<Option<BibId>>;

    /// Item ids attached to a holding, ordered by descending sequence
    /// number, with [`EXCLUDED_ITEM_STATUSES`] items omitted. The first id
    /// is the one that drives availability.
    fn item_ids(&mut self, holding: HoldingId) -> Result<Vec<ItemId>>;

    /// Full row for one item. `None` when the item does not exist or is
    /// status-excluded.
    fn full_item_row(&mut self, item: ItemId) -> Result<Option<ItemRow>>;

    /// Brief row for one item. Same absence rules as [`full_item_row`].
    ///
    /// [`full_item_row`]: SourceConnection::full_item_row
    fn brief_item_row(&mut self, item: ItemId) -> Result<Option<BriefItemRow>>;

    /// Creation date of an item row.
    fn item_create_date(&mut self, item: ItemId) -> Result<Option<NaiveDate>>;

    /// Creation date of a bibliographic record.
    fn bib_create_date(&mut self, bib: BibId) -> Result<Option<NaiveDate>>;

    /// Acquisitions rows for a bibliographic record, most recent first.
    /// The first row drives the order-status message.
    fn order_rows(&mut self, bib: BibId) -> Result<Vec<OrderRow>>;

    /// The full item status vocabulary.
    fn status_rows(&mut self) -> Result<Vec<StatusRow>>;

    /// All location metadata rows, in location-id order.
    fn location_rows(&mut self) -> Result<Vec<LocationRow>>;

    /// Location metadata for one location code.
    fn location_row(&mut self, code: &str) -> Result<Option<LocationRow>>;

    /// Enumeration/chronology captions of received, unsuppressed serial
    /// issues for a holding.
    fn issue_rows(&mut self, holding: HoldingId) -> Result<Vec<String>>;

    /// Patron row matched by the classified identifier, restricted to the
    /// active barcode.
    fn patron_row(&mut self, patron: &PatronIdentifier) -> Result<Option<PatronRow>>;
}
