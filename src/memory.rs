//! In-memory row source for tests and examples.
//!
//! [`MemorySource`] keeps records and rows in plain maps and implements
//! the full source contract, including the parts a real provider gets
//! from its queries: records are stored encoded and served back as
//! 990-byte segments, item id lists come back status-filtered and ordered
//! by descending sequence number, order rows come back most recent first,
//! and patron lookups only match the active barcode row.

use indexmap::IndexMap;

use crate::error::Result;
use crate::ids::{BibId, HoldingId, ItemId};
use crate::patrons::PatronIdentifier;
use crate::record::Record;
use crate::source::{
    BriefItemRow, ConnectionProvider, ItemRow, LocationRow, OrderRow, PatronRow, SourceConnection,
    StatusRow, EXCLUDED_ITEM_STATUSES,
};
use crate::writer::encode_record;
use chrono::NaiveDate;

/// Record data is stored in fixed-width segment columns.
const SEGMENT_LENGTH: usize = 990;

#[derive(Debug, Clone, Default)]
struct BibEntry {
    segments: Vec<Vec<u8>>,
    suppressed: bool,
    create_date: Option<NaiveDate>,
    holdings: Vec<HoldingId>,
    orders: Vec<OrderRow>,
}

#[derive(Debug, Clone, Default)]
struct HoldingEntry {
    segments: Vec<Vec<u8>>,
    suppressed: bool,
    bib: Option<BibId>,
    items: Vec<ItemId>,
    issues: Vec<String>,
}

#[derive(Debug, Clone)]
struct MemoryItem {
    status_code: u16,
    create_date: Option<NaiveDate>,
    row: ItemRow,
}

/// An in-memory implementation of the row source.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    bibs: IndexMap<BibId, BibEntry>,
    holdings: IndexMap<HoldingId, HoldingEntry>,
    items: IndexMap<ItemId, MemoryItem>,
    statuses: Vec<StatusRow>,
    locations: Vec<LocationRow>,
    patrons: Vec<PatronRow>,
}

impl MemorySource {
    /// An empty source.
    #[must_use]
    pub fn new() -> Self {
        MemorySource::default()
    }

    /// Stores a bib record, encoded and chunked into segments.
    pub fn add_bib(&mut self, bib: BibId, record: &Record) -> Result<()> {
        let segments = segments(record)?;
        self.bib_entry(bib).segments = segments;
        Ok(())
    }

    /// Marks a bib record suppressed.
    pub fn suppress_bib(&mut self, bib: BibId) {
        self.bib_entry(bib).suppressed = true;
    }

    /// Sets a bib record's creation date.
    pub fn set_bib_create_date(&mut self, bib: BibId, date: NaiveDate) {
        self.bib_entry(bib).create_date = Some(date);
    }

    /// Stores a holding record attached to a bib.
    pub fn add_holding(&mut self, bib: BibId, holding: HoldingId, record: &Record) -> Result<()> {
        let segments = segments(record)?;
        self.bib_entry(bib).holdings.push(holding);
        let entry = self.holding_entry(holding);
        entry.segments = segments;
        entry.bib = Some(bib);
        Ok(())
    }

    /// Marks a holding record suppressed.
    pub fn suppress_holding(&mut self, holding: HoldingId) {
        self.holding_entry(holding).suppressed = true;
    }

    /// Attaches an item to a holding. The status code decides visibility:
    /// items with a code in [`EXCLUDED_ITEM_STATUSES`] never surface.
    pub fn add_item(&mut self, holding: HoldingId, status_code: u16, row: ItemRow) {
        let item = row.item_id;
        self.holding_entry(holding).items.push(item);
        self.items.insert(
            item,
            MemoryItem {
                status_code,
                create_date: None,
                row,
            },
        );
    }

    /// Sets the creation date of a previously added item.
    pub fn set_item_create_date(&mut self, item: ItemId, date: NaiveDate) {
        if let Some(entry) = self.items.get_mut(&item) {
            entry.create_date = Some(date);
        }
    }

    /// Adds an acquisitions row for its bib.
    pub fn add_order(&mut self, row: OrderRow) {
        let bib = row.bib_id;
        self.bib_entry(bib).orders.push(row);
    }

    /// Adds one status vocabulary row.
    pub fn add_status(&mut self, code: u16, description: &str) {
        self.statuses.push(StatusRow {
            code,
            description: description.to_string(),
        });
    }

    /// Adds one location metadata row.
    pub fn add_location(&mut self, row: LocationRow) {
        self.locations.push(row);
    }

    /// Adds a received serial issue caption for a holding.
    pub fn add_issue(&mut self, holding: HoldingId, caption: &str) {
        self.holding_entry(holding)
            .issues
            .push(caption.to_string());
    }

    /// Adds a patron row.
    pub fn add_patron(&mut self, row: PatronRow) {
        self.patrons.push(row);
    }

    fn bib_entry(&mut self, bib: BibId) -> &mut BibEntry {
        self.bibs.entry(bib).or_default()
    }

    fn holding_entry(&mut self, holding: HoldingId) -> &mut HoldingEntry {
        self.holdings.entry(holding).or_default()
    }

    fn visible_item(&self, item: ItemId) -> Option<&MemoryItem> {
        self.items
            .get(&item)
            .filter(|stored| !EXCLUDED_ITEM_STATUSES.contains(&stored.status_code))
    }
}

fn segments(record: &Record) -> Result<Vec<Vec<u8>>> {
    let encoded = encode_record(record)?;
    Ok(encoded
        .chunks(SEGMENT_LENGTH)
        .map(<[u8]>::to_vec)
        .collect())
}

fn flag(suppressed: bool) -> String {
    if suppressed { "Y" } else { "N" }.to_string()
}

impl ConnectionProvider for MemorySource {
    type Connection<'a> = MemoryConnection<'a>
    where
        Self: 'a;

    fn acquire(&self) -> Result<MemoryConnection<'_>> {
        Ok(MemoryConnection { source: self })
    }
}

/// A borrowed view of a [`MemorySource`].
#[derive(Debug)]
pub struct MemoryConnection<'a> {
    source: &'a MemorySource,
}

impl SourceConnection for MemoryConnection<'_> {
    fn bib_suppress_flag(&mut self, bib: BibId) -> Result<Option<String>> {
        Ok(self
            .source
            .bibs
            .get(&bib)
            .map(|entry| flag(entry.suppressed)))
    }

    fn holding_suppress_flag(&mut self, holding: HoldingId) -> Result<Option<String>> {
        Ok(self
            .source
            .holdings
            .get(&holding)
            .map(|entry| flag(entry.suppressed)))
    }

    fn bib_segments(&mut self, bib: BibId) -> Result<Vec<Vec<u8>>> {
        Ok(self
            .source
            .bibs
            .get(&bib)
            .map(|entry| entry.segments.clone())
            .unwrap_or_default())
    }

    fn holding_segments(&mut self, holding: HoldingId) -> Result<Vec<Vec<u8>>> {
        Ok(self
            .source
            .holdings
            .get(&holding)
            .map(|entry| entry.segments.clone())
            .unwrap_or_default())
    }

    fn holding_ids(&mut self, bib: BibId) -> Result<Vec<HoldingId>> {
        Ok(self
            .source
            .bibs
            .get(&bib)
            .map(|entry| entry.holdings.clone())
            .unwrap_or_default())
    }

    fn bib_id_for_holding(&mut self, holding: HoldingId) -> Result<Option<BibId>> {
        Ok(self
            .source
            .holdings
            .get(&holding)
            .and_then(|entry| entry.bib))
    }

    fn item_ids(&mut self, holding: HoldingId) -> Result<Vec<ItemId>> {
        let attached = match self.source.holdings.get(&holding) {
            Some(entry) => &entry.items,
            None => return Ok(Vec::new()),
        };
        let mut visible: Vec<&MemoryItem> = attached
            .iter()
            .filter_map(|&item| self.source.visible_item(item))
            .collect();
        visible.sort_by_key(|stored| stored.row.item_sequence_number);
        visible.reverse();
        Ok(visible.iter().map(|stored| stored.row.item_id).collect())
    }

    fn full_item_row(&mut self, item: ItemId) -> Result<Option<ItemRow>> {
        Ok(self.source.visible_item(item).map(|stored| stored.row.clone()))
    }

    fn brief_item_row(&mut self, item: ItemId) -> Result<Option<BriefItemRow>> {
        Ok(self.source.visible_item(item).map(|stored| BriefItemRow {
            item_id: stored.row.item_id,
            status: stored.row.status.clone(),
            on_reserve: stored.row.on_reserve.clone(),
            temp_location: stored.row.temp_location.clone(),
        }))
    }

    fn item_create_date(&mut self, item: ItemId) -> Result<Option<NaiveDate>> {
        Ok(self
            .source
            .items
            .get(&item)
            .and_then(|stored| stored.create_date))
    }

    fn bib_create_date(&mut self, bib: BibId) -> Result<Option<NaiveDate>> {
        Ok(self
            .source
            .bibs
            .get(&bib)
            .and_then(|entry| entry.create_date))
    }

    fn order_rows(&mut self, bib: BibId) -> Result<Vec<OrderRow>> {
        let mut rows = self
            .source
            .bibs
            .get(&bib)
            .map(|entry| entry.orders.clone())
            .unwrap_or_default();
        // most recent first, undated lines last
        rows.sort_by(|a, b| b.status_date.cmp(&a.status_date));
        Ok(rows)
    }

    fn status_rows(&mut self) -> Result<Vec<StatusRow>> {
        Ok(self.source.statuses.clone())
    }

    fn location_rows(&mut self) -> Result<Vec<LocationRow>> {
        Ok(self.source.locations.clone())
    }

    fn location_row(&mut self, code: &str) -> Result<Option<LocationRow>> {
        Ok(self
            .source
            .locations
            .iter()
            .find(|row| row.code == code)
            .cloned())
    }

    fn issue_rows(&mut self, holding: HoldingId) -> Result<Vec<String>> {
        Ok(self
            .source
            .holdings
            .get(&holding)
            .map(|entry| entry.issues.clone())
            .unwrap_or_default())
    }

    fn patron_row(&mut self, patron: &PatronIdentifier) -> Result<Option<PatronRow>> {
        Ok(self
            .source
            .patrons
            .iter()
            .find(|row| {
                row.barcode_status == Some(1)
                    && match patron {
                        PatronIdentifier::Barcode(value) => {
                            row.barcode.as_deref() == Some(value.as_str())
                        }
                        PatronIdentifier::UniversityId(value) => {
                            row.university_id.as_deref() == Some(value.as_str())
                        }
                        PatronIdentifier::NetId(value) => {
                            row.net_id.as_deref() == Some(value.as_str())
                        }
                    }
            })
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leader::Leader;
    use crate::record::Field;

    fn sample_record(number: &str, note: &str) -> Record {
        Record::builder(Leader::default())
            .control_field_str("001", number)
            .field(
                Field::builder("866".to_string(), ' ', ' ')
                    .subfield_str('a', note)
                    .build(),
            )
            .build()
    }

    fn item_row(id: u64, sequence: u32) -> ItemRow {
        ItemRow {
            item_id: ItemId(id),
            status: "Not Charged".to_string(),
            on_reserve: "N".to_string(),
            temp_location: None,
            perm_location: "f".to_string(),
            enumeration: None,
            chronology: None,
            copy_number: 1,
            item_sequence_number: sequence,
            status_date: None,
            barcode: None,
        }
    }

    #[test]
    fn test_records_are_stored_as_bounded_segments() {
        let mut source = MemorySource::new();
        let record = sample_record("4609321", &"x".repeat(1500));
        source.add_bib(BibId(4609321), &record).unwrap();

        let mut conn = source.acquire().unwrap();
        let segments = conn.bib_segments(BibId(4609321)).unwrap();

        assert!(segments.len() > 1);
        assert!(segments.iter().all(|s| s.len() <= SEGMENT_LENGTH));
        let joined: Vec<u8> = segments.concat();
        assert_eq!(joined, encode_record(&record).unwrap());
    }

    #[test]
    fn test_suppress_flag_rows() {
        let mut source = MemorySource::new();
        source
            .add_bib(BibId(1), &sample_record("1", "kept"))
            .unwrap();
        source
            .add_bib(BibId(2), &sample_record("2", "hidden"))
            .unwrap();
        source.suppress_bib(BibId(2));

        let mut conn = source.acquire().unwrap();
        assert_eq!(conn.bib_suppress_flag(BibId(1)).unwrap().as_deref(), Some("N"));
        assert_eq!(conn.bib_suppress_flag(BibId(2)).unwrap().as_deref(), Some("Y"));
        assert_eq!(conn.bib_suppress_flag(BibId(3)).unwrap(), None);
    }

    #[test]
    fn test_item_ids_are_filtered_and_ordered() {
        let mut source = MemorySource::new();
        let holding = HoldingId(22204);
        source.add_item(holding, 1, item_row(10, 1));
        source.add_item(holding, 16, item_row(11, 5)); // missing: excluded
        source.add_item(holding, 1, item_row(12, 3));

        let mut conn = source.acquire().unwrap();
        assert_eq!(
            conn.item_ids(holding).unwrap(),
            vec![ItemId(12), ItemId(10)]
        );
        assert!(conn.full_item_row(ItemId(11)).unwrap().is_none());
        assert!(conn.brief_item_row(ItemId(11)).unwrap().is_none());
    }

    #[test]
    fn test_order_rows_come_back_most_recent_first() {
        let mut source = MemorySource::new();
        let bib = BibId(9);
        for (day, li) in [(1, 0), (20, 1), (10, 8)] {
            source.add_order(OrderRow {
                bib_id: bib,
                po_status: 1,
                line_item_status: li,
                status_date: NaiveDate::from_ymd_opt(2015, 5, day),
            });
        }

        let mut conn = source.acquire().unwrap();
        let rows = conn.order_rows(bib).unwrap();
        let line_items: Vec<u16> = rows.iter().map(|r| r.line_item_status).collect();
        assert_eq!(line_items, vec![1, 8, 0]);
    }

    #[test]
    fn test_patron_lookup_requires_active_barcode() {
        let mut source = MemorySource::new();
        source.add_patron(PatronRow {
            patron_id: 1,
            net_id: Some("jstudent".to_string()),
            first_name: None,
            last_name: None,
            barcode: Some("22101008199999".to_string()),
            barcode_status: Some(2),
            barcode_status_date: None,
            university_id: None,
            patron_group: None,
            purge_date: None,
            expire_date: None,
        });

        let mut conn = source.acquire().unwrap();
        let identifier = PatronIdentifier::classify("jstudent");
        assert!(conn.patron_row(&identifier).unwrap().is_none());
    }

    #[test]
    fn test_reverse_holding_lookup() {
        let mut source = MemorySource::new();
        source
            .add_holding(BibId(5), HoldingId(50), &sample_record("50", "v.1"))
            .unwrap();

        let mut conn = source.acquire().unwrap();
        assert_eq!(
            conn.bib_id_for_holding(HoldingId(50)).unwrap(),
            Some(BibId(5))
        );
        assert_eq!(conn.bib_id_for_holding(HoldingId(51)).unwrap(), None);
    }
}
