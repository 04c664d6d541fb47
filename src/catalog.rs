//! One-stop access to the engine's operations.
//!
//! [`Catalog`] owns a [`ConnectionProvider`] and runs each logical
//! operation on a freshly acquired connection. Nested lookups inside an
//! operation reuse that connection; it is released when the operation
//! returns, on the error path included.

use indexmap::IndexMap;

use crate::aggregate::{self, LocationItems};
use crate::availability::{self, HoldingAvailability, ItemAvailability};
use crate::error::Result;
use crate::ids::{BibId, HoldingId, ItemId};
use crate::items::{self, Item};
use crate::locations::{self, Location};
use crate::orders::{self, Order};
use crate::patrons::{self, Patron};
use crate::record::Record;
use crate::retrieval;
use crate::source::ConnectionProvider;

/// The engine facade over a row-source provider.
#[derive(Debug, Clone)]
pub struct Catalog<P> {
    provider: P,
}

impl<P: ConnectionProvider> Catalog<P> {
    /// Wraps a provider.
    pub fn new(provider: P) -> Self {
        Catalog { provider }
    }

    /// The bib record with holdings merged in. `None` when suppressed or
    /// absent.
    pub fn bib_record(&self, bib: BibId) -> Result<Option<Record>> {
        let mut conn = self.provider.acquire()?;
        retrieval::bib_record(&mut conn, bib)
    }

    /// The bare bib record, no holdings data.
    pub fn bib_record_without_holdings(&self, bib: BibId) -> Result<Option<Record>> {
        let mut conn = self.provider.acquire()?;
        retrieval::bib_record_without_holdings(&mut conn, bib)
    }

    /// The bib record paired with its unsuppressed holding records.
    pub fn bib_with_separate_holdings(&self, bib: BibId) -> Result<Option<(Record, Vec<Record>)>> {
        let mut conn = self.provider.acquire()?;
        retrieval::bib_with_separate_holdings(&mut conn, bib)
    }

    /// One holding record. `None` when suppressed or absent.
    pub fn holding_record(&self, holding: HoldingId) -> Result<Option<Record>> {
        let mut conn = self.provider.acquire()?;
        retrieval::holding_record(&mut conn, holding)
    }

    /// All unsuppressed holding records of a bib, in attachment order.
    pub fn holding_records(&self, bib: BibId) -> Result<Vec<Record>> {
        let mut conn = self.provider.acquire()?;
        retrieval::holding_records(&mut conn, bib)
    }

    /// Reverse lookup from a holding id to its owning bib id.
    pub fn bib_id_for_holding(&self, holding: HoldingId) -> Result<Option<BibId>> {
        let mut conn = self.provider.acquire()?;
        retrieval::bib_id_for_holding(&mut conn, holding)
    }

    /// Short-form availability for a batch of bibs: the first two
    /// unsuppressed holdings of each.
    pub fn availability(
        &self,
        bibs: &[BibId],
    ) -> Result<IndexMap<BibId, IndexMap<HoldingId, HoldingAvailability>>> {
        let mut conn = self.provider.acquire()?;
        availability::availability(&mut conn, bibs)
    }

    /// Availability across every unsuppressed holding of one bib.
    pub fn full_availability(&self, bib: BibId) -> Result<IndexMap<HoldingId, HoldingAvailability>> {
        let mut conn = self.provider.acquire()?;
        availability::full_availability(&mut conn, bib)
    }

    /// The per-item availability listing for one holding.
    pub fn full_holding_availability(&self, holding: HoldingId) -> Result<Vec<ItemAvailability>> {
        let mut conn = self.provider.acquire()?;
        availability::full_holding_availability(&mut conn, holding)
    }

    /// Items of a bib grouped by shelving location code.
    pub fn items_for_bib(&self, bib: BibId) -> Result<IndexMap<String, LocationItems>> {
        let mut conn = self.provider.acquire()?;
        aggregate::items_for_bib(&mut conn, bib)
    }

    /// Full items attached to one holding, highest sequence first.
    pub fn items_for_holding(&self, holding: HoldingId) -> Result<Vec<Item>> {
        let mut conn = self.provider.acquire()?;
        items::items_for_holding(&mut conn, holding)
    }

    /// Full data for one item. `None` when absent or status-excluded.
    pub fn item(&self, item: ItemId) -> Result<Option<Item>> {
        let mut conn = self.provider.acquire()?;
        items::full_item(&mut conn, item)
    }

    /// The status vocabulary: status code to description.
    pub fn item_statuses(&self) -> Result<IndexMap<u16, String>> {
        let mut conn = self.provider.acquire()?;
        items::item_statuses(&mut conn)
    }

    /// The full location table keyed by location id.
    pub fn locations(&self) -> Result<IndexMap<u32, Location>> {
        let mut conn = self.provider.acquire()?;
        locations::all_locations(&mut conn)
    }

    /// Received serial issues for a holding. `None` when there are none.
    pub fn current_issues(&self, holding: HoldingId) -> Result<Option<Vec<String>>> {
        let mut conn = self.provider.acquire()?;
        orders::current_issues(&mut conn, holding)
    }

    /// The public order-status message for a bib, when one applies.
    pub fn order_status(&self, bib: BibId) -> Result<Option<String>> {
        let mut conn = self.provider.acquire()?;
        orders::order_status(&mut conn, bib)
    }

    /// All order lines for a bib, most recent first.
    pub fn orders(&self, bib: BibId) -> Result<Vec<Order>> {
        let mut conn = self.provider.acquire()?;
        orders::orders(&mut conn, bib)
    }

    /// Looks up a patron by raw identifier (barcode, university id, or
    /// net id, classified by shape).
    pub fn patron_info(&self, patron_id: &str) -> Result<Option<Patron>> {
        let mut conn = self.provider.acquire()?;
        patrons::patron_info(&mut conn, patron_id)
    }
}
