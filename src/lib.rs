#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # bibgate: bibliographic gateway
//!
//! A record aggregation and availability decision engine over a legacy
//! integrated-library-system row source.
//!
//! The crate assembles hierarchical bibliographic records from raw
//! relational rows, merges holding-level shelving data into parent bib
//! records, computes per-holding circulation availability through a
//! prioritized decision procedure, and produces ordered, location-grouped
//! item listings. It never talks to a database itself: callers plug in a
//! [`ConnectionProvider`] and the engine runs its fixed set of row
//! lookups through it.
//!
//! ## Quick Start
//!
//! ```ignore
//! use bibgate::{BibId, Catalog, MemorySource};
//!
//! # fn main() -> bibgate::Result<()> {
//! let mut source = MemorySource::new();
//! // ... load bib/holding records, items, locations ...
//!
//! let catalog = Catalog::new(source);
//! let availability = catalog.availability(&[BibId(4609321)])?;
//! for (bib, holdings) in &availability {
//!     for (holding, entry) in holdings {
//!         println!("{bib}/{holding}: {}", entry.status);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Assembling a merged record
//!
//! ```ignore
//! use bibgate::{BibId, Catalog, MemorySource};
//!
//! # fn main() -> bibgate::Result<()> {
//! # let catalog = Catalog::new(MemorySource::new());
//! if let Some(record) = catalog.bib_record(BibId(4609321))? {
//!     // holdings' 852/856/866-868 fields are spliced in, each carrying
//!     // a $0 back-reference to its holding id
//!     for field in record.fields_by_tag("852") {
//!         println!("shelved at {:?}", field.get_subfield('b'));
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`record`] — core record structures (`Record`, `Field`, `Subfield`)
//! - [`leader`] — the 24-byte record leader
//! - [`reader`] — segment decoding and character sanitation
//! - [`writer`] — encoding records back to the transmission format
//! - [`source`] — the row-source traits and raw row types
//! - [`suppress`] — bib/holding suppression checks
//! - [`holdings`] — holding-record field extraction
//! - [`merge`] — holding merge and catalog date resolution
//! - [`retrieval`] — suppression-aware record assembly
//! - [`items`] — item status resolution
//! - [`orders`] — order status and serial issues
//! - [`locations`] — location metadata and limited-access classification
//! - [`availability`] — the availability decision engine
//! - [`aggregate`] — location-grouped item listings
//! - [`patrons`] — patron lookup and identifier classification
//! - [`catalog`] — the one-stop facade
//! - [`memory`] — in-memory source for tests and examples
//! - [`error`] — error types and result alias

pub mod aggregate;
pub mod availability;
/// The engine facade: one connection per logical operation.
pub mod catalog;
pub mod error;
pub mod holdings;
pub mod ids;
pub mod items;
pub mod leader;
pub mod locations;
pub mod memory;
pub mod merge;
pub mod orders;
pub mod patrons;
pub mod reader;
/// Core record structures (`Record`, `Field`, `Subfield`)
pub mod record;
pub mod retrieval;
pub mod source;
pub mod suppress;
pub mod writer;

pub use aggregate::{HoldingItems, LocationItems};
pub use availability::{HoldingAvailability, ItemAvailability};
pub use catalog::Catalog;
pub use error::{CatalogError, Result};
pub use holdings::HoldingFields;
pub use ids::{BibId, HoldingId, ItemId};
pub use items::Item;
pub use leader::Leader;
pub use locations::Location;
pub use memory::{MemoryConnection, MemorySource};
pub use orders::Order;
pub use patrons::{Patron, PatronIdentifier};
pub use reader::{decode_record, record_from_segments};
pub use record::{Field, FieldBuilder, Record, RecordBuilder, Subfield};
pub use source::{
    BriefItemRow, ConnectionProvider, ItemRow, LocationRow, OrderRow, PatronRow, SourceConnection,
    StatusRow, EXCLUDED_ITEM_STATUSES,
};
pub use writer::encode_record;
