//! Patron lookup and identifier classification.
//!
//! Callers hand over whatever identifier the patron presented; its shape
//! decides which column the source matches against. Fourteen digits is a
//! library barcode, nine digits is the institution-assigned id, anything
//! else is treated as a network login id.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::Result;
use crate::source::{PatronRow, SourceConnection};

lazy_static! {
    static ref BARCODE_SHAPE: Regex = Regex::new(r"^\d{14}$").unwrap();
    static ref UNIVERSITY_ID_SHAPE: Regex = Regex::new(r"^\d{9}$").unwrap();
}

/// The patron group id that normalizes to `"staff"`.
const STAFF_PATRON_GROUP: u32 = 3;

/// A classified patron identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatronIdentifier {
    /// A fourteen-digit library barcode.
    Barcode(String),
    /// A nine-digit institution-assigned id.
    UniversityId(String),
    /// A network login id.
    NetId(String),
}

impl PatronIdentifier {
    /// Classifies a raw identifier by shape.
    #[must_use]
    pub fn classify(raw: &str) -> Self {
        if BARCODE_SHAPE.is_match(raw) {
            PatronIdentifier::Barcode(raw.to_string())
        } else if UNIVERSITY_ID_SHAPE.is_match(raw) {
            PatronIdentifier::UniversityId(raw.to_string())
        } else {
            PatronIdentifier::NetId(raw.to_string())
        }
    }

    /// The identifier value as presented.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            PatronIdentifier::Barcode(value)
            | PatronIdentifier::UniversityId(value)
            | PatronIdentifier::NetId(value) => value,
        }
    }

    /// A short name for the identifier kind, safe to log.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            PatronIdentifier::Barcode(_) => "barcode",
            PatronIdentifier::UniversityId(_) => "university_id",
            PatronIdentifier::NetId(_) => "netid",
        }
    }
}

/// A normalized patron with their active barcode.
///
/// Every column serializes, absent ones as `null`, matching the legacy
/// wire shape consumers already parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patron {
    /// Network login id.
    pub netid: Option<String>,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Active barcode.
    pub barcode: Option<String>,
    /// Barcode status code.
    pub barcode_status: Option<u16>,
    /// Date the barcode status was applied.
    pub barcode_status_date: Option<NaiveDate>,
    /// Institution-assigned id.
    pub university_id: Option<String>,
    /// Patron group, `"staff"` for group 3, the group id otherwise.
    pub patron_group: Option<String>,
    /// Scheduled purge date.
    pub purge_date: Option<NaiveDate>,
    /// Account expiration date.
    pub expire_date: Option<NaiveDate>,
    /// Patron identifier.
    pub patron_id: u64,
}

impl From<PatronRow> for Patron {
    fn from(row: PatronRow) -> Self {
        let patron_group = row.patron_group.map(|group| {
            if group == STAFF_PATRON_GROUP {
                "staff".to_string()
            } else {
                group.to_string()
            }
        });
        Patron {
            netid: row.net_id,
            first_name: row.first_name,
            last_name: row.last_name,
            barcode: row.barcode,
            barcode_status: row.barcode_status,
            barcode_status_date: row.barcode_status_date,
            university_id: row.university_id,
            patron_group,
            purge_date: row.purge_date,
            expire_date: row.expire_date,
            patron_id: row.patron_id,
        }
    }
}

/// Looks up a patron by a raw identifier.
///
/// The identifier is classified by shape and matched against the
/// corresponding column; only the active barcode row answers. No match is
/// `None`.
pub fn patron_info(conn: &mut impl SourceConnection, patron_id: &str) -> Result<Option<Patron>> {
    let identifier = PatronIdentifier::classify(patron_id);
    trace!(kind = identifier.kind(), "patron lookup");
    Ok(conn.patron_row(&identifier)?.map(Patron::from))
}
