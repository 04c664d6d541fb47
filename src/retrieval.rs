//! Suppression-aware record retrieval and assembly.
//!
//! These operations fetch raw segments, decode them, and combine bib and
//! holding records into the shapes consumers ask for. Suppression is
//! checked before any segment fetch; a suppressed or absent record is
//! `None`, and suppressed holdings silently drop out of lists.

use crate::error::Result;
use crate::ids::{BibId, HoldingId};
use crate::merge::merge_holdings_into_bib;
use crate::reader::record_from_segments;
use crate::record::Record;
use crate::source::SourceConnection;
use crate::suppress;

/// The bib record with its holdings' shelving fields merged in.
///
/// `None` when the bib is suppressed or does not exist.
pub fn bib_record(conn: &mut impl SourceConnection, bib: BibId) -> Result<Option<Record>> {
    match bib_with_separate_holdings(conn, bib)? {
        Some((record, holdings)) => {
            Ok(Some(merge_holdings_into_bib(conn, bib, record, &holdings)?))
        }
        None => Ok(None),
    }
}

/// The bare bib record, no holdings data.
pub fn bib_record_without_holdings(
    conn: &mut impl SourceConnection,
    bib: BibId,
) -> Result<Option<Record>> {
    if suppress::bib_suppressed(conn, bib)? {
        return Ok(None);
    }
    record_from_segments(conn.bib_segments(bib)?)
}

/// The bib record paired with its unsuppressed holding records.
pub fn bib_with_separate_holdings(
    conn: &mut impl SourceConnection,
    bib: BibId,
) -> Result<Option<(Record, Vec<Record>)>> {
    let record = match bib_record_without_holdings(conn, bib)? {
        Some(record) => record,
        None => return Ok(None),
    };
    let holdings = holding_records(conn, bib)?;
    Ok(Some((record, holdings)))
}

/// One holding record. `None` when suppressed or absent.
pub fn holding_record(
    conn: &mut impl SourceConnection,
    holding: HoldingId,
) -> Result<Option<Record>> {
    if suppress::holding_suppressed(conn, holding)? {
        return Ok(None);
    }
    record_from_segments(conn.holding_segments(holding)?)
}

/// All unsuppressed holding records attached to a bib, in attachment
/// order. Suppressed and absent holdings are skipped, not errors.
pub fn holding_records(conn: &mut impl SourceConnection, bib: BibId) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for holding in conn.holding_ids(bib)? {
        if let Some(record) = holding_record(conn, holding)? {
            records.push(record);
        }
    }
    Ok(records)
}

/// Reverse lookup from a holding id to its owning bib id.
pub fn bib_id_for_holding(
    conn: &mut impl SourceConnection,
    holding: HoldingId,
) -> Result<Option<BibId>> {
    conn.bib_id_for_holding(holding)
}
