//! Suppression checks for bibliographic and holding records.
//!
//! Suppressed records never appear in engine output. Every record access
//! path runs these checks before touching record data, so a suppressed
//! record costs one flag lookup and nothing else.

use tracing::debug;

use crate::error::Result;
use crate::ids::{BibId, HoldingId};
use crate::source::SourceConnection;

/// Whether a bibliographic record is suppressed from public discovery.
///
/// Suppressed iff the flag row is present and reads `"Y"`. A record with
/// no flag row is not suppressed.
pub fn bib_suppressed(conn: &mut impl SourceConnection, bib: BibId) -> Result<bool> {
    let suppressed = matches!(conn.bib_suppress_flag(bib)?.as_deref(), Some("Y"));
    if suppressed {
        debug!(%bib, "bib record suppressed");
    }
    Ok(suppressed)
}

/// Whether a holding record is suppressed from public discovery.
pub fn holding_suppressed(conn: &mut impl SourceConnection, holding: HoldingId) -> Result<bool> {
    let suppressed = matches!(conn.holding_suppress_flag(holding)?.as_deref(), Some("Y"));
    if suppressed {
        debug!(%holding, "holding record suppressed");
    }
    Ok(suppressed)
}
