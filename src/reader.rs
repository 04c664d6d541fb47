//! Decoding stored records from raw segments.
//!
//! The source schema stores each record as a sequence of fixed-width byte
//! segments that concatenate to one ISO 2709 style binary record: a 24-byte
//! leader, a directory of 12-byte entries, then field data delimited by
//! terminator bytes.
//!
//! Decoding is deliberately forgiving. Legacy data carries stray control
//! characters and broken multi-byte sequences, and stripping those would
//! invalidate every length and offset the directory declares. The decoder
//! therefore trusts only the terminators: directory entries contribute tags,
//! and field chunks are paired with those tags in order. Character data is
//! recovered as UTF-8 with invalid sequences dropped, then filtered to the
//! XML-safe character set.
//!
//! # Examples
//!
//! ```
//! use bibgate::reader::record_from_segments;
//!
//! let segments: Vec<Vec<u8>> = Vec::new();
//! assert!(record_from_segments(segments).unwrap().is_none());
//! ```

use crate::error::{CatalogError, Result};
use crate::leader::Leader;
use crate::record::{Field, Record};
use memchr::{memchr, memchr_iter};
use tracing::{debug, trace};

pub(crate) const FIELD_TERMINATOR: u8 = 0x1E;
pub(crate) const SUBFIELD_DELIMITER: u8 = 0x1F;
pub(crate) const RECORD_TERMINATOR: u8 = 0x1D;

/// Assemble and decode one record from its ordered raw segments.
///
/// Returns `Ok(None)` when there are no segments at all, which callers
/// treat as "record absent". Empty input is not an error; a non-empty
/// input too short to hold a leader is.
///
/// # Errors
///
/// Returns an error if the concatenated bytes are shorter than the 24-byte
/// leader or the leader itself cannot be parsed.
pub fn record_from_segments<I, B>(segments: I) -> Result<Option<Record>>
where
    I: IntoIterator<Item = B>,
    B: AsRef<[u8]>,
{
    let mut bytes = Vec::new();
    for segment in segments {
        bytes.extend_from_slice(segment.as_ref());
    }
    decode_record(&bytes)
}

/// Decode a single binary record.
///
/// Directory lengths and start positions are ignored: tags are taken from
/// the directory entries and paired, in order, with the terminator-delimited
/// field chunks of the data area. This keeps decoding stable when character
/// sanitation changes byte counts.
///
/// # Errors
///
/// Returns an error for a non-empty input shorter than 24 bytes or an
/// unparseable leader. Field-level damage never fails the decode.
pub fn decode_record(bytes: &[u8]) -> Result<Option<Record>> {
    if bytes.is_empty() {
        return Ok(None);
    }
    if bytes.len() < 24 {
        return Err(CatalogError::InvalidRecord(format!(
            "Record data is {} bytes, shorter than a leader",
            bytes.len()
        )));
    }

    let leader = Leader::from_bytes(&bytes[..24])?;
    let after_leader = &bytes[24..];

    // Directory runs from the leader to the first field terminator.
    let dir_end = memchr(FIELD_TERMINATOR, after_leader).unwrap_or(after_leader.len());
    let directory = &after_leader[..dir_end];

    let mut tags: Vec<String> = Vec::with_capacity(directory.len() / 12);
    for entry in directory.chunks_exact(12) {
        tags.push(sanitize(&entry[..3]));
    }
    if directory.len() % 12 != 0 {
        trace!(
            stray_bytes = directory.len() % 12,
            "directory length is not a multiple of 12, ignoring the tail"
        );
    }

    let mut data = after_leader.get(dir_end + 1..).unwrap_or(&[]);
    if data.last() == Some(&RECORD_TERMINATOR) {
        data = &data[..data.len() - 1];
    }

    let mut chunks: Vec<&[u8]> = Vec::with_capacity(tags.len());
    let mut start = 0;
    for end in memchr_iter(FIELD_TERMINATOR, data) {
        chunks.push(&data[start..end]);
        start = end + 1;
    }
    if start < data.len() {
        chunks.push(&data[start..]);
    }

    if tags.len() != chunks.len() {
        debug!(
            tags = tags.len(),
            chunks = chunks.len(),
            "directory and data area disagree, pairing by order"
        );
    }

    let mut record = Record::new(leader);
    for (tag, chunk) in tags.iter().zip(chunks) {
        if is_control_tag(tag) {
            record.add_control_field(tag.clone(), sanitize(chunk));
        } else {
            record.add_field(parse_data_field(chunk, tag));
        }
    }

    Ok(Some(record))
}

/// Recover text from raw bytes.
///
/// Invalid UTF-8 sequences are dropped entirely, then characters outside
/// the permitted set (tab, LF, CR, and the XML 1.0 character ranges up to
/// U+FFFD) are stripped.
#[must_use]
pub fn sanitize(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    let mut rest = bytes;
    loop {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                out.extend(valid.chars().filter(|&c| is_permitted(c)));
                break;
            }
            Err(err) => {
                let (valid, after) = rest.split_at(err.valid_up_to());
                if let Ok(valid_str) = std::str::from_utf8(valid) {
                    out.extend(valid_str.chars().filter(|&c| is_permitted(c)));
                }
                match err.error_len() {
                    Some(len) => rest = &after[len..],
                    // Truncated sequence at the end of input
                    None => break,
                }
            }
        }
    }
    out
}

fn is_permitted(c: char) -> bool {
    matches!(
        c,
        '\u{09}' | '\u{0A}' | '\u{0D}' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}'
    )
}

fn is_control_tag(tag: &str) -> bool {
    tag.len() == 3 && tag.starts_with('0') && tag.chars().all(|c| c.is_ascii_digit()) && tag < "010"
}

/// Parse a data field from one terminator-delimited chunk.
///
/// The first two bytes are the indicators; subfields follow, each introduced
/// by the subfield delimiter and a one-byte code. Bytes before the first
/// delimiter (beyond the indicators) are ignored.
fn parse_data_field(data: &[u8], tag: &str) -> Field {
    let indicator1 = data.first().map_or(' ', |&b| b as char);
    let indicator2 = data.get(1).map_or(' ', |&b| b as char);
    let mut field = Field::new(tag.to_string(), indicator1, indicator2);

    let rest = data.get(2..).unwrap_or(&[]);
    let mut positions: Vec<usize> = memchr_iter(SUBFIELD_DELIMITER, rest).collect();
    positions.push(rest.len());
    for window in positions.windows(2) {
        let chunk = &rest[window[0] + 1..window[1]];
        if let Some((&code, value)) = chunk.split_first() {
            field.add_subfield(code as char, sanitize(value));
        }
    }

    field
}
