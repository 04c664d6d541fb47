//! Encoding records back to the binary transmission format.
//!
//! The engine mostly consumes stored records, but fixtures and round-trip
//! checks need the reverse direction: [`encode_record`] serializes a
//! [`Record`] to the same ISO 2709 style binary layout the decoder reads,
//! with directory entries and leader lengths computed from the actual data.
//!
//! # Examples
//!
//! ```
//! use bibgate::writer::encode_record;
//! use bibgate::{Leader, Record};
//!
//! let mut record = Record::new(Leader::default());
//! record.add_control_field_str("001", "12345");
//!
//! let bytes = encode_record(&record).unwrap();
//! assert_eq!(&bytes[0..5], format!("{:05}", bytes.len()).as_bytes());
//! ```

use crate::error::{CatalogError, Result};
use crate::reader::{FIELD_TERMINATOR, RECORD_TERMINATOR, SUBFIELD_DELIMITER};
use crate::record::Record;

/// Serialize a record to binary form.
///
/// Control fields are written first, then data fields in stored order. The
/// directory is rebuilt from scratch and the leader's record length and
/// base address are stamped with the computed values; whatever the input
/// leader declared is ignored.
///
/// # Errors
///
/// Returns an error if the record is too large for the 5-digit length
/// fields or the leader fails to serialize.
pub fn encode_record(record: &Record) -> Result<Vec<u8>> {
    let mut data_area = Vec::new();
    let mut directory = Vec::new();
    let mut current_position = 0;

    // Control fields first (001-009)
    for (tag, value) in &record.control_fields {
        if tag.as_str() < "010" {
            let field_data = value.as_bytes();
            let field_length = field_data.len() + 1; // +1 for terminator

            directory.extend_from_slice(tag.as_bytes());
            directory.extend_from_slice(format!("{field_length:04}").as_bytes());
            directory.extend_from_slice(format!("{current_position:05}").as_bytes());

            data_area.extend_from_slice(field_data);
            data_area.push(FIELD_TERMINATOR);
            current_position += field_length;
        }
    }

    // Data fields (010+)
    for (tag, fields) in &record.fields {
        for field in fields {
            let mut field_data = Vec::new();
            field_data.push(field.indicator1 as u8);
            field_data.push(field.indicator2 as u8);

            for subfield in &field.subfields {
                field_data.push(SUBFIELD_DELIMITER);
                field_data.push(subfield.code as u8);
                field_data.extend_from_slice(subfield.value.as_bytes());
            }

            field_data.push(FIELD_TERMINATOR);
            let field_length = field_data.len();

            directory.extend_from_slice(tag.as_bytes());
            directory.extend_from_slice(format!("{field_length:04}").as_bytes());
            directory.extend_from_slice(format!("{current_position:05}").as_bytes());

            data_area.extend_from_slice(&field_data);
            current_position += field_length;
        }
    }

    directory.push(FIELD_TERMINATOR);

    let base_address = 24 + directory.len();
    let record_length = base_address + data_area.len() + 1; // +1 for record terminator

    let mut leader = record.leader.clone();
    leader.record_length = u32::try_from(record_length)
        .map_err(|_| CatalogError::InvalidRecord("Record length exceeds limit".to_string()))?;
    leader.data_base_address = u32::try_from(base_address)
        .map_err(|_| CatalogError::InvalidRecord("Base address exceeds limit".to_string()))?;

    let mut bytes = leader.as_bytes()?;
    bytes.extend_from_slice(&directory);
    bytes.extend_from_slice(&data_area);
    bytes.push(RECORD_TERMINATOR);

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leader::Leader;
    use crate::reader::decode_record;
    use crate::record::Field;

    #[test]
    fn test_encode_simple_record() {
        let mut record = Record::new(Leader::default());

        let mut field = Field::new("245".to_string(), '1', '0');
        field.add_subfield('a', "Test title".to_string());
        record.add_field(field);

        let bytes = encode_record(&record).unwrap();

        // 24 (leader) + 13 (one directory entry + terminator) + 15 (field
        // data) + 1 (record terminator) = 53
        assert_eq!(&bytes[0..5], b"00053");
        assert_eq!(bytes[24], b'2'); // Start of directory (tag '245')
        assert_eq!(*bytes.last().unwrap(), 0x1D);
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let mut record = Record::new(Leader::default());
        record.add_control_field("001".to_string(), "365340".to_string());

        let mut field = Field::new("852".to_string(), '0', ' ');
        field.add_subfield('b', "anxa".to_string());
        field.add_subfield('h', "PS3511.I9".to_string());
        field.add_subfield('i', "G7 2020".to_string());
        record.add_field(field);

        let bytes = encode_record(&record).unwrap();
        let decoded = decode_record(&bytes).unwrap().unwrap();

        assert_eq!(decoded.control_number(), Some("365340"));
        let field = decoded.get_field("852").unwrap();
        assert_eq!(field.indicator1, '0');
        assert_eq!(field.indicator2, ' ');
        assert_eq!(field.get_subfield('b'), Some("anxa"));
        assert_eq!(field.get_subfields(&['h', 'i']), vec!["PS3511.I9", "G7 2020"]);
    }

    #[test]
    fn test_roundtrip_preserves_field_order_per_tag() {
        let mut record = Record::new(Leader::default());
        for i in 1..=3 {
            let mut field = Field::new("866".to_string(), ' ', ' ');
            field.add_subfield('a', format!("v.{i}"));
            record.add_field(field);
        }

        let bytes = encode_record(&record).unwrap();
        let decoded = decode_record(&bytes).unwrap().unwrap();

        let values: Vec<&str> = decoded
            .fields_by_tag("866")
            .filter_map(|f| f.get_subfield('a'))
            .collect();
        assert_eq!(values, vec!["v.1", "v.2", "v.3"]);
    }

    #[test]
    fn test_roundtrip_survives_segmenting() {
        use crate::reader::record_from_segments;

        let mut record = Record::new(Leader::default());
        record.add_control_field("001".to_string(), "9092827".to_string());
        let mut field = Field::new("866".to_string(), ' ', ' ');
        field.add_subfield('a', "No. 1 (July 1946)-v. 30, no. 179".to_string());
        record.add_field(field);

        let bytes = encode_record(&record).unwrap();
        let segments: Vec<&[u8]> = bytes.chunks(7).collect();
        let decoded = record_from_segments(segments).unwrap().unwrap();

        assert_eq!(decoded.control_number(), Some("9092827"));
        assert_eq!(
            decoded.get_field("866").unwrap().get_subfield('a'),
            Some("No. 1 (July 1946)-v. 30, no. 179")
        );
    }
}
