//! Merging holding records into their parent bibliographic record.
//!
//! Consumers that want one record per title get the bib with its holdings'
//! shelving fields spliced in: the bib's own 852/866/867/868 fields are
//! dropped, each holding contributes its 852/856/866/867/868 fields tagged
//! with a `$0` back-reference to the holding id, and a synthetic 959 field
//! carries the resolved catalog date.

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{CatalogError, Result};
use crate::holdings::HoldingFields;
use crate::ids::BibId;
use crate::record::{Field, Record};
use crate::source::SourceConnection;

/// Bib fields replaced wholesale by the holdings' shelving data.
const BIB_FIELDS_REPLACED: [&str; 4] = ["852", "866", "867", "868"];

/// Holding fields carried into the merged bib.
const HOLDING_FIELDS_MERGED: [&str; 5] = ["852", "856", "866", "867", "868"];

/// Merges holding shelving fields into the bib record.
///
/// Every merged field gains a leading `$0` subfield holding its source
/// holding's 001 value, so consumers can attribute shelving data after the
/// merge. When at least one holding is present and a catalog date
/// resolves, a 959 field (blank indicators, `$a` = ISO date) is appended.
/// With zero holdings only the bib-field removal happens.
pub fn merge_holdings_into_bib(
    conn: &mut impl SourceConnection,
    bib: BibId,
    record: Record,
    holdings: &[Record],
) -> Result<Record> {
    let mut merged = splice_holding_fields(record, holdings)?;
    if !holdings.is_empty() {
        if let Some(date) = catalog_date(conn, bib, holdings)? {
            debug!(%bib, %date, "applying catalog date");
            merged.add_field(
                Field::builder("959".to_string(), ' ', ' ')
                    .subfield('a', date.to_string())
                    .build(),
            );
        }
    }
    Ok(merged)
}

fn splice_holding_fields(mut record: Record, holdings: &[Record]) -> Result<Record> {
    record.remove_fields_where(|f| BIB_FIELDS_REPLACED.contains(&f.tag.as_str()));
    for holding in holdings {
        let holding_number = holding
            .control_number()
            .ok_or_else(|| {
                CatalogError::MissingField(
                    "holding record has no 001 control number".to_string(),
                )
            })?
            .to_string();
        for field in holding.fields() {
            if HOLDING_FIELDS_MERGED.contains(&field.tag.as_str()) {
                let mut carried = field.clone();
                carried.insert_subfield_front('0', holding_number.clone());
                record.add_field(carried);
            }
        }
    }
    Ok(record)
}

/// Resolves the catalog date for a bib and its holdings.
///
/// Electronic resources (any holding shelved at an `elf`-prefixed
/// location) date from the bib record's creation. Physical resources date
/// from the earliest item creation across all the holdings' items; with
/// zero items there is no catalog date.
pub fn catalog_date(
    conn: &mut impl SourceConnection,
    bib: BibId,
    holdings: &[Record],
) -> Result<Option<NaiveDate>> {
    if electronic_resource(holdings) {
        conn.bib_create_date(bib)
    } else {
        earliest_item_date(conn, holdings)
    }
}

fn electronic_resource(holdings: &[Record]) -> bool {
    holdings
        .iter()
        .any(|h| h.location_code().is_some_and(|code| code.starts_with("elf")))
}

fn earliest_item_date(
    conn: &mut impl SourceConnection,
    holdings: &[Record],
) -> Result<Option<NaiveDate>> {
    let mut earliest: Option<NaiveDate> = None;
    for holding in holdings {
        for item in conn.item_ids(holding.holding_id()?)? {
            if let Some(date) = conn.item_create_date(item)? {
                earliest = Some(match earliest {
                    Some(current) => current.min(date),
                    None => date,
                });
            }
        }
    }
    Ok(earliest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leader::Leader;

    fn bib_record() -> Record {
        Record::builder(Leader::default())
            .control_field_str("001", "4609321")
            .field(
                Field::builder("245".to_string(), '1', '0')
                    .subfield_str('a', "Colonial land policies in Delaware")
                    .build(),
            )
            .field(
                Field::builder("852".to_string(), '0', ' ')
                    .subfield_str('b', "stale")
                    .build(),
            )
            .field(
                Field::builder("856".to_string(), '4', '0')
                    .subfield_str('u', "http://example.com/finding-aid")
                    .build(),
            )
            .field(
                Field::builder("866".to_string(), ' ', ' ')
                    .subfield_str('a', "stale note")
                    .build(),
            )
            .build()
    }

    fn holding_record(id: &str, location: &str) -> Record {
        Record::builder(Leader::default())
            .control_field_str("001", id)
            .field(
                Field::builder("852".to_string(), '0', ' ')
                    .subfield_str('b', location)
                    .subfield_str('h', "KF4558 15th .K46")
                    .build(),
            )
            .build()
    }

    #[test]
    fn test_splice_removes_replaced_bib_fields() {
        let merged = splice_holding_fields(bib_record(), &[]).unwrap();

        assert!(merged.get_field("852").is_none());
        assert!(merged.get_field("866").is_none());
        // bib 856 is not in the replaced set
        assert!(merged.get_field("856").is_some());
        assert!(merged.get_field("245").is_some());
    }

    #[test]
    fn test_splice_carries_holding_fields_with_back_reference() {
        let mut holding = holding_record("22204", "f");
        holding.add_field(
            Field::builder("866".to_string(), '4', '1')
                .subfield_str('a', "v.1-v.24")
                .build(),
        );

        let merged = splice_holding_fields(bib_record(), &[holding]).unwrap();

        let f852 = merged.get_field("852").unwrap();
        assert_eq!(f852.subfields[0].code, '0');
        assert_eq!(f852.subfields[0].value, "22204");
        assert_eq!(f852.get_subfield('b'), Some("f"));

        let f866 = merged.get_field("866").unwrap();
        assert_eq!(f866.get_subfield('0'), Some("22204"));
        assert_eq!(f866.get_subfield('a'), Some("v.1-v.24"));
    }

    #[test]
    fn test_splice_keeps_every_holdings_852() {
        let holdings = vec![holding_record("22204", "f"), holding_record("22205", "anxa")];
        let merged = splice_holding_fields(bib_record(), &holdings).unwrap();

        let locations: Vec<&str> = merged
            .fields_by_tag("852")
            .filter_map(|f| f.get_subfield('b'))
            .collect();
        assert_eq!(locations, vec!["f", "anxa"]);
    }

    #[test]
    fn test_splice_requires_holding_control_number() {
        let holding = Record::builder(Leader::default())
            .field(Field::builder("852".to_string(), '0', ' ').build())
            .build();

        assert!(matches!(
            splice_holding_fields(bib_record(), &[holding]),
            Err(CatalogError::MissingField(_))
        ));
    }

    #[test]
    fn test_electronic_resource_detects_elf_prefix() {
        assert!(electronic_resource(&[
            holding_record("1", "f"),
            holding_record("2", "elf1"),
        ]));
        assert!(!electronic_resource(&[holding_record("1", "f")]));
    }

    #[test]
    fn test_holding_without_852_is_not_electronic() {
        let bare = Record::builder(Leader::default())
            .control_field_str("001", "3")
            .build();
        assert!(!electronic_resource(&[bare]));
    }
}
