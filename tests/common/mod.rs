//! Common fixtures shared across the integration suites.

use bibgate::{Field, ItemId, ItemRow, Leader, LocationRow, MemorySource, OrderRow, Record};
use chrono::NaiveDate;

/// Builds a minimal bib record: 001 control number plus a 245 title.
pub fn bib_record(number: u64, title: &str) -> Record {
    Record::builder(Leader::default())
        .control_field_str("001", &number.to_string())
        .field(
            Field::builder("245".to_string(), '1', '0')
                .subfield_str('a', title)
                .build(),
        )
        .build()
}

/// Builds a holding record shelved at `location`, with a call number.
pub fn holding_record(number: u64, location: &str) -> Record {
    Record::builder(Leader::default())
        .control_field_str("001", &number.to_string())
        .field(
            Field::builder("852".to_string(), '0', ' ')
                .subfield_str('b', location)
                .subfield_str('h', "PS3511.I9")
                .subfield_str('i', "G7 2020")
                .build(),
        )
        .build()
}

/// Builds a circulating full item row.
pub fn item_row(id: u64, sequence: u32, status: &str) -> ItemRow {
    ItemRow {
        item_id: ItemId(id),
        status: status.to_string(),
        on_reserve: "N".to_string(),
        temp_location: None,
        perm_location: "f".to_string(),
        enumeration: None,
        chronology: None,
        copy_number: 1,
        item_sequence_number: sequence,
        status_date: None,
        barcode: Some(format!("3210102473{id:04}")),
    }
}

/// Builds a location row.
#[allow(dead_code)]
pub fn location_row(id: u32, code: &str, label: &str, always_requestable: bool) -> LocationRow {
    LocationRow {
        location_id: id,
        code: code.to_string(),
        display_name: label.to_string(),
        suppressed: "N".to_string(),
        always_requestable,
        label: label.to_string(),
    }
}

/// Builds an order row.
#[allow(dead_code)]
pub fn order_row(
    bib: u64,
    po_status: u16,
    line_item_status: u16,
    date: Option<NaiveDate>,
) -> OrderRow {
    OrderRow {
        bib_id: bibgate::BibId(bib),
        po_status,
        line_item_status,
        status_date: date,
    }
}

/// Loads the shelving locations the scenarios rely on: ordinary stacks,
/// a reference room, an always-requestable collection, and an online
/// location.
#[allow(dead_code)]
pub fn load_standard_locations(source: &mut MemorySource) {
    source.add_location(location_row(1, "f", "Firestone Library", false));
    source.add_location(location_row(2, "anxa", "Annex A", false));
    source.add_location(location_row(3, "sci", "Science Library", false));
    source.add_location(location_row(
        4,
        "fref",
        "Firestone Library - Reference",
        false,
    ));
    source.add_location(location_row(5, "num", "Numismatics Collection", true));
    source.add_location(location_row(6, "elf1", "Online - Electronic Files", false));
}
