//! Identifier newtypes for the three record tiers.
//!
//! The source schema keys bibliographic, holding, and item rows by numeric
//! ids. Keeping them as distinct types prevents the classic mixup where a
//! holding id is handed to a bibliographic lookup.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                $name(raw)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                s.trim().parse::<u64>().map($name)
            }
        }
    };
}

id_type! {
    /// Identifier of a bibliographic record.
    BibId
}

id_type! {
    /// Identifier of a holding record (the mid-tier between bib and item).
    HoldingId
}

id_type! {
    /// Identifier of a circulating item.
    ItemId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_display_as_plain_numbers() {
        assert_eq!(BibId(1_234_567).to_string(), "1234567");
        assert_eq!(HoldingId(42).to_string(), "42");
        assert_eq!(ItemId(7).to_string(), "7");
    }

    #[test]
    fn test_ids_parse_from_control_field_text() {
        let parsed: HoldingId = " 9092827 ".parse().unwrap();
        assert_eq!(parsed, HoldingId(9_092_827));
        assert!("mfhd-1".parse::<HoldingId>().is_err());
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let json = serde_json::to_string(&BibId(365_340)).unwrap();
        assert_eq!(json, "365340");
    }
}
