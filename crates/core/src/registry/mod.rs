//! Pre-provisioned lot registry rules.
//!
//! Lots are fixed residential units seeded once at first run
//! (`lot_01`..`lot_48`). End users never create lots; owner name and phone
//! may be edited, but lots are never renumbered or deleted through the
//! normal flow.

use serde::{Deserialize, Serialize};

use kutip_shared::types::LotId;

/// A fixed residential unit in the managed community.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lot {
    /// Stable store key, e.g. `lot_05`.
    pub id: LotId,
    /// Display number, e.g. `LOT 05`.
    pub lot_number: String,
    /// Owner name; empty until set by an admin.
    #[serde(default)]
    pub owner_name: Option<String>,
    /// Contact phone number; empty until set by an admin.
    #[serde(default)]
    pub phone_number: Option<String>,
}

impl Lot {
    /// Creates an empty lot for the given 1-based index.
    #[must_use]
    pub fn numbered(index: u32) -> Self {
        Self {
            id: LotId::from_index(index),
            lot_number: format!("LOT {index:02}"),
            owner_name: None,
            phone_number: None,
        }
    }
}

/// Generates the full set of empty lots seeded at first run.
#[must_use]
pub fn provision_lots(count: u32) -> Vec<Lot> {
    (1..=count).map(Lot::numbered).collect()
}

/// Extracts the numeric part of a lot display number.
///
/// `LOT 2` and `LOT 02` both map to 2, so ordering by this index puts
/// `LOT 2` before `LOT 10` where a lexicographic comparison would not.
/// Unparseable numbers map to 0 and sort first.
#[must_use]
pub fn lot_sort_index(lot_number: &str) -> u32 {
    let digits: String = lot_number.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

/// Sorts lots by numeric lot number ascending.
pub fn sort_by_lot_number(lots: &mut [Lot]) {
    lots.sort_by_key(|lot| lot_sort_index(&lot.lot_number));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_provision_generates_padded_keys() {
        let lots = provision_lots(48);
        assert_eq!(lots.len(), 48);
        assert_eq!(lots[0].id.as_str(), "lot_01");
        assert_eq!(lots[0].lot_number, "LOT 01");
        assert_eq!(lots[47].id.as_str(), "lot_48");
        assert_eq!(lots[47].lot_number, "LOT 48");
        assert!(lots.iter().all(|l| l.owner_name.is_none()));
        assert!(lots.iter().all(|l| l.phone_number.is_none()));
    }

    #[rstest]
    #[case("LOT 01", 1)]
    #[case("LOT 2", 2)]
    #[case("LOT 10", 10)]
    #[case("lot 48", 48)]
    #[case("no digits", 0)]
    fn test_lot_sort_index(#[case] number: &str, #[case] expected: u32) {
        assert_eq!(lot_sort_index(number), expected);
    }

    #[test]
    fn test_numeric_order_not_lexicographic() {
        // Lexicographically "LOT 10" < "LOT 2"; numerically it must not be.
        let mut lots = vec![
            Lot {
                id: LotId::from_raw("lot_10"),
                lot_number: "LOT 10".to_string(),
                owner_name: None,
                phone_number: None,
            },
            Lot {
                id: LotId::from_raw("lot_2"),
                lot_number: "LOT 2".to_string(),
                owner_name: None,
                phone_number: None,
            },
        ];
        sort_by_lot_number(&mut lots);
        assert_eq!(lots[0].lot_number, "LOT 2");
        assert_eq!(lots[1].lot_number, "LOT 10");
    }
}
