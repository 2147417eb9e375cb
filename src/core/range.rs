//! Price-range classification.
//!
//! Contacts without a precise budget store a pre-classified bracket label in
//! `rangeProp`; this module maps a listing price into the same label space so
//! the two can be compared directly.

/// Canonical bracket labels, ordered. These are the values the CRM offers in
/// its range picker, so `rangeProp` comparisons must normalize to them.
pub const PRICE_RANGE_LABELS: [&str; 8] = [
    "0 - 1,000,000",
    "1,000,000 - 2,000,000",
    "2,000,000 - 3,000,000",
    "3,000,000 - 4,000,000",
    "4,000,000 - 5,000,000",
    "5,000,000 - 7,000,000",
    "7,000,000 - 10,000,000",
    "10,000,000+",
];

/// Classify a price into its bracket label.
///
/// Total over all non-negative amounts: brackets are inclusive-exclusive
/// (`1,000,000` falls in the second bracket) and the top bracket is
/// open-ended, so every amount maps to exactly one label.
pub fn classify_price_range(amount: f64) -> &'static str {
    if amount < 1_000_000.0 {
        PRICE_RANGE_LABELS[0]
    } else if amount < 2_000_000.0 {
        PRICE_RANGE_LABELS[1]
    } else if amount < 3_000_000.0 {
        PRICE_RANGE_LABELS[2]
    } else if amount < 4_000_000.0 {
        PRICE_RANGE_LABELS[3]
    } else if amount < 5_000_000.0 {
        PRICE_RANGE_LABELS[4]
    } else if amount < 7_000_000.0 {
        PRICE_RANGE_LABELS[5]
    } else if amount < 10_000_000.0 {
        PRICE_RANGE_LABELS[6]
    } else {
        PRICE_RANGE_LABELS[7]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracket_lower_bounds_inclusive() {
        assert_eq!(classify_price_range(0.0), "0 - 1,000,000");
        assert_eq!(classify_price_range(1_000_000.0), "1,000,000 - 2,000,000");
        assert_eq!(classify_price_range(5_000_000.0), "5,000,000 - 7,000,000");
        assert_eq!(classify_price_range(10_000_000.0), "10,000,000+");
    }

    #[test]
    fn test_bracket_upper_bounds_exclusive() {
        assert_eq!(classify_price_range(999_999.99), "0 - 1,000,000");
        assert_eq!(classify_price_range(6_999_999.0), "5,000,000 - 7,000,000");
        assert_eq!(classify_price_range(9_999_999.0), "7,000,000 - 10,000,000");
    }

    #[test]
    fn test_open_top_bracket() {
        assert_eq!(classify_price_range(55_000_000.0), "10,000,000+");
    }

    #[test]
    fn test_partition_has_no_gaps() {
        // Walk a dense sample of [0, 12M]; every amount must land in exactly
        // one known label, and labels must be non-decreasing in order.
        let mut last_index = 0usize;
        let mut amount = 0.0f64;
        while amount <= 12_000_000.0 {
            let label = classify_price_range(amount);
            let index = PRICE_RANGE_LABELS
                .iter()
                .position(|l| *l == label)
                .expect("label outside canonical set");
            assert!(index >= last_index, "labels regressed at {}", amount);
            last_index = index;
            amount += 10_000.0;
        }
        assert_eq!(last_index, PRICE_RANGE_LABELS.len() - 1);
    }
}
