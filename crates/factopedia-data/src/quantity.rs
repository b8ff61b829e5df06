//! Display strings for ingredient and product counts.

use crate::raw::format_number;

/// Format a count as `[probability% ][min[–max]]x`.
///
/// - The amount is `min` alone when `min == max`, otherwise `min–max`
///   (en-dash), always followed by `x`.
/// - A probability of 1 adds nothing; anything else adds the percentage with
///   two decimals.
/// - A certain-count of exactly one with a probability collapses to the
///   percentage alone.
pub fn format_quantity(min: f64, max: f64, probability: f64) -> String {
    let amount = if min < max {
        format!("{}–{}x", format_number(min), format_number(max))
    } else {
        format!("{}x", format_number(min))
    };

    if probability == 1.0 {
        return amount;
    }

    let prob = format!("{:.2}%", probability * 100.0);
    if min == 1.0 && max == 1.0 {
        prob
    } else {
        format!("{prob} {amount}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn fixed_amount() {
        assert_eq!(format_quantity(5.0, 5.0, 1.0), "5x");
    }

    #[test]
    fn ranged_amount() {
        assert_eq!(format_quantity(1.0, 3.0, 1.0), "1–3x");
    }

    #[test]
    fn single_with_probability_drops_amount() {
        assert_eq!(format_quantity(1.0, 1.0, 0.5), "50.00%");
    }

    #[test]
    fn range_with_probability() {
        assert_eq!(format_quantity(2.0, 4.0, 0.25), "25.00% 2–4x");
    }

    #[test]
    fn fractional_amounts() {
        assert_eq!(format_quantity(0.5, 0.5, 1.0), "0.5x");
        assert_eq!(format_quantity(10.0, 10.0, 0.007), "0.70% 10x");
    }

    proptest! {
        #[test]
        fn certain_counts_end_with_x(min in 0u32..1000, extra in 0u32..1000) {
            let max = min + extra;
            let s = format_quantity(min as f64, max as f64, 1.0);
            prop_assert!(s.ends_with('x'));
            prop_assert!(!s.contains('%'));
            prop_assert_eq!(s.contains('–'), extra > 0);
        }

        #[test]
        fn uncertain_counts_carry_percentage(min in 2u32..1000, p in 0.01f64..0.99) {
            let s = format_quantity(min as f64, min as f64, p);
            prop_assert!(s.contains("% "));
            let expected = format!("{}x", min);
            prop_assert!(s.ends_with(&expected));
        }
    }
}
