//! Quantity-based labeling.
//!
//! The label is a stand-in derived from the ordered quantity, not from any
//! sentiment signal in the text: large orders count as positive, returns
//! (negative quantities) as negative, everything else as neutral.

use crate::dataset::record::Sentiment;

/// Quantities strictly above this value are positive.
pub const POSITIVE_ABOVE: i64 = 10;

/// Quantities strictly below this value are negative.
pub const NEGATIVE_BELOW: i64 = 0;

/// Map a quantity to its sentiment label.
pub fn label(quantity: i64) -> Sentiment {
    if quantity > POSITIVE_ABOVE {
        Sentiment::Positive
    } else if quantity < NEGATIVE_BELOW {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries() {
        assert_eq!(label(10), Sentiment::Neutral);
        assert_eq!(label(0), Sentiment::Neutral);
        assert_eq!(label(-1), Sentiment::Negative);
        assert_eq!(label(11), Sentiment::Positive);
    }

    #[test]
    fn test_label_over_range() {
        for q in -100..=100 {
            let expected = if q > 10 {
                Sentiment::Positive
            } else if q < 0 {
                Sentiment::Negative
            } else {
                Sentiment::Neutral
            };
            assert_eq!(label(q), expected, "quantity {q}");
        }
    }

    #[test]
    fn test_extremes() {
        assert_eq!(label(i64::MAX), Sentiment::Positive);
        assert_eq!(label(i64::MIN), Sentiment::Negative);
    }
}
