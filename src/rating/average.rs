use super::dynamic::round_to_tenth;
use super::types::{RatingValue, ReviewSummary};

/// Counts the review scores and averages them, rounded to one decimal.
/// No reviews means no average.
pub fn summarize_reviews(ratings: &[RatingValue]) -> ReviewSummary {
    let count = ratings.len() as u32;
    if count == 0 {
        return ReviewSummary { count, average: None };
    }

    let sum: f64 = ratings.iter().sum();
    ReviewSummary {
        count,
        average: Some(round_to_tenth(sum / f64::from(count))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_reviews_have_no_average() {
        let summary = summarize_reviews(&[]);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.average, None);
    }

    #[test]
    fn test_average_is_rounded_to_one_decimal() {
        // 22 / 3 = 7.333...
        let summary = summarize_reviews(&[7.0, 8.0, 7.0]);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.average, Some(7.3));
    }

    #[test]
    fn test_average_rounds_half_up() {
        // 17 / 2 = 8.5 exactly; 8.25 is 82.5 tenths
        assert_eq!(summarize_reviews(&[8.0, 9.0]).average, Some(8.5));
        assert_eq!(summarize_reviews(&[8.0, 8.5]).average, Some(8.3));
    }
}
