use crate::config::settings::RatingSettings;

/// Weight given to the admin rating when blending it with the user average.
///
/// Decays with the number of reviews:
/// `influence = max(floor, 1 / (1 + count / decay_scale))`.
/// With the default settings this is 0.5 at 10 reviews and sits on the
/// 0.3 floor from 24 reviews onward.
pub fn admin_influence(review_count: u32, settings: &RatingSettings) -> f64 {
    let decayed = apply_review_decay(review_count, settings.decay_scale);
    decayed.max(settings.influence_floor)
}

fn apply_review_decay(review_count: u32, decay_scale: f64) -> f64 {
    1.0 / (1.0 + f64::from(review_count) / decay_scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_influence_is_full_without_reviews() {
        let settings = RatingSettings::default();
        assert_eq!(admin_influence(0, &settings), 1.0);
    }

    #[test]
    fn test_influence_is_half_at_ten_reviews() {
        let settings = RatingSettings::default();
        assert_eq!(admin_influence(10, &settings), 0.5);
    }

    #[test]
    fn test_influence_floor_kicks_in_at_24_reviews() {
        let settings = RatingSettings::default();

        // 1 / (1 + 2.3) ≈ 0.303, still above the floor
        assert!(admin_influence(23, &settings) > 0.3);
        assert_eq!(admin_influence(24, &settings), 0.3);
        assert_eq!(admin_influence(1_000_000, &settings), 0.3);
    }

    #[test]
    fn test_influence_never_increases_with_more_reviews() {
        let settings = RatingSettings::default();
        let mut previous = admin_influence(0, &settings);

        for count in 1..200 {
            let current = admin_influence(count, &settings);
            assert!(current <= previous, "influence rose at count {}", count);
            previous = current;
        }
    }
}
