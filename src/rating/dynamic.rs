use super::types::RatingValue;
use super::weighting::admin_influence;
use crate::config::settings::RatingSettings;

/// Computes the rating shown to users ("hybrid with decay").
///
/// - nothing to rate: `None`
/// - admin rating only (or no reviews): the admin rating, unrounded
/// - user average only: the average, unrounded
/// - both: blended by [`admin_influence`] and rounded to one decimal
///
/// A value of `0` (or NaN) counts as not set, so an admin rating of exactly
/// zero is indistinguishable from a missing one.
pub fn compute_dynamic_rating(
    admin_rating: Option<RatingValue>,
    user_rating_average: Option<RatingValue>,
    user_rating_count: u32,
    settings: &RatingSettings,
) -> Option<RatingValue> {
    let admin = is_set(admin_rating);
    let average = is_set(user_rating_average);

    match (admin, average) {
        (None, None) => None,
        (Some(admin), None) => Some(admin),
        (Some(admin), Some(_)) if user_rating_count == 0 => Some(admin),
        (None, Some(average)) => Some(average),
        (Some(admin), Some(average)) => {
            let influence = admin_influence(user_rating_count, settings);
            Some(blend(admin, average, influence))
        }
    }
}

/// Influence the admin rating had on [`compute_dynamic_rating`], or `None`
/// when one of the pass-through branches applies.
pub fn applied_influence(
    admin_rating: Option<RatingValue>,
    user_rating_average: Option<RatingValue>,
    user_rating_count: u32,
    settings: &RatingSettings,
) -> Option<f64> {
    match (is_set(admin_rating), is_set(user_rating_average)) {
        (Some(_), Some(_)) if user_rating_count > 0 => {
            Some(admin_influence(user_rating_count, settings))
        }
        _ => None,
    }
}

fn blend(admin: RatingValue, average: RatingValue, influence: f64) -> RatingValue {
    round_to_tenth(influence * admin + (1.0 - influence) * average)
}

/// Rounds half-up to one decimal place.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}

fn is_set(value: Option<RatingValue>) -> Option<RatingValue> {
    value.filter(|v| *v != 0.0 && !v.is_nan())
}
