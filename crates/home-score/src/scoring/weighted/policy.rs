/// Default ceiling of the normalized score.
pub const DEFAULT_NORMALIZED_SCALE: f64 = 10.0;

/// Rescales `raw` against `max_possible` onto `[0, scale]`, rounded to one decimal.
///
/// A non-positive maximum, or a scale that is not a positive number, normalizes to zero.
pub fn normalize(raw: f64, max_possible: f64, scale: f64) -> f64 {
    let valid_scale = scale.is_finite() && scale > 0.0;
    if max_possible <= 0.0 || !valid_scale {
        return 0.0;
    }

    let rounded = (raw / max_possible * scale * 10.0).round() / 10.0;
    rounded.clamp(0.0, scale)
}

/// Raw total after the dealbreaker veto: any dealbreaker zeroes the whole record.
pub(crate) fn vetoed_raw(raw: f64, dealbreakers: &[String]) -> f64 {
    if dealbreakers.is_empty() {
        raw
    } else {
        0.0
    }
}
