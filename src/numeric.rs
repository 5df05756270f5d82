use num_traits::Float;
use std::fmt::Display;

/// Assert two float values are the same up to `eps`.
#[allow(dead_code)]
pub fn assert_float_eq<T>(left: T, right: T, eps: T)
where
    T: Float + Display,
{
    if left.is_nan() {
        assert!(right.is_nan(), "left is NaN, but right is not");
    } else {
        let diff = (left - right).abs();
        assert!(
            diff < eps,
            "values |{} - {}| ≥ {} (diff: {})",
            left,
            right,
            eps,
            diff
        );
    }
}

/// Assert two float values agree to a relative tolerance `rel`.
#[allow(dead_code)]
pub fn assert_float_rel_eq<T>(left: T, right: T, rel: T)
where
    T: Float + Display,
{
    let scale = left.abs().max(right.abs());
    if scale == T::zero() {
        return;
    }
    assert_float_eq(left, right, rel * scale)
}

/// The largest of some floats, or `None` if there are none.
///
/// NaN values are skipped.
pub fn max_float<T, I>(values: I) -> Option<T>
where
    T: Float,
    I: IntoIterator<Item = T>,
{
    values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| match acc {
            None => Some(v),
            Some(m) => Some(m.max(v)),
        })
}

/// Format a float for TSV output, dropping a trailing `.0` on whole numbers
/// and switching to scientific notation for very small values.
pub fn format_float(x: f64) -> String {
    if x != 0.0 && x.abs() < 1e-3 {
        format!("{:.6e}", x)
    } else if x.fract() == 0.0 {
        format!("{:.0}", x)
    } else {
        let formatted = format!("{:.6}", x);
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}
