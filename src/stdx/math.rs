pub(crate) trait MathExt {
    /// Rounds to one decimal place, the precision the dashboard reports at.
    ///
    /// Halves round away from zero.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// assert_eq!(3.0f64.round_to_tenth(), 3.0);
    /// assert_eq!(3.33f64.round_to_tenth(), 3.3);
    /// assert_eq!(66.666f64.round_to_tenth(), 66.7);
    /// ```
    fn round_to_tenth(self) -> Self;
}

impl MathExt for f64 {
    #[inline]
    fn round_to_tenth(self) -> Self {
        (self * 10.0).round() / 10.0
    }
}

/// Converts a count into an `f64` without going through an `as` cast.
///
/// Counts beyond `u32::MAX` saturate, which is far past any list the dashboard holds.
#[inline]
pub(crate) fn count_to_f64(count: usize) -> f64 {
    f64::from(u32::try_from(count).unwrap_or(u32::MAX))
}

/// Returns `part` as a percentage of `whole`, or `0.0` when `whole` is zero.
#[inline]
pub(crate) fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }

    count_to_f64(part) / count_to_f64(whole) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_round_to_one_decimal() {
        assert_eq!(3.0, 3.0f64.round_to_tenth());
        assert_eq!(3.3, 3.33f64.round_to_tenth());
        assert_eq!(66.7, 66.666_666f64.round_to_tenth());
        assert_eq!(0.0, 0.0f64.round_to_tenth());
    }

    #[test]
    fn percentage_of_zero_should_be_zero() {
        assert_eq!(0.0, percentage(0, 0));
        assert_eq!(0.0, percentage(3, 0));
    }

    #[test]
    fn should_calculate_percentage() {
        assert_eq!(25.0, percentage(1, 4));
        assert_eq!(100.0, percentage(4, 4));
        assert_eq!(33.3, percentage(1, 3).round_to_tenth());
    }
}
