//! Summary statistics over the feedback list.

use super::Review;
use crate::{
    sentiment::Sentiment,
    stdx::math::{MathExt, count_to_f64, percentage},
};
use serde::Serialize;

/// Figures shown on the dashboard's summary cards.
///
/// Derived from scratch on every list change; nothing is cached or updated incrementally.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Stats {
    /// Every record, known emotion or not.
    pub total: usize,
    /// Mean rating over every record, to one decimal. `0.0` for an empty list.
    pub average_rating: f64,
    /// Records with a positive emotion.
    pub positive: usize,
    /// Records with a negative emotion.
    pub negative: usize,
    /// Records with the neutral emotion.
    pub neutral: usize,
    /// Records with a missing or unrecognized emotion.
    pub unknown: usize,
    /// `positive` as a percentage of `total`, to one decimal.
    pub positive_percentage: f64,
    /// `negative` as a percentage of `total`, to one decimal.
    pub negative_percentage: f64,
    /// `neutral` as a percentage of `total`, to one decimal.
    pub neutral_percentage: f64,
}

impl Stats {
    /// Computes the statistics for a list of reviews.
    ///
    /// # Example
    ///
    /// ```
    /// # use feedback_collector::dashboard::{Review, Stats};
    /// let stats = Stats::from_reviews(&[]);
    ///
    /// assert_eq!(0, stats.total);
    /// assert_eq!(0.0, stats.average_rating);
    /// assert_eq!(0.0, stats.positive_percentage);
    /// ```
    #[must_use]
    pub fn from_reviews(reviews: &[Review]) -> Self {
        let total = reviews.len();

        let mut stats = Self {
            total,
            ..Self::default()
        };

        let mut sum = 0_u32;

        for review in reviews {
            sum += u32::from(review.rating);

            match review.sentiment() {
                Sentiment::Positive => stats.positive += 1,
                Sentiment::Negative => stats.negative += 1,
                Sentiment::Neutral => stats.neutral += 1,
                Sentiment::Unknown => stats.unknown += 1,
            }
        }

        if total > 0 {
            stats.average_rating = (f64::from(sum) / count_to_f64(total)).round_to_tenth();
        }

        stats.positive_percentage = percentage(stats.positive, total).round_to_tenth();
        stats.negative_percentage = percentage(stats.negative, total).round_to_tenth();
        stats.neutral_percentage = percentage(stats.neutral, total).round_to_tenth();

        stats
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dashboard::test::review;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_list_should_be_all_zero() {
        assert_eq!(Stats::default(), Stats::from_reviews(&[]));
    }

    #[test]
    fn should_average_ratings() {
        let reviews = [
            review(1, 5, Some("happiness")),
            review(2, 3, Some("anger")),
            review(3, 1, None),
        ];

        assert_eq!(3.0, Stats::from_reviews(&reviews).average_rating);
    }

    #[test]
    fn should_round_average_to_one_decimal() {
        let reviews = [
            review(1, 5, None),
            review(2, 4, None),
            review(3, 4, None),
        ];

        assert_eq!(4.3, Stats::from_reviews(&reviews).average_rating);
    }

    #[test]
    fn should_count_each_bucket_once() {
        let reviews = [
            review(1, 5, Some("happiness")),
            review(2, 1, Some("anger")),
            review(3, 3, Some("neutral")),
            review(4, 2, Some("foo")),
        ];

        let stats = Stats::from_reviews(&reviews);

        assert_eq!(4, stats.total);
        assert_eq!(1, stats.positive);
        assert_eq!(1, stats.negative);
        assert_eq!(1, stats.neutral);
        assert_eq!(1, stats.unknown);
        assert_eq!(25.0, stats.positive_percentage);
        assert_eq!(25.0, stats.negative_percentage);
        assert_eq!(25.0, stats.neutral_percentage);
        // Unknown emotions still count toward the average.
        assert_eq!(2.8, stats.average_rating);
    }

    #[test]
    fn should_round_percentages_to_one_decimal() {
        let reviews = [
            review(1, 5, Some("love")),
            review(2, 4, Some("Fun")),
            review(3, 1, Some("WORRY")),
        ];

        let stats = Stats::from_reviews(&reviews);

        assert_eq!(66.7, stats.positive_percentage);
        assert_eq!(33.3, stats.negative_percentage);
        assert_eq!(0.0, stats.neutral_percentage);
    }
}
