//! Chart-ready emotion distribution.

use super::Review;
use crate::sentiment::Emotion;
use serde::Serialize;

/// One bar of the emotion distribution chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bar {
    /// Which emotion the bar counts.
    pub emotion: Emotion,
    /// Records carrying that emotion.
    pub count: usize,
}

impl Bar {
    /// Capitalized axis label, e.g. `Happiness`.
    #[inline]
    #[must_use]
    pub fn label(&self) -> &'static str {
        self.emotion.label()
    }

    /// Hex colour of the bar.
    #[inline]
    #[must_use]
    pub fn color(&self) -> &'static str {
        self.emotion.color()
    }
}

/// Counts reviews per known emotion.
///
/// Always yields one bar per [`Emotion::ALL`] entry, in that order, including bars
/// with a zero count. Reviews with an unrecognized emotion are left out entirely.
#[must_use]
pub fn chart(reviews: &[Review]) -> Vec<Bar> {
    let mut counts = [0_usize; Emotion::ALL.len()];

    for emotion in reviews.iter().filter_map(Review::emotion) {
        if let Some(idx) = Emotion::ALL.iter().position(|known| *known == emotion) {
            counts[idx] += 1;
        }
    }

    Emotion::ALL
        .into_iter()
        .zip(counts)
        .map(|(emotion, count)| Bar { emotion, count })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dashboard::test::review;
    use pretty_assertions::assert_eq;

    #[test]
    fn should_include_zero_count_bars() {
        let reviews = [
            review(1, 5, Some("happiness")),
            review(2, 1, Some("anger")),
            review(3, 3, Some("neutral")),
            review(4, 2, Some("foo")),
        ];

        let bars = chart(&reviews);

        assert_eq!(10, bars.len());
        assert_eq!(3, bars.iter().map(|bar| bar.count).sum::<usize>());

        let counts: Vec<_> = bars.iter().map(|bar| (bar.label(), bar.count)).collect();
        assert_eq!(
            vec![
                ("Happiness", 1),
                ("Fun", 0),
                ("Relief", 0),
                ("Enthusiasm", 0),
                ("Love", 0),
                ("Anger", 1),
                ("Hate", 0),
                ("Worry", 0),
                ("Sadness", 0),
                ("Neutral", 1),
            ],
            counts
        );
    }

    #[test]
    fn should_count_ignoring_case() {
        let reviews = [review(1, 5, Some("LOVE")), review(2, 5, Some("love"))];

        let love = chart(&reviews)
            .into_iter()
            .find(|bar| bar.emotion == Emotion::Love)
            .unwrap();

        assert_eq!(2, love.count);
        assert_eq!("#f97316", love.color());
    }

    #[test]
    fn empty_list_should_chart_all_zero() {
        assert!(chart(&[]).iter().all(|bar| bar.count == 0));
    }
}
