//! Narrowing the review list by sentiment and free text.

use super::Review;
use crate::sentiment::Sentiment;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// Which sentiment bucket the review list is narrowed to.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    /// Every review, whatever its sentiment, including unknown.
    #[default]
    All,
    /// Only [`Sentiment::Positive`].
    Positive,
    /// Only [`Sentiment::Negative`].
    Negative,
    /// Only [`Sentiment::Neutral`].
    Neutral,
}

impl Filter {
    /// Returns whether a review of the given sentiment passes the filter.
    #[inline]
    #[must_use]
    pub fn admits(self, sentiment: Sentiment) -> bool {
        match self {
            Self::All => true,
            Self::Positive => sentiment == Sentiment::Positive,
            Self::Negative => sentiment == Sentiment::Negative,
            Self::Neutral => sentiment == Sentiment::Neutral,
        }
    }
}

impl Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let filter = match self {
            Self::All => "all",
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        };

        write!(f, "{filter}")
    }
}

/// An error that can happen when parsing a string into a [`Filter`].
#[derive(Debug, Error)]
#[error("`{0}` is not a valid filter. Expected one of `all`, `positive`, `negative` or `neutral`")]
pub struct ParseFilterError(String);

impl FromStr for Filter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "positive" => Ok(Self::Positive),
            "negative" => Ok(Self::Negative),
            "neutral" => Ok(Self::Neutral),
            _ => Err(ParseFilterError(s.to_owned())),
        }
    }
}

/// Returns the reviews that pass `filter` and whose author name or comment contains
/// `search`, ignoring case, in their original order.
///
/// An empty `search` matches every review.
///
/// # Example
///
/// ```
/// # use feedback_collector::dashboard::{Filter, Review, filter};
/// let reviews: [Review; 0] = [];
/// assert!(filter(&reviews, Filter::Positive, "great").is_empty());
/// ```
#[must_use]
pub fn filter<'a>(reviews: &'a [Review], filter: Filter, search: &str) -> Vec<&'a Review> {
    let needle = search.to_lowercase();

    reviews
        .iter()
        .filter(|review| filter.admits(review.sentiment()))
        .filter(|review| mentions(review, &needle))
        .collect()
}

/// `needle` must already be lowercase.
fn mentions(review: &Review, needle: &str) -> bool {
    needle.is_empty()
        || review.name().to_lowercase().contains(needle)
        || review.comment_text().to_lowercase().contains(needle)
}
