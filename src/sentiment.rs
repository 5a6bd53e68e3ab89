//! Classification of emotion labels into sentiment buckets.
//!
//! The service attaches a free-text emotion label to each comment. Only ten labels
//! are known to the client; everything else, including a missing label, is
//! [`Sentiment::Unknown`] and takes no part in the per-bucket statistics.

use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// The sentiment bucket an emotion falls into.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    /// `happiness`, `fun`, `relief`, `enthusiasm` or `love`.
    Positive,
    /// `anger`, `hate`, `worry` or `sadness`.
    Negative,
    /// `neutral`.
    Neutral,
    /// Missing or unrecognized label.
    Unknown,
}

impl Sentiment {
    /// Classifies an optional emotion label, ignoring case.
    ///
    /// Never fails: anything that isn't a known [`Emotion`] is [`Sentiment::Unknown`].
    ///
    /// # Example
    ///
    /// ```
    /// # use feedback_collector::sentiment::Sentiment;
    /// assert_eq!(Sentiment::Positive, Sentiment::classify(Some("HAPPINESS")));
    /// assert_eq!(Sentiment::Neutral, Sentiment::classify(Some("neutral")));
    /// assert_eq!(Sentiment::Unknown, Sentiment::classify(Some("surprise")));
    /// assert_eq!(Sentiment::Unknown, Sentiment::classify(None));
    /// ```
    #[must_use]
    pub fn classify(label: Option<&str>) -> Self {
        label
            .and_then(|label| label.parse::<Emotion>().ok())
            .map_or(Self::Unknown, Emotion::sentiment)
    }

    /// Returns the badge tone a record of this sentiment is shown with.
    #[inline]
    #[must_use]
    pub const fn tone(self) -> Tone {
        match self {
            Self::Positive => Tone::Green,
            Self::Negative => Tone::Red,
            Self::Neutral => Tone::Yellow,
            Self::Unknown => Tone::Gray,
        }
    }
}

impl Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sentiment = match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
            Self::Unknown => "unknown",
        };

        write!(f, "{sentiment}")
    }
}

/// Colour family of a sentiment badge.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    Green,
    Red,
    Yellow,
    Gray,
}

/// An emotion label the client knows about.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Happiness,
    Fun,
    Relief,
    Enthusiasm,
    Love,
    Anger,
    Hate,
    Worry,
    Sadness,
    Neutral,
}

impl Emotion {
    /// Every known emotion, in the order the dashboard chart lists them.
    pub const ALL: [Self; 10] = [
        Self::Happiness,
        Self::Fun,
        Self::Relief,
        Self::Enthusiasm,
        Self::Love,
        Self::Anger,
        Self::Hate,
        Self::Worry,
        Self::Sadness,
        Self::Neutral,
    ];

    /// Returns the sentiment bucket of the emotion.
    #[inline]
    #[must_use]
    pub const fn sentiment(self) -> Sentiment {
        match self {
            Self::Happiness | Self::Fun | Self::Relief | Self::Enthusiasm | Self::Love => {
                Sentiment::Positive
            }
            Self::Anger | Self::Hate | Self::Worry | Self::Sadness => Sentiment::Negative,
            Self::Neutral => Sentiment::Neutral,
        }
    }

    /// Returns the label as the service spells it.
    ///
    /// Example:
    /// - `Emotion::Happiness => "happiness"`,
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Happiness => "happiness",
            Self::Fun => "fun",
            Self::Relief => "relief",
            Self::Enthusiasm => "enthusiasm",
            Self::Love => "love",
            Self::Anger => "anger",
            Self::Hate => "hate",
            Self::Worry => "worry",
            Self::Sadness => "sadness",
            Self::Neutral => "neutral",
        }
    }

    /// Returns the capitalized label shown on the chart axis.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Happiness => "Happiness",
            Self::Fun => "Fun",
            Self::Relief => "Relief",
            Self::Enthusiasm => "Enthusiasm",
            Self::Love => "Love",
            Self::Anger => "Anger",
            Self::Hate => "Hate",
            Self::Worry => "Worry",
            Self::Sadness => "Sadness",
            Self::Neutral => "Neutral",
        }
    }

    /// Returns the hex colour of the emotion's chart bar.
    #[inline]
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Happiness => "#10b981",
            Self::Fun => "#22c55e",
            Self::Relief => "#84cc16",
            Self::Enthusiasm => "#eab308",
            Self::Love => "#f97316",
            Self::Anger => "#ef4444",
            Self::Hate => "#dc2626",
            Self::Worry => "#f59e0b",
            Self::Sadness => "#8b5cf6",
            Self::Neutral => "#6b7280",
        }
    }
}

impl Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error that can happen when parsing a string into an [`Emotion`].
#[derive(Debug, Error)]
#[error("`{0}` is not a known emotion")]
pub struct ParseEmotionError(String);

impl FromStr for Emotion {
    type Err = ParseEmotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowercase = s.to_lowercase();

        Self::ALL
            .into_iter()
            .find(|emotion| emotion.as_str() == lowercase)
            .ok_or_else(|| ParseEmotionError(s.to_owned()))
    }
}
