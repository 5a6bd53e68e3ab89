//! The administrator's view over every piece of feedback.
//!
//! [`Stats`], [`chart()`] and [`filter()`] are pure functions of the review list and
//! are recomputed whenever it changes. [`Dashboard`] only holds the list and the
//! current filter selection, and replaces the list wholesale on every refresh.

pub mod chart;
pub mod filter;
pub mod stats;

pub use chart::{Bar, chart};
pub use filter::{Filter, filter};
pub use stats::Stats;

use crate::{
    client::FeedbackSource,
    error::FeedbackError,
    model::Feedback,
    sentiment::{Emotion, Sentiment, Tone},
    session::AdminSession,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, instrument};

/// A feedback record prepared for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Review {
    /// Id of the underlying feedback.
    pub id: u32,
    /// Id of the author.
    pub user_id: u32,
    /// Star rating, `1..=5`.
    pub rating: u8,
    /// When the feedback was created.
    pub created_at: Option<DateTime<Utc>>,
    name: String,
    email: String,
    comment: Option<String>,
    emotion: Option<String>,
}

impl From<Feedback> for Review {
    fn from(feedback: Feedback) -> Self {
        let (name, email) = match feedback.user {
            Some(user) => (user.username, user.email),
            None => (
                format!("User {}", feedback.user_id),
                format!("user{}@example.com", feedback.user_id),
            ),
        };

        Self {
            id: feedback.id,
            user_id: feedback.user_id,
            rating: feedback.rating,
            created_at: feedback.created_at,
            name,
            email,
            comment: feedback.comment,
            emotion: feedback.emotion,
        }
    }
}

impl Review {
    /// Author's username, or `User {user_id}` when the author wasn't embedded.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Author's email, or a `user{user_id}@example.com` placeholder when the author wasn't embedded.
    #[inline]
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// The comment as left by the user.
    #[inline]
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// The comment, or `No comment`.
    #[inline]
    #[must_use]
    pub fn comment_text(&self) -> &str {
        match self.comment.as_deref() {
            Some(comment) if !comment.is_empty() => comment,
            _ => "No comment",
        }
    }

    /// The raw emotion label attached by the service.
    #[inline]
    #[must_use]
    pub fn emotion_label(&self) -> Option<&str> {
        self.emotion.as_deref()
    }

    /// The emotion, if it is one the client knows.
    #[inline]
    #[must_use]
    pub fn emotion(&self) -> Option<Emotion> {
        self.emotion.as_deref()?.parse().ok()
    }

    /// Which sentiment bucket the review falls into.
    #[inline]
    #[must_use]
    pub fn sentiment(&self) -> Sentiment {
        Sentiment::classify(self.emotion.as_deref())
    }

    /// The raw emotion label with its first letter capitalized, or `Unknown`.
    ///
    /// Unrecognized labels are shown as-is; they just don't count toward any bucket.
    #[must_use]
    pub fn sentiment_label(&self) -> String {
        let mut chars = match self.emotion.as_deref() {
            Some(label) if !label.is_empty() => label.chars(),
            _ => return "Unknown".to_owned(),
        };

        chars.next().map_or_else(String::new, |first| {
            first.to_uppercase().chain(chars).collect()
        })
    }

    /// Badge tone for the review's sentiment.
    #[inline]
    #[must_use]
    pub fn tone(&self) -> Tone {
        self.sentiment().tone()
    }

    /// Five stars, filled up to the rating: `★★★☆☆`.
    #[must_use]
    pub fn stars(&self) -> String {
        (1..=5_u8)
            .map(|star| if star <= self.rating { '★' } else { '☆' })
            .collect()
    }
}

/// The loaded feedback list and the current filter selection.
///
/// # Example
///
/// ```no_run
/// # use feedback_collector::{Client, dashboard::{Dashboard, Filter}, session::{AdminAuthority, ConfiguredAdmin}, error::Error};
/// # #[tokio::main]
/// # async fn main() -> Result<(), Error> {
/// let client = Client::new();
/// let admin = ConfiguredAdmin::new("admin", "correct horse").authenticate("admin", "correct horse").await?;
///
/// let mut dashboard = Dashboard::open(&client, &admin).await?;
/// dashboard.set_filter(Filter::Negative);
///
/// for review in dashboard.visible() {
///     println!("{} {}: {}", review.stars(), review.name(), review.comment_text());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    reviews: Vec<Review>,
    filter: Filter,
    search: String,
}

impl Dashboard {
    /// Fetches every piece of feedback. Requires an administrator session.
    #[instrument(name = "opening dashboard", skip_all, fields(admin = admin.username()))]
    pub async fn open<S>(source: &S, admin: &AdminSession) -> Result<Self, FeedbackError>
    where
        S: FeedbackSource,
    {
        let mut dashboard = Self::default();
        dashboard.refresh(source).await?;
        Ok(dashboard)
    }

    /// Builds a dashboard over an already fetched list.
    #[must_use]
    pub fn from_reviews(reviews: Vec<Review>) -> Self {
        Self {
            reviews,
            ..Self::default()
        }
    }

    /// Re-fetches every piece of feedback, replacing the current list.
    ///
    /// On failure the previous list is kept.
    pub async fn refresh<S>(&mut self, source: &S) -> Result<(), FeedbackError>
    where
        S: FeedbackSource,
    {
        let feedback = source.all_feedback().await?;
        self.reviews = feedback.into_iter().map(Review::from).collect();
        debug!(reviews = self.reviews.len(), "dashboard refreshed");
        Ok(())
    }

    /// Every loaded review, unfiltered.
    #[inline]
    #[must_use]
    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    /// Summary statistics over every loaded review.
    #[inline]
    #[must_use]
    pub fn stats(&self) -> Stats {
        Stats::from_reviews(&self.reviews)
    }

    /// Emotion distribution over every loaded review.
    #[inline]
    #[must_use]
    pub fn chart(&self) -> Vec<Bar> {
        chart(&self.reviews)
    }

    /// Currently selected filter.
    #[inline]
    #[must_use]
    pub fn selected_filter(&self) -> Filter {
        self.filter
    }

    /// Selects a sentiment filter.
    #[inline]
    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    /// Current search text.
    #[inline]
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Sets the search text.
    #[inline]
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// Reviews passing the current filter and search, in list order.
    #[inline]
    #[must_use]
    pub fn visible(&self) -> Vec<&Review> {
        filter(&self.reviews, self.filter, &self.search)
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use crate::{error::UnexpectedStatus, model::User};
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use std::collections::VecDeque;

    /// Answers each fetch with the next queued result.
    struct Queued(Mutex<VecDeque<Result<Vec<Feedback>, FeedbackError>>>);

    impl FeedbackSource for Queued {
        async fn all_feedback(&self) -> Result<Vec<Feedback>, FeedbackError> {
            self.0.lock().pop_front().unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    fn feedback(id: u32) -> Feedback {
        Feedback {
            id,
            user_id: id,
            rating: 3,
            comment: None,
            created_at: None,
            updated_at: None,
            emotion: None,
            user: None,
        }
    }

    fn ids(dashboard: &Dashboard) -> Vec<u32> {
        dashboard.reviews().iter().map(|review| review.id).collect()
    }

    pub(crate) fn review(id: u32, rating: u8, emotion: Option<&str>) -> Review {
        Review::from(Feedback {
            id,
            user_id: id,
            rating,
            comment: None,
            created_at: None,
            updated_at: None,
            emotion: emotion.map(str::to_owned),
            user: None,
        })
    }

    pub(crate) fn review_by(
        id: u32,
        username: &str,
        comment: Option<&str>,
        emotion: Option<&str>,
    ) -> Review {
        Review::from(Feedback {
            id,
            user_id: id,
            rating: 4,
            comment: comment.map(str::to_owned),
            created_at: None,
            updated_at: None,
            emotion: emotion.map(str::to_owned),
            user: Some(User {
                id,
                username: username.to_owned(),
                email: format!("{username}@example.com"),
            }),
        })
    }

    #[test]
    fn should_fall_back_when_author_missing() {
        let review = review(9, 3, None);

        assert_eq!("User 9", review.name());
        assert_eq!("user9@example.com", review.email());
        assert_eq!("No comment", review.comment_text());
        assert_eq!(None, review.comment());
    }

    #[test]
    fn should_use_embedded_author() {
        let review = review_by(1, "ana", Some("nice"), Some("fun"));

        assert_eq!("ana", review.name());
        assert_eq!("ana@example.com", review.email());
        assert_eq!("nice", review.comment_text());
    }

    #[test]
    fn sentiment_label_should_capitalize_raw_label() {
        assert_eq!("Happiness", review(1, 5, Some("happiness")).sentiment_label());
        assert_eq!("Foo", review(1, 5, Some("foo")).sentiment_label());
        assert_eq!("Unknown", review(1, 5, None).sentiment_label());
    }

    #[test]
    fn stars_should_fill_up_to_rating() {
        assert_eq!("★★★★☆", review(1, 4, None).stars());
        assert_eq!("★★★★★", review(1, 5, None).stars());
        assert_eq!("★☆☆☆☆", review(1, 1, None).stars());
    }

    #[test]
    fn dashboard_should_apply_selection() {
        let mut dashboard = Dashboard::from_reviews(vec![
            review_by(1, "ana", Some("love it"), Some("love")),
            review_by(2, "bob", Some("hate it"), Some("hate")),
            review_by(3, "cy", Some("it's fine"), Some("neutral")),
        ]);

        assert_eq!(3, dashboard.visible().len());
        assert_eq!(3, dashboard.stats().total);

        dashboard.set_filter(Filter::Negative);
        assert_eq!(vec![2], dashboard.visible().iter().map(|r| r.id).collect::<Vec<_>>());

        dashboard.set_filter(Filter::All);
        dashboard.set_search("IT'S");
        assert_eq!(vec![3], dashboard.visible().iter().map(|r| r.id).collect::<Vec<_>>());

        // Selection never changes the aggregate figures.
        assert_eq!(1, dashboard.stats().negative);
    }

    #[tokio::test]
    async fn refresh_should_replace_list_and_keep_it_on_failure() {
        let source = Queued(Mutex::new(VecDeque::from([
            Ok(vec![feedback(1), feedback(2)]),
            Ok(vec![feedback(3)]),
            Err(UnexpectedStatus(500).into()),
        ])));

        let mut dashboard = Dashboard::open(&source, &AdminSession::new("admin"))
            .await
            .unwrap();
        assert_eq!(vec![1, 2], ids(&dashboard));

        dashboard.set_filter(Filter::Neutral);
        dashboard.refresh(&source).await.unwrap();
        assert_eq!(vec![3], ids(&dashboard));
        assert_eq!(1, dashboard.stats().total);

        let err = dashboard.refresh(&source).await.unwrap_err();
        assert!(matches!(err, FeedbackError::UnexpectedStatus(_)));
        assert_eq!(vec![3], ids(&dashboard));
        assert_eq!(Filter::Neutral, dashboard.selected_filter());
    }
}
