//! The rating-and-comment form on the home page.

use crate::{
    client::FeedbackSink,
    error::SubmitFeedbackError,
    model::{Feedback, NewFeedback},
    session::UserSession,
};
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Where a [`FeedbackForm`] is in its submission lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    /// Ready for input.
    #[default]
    Idle,
    /// A submission is in flight.
    Submitting,
    /// The last submission failed. Input is kept so the user can try again.
    Failed(SubmitFailure),
}

/// Why a submission failed, with the message to show the user.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SubmitFailure {
    /// Submitted without selecting a star rating.
    #[error("Please select a rating!")]
    NoRating,
    /// The session refers to a user the service no longer knows.
    #[error("User not found. Please sign in again.")]
    UserNotFound,
    /// The service refused the rating.
    #[error("Invalid rating. Please select a rating between 1-5.")]
    InvalidRating,
    /// Anything else: network trouble, timeouts, unexpected answers.
    #[error("Failed to submit feedback. Please try again.")]
    Other,
}

/// The rating was outside `0..=5`.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("rating must be between 0 and 5, got {0}")]
pub struct RatingOutOfRange(pub u8);

/// A star rating plus an optional comment.
///
/// `submit` takes `&mut self`, so a second submission can't start while one is in flight.
///
/// # Example
///
/// ```no_run
/// # use feedback_collector::{Client, form::FeedbackForm, session::SessionStore};
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::new();
/// let Some(session) = SessionStore::in_memory().user().await? else {
///     return Ok(());
/// };
///
/// let mut form = FeedbackForm::new();
/// form.select_rating(4)?;
/// form.set_comment("Quick and friendly.");
///
/// match form.submit(&client, &session).await {
///     Ok(feedback) => println!("thanks! filed as #{}", feedback.id),
///     Err(failure) => println!("{failure}"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackForm {
    rating: u8,
    comment: String,
    phase: Phase,
}

impl FeedbackForm {
    /// An empty form: no stars selected, no comment.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected stars, `0` when nothing is selected yet.
    #[inline]
    #[must_use]
    pub fn rating(&self) -> u8 {
        self.rating
    }

    /// Selects a rating. `0` clears the selection.
    ///
    /// # Errors
    ///
    /// Returns [`RatingOutOfRange`] for anything above `5`, leaving the selection as it was.
    pub fn select_rating(&mut self, rating: u8) -> Result<(), RatingOutOfRange> {
        if rating > 5 {
            return Err(RatingOutOfRange(rating));
        }

        self.rating = rating;
        Ok(())
    }

    /// The comment typed so far.
    #[inline]
    #[must_use]
    pub fn comment(&self) -> &str {
        &self.comment
    }

    #[inline]
    #[allow(missing_docs)]
    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = comment.into();
    }

    /// Current lifecycle phase.
    #[inline]
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Sends the form as `session`'s feedback.
    ///
    /// Without a rating this fails with [`SubmitFailure::NoRating`] and nothing is sent.
    /// An empty comment is sent as no comment at all. On success the form is cleared and
    /// the created record is returned; on failure the input is kept. Nothing is retried.
    #[instrument(name = "submitting feedback form", skip_all, fields(user = session.user_id()))]
    pub async fn submit<S>(
        &mut self,
        sink: &S,
        session: &UserSession,
    ) -> Result<Feedback, SubmitFailure>
    where
        S: FeedbackSink,
    {
        if self.rating == 0 {
            self.phase = Phase::Failed(SubmitFailure::NoRating);
            return Err(SubmitFailure::NoRating);
        }

        let feedback = NewFeedback {
            user_id: session.user_id(),
            rating: self.rating,
            comment: (!self.comment.is_empty()).then(|| self.comment.clone()),
        };

        self.phase = Phase::Submitting;

        match sink.submit(&feedback).await {
            Ok(created) => {
                debug!(id = created.id, "feedback submitted, clearing form");
                *self = Self::default();
                Ok(created)
            }
            Err(err) => {
                warn!("feedback submission failed: {err}");
                let failure = SubmitFailure::from(err);
                self.phase = Phase::Failed(failure);
                Err(failure)
            }
        }
    }
}

impl From<SubmitFeedbackError> for SubmitFailure {
    fn from(error: SubmitFeedbackError) -> Self {
        match error {
            SubmitFeedbackError::UserNotFound => Self::UserNotFound,
            SubmitFeedbackError::InvalidRating => Self::InvalidRating,
            _ => Self::Other,
        }
    }
}
