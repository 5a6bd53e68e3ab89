//! Records exchanged with the feedback service.

use crate::{sentiment::Sentiment, stdx::serde::optional_timestamp};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user, as the service reports it.
///
/// Any other fields the service sends along, like a password hash on sign-up, are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct User {
    /// Service assigned id.
    pub id: u32,
    /// Display name.
    pub username: String,
    /// Email the user signs in with.
    pub email: String,
}

/// A single piece of feedback left by a user.
///
/// Produced by the service; the client never edits one in place.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Feedback {
    /// Service assigned id.
    pub id: u32,
    /// Id of the user who left the feedback.
    pub user_id: u32,
    /// Star rating, `1..=5`.
    pub rating: u8,
    /// Free text left alongside the rating.
    #[serde(default)]
    pub comment: Option<String>,
    /// When the feedback was created.
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    /// When the feedback was last edited.
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Emotion label the service attached to the comment, if any.
    #[serde(default)]
    pub emotion: Option<String>,
    /// The author, only embedded when listing all feedback.
    #[serde(default)]
    pub user: Option<User>,
}

impl Feedback {
    /// Returns which sentiment bucket the feedback's emotion falls into.
    ///
    /// # Example
    ///
    /// ```
    /// # use feedback_collector::{model::Feedback, sentiment::Sentiment};
    /// let feedback: Feedback = serde_json::from_str(
    ///     r#"{"id":1,"user_id":2,"rating":5,"comment":"great","emotion":"Love"}"#,
    /// )?;
    ///
    /// assert_eq!(Sentiment::Positive, feedback.sentiment());
    /// # Ok::<(), serde_json::Error>(())
    /// ```
    #[inline]
    #[must_use]
    pub fn sentiment(&self) -> Sentiment {
        Sentiment::classify(self.emotion.as_deref())
    }
}

/// Body of `POST /feedback/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewFeedback {
    /// Author of the feedback.
    pub user_id: u32,
    /// Star rating, `1..=5`.
    pub rating: u8,
    /// Sent as `null` when there is nothing to say.
    pub comment: Option<String>,
}

/// Body of `PUT /feedback/{id}`. Unset fields are left untouched by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeedbackUpdate {
    /// New star rating, `1..=5`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    /// New comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Service computed rating analytics from `GET /feedback/analytics`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Analytics {
    /// Number of feedback records stored.
    #[serde(rename = "total_feedback")]
    pub total: u32,
    /// Mean rating, as rounded by the service.
    #[serde(rename = "average_rating")]
    pub average: f64,
    /// How many records have each rating. Ratings nobody gave are absent.
    #[serde(rename = "rating_distribution")]
    pub distribution: Vec<RatingCount>,
}

impl Analytics {
    /// Returns how many records have the given rating.
    #[must_use]
    pub fn count_for(&self, rating: u8) -> u32 {
        self.distribution
            .iter()
            .find(|entry| entry.rating == rating)
            .map_or(0, |entry| entry.count)
    }
}

/// One bucket of [`Analytics::distribution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct RatingCount {
    /// Star rating.
    pub rating: u8,
    /// Records with that rating.
    pub count: u32,
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn should_deserialize_listed_feedback() {
        const JSON: &str = r#"{
            "id": 7,
            "user_id": 3,
            "rating": 4,
            "comment": "pretty good",
            "emotion": "happiness",
            "created_at": "2025-06-01T12:00:00.123456",
            "updated_at": null,
            "user": { "id": 3, "username": "ana", "email": "ana@example.com" }
        }"#;

        let feedback: Feedback = serde_json::from_str(JSON).unwrap();

        assert_eq!(7, feedback.id);
        assert_eq!(Some("pretty good"), feedback.comment.as_deref());
        assert!(feedback.created_at.is_some());
        assert!(feedback.updated_at.is_none());
        assert_eq!("ana", feedback.user.unwrap().username);
    }

    #[test]
    fn should_deserialize_created_feedback_without_user() {
        const JSON: &str = r#"{"id":1,"user_id":1,"rating":2,"comment":null,"emotion":null,"created_at":"2025-06-01T12:00:00","updated_at":"2025-06-01T12:00:00"}"#;

        let feedback: Feedback = serde_json::from_str(JSON).unwrap();

        assert!(feedback.user.is_none());
        assert!(feedback.comment.is_none());
        assert_eq!(Sentiment::Unknown, feedback.sentiment());
    }

    #[test]
    fn new_feedback_should_send_null_comment() {
        let body = serde_json::to_value(NewFeedback {
            user_id: 1,
            rating: 3,
            comment: None,
        })
        .unwrap();

        assert_eq!(
            serde_json::json!({ "user_id": 1, "rating": 3, "comment": null }),
            body
        );
    }

    #[test]
    fn update_should_omit_unset_fields() {
        let body = serde_json::to_value(FeedbackUpdate {
            rating: Some(5),
            comment: None,
        })
        .unwrap();

        assert_eq!(serde_json::json!({ "rating": 5 }), body);
    }

    #[test]
    fn should_ignore_password_hash_on_user() {
        let user: User = serde_json::from_str(
            r#"{"id":1,"username":"ana","email":"ana@example.com","password":"pbkdf2:sha256$..."}"#,
        )
        .unwrap();

        assert_eq!("ana@example.com", user.email);
    }

    #[test]
    fn analytics_should_default_missing_ratings_to_zero() {
        let analytics: Analytics = serde_json::from_str(
            r#"{"total_feedback":3,"average_rating":4.33,"rating_distribution":[{"rating":4,"count":2},{"rating":5,"count":1}]}"#,
        )
        .unwrap();

        assert_eq!(3, analytics.total);
        assert_eq!(2, analytics.count_for(4));
        assert_eq!(0, analytics.count_for(1));
    }
}
