//! Errors that can happen when interacting with the feedback service.
#![allow(missing_docs)]

use thiserror::Error;

pub use crate::stdx::error::Assumption;

pub use _inner::{
    AdminLoginError, ClientBuilderError, ConfigError, Error, FeedbackError, SessionError,
    SignInError, SignUpError, SubmitFeedbackError, UpdateFeedbackError,
};

pub(crate) use _inner::ResponseError;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct RequestError(#[from] pub(crate) reqwest::Error);

/// The service answered with a status this crate has no meaning for.
///
/// Carries the raw status code so callers can still branch on it.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("feedback service responded with unexpected status `{0}`")]
pub struct UnexpectedStatus(pub u16);

impl UnexpectedStatus {
    /// Returns the HTTP status code the service responded with.
    #[inline]
    #[must_use]
    pub fn code(self) -> u16 {
        self.0
    }
}

/// A base URL that could not be used to reach the service.
#[derive(Debug, Error)]
#[error("invalid base url `{url}`: {source}")]
pub struct InvalidBaseUrl {
    pub(crate) url: String,
    #[source]
    pub(crate) source: url::ParseError,
}

/// A configuration file that is not valid TOML for [`Config`](crate::config::Config).
#[derive(Debug, Error)]
#[error(transparent)]
pub struct MalformedConfig(#[from] pub(crate) toml::de::Error);

/// Persisted session data that could not be (de)serialized.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct MalformedSession(#[from] pub(crate) serde_json::Error);

mod _inner {
    use crate::stdx::error::Assumption;
    use error_set::error_set;

    error_set! {
        /// Union of every error set, for callers that don't care which call failed.
        Error := Base
        || ClientBuilderError
        || SignInError
        || SignUpError
        || SubmitFeedbackError
        || FeedbackError
        || UpdateFeedbackError
        || SessionError
        || ConfigError
        || AdminLoginError

        SignInError := {
            #[display("no user registered with this email")]
            EmailNotFound,
            #[display("password does not match")]
            InvalidPassword,
        } || Base || ClientError || Status

        SignUpError := {
            #[display("username already exists")]
            UsernameTaken,
        } || Base || ClientError || Status

        SubmitFeedbackError := {
            #[display("user does not exist")]
            UserNotFound,
        } || Base || ClientError || Status || InvalidRating

        UpdateFeedbackError := Base || ClientError || Status || InvalidRating

        FeedbackError := Base || ClientError || Status

        AdminLoginError := {
            #[display("no administrator credentials are configured")]
            NotConfigured,
            #[display("invalid username or password")]
            InvalidCredentials,
        }

        SessionError := {
            IoError(std::io::Error),
            MalformedSession(super::MalformedSession),
        }

        ConfigError := {
            IoError(std::io::Error),
            MalformedConfig(super::MalformedConfig),
            InvalidBaseUrl(super::InvalidBaseUrl),
            #[display("`FEEDBACK_API_TIMEOUT` must be a whole number of seconds")]
            InvalidTimeout,
        }

        ClientBuilderError := {
            BuildFailed,
            InvalidBaseUrl(super::InvalidBaseUrl),
        }

        // --- Internal ---

        ResponseError := Base || ClientError

        InvalidRating := {
            #[display("rating must be between 1 and 5")]
            InvalidRating,
        }

        Status := {
            UnexpectedStatus(super::UnexpectedStatus),
        }

        ClientError := {
            RequestFailed(super::RequestError),
        }

        Base := {
            Internal(Assumption),
        }
    }
}
