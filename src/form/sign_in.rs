//! The end user sign-in form.

use super::{Field, FieldErrors, check_email, check_password};
use crate::{client::Authenticator, error::SignInError, session::UserSession};
use thiserror::Error;
use tracing::{info, instrument, warn};

/// Why signing in failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignInFailure {
    /// Problems to show next to the inputs. Also used for the service's
    /// "unknown email" and "wrong password" answers.
    #[error("{0}")]
    Fields(FieldErrors),
    /// Anything else.
    #[error("Sign in failed. Please try again.")]
    Other,
}

impl SignInFailure {
    /// The field errors, if this failure has any.
    #[must_use]
    pub fn fields(&self) -> Option<&FieldErrors> {
        match self {
            Self::Fields(errors) => Some(errors),
            Self::Other => None,
        }
    }
}

/// Email and password of an existing user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignInForm {
    #[allow(missing_docs)]
    pub email: String,
    #[allow(missing_docs)]
    pub password: String,
}

impl SignInForm {
    #[allow(missing_docs)]
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Checks the inputs without contacting the service.
    ///
    /// # Errors
    ///
    /// Every field that is missing or malformed.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        check_email(&mut errors, &self.email);
        check_password(&mut errors, &self.password);
        errors.into_result()
    }

    /// Validates, then signs in through `auth`.
    ///
    /// The returned session is not persisted; hand it to
    /// [`SessionStore::save_user`](crate::session::SessionStore::save_user) for that.
    #[instrument(name = "submitting sign-in form", skip_all)]
    pub async fn submit<A>(&self, auth: &A) -> Result<UserSession, SignInFailure>
    where
        A: Authenticator,
    {
        self.validate().map_err(SignInFailure::Fields)?;

        match auth.authenticate(&self.email, &self.password).await {
            Ok(user) => {
                info!(user = user.id, "user signed in");
                Ok(UserSession::new(user))
            }
            Err(SignInError::EmailNotFound) => Err(SignInFailure::Fields(FieldErrors::single(
                Field::Email,
                "User not found with this email",
            ))),
            Err(SignInError::InvalidPassword) => Err(SignInFailure::Fields(
                FieldErrors::single(Field::Password, "Invalid password"),
            )),
            Err(err) => {
                warn!("sign in failed: {err}");
                Err(SignInFailure::Other)
            }
        }
    }
}
