//! The registration form.

use super::{Field, FieldErrors, check_email, check_password, check_username};
use crate::{client::Authenticator, error::SignUpError, model::User};
use thiserror::Error;
use tracing::{info, instrument, warn};

/// Why registering failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignUpFailure {
    /// Problems to show next to the inputs, including a taken username.
    #[error("{0}")]
    Fields(FieldErrors),
    /// Anything else.
    #[error("Sign up failed. Please try again.")]
    Other,
}

impl SignUpFailure {
    /// The field errors, if this failure has any.
    #[must_use]
    pub fn fields(&self) -> Option<&FieldErrors> {
        match self {
            Self::Fields(errors) => Some(errors),
            Self::Other => None,
        }
    }
}

/// Details of a new user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpForm {
    #[allow(missing_docs)]
    pub username: String,
    #[allow(missing_docs)]
    pub email: String,
    #[allow(missing_docs)]
    pub password: String,
}

impl SignUpForm {
    /// Checks the inputs without contacting the service.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        check_username(&mut errors, &self.username);
        check_email(&mut errors, &self.email);
        check_password(&mut errors, &self.password);
        errors.into_result()
    }

    /// Validates, then registers through `auth`. The new user still has to sign in.
    #[instrument(name = "submitting sign-up form", skip_all)]
    pub async fn submit<A>(&self, auth: &A) -> Result<User, SignUpFailure>
    where
        A: Authenticator,
    {
        self.validate().map_err(SignUpFailure::Fields)?;

        match auth
            .register(&self.username, &self.email, &self.password)
            .await
        {
            Ok(user) => {
                info!(user = user.id, "user registered");
                Ok(user)
            }
            Err(SignUpError::UsernameTaken) => Err(SignUpFailure::Fields(FieldErrors::single(
                Field::Username,
                "Username already exists",
            ))),
            Err(err) => {
                warn!("sign up failed: {err}");
                Err(SignUpFailure::Other)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::form::sign_in::test::Service;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::Ordering;

    fn form(username: &str) -> SignUpForm {
        SignUpForm {
            username: username.to_owned(),
            email: format!("{username}@example.com"),
            password: "hunter22".to_owned(),
        }
    }

    #[tokio::test]
    async fn blank_username_should_be_required() {
        let service = Service::default();

        let failure = form("   ").submit(&service).await.unwrap_err();

        assert_eq!(
            Some("Username is required"),
            failure.fields().unwrap().get(Field::Username)
        );
        assert_eq!(0, service.calls.load(Ordering::Relaxed));
    }

    #[tokio::test]
    async fn taken_username_should_land_on_field() {
        let failure = form("ana").submit(&Service::default()).await.unwrap_err();

        assert_eq!(
            Some("Username already exists"),
            failure.fields().unwrap().get(Field::Username)
        );
    }

    #[tokio::test]
    async fn other_errors_should_be_generic() {
        let service = Service {
            down: true,
            ..Service::default()
        };

        let failure = form("bob").submit(&service).await.unwrap_err();

        assert_eq!(SignUpFailure::Other, failure);
    }

    #[tokio::test]
    async fn success_should_return_new_user() {
        let user = form("bob").submit(&Service::default()).await.unwrap();

        assert_eq!("bob", user.username);
        assert_eq!("bob@example.com", user.email);
    }
}
