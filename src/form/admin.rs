//! The administrator login form.

use super::{FieldErrors, check_password, check_username};
use crate::{
    error::AdminLoginError,
    session::{AdminAuthority, AdminSession},
};
use thiserror::Error;
use tracing::{info, instrument, warn};

/// Why an administrator login failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AdminLoginFailure {
    /// Problems to show next to the inputs.
    #[error("{0}")]
    Fields(FieldErrors),
    /// Username and password didn't match.
    #[error("Invalid username or password")]
    InvalidCredentials,
    /// There is nothing to check credentials against.
    #[error("Admin login is not available.")]
    NotConfigured,
}

/// Username and password of an administrator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminLoginForm {
    #[allow(missing_docs)]
    pub username: String,
    #[allow(missing_docs)]
    pub password: String,
}

impl AdminLoginForm {
    #[allow(missing_docs)]
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Checks the inputs without contacting the authority.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        check_username(&mut errors, &self.username);
        check_password(&mut errors, &self.password);
        errors.into_result()
    }

    /// Validates, then asks `authority` for an administrator session.
    #[instrument(name = "submitting admin login form", skip_all)]
    pub async fn submit<A>(&self, authority: &A) -> Result<AdminSession, AdminLoginFailure>
    where
        A: AdminAuthority,
    {
        self.validate().map_err(AdminLoginFailure::Fields)?;

        match authority.authenticate(&self.username, &self.password).await {
            Ok(session) => {
                info!(admin = session.username(), "administrator signed in");
                Ok(session)
            }
            Err(AdminLoginError::InvalidCredentials) => {
                warn!(admin = %self.username, "rejected administrator credentials");
                Err(AdminLoginFailure::InvalidCredentials)
            }
            Err(AdminLoginError::NotConfigured) => Err(AdminLoginFailure::NotConfigured),
        }
    }
}
