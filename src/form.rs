//! Client-side state of the forms a user fills in.
//!
//! Each form validates locally first. A form with field errors never reaches the
//! network. Failures come back as small enums carrying the exact message to show.

pub mod admin;
pub mod feedback;
pub mod sign_in;
pub mod sign_up;

pub use admin::{AdminLoginFailure, AdminLoginForm};
pub use feedback::{FeedbackForm, Phase, SubmitFailure};
pub use sign_in::{SignInFailure, SignInForm};
pub use sign_up::{SignUpFailure, SignUpForm};

use regex::Regex;
use std::{fmt::Display, sync::LazyLock};

const MIN_PASSWORD_LEN: usize = 6;

#[expect(clippy::expect_used, reason = "pattern is a literal")]
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email regex should be valid"));

/// An input of one of the forms.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Username,
    Email,
    Password,
}

impl Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let field = match self {
            Self::Username => "username",
            Self::Email => "email",
            Self::Password => "password",
        };

        write!(f, "{field}")
    }
}

/// Messages attached to individual inputs, at most one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: Vec<(Field, &'static str)>,
}

impl FieldErrors {
    /// The message for `field`, if it has one.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, message)| *message)
    }

    /// Whether every field is fine.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Every field with a message, in the order the form lists them.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.errors.iter().copied()
    }

    pub(crate) fn single(field: Field, message: &'static str) -> Self {
        let mut errors = Self::default();
        errors.set(field, message);
        errors
    }

    /// Keeps the first message set for a field.
    fn set(&mut self, field: Field, message: &'static str) {
        if self.get(field).is_none() {
            self.errors.push((field, message));
        }
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (idx, (field, message)) in self.errors.iter().enumerate() {
            if idx > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {message}")?;
        }

        Ok(())
    }
}

fn check_username(errors: &mut FieldErrors, username: &str) {
    if username.trim().is_empty() {
        errors.set(Field::Username, "Username is required");
    }
}

fn check_email(errors: &mut FieldErrors, email: &str) {
    if email.trim().is_empty() {
        errors.set(Field::Email, "Email is required");
    } else if !EMAIL.is_match(email) {
        errors.set(Field::Email, "Email is invalid");
    }
}

fn check_password(errors: &mut FieldErrors, password: &str) {
    if password.is_empty() {
        errors.set(Field::Password, "Password is required");
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.set(Field::Password, "Password must be at least 6 characters");
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn email_check_should_follow_loose_pattern() {
        for (email, expected) in [
            ("", Some("Email is required")),
            ("   ", Some("Email is required")),
            ("\t\n", Some("Email is required")),
            ("ana", Some("Email is invalid")),
            ("ana@example", Some("Email is invalid")),
            ("ana@example.com", None),
            ("a@b.c", None),
        ] {
            let mut errors = FieldErrors::default();
            check_email(&mut errors, email);
            assert_eq!(expected, errors.get(Field::Email), "{email:?}");
        }
    }

    #[test]
    fn password_check_should_count_characters() {
        let mut errors = FieldErrors::default();
        check_password(&mut errors, "12345");
        assert_eq!(
            Some("Password must be at least 6 characters"),
            errors.get(Field::Password)
        );

        let mut errors = FieldErrors::default();
        check_password(&mut errors, "123456");
        assert!(errors.is_empty());
    }

    #[test]
    fn first_message_per_field_should_win() {
        let mut errors = FieldErrors::default();
        errors.set(Field::Email, "first");
        errors.set(Field::Email, "second");
        errors.set(Field::Password, "other");

        assert_eq!(Some("first"), errors.get(Field::Email));
        assert_eq!("email: first; password: other", errors.to_string());
    }
}
