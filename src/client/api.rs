//! Request and response bodies that only exist on the wire.

use crate::model::User;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub(super) struct SignIn<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
pub(super) struct SignUp<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Deserialize)]
pub(super) struct SignInResponse {
    // NOTE: always `Sign in successful`, so not helpful.
    // message: String,
    pub user: User,
}

/// Acknowledgement bodies, e.g. after a delete.
#[derive(Deserialize)]
pub(super) struct Message {
    pub message: String,
}
