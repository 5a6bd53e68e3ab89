//! The pages of the application and who may see them.

use crate::session::{AdminSession, UserSession};
use std::{fmt::Display, str::FromStr};

/// A page of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/`, the feedback form. Needs a signed-in user.
    Home,
    /// `/signup`
    SignUp,
    /// `/signin`
    SignIn,
    /// `/adminlogin`
    AdminLogin,
    /// `/admindashboard`. Needs an administrator session.
    AdminDashboard,
    /// Any other path.
    NotFound,
}

impl Route {
    /// Matches a path exactly. Anything unrecognized is [`Route::NotFound`].
    ///
    /// # Example
    ///
    /// ```
    /// # use feedback_collector::route::Route;
    /// assert_eq!(Route::AdminDashboard, Route::from_path("/admindashboard"));
    /// assert_eq!(Route::NotFound, Route::from_path("/admin"));
    /// ```
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        match path {
            "/" => Self::Home,
            "/signup" => Self::SignUp,
            "/signin" => Self::SignIn,
            "/adminlogin" => Self::AdminLogin,
            "/admindashboard" => Self::AdminDashboard,
            _ => Self::NotFound,
        }
    }

    /// The canonical path of the page. [`Route::NotFound`] has none of its own.
    #[must_use]
    pub const fn path(self) -> Option<&'static str> {
        match self {
            Self::Home => Some("/"),
            Self::SignUp => Some("/signup"),
            Self::SignIn => Some("/signin"),
            Self::AdminLogin => Some("/adminlogin"),
            Self::AdminDashboard => Some("/admindashboard"),
            Self::NotFound => None,
        }
    }

    /// Where a visitor asking for this page actually ends up.
    ///
    /// Without a user session `Home` sends them to `SignIn`; without an administrator
    /// session `AdminDashboard` sends them to `AdminLogin`. Other pages are open.
    #[must_use]
    pub fn resolve(self, user: Option<&UserSession>, admin: Option<&AdminSession>) -> Self {
        match self {
            Self::Home if user.is_none() => Self::SignIn,
            Self::AdminDashboard if admin.is_none() => Self::AdminLogin,
            route => route,
        }
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path().unwrap_or("*"))
    }
}

impl FromStr for Route {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_path(s))
    }
}
