use thiserror::Error;

macro_rules! assumption {
    ($msg:literal $(, $args:expr)* ) => {{
        return Err($crate::stdx::error::Assumption::from(format!($msg $(, $args)*)).into());
    }};
    ($cond:expr, $msg:literal $(, $args:expr)* ) => {{
        if !$cond {
            return Err($crate::stdx::error::Assumption::from(format!("`{}`, {}", stringify!($cond), format!($msg $(, $args)*))).into());
        }
    }};
}

pub(crate) use assumption;

/// Represents assumptions about the feedback service that turned out to be wrong.
///
/// If this is returned, either the service changed the shape of its responses
/// or this crate misunderstood them. It is not actionable by the library user.
///
/// # Use
///
/// The rule of thumb for this error is that it is only used when interacting
/// with the service, as opposed to input data that might be passed to the library.
#[derive(Debug, Error)]
#[error("assumption about the feedback service violated: {0}")]
pub struct Assumption(String);

impl From<String> for Assumption {
    #[inline]
    fn from(msg: String) -> Self {
        Self(msg)
    }
}

pub(crate) trait Assume<T> {
    fn assumption(self, msg: impl Into<String>) -> Result<T, Assumption>;
}

impl<T, E> Assume<T> for Result<T, E> {
    #[inline]
    fn assumption(self, msg: impl Into<String>) -> Result<T, Assumption> {
        self.map_err(|_err: _| Assumption(msg.into()))
    }
}

pub(crate) trait AssumeFor<T, E> {
    fn assumption_for<F>(self, f: F) -> Result<T, Assumption>
    where
        F: FnOnce(E) -> String;
}

impl<T, E> AssumeFor<T, E> for Result<T, E> {
    #[inline]
    fn assumption_for<F>(self, f: F) -> Result<T, Assumption>
    where
        F: FnOnce(E) -> String,
    {
        self.map_err(|err| Assumption(f(err)))
    }
}
