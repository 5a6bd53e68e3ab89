//! Represents a client abstraction for the feedback service's REST API.

mod api;

use crate::{
    config::ApiConfig,
    error::{
        Assumption, ClientBuilderError, FeedbackError, InvalidBaseUrl, RequestError,
        ResponseError, SignInError, SignUpError, SubmitFeedbackError, UnexpectedStatus,
        UpdateFeedbackError,
    },
    model::{Analytics, Feedback, FeedbackUpdate, NewFeedback, User},
    stdx::{
        error::{Assume, AssumeFor, assumption},
        http::{DEFAULT_USER_AGENT, json_headers},
    },
};
use api::{Message, SignIn, SignInResponse, SignUp};
use reqwest::{Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use std::{future::Future, sync::Arc, time::Duration};
use tracing::{debug, instrument, warn};
use url::Url;

/// Where the service listens when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/api";

/// How long a request may take before it is abandoned.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A builder for configuring and creating instances of [`Client`] with custom settings.
///
/// The `ClientBuilder` provides an API for fine-tuning the base URL, request timeout
/// and user agent of the `Client`. It enables a more controlled construction of the
/// `Client` when the default configuration isn't sufficient.
///
/// # Usage
///
/// The builder allows for method chaining to incrementally configure the client, with the final
/// step being a call to [`build()`](ClientBuilder::build()), which consumes the builder and returns a [`Client`].
///
/// # Example
///
/// ```
/// # use feedback_collector::client::ClientBuilder;
/// # use std::time::Duration;
/// let client = ClientBuilder::new()
///     .base_url("https://feedback.example.com/api")
///     .timeout(Duration::from_secs(3))
///     .build()?;
/// # Ok::<(), feedback_collector::error::ClientBuilderError>(())
/// ```
#[derive(Debug)]
pub struct ClientBuilder {
    builder: reqwest::ClientBuilder,
    base_url: String,
}

impl Default for ClientBuilder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    ///
    /// This targets [`DEFAULT_BASE_URL`] with a [`DEFAULT_TIMEOUT`], sends
    /// `Content-Type: application/json`, and uses a default user agent (`$CARGO_PKG_NAME/$CARGO_PKG_VERSION`).
    ///
    /// # Example
    ///
    /// ```
    /// # use feedback_collector::client::ClientBuilder;
    /// let builder = ClientBuilder::new();
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        let builder = reqwest::Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .default_headers(json_headers())
            .timeout(DEFAULT_TIMEOUT)
            .use_rustls_tls()
            .brotli(true);

        Self {
            builder,
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }

    /// Creates a `ClientBuilder` from loaded [`ApiConfig`].
    #[must_use]
    pub fn from_config(config: &ApiConfig) -> Self {
        let builder = Self::new()
            .base_url(&config.base_url)
            .timeout(Duration::from_secs(config.timeout_secs));

        match config.user_agent.as_deref() {
            Some(user_agent) => builder.user_agent(user_agent),
            None => builder,
        }
    }

    /// Sets the URL every endpoint path is resolved against, e.g. `http://127.0.0.1:5000/api`.
    #[inline]
    #[must_use]
    pub fn base_url(mut self, base_url: &str) -> Self {
        base_url.clone_into(&mut self.base_url);
        self
    }

    /// Sets how long a request may take, from connecting to reading the body, before it fails.
    #[inline]
    #[must_use]
    pub fn timeout(self, timeout: Duration) -> Self {
        let builder = self.builder.timeout(timeout);
        Self { builder, ..self }
    }

    /// Sets a custom `User-Agent` header for the [`Client`].
    ///
    /// By default, the user agent is set to (`$CARGO_PKG_NAME/$CARGO_PKG_VERSION`), but this can be overridden using this method.
    ///
    /// # Example
    ///
    /// ```
    /// # use feedback_collector::client::ClientBuilder;
    /// let builder = ClientBuilder::new().user_agent("custom-agent/1.0");
    /// ```
    #[inline]
    #[must_use]
    pub fn user_agent(self, user_agent: &str) -> Self {
        let builder = self.builder.user_agent(user_agent);
        Self { builder, ..self }
    }

    /// Refuses plain `http://` connections when `true`. Off by default, as the service
    /// is usually reached on a local address.
    #[inline]
    #[must_use]
    pub fn https_only(self, enabled: bool) -> Self {
        let builder = self.builder.https_only(enabled);
        Self { builder, ..self }
    }

    /// Consumes the `ClientBuilder` and returns a fully-configured [`Client`].
    ///
    /// # Errors
    ///
    /// Returns a [`ClientBuilderError`] if the base URL doesn't parse, or if the underlying
    /// HTTP client could not be built, such as when TLS initialization fails.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use feedback_collector::client::{ClientBuilder, Client};
    /// let client: Client = ClientBuilder::new().build()?;
    /// # Ok::<(), feedback_collector::error::ClientBuilderError>(())
    /// ```
    #[inline]
    pub fn build(self) -> Result<Client, ClientBuilderError> {
        let base = parse_base_url(&self.base_url)?;

        Ok(Client {
            http: self
                .builder
                .build()
                .map_err(|_err| ClientBuilderError::BuildFailed)?,
            base: Arc::new(base),
        })
    }
}

/// Parses a base URL so that relative endpoint paths resolve *under* it.
///
/// `Url::join` replaces the last path segment unless the path ends in `/`.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url, InvalidBaseUrl> {
    let mut url = Url::parse(base_url).map_err(|source| InvalidBaseUrl {
        url: base_url.to_owned(),
        source,
    })?;

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

/// A high-level, asynchronous client for the feedback service.
///
/// The `Client` is designed for efficient, reusable interactions, and internally
/// manages connection pooling. Cloning is cheap and clones share the pool.
///
/// Requests are never retried: a failed call surfaces immediately.
///
/// # Example
///
/// ```
/// # use feedback_collector::Client;
/// let client = Client::new();
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base: Arc<Url>,
}

// Creation impls
impl Client {
    /// Instantiates a new [`Client`] targeting [`DEFAULT_BASE_URL`].
    ///
    /// # Panics
    ///
    /// This function will panic if the TLS backend cannot be initialized or if the DNS resolver
    /// fails to load the system's configuration. For a safer alternative that returns a `Result`
    /// instead of panicking, consider using the [`ClientBuilder`] for more controlled error handling.
    ///
    /// # Example
    ///
    /// ```
    /// # use feedback_collector::Client;
    /// let client = Client::new();
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        #[expect(
            clippy::expect_used,
            reason = "it is documented that this can panic and that `ClientBuilder` should be used instead for a `Result`"
        )]
        ClientBuilder::new().build().expect("Client::new()")
    }

    /// Returns a [`ClientBuilder`] for creating a custom-configured `Client`.
    ///
    /// # Example
    ///
    /// ```
    /// # use feedback_collector::client::{Client, ClientBuilder};
    /// let builder: ClientBuilder = Client::builder();
    /// ```
    #[inline]
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Returns the URL endpoint paths are resolved against.
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }
}

// Public facing impls
impl Client {
    /// Signs a user in with their email and password.
    ///
    /// # Errors
    ///
    /// - [`SignInError::EmailNotFound`] when the service answers `404`.
    /// - [`SignInError::InvalidPassword`] when the service answers `401`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use feedback_collector::{Client, error::SignInError};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), SignInError> {
    /// let client = Client::new();
    ///
    /// match client.sign_in("ana@example.com", "hunter22").await {
    ///     Ok(user) => println!("welcome, {}", user.username),
    ///     Err(SignInError::InvalidPassword) => println!("wrong password"),
    ///     Err(err) => return Err(err),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(name = "signing in", skip_all)]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User, SignInError> {
        let response = self
            .post("users/signin", &SignIn { email, password })
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(SignInError::EmailNotFound),
            StatusCode::UNAUTHORIZED => return Err(SignInError::InvalidPassword),
            status if !status.is_success() => return Err(unexpected(status).into()),
            _ => {}
        }

        let body: SignInResponse = json(response, "users/signin").await?;
        debug!(user = body.user.id, "signed in");
        Ok(body.user)
    }

    /// Registers a new user.
    ///
    /// The new user is not signed in; call [`Client::sign_in`] afterwards.
    ///
    /// # Errors
    ///
    /// - [`SignUpError::UsernameTaken`] when the service answers `400`.
    #[instrument(name = "signing up", skip_all)]
    pub async fn sign_up(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, SignUpError> {
        let body = SignUp {
            username,
            email,
            password,
        };

        let response = self.post("users/", &body).await?;

        match response.status() {
            StatusCode::BAD_REQUEST => return Err(SignUpError::UsernameTaken),
            status if !status.is_success() => return Err(unexpected(status).into()),
            _ => {}
        }

        Ok(json(response, "users/").await?)
    }

    /// Leaves feedback on behalf of a user.
    ///
    /// # Errors
    ///
    /// - [`SubmitFeedbackError::UserNotFound`] when the service answers `404`.
    /// - [`SubmitFeedbackError::InvalidRating`] when the service answers `400`.
    #[instrument(name = "submitting feedback", skip_all, fields(user = feedback.user_id, rating = feedback.rating))]
    pub async fn submit_feedback(
        &self,
        feedback: &NewFeedback,
    ) -> Result<Feedback, SubmitFeedbackError> {
        let response = self.post("feedback/", feedback).await?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(SubmitFeedbackError::UserNotFound),
            StatusCode::BAD_REQUEST => return Err(SubmitFeedbackError::InvalidRating),
            status if !status.is_success() => return Err(unexpected(status).into()),
            _ => {}
        }

        let created: Feedback = json(response, "feedback/").await?;
        debug!(id = created.id, emotion = ?created.emotion, "feedback created");
        Ok(created)
    }

    /// Fetches every piece of feedback, each with its author embedded.
    #[instrument(name = "fetching all feedback", skip_all)]
    pub async fn feedback(&self) -> Result<Vec<Feedback>, FeedbackError> {
        let response = self.get("feedback/").await?;

        let status = response.status();
        if !status.is_success() {
            return Err(unexpected(status).into());
        }

        let feedback: Vec<Feedback> = json(response, "feedback/").await?;
        debug!(count = feedback.len(), "fetched feedback");
        Ok(feedback)
    }

    /// Fetches a single piece of feedback.
    ///
    /// If no feedback has the given `id`, `None` is returned.
    #[instrument(name = "fetching feedback", skip(self))]
    pub async fn feedback_by_id(&self, id: u32) -> Result<Option<Feedback>, FeedbackError> {
        let path = format!("feedback/{id}");
        let response = self.get(&path).await?;

        match response.status() {
            StatusCode::NOT_FOUND => return Ok(None),
            status if !status.is_success() => return Err(unexpected(status).into()),
            _ => {}
        }

        Ok(Some(json(response, &path).await?))
    }

    /// Edits the rating and/or comment of a piece of feedback.
    ///
    /// If no feedback has the given `id`, `None` is returned.
    ///
    /// # Errors
    ///
    /// - [`UpdateFeedbackError::InvalidRating`] when the service answers `400`.
    #[instrument(name = "updating feedback", skip(self, update))]
    pub async fn update_feedback(
        &self,
        id: u32,
        update: &FeedbackUpdate,
    ) -> Result<Option<Feedback>, UpdateFeedbackError> {
        let path = format!("feedback/{id}");
        let response = self.put(&path, update).await?;

        match response.status() {
            StatusCode::NOT_FOUND => return Ok(None),
            StatusCode::BAD_REQUEST => return Err(UpdateFeedbackError::InvalidRating),
            status if !status.is_success() => return Err(unexpected(status).into()),
            _ => {}
        }

        Ok(Some(json(response, &path).await?))
    }

    /// Deletes a piece of feedback.
    ///
    /// Returns `false` if no feedback had the given `id`.
    #[instrument(name = "deleting feedback", skip(self))]
    pub async fn delete_feedback(&self, id: u32) -> Result<bool, FeedbackError> {
        let path = format!("feedback/{id}");
        let response = self.delete(&path).await?;

        match response.status() {
            StatusCode::NOT_FOUND => return Ok(false),
            status if !status.is_success() => return Err(unexpected(status).into()),
            _ => {}
        }

        let message: Message = json(response, &path).await?;
        debug!(message = %message.message, "feedback deleted");
        Ok(true)
    }

    /// Fetches the service's own rating analytics.
    ///
    /// Unlike [`Stats`](crate::dashboard::Stats) these are computed server side and
    /// know nothing about emotions.
    #[instrument(name = "fetching analytics", skip_all)]
    pub async fn analytics(&self) -> Result<Analytics, FeedbackError> {
        let response = self.get("feedback/analytics").await?;

        let status = response.status();
        if !status.is_success() {
            return Err(unexpected(status).into());
        }

        let analytics: Analytics = json(response, "feedback/analytics").await?;

        for entry in &analytics.distribution {
            assumption!(
                (1..=5).contains(&entry.rating),
                "rating distribution should only hold ratings `1..=5`, got `{}`",
                entry.rating
            );
        }

        Ok(analytics)
    }
}

// Internal only impls
impl Client {
    fn endpoint(&self, path: &str) -> Result<Url, Assumption> {
        self.base
            .join(path)
            .assumption(format!("`{path}` should always resolve against `{}`", self.base))
    }

    async fn get(&self, path: &str) -> Result<Response, ResponseError> {
        let url = self.endpoint(path)?;
        let response = self.http.get(url).send().await.map_err(RequestError)?;
        Ok(response)
    }

    async fn post<T>(&self, path: &str, body: &T) -> Result<Response, ResponseError>
    where
        T: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(RequestError)?;
        Ok(response)
    }

    async fn put<T>(&self, path: &str, body: &T) -> Result<Response, ResponseError>
    where
        T: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        let response = self
            .http
            .put(url)
            .json(body)
            .send()
            .await
            .map_err(RequestError)?;
        Ok(response)
    }

    async fn delete(&self, path: &str) -> Result<Response, ResponseError> {
        let url = self.endpoint(path)?;
        let response = self.http.delete(url).send().await.map_err(RequestError)?;
        Ok(response)
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

fn unexpected(status: StatusCode) -> UnexpectedStatus {
    warn!(%status, "unexpected status from feedback service");
    UnexpectedStatus(status.as_u16())
}

async fn json<T>(response: Response, path: &str) -> Result<T, ResponseError>
where
    T: DeserializeOwned,
{
    let text = response.text().await.map_err(RequestError)?;

    let value = serde_json::from_str::<T>(&text).assumption_for(|err| {
        format!("failed to deserialize `{path}` response from feedback service: {err}\n\n{text}")
    })?;

    Ok(value)
}

/// Anything that can list every piece of feedback.
///
/// Implemented by [`Client`]; the [`Dashboard`](crate::dashboard::Dashboard) only needs this much.
pub trait FeedbackSource {
    /// Fetches every piece of feedback.
    fn all_feedback(&self) -> impl Future<Output = Result<Vec<Feedback>, FeedbackError>> + Send;
}

impl FeedbackSource for Client {
    async fn all_feedback(&self) -> Result<Vec<Feedback>, FeedbackError> {
        self.feedback().await
    }
}

/// Anything that can accept new feedback.
///
/// Implemented by [`Client`]; the [`FeedbackForm`](crate::form::feedback::FeedbackForm) only needs this much.
pub trait FeedbackSink {
    /// Stores a new piece of feedback, returning the created record.
    fn submit(
        &self,
        feedback: &NewFeedback,
    ) -> impl Future<Output = Result<Feedback, SubmitFeedbackError>> + Send;
}

impl FeedbackSink for Client {
    async fn submit(&self, feedback: &NewFeedback) -> Result<Feedback, SubmitFeedbackError> {
        self.submit_feedback(feedback).await
    }
}

/// Anything that can verify a user's email and password.
///
/// Implemented by [`Client`]; the sign-in form only needs this much.
pub trait Authenticator {
    /// Verifies the credentials, returning the user they belong to.
    fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<User, SignInError>> + Send;

    /// Registers a new user.
    fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<User, SignUpError>> + Send;
}

impl Authenticator for Client {
    async fn authenticate(&self, email: &str, password: &str) -> Result<User, SignInError> {
        self.sign_in(email, password).await
    }

    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, SignUpError> {
        self.sign_up(username, email, password).await
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn base_url_should_gain_trailing_slash() {
        let url = parse_base_url("http://127.0.0.1:5000/api").unwrap();
        assert_eq!("http://127.0.0.1:5000/api/", url.as_str());

        let url = parse_base_url("http://127.0.0.1:5000/api/").unwrap();
        assert_eq!("http://127.0.0.1:5000/api/", url.as_str());
    }

    #[test]
    fn endpoints_should_resolve_under_base() {
        let client = ClientBuilder::new().build().unwrap();

        assert_eq!(
            "http://127.0.0.1:5000/api/feedback/",
            client.endpoint("feedback/").unwrap().as_str()
        );
        assert_eq!(
            "http://127.0.0.1:5000/api/users/signin",
            client.endpoint("users/signin").unwrap().as_str()
        );
        assert_eq!(
            "http://127.0.0.1:5000/api/feedback/42",
            client.endpoint("feedback/42").unwrap().as_str()
        );
    }

    #[test]
    fn invalid_base_url_should_fail_to_build() {
        let result = ClientBuilder::new().base_url("not a url").build();
        assert!(matches!(result, Err(ClientBuilderError::InvalidBaseUrl(_))));
    }
}
