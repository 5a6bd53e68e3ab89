//! Who is signed in, and where that is remembered between runs.
//!
//! A [`UserSession`] only comes out of a successful sign-in and an [`AdminSession`] only
//! out of an [`AdminAuthority`]. Views that need one take it as an argument rather than
//! looking it up. Both are torn down by consuming them ([`UserSession::sign_out`],
//! [`AdminSession::log_out`]), which also deletes them from the [`SessionStore`].

use crate::{
    config::{AdminCredentials, Config},
    error::{AdminLoginError, MalformedSession, SessionError},
    model::User,
    stdx::cache::Cache,
};
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use std::{
    ffi::OsString,
    future::Future,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::sync::Mutex;
use tracing::{debug, warn};

const USER_KEY: &str = "user";
const ADMIN_KEY: &str = "admin";

/// A signed-in end user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UserSession {
    user: User,
}

impl UserSession {
    #[inline]
    pub(crate) fn new(user: User) -> Self {
        Self { user }
    }

    /// The signed-in user.
    #[inline]
    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Id of the signed-in user.
    #[inline]
    #[must_use]
    pub fn user_id(&self) -> u32 {
        self.user.id
    }

    /// Ends the session and forgets it in `store`.
    pub async fn sign_out(self, store: &SessionStore) -> Result<(), SessionError> {
        debug!(user = self.user.id, "signing out");
        store.remove(USER_KEY).await
    }
}

/// A signed-in administrator.
///
/// Serializable for persistence, but only this crate can turn stored data back into one:
///
/// ```compile_fail
/// let forged: feedback_collector::session::AdminSession = serde_json::from_str(
///     r#"{ "username": "root", "signed_in_at": "2024-01-01T00:00:00Z" }"#,
/// )?;
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminSession {
    username: String,
    signed_in_at: DateTime<Utc>,
}

/// Stored shape of an [`AdminSession`].
#[derive(Deserialize)]
struct StoredAdmin {
    username: String,
    signed_in_at: DateTime<Utc>,
}

impl From<StoredAdmin> for AdminSession {
    fn from(stored: StoredAdmin) -> Self {
        Self {
            username: stored.username,
            signed_in_at: stored.signed_in_at,
        }
    }
}

impl AdminSession {
    #[inline]
    pub(crate) fn new(username: &str) -> Self {
        Self {
            username: username.to_owned(),
            signed_in_at: Utc::now(),
        }
    }

    /// Username the administrator signed in with.
    #[inline]
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// When the session was created.
    #[inline]
    #[must_use]
    pub fn signed_in_at(&self) -> DateTime<Utc> {
        self.signed_in_at
    }

    /// Ends the session and forgets it in `store`.
    pub async fn log_out(self, store: &SessionStore) -> Result<(), SessionError> {
        debug!(admin = %self.username, "logging out");
        store.remove(ADMIN_KEY).await
    }
}

/// Something that can vouch for administrator credentials.
///
/// This is the seam where a real authentication service plugs in. The only
/// implementation shipped, [`ConfiguredAdmin`], compares against configured values.
pub trait AdminAuthority {
    /// Verifies the credentials, returning a fresh administrator session.
    fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<AdminSession, AdminLoginError>> + Send;
}

/// Administrator credentials taken from configuration.
///
/// Nothing is compiled in: without configured credentials every attempt fails with
/// [`AdminLoginError::NotConfigured`].
///
/// # Example
///
/// ```
/// # use feedback_collector::session::{AdminAuthority, ConfiguredAdmin};
/// # #[tokio::main]
/// # async fn main() -> Result<(), feedback_collector::error::AdminLoginError> {
/// let authority = ConfiguredAdmin::new("admin", "correct horse");
///
/// let session = authority.authenticate("admin", "correct horse").await?;
/// assert_eq!("admin", session.username());
///
/// assert!(authority.authenticate("admin", "battery staple").await.is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfiguredAdmin {
    credentials: Option<AdminCredentials>,
}

impl ConfiguredAdmin {
    /// Accepts exactly this username and password.
    #[must_use]
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            credentials: Some(AdminCredentials {
                username: username.to_owned(),
                password: password.to_owned(),
            }),
        }
    }

    /// Uses whatever credentials `config` carries, if any.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            credentials: config.admin.clone(),
        }
    }

    /// Whether any credentials were configured.
    #[inline]
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }
}

impl AdminAuthority for ConfiguredAdmin {
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AdminSession, AdminLoginError> {
        let Some(credentials) = &self.credentials else {
            warn!("admin login attempted, but no admin credentials are configured");
            return Err(AdminLoginError::NotConfigured);
        };

        if credentials.username != username || credentials.password != password {
            return Err(AdminLoginError::InvalidCredentials);
        }

        Ok(AdminSession::new(username))
    }
}

/// Key-value storage for the current sessions, under the keys `user` and `admin`.
///
/// Backed by a JSON file or held in memory. Clones share the same storage, and
/// updates made through different clones never overwrite each other.
#[derive(Debug, Clone)]
pub struct SessionStore {
    backend: Backend,
}

#[derive(Debug, Clone)]
enum Backend {
    File(Arc<SessionFile>),
    Memory(Cache<Map<String, Value>>),
}

/// The session file, and the lock every read-modify-write of it holds.
#[derive(Debug)]
struct SessionFile {
    path: PathBuf,
    lock: Mutex<()>,
}

impl SessionStore {
    /// Stores sessions in the JSON file at `path`, created on first write.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: Backend::File(Arc::new(SessionFile {
                path: path.into(),
                lock: Mutex::new(()),
            })),
        }
    }

    /// Keeps sessions for the lifetime of the process only.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(Cache::new(Map::new())),
        }
    }

    /// Uses the configured session file, or `session.json` in the platform data directory.
    ///
    /// Falls back to memory when the platform has no data directory.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        if let Some(path) = &config.session_file {
            return Self::file(path);
        }

        match ProjectDirs::from("", "", env!("CARGO_PKG_NAME")) {
            Some(dirs) => Self::file(dirs.data_dir().join("session.json")),
            None => {
                warn!("no platform data directory, sessions will not outlive this process");
                Self::in_memory()
            }
        }
    }

    /// The remembered end user session, if any.
    ///
    /// A stored value that doesn't parse is treated as no session.
    pub async fn user(&self) -> Result<Option<UserSession>, SessionError> {
        Ok(self.get::<User>(USER_KEY).await?.map(UserSession::new))
    }

    /// Remembers `session` as the current end user.
    pub async fn save_user(&self, session: &UserSession) -> Result<(), SessionError> {
        self.set(USER_KEY, session).await
    }

    /// The remembered administrator session, if any.
    ///
    /// A stored value that doesn't parse is treated as no session.
    pub async fn admin(&self) -> Result<Option<AdminSession>, SessionError> {
        Ok(self.get::<StoredAdmin>(ADMIN_KEY).await?.map(AdminSession::from))
    }

    /// Remembers `session` as the current administrator.
    pub async fn save_admin(&self, session: &AdminSession) -> Result<(), SessionError> {
        self.set(ADMIN_KEY, session).await
    }

    async fn get<T>(&self, key: &str) -> Result<Option<T>, SessionError>
    where
        T: DeserializeOwned,
    {
        let Some(value) = self.read().await?.remove(key) else {
            return Ok(None);
        };

        match serde_json::from_value(value) {
            Ok(session) => Ok(Some(session)),
            Err(err) => {
                warn!(key, "ignoring unreadable stored session: {err}");
                Ok(None)
            }
        }
    }

    async fn set<T>(&self, key: &str, session: &T) -> Result<(), SessionError>
    where
        T: Serialize,
    {
        let value = serde_json::to_value(session).map_err(MalformedSession)?;

        match &self.backend {
            Backend::Memory(cache) => {
                cache.update(|map| {
                    map.insert(key.to_owned(), value);
                });
                Ok(())
            }
            Backend::File(file) => {
                let _guard = file.lock.lock().await;
                let mut map = file.read_for_update().await?;
                map.insert(key.to_owned(), value);
                file.write(&map).await
            }
        }
    }

    async fn remove(&self, key: &str) -> Result<(), SessionError> {
        match &self.backend {
            Backend::Memory(cache) => {
                cache.update(|map| {
                    map.remove(key);
                });
                Ok(())
            }
            Backend::File(file) => {
                let _guard = file.lock.lock().await;
                let mut map = file.read_for_update().await?;
                if map.remove(key).is_some() {
                    file.write(&map).await?;
                }
                Ok(())
            }
        }
    }

    async fn read(&self) -> Result<Map<String, Value>, SessionError> {
        match &self.backend {
            Backend::Memory(cache) => Ok(cache.get()),
            Backend::File(file) => file.read().await,
        }
    }
}

impl SessionFile {
    /// The whole document. A file that isn't JSON is an error.
    async fn read(&self) -> Result<Map<String, Value>, SessionError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes).map_err(MalformedSession)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Map::new()),
            Err(err) => Err(err.into()),
        }
    }

    /// Like [`read`](Self::read), but a file that isn't JSON is started over, so a
    /// damaged file never blocks saving or forgetting a session.
    async fn read_for_update(&self) -> Result<Map<String, Value>, SessionError> {
        match self.read().await {
            Err(SessionError::MalformedSession(err)) => {
                warn!(path = %self.path.display(), "discarding unreadable session file: {err}");
                Ok(Map::new())
            }
            result => result,
        }
    }

    /// Replaces the file atomically: readers see either the old or the new document.
    async fn write(&self, map: &Map<String, Value>) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let bytes = serde_json::to_vec_pretty(map).map_err(MalformedSession)?;
        let tmp = temp_path(&self.path);

        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

/// `session.json` -> `session.json.tmp`, next to the original.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ana() -> UserSession {
        UserSession::new(User {
            id: 1,
            username: "ana".to_owned(),
            email: "ana@example.com".to_owned(),
        })
    }

    #[tokio::test]
    async fn memory_store_should_keep_keys_apart() {
        let store = SessionStore::in_memory();

        store.save_user(&ana()).await.unwrap();
        store.save_admin(&AdminSession::new("root")).await.unwrap();

        assert_eq!(Some(ana()), store.user().await.unwrap());

        store.remove(USER_KEY).await.unwrap();

        assert_eq!(None, store.user().await.unwrap());
        assert_eq!(
            Some("root"),
            store.admin().await.unwrap().as_ref().map(AdminSession::username)
        );
    }

    #[tokio::test]
    async fn sign_out_should_forget_user() {
        let store = SessionStore::in_memory();
        let session = ana();

        store.save_user(&session).await.unwrap();
        session.sign_out(&store).await.unwrap();

        assert!(store.user().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unreadable_user_should_be_ignored() {
        let store = SessionStore::in_memory();

        let Backend::Memory(cache) = &store.backend else {
            unreachable!("store was created in memory");
        };
        cache.update(|map| {
            map.insert(USER_KEY.to_owned(), Value::String("{not json".to_owned()));
        });

        assert!(store.user().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unconfigured_admin_should_refuse() {
        let authority = ConfiguredAdmin::default();

        assert!(!authority.is_configured());
        assert!(matches!(
            authority.authenticate("admin", "admin123").await,
            Err(AdminLoginError::NotConfigured)
        ));
    }

    #[tokio::test]
    async fn configured_admin_should_check_both_fields() {
        let authority = ConfiguredAdmin::new("admin", "s3cret!");

        assert!(authority.authenticate("admin", "s3cret!").await.is_ok());
        assert!(matches!(
            authority.authenticate("Admin", "s3cret!").await,
            Err(AdminLoginError::InvalidCredentials)
        ));
        assert!(matches!(
            authority.authenticate("admin", "s3cret").await,
            Err(AdminLoginError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn stored_admin_should_come_back_whole() {
        let store = SessionStore::in_memory();
        let session = AdminSession::new("root");

        store.save_admin(&session).await.unwrap();

        assert_eq!(Some(session), store.admin().await.unwrap());
    }

    #[tokio::test]
    async fn admin_entry_without_timestamp_should_be_ignored() {
        let store = SessionStore::in_memory();

        let Backend::Memory(cache) = &store.backend else {
            unreachable!("store was created in memory");
        };
        cache.update(|map| {
            map.insert(ADMIN_KEY.to_owned(), serde_json::json!({ "username": "root" }));
        });

        assert_eq!(None, store.admin().await.unwrap());
    }

    #[test]
    fn temp_file_should_sit_next_to_session_file() {
        assert_eq!(
            PathBuf::from("/var/lib/feedback/session.json.tmp"),
            temp_path(Path::new("/var/lib/feedback/session.json"))
        );
    }

    #[test]
    fn user_session_should_serialize_as_plain_user() {
        let json = serde_json::to_value(ana()).unwrap();
        assert_eq!(
            serde_json::json!({ "id": 1, "username": "ana", "email": "ana@example.com" }),
            json
        );
    }
}
