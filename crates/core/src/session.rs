//! Operator session.
//!
//! The signed-in owner, their bearer token and cached profile fields live in
//! a [`SessionContext`] that is handed to whoever needs them. Persistence is
//! behind [`SessionStore`]; the CLI keeps a JSON file between invocations.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::owner::{Owner, OwnerId, SignInGrant};
use crate::errors::AdminError;
use crate::forms::SignInFormInput;
use crate::service::OwnerService;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no owner is signed in")]
    NotSignedIn,
    #[error("could not read session file `{path}`: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not write session file `{path}`: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("session file `{path}` is corrupt: {source}")]
    Corrupt { path: PathBuf, source: serde_json::Error },
    #[error("session store is unavailable")]
    Unavailable,
}

#[derive(Clone, Debug)]
pub struct Session {
    pub owner_id: OwnerId,
    pub token_type: String,
    token: SecretString,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_path: Option<String>,
}

impl Session {
    pub fn new(grant: SignInGrant, profile: Option<&Owner>) -> Self {
        Self {
            owner_id: grant.id,
            token_type: grant.token_type,
            token: grant.token,
            first_name: profile.map(|owner| owner.first_name.clone()),
            last_name: profile.map(|owner| owner.last_name.clone()),
            profile_path: profile.and_then(|owner| owner.profile_path.clone()),
        }
    }

    /// Value for the `Authorization` header.
    pub fn authorization(&self) -> SecretString {
        SecretString::from(format!("{} {}", self.token_type, self.token.expose_secret()))
    }

    pub fn display_name(&self) -> String {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        if name.trim().is_empty() {
            format!("owner #{}", self.owner_id)
        } else {
            name
        }
    }
}

#[derive(Serialize, Deserialize)]
struct SessionRecord {
    owner_id: OwnerId,
    token_type: String,
    token: String,
    first_name: Option<String>,
    last_name: Option<String>,
    profile_path: Option<String>,
}

impl From<&Session> for SessionRecord {
    fn from(session: &Session) -> Self {
        Self {
            owner_id: session.owner_id,
            token_type: session.token_type.clone(),
            token: session.token.expose_secret().to_string(),
            first_name: session.first_name.clone(),
            last_name: session.last_name.clone(),
            profile_path: session.profile_path.clone(),
        }
    }
}

impl From<SessionRecord> for Session {
    fn from(record: SessionRecord) -> Self {
        Self {
            owner_id: record.owner_id,
            token_type: record.token_type,
            token: SecretString::from(record.token),
            first_name: record.first_name,
            last_name: record.last_name,
            profile_path: record.profile_path,
        }
    }
}

pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<Session>, SessionError>;
    fn save(&self, session: &Session) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;
}

#[derive(Clone, Debug)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(SessionError::Read { path: self.path.clone(), source }),
        };

        let record = serde_json::from_str::<SessionRecord>(&raw)
            .map_err(|source| SessionError::Corrupt { path: self.path.clone(), source })?;
        Ok(Some(record.into()))
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        let write_error =
            |source: io::Error| SessionError::Write { path: self.path.clone(), source };

        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
        let body = serde_json::to_string_pretty(&SessionRecord::from(session))
            .map_err(|error| write_error(io::Error::new(io::ErrorKind::InvalidData, error)))?;
        fs::write(&self.path, body).map_err(write_error)
    }

    fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SessionError::Write { path: self.path.clone(), source }),
        }
    }
}

#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    slot: Mutex<Option<Session>>,
}

impl SessionStore for InMemorySessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        self.slot.lock().map(|slot| slot.clone()).map_err(|_| SessionError::Unavailable)
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        let mut slot = self.slot.lock().map_err(|_| SessionError::Unavailable)?;
        *slot = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        let mut slot = self.slot.lock().map_err(|_| SessionError::Unavailable)?;
        *slot = None;
        Ok(())
    }
}

pub struct SessionContext<T> {
    store: T,
    current: Option<Session>,
}

impl<T> SessionContext<T>
where
    T: SessionStore,
{
    pub fn open(store: T) -> Result<Self, SessionError> {
        let current = store.load()?;
        Ok(Self { store, current })
    }

    pub fn is_signed_in(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn owner_id(&self) -> Option<OwnerId> {
        self.current.as_ref().map(|session| session.owner_id)
    }

    pub fn display_name(&self) -> Option<String> {
        self.current.as_ref().map(Session::display_name)
    }

    pub fn profile_path(&self) -> Option<&str> {
        self.current.as_ref().and_then(|session| session.profile_path.as_deref())
    }

    pub fn authorization(&self) -> Option<SecretString> {
        self.current.as_ref().map(Session::authorization)
    }

    pub fn require_signed_in(&self) -> Result<&Session, SessionError> {
        self.current.as_ref().ok_or(SessionError::NotSignedIn)
    }

    /// Signs in, then fetches the owner profile to cache display fields. A
    /// failed profile fetch still yields a session, without profile fields.
    pub async fn sign_in<S>(
        &mut self,
        service: &S,
        form: &SignInFormInput,
    ) -> Result<&Session, AdminError>
    where
        S: OwnerService + ?Sized,
    {
        let credentials = form.validate()?;
        let grant = service.sign_in(&credentials).await?;

        let profile = match service.get_owner(grant.id).await {
            Ok(owner) => Some(owner),
            Err(error) => {
                warn!(
                    event_name = "catalog.session.profile_unavailable",
                    owner_id = grant.id.0,
                    error = %error,
                    "signed in but owner profile could not be loaded"
                );
                None
            }
        };

        let session = Session::new(grant, profile.as_ref());
        self.store.save(&session)?;
        info!(
            event_name = "catalog.session.signed_in",
            owner_id = session.owner_id.0,
            "owner signed in"
        );
        let session: &Session = self.current.insert(session);
        Ok(session)
    }

    pub fn sign_out(&mut self) -> Result<(), SessionError> {
        self.store.clear()?;
        if let Some(session) = self.current.take() {
            info!(
                event_name = "catalog.session.signed_out",
                owner_id = session.owner_id.0,
                "owner signed out"
            );
        }
        Ok(())
    }
}
