use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::dir::VeloxDirectory;

pub const SESSION_FILENAME: &str = "session.json";

/// Identity of the authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "ID")]
    pub id: String,
    pub username: String,
    pub token: String,
}

/// Event applied to the session sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum SessionEvent {
    #[serde(rename = "LOGIN")]
    Login(Session),
    #[serde(rename = "LOGOUT")]
    Logout,
}

/// Receiver of session events, owner of the process-wide session.
pub trait SessionSink: Send + Sync {
    fn apply(&self, event: SessionEvent);
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session file not found")]
    NotFound,
    #[error("Reading session file: {0}")]
    ReadingFile(std::io::Error),
    #[error("Parsing session file: {0}")]
    Parsing(serde_json::Error),
    #[error("Writing session file: {0}")]
    WritingFile(std::io::Error),
}

/// Process-wide session store. Clones share the same session.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    current: Arc<RwLock<Option<Session>>>,
    path: Option<PathBuf>,
}

impl SessionStore {
    /// Store without persistence.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Creates the store on application start, restoring the session persisted in the
    /// data directory if any.
    pub fn init(datadir: &VeloxDirectory) -> Self {
        let path = datadir.file(SESSION_FILENAME);
        let current = match read_session_file(&path) {
            Ok(session) => {
                tracing::info!("Restored session of user {}", session.username);
                Some(session)
            }
            Err(SessionError::NotFound) => None,
            Err(e) => {
                tracing::warn!("{}", e);
                tracing::warn!("Session file is reset");
                if let Err(e) = std::fs::remove_file(&path) {
                    tracing::warn!("Failed to remove session file: {}", e);
                }
                None
            }
        };
        Self {
            current: Arc::new(RwLock::new(current)),
            path: Some(path),
        }
    }

    pub fn current(&self) -> Option<Session> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Replaces the whole session at once.
    pub fn replace(&self, session: Session) {
        if let Some(path) = &self.path {
            if let Err(e) = write_session_file(path, &session) {
                tracing::error!("Failed to persist session: {}", e);
            }
        }
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
    }

    pub fn clear(&self) {
        if let Some(path) = &self.path {
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => tracing::error!("Failed to remove session file: {}", e),
            }
        }
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl SessionSink for SessionStore {
    fn apply(&self, event: SessionEvent) {
        match event {
            SessionEvent::Login(session) => {
                tracing::info!("User {} logged in", session.username);
                self.replace(session);
            }
            SessionEvent::Logout => {
                tracing::info!("User logged out");
                self.clear();
            }
        }
    }
}

fn read_session_file(path: &std::path::Path) -> Result<Session, SessionError> {
    let content = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => SessionError::NotFound,
        _ => SessionError::ReadingFile(e),
    })?;
    serde_json::from_slice(&content).map_err(SessionError::Parsing)
}

// Written to a sibling file first so a reader never sees a partial session. The file
// holds the token, it is only readable by the owner.
fn write_session_file(path: &std::path::Path, session: &Session) -> Result<(), SessionError> {
    let content = serde_json::to_vec_pretty(session).map_err(SessionError::Parsing)?;
    let tmp = path.with_extension("json.tmp");

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    if let Err(e) = std::fs::remove_file(&tmp) {
        if e.kind() != std::io::ErrorKind::NotFound {
            return Err(SessionError::WritingFile(e));
        }
    }
    let mut file = options.open(&tmp).map_err(SessionError::WritingFile)?;
    file.write_all(&content).map_err(SessionError::WritingFile)?;
    drop(file);

    std::fs::rename(&tmp, path).map_err(SessionError::WritingFile)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Session {
        Session {
            id: "1".to_string(),
            username: "alice".to_string(),
            token: "tok-123".to_string(),
        }
    }

    #[test]
    fn login_event_wire_format() {
        let event = serde_json::to_value(SessionEvent::Login(alice())).unwrap();
        assert_eq!(
            event,
            serde_json::json!({
                "type": "LOGIN",
                "payload": { "ID": "1", "username": "alice", "token": "tok-123" },
            })
        );

        let event = serde_json::to_value(SessionEvent::Logout).unwrap();
        assert_eq!(event, serde_json::json!({ "type": "LOGOUT" }));
    }

    #[test]
    fn clones_share_the_session() {
        let store = SessionStore::in_memory();
        let handle = store.clone();
        assert!(!handle.is_authenticated());

        store.apply(SessionEvent::Login(alice()));
        assert_eq!(handle.current(), Some(alice()));

        handle.apply(SessionEvent::Logout);
        assert_eq!(store.current(), None);
    }

    #[test]
    fn session_is_restored_on_init() {
        let tmp = tempfile::tempdir().unwrap();
        let datadir = VeloxDirectory::new(tmp.path().to_path_buf());

        let store = SessionStore::init(&datadir);
        assert_eq!(store.current(), None);
        store.replace(alice());
        assert!(datadir.file(SESSION_FILENAME).exists());

        let restored = SessionStore::init(&datadir);
        assert_eq!(restored.current(), Some(alice()));

        restored.clear();
        assert!(!datadir.file(SESSION_FILENAME).exists());
        assert_eq!(SessionStore::init(&datadir).current(), None);
    }

    #[cfg(unix)]
    #[test]
    fn session_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let datadir = VeloxDirectory::new(tmp.path().to_path_buf());

        SessionStore::init(&datadir).replace(alice());
        let mode = std::fs::metadata(datadir.file(SESSION_FILENAME))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn corrupt_session_file_is_reset() {
        let tmp = tempfile::tempdir().unwrap();
        let datadir = VeloxDirectory::new(tmp.path().to_path_buf());
        std::fs::write(datadir.file(SESSION_FILENAME), b"{not json").unwrap();

        let store = SessionStore::init(&datadir);
        assert_eq!(store.current(), None);
        assert!(!datadir.file(SESSION_FILENAME).exists());
    }
}
