//! The "which user is signed in" fact, kept outside the main database so it
//! can be resolved before the store is opened.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use pocketshop_core::user::DEFAULT_USER_ID;
use tracing::warn;

use crate::error::StorageError;

/// Well-known name of the current-user entry.
pub const CURRENT_USER_KEY: &str = "current-user";

pub trait UserContext {
    /// The stored id, or [`DEFAULT_USER_ID`] if none was ever stored.
    fn current_user_id(&self) -> String;

    /// Overwrite the stored id. No validation happens here.
    fn set_current_user_id(&mut self, user_id: &str) -> Result<(), StorageError>;
}

/// Single text file `<dir>/current-user`.
pub struct FileUserContext {
    path: PathBuf,
}

impl FileUserContext {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(CURRENT_USER_KEY),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl UserContext for FileUserContext {
    fn current_user_id(&self) -> String {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let id = contents.trim();
                if id.is_empty() {
                    DEFAULT_USER_ID.to_string()
                } else {
                    id.to_string()
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => DEFAULT_USER_ID.to_string(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "unreadable current user, using default");
                DEFAULT_USER_ID.to_string()
            }
        }
    }

    fn set_current_user_id(&mut self, user_id: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, user_id)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryUserContext {
    user_id: Option<String>,
}

impl MemoryUserContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(user_id: &str) -> Self {
        Self {
            user_id: Some(user_id.to_string()),
        }
    }
}

impl UserContext for MemoryUserContext {
    fn current_user_id(&self) -> String {
        self.user_id
            .clone()
            .unwrap_or_else(|| DEFAULT_USER_ID.to_string())
    }

    fn set_current_user_id(&mut self, user_id: &str) -> Result<(), StorageError> {
        self.user_id = Some(user_id.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_defaults_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = FileUserContext::new(dir.path());
        assert_eq!(ctx.current_user_id(), DEFAULT_USER_ID);
    }

    #[test]
    fn file_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = FileUserContext::new(dir.path().join("nested"));
        ctx.set_current_user_id("user-3").unwrap();
        let reopened = FileUserContext::new(dir.path().join("nested"));
        assert_eq!(reopened.current_user_id(), "user-3");
    }

    #[test]
    fn file_stores_unknown_ids_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = FileUserContext::new(dir.path());
        ctx.set_current_user_id("nobody").unwrap();
        assert_eq!(ctx.current_user_id(), "nobody");
    }

    #[test]
    fn blank_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = FileUserContext::new(dir.path());
        fs::write(ctx.path(), "  \n").unwrap();
        assert_eq!(ctx.current_user_id(), DEFAULT_USER_ID);
    }

    #[test]
    fn memory_context() {
        let mut ctx = MemoryUserContext::new();
        assert_eq!(ctx.current_user_id(), DEFAULT_USER_ID);
        ctx.set_current_user_id("user-2").unwrap();
        assert_eq!(ctx.current_user_id(), "user-2");
        assert_eq!(MemoryUserContext::with_user("user-3").current_user_id(), "user-3");
    }
}
