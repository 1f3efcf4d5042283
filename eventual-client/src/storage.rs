//! Persisted session pair.
//!
//! The session lives on disk as two files, `auth_token.toml` and
//! `user.toml`, under the session directory. The pair is only ever written
//! or removed together; a read that finds half a pair (or an unparsable
//! file) clears both and reports an empty session.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use eventual_core::config;
use eventual_core::error::{EventualError, EventualResult};
use eventual_core::user::User;

const TOKEN_FILE: &str = "auth_token.toml";
const USER_FILE: &str = "user.toml";

#[derive(Serialize, Deserialize)]
struct PersistedToken {
    token: String,
}

/// On-disk storage for the session pair.
pub struct SessionStorage {
    dir: PathBuf,
}

impl SessionStorage {
    /// Storage under the platform config directory.
    pub fn open_default() -> EventualResult<Self> {
        Ok(SessionStorage {
            dir: config::session_dir()?,
        })
    }

    /// Storage rooted at an explicit directory.
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        SessionStorage { dir: dir.into() }
    }

    fn token_path(&self) -> PathBuf {
        self.dir.join(TOKEN_FILE)
    }

    fn user_path(&self) -> PathBuf {
        self.dir.join(USER_FILE)
    }

    /// Persist token and user together. Neither file becomes visible until
    /// both temporaries are fully written.
    pub fn store(&self, token: &str, user: &User) -> EventualResult<()> {
        std::fs::create_dir_all(&self.dir)?;

        let token_contents = toml::to_string_pretty(&PersistedToken {
            token: token.to_string(),
        })
        .map_err(|e| EventualError::Serialization(e.to_string()))?;
        let user_contents =
            toml::to_string_pretty(user).map_err(|e| EventualError::Serialization(e.to_string()))?;

        let token_tmp = self.dir.join(format!("{}.tmp", TOKEN_FILE));
        let user_tmp = self.dir.join(format!("{}.tmp", USER_FILE));

        if let Err(err) = write_owner_only(&token_tmp, &token_contents)
            .and_then(|_| write_owner_only(&user_tmp, &user_contents))
        {
            let _ = std::fs::remove_file(&token_tmp);
            let _ = std::fs::remove_file(&user_tmp);
            return Err(err);
        }

        std::fs::rename(&token_tmp, self.token_path())?;
        std::fs::rename(&user_tmp, self.user_path())?;

        Ok(())
    }

    /// Read the persisted pair. Any inconsistency clears the storage.
    pub fn load(&self) -> Option<(String, User)> {
        let token = read_toml::<PersistedToken>(&self.token_path());
        let user = read_toml::<User>(&self.user_path());

        match (token, user) {
            (Some(token), Some(user)) => Some((token.token, user)),
            (None, None) => None,
            _ => {
                // Half a pair violates the storage invariant; self-heal.
                let _ = self.clear();
                None
            }
        }
    }

    /// Remove both files. Missing files are not an error.
    pub fn clear(&self) -> EventualResult<()> {
        remove_if_present(&self.token_path())?;
        remove_if_present(&self.user_path())?;
        Ok(())
    }
}

fn read_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Option<T> {
    let contents = std::fs::read_to_string(path).ok()?;
    toml::from_str(&contents).ok()
}

fn remove_if_present(path: &Path) -> EventualResult<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}

fn write_owner_only(path: &Path, contents: &str) -> EventualResult<()> {
    std::fs::write(path, contents)?;

    // Owner-only (0600) since the pair contains the bearer token:
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_user() -> User {
        User {
            email: "ana@example.com".to_string(),
            name: Some("Ana".to_string()),
            picture: None,
        }
    }

    #[test]
    fn test_store_then_load_roundtrips_the_pair() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SessionStorage::at(dir.path());

        storage.store("tok-123", &make_user()).unwrap();

        let (token, user) = storage.load().unwrap();
        assert_eq!(token, "tok-123");
        assert_eq!(user, make_user());
    }

    #[test]
    fn test_clear_removes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SessionStorage::at(dir.path());

        storage.store("tok-123", &make_user()).unwrap();
        storage.clear().unwrap();

        assert!(storage.load().is_none());
        assert!(!dir.path().join(TOKEN_FILE).exists());
        assert!(!dir.path().join(USER_FILE).exists());
    }

    #[test]
    fn test_clear_on_empty_storage_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SessionStorage::at(dir.path());
        storage.clear().unwrap();
    }

    #[test]
    fn test_half_pair_reads_as_empty_and_self_heals() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SessionStorage::at(dir.path());

        storage.store("tok-123", &make_user()).unwrap();
        std::fs::remove_file(dir.path().join(USER_FILE)).unwrap();

        assert!(storage.load().is_none());
        // The dangling token file was cleaned up too
        assert!(!dir.path().join(TOKEN_FILE).exists());
    }

    #[test]
    fn test_corrupt_user_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SessionStorage::at(dir.path());

        storage.store("tok-123", &make_user()).unwrap();
        std::fs::write(dir.path().join(USER_FILE), "not = valid = toml").unwrap();

        assert!(storage.load().is_none());
    }

    #[test]
    fn test_store_overwrites_previous_pair() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SessionStorage::at(dir.path());

        storage.store("tok-1", &make_user()).unwrap();
        let other = User {
            email: "otro@example.com".to_string(),
            name: None,
            picture: None,
        };
        storage.store("tok-2", &other).unwrap();

        let (token, user) = storage.load().unwrap();
        assert_eq!(token, "tok-2");
        assert_eq!(user.email, "otro@example.com");
    }
}
