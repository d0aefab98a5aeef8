//! JSON-file session repository.
//!
//! One `session_{user_id}.json` per user under a state directory. Writes
//! go through a temp file and rename, so a crash mid-write never leaves a
//! truncated session on disk.

use alfred_core::error::{AlfredError, Result};
use alfred_core::session::{Session, SessionRepository};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

pub struct JsonSessionRepository {
    dir: PathBuf,
}

/// Keeps user-supplied ids safe to use as file names.
fn sanitize_id(user_id: &str) -> String {
    user_id
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

impl JsonSessionRepository {
    /// Creates the repository, ensuring the state directory exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub async fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    fn session_path(&self, user_id: &str) -> PathBuf {
        self.dir.join(format!("session_{}.json", sanitize_id(user_id)))
    }
}

#[async_trait]
impl SessionRepository for JsonSessionRepository {
    async fn find_by_id(&self, user_id: &str) -> Result<Option<Session>> {
        let path = self.session_path(user_id);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let session = serde_json::from_str(&content).map_err(|err| {
            AlfredError::data_access(format!(
                "corrupt session file {}: {err}",
                path.display()
            ))
        })?;
        Ok(Some(session))
    }

    async fn save(&self, session: &Session) -> Result<()> {
        let path = self.session_path(&session.user_id);
        let tmp = path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(session)?;
        fs::write(&tmp, content).await?;
        fs::rename(&tmp, &path).await?;
        tracing::trace!(user_id = %session.user_id, "session saved");
        Ok(())
    }

    async fn delete(&self, user_id: &str) -> Result<()> {
        match fs::remove_file(self.session_path(user_id)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let repo = JsonSessionRepository::new(dir.path()).await.unwrap();

        let mut session = Session::new("user-7");
        session
            .preferences
            .insert("movie_genre".to_string(), "комедия".to_string());
        session.push_turn("привет", "Привет!", 50);
        repo.save(&session).await.unwrap();

        let loaded = repo.find_by_id("user-7").await.unwrap().unwrap();
        assert_eq!(loaded, session);
    }

    #[tokio::test]
    async fn test_missing_session_is_none() {
        let dir = TempDir::new().unwrap();
        let repo = JsonSessionRepository::new(dir.path()).await.unwrap();
        assert!(repo.find_by_id("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let repo = JsonSessionRepository::new(dir.path()).await.unwrap();

        repo.save(&Session::new("u")).await.unwrap();
        repo.delete("u").await.unwrap();
        assert!(repo.find_by_id("u").await.unwrap().is_none());
        repo.delete("u").await.unwrap();
    }

    #[tokio::test]
    async fn test_ids_with_odd_characters_are_sanitized() {
        let dir = TempDir::new().unwrap();
        let repo = JsonSessionRepository::new(dir.path()).await.unwrap();

        repo.save(&Session::new("a/b:c")).await.unwrap();
        assert!(repo.find_by_id("a/b:c").await.unwrap().is_some());
        assert!(dir.path().join("session_a_b_c.json").exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let repo = JsonSessionRepository::new(dir.path()).await.unwrap();
        std::fs::write(dir.path().join("session_bad.json"), "{ not json").unwrap();
        assert!(repo.find_by_id("bad").await.is_err());
    }
}
