//! JSON-file learned-intent overlay store.
//!
//! A single `learned_intents.json` holding the taught intents in the
//! order they were learned. Writes rewrite the whole file behind a mutex;
//! the overlay is small and append-mostly, so this stays simple.

use alfred_core::error::{AlfredError, Result};
use alfred_core::intent::{Intent, LearnedIntentRepository};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

pub struct JsonLearnedIntentRepository {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonLearnedIntentRepository {
    /// Creates the store, ensuring the parent directory exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created.
    pub async fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    async fn read_all(&self) -> Result<Vec<Intent>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        serde_json::from_str(&content).map_err(|err| {
            AlfredError::data_access(format!(
                "corrupt overlay file {}: {err}",
                self.path.display()
            ))
        })
    }

    async fn write_all(&self, intents: &[Intent]) -> Result<()> {
        let tmp = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(intents)?;
        fs::write(&tmp, content).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl LearnedIntentRepository for JsonLearnedIntentRepository {
    async fn load_all(&self) -> Result<Vec<Intent>> {
        self.read_all().await
    }

    async fn append(&self, intent: &Intent) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut intents = self.read_all().await?;
        intents.push(intent.clone());
        self.write_all(&intents).await?;
        tracing::debug!(intent_id = %intent.id, "learned intent appended");
        Ok(())
    }

    async fn set_response(&self, intent_id: &str, response: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut intents = self.read_all().await?;
        let Some(intent) = intents.iter_mut().find(|i| i.id == intent_id) else {
            return Err(AlfredError::not_found("learned intent", intent_id));
        };
        intent.responses = vec![response.to_string()];
        self.write_all(&intents).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_path(dir: &TempDir) -> PathBuf {
        dir.path().join("learned_intents.json")
    }

    #[tokio::test]
    async fn test_empty_store_loads_nothing() {
        let dir = TempDir::new().unwrap();
        let repo = JsonLearnedIntentRepository::new(store_path(&dir)).await.unwrap();
        assert!(repo.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_then_reload_preserves_order() {
        let dir = TempDir::new().unwrap();
        let repo = JsonLearnedIntentRepository::new(store_path(&dir)).await.unwrap();

        repo.append(&Intent::learned("learned_a", "а", "заглушка")).await.unwrap();
        repo.append(&Intent::learned("learned_b", "б", "заглушка")).await.unwrap();

        let all = repo.load_all().await.unwrap();
        let ids: Vec<_> = all.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["learned_a", "learned_b"]);
    }

    #[tokio::test]
    async fn test_set_response_replaces_placeholder() {
        let dir = TempDir::new().unwrap();
        let repo = JsonLearnedIntentRepository::new(store_path(&dir)).await.unwrap();
        repo.append(&Intent::learned("learned_a", "а", "заглушка")).await.unwrap();

        repo.set_response("learned_a", "настоящий ответ").await.unwrap();
        let all = repo.load_all().await.unwrap();
        assert_eq!(all[0].responses, vec!["настоящий ответ".to_string()]);
    }

    #[tokio::test]
    async fn test_set_response_unknown_id_errors() {
        let dir = TempDir::new().unwrap();
        let repo = JsonLearnedIntentRepository::new(store_path(&dir)).await.unwrap();
        assert!(repo.set_response("missing", "x").await.is_err());
    }

    #[tokio::test]
    async fn test_survives_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let repo = JsonLearnedIntentRepository::new(store_path(&dir)).await.unwrap();
            repo.append(&Intent::learned("learned_a", "а", "ответ")).await.unwrap();
        }
        let repo = JsonLearnedIntentRepository::new(store_path(&dir)).await.unwrap();
        assert_eq!(repo.load_all().await.unwrap().len(), 1);
    }
}
