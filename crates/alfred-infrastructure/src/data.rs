//! Static-data loaders.
//!
//! Everything here runs once at startup and is fatal on failure: the
//! engine cannot operate without its intent definitions, dialogue corpus,
//! product catalog and sentiment lexicon.

use alfred_core::catalog::ProductCatalog;
use alfred_core::error::{AlfredError, Result};
use alfred_core::intent::Intent;
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;

async fn read(path: &Path, what: &str) -> Result<String> {
    fs::read_to_string(path)
        .await
        .map_err(|err| AlfredError::data_load(format!("{what} {}: {err}", path.display())))
}

fn string_list(value: Option<&serde_json::Value>) -> Vec<String> {
    value
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Loads the intent definitions: a JSON object of
/// `id → { examples, responses, followups }`.
///
/// Entries whose value is not an object (the definition file also carries
/// plain phrase lists) are skipped.
pub async fn load_intents(path: impl AsRef<Path>) -> Result<Vec<Intent>> {
    let path = path.as_ref();
    let content = read(path, "intent definitions").await?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .map_err(|err| AlfredError::data_load(format!("intent definitions: {err}")))?;
    let entries = value
        .as_object()
        .ok_or_else(|| AlfredError::data_load("intent definitions must be a JSON object"))?;

    let mut intents = Vec::new();
    for (id, entry) in entries {
        let Some(fields) = entry.as_object() else {
            tracing::debug!(id, "skipping non-object intent entry");
            continue;
        };
        let examples = string_list(fields.get("examples"));
        let responses = string_list(fields.get("responses"));
        if examples.is_empty() || responses.is_empty() {
            tracing::warn!(id, "skipping intent without examples or responses");
            continue;
        }
        intents.push(Intent {
            id: id.clone(),
            examples,
            responses,
            followups: string_list(fields.get("followups")),
        });
    }
    if intents.is_empty() {
        return Err(AlfredError::data_load(format!(
            "no usable intents in {}",
            path.display()
        )));
    }
    Ok(intents)
}

/// Loads the raw dialogue corpus (blank-line separated Q/A blocks).
pub async fn load_dialogue_corpus(path: impl AsRef<Path>) -> Result<String> {
    read(path.as_ref(), "dialogue corpus").await
}

/// Loads the product catalog JSON (category → subcategory → products).
pub async fn load_product_catalog(path: impl AsRef<Path>) -> Result<ProductCatalog> {
    let path = path.as_ref();
    let content = read(path, "product catalog").await?;
    serde_json::from_str(&content)
        .map_err(|err| AlfredError::data_load(format!("product catalog: {err}")))
}

/// Loads the sentiment lexicon.
///
/// The primary format is a JSON map `word → score`; files that fail to
/// parse as JSON are read as `word,score` CSV lines instead.
pub async fn load_sentiment_lexicon(path: impl AsRef<Path>) -> Result<HashMap<String, f32>> {
    let path = path.as_ref();
    let content = read(path, "sentiment lexicon").await?;

    if let Ok(lexicon) = serde_json::from_str::<HashMap<String, f32>>(&content) {
        return Ok(lexicon);
    }

    let mut lexicon = HashMap::new();
    for (lineno, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((word, score)) = line.split_once(',') else {
            return Err(AlfredError::data_load(format!(
                "sentiment lexicon {}: malformed line {}",
                path.display(),
                lineno + 1
            )));
        };
        // A header row is allowed on the first line
        let Ok(score) = score.trim().parse::<f32>() else {
            if lineno == 0 {
                continue;
            }
            return Err(AlfredError::data_load(format!(
                "sentiment lexicon {}: bad score on line {}",
                path.display(),
                lineno + 1
            )));
        };
        lexicon.insert(word.trim().to_lowercase(), score);
    }
    if lexicon.is_empty() {
        return Err(AlfredError::data_load(format!(
            "empty sentiment lexicon {}",
            path.display()
        )));
    }
    Ok(lexicon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[tokio::test]
    async fn test_load_intents_skips_non_object_entries() {
        let file = temp(
            r#"{
                "greeting": {
                    "examples": ["привет"],
                    "responses": ["Привет!"],
                    "followups": ["Как дела?"]
                },
                "failure_phrases": ["Извини, не понял."]
            }"#,
        );
        let intents = load_intents(file.path()).await.unwrap();
        assert_eq!(intents.len(), 1);
        assert_eq!(intents[0].id, "greeting");
        assert_eq!(intents[0].followups, vec!["Как дела?".to_string()]);
    }

    #[tokio::test]
    async fn test_load_intents_empty_set_is_fatal() {
        let file = temp(r#"{ "broken": {"examples": []} }"#);
        assert!(load_intents(file.path()).await.is_err());
    }

    #[tokio::test]
    async fn test_missing_file_is_fatal() {
        assert!(load_intents("/nonexistent/intents.json").await.is_err());
        assert!(load_dialogue_corpus("/nonexistent/dialogues.txt").await.is_err());
    }

    #[tokio::test]
    async fn test_load_catalog() {
        let file = temp(
            r#"{
                "техника": {
                    "ноутбуки": [
                        {"name": "Ноутбук", "description": "лёгкий", "price": "49990₽"}
                    ]
                }
            }"#,
        );
        let catalog = load_product_catalog(file.path()).await.unwrap();
        assert_eq!(catalog.find_category("техника"), Some("техника"));
    }

    #[tokio::test]
    async fn test_lexicon_json_primary() {
        let file = temp(r#"{"грустно": -0.8, "отлично": 0.9}"#);
        let lexicon = load_sentiment_lexicon(file.path()).await.unwrap();
        assert_eq!(lexicon.get("грустно"), Some(&-0.8));
    }

    #[tokio::test]
    async fn test_lexicon_csv_fallback() {
        let file = temp("word,score\nгрустно,-0.8\nотлично,0.9\n");
        let lexicon = load_sentiment_lexicon(file.path()).await.unwrap();
        assert_eq!(lexicon.len(), 2);
        assert_eq!(lexicon.get("отлично"), Some(&0.9));
    }

    #[tokio::test]
    async fn test_lexicon_bad_line_is_fatal() {
        let file = temp("грустно,-0.8\nчто это такое\n");
        assert!(load_sentiment_lexicon(file.path()).await.is_err());
    }
}
