use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Key-value store behind the token endpoints: e-mail -> issued token, with a
/// reverse presence check used by the request gate. Re-issuing for an e-mail
/// replaces the stored token.
///
/// Optionally persisted as one JSON object; the whole map is rewritten on
/// every change, which is fine at the scale of an e-mail keyed token table.
pub struct TokenStore {
    path: Option<PathBuf>,
    entries: RwLock<HashMap<String, String>>,
}

impl TokenStore {
    /// In-memory store, or file-backed when `path` is set. A missing file is
    /// an empty store; an unreadable one is an error.
    pub async fn open(path: Option<&str>) -> Result<Self> {
        let path = path.map(PathBuf::from);
        let mut entries = HashMap::new();
        if let Some(p) = &path {
            if fs::try_exists(p).await.unwrap_or(false) {
                let raw = fs::read_to_string(p)
                    .await
                    .with_context(|| format!("cannot read token store '{}'", p.display()))?;
                entries = serde_json::from_str(&raw)
                    .with_context(|| format!("token store '{}' is not valid JSON", p.display()))?;
                info!("loaded {} tokens from {}", entries.len(), p.display());
            }
        }

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub async fn upsert(&self, email: &str, token: &str) -> Result<()> {
        let email = email.to_lowercase();
        {
            let mut entries = self.entries.write().await;
            entries.insert(email, token.to_string());
        }
        self.persist().await
    }

    pub async fn get_by_email(&self, email: &str) -> Option<String> {
        self.entries.read().await.get(&email.to_lowercase()).cloned()
    }

    pub async fn contains_token(&self, token: &str) -> bool {
        self.entries
            .read()
            .await
            .values()
            .any(|stored| stored == token)
    }

    async fn persist(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let snapshot = {
            let entries = self.entries.read().await;
            serde_json::to_string_pretty(&*entries)?
        };
        fs::write(path, snapshot.as_bytes())
            .await
            .inspect_err(|e| warn!("token store write failed: {}", e))
            .with_context(|| format!("cannot write token store '{}'", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upsert_replaces_previous_token_for_email() {
        let store = TokenStore::open(None).await.unwrap();
        store.upsert("User@Example.com", "token-1").await.unwrap();
        store.upsert("user@example.com", "token-2").await.unwrap();

        assert_eq!(
            store.get_by_email("USER@example.com").await.as_deref(),
            Some("token-2")
        );
        assert!(!store.contains_token("token-1").await);
        assert!(store.contains_token("token-2").await);
    }

    #[tokio::test]
    async fn survives_reopen_when_file_backed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        let path_str = path.to_str().unwrap();

        {
            let store = TokenStore::open(Some(path_str)).await.unwrap();
            store.upsert("user@example.com", "token-1").await.unwrap();
        }

        let reopened = TokenStore::open(Some(path_str)).await.unwrap();
        assert_eq!(
            reopened.get_by_email("user@example.com").await.as_deref(),
            Some("token-1")
        );
    }

    #[tokio::test]
    async fn unknown_email_and_token_miss() {
        let store = TokenStore::open(None).await.unwrap();
        assert!(store.get_by_email("nobody@example.com").await.is_none());
        assert!(!store.contains_token("ghost").await);
    }
}
