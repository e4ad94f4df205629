use std::path::PathBuf;

use crate::{info, photos, types::Token, warning};

/// Persistence port for the credential record.
///
/// The manager only ever loads one record and overwrites it whole; tests
/// substitute an in-memory implementation so credential logic runs without
/// touching disk.
#[allow(async_fn_in_trait)]
pub trait TokenStore {
    /// Loads the persisted record. `Ok(None)` means no record exists; an
    /// `Err` means a record exists but cannot be used.
    async fn load(&self) -> Result<Option<Token>, String>;

    /// Replaces the persisted record with `token`.
    async fn save(&self, token: &Token) -> Result<(), String>;
}

/// File-backed [`TokenStore`] writing a single pretty-printed JSON record.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new() -> Self {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("phupcli/cache/token.json");
        Self { path }
    }

    /// Store rooted at an explicit path instead of the data directory.
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Default for FileTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<Token>, String> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = async_fs::read_to_string(&self.path)
            .await
            .map_err(|e| e.to_string())?;
        let token: Token = serde_json::from_str(&content).map_err(|e| e.to_string())?;
        Ok(Some(token))
    }

    async fn save(&self, token: &Token) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(token).map_err(|e| e.to_string())?;
        async_fs::write(&self.path, json)
            .await
            .map_err(|e| e.to_string())
    }
}

/// Owns the credential for one run and keeps the persisted record in sync.
pub struct TokenManager<S: TokenStore> {
    store: S,
    token: Token,
}

impl<S: TokenStore> TokenManager<S> {
    /// Produces a manager holding a valid credential, whatever it takes.
    ///
    /// Branches in priority order, first match wins:
    /// 1. A stored, still-valid credential is used as-is, without any
    ///    network call.
    /// 2. A stored, expired credential with a refresh token is refreshed;
    ///    a failed refresh falls through to re-authorization instead of
    ///    failing the run.
    /// 3. Otherwise the interactive authorization flow runs, blocking on
    ///    the user's consent in the browser.
    ///
    /// An unreadable or corrupt record is treated as "no credential". Every
    /// newly obtained or refreshed credential is persisted through the
    /// store before this function returns.
    pub async fn obtain(store: S) -> Result<Self, String> {
        let stored = match store.load().await {
            Ok(stored) => stored,
            Err(e) => {
                warning!("Stored credentials are unreadable, re-authorizing. Err: {}", e);
                None
            }
        };

        match stored {
            Some(token) if token.is_valid() => {
                info!("Retrieving stored credentials");
                Ok(Self { store, token })
            }
            Some(token) if !token.refresh_token.is_empty() => {
                info!("Refreshing credentials");
                match photos::auth::refresh_token(&token.refresh_token).await {
                    Ok(fresh) => Self::with_new_token(store, fresh).await,
                    Err(e) => {
                        warning!("Token refresh failed, re-authorizing. Err: {}", e);
                        Self::authorize_new(store).await
                    }
                }
            }
            _ => Self::authorize_new(store).await,
        }
    }

    async fn authorize_new(store: S) -> Result<Self, String> {
        info!("Obtaining credentials");
        let token = photos::auth::authorize().await.map_err(|e| e.to_string())?;
        Self::with_new_token(store, token).await
    }

    async fn with_new_token(store: S, token: Token) -> Result<Self, String> {
        info!("Storing credentials");
        store.save(&token).await?;
        Ok(Self { store, token })
    }

    /// Returns an access token that is valid right now, refreshing and
    /// persisting first if the held one has expired in the meantime.
    pub async fn get_valid_token(&mut self) -> Result<String, String> {
        if !self.token.is_valid() {
            let fresh = photos::auth::refresh_token(&self.token.refresh_token)
                .await
                .map_err(|e| e.to_string())?;
            self.store.save(&fresh).await?;
            self.token = fresh;
        }

        Ok(self.token.access_token.clone())
    }

    pub fn current_token(&self) -> &Token {
        &self.token
    }
}
