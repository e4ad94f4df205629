use std::{collections::HashMap, future::Future, path::PathBuf};

use crate::Res;

/// Persistence port for the album-title → album-id cache.
///
/// Logically independent of the credential record. An absent record is an
/// empty cache, not an error.
#[allow(async_fn_in_trait)]
pub trait AlbumCacheStore {
    async fn load(&self) -> Result<HashMap<String, String>, String>;
    async fn save(&self, albums: &HashMap<String, String>) -> Result<(), String>;
}

/// File-backed [`AlbumCacheStore`] holding one JSON object.
pub struct FileAlbumCacheStore {
    path: PathBuf,
}

impl FileAlbumCacheStore {
    pub fn new() -> Self {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("phupcli/cache/albums.json");
        Self { path }
    }

    /// Store rooted at an explicit path instead of the data directory.
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Default for FileAlbumCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AlbumCacheStore for FileAlbumCacheStore {
    async fn load(&self) -> Result<HashMap<String, String>, String> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let content = async_fs::read_to_string(&self.path)
            .await
            .map_err(|e| e.to_string())?;
        serde_json::from_str(&content).map_err(|e| e.to_string())
    }

    async fn save(&self, albums: &HashMap<String, String>) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(albums).map_err(|e| e.to_string())?;
        async_fs::write(&self.path, json)
            .await
            .map_err(|e| e.to_string())
    }
}

/// Local authority for album-title → album-id mappings.
///
/// The append-only scope cannot list remote albums, so once a title is
/// cached every later upload reuses the same remote album; the cache is
/// never reconciled against the server. Entries are added, never removed.
/// Losing the cache file means a fresh album per title; this manager makes
/// no attempt to detect that.
pub struct AlbumManager<S: AlbumCacheStore> {
    store: S,
    albums: HashMap<String, String>,
}

impl<S: AlbumCacheStore> AlbumManager<S> {
    pub async fn load(store: S) -> Result<Self, String> {
        let albums = store.load().await?;
        Ok(Self { store, albums })
    }

    /// Cached id for a title, if the title has been seen before.
    pub fn get(&self, title: &str) -> Option<&str> {
        self.albums.get(title).map(String::as_str)
    }

    pub fn count(&self) -> usize {
        self.albums.len()
    }

    /// Resolves a title to an album id, creating the remote album on first
    /// sight.
    ///
    /// A cached title returns its id without invoking `create`. Otherwise
    /// `create` runs exactly once and the new mapping is written through
    /// the store before the id is returned.
    pub async fn resolve_or_create<F, Fut>(&mut self, title: &str, create: F) -> Res<String>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Res<String>>,
    {
        if let Some(id) = self.albums.get(title) {
            return Ok(id.clone());
        }

        let id = create(title.to_string()).await?;
        self.albums.insert(title.to_string(), id.clone());
        self.store.save(&self.albums).await?;
        Ok(id)
    }
}
