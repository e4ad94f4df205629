use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use phupcli::Res;
use phupcli::management::{AlbumCacheStore, AlbumManager, FileAlbumCacheStore};

/// In-memory album cache store; the map is inspectable so tests can verify
/// that new mappings are written through immediately.
struct MemAlbumStore {
    albums: Mutex<HashMap<String, String>>,
    saves: AtomicUsize,
}

impl MemAlbumStore {
    fn empty() -> Self {
        Self {
            albums: Mutex::new(HashMap::new()),
            saves: AtomicUsize::new(0),
        }
    }

    fn with(entries: &[(&str, &str)]) -> Self {
        let map = entries
            .iter()
            .map(|(title, id)| (title.to_string(), id.to_string()))
            .collect();
        Self {
            albums: Mutex::new(map),
            saves: AtomicUsize::new(0),
        }
    }
}

impl AlbumCacheStore for &MemAlbumStore {
    async fn load(&self) -> Result<HashMap<String, String>, String> {
        Ok(self.albums.lock().unwrap().clone())
    }

    async fn save(&self, albums: &HashMap<String, String>) -> Result<(), String> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self.albums.lock().unwrap() = albums.clone();
        Ok(())
    }
}

async fn counted_create(counter: &AtomicUsize, title: String) -> Res<String> {
    counter.fetch_add(1, Ordering::SeqCst);
    Ok(format!("alb_{}", title.to_lowercase()))
}

async fn must_not_create(counter: &AtomicUsize, _title: String) -> Res<String> {
    counter.fetch_add(1, Ordering::SeqCst);
    Err("album creation must not be reached".into())
}

fn temp_store(name: &str) -> FileAlbumCacheStore {
    let path = std::env::temp_dir()
        .join(format!("phupcli-album-test-{}", std::process::id()))
        .join(name)
        .join("albums.json");
    FileAlbumCacheStore::at(path)
}

#[tokio::test]
async fn test_unseen_title_creates_once_and_persists() {
    let store = MemAlbumStore::empty();
    let creates = AtomicUsize::new(0);

    let mut manager = AlbumManager::load(&store).await.unwrap();
    let id = manager
        .resolve_or_create("Trip2020", |t| counted_create(&creates, t))
        .await
        .unwrap();

    assert_eq!(id, "alb_trip2020");
    assert_eq!(creates.load(Ordering::SeqCst), 1);
    // The mapping hit the store before resolve returned
    assert_eq!(store.saves.load(Ordering::SeqCst), 1);
    assert_eq!(
        store.albums.lock().unwrap().get("Trip2020"),
        Some(&"alb_trip2020".to_string())
    );
}

#[tokio::test]
async fn test_second_resolution_is_cache_only() {
    let store = MemAlbumStore::empty();
    let creates = AtomicUsize::new(0);

    let mut manager = AlbumManager::load(&store).await.unwrap();
    let first = manager
        .resolve_or_create("Trip2020", |t| counted_create(&creates, t))
        .await
        .unwrap();
    let second = manager
        .resolve_or_create("Trip2020", |t| must_not_create(&creates, t))
        .await
        .unwrap();

    assert_eq!(first, second);
    // At most one creation call per distinct title
    assert_eq!(creates.load(Ordering::SeqCst), 1);
    assert_eq!(store.saves.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_distinct_titles_create_distinct_albums() {
    let store = MemAlbumStore::empty();
    let creates = AtomicUsize::new(0);

    let mut manager = AlbumManager::load(&store).await.unwrap();
    let a = manager
        .resolve_or_create("Trip2020", |t| counted_create(&creates, t))
        .await
        .unwrap();
    let b = manager
        .resolve_or_create("Trip2021", |t| counted_create(&creates, t))
        .await
        .unwrap();

    assert_ne!(a, b);
    assert_eq!(creates.load(Ordering::SeqCst), 2);
    assert_eq!(manager.count(), 2);
}

#[tokio::test]
async fn test_preloaded_cache_needs_no_network() {
    let store = MemAlbumStore::with(&[("Trip2020", "alb_123")]);
    let creates = AtomicUsize::new(0);

    let mut manager = AlbumManager::load(&store).await.unwrap();
    assert_eq!(manager.get("Trip2020"), Some("alb_123"));

    let id = manager
        .resolve_or_create("Trip2020", |t| must_not_create(&creates, t))
        .await
        .unwrap();

    assert_eq!(id, "alb_123");
    assert_eq!(creates.load(Ordering::SeqCst), 0);
    assert_eq!(store.saves.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_failed_creation_caches_nothing() {
    let store = MemAlbumStore::empty();
    let creates = AtomicUsize::new(0);

    let mut manager = AlbumManager::load(&store).await.unwrap();
    let result = manager
        .resolve_or_create("Trip2020", |t| must_not_create(&creates, t))
        .await;

    assert!(result.is_err());
    assert_eq!(manager.get("Trip2020"), None);
    assert_eq!(store.saves.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_absent_cache_file_is_empty_cache() {
    let store = temp_store("absent");
    let manager = AlbumManager::load(store).await.unwrap();
    assert_eq!(manager.count(), 0);
}

#[tokio::test]
async fn test_cache_file_round_trip() {
    let creates = AtomicUsize::new(0);

    {
        let store = temp_store("round-trip");
        let mut manager = AlbumManager::load(store).await.unwrap();
        manager
            .resolve_or_create("Trip2020", |t| counted_create(&creates, t))
            .await
            .unwrap();
    }

    // A second run sharing the cache file resolves from disk alone
    let store = temp_store("round-trip");
    let mut manager = AlbumManager::load(store).await.unwrap();
    let id = manager
        .resolve_or_create("Trip2020", |t| must_not_create(&creates, t))
        .await
        .unwrap();

    assert_eq!(id, "alb_trip2020");
    assert_eq!(creates.load(Ordering::SeqCst), 1);
}
