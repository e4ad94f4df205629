use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Utc;
use phupcli::management::{FileTokenStore, TokenManager, TokenStore};
use phupcli::types::Token;

fn token_obtained_secs_ago(age_secs: u64) -> Token {
    Token {
        access_token: "acc_123".to_string(),
        refresh_token: "ref_456".to_string(),
        scope: "https://www.googleapis.com/auth/photoslibrary.appendonly".to_string(),
        expires_in: 3600,
        obtained_at: Utc::now().timestamp() as u64 - age_secs,
    }
}

/// In-memory credential store that counts its calls, so tests can assert
/// which lifecycle branch ran.
struct MemTokenStore {
    token: Mutex<Option<Token>>,
    loads: AtomicUsize,
    saves: AtomicUsize,
}

impl MemTokenStore {
    fn with(token: Option<Token>) -> Self {
        Self {
            token: Mutex::new(token),
            loads: AtomicUsize::new(0),
            saves: AtomicUsize::new(0),
        }
    }
}

impl TokenStore for &MemTokenStore {
    async fn load(&self) -> Result<Option<Token>, String> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.token.lock().unwrap().clone())
    }

    async fn save(&self, token: &Token) -> Result<(), String> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self.token.lock().unwrap() = Some(token.clone());
        Ok(())
    }
}

fn temp_store(name: &str) -> FileTokenStore {
    let path = std::env::temp_dir()
        .join(format!("phupcli-test-{}", std::process::id()))
        .join(name)
        .join("token.json");
    FileTokenStore::at(path)
}

#[test]
fn test_token_validity() {
    // Freshly obtained token is valid
    assert!(token_obtained_secs_ago(0).is_valid());

    // Expired long ago
    assert!(!token_obtained_secs_ago(7200).is_valid());

    // Inside the early-refresh margin counts as expired even though the
    // nominal lifetime has not elapsed yet
    assert!(!token_obtained_secs_ago(3600 - Token::EXPIRY_MARGIN_SECS + 10).is_valid());

    // Just outside the margin is still valid
    assert!(token_obtained_secs_ago(3600 - Token::EXPIRY_MARGIN_SECS - 10).is_valid());
}

#[test]
fn test_token_validity_short_lifetime() {
    // A lifetime shorter than the margin must not underflow; the token is
    // simply never valid
    let mut token = token_obtained_secs_ago(0);
    token.expires_in = 60;
    assert!(!token.is_valid());
}

#[tokio::test]
async fn test_obtain_uses_valid_stored_token_without_saving() {
    let store = MemTokenStore::with(Some(token_obtained_secs_ago(0)));

    let manager = TokenManager::obtain(&store).await.unwrap();

    assert_eq!(manager.current_token().access_token, "acc_123");
    assert_eq!(store.loads.load(Ordering::SeqCst), 1);
    // A valid persisted credential is used as-is; nothing is rewritten
    assert_eq!(store.saves.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_get_valid_token_returns_held_token_while_fresh() {
    let store = MemTokenStore::with(Some(token_obtained_secs_ago(0)));

    let mut manager = TokenManager::obtain(&store).await.unwrap();
    let access = manager.get_valid_token().await.unwrap();

    assert_eq!(access, "acc_123");
    assert_eq!(store.saves.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_file_store_absent_file_is_no_credential() {
    let store = temp_store("absent");
    assert!(store.load().await.unwrap().is_none());
}

#[tokio::test]
async fn test_file_store_round_trip() {
    let store = temp_store("round-trip");
    let token = token_obtained_secs_ago(10);

    store.save(&token).await.unwrap();
    let loaded = store.load().await.unwrap().unwrap();

    assert_eq!(loaded.access_token, token.access_token);
    assert_eq!(loaded.refresh_token, token.refresh_token);
    assert_eq!(loaded.obtained_at, token.obtained_at);
}

#[tokio::test]
async fn test_file_store_overwrites_on_save() {
    let store = temp_store("overwrite");

    store.save(&token_obtained_secs_ago(7200)).await.unwrap();
    let mut fresh = token_obtained_secs_ago(0);
    fresh.access_token = "acc_new".to_string();
    store.save(&fresh).await.unwrap();

    let loaded = store.load().await.unwrap().unwrap();
    assert_eq!(loaded.access_token, "acc_new");
}

#[tokio::test]
async fn test_file_store_corrupt_record_is_an_error() {
    let dir = std::env::temp_dir()
        .join(format!("phupcli-test-{}", std::process::id()))
        .join("corrupt");
    std::fs::create_dir_all(&dir).unwrap();
    let path: PathBuf = dir.join("token.json");
    std::fs::write(&path, "not json at all").unwrap();

    let store = FileTokenStore::at(path);
    // The manager downgrades this to "no credential"; the store itself
    // reports the record as unusable
    assert!(store.load().await.is_err());
}
