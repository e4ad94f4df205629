use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Credentials for the Photos Library API, as persisted between runs.
///
/// Deleting the persisted record forces a full re-authorization on the next
/// run; there is no explicit revocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

impl Token {
    /// Seconds subtracted from the nominal lifetime so a token is renewed
    /// shortly before the server would start rejecting it.
    pub const EXPIRY_MARGIN_SECS: u64 = 240;

    /// Whether the access token can still be used as-is.
    pub fn is_valid(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        now < self.obtained_at + self.expires_in.saturating_sub(Self::EXPIRY_MARGIN_SECS)
    }
}

#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub token: Option<Token>,
}

/// Remote album as returned by the album-creation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAlbumRequest {
    pub album: NewAlbum,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAlbum {
    pub title: String,
}

/// Commit request for previously uploaded bytes. Always carries exactly one
/// item in this application; `album_id` is set only when the upload targets
/// an album.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCreateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album_id: Option<String>,
    pub new_media_items: Vec<NewMediaItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMediaItem {
    pub simple_media_item: SimpleMediaItem,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleMediaItem {
    pub upload_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCreateResponse {
    pub new_media_item_results: Vec<NewMediaItemResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMediaItemResult {
    pub upload_token: Option<String>,
    pub status: ItemStatus,
    pub media_item: Option<MediaItem>,
}

/// Per-item outcome reported by the batch-create endpoint. The server sends
/// a message for failures and usually for successes too; `code` is absent on
/// success.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemStatus {
    pub code: Option<i64>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: String,
    pub product_url: Option<String>,
    pub filename: Option<String>,
}
