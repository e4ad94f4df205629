use std::path::Path;

use reqwest::Client;

use crate::{
    Res, config,
    types::{BatchCreateRequest, BatchCreateResponse, NewMediaItem, SimpleMediaItem},
    utils,
};

/// Phase one of the two-phase upload: sends the raw file content and returns
/// the opaque upload token from the response body.
///
/// The file is read in full before any network traffic, so a missing or
/// unreadable path fails as a local I/O error without touching the API. The
/// request declares the raw upload protocol and carries the file's base name
/// in the metadata headers; the server infers the media type from the
/// content itself.
///
/// The returned token is single-use and expires server-side after a short
/// window, so it should be committed via [`batch_create`] right away.
pub async fn upload_bytes(token: &str, file_path: &Path) -> Res<String> {
    let content = async_fs::read(file_path).await?;
    let file_name = utils::file_base_name(file_path)?;

    let client = Client::new();
    let response = client
        .post(&config::photos_upload_url())
        .bearer_auth(token)
        .header("Content-type", "application/octet-stream")
        .header("X-Goog-Upload-Protocol", "raw")
        .header("X-Goog-Upload-File-Name", file_name)
        .body(content)
        .send()
        .await?
        .error_for_status()?;

    Ok(response.text().await?)
}

/// Phase two: commits an upload token as a single new media item.
///
/// When `album_id` is set the item is attached to that album at creation
/// time; there is no separate add-to-album call. The response carries one
/// status per requested item, which the caller prints verbatim. A remote
/// per-item failure (quota, unsupported type) still comes back as a 2xx
/// response here.
pub async fn batch_create(
    token: &str,
    upload_token: String,
    album_id: Option<String>,
) -> Res<BatchCreateResponse> {
    let api_url = format!(
        "{uri}/mediaItems:batchCreate",
        uri = &config::photos_api_url()
    );
    let body = BatchCreateRequest {
        album_id,
        new_media_items: vec![NewMediaItem {
            simple_media_item: SimpleMediaItem { upload_token },
        }],
    };

    let client = Client::new();
    let response = client
        .post(&api_url)
        .bearer_auth(token)
        .json(&body)
        .send()
        .await?
        .error_for_status()?;

    Ok(response.json().await?)
}
