use reqwest::Client;

use crate::{
    Res, config,
    types::{Album, CreateAlbumRequest, NewAlbum},
};

/// Creates a remote album with the given title and returns its server id.
///
/// Titles are not unique on the remote side; calling this twice with the
/// same title creates two albums. The album cache in
/// [`crate::management::AlbumManager`] is what keeps that from happening
/// across runs.
pub async fn create(title: String, token: String) -> Res<String> {
    let api_url = format!("{uri}/albums", uri = &config::photos_api_url());
    let body = CreateAlbumRequest {
        album: NewAlbum { title },
    };

    let client = Client::new();
    let response = client
        .post(&api_url)
        .bearer_auth(&token)
        .json(&body)
        .send()
        .await?
        .error_for_status()?;

    let album: Album = response.json().await?;
    Ok(album.id)
}
