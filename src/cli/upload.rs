use std::{path::PathBuf, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    error, info,
    management::{AlbumManager, FileAlbumCacheStore, FileTokenStore, TokenManager, TokenStore},
    photos, success,
};

/// Uploads one media file, optionally into the named album.
///
/// This is the whole pipeline of a run: obtain credentials, resolve the
/// album title if one was given, push the raw bytes, commit the returned
/// upload token as a media item, print the server's per-item status. Any
/// fatal step exits through the `error!` macro; the printed status itself
/// does not influence the exit code.
pub async fn upload(file_path: PathBuf, album_title: Option<String>) {
    let mut token_mgr = match TokenManager::obtain(FileTokenStore::new()).await {
        Ok(mgr) => mgr,
        Err(e) => error!("Cannot obtain credentials. Err: {}", e),
    };

    let album_id = match album_title {
        Some(title) => {
            info!("Uploading to {}", title);
            Some(resolve_album(&mut token_mgr, &title).await)
        }
        None => None,
    };

    info!("Uploading {}", file_path.display());

    let token = match token_mgr.get_valid_token().await {
        Ok(token) => token,
        Err(e) => error!("Cannot obtain a valid access token. Err: {}", e),
    };

    let pb = spinner("Uploading media bytes...");
    let upload_token = match photos::upload::upload_bytes(&token, &file_path).await {
        Ok(upload_token) => {
            pb.finish_and_clear();
            upload_token
        }
        Err(e) => {
            pb.finish_and_clear();
            error!("Failed to upload {}: {}", file_path.display(), e);
        }
    };

    let pb = spinner("Creating media item...");
    let response = match photos::upload::batch_create(&token, upload_token, album_id).await {
        Ok(response) => {
            pb.finish_and_clear();
            response
        }
        Err(e) => {
            pb.finish_and_clear();
            error!("Failed to create media item: {}", e);
        }
    };

    // One requested item, one status. Printed whatever it says; a
    // remote-side failure still ends the run normally.
    for result in &response.new_media_item_results {
        let message = result
            .status
            .message
            .clone()
            .unwrap_or_else(|| "no status message".to_string());
        info!("Response: {}", message);
    }
}

/// Resolves an album title to its remote id through the local cache,
/// creating the album remotely on first use.
async fn resolve_album<S: TokenStore>(token_mgr: &mut TokenManager<S>, title: &str) -> String {
    let mut album_mgr = match AlbumManager::load(FileAlbumCacheStore::new()).await {
        Ok(mgr) => mgr,
        Err(e) => error!("Cannot load album cache. Err: {}", e),
    };

    let known = album_mgr.get(title).is_some();

    let token = match token_mgr.get_valid_token().await {
        Ok(token) => token,
        Err(e) => error!("Cannot obtain a valid access token. Err: {}", e),
    };

    let album_id = match album_mgr
        .resolve_or_create(title, |t| photos::albums::create(t, token))
        .await
    {
        Ok(id) => id,
        Err(e) => error!("Cannot resolve album {}. Err: {}", title, e),
    };

    if !known {
        success!("Created album {} ({})", title, album_id);
    }

    album_id
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}
