//! Configuration management for the Google Photos uploader.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and `.env` files. The OAuth client id has to be
//! provided by the user; everything else defaults to the public Google
//! endpoints and a loopback callback address.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use dotenv;
use std::{env, path::PathBuf};

/// The only scope ever requested. Append-only: the application may create
/// albums and media items but cannot read or list remote content, which is
/// why the album cache exists.
pub const APPEND_ONLY_SCOPE: &str = "https://www.googleapis.com/auth/photoslibrary.appendonly";

const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8085";
const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8085/callback";
const DEFAULT_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const DEFAULT_API_URL: &str = "https://photoslibrary.googleapis.com/v1";
const DEFAULT_UPLOAD_URL: &str = "https://photoslibrary.googleapis.com/v1/uploads";

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from a `.env` file located in the platform-specific
/// local data directory under `phupcli/.env`. Variables already present in
/// the environment keep priority; a missing `.env` file is not an error.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/phupcli/.env`
/// - macOS: `~/Library/Application Support/phupcli/.env`
/// - Windows: `%LOCALAPPDATA%/phupcli/.env`
///
/// # Errors
///
/// Returns an error string if the parent directory cannot be created or an
/// existing `.env` file cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("phupcli/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Returns the bind address for the local OAuth callback server.
pub fn server_addr() -> String {
    env::var("SERVER_ADDRESS").unwrap_or_else(|_| DEFAULT_SERVER_ADDRESS.to_string())
}

/// Returns the OAuth client id for the installed application.
///
/// Retrieves the `PHOTOS_API_AUTH_CLIENT_ID` environment variable which
/// contains the client id obtained when registering the application in the
/// Google Cloud console.
///
/// # Panics
///
/// Panics if the `PHOTOS_API_AUTH_CLIENT_ID` environment variable is not set.
pub fn photos_client_id() -> String {
    env::var("PHOTOS_API_AUTH_CLIENT_ID").expect("PHOTOS_API_AUTH_CLIENT_ID must be set")
}

/// Returns the OAuth redirect URI.
///
/// Must match one of the redirect URIs registered for the OAuth client and
/// point at the local callback server.
pub fn photos_redirect_uri() -> String {
    env::var("PHOTOS_API_REDIRECT_URI").unwrap_or_else(|_| DEFAULT_REDIRECT_URI.to_string())
}

/// Returns the OAuth authorization URL where the user grants consent.
pub fn photos_auth_url() -> String {
    env::var("PHOTOS_API_AUTH_URL").unwrap_or_else(|_| DEFAULT_AUTH_URL.to_string())
}

/// Returns the OAuth token exchange URL used for both the authorization-code
/// and the refresh-token grant.
pub fn photos_token_url() -> String {
    env::var("PHOTOS_API_TOKEN_URL").unwrap_or_else(|_| DEFAULT_TOKEN_URL.to_string())
}

/// Returns the Photos Library API base URL.
pub fn photos_api_url() -> String {
    env::var("PHOTOS_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

/// Returns the raw-bytes upload endpoint.
///
/// This endpoint sits outside the JSON API surface; it accepts an octet
/// stream and answers with an opaque upload token.
pub fn photos_upload_url() -> String {
    env::var("PHOTOS_API_UPLOAD_URL").unwrap_or_else(|_| DEFAULT_UPLOAD_URL.to_string())
}
