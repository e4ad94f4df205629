use std::{sync::Arc, time::Duration};

use chrono::Utc;
use reqwest::Client;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::{
    Res, config, info,
    server::start_api_server,
    types::{PkceToken, Token},
    utils, warning,
};

/// Runs the complete interactive OAuth 2.0 PKCE authorization flow.
///
/// This function orchestrates the entire authentication process:
/// 1. Generating a PKCE code verifier and challenge
/// 2. Starting the local callback server
/// 3. Opening the consent page in the user's browser
/// 4. Waiting for the OAuth callback to deposit the exchanged token
///
/// The consent page is requested with `access_type=offline` and
/// `prompt=consent` so the provider hands out a refresh token; without it
/// every later run would need the browser again.
///
/// Unlike a persisted-credential lookup this call blocks on the user: it
/// returns once consent is granted and exchanged, or with an error when the
/// flow is aborted or the timeout elapses. Nothing is persisted here; the
/// caller decides where the token goes.
///
/// # Errors
///
/// Returns an error if no token arrives within the timeout window, which
/// covers denied consent, a closed browser tab, and a failed code exchange.
pub async fn authorize() -> Res<Token> {
    // generate PKCE verifier and challenge
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);

    let shared_state: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(None));

    // start API server
    let server_state = Arc::clone(&shared_state);
    tokio::spawn(async move {
        start_api_server(server_state).await;
    });

    // Construct the authorization URL
    let auth_url = format!(
        "{photos_auth_url}?client_id={client_id}&response_type=code&redirect_uri={redirect_uri}&code_challenge={code_challenge}&code_challenge_method=S256&scope={scope}&access_type=offline&prompt=consent",
        photos_auth_url = &config::photos_auth_url(),
        client_id = &config::photos_client_id(),
        redirect_uri = &config::photos_redirect_uri(),
        code_challenge = code_challenge,
        scope = config::APPEND_ONLY_SCOPE,
    );

    // Store verifier in shared state before redirect
    {
        let mut lock = shared_state.lock().await;
        *lock = Some(PkceToken {
            code_verifier: code_verifier.clone(),
            token: None,
        });
    }

    // Open the authorization URL in the default browser
    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    info!("Waiting for authorization in the browser...");

    // wait for callback to be hit
    match wait_for_token(shared_state).await {
        Some(token) => Ok(token),
        None => Err("authorization flow failed or timed out".into()),
    }
}

/// Waits for the OAuth callback to complete and return a token.
///
/// Polls the shared state for a completed authentication token with a
/// 60-second timeout. This function runs concurrently with the callback
/// handler that populates the token after a successful exchange.
async fn wait_for_token(shared_state: Arc<Mutex<Option<PkceToken>>>) -> Option<Token> {
    use std::time::Instant;

    let max_wait = Duration::from_secs(60);
    let start = Instant::now();

    while start.elapsed() < max_wait {
        let lock = shared_state.lock().await;
        if let Some(pkce_token) = lock.as_ref() {
            if let Some(token) = &pkce_token.token {
                return Some(token.clone());
            }
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}

/// Refreshes an expired access token using a refresh token.
///
/// Exchanges a refresh token for a new access token so the application can
/// keep authenticated access without interactive re-authorization. The
/// provider does not echo the refresh token back on this grant, so the one
/// passed in is carried over into the returned [`Token`].
///
/// # Errors
///
/// Fails on network errors, a revoked or otherwise rejected refresh token
/// (non-2xx response), or a malformed response body. Callers are expected
/// to fall back to [`authorize`] in that case.
pub async fn refresh_token(refresh_token: &str) -> Res<Token> {
    let client = Client::new();
    let res = client
        .post(&config::photos_token_url())
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", &config::photos_client_id()),
        ])
        .send()
        .await?
        .error_for_status()?;

    let json: Value = res.json().await?;
    token_from_response(&json, Some(refresh_token))
}

/// Exchanges an authorization code for an access token using PKCE.
///
/// Completes the flow started by [`authorize`]: the code received on the
/// callback plus the original code verifier yield the access/refresh token
/// pair. The authorization code is single-use and short-lived, so the
/// exchange happens directly in the callback handler.
pub async fn exchange_code_pkce(code: &str, verifier: &str) -> Res<Token> {
    let client_id = &config::photos_client_id();
    let redirect_uri = &config::photos_redirect_uri();

    let client = Client::new();
    let res = client
        .post(&config::photos_token_url())
        .form(&[
            ("grant_type", "authorization_code"),
            ("client_id", client_id),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", redirect_uri),
        ])
        .send()
        .await?
        .error_for_status()?;

    let json: Value = res.json().await?;
    token_from_response(&json, None)
}

fn token_from_response(json: &Value, previous_refresh: Option<&str>) -> Res<Token> {
    let access_token = json["access_token"]
        .as_str()
        .ok_or("token response missing access_token")?;
    let refresh_token = json["refresh_token"]
        .as_str()
        .or(previous_refresh)
        .unwrap_or_default();

    Ok(Token {
        access_token: access_token.to_string(),
        refresh_token: refresh_token.to_string(),
        scope: json["scope"].as_str().unwrap_or_default().to_string(),
        expires_in: json["expires_in"].as_i64().unwrap_or(3600) as u64,
        obtained_at: Utc::now().timestamp() as u64,
    })
}
