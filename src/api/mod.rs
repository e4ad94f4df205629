//! # API Module
//!
//! This module provides the HTTP endpoints served by the short-lived local
//! server that backs the interactive authorization flow.
//!
//! ## Endpoints
//!
//! - [`callback`] - Handles the OAuth redirect from Google's authorization
//!   server and completes the PKCE flow by exchanging the authorization code
//!   for an access token.
//! - [`health`] - Health check returning application status and version.
//!
//! ## Architecture
//!
//! Both endpoints are async [Axum](https://docs.rs/axum) handlers wired up by
//! [`crate::server::start_api_server`]. The callback handler shares state
//! with the waiting authorization flow through an
//! `Arc<Mutex<Option<PkceToken>>>` extension: the flow deposits the PKCE
//! verifier before opening the browser, the handler deposits the exchanged
//! token once the user has consented.

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
