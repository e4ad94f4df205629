//! # Google Photos Integration Module
//!
//! This module is the integration layer between the CLI and the Photos
//! Library API. It implements the OAuth 2.0 PKCE installed-app flow and the
//! three write endpoints the append-only scope permits: album creation, raw
//! byte upload, and media-item batch creation.
//!
//! ## Architecture
//!
//! ```text
//! Application Layer (CLI, Management)
//!          ↓
//! Photos Integration Layer
//!     ├── Authentication (OAuth 2.0 PKCE, token refresh)
//!     ├── Album Operations (create)
//!     └── Upload Operations (raw upload, batch create)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Google Photos Library API
//! ```
//!
//! ## Authentication Strategy
//!
//! [`auth`] implements the authorization-code grant with PKCE, so no client
//! secret has to be stored:
//!
//! 1. **Code Verifier Generation**: cryptographically random verifier
//! 2. **Challenge Creation**: SHA256 challenge derived from the verifier
//! 3. **Authorization Request**: browser is pointed at the consent page,
//!    requesting offline access so a refresh token is granted
//! 4. **Local Callback**: authorization code arrives at the temporary
//!    HTTP server
//! 5. **Token Exchange**: code + verifier are exchanged for the token pair
//!
//! Refreshing an expired token is a plain refresh-token grant; the provider
//! omits the refresh token from refresh responses, so the previous one is
//! carried over.
//!
//! ## Upload Protocol
//!
//! [`upload`] performs the two-phase upload the API requires. Phase one
//! POSTs the file content as an octet stream and yields an opaque,
//! single-use upload token with a short server-side expiry. Phase two
//! commits that token as one simple media item, optionally bound to an
//! album at creation time. There is no chunking, resumption, or retry;
//! transport failures abort the run.
//!
//! ## Error Types
//!
//! All functions return [`crate::Res`], which absorbs both I/O errors from
//! reading the media file and HTTP errors from reqwest. Non-2xx responses
//! are turned into errors via `error_for_status` rather than being parsed.

pub mod albums;
pub mod auth;
pub mod upload;
