//! # CLI Module
//!
//! User-facing command implementations. There is exactly one command in this
//! application, [`upload`], which runs the whole single-shot pipeline:
//!
//! 1. **Credentials**: load, refresh, or interactively obtain a token via
//!    [`crate::management::TokenManager`]
//! 2. **Album resolution** (only when a title was passed): cached id or a
//!    fresh remote album via [`crate::management::AlbumManager`]
//! 3. **Two-phase upload**: raw bytes, then the batch-create commit
//! 4. **Reporting**: the server's per-item status message, printed verbatim
//!
//! Fatal conditions exit through the `error!` macro with a diagnostic;
//! everything else ends the process with status 0, including a remote-side
//! per-item failure. Network calls show an indicatif spinner while they are
//! in flight; upload progress itself is not tracked.

mod upload;

pub use upload::upload;
