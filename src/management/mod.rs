mod album;
mod auth;

pub use album::AlbumCacheStore;
pub use album::AlbumManager;
pub use album::FileAlbumCacheStore;
pub use auth::FileTokenStore;
pub use auth::TokenManager;
pub use auth::TokenStore;
