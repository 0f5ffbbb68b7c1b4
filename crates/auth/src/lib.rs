//! Music-service OAuth: refresh-token exchange and access-token caching.
//!
//! [`RefreshTokenProvider`] serves a cached access token from the shared
//! key-value store and exchanges the long-lived refresh credential when the
//! cache is empty. [`authorize`] is the one-off bootstrap that turns an
//! authorization code into that refresh credential.

pub mod authorize;
pub mod credentials;
pub mod provider;
pub mod spotify;

pub use credentials::Credentials;
pub use provider::{ACCESS_TOKEN_KEY, RefreshTokenProvider};
pub use spotify::TokenGrant;
