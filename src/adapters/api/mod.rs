//! Gameflip REST API Adapter
//!
//! Implements the HTTP client for the Gameflip marketplace API.
//! Handles request signing, listing creation and deletion.
//!
//! Sub-modules:
//! - `auth`: HMAC-SHA256 request signing
//! - `client`: HTTP client with timeout and retries
//! - `listings`: `Marketplace` port implementation
//! - `types`: API response types

pub mod auth;
pub mod client;
pub mod listings;
pub mod types;

pub use auth::GfAuth;
pub use client::{GfClient, GfClientConfig};
pub use listings::GameflipMarketplace;
