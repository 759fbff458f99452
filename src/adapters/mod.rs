//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies (HTTP client, file I/O). Each sub-module
//! groups adapters by infrastructure concern.
//!
//! Adapter categories:
//! - `api`: Gameflip REST API client and request signing
//! - `input`: CSV listing rows
//! - `persistence`: Posted-listings state and dead-letter log

pub mod api;
pub mod input;
pub mod persistence;
