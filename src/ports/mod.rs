//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the use cases require from
//! the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `Marketplace`: Listing creation and deletion
//! - `ListingRepository`: Posted-listings state and dead-letter log

pub mod marketplace;
pub mod repository;

pub use marketplace::{CreateOutcome, DeleteOutcome, Marketplace};
pub use repository::{DeadLetter, ListingRepository};
