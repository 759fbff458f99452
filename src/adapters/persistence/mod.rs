//! Persistence Adapters - File Storage
//!
//! Implements the `ListingRepository` port with an atomically replaced
//! JSON snapshot of posted listings and an append-only JSONL
//! dead-letter log. No database dependency.

pub mod dead_letter;
pub mod repository_impl;
pub mod state;

pub use dead_letter::DeadLetterLog;
pub use repository_impl::FileRepository;
pub use state::StateStore;
