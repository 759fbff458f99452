//! Domain layer - Core listing logic and models.
//!
//! Pure logic with no I/O: building listing payloads from input rows,
//! tracking posted listings and their expiry, and cycling the row cursor.
//! Everything here is testable in isolation.

pub mod cursor;
pub mod error;
pub mod listing;
pub mod posted;

pub use cursor::RowCursor;
pub use error::ListingError;
pub use listing::{build_listing, ListingDefaults, ListingPayload, Row};
pub use posted::{ListingId, PostedAt, PostedListings};
