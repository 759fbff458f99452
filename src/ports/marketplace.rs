//! Marketplace Port - Listing Create/Delete Interface
//!
//! Defines the trait the use cases need from the listing marketplace.
//! A non-success HTTP answer is a normal outcome (`Rejected`), not an
//! error; `Err` is reserved for transport failures after retries.

use async_trait::async_trait;

use crate::domain::{ListingId, ListingPayload};

/// Result of a create-listing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
  /// Listing created with the marketplace-issued id.
  Created(ListingId),
  /// Marketplace refused the listing.
  Rejected {
    /// HTTP status code.
    status: u16,
    /// Response body or reason.
    body: String,
  },
}

/// Result of a delete-listing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
  /// Listing removed from the marketplace.
  Deleted,
  /// Marketplace refused the delete.
  Rejected {
    /// HTTP status code.
    status: u16,
    /// Response body.
    body: String,
  },
}

/// Trait for listing marketplaces.
///
/// Implementors sign and send the HTTP calls. They never touch the
/// posted-listings state; callers update it from the outcome.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Marketplace: Send + Sync + 'static {
  /// Create a listing from `payload`.
  async fn create_listing(&self, payload: &ListingPayload) -> anyhow::Result<CreateOutcome>;

  /// Delete the listing with id `listing_id`.
  async fn delete_listing(&self, listing_id: &str) -> anyhow::Result<DeleteOutcome>;
}
