//! Poster Use Case - Create One Listing and Record It
//!
//! Sends a listing payload to the marketplace. On success the new id
//! is recorded in the posted-listings state with the current time; on
//! any failure the state is left untouched and nothing is retried.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::domain::{ListingId, ListingPayload, PostedListings};
use crate::ports::marketplace::{CreateOutcome, Marketplace};

/// Post `payload` and record the created listing in `posted`.
///
/// Returns the new listing id, or `None` if the marketplace rejected
/// the listing or the request failed.
pub async fn post_listing<M: Marketplace + ?Sized>(
    market: &M,
    posted: &mut PostedListings,
    payload: &ListingPayload,
    now: DateTime<Utc>,
) -> Option<ListingId> {
    match market.create_listing(payload).await {
        Ok(CreateOutcome::Created(id)) => {
            info!(listing_id = %id, title = %payload.title, "[+] Posted listing");
            posted.insert(id.clone(), now);
            Some(id)
        }
        Ok(CreateOutcome::Rejected { status, body }) => {
            warn!(status, body = %body, title = %payload.title, "[!] Failed to post");
            None
        }
        Err(e) => {
            warn!(error = %e, title = %payload.title, "[!] Failed to post");
            None
        }
    }
}
