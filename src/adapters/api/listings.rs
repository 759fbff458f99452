//! Gameflip Listing Adapter - Implements the `Marketplace` Port
//!
//! Creates listings with `POST /listing` and deletes them with
//! `DELETE /listing/{id}` through the shared signed `GfClient`.
//! Only HTTP 200 counts as success.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{info, instrument, warn};

use super::client::GfClient;
use super::types::{listing_id_from_body, ApiResponse};
use crate::domain::ListingPayload;
use crate::ports::marketplace::{CreateOutcome, DeleteOutcome, Marketplace};

const LISTING_PATH: &str = "/listing";

/// Marketplace adapter backed by the Gameflip REST API.
pub struct GameflipMarketplace {
    client: GfClient,
}

impl GameflipMarketplace {
    pub fn new(client: GfClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Marketplace for GameflipMarketplace {
    #[instrument(skip(self, payload), fields(title = %payload.title, price = payload.price))]
    async fn create_listing(&self, payload: &ListingPayload) -> Result<CreateOutcome> {
        let body = serde_json::to_string(payload).context("Failed to serialize listing")?;
        let response = self.client.post(LISTING_PATH, body).await?;
        let outcome = create_outcome(&response);

        if let CreateOutcome::Created(id) = &outcome {
            info!(listing_id = %id, "Listing created");
        }
        Ok(outcome)
    }

    #[instrument(skip(self))]
    async fn delete_listing(&self, listing_id: &str) -> Result<DeleteOutcome> {
        let path = format!("{LISTING_PATH}/{listing_id}");
        let response = self.client.delete(&path).await?;
        Ok(delete_outcome(&response))
    }
}

/// Map a create response to an outcome. A 200 without an id is a rejection.
pub fn create_outcome(response: &ApiResponse) -> CreateOutcome {
    if response.status != StatusCode::OK {
        return CreateOutcome::Rejected {
            status: response.status.as_u16(),
            body: response.body.clone(),
        };
    }

    match listing_id_from_body(&response.body) {
        Some(id) => CreateOutcome::Created(id),
        None => {
            warn!(body = %response.body, "Create succeeded without a listing id");
            CreateOutcome::Rejected {
                status: response.status.as_u16(),
                body: format!("missing listing id in response: {}", response.body),
            }
        }
    }
}

/// Map a delete response to an outcome.
pub fn delete_outcome(response: &ApiResponse) -> DeleteOutcome {
    if response.status == StatusCode::OK {
        DeleteOutcome::Deleted
    } else {
        DeleteOutcome::Rejected {
            status: response.status.as_u16(),
            body: response.body.clone(),
        }
    }
}
