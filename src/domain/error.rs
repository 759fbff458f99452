//! Domain error type.
//!
//! Raised by the listing builder when an input row cannot be coerced
//! into a listing payload. Any of these is fatal for the run.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListingError {
    #[error("Row is missing required field `{0}`")]
    MissingField(&'static str),

    #[error("Invalid price `{value}`: {reason}")]
    InvalidPrice { value: String, reason: String },

    #[error("Invalid quantity `{0}`")]
    InvalidQuantity(String),
}
