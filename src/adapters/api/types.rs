//! Gameflip API Request/Response Types
//!
//! The listing request body is `domain::ListingPayload`; this module
//! holds the raw response type and id extraction for create calls.

use reqwest::StatusCode;
use serde_json::Value;

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone)]
pub struct ApiResponse {
  /// HTTP status.
  pub status: StatusCode,
  /// Raw response body.
  pub body: String,
}

/// Listing id from a create response.
///
/// Accepts a top-level `id` as well as Gameflip's
/// `{"status": "SUCCESS", "data": {"id": ...}}` envelope.
pub fn listing_id_from_body(body: &str) -> Option<String> {
  let json: Value = serde_json::from_str(body).ok()?;

  let non_empty_str = |pointer: &str| {
    json
      .pointer(pointer)
      .and_then(Value::as_str)
      .filter(|id| !id.is_empty())
  };

  non_empty_str("/id")
    .or_else(|| non_empty_str("/data/id"))
    .map(str::to_string)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_top_level_id() {
    assert_eq!(
      listing_id_from_body(r#"{"id": "abc-123"}"#),
      Some("abc-123".to_string())
    );
  }

  #[test]
  fn test_envelope_id() {
    let body = r#"{"status": "SUCCESS", "data": {"id": "abc-123", "title": "Sword"}}"#;
    assert_eq!(listing_id_from_body(body), Some("abc-123".to_string()));
  }

  #[test]
  fn test_falls_back_when_top_level_id_unusable() {
    for top in [r#"null"#, r#"42"#, r#""""#] {
      let body = format!(r#"{{"id": {top}, "data": {{"id": "abc-123"}}}}"#);
      assert_eq!(listing_id_from_body(&body), Some("abc-123".to_string()), "{body}");
    }
  }

  #[test]
  fn test_missing_or_invalid_id() {
    assert_eq!(listing_id_from_body(r#"{"status": "SUCCESS"}"#), None);
    assert_eq!(listing_id_from_body(r#"{"id": 42}"#), None);
    assert_eq!(listing_id_from_body("not json"), None);
  }
}
