//! Property-Based Tests - Domain Layer Invariants
//!
//! Uses `proptest` to verify that the listing builder, posted-listings
//! map and purge sweep keep their invariants across random inputs.

use async_trait::async_trait;
use chrono::{TimeDelta, TimeZone, Utc};
use proptest::prelude::*;

use gameflip_autolister::domain::listing::{listing_title, price_to_cents, split_tags};
use gameflip_autolister::domain::{PostedListings, RowCursor};
use gameflip_autolister::ports::marketplace::{CreateOutcome, DeleteOutcome, Marketplace};
use gameflip_autolister::usecases::{PurgePolicy, PurgeSweep};

/// Marketplace that accepts every delete.
struct AcceptAll;

#[async_trait]
impl Marketplace for AcceptAll {
    async fn create_listing(
        &self,
        _payload: &gameflip_autolister::domain::ListingPayload,
    ) -> anyhow::Result<CreateOutcome> {
        Ok(CreateOutcome::Created("unused".to_string()))
    }

    async fn delete_listing(&self, _listing_id: &str) -> anyhow::Result<DeleteOutcome> {
        Ok(DeleteOutcome::Deleted)
    }
}

// ── Listing Builder Properties ──────────────────────────────

proptest! {
    /// Prices with at most two decimals convert exactly.
    #[test]
    fn two_decimal_price_is_exact(units in 0i64..10_000_000, cents in 0i64..100) {
        let price = format!("{units}.{cents:02}");
        prop_assert_eq!(price_to_cents(&price).unwrap(), units * 100 + cents);
    }

    /// Whole-number prices are multiplied by 100.
    #[test]
    fn integer_price_is_scaled(units in 0i64..10_000_000) {
        prop_assert_eq!(price_to_cents(&units.to_string()).unwrap(), units * 100);
    }

    /// The quantity suffix appears only when enabled and quantity > 1.
    #[test]
    fn title_suffix_only_above_one(
        title in "[A-Za-z ]{1,20}",
        quantity in -5i64..50,
        append in any::<bool>(),
    ) {
        let result = listing_title(&title, quantity, append);
        if append && quantity > 1 {
            prop_assert_eq!(result, format!("{title} x{quantity}"));
        } else {
            prop_assert_eq!(result, title);
        }
    }

    /// Joining split tags with commas restores the original column.
    #[test]
    fn tags_split_on_every_comma(tags in prop::collection::vec("[a-z ]{0,8}", 1..6)) {
        let column = tags.join(",");
        prop_assume!(!column.is_empty());
        let split = split_tags(Some(&column));
        prop_assert_eq!(split.len(), tags.len());
        prop_assert_eq!(split.join(","), column);
    }
}

// ── Cursor Properties ───────────────────────────────────────

proptest! {
    /// After `steps` advances the cursor sits at `steps mod len`.
    #[test]
    fn cursor_wraps_modulo_len(len in 1usize..50, steps in 0usize..500) {
        let mut cursor = RowCursor::new(len).unwrap();
        for _ in 0..steps {
            cursor.advance();
        }
        prop_assert_eq!(cursor.index(), steps % len);
        prop_assert!(cursor.index() < len);
    }
}

// ── Purge Properties ────────────────────────────────────────

proptest! {
    /// A sweep leaves only listings within the window, and a second
    /// sweep at the same instant deletes nothing.
    #[test]
    fn purge_keeps_fresh_and_is_idempotent(ages in prop::collection::vec(0i64..100, 0..20)) {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let policy = PurgePolicy::default();

        let mut posted = PostedListings::new();
        for (i, age) in ages.iter().enumerate() {
            posted.insert(format!("L{i}"), now - TimeDelta::hours(*age));
        }
        let fresh = ages.iter().filter(|age| **age <= 36).count();

        let mut sweep = PurgeSweep::new(policy.clone());
        let first = tokio_test::block_on(sweep.run(&AcceptAll, &mut posted, now));
        let second = tokio_test::block_on(sweep.run(&AcceptAll, &mut posted, now));

        prop_assert_eq!(posted.len(), fresh);
        prop_assert_eq!(first.deleted.len(), ages.len() - fresh);
        prop_assert!(second.is_noop());
        prop_assert!(posted.expired(now, policy.window).is_empty());
    }
}
