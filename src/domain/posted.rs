//! Posted listings - the run-scoped record of listings this bot created.
//!
//! Maps the marketplace-issued listing id to the UTC time it was posted.
//! Owned by the runner and lent by `&mut` to the poster and purge sweep;
//! serialized as a flat JSON object `{ "<id>": "<iso-8601>" }`.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, SubsecRound, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Marketplace-issued listing identifier.
pub type ListingId = String;

/// Creation timestamp of a posted listing.
///
/// Written as RFC 3339 UTC with microseconds. Naive ISO-8601 strings
/// without an offset are read as UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PostedAt(DateTime<Utc>);

impl PostedAt {
    /// Wrap `at`, truncated to the microsecond precision it is stored with.
    pub fn new(at: DateTime<Utc>) -> Self {
        Self(at.trunc_subsecs(6))
    }

    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// Whether `window` has fully elapsed between posting and `now`.
    pub fn is_expired(&self, now: DateTime<Utc>, window: TimeDelta) -> bool {
        self.0
            .checked_add_signed(window)
            .is_some_and(|deadline| deadline < now)
    }

    /// Parse an RFC 3339 timestamp, or a naive one taken as UTC.
    pub fn parse(raw: &str) -> Option<Self> {
        if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
            return Some(Self::new(at.with_timezone(&Utc)));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| Self::new(naive.and_utc()))
    }
}

impl From<DateTime<Utc>> for PostedAt {
    fn from(at: DateTime<Utc>) -> Self {
        Self::new(at)
    }
}

impl fmt::Display for PostedAt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::Micros, true))
    }
}

impl Serialize for PostedAt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PostedAt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }
}

/// Listings created by this bot and not yet deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostedListings {
    entries: BTreeMap<ListingId, PostedAt>,
}

impl PostedListings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly created listing.
    pub fn insert(&mut self, id: impl Into<ListingId>, at: impl Into<PostedAt>) {
        self.entries.insert(id.into(), at.into());
    }

    /// Forget a listing. Returns its timestamp if it was tracked.
    pub fn remove(&mut self, id: &str) -> Option<PostedAt> {
        self.entries.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<PostedAt> {
        self.entries.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ids whose timestamp plus `window` is before `now`.
    pub fn expired(&self, now: DateTime<Utc>, window: TimeDelta) -> Vec<ListingId> {
        self.entries
            .iter()
            .filter(|(_, at)| at.is_expired(now, window))
            .map(|(id, _)| id.clone())
            .collect()
    }
}
