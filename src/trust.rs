//! Community trust model.
//!
//! Turns raw feedback counters into status flags and applies new feedback to a
//! listing. Status is derived on every read and never persisted, so the counts
//! remain the single source of truth.
//!
//! # Counter race
//!
//! With [`CounterUpdate::ReadModifyWrite`] the counter bump is a read followed
//! by a separate write with no concurrency token. Two submissions racing on the
//! same listing can both read `n` and both write `n + 1`, losing one increment.
//! Counts still never go backward and no other field is touched, so the gap is
//! accepted rather than reported. [`CounterUpdate::Atomic`] closes it for
//! stores that implement a single-step increment.

use crate::domain::error::Result;
use crate::domain::{Listing, ListingId, NewFeedback};
use crate::storage::ListingStore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Confirmations (or disputes) needed before the status flag flips.
pub const VERIFICATION_THRESHOLD: u32 = 3;

/// One of a listing's two feedback counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Counter {
    Confirmed,
    Disputed,
}

impl Counter {
    /// The counter a vote increments.
    #[must_use]
    pub const fn for_vote(is_confirmation: bool) -> Self {
        if is_confirmation {
            Self::Confirmed
        } else {
            Self::Disputed
        }
    }

    /// Reads this counter from a listing.
    #[must_use]
    pub const fn get(self, listing: &Listing) -> u32 {
        match self {
            Self::Confirmed => listing.confirmed_count,
            Self::Disputed => listing.disputed_count,
        }
    }

    pub(crate) fn get_mut(self, listing: &mut Listing) -> &mut u32 {
        match self {
            Self::Confirmed => &mut listing.confirmed_count,
            Self::Disputed => &mut listing.disputed_count,
        }
    }

    /// Store column name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed_count",
            Self::Disputed => "disputed_count",
        }
    }
}

/// Derived verification flags. Both may be set at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrustStatus {
    /// At least [`VERIFICATION_THRESHOLD`] confirmations.
    pub verified: bool,
    /// At least [`VERIFICATION_THRESHOLD`] disputes; the listing needs re-verification.
    pub disputed: bool,
}

impl TrustStatus {
    /// Derives the status of `listing` from its counters.
    ///
    /// ```
    /// use iftaar_finder::trust::TrustStatus;
    /// # use iftaar_finder::domain::*;
    /// # let mut listing = Listing::from_new(NewListing {
    /// #     name: "n".into(), area: "a".into(), coordinate: Coordinate::new(0.0, 0.0),
    /// #     offerings: Offerings::default(), serving_time: None, notes: None, capacity: None,
    /// # }, ListingId::from("x"), 0);
    /// listing.confirmed_count = 3;
    /// listing.disputed_count = 4;
    /// let status = TrustStatus::of(&listing);
    /// assert!(status.verified && status.disputed);
    /// ```
    #[must_use]
    pub const fn of(listing: &Listing) -> Self {
        Self::from_counts(listing.confirmed_count, listing.disputed_count)
    }

    #[must_use]
    pub const fn from_counts(confirmed: u32, disputed: u32) -> Self {
        Self {
            verified: confirmed >= VERIFICATION_THRESHOLD,
            disputed: disputed >= VERIFICATION_THRESHOLD,
        }
    }
}

impl Listing {
    /// See [`TrustStatus::of`].
    #[must_use]
    pub const fn status(&self) -> TrustStatus {
        TrustStatus::of(self)
    }

    #[must_use]
    pub const fn is_verified(&self) -> bool {
        self.status().verified
    }

    #[must_use]
    pub const fn needs_reverification(&self) -> bool {
        self.status().disputed
    }
}

/// How [`apply_feedback`] bumps the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CounterUpdate {
    /// Read the counter, then write `value + 1` in a second request.
    #[default]
    ReadModifyWrite,
    /// Delegate to [`ListingStore::increment_counter`].
    Atomic,
}

impl fmt::Display for CounterUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ReadModifyWrite => "read-modify-write",
            Self::Atomic => "atomic",
        })
    }
}

impl FromStr for CounterUpdate {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "read-modify-write" | "read_modify_write" | "rmw" => Ok(Self::ReadModifyWrite),
            "atomic" => Ok(Self::Atomic),
            other => Err(format!("unknown counter update strategy: {other}")),
        }
    }
}

/// Records a feedback entry and bumps the matching counter on its listing.
///
/// Steps, each awaited before the next:
///
/// 1. insert the feedback row
/// 2. increment `confirmed_count` or `disputed_count` per `strategy`
///
/// Returns the counter value this call wrote.
///
/// # Errors
///
/// Fails if either step fails. A failure in step 2 leaves the feedback row in
/// place without its increment; readers must tolerate that.
pub async fn apply_feedback(
    store: &dyn ListingStore,
    feedback: &NewFeedback,
    strategy: CounterUpdate,
) -> Result<u32> {
    let listing_id: &ListingId = &feedback.listing_id;
    let counter = Counter::for_vote(feedback.is_confirmation);

    tracing::debug!(
        listing_id = %listing_id,
        counter = counter.as_str(),
        %strategy,
        has_text = feedback.text.is_some(),
        "applying feedback"
    );

    store.create_feedback(feedback).await?;

    let written = match strategy {
        CounterUpdate::ReadModifyWrite => {
            let current = store.read_counter(listing_id, counter).await?;
            let next = current.saturating_add(1);
            store.write_counter(listing_id, counter, next).await?;
            next
        }
        CounterUpdate::Atomic => store.increment_counter(listing_id, counter).await?,
    };

    tracing::debug!(listing_id = %listing_id, counter = counter.as_str(), value = written, "feedback applied");
    Ok(written)
}
