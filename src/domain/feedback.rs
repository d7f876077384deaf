//! Community feedback on a listing.
//!
//! Each feedback entry is a single confirmation ("this is accurate") or dispute
//! ("this seems wrong"), optionally with a short comment. Entries are never
//! edited or deleted.

use super::listing::ListingId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of characters kept from a feedback comment.
pub const FEEDBACK_TEXT_LIMIT: usize = 200;

/// Opaque feedback identifier assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedbackId(String);

impl FeedbackId {
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeedbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A persisted feedback entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: FeedbackId,
    pub listing_id: ListingId,
    pub text: Option<String>,
    pub is_confirmation: bool,
    pub created_at: i64,
}

impl Feedback {
    #[must_use]
    pub fn from_new(fields: NewFeedback, id: FeedbackId, created_at: i64) -> Self {
        Self {
            id,
            listing_id: fields.listing_id,
            text: fields.text,
            is_confirmation: fields.is_confirmation,
            created_at,
        }
    }
}

/// Fields for a feedback entry about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFeedback {
    pub listing_id: ListingId,
    pub text: Option<String>,
    pub is_confirmation: bool,
}

impl NewFeedback {
    /// Builds feedback fields, capping the comment at capture time.
    #[must_use]
    pub fn new(listing_id: ListingId, is_confirmation: bool, text: &str) -> Self {
        Self {
            listing_id,
            text: capture_text(text),
            is_confirmation,
        }
    }
}

/// Applies the comment cap: keeps at most [`FEEDBACK_TEXT_LIMIT`] characters.
///
/// Over-long input is truncated, never rejected. Empty input means "no text".
///
/// ```
/// use iftaar_finder::domain::feedback::{capture_text, FEEDBACK_TEXT_LIMIT};
///
/// assert_eq!(capture_text(""), None);
/// assert_eq!(capture_text("great place").as_deref(), Some("great place"));
/// let long = "x".repeat(500);
/// assert_eq!(capture_text(&long).map(|t| t.chars().count()), Some(FEEDBACK_TEXT_LIMIT));
/// ```
#[must_use]
pub fn capture_text(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    Some(raw.chars().take(FEEDBACK_TEXT_LIMIT).collect())
}
