//! Side effects requested by the event handler.
//!
//! [`handle_event`](super::handle_event) never touches the store or the
//! location provider. It returns a `Vec<Action>` and the
//! [`Session`](super::Session) runtime executes them in order, feeding each
//! result back as a response [`Event`](super::Event).

use super::modes::LocationPurpose;
use crate::domain::{ListingDraft, ListingId};

/// Commands executed by the session runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Re-read the listing collection (through the query cache).
    RefreshListings,

    /// Read feedback for one listing.
    LoadFeedback(ListingId),

    /// Ask the location provider for one reading.
    RequestLocation(LocationPurpose),

    /// Insert a listing. The draft already carries the selected coordinate.
    CreateListing(ListingDraft),

    /// Record a confirmation or dispute.
    SubmitFeedback {
        listing_id: ListingId,
        is_confirmation: bool,
        text: String,
    },
}
