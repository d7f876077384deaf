//! Event handling and state transitions.
//!
//! [`handle_event`] is synchronous and pure with respect to I/O: it mutates
//! [`AppState`] and returns the [`Action`]s to run. Results of those actions
//! come back as the response variants of [`Event`].
//!
//! Local validation failures (submitting without a coordinate, feedback with no
//! open listing) are returned as errors and leave the state untouched.

use super::modes::{LocationPurpose, LocationSelection, Tab};
use super::state::{AppState, NoticeLevel};
use super::Action;
use crate::discovery::Category;
use crate::domain::error::{Result, ValidationError};
use crate::domain::{Coordinate, Feedback, Listing, ListingDraft, ListingId, LocationError};
use crate::lifecycle::validate_draft;

/// Inputs from the user, the map surface, and completed actions.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Session start: load listings and the user's position.
    Start,

    /// The search box changed.
    SearchChanged(String),
    CategorySelected(Category),
    SwitchTab(Tab),

    /// A marker was tapped outside placement mode.
    MarkerTapped(ListingId),
    /// The map surface was tapped in placement mode.
    SurfaceTapped(Coordinate),
    CloseDetail,

    /// Arm pin drop: the next surface tap places the new listing.
    RequestPinDrop,
    /// Use a fresh device reading as the new listing's coordinate.
    UseDeviceLocation,
    /// Refresh the user's position for ranking only.
    RefreshLocation,

    /// Submit the add form. The coordinate comes from the current selection;
    /// any coordinate on the draft itself is ignored.
    SubmitListing(ListingDraft),
    AbandonCreation,

    /// Confirm or dispute the open listing.
    SubmitFeedback { is_confirmation: bool, text: String },

    ListingsLoaded(std::result::Result<Vec<Listing>, String>),
    FeedbackLoaded {
        listing_id: ListingId,
        result: std::result::Result<Vec<Feedback>, String>,
    },
    LocationResolved {
        purpose: LocationPurpose,
        result: std::result::Result<Coordinate, LocationError>,
    },
    ListingCreated(std::result::Result<Listing, String>),
    FeedbackSubmitted {
        listing_id: ListingId,
        is_confirmation: bool,
        result: std::result::Result<(), String>,
    },
}

impl Event {
    /// Variant name for log fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::SearchChanged(_) => "search_changed",
            Self::CategorySelected(_) => "category_selected",
            Self::SwitchTab(_) => "switch_tab",
            Self::MarkerTapped(_) => "marker_tapped",
            Self::SurfaceTapped(_) => "surface_tapped",
            Self::CloseDetail => "close_detail",
            Self::RequestPinDrop => "request_pin_drop",
            Self::UseDeviceLocation => "use_device_location",
            Self::RefreshLocation => "refresh_location",
            Self::SubmitListing(_) => "submit_listing",
            Self::AbandonCreation => "abandon_creation",
            Self::SubmitFeedback { .. } => "submit_feedback",
            Self::ListingsLoaded(_) => "listings_loaded",
            Self::FeedbackLoaded { .. } => "feedback_loaded",
            Self::LocationResolved { .. } => "location_resolved",
            Self::ListingCreated(_) => "listing_created",
            Self::FeedbackSubmitted { .. } => "feedback_submitted",
        }
    }
}

/// Processes one event and returns the actions to execute, in order.
///
/// # Errors
///
/// Returns a [`ValidationError`] for a locally rejected submission. No state
/// changes and no actions are produced in that case.
#[allow(clippy::too_many_lines)]
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<Vec<Action>> {
    let _span = tracing::debug_span!(
        "handle_event",
        event = event.kind(),
        selection = state.selection.name()
    )
    .entered();

    match event {
        Event::Start => {
            state.loading_listings = true;
            Ok(vec![
                Action::RefreshListings,
                Action::RequestLocation(LocationPurpose::UserPosition),
            ])
        }
        Event::SearchChanged(query) => {
            state.search_query.clone_from(query);
            state.apply_filters();
            Ok(vec![])
        }
        Event::CategorySelected(category) => {
            state.category = *category;
            state.apply_filters();
            Ok(vec![])
        }
        Event::SwitchTab(tab) => {
            state.tab = *tab;
            Ok(vec![])
        }
        Event::MarkerTapped(listing_id) => {
            if state.selection.placement_mode() {
                tracing::debug!(listing_id = %listing_id, "marker tap ignored in placement mode");
                return Ok(vec![]);
            }
            state.selected_listing = Some(listing_id.clone());
            state.feedback.clear();
            Ok(vec![Action::LoadFeedback(listing_id.clone())])
        }
        Event::SurfaceTapped(coordinate) => {
            if !state.selection.placement_mode() {
                return Ok(vec![]);
            }
            if !coordinate.is_valid() {
                tracing::warn!(
                    latitude = coordinate.latitude,
                    longitude = coordinate.longitude,
                    "ignoring invalid pin"
                );
                return Ok(vec![]);
            }
            state.selection = LocationSelection::PinDropped(*coordinate);
            state.tab = Tab::Add;
            Ok(vec![])
        }
        Event::CloseDetail => {
            state.selected_listing = None;
            state.feedback.clear();
            Ok(vec![])
        }
        Event::RequestPinDrop => {
            state.selection = LocationSelection::PinDropArmed;
            state.tab = Tab::Map;
            Ok(vec![])
        }
        Event::UseDeviceLocation => {
            if state.selection.is_awaiting() {
                return Ok(vec![]);
            }
            state.selection = LocationSelection::AwaitingDeviceLocation;
            Ok(vec![Action::RequestLocation(LocationPurpose::Placement)])
        }
        Event::RefreshLocation => Ok(vec![Action::RequestLocation(LocationPurpose::UserPosition)]),
        Event::SubmitListing(form) => {
            if state.pending_create {
                tracing::debug!("create already in flight");
                return Ok(vec![]);
            }

            let draft = ListingDraft {
                coordinate: state.selection.selected_coordinate(),
                ..form.clone()
            };
            validate_draft(&draft)?;

            state.pending_create = true;
            Ok(vec![Action::CreateListing(draft)])
        }
        Event::AbandonCreation => {
            state.selection = LocationSelection::Idle;
            state.tab = Tab::Map;
            Ok(vec![])
        }
        Event::SubmitFeedback { is_confirmation, text } => {
            let Some(listing_id) = state.selected_listing.clone() else {
                return Err(ValidationError::MissingListingId.into());
            };
            if state.pending_feedback {
                tracing::debug!("feedback already in flight");
                return Ok(vec![]);
            }

            state.pending_feedback = true;
            Ok(vec![Action::SubmitFeedback {
                listing_id,
                is_confirmation: *is_confirmation,
                text: text.clone(),
            }])
        }
        Event::ListingsLoaded(result) => {
            state.loading_listings = false;
            match result {
                Ok(listings) => state.set_listings(listings.clone()),
                Err(message) => state.push_notice(NoticeLevel::Error, format!("Could not load listings: {message}")),
            }
            Ok(vec![])
        }
        Event::FeedbackLoaded { listing_id, result } => {
            if state.selected_listing.as_ref() != Some(listing_id) {
                tracing::debug!(listing_id = %listing_id, "discarding feedback for closed detail");
                return Ok(vec![]);
            }
            match result {
                Ok(feedback) => state.feedback.clone_from(feedback),
                Err(message) => state.push_notice(NoticeLevel::Error, format!("Could not load feedback: {message}")),
            }
            Ok(vec![])
        }
        Event::LocationResolved { purpose, result } => {
            match result {
                Ok(coordinate) => {
                    state.set_user_position(*coordinate);
                    if *purpose == LocationPurpose::Placement && state.selection.is_awaiting() {
                        state.selection = LocationSelection::UsingDeviceLocation(*coordinate);
                    }
                }
                Err(e) => {
                    state.location_error = Some(e.clone());
                    if *purpose == LocationPurpose::Placement && state.selection.is_awaiting() {
                        state.selection = LocationSelection::Idle;
                        state.push_notice(NoticeLevel::Error, format!("Could not get your location: {e}"));
                    }
                }
            }
            Ok(vec![])
        }
        Event::ListingCreated(result) => {
            state.pending_create = false;
            match result {
                Ok(listing) => {
                    state.selection = LocationSelection::Idle;
                    state.tab = Tab::Map;
                    state.push_notice(NoticeLevel::Success, format!("Added {}", listing.name));
                    Ok(vec![Action::RefreshListings])
                }
                Err(message) => {
                    state.push_notice(NoticeLevel::Error, format!("Could not add listing: {message}"));
                    Ok(vec![])
                }
            }
        }
        Event::FeedbackSubmitted {
            listing_id,
            is_confirmation,
            result,
        } => {
            state.pending_feedback = false;
            match result {
                Ok(()) => {
                    let message = if *is_confirmation {
                        "Thanks for confirming"
                    } else {
                        "Thanks, we flagged this listing"
                    };
                    state.push_notice(NoticeLevel::Success, message);

                    let mut actions = vec![Action::RefreshListings];
                    if state.selected_listing.as_ref() == Some(listing_id) {
                        actions.push(Action::LoadFeedback(listing_id.clone()));
                    }
                    Ok(actions)
                }
                Err(message) => {
                    state.push_notice(NoticeLevel::Error, format!("Could not send feedback: {message}"));
                    Ok(vec![])
                }
            }
        }
    }
}
