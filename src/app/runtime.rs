//! Session runtime: executes actions and feeds their results back.
//!
//! ```text
//! Event ─▶ handle_event ─▶ Vec<Action> ─▶ execute ─▶ response Event ─┐
//!   ▲                                                                │
//!   └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Actions run one at a time, each awaited before the next, until the queue is
//! empty. That gives read-after-write refresh: a successful create emits
//! `RefreshListings`, which reads through the freshly invalidated cache.

use super::handler::{handle_event, Event};
use super::modes::LocationPurpose;
use super::state::{AppState, NoticeLevel};
use super::Action;
use crate::domain::error::Result;
use crate::lifecycle::ListingCoordinator;
use crate::location::LocationService;
use std::collections::VecDeque;

/// One user session over a shared store.
#[derive(Debug)]
pub struct Session {
    state: AppState,
    coordinator: ListingCoordinator,
    location: LocationService,
}

impl Session {
    #[must_use]
    pub const fn new(state: AppState, coordinator: ListingCoordinator, location: LocationService) -> Self {
        Self {
            state,
            coordinator,
            location,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    #[must_use]
    pub const fn coordinator(&self) -> &ListingCoordinator {
        &self.coordinator
    }

    /// Handles `event` and every action and response it transitively causes.
    ///
    /// # Errors
    ///
    /// Returns the validation error of a locally rejected event. The rejection
    /// is also recorded as an error notice. Failures of store or location calls
    /// are not errors here; they arrive as response events and end up in
    /// [`AppState::notices`].
    pub async fn dispatch(&mut self, event: Event) -> Result<()> {
        let mut events = VecDeque::from([event]);

        while let Some(event) = events.pop_front() {
            let actions = match handle_event(&mut self.state, &event) {
                Ok(actions) => actions,
                Err(e) => {
                    tracing::debug!(event = event.kind(), error = %e, "event rejected");
                    self.state.push_notice(NoticeLevel::Error, e.to_string());
                    return Err(e);
                }
            };

            for action in actions {
                events.push_back(self.execute(action).await);
            }
        }

        Ok(())
    }

    async fn execute(&self, action: Action) -> Event {
        match action {
            Action::RefreshListings => {
                Event::ListingsLoaded(report("load listings", self.coordinator.listings().await))
            }
            Action::LoadFeedback(listing_id) => {
                let result = report("load feedback", self.coordinator.feedback(Some(&listing_id)).await);
                Event::FeedbackLoaded { listing_id, result }
            }
            Action::RequestLocation(purpose) => {
                let result = self.location.locate().await;
                if purpose == LocationPurpose::Placement {
                    tracing::debug!(ok = result.is_ok(), "placement reading finished");
                }
                Event::LocationResolved { purpose, result }
            }
            Action::CreateListing(draft) => {
                Event::ListingCreated(report("create listing", self.coordinator.create_listing(&draft).await))
            }
            Action::SubmitFeedback {
                listing_id,
                is_confirmation,
                text,
            } => {
                let result = report(
                    "submit feedback",
                    self.coordinator.add_feedback(&listing_id, is_confirmation, &text).await,
                );
                Event::FeedbackSubmitted {
                    listing_id,
                    is_confirmation,
                    result,
                }
            }
        }
    }
}

/// Logs the outcome of a coordinator call and flattens its error to a message.
fn report<T>(operation: &str, result: Result<T>) -> std::result::Result<T, String> {
    match result {
        Ok(value) => {
            tracing::debug!(operation, "operation successful");
            Ok(value)
        }
        Err(e) => {
            tracing::warn!(operation, error = %e, "operation failed");
            Err(e.to_string())
        }
    }
}
