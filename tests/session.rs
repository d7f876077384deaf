mod common;

use async_trait::async_trait;
use common::{draft, memory_store, CountingStore};
use iftaar_finder::app::{LocationSelection, NoticeLevel, Tab};
use iftaar_finder::domain::{Coordinate, LocationError};
use iftaar_finder::location::{LocationOptions, LocationProvider, LocationService, StaticLocation};
use iftaar_finder::ui::MarkerStyle;
use iftaar_finder::{open_session, AppState, Category, Config, CounterUpdate, Event, ListingCoordinator, Session};
use std::sync::Arc;
use std::time::Duration;

fn here() -> Coordinate {
    Coordinate::new(22.36, 91.78)
}

fn session_over(store: Arc<CountingStore>, provider: impl LocationProvider + 'static) -> Session {
    Session::new(
        AppState::new(Category::All),
        ListingCoordinator::new(store, CounterUpdate::ReadModifyWrite),
        LocationService::new(Arc::new(provider), LocationOptions::default()),
    )
}

struct NeverAnswers;

#[async_trait]
impl LocationProvider for NeverAnswers {
    async fn current_coordinate(&self, _options: &LocationOptions) -> Result<Coordinate, LocationError> {
        std::future::pending().await
    }
}

#[tokio::test]
async fn add_then_confirm_round_trip() {
    let store = Arc::new(CountingStore::new(memory_store()));
    let mut session = session_over(store.clone(), StaticLocation::at(here()));

    session.dispatch(Event::Start).await.unwrap();
    assert_eq!(session.state().user_position, Some(here()));
    assert!(session.state().empty_state().is_some());

    let pin = Coordinate::new(22.37, 91.79);
    session.dispatch(Event::RequestPinDrop).await.unwrap();
    assert!(session.state().map_view().placement_mode);
    session.dispatch(Event::SurfaceTapped(pin)).await.unwrap();
    assert_eq!(session.state().tab, Tab::Add);
    assert!(session.state().can_submit());

    let form = draft("Baitul Aman", "Agrabad", 0.0, 0.0);
    session.dispatch(Event::SubmitListing(form)).await.unwrap();

    let state = session.state();
    assert_eq!(state.selection, LocationSelection::Idle);
    assert_eq!(state.tab, Tab::Map);
    assert_eq!(state.visible.len(), 1);
    assert_eq!(state.visible[0].coordinate, pin);
    let card = &state.list_cards()[0];
    assert_eq!(card.distance.as_deref(), Some("1.5km"));
    assert_eq!(state.notices.last().map(|n| n.level), Some(NoticeLevel::Success));

    let id = state.visible[0].id.clone();
    session.dispatch(Event::MarkerTapped(id.clone())).await.unwrap();
    for text in ["great place", "", "plenty left"] {
        session
            .dispatch(Event::SubmitFeedback {
                is_confirmation: true,
                text: text.to_string(),
            })
            .await
            .unwrap();
    }

    let detail = session.state().listing_detail().unwrap();
    assert_eq!(detail.card.confirmed_count, 3);
    assert!(detail.card.status.verified);
    assert_eq!(detail.feedback.len(), 3);
    assert_eq!(detail.feedback[0].text.as_deref(), Some("plenty left"));
    assert_eq!(detail.feedback[1].text, None);
    assert!(detail.feedback_enabled);
    assert_eq!(session.state().map_view().markers[0].style, MarkerStyle::Verified);
}

#[tokio::test]
async fn submit_without_coordinate_is_local() {
    let store = Arc::new(CountingStore::new(memory_store()));
    let mut session = session_over(store.clone(), StaticLocation::at(here()));

    let err = session
        .dispatch(Event::SubmitListing(draft("Baitul Aman", "Agrabad", 22.3, 91.8)))
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(store.calls.total(), 0);
    assert_eq!(session.state().notices[0].level, NoticeLevel::Error);
}

#[tokio::test(start_paused = true)]
async fn silent_provider_times_out_and_ranking_falls_back() {
    let store = Arc::new(CountingStore::new(memory_store()));
    let mut session = session_over(store, NeverAnswers);

    session.dispatch(Event::Start).await.unwrap();

    let state = session.state();
    assert_eq!(state.user_position, None);
    assert_eq!(state.location_error, Some(LocationError::Timeout(Duration::from_secs(10))));
    assert!(state.distances.is_empty());
}

#[tokio::test]
async fn denied_device_location_resets_selection() {
    let store = Arc::new(CountingStore::new(memory_store()));
    let mut session = session_over(store, StaticLocation::failing(LocationError::PermissionDenied));

    session.dispatch(Event::UseDeviceLocation).await.unwrap();

    assert_eq!(session.state().selection, LocationSelection::Idle);
    assert!(!session.state().can_submit());
}

#[tokio::test]
async fn device_location_becomes_listing_coordinate() {
    let store = Arc::new(CountingStore::new(memory_store()));
    let mut session = session_over(store, StaticLocation::at(here()));

    session.dispatch(Event::UseDeviceLocation).await.unwrap();
    assert_eq!(session.state().selection, LocationSelection::UsingDeviceLocation(here()));

    session
        .dispatch(Event::SubmitListing(draft("Noor Jame", "Agrabad", 0.0, 0.0)))
        .await
        .unwrap();
    assert_eq!(session.state().listings[0].coordinate, here());
}

#[tokio::test]
async fn json_store_survives_new_session() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        store_path: Some(dir.path().join("listings.json").display().to_string()),
        default_category: Category::Nearby,
        ..Config::default()
    };

    let mut first = open_session(&config, Arc::new(StaticLocation::at(here()))).unwrap();
    first.dispatch(Event::UseDeviceLocation).await.unwrap();
    first
        .dispatch(Event::SubmitListing(draft("Baitul Aman", "Agrabad", 0.0, 0.0)))
        .await
        .unwrap();
    drop(first);

    let mut second = open_session(&config, Arc::new(StaticLocation::at(here()))).unwrap();
    assert_eq!(second.state().category, Category::Nearby);
    second.dispatch(Event::Start).await.unwrap();

    let names: Vec<_> = second.state().visible.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, ["Baitul Aman"]);
}
