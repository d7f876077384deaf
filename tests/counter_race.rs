mod common;

use common::{seed_listing, slow_store};
use iftaar_finder::domain::NewFeedback;
use iftaar_finder::storage::ListingStore;
use iftaar_finder::trust::{apply_feedback, CounterUpdate};
use std::time::Duration;

const LATENCY: Duration = Duration::from_millis(25);

async fn race(strategy: CounterUpdate) -> (u32, usize) {
    let store = slow_store(LATENCY);
    let listing = seed_listing(store.as_ref(), "Baitul Aman", 5).await;

    let a = NewFeedback::new(listing.id.clone(), true, "food was hot");
    let b = NewFeedback::new(listing.id.clone(), true, "");
    let (ra, rb) = tokio::join!(
        apply_feedback(store.as_ref(), &a, strategy),
        apply_feedback(store.as_ref(), &b, strategy),
    );
    ra.unwrap();
    rb.unwrap();

    let listings = store.list_listings().await.unwrap();
    let rows = store.list_feedback(&listing.id).await.unwrap().len();
    (listings[0].confirmed_count, rows)
}

#[tokio::test(start_paused = true)]
async fn read_modify_write_may_lose_an_increment() {
    let (count, rows) = race(CounterUpdate::ReadModifyWrite).await;
    assert!(matches!(count, 6 | 7), "count was {count}");
    assert_eq!(rows, 2);
}

#[tokio::test(start_paused = true)]
async fn atomic_increment_keeps_both() {
    let (count, rows) = race(CounterUpdate::Atomic).await;
    assert_eq!(count, 7);
    assert_eq!(rows, 2);
}

#[tokio::test(start_paused = true)]
async fn sequential_confirmations_reach_verified() {
    let store = slow_store(LATENCY);
    let listing = seed_listing(store.as_ref(), "Noor Jame", 0).await;

    for _ in 0..3 {
        let feedback = NewFeedback::new(listing.id.clone(), true, "");
        apply_feedback(store.as_ref(), &feedback, CounterUpdate::ReadModifyWrite)
            .await
            .unwrap();
    }

    let listings = store.list_listings().await.unwrap();
    assert_eq!(listings[0].confirmed_count, 3);
    assert!(listings[0].is_verified());
    assert!(!listings[0].needs_reverification());
}
