use std::sync::Arc;
use std::time::Duration;

use empower_client::{CatalogSyncService, Session, SkipReason, SyncOutcome};
use empower_events::ChangeReason;
use empower_infra::{InMemoryProductStore, ProductStore, SourceError, StaticCatalogSource};
use empower_products::{Product, ProductRecord};

const FEED: &str = r#"[
  {"id": 1, "title": "Plant Nodes", "description": "d", "descriptionfull": "f",
   "img": "nodes.jpg", "imgcropped": "nodes-c.jpg", "price": 50, "reviews": []},
  {"id": 2, "title": "Plant Mood", "description": "d", "descriptionfull": "f",
   "img": "mood.jpg", "imgcropped": "mood-c.jpg", "price": 155, "reviews": []}
]"#;

type TestSession = Session<Arc<InMemoryProductStore>, StaticCatalogSource>;

fn session_with(store: InMemoryProductStore, source: StaticCatalogSource) -> (TestSession, Arc<InMemoryProductStore>) {
    let store = Arc::new(store);
    let service = CatalogSyncService::new(store.clone(), source).with_bulk_pause(Duration::ZERO);
    (Session::new(Arc::new(service)), store)
}

#[tokio::test]
async fn start_populates_an_empty_store() {
    let (mut session, store) = session_with(InMemoryProductStore::new(), StaticCatalogSource::payload(FEED));

    let outcome = session.start().await;

    assert_eq!(outcome, Some(SyncOutcome::Populated { inserted: 2 }));
    assert_eq!(session.header_title().await, "2 items");
    assert_eq!(session.titles().await, vec!["Plant Nodes", "Plant Mood"]);
    assert_eq!(store.count().await.unwrap(), 2);

    let reasons: Vec<ChangeReason> = session.take_changes().iter().map(|c| c.reason).collect();
    assert_eq!(reasons, vec![ChangeReason::Reloaded, ChangeReason::Synced]);
}

#[tokio::test]
async fn start_loads_before_syncing() {
    let existing = vec![Product::create(ProductRecord::quick("Fern").unwrap())];
    let (mut session, store) = session_with(
        InMemoryProductStore::with_products(existing),
        StaticCatalogSource::payload(FEED),
    );

    let outcome = session.start().await;

    assert_eq!(outcome, Some(SyncOutcome::Skipped(SkipReason::CatalogLoaded)));
    assert_eq!(session.titles().await, vec!["Fern"]);
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn offline_start_still_shows_stored_rows() {
    let existing = vec![Product::create(ProductRecord::quick("Fern").unwrap())];
    let (mut session, _) = session_with(
        InMemoryProductStore::with_products(existing),
        StaticCatalogSource::failing(SourceError::Network("offline".to_string())),
    );

    assert_eq!(session.start().await, None);
    assert_eq!(session.header_title().await, "1 items");
}

#[tokio::test]
async fn quick_add_fills_placeholders() {
    let (mut session, _) = session_with(InMemoryProductStore::new(), StaticCatalogSource::payload("[]"));

    let added = session.add_titled("Snake Plant").await.unwrap();

    assert_eq!(added.title(), "Snake Plant");
    assert_eq!(added.product_id(), "123");
    assert_eq!(added.description(), "product.description");
    assert_eq!(added.description_full(), "product.description.full");
    assert_eq!(added.image(), "img");
    assert_eq!(added.image_cropped(), "img.cropped");
    assert_eq!(added.price(), "1");
    assert_eq!(session.titles().await, vec!["Snake Plant"]);
}

#[tokio::test]
async fn blank_title_is_rejected_without_writing() {
    let (mut session, store) = session_with(InMemoryProductStore::new(), StaticCatalogSource::payload("[]"));

    assert!(session.add_titled("   ").await.is_none());
    assert_eq!(store.count().await.unwrap(), 0);
    assert!(session.take_changes().is_empty());
}

#[tokio::test]
async fn rename_updates_the_listed_title() {
    let (mut session, _) = session_with(InMemoryProductStore::new(), StaticCatalogSource::payload("[]"));
    session.add_titled("Fern").await.unwrap();

    assert_eq!(session.rename(0, "Boston Fern").await, Some(()));
    assert_eq!(session.titles().await, vec!["Boston Fern"]);
    assert_eq!(session.rename(5, "Nope").await, None);
}

#[tokio::test]
async fn clear_and_wipe_empty_the_list() {
    let (mut session, store) = session_with(InMemoryProductStore::new(), StaticCatalogSource::payload(FEED));
    session.start().await;

    assert_eq!(session.clear().await, Some(2));
    assert_eq!(session.header_title().await, "0 items");

    session.generate(5, 2).await;
    assert_eq!(store.count().await.unwrap(), 5);
    assert_eq!(session.wipe().await, Some(5));
    assert!(session.titles().await.is_empty());
}

#[tokio::test]
async fn selecting_rows_fills_the_cart() {
    let (mut session, _) = session_with(InMemoryProductStore::new(), StaticCatalogSource::payload(FEED));
    session.start().await;

    assert_eq!(session.select(0).await, Some(1));
    assert_eq!(session.select(1).await, Some(1));
    assert_eq!(session.select(0).await, Some(2));
    assert_eq!(session.select(9).await, None);

    let cart = session.cart();
    assert_eq!(cart.session_id(), session.id());
    assert_eq!(cart.lines().len(), 2);
    assert_eq!(cart.item_count(), 3);
    assert_eq!(cart.subtotal().amount, 50 * 2 + 155);
}

#[tokio::test]
async fn each_session_has_its_own_cart() {
    let store = Arc::new(InMemoryProductStore::new());
    let service = Arc::new(CatalogSyncService::new(store, StaticCatalogSource::payload(FEED)));
    let mut alice = Session::new(service.clone());
    let mut bob = Session::new(service);

    alice.start().await;
    bob.refresh().await;
    alice.select(0).await;

    assert_eq!(alice.cart().item_count(), 1);
    assert!(bob.cart().is_empty());
    assert_ne!(alice.id(), bob.id());
}
