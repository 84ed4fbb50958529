//! Uniqueness of the external group identifier

use crate::helpers::*;
use group_loader::core::{Classification, NewGroup};
use group_loader::persistence::GroupStore;

#[tokio::test]
async fn test_second_load_of_same_group_conflicts() {
    let harness = Harness::with_group("42", 4);

    harness.load_url(GROUP_URL).await.unwrap();
    let outcome = harness.load_url(GROUP_URL).await;

    assert_failure(&outcome, Classification::Unprocessable, "Group already exists");
    assert_eq!(harness.group_count().await, 1);
    assert_eq!(harness.posting_count().await, 4);
}

#[tokio::test]
async fn test_existing_group_blocks_any_url_resolving_to_it() {
    let harness = Harness::new(
        MockFetcher::new().with_page("https://m.example.com/g", group_page("42")),
        MockGroupApi::new().with_group(remote_group("42", "Rustaceans", 3)),
    );
    harness
        .store
        .create_group(&NewGroup {
            fb_id: "42".to_string(),
            name: "Seeded".to_string(),
            fb_url: GROUP_URL.to_string(),
        })
        .await
        .unwrap();

    let outcome = harness.load_url("https://m.example.com/g").await;

    assert_failure(&outcome, Classification::Unprocessable, "Group already exists");
    assert_eq!(harness.api_count(), 0);
    assert_eq!(harness.group_count().await, 1);
    assert_eq!(harness.posting_count().await, 0);
    assert_step_prefix(&harness.recorder, 5);

    let seeded = harness.store.find_group_by_fb_id("42").await.unwrap().unwrap();
    assert_eq!(seeded.name, "Seeded");
}

#[tokio::test]
async fn test_conflict_does_not_block_other_groups() {
    let harness = Harness::new(
        MockFetcher::new()
            .with_page("https://example.com/a", group_page("1"))
            .with_page("https://example.com/b", group_page("2")),
        MockGroupApi::new()
            .with_group(remote_group("1", "First", 1))
            .with_group(remote_group("2", "Second", 1)),
    );

    harness.load_url("https://example.com/a").await.unwrap();
    assert!(harness.load_url("https://example.com/a").await.is_err());
    let second = harness.load_url("https://example.com/b").await.unwrap();

    assert_eq!(second.fb_id, "2");
    assert_eq!(harness.group_count().await, 2);
}

#[tokio::test]
async fn test_concurrent_loads_of_same_group_create_one_row() {
    let harness = Harness::with_group("42", 2);

    let (a, b) = tokio::join!(harness.load_url(GROUP_URL), harness.load_url(GROUP_URL));

    let outcomes = [a, b];
    let successes = outcomes.iter().filter(|o| o.is_ok()).count();
    assert_eq!(successes, 1);
    for outcome in outcomes.iter().filter(|o| o.is_err()) {
        assert_failure(outcome, Classification::Unprocessable, "Group already exists");
    }
    assert_eq!(harness.group_count().await, 1);
    assert_eq!(harness.posting_count().await, 2);
}
