//! Full successful runs of the load-group pipeline

use crate::helpers::*;
use group_loader::execution::{ExecutionEvent, ExecutionStatus};
use group_loader::persistence::GroupStore;

#[tokio::test]
async fn test_load_creates_group_with_remote_name() {
    let harness = Harness::with_group("42", 3);

    let group = harness.load_url(GROUP_URL).await.unwrap();

    assert_eq!(group.fb_id, "42");
    assert_eq!(group.name, "Rustaceans");
    assert_eq!(group.fb_url, GROUP_URL);

    let stored = harness.store.find_group_by_fb_id("42").await.unwrap();
    assert_eq!(stored, Some(group));
    assert_eq!(harness.fetch_count(), 1);
    assert_eq!(harness.api_count(), 1);
}

#[tokio::test]
async fn test_every_feed_entry_becomes_a_posting() {
    let harness = Harness::with_group("42", 7);
    let remote = remote_group("42", "Rustaceans", 7);

    let group = harness.load_url(GROUP_URL).await.unwrap();
    let postings = harness.store.list_postings(group.id).await.unwrap();

    assert_eq!(postings.len(), remote.feed.len());
    for (stored, source) in postings.iter().zip(&remote.feed) {
        assert_eq!(stored.group_id, group.id);
        assert_eq!(stored.fb_id, source.id);
        assert_eq!(stored.created_time, source.created_time);
        assert_eq!(stored.updated_time, source.updated_time);
        assert_eq!(stored.message, source.message);
        assert_eq!(stored.name, source.name);

        let attachment = source.attachment.clone().unwrap_or_default();
        assert_eq!(stored.attachment_title, attachment.title);
        assert_eq!(stored.attachment_description, attachment.description);
        assert_eq!(stored.attachment_url, attachment.url);
        assert_eq!(stored.attachment_media_url, attachment.media_url);
    }
}

#[tokio::test]
async fn test_partial_attachment_keeps_missing_fields_null() {
    let harness = Harness::with_group("42", 2);

    let group = harness.load_url(GROUP_URL).await.unwrap();
    let postings = harness.store.list_postings(group.id).await.unwrap();

    // Second entry carries only an attachment title
    let partial = &postings[1];
    assert_eq!(partial.attachment_title.as_deref(), Some("Title 1"));
    assert!(partial.attachment_description.is_none());
    assert!(partial.attachment_url.is_none());
    assert!(partial.attachment_media_url.is_none());
}

#[tokio::test]
async fn test_empty_feed_stores_group_only() {
    let harness = Harness::with_group("42", 0);

    let group = harness.load_url(GROUP_URL).await.unwrap();

    assert_eq!(harness.group_count().await, 1);
    assert!(harness.store.list_postings(group.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_url_is_trimmed_before_fetch() {
    let harness = Harness::with_group("42", 1);

    let group = harness
        .load_url(&format!("  {}\n", GROUP_URL))
        .await
        .unwrap();

    assert_eq!(group.fb_url, GROUP_URL);
}

#[tokio::test]
async fn test_extra_payload_fields_are_ignored() {
    let harness = Harness::with_group("42", 1);
    let body = format!(r#"{{"url": "{}", "source": "bookmarklet"}}"#, GROUP_URL);

    let outcome = harness.run(body.into()).await;

    assert!(outcome.is_ok());
}

#[tokio::test]
async fn test_success_runs_every_step_in_order() {
    let harness = Harness::with_group("42", 1);

    harness.load_url(GROUP_URL).await.unwrap();

    assert_step_prefix(&harness.recorder, ALL_STEPS.len());
    let events = harness.recorder.events();
    assert!(matches!(
        events.first(),
        Some(ExecutionEvent::PipelineStarted { pipeline_name, .. }) if pipeline_name == "load_group"
    ));
    assert!(matches!(
        events.last(),
        Some(ExecutionEvent::PipelineCompleted {
            status: ExecutionStatus::Completed,
            ..
        })
    ));
}

#[tokio::test]
async fn test_independent_groups_load_concurrently() {
    let harness = Harness::new(
        MockFetcher::new()
            .with_page("https://example.com/a", group_page("1"))
            .with_page("https://example.com/b", group_page("2")),
        MockGroupApi::new()
            .with_group(remote_group("1", "First", 2))
            .with_group(remote_group("2", "Second", 3)),
    );

    let (a, b) = tokio::join!(
        harness.load_url("https://example.com/a"),
        harness.load_url("https://example.com/b")
    );

    assert_eq!(a.unwrap().name, "First");
    assert_eq!(b.unwrap().name, "Second");
    assert_eq!(harness.group_count().await, 2);
    assert_eq!(harness.posting_count().await, 5);
}
