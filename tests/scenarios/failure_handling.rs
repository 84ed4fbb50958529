//! Modeled failures and where they stop the pipeline

use crate::helpers::*;
use group_loader::core::{Classification, RequestPayload};
use group_loader::execution::{ExecutionEvent, ExecutionStatus};

const URL_NOT_RESOLVED: &str = "URL could not be resolved";
const URL_NOT_SUPPLIED: &str = "URL not supplied";

#[tokio::test]
async fn test_malformed_payloads_touch_nothing() {
    let cases: Vec<(&str, Classification, &str)> = vec![
        ("", Classification::BadRequest, URL_NOT_RESOLVED),
        ("not json", Classification::BadRequest, URL_NOT_RESOLVED),
        (r#"{"url": "#, Classification::BadRequest, URL_NOT_RESOLVED),
        (r#"{"url": 5}"#, Classification::BadRequest, URL_NOT_RESOLVED),
        (r#"{"url": ["a"]}"#, Classification::BadRequest, URL_NOT_RESOLVED),
        ("42", Classification::BadRequest, URL_NOT_RESOLVED),
        ("[]", Classification::BadRequest, URL_NOT_RESOLVED),
        (
            r#"["https://www.facebook.com/groups/rustaceans/"]"#,
            Classification::BadRequest,
            URL_NOT_RESOLVED,
        ),
        ("{}", Classification::Unprocessable, URL_NOT_SUPPLIED),
        (r#"{"url": null}"#, Classification::Unprocessable, URL_NOT_SUPPLIED),
        (r#"{"url": ""}"#, Classification::Unprocessable, URL_NOT_SUPPLIED),
        (r#"{"url": "   "}"#, Classification::Unprocessable, URL_NOT_SUPPLIED),
    ];

    for (body, classification, message) in cases {
        let harness = Harness::with_group("42", 2);

        let outcome = harness.run(RequestPayload::from(body)).await;

        assert_failure(&outcome, classification, message);
        assert_eq!(harness.fetch_count(), 0, "fetched for payload {:?}", body);
        assert_eq!(harness.api_count(), 0, "called API for payload {:?}", body);
        assert_eq!(harness.group_count().await, 0);
        assert_eq!(harness.posting_count().await, 0);
    }
}

#[tokio::test]
async fn test_json_failure_stops_after_first_step() {
    let harness = Harness::with_group("42", 1);

    harness.run(RequestPayload::from("{")).await.unwrap_err();

    assert_step_prefix(&harness.recorder, 1);
}

#[tokio::test]
async fn test_missing_url_stops_after_second_step() {
    let harness = Harness::with_group("42", 1);

    harness.run(RequestPayload::from("{}")).await.unwrap_err();

    assert_step_prefix(&harness.recorder, 2);
}

#[tokio::test]
async fn test_unreachable_url_is_bad_request() {
    let harness = Harness::with_group("42", 1);

    let outcome = harness.load_url("https://unreachable.example.com/").await;

    assert_failure(&outcome, Classification::BadRequest, URL_NOT_RESOLVED);
    assert_eq!(harness.fetch_count(), 1);
    assert_eq!(harness.api_count(), 0);
    assert_step_prefix(&harness.recorder, 3);
}

#[tokio::test]
async fn test_page_without_deep_link_is_not_a_group() {
    let pages = [
        "<html><body>Just a page</body></html>",
        r#"<meta content="fb://page/42" />"#,
        r#"<meta content="fb://group/" />"#,
        r#"<meta content="twitter://group/42" />"#,
        "fb://group/42",
    ];

    for page in pages {
        let harness = Harness::new(
            MockFetcher::new().with_page(GROUP_URL, page),
            MockGroupApi::new().with_group(remote_group("42", "Rustaceans", 1)),
        );

        let outcome = harness.load_url(GROUP_URL).await;

        assert_failure(
            &outcome,
            Classification::Unprocessable,
            "URL not recognized as a group page",
        );
        assert_eq!(harness.api_count(), 0, "called API for page {:?}", page);
        assert_eq!(harness.group_count().await, 0);
        assert_step_prefix(&harness.recorder, 4);
    }
}

#[tokio::test]
async fn test_first_deep_link_wins() {
    let page = r#"<a href=fb://group/7>x</a> "fb://group/42" "fb://group/43""#;
    let harness = Harness::new(
        MockFetcher::new().with_page(GROUP_URL, page),
        MockGroupApi::new()
            .with_group(remote_group("42", "Forty-two", 0))
            .with_group(remote_group("43", "Forty-three", 0)),
    );

    let group = harness.load_url(GROUP_URL).await.unwrap();

    assert_eq!(group.fb_id, "42");
    assert_eq!(group.name, "Forty-two");
}

#[tokio::test]
async fn test_remote_lookup_failure_writes_nothing() {
    let harness = Harness::new(
        MockFetcher::new().with_page(GROUP_URL, group_page("42")),
        MockGroupApi::new(),
    );

    let outcome = harness.load_url(GROUP_URL).await;

    assert_failure(
        &outcome,
        Classification::Unprocessable,
        "Facebook details could not be found",
    );
    assert_eq!(harness.api_count(), 1);
    assert_eq!(harness.group_count().await, 0);
    assert_eq!(harness.posting_count().await, 0);
    assert_step_prefix(&harness.recorder, 6);
}

#[tokio::test]
async fn test_failure_event_carries_descriptor() {
    let harness = Harness::with_group("42", 1);

    harness.run(RequestPayload::from("{}")).await.unwrap_err();

    let events = harness.recorder.events();
    let failed: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            ExecutionEvent::StepFailed { step, failure } => Some((step.clone(), failure.clone())),
            _ => None,
        })
        .collect();

    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].0, "validate_request_url");
    assert_eq!(failed[0].1.status_code(), 422);
    assert!(matches!(
        events.last(),
        Some(ExecutionEvent::PipelineCompleted {
            status: ExecutionStatus::Failed,
            ..
        })
    ));
}
