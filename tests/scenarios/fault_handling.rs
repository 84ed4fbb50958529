//! Storage faults surface as system errors, never as failures

use crate::helpers::*;
use async_trait::async_trait;
use group_loader::core::{Group, NewGroup, NewPosting, Posting, RequestPayload};
use group_loader::execution::{load_group_pipeline, ExecutionEvent, ExecutionStatus, LoaderServices};
use group_loader::persistence::{GroupStore, InMemoryGroupStore, StoreError};
use std::sync::Arc;

/// In-memory store that can be told to fail writes
struct FaultyStore {
    inner: InMemoryGroupStore,
    fail_create: bool,
    fail_postings: bool,
}

impl FaultyStore {
    fn new(fail_create: bool, fail_postings: bool) -> Self {
        Self {
            inner: InMemoryGroupStore::new(),
            fail_create,
            fail_postings,
        }
    }
}

#[async_trait]
impl GroupStore for FaultyStore {
    async fn find_group_by_fb_id(&self, fb_id: &str) -> Result<Option<Group>, StoreError> {
        self.inner.find_group_by_fb_id(fb_id).await
    }

    async fn create_group(&self, group: &NewGroup) -> Result<Group, StoreError> {
        if self.fail_create {
            return Err(StoreError::Database("disk I/O error".to_string()));
        }
        self.inner.create_group(group).await
    }

    async fn add_posting(&self, group: &Group, posting: &NewPosting) -> Result<Posting, StoreError> {
        if self.fail_postings {
            return Err(StoreError::Database("database is locked".to_string()));
        }
        self.inner.add_posting(group, posting).await
    }

    async fn list_groups(&self) -> Result<Vec<Group>, StoreError> {
        self.inner.list_groups().await
    }

    async fn list_postings(&self, group_id: i64) -> Result<Vec<Posting>, StoreError> {
        self.inner.list_postings(group_id).await
    }
}

async fn run_with_store(store: Arc<FaultyStore>, recorder: &EventRecorder) -> anyhow::Result<()> {
    let services = LoaderServices {
        fetcher: Arc::new(MockFetcher::new().with_page(GROUP_URL, group_page("42"))),
        api: Arc::new(MockGroupApi::new().with_group(remote_group("42", "Rustaceans", 3))),
        store,
    };
    let pipeline = load_group_pipeline(services, "fb")?.with_event_handler(recorder.handler());

    match pipeline.run(RequestPayload::for_url(GROUP_URL)).await? {
        Ok(group) => panic!("Expected a fault, got group {:?}", group),
        Err(failure) => panic!("Expected a fault, got failure {:?}", failure),
    }
}

fn faulted_step(recorder: &EventRecorder) -> Option<String> {
    recorder.events().into_iter().find_map(|event| match event {
        ExecutionEvent::StepFaulted { step, .. } => Some(step),
        _ => None,
    })
}

#[tokio::test]
async fn test_posting_storage_error_is_fault() {
    let store = Arc::new(FaultyStore::new(false, true));
    let recorder = EventRecorder::default();

    let err = run_with_store(store.clone(), &recorder).await.unwrap_err();

    assert!(format!("{:#}", err).contains("database is locked"));
    assert_eq!(faulted_step(&recorder).as_deref(), Some("add_postings"));
    assert!(!recorder
        .events()
        .iter()
        .any(|event| matches!(event, ExecutionEvent::StepFailed { .. })));
    assert!(matches!(
        recorder.events().last(),
        Some(ExecutionEvent::PipelineCompleted {
            status: ExecutionStatus::Faulted,
            ..
        })
    ));

    // The group was committed before the fan-out started
    let groups = store.list_groups().await.unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].fb_id, "42");
    assert!(store.list_postings(groups[0].id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_group_insert_error_is_fault() {
    let store = Arc::new(FaultyStore::new(true, false));
    let recorder = EventRecorder::default();

    let err = run_with_store(store.clone(), &recorder).await.unwrap_err();

    assert!(format!("{:#}", err).contains("disk I/O error"));
    assert_eq!(
        faulted_step(&recorder).as_deref(),
        Some("save_group_and_fetch_remote_data")
    );
    assert_eq!(recorder.started_steps().len(), 6);
    assert!(store.list_groups().await.unwrap().is_empty());
}
