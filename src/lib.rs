//! group-loader - loads social-network groups and their postings from a group page URL

pub mod cli;
pub mod core;
pub mod execution;
pub mod persistence;
pub mod remote;

// Re-export commonly used types
pub use crate::core::{Classification, FailureDescriptor, Group, GroupContext, Outcome, Posting, RequestPayload};
pub use execution::{load_group_pipeline, ExecutionEvent, LoaderServices, PipelineExecutor};
pub use persistence::{GroupStore, InMemoryGroupStore, StoreError};
pub use remote::{GroupApi, PageFetcher, RemoteError, RemoteGroup};
