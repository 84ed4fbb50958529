//! The assembled load-group pipeline

use crate::core::{Group, LoaderConfig, RequestPayload};
use crate::execution::engine::PipelineExecutor;
use crate::execution::step::{First, StepSequence};
use crate::execution::steps::{
    AddPostings, CheckConflictingGroup, ParseGroupId, RetrieveGroupHtml,
    SaveGroupAndFetchRemoteData, ValidateRequestJson, ValidateRequestUrl,
};
use crate::persistence::GroupStore;
use crate::remote::{GraphApiClient, GroupApi, HttpPageFetcher, PageFetcher};
use anyhow::{Context, Result};
use std::sync::Arc;

pub const PIPELINE_NAME: &str = "load_group";

/// Collaborators the pipeline steps talk to
#[derive(Clone)]
pub struct LoaderServices {
    pub fetcher: Arc<dyn PageFetcher>,
    pub api: Arc<dyn GroupApi>,
    pub store: Arc<dyn GroupStore>,
}

impl LoaderServices {
    /// HTTP-backed fetcher and API client from configuration
    pub fn from_config(config: &LoaderConfig, store: Arc<dyn GroupStore>) -> Result<Self> {
        let fetcher =
            HttpPageFetcher::new(&config.fetch).context("Failed to build page fetcher")?;
        let api = GraphApiClient::new(config.graph_api.clone())
            .context("Failed to build group API client")?;

        Ok(Self {
            fetcher: Arc::new(fetcher),
            api: Arc::new(api),
            store,
        })
    }
}

/// Build the load-group pipeline
///
/// Steps: validate_request_json, validate_request_url,
/// retrieve_group_html, parse_group_id, check_conflicting_group,
/// save_group_and_fetch_remote_data, add_postings.
pub fn load_group_pipeline(
    services: LoaderServices,
    deep_link_scheme: &str,
) -> Result<PipelineExecutor<impl StepSequence<Input = RequestPayload, Output = Group>>> {
    let parser = ParseGroupId::new(deep_link_scheme)
        .with_context(|| format!("Invalid deep link scheme '{}'", deep_link_scheme))?;

    let steps = First::new(ValidateRequestJson)
        .then(ValidateRequestUrl)
        .then(RetrieveGroupHtml::new(services.fetcher))
        .then(parser)
        .then(CheckConflictingGroup::new(services.store.clone()))
        .then(SaveGroupAndFetchRemoteData::new(
            services.api,
            services.store.clone(),
        ))
        .then(AddPostings::new(services.store));

    Ok(PipelineExecutor::new(PIPELINE_NAME, steps))
}
