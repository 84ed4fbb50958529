//! The steps of the load-group pipeline

use crate::core::{
    FailureDescriptor, Group, GroupContext, NewGroup, NewPosting, RequestPayload, StepResult,
    UrlRequest,
};
use crate::execution::step::Step;
use crate::persistence::{GroupStore, StoreError};
use crate::remote::{GroupApi, PageFetcher};
use anyhow::Context;
use async_trait::async_trait;
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const URL_NOT_RESOLVED: &str = "URL could not be resolved";
pub const URL_NOT_SUPPLIED: &str = "URL not supplied";
pub const NOT_A_GROUP_PAGE: &str = "URL not recognized as a group page";
pub const GROUP_ALREADY_EXISTS: &str = "Group already exists";
pub const REMOTE_DETAILS_NOT_FOUND: &str = "Facebook details could not be found";

/// Parse the request body into a [`UrlRequest`]
pub struct ValidateRequestJson;

#[async_trait]
impl Step for ValidateRequestJson {
    type Input = RequestPayload;
    type Output = UrlRequest;

    fn name(&self) -> &'static str {
        "validate_request_json"
    }

    async fn run(&self, payload: RequestPayload) -> StepResult<UrlRequest> {
        UrlRequest::from_json(payload.as_bytes()).map_err(|err| {
            debug!("Rejected request body: {}", err);
            FailureDescriptor::bad_request(URL_NOT_RESOLVED).into()
        })
    }
}

/// Require a non-blank `url` field
pub struct ValidateRequestUrl;

#[async_trait]
impl Step for ValidateRequestUrl {
    type Input = UrlRequest;
    type Output = String;

    fn name(&self) -> &'static str {
        "validate_request_url"
    }

    async fn run(&self, request: UrlRequest) -> StepResult<String> {
        match request.supplied_url() {
            Some(url) => Ok(url.to_string()),
            None => Err(FailureDescriptor::unprocessable(URL_NOT_SUPPLIED).into()),
        }
    }
}

/// GET the group page
pub struct RetrieveGroupHtml {
    fetcher: Arc<dyn PageFetcher>,
}

impl RetrieveGroupHtml {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl Step for RetrieveGroupHtml {
    type Input = String;
    type Output = GroupContext;

    fn name(&self) -> &'static str {
        "retrieve_group_html"
    }

    async fn run(&self, url: String) -> StepResult<GroupContext> {
        match self.fetcher.fetch(&url).await {
            Ok(html) => {
                debug!("Fetched {} bytes from {}", html.len(), url);
                Ok(GroupContext::new(url, html))
            }
            Err(err) => {
                warn!("Could not fetch {}: {}", url, err);
                Err(FailureDescriptor::bad_request(URL_NOT_RESOLVED).into())
            }
        }
    }
}

/// Find the `"<scheme>://group/<digits>"` deep link in the page
pub struct ParseGroupId {
    pattern: Regex,
}

impl ParseGroupId {
    pub fn new(scheme: &str) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!(r#""{}://group/(\d+)""#, regex::escape(scheme)))?;
        Ok(Self { pattern })
    }

    /// The first group identifier embedded in `html`
    pub fn extract<'h>(&self, html: &'h str) -> Option<&'h str> {
        self.pattern
            .captures(html)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

#[async_trait]
impl Step for ParseGroupId {
    type Input = GroupContext;
    type Output = GroupContext;

    fn name(&self) -> &'static str {
        "parse_group_id"
    }

    async fn run(&self, mut ctx: GroupContext) -> StepResult<GroupContext> {
        let fb_id = match self.extract(&ctx.html) {
            Some(id) => id.to_string(),
            None => return Err(FailureDescriptor::unprocessable(NOT_A_GROUP_PAGE).into()),
        };

        info!("Found group {} on {}", fb_id, ctx.url);
        ctx.fb_id = Some(fb_id);
        Ok(ctx)
    }
}

/// Reject identifiers that are already stored
pub struct CheckConflictingGroup {
    store: Arc<dyn GroupStore>,
}

impl CheckConflictingGroup {
    pub fn new(store: Arc<dyn GroupStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Step for CheckConflictingGroup {
    type Input = GroupContext;
    type Output = GroupContext;

    fn name(&self) -> &'static str {
        "check_conflicting_group"
    }

    async fn run(&self, ctx: GroupContext) -> StepResult<GroupContext> {
        let fb_id = ctx.require_fb_id()?;
        let existing = self
            .store
            .find_group_by_fb_id(fb_id)
            .await
            .with_context(|| format!("Failed to look up group {}", fb_id))?;

        if existing.is_some() {
            return Err(FailureDescriptor::unprocessable(GROUP_ALREADY_EXISTS).into());
        }
        Ok(ctx)
    }
}

/// Fetch the remote group record and store the group
///
/// Nothing is written unless the remote lookup succeeds. A uniqueness
/// violation on insert means another load won the race and is reported
/// the same way as the upfront conflict check.
pub struct SaveGroupAndFetchRemoteData {
    api: Arc<dyn GroupApi>,
    store: Arc<dyn GroupStore>,
}

impl SaveGroupAndFetchRemoteData {
    pub fn new(api: Arc<dyn GroupApi>, store: Arc<dyn GroupStore>) -> Self {
        Self { api, store }
    }
}

#[async_trait]
impl Step for SaveGroupAndFetchRemoteData {
    type Input = GroupContext;
    type Output = GroupContext;

    fn name(&self) -> &'static str {
        "save_group_and_fetch_remote_data"
    }

    async fn run(&self, mut ctx: GroupContext) -> StepResult<GroupContext> {
        let fb_id = ctx.require_fb_id()?.to_string();

        let remote = match self.api.find_group(&fb_id).await {
            Ok(remote) => remote,
            Err(err) => {
                warn!("Remote lookup for group {} failed: {}", fb_id, err);
                return Err(FailureDescriptor::unprocessable(REMOTE_DETAILS_NOT_FOUND).into());
            }
        };

        let new_group = NewGroup {
            fb_id: fb_id.clone(),
            name: remote.name.clone(),
            fb_url: ctx.url.clone(),
        };
        let group = match self.store.create_group(&new_group).await {
            Ok(group) => group,
            Err(StoreError::Conflict(_)) => {
                info!("Group {} was created concurrently", fb_id);
                return Err(FailureDescriptor::unprocessable(GROUP_ALREADY_EXISTS).into());
            }
            Err(err) => {
                return Err(anyhow::Error::new(err)
                    .context(format!("Failed to create group {}", fb_id))
                    .into())
            }
        };

        info!("Created group {} ({}) as #{}", group.fb_id, group.name, group.id);
        ctx.remote = Some(remote);
        ctx.group = Some(group);
        Ok(ctx)
    }
}

/// Store every posting of the remote feed under the new group
///
/// Storage errors here are faults: the group already exists, so a
/// partial feed is an operational problem rather than a rejected request.
pub struct AddPostings {
    store: Arc<dyn GroupStore>,
}

impl AddPostings {
    pub fn new(store: Arc<dyn GroupStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Step for AddPostings {
    type Input = GroupContext;
    type Output = Group;

    fn name(&self) -> &'static str {
        "add_postings"
    }

    async fn run(&self, ctx: GroupContext) -> StepResult<Group> {
        let group = ctx.require_group()?;
        let remote = ctx.require_remote()?;

        for posting in &remote.feed {
            self.store
                .add_posting(group, &NewPosting::from(posting))
                .await
                .with_context(|| {
                    format!("Failed to store posting {} for group {}", posting.id, group.fb_id)
                })?;
        }

        info!("Stored {} postings for group {}", remote.feed.len(), group.fb_id);
        Ok(group.clone())
    }
}
