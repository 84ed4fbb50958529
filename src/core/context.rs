//! Group context - the accumulator threaded through the steps

use crate::core::{Group, StepError};
use crate::remote::RemoteGroup;

/// State built up over one pipeline run
///
/// Fields are filled in step order; each `require_*` accessor turns a
/// missing field into a fault, since a later step reading it means the
/// step ordering was broken.
#[derive(Debug, Clone)]
pub struct GroupContext {
    /// Page URL supplied by the caller
    pub url: String,

    /// Body of the fetched page
    pub html: String,

    /// External group identifier, set by extraction
    pub fb_id: Option<String>,

    /// Remote group record, set by the save step
    pub remote: Option<RemoteGroup>,

    /// Locally persisted group, set by the save step
    pub group: Option<Group>,
}

impl GroupContext {
    /// Create a context for a fetched page
    pub fn new(url: String, html: String) -> Self {
        Self {
            url,
            html,
            fb_id: None,
            remote: None,
            group: None,
        }
    }

    pub fn require_fb_id(&self) -> Result<&str, StepError> {
        self.fb_id
            .as_deref()
            .ok_or_else(|| StepError::fault("group identifier missing from context"))
    }

    pub fn require_remote(&self) -> Result<&RemoteGroup, StepError> {
        self.remote
            .as_ref()
            .ok_or_else(|| StepError::fault("remote group record missing from context"))
    }

    pub fn require_group(&self) -> Result<&Group, StepError> {
        self.group
            .as_ref()
            .ok_or_else(|| StepError::fault("persisted group missing from context"))
    }
}
