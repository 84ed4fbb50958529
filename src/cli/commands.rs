//! CLI command definitions

use crate::core::RequestPayload;
use crate::remote::GraphApiConfig;
use anyhow::{Context, Result};
use clap::{ArgGroup, Args};
use std::io::Read;

/// Load a group
#[derive(Debug, Args, Clone)]
#[command(group(ArgGroup::new("input").required(true).args(["url", "body"])))]
pub struct LoadCommand {
    /// Group page URL
    pub url: Option<String>,

    /// Raw JSON request body (`-` reads it from stdin)
    #[arg(long)]
    pub body: Option<String>,

    /// Access token for the group API
    #[arg(long, env = "FB_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// App id used to build an app access token
    #[arg(long, env = "FB_CLIENT_ID")]
    pub client_id: Option<String>,

    /// App secret used to build an app access token
    #[arg(long, env = "FB_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

impl LoadCommand {
    /// The request body to feed the pipeline
    pub fn payload(&self) -> Result<RequestPayload> {
        match (&self.body, &self.url) {
            (Some(body), _) if body == "-" => {
                let mut buf = Vec::new();
                std::io::stdin()
                    .read_to_end(&mut buf)
                    .context("Failed to read request body from stdin")?;
                Ok(RequestPayload::new(buf))
            }
            (Some(body), _) => Ok(RequestPayload::from(body.as_str())),
            (None, Some(url)) => Ok(RequestPayload::for_url(url)),
            (None, None) => anyhow::bail!("Either a URL or --body must be given"),
        }
    }

    /// Apply credential flags on top of the configured API settings
    pub fn apply_credentials(&self, config: &mut GraphApiConfig) {
        if let Some(token) = &self.access_token {
            config.access_token = Some(token.clone());
        }
        if let Some(id) = &self.client_id {
            config.client_id = Some(id.clone());
        }
        if let Some(secret) = &self.client_secret {
            config.client_secret = Some(secret.clone());
        }
    }
}

/// List stored groups
#[derive(Debug, Args, Clone)]
pub struct GroupsCommand {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Show the postings of a group
#[derive(Debug, Args, Clone)]
pub struct PostingsCommand {
    /// External group identifier
    pub fb_id: String,

    /// Maximum number of postings to show
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
