//! Cloud Run resource listing
//!
//! Talks to the Cloud Run Admin API v2 REST surface. Auth is kept to a
//! minimum: a bearer token from the environment, with a `gcloud` subprocess
//! as a fallback. Everything else (quota, regional endpoints, retries) is
//! the API's concern, not ours.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

const API_BASE: &str = "https://run.googleapis.com/v2";

/// Which Cloud Run collection to enumerate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Services,
    Jobs,
}

impl ResourceKind {
    /// Collection segment in the v2 REST path, also the key the response
    /// nests the resources under.
    pub fn collection(&self) -> &'static str {
        match self {
            ResourceKind::Services => "services",
            ResourceKind::Jobs => "jobs",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ResourceKind::Services => "Cloud Run Services",
            ResourceKind::Jobs => "Cloud Run Jobs",
        }
    }
}

#[derive(Debug, Error)]
pub enum ListerError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("no access token: {0}")]
    Token(String),
    #[error("Cloud Run API returned {status}: {message}")]
    Api { status: u16, message: String },
}

/// External collaborator that enumerates Cloud Run resources.
///
/// The dashboard only ever sees an ordered list of display names; failures
/// surface as an empty list plus a logged error, never as a crash.
#[async_trait]
pub trait ResourceLister: Send + Sync {
    async fn list(&self, kind: ResourceKind) -> Result<Vec<String>, ListerError>;
}

/// Project/region pair the listing is scoped to
#[derive(Debug, Clone)]
pub struct Parent {
    pub project: String,
    pub region: String,
}

impl Parent {
    fn path(&self) -> String {
        format!("projects/{}/locations/{}", self.project, self.region)
    }
}

/// Lister backed by the Cloud Run Admin API
pub struct CloudRunLister {
    client: reqwest::Client,
    parent: Parent,
}

impl CloudRunLister {
    pub fn new(parent: Parent) -> Self {
        Self {
            client: reqwest::Client::new(),
            parent,
        }
    }

    async fn access_token(&self) -> Result<String, ListerError> {
        if let Ok(token) = std::env::var("GRUN_TOKEN") {
            let token = token.trim().to_string();
            if !token.is_empty() {
                return Ok(token);
            }
        }

        let output = tokio::process::Command::new("gcloud")
            .args(["auth", "print-access-token"])
            .output()
            .await
            .map_err(|err| ListerError::Token(format!("gcloud not runnable: {err}")))?;
        if !output.status.success() {
            return Err(ListerError::Token(format!(
                "gcloud auth print-access-token exited with {}",
                output.status
            )));
        }
        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if token.is_empty() {
            return Err(ListerError::Token("gcloud returned an empty token".into()));
        }
        Ok(token)
    }
}

#[async_trait]
impl ResourceLister for CloudRunLister {
    async fn list(&self, kind: ResourceKind) -> Result<Vec<String>, ListerError> {
        let token = self.access_token().await?;
        let url = format!("{API_BASE}/{}/{}", self.parent.path(), kind.collection());

        let mut names = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self.client.get(&url).bearer_auth(&token);
            if let Some(ref t) = page_token {
                request = request.query(&[("pageToken", t.as_str())]);
            }

            let response = request.send().await?;
            let status = response.status();
            let body: Value = response.json().await?;
            if !status.is_success() {
                let message = body
                    .pointer("/error/message")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown error")
                    .to_string();
                return Err(ListerError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            names.extend(names_from_response(&body, kind));

            page_token = body
                .get("nextPageToken")
                .and_then(Value::as_str)
                .filter(|t| !t.is_empty())
                .map(str::to_string);
            if page_token.is_none() {
                break;
            }
        }

        Ok(names)
    }
}

/// Extract short display names from one page of a list response.
fn names_from_response(body: &Value, kind: ResourceKind) -> Vec<String> {
    body.get(kind.collection())
        .and_then(Value::as_array)
        .map(|resources| {
            resources
                .iter()
                .filter_map(|r| r.get("name").and_then(Value::as_str))
                .map(|name| short_name(name).to_string())
                .collect()
        })
        .unwrap_or_default()
}

/// Display name for a fully qualified resource identifier.
///
/// `projects/p/locations/l/services/my-service` becomes `my-service`.
pub fn short_name(qualified: &str) -> &str {
    qualified.rsplit('/').next().unwrap_or(qualified)
}

/// Fixture-backed lister for running without credentials (`--mock`)
pub struct MockLister;

#[async_trait]
impl ResourceLister for MockLister {
    async fn list(&self, kind: ResourceKind) -> Result<Vec<String>, ListerError> {
        let names = match kind {
            ResourceKind::Services => vec![
                "idp-api-service-production",
                "idp-api-graphiql-service-production",
                "billing-webhook-service-staging",
                "frontend-render-service-production",
            ],
            ResourceKind::Jobs => vec![
                "nightly-backup-job",
                "invoice-export-job",
                "cache-warmup-job",
            ],
        };
        Ok(names.into_iter().map(str::to_string).collect())
    }
}
