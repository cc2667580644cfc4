//! `/jenkins/webhook` request handling.
//!
//! Each request gets its own [`JobInfo`]; the Jenkins client and the webhook notifier are
//! injected through [`Relay::new`].

use crate::{BuildNumber, Client, Error, WebhookNotifier};
use async_trait::async_trait;
use serde::Serialize;
use std::{num::ParseIntError, sync::Arc};
use thiserror::Error;
use tracing::{error, info};

/// Body returned when the build already has a result ("do not click repeatedly").
pub const DUPLICATE_CLICK_MESSAGE: &str = "请勿重复点击";

/// Looks up a build's result string; `""` means it has not finished.
#[async_trait]
pub trait BuildStatusLookup: Send + Sync + 'static {
    async fn build_result(&self, job: &str, build: BuildNumber) -> Result<String, Error>;
}

#[async_trait]
impl BuildStatusLookup for Client {
    async fn build_result(&self, job: &str, build: BuildNumber) -> Result<String, Error> {
        self.builds().result(job, build).await
    }
}

/// Tells the webhook receiver that a job of `job_type` is done.
#[async_trait]
pub trait CompletionNotifier: Send + Sync + 'static {
    async fn notify(&self, webhook_id: &str, job_type: &str) -> Result<(), Error>;
}

#[async_trait]
impl CompletionNotifier for WebhookNotifier {
    async fn notify(&self, webhook_id: &str, job_type: &str) -> Result<(), Error> {
        WebhookNotifier::notify(self, webhook_id, job_type)
            .await
            .map(|_| ())
    }
}

/// Query string of `/jenkins/webhook`. Missing parameters read as empty strings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WebhookQuery {
    pub webhook_id: String,
    pub job_type: String,
    pub job_name: String,
    pub build_number: String,
}

/// Collects decoded query pairs. A repeated key keeps its first value; unknown keys are
/// ignored.
impl FromIterator<(String, String)> for WebhookQuery {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut query = Self::default();
        let mut seen = [false; 4];
        for (key, value) in pairs {
            let (slot, field) = match key.as_str() {
                "webhookId" => (0, &mut query.webhook_id),
                "jobType" => (1, &mut query.job_type),
                "jobName" => (2, &mut query.job_name),
                "buildNumber" => (3, &mut query.build_number),
                _ => continue,
            };
            if !seen[slot] {
                seen[slot] = true;
                *field = value;
            }
        }
        query
    }
}

/// State of one relayed request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct JobInfo {
    pub name: String,
    #[serde(rename = "buildnumber")]
    pub build_number: String,
    #[serde(rename = "webhookid")]
    pub webhook_id: String,
    #[serde(rename = "jobtype")]
    pub job_type: String,
    pub status: String,
    pub error: String,
}

impl From<WebhookQuery> for JobInfo {
    fn from(query: WebhookQuery) -> Self {
        Self {
            name: query.job_name,
            build_number: query.build_number,
            webhook_id: query.webhook_id,
            job_type: query.job_type,
            ..Self::default()
        }
    }
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("invalid build number {value:?}: {source}")]
    InvalidBuildNumber {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error(transparent)]
    Lookup(Error),

    #[error(transparent)]
    Notify(Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// `buildNumber` did not parse; nothing was looked up.
    InvalidBuildNumber,
    /// Jenkins could not be asked; nothing was notified.
    LookupFailed,
    /// The build was still running and the receiver was called (successfully or not).
    Notified,
    /// The build already had a result.
    AlreadyFinished,
}

#[derive(Clone, Debug)]
pub struct Handled {
    pub job: JobInfo,
    pub outcome: Outcome,
}

impl Handled {
    /// Plain-text response body.
    #[must_use]
    pub fn body(&self) -> String {
        match self.outcome {
            Outcome::InvalidBuildNumber => {
                serde_json::to_string(&self.job).unwrap_or_else(|_| self.job.error.clone())
            }
            Outcome::LookupFailed => self.job.error.clone(),
            Outcome::Notified => self.job.job_type.clone(),
            Outcome::AlreadyFinished => DUPLICATE_CLICK_MESSAGE.to_owned(),
        }
    }
}

fn parse_build_number(raw: &str) -> Result<BuildNumber, RelayError> {
    raw.parse::<i64>()
        .map(BuildNumber::new)
        .map_err(|source| RelayError::InvalidBuildNumber {
            value: raw.to_owned(),
            source,
        })
}

#[derive(Clone)]
pub struct Relay {
    builds: Arc<dyn BuildStatusLookup>,
    notifier: Arc<dyn CompletionNotifier>,
}

impl Relay {
    pub fn new(builds: impl BuildStatusLookup, notifier: impl CompletionNotifier) -> Self {
        Self {
            builds: Arc::new(builds),
            notifier: Arc::new(notifier),
        }
    }

    pub async fn handle(&self, query: WebhookQuery) -> Handled {
        let mut job = JobInfo::from(query);

        let build = match parse_build_number(&job.build_number) {
            Ok(build) => build,
            Err(err) => {
                error!(
                    build_number = %job.build_number,
                    error = %err,
                    "buildNumber is not a number"
                );
                job.error = err.to_string();
                return Handled {
                    job,
                    outcome: Outcome::InvalidBuildNumber,
                };
            }
        };

        match self.builds.build_result(&job.name, build).await {
            Ok(status) => job.status = status,
            Err(err) => {
                let err = RelayError::Lookup(err);
                error!(
                    job = %job.name,
                    build_number = %job.build_number,
                    error = %err,
                    "build status lookup failed"
                );
                job.error = err.to_string();
                return Handled {
                    job,
                    outcome: Outcome::LookupFailed,
                };
            }
        }
        info!(
            job = %job.name,
            build_number = %job.build_number,
            status = %job.status,
            "build status lookup succeeded"
        );

        if !job.status.is_empty() {
            info!(job = %job.name, build_number = %job.build_number, "do not repeat click");
            return Handled {
                job,
                outcome: Outcome::AlreadyFinished,
            };
        }

        if let Err(err) = self.notifier.notify(&job.webhook_id, &job.job_type).await {
            let err = RelayError::Notify(err);
            error!(
                webhook_id = %job.webhook_id,
                error = %err,
                "failed to post jenkins job webhook"
            );
            job.error = err.to_string();
        }
        Handled {
            job,
            outcome: Outcome::Notified,
        }
    }
}
