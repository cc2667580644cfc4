//! Environment configuration.
//!
//! | Variable       | Default                 |
//! |----------------|-------------------------|
//! | `JENKINS_URL`  | `http://localhost:8080` |
//! | `JENKINS_USER` | `admin`                 |
//! | `JENKINS_TOKEN`| required                |
//! | `WebhookToken` | required                |
//!
//! Credentials have no fallback: a missing token stops the service from starting.

use crate::{Client, Error, SecretString, WebhookNotifier};
use std::ffi::OsString;
use thiserror::Error;
use tracing::warn;

pub const JENKINS_URL: &str = "JENKINS_URL";
pub const JENKINS_USER: &str = "JENKINS_USER";
pub const JENKINS_TOKEN: &str = "JENKINS_TOKEN";
pub const WEBHOOK_TOKEN: &str = "WebhookToken";

pub const DEFAULT_JENKINS_URL: &str = "http://localhost:8080";
pub const DEFAULT_JENKINS_USER: &str = "admin";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("environment variable {0} is not valid UTF-8")]
    NotUnicode(&'static str),
}

#[derive(Clone, Debug)]
pub struct Config {
    pub jenkins_url: String,
    pub jenkins_user: String,
    pub jenkins_token: SecretString,
    pub webhook_token: SecretString,
}

impl Config {
    /// Read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var_os(key))
    }

    /// Read settings through `lookup`; an empty value still counts as set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let read = |key: &'static str| {
            lookup(key)
                .map(|value| value.into_string().map_err(|_| ConfigError::NotUnicode(key)))
                .transpose()
        };
        let or_default = |key: &'static str, default: &str| -> Result<String, ConfigError> {
            Ok(read(key)?.unwrap_or_else(|| {
                warn!(key, default, "environment variable not set, using default");
                default.to_owned()
            }))
        };
        let required = |key: &'static str| -> Result<SecretString, ConfigError> {
            read(key)?
                .map(SecretString::new)
                .ok_or(ConfigError::Missing(key))
        };

        Ok(Self {
            jenkins_url: or_default(JENKINS_URL, DEFAULT_JENKINS_URL)?,
            jenkins_user: or_default(JENKINS_USER, DEFAULT_JENKINS_USER)?,
            jenkins_token: required(JENKINS_TOKEN)?,
            webhook_token: required(WEBHOOK_TOKEN)?,
        })
    }

    /// Jenkins REST client authenticated as `JENKINS_USER:JENKINS_TOKEN`.
    pub fn jenkins_client(&self) -> Result<Client, Error> {
        Client::builder(&self.jenkins_url)?
            .auth_basic(&self.jenkins_user, self.jenkins_token.expose())
            .build()
    }

    pub fn webhook_notifier(&self) -> Result<WebhookNotifier, Error> {
        WebhookNotifier::new(&self.jenkins_url, self.webhook_token.expose())
    }
}
