//! Jenkins webhook relay.
//!
//! Serves `/jenkins/webhook`: looks up a build on Jenkins and, while it is still running,
//! notifies the `webhook-step` receiver for it.

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod handler;
pub mod server;
pub mod transport;
pub mod types;
pub mod webhook;

mod util;

pub use auth::{Auth, SecretString};
pub use client::{Client, ClientBuilder};
pub use config::{Config, ConfigError};
pub use error::{Error, ErrorKind, HttpError, TransportErrorKind};
pub use handler::{
    BuildStatusLookup, CompletionNotifier, DUPLICATE_CLICK_MESSAGE, Handled, JobInfo, Outcome,
    Relay, RelayError, WebhookQuery,
};
pub use server::{LISTEN_ADDR, WEBHOOK_PATH, create_router, start_server};
pub use types::*;
pub use webhook::{WebhookDelivery, WebhookNotifier};
