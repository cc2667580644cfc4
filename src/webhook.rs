//! Notifier for the Jenkins `webhook-step` receiver.
//!
//! Posts `{"type": "<jobType>"}` to `<base>/webhook-step/<webhookId>` with the shared
//! webhook token as a bare `Authorization` header.

use crate::{
    Auth, Client, Error,
    transport::request::{Request, RequestBody},
};
use http::StatusCode;
use serde::Serialize;
use tracing::{info, warn};

#[derive(Serialize)]
struct WebhookPayload<'a> {
    #[serde(rename = "type")]
    job_type: &'a str,
}

/// What the receiver answered. Any status counts as delivered.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct WebhookDelivery {
    pub status: StatusCode,
    pub body: String,
}

#[derive(Clone)]
pub struct WebhookNotifier {
    client: Client,
}

impl WebhookNotifier {
    /// Build a notifier posting under `base` with `token` as the `Authorization` value.
    pub fn new(base: impl AsRef<str>, token: impl Into<String>) -> Result<Self, Error> {
        let client = Client::builder(base)?.auth(Auth::raw(token)).build()?;
        Ok(Self::from_client(client))
    }

    /// Use an already configured client; its auth is what the receiver will see.
    #[must_use]
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// `POST /webhook-step/<webhook_id>`
    ///
    /// Only transport failures are errors; non-2xx answers are logged and returned.
    pub async fn notify(&self, webhook_id: &str, job_type: &str) -> Result<WebhookDelivery, Error> {
        let body = RequestBody::json(&WebhookPayload { job_type })?;
        let req = Request::post(["webhook-step", webhook_id]).body(body);

        let resp = self.client.send_response(req).await?;
        let delivery = WebhookDelivery {
            status: resp.status,
            body: resp.text_lossy().into_owned(),
        };

        if delivery.status.is_success() {
            info!(
                webhook_id,
                status = delivery.status.as_u16(),
                body = %delivery.body,
                "read webhook response body"
            );
        } else {
            warn!(
                webhook_id,
                status = delivery.status.as_u16(),
                body = %delivery.body,
                "webhook receiver answered with a non-success status"
            );
        }
        Ok(delivery)
    }
}
