//! High-level asynchronous HTTP client bound to one base URL.
//!
//! The same client type talks to the Jenkins REST API (HTTP Basic credentials) and to the
//! `webhook-step` receiver (raw `Authorization` token).

use crate::{
    Auth, Error, HttpError, api,
    transport::{
        DynAsyncTransport, ReqwestAsync, TransportBody, TransportRequest,
        request::{Request, Response},
    },
    util::{
        diagnostics,
        redact::redact_text,
        url::{endpoint_url, normalize_base_url, sanitize_url_for_error},
    },
};
use serde::de::DeserializeOwned;
use std::{sync::Arc, time::Duration};
use tracing::{Instrument, field};
use url::Url;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configures and constructs [`Client`].
pub struct ClientBuilder {
    base_url: Url,
    auth: Option<Auth>,
}

impl ClientBuilder {
    fn try_new(base: impl AsRef<str>) -> Result<Self, Error> {
        Ok(Self {
            base_url: normalize_base_url(base.as_ref())?,
            auth: None,
        })
    }

    /// Apply an authentication strategy.
    pub fn auth(mut self, auth: Auth) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Apply HTTP basic authentication credentials.
    pub fn auth_basic(mut self, user: impl Into<String>, token: impl Into<String>) -> Self {
        self.auth = Some(Auth::basic(user, token));
        self
    }

    /// Finalise configuration and build the client.
    pub fn build(self) -> Result<Client, Error> {
        let transport: DynAsyncTransport =
            Arc::new(ReqwestAsync::try_new(USER_AGENT, CONNECT_TIMEOUT)?);

        Ok(Client {
            inner: Arc::new(Inner {
                base: self.base_url,
                auth: self.auth,
                transport,
            }),
        })
    }
}

#[derive(Clone)]
pub struct Client {
    inner: Arc<Inner>,
}

struct Inner {
    base: Url,
    auth: Option<Auth>,
    transport: DynAsyncTransport,
}

impl Client {
    pub fn builder(base: impl AsRef<str>) -> Result<ClientBuilder, Error> {
        ClientBuilder::try_new(base)
    }

    pub fn new(base: impl AsRef<str>) -> Result<Self, Error> {
        Self::builder(base)?.build()
    }

    #[must_use]
    pub fn system(&self) -> api::SystemService {
        api::SystemService::new(self.clone())
    }

    #[must_use]
    pub fn builds(&self) -> api::BuildsService {
        api::BuildsService::new(self.clone())
    }

    pub(crate) async fn send_json<T: DeserializeOwned + Send + 'static>(
        &self,
        req: Request,
    ) -> Result<T, Error> {
        let resp = self.execute_request(&req).await?;
        resp.json().map_err(|source| {
            let path = endpoint_url(&self.inner.base, req.segments.iter().map(|s| s.as_str()))
                .map(|url| url.path().to_owned())
                .unwrap_or_default();
            Error::Decode {
                status: resp.status,
                method: req.method,
                path: path.into_boxed_str(),
                request_id: diagnostics::request_id(&resp.headers),
                body_snippet: diagnostics::body_snippet(&resp.body, self.inner.auth.as_ref()),
                source: Box::new(source),
            }
        })
    }

    /// Send `req` and hand back the response whatever its status code.
    pub(crate) async fn send_response(&self, req: Request) -> Result<Response, Error> {
        let (_, resp) = self.dispatch(&req).await?;
        Ok(resp)
    }

    /// Send `req` and turn 4xx/5xx responses into [`Error`]s.
    pub(crate) async fn execute_request(&self, req: &Request) -> Result<Response, Error> {
        let (url, resp) = self.dispatch(req).await?;
        if !(resp.status.is_client_error() || resp.status.is_server_error()) {
            return Ok(resp);
        }

        let message = diagnostics::extract_message(&resp.body)
            .map(|msg| redact_text(msg.into(), self.inner.auth.as_ref()).into_boxed_str());
        let err = Error::from_http(HttpError {
            status: resp.status,
            method: req.method.clone(),
            url: Box::new(sanitize_url_for_error(&url)),
            message,
            request_id: diagnostics::request_id(&resp.headers),
            body_snippet: diagnostics::body_snippet(&resp.body, self.inner.auth.as_ref()),
        });
        tracing::debug!(error_kind = ?err.kind(), "request rejected by server");
        Err(err)
    }

    async fn dispatch(&self, req: &Request) -> Result<(Url, Response), Error> {
        let url = endpoint_url(&self.inner.base, req.segments.iter().map(|s| s.as_str()))?;

        let mut headers = http::HeaderMap::new();
        if let Some(auth) = &self.inner.auth {
            auth.apply(&mut headers)?;
        }
        headers.extend(req.headers.clone());

        let body = req.body.clone().map(|body| TransportBody {
            bytes: body.bytes,
            content_type: body.content_type,
        });

        let start = std::time::Instant::now();
        let span = tracing::info_span!(
            "jenkins.request",
            http.method = %req.method,
            http.host = %self.inner.base.host_str().unwrap_or_default(),
            http.path = %url.path(),
            http.status = field::Empty,
            request_id = field::Empty,
            latency_ms = field::Empty,
            error_kind = field::Empty,
        );

        let resp = match self
            .inner
            .transport
            .send(TransportRequest {
                method: req.method.clone(),
                url: url.clone(),
                headers,
                query: req.query.clone(),
                body,
                timeout: REQUEST_TIMEOUT,
            })
            .instrument(span.clone())
            .await
        {
            Ok(resp) => resp,
            Err(err) => {
                span.record("error_kind", field::debug(err.kind()));
                span.record("latency_ms", start.elapsed().as_millis() as i64);
                return Err(err);
            }
        };

        span.record("http.status", resp.status.as_u16() as i64);
        span.record("latency_ms", start.elapsed().as_millis() as i64);
        if let Some(rid) = diagnostics::request_id(&resp.headers) {
            span.record("request_id", field::display(rid));
        }

        Ok((
            url,
            Response {
                status: resp.status,
                headers: resp.headers,
                body: resp.body,
            },
        ))
    }
}
