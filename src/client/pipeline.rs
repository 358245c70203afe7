//! Request pipeline for all non-streaming backend calls
//!
//! Attaches the bearer token, unwraps the response envelope and turns every
//! failure into exactly one user notification. An unauthenticated envelope
//! additionally tears the session down.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use ureq::http::Response;
use ureq::{Agent, Body, RequestBuilder};

use crate::error::ApiError;
use crate::session::SessionStore;

use super::classify::{classify_status, classify_transport};
use super::envelope::Envelope;
use super::notify::Notifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Method {
    Get,
    Post,
    Put,
    Delete,
}

#[derive(Debug, Clone)]
pub(crate) struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub(crate) fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub(crate) fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub(crate) fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub(crate) fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub(crate) fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub(crate) fn json<T: Serialize>(mut self, body: &T) -> Result<Self, serde_json::Error> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }
}

pub(crate) struct ApiClient<'a> {
    agent: Agent,
    base_url: String,
    session: &'a SessionStore,
    notifier: &'a dyn Notifier,
}

impl<'a> ApiClient<'a> {
    pub(crate) fn new(
        base_url: &str,
        timeout: Duration,
        session: &'a SessionStore,
        notifier: &'a dyn Notifier,
    ) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            notifier,
        }
    }

    /// Resolves with the envelope's `data`, or rejects after notifying
    pub(crate) fn send(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let url = self.url_for(&request.path);
        tracing::debug!(method = ?request.method, %url, "sending request");

        let outcome = self
            .dispatch(&url, &request)
            .map_err(classify_transport)
            .and_then(read_envelope);

        match outcome {
            Ok(data) => Ok(data),
            Err(error) => Err(self.reject(&url, error)),
        }
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    fn authorize<B>(&self, builder: RequestBuilder<B>) -> RequestBuilder<B> {
        match self.session.token() {
            Some(token) => builder.header("Authorization", format!("Bearer {token}")),
            None => builder,
        }
    }

    fn dispatch(&self, url: &str, request: &ApiRequest) -> Result<Response<Body>, ureq::Error> {
        let query = request
            .query
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()));

        match request.method {
            Method::Get => self.authorize(self.agent.get(url)).query_pairs(query).call(),
            Method::Delete => {
                let builder = self.authorize(self.agent.delete(url)).query_pairs(query);
                match &request.body {
                    Some(body) => builder.force_send_body().send_json(body),
                    None => builder.call(),
                }
            }
            Method::Post | Method::Put => {
                let builder = if request.method == Method::Post {
                    self.agent.post(url)
                } else {
                    self.agent.put(url)
                };
                let builder = self.authorize(builder).query_pairs(query);
                match &request.body {
                    Some(body) => builder.send_json(body),
                    None => builder.send_empty(),
                }
            }
        }
    }

    fn reject(&self, url: &str, error: ApiError) -> ApiError {
        tracing::debug!(%url, error = %error, "request failed");
        self.notifier.notify_error(&error.user_message());
        if matches!(error, ApiError::Unauthenticated { .. })
            && let Err(e) = self.session.logout()
        {
            tracing::warn!(error = %e, "failed to clear stored session");
        }
        error
    }
}

fn read_envelope(mut response: Response<Body>) -> Result<Value, ApiError> {
    let status = response.status().as_u16();
    let text = response.body_mut().read_to_string();

    if !(200..300).contains(&status) {
        return Err(classify_status(status, text.as_deref().ok()));
    }
    let text = text.map_err(classify_transport)?;
    Envelope::parse(&text)?.into_result()
}
