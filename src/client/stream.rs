//! Streaming answer call
//!
//! Bypasses the request pipeline: no envelope unwrapping and no
//! notifications. The caller gets the raw response and decides how to read
//! it.

use std::io::{BufReader, Read};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use serde::Serialize;
use ureq::Agent;

use crate::error::ApiError;

use super::classify::classify_transport;
use super::sse::SseReader;

/// Shared cancellation flag. Cloning shares the flag.
#[derive(Debug, Clone, Default)]
pub(crate) struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Cancels from a background thread once `delay` has elapsed
    pub(crate) fn cancel_after(&self, delay: Duration) -> JoinHandle<()> {
        let token = self.clone();
        thread::spawn(move || {
            thread::sleep(delay);
            tracing::debug!(?delay, "cancelling stream");
            token.cancel();
        })
    }
}

pub(crate) struct StreamClient {
    agent: Agent,
    url: String,
}

impl StreamClient {
    /// Only connecting is bounded; an answer may stream for as long as it takes
    pub(crate) fn new(url: &str, connect_timeout: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_connect(Some(connect_timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            agent,
            url: url.to_string(),
        }
    }

    pub(crate) fn open<T: Serialize>(
        &self,
        body: &T,
        bearer: Option<&str>,
        cancel: &CancelToken,
    ) -> Result<StreamResponse, ApiError> {
        if cancel.is_cancelled() {
            return Err(ApiError::Cancelled);
        }

        let mut builder = self
            .agent
            .post(&self.url)
            .header("Accept", "text/event-stream");
        if let Some(token) = bearer.filter(|t| !t.is_empty()) {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }

        tracing::debug!(url = %self.url, "opening stream");
        let response = builder.send_json(body).map_err(classify_transport)?;
        if cancel.is_cancelled() {
            return Err(ApiError::Cancelled);
        }

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        tracing::debug!(status, ?content_type, "stream opened");

        Ok(StreamResponse {
            status,
            content_type,
            reader: CancellableReader {
                inner: Some(Box::new(response.into_body().into_reader())),
                cancel: cancel.clone(),
            },
        })
    }
}

/// Raw handle to an open streaming response
pub(crate) struct StreamResponse {
    pub(crate) status: u16,
    pub(crate) content_type: Option<String>,
    reader: CancellableReader,
}

impl StreamResponse {
    pub(crate) fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub(crate) fn into_reader(self) -> CancellableReader {
        self.reader
    }

    pub(crate) fn events(self) -> SseReader<BufReader<CancellableReader>> {
        let reader = self.into_reader();
        let cancel = reader.cancel.clone();
        SseReader::new(BufReader::new(reader)).with_cancel(cancel)
    }
}

/// Body reader that drops the connection at the first read after cancel
pub(crate) struct CancellableReader {
    inner: Option<Box<dyn Read>>,
    cancel: CancelToken,
}

impl Read for CancellableReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if self.cancel.is_cancelled() {
            if self.inner.take().is_some() {
                tracing::debug!("stream cancelled, connection released");
            }
            return Ok(0);
        }
        match self.inner.as_mut() {
            Some(reader) => reader.read(buf),
            None => Ok(0),
        }
    }
}
