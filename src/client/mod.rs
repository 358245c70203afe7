//! Backend access: the enveloped request pipeline and the raw streaming call

mod classify;
mod envelope;
pub(crate) mod notify;
mod pipeline;
pub(crate) mod sse;
pub(crate) mod stream;
#[cfg(test)]
#[path = "../../tests/support/backend.rs"]
pub(crate) mod testing;

pub(crate) use notify::TerminalNotifier;
pub(crate) use pipeline::{ApiClient, ApiRequest};
pub(crate) use sse::SseEvent;
pub(crate) use stream::{CancelToken, StreamClient};
