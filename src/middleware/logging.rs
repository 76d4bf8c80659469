//! Diagnostic HTTP logging.
//!
//! Request and response bodies are wrapped in a tee that forwards every chunk
//! untouched and keeps at most `api.log_body_limit` bytes aside. Each side is
//! logged when its body is dropped, so the request entry shows what the handler
//! actually read and the response entry shows what was actually sent.

use std::collections::BTreeMap;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use axum::{
    body::{Body, Bytes, HttpBody},
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use futures::ready;
use http_body::{Frame, SizeHint};
use uuid::Uuid;

use crate::app::AppState;

const LOG_TARGET: &str = "item_api::http";
const REDACTED: &str = "[redacted]";

/// Bounded copy of a body as it streams past
#[derive(Debug, Clone)]
pub struct BodyCapture {
    limit: usize,
    buf: Vec<u8>,
    total: usize,
}

impl BodyCapture {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            buf: Vec::new(),
            total: 0,
        }
    }

    pub fn record(&mut self, chunk: &[u8]) {
        self.total += chunk.len();
        let room = self.limit.saturating_sub(self.buf.len());
        self.buf.extend_from_slice(&chunk[..room.min(chunk.len())]);
    }

    pub fn captured(&self) -> &[u8] {
        &self.buf
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_truncated(&self) -> bool {
        self.total > self.buf.len()
    }

    pub fn render(&self) -> String {
        let text = String::from_utf8_lossy(&self.buf);
        if self.is_truncated() {
            format!("{}...(truncated, {} bytes total)", text, self.total)
        } else {
            text.into_owned()
        }
    }
}

struct RequestLog {
    id: Uuid,
    method: String,
    uri: String,
    headers: String,
    capture: BodyCapture,
}

impl AsMut<BodyCapture> for RequestLog {
    fn as_mut(&mut self) -> &mut BodyCapture {
        &mut self.capture
    }
}

impl Drop for RequestLog {
    fn drop(&mut self) {
        tracing::info!(
            target: LOG_TARGET,
            request_id = %self.id,
            method = %self.method,
            uri = %self.uri,
            headers = %self.headers,
            body = %self.capture.render(),
            body_bytes = self.capture.total(),
            "http request"
        );
    }
}

struct ResponseLog {
    id: Uuid,
    status: u16,
    elapsed: Duration,
    headers: String,
    capture: BodyCapture,
}

impl AsMut<BodyCapture> for ResponseLog {
    fn as_mut(&mut self) -> &mut BodyCapture {
        &mut self.capture
    }
}

impl Drop for ResponseLog {
    fn drop(&mut self) {
        tracing::info!(
            target: LOG_TARGET,
            request_id = %self.id,
            status = self.status,
            time_taken_ms = self.elapsed.as_millis() as u64,
            headers = %self.headers,
            body = %self.capture.render(),
            body_bytes = self.capture.total(),
            "http response"
        );
    }
}

/// Log every request/response pair without altering either
pub async fn http_logging_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let limit = state.config.api.log_body_limit;
    let id = Uuid::new_v4();
    let started = Instant::now();

    let (parts, body) = request.into_parts();
    let request_log = RequestLog {
        id,
        method: parts.method.to_string(),
        uri: parts.uri.to_string(),
        headers: format_headers(&parts.headers),
        capture: BodyCapture::new(limit),
    };
    let request = Request::from_parts(parts, tee(body, request_log));

    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let response_log = ResponseLog {
        id,
        status: parts.status.as_u16(),
        elapsed: started.elapsed(),
        headers: format_headers(&parts.headers),
        capture: BodyCapture::new(limit),
    };
    Response::from_parts(parts, tee(body, response_log))
}

/// Forward `body` unchanged while feeding each chunk to `log`; `log` is dropped
/// together with the returned body.
pub fn tee<L>(body: Body, log: L) -> Body
where
    L: AsMut<BodyCapture> + Send + Unpin + 'static,
{
    // Keep known-empty bodies as they are and log them right away
    if body.size_hint().exact() == Some(0) {
        drop(log);
        return body;
    }

    Body::new(TeeBody { inner: body, log })
}

/// Body wrapper behind [`tee`]. Size hint and end-of-stream come from the inner
/// body, so `Content-Length` is still derived as if no logger were installed.
struct TeeBody<L> {
    inner: Body,
    log: L,
}

impl<L> HttpBody for TeeBody<L>
where
    L: AsMut<BodyCapture> + Unpin,
{
    type Data = Bytes;
    type Error = axum::Error;

    fn poll_frame(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = &mut *self;
        let frame = ready!(Pin::new(&mut this.inner).poll_frame(cx));

        if let Some(Ok(frame)) = &frame {
            if let Some(chunk) = frame.data_ref() {
                this.log.as_mut().record(chunk);
            }
        }

        Poll::Ready(frame)
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

fn format_headers(headers: &HeaderMap) -> String {
    let mut grouped: BTreeMap<&str, Vec<String>> = BTreeMap::new();

    for (name, value) in headers {
        let shown = if is_sensitive(name) {
            REDACTED.to_string()
        } else {
            String::from_utf8_lossy(value.as_bytes()).into_owned()
        };
        grouped.entry(name.as_str()).or_default().push(shown);
    }

    format!("{:?}", grouped)
}

fn is_sensitive(name: &header::HeaderName) -> bool {
    *name == header::AUTHORIZATION
        || *name == header::COOKIE
        || *name == header::SET_COOKIE
        || *name == header::PROXY_AUTHORIZATION
}
