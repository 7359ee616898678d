//! Tower layer and service wiring for the adapter.

use std::sync::Arc;
use std::task::{Context, Poll};

use http::{HeaderName, Request, Response, StatusCode};
use tower::{Layer, Service};

use crate::config::TraceConfig;
use crate::context::Lineage;
use crate::error::{MalformedContext, TraceError};
use crate::middleware::future::ResponseFuture;
use crate::session::recorder::{NoopRecorder, SpanRecorder};
use crate::session::span::{RequestInfo, SpanGuard};
use crate::session::Session;

/// Configuration and collaborators shared by every clone of the service.
struct Shared {
    config: TraceConfig,
    header: HeaderName,
    recorder: Arc<dyn SpanRecorder>,
}

/// Layer mounting the tracer adapter onto a tower/axum stack.
#[derive(Clone)]
pub struct TraceRelayLayer {
    shared: Arc<Shared>,
}

impl TraceRelayLayer {
    /// Build a layer from host configuration and a profiler backend.
    pub fn new(config: TraceConfig, recorder: Arc<dyn SpanRecorder>) -> Result<Self, TraceError> {
        let header = HeaderName::try_from(config.header_key.as_str())
            .map_err(|_| TraceError::InvalidHeaderKey(config.header_key.clone()))?;
        Ok(Self {
            shared: Arc::new(Shared {
                config,
                header,
                recorder,
            }),
        })
    }

    /// A permanently disabled instance: requests pass through untouched.
    pub fn disabled() -> Self {
        Self::new(TraceConfig::default(), Arc::new(NoopRecorder))
            .expect("default header key is a valid header name")
    }
}

impl<S> Layer<S> for TraceRelayLayer {
    type Service = TraceRelayService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TraceRelayService {
            inner,
            shared: self.shared.clone(),
        }
    }
}

/// Service wrapper around the application handler.
///
/// Holds no per-request state of its own: everything a request needs lives
/// in its own call frame and response future, so concurrent requests never
/// share a session.
#[derive(Clone)]
pub struct TraceRelayService<S> {
    inner: S,
    shared: Arc<Shared>,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for TraceRelayService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    ResBody: Default,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = ResponseFuture<S::Future, ResBody>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        if !self.shared.config.enabled {
            return ResponseFuture::forward(self.inner.call(req), None);
        }

        let lineage = match decode_header(&self.shared.header, &req) {
            Ok(lineage) => lineage,
            Err(error) => {
                if self.shared.config.strict {
                    tracing::warn!(error = %error, "rejecting request with undecodable trace context");
                    return ResponseFuture::reject(bad_request());
                }
                tracing::warn!(error = %error, "undecodable trace context, starting a fresh trace");
                None
            }
        };

        let session = match lineage {
            Some(lineage) => Session::resume(lineage),
            None => Session::fresh(),
        };

        let info = RequestInfo::from_request(&req);
        let guard = match SpanGuard::open(
            &self.shared.config.service_name,
            &session,
            info,
            self.shared.recorder.clone(),
        ) {
            Ok(guard) => {
                // Expose the session to the handler only once its span is
                // live; a refused span means nothing to propagate onward.
                req.extensions_mut().insert(session);
                Some(guard)
            }
            Err(error) => {
                tracing::warn!(error = %error, "profiler session unavailable, serving request untraced");
                None
            }
        };

        ResponseFuture::forward(self.inner.call(req), guard)
    }
}

fn decode_header<B>(
    header: &HeaderName,
    req: &Request<B>,
) -> Result<Option<Lineage>, MalformedContext> {
    let Some(value) = req.headers().get(header) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| MalformedContext::Unprintable)?;
    Lineage::decode(value).map(Some)
}

fn bad_request<B: Default>() -> Response<B> {
    let mut response = Response::new(B::default());
    *response.status_mut() = StatusCode::BAD_REQUEST;
    response
}
