//! Response future owning the span guard.

use std::future::Future;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use http::Response;
use pin_project_lite::pin_project;

use crate::session::span::{SpanGuard, SpanStatus};

pin_project! {
    /// Future returned by [`TraceRelayService`](crate::middleware::TraceRelayService).
    ///
    /// The guard travels with the future, so the span closes no matter how
    /// the request ends: a ready result finishes it explicitly, and
    /// dropping the future mid-flight (transport timeout, client
    /// disconnect) releases it through `Drop` as a cancelled span.
    #[project = ResponseFutureProj]
    pub enum ResponseFuture<F, B> {
        /// Delegating to the wrapped service, with or without an open span.
        Forward {
            #[pin]
            inner: F,
            guard: Option<SpanGuard>,
        },
        /// Strict-mode rejection; the wrapped service is never invoked.
        Reject {
            response: Option<Response<B>>,
        },
    }
}

impl<F, B> ResponseFuture<F, B> {
    pub(crate) fn forward(inner: F, guard: Option<SpanGuard>) -> Self {
        Self::Forward { inner, guard }
    }

    pub(crate) fn reject(response: Response<B>) -> Self {
        Self::Reject {
            response: Some(response),
        }
    }
}

impl<F, B, E> Future for ResponseFuture<F, B>
where
    F: Future<Output = Result<Response<B>, E>>,
{
    type Output = Result<Response<B>, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.project() {
            ResponseFutureProj::Forward { inner, guard } => {
                let result = ready!(inner.poll(cx));
                if let Some(guard) = guard.take() {
                    let status = if result.is_ok() {
                        SpanStatus::Completed
                    } else {
                        SpanStatus::Failed
                    };
                    guard.finish(status);
                }
                Poll::Ready(result)
            }
            ResponseFutureProj::Reject { response } => Poll::Ready(Ok(response
                .take()
                .expect("ResponseFuture polled after completion"))),
        }
    }
}
