//! Chunk-by-chunk relay of upstream bodies

use super::error::ForwardError;
use bytes::Bytes;
use futures::Stream;
use pin_project_lite::pin_project;
use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll, ready};
use tracing::{debug, info, warn};

pin_project! {
    /// Yields upstream chunks unchanged and in order.
    ///
    /// Dropping it drops the upstream body, which closes the upstream
    /// connection; this is how a client disconnect reaches the provider.
    pub struct RelayStream<S> {
        #[pin]
        inner: S,
        provider_id: String,
        chunks: u64,
        bytes: u64,
        finished: bool,
    }

    impl<S> PinnedDrop for RelayStream<S> {
        fn drop(this: Pin<&mut Self>) {
            let this = this.project();
            if !*this.finished {
                info!(
                    provider_id = %this.provider_id,
                    chunks = *this.chunks,
                    bytes = *this.bytes,
                    "Client went away mid-stream, closing upstream connection"
                );
            }
        }
    }
}

impl<S> RelayStream<S> {
    pub fn new(inner: S, provider_id: impl Into<String>) -> Self {
        Self {
            inner,
            provider_id: provider_id.into(),
            chunks: 0,
            bytes: 0,
            finished: false,
        }
    }
}

impl<S, E> Stream for RelayStream<S>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: fmt::Display,
{
    type Item = Result<Bytes, ForwardError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        // One error ends the relay; reqwest keeps repeating it otherwise
        if *this.finished {
            return Poll::Ready(None);
        }
        match ready!(this.inner.poll_next(cx)) {
            Some(Ok(chunk)) => {
                *this.chunks += 1;
                *this.bytes += chunk.len() as u64;
                Poll::Ready(Some(Ok(chunk)))
            }
            Some(Err(e)) => {
                *this.finished = true;
                warn!(
                    provider_id = %this.provider_id,
                    chunks = *this.chunks,
                    error = %e,
                    "Upstream stream failed"
                );
                Poll::Ready(Some(Err(ForwardError::StreamInterrupted(e.to_string()))))
            }
            None => {
                *this.finished = true;
                debug!(
                    provider_id = %this.provider_id,
                    chunks = *this.chunks,
                    bytes = *this.bytes,
                    "Upstream stream complete"
                );
                Poll::Ready(None)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            (0, Some(0))
        } else {
            self.inner.size_hint()
        }
    }
}
