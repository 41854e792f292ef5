//! # Progress-reporting body stream
//!
//! Wraps a byte stream used as a request body and reports how many bytes the
//! transport has taken off it.
//!
//! A chunk is counted once the connection polls the stream again (or the
//! stream ends), meaning the chunk has been handed to the transport's write
//! queue. The connection buffers a few chunks ahead of the socket, so the
//! count may lead the bytes actually written by that queue's depth.

use bytes::Bytes;
use futures::Stream;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Body stream that calls `observer` with the cumulative flushed byte count.
pub struct ProgressStream<S, F> {
    inner: S,
    flushed: u64,
    handed_out: u64,
    observer: F,
}

impl<S, F> ProgressStream<S, F>
where
    S: Stream<Item = io::Result<Bytes>> + Unpin,
    F: FnMut(u64),
{
    /// Wraps `inner`, reporting progress to `observer`.
    pub fn new(inner: S, observer: F) -> Self {
        Self {
            inner,
            flushed: 0,
            handed_out: 0,
            observer,
        }
    }

    fn acknowledge(&mut self) {
        if self.handed_out > 0 {
            self.flushed += self.handed_out;
            self.handed_out = 0;
            (self.observer)(self.flushed);
        }
    }
}

impl<S, F> Stream for ProgressStream<S, F>
where
    S: Stream<Item = io::Result<Bytes>> + Unpin,
    F: FnMut(u64) + Unpin,
{
    type Item = io::Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;
        this.acknowledge();

        match Pin::new(&mut this.inner).poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                this.handed_out = chunk.len() as u64;
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(None) => {
                this.acknowledge();
                Poll::Ready(None)
            }
            other => other,
        }
    }
}
