// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Pull-based counterpart of [`MapStream`](crate::MapStream).
//!
//! [`map_with_index`](MapWithIndexExt::map_with_index) applies the same
//! `(item, index)` contract to any existing stream, without a buffer or
//! lifecycle of its own.
//!
//! ```
//! use flowmap_stream::MapWithIndexExt;
//! use futures::{stream, StreamExt};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let ranked: Vec<String> = stream::iter(["gold", "silver"])
//!     .map_with_index(|medal, index| format!("{}. {medal}", index + 1))
//!     .collect()
//!     .await;
//!
//! assert_eq!(ranked, ["1. gold", "2. silver"]);
//! # }
//! ```

use futures::ready;
use futures::Stream;
use pin_project::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Stream returned by [`MapWithIndexExt::map_with_index`].
#[pin_project]
#[must_use = "streams do nothing unless polled"]
pub struct MapWithIndex<S, F> {
    #[pin]
    stream: S,
    f: F,
    cursor: Option<usize>,
}

impl<S, F> MapWithIndex<S, F> {
    fn new(stream: S, f: F) -> Self {
        Self {
            stream,
            f,
            cursor: None,
        }
    }
}

impl<S, F, U> Stream for MapWithIndex<S, F>
where
    S: Stream,
    F: FnMut(S::Item, usize) -> U,
{
    type Item = U;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        match ready!(this.stream.poll_next(cx)) {
            Some(item) => {
                let index = this.cursor.map_or(0, |last| last + 1);
                *this.cursor = Some(index);
                Poll::Ready(Some((this.f)(item, index)))
            }
            None => Poll::Ready(None),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.stream.size_hint()
    }
}

/// Extension trait providing the [`map_with_index`](Self::map_with_index) operator.
pub trait MapWithIndexExt: Stream + Sized {
    /// Maps each item together with its zero-based position in the stream.
    ///
    /// # Behavior
    ///
    /// - The first item receives index `0`, each following item the next index
    /// - Items are mapped lazily, when the returned stream is polled
    /// - The stream ends when the source ends
    fn map_with_index<U, F>(self, f: F) -> MapWithIndex<Self, F>
    where
        F: FnMut(Self::Item, usize) -> U,
    {
        MapWithIndex::new(self, f)
    }
}

impl<S: Stream> MapWithIndexExt for S {}
