// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities and fixtures for the flowmap workspace.
//!
//! - [`test_channel`]: a sender plus a plain stream, to feed sources into
//!   `pipe_from` or `map_with_index`
//! - [`test_data`]: `Person` fixtures used as structured chunks
//! - [`helpers`]: timeout-guarded assertions over streams and lifecycle events
//!
//! Intended for development and testing only.

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod helpers;
pub mod test_data;

use futures::Stream;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

pub use helpers::{
    assert_no_element_emitted, assert_stream_ended, collect_events, unwrap_stream,
};
pub use test_data::Person;

/// Creates an unbounded channel whose receiving end is a [`Stream`].
///
/// ```rust
/// use flowmap_test_utils::test_channel;
/// use futures::StreamExt;
///
/// # async fn example() {
/// let (tx, mut stream) = test_channel();
/// tx.send(42).unwrap();
/// assert_eq!(stream.next().await, Some(42));
/// # }
/// ```
pub fn test_channel<T: Send + 'static>() -> (
    mpsc::UnboundedSender<T>,
    impl Stream<Item = T> + Send + Unpin,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    (tx, UnboundedReceiverStream::new(rx))
}
