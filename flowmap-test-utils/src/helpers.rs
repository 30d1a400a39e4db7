// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use flowmap_core::StreamEvent;
use futures::stream::StreamExt;
use futures::Stream;
use std::time::Duration;
use tokio::time::{sleep, timeout};

pub async fn assert_no_element_emitted<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
{
    tokio::select! {
        _state = stream.next() => {
            panic!(
                "Unexpected element emitted, expected no output."
            );
        }
        _ = sleep(Duration::from_millis(timeout_ms)) => {
        }
    }
}

/// Waits up to `timeout_ms` for the next element.
///
/// # Panics
///
/// Panics if the stream ends or the timeout expires first.
pub async fn unwrap_stream<S, T>(stream: &mut S, timeout_ms: u64) -> T
where
    S: Stream<Item = T> + Unpin,
{
    match timeout(Duration::from_millis(timeout_ms), stream.next()).await {
        Ok(Some(item)) => item,
        Ok(None) => panic!("Expected an element, but the stream ended"),
        Err(_) => panic!("Expected an element within {timeout_ms}ms"),
    }
}

/// Asserts that the stream ends within `timeout_ms`.
///
/// # Panics
///
/// Panics if the stream yields an element or stays open past the timeout.
pub async fn assert_stream_ended<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
{
    match timeout(Duration::from_millis(timeout_ms), stream.next()).await {
        Ok(None) => {}
        Ok(Some(_)) => panic!("Expected the stream to end, but it emitted an element"),
        Err(_) => panic!("Expected the stream to end within {timeout_ms}ms"),
    }
}

/// Collects lifecycle events until the event stream ends.
///
/// # Panics
///
/// Panics if the event stream is still open after `timeout_ms`.
pub async fn collect_events<S>(events: S, timeout_ms: u64) -> Vec<StreamEvent>
where
    S: Stream<Item = StreamEvent>,
{
    timeout(Duration::from_millis(timeout_ms), events.collect())
        .await
        .unwrap_or_else(|_| panic!("Event stream still open after {timeout_ms}ms"))
}
