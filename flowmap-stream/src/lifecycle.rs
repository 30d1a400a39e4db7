// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Destroyed flag and lifecycle event broadcast shared by the halves of a map stream.
//!
//! Event delivery follows the hot-subject model: each call to
//! [`Lifecycle::subscribe`] gets its own unbounded channel, and only events
//! emitted after subscribing are received. After `Close` every subscriber
//! stream ends, and later subscribers get an already-finished stream.

use flowmap_core::StreamEvent;
use flowmap_error::FlowMapError;
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::Stream;
use parking_lot::Mutex;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

struct LifecycleState {
    destroyed: bool,
    closed: bool,
    subscribers: Vec<UnboundedSender<StreamEvent>>,
}

#[derive(Clone)]
pub(crate) struct Lifecycle {
    state: Arc<Mutex<LifecycleState>>,
}

impl Lifecycle {
    pub(crate) fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(LifecycleState {
                destroyed: false,
                closed: false,
                subscribers: Vec::new(),
            })),
        }
    }

    pub(crate) fn is_destroyed(&self) -> bool {
        self.state.lock().destroyed
    }

    pub(crate) fn subscribe(&self) -> EventStream {
        let (tx, rx) = mpsc::unbounded();
        let mut state = self.state.lock();
        if !state.closed {
            state.subscribers.retain(|subscriber| !subscriber.is_closed());
            state.subscribers.push(tx);
        }
        EventStream { rx }
    }

    /// Flips the destroyed flag, runs `on_destroy`, then schedules the teardown
    /// events.
    ///
    /// Returns `false` without side effects if the flag was already set.
    pub(crate) fn destroy(&self, error: Option<FlowMapError>, on_destroy: impl FnOnce()) -> bool {
        {
            let mut state = self.state.lock();
            if state.destroyed {
                return false;
            }
            state.destroyed = true;
        }
        on_destroy();

        let mut events = Vec::with_capacity(2);
        if let Some(error) = error {
            crate::debug!("map stream: destroying with error: {}", error);
            events.push(StreamEvent::Error(Arc::new(error)));
        } else {
            crate::debug!("map stream: destroying");
        }
        events.push(StreamEvent::Close);

        self.schedule(events);
        true
    }

    #[cfg(feature = "runtime-tokio")]
    fn schedule(&self, events: Vec<StreamEvent>) {
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let lifecycle = self.clone();
            handle.spawn(async move {
                tokio::task::yield_now().await;
                lifecycle.emit(events);
            });
            return;
        }
        crate::warn!(
            "map stream: destroyed outside a tokio runtime, queueing lifecycle events directly"
        );
        self.emit(events);
    }

    // Subscribers observe queued events on their next poll.
    #[cfg(not(feature = "runtime-tokio"))]
    fn schedule(&self, events: Vec<StreamEvent>) {
        self.emit(events);
    }

    fn emit(&self, events: Vec<StreamEvent>) {
        let mut state = self.state.lock();
        for event in events {
            state
                .subscribers
                .retain(|tx| tx.unbounded_send(event.clone()).is_ok());
        }
        state.closed = true;
        state.subscribers.clear();
    }
}

/// Stream of [`StreamEvent`]s for one subscriber.
///
/// Ends after [`StreamEvent::Close`].
#[derive(Debug)]
pub struct EventStream {
    rx: UnboundedReceiver<StreamEvent>,
}

impl Stream for EventStream {
    type Item = StreamEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.rx).poll_next(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rx.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::{FutureExt, StreamExt};

    #[test]
    fn destroy_is_one_way() {
        let lifecycle = Lifecycle::new();

        assert!(lifecycle.destroy(None, || ()));
        assert!(lifecycle.is_destroyed());
        assert!(!lifecycle.destroy(None, || ()));
        assert!(lifecycle.is_destroyed());
    }

    #[test]
    fn destroy_runs_hook_once_before_emitting() {
        let lifecycle = Lifecycle::new();
        let mut events = lifecycle.subscribe();
        let mut hook_calls = 0;

        lifecycle.destroy(None, || {
            hook_calls += 1;
        });
        lifecycle.destroy(None, || {
            hook_calls += 1;
        });

        assert_eq!(hook_calls, 1);
        assert!(events.next().now_or_never().flatten().is_some_and(|e| e.is_close()));
    }

    #[test]
    fn dropped_subscribers_are_pruned_on_subscribe() {
        let lifecycle = Lifecycle::new();
        for _ in 0..8 {
            drop(lifecycle.subscribe());
        }

        let _live = lifecycle.subscribe();

        assert_eq!(lifecycle.state.lock().subscribers.len(), 1);
    }

    #[test]
    fn subscribers_after_close_get_a_finished_stream() {
        let lifecycle = Lifecycle::new();
        lifecycle.emit(vec![StreamEvent::Close]);

        let mut events = lifecycle.subscribe();
        assert_eq!(events.next().now_or_never().map(|e| e.is_none()), Some(true));
    }
}
