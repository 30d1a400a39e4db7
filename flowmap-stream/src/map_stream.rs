// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Duplex transform stream mapping each chunk together with its index.
//!
//! A [`MapStream`] is a writable side and a readable side joined by a bounded
//! buffer. Every chunk written is passed to the mapping function as
//! `(chunk, index)`, where `index` counts from zero, and the result is queued
//! for the readable side. Chunks are arbitrary values: the stream always runs
//! in structured-object mode.
//!
//! # Basic Usage
//!
//! ```
//! use flowmap_stream::MapStream;
//! use futures::StreamExt;
//!
//! # #[tokio::main]
//! # async fn main() -> flowmap_error::Result<()> {
//! let mut stream = MapStream::new(|word: &str, index| format!("{index}:{word}"));
//!
//! stream.write("alpha").await?;
//! stream.write("beta").await?;
//! stream.end();
//!
//! let mapped: Vec<String> = stream.collect().await;
//! assert_eq!(mapped, ["0:alpha", "1:beta"]);
//! # Ok(())
//! # }
//! ```
//!
//! # Backpressure
//!
//! The buffer holds `high_water_mark` mapped chunks (at least one). Once it is
//! full, [`write`](MapStream::write) waits for the readable side to make room
//! and [`try_write`](MapStream::try_write) fails with
//! [`FlowMapError::BufferFull`]. When producer and consumer run concurrently,
//! [`split`](MapStream::split) the stream and drive each half from its own task.
//!
//! # Teardown
//!
//! [`destroy`](MapStream::destroy) marks the stream destroyed and closes the
//! buffer: writes fail, the readable side ends (waking a reader parked on an
//! empty buffer), and subscribers of [`events`](MapStream::events) receive
//! `Error` (if an error was given) and then `Close`.
//!
//! The events are published by a task spawned on the current tokio runtime.
//! On a current-thread runtime that task cannot run before `destroy` returns.
//! On a multi-thread runtime another worker may pick it up while `destroy` is
//! still returning; events are then still never observed before the destroyed
//! flag is set and the buffer is closed.
//!
//! # Panics
//!
//! The mapping function is called without any guard. If it panics, the panic
//! unwinds through the `write` call that invoked it.

use crate::lifecycle::{EventStream, Lifecycle};
use crate::options::MapStreamOptions;
use async_channel::{Receiver, Sender, TrySendError};
use flowmap_error::{FlowMapError, Result};
use futures::{Stream, StreamExt};
use pin_project::pin_project;
use serde_json::Value;
use std::marker::PhantomData;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Writable half of a map stream: owns the mapping function and the cursor.
pub struct MapWriter<T, U, F> {
    map: F,
    cursor: Option<usize>,
    tx: Option<Sender<U>>,
    options: MapStreamOptions,
    lifecycle: Lifecycle,
    _chunk: PhantomData<fn(T)>,
}

impl<T, U, F> MapWriter<T, U, F>
where
    F: FnMut(T, usize) -> U,
{
    /// Maps `chunk` and queues the result, waiting while the buffer is full.
    ///
    /// # Errors
    ///
    /// - [`FlowMapError::StreamDestroyed`] after `destroy`
    /// - [`FlowMapError::WriteAfterEnd`] after `end`
    /// - [`FlowMapError::ReadableClosed`] if the readable half was dropped and
    ///   half-open operation is disabled
    pub async fn write(&mut self, chunk: T) -> Result<()> {
        if self.lifecycle.is_destroyed() {
            return Err(FlowMapError::StreamDestroyed);
        }
        let Some(tx) = self.tx.as_ref() else {
            return Err(FlowMapError::WriteAfterEnd);
        };
        if tx.is_closed() && !self.options.allow_half_open {
            return self.close_writable();
        }

        let output = (self.map)(chunk, advance(&mut self.cursor));
        if tx.send(output).await.is_ok() {
            return Ok(());
        }
        self.readable_gone()
    }

    /// Like [`write`](Self::write), but never waits.
    ///
    /// # Errors
    ///
    /// As [`write`](Self::write), plus [`FlowMapError::BufferFull`] when the
    /// buffer is at its watermark. In that case the mapping function is not
    /// called and the cursor does not move.
    pub fn try_write(&mut self, chunk: T) -> Result<()> {
        if self.lifecycle.is_destroyed() {
            return Err(FlowMapError::StreamDestroyed);
        }
        let Some(tx) = self.tx.as_ref() else {
            return Err(FlowMapError::WriteAfterEnd);
        };
        if tx.is_closed() && !self.options.allow_half_open {
            return self.close_writable();
        }
        if tx.is_full() && !tx.is_closed() {
            return Err(self.buffer_full());
        }

        let output = (self.map)(chunk, advance(&mut self.cursor));
        match tx.try_send(output) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(self.buffer_full()),
            Err(TrySendError::Closed(_)) => self.readable_gone(),
        }
    }

    /// Writes every chunk of `source`, then ends the writable side.
    ///
    /// Returns the number of chunks written.
    ///
    /// # Errors
    ///
    /// Stops at the first failing [`write`](Self::write) and returns its error;
    /// the writable side is left open in that case.
    pub async fn pipe_from<S>(&mut self, source: S) -> Result<usize>
    where
        S: Stream<Item = T>,
    {
        futures::pin_mut!(source);
        let mut written = 0;
        while let Some(chunk) = source.next().await {
            self.write(chunk).await?;
            written += 1;
        }
        self.end();
        Ok(written)
    }
}

impl<T, U, F> MapWriter<T, U, F> {
    /// Ends the writable side. Buffered chunks stay readable, then the readable
    /// side finishes. Calling `end` again has no effect.
    pub fn end(&mut self) {
        if self.tx.take().is_some() {
            crate::debug!("map stream: writable side ended after {:?}", self.cursor);
        }
    }

    /// Returns `true` until the writable side is ended or the stream destroyed.
    #[must_use]
    pub fn is_writable(&self) -> bool {
        self.tx.is_some() && !self.lifecycle.is_destroyed()
    }

    /// Index given to the most recently mapped chunk, `None` before the first.
    #[must_use]
    pub const fn index(&self) -> Option<usize> {
        self.cursor
    }

    /// The options this stream was built with.
    #[must_use]
    pub const fn options(&self) -> MapStreamOptions {
        self.options
    }

    /// Returns `true` once the stream has been destroyed.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.lifecycle.is_destroyed()
    }

    /// Subscribes to the stream's lifecycle events.
    #[must_use]
    pub fn events(&self) -> EventStream {
        self.lifecycle.subscribe()
    }

    /// Destroys the stream both halves belong to.
    ///
    /// Returns `Some(self)` on the first call and `None` on every later call
    /// from either half.
    pub fn destroy(&self, error: Option<FlowMapError>) -> Option<&Self> {
        self.lifecycle
            .destroy(error, || self.close_channel())
            .then_some(self)
    }

    // Wakes a reader parked on an empty buffer.
    fn close_channel(&self) {
        if let Some(tx) = self.tx.as_ref() {
            tx.close();
        }
    }

    fn close_writable(&mut self) -> Result<()> {
        crate::debug!("map stream: readable side closed, ending writable side");
        self.tx = None;
        Err(FlowMapError::ReadableClosed)
    }

    fn readable_gone(&mut self) -> Result<()> {
        if self.lifecycle.is_destroyed() {
            return Err(FlowMapError::StreamDestroyed);
        }
        if self.options.allow_half_open {
            crate::debug!(
                "map stream: readable side closed, discarding chunk {:?}",
                self.cursor
            );
            return Ok(());
        }
        self.close_writable()
    }

    const fn buffer_full(&self) -> FlowMapError {
        FlowMapError::BufferFull {
            high_water_mark: self.options.high_water_mark,
        }
    }
}

// Cursor starts "at -1": the first chunk gets index 0.
fn advance(cursor: &mut Option<usize>) -> usize {
    let index = cursor.map_or(0, |last| last + 1);
    *cursor = Some(index);
    index
}

/// Readable half of a map stream.
///
/// Yields mapped chunks in write order; ends after the writable side ended
/// and the buffer drained, or as soon as the stream is destroyed.
pub struct MapReader<U> {
    rx: Pin<Box<Receiver<U>>>,
    lifecycle: Lifecycle,
}

impl<U> MapReader<U> {
    /// Number of mapped chunks waiting in the buffer.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.rx.len()
    }

    /// Returns `true` once the stream has been destroyed.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.lifecycle.is_destroyed()
    }

    /// Subscribes to the stream's lifecycle events.
    #[must_use]
    pub fn events(&self) -> EventStream {
        self.lifecycle.subscribe()
    }

    /// Destroys the stream both halves belong to.
    ///
    /// Returns `Some(self)` on the first call and `None` on every later call
    /// from either half.
    pub fn destroy(&self, error: Option<FlowMapError>) -> Option<&Self> {
        // Closing wakes a writer waiting for buffer space.
        self.lifecycle
            .destroy(error, || {
                self.rx.close();
            })
            .then_some(self)
    }
}

impl<U> Stream for MapReader<U> {
    type Item = U;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.lifecycle.is_destroyed() {
            // Destroyed from the other half: buffered chunks are dropped.
            self.rx.close();
            return Poll::Ready(None);
        }
        self.rx.as_mut().poll_next(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.lifecycle.is_destroyed() {
            return (0, Some(0));
        }
        self.rx.size_hint()
    }
}

/// Transform stream applying `F` to each `(chunk, index)` pair.
///
/// See the [module documentation](self) for usage.
#[pin_project]
pub struct MapStream<T, U, F> {
    writer: MapWriter<T, U, F>,
    #[pin]
    reader: MapReader<U>,
}

impl<T, U, F> MapStream<T, U, F>
where
    F: FnMut(T, usize) -> U,
{
    /// Creates a map stream with default options.
    pub fn new(map: F) -> Self {
        Self::build(MapStreamOptions::default(), map)
    }

    /// Creates a map stream with explicit options.
    ///
    /// # Errors
    ///
    /// Returns [`FlowMapError::Validation`] if the options are out of range.
    pub fn with_options(options: MapStreamOptions, map: F) -> Result<Self> {
        options.check()?;
        Ok(Self::build(options, map))
    }

    /// Creates a map stream from untyped configuration.
    ///
    /// # Errors
    ///
    /// Returns the [`FlowMapError::Validation`] reported by
    /// [`options::validate`](crate::options::validate), unchanged.
    pub fn from_config(config: &Value, map: F) -> Result<Self> {
        let options = MapStreamOptions::from_value(config)?;
        Ok(Self::build(options, map))
    }

    pub(crate) fn build(options: MapStreamOptions, map: F) -> Self {
        let (tx, rx) = async_channel::bounded(options.buffer_capacity());
        let lifecycle = Lifecycle::new();
        Self {
            writer: MapWriter {
                map,
                cursor: None,
                tx: Some(tx),
                options,
                lifecycle: lifecycle.clone(),
                _chunk: PhantomData,
            },
            reader: MapReader {
                rx: Box::pin(rx),
                lifecycle,
            },
        }
    }

    /// See [`MapWriter::write`].
    ///
    /// # Errors
    ///
    /// See [`MapWriter::write`].
    pub async fn write(&mut self, chunk: T) -> Result<()> {
        self.writer.write(chunk).await
    }

    /// See [`MapWriter::try_write`].
    ///
    /// # Errors
    ///
    /// See [`MapWriter::try_write`].
    pub fn try_write(&mut self, chunk: T) -> Result<()> {
        self.writer.try_write(chunk)
    }
}

impl<T, U, F> MapStream<T, U, F> {
    /// Separates the writable and readable halves.
    pub fn split(self) -> (MapWriter<T, U, F>, MapReader<U>) {
        (self.writer, self.reader)
    }

    /// See [`MapWriter::end`].
    pub fn end(&mut self) {
        self.writer.end();
    }

    /// Index given to the most recently mapped chunk, `None` before the first.
    #[must_use]
    pub const fn index(&self) -> Option<usize> {
        self.writer.index()
    }

    /// The options this stream was built with.
    #[must_use]
    pub const fn options(&self) -> MapStreamOptions {
        self.writer.options()
    }

    /// Returns `true` until the writable side is ended or the stream destroyed.
    #[must_use]
    pub fn is_writable(&self) -> bool {
        self.writer.is_writable()
    }

    /// Returns `true` once the stream has been destroyed.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.writer.is_destroyed()
    }

    /// Subscribes to the stream's lifecycle events.
    #[must_use]
    pub fn events(&self) -> EventStream {
        self.writer.events()
    }

    /// Destroys the stream.
    ///
    /// The first call sets the destroyed flag, closes the buffer and schedules
    /// the teardown events; it returns `Some(self)` for chaining. Later calls
    /// do nothing and return `None`.
    pub fn destroy(&self, error: Option<FlowMapError>) -> Option<&Self> {
        self.writer
            .lifecycle
            .destroy(error, || {
                self.writer.close_channel();
                self.reader.rx.close();
            })
            .then_some(self)
    }
}

impl<T, U, F> Stream for MapStream<T, U, F> {
    type Item = U;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.project().reader.poll_next(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.reader.size_hint()
    }
}
