// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use flowmap_error::FlowMapError;
use flowmap_stream::{MapStream, MapStreamOptions, StreamEvent};
use flowmap_test_utils::{assert_stream_ended, collect_events, unwrap_stream};
use futures::{FutureExt, StreamExt};
use std::io;
use std::time::Duration;

fn boom() -> FlowMapError {
    FlowMapError::user_error(io::Error::other("boom"))
}

#[tokio::test]
async fn test_destroy_returns_stream_on_first_call_only() -> anyhow::Result<()> {
    // Arrange
    let stream = MapStream::new(|x: i32, _| x);

    // Act
    let first = stream.destroy(None);
    let second = stream.destroy(None);

    // Assert
    assert!(first.is_some_and(|returned| std::ptr::eq(returned, &stream)));
    assert!(second.is_none());
    assert!(stream.is_destroyed());

    Ok(())
}

#[tokio::test]
async fn test_destroy_supports_chaining() -> anyhow::Result<()> {
    // Arrange
    let stream = MapStream::new(|x: i32, _| x);

    // Act
    let destroyed = stream.destroy(None).map(MapStream::is_destroyed);

    // Assert
    assert_eq!(destroyed, Some(true));

    Ok(())
}

#[tokio::test]
async fn test_destroy_with_error_emits_error_then_close() -> anyhow::Result<()> {
    // Arrange
    let stream = MapStream::new(|x: i32, _| x);
    let events = stream.events();

    // Act
    stream.destroy(Some(boom()));

    // Assert
    let events = collect_events(events, 500).await;
    assert_eq!(events.len(), 2);
    assert_eq!(
        events[0].error().map(ToString::to_string).as_deref(),
        Some("User error: boom")
    );
    assert!(events[1].is_close());

    Ok(())
}

#[tokio::test]
async fn test_destroy_without_error_emits_only_close() -> anyhow::Result<()> {
    // Arrange
    let stream = MapStream::new(|x: i32, _| x);
    let events = stream.events();

    // Act
    stream.destroy(None);

    // Assert
    let events = collect_events(events, 500).await;
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], StreamEvent::Close));

    Ok(())
}

#[tokio::test]
async fn test_destroy_events_are_not_delivered_synchronously() -> anyhow::Result<()> {
    // Arrange
    let stream = MapStream::new(|x: i32, _| x);
    let mut events = stream.events();

    // Act
    stream.destroy(Some(boom()));

    // Assert
    assert!(events.next().now_or_never().is_none());
    assert!(unwrap_stream(&mut events, 500).await.error().is_some());
    assert!(unwrap_stream(&mut events, 500).await.is_close());
    assert_stream_ended(&mut events, 500).await;

    Ok(())
}

#[tokio::test]
async fn test_second_destroy_emits_nothing_more() -> anyhow::Result<()> {
    // Arrange
    let stream = MapStream::new(|x: i32, _| x);
    let events = stream.events();

    // Act
    stream.destroy(None);
    stream.destroy(Some(boom()));

    // Assert
    let events = collect_events(events, 500).await;
    assert_eq!(events.len(), 1);
    assert!(events[0].is_close());

    Ok(())
}

#[tokio::test]
async fn test_subscriber_added_right_after_destroy_still_notified() -> anyhow::Result<()> {
    // Arrange
    let stream = MapStream::new(|x: i32, _| x);

    // Act
    stream.destroy(Some(boom()));
    let events = stream.events();

    // Assert
    let events = collect_events(events, 500).await;
    assert_eq!(events.len(), 2);
    assert!(events[1].is_close());

    Ok(())
}

#[tokio::test]
async fn test_subscriber_added_after_close_gets_nothing() -> anyhow::Result<()> {
    // Arrange
    let stream = MapStream::new(|x: i32, _| x);
    let first = stream.events();
    stream.destroy(None);
    collect_events(first, 500).await;

    // Act
    let late = stream.events();

    // Assert
    assert!(collect_events(late, 500).await.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_every_subscriber_receives_the_same_error() -> anyhow::Result<()> {
    // Arrange
    let stream = MapStream::new(|x: i32, _| x);
    let first = stream.events();
    let second = stream.events();

    // Act
    stream.destroy(Some(boom()));

    // Assert
    let first = collect_events(first, 500).await;
    let second = collect_events(second, 500).await;
    match (&first[0], &second[0]) {
        (StreamEvent::Error(a), StreamEvent::Error(b)) => assert!(std::sync::Arc::ptr_eq(a, b)),
        other => panic!("expected two error events, got {other:?}"),
    }

    Ok(())
}

#[tokio::test]
async fn test_write_after_destroy_fails() -> anyhow::Result<()> {
    // Arrange
    let mut stream = MapStream::new(|x: i32, _| x);
    stream.destroy(None);

    // Act
    let result = stream.write(1).await;

    // Assert
    assert!(matches!(result, Err(FlowMapError::StreamDestroyed)));
    assert!(!stream.is_writable());
    assert_eq!(stream.index(), None);

    Ok(())
}

#[tokio::test]
async fn test_readable_side_ends_on_destroy() -> anyhow::Result<()> {
    // Arrange
    let mut stream = MapStream::new(|x: i32, _| x);
    stream.write(1).await?;
    stream.write(2).await?;

    // Act
    stream.destroy(None);

    // Assert
    assert_stream_ended(&mut stream, 500).await;

    Ok(())
}

#[tokio::test]
async fn test_destroy_is_shared_between_halves() -> anyhow::Result<()> {
    // Arrange
    let (writer, reader) = MapStream::new(|x: i32, _| x).split();
    let events = writer.events();

    // Act
    let from_reader = reader.destroy(None);
    let from_writer = writer.destroy(Some(boom()));

    // Assert
    assert!(from_reader.is_some());
    assert!(from_writer.is_none());
    assert!(writer.is_destroyed());
    let events = collect_events(events, 500).await;
    assert_eq!(events.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_destroy_releases_writer_waiting_for_space() -> anyhow::Result<()> {
    // Arrange
    let options = MapStreamOptions::new().with_high_water_mark(1);
    let (mut writer, mut reader) = MapStream::with_options(options, |x: i32, _| x)?.split();
    let producer = tokio::spawn(async move {
        writer.write(1).await?;
        writer.write(2).await
    });
    tokio::task::yield_now().await;

    // Act
    reader.destroy(None);
    assert_stream_ended(&mut reader, 500).await;

    // Assert
    let result = tokio::time::timeout(Duration::from_millis(500), producer).await??;
    assert!(matches!(result, Err(FlowMapError::StreamDestroyed)));

    Ok(())
}

#[tokio::test]
async fn test_destroy_wakes_reader_waiting_on_empty_buffer() -> anyhow::Result<()> {
    // Arrange
    let (writer, mut reader) = MapStream::new(|x: i32, _| x).split();
    let consumer = tokio::spawn(async move { reader.next().await });
    tokio::task::yield_now().await;

    // Act
    writer.destroy(None);

    // Assert
    let next = tokio::time::timeout(Duration::from_millis(500), consumer).await??;
    assert_eq!(next, None);
    assert!(writer.is_destroyed());

    Ok(())
}

#[tokio::test]
async fn test_destroy_from_writer_drops_buffered_chunks() -> anyhow::Result<()> {
    // Arrange
    let (mut writer, mut reader) = MapStream::new(|x: i32, _| x).split();
    writer.write(1).await?;
    writer.write(2).await?;

    // Act
    writer.destroy(None);

    // Assert
    assert_stream_ended(&mut reader, 500).await;
    assert!(matches!(writer.write(3).await, Err(FlowMapError::StreamDestroyed)));

    Ok(())
}

#[tokio::test]
async fn test_destroy_ends_collecting_consumer_and_emits_events() -> anyhow::Result<()> {
    // Arrange
    let stream = MapStream::new(|x: i32, _| x * 2);
    let events = stream.events();
    let (writer, reader) = stream.split();
    let consumer = tokio::spawn(async move { reader.collect::<Vec<_>>().await });
    tokio::task::yield_now().await;

    // Act
    writer.destroy(Some(boom()));

    // Assert
    let collected = tokio::time::timeout(Duration::from_millis(500), consumer).await??;
    assert!(collected.is_empty());
    let events = collect_events(events, 500).await;
    assert_eq!(events.len(), 2);
    assert!(events[1].is_close());

    Ok(())
}

#[test]
fn test_destroy_without_runtime_still_delivers_events() {
    // Arrange
    let stream = MapStream::new(|x: i32, _| x);
    let mut events = stream.events();

    // Act
    stream.destroy(Some(boom()));

    // Assert
    let first = events.next().now_or_never().flatten();
    let second = events.next().now_or_never().flatten();
    assert!(first.is_some_and(|event| event.error().is_some()));
    assert!(second.is_some_and(|event| event.is_close()));
}
