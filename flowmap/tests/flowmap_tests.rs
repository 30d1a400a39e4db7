// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use flowmap::prelude::*;
use flowmap::{function_name_from_source, ANONYMOUS};
use flowmap_test_utils::test_data::people;
use flowmap_test_utils::{collect_events, test_channel, Person};
use futures::StreamExt;
use serde_json::json;
use std::io;

fn tag_adult(person: Person, index: usize) -> (usize, String, bool) {
    (index, person.name, person.age >= 30)
}

#[tokio::test]
async fn test_configured_pipeline_end_to_end() -> anyhow::Result<()> {
    // Arrange
    let (tx, source) = test_channel();
    for person in people() {
        tx.send(person)?;
    }
    drop(tx);
    let stream = MapStream::from_config(&json!({ "highWaterMark": 1 }), tag_adult)?;
    let events = stream.events();
    let (mut writer, reader) = stream.split();

    // Act
    let producer = tokio::spawn(async move {
        let written = writer.pipe_from(source).await;
        (writer, written)
    });
    let tagged: Vec<(usize, String, bool)> = reader.collect().await;
    let (writer, written) = producer.await?;
    writer.destroy(Some(FlowMapError::user_error(io::Error::other("shutdown"))));

    // Assert
    assert_eq!(written?, 4);
    assert_eq!(
        tagged,
        vec![
            (0, "Alice".to_string(), false),
            (1, "Bob".to_string(), true),
            (2, "Charlie".to_string(), true),
            (3, "Dave".to_string(), false),
        ]
    );
    let events = collect_events(events, 500).await;
    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], StreamEvent::Error(err) if err.to_string().contains("shutdown")));
    assert!(events[1].is_close());

    Ok(())
}

#[tokio::test]
async fn test_pull_operator_matches_duplex_stream() -> anyhow::Result<()> {
    // Arrange
    let inputs = people();
    let mut duplex = MapStream::new(tag_adult);

    // Act
    for person in inputs.clone() {
        duplex.write(person).await?;
    }
    duplex.end();
    let pushed: Vec<_> = duplex.collect().await;
    let pulled: Vec<_> = futures::stream::iter(inputs)
        .map_with_index(tag_adult)
        .collect()
        .await;

    // Assert
    assert_eq!(pushed, pulled);

    Ok(())
}

#[test]
fn test_function_name_of_mapping_functions() -> anyhow::Result<()> {
    assert_eq!(function_name(&tag_adult), "tag_adult");
    assert_eq!(function_name(&|p: Person, i: usize| (p, i)), ANONYMOUS);
    assert_eq!(
        function_name_from_source("fn tag_adult(person: Person, index: usize)")?,
        "tag_adult"
    );
    assert!(function_name_from_source("42").is_err());
    Ok(())
}
