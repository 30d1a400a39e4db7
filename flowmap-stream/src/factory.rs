// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Validate options once, create many map streams.

use crate::map_stream::MapStream;
use crate::options::MapStreamOptions;
use flowmap_error::Result;
use serde_json::Value;

/// Creates [`MapStream`]s that share one validated configuration.
///
/// Each created stream has its own cursor and destroyed flag.
///
/// ```
/// use flowmap_stream::factory;
/// use flowmap_stream::MapStreamOptions;
///
/// let factory = factory(MapStreamOptions::new().with_high_water_mark(4)).unwrap();
/// let doubles = factory.create(|x: u32, _| x * 2);
/// let labels = factory.create(|x: u32, index| format!("#{index}={x}"));
///
/// assert_eq!(doubles.options().high_water_mark, 4);
/// assert_eq!(labels.options().high_water_mark, 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapStreamFactory {
    options: MapStreamOptions,
}

impl MapStreamFactory {
    /// Creates a factory from typed options.
    ///
    /// # Errors
    ///
    /// Returns [`FlowMapError::Validation`](flowmap_error::FlowMapError::Validation)
    /// if the options are out of range.
    pub fn new(options: MapStreamOptions) -> Result<Self> {
        options.check()?;
        Ok(Self { options })
    }

    /// Creates a factory from untyped configuration.
    ///
    /// # Errors
    ///
    /// Returns the validation error reported for `config`.
    pub fn from_config(config: &Value) -> Result<Self> {
        Ok(Self {
            options: MapStreamOptions::from_value(config)?,
        })
    }

    /// The options every created stream receives.
    #[must_use]
    pub const fn options(&self) -> MapStreamOptions {
        self.options
    }

    /// Creates a new map stream.
    pub fn create<T, U, F>(&self, map: F) -> MapStream<T, U, F>
    where
        F: FnMut(T, usize) -> U,
    {
        MapStream::build(self.options, map)
    }
}

/// Shorthand for [`MapStreamFactory::new`].
///
/// # Errors
///
/// See [`MapStreamFactory::new`].
pub fn factory(options: MapStreamOptions) -> Result<MapStreamFactory> {
    MapStreamFactory::new(options)
}
