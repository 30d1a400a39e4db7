// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Configuration of a [`MapStream`](crate::MapStream).
//!
//! Options come either typed, as [`MapStreamOptions`], or untyped, as a
//! `serde_json::Value` read from some outer configuration. Untyped options are
//! merged onto the defaults by [`validate`], which reports the first offending
//! option as [`FlowMapError::Validation`].
//!
//! Recognized keys (camelCase, as in the serialized form):
//!
//! | key             | type                 | default |
//! |-----------------|----------------------|---------|
//! | `highWaterMark` | non-negative integer | `16`    |
//! | `allowHalfOpen` | boolean              | `false` |
//! | `objectMode`    | boolean              | ignored |
//!
//! Structured-object mode is always on, so `objectMode` is only type-checked.
//! Unknown keys are ignored.
//!
//! ```
//! use flowmap_stream::options::{validate, MapStreamOptions};
//! use serde_json::json;
//!
//! let mut options = MapStreamOptions::default();
//! validate(&mut options, &json!({ "highWaterMark": 4 })).unwrap();
//! assert_eq!(options.high_water_mark, 4);
//!
//! assert!(validate(&mut options, &json!({ "highWaterMark": "not-a-number" })).is_err());
//! ```

use flowmap_error::{FlowMapError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Buffer watermark used when none is configured.
pub const DEFAULT_HIGH_WATER_MARK: usize = 16;

/// Largest accepted buffer watermark.
pub const MAX_HIGH_WATER_MARK: usize = 1 << 30;

const HIGH_WATER_MARK: &str = "highWaterMark";
const ALLOW_HALF_OPEN: &str = "allowHalfOpen";
const OBJECT_MODE: &str = "objectMode";

/// Options accepted by a map stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MapStreamOptions {
    /// Number of mapped chunks buffered on the readable side before writes wait.
    pub high_water_mark: usize,
    /// Keep the writable side open after the readable side is gone.
    pub allow_half_open: bool,
}

impl Default for MapStreamOptions {
    fn default() -> Self {
        Self {
            high_water_mark: DEFAULT_HIGH_WATER_MARK,
            allow_half_open: false,
        }
    }
}

impl MapStreamOptions {
    /// Default options: a watermark of 16 and no half-open operation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the buffer watermark.
    #[must_use]
    pub const fn with_high_water_mark(mut self, high_water_mark: usize) -> Self {
        self.high_water_mark = high_water_mark;
        self
    }

    /// Sets whether the writable side outlives the readable side.
    #[must_use]
    pub const fn with_allow_half_open(mut self, allow_half_open: bool) -> Self {
        self.allow_half_open = allow_half_open;
        self
    }

    /// Builds options from untyped configuration merged onto the defaults.
    ///
    /// # Errors
    ///
    /// Returns the [`FlowMapError::Validation`] produced by [`validate`].
    pub fn from_value(config: &Value) -> Result<Self> {
        let mut options = Self::default();
        validate(&mut options, config)?;
        Ok(options)
    }

    /// Checks constraints that the field types alone do not express.
    ///
    /// # Errors
    ///
    /// Returns [`FlowMapError::Validation`] if the watermark exceeds
    /// [`MAX_HIGH_WATER_MARK`].
    pub fn check(&self) -> Result<()> {
        if self.high_water_mark > MAX_HIGH_WATER_MARK {
            return Err(FlowMapError::validation(
                HIGH_WATER_MARK,
                format!(
                    "must not exceed {MAX_HIGH_WATER_MARK}. Value: `{}`",
                    self.high_water_mark
                ),
            ));
        }
        Ok(())
    }

    /// Capacity of the readable-side buffer; a zero watermark still holds one chunk.
    pub(crate) fn buffer_capacity(&self) -> usize {
        self.high_water_mark.max(1)
    }
}

/// Validates untyped `config` and copies recognized options into `target`.
///
/// `target` is only updated when every recognized option is valid.
///
/// # Errors
///
/// Returns [`FlowMapError::Validation`] naming the first invalid option, or
/// the pseudo-option `options` if `config` is not an object.
pub fn validate(target: &mut MapStreamOptions, config: &Value) -> Result<()> {
    let Value::Object(entries) = config else {
        return Err(FlowMapError::validation(
            "options",
            format!("must be an object. Value: `{config}`"),
        ));
    };

    let mut merged = *target;
    if let Some(value) = entries.get(HIGH_WATER_MARK) {
        merged.high_water_mark = non_negative_integer(HIGH_WATER_MARK, value)?;
    }
    if let Some(value) = entries.get(ALLOW_HALF_OPEN) {
        merged.allow_half_open = boolean(ALLOW_HALF_OPEN, value)?;
    }
    if let Some(value) = entries.get(OBJECT_MODE) {
        boolean(OBJECT_MODE, value)?;
    }
    log_unknown_keys(entries);

    merged.check()?;
    *target = merged;
    Ok(())
}

fn non_negative_integer(option: &str, value: &Value) -> Result<usize> {
    value
        .as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| {
            FlowMapError::validation(
                option,
                format!("must be a non-negative integer. Value: `{value}`"),
            )
        })
}

fn boolean(option: &str, value: &Value) -> Result<bool> {
    value.as_bool().ok_or_else(|| {
        FlowMapError::validation(option, format!("must be a boolean. Value: `{value}`"))
    })
}

fn log_unknown_keys(entries: &Map<String, Value>) {
    for key in entries.keys() {
        if ![HIGH_WATER_MARK, ALLOW_HALF_OPEN, OBJECT_MODE].contains(&key.as_str()) {
            crate::debug!("map stream: ignoring unknown option `{}`", key);
        }
    }
}
