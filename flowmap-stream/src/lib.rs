// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Duplex transform stream that maps each chunk together with its index.
//!
//! - [`MapStream`]: writable side, bounded buffer and readable side in one
//!   value, with `destroy` and lifecycle [`StreamEvent`]s.
//! - [`MapStreamOptions`] and [`options::validate`]: typed and untyped
//!   configuration.
//! - [`MapStreamFactory`]: many streams from one validated configuration.
//! - [`MapWithIndexExt`]: the same mapping contract as a plain stream operator.
//!
//! # Feature flags
//!
//! - `runtime-tokio` (default): lifecycle events are emitted from a task
//!   spawned on the current tokio runtime.
//! - `tracing`: log through `tracing` instead of standard error.

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod factory;
mod lifecycle;
mod logging;
pub mod map_stream;
pub mod map_with_index;
pub mod options;
pub mod prelude;

pub use self::factory::{factory, MapStreamFactory};
pub use self::lifecycle::EventStream;
pub use self::map_stream::{MapReader, MapStream, MapWriter};
pub use self::map_with_index::{MapWithIndex, MapWithIndexExt};
pub use self::options::MapStreamOptions;
pub use flowmap_core::StreamEvent;
