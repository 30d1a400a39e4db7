// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! # flowmap
//!
//! Two small utilities for async Rust:
//!
//! - [`MapStream`]: a duplex transform stream that calls a mapping function
//!   with every chunk and its zero-based index, forwarding the result to its
//!   readable side. Destroying it broadcasts `Error` (optional) and `Close`
//!   lifecycle events.
//! - [`function_name`]: the declared name of a function, or `"anonymous"`.
//!
//! ## Quick Start
//!
//! ```rust
//! use flowmap::prelude::*;
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> flowmap::Result<()> {
//!     fn label(word: &str, index: usize) -> String {
//!         format!("{index}:{word}")
//!     }
//!
//!     let mut stream = MapStream::new(label);
//!     stream.write("a").await?;
//!     stream.write("b").await?;
//!     stream.end();
//!
//!     assert_eq!(function_name(&label), "label");
//!     assert_eq!(stream.collect::<Vec<_>>().await, ["0:a", "1:b"]);
//!     Ok(())
//! }
//! ```

pub use flowmap_core::{
    function_name, function_name_from_source, Callable, StreamEvent, ANONYMOUS,
};
pub use flowmap_error::{FlowMapError, Result, ResultExt};
pub use flowmap_stream::options;
pub use flowmap_stream::{
    factory, EventStream, MapReader, MapStream, MapStreamFactory, MapStreamOptions, MapWithIndex,
    MapWithIndexExt, MapWriter,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use flowmap_core::{function_name, StreamEvent};
    pub use flowmap_error::FlowMapError;
    pub use flowmap_stream::prelude::*;
}
