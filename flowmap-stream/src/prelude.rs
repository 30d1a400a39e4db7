// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

pub use crate::factory::{factory, MapStreamFactory};
pub use crate::lifecycle::EventStream;
pub use crate::map_stream::{MapReader, MapStream, MapWriter};
pub use crate::map_with_index::MapWithIndexExt;
pub use crate::options::MapStreamOptions;
pub use flowmap_core::StreamEvent;
