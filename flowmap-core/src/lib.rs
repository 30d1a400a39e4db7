// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod callable;
pub mod function_name;
pub mod stream_event;

pub use self::callable::Callable;
pub use self::function_name::{function_name, function_name_from_source, ANONYMOUS};
pub use self::stream_event::StreamEvent;
pub use flowmap_error::{FlowMapError, Result, ResultExt};
