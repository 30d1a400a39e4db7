// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use flowmap_error::FlowMapError;
use std::sync::Arc;

/// Lifecycle notification broadcast by a transform stream.
///
/// `Error` is only ever produced by `destroy(Some(error))` and is always
/// followed by `Close`. The error is shared between all subscribers.
#[derive(Debug, Clone)]
pub enum StreamEvent {
    /// The stream was destroyed with an error
    Error(Arc<FlowMapError>),
    /// The stream finished its teardown; no further events follow
    Close,
}

impl StreamEvent {
    /// Returns `true` for [`StreamEvent::Close`].
    #[must_use]
    pub const fn is_close(&self) -> bool {
        matches!(self, Self::Close)
    }

    /// Returns the carried error, if this is an error event.
    #[must_use]
    pub fn error(&self) -> Option<&FlowMapError> {
        match self {
            Self::Error(err) => Some(err),
            Self::Close => None,
        }
    }
}
