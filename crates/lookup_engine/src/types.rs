use std::fmt;

use crate::backend::BackendError;

/// Opaque identifier of the browser tab a trigger came from.
pub type TabId = u64;

/// Where a cycle currently is; logged at each transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    Idle,
    Preparing,
    AwaitingFirstChunk,
    Streaming,
    Completed,
    Failed,
}

/// Terminal failure of one trigger cycle. Extraction and delivery problems
/// are recovered inside the cycle and never appear here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleFailure {
    BackendUnreachable(String),
    BackendProtocol(String),
    StreamInterrupted(String),
}

impl fmt::Display for CycleFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleFailure::BackendUnreachable(msg) => write!(f, "{msg}"),
            CycleFailure::BackendProtocol(msg) => write!(f, "backend protocol error: {msg}"),
            CycleFailure::StreamInterrupted(msg) => write!(f, "stream interrupted: {msg}"),
        }
    }
}

impl From<BackendError> for CycleFailure {
    fn from(err: BackendError) -> Self {
        match err {
            // The server answering with an error status still reads as "not
            // usable" to the person staring at the popup.
            BackendError::Unreachable(_) | BackendError::HttpStatus { .. } => {
                CycleFailure::BackendUnreachable(err.to_string())
            }
            BackendError::Protocol(msg) => CycleFailure::BackendProtocol(msg),
            BackendError::Stream(msg) => CycleFailure::StreamInterrupted(msg),
        }
    }
}
