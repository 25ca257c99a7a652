//! Lookup engine: page capture, generation backend, and cycle orchestration.
mod backend;
mod config;
mod extract;
mod handshake;
mod orchestrator;
mod page;
mod prompt;
mod serialize;
mod tab;
mod types;

pub use backend::{
    BackendError, ChatChunk, ChatMessage, ChunkMessage, ChunkStream, Generator, OllamaClient,
};
pub use config::{LookupSettings, SettingsError, DEFAULT_ENDPOINT_URL, DEFAULT_MODEL};
pub use extract::{capture_page, PageCapture};
pub use handshake::{ensure_renderer, HandshakeOutcome, PING_TIMEOUT};
pub use orchestrator::{
    CycleOutcome, Orchestrator, Trigger, CONTEXT_UNAVAILABLE, PROCESSING_MESSAGE,
};
pub use page::{InProcessTab, RendererTiming, SurfaceSnapshot};
pub use prompt::build_prompt;
pub use serialize::{
    enforce_bound, subtree_markdown, tidy, BoundedText, MAX_CAPTURE_CHARS, TRUNCATION_MARKER,
};
pub use tab::{Tab, TabError};
pub use types::{CycleFailure, CyclePhase, TabId};
