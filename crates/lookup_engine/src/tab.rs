use async_trait::async_trait;

use lookup_core::ControlMessage;

use crate::extract::PageCapture;

#[derive(Debug, thiserror::Error)]
pub enum TabError {
    #[error("tab unreachable: {0}")]
    Unreachable(String),
    #[error("renderer injection failed: {0}")]
    InjectionFailed(String),
    #[error("content capture failed: {0}")]
    CaptureFailed(String),
}

/// Transport into one page context.
///
/// All sends are one-way and best-effort: the tab may be closed or navigated
/// away at any moment, so non-delivery is an error value the caller logs,
/// never a crash.
#[async_trait]
pub trait Tab: Send + Sync {
    /// Probes for a live renderer host; `true` means a pong came back.
    async fn ping(&self) -> Result<bool, TabError>;
    /// Injects the renderer host into the page context.
    async fn inject_renderer(&self) -> Result<(), TabError>;
    /// Runs the extractor inside the page context and returns the capture.
    async fn capture_content(&self) -> Result<PageCapture, TabError>;
    /// Delivers one control message to the page context.
    async fn send(&self, message: ControlMessage) -> Result<(), TabError>;
}
