use std::time::Duration;

use lookup_logging::{lookup_debug, lookup_warn};

use crate::tab::Tab;

/// How long to wait for a pong before assuming the renderer host is absent.
pub const PING_TIMEOUT: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeOutcome {
    /// A pong came back; the renderer host was already present.
    Ready,
    /// No pong; a renderer host was injected.
    Injected,
    /// Injection failed; deliveries for the rest of the cycle may silently
    /// go nowhere.
    Degraded,
}

/// Ensures a renderer host is reachable before control messages are sent.
///
/// Attempted at most once per cycle; the caller's trigger guard keeps two
/// cycles from racing the injection. Failure never aborts the cycle.
pub async fn ensure_renderer(tab: &dyn Tab, ping_timeout: Duration) -> HandshakeOutcome {
    match tokio::time::timeout(ping_timeout, tab.ping()).await {
        Ok(Ok(true)) => {
            lookup_debug!("renderer host answered ping");
            return HandshakeOutcome::Ready;
        }
        Ok(Ok(false)) => lookup_debug!("no renderer host in page context"),
        Ok(Err(err)) => lookup_debug!("ping failed: {err}"),
        Err(_) => lookup_debug!("ping timed out after {ping_timeout:?}"),
    }

    match tab.inject_renderer().await {
        Ok(()) => HandshakeOutcome::Injected,
        Err(err) => {
            lookup_warn!("renderer injection failed, delivery degraded: {err}");
            HandshakeOutcome::Degraded
        }
    }
}
