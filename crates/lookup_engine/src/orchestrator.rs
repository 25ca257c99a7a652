use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use futures_util::StreamExt;

use lookup_core::{ControlMessage, Explanation};
use lookup_logging::{lookup_debug, lookup_error, lookup_info, lookup_warn};

use crate::backend::{ChatMessage, Generator, OllamaClient};
use crate::config::LookupSettings;
use crate::handshake::{ensure_renderer, PING_TIMEOUT};
use crate::prompt::build_prompt;
use crate::tab::Tab;
use crate::types::{CycleFailure, CyclePhase, TabId};

/// Context string substituted when page capture fails; the cycle continues.
pub const CONTEXT_UNAVAILABLE: &str = "Context unavailable";
/// Status line shown while the backend works.
pub const PROCESSING_MESSAGE: &str = "Generating explanation...";

/// A user-initiated request to explain selected text in one tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    pub selected_text: String,
    pub tab_id: TabId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The stream reached its terminal chunk; `chunks` were forwarded.
    Completed { chunks: u32 },
    /// The cycle failed; exactly one error message was sent to the page.
    Failed { failure: CycleFailure },
    /// A cycle was already running; nothing was started.
    AlreadyRunning,
}

/// Drives one explanation cycle at a time: handshake, capture, generation,
/// and ordered chunk delivery into the page context.
pub struct Orchestrator<G> {
    settings: LookupSettings,
    generator: G,
    trigger_enabled: AtomicBool,
    sessions: AtomicU64,
}

impl Orchestrator<OllamaClient> {
    /// Wires the orchestrator to the configured generation server.
    pub fn from_settings(settings: LookupSettings) -> Self {
        let generator = OllamaClient::new(settings.endpoint_url.clone());
        Self::new(settings, generator)
    }
}

impl<G: Generator> Orchestrator<G> {
    pub fn new(settings: LookupSettings, generator: G) -> Self {
        Self {
            settings,
            generator,
            trigger_enabled: AtomicBool::new(true),
            sessions: AtomicU64::new(0),
        }
    }

    /// Whether a new trigger would start a cycle right now.
    pub fn trigger_enabled(&self) -> bool {
        self.trigger_enabled.load(Ordering::SeqCst)
    }

    /// Runs one trigger-to-completion cycle against the given tab.
    ///
    /// The trigger is disabled for the whole cycle and re-enabled on every
    /// exit path; the flag is the only synchronization between overlapping
    /// trigger attempts. There is no cancellation: a started cycle runs to
    /// completion or failure.
    pub async fn run_cycle(&self, trigger: Trigger, tab: &dyn Tab) -> CycleOutcome {
        if self
            .trigger_enabled
            .compare_exchange(true, false, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            lookup_warn!(
                "trigger ignored, a cycle is already running (tab {})",
                trigger.tab_id
            );
            return CycleOutcome::AlreadyRunning;
        }
        let _guard = TriggerGuard(&self.trigger_enabled);

        let session = self.sessions.fetch_add(1, Ordering::SeqCst) + 1;
        lookup_logging::set_session(session);
        lookup_info!(
            "cycle started: tab={} selection_len={}",
            trigger.tab_id,
            trigger.selected_text.len()
        );

        match self.drive_cycle(&trigger, tab).await {
            Ok(chunks) => {
                lookup_info!("cycle completed: chunks={chunks}");
                CycleOutcome::Completed { chunks }
            }
            Err(failure) => {
                lookup_error!("cycle failed: {failure}");
                // Exactly one terminal error message per failed cycle. When
                // the tab itself is gone there is nothing to show.
                let error = ControlMessage::ShowError {
                    error: failure.to_string(),
                };
                if let Err(err) = tab.send(error).await {
                    lookup_warn!("error message undeliverable: {err}");
                }
                CycleOutcome::Failed { failure }
            }
        }
    }

    async fn drive_cycle(&self, trigger: &Trigger, tab: &dyn Tab) -> Result<u32, CycleFailure> {
        let mut phase = CyclePhase::Preparing;
        lookup_debug!("phase={phase:?}");

        let handshake = ensure_renderer(tab, PING_TIMEOUT).await;
        lookup_debug!("handshake={handshake:?}");

        let page_context = match tab.capture_content().await {
            Ok(capture) => {
                lookup_debug!(
                    "captured page: title={:?} body_len={} truncated={}",
                    capture.title,
                    capture.body.len(),
                    capture.truncated
                );
                capture.body
            }
            Err(err) => {
                // Extraction failure is recovered locally; the explanation is
                // still worth generating without context.
                lookup_warn!("page capture failed, using placeholder context: {err}");
                CONTEXT_UNAVAILABLE.to_string()
            }
        };

        // Fire-and-forget status message; delivery failure is only logged.
        let processing = ControlMessage::ShowProcessing {
            message: PROCESSING_MESSAGE.to_string(),
        };
        if let Err(err) = tab.send(processing).await {
            lookup_warn!("processing message undeliverable: {err}");
        }

        let prompt = build_prompt(&trigger.selected_text, &page_context);
        let messages = vec![ChatMessage::user(prompt)];

        phase = CyclePhase::AwaitingFirstChunk;
        lookup_debug!("phase={phase:?}");
        let mut stream = self
            .generator
            .chat_stream(&self.settings.model, messages)
            .await?;

        // Chunks are consumed strictly one at a time: read, forward, then
        // read the next. That total order is what the sequence index means.
        let mut index: u32 = 0;
        while let Some(item) = stream.next().await {
            let chunk = item?;
            if chunk.done {
                // Terminal chunk ends the sequence and is never forwarded.
                break;
            }
            let Some(message) = chunk.message else {
                return Err(CycleFailure::BackendProtocol(
                    "stream chunk missing message field".to_string(),
                ));
            };
            if index == 0 {
                phase = CyclePhase::Streaming;
                lookup_debug!("phase={phase:?}");
            }
            let control = ControlMessage::ShowExplanation {
                explanation: Explanation {
                    index,
                    content: message.content,
                },
            };
            if let Err(err) = tab.send(control).await {
                lookup_warn!("chunk {index} undeliverable: {err}");
            }
            index += 1;
        }

        Ok(index)
    }
}

/// Re-enables the trigger when the cycle unwinds, on every exit path.
struct TriggerGuard<'a>(&'a AtomicBool);

impl Drop for TriggerGuard<'_> {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}
