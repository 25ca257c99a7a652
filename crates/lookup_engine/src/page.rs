use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};

use lookup_core::{update, ControlMessage, DismissTimeout, Effect, Msg, Phase, SurfaceState};
use lookup_logging::{lookup_debug, lookup_trace};

use crate::extract::{capture_page, PageCapture};
use crate::tab::{Tab, TabError};

/// Fixed auto-dismiss intervals for mounted surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RendererTiming {
    /// Processing and streaming surfaces linger long enough to read.
    pub reading: Duration,
    /// Error surfaces go away sooner.
    pub error: Duration,
}

impl Default for RendererTiming {
    fn default() -> Self {
        Self {
            reading: Duration::from_secs(120),
            error: Duration::from_secs(30),
        }
    }
}

impl RendererTiming {
    fn for_timeout(&self, timeout: DismissTimeout) -> Duration {
        match timeout {
            DismissTimeout::Reading => self.reading,
            DismissTimeout::Error => self.error,
        }
    }
}

/// What the overlay shows right now, as the page host has rendered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceSnapshot {
    pub phase: Phase,
    pub status: Option<String>,
    pub content: String,
}

#[derive(Debug, Default)]
struct SurfaceModel {
    phase: Phase,
    status: Option<String>,
    content: String,
}

enum RendererInput {
    Control(ControlMessage),
    CloseClicked,
}

struct RendererHandle {
    tx: mpsc::UnboundedSender<RendererInput>,
    surface: Arc<Mutex<SurfaceModel>>,
}

/// In-process stand-in for a browser tab: owns the page document, hosts the
/// renderer once injected, and answers readiness pings. The orchestrator
/// talks to it only through the [`Tab`] trait, exactly as it would to a real
/// page context.
pub struct InProcessTab {
    html: String,
    url: String,
    timing: RendererTiming,
    renderer: Mutex<Option<RendererHandle>>,
}

impl InProcessTab {
    pub fn new(html: impl Into<String>, url: impl Into<String>) -> Self {
        Self::with_timing(html, url, RendererTiming::default())
    }

    pub fn with_timing(
        html: impl Into<String>,
        url: impl Into<String>,
        timing: RendererTiming,
    ) -> Self {
        Self {
            html: html.into(),
            url: url.into(),
            timing,
            renderer: Mutex::new(None),
        }
    }

    /// Snapshot of the overlay, or `None` when no surface is mounted.
    pub fn surface(&self) -> Option<SurfaceSnapshot> {
        let renderer = self.renderer.lock().expect("renderer lock");
        let handle = renderer.as_ref()?;
        let surface = handle.surface.lock().expect("surface lock");
        if surface.phase == Phase::Absent {
            return None;
        }
        Some(SurfaceSnapshot {
            phase: surface.phase,
            status: surface.status.clone(),
            content: surface.content.clone(),
        })
    }

    /// Simulates the user clicking the surface's close control.
    pub fn click_close(&self) -> Result<(), TabError> {
        self.dispatch(RendererInput::CloseClicked)
    }

    fn dispatch(&self, input: RendererInput) -> Result<(), TabError> {
        let renderer = self.renderer.lock().expect("renderer lock");
        let handle = renderer
            .as_ref()
            .ok_or_else(|| TabError::Unreachable("no renderer host in page".to_string()))?;
        handle
            .tx
            .send(input)
            .map_err(|_| TabError::Unreachable("renderer host stopped".to_string()))
    }
}

#[async_trait]
impl Tab for InProcessTab {
    async fn ping(&self) -> Result<bool, TabError> {
        let renderer = self.renderer.lock().expect("renderer lock");
        Ok(renderer.as_ref().is_some_and(|h| !h.tx.is_closed()))
    }

    async fn inject_renderer(&self) -> Result<(), TabError> {
        let mut renderer = self.renderer.lock().expect("renderer lock");
        if renderer.as_ref().is_some_and(|h| !h.tx.is_closed()) {
            // One host per page; a second injection is a no-op.
            return Ok(());
        }
        let (tx, rx) = mpsc::unbounded_channel();
        let surface = Arc::new(Mutex::new(SurfaceModel::default()));
        tokio::spawn(renderer_loop(rx, surface.clone(), self.timing));
        *renderer = Some(RendererHandle { tx, surface });
        lookup_debug!("renderer host injected into page context");
        Ok(())
    }

    async fn capture_content(&self) -> Result<PageCapture, TabError> {
        Ok(capture_page(&self.html, &self.url))
    }

    async fn send(&self, message: ControlMessage) -> Result<(), TabError> {
        self.dispatch(RendererInput::Control(message))
    }
}

/// Runs the display renderer for one page. Messages are handled strictly one
/// at a time, DOM mutation included, so the surface needs no locking beyond
/// the snapshot mutex. A single pending dismiss deadline covers the current
/// surface; replaced surfaces leave their timers to die as stale.
async fn renderer_loop(
    mut rx: mpsc::UnboundedReceiver<RendererInput>,
    surface: Arc<Mutex<SurfaceModel>>,
    timing: RendererTiming,
) {
    let mut state = SurfaceState::new();
    let mut dismiss: Option<(u64, Instant)> = None;

    loop {
        let msg = if let Some((generation, deadline)) = dismiss {
            tokio::select! {
                input = rx.recv() => match input {
                    Some(input) => input_to_msg(input),
                    None => break,
                },
                _ = sleep_until(deadline) => {
                    dismiss = None;
                    Some(Msg::DismissElapsed { generation })
                }
            }
        } else {
            match rx.recv().await {
                Some(input) => input_to_msg(input),
                None => break,
            }
        };

        let Some(msg) = msg else { continue };
        lookup_trace!("renderer msg: {msg:?}");
        let (next, effects) = update(state, msg);
        state = next;
        for effect in effects {
            apply_effect(&surface, &mut dismiss, timing, effect);
        }
    }
}

fn input_to_msg(input: RendererInput) -> Option<Msg> {
    match input {
        RendererInput::Control(message) => message.into_renderer_msg(),
        RendererInput::CloseClicked => Some(Msg::CloseClicked),
    }
}

fn apply_effect(
    surface: &Arc<Mutex<SurfaceModel>>,
    dismiss: &mut Option<(u64, Instant)>,
    timing: RendererTiming,
    effect: Effect,
) {
    let mut model = surface.lock().expect("surface lock");
    match effect {
        Effect::MountProcessing { message, .. } => {
            model.phase = Phase::Processing;
            model.status = Some(message);
            model.content.clear();
        }
        Effect::MountStreaming { .. } => {
            model.phase = Phase::Streaming;
            model.status = None;
            model.content.clear();
        }
        Effect::AppendContent { markup, .. } => model.content.push_str(&markup),
        Effect::MountError { message, .. } => {
            model.phase = Phase::Error;
            model.status = None;
            model.content = message;
        }
        Effect::Unmount => {
            model.phase = Phase::Absent;
            model.status = None;
            model.content.clear();
            *dismiss = None;
        }
        Effect::ScheduleDismiss { generation, timeout } => {
            *dismiss = Some((generation, Instant::now() + timing.for_timeout(timeout)));
        }
    }
}
