/// Lifecycle phase of the popup surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Absent,
    Processing,
    Streaming,
    Error,
}

/// Renderer state for one tab. At most one surface exists at a time; the
/// generation number is the explicit handle for the current surface, so a
/// closing surface and a new cycle's creation can never be confused.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SurfaceState {
    phase: Phase,
    content: String,
    generation: u64,
}

impl SurfaceState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Accumulated markup of the current surface (empty when absent).
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Identity of the current surface; stale dismiss timers carry an older
    /// generation and are ignored.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Discards any existing surface and reserves a fresh identity.
    pub(crate) fn mount(&mut self, phase: Phase) -> u64 {
        self.generation += 1;
        self.phase = phase;
        self.content.clear();
        self.generation
    }

    pub(crate) fn append(&mut self, markup: &str) {
        self.content.push_str(markup);
    }

    pub(crate) fn unmount(&mut self) {
        self.phase = Phase::Absent;
        self.content.clear();
    }
}
