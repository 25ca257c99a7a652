use serde::{Deserialize, Serialize};

/// One incremental fragment of generated text, tagged with its position in the
/// session's chunk sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    pub index: u32,
    pub content: String,
}

/// Wire schema for one-way notifications from the orchestrator context to the
/// page context. Internally tagged on `action`; decoding an unknown action is
/// a hard error, never a silent skip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ControlMessage {
    /// A cycle has started; show a status surface while the backend works.
    ShowProcessing { message: String },
    /// One generated chunk to append to the explanation surface.
    ShowExplanation { explanation: Explanation },
    /// The cycle failed; replace any surface with an error surface.
    ShowError { error: String },
    /// Readiness probe from the orchestrator context.
    Ping,
    /// Readiness reply from the page context.
    Pong,
}

impl ControlMessage {
    /// Maps a control message onto a renderer message. `Ping`/`Pong` are
    /// transport-level and carry no renderer semantics.
    pub fn into_renderer_msg(self) -> Option<Msg> {
        match self {
            ControlMessage::ShowProcessing { message } => Some(Msg::ShowProcessing { message }),
            ControlMessage::ShowExplanation { explanation } => Some(Msg::ChunkReceived {
                index: explanation.index,
                content: explanation.content,
            }),
            ControlMessage::ShowError { error } => Some(Msg::ShowError { error }),
            ControlMessage::Ping | ControlMessage::Pong => None,
        }
    }
}

/// Input to the renderer state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// `showProcessing` control message.
    ShowProcessing { message: String },
    /// One `showExplanation` chunk; index 0 starts a new session.
    ChunkReceived { index: u32, content: String },
    /// `showError` control message.
    ShowError { error: String },
    /// User clicked the surface's close control.
    CloseClicked,
    /// An auto-dismiss timer scheduled for the given surface generation fired.
    DismissElapsed { generation: u64 },
}
