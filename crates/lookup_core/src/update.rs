use crate::markup::render_inline_markup;
use crate::{DismissTimeout, Effect, Msg, Phase, SurfaceState};

/// Pure update function: applies a message to the renderer state and returns
/// the DOM effects the page host must execute. Messages are handled one at a
/// time to completion, so the surface needs no locking.
pub fn update(mut state: SurfaceState, msg: Msg) -> (SurfaceState, Vec<Effect>) {
    let effects = match msg {
        Msg::ShowProcessing { message } => {
            let generation = state.mount(Phase::Processing);
            vec![
                Effect::MountProcessing {
                    generation,
                    message,
                },
                Effect::ScheduleDismiss {
                    generation,
                    timeout: DismissTimeout::Reading,
                },
            ]
        }
        Msg::ChunkReceived { index, content } => {
            let markup = render_inline_markup(&content);
            if index == 0 || state.phase() != Phase::Streaming {
                // Index 0 always starts a fresh surface. A later chunk with no
                // streaming surface to attach to recreates one seeded with that
                // chunk, matching the create-on-missing lookup of the original.
                let generation = state.mount(Phase::Streaming);
                state.append(&markup);
                vec![
                    Effect::MountStreaming { generation },
                    Effect::AppendContent { generation, markup },
                    Effect::ScheduleDismiss {
                        generation,
                        timeout: DismissTimeout::Reading,
                    },
                ]
            } else {
                state.append(&markup);
                vec![Effect::AppendContent {
                    generation: state.generation(),
                    markup,
                }]
            }
        }
        Msg::ShowError { error } => {
            let generation = state.mount(Phase::Error);
            state.append(&error);
            vec![
                Effect::MountError {
                    generation,
                    message: error,
                },
                Effect::ScheduleDismiss {
                    generation,
                    timeout: DismissTimeout::Error,
                },
            ]
        }
        Msg::CloseClicked => {
            if state.phase() == Phase::Absent {
                // Closing an absent surface is a no-op.
                Vec::new()
            } else {
                state.unmount();
                vec![Effect::Unmount]
            }
        }
        Msg::DismissElapsed { generation } => {
            if generation == state.generation() && state.phase() != Phase::Absent {
                state.unmount();
                vec![Effect::Unmount]
            } else {
                // Timer for an already-replaced surface; ignore.
                Vec::new()
            }
        }
    };

    (state, effects)
}
