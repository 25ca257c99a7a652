use std::sync::Once;

use lookup_core::{update, DismissTimeout, Effect, Msg, Phase, SurfaceState};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(lookup_logging::initialize_for_tests);
}

fn processing() -> Msg {
    Msg::ShowProcessing {
        message: "Generating explanation...".to_string(),
    }
}

#[test]
fn processing_replaces_existing_surface() {
    init_logging();
    let state = SurfaceState::new();
    let (state, _) = update(
        state,
        Msg::ChunkReceived {
            index: 0,
            content: "old".to_string(),
        },
    );
    let old_generation = state.generation();

    let (state, effects) = update(state, processing());

    assert_eq!(state.phase(), Phase::Processing);
    assert_eq!(state.content(), "");
    assert!(state.generation() > old_generation);
    assert!(matches!(
        effects[0],
        Effect::MountProcessing { .. }
    ));
    assert!(matches!(
        effects[1],
        Effect::ScheduleDismiss {
            timeout: DismissTimeout::Reading,
            ..
        }
    ));
}

#[test]
fn error_replaces_surface_and_schedules_short_dismiss() {
    init_logging();
    let state = SurfaceState::new();
    let (state, _) = update(state, processing());

    let (state, effects) = update(
        state,
        Msg::ShowError {
            error: "backend unreachable".to_string(),
        },
    );

    assert_eq!(state.phase(), Phase::Error);
    assert_eq!(state.content(), "backend unreachable");
    assert!(matches!(
        effects[1],
        Effect::ScheduleDismiss {
            timeout: DismissTimeout::Error,
            ..
        }
    ));
}

#[test]
fn close_is_idempotent() {
    init_logging();
    let state = SurfaceState::new();
    let (state, _) = update(state, processing());

    let (state, effects) = update(state, Msg::CloseClicked);
    assert_eq!(state.phase(), Phase::Absent);
    assert_eq!(effects, vec![Effect::Unmount]);

    // Second close with nothing mounted must be a silent no-op.
    let (state, effects) = update(state, Msg::CloseClicked);
    assert_eq!(state.phase(), Phase::Absent);
    assert!(effects.is_empty());
}

#[test]
fn dismiss_removes_current_surface() {
    init_logging();
    let state = SurfaceState::new();
    let (state, _) = update(state, processing());
    let generation = state.generation();

    let (state, effects) = update(state, Msg::DismissElapsed { generation });

    assert_eq!(state.phase(), Phase::Absent);
    assert_eq!(effects, vec![Effect::Unmount]);
}

#[test]
fn stale_dismiss_timer_is_ignored() {
    init_logging();
    let state = SurfaceState::new();
    let (state, _) = update(state, processing());
    let stale_generation = state.generation();

    // A new cycle replaces the surface before the old timer fires.
    let (state, _) = update(
        state,
        Msg::ChunkReceived {
            index: 0,
            content: "fresh".to_string(),
        },
    );

    let (state, effects) = update(
        state,
        Msg::DismissElapsed {
            generation: stale_generation,
        },
    );

    assert_eq!(state.phase(), Phase::Streaming);
    assert_eq!(state.content(), "fresh");
    assert!(effects.is_empty());
}
