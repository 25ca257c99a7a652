//! Lookup core: pure renderer state machine and control-message schema.
mod effect;
mod markup;
mod msg;
mod state;
mod update;

pub use effect::{DismissTimeout, Effect};
pub use markup::render_inline_markup;
pub use msg::{ControlMessage, Explanation, Msg};
pub use state::{Phase, SurfaceState};
pub use update::update;
