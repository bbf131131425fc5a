//! Message types for inter-layer communication in the actor-based architecture.
//!
//! - `ui_events`: UI layer -> Store layer (user input)
//! - `gateway`: Store layer <-> Gateway layer (remote operations)
//! - `render`: Store layer -> UI layer (display state)

pub mod gateway;
pub mod render;
pub mod ui_events;

pub use gateway::{GatewayCommand, GatewayEvent};
pub use render::RenderState;
pub use ui_events::UiEvent;
