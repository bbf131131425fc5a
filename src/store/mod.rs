//! Store layer - central state management and command processing

pub mod actor;
pub mod commands;
pub mod state;

pub use actor::StoreActor;
pub use commands::consolidate;
pub use state::StoreState;
