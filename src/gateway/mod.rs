//! Gateway layer - remote HTTP operations against the cloud's app API

pub mod actor;
pub mod client;

pub use actor::GatewayActor;
pub use client::GatewayClient;
