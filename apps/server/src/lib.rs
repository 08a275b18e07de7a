pub mod api;
pub mod config;
mod domain_events;
pub mod error;
mod main_lib;
pub mod owner;

pub use main_lib::{build_state, init_tracing, AppState};
