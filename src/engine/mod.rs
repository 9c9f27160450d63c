//! Engine front: configuration, search limits, time management, and the
//! controller that turns requests into searches.
//!
//! Everything here runs at the request boundary. Invalid settings are
//! rejected before any worker thread starts.

pub mod config;
mod controller;
mod error;
pub mod limits;
pub mod time;

pub use config::EngineConfig;
pub use controller::Engine;
pub use error::{ConfigError, EngineError};
pub use limits::{Clock, SearchLimits, MAX_DEPTH};
pub use time::{TimeConfig, TimeManager};
