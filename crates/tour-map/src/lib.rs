//! Tour Map - Application Library
//!
//! Wires the CLI settings, logging and the map library together. The binary only
//! parses arguments and reports the outcome of [`run`].

mod app;
pub mod logging;

pub use app::settings::Settings;
pub use app::{AppError, FINISHED_TOURS, PLANNED_TOURS, RunReport, run};
