// Library surface for the binary and for headless integration tests.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod controller;
pub mod error;
pub mod input;
pub mod logging;
pub mod narrator;
pub mod runtime;
pub mod samples;
pub mod session;
pub mod stats;
pub mod ui;

pub use app::{App, KeyOutcome, RuntimeSettings};
