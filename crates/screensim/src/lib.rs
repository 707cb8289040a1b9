//! screensim command-line front end
//!
//! Runs the screening strategies selected in a `RunConfig`, then renders the
//! outcomes as a text report and, optionally, a JSON summary.

pub mod config;
pub mod format;
pub mod logging;
pub mod report;
pub mod run;

pub use config::RunConfig;
pub use logging::init_logging;
pub use run::{StrategyRun, run};
