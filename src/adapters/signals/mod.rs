//! Reset signal adapters.
//!
//! - `ResetFlag` - set programmatically (SIGHUP handler, presentation layer reload)
//! - `ConfigFileWatch` - fires when the configuration file is saved
//! - `AnyResetSignal` - fan-in over several signals

mod any_reset_signal;
mod config_file_watch;
mod reset_flag;

pub use any_reset_signal::AnyResetSignal;
pub use config_file_watch::ConfigFileWatch;
pub use reset_flag::ResetFlag;
