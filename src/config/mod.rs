//! Configuration management for portscan.
//!
//! Provides the XDG-compliant settings file that supplies defaults for
//! the command line.

mod settings;

pub use settings::{AppSettings, Paths};
