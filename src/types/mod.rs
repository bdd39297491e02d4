//! Core type definitions.

mod port;

pub use port::{PortError, PortRange};
