//! Library side of the `medmap` command: logging setup, the staged run
//! pipeline and the types it produces.

pub mod logging;
pub mod pipeline;
pub mod types;
