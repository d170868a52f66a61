//! Configuration structures for the engine and the CLI commands
//!
//! Each command converts its CLI arguments into a validated config struct
//! through a builder; the builders reject missing or out-of-range values at
//! construction time so the engine never sees a bad parameter.

mod collapse;
mod engine;
mod scan;

pub use collapse::{CollapseConfig, CollapseConfigBuilder};
pub use engine::{EngineConfig, EngineConfigBuilder};
pub use scan::{ScanConfig, ScanConfigBuilder};
