pub mod algorithms;
pub mod commands;
pub mod config;
pub mod error;
pub mod network;
pub mod protocol;
pub mod router;

pub use config::SimulatorConfig;
pub use error::{Result, RoutingError};
pub use network::{Activation, CycleReport, NetworkSimulator, Topology};
pub use router::RouterNode;

pub type RouterId = u64;
