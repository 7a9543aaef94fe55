pub mod simulator;
pub mod topology;

pub use simulator::{Activation, CycleReport, NetworkSimulator};
pub use topology::{Edge, NeighborRecord, RouterRecord, Topology};
