pub mod dijkstra;

pub use dijkstra::{SourceRouter, TopologyView, calculate_shortest_paths};
