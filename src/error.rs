//! Error types for the link-state simulator.

use thiserror::Error;

use crate::RouterId;

#[derive(Debug, Error)]
pub enum RoutingError {
    /// An operation referenced a router that is not part of the network.
    #[error("Invalid Router ID : {0}.")]
    UnknownRouter(RouterId),

    /// The topology description cannot be turned into a network.
    #[error("Malformed topology: {0}")]
    MalformedTopology(String),

    /// A relay step was requested on an advertisement with nothing left to deliver.
    #[error("Advertisement from router {origin} (seq {sequence}) has no pending hand-off")]
    EmptyQueue { origin: RouterId, sequence: u64 },

    #[error("Invalid input: {0}")]
    InvalidCommand(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RoutingError>;
