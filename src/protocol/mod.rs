pub mod link_state;
pub mod messages;
pub mod routing_table;

pub use link_state::*;
pub use messages::*;
pub use routing_table::*;
