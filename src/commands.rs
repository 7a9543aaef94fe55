//! Command interpreter driving a [`NetworkSimulator`].
//!
//! Commands are single letters, optionally followed by a router id:
//! `C` runs a flooding cycle, `S <id>` / `T <id>` shut a router down or
//! start it up, `P <id>` prints its routing table and `Q` quits.

use std::fmt::{self, Write};
use std::str::FromStr;

use crate::RouterId;
use crate::error::{Result, RoutingError};
use crate::network::{Activation, CycleReport, NetworkSimulator};

pub const MENU: &str = "C = Continue\n\
                        Q = Quit\n\
                        S ID = Shut Down Router ID\n\
                        T ID = Start Up Router ID\n\
                        P ID = Print Routing Table of Router ID\n\
                        \n\
                        Enter your choice : ";

pub const SEPARATOR: &str = ", ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Continue,
    Shutdown(RouterId),
    Start(RouterId),
    PrintTable(RouterId),
    Quit,
}

impl FromStr for Command {
    type Err = RoutingError;

    fn from_str(input: &str) -> Result<Self> {
        let invalid = || RoutingError::InvalidCommand(input.trim().to_string());
        let mut tokens = input.split_whitespace();
        let verb = tokens.next().ok_or_else(invalid)?.to_ascii_uppercase();
        let argument = tokens.next();
        if tokens.next().is_some() {
            return Err(invalid());
        }

        let router = || -> Result<RouterId> {
            argument
                .and_then(|arg| arg.parse().ok())
                .ok_or_else(invalid)
        };

        match (verb.as_str(), argument) {
            ("C", None) => Ok(Command::Continue),
            ("Q", None) => Ok(Command::Quit),
            ("S", Some(_)) => Ok(Command::Shutdown(router()?)),
            ("T", Some(_)) => Ok(Command::Start(router()?)),
            ("P", Some(_)) => Ok(Command::PrintTable(router()?)),
            _ => Err(invalid()),
        }
    }
}

/// Printable snapshot of one router's table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableListing {
    pub router: RouterId,
    pub active: bool,
    /// `(destination name, next hop)` for every live entry.
    pub routes: Vec<(String, RouterId)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Cycle(CycleReport),
    Activation(Activation),
    Table(TableListing),
    Quit,
}

/// Runs `command` against the simulator.
///
/// Unknown router ids come back as [`RoutingError::UnknownRouter`]; the
/// simulator itself is left untouched in that case.
pub fn execute(simulator: &mut NetworkSimulator, command: Command) -> Result<Reply> {
    match command {
        Command::Continue => simulator.trigger_cycle().map(Reply::Cycle),
        Command::Shutdown(id) => simulator.set_router_active(id, false).map(Reply::Activation),
        Command::Start(id) => simulator.set_router_active(id, true).map(Reply::Activation),
        Command::PrintTable(id) => {
            let routes = simulator
                .routing_table_of(id)?
                .live_routes()
                .map(|entry| (entry.destination_name.clone(), entry.next_hop))
                .collect();
            let active = simulator.router(id).is_some_and(|router| router.is_active());
            Ok(Reply::Table(TableListing { router: id, active, routes }))
        }
        Command::Quit => Ok(Reply::Quit),
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Cycle(_) => write!(f, "Link State Packets sent over the network."),
            Reply::Activation(Activation::Switched { router, active }) => {
                write!(f, "Router {} switched {}.", router, on_off(*active))
            }
            Reply::Activation(Activation::Unchanged { router, active }) => {
                write!(f, "Router {} already {}.", router, on_off(*active))
            }
            Reply::Table(listing) => write!(f, "{}", listing),
            Reply::Quit => write!(f, "Network disconnected."),
        }
    }
}

impl fmt::Display for TableListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut output = String::new();
        if self.active {
            writeln!(output, "Router {} routing table:", self.router)?;
        } else {
            writeln!(output, "Router {} is currently inactive.", self.router)?;
            writeln!(output, "Last available routing table:")?;
        }
        for (name, next_hop) in &self.routes {
            writeln!(output, "{}{}{}", name, SEPARATOR, next_hop)?;
        }
        f.write_str(output.trim_end())
    }
}

fn on_off(active: bool) -> &'static str {
    if active { "on" } else { "off" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulatorConfig;
    use crate::network::Topology;

    fn simulator() -> NetworkSimulator {
        let topology = Topology::parse("0 A.net\n1\n1 B.net\n2 3\n2 C.net").unwrap();
        NetworkSimulator::new(&topology, SimulatorConfig::default()).unwrap()
    }

    #[test]
    fn parses_commands_case_insensitively() {
        assert_eq!("c".parse::<Command>().unwrap(), Command::Continue);
        assert_eq!("Q".parse::<Command>().unwrap(), Command::Quit);
        assert_eq!("s 3".parse::<Command>().unwrap(), Command::Shutdown(3));
        assert_eq!("T 12".parse::<Command>().unwrap(), Command::Start(12));
        assert_eq!("  p   0 ".parse::<Command>().unwrap(), Command::PrintTable(0));
    }

    #[test]
    fn rejects_invalid_input() {
        for input in ["", "x", "c 1", "s", "s x", "p 1 2", "q now", "s -1"] {
            assert!(
                matches!(input.parse::<Command>(), Err(RoutingError::InvalidCommand(_))),
                "accepted {:?}",
                input
            );
        }
    }

    #[test]
    fn prints_live_routes() {
        let mut simulator = simulator();
        let reply = execute(&mut simulator, Command::PrintTable(0)).unwrap();
        assert_eq!(
            reply.to_string(),
            "Router 0 routing table:\nA.net, 0\nB.net, 1\nC.net, 1"
        );
    }

    #[test]
    fn reports_switches_and_inactive_tables() {
        let mut simulator = simulator();

        let reply = execute(&mut simulator, Command::Shutdown(2)).unwrap();
        assert_eq!(reply.to_string(), "Router 2 switched off.");
        let reply = execute(&mut simulator, Command::Shutdown(2)).unwrap();
        assert_eq!(reply.to_string(), "Router 2 already off.");

        let reply = execute(&mut simulator, Command::PrintTable(2)).unwrap();
        assert!(reply
            .to_string()
            .starts_with("Router 2 is currently inactive.\nLast available routing table:\n"));

        let reply = execute(&mut simulator, Command::Start(2)).unwrap();
        assert_eq!(reply.to_string(), "Router 2 switched on.");
    }

    #[test]
    fn unknown_router_surfaces_as_error() {
        let mut simulator = simulator();
        let err = execute(&mut simulator, Command::PrintTable(99)).unwrap_err();
        assert_eq!(err.to_string(), "Invalid Router ID : 99.");
    }

    #[test]
    fn continue_runs_a_cycle() {
        let mut simulator = simulator();
        let reply = execute(&mut simulator, Command::Continue).unwrap();
        assert_eq!(reply.to_string(), "Link State Packets sent over the network.");
        assert_eq!(simulator.router(1).unwrap().next_sequence(), 2);
    }
}
