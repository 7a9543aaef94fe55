use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::RouterId;
use crate::error::{Result, RoutingError};
use crate::protocol::Cost;

/// Static description of the network the simulator is built from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    pub routers: Vec<RouterRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterRecord {
    pub id: RouterId,
    pub name: String,
    #[serde(default)]
    pub neighbors: Vec<NeighborRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeighborRecord {
    pub neighbor_id: RouterId,
    #[serde(default = "default_cost")]
    pub cost: Cost,
}

fn default_cost() -> Cost {
    1
}

/// Undirected weighted edge, as the simulator wires it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub a: RouterId,
    pub b: RouterId,
    pub cost: Cost,
}

impl Topology {
    pub fn new() -> Self {
        Self {
            routers: Vec::new(),
        }
    }

    pub fn add_router(&mut self, id: RouterId, name: impl Into<String>) {
        self.routers.push(RouterRecord {
            id,
            name: name.into(),
            neighbors: Vec::new(),
        });
    }

    /// Records `neighbor` under `router`, which must already be declared.
    ///
    /// An unknown `neighbor` is accepted here and reported by [`Topology::validate`].
    pub fn add_neighbor(&mut self, router: RouterId, neighbor: RouterId, cost: Cost) -> Result<()> {
        let record = self
            .routers
            .iter_mut()
            .find(|r| r.id == router)
            .ok_or_else(|| {
                RoutingError::MalformedTopology(format!(
                    "connection to {} declared for unknown router {}",
                    neighbor, router
                ))
            })?;
        record.neighbors.push(NeighborRecord {
            neighbor_id: neighbor,
            cost,
        });
        Ok(())
    }

    /// Loads a topology, as JSON when the file ends in `.json`, else in the line format.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        let topology = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)?
        } else {
            Self::parse(&content)?
        };
        topology.validate()?;

        debug!("Loaded topology with {} routers from {}", topology.routers.len(), path.display());
        Ok(topology)
    }

    /// Parses the line format.
    ///
    /// A line containing a `.` declares a router as `<id> <name>`; any other
    /// non-blank line is a `<neighbor id> [cost]` connection of the last
    /// declared router, with the cost defaulting to 1.
    pub fn parse(content: &str) -> Result<Self> {
        let mut topology = Self::new();
        let mut current: Option<RouterId> = None;

        for (index, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();

            if line.contains('.') {
                if fields.len() != 2 {
                    return Err(malformed(index, format!("invalid router information : {}", line)));
                }
                let id = parse_number(fields[0], index)?;
                topology.add_router(id, fields[1]);
                current = Some(id);
                continue;
            }

            let Some(router) = current else {
                return Err(malformed(index, format!("connection before any router : {}", line)));
            };
            if fields.len() > 2 {
                return Err(malformed(index, format!("invalid connection information : {}", line)));
            }
            let neighbor = parse_number(fields[0], index)?;
            let cost = match fields.get(1) {
                Some(field) => parse_number(field, index)?,
                None => default_cost(),
            };
            topology.add_neighbor(router, neighbor, cost)?;
        }

        Ok(topology)
    }

    /// Checks that ids are unique and every connection points at a declared router.
    pub fn validate(&self) -> Result<()> {
        let mut seen = BTreeMap::new();
        for record in &self.routers {
            if seen.insert(record.id, record.name.as_str()).is_some() {
                return Err(RoutingError::MalformedTopology(format!(
                    "router {} declared twice",
                    record.id
                )));
            }
        }

        for record in &self.routers {
            for neighbor in &record.neighbors {
                if !seen.contains_key(&neighbor.neighbor_id) {
                    return Err(RoutingError::MalformedTopology(format!(
                        "router {} connects to unknown router {}",
                        record.id, neighbor.neighbor_id
                    )));
                }
                if neighbor.neighbor_id == record.id {
                    return Err(RoutingError::MalformedTopology(format!(
                        "router {} connects to itself",
                        record.id
                    )));
                }
            }
        }

        Ok(())
    }

    /// Every connection as an undirected edge, in declaration order.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.routers.iter().flat_map(|record| {
            record.neighbors.iter().map(move |neighbor| Edge {
                a: record.id,
                b: neighbor.neighbor_id,
                cost: neighbor.cost,
            })
        })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(field: &str, index: usize) -> Result<T> {
    field
        .parse()
        .map_err(|_| malformed(index, format!("not a number : {}", field)))
}

fn malformed(index: usize, detail: String) -> RoutingError {
    RoutingError::MalformedTopology(format!("line {}: {}", index + 1, detail))
}
