use log::{debug, info, warn};
use std::collections::BTreeMap;

use crate::RouterId;
use crate::config::SimulatorConfig;
use crate::error::{Result, RoutingError};
use crate::protocol::{Advertisement, RelayHop, RoutingTable};
use crate::router::RouterNode;
use super::Topology;

/// Result of an activation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// The router changed state and is now `active`.
    Switched { router: RouterId, active: bool },
    /// The router already was in the requested state.
    Unchanged { router: RouterId, active: bool },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub originated: usize,
    pub delivered: usize,
}

/// Owns every router and drives the flooding cycles between them.
#[derive(Debug)]
pub struct NetworkSimulator {
    routers: BTreeMap<RouterId, RouterNode>,
    config: SimulatorConfig,
}

impl NetworkSimulator {
    /// Builds the network and runs the initial convergence cycle.
    pub fn new(topology: &Topology, config: SimulatorConfig) -> Result<Self> {
        topology.validate()?;
        config.validate()?;

        let mut routers: BTreeMap<RouterId, RouterNode> = topology
            .routers
            .iter()
            .map(|record| (record.id, RouterNode::new(record.id, record.name.clone())))
            .collect();

        for edge in topology.edges() {
            for (from, to) in [(edge.a, edge.b), (edge.b, edge.a)] {
                let router = routers.get_mut(&from).ok_or_else(|| {
                    RoutingError::MalformedTopology(format!("unknown router {}", from))
                })?;
                router.add_link(to, edge.cost, config.dead_threshold);
            }
        }

        info!("Network created with {} routers", routers.len());

        let mut simulator = Self { routers, config };
        simulator.trigger_cycle()?;
        Ok(simulator)
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.routers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routers.is_empty()
    }

    pub fn router_ids(&self) -> impl Iterator<Item = RouterId> + '_ {
        self.routers.keys().copied()
    }

    pub fn router(&self, id: RouterId) -> Option<&RouterNode> {
        self.routers.get(&id)
    }

    /// One heartbeat: every active router originates, then each
    /// advertisement is relayed until it dies out.
    pub fn trigger_cycle(&mut self) -> Result<CycleReport> {
        let time_to_live = self.config.time_to_live;
        let ids: Vec<RouterId> = self.routers.keys().copied().collect();

        let mut advertisements = Vec::new();
        for id in ids {
            let originated =
                self.with_router(id, |router, view| router.originate(time_to_live, view));
            if let Some(advertisement) = originated.flatten() {
                advertisements.push(advertisement);
            }
        }

        let mut report = CycleReport {
            originated: advertisements.len(),
            delivered: 0,
        };

        for mut advertisement in advertisements {
            while advertisement.is_alive() {
                let hop = advertisement.relay_step()?;
                self.deliver(hop, &mut advertisement);
                report.delivered += 1;
            }
        }

        info!(
            "Cycle complete: {} advertisements, {} hand-offs",
            report.originated, report.delivered
        );
        Ok(report)
    }

    pub fn set_router_active(&mut self, id: RouterId, active: bool) -> Result<Activation> {
        let router = self
            .routers
            .get_mut(&id)
            .ok_or(RoutingError::UnknownRouter(id))?;

        let switched = if active { router.start() } else { router.shutdown() };
        if switched {
            Ok(Activation::Switched { router: id, active })
        } else {
            debug!("Router {} already {}", id, if active { "on" } else { "off" });
            Ok(Activation::Unchanged { router: id, active })
        }
    }

    /// Routing table of `id`, computed first if it never was.
    pub fn routing_table_of(&mut self, id: RouterId) -> Result<&RoutingTable> {
        if !self.routers.contains_key(&id) {
            return Err(RoutingError::UnknownRouter(id));
        }

        if self.routers[&id].routing_table().is_empty() {
            self.with_router(id, |router, view| {
                router.shortest_path_table(view);
            });
        }
        self.routers
            .get(&id)
            .map(RouterNode::routing_table)
            .ok_or(RoutingError::UnknownRouter(id))
    }

    fn deliver(&mut self, hop: RelayHop, advertisement: &mut Advertisement) {
        let delivered = self.with_router(hop.receiver, |router, view| {
            router.receive(hop.sender, advertisement, view)
        });
        if delivered.is_none() {
            warn!("Dropping hand-off to unknown router {}", hop.receiver);
        }
    }

    // Takes the router out of the arena so it can be mutated while the
    // others stay readable.
    fn with_router<T>(
        &mut self,
        id: RouterId,
        f: impl FnOnce(&mut RouterNode, &BTreeMap<RouterId, RouterNode>) -> T,
    ) -> Option<T> {
        let mut router = self.routers.remove(&id)?;
        let result = f(&mut router, &self.routers);
        self.routers.insert(id, router);
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Topology {
        let mut topology = Topology::new();
        topology.add_router(0, "A.net");
        topology.add_router(1, "B.net");
        topology.add_router(2, "C.net");
        topology.add_neighbor(0, 1, 4).unwrap();
        topology.add_neighbor(1, 2, 1).unwrap();
        topology.add_neighbor(2, 0, 1).unwrap();
        topology
    }

    #[test]
    fn construction_runs_a_cycle() {
        let simulator = NetworkSimulator::new(&triangle(), SimulatorConfig::default()).unwrap();
        assert_eq!(simulator.len(), 3);
        for id in simulator.router_ids() {
            assert_eq!(simulator.router(id).unwrap().next_sequence(), 1);
        }
        let table = simulator.router(0).unwrap().routing_table();
        let b = table.get_route(1).unwrap();
        assert_eq!((b.cost, b.next_hop), (2, 2));
    }

    #[test]
    fn unknown_router_is_reported() {
        let mut simulator = NetworkSimulator::new(&triangle(), SimulatorConfig::default()).unwrap();
        assert!(matches!(
            simulator.set_router_active(9, false),
            Err(RoutingError::UnknownRouter(9))
        ));
        assert!(matches!(
            simulator.routing_table_of(9),
            Err(RoutingError::UnknownRouter(9))
        ));
    }

    #[test]
    fn activation_reports_transitions() {
        let mut simulator = NetworkSimulator::new(&triangle(), SimulatorConfig::default()).unwrap();

        assert_eq!(
            simulator.set_router_active(1, true).unwrap(),
            Activation::Unchanged { router: 1, active: true }
        );
        assert_eq!(
            simulator.set_router_active(1, false).unwrap(),
            Activation::Switched { router: 1, active: false }
        );
        assert_eq!(
            simulator.set_router_active(1, false).unwrap(),
            Activation::Unchanged { router: 1, active: false }
        );
    }

    #[test]
    fn inactive_routers_do_not_originate() {
        let mut simulator = NetworkSimulator::new(&triangle(), SimulatorConfig::default()).unwrap();
        simulator.set_router_active(2, false).unwrap();

        let report = simulator.trigger_cycle().unwrap();
        assert_eq!(report.originated, 2);
        assert_eq!(simulator.router(2).unwrap().next_sequence(), 1);
    }

    #[test]
    fn isolated_router_only_knows_itself() {
        let mut topology = Topology::new();
        topology.add_router(5, "lonely.net");
        let mut simulator = NetworkSimulator::new(&topology, SimulatorConfig::default()).unwrap();

        let table = simulator.routing_table_of(5).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get_route(5).unwrap().cost, 0);
    }

    #[test]
    fn rejects_malformed_topology() {
        let mut topology = triangle();
        topology.add_neighbor(0, 42, 1).unwrap();
        let err = NetworkSimulator::new(&topology, SimulatorConfig::default()).unwrap_err();
        assert!(matches!(err, RoutingError::MalformedTopology(_)));
    }
}
