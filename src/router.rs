use log::{debug, info};
use std::collections::{BTreeMap, BTreeSet};

use crate::RouterId;
use crate::algorithms::{SourceRouter, TopologyView, calculate_shortest_paths};
use crate::protocol::{Advertisement, Cost, LinkState, RoutingTable};

/// Protocol state of one simulated router.
///
/// Routers never hold each other: links, table entries and advertisements
/// all refer to peers by id, and the simulator resolves those ids.
#[derive(Debug, Clone)]
pub struct RouterNode {
    pub id: RouterId,
    pub name: String,
    active: bool,
    next_sequence: u64,
    links: BTreeMap<RouterId, LinkState>,
    routing_table: RoutingTable,
    last_seen_sequence: BTreeMap<RouterId, u64>,
    // Every router this one has heard of through an accepted advertisement.
    known_routers: BTreeSet<RouterId>,
}

impl RouterNode {
    pub fn new(id: RouterId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            active: true,
            next_sequence: 0,
            links: BTreeMap::new(),
            routing_table: RoutingTable::new(),
            last_seen_sequence: BTreeMap::new(),
            known_routers: BTreeSet::new(),
        }
    }

    /// Adds a link unless one to `neighbor` already exists. Returns whether it was added.
    pub fn add_link(&mut self, neighbor: RouterId, cost: Cost, dead_threshold: u32) -> bool {
        if self.links.contains_key(&neighbor) {
            return false;
        }
        self.links
            .insert(neighbor, LinkState::with_dead_threshold(neighbor, cost, dead_threshold));
        true
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns `false` when the router was already off.
    pub fn shutdown(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        info!("Router {} switched off", self.id);
        true
    }

    /// Returns `false` when the router was already on.
    pub fn start(&mut self) -> bool {
        if self.active {
            return false;
        }
        self.active = true;
        info!("Router {} switched on", self.id);
        true
    }

    pub fn links(&self) -> &BTreeMap<RouterId, LinkState> {
        &self.links
    }

    pub(crate) fn links_mut(&mut self) -> &mut BTreeMap<RouterId, LinkState> {
        &mut self.links
    }

    /// Sequence number the next origination will carry.
    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    pub(crate) fn take_sequence(&mut self) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        sequence
    }

    pub fn last_seen_sequence(&self, origin: RouterId) -> Option<u64> {
        self.last_seen_sequence.get(&origin).copied()
    }

    /// Current table, as last computed.
    pub fn routing_table(&self) -> &RoutingTable {
        &self.routing_table
    }

    /// Starts a new heartbeat cycle for this router.
    ///
    /// The table is rebuilt from the router's own links only; remote
    /// knowledge comes back through the advertisements of this cycle.
    pub fn originate<V>(&mut self, time_to_live: u32, view: &V) -> Option<Advertisement>
    where
        V: TopologyView + ?Sized,
    {
        if !self.active {
            return None;
        }

        self.routing_table.clear();
        let advertisement = Advertisement::originate(self, time_to_live);
        self.last_seen_sequence
            .insert(self.id, advertisement.sequence());
        self.recompute(None, view);

        Some(advertisement)
    }

    /// Handles an advertisement handed over by `sender`.
    ///
    /// Returns whether it was accepted. Inactive routers, duplicates and
    /// stale sequences are dropped without further effect.
    pub fn receive<V>(
        &mut self,
        sender: RouterId,
        advertisement: &mut Advertisement,
        view: &V,
    ) -> bool
    where
        V: TopologyView + ?Sized,
    {
        if !self.active {
            debug!(
                "Router {} is off, dropping advertisement from {}",
                self.id,
                advertisement.origin()
            );
            return false;
        }

        let origin = advertisement.origin();
        let sequence = advertisement.sequence();
        if self
            .last_seen_sequence
            .get(&origin)
            .is_some_and(|seen| *seen >= sequence)
        {
            debug!(
                "Router {} dropping advertisement from {} seq {} (duplicate or stale)",
                self.id, origin, sequence
            );
            return false;
        }
        self.last_seen_sequence.insert(origin, sequence);

        if let Some(link) = self.links.get_mut(&sender) {
            link.reset_freshness();
        }

        debug!(
            "Router {} accepted advertisement from {} seq {} via {}",
            self.id, origin, sequence, sender
        );

        self.recompute(Some(&*advertisement), view);
        advertisement.extend(self, sender);
        true
    }

    /// Table for inspection, computed on first use.
    pub fn shortest_path_table<V>(&mut self, view: &V) -> &RoutingTable
    where
        V: TopologyView + ?Sized,
    {
        if self.routing_table.is_empty() {
            self.recompute(None, view);
        }
        &self.routing_table
    }

    fn recompute<V>(&mut self, advertisement: Option<&Advertisement>, view: &V)
    where
        V: TopologyView + ?Sized,
    {
        if let Some(advertisement) = advertisement {
            self.known_routers.insert(advertisement.origin());
            self.known_routers
                .extend(advertisement.origin_links().keys().copied());
        }

        let source = SourceRouter {
            id: self.id,
            name: &self.name,
            links: &self.links,
        };
        let known = self.known_routers.iter().copied();
        self.routing_table = calculate_shortest_paths(&source, known, view);
    }
}
