use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::RouterId;
use super::{Cost, INFINITE_COST};

#[derive(Debug, Clone, Default)]
pub struct RoutingTable {
    entries: BTreeMap<RouterId, RouteEntry>,
}

#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub destination: RouterId,
    pub destination_name: String,
    pub cost: Cost,
    pub next_hop: RouterId,
}

impl RouteEntry {
    /// An entry that has not been relaxed yet: forwarding straight to the destination.
    pub fn new(destination: RouterId, destination_name: impl Into<String>, cost: Cost) -> Self {
        Self {
            destination,
            destination_name: destination_name.into(),
            cost,
            next_hop: destination,
        }
    }

    /// Never relaxed from its infinite default.
    pub fn is_dead(&self) -> bool {
        self.cost == INFINITE_COST && self.next_hop == self.destination
    }
}

// Entries are equal when they describe the same destination, whatever their cost.
impl PartialEq for RouteEntry {
    fn eq(&self, other: &Self) -> bool {
        self.destination_name == other.destination_name
    }
}

impl Eq for RouteEntry {}

// Cost ordering for the shortest-path frontier. Equal costs never report
// `Equal`: the left-hand entry always sorts first.
impl Ord for RouteEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.cost.cmp(&other.cost) {
            Ordering::Equal => Ordering::Less,
            ordering => ordering,
        }
    }
}

impl PartialOrd for RouteEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl RoutingTable {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn add_route(&mut self, entry: RouteEntry) {
        self.entries.insert(entry.destination, entry);
    }

    pub fn get_route(&self, destination: RouterId) -> Option<&RouteEntry> {
        self.entries.get(&destination)
    }

    pub fn get_route_mut(&mut self, destination: RouterId) -> Option<&mut RouteEntry> {
        self.entries.get_mut(&destination)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.values()
    }

    /// Entries worth showing: everything that was reached at least once.
    pub fn live_routes(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.values().filter(|entry| !entry.is_dead())
    }
}
