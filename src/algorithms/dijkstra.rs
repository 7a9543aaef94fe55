use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap, HashSet};

use crate::RouterId;
use crate::protocol::{Cost, INFINITE_COST, LinkState, RouteEntry, RoutingTable};
use crate::router::RouterNode;

/// Live view over the routers of the network, as seen by the route computation.
pub trait TopologyView {
    fn links_of(&self, router: RouterId) -> Option<&BTreeMap<RouterId, LinkState>>;
    fn name_of(&self, router: RouterId) -> Option<&str>;
}

impl TopologyView for BTreeMap<RouterId, RouterNode> {
    fn links_of(&self, router: RouterId) -> Option<&BTreeMap<RouterId, LinkState>> {
        self.get(&router).map(RouterNode::links)
    }

    fn name_of(&self, router: RouterId) -> Option<&str> {
        self.get(&router).map(|node| node.name.as_str())
    }
}

/// Everything the owner knows before relaxing.
pub struct SourceRouter<'a> {
    pub id: RouterId,
    pub name: &'a str,
    pub links: &'a BTreeMap<RouterId, LinkState>,
}

/// Computes the owner's routing table.
///
/// `unknown_distance` lists routers whose existence is known but whose
/// distance is not; direct links override them with the link cost. The
/// relaxation then reads each reached router's own link table through `view`.
pub fn calculate_shortest_paths<V, I>(
    source: &SourceRouter<'_>,
    unknown_distance: I,
    view: &V,
) -> RoutingTable
where
    V: TopologyView + ?Sized,
    I: IntoIterator<Item = RouterId>,
{
    let name_of = |id: RouterId| -> String {
        if id == source.id {
            return source.name.to_string();
        }
        view.name_of(id)
            .map(str::to_string)
            .unwrap_or_else(|| id.to_string())
    };

    let mut table = RoutingTable::new();
    for router in unknown_distance {
        table.add_route(RouteEntry::new(router, name_of(router), INFINITE_COST));
    }
    for (neighbor, link) in source.links {
        table.add_route(RouteEntry::new(*neighbor, name_of(*neighbor), link.current_cost()));
    }
    let mut own = RouteEntry::new(source.id, source.name, 0);
    own.next_hop = source.id;
    table.add_route(own);

    let mut frontier: BinaryHeap<Reverse<RouteEntry>> =
        table.iter().cloned().map(Reverse).collect();
    let mut visited: HashSet<RouterId> = HashSet::new();
    visited.insert(source.id);

    while let Some(Reverse(popped)) = frontier.pop() {
        // Stale duplicates left behind by later improvements
        if !visited.insert(popped.destination) {
            continue;
        }

        let Some(current) = table.get_route(popped.destination).cloned() else {
            continue;
        };
        let Some(links) = view.links_of(current.destination) else {
            continue;
        };

        for (next, link) in links {
            if visited.contains(next) {
                continue;
            }
            let Some(route) = table.get_route_mut(*next) else {
                continue;
            };

            let combined: Cost = current.cost.saturating_add(link.current_cost());
            if combined < route.cost {
                route.cost = combined;
                route.next_hop = current.next_hop;
                frontier.push(Reverse(route.clone()));
            }
        }
    }

    table
}
