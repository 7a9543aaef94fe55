use log::{debug, info};
use std::collections::{BTreeMap, VecDeque};

use crate::RouterId;
use crate::error::{Result, RoutingError};
use crate::router::RouterNode;
use super::LinkState;

/// Hop budget given to every freshly originated advertisement.
pub const DEFAULT_TIME_TO_LIVE: u32 = 10;

/// One pending hand-off: `sender` passes the advertisement to `receiver`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayHop {
    pub sender: RouterId,
    pub receiver: RouterId,
}

/// Link-state advertisement: what one router knew about its links when it
/// originated, plus the hand-offs still needed to flood it.
#[derive(Debug, Clone)]
pub struct Advertisement {
    origin: RouterId,
    sequence: u64,
    time_to_live: u32,
    origin_links: BTreeMap<RouterId, LinkState>,
    relay_queue: VecDeque<RelayHop>,
}

impl Advertisement {
    /// Builds a new advertisement for `router` and queues one hand-off per neighbor.
    ///
    /// Every link of the originating router counts this as a heartbeat cycle,
    /// which is what eventually ages out neighbors that stay silent.
    pub fn originate(router: &mut RouterNode, time_to_live: u32) -> Self {
        let origin = router.id;
        let sequence = router.take_sequence();
        let origin_links = router.links().clone();

        let mut relay_queue = VecDeque::with_capacity(origin_links.len());
        for (neighbor, link) in router.links_mut().iter_mut() {
            if link.mark_cycle_elapsed(true) {
                info!("Router {}: link to {} aged out", origin, neighbor);
            }
            relay_queue.push_back(RelayHop {
                sender: origin,
                receiver: *neighbor,
            });
        }

        debug!(
            "Router {} originated advertisement seq {} towards {} neighbors",
            origin,
            sequence,
            relay_queue.len()
        );

        Self {
            origin,
            sequence,
            time_to_live,
            origin_links,
            relay_queue,
        }
    }

    pub fn origin(&self) -> RouterId {
        self.origin
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn time_to_live(&self) -> u32 {
        self.time_to_live
    }

    pub fn origin_links(&self) -> &BTreeMap<RouterId, LinkState> {
        &self.origin_links
    }

    pub fn pending(&self) -> impl Iterator<Item = &RelayHop> {
        self.relay_queue.iter()
    }

    pub fn is_alive(&self) -> bool {
        self.time_to_live > 0 && !self.relay_queue.is_empty()
    }

    /// Pops the next hand-off in FIFO order.
    pub fn relay_step(&mut self) -> Result<RelayHop> {
        self.relay_queue.pop_front().ok_or(RoutingError::EmptyQueue {
            origin: self.origin,
            sequence: self.sequence,
        })
    }

    /// Continues the flood from `from` to all of its neighbors but `exclude`.
    ///
    /// Spends one unit of time-to-live; once exhausted nothing more is queued.
    pub fn extend(&mut self, from: &mut RouterNode, exclude: RouterId) {
        if self.time_to_live == 0 {
            return;
        }

        let sender = from.id;
        for (neighbor, link) in from.links_mut().iter_mut() {
            if *neighbor == exclude {
                continue;
            }
            link.mark_cycle_elapsed(false);
            self.relay_queue.push_back(RelayHop {
                sender,
                receiver: *neighbor,
            });
        }

        self.time_to_live -= 1;
    }
}
