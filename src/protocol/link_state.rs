use crate::RouterId;

pub type Cost = u64;

/// Cost of a link that aged out, and of a destination nobody relaxed yet.
pub const INFINITE_COST: Cost = Cost::MAX;

/// Origination cycles a link may go without a refresh before it is unreachable.
pub const DEFAULT_DEAD_THRESHOLD: u32 = 2;

/// State of the link from the owning router to one of its neighbors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkState {
    pub neighbor: RouterId,
    initial_cost: Cost,
    current_cost: Cost,
    missed_cycles: u32,
    dead_threshold: u32,
}

impl LinkState {
    pub fn new(neighbor: RouterId, cost: Cost) -> Self {
        Self::with_dead_threshold(neighbor, cost, DEFAULT_DEAD_THRESHOLD)
    }

    pub fn with_dead_threshold(neighbor: RouterId, cost: Cost, dead_threshold: u32) -> Self {
        Self {
            neighbor,
            initial_cost: cost,
            current_cost: cost,
            missed_cycles: 0,
            dead_threshold: dead_threshold.max(1),
        }
    }

    pub fn initial_cost(&self) -> Cost {
        self.initial_cost
    }

    pub fn current_cost(&self) -> Cost {
        self.current_cost
    }

    pub fn missed_cycles(&self) -> u32 {
        self.missed_cycles
    }

    pub fn is_unreachable(&self) -> bool {
        self.current_cost == INFINITE_COST
    }

    /// A fresh advertisement came straight from `neighbor`.
    pub fn reset_freshness(&mut self) {
        self.missed_cycles = 0;
        self.current_cost = self.initial_cost;
    }

    /// Accounts for one relay attempt over this link.
    ///
    /// Only originations count as a heartbeat; forwarding someone else's
    /// advertisement leaves the counter alone. Returns `true` when this call
    /// is the one that aged the link out.
    pub fn mark_cycle_elapsed(&mut self, did_originate: bool) -> bool {
        if !did_originate {
            return false;
        }

        self.missed_cycles = self.missed_cycles.saturating_add(1);
        if self.missed_cycles == self.dead_threshold {
            self.current_cost = INFINITE_COST;
            return true;
        }
        false
    }
}
