//! Scores for partial routes and candidate connections.
//!
//! Beam search ranks its partial paths with an injected [`ScoringFunction`];
//! the guided variant additionally ranks outgoing connections with a
//! [`ConnectionValue`] before expanding them.

use crate::network::{Connection, EdgeUsage, Minutes, Network, StationId};
use crate::route::Route;
use std::collections::HashSet;

/// A partial route just extended by `connection`
pub struct Candidate<'a> {
    pub route: &'a Route,
    pub connection: &'a Connection,
    /// Value of `connection` from [`ConnectionValue`], 0 when not computed
    pub edge_value: f64,
}

/// Ranks partial routes during beam search. Higher is better.
pub trait ScoringFunction {
    fn score(&self, network: &Network, usage: &EdgeUsage, candidate: &Candidate) -> f64;
    fn name(&self) -> &str;
}

/// Unconsumed connections outside `route` touching any of its stations
pub fn unused_nearby(network: &Network, usage: &EdgeUsage, route: &Route) -> usize {
    let mut seen = HashSet::new();
    for &station in route.stations() {
        for &(_, conn) in network.station(station).adjacency() {
            if !usage.is_used(conn) && !route.uses_connection(conn) {
                seen.insert(conn);
            }
        }
    }
    seen.len()
}

/// `connection_weight * edges - time + nearby_weight * unused_nearby`
///
/// Rewards long routes that leave reachable coverage next to them instead
/// of stranding it.
#[derive(Debug, Clone, Copy)]
pub struct CoverageScore {
    pub connection_weight: f64,
    pub nearby_weight: f64,
}

impl CoverageScore {
    pub fn new() -> Self {
        CoverageScore {
            connection_weight: 100.0,
            nearby_weight: 10.0,
        }
    }
}

impl Default for CoverageScore {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoringFunction for CoverageScore {
    fn score(&self, network: &Network, usage: &EdgeUsage, candidate: &Candidate) -> f64 {
        let route = candidate.route;
        let nearby = unused_nearby(network, usage, route) as f64;
        route.connection_count() as f64 * self.connection_weight - route.total_time() as f64
            + nearby * self.nearby_weight
    }

    fn name(&self) -> &str {
        "Coverage"
    }
}

/// `connection_weight * edges - time + value_weight * edge_value`
#[derive(Debug, Clone, Copy)]
pub struct GuidedScore {
    pub connection_weight: f64,
    pub value_weight: f64,
}

impl GuidedScore {
    pub fn new() -> Self {
        GuidedScore {
            connection_weight: 100.0,
            value_weight: 10.0,
        }
    }
}

impl Default for GuidedScore {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoringFunction for GuidedScore {
    fn score(&self, _network: &Network, _usage: &EdgeUsage, candidate: &Candidate) -> f64 {
        let route = candidate.route;
        route.connection_count() as f64 * self.connection_weight - route.total_time() as f64
            + candidate.edge_value * self.value_weight
    }

    fn name(&self) -> &str {
        "Guided"
    }
}

/// Value of taking a connection next.
///
/// `unused_at_destination - minutes / time_limit - penalty`, where the
/// penalty applies when the connection leaves less than `buffer` minutes
/// before the time limit. Consumed connections are worth `-inf`.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionValue {
    pub buffer: Minutes,
    pub penalty: f64,
}

impl ConnectionValue {
    pub fn new() -> Self {
        // the penalty matches the cost of one extra route in the quality function
        ConnectionValue { buffer: 10, penalty: 100.0 }
    }

    pub fn value(
        &self,
        network: &Network,
        usage: &EdgeUsage,
        from: StationId,
        connection: &Connection,
        route_time: Minutes,
        time_limit: Minutes,
    ) -> f64 {
        if usage.is_used(connection.id) {
            return f64::NEG_INFINITY;
        }

        let dest = connection.other_station(from);
        let nearby_unused = usage.unused_degree(network, dest) as f64;

        let arrival = route_time + connection.minutes;
        let penalty = if arrival > time_limit.saturating_sub(self.buffer) {
            self.penalty
        } else {
            0.0
        };

        nearby_unused - connection.minutes as f64 / time_limit.max(1) as f64 - penalty
    }
}

impl Default for ConnectionValue {
    fn default() -> Self {
        Self::new()
    }
}
