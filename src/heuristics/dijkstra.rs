//! Dijkstra-bounded route construction.
//!
//! Each route is the shortest-path tree branch from a start station to the
//! farthest station reachable within the time limit, over connections no
//! earlier route consumed.

use crate::config::SearchConfig;
use crate::heuristics::construction::RouteConstructor;
use crate::network::{ConnectionId, EdgeUsage, Minutes, Network, StationId};
use crate::route::Route;
use crate::solution::Solution;
use log::{debug, info};
use rand_chacha::ChaCha8Rng;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

/// Dijkstra Constructor
///
/// Deterministic. Starts from dead ends first so that branch lines get
/// covered before the trunk lines they hang off.
pub struct DijkstraConstructor {
    /// Join consecutive routes afterwards when a free connection links them
    pub merge_routes: bool,
}

impl DijkstraConstructor {
    pub fn new() -> Self {
        DijkstraConstructor { merge_routes: true }
    }

    pub fn with_params(merge_routes: bool) -> Self {
        DijkstraConstructor { merge_routes }
    }

    /// Station to grow the next route from.
    ///
    /// Candidates are stations incident to an unconsumed connection, in order
    /// of first appearance in the connection list. The first one with exactly
    /// one such connection wins; otherwise the one with the most.
    pub fn start_station(&self, network: &Network, usage: &EdgeUsage) -> Option<StationId> {
        let mut order = Vec::new();
        let mut counts = vec![0usize; network.num_stations()];

        for conn in network.connections() {
            if usage.is_used(conn.id) {
                continue;
            }
            for station in [conn.station1, conn.station2] {
                if counts[station] == 0 {
                    order.push(station);
                }
                counts[station] += 1;
            }
        }

        if let Some(&station) = order.iter().find(|&&s| counts[s] == 1) {
            return Some(station);
        }

        let mut best: Option<StationId> = None;
        for &station in &order {
            if best.map_or(true, |b| counts[station] > counts[b]) {
                best = Some(station);
            }
        }
        best
    }

    /// Route from `source` to the farthest station within `time_limit`
    pub fn find_route(&self, network: &Network, source: StationId, usage: &EdgeUsage, time_limit: Minutes) -> Route {
        let n = network.num_stations();
        let mut distances: Vec<Option<Minutes>> = vec![None; n];
        let mut predecessors: Vec<Option<(StationId, ConnectionId)>> = vec![None; n];
        let mut heap = BinaryHeap::new();

        distances[source] = Some(0);
        heap.push(Reverse((0, source)));

        while let Some(Reverse((dist, current))) = heap.pop() {
            if distances[current].map_or(false, |d| dist > d) {
                continue;
            }

            for &(neighbor, conn) in network.station(current).adjacency() {
                if usage.is_used(conn) {
                    continue;
                }
                let next = match dist.checked_add(network.connection(conn).minutes) {
                    Some(next) if next <= time_limit => next,
                    _ => continue,
                };
                if distances[neighbor].map_or(true, |d| next < d) {
                    distances[neighbor] = Some(next);
                    predecessors[neighbor] = Some((current, conn));
                    heap.push(Reverse((next, neighbor)));
                }
            }
        }

        // farthest reached station, first in station order on ties
        let mut end: Option<(StationId, Minutes)> = None;
        for station in 0..n {
            if predecessors[station].is_none() {
                continue;
            }
            if let Some(dist) = distances[station] {
                if end.map_or(true, |(_, best)| dist > best) {
                    end = Some((station, dist));
                }
            }
        }

        let mut path = Vec::new();
        let mut cursor = end.map(|(station, _)| station);
        while let Some(station) = cursor {
            match predecessors[station] {
                Some((previous, conn)) => {
                    path.push(conn);
                    cursor = Some(previous);
                }
                None => cursor = None,
            }
        }
        path.reverse();

        let mut route = Route::starting_at(time_limit, source);
        for conn in path {
            if !route.try_extend(network.connection(conn)) {
                break;
            }
        }
        route
    }

    /// Join each route with the next one when the last station of the first
    /// is linked to the start of the second by a connection no route uses
    pub fn combine_routes(&self, network: &Network, routes: Vec<Route>, time_limit: Minutes) -> Vec<Route> {
        let mut usage = EdgeUsage::from_routes(network, &routes);
        let mut routes = routes;
        let mut i = 0;

        while i + 1 < routes.len() {
            match self.join(network, &routes[i], &routes[i + 1], &usage, time_limit) {
                Some((joined, conn)) => {
                    debug!("Merged into {}", network.describe_route(&joined));
                    usage.mark(conn);
                    routes[i] = joined;
                    routes.remove(i + 1);
                }
                None => i += 1,
            }
        }

        routes
    }

    fn join(
        &self,
        network: &Network,
        first: &Route,
        second: &Route,
        usage: &EdgeUsage,
        time_limit: Minutes,
    ) -> Option<(Route, ConnectionId)> {
        let conn = network.connection_between(first.last()?, second.start()?)?;
        if usage.is_used(conn) {
            return None;
        }
        let joined_time = first
            .total_time()
            .checked_add(second.total_time())?
            .checked_add(network.connection(conn).minutes)?;
        if joined_time > time_limit {
            return None;
        }

        let mut seen = HashSet::new();
        let stations: Vec<StationId> = first.stations().iter().chain(second.stations()).copied().collect();
        if !stations.iter().all(|s| seen.insert(*s)) {
            return None;
        }

        Route::from_stations(network, &stations, time_limit).map(|route| (route, conn))
    }
}

impl Default for DijkstraConstructor {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteConstructor for DijkstraConstructor {
    fn construct(&self, network: &Network, config: &SearchConfig, _rng: &mut ChaCha8Rng) -> Solution {
        let start = std::time::Instant::now();
        let mut usage = EdgeUsage::new(network);
        let mut routes = Vec::new();

        while routes.len() < config.max_routes {
            let Some(source) = self.start_station(network, &usage) else {
                break;
            };

            let route = self.find_route(network, source, &usage, config.time_limit);
            if route.is_empty() {
                break;
            }
            debug!("Accepted {}", network.describe_route(&route));
            usage.mark_route(&route);
            routes.push(route);
        }

        if self.merge_routes {
            let before = routes.len();
            routes = self.combine_routes(network, routes, config.time_limit);
            if routes.len() < before {
                info!("Merged {} routes into {}", before, routes.len());
            }
        }

        let mut solution = Solution::from_routes(network, routes, self.name());
        solution.computation_time = start.elapsed().as_secs_f64();
        solution
    }

    fn name(&self) -> &str {
        "Dijkstra"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{abc_network, init_logger, sample_network};
    use rand::SeedableRng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    #[test]
    fn test_start_station_prefers_dead_ends() {
        let network = abc_network();
        let mut usage = EdgeUsage::new(&network);
        let dijkstra = DijkstraConstructor::new();

        assert_eq!(dijkstra.start_station(&network, &usage), network.station_id("A"));
        usage.mark(0);
        assert_eq!(dijkstra.start_station(&network, &usage), network.station_id("B"));
        usage.mark(1);
        assert_eq!(dijkstra.start_station(&network, &usage), None);
    }

    #[test]
    fn test_start_station_falls_back_to_busiest() {
        // triangle with a tail: no dead end once the tail is consumed
        let network = Network::from_parts(
            &[("X", 0.0, 0.0), ("Y", 1.0, 0.0), ("Z", 0.0, 1.0), ("W", 2.0, 0.0)],
            &[("X", "Y", 5), ("Y", "Z", 5), ("Z", "X", 5), ("Y", "W", 5)],
        )
        .unwrap();
        let mut usage = EdgeUsage::new(&network);
        usage.mark(3);
        let start = DijkstraConstructor::new().start_station(&network, &usage);
        // every station has two free connections, X appears first
        assert_eq!(start, network.station_id("X"));
    }

    #[test]
    fn test_find_route_reaches_farthest_station() {
        let network = abc_network();
        let usage = EdgeUsage::new(&network);
        let a = network.station_id("A").unwrap();
        let route = DijkstraConstructor::new().find_route(&network, a, &usage, 120);

        assert_eq!(network.station_names(&route), vec!["A", "B", "C"]);
        assert_eq!(route.total_time(), 25);

        let short = DijkstraConstructor::new().find_route(&network, a, &usage, 20);
        assert_eq!(network.station_names(&short), vec!["A", "B"]);
    }

    #[test]
    fn test_find_route_skips_consumed_connections() {
        let network = abc_network();
        let mut usage = EdgeUsage::new(&network);
        usage.mark(0);
        let a = network.station_id("A").unwrap();
        let route = DijkstraConstructor::new().find_route(&network, a, &usage, 120);
        assert!(route.is_empty());
    }

    #[test]
    fn test_construct_covers_abc_line() {
        init_logger();
        let network = abc_network();
        let config = SearchConfig::default();
        let solution = DijkstraConstructor::new().construct(&network, &config, &mut rng());

        assert_eq!(solution.routes.len(), 1);
        assert!((solution.quality - 9875.0).abs() < 1e-9);
    }

    #[test]
    fn test_combine_routes_joins_over_free_connection() {
        let network = abc_network();
        let a = network.station_id("A").unwrap();
        let b = network.station_id("B").unwrap();
        let c = network.station_id("C").unwrap();
        let dijkstra = DijkstraConstructor::new();

        let line = Network::from_parts(
            &[("A", 0.0, 0.0), ("B", 1.0, 0.0), ("C", 2.0, 0.0), ("D", 3.0, 0.0)],
            &[("A", "B", 10), ("B", "C", 15), ("C", "D", 5)],
        )
        .unwrap();
        let first = Route::from_stations(&line, &[0, 1], 120).unwrap();
        let second = Route::from_stations(&line, &[2, 3], 120).unwrap();
        let merged = dijkstra.combine_routes(&line, vec![first.clone(), second.clone()], 120);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].stations(), &[0, 1, 2, 3]);
        assert_eq!(merged[0].total_time(), 30);

        // joined route would exceed the limit
        let kept = dijkstra.combine_routes(&line, vec![first, second], 25);
        assert_eq!(kept.len(), 2);

        // routes meeting at a shared station have nothing to join over
        let ab = Route::from_stations(&network, &[a, b], 120).unwrap();
        let bc = Route::from_stations(&network, &[b, c], 120).unwrap();
        let kept = dijkstra.combine_routes(&network, vec![ab, bc], 120);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_construct_is_deterministic_and_feasible() {
        let network = sample_network();
        for config in [SearchConfig::holland(), SearchConfig::national()] {
            let first = DijkstraConstructor::new().construct(&network, &config, &mut rng());
            let second = DijkstraConstructor::with_params(false).construct(&network, &config, &mut rng());
            let again = DijkstraConstructor::new().construct(&network, &config, &mut rng());

            assert_eq!(first.routes, again.routes);
            assert!(first.is_feasible(&network, &config));
            assert!(second.is_feasible(&network, &config));
            assert!(first.routes.len() <= second.routes.len());
        }
    }

    #[test]
    fn test_large_weights_do_not_overflow() {
        let network = Network::from_parts(
            &[("A", 0.0, 0.0), ("B", 1.0, 0.0), ("C", 2.0, 0.0)],
            &[("A", "B", 3_000_000_000), ("B", "C", 3_000_000_000)],
        )
        .unwrap();
        let config = SearchConfig::default().with_time_limit(u32::MAX);
        let solution = DijkstraConstructor::new().construct(&network, &config, &mut rng());

        // A-B-C would take 6e9 minutes, so each dead end gets a single hop
        assert_eq!(solution.routes.len(), 2);
        assert!(solution.routes.iter().all(|r| r.connection_count() == 1));
        assert!(solution.is_feasible(&network, &config));
    }

    #[test]
    fn test_combine_routes_with_huge_times_keeps_routes_apart() {
        let network = Network::from_parts(
            &[("A", 0.0, 0.0), ("B", 1.0, 0.0), ("C", 2.0, 0.0), ("D", 3.0, 0.0)],
            &[("A", "B", 3_000_000_000), ("B", "C", 5), ("C", "D", 3_000_000_000)],
        )
        .unwrap();
        let first = Route::from_stations(&network, &[0, 1], u32::MAX).unwrap();
        let second = Route::from_stations(&network, &[2, 3], u32::MAX).unwrap();

        let kept = DijkstraConstructor::new().combine_routes(&network, vec![first, second], u32::MAX);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_empty_route_stops_construction() {
        // the dead end Far is picked first, but its only connection never fits
        let network = Network::from_parts(
            &[("Far", 0.0, 0.0), ("Hub", 1.0, 0.0), ("Near", 2.0, 0.0), ("Next", 3.0, 0.0)],
            &[("Far", "Hub", 200), ("Hub", "Near", 10), ("Near", "Next", 10)],
        )
        .unwrap();
        let config = SearchConfig::default();
        let usage = EdgeUsage::new(&network);
        let dijkstra = DijkstraConstructor::new();
        assert_eq!(dijkstra.start_station(&network, &usage), network.station_id("Far"));

        let solution = dijkstra.construct(&network, &config, &mut rng());
        assert!(solution.routes.is_empty());
        assert_eq!(solution.quality, 0.0);
    }
}
