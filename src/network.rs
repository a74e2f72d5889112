//! Rail network model: stations, timed connections and the quality function.
//!
//! A [`Network`] is built once from a station list and a connection list and
//! is read-only for every algorithm. Which connections are already consumed
//! during a run is tracked separately by an [`EdgeUsage`] value, so several
//! runs can share one network without interfering with each other.

use crate::error::NetworkError;
use crate::route::Route;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Index of a station inside its network.
pub type StationId = usize;
/// Index of a connection inside its network.
pub type ConnectionId = usize;
/// Travel time in minutes.
pub type Minutes = u32;

/// A station in the rail network
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    /// Position in [`Network::stations`]
    pub id: StationId,
    /// Unique station name
    pub name: String,
    /// X coordinate (display only)
    pub x: f64,
    /// Y coordinate (display only)
    pub y: f64,
    /// Neighbouring stations and the connection leading there, in insertion order
    adjacency: Vec<(StationId, ConnectionId)>,
}

impl Station {
    pub fn new(id: StationId, name: &str, x: f64, y: f64) -> Self {
        Station {
            id,
            name: name.to_string(),
            x,
            y,
            adjacency: Vec::new(),
        }
    }

    /// Neighbours with the connection joining them, in the order they were added.
    pub fn adjacency(&self) -> &[(StationId, ConnectionId)] {
        &self.adjacency
    }

    /// Number of connections touching this station
    pub fn degree(&self) -> usize {
        self.adjacency.len()
    }

    /// Connection leading to `neighbor`, if any
    pub fn connection_to(&self, neighbor: StationId) -> Option<ConnectionId> {
        self.adjacency
            .iter()
            .find(|&&(dest, _)| dest == neighbor)
            .map(|&(_, conn)| conn)
    }

    /// All stations reachable with a single connection
    pub fn possible_destinations(&self) -> Vec<StationId> {
        self.adjacency.iter().map(|&(dest, _)| dest).collect()
    }
}

/// An undirected, timed connection between two stations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub station1: StationId,
    pub station2: StationId,
    /// Travel time in minutes, always positive
    pub minutes: Minutes,
}

impl Connection {
    /// Station at the other end of the connection.
    ///
    /// Any station that is not `station1` is treated as `station2`.
    #[inline]
    pub fn other_station(&self, station: StationId) -> StationId {
        if station == self.station1 {
            self.station2
        } else {
            self.station1
        }
    }

    #[inline]
    pub fn touches(&self, station: StationId) -> bool {
        self.station1 == station || self.station2 == station
    }
}

/// Weights of the quality function
/// `K = p * coverage_weight - (T * route_weight + time_weight * Min)`.
///
/// The default charges total travel time as a cost. Some variants of the
/// scoring rule credit it instead (`T*100 - Min`); that convention is
/// available through [`Objective::with_time_as_credit`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub coverage_weight: f64,
    pub route_weight: f64,
    pub time_weight: f64,
}

impl Objective {
    pub fn new(coverage_weight: f64, route_weight: f64, time_weight: f64) -> Self {
        Objective { coverage_weight, route_weight, time_weight }
    }

    pub fn with_time_as_credit() -> Self {
        Objective { time_weight: -1.0, ..Objective::default() }
    }

    /// Quality of a route set on `network`.
    ///
    /// Coverage counts the union of the routes' own connections, so two
    /// routes sharing an edge cover it once.
    pub fn evaluate(&self, network: &Network, routes: &[Route]) -> f64 {
        let total_connections = network.num_connections();
        if total_connections == 0 {
            return 0.0;
        }

        let used = network.unique_connections_used(routes);
        let p = used as f64 / total_connections as f64;
        let num_routes = routes.len() as f64;
        let minutes: f64 = routes.iter().map(|r| r.total_time() as f64).sum();

        p * self.coverage_weight - (num_routes * self.route_weight + self.time_weight * minutes)
    }
}

impl Default for Objective {
    fn default() -> Self {
        Objective {
            coverage_weight: 10000.0,
            route_weight: 100.0,
            time_weight: 1.0,
        }
    }
}

/// The rail network: topology plus the currently installed route set
#[derive(Debug, Clone, Default)]
pub struct Network {
    stations: Vec<Station>,
    connections: Vec<Connection>,
    routes: Vec<Route>,
    objective: Objective,
    index: HashMap<String, StationId>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a network from `(name, x, y)` stations and `(from, to, minutes)` connections.
    pub fn from_parts<S: AsRef<str>>(
        stations: &[(S, f64, f64)],
        connections: &[(S, S, Minutes)],
    ) -> Result<Self, NetworkError> {
        let mut network = Network::new();
        for (name, x, y) in stations {
            network.add_station(name.as_ref(), *x, *y)?;
        }
        for (from, to, minutes) in connections {
            network.add_connection(from.as_ref(), to.as_ref(), *minutes)?;
        }
        Ok(network)
    }

    pub fn add_station(&mut self, name: &str, x: f64, y: f64) -> Result<StationId, NetworkError> {
        if self.index.contains_key(name) {
            return Err(NetworkError::DuplicateStation(name.to_string()));
        }
        let id = self.stations.len();
        self.stations.push(Station::new(id, name, x, y));
        self.index.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn add_connection(&mut self, from: &str, to: &str, minutes: Minutes) -> Result<ConnectionId, NetworkError> {
        let a = self.require_station(from)?;
        let b = self.require_station(to)?;
        if a == b {
            return Err(NetworkError::SelfLoop(from.to_string()));
        }
        if minutes == 0 {
            return Err(NetworkError::ZeroWeight(from.to_string(), to.to_string()));
        }
        if self.stations[a].connection_to(b).is_some() {
            return Err(NetworkError::DuplicateConnection(from.to_string(), to.to_string()));
        }

        let id = self.connections.len();
        self.connections.push(Connection { id, station1: a, station2: b, minutes });
        self.stations[a].adjacency.push((b, id));
        self.stations[b].adjacency.push((a, id));
        Ok(id)
    }

    fn require_station(&self, name: &str) -> Result<StationId, NetworkError> {
        self.station_id(name)
            .ok_or_else(|| NetworkError::UnknownStation(name.to_string()))
    }

    pub fn station_id(&self, name: &str) -> Option<StationId> {
        self.index.get(name).copied()
    }

    #[inline]
    pub fn station(&self, id: StationId) -> &Station {
        &self.stations[id]
    }

    #[inline]
    pub fn connection(&self, id: ConnectionId) -> &Connection {
        &self.connections[id]
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn num_stations(&self) -> usize {
        self.stations.len()
    }

    pub fn num_connections(&self) -> usize {
        self.connections.len()
    }

    /// Connection joining two stations, if they are neighbours
    pub fn connection_between(&self, a: StationId, b: StationId) -> Option<ConnectionId> {
        self.stations.get(a).and_then(|station| station.connection_to(b))
    }

    /// Station ids sorted by ascending degree, ties kept in insertion order.
    pub fn stations_by_degree(&self) -> Vec<StationId> {
        let mut order: Vec<StationId> = (0..self.stations.len()).collect();
        order.sort_by_key(|&id| self.stations[id].degree());
        order
    }

    /// Number of distinct connections traversed by `routes`
    pub fn unique_connections_used(&self, routes: &[Route]) -> usize {
        routes
            .iter()
            .flat_map(|route| route.connections().iter().copied())
            .collect::<HashSet<ConnectionId>>()
            .len()
    }

    pub fn objective(&self) -> Objective {
        self.objective
    }

    pub fn set_objective(&mut self, objective: Objective) {
        self.objective = objective;
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Install `routes` as the network's current solution
    pub fn set_routes(&mut self, routes: Vec<Route>) {
        self.routes = routes;
    }

    pub fn clear_routes(&mut self) {
        self.routes.clear();
    }

    /// Quality of the installed route set
    pub fn calculate_quality(&self) -> f64 {
        self.objective.evaluate(self, &self.routes)
    }

    /// Quality `routes` would have if installed on this network
    pub fn quality_of(&self, routes: &[Route]) -> f64 {
        self.objective.evaluate(self, routes)
    }

    /// Station names along a route
    pub fn station_names(&self, route: &Route) -> Vec<&str> {
        route
            .stations()
            .iter()
            .map(|&id| self.stations[id].name.as_str())
            .collect()
    }

    /// Human readable form, e.g. `Route(Alkmaar -> Hoorn, 24 min)`
    pub fn describe_route(&self, route: &Route) -> String {
        format!(
            "Route({}, {} min)",
            self.station_names(route).join(" -> "),
            route.total_time()
        )
    }

    /// Get statistics about the network
    pub fn statistics(&self) -> NetworkStatistics {
        let total_minutes: u64 = self.connections.iter().map(|c| c.minutes as u64).sum();
        let avg_minutes = if self.connections.is_empty() {
            0.0
        } else {
            total_minutes as f64 / self.connections.len() as f64
        };
        let max_degree = self.stations.iter().map(Station::degree).max().unwrap_or(0);
        let dead_ends = self.stations.iter().filter(|s| s.degree() == 1).count();

        NetworkStatistics {
            num_stations: self.stations.len(),
            num_connections: self.connections.len(),
            total_minutes,
            avg_minutes,
            max_degree,
            dead_ends,
        }
    }
}

/// Statistics about a rail network
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkStatistics {
    pub num_stations: usize,
    pub num_connections: usize,
    pub total_minutes: u64,
    pub avg_minutes: f64,
    pub max_degree: usize,
    pub dead_ends: usize,
}

impl std::fmt::Display for NetworkStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Network")?;
        writeln!(f, "  Stations: {}", self.num_stations)?;
        writeln!(f, "  Connections: {}", self.num_connections)?;
        writeln!(f, "  Total minutes: {}", self.total_minutes)?;
        writeln!(f, "  Avg minutes per connection: {:.2}", self.avg_minutes)?;
        writeln!(f, "  Max degree: {}", self.max_degree)?;
        writeln!(f, "  Dead ends: {}", self.dead_ends)
    }
}

/// Connections consumed by the routes accepted so far in one run.
///
/// Each run owns its own value. Counts are kept per connection so that
/// releasing one route never frees an edge another route still uses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeUsage {
    counts: Vec<u32>,
    used: usize,
}

impl EdgeUsage {
    /// Nothing consumed yet
    pub fn new(network: &Network) -> Self {
        EdgeUsage {
            counts: vec![0; network.num_connections()],
            used: 0,
        }
    }

    pub fn from_routes(network: &Network, routes: &[Route]) -> Self {
        let mut usage = Self::new(network);
        for route in routes {
            usage.mark_route(route);
        }
        usage
    }

    #[inline]
    pub fn is_used(&self, connection: ConnectionId) -> bool {
        self.counts.get(connection).map_or(false, |&c| c > 0)
    }

    pub fn mark(&mut self, connection: ConnectionId) {
        if let Some(count) = self.counts.get_mut(connection) {
            if *count == 0 {
                self.used += 1;
            }
            *count += 1;
        }
    }

    pub fn release(&mut self, connection: ConnectionId) {
        if let Some(count) = self.counts.get_mut(connection) {
            if *count == 1 {
                self.used -= 1;
            }
            *count = count.saturating_sub(1);
        }
    }

    pub fn mark_route(&mut self, route: &Route) {
        for &conn in route.connections() {
            self.mark(conn);
        }
    }

    pub fn release_route(&mut self, route: &Route) {
        for &conn in route.connections() {
            self.release(conn);
        }
    }

    /// Number of distinct consumed connections
    pub fn used_count(&self) -> usize {
        self.used
    }

    pub fn all_used(&self) -> bool {
        self.used == self.counts.len()
    }

    /// Unconsumed connections touching `station`
    pub fn unused_degree(&self, network: &Network, station: StationId) -> usize {
        network
            .station(station)
            .adjacency()
            .iter()
            .filter(|&&(_, conn)| !self.is_used(conn))
            .count()
    }
}
