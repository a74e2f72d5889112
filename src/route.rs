//! A single train route: a time-bounded simple path through the network.

use crate::network::{Connection, ConnectionId, Minutes, Network, StationId};
use serde::{Deserialize, Serialize};

/// Ordered, non-repeating sequence of stations joined by connections.
///
/// A route only grows through [`Route::try_extend`], which keeps the time
/// budget, path continuity and the no-revisit rule intact. Routes are plain
/// values: cloning one copies its stations and connections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    stations: Vec<StationId>,
    /// Connections in travel order
    connections: Vec<ConnectionId>,
    total_time: Minutes,
    time_limit: Minutes,
}

impl Route {
    /// Empty route; the first extension seeds both endpoints of its connection.
    pub fn new(time_limit: Minutes) -> Self {
        Route {
            stations: Vec::new(),
            connections: Vec::new(),
            total_time: 0,
            time_limit,
        }
    }

    /// Route anchored at `start`; the first extension must leave from it.
    pub fn starting_at(time_limit: Minutes, start: StationId) -> Self {
        Route {
            stations: vec![start],
            ..Route::new(time_limit)
        }
    }

    /// Build a route following `stations`, or `None` if consecutive stations
    /// are not connected or the path breaks a route constraint.
    pub fn from_stations(network: &Network, stations: &[StationId], time_limit: Minutes) -> Option<Self> {
        let (&first, _) = stations.split_first()?;
        let mut route = Route::starting_at(time_limit, first);
        for pair in stations.windows(2) {
            let conn = network.connection_between(pair[0], pair[1])?;
            if !route.try_extend(network.connection(conn)) {
                return None;
            }
        }
        Some(route)
    }

    /// Append `connection` at the end of the route.
    ///
    /// Returns `false` without touching the route when the connection does
    /// not leave from the last station, leads back into the route, or would
    /// exceed the time limit.
    pub fn try_extend(&mut self, connection: &Connection) -> bool {
        let new_time = match self.total_time.checked_add(connection.minutes) {
            Some(t) if t <= self.time_limit => t,
            _ => return false,
        };

        match self.stations.last() {
            None => {
                self.stations.push(connection.station1);
                self.stations.push(connection.station2);
            }
            Some(&last) => {
                if !connection.touches(last) {
                    return false;
                }
                let next = connection.other_station(last);
                if self.stations.contains(&next) {
                    return false;
                }
                self.stations.push(next);
            }
        }

        self.connections.push(connection.id);
        self.total_time = new_time;
        true
    }

    /// Fresh route holding the first `keep` stations of this one (at least the start).
    pub fn truncated(&self, network: &Network, keep: usize) -> Route {
        let keep = keep.max(1).min(self.stations.len());
        match Route::from_stations(network, &self.stations[..keep], self.time_limit) {
            Some(route) => route,
            None => Route::new(self.time_limit),
        }
    }

    pub fn stations(&self) -> &[StationId] {
        &self.stations
    }

    /// Consumed connections in travel order
    pub fn connections(&self) -> &[ConnectionId] {
        &self.connections
    }

    pub fn total_time(&self) -> Minutes {
        self.total_time
    }

    pub fn time_limit(&self) -> Minutes {
        self.time_limit
    }

    /// Minutes left before the time limit is reached
    pub fn remaining_time(&self) -> Minutes {
        self.time_limit - self.total_time
    }

    pub fn start(&self) -> Option<StationId> {
        self.stations.first().copied()
    }

    pub fn last(&self) -> Option<StationId> {
        self.stations.last().copied()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// `true` if the route has not consumed any connection yet
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn contains_station(&self, station: StationId) -> bool {
        self.stations.contains(&station)
    }

    pub fn uses_connection(&self, connection: ConnectionId) -> bool {
        self.connections.contains(&connection)
    }
}
