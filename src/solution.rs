//! Solution representation for the route covering problem.
//!
//! A solution is the route set handed back to callers together with its
//! quality on the network that produced it.

use crate::config::SearchConfig;
use crate::network::Network;
use crate::route::Route;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Represents a solution: a quality score and the routes achieving it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    /// Quality score K (may be negative)
    pub quality: f64,
    /// Routes in the order they were produced
    pub routes: Vec<Route>,
    /// Algorithm that generated this solution
    pub algorithm: String,
    /// Computation time in seconds
    pub computation_time: f64,
    /// Number of iterations (if applicable)
    pub iterations: Option<usize>,
}

impl Solution {
    /// Create a new empty solution
    pub fn new() -> Self {
        Solution {
            quality: f64::NEG_INFINITY,
            routes: Vec::new(),
            algorithm: String::new(),
            computation_time: 0.0,
            iterations: None,
        }
    }

    /// Create a solution from routes, scored on `network`
    pub fn from_routes(network: &Network, routes: Vec<Route>, algorithm: &str) -> Self {
        let quality = network.quality_of(&routes);
        Solution {
            quality,
            routes,
            algorithm: algorithm.to_string(),
            computation_time: 0.0,
            iterations: None,
        }
    }

    /// Recompute the quality after the routes changed
    pub fn validate(&mut self, network: &Network) {
        self.quality = network.quality_of(&self.routes);
    }

    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    /// Sum of the routes' travel minutes
    pub fn total_time(&self) -> u64 {
        self.routes.iter().map(|r| r.total_time() as u64).sum()
    }

    /// Fraction of the network's connections covered by at least one route
    pub fn coverage(&self, network: &Network) -> f64 {
        if network.num_connections() == 0 {
            return 0.0;
        }
        network.unique_connections_used(&self.routes) as f64 / network.num_connections() as f64
    }

    /// Check every route constraint and the route count against `config`
    pub fn is_feasible(&self, network: &Network, config: &SearchConfig) -> bool {
        if self.routes.len() > config.max_routes {
            return false;
        }
        self.routes.iter().all(|route| {
            let unique: HashSet<_> = route.stations().iter().collect();
            let connected = route.stations().windows(2).zip(route.connections()).all(|(pair, &conn)| {
                network.connection_between(pair[0], pair[1]) == Some(conn)
            });
            route.total_time() <= config.time_limit
                && unique.len() == route.stations().len()
                && connected
                && route.stations().len() == route.connection_count() + 1
        })
    }
}

impl Default for Solution {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solution ({})", self.algorithm)?;
        writeln!(f, "  Quality: {:.2}", self.quality)?;
        writeln!(f, "  Routes: {}", self.routes.len())?;
        writeln!(f, "  Total time: {} min", self.total_time())?;
        writeln!(f, "  Time: {:.4}s", self.computation_time)?;
        if let Some(iter) = self.iterations {
            writeln!(f, "  Iterations: {}", iter)?;
        }
        for (i, route) in self.routes.iter().enumerate() {
            writeln!(f, "  Route {}: {:?} ({} min)", i + 1, route.stations(), route.total_time())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{abc_network, two_edge_network};

    #[test]
    fn test_solution_creation() {
        let sol = Solution::new();
        assert!(sol.routes.is_empty());
        assert_eq!(sol.quality, f64::NEG_INFINITY);
        assert_eq!(sol.total_time(), 0);
    }

    #[test]
    fn test_from_routes_scores_on_network() {
        let network = two_edge_network();
        let mut route = Route::new(120);
        assert!(route.try_extend(network.connection(0)));

        let sol = Solution::from_routes(&network, vec![route], "test");
        assert!((sol.quality - 4870.0).abs() < 1e-9);
        assert!((sol.coverage(&network) - 0.5).abs() < 1e-9);
        assert_eq!(sol.total_time(), 30);
        assert!(sol.is_feasible(&network, &SearchConfig::default()));
    }

    #[test]
    fn test_quality_ignores_route_order() {
        let network = abc_network();
        let mut first = Route::new(120);
        let mut second = Route::new(120);
        assert!(first.try_extend(network.connection(0)));
        assert!(second.try_extend(network.connection(1)));

        let forward = Solution::from_routes(&network, vec![first.clone(), second.clone()], "a");
        let backward = Solution::from_routes(&network, vec![second, first], "b");
        assert_eq!(forward.quality, backward.quality);
    }

    #[test]
    fn test_feasibility_checks_route_count_and_time() {
        let network = abc_network();
        let mut route = Route::new(120);
        assert!(route.try_extend(network.connection(0)));
        assert!(route.try_extend(network.connection(1)));
        let sol = Solution::from_routes(&network, vec![route.clone(), route], "test");

        let config = SearchConfig::default();
        assert!(sol.is_feasible(&network, &config));
        assert!(!sol.is_feasible(&network, &config.with_max_routes(1)));
        assert!(!sol.is_feasible(&network, &config.with_time_limit(20)));
    }

    #[test]
    fn test_serializes_routes() {
        let network = abc_network();
        let mut route = Route::new(120);
        assert!(route.try_extend(network.connection(0)));
        let sol = Solution::from_routes(&network, vec![route], "Greedy");

        let json = serde_json::to_value(&sol).unwrap();
        assert_eq!(json["algorithm"], "Greedy");
        assert_eq!(json["routes"][0]["total_time"], 10);
        let back: Solution = serde_json::from_value(json).unwrap();
        assert_eq!(back.routes, sol.routes);
    }

    #[test]
    fn test_validate_rescores_edited_routes() {
        let network = abc_network();
        let mut route = Route::new(120);
        assert!(route.try_extend(network.connection(0)));
        let mut sol = Solution::from_routes(&network, vec![route], "test");
        let before = sol.quality;

        assert!(sol.routes[0].try_extend(network.connection(1)));
        assert_eq!(sol.quality, before);
        sol.validate(&network);
        assert!((sol.quality - 9875.0).abs() < 1e-9);
    }
}
