//! Rail Route Planner Library
//!
//! Plans train routes over a rail network: at most `max_routes` simple paths,
//! each bounded by a travel time limit, that together cover as many distinct
//! connections as possible while keeping route count and travel time low.
//!
//! # Features
//!
//! - Graph model with a configurable quality function
//! - Construction heuristics (Greedy, Random walk, Dijkstra-bounded, Beam Search, Guided Beam Search, Best-First)
//! - Hill-climbing local search
//! - Parallel independent trials
//!
//! # Example
//!
//! ```no_run
//! use rail_route_planner::network::Network;
//! use rail_route_planner::config::SearchConfig;
//! use rail_route_planner::heuristics::construction::ConstructorKind;
//! use rail_route_planner::solver::{solve, Plan};
//!
//! let network = Network::from_parts(
//!     &[("Alkmaar", 52.64, 4.74), ("Hoorn", 52.65, 5.06), ("Zaandam", 52.44, 4.81)],
//!     &[("Alkmaar", "Hoorn", 24), ("Hoorn", "Zaandam", 26)],
//! )
//! .unwrap();
//!
//! let plan = Plan::new(ConstructorKind::GuidedBeamSearch).with_hill_climb();
//! let solution = solve(&network, &SearchConfig::holland(), &plan).unwrap();
//!
//! println!("{}", solution);
//! ```

pub mod config;
pub mod error;
pub mod heuristics;
pub mod network;
pub mod route;
pub mod solution;
pub mod solver;

#[cfg(test)]
mod test_support;

pub use config::SearchConfig;
pub use error::{ConfigError, NetworkError};
pub use network::{EdgeUsage, Network, Objective};
pub use route::Route;
pub use solution::Solution;
