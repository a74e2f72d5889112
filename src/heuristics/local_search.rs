//! Local search improvement for route sets.
//!
//! The hill climber replaces one route at a time with a greedily rebuilt
//! variant and keeps the change only when the overall quality strictly
//! improves.

use crate::config::SearchConfig;
use crate::heuristics::construction::{extend_greedily, greedy_route};
use crate::network::{EdgeUsage, Minutes, Network};
use crate::route::Route;
use crate::solution::Solution;
use log::{debug, info};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Trait for local search improvement methods
pub trait LocalSearch {
    /// Improve `solution` in place, returning whether its quality went up
    fn improve(&self, network: &Network, config: &SearchConfig, solution: &mut Solution, rng: &mut ChaCha8Rng) -> bool;
    fn name(&self) -> &str;
}

/// Ways of rebuilding the route picked by an iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modification {
    /// Greedy route from a random station of the network
    Restart,
    /// Drop the last station and extend greedily again
    TruncateAndRebuild,
    /// Greedy route from a random station of the route itself
    InteriorRestart,
}

impl Modification {
    pub const ALL: [Modification; 3] = [
        Modification::Restart,
        Modification::TruncateAndRebuild,
        Modification::InteriorRestart,
    ];
}

/// Search state of one hill-climbing run.
///
/// `best_routes` is an independent copy; later changes to `current_routes`
/// never reach it.
#[derive(Debug, Clone)]
pub struct HillClimbState {
    current_routes: Vec<Route>,
    usage: EdgeUsage,
    best_quality: f64,
    best_routes: Vec<Route>,
    time_limit: Minutes,
    max_routes: usize,
    iterations: usize,
}

impl HillClimbState {
    pub fn new(network: &Network, routes: Vec<Route>, config: &SearchConfig) -> Self {
        let usage = EdgeUsage::from_routes(network, &routes);
        let best_quality = network.quality_of(&routes);
        HillClimbState {
            best_routes: routes.clone(),
            current_routes: routes,
            usage,
            best_quality,
            time_limit: config.time_limit,
            max_routes: config.max_routes,
            iterations: 0,
        }
    }

    /// Quality and routes without running any iteration
    pub fn find_single_solution(&self) -> (f64, Vec<Route>) {
        (self.best_quality, self.best_routes.clone())
    }

    pub fn current_routes(&self) -> &[Route] {
        &self.current_routes
    }

    pub fn best_routes(&self) -> &[Route] {
        &self.best_routes
    }

    pub fn best_quality(&self) -> f64 {
        self.best_quality
    }

    pub fn usage(&self) -> &EdgeUsage {
        &self.usage
    }

    /// Iterations performed so far
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    fn propose(&self, network: &Network, modification: Modification, old: &Route, rng: &mut ChaCha8Rng) -> Route {
        match modification {
            Modification::Restart => {
                let station = rng.gen_range(0..network.num_stations());
                greedy_route(network, station, &self.usage, self.time_limit)
            }
            Modification::TruncateAndRebuild => {
                let len = old.stations().len();
                let keep = if len <= 2 { 1 } else { len - 1 };
                let mut route = old.truncated(network, keep);
                extend_greedily(network, &mut route, &self.usage);
                route
            }
            Modification::InteriorRestart => match old.stations().choose(rng) {
                Some(&station) => greedy_route(network, station, &self.usage, self.time_limit),
                None => Route::new(self.time_limit),
            },
        }
    }

    /// Run one iteration, returning whether the candidate was accepted
    pub fn step(&mut self, network: &Network, rng: &mut ChaCha8Rng) -> bool {
        self.iterations += 1;
        if network.num_stations() == 0 {
            return false;
        }

        if self.current_routes.is_empty() {
            return self.try_append(network, rng);
        }

        let idx = rng.gen_range(0..self.current_routes.len());
        let old = self.current_routes[idx].clone();
        self.usage.release_route(&old);

        let modification = Modification::ALL[rng.gen_range(0..Modification::ALL.len())];
        let candidate = self.propose(network, modification, &old, rng);
        if candidate.is_empty() {
            self.usage.mark_route(&old);
            return false;
        }

        self.current_routes[idx] = candidate;
        let quality = network.quality_of(&self.current_routes);

        if quality > self.best_quality {
            debug!(
                "{:?} improved quality {:.2} -> {:.2} with {}",
                modification,
                self.best_quality,
                quality,
                network.describe_route(&self.current_routes[idx])
            );
            self.usage.mark_route(&self.current_routes[idx]);
            self.best_quality = quality;
            self.best_routes = self.current_routes.clone();
            true
        } else {
            self.usage.mark_route(&old);
            self.current_routes[idx] = old;
            false
        }
    }

    fn try_append(&mut self, network: &Network, rng: &mut ChaCha8Rng) -> bool {
        if self.current_routes.len() >= self.max_routes {
            return false;
        }

        let station = rng.gen_range(0..network.num_stations());
        let candidate = greedy_route(network, station, &self.usage, self.time_limit);
        if candidate.is_empty() {
            return false;
        }

        self.current_routes.push(candidate);
        let quality = network.quality_of(&self.current_routes);
        if quality > self.best_quality {
            if let Some(route) = self.current_routes.last() {
                self.usage.mark_route(route);
            }
            self.best_quality = quality;
            self.best_routes = self.current_routes.clone();
            true
        } else {
            self.current_routes.pop();
            false
        }
    }

    /// Run `iterations` steps, returning the number of accepted moves
    pub fn run(&mut self, network: &Network, iterations: usize, rng: &mut ChaCha8Rng) -> usize {
        let mut accepted = 0;
        for _ in 0..iterations {
            if self.step(network, rng) {
                accepted += 1;
            }
        }
        accepted
    }

    pub fn into_solution(self, algorithm: &str) -> Solution {
        Solution {
            quality: self.best_quality,
            routes: self.best_routes,
            algorithm: algorithm.to_string(),
            computation_time: 0.0,
            iterations: Some(self.iterations),
        }
    }
}

/// Hill Climber
///
/// Fixed iteration budget; plateaus are tolerated and never end the run early.
pub struct HillClimber {
    pub iterations: usize,
}

impl HillClimber {
    pub fn new() -> Self {
        HillClimber { iterations: 1000 }
    }

    pub fn with_params(iterations: usize) -> Self {
        HillClimber { iterations }
    }

    /// Climb from `routes` and return the best solution found
    pub fn climb(&self, network: &Network, config: &SearchConfig, routes: Vec<Route>, rng: &mut ChaCha8Rng) -> Solution {
        let start = std::time::Instant::now();
        let mut state = HillClimbState::new(network, routes, config);
        let initial = state.best_quality();
        let accepted = state.run(network, self.iterations, rng);

        info!(
            "{}: {} of {} moves accepted, quality {:.2} -> {:.2}",
            self.name(),
            accepted,
            self.iterations,
            initial,
            state.best_quality()
        );

        let mut solution = state.into_solution(self.name());
        solution.computation_time = start.elapsed().as_secs_f64();
        solution
    }
}

impl Default for HillClimber {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalSearch for HillClimber {
    fn improve(&self, network: &Network, config: &SearchConfig, solution: &mut Solution, rng: &mut ChaCha8Rng) -> bool {
        let initial = network.quality_of(&solution.routes);
        let climbed = self.climb(network, config, solution.routes.clone(), rng);
        let improved = climbed.quality > initial;

        solution.routes = climbed.routes;
        solution.quality = climbed.quality;
        solution.computation_time += climbed.computation_time;
        solution.iterations = climbed.iterations;
        if !solution.algorithm.is_empty() {
            solution.algorithm = format!("{}+{}", solution.algorithm, self.name());
        } else {
            solution.algorithm = self.name().to_string();
        }
        improved
    }

    fn name(&self) -> &str {
        "HillClimber"
    }
}
