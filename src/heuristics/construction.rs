use crate::config::SearchConfig;
use crate::heuristics::beam::BeamSearchConstructor;
use crate::heuristics::dijkstra::DijkstraConstructor;
use crate::network::{EdgeUsage, Network, StationId};
use crate::route::Route;
use crate::solution::Solution;
use log::debug;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Builds a set of routes from scratch.
///
/// Constructors never fail: when no edge is left to cover they return
/// whatever they built so far, possibly no route at all.
pub trait RouteConstructor {
    fn construct(&self, network: &Network, config: &SearchConfig, rng: &mut ChaCha8Rng) -> Solution;
    fn name(&self) -> &str;
}

/// Construction strategies selectable at run time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstructorKind {
    Greedy,
    Random,
    Dijkstra,
    BeamSearch,
    GuidedBeamSearch,
    BestFirst,
}

impl ConstructorKind {
    pub const ALL: [ConstructorKind; 6] = [
        ConstructorKind::Greedy,
        ConstructorKind::Random,
        ConstructorKind::Dijkstra,
        ConstructorKind::BeamSearch,
        ConstructorKind::GuidedBeamSearch,
        ConstructorKind::BestFirst,
    ];

    pub fn build(&self, config: &SearchConfig) -> Box<dyn RouteConstructor + Send + Sync> {
        match self {
            ConstructorKind::Greedy => Box::new(GreedyConstructor::new()),
            ConstructorKind::Random => Box::new(RandomConstructor::new()),
            ConstructorKind::Dijkstra => Box::new(DijkstraConstructor::new()),
            ConstructorKind::BeamSearch => Box::new(BeamSearchConstructor::new(config.beam_width)),
            ConstructorKind::GuidedBeamSearch => Box::new(BeamSearchConstructor::guided(config.beam_width)),
            ConstructorKind::BestFirst => Box::new(BeamSearchConstructor::best_first()),
        }
    }

    pub fn uses_beam(&self) -> bool {
        matches!(self, ConstructorKind::BeamSearch | ConstructorKind::GuidedBeamSearch)
    }

    /// Whether repeated runs with different seeds can give different results
    pub fn is_randomized(&self) -> bool {
        matches!(
            self,
            ConstructorKind::Random | ConstructorKind::GuidedBeamSearch | ConstructorKind::BestFirst
        )
    }
}

/// Extend `route` from its last station with the first eligible connection
/// in adjacency order until none is left.
///
/// Eligible connections are unconsumed in `usage`, fit in the remaining time
/// and lead to a station the route has not visited.
pub fn extend_greedily(network: &Network, route: &mut Route, usage: &EdgeUsage) {
    while let Some(current) = route.last() {
        let next = network
            .station(current)
            .adjacency()
            .iter()
            .map(|&(dest, conn)| (dest, network.connection(conn)))
            .find(|(dest, conn)| {
                !usage.is_used(conn.id)
                    && conn.minutes <= route.remaining_time()
                    && !route.contains_station(*dest)
            });

        match next {
            Some((_, conn)) => {
                if !route.try_extend(conn) {
                    break;
                }
            }
            None => break,
        }
    }
}

/// Greedy route from `start`, ignoring connections consumed in `usage`
pub fn greedy_route(network: &Network, start: StationId, usage: &EdgeUsage, time_limit: u32) -> Route {
    let mut route = Route::starting_at(time_limit, start);
    extend_greedily(network, &mut route, usage);
    route
}

/// Seed-driven outer loop shared by the greedy and beam constructors.
///
/// Seeds are visited by ascending degree, each at most once. `build_route`
/// grows one route from a seed; empty routes are dropped and do not count
/// towards `max_routes`. Accepted routes consume their connections.
pub(crate) fn assemble_from_seeds<F>(network: &Network, config: &SearchConfig, mut build_route: F) -> Vec<Route>
where
    F: FnMut(StationId, &EdgeUsage) -> Option<Route>,
{
    let mut usage = EdgeUsage::new(network);
    let mut routes = Vec::new();
    let mut used_starts = HashSet::new();

    for seed in network.stations_by_degree() {
        if routes.len() >= config.max_routes {
            break;
        }
        if !used_starts.insert(seed) {
            continue;
        }

        if let Some(route) = build_route(seed, &usage) {
            if !route.is_empty() {
                debug!("Accepted {}", network.describe_route(&route));
                usage.mark_route(&route);
                routes.push(route);
            }
        }
    }

    routes
}

/// Greedy Constructor
///
/// Grows one route per seed station, fewest connections first, always taking
/// the first usable connection in adjacency order. Deterministic.
pub struct GreedyConstructor;

impl GreedyConstructor {
    pub fn new() -> Self {
        GreedyConstructor
    }
}

impl Default for GreedyConstructor {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteConstructor for GreedyConstructor {
    fn construct(&self, network: &Network, config: &SearchConfig, _rng: &mut ChaCha8Rng) -> Solution {
        let start = std::time::Instant::now();

        let routes = assemble_from_seeds(network, config, |seed, usage| {
            Some(greedy_route(network, seed, usage, config.time_limit))
        });

        let mut solution = Solution::from_routes(network, routes, self.name());
        solution.computation_time = start.elapsed().as_secs_f64();
        solution
    }

    fn name(&self) -> &str {
        "Greedy"
    }
}

/// Random Walk Constructor
///
/// Starts each route at a random station that still has a usable connection
/// and walks along uniformly chosen usable connections.
pub struct RandomConstructor;

impl RandomConstructor {
    pub fn new() -> Self {
        RandomConstructor
    }

    /// Random walk from `start` over connections unconsumed in `usage`
    pub fn random_route(
        &self,
        network: &Network,
        start: StationId,
        usage: &EdgeUsage,
        time_limit: u32,
        rng: &mut ChaCha8Rng,
    ) -> Route {
        let mut route = Route::starting_at(time_limit, start);

        while let Some(current) = route.last() {
            let candidates: Vec<_> = network
                .station(current)
                .adjacency()
                .iter()
                .map(|&(dest, conn)| (dest, network.connection(conn)))
                .filter(|(dest, conn)| {
                    !usage.is_used(conn.id)
                        && conn.minutes <= route.remaining_time()
                        && !route.contains_station(*dest)
                })
                .collect();

            match candidates.choose(rng) {
                Some((_, conn)) => {
                    if !route.try_extend(conn) {
                        break;
                    }
                }
                None => break,
            }
        }

        route
    }
}

impl Default for RandomConstructor {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteConstructor for RandomConstructor {
    fn construct(&self, network: &Network, config: &SearchConfig, rng: &mut ChaCha8Rng) -> Solution {
        let start = std::time::Instant::now();
        let mut usage = EdgeUsage::new(network);
        let mut routes = Vec::new();

        while routes.len() < config.max_routes {
            // a station qualifies only if one of its free connections fits in a route
            let starts: Vec<StationId> = (0..network.num_stations())
                .filter(|&id| {
                    network.station(id).adjacency().iter().any(|&(_, conn)| {
                        !usage.is_used(conn) && network.connection(conn).minutes <= config.time_limit
                    })
                })
                .collect();

            let Some(&start_station) = starts.choose(rng) else {
                break;
            };

            let route = self.random_route(network, start_station, &usage, config.time_limit, rng);
            if route.is_empty() {
                break;
            }
            debug!("Accepted {}", network.describe_route(&route));
            usage.mark_route(&route);
            routes.push(route);
        }

        let mut solution = Solution::from_routes(network, routes, self.name());
        solution.computation_time = start.elapsed().as_secs_f64();
        solution
    }

    fn name(&self) -> &str {
        "Random"
    }
}

/// Multi-Start Construction
///
/// Runs several constructors and keeps the best solution.
pub struct MultiStartConstruction {
    constructors: Vec<Box<dyn RouteConstructor + Send + Sync>>,
}

impl MultiStartConstruction {
    pub fn new() -> Self {
        MultiStartConstruction {
            constructors: Vec::new(),
        }
    }

    pub fn with_all_constructors(config: &SearchConfig) -> Self {
        MultiStartConstruction {
            constructors: ConstructorKind::ALL.iter().map(|kind| kind.build(config)).collect(),
        }
    }

    pub fn add_constructor<C: RouteConstructor + Send + Sync + 'static>(&mut self, constructor: C) {
        self.constructors.push(Box::new(constructor));
    }
}

impl Default for MultiStartConstruction {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteConstructor for MultiStartConstruction {
    fn construct(&self, network: &Network, config: &SearchConfig, rng: &mut ChaCha8Rng) -> Solution {
        let start = std::time::Instant::now();
        let mut best_solution = Solution::new();

        for constructor in &self.constructors {
            let solution = constructor.construct(network, config, rng);
            debug!("{} reached quality {:.2}", constructor.name(), solution.quality);
            if solution.quality > best_solution.quality {
                best_solution = solution;
            }
        }

        if best_solution.quality == f64::NEG_INFINITY {
            best_solution = Solution::from_routes(network, Vec::new(), self.name());
        }
        best_solution.algorithm = format!("{}({})", self.name(), best_solution.algorithm);
        best_solution.computation_time = start.elapsed().as_secs_f64();
        best_solution
    }

    fn name(&self) -> &str {
        "MultiStart"
    }
}
