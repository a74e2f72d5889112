//! Beam search route construction, plain and heuristic-guided.

use crate::config::SearchConfig;
use crate::heuristics::construction::{assemble_from_seeds, RouteConstructor};
use crate::heuristics::scoring::{Candidate, ConnectionValue, CoverageScore, GuidedScore, ScoringFunction};
use crate::network::{Connection, EdgeUsage, Minutes, Network, StationId};
use crate::route::Route;
use crate::solution::Solution;
use log::{debug, info};
use ordered_float::OrderedFloat;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use std::cmp::Reverse;
use std::ops::RangeInclusive;

/// Partial route kept in the beam
#[derive(Debug, Clone)]
struct BeamState {
    score: f64,
    route: Route,
}

/// Beam Search Constructor
///
/// Grows each route by keeping the `beam_width` best partial routes per
/// step and returns the best-scoring partial route seen. The guided variant
/// only expands the better half of each state's outgoing connections, ranked
/// by [`ConnectionValue`]. The best-first variant keeps a single partial
/// route and follows only its most valuable connection.
pub struct BeamSearchConstructor {
    pub beam_width: usize,
    guided: bool,
    top_only: bool,
    scoring: Box<dyn ScoringFunction + Send + Sync>,
    edge_value: ConnectionValue,
}

impl BeamSearchConstructor {
    pub fn new(beam_width: usize) -> Self {
        BeamSearchConstructor {
            beam_width,
            guided: false,
            top_only: false,
            scoring: Box::new(CoverageScore::new()),
            edge_value: ConnectionValue::new(),
        }
    }

    pub fn guided(beam_width: usize) -> Self {
        BeamSearchConstructor {
            beam_width,
            guided: true,
            top_only: false,
            scoring: Box::new(GuidedScore::new()),
            edge_value: ConnectionValue::new(),
        }
    }

    /// Width-1 guided search expanding only the best connection per step
    pub fn best_first() -> Self {
        BeamSearchConstructor {
            top_only: true,
            ..Self::guided(1)
        }
    }

    /// Replace the function ranking partial routes
    pub fn with_scoring<S: ScoringFunction + Send + Sync + 'static>(mut self, scoring: S) -> Self {
        self.scoring = Box::new(scoring);
        self
    }

    pub fn with_edge_value(mut self, edge_value: ConnectionValue) -> Self {
        self.edge_value = edge_value;
        self
    }

    pub fn is_guided(&self) -> bool {
        self.guided
    }

    /// Connections worth expanding from the end of `route`
    fn expansions<'n>(
        &self,
        network: &'n Network,
        usage: &EdgeUsage,
        route: &Route,
        rng: &mut ChaCha8Rng,
    ) -> Vec<(&'n Connection, f64)> {
        let Some(last) = route.last() else {
            return Vec::new();
        };

        let mut candidates: Vec<(&Connection, f64)> = network
            .station(last)
            .adjacency()
            .iter()
            .map(|&(dest, conn)| (dest, network.connection(conn)))
            .filter(|(dest, conn)| {
                !usage.is_used(conn.id) && conn.minutes <= route.remaining_time() && !route.contains_station(*dest)
            })
            .map(|(_, conn)| (conn, 0.0))
            .collect();

        if self.guided && !candidates.is_empty() {
            for candidate in candidates.iter_mut() {
                candidate.1 = self.edge_value.value(
                    network,
                    usage,
                    last,
                    candidate.0,
                    route.total_time(),
                    route.time_limit(),
                );
            }
            // shuffle first so that equal values are not always taken in adjacency order
            candidates.shuffle(rng);
            candidates.sort_by_key(|&(_, value)| Reverse(OrderedFloat(value)));
            let keep = if self.top_only { 1 } else { (candidates.len() / 2).max(1) };
            candidates.truncate(keep);
        }

        candidates
    }

    /// Best-scoring route from `start`, or `None` when no connection can be taken
    pub fn find_route_beam(
        &self,
        network: &Network,
        start: StationId,
        usage: &EdgeUsage,
        time_limit: Minutes,
        beam_width: usize,
        rng: &mut ChaCha8Rng,
    ) -> Option<Route> {
        let mut beam = vec![BeamState {
            score: 0.0,
            route: Route::starting_at(time_limit, start),
        }];
        let mut best: Option<BeamState> = None;

        while !beam.is_empty() {
            let mut next_beam = Vec::new();

            for state in &beam {
                for (conn, edge_value) in self.expansions(network, usage, &state.route, rng) {
                    let mut route = state.route.clone();
                    if !route.try_extend(conn) {
                        continue;
                    }

                    let candidate = Candidate {
                        route: &route,
                        connection: conn,
                        edge_value,
                    };
                    let score = self.scoring.score(network, usage, &candidate);

                    if best.as_ref().map_or(true, |b| score > b.score) {
                        best = Some(BeamState {
                            score,
                            route: route.clone(),
                        });
                    }
                    next_beam.push(BeamState { score, route });
                }
            }

            next_beam.sort_by_key(|s| Reverse(OrderedFloat(s.score)));
            next_beam.truncate(beam_width);
            beam = next_beam;
        }

        best.map(|b| b.route)
    }

    fn construct_with_width(
        &self,
        network: &Network,
        config: &SearchConfig,
        beam_width: usize,
        rng: &mut ChaCha8Rng,
    ) -> Vec<Route> {
        assemble_from_seeds(network, config, |seed, usage| {
            self.find_route_beam(network, seed, usage, config.time_limit, beam_width, rng)
        })
    }

    /// Construct once per beam width in `widths` and keep the best solution
    pub fn sweep_widths(
        &self,
        network: &Network,
        config: &SearchConfig,
        widths: RangeInclusive<usize>,
        rng: &mut ChaCha8Rng,
    ) -> Solution {
        let start = std::time::Instant::now();
        let mut best_solution = Solution::from_routes(network, Vec::new(), self.name());
        let mut best_width = None;
        let mut tried = 0;

        for width in widths.filter(|&w| w > 0) {
            tried += 1;
            let routes = self.construct_with_width(network, config, width, rng);
            let quality = network.quality_of(&routes);
            debug!("Beam width {} reached quality {:.2}", width, quality);

            if best_width.is_none() || quality > best_solution.quality {
                best_solution = Solution::from_routes(network, routes, self.name());
                best_width = Some(width);
            }
        }

        if let Some(width) = best_width {
            info!("{}: best beam width {} of {}", self.name(), width, tried);
        }
        best_solution.iterations = Some(tried);
        best_solution.computation_time = start.elapsed().as_secs_f64();
        best_solution
    }
}

impl RouteConstructor for BeamSearchConstructor {
    fn construct(&self, network: &Network, config: &SearchConfig, rng: &mut ChaCha8Rng) -> Solution {
        let start = std::time::Instant::now();
        let routes = self.construct_with_width(network, config, self.beam_width, rng);

        let mut solution = Solution::from_routes(network, routes, self.name());
        solution.computation_time = start.elapsed().as_secs_f64();
        solution
    }

    fn name(&self) -> &str {
        match (self.guided, self.top_only) {
            (true, true) => "BestFirst",
            (true, false) => "GuidedBeamSearch",
            _ => "BeamSearch",
        }
    }
}
