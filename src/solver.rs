//! Entry points tying construction and local search together.

use crate::config::SearchConfig;
use crate::error::ConfigError;
use crate::heuristics::beam::BeamSearchConstructor;
use crate::heuristics::construction::ConstructorKind;
use crate::heuristics::local_search::{HillClimber, LocalSearch};
use crate::network::Network;
use crate::solution::Solution;
use log::{info, warn};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// What a run does: one constructor, optionally followed by hill climbing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub constructor: ConstructorKind,
    pub hill_climb: bool,
}

impl Plan {
    pub fn new(constructor: ConstructorKind) -> Self {
        Plan {
            constructor,
            hill_climb: false,
        }
    }

    pub fn with_hill_climb(mut self) -> Self {
        self.hill_climb = true;
        self
    }
}

fn check(network: &Network, config: &SearchConfig, uses_beam: bool) -> Result<(), ConfigError> {
    config.validate_for(network, uses_beam).map_err(|e| {
        warn!("Rejected configuration: {}", e);
        e
    })
}

fn run_plan(network: &Network, config: &SearchConfig, plan: &Plan, rng: &mut ChaCha8Rng) -> Solution {
    let constructor = plan.constructor.build(config);
    let mut solution = constructor.construct(network, config, rng);

    if plan.hill_climb {
        HillClimber::with_params(config.iterations).improve(network, config, &mut solution, rng);
    }
    solution
}

/// Validate `config`, then run `plan` once with the configured seed
pub fn solve(network: &Network, config: &SearchConfig, plan: &Plan) -> Result<Solution, ConfigError> {
    check(network, config, plan.constructor.uses_beam())?;

    let mut rng = config.rng();
    let solution = run_plan(network, config, plan, &mut rng);
    info!(
        "{}: quality {:.2} with {} routes in {:.4}s",
        solution.algorithm,
        solution.quality,
        solution.num_routes(),
        solution.computation_time
    );
    Ok(solution)
}

/// Run `trials` independent runs of `plan` in parallel.
///
/// Trial `i` is seeded with `seed + i`. The best solution is returned; on
/// equal quality the lowest trial index wins. At least one trial always runs.
pub fn run_trials(network: &Network, config: &SearchConfig, plan: &Plan, trials: usize) -> Result<Solution, ConfigError> {
    check(network, config, plan.constructor.uses_beam())?;

    let start = std::time::Instant::now();
    let results: Vec<Solution> = (0..trials.max(1))
        .into_par_iter()
        .map(|trial| {
            let mut rng = config.trial_rng(trial);
            run_plan(network, config, plan, &mut rng)
        })
        .collect();

    let count = results.len();
    let mut best: Option<(usize, Solution)> = None;
    for (trial, solution) in results.into_iter().enumerate() {
        if best.as_ref().map_or(true, |(_, b)| solution.quality > b.quality) {
            best = Some((trial, solution));
        }
    }

    match best {
        Some((trial, mut solution)) => {
            info!("Best of {} trials: #{} with quality {:.2}", count, trial, solution.quality);
            solution.computation_time = start.elapsed().as_secs_f64();
            Ok(solution)
        }
        None => Ok(Solution::from_routes(network, Vec::new(), "none")),
    }
}

/// Construct with every beam width in `widths` and keep the best solution
pub fn sweep_beam_widths(
    network: &Network,
    config: &SearchConfig,
    guided: bool,
    widths: RangeInclusive<usize>,
) -> Result<Solution, ConfigError> {
    check(network, config, false)?;

    let beam = if guided {
        BeamSearchConstructor::guided(config.beam_width)
    } else {
        BeamSearchConstructor::new(config.beam_width)
    };
    let mut rng = config.rng();
    Ok(beam.sweep_widths(network, config, widths, &mut rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{abc_network, init_logger, sample_network};

    #[test]
    fn test_solve_rejects_invalid_config() {
        let network = abc_network();
        let plan = Plan::new(ConstructorKind::Greedy);
        assert_eq!(
            solve(&network, &SearchConfig::default().with_max_routes(0), &plan).err(),
            Some(ConfigError::ZeroMaxRoutes)
        );
        assert_eq!(
            solve(&Network::new(), &SearchConfig::default(), &plan).err(),
            Some(ConfigError::EmptyNetwork)
        );

        let beam = Plan::new(ConstructorKind::BeamSearch);
        let no_beam = SearchConfig::default().with_beam_width(0);
        assert_eq!(solve(&network, &no_beam, &beam).err(), Some(ConfigError::ZeroBeamWidth));
        assert!(solve(&network, &no_beam, &plan).is_ok());
    }

    #[test]
    fn test_solve_greedy_abc() {
        init_logger();
        let network = abc_network();
        let solution = solve(&network, &SearchConfig::default(), &Plan::new(ConstructorKind::Greedy)).unwrap();
        assert!((solution.quality - 9875.0).abs() < 1e-9);
        assert_eq!(solution.total_time(), 25);
    }

    #[test]
    fn test_hill_climb_never_worsens_construction() {
        let network = sample_network();
        let config = SearchConfig::default().with_iterations(300);
        for kind in ConstructorKind::ALL {
            let built = solve(&network, &config, &Plan::new(kind)).unwrap();
            let climbed = solve(&network, &config, &Plan::new(kind).with_hill_climb()).unwrap();
            assert!(climbed.quality >= built.quality, "{:?}", kind);
            assert!(climbed.is_feasible(&network, &config), "{:?}", kind);
        }
    }

    #[test]
    fn test_trials_are_reproducible_and_best() {
        let network = sample_network();
        let config = SearchConfig::default().with_iterations(100);
        let plan = Plan::new(ConstructorKind::Random).with_hill_climb();

        let first = run_trials(&network, &config, &plan, 4).unwrap();
        let second = run_trials(&network, &config, &plan, 4).unwrap();
        assert_eq!(first.routes, second.routes);

        // trial 0 uses the configured seed itself
        let single = solve(&network, &config, &plan).unwrap();
        assert!(first.quality >= single.quality);
    }

    #[test]
    fn test_sweep_beam_widths() {
        let network = sample_network();
        let config = SearchConfig::default();
        let swept = sweep_beam_widths(&network, &config, false, 2..=5).unwrap();
        let width_four = solve(&network, &config.with_beam_width(4), &Plan::new(ConstructorKind::BeamSearch)).unwrap();
        assert!(swept.is_feasible(&network, &config));
        assert!(swept.quality >= width_four.quality);
        assert_eq!(swept.iterations, Some(4));
    }
}
