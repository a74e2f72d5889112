//! Search configuration shared by constructors and local search.

use crate::error::ConfigError;
use crate::network::{Minutes, Network};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Parameters of one planning run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum travel minutes of a single route
    pub time_limit: Minutes,
    /// Maximum number of routes in a solution
    pub max_routes: usize,
    /// Partial paths kept per step (beam search only)
    pub beam_width: usize,
    /// Hill-climbing iterations per run
    pub iterations: usize,
    /// Random seed; `None` draws one from the operating system
    pub seed: Option<u64>,
}

impl SearchConfig {
    /// Regional network: 7 routes of at most two hours
    pub fn holland() -> Self {
        SearchConfig {
            time_limit: 120,
            max_routes: 7,
            beam_width: 6,
            iterations: 1000,
            seed: Some(42),
        }
    }

    /// Country-wide network: 20 routes of at most three hours
    pub fn national() -> Self {
        SearchConfig {
            time_limit: 180,
            max_routes: 20,
            ..Self::holland()
        }
    }

    pub fn with_time_limit(mut self, time_limit: Minutes) -> Self {
        self.time_limit = time_limit;
        self
    }

    pub fn with_max_routes(mut self, max_routes: usize) -> Self {
        self.max_routes = max_routes;
        self
    }

    pub fn with_beam_width(mut self, beam_width: usize) -> Self {
        self.beam_width = beam_width;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Check the parameters every strategy needs
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.time_limit == 0 {
            return Err(ConfigError::ZeroTimeLimit);
        }
        if self.max_routes == 0 {
            return Err(ConfigError::ZeroMaxRoutes);
        }
        Ok(())
    }

    /// Full check before a run on `network`
    pub fn validate_for(&self, network: &Network, uses_beam: bool) -> Result<(), ConfigError> {
        self.validate()?;
        if uses_beam && self.beam_width == 0 {
            return Err(ConfigError::ZeroBeamWidth);
        }
        if network.num_connections() == 0 {
            return Err(ConfigError::EmptyNetwork);
        }
        Ok(())
    }

    /// Random source for this run
    pub fn rng(&self) -> ChaCha8Rng {
        match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        }
    }

    /// Random source for the `trial`-th independent trial
    pub fn trial_rng(&self, trial: usize) -> ChaCha8Rng {
        match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(trial as u64)),
            None => ChaCha8Rng::from_entropy(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::holland()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::abc_network;
    use rand::Rng;

    #[test]
    fn test_presets() {
        let holland = SearchConfig::default();
        assert_eq!(holland.time_limit, 120);
        assert_eq!(holland.max_routes, 7);

        let national = SearchConfig::national();
        assert_eq!(national.time_limit, 180);
        assert_eq!(national.max_routes, 20);
        assert_eq!(national.beam_width, holland.beam_width);
    }

    #[test]
    fn test_validation() {
        let network = abc_network();
        assert!(SearchConfig::default().validate_for(&network, true).is_ok());
        assert_eq!(
            SearchConfig::default().with_time_limit(0).validate(),
            Err(ConfigError::ZeroTimeLimit)
        );
        assert_eq!(
            SearchConfig::default().with_max_routes(0).validate(),
            Err(ConfigError::ZeroMaxRoutes)
        );
        let no_beam = SearchConfig::default().with_beam_width(0);
        assert!(no_beam.validate_for(&network, false).is_ok());
        assert_eq!(no_beam.validate_for(&network, true), Err(ConfigError::ZeroBeamWidth));
        assert_eq!(
            SearchConfig::default().validate_for(&Network::new(), false),
            Err(ConfigError::EmptyNetwork)
        );
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let config = SearchConfig::default().with_seed(Some(7));
        let a: Vec<u32> = (0..5).map(|_| config.rng().gen()).collect();
        let mut rng = config.rng();
        let first: u32 = rng.gen();
        assert!(a.iter().all(|&x| x == first));

        let mut t0 = config.trial_rng(0);
        let mut t1 = config.trial_rng(1);
        let x0: u64 = t0.gen();
        let x1: u64 = t1.gen();
        assert_ne!(x0, x1);
    }
}
