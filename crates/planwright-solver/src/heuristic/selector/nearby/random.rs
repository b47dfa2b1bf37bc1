//! Distributions that turn a uniform draw into a nearby rank.

use planwright_config::{NearbyDistributionFamily, NearbySelectionConfig};
use rand::Rng;
use statrs::distribution::{Beta, ContinuousCDF};

use crate::heuristic::selector::SelectorError;

const DEFAULT_BETA_ALPHA: f64 = 1.0;
const DEFAULT_BETA_BETA: f64 = 5.0;
const DEFAULT_BLOCK_SIZE_MINIMUM: usize = 1;
const DEFAULT_BLOCK_SIZE_RATIO: f64 = 1.0;

/// Picks a rank in `0..bound` biased towards the nearest destinations.
///
/// Rank 0 is the destination nearest to the origin. Every shape except the
/// uniform part of [`NearbyRandom::Block`] favours small ranks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NearbyRandom {
    /// Density falls linearly from rank 0 to `size_maximum`.
    Linear { size_maximum: usize },
    /// Density falls quadratically from rank 0 to `size_maximum`.
    Parabolic { size_maximum: usize },
    /// Ranks follow a Beta(alpha, beta) distribution scaled to the bound.
    Beta(Beta),
    /// Uniform over a block of the nearest ranks, and with probability
    /// `uniform_probability` uniform over all of them.
    Block {
        size_minimum: usize,
        size_maximum: usize,
        size_ratio: f64,
        uniform_probability: f64,
    },
}

impl Default for NearbyRandom {
    fn default() -> Self {
        NearbyRandom::Linear {
            size_maximum: usize::MAX,
        }
    }
}

impl NearbyRandom {
    pub fn linear(size_maximum: usize) -> Result<Self, SelectorError> {
        check_size_maximum("linear", size_maximum)?;
        Ok(NearbyRandom::Linear { size_maximum })
    }

    pub fn parabolic(size_maximum: usize) -> Result<Self, SelectorError> {
        check_size_maximum("parabolic", size_maximum)?;
        Ok(NearbyRandom::Parabolic { size_maximum })
    }

    pub fn beta(alpha: f64, beta: f64) -> Result<Self, SelectorError> {
        if !(alpha.is_finite() && alpha > 0.0) || !(beta.is_finite() && beta > 0.0) {
            return Err(SelectorError::InvalidDistribution(format!(
                "beta distribution needs finite alpha ({alpha}) and beta ({beta}) above 0"
            )));
        }
        let distribution = Beta::new(alpha, beta).map_err(|e| {
            SelectorError::InvalidDistribution(format!("beta distribution: {e}"))
        })?;
        Ok(NearbyRandom::Beta(distribution))
    }

    pub fn block(
        size_minimum: usize,
        size_maximum: usize,
        size_ratio: f64,
        uniform_probability: f64,
    ) -> Result<Self, SelectorError> {
        if size_maximum < size_minimum {
            return Err(SelectorError::InvalidDistribution(format!(
                "block size maximum ({size_maximum}) is below its minimum ({size_minimum})"
            )));
        }
        if !(0.0..=1.0).contains(&size_ratio) {
            return Err(SelectorError::InvalidDistribution(format!(
                "block size ratio ({size_ratio}) must be within [0, 1]"
            )));
        }
        if !(0.0..=1.0).contains(&uniform_probability) {
            return Err(SelectorError::InvalidDistribution(format!(
                "block uniform probability ({uniform_probability}) must be within [0, 1]"
            )));
        }
        Ok(NearbyRandom::Block {
            size_minimum,
            size_maximum,
            size_ratio,
            uniform_probability,
        })
    }

    /// Builds the configured distribution; the linear default applies when
    /// none is configured. Unset parameters of a family take their defaults.
    pub fn from_config(config: &NearbySelectionConfig) -> Result<Self, SelectorError> {
        let family = config
            .distribution_family()
            .map_err(|e| SelectorError::InvalidDistribution(e.to_string()))?;
        match family {
            None => Ok(NearbyRandom::default()),
            Some(NearbyDistributionFamily::Linear) => {
                Self::linear(config.linear_distribution_size_maximum.unwrap_or(usize::MAX))
            }
            Some(NearbyDistributionFamily::Parabolic) => {
                Self::parabolic(config.parabolic_distribution_size_maximum.unwrap_or(usize::MAX))
            }
            Some(NearbyDistributionFamily::Beta) => Self::beta(
                config.beta_distribution_alpha.unwrap_or(DEFAULT_BETA_ALPHA),
                config.beta_distribution_beta.unwrap_or(DEFAULT_BETA_BETA),
            ),
            Some(NearbyDistributionFamily::Block) => Self::block(
                config
                    .block_distribution_size_minimum
                    .unwrap_or(DEFAULT_BLOCK_SIZE_MINIMUM),
                config.block_distribution_size_maximum.unwrap_or(usize::MAX),
                config
                    .block_distribution_size_ratio
                    .unwrap_or(DEFAULT_BLOCK_SIZE_RATIO),
                config
                    .block_distribution_uniform_distribution_probability
                    .unwrap_or(0.0),
            ),
        }
    }

    /// Number of distinct ranks this distribution can return for `bound`
    /// destinations, ignoring the uniform part of a block distribution.
    pub fn size(&self, bound: usize) -> usize {
        match *self {
            NearbyRandom::Linear { size_maximum } | NearbyRandom::Parabolic { size_maximum } => {
                size_maximum.min(bound)
            }
            NearbyRandom::Beta(_) => bound,
            NearbyRandom::Block { .. } => self.block_size(bound),
        }
    }

    /// `round(ratio * bound)` kept within the configured minimum and
    /// `min(maximum, bound)`, and never below 1.
    pub fn block_size(&self, bound: usize) -> usize {
        match *self {
            NearbyRandom::Block {
                size_minimum,
                size_maximum,
                size_ratio,
                ..
            } => {
                let upper = size_maximum.min(bound);
                let ratio_size = (size_ratio * bound as f64).round() as usize;
                ratio_size.max(size_minimum).min(upper).max(1)
            }
            _ => self.size(bound),
        }
    }

    /// Maps a draw `p` in `[0, 1)` onto a rank in `0..size(bound)`.
    ///
    /// Only meaningful for the shapes driven by one draw; a block
    /// distribution maps `p` uniformly over its block.
    pub fn index_for_draw(&self, p: f64, bound: usize) -> usize {
        let size = self.size(bound);
        if size == 0 {
            return 0;
        }
        let fraction = match *self {
            NearbyRandom::Linear { .. } => 1.0 - (1.0 - p).sqrt(),
            NearbyRandom::Parabolic { .. } => 1.0 - (1.0 - p).cbrt(),
            NearbyRandom::Beta(distribution) => {
                if distribution.shape_a() == 1.0 && distribution.shape_b() == 1.0 {
                    p
                } else {
                    distribution.inverse_cdf(p.clamp(0.0, 1.0))
                }
            }
            NearbyRandom::Block { .. } => p,
        };
        let index = (size as f64 * fraction).floor();
        if index <= 0.0 {
            0
        } else {
            (index as usize).min(size - 1)
        }
    }

    /// Draws a rank in `0..bound`. Returns 0 for an empty bound.
    pub fn next_index<R: Rng>(&self, rng: &mut R, bound: usize) -> usize {
        if bound == 0 {
            return 0;
        }
        match *self {
            NearbyRandom::Block {
                uniform_probability,
                ..
            } => {
                if uniform_probability > 0.0 && rng.random::<f64>() < uniform_probability {
                    return rng.random_range(0..bound);
                }
                rng.random_range(0..self.block_size(bound))
            }
            _ => self.index_for_draw(rng.random::<f64>(), bound),
        }
    }
}

fn check_size_maximum(family: &str, size_maximum: usize) -> Result<(), SelectorError> {
    if size_maximum < 1 {
        return Err(SelectorError::InvalidDistribution(format!(
            "{family} distribution needs a size maximum of at least 1"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    const ALMOST_ONE: f64 = 1.0 - f64::EPSILON;

    #[test]
    fn linear_bounds() {
        let linear = NearbyRandom::linear(100).unwrap();
        assert_eq!(linear.index_for_draw(0.0, 500), 0);
        assert_eq!(linear.index_for_draw(ALMOST_ONE, 10), 9);
        assert_eq!(linear.size(500), 100);
        assert_eq!(linear.index_for_draw(ALMOST_ONE, 500), 99);
    }

    #[test]
    fn parabolic_favours_small_ranks_more_than_linear() {
        let linear = NearbyRandom::linear(100).unwrap();
        let parabolic = NearbyRandom::parabolic(100).unwrap();
        assert_eq!(parabolic.index_for_draw(0.0, 100), 0);
        assert_eq!(parabolic.index_for_draw(ALMOST_ONE, 100), 99);
        // 1 - sqrt(0.5) = 0.2928..., 1 - cbrt(0.5) = 0.2062...
        assert_eq!(linear.index_for_draw(0.5, 100), 29);
        assert_eq!(parabolic.index_for_draw(0.5, 100), 20);
    }

    #[test]
    fn block_size_from_ratio() {
        let block = NearbyRandom::block(10, 300, 0.2, 0.0).unwrap();
        assert_eq!(block.block_size(100), 20);
        // The minimum wins over a small ratio, the bound over the maximum.
        assert_eq!(block.block_size(20), 10);
        assert_eq!(block.block_size(5), 5);
        assert_eq!(NearbyRandom::block(0, 5, 0.0, 0.0).unwrap().block_size(50), 1);
    }

    #[test]
    fn block_draws_stay_in_block() {
        let block = NearbyRandom::block(10, 300, 0.2, 0.0).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..1000 {
            assert!(block.next_index(&mut rng, 100) < 20);
        }
    }

    #[test]
    fn block_uniform_part_reaches_the_whole_bound() {
        let block = NearbyRandom::block(1, 1, 0.0, 1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let far = (0..1000)
            .filter(|_| block.next_index(&mut rng, 100) > 0)
            .count();
        assert!(far > 900);
    }

    #[test]
    fn beta_ranks() {
        let uniform = NearbyRandom::beta(1.0, 1.0).unwrap();
        assert_eq!(uniform.index_for_draw(0.5, 10), 5);
        assert_eq!(uniform.index_for_draw(ALMOST_ONE, 10), 9);
        // Beta(1, 5) has CDF 1 - (1 - x)^5, so the median is 1 - 0.5^(1/5).
        let skewed = NearbyRandom::beta(1.0, 5.0).unwrap();
        assert_eq!(skewed.index_for_draw(0.5, 100), 12);
        let mut rng = StdRng::seed_from_u64(9);
        let near = (0..1000)
            .filter(|_| skewed.next_index(&mut rng, 100) < 13)
            .count();
        assert!((400..600).contains(&near), "{near}");
    }

    #[test]
    fn invalid_parameters_fail_fast() {
        assert!(NearbyRandom::linear(0).is_err());
        assert!(NearbyRandom::beta(0.0, 1.0).is_err());
        assert!(NearbyRandom::beta(1.0, f64::NAN).is_err());
        assert!(NearbyRandom::beta(f64::INFINITY, 1.0).is_err());
        assert!(NearbyRandom::block(5, 4, 0.5, 0.0).is_err());
        assert!(NearbyRandom::block(1, 4, 1.5, 0.0).is_err());
        assert!(NearbyRandom::block(1, 4, 0.5, -0.1).is_err());
    }

    #[test]
    fn config_selects_family() {
        let mut config = NearbySelectionConfig::new("entity", "manhattan");
        assert_eq!(NearbyRandom::from_config(&config).unwrap(), NearbyRandom::default());

        config.parabolic_distribution_size_maximum = Some(7);
        assert_eq!(
            NearbyRandom::from_config(&config).unwrap(),
            NearbyRandom::Parabolic { size_maximum: 7 }
        );

        config.beta_distribution_alpha = Some(2.0);
        assert!(matches!(
            NearbyRandom::from_config(&config),
            Err(SelectorError::InvalidDistribution(_))
        ));
    }
}
