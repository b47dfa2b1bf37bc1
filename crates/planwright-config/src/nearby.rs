//! Nearby selection configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// The distribution family selected by a [`NearbySelectionConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NearbyDistributionFamily {
    Block,
    Linear,
    Parabolic,
    Beta,
}

/// Biases a selector towards destinations close to an origin.
///
/// The origin is the current pick of another selector, referenced by its
/// mimic id. Destinations are ranked by the named distance meter, and under
/// random selection a distribution turns a uniform draw into a rank.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default)]
pub struct NearbySelectionConfig {
    pub origin_selector_ref: Option<String>,
    pub distance_meter: Option<String>,
    pub block_distribution_size_minimum: Option<usize>,
    pub block_distribution_size_maximum: Option<usize>,
    pub block_distribution_size_ratio: Option<f64>,
    pub block_distribution_uniform_distribution_probability: Option<f64>,
    pub linear_distribution_size_maximum: Option<usize>,
    pub parabolic_distribution_size_maximum: Option<usize>,
    pub beta_distribution_alpha: Option<f64>,
    pub beta_distribution_beta: Option<f64>,
}

impl NearbySelectionConfig {
    pub fn new(origin_selector_ref: impl Into<String>, distance_meter: impl Into<String>) -> Self {
        Self {
            origin_selector_ref: Some(origin_selector_ref.into()),
            distance_meter: Some(distance_meter.into()),
            ..Self::default()
        }
    }

    pub fn with_linear_distribution(mut self, size_maximum: usize) -> Self {
        self.linear_distribution_size_maximum = Some(size_maximum);
        self
    }

    pub fn with_parabolic_distribution(mut self, size_maximum: usize) -> Self {
        self.parabolic_distribution_size_maximum = Some(size_maximum);
        self
    }

    pub fn with_beta_distribution(mut self, alpha: f64, beta: f64) -> Self {
        self.beta_distribution_alpha = Some(alpha);
        self.beta_distribution_beta = Some(beta);
        self
    }

    pub fn with_block_distribution(
        mut self,
        size_minimum: usize,
        size_maximum: usize,
        size_ratio: f64,
        uniform_distribution_probability: f64,
    ) -> Self {
        self.block_distribution_size_minimum = Some(size_minimum);
        self.block_distribution_size_maximum = Some(size_maximum);
        self.block_distribution_size_ratio = Some(size_ratio);
        self.block_distribution_uniform_distribution_probability =
            Some(uniform_distribution_probability);
        self
    }

    /// Families that have at least one parameter set.
    pub fn configured_families(&self) -> Vec<NearbyDistributionFamily> {
        let mut families = Vec::new();
        if self.block_distribution_size_minimum.is_some()
            || self.block_distribution_size_maximum.is_some()
            || self.block_distribution_size_ratio.is_some()
            || self.block_distribution_uniform_distribution_probability.is_some()
        {
            families.push(NearbyDistributionFamily::Block);
        }
        if self.linear_distribution_size_maximum.is_some() {
            families.push(NearbyDistributionFamily::Linear);
        }
        if self.parabolic_distribution_size_maximum.is_some() {
            families.push(NearbyDistributionFamily::Parabolic);
        }
        if self.beta_distribution_alpha.is_some() || self.beta_distribution_beta.is_some() {
            families.push(NearbyDistributionFamily::Beta);
        }
        families
    }

    /// The configured family, or `None` to use the linear default.
    pub fn distribution_family(&self) -> Result<Option<NearbyDistributionFamily>, ConfigError> {
        let families = self.configured_families();
        match families.as_slice() {
            [] => Ok(None),
            [family] => Ok(Some(*family)),
            _ => Err(ConfigError::Invalid(format!(
                "nearby selection configures more than one distribution: {:?}",
                families
            ))),
        }
    }

    /// Checks references, the distribution family and parameter ranges.
    pub fn validate(&self, random_selection: bool) -> Result<(), ConfigError> {
        if self.origin_selector_ref.is_none() {
            return Err(ConfigError::Invalid(
                "nearby selection needs an origin_selector_ref".to_string(),
            ));
        }
        if self.distance_meter.is_none() {
            return Err(ConfigError::Invalid(
                "nearby selection needs a distance_meter".to_string(),
            ));
        }
        let family = self.distribution_family()?;
        if family.is_some() && !random_selection {
            return Err(ConfigError::Invalid(
                "a nearby distribution is only allowed with random selection".to_string(),
            ));
        }
        if let Some(ratio) = self.block_distribution_size_ratio {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(ConfigError::Invalid(format!(
                    "block_distribution_size_ratio ({}) must be within [0, 1]",
                    ratio
                )));
            }
        }
        if let Some(probability) = self.block_distribution_uniform_distribution_probability {
            if !(0.0..=1.0).contains(&probability) {
                return Err(ConfigError::Invalid(format!(
                    "block_distribution_uniform_distribution_probability ({}) must be within [0, 1]",
                    probability
                )));
            }
        }
        if let (Some(minimum), Some(maximum)) = (
            self.block_distribution_size_minimum,
            self.block_distribution_size_maximum,
        ) {
            if maximum < minimum {
                return Err(ConfigError::Invalid(format!(
                    "block_distribution_size_maximum ({}) is below the minimum ({})",
                    maximum, minimum
                )));
            }
        }
        for (name, value) in [
            ("linear_distribution_size_maximum", self.linear_distribution_size_maximum),
            ("parabolic_distribution_size_maximum", self.parabolic_distribution_size_maximum),
            ("block_distribution_size_maximum", self.block_distribution_size_maximum),
        ] {
            if value == Some(0) {
                return Err(ConfigError::Invalid(format!("{} must be at least 1", name)));
            }
        }
        for (name, value) in [
            ("beta_distribution_alpha", self.beta_distribution_alpha),
            ("beta_distribution_beta", self.beta_distribution_beta),
        ] {
            if let Some(v) = value {
                if v.is_nan() || v <= 0.0 {
                    return Err(ConfigError::Invalid(format!("{} ({}) must be positive", name, v)));
                }
            }
        }
        Ok(())
    }
}
