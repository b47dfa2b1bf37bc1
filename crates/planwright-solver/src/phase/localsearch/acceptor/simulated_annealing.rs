//! Simulated annealing acceptor.

use std::fmt;
use std::marker::PhantomData;

use planwright_core::score::Score;
use planwright_core::{PlanwrightError, Result};
use rand::Rng;

/// Floor for a level's temperature, so that division stays finite.
const TEMPERATURE_MINIMUM: f64 = 1.0e-100;

/// Accepts worsening moves with a probability that shrinks as the phase
/// progresses.
///
/// Every score level has its own temperature, `T₀ · (1 - timeGradient)`.
/// A move at least as good as the last step score is always accepted;
/// otherwise the acceptance chance is the product of `exp(-Δ/T)` over the
/// levels on which the move is worse by `Δ`.
///
/// # Example
///
/// ```
/// use planwright_core::HardSoftScore;
/// use planwright_solver::phase::localsearch::SimulatedAnnealingAcceptor;
///
/// let mut annealing = SimulatedAnnealingAcceptor::new(HardSoftScore::of(0, 10)).unwrap();
/// annealing.step_started(0.5);
/// assert_eq!(annealing.temperatures()[1], 5.0);
/// let chance = annealing.accept_chance(&HardSoftScore::of(0, -3), &HardSoftScore::of(0, -8));
/// assert!((chance - (-1.0f64).exp()).abs() < 1e-12);
/// ```
pub struct SimulatedAnnealingAcceptor<Sc> {
    starting_temperatures: Vec<f64>,
    temperatures: Vec<f64>,
    _score: PhantomData<fn() -> Sc>,
}

impl<Sc: Score> SimulatedAnnealingAcceptor<Sc> {
    /// Fails when a level of `starting_temperature` is negative or all
    /// levels are zero.
    pub fn new(starting_temperature: Sc) -> Result<Self> {
        let levels = starting_temperature.to_level_numbers();
        if levels.iter().any(|level| *level < 0) {
            return Err(PlanwrightError::Config(format!(
                "simulated annealing starting temperature ({starting_temperature}) cannot have a negative level"
            )));
        }
        if levels.iter().all(|level| *level == 0) {
            return Err(PlanwrightError::Config(format!(
                "simulated annealing starting temperature ({starting_temperature}) must be above zero"
            )));
        }
        let starting_temperatures: Vec<f64> = levels.iter().map(|level| *level as f64).collect();
        Ok(Self {
            temperatures: starting_temperatures.clone(),
            starting_temperatures,
            _score: PhantomData,
        })
    }

    /// Current temperature per level.
    pub fn temperatures(&self) -> &[f64] {
        &self.temperatures
    }

    pub fn phase_started(&mut self) {
        self.temperatures.clone_from(&self.starting_temperatures);
    }

    /// Cools down to the phase's `time_gradient`.
    pub fn step_started(&mut self, time_gradient: f64) {
        let remaining = 1.0 - time_gradient.clamp(0.0, 1.0);
        for (temperature, start) in self.temperatures.iter_mut().zip(&self.starting_temperatures) {
            *temperature = (start * remaining).max(TEMPERATURE_MINIMUM);
        }
    }

    /// Probability of accepting `move_score` after `last_step_score`.
    pub fn accept_chance(&self, last_step_score: &Sc, move_score: &Sc) -> f64 {
        if move_score >= last_step_score {
            return 1.0;
        }
        let deltas = (*last_step_score - *move_score).to_level_numbers();
        deltas
            .iter()
            .zip(&self.temperatures)
            .filter(|(delta, _)| **delta > 0)
            .map(|(delta, temperature)| (-(*delta as f64) / temperature).exp())
            .product()
    }

    pub fn is_accepted<R: Rng>(
        &self,
        last_step_score: &Sc,
        move_score: &Sc,
        rng: &mut R,
    ) -> bool {
        if move_score >= last_step_score {
            return true;
        }
        rng.random::<f64>() < self.accept_chance(last_step_score, move_score)
    }
}

impl<Sc> fmt::Debug for SimulatedAnnealingAcceptor<Sc> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulatedAnnealingAcceptor")
            .field("starting_temperatures", &self.starting_temperatures)
            .field("temperatures", &self.temperatures)
            .finish()
    }
}
