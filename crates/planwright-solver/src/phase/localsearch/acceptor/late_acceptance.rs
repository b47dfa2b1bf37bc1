//! Late acceptance acceptor.

use std::fmt::{self, Debug};

/// Accepts a move that is at least as good as the step score of
/// `late_acceptance_size` steps ago.
///
/// The history is a ring buffer filled with the phase's starting score.
/// With hill climbing enabled a move not worse than the last step score is
/// accepted as well.
///
/// # Example
///
/// ```
/// use planwright_core::SimpleScore;
/// use planwright_solver::phase::localsearch::LateAcceptanceAcceptor;
///
/// let mut late = LateAcceptanceAcceptor::new(2, false);
/// late.phase_started(SimpleScore::of(-10));
/// late.step_ended(SimpleScore::of(-12));
///
/// // Compared against -10, two steps back.
/// assert!(late.is_accepted(&SimpleScore::of(-12), &SimpleScore::of(-10)));
/// assert!(!late.is_accepted(&SimpleScore::of(-12), &SimpleScore::of(-11)));
/// ```
#[derive(Clone)]
pub struct LateAcceptanceAcceptor<Sc> {
    late_acceptance_size: usize,
    hill_climbing: bool,
    history: Vec<Sc>,
    index: usize,
}

impl<Sc: Copy + Ord> LateAcceptanceAcceptor<Sc> {
    /// A size of zero is raised to one.
    pub fn new(late_acceptance_size: usize, hill_climbing: bool) -> Self {
        Self {
            late_acceptance_size: late_acceptance_size.max(1),
            hill_climbing,
            history: Vec::new(),
            index: 0,
        }
    }

    pub fn late_acceptance_size(&self) -> usize {
        self.late_acceptance_size
    }

    pub fn phase_started(&mut self, starting_score: Sc) {
        self.history = vec![starting_score; self.late_acceptance_size];
        self.index = 0;
    }

    /// The score a move is compared against in the current step.
    pub fn late_score(&self) -> Option<&Sc> {
        self.history.get(self.index)
    }

    pub fn is_accepted(&self, last_step_score: &Sc, move_score: &Sc) -> bool {
        match self.late_score() {
            Some(late) if move_score >= late => true,
            Some(_) => self.hill_climbing && move_score >= last_step_score,
            None => true,
        }
    }

    /// Records the step score in place of the oldest one.
    pub fn step_ended(&mut self, step_score: Sc) {
        if let Some(slot) = self.history.get_mut(self.index) {
            *slot = step_score;
            self.index = (self.index + 1) % self.late_acceptance_size;
        }
    }

    pub fn phase_ended(&mut self) {
        self.history.clear();
        self.index = 0;
    }
}

impl<Sc: Debug> Debug for LateAcceptanceAcceptor<Sc> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LateAcceptanceAcceptor")
            .field("late_acceptance_size", &self.late_acceptance_size)
            .field("hill_climbing", &self.hill_climbing)
            .field("late_score", &self.history.get(self.index))
            .finish()
    }
}
