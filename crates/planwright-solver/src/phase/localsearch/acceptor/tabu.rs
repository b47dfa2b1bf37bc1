//! Tabu list shared by the entity, value, move and undo-move tabu acceptors.

use std::collections::{HashMap, VecDeque};
use std::fmt::{self, Debug};
use std::hash::Hash;

/// Remembers the keys of the last `tabu_size` steps.
///
/// A key recorded at step `i` stays tabu for steps `i + 1 ..= i + tabu_size`.
/// A candidate is tabu when any of its keys is. With aspiration enabled a
/// tabu candidate is still accepted when it beats the best score.
///
/// # Example
///
/// ```
/// use planwright_solver::phase::localsearch::TabuAcceptor;
///
/// let mut tabu = TabuAcceptor::new(2, false);
/// tabu.record([7], 0);
/// tabu.step_started(1);
/// assert!(tabu.is_tabu(&[7]));
/// tabu.step_started(2);
/// assert!(tabu.is_tabu(&[7]));
/// tabu.step_started(3);
/// assert!(!tabu.is_tabu(&[7]));
/// ```
pub struct TabuAcceptor<K> {
    tabu_size: usize,
    aspiration_enabled: bool,
    // Latest step at which each key was recorded.
    tabu_steps: HashMap<K, u64>,
    // Every recording in step order; stale entries are skipped on expiry.
    sequence: VecDeque<(K, u64)>,
}

impl<K: Clone + Eq + Hash> TabuAcceptor<K> {
    pub fn new(tabu_size: usize, aspiration_enabled: bool) -> Self {
        Self {
            tabu_size,
            aspiration_enabled,
            tabu_steps: HashMap::new(),
            sequence: VecDeque::new(),
        }
    }

    pub fn tabu_size(&self) -> usize {
        self.tabu_size
    }

    pub fn aspiration_enabled(&self) -> bool {
        self.aspiration_enabled
    }

    /// Number of keys currently tabu.
    pub fn len(&self) -> usize {
        self.tabu_steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabu_steps.is_empty()
    }

    pub fn is_tabu<'a, I>(&self, keys: I) -> bool
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        keys.into_iter().any(|key| self.tabu_steps.contains_key(key))
    }

    /// Accepts non-tabu candidates, and tabu ones that aspire past `best_score`.
    pub fn accepts<'a, I, Sc>(&self, keys: I, move_score: &Sc, best_score: &Sc) -> bool
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
        Sc: Ord,
    {
        if !self.is_tabu(keys) {
            return true;
        }
        self.aspiration_enabled && move_score > best_score
    }

    /// Makes `keys` tabu from the step after `step_index`.
    pub fn record<I>(&mut self, keys: I, step_index: u64)
    where
        I: IntoIterator<Item = K>,
    {
        for key in keys {
            self.tabu_steps.insert(key.clone(), step_index);
            self.sequence.push_back((key, step_index));
        }
    }

    /// Releases the keys recorded `tabu_size` or more steps before `step_index`.
    pub fn step_started(&mut self, step_index: u64) {
        let size = self.tabu_size as u64;
        while let Some((_, recorded)) = self.sequence.front() {
            if recorded.saturating_add(size) >= step_index {
                break;
            }
            if let Some((key, recorded)) = self.sequence.pop_front() {
                if self.tabu_steps.get(&key) == Some(&recorded) {
                    self.tabu_steps.remove(&key);
                }
            }
        }
    }

    pub fn clear(&mut self) {
        self.tabu_steps.clear();
        self.sequence.clear();
    }
}

impl<K> Debug for TabuAcceptor<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TabuAcceptor")
            .field("tabu_size", &self.tabu_size)
            .field("aspiration_enabled", &self.aspiration_enabled)
            .field("tabu_len", &self.tabu_steps.len())
            .finish()
    }
}
