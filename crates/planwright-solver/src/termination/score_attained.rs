//! Time gradient of a score target.

use planwright_core::score::Score;

// Share of the remaining weight taken by each level but the last.
const LEVEL_WEIGHT: f64 = 0.75;

/// How far `score` has travelled from `start` towards `target`, in `[0, 1]`.
///
/// Levels are visited from the highest priority down. Every level but the
/// last takes 75% of the weight still unassigned, the last level takes the
/// rest. A level contributes its full weight once it reaches the target and
/// a linear share of it while between start and target. A level strictly
/// above its target decides the comparison, so it also earns the weight of
/// every lower level; a level strictly below its start earns nothing for
/// itself or the levels below it.
///
/// ```
/// use planwright_core::HardSoftScore;
/// use planwright_solver::termination::score_time_gradient;
///
/// let start = HardSoftScore::of(-20, -400);
/// let target = HardSoftScore::of(-10, -300);
/// // 60% of the way on both levels.
/// let gradient = score_time_gradient(&start, &target, &HardSoftScore::of(-14, -340));
/// assert!((gradient - 0.6).abs() < 1e-9);
/// ```
pub fn score_time_gradient<Sc: Score>(start: &Sc, target: &Sc, score: &Sc) -> f64 {
    let starts = start.to_level_numbers();
    let targets = target.to_level_numbers();
    let levels = score.to_level_numbers();
    let count = levels.len().min(starts.len()).min(targets.len());

    let mut gradient = 0.0;
    let mut remaining = 1.0;
    for i in 0..count {
        let width = if i + 1 < count {
            remaining * LEVEL_WEIGHT
        } else {
            remaining
        };
        remaining -= width;

        let (start, target, level) = (starts[i] as f64, targets[i] as f64, levels[i] as f64);
        if level > target {
            gradient += width + remaining;
            break;
        }
        if level == target {
            gradient += width;
            continue;
        }
        if level < start {
            break;
        }
        gradient += width * (level - start) / (target - start);
    }
    gradient.min(1.0)
}
