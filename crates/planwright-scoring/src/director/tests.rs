use planwright_core::domain::PlanningSolution;
use planwright_core::score::SimpleScore;

use super::{Notification, RecordingScoreDirector, ScoreDirector, SimpleScoreDirector};

#[derive(Clone, Debug)]
struct Slots {
    values: Vec<Option<i64>>,
    score: Option<SimpleScore>,
}

impl PlanningSolution for Slots {
    type Score = SimpleScore;

    fn score(&self) -> Option<Self::Score> {
        self.score
    }

    fn set_score(&mut self, score: Option<Self::Score>) {
        self.score = score;
    }

    fn is_initialized(&self) -> bool {
        self.values.iter().all(Option::is_some)
    }
}

fn penalize_unassigned(s: &Slots) -> SimpleScore {
    SimpleScore::of(-(s.values.iter().filter(|v| v.is_none()).count() as i64))
}

fn director(
    values: Vec<Option<i64>>,
) -> SimpleScoreDirector<Slots, fn(&Slots) -> SimpleScore> {
    SimpleScoreDirector::new(
        Slots {
            values,
            score: None,
        },
        penalize_unassigned as fn(&Slots) -> SimpleScore,
    )
}

fn assign(d: &mut dyn ScoreDirector<Slots>, index: usize, value: Option<i64>) {
    d.before_variable_changed(0, index, "value");
    d.working_solution_mut().values[index] = value;
    d.after_variable_changed(0, index, "value");
}

#[test]
fn caches_score_until_a_change() {
    let mut d = director(vec![None, Some(1)]);
    assert_eq!(d.calculate_score(), SimpleScore::of(-1));
    assert_eq!(d.calculate_score(), SimpleScore::of(-1));
    assert_eq!(d.calculation_count(), 1);

    assign(&mut d, 0, Some(4));
    assert_eq!(d.calculate_score(), SimpleScore::of(0));
    assert_eq!(d.calculation_count(), 2);
    assert_eq!(d.working_solution().score, Some(SimpleScore::of(0)));
}

#[test]
fn tracks_notification_balance() {
    let mut d = director(vec![None]);
    d.before_variable_changed(0, 0, "value");
    assert!(!d.is_notification_balanced());
    d.after_variable_changed(0, 0, "value");
    assert!(d.is_notification_balanced());
}

#[test]
fn reports_initialization_from_solution() {
    let mut d = director(vec![None, Some(2)]);
    assert!(!d.is_working_solution_initialized());
    assign(&mut d, 0, Some(1));
    assert!(d.is_working_solution_initialized());
    assert_eq!(d.clone_working_solution().values, vec![Some(1), Some(2)]);
}

#[test]
fn recording_logs_brackets_in_order() {
    let mut inner = director(vec![None, None]);
    let mut recording = RecordingScoreDirector::new(&mut inner);
    assign(&mut recording, 1, Some(7));
    assign(&mut recording, 0, Some(3));

    assert!(recording.is_balanced());
    assert_eq!(recording.changed_entities(), vec![(0, 1), (0, 0)]);
    assert_eq!(
        recording.notifications()[0],
        Notification::BeforeVariableChanged {
            descriptor_index: 0,
            entity_index: 1,
            variable_name: "value".to_string(),
        }
    );
    assert_eq!(recording.calculate_score(), SimpleScore::of(0));

    let log = recording.take_notifications();
    assert_eq!(log.len(), 4);
    assert!(recording.notifications().is_empty());
    assert_eq!(inner.working_solution().values, vec![Some(3), Some(7)]);
}

#[test]
fn recording_detects_unbalanced_log() {
    let mut inner = director(vec![None]);
    let mut recording = RecordingScoreDirector::new(&mut inner);
    recording.before_entity_added(0, 0);
    assert!(!recording.is_balanced());
    recording.after_entity_added(0, 0);
    assert!(recording.is_balanced());
}
