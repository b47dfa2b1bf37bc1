use super::*;

#[test]
fn simple_score_orders_by_value() {
    assert!(SimpleScore::of(-3) > SimpleScore::of(-5));
    assert_eq!(SimpleScore::of(10) - SimpleScore::of(3), SimpleScore::of(7));
    assert_eq!(-SimpleScore::of(4), SimpleScore::of(-4));
    assert!(SimpleScore::of(0).is_feasible());
    assert!(!SimpleScore::of(-1).is_feasible());
}

#[test]
fn simple_score_parses_literals() {
    assert_eq!(SimpleScore::parse(" -10 "), Ok(SimpleScore::of(-10)));
    assert!(SimpleScore::parse("ten").is_err());
    assert_eq!(SimpleScore::of(42).to_string_repr(), "42");
}

#[test]
fn hard_soft_compares_hard_first() {
    let infeasible = HardSoftScore::of(-1, 0);
    let feasible = HardSoftScore::of(0, -1_000);
    assert!(feasible > infeasible);
    assert!(HardSoftScore::of(0, -10) > feasible);
    assert!(!infeasible.is_feasible());
}

#[test]
fn hard_soft_level_numbers() {
    let score = HardSoftScore::of(-2, -30);
    assert_eq!(score.to_level_numbers(), vec![-2, -30]);
    assert_eq!(HardSoftScore::from_level_numbers(&[-2, -30]), score);
    assert_eq!(HardSoftScore::from_level_numbers(&[-2]), HardSoftScore::of_hard(-2));
    assert_eq!(HardSoftScore::level_label(0), Some(ScoreLevel::Hard));
    assert_eq!(HardSoftScore::level_label(1), Some(ScoreLevel::Soft));
    assert_eq!(HardSoftScore::level_label(2), None);
}

#[test]
fn hard_soft_scale() {
    let score = HardSoftScore::of(-3, 10);
    assert_eq!(score.multiply(2.0), HardSoftScore::of(-6, 20));
    assert_eq!(score.divide(2.0), HardSoftScore::of(-2, 5));
    assert_eq!(score.abs(), HardSoftScore::of(3, 10));
}

#[test]
fn hard_soft_parse_round_trip() {
    let score = HardSoftScore::parse("0hard/-20soft").unwrap();
    assert_eq!(score, HardSoftScore::of(0, -20));
    assert_eq!(score.to_string_repr(), "0hard/-20soft");
    assert_eq!(format!("{}", score), "0hard/-20soft");
}

#[test]
fn hard_soft_parse_rejects_malformed() {
    assert!(HardSoftScore::parse("0hard").is_err());
    assert!(HardSoftScore::parse("0soft/0hard").is_err());
    assert!(HardSoftScore::parse("0hard/0soft/0soft").is_err());
    assert!(HardSoftScore::parse("xhard/0soft").is_err());
}

#[test]
fn bendable_compares_lexicographically() {
    type Score22 = BendableScore<2, 2>;
    let a = Score22::of([0, -1], [0, 0]);
    let b = Score22::of([0, 0], [-100, -100]);
    assert!(b > a);
    assert_eq!(Score22::levels_count(), 4);
    assert_eq!(a.to_level_numbers(), vec![0, -1, 0, 0]);
    assert_eq!(Score22::from_level_numbers(&[0, -1, 0, 0]), a);
    assert_eq!(b - a, Score22::of([0, 1], [-100, -100]));
    assert_eq!(Score22::level_label(1), Some(ScoreLevel::Hard));
    assert_eq!(Score22::level_label(2), Some(ScoreLevel::Soft));
}

#[test]
fn bendable_parse_checks_level_count() {
    type Score12 = BendableScore<1, 2>;
    assert_eq!(
        Score12::parse("[0]hard/[-1/-2]soft"),
        Ok(Score12::of([0], [-1, -2]))
    );
    assert!(Score12::parse("[0/0]hard/[-1/-2]soft").is_err());
    assert!(Score12::parse("[0]hard/[-1]soft").is_err());
    assert!(Score12::parse("0hard/-1soft").is_err());
}
