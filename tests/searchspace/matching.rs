use searchspace::constraint::{Condition, Constraint};
use searchspace::parameter::{CategoricalParameter, NumericalDiscreteParameter, Parameter};
use searchspace::{Error, Frame, ParamValue, SearchSpace, SubspaceDiscrete};

fn reaction() -> SearchSpace {
    SearchSpace::builder()
        .parameter(CategoricalParameter::new("solvent", ["water", "thf", "dmf"]))
        .parameter(NumericalDiscreteParameter::new("temp", [20.0, 40.0, 60.0]).tolerance(2.0))
        .build()
        .unwrap()
}

fn measurements(rows: Vec<(&str, f64)>) -> Frame {
    Frame::from_rows(
        &["solvent", "temp", "yield"],
        rows.into_iter()
            .map(|(s, t)| vec![s.into(), t.into(), 0.5.into()])
            .collect(),
    )
    .unwrap()
}

#[test]
fn measurements_within_tolerance_are_matched() {
    let mut space = reaction();
    let matched = space
        .discrete_mut()
        .mark_as_measured(&measurements(vec![("dmf", 59.0), ("water", 21.5)]), true)
        .unwrap();
    // rows are ordered solvent-major: water 0..3, thf 3..6, dmf 6..9
    assert_eq!(matched, vec![8, 0]);
    let metadata = space.discrete().metadata();
    assert!(metadata.was_measured(8));
    assert!(metadata.was_measured(0));
    assert_eq!(metadata.n_measured(), 2);
}

#[test]
fn out_of_tolerance_measurement_is_rejected_when_required() {
    let mut space = reaction();
    let err = space
        .discrete_mut()
        .mark_as_measured(&measurements(vec![("thf", 30.0)]), true)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidMeasurement { row: 0, ref parameter } if parameter == "temp"));
    assert_eq!(space.discrete().metadata().n_measured(), 0);
}

#[test]
fn out_of_tolerance_measurement_snaps_to_closest_value_when_allowed() {
    let mut space = reaction();
    let matched = space
        .discrete_mut()
        .mark_as_measured(&measurements(vec![("thf", 33.0), ("thf", 150.0)]), false)
        .unwrap();
    assert_eq!(matched, vec![4, 5]);
}

#[test]
fn undeclared_label_is_rejected() {
    let space = reaction();
    let err = space
        .discrete()
        .match_measurements(&measurements(vec![("acetone", 20.0)]), false)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidMeasurement { ref parameter, .. } if parameter == "solvent"));
}

#[test]
fn missing_parameter_column_is_rejected() {
    let space = reaction();
    let data = Frame::from_rows(&["solvent"], vec![vec!["thf".into()]]).unwrap();
    assert!(matches!(
        space.discrete().match_measurements(&data, true),
        Err(Error::MissingColumn { ref name }) if name == "temp"
    ));
}

#[test]
fn label_only_space_matches_exactly() {
    let mut space = SearchSpace::builder()
        .parameter(CategoricalParameter::new("a", ["x", "y"]))
        .parameter(CategoricalParameter::new("b", ["x", "y"]))
        .build()
        .unwrap();
    let data = Frame::from_rows(&["a", "b"], vec![vec!["y".into(), "x".into()]]).unwrap();
    let matched = space.discrete_mut().mark_as_measured(&data, true).unwrap();
    assert_eq!(matched, vec![2]);
}

#[test]
fn measurement_of_removed_row_matches_nothing() {
    let mut space = SearchSpace::builder()
        .parameter(CategoricalParameter::new("a", ["x", "y"]))
        .parameter(CategoricalParameter::new("b", ["x", "y"]))
        .constraint(Constraint::discrete_exclude(
            ["a", "b"],
            vec![Condition::sub_selection(["y"]), Condition::sub_selection(["x"])],
        ))
        .build()
        .unwrap();
    assert_eq!(space.discrete().n_rows(), 3);

    let data = Frame::from_rows(&["a", "b"], vec![vec!["y".into(), "x".into()]]).unwrap();
    let matched = space.discrete_mut().mark_as_measured(&data, true).unwrap();
    assert!(matched.is_empty());
    assert_eq!(space.discrete().metadata().n_measured(), 0);
}

#[test]
fn duplicate_rows_resolve_to_the_first() {
    let rows = Frame::from_rows(
        &["c", "n"],
        vec![
            vec!["a".into(), 1.0.into()],
            vec!["a".into(), 1.0.into()],
            vec!["b".into(), 2.0.into()],
        ],
    )
    .unwrap();
    let mut space = SubspaceDiscrete::from_dataframe(&rows, vec![]).unwrap();
    assert_eq!(space.n_rows(), 3);

    let data = Frame::from_rows(&["c", "n"], vec![vec!["a".into(), 1.0.into()]]).unwrap();
    assert_eq!(space.mark_as_measured(&data, true).unwrap(), vec![0]);
    assert!(!space.metadata().was_measured(1));
}

#[test]
fn inferred_parameters_follow_column_content() {
    let rows = Frame::from_rows(
        &["c", "n"],
        vec![
            vec!["a".into(), 1.0.into()],
            vec![ParamValue::from(3.0), 2.0.into()],
        ],
    )
    .unwrap();
    let space = SubspaceDiscrete::from_dataframe(&rows, vec![]).unwrap();
    let kinds: Vec<bool> = space.parameters().iter().map(Parameter::is_numeric).collect();
    assert_eq!(kinds, vec![false, true]);
    assert_eq!(space.exp_rep().column("c").unwrap()[1], ParamValue::from("3"));
}

#[test]
fn candidates_respect_flags() {
    let mut space = reaction();
    let discrete = space.discrete_mut();
    discrete
        .mark_as_measured(&measurements(vec![("water", 20.0)]), true)
        .unwrap();
    discrete.mark_as_recommended(&[1, 2]).unwrap();
    discrete.exclude(&[8]).unwrap();

    let candidates = discrete.get_candidates(false, false).unwrap();
    assert_eq!(candidates.indices, vec![3, 4, 5, 6, 7]);
    assert_eq!(candidates.exp_rep.n_rows(), 5);
    assert_eq!(candidates.comp_rep.n_rows(), 5);

    let candidates = discrete.get_candidates(true, true).unwrap();
    assert_eq!(candidates.len(), 8);
    assert!(!candidates.indices.contains(&8));

    assert!(matches!(
        discrete.exclude(&[3, 99]),
        Err(Error::RowOutOfRange { index: 99, .. })
    ));
    assert!(!discrete.metadata().dont_recommend(3));
}
