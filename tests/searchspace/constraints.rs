use searchspace::constraint::{Combiner, Condition, Constraint, ThresholdOperator};
use searchspace::parameter::{
    CategoricalParameter, NumericalContinuousParameter, NumericalDiscreteParameter, Parameter,
};
use searchspace::{Error, ParamValue, SearchSpace};

fn mixture() -> Vec<Parameter> {
    vec![
        NumericalDiscreteParameter::new("frac_a", [0.0, 25.0, 50.0, 75.0, 100.0]).into(),
        NumericalDiscreteParameter::new("frac_b", [0.0, 25.0, 50.0, 75.0, 100.0]).into(),
        CategoricalParameter::new("solvent_1", ["water", "thf", "dmf"]).into(),
        CategoricalParameter::new("solvent_2", ["water", "thf", "dmf"]).into(),
    ]
}

#[test]
fn unknown_parameter_fails_construction() {
    let constraint = Constraint::no_label_duplicates(["solvent_1", "solvent_3"]);
    let err = SearchSpace::create(mixture(), vec![constraint], false).unwrap_err();
    assert!(matches!(err, Error::UnknownParameter { ref name, .. } if name == "solvent_3"));
}

#[test]
fn mixed_constraint_fails_construction() {
    let mut parameters = mixture();
    parameters.push(NumericalContinuousParameter::new("x", 0.0, 1.0).into());
    let constraint = Constraint::discrete_sum(
        ["frac_a", "x"],
        Condition::threshold(100.0, ThresholdOperator::Le),
    );
    assert!(matches!(
        SearchSpace::create(parameters, vec![constraint], false),
        Err(Error::MixedConstraintParameters { .. })
    ));
}

#[test]
fn overlapping_cardinality_fails_construction() {
    let parameters: Vec<Parameter> = ["x", "y", "z"]
        .into_iter()
        .map(|n| NumericalContinuousParameter::new(n, 0.0, 1.0).into())
        .collect();
    let constraints = vec![
        Constraint::cardinality(["x", "y"], 0, 1),
        Constraint::cardinality(["y", "z"], 1, 2),
    ];
    assert!(matches!(
        SearchSpace::create(parameters, constraints, false),
        Err(Error::OverlappingCardinalityConstraints { .. })
    ));
}

#[test]
fn sum_and_label_constraints_filter_rows() {
    let constraints = vec![
        Constraint::no_label_duplicates(["solvent_1", "solvent_2"]),
        Constraint::discrete_sum(
            ["frac_a", "frac_b"],
            Condition::threshold(100.0, ThresholdOperator::Eq).with_tolerance(0.01),
        ),
    ];
    let space = SearchSpace::create(mixture(), constraints, false).unwrap();
    let discrete = space.discrete();

    // 5 fraction pairs summing to 100, 6 ordered solvent pairs
    assert_eq!(discrete.n_rows(), 30);
    let a = discrete.exp_rep().numeric_column("frac_a").unwrap();
    let b = discrete.exp_rep().numeric_column("frac_b").unwrap();
    assert!(a.iter().zip(&b).all(|(a, b)| (a + b - 100.0).abs() < 1e-9));
    let s1 = discrete.exp_rep().column("solvent_1").unwrap();
    let s2 = discrete.exp_rep().column("solvent_2").unwrap();
    assert!(s1.iter().zip(&s2).all(|(a, b)| a != b));
    assert_eq!(discrete.comp_rep().n_rows(), 30);
}

#[test]
fn exclude_with_or_removes_either_condition() {
    let constraint = Constraint::discrete_exclude(
        ["solvent_1", "frac_a"],
        vec![
            Condition::sub_selection(["dmf"]),
            Condition::threshold(50.0, ThresholdOperator::Gt),
        ],
    )
    .combiner(Combiner::Or);
    let space = SearchSpace::create(mixture(), vec![constraint], false).unwrap();
    // solvent_1 in {water, thf} and frac_a in {0, 25, 50}
    assert_eq!(space.discrete().n_rows(), 2 * 3 * 5 * 3);
}

#[test]
fn linked_parameters_keep_equal_values() {
    let constraint = Constraint::linked_parameters(["solvent_1", "solvent_2"]);
    let space = SearchSpace::create(mixture(), vec![constraint], false).unwrap();
    assert_eq!(space.discrete().n_rows(), 5 * 5 * 3);
}

#[test]
fn dependencies_collapse_switched_off_settings() {
    let parameters: Vec<Parameter> = vec![
        CategoricalParameter::new("heating", ["on", "off"]).into(),
        NumericalDiscreteParameter::new("temperature", [50.0, 80.0, 110.0]).into(),
        CategoricalParameter::new("stirrer", ["slow", "fast"]).into(),
    ];
    let constraint = Constraint::dependencies(
        ["heating"],
        vec![Condition::sub_selection(["on"])],
        vec![vec!["temperature".to_owned()]],
    );
    let space = SearchSpace::create(parameters, vec![constraint], false).unwrap();
    let discrete = space.discrete();

    // 3 temperatures x 2 stirrer settings with heating on, 2 with heating off
    assert_eq!(discrete.n_rows(), 8);
    let off_rows = discrete
        .exp_rep()
        .column("heating")
        .unwrap()
        .iter()
        .filter(|v| **v == ParamValue::from("off"))
        .count();
    assert_eq!(off_rows, 2);
}

#[test]
fn product_constraint_uses_threshold() {
    let parameters: Vec<Parameter> = vec![
        NumericalDiscreteParameter::new("a", [1.0, 2.0, 3.0]).into(),
        NumericalDiscreteParameter::new("b", [1.0, 2.0, 3.0]).into(),
    ];
    let constraint =
        Constraint::discrete_product(["a", "b"], Condition::threshold(4.0, ThresholdOperator::Ge));
    let space = SearchSpace::create(parameters, vec![constraint], false).unwrap();
    // (2,2), (2,3), (3,2), (3,3)
    assert_eq!(space.discrete().n_rows(), 4);
}

#[test]
fn continuous_constraints_are_not_materialized() {
    let parameters: Vec<Parameter> = vec![
        NumericalContinuousParameter::new("x", 0.0, 1.0).into(),
        NumericalContinuousParameter::new("y", 0.0, 1.0).into(),
        NumericalDiscreteParameter::new("n", [1.0, 2.0]).into(),
    ];
    let constraints = vec![Constraint::linear_equality(["x", "y"], Some(vec![1.0, 2.0]), 1.0)];
    let space = SearchSpace::create(parameters, constraints, false).unwrap();
    assert_eq!(space.discrete().n_rows(), 2);
    assert_eq!(space.continuous().constraints_lin_eq().len(), 1);
    assert!(space.discrete().constraints().is_empty());
}
