use searchspace::parameter::{
    CategoricalParameter, NumericalContinuousParameter, NumericalDiscreteParameter, Parameter,
};
use searchspace::{Error, SearchSpace, SearchSpaceType, SubspaceContinuous, SubspaceDiscrete};

#[test]
fn bounds_place_discrete_before_continuous() {
    let parameters: Vec<Parameter> = vec![
        NumericalDiscreteParameter::new("A_disc", [1.0, 2.0, 3.0]).into(),
        NumericalContinuousParameter::new("A_cont", 4.0, 6.0).into(),
        NumericalDiscreteParameter::new("B_disc", [7.0, 8.0, 9.0]).into(),
        NumericalContinuousParameter::new("B_cont", 10.0, 12.0).into(),
    ];
    let space = SearchSpace::create(parameters, vec![], false).unwrap();

    let bounds = space.param_bounds_comp();
    assert_eq!(bounds.shape(), (2, 4));
    let lower: Vec<f64> = bounds.row(0).iter().copied().collect();
    let upper: Vec<f64> = bounds.row(1).iter().copied().collect();
    assert_eq!(lower, vec![1.0, 7.0, 4.0, 10.0]);
    assert_eq!(upper, vec![3.0, 9.0, 6.0, 12.0]);
}

#[test]
fn caller_order_is_kept_for_parameters() {
    let parameters: Vec<Parameter> = vec![
        NumericalContinuousParameter::new("x", 0.0, 1.0).into(),
        NumericalDiscreteParameter::new("n", [1.0, 2.0]).into(),
    ];
    let space = SearchSpace::create(parameters, vec![], false).unwrap();
    assert_eq!(space.param_names(), vec!["x", "n"]);
    assert_eq!(space.comp_columns(), vec!["n", "x"]);
}

#[test]
fn zero_parameters_is_an_error() {
    assert!(matches!(
        SearchSpace::create(vec![], vec![], false),
        Err(Error::EmptySearchSpace)
    ));
}

#[test]
fn classification_follows_parameter_kinds() {
    let continuous: Vec<Parameter> = vec![NumericalContinuousParameter::new("x", 0.0, 1.0).into()];
    let discrete: Vec<Parameter> = vec![CategoricalParameter::new("c", ["a", "b"]).into()];

    let space = SearchSpace::create(continuous.clone(), vec![], false).unwrap();
    assert_eq!(space.search_space_type(), SearchSpaceType::Continuous);

    let space = SearchSpace::create(discrete.clone(), vec![], false).unwrap();
    assert_eq!(space.search_space_type(), SearchSpaceType::Discrete);

    let both = discrete.into_iter().chain(continuous).collect();
    let space = SearchSpace::create(both, vec![], false).unwrap();
    assert_eq!(space.search_space_type(), SearchSpaceType::Hybrid);
}

#[test]
fn continuous_space_from_bounds_is_continuous() {
    let bounds = searchspace::Frame::from_rows(
        &["x", "y"],
        vec![vec![0.0.into(), (-1.0).into()], vec![1.0.into(), 1.0.into()]],
    )
    .unwrap();
    let continuous = SubspaceContinuous::from_bounds(&bounds).unwrap();
    let space = SearchSpace::from_parts(SubspaceDiscrete::empty(), continuous).unwrap();
    assert_eq!(space.search_space_type(), SearchSpaceType::Continuous);
    assert_eq!(space.discrete().n_rows(), 0);
}

#[test]
fn binary_parameters_multiply() {
    let parameters: Vec<Parameter> = (0..4)
        .map(|i| CategoricalParameter::new(format!("p{i}"), ["on", "off"]).into())
        .collect();
    let space = SearchSpace::create(parameters, vec![], false).unwrap();
    let discrete = space.discrete();
    assert_eq!(discrete.n_rows(), 16);
    assert_eq!(discrete.comp_rep().n_rows(), 16);
    assert_eq!(discrete.metadata().len(), 16);
    assert_eq!(discrete.comp_rep().n_cols(), 8);
}

#[test]
fn invalid_parameters_fail_construction() {
    let duplicate: Vec<Parameter> = vec![NumericalDiscreteParameter::new("n", [1.0, 1.0]).into()];
    assert!(matches!(
        SearchSpace::create(duplicate, vec![], false),
        Err(Error::DuplicateValues { .. })
    ));

    let tolerance: Vec<Parameter> =
        vec![NumericalDiscreteParameter::new("n", [1.0, 2.0]).tolerance(0.5).into()];
    assert!(matches!(
        SearchSpace::create(tolerance, vec![], false),
        Err(Error::InvalidTolerance { .. })
    ));

    let bounds: Vec<Parameter> = vec![NumericalContinuousParameter::new("x", 2.0, 1.0).into()];
    assert!(matches!(
        SearchSpace::create(bounds, vec![], false),
        Err(Error::InvalidBounds { .. })
    ));
}

#[test]
fn colliding_computational_columns_are_rejected() {
    // one-hot column "c_x" of "c" collides with the numerical parameter "c_x"
    let parameters: Vec<Parameter> = vec![
        CategoricalParameter::new("c", ["x", "y"]).into(),
        NumericalDiscreteParameter::new("c_x", [5.0, 6.0, 7.0]).into(),
    ];
    assert!(matches!(
        SearchSpace::create(parameters.clone(), vec![], false),
        Err(Error::DuplicateCompColumn { ref column }) if column == "c_x"
    ));
    assert!(matches!(
        SubspaceDiscrete::create(parameters.clone(), vec![], false),
        Err(Error::DuplicateCompColumn { .. })
    ));
    // without a computational representation nothing collides
    let space = SearchSpace::create(parameters, vec![], true).unwrap();
    assert_eq!(space.discrete().n_rows(), 6);

    let hybrid: Vec<Parameter> = vec![
        CategoricalParameter::new("c", ["x", "y"]).into(),
        NumericalContinuousParameter::new("c_y", 0.0, 1.0).into(),
    ];
    assert!(matches!(
        SearchSpace::create(hybrid, vec![], false),
        Err(Error::DuplicateCompColumn { ref column }) if column == "c_y"
    ));
}

#[test]
fn distinct_computational_columns_keep_their_values() {
    let parameters: Vec<Parameter> = vec![
        CategoricalParameter::new("c", ["x", "y"]).into(),
        NumericalDiscreteParameter::new("cx", [5.0, 6.0, 7.0]).into(),
    ];
    let space = SearchSpace::create(parameters, vec![], false).unwrap();
    let discrete = space.discrete();
    assert_eq!(discrete.comp_columns(), &["c_x", "c_y", "cx"]);
    let bounds = discrete.param_bounds_comp();
    assert_eq!((bounds[(0, 2)], bounds[(1, 2)]), (5.0, 7.0));
    assert_eq!(
        discrete.comp_rep().column("cx").unwrap(),
        vec![5.0, 6.0, 7.0, 5.0, 6.0, 7.0]
    );
}
