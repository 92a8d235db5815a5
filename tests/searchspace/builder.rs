use searchspace::constraint::Constraint;
use searchspace::parameter::{
    CategoricalParameter, NumericalContinuousParameter, NumericalDiscreteParameter, Parameter,
};
use searchspace::{Error, SearchSpace, SearchSpaceType};

#[test]
fn builder_matches_create() {
    let built = SearchSpace::builder()
        .parameter(CategoricalParameter::new("solvent", ["water", "thf"]))
        .parameter(NumericalDiscreteParameter::new("temp", [20.0, 40.0]))
        .build()
        .unwrap();
    let created = SearchSpace::create(
        vec![
            CategoricalParameter::new("solvent", ["water", "thf"]).into(),
            NumericalDiscreteParameter::new("temp", [20.0, 40.0]).into(),
        ],
        vec![],
        false,
    )
    .unwrap();
    assert_eq!(built, created);
}

#[test]
fn row_limit_is_checked_before_enumeration() {
    let result = SearchSpace::builder()
        .parameters((0..40).map(|i| {
            Parameter::from(NumericalDiscreteParameter::new(format!("p{i}"), [0.0, 1.0]))
        }))
        .max_product_rows(1_000_000)
        .build();
    match result {
        Err(Error::ProductSpaceTooLarge { rows, limit }) => {
            assert_eq!(rows, 1_u128 << 40);
            assert_eq!(limit, 1_000_000);
        }
        other => panic!("expected ProductSpaceTooLarge, got {other:?}"),
    }
}

#[test]
fn row_limit_ignores_continuous_parameters() {
    let space = SearchSpace::builder()
        .parameter(NumericalDiscreteParameter::new("n", [1.0, 2.0, 3.0]))
        .parameter(NumericalContinuousParameter::new("x", 0.0, 1.0))
        .max_product_rows(3)
        .build()
        .unwrap();
    assert_eq!(space.search_space_type(), SearchSpaceType::Hybrid);
}

#[test]
fn empty_encoding_skips_computational_columns() {
    let space = SearchSpace::builder()
        .parameter(CategoricalParameter::new("solvent", ["water", "thf", "dmf"]))
        .parameter(NumericalDiscreteParameter::new("temp", [20.0, 40.0]))
        .empty_encoding(true)
        .build()
        .unwrap();
    let discrete = space.discrete();
    assert!(discrete.empty_encoding());
    assert_eq!(discrete.n_rows(), 6);
    assert_eq!(discrete.comp_rep().n_rows(), 6);
    assert_eq!(discrete.comp_rep().n_cols(), 0);
    assert!(discrete.comp_columns().is_empty());
}

#[test]
fn constraints_are_forwarded() {
    let space = SearchSpace::builder()
        .parameter(CategoricalParameter::new("a", ["x", "y", "z"]))
        .parameter(CategoricalParameter::new("b", ["x", "y", "z"]))
        .constraints([Constraint::no_label_duplicates(["a", "b"])])
        .build()
        .unwrap();
    assert_eq!(space.discrete().n_rows(), 6);
    assert_eq!(space.discrete().constraints().len(), 1);
}
