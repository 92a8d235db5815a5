use searchspace::parameter::{
    CategoricalEncoding, CategoricalParameter, CustomDiscreteParameter, NumericalContinuousParameter,
    NumericalDiscreteParameter, Parameter, SubstanceParameter,
};
use searchspace::SearchSpace;

fn within_five_percent(estimate: f64, actual: usize) -> bool {
    let actual = actual as f64;
    (estimate - actual).abs() <= 0.05 * actual
}

fn parameters() -> Vec<Parameter> {
    vec![
        CategoricalParameter::new("base", ["k2co3", "cs2co3", "naotbu"]).into(),
        CategoricalParameter::new("ligand", ["xphos", "sphos", "brettphos", "dppf"])
            .encoding(CategoricalEncoding::Integer)
            .into(),
        NumericalDiscreteParameter::new("temp", [25.0, 50.0, 75.0, 100.0]).into(),
        SubstanceParameter::new("solvent", [("water", "O"), ("ethanol", "CCO"), ("hexane", "CCCCCC")])
            .into(),
        CustomDiscreteParameter::new("catalyst", ["mw", "charge"])
            .label("pd", [106.4, 2.0])
            .label("ni", [58.7, 2.0])
            .label("cu", [63.5, 1.0])
            .into(),
        NumericalContinuousParameter::new("time", 0.0, 10.0).into(),
    ]
}

#[test]
fn estimate_matches_materialized_space() {
    let estimate = SearchSpace::estimate_product_space_size(&parameters()).unwrap();
    let space = SearchSpace::create(parameters(), vec![], false).unwrap();
    let discrete = space.discrete();

    assert_eq!(estimate.exp_rep_shape.0, discrete.n_rows() as u128);
    assert_eq!(estimate.exp_rep_shape.1, discrete.exp_rep().n_cols());
    assert_eq!(estimate.comp_rep_shape.0, discrete.comp_rep().n_rows() as u128);
    assert_eq!(estimate.comp_rep_shape.1, discrete.comp_rep().n_cols());

    assert!(within_five_percent(
        estimate.exp_rep_bytes,
        discrete.exp_rep().memory_usage()
    ));
    assert!(within_five_percent(
        estimate.comp_rep_bytes,
        discrete.comp_rep().memory_usage()
    ));
}

#[test]
fn estimate_does_not_enumerate() {
    let parameters: Vec<Parameter> = (0..64)
        .map(|i| NumericalDiscreteParameter::new(format!("p{i}"), [0.0, 1.0]).into())
        .collect();
    let estimate = SearchSpace::estimate_product_space_size(&parameters).unwrap();
    assert_eq!(estimate.exp_rep_shape, (1_u128 << 64, 64));
    assert_eq!(estimate.comp_rep_shape, (1_u128 << 64, 64));
    assert!(estimate.comp_rep_bytes > 1e20);
}

#[test]
fn continuous_only_estimate_is_empty() {
    let parameters: Vec<Parameter> = vec![NumericalContinuousParameter::new("x", 0.0, 1.0).into()];
    let estimate = SearchSpace::estimate_product_space_size(&parameters).unwrap();
    assert_eq!(estimate.exp_rep_shape, (0, 0));
    assert_eq!(estimate.comp_rep_bytes, 0.0);
}
