use searchspace::parameter::{
    CategoricalEncoding, CategoricalParameter, NumericalContinuousParameter, NumericalDiscreteParameter,
};
use searchspace::{Error, Frame, SearchSpace, SubspaceDiscrete};

fn rows(names: &[&str], values: Vec<Vec<searchspace::ParamValue>>) -> Frame {
    Frame::from_rows(names, values).unwrap()
}

#[test]
fn empty_encoding_transform_has_no_columns() {
    let space = SearchSpace::builder()
        .parameter(CategoricalParameter::new("c", ["a", "b"]))
        .empty_encoding(true)
        .build()
        .unwrap();
    let data = rows(&["c"], vec![vec!["a".into()], vec!["b".into()]]);
    let comp = space.discrete().transform(&data).unwrap();
    assert_eq!(comp.n_rows(), 2);
    assert_eq!(comp.n_cols(), 0);
}

#[test]
fn transform_reproduces_frozen_columns() {
    let space = SearchSpace::builder()
        .parameter(CategoricalParameter::new("c", ["a", "b", "z"]))
        .parameter(
            CategoricalParameter::new("level", ["low", "mid", "high"])
                .encoding(CategoricalEncoding::Ordinal),
        )
        .build()
        .unwrap();
    let data = rows(&["level", "c"], vec![vec!["high".into(), "b".into()]]);
    let comp = space.discrete().transform(&data).unwrap();
    assert_eq!(comp.columns(), space.discrete().comp_columns());
    assert_eq!(comp.column("c_b").unwrap(), vec![1.0]);
    assert_eq!(comp.column("c_a").unwrap(), vec![0.0]);
    assert_eq!(comp.column("level").unwrap(), vec![1.0]);
}

#[test]
fn transform_keeps_only_frozen_columns() {
    // "c" never varies in the stored rows, so its column is not frozen
    let stored = rows(
        &["c", "n"],
        vec![vec!["a".into(), 1.0.into()], vec!["a".into(), 2.0.into()]],
    );
    let space = SubspaceDiscrete::from_dataframe(&stored, vec![]).unwrap();
    assert_eq!(space.comp_columns(), &["n"]);

    let comp = space
        .transform(&rows(&["c", "n"], vec![vec!["a".into(), 2.0.into()]]))
        .unwrap();
    assert_eq!(comp.columns(), &["n"]);
    assert_eq!(comp.values()[(0, 0)], 2.0);
}

#[test]
fn transform_requires_parameter_columns() {
    let space = SearchSpace::builder()
        .parameter(CategoricalParameter::new("c", ["a", "b"]))
        .parameter(NumericalContinuousParameter::new("x", 0.0, 1.0))
        .build()
        .unwrap();
    let data = rows(&["c"], vec![vec!["a".into()]]);
    assert!(matches!(
        space.transform(&data),
        Err(Error::MissingColumn { ref name }) if name == "x"
    ));
}

#[test]
fn continuous_transform_rejects_labels() {
    let space = SearchSpace::builder()
        .parameter(NumericalContinuousParameter::new("x", 0.0, 1.0))
        .build()
        .unwrap();
    let data = rows(&["x"], vec![vec!["half".into()]]);
    assert!(matches!(
        space.transform(&data),
        Err(Error::NonNumericValue { .. })
    ));
}

#[test]
fn hybrid_transform_orders_discrete_first() {
    let space = SearchSpace::builder()
        .parameter(NumericalContinuousParameter::new("x", 0.0, 1.0))
        .parameter(NumericalDiscreteParameter::new("n", [1.0, 5.0]))
        .parameter(NumericalContinuousParameter::new("y", -1.0, 1.0))
        .build()
        .unwrap();
    let data = rows(
        &["y", "x", "n"],
        vec![
            vec![(-0.5).into(), 0.25.into(), 5.0.into()],
            vec![0.5.into(), 0.75.into(), 1.0.into()],
        ],
    );
    let comp = space.transform(&data).unwrap();
    assert_eq!(comp.columns(), &["n", "x", "y"]);
    assert_eq!(comp.column("n").unwrap(), vec![5.0, 1.0]);
    assert_eq!(comp.column("y").unwrap(), vec![-0.5, 0.5]);

    let bounds = space.param_bounds_comp();
    assert_eq!(bounds.shape(), (2, 3));
    assert_eq!((bounds[(0, 0)], bounds[(1, 0)]), (1.0, 5.0));
    assert_eq!((bounds[(0, 2)], bounds[(1, 2)]), (-1.0, 1.0));
}
