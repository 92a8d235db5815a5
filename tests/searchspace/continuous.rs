use std::collections::HashSet;

use searchspace::constraint::Constraint;
use searchspace::parameter::{NumericalContinuousParameter, Parameter};
use searchspace::{ContinuousSampler, Error, Frame, INF_BOUNDS_REPLACEMENT, SubspaceContinuous};

fn subspace(k: usize) -> SubspaceContinuous {
    SubspaceContinuous::new((0..k).map(|i| {
        let lower = i as f64;
        Parameter::from(NumericalContinuousParameter::new(format!("x{i}"), lower, lower + 1.0))
    }))
    .unwrap()
}

fn rows(frame: &Frame) -> Vec<Vec<u64>> {
    (0..frame.n_rows())
        .map(|r| {
            frame
                .column_names()
                .iter()
                .map(|c| frame.value(r, c).unwrap().as_f64().unwrap().to_bits())
                .collect()
        })
        .collect()
}

#[test]
fn full_factorial_rejects_more_points_than_corners() {
    let space = subspace(3);
    let sampler = ContinuousSampler::with_seed(1);
    let err = space.samples_full_factorial(9, &sampler).unwrap_err();
    assert!(matches!(
        err,
        Error::TooManyFactorialSamples { requested: 9, available: 8 }
    ));
}

#[test]
fn full_factorial_samples_are_distinct_corners() {
    let space = subspace(4);
    let sampler = ContinuousSampler::with_seed(7);
    for n in [0, 1, 5, 16] {
        let points = space.samples_full_factorial(n, &sampler).unwrap();
        assert_eq!(points.n_rows(), n);
        let unique: HashSet<Vec<u64>> = rows(&points).into_iter().collect();
        assert_eq!(unique.len(), n);
        for (i, p) in space.parameters().iter().enumerate() {
            for v in points.numeric_column(p.name()).unwrap() {
                let lower = i as f64;
                assert!(v == lower || v == lower + 1.0);
            }
        }
    }
}

#[test]
fn empty_box_has_no_corners() {
    let space = subspace(0);
    let sampler = ContinuousSampler::with_seed(2);
    assert_eq!(space.n_corners(), 0);
    assert!(space.samples_full_factorial(0, &sampler).unwrap().is_empty());
    assert!(matches!(
        space.samples_full_factorial(1, &sampler),
        Err(Error::TooManyFactorialSamples { requested: 1, available: 0 })
    ));
    assert!(space.full_factorial().unwrap().is_empty());
}

#[test]
fn full_factorial_enumerates_first_parameter_slowest() {
    let points = subspace(2).full_factorial().unwrap();
    assert_eq!(points.numeric_column("x0").unwrap(), vec![0.0, 0.0, 1.0, 1.0]);
    assert_eq!(points.numeric_column("x1").unwrap(), vec![1.0, 2.0, 1.0, 2.0]);
}

#[test]
fn random_samples_stay_within_bounds() {
    let space = subspace(3);
    let points = space.samples_random(200, &ContinuousSampler::with_seed(3)).unwrap();
    assert_eq!(points.n_rows(), 200);
    assert_eq!(points.column_names(), &["x0", "x1", "x2"]);
    for (i, p) in space.parameters().iter().enumerate() {
        let lower = i as f64;
        assert!(
            points
                .numeric_column(p.name())
                .unwrap()
                .iter()
                .all(|v| (lower..=lower + 1.0).contains(v))
        );
    }
}

#[test]
fn seeded_samplers_reproduce_points() {
    let space = subspace(2);
    let a = space.samples_random(10, &ContinuousSampler::with_seed(42)).unwrap();
    let b = space.samples_random(10, &ContinuousSampler::with_seed(42)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn infinite_bounds_are_clamped_for_sampling() {
    let space = SubspaceContinuous::new([
        Parameter::from(NumericalContinuousParameter::new("free", f64::NEG_INFINITY, f64::INFINITY)),
        Parameter::from(NumericalContinuousParameter::new("half", 0.0, f64::INFINITY)),
    ])
    .unwrap();
    assert!(!space.is_fully_bounded());

    let bounds = space.bounds_forced_finite();
    assert_eq!(bounds[(0, 0)], -INF_BOUNDS_REPLACEMENT);
    assert_eq!(bounds[(1, 0)], INF_BOUNDS_REPLACEMENT);
    assert_eq!(bounds[(0, 1)], 0.0);
    assert_eq!(bounds[(1, 1)], INF_BOUNDS_REPLACEMENT);
    assert!(space.param_bounds_comp()[(1, 0)].is_infinite());

    let corners = space.full_factorial().unwrap();
    assert_eq!(
        corners.numeric_column("free").unwrap(),
        vec![-1000.0, -1000.0, 1000.0, 1000.0]
    );

    let points = space.samples_random(50, &ContinuousSampler::with_seed(5)).unwrap();
    assert!(
        points
            .numeric_column("free")
            .unwrap()
            .iter()
            .all(|v| v.abs() <= INF_BOUNDS_REPLACEMENT)
    );
}

#[test]
fn from_dataframe_spans_observed_range() {
    let data = Frame::from_rows(
        &["a", "b"],
        vec![
            vec![1.0.into(), 5.0.into()],
            vec![3.0.into(), (-2.0).into()],
            vec![2.0.into(), 0.0.into()],
        ],
    )
    .unwrap();
    let space = SubspaceContinuous::from_dataframe(&data).unwrap();
    let bounds = space.param_bounds_comp();
    assert_eq!((bounds[(0, 0)], bounds[(1, 0)]), (1.0, 3.0));
    assert_eq!((bounds[(0, 1)], bounds[(1, 1)]), (-2.0, 5.0));
}

#[test]
fn linear_constraints_report_violating_points() {
    let space = subspace(2)
        .with_constraints(vec![
            Constraint::linear_inequality(["x0", "x1"], None, 2.0),
            Constraint::linear_equality(["x0"], None, 0.5),
        ])
        .unwrap();
    let points = Frame::from_rows(
        &["x0", "x1"],
        vec![
            vec![0.5.into(), 1.5.into()],
            vec![0.5.into(), 1.0.into()],
            vec![1.0.into(), 1.5.into()],
        ],
    )
    .unwrap();
    assert_eq!(space.get_invalid(&points).unwrap(), vec![1, 2]);
}
