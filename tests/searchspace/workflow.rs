use nalgebra::DMatrix;
use searchspace::acquisition::{AcquisitionFunction, PosteriorMean};
use searchspace::parameter::{CategoricalParameter, NumericalDiscreteParameter};
use searchspace::surrogate::{MeanPredictionSurrogate, Surrogate};
use searchspace::SearchSpace;

#[test]
fn recommend_measure_refit_loop() {
    let mut space = SearchSpace::builder()
        .parameter(CategoricalParameter::new("solvent", ["water", "thf", "dmf"]))
        .parameter(NumericalDiscreteParameter::new("temp", [20.0, 40.0, 60.0]).tolerance(1.0))
        .build()
        .unwrap();
    let mut model = MeanPredictionSurrogate::new();
    let acquisition = PosteriorMean;
    let mut targets = Vec::new();
    let mut measured_rows = Vec::new();

    for round in 0..3 {
        let candidates = space.discrete().get_candidates(false, false).unwrap();
        assert_eq!(candidates.len(), 9 - 2 * round);

        // pick the first two candidates; the mean model scores all rows equally
        let picked: Vec<usize> = candidates.indices.iter().take(2).copied().collect();
        if round > 0 {
            let scores = acquisition
                .evaluate(&model, candidates.comp_rep.values())
                .unwrap();
            assert_eq!(scores.len(), candidates.len());
        }
        space.discrete_mut().mark_as_recommended(&picked).unwrap();

        let measurements = space.discrete().exp_rep().select_rows(&picked).unwrap();
        let matched = space
            .discrete_mut()
            .mark_as_measured(&measurements, true)
            .unwrap();
        assert_eq!(matched, picked);
        measured_rows.extend(matched);
        targets.extend([round as f64, round as f64 + 1.0]);

        let train_x = space.discrete().comp_rep().select_rows(&measured_rows);
        let train_y = DMatrix::from_column_slice(targets.len(), 1, &targets);
        model.fit(&space, train_x.values(), &train_y).unwrap();
    }

    assert_eq!(space.discrete().metadata().n_measured(), 6);
    assert_eq!(space.discrete().metadata().n_recommended(), 6);
    assert!((model.mean().unwrap() - 1.5).abs() < 1e-12);

    let all = space.discrete().get_candidates(true, true).unwrap();
    assert_eq!(all.len(), 9);
    let (exp_rep, comp_rep) = all.into_parts();
    assert_eq!(exp_rep.n_rows(), comp_rep.n_rows());
}
