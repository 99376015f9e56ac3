use medmind_model::ModelKind;
use medmind_model::model::LinearModel;
use medmind_train::TrainError;
use medmind_train::candidates::{Candidate, CandidateScore, Hyperparameters};
use medmind_train::dataset::DatasetSummary;
use medmind_train::metrics::Metrics;
use medmind_train::selection::{select, select_best};
use uuid::Uuid;

mod common;

fn metrics(mse: f64) -> Metrics {
    Metrics {
        mse,
        rmse: mse.sqrt(),
        r2: 0.5,
    }
}

fn score(kind: ModelKind, test_mse: f64) -> CandidateScore {
    let hyperparameters = match kind {
        ModelKind::LinearRegression => Hyperparameters::LinearRegression,
        ModelKind::DecisionTree => Hyperparameters::DecisionTree(Default::default()),
        ModelKind::RandomForest => Hyperparameters::RandomForest(Default::default()),
    };
    CandidateScore {
        kind,
        hyperparameters,
        train: metrics(test_mse * 0.8),
        test: metrics(test_mse),
        fit_seconds: 0.01,
    }
}

fn summary() -> DatasetSummary {
    DatasetSummary {
        rows_read: 100,
        rows_used: 98,
        rows_dropped: 2,
    }
}

/// Every candidate carries a real linear model fit on synthetic rows; only
/// the score matters to the policy.
fn candidates(test_mses: &[(ModelKind, f64)]) -> Vec<Candidate> {
    let (x, y) = common::training_rows(40, 7);
    test_mses
        .iter()
        .map(|&(kind, mse)| Candidate {
            score: score(kind, mse),
            model: LinearModel::fit(&x, &y).unwrap().into(),
        })
        .collect()
}

#[test]
fn lowest_test_mse_wins() {
    let scores = [
        score(ModelKind::LinearRegression, 12.0),
        score(ModelKind::DecisionTree, 9.0),
        score(ModelKind::RandomForest, 4.0),
    ];
    assert_eq!(select_best(&scores), Some(2));
}

#[test]
fn ties_keep_first() {
    let scores = [
        score(ModelKind::LinearRegression, 4.0),
        score(ModelKind::DecisionTree, 9.0),
        score(ModelKind::RandomForest, 4.0),
    ];
    assert_eq!(select_best(&scores), Some(0));
}

#[test]
fn non_finite_errors_are_never_selected() {
    let scores = [
        score(ModelKind::LinearRegression, f64::NAN),
        score(ModelKind::DecisionTree, f64::INFINITY),
        score(ModelKind::RandomForest, 30.0),
    ];
    assert_eq!(select_best(&scores), Some(2));

    let none = [score(ModelKind::LinearRegression, f64::NAN)];
    assert_eq!(select_best(&none), None);
    assert_eq!(select_best(&[]), None);
}

#[test]
fn select_reports_all_candidates_and_improvements() {
    let run = Uuid::new_v4();
    let selection = select(
        candidates(&[
            (ModelKind::LinearRegression, 10.0),
            (ModelKind::DecisionTree, 20.0),
            (ModelKind::RandomForest, 5.0),
        ]),
        summary(),
        run,
    )
    .unwrap();

    let report = &selection.report;
    assert_eq!(report.training_run, run);
    assert_eq!(report.selected, ModelKind::RandomForest);
    assert_eq!(report.selected_index, 2);
    assert_eq!(report.criterion, "test_mse");
    assert_eq!(report.candidates.len(), 3);
    assert_eq!(report.winner().test.mse, 5.0);

    let versus: Vec<ModelKind> = report.improvements.iter().map(|i| i.versus).collect();
    assert_eq!(
        versus,
        vec![ModelKind::LinearRegression, ModelKind::DecisionTree]
    );
    assert!((report.improvements[0].mse_reduction_pct.unwrap() - 50.0).abs() < 1e-9);
    assert!((report.improvements[1].mse_reduction_pct.unwrap() - 75.0).abs() < 1e-9);
}

#[test]
fn undefined_improvement_is_none() {
    let selection = select(
        candidates(&[
            (ModelKind::LinearRegression, 0.0),
            (ModelKind::DecisionTree, 0.0),
            (ModelKind::RandomForest, f64::NAN),
        ]),
        summary(),
        Uuid::new_v4(),
    )
    .unwrap();

    assert_eq!(selection.report.selected, ModelKind::LinearRegression);
    assert!(
        selection
            .report
            .improvements
            .iter()
            .all(|i| i.mse_reduction_pct.is_none())
    );
}

#[test]
fn nothing_selectable_is_an_error() {
    let err = select(
        candidates(&[(ModelKind::LinearRegression, f64::NAN)]),
        summary(),
        Uuid::new_v4(),
    )
    .unwrap_err();
    assert!(matches!(err, TrainError::NoSelectableCandidate));
}

#[test]
fn rationale_names_winner_and_reductions() {
    let selection = select(
        candidates(&[
            (ModelKind::LinearRegression, 10.0),
            (ModelKind::DecisionTree, 20.0),
            (ModelKind::RandomForest, 5.0),
        ]),
        summary(),
        Uuid::new_v4(),
    )
    .unwrap();

    let text = selection.report.rationale();
    assert!(text.starts_with("MODEL SELECTION RATIONALE"));
    assert!(text.contains("Model: Random Forest"));
    assert!(text.contains("vs Linear Regression: 50.00% MSE reduction"));
    assert!(text.contains("vs Decision Tree: 75.00% MSE reduction"));
    assert!(text.contains("8 features per split"));
    assert!(text.contains("100 rows read, 98 used, 2 dropped"));
}

#[test]
fn report_serializes_hyperparameters_by_kind() {
    let selection = select(
        candidates(&[
            (ModelKind::LinearRegression, 10.0),
            (ModelKind::DecisionTree, 8.0),
        ]),
        summary(),
        Uuid::new_v4(),
    )
    .unwrap();

    let json = serde_json::to_value(&selection.report).unwrap();
    assert_eq!(json["selected"], "decision_tree");
    assert_eq!(
        json["candidates"][1]["hyperparameters"]["kind"],
        "decision_tree"
    );
    assert_eq!(json["candidates"][1]["hyperparameters"]["max_depth"], 10);
}

#[test]
fn forest_report_records_features_per_split() {
    let selection = select(
        candidates(&[
            (ModelKind::LinearRegression, 10.0),
            (ModelKind::RandomForest, 4.0),
        ]),
        summary(),
        Uuid::new_v4(),
    )
    .unwrap();

    let json = serde_json::to_value(&selection.report).unwrap();
    let forest = &json["candidates"][1]["hyperparameters"];
    assert_eq!(forest["kind"], "random_forest");
    assert_eq!(forest["max_features"], 8);
    assert_eq!(forest["n_trees"], 100);
}
