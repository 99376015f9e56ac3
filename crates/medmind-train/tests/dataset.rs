use medmind_train::TrainError;
use medmind_train::dataset::{Dataset, read_feature_rows};

mod common;

#[test]
fn loads_complete_rows_in_feature_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_csv(
        dir.path(),
        "data.csv",
        "adherence_rate,previous_adherence_rate,chronic_conditions,snooze_frequency,missed_doses_last_week,days_since_start,medication_complexity,num_medications,age,patient\n\
         70.5,85.5,2,0.2,1,120,2.5,3,45,p1\n",
    );

    let dataset = Dataset::load(&path).unwrap();
    assert_eq!(dataset.len(), 1);
    assert_eq!(
        dataset.features[0],
        [45.0, 3.0, 2.5, 120.0, 1.0, 0.2, 2.0, 85.5]
    );
    assert_eq!(dataset.targets, vec![70.5]);
}

#[test]
fn drops_rows_with_missing_cells() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_dataset(dir.path(), 100, 3, Some(10));

    let dataset = Dataset::load(&path).unwrap();
    let summary = dataset.summary();
    assert_eq!(summary.rows_read, 100);
    assert_eq!(summary.rows_dropped, 10);
    assert_eq!(summary.rows_used, 90);
    assert_eq!(dataset.targets.len(), 90);
}

#[test]
fn nan_cells_count_as_missing() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_csv(
        dir.path(),
        "data.csv",
        &format!(
            "{}\n45,3,2.5,120,1,0.2,2,NaN,70\n45,3,2.5,120,1,0.2,2,85.5,70\n",
            common::HEADER
        ),
    );
    assert_eq!(Dataset::load(&path).unwrap().summary().rows_dropped, 1);
}

#[test]
fn missing_target_column_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let header = common::HEADER.trim_end_matches(",adherence_rate");
    let path = common::write_csv(
        dir.path(),
        "data.csv",
        &format!("{header}\n45,3,2.5,120,1,0.2,2,85.5\n"),
    );

    match Dataset::load(&path).unwrap_err() {
        TrainError::MissingColumn { column, .. } => assert_eq!(column, "adherence_rate"),
        other => panic!("expected MissingColumn, got {other}"),
    }
}

#[test]
fn non_numeric_cell_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_csv(
        dir.path(),
        "data.csv",
        &format!("{}\n45,three,2.5,120,1,0.2,2,85.5,70\n", common::HEADER),
    );

    match Dataset::load(&path).unwrap_err() {
        TrainError::InvalidValue {
            line, column, value, ..
        } => {
            assert_eq!(line, 2);
            assert_eq!(column, "num_medications");
            assert_eq!(value, "three");
        }
        other => panic!("expected InvalidValue, got {other}"),
    }
}

#[test]
fn all_rows_incomplete_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_csv(
        dir.path(),
        "data.csv",
        &format!("{}\n45,3,2.5,120,1,0.2,2,85.5,\n", common::HEADER),
    );
    assert!(matches!(
        Dataset::load(&path),
        Err(TrainError::EmptyDataset { .. })
    ));
}

#[test]
fn prediction_input_ignores_target_and_rejects_gaps() {
    let dir = tempfile::tempdir().unwrap();
    let with_target = common::write_csv(
        dir.path(),
        "with_target.csv",
        &format!("{}\n45,3,2.5,120,1,0.2,2,85.5,\n", common::HEADER),
    );
    assert_eq!(
        read_feature_rows(&with_target).unwrap(),
        vec![vec![45.0, 3.0, 2.5, 120.0, 1.0, 0.2, 2.0, 85.5]]
    );

    let gap = common::write_csv(
        dir.path(),
        "gap.csv",
        &format!("{}\n45,3,,120,1,0.2,2,85.5,70\n", common::HEADER),
    );
    match read_feature_rows(&gap).unwrap_err() {
        TrainError::MissingValue { column, line, .. } => {
            assert_eq!(column, "medication_complexity");
            assert_eq!(line, 2);
        }
        other => panic!("expected MissingValue, got {other}"),
    }
}

#[test]
fn missing_file_is_a_csv_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        Dataset::load(&dir.path().join("absent.csv")),
        Err(TrainError::Csv { .. })
    ));
}
