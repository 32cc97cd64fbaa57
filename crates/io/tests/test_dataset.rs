//! Integration tests: reading workload datasets from disk.

use std::fs;

use approx::assert_relative_eq;
use workgen_io::{IoError, read_dataset};
use workgen_markov::{Metric, StateCount, estimate_chain};

#[test]
fn read_and_estimate() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("workload.csv");
    fs::write(
        &path,
        "Timestamp,CPU,Memory,Network\n\
         1700000000,10,80,0\n\
         1700000010,30,80,0\n\
         1700000020,55,80,0\n\
         1700000030,60,5,0\n\
         1700000040,70,5,0\n",
    )
    .expect("write fixture");

    let ds = read_dataset(&path).expect("read succeeds");
    assert_eq!(ds.len(), 5);
    assert_eq!(ds.source(), path.as_path());

    let chain = estimate_chain(ds.as_series(), StateCount::default(), ds.source())
        .expect("estimation succeeds");
    assert!(chain.is_trained_from(&path));

    // CPU states are 0,1,2,2,2: row 2 counts [0,0,2,0], smoothed to [1,1,2,1].
    let row = chain.matrix(Metric::Cpu).row(2);
    assert_relative_eq!(row[2], 2.0 / 5.0, epsilon = 1e-15);
    assert_relative_eq!(row[0], 1.0 / 5.0, epsilon = 1e-15);
}

#[test]
fn missing_file_is_file_not_found() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let err = read_dataset(&dir.path().join("absent.csv")).unwrap_err();
    assert!(matches!(err, IoError::FileNotFound { .. }));
}

#[test]
fn single_row_dataset_cannot_be_estimated() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("one.csv");
    fs::write(&path, "Timestamp,CPU,Memory,Network\n1,2,3,4\n").expect("write fixture");

    let ds = read_dataset(&path).expect("read succeeds");
    let err = estimate_chain(ds.as_series(), StateCount::default(), ds.source()).unwrap_err();
    assert!(matches!(err, workgen_markov::MarkovError::EmptyDataset { n: 1, min: 2 }));
}
