//! Full pipeline runs against on-disk fixtures

use dataset_builder::{Domain, Label, MetadataSource, Split};
use feature_table::FeatureTable;
use parquet::basic::{Repetition, Type as PhysicalType};
use parquet::data_type::DoubleType;
use parquet::file::properties::WriterProperties;
use parquet::file::writer::SerializedFileWriter;
use parquet::schema::types::Type;
use pipeline::{run, PipelineConfig};
use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

const MIC_COLUMN: &str = "MIC [Waveform]";

fn write_waveform(path: &Path, values: &[f64]) {
    let leaf = Type::primitive_type_builder(MIC_COLUMN, PhysicalType::DOUBLE)
        .with_repetition(Repetition::REQUIRED)
        .build()
        .unwrap();
    let schema = Type::group_type_builder("schema")
        .with_fields(vec![Arc::new(leaf)])
        .build()
        .unwrap();

    let props = Arc::new(WriterProperties::builder().build());
    let mut writer = SerializedFileWriter::new(File::create(path).unwrap(), Arc::new(schema), props).unwrap();
    let mut row_group = writer.next_row_group().unwrap();
    while let Some(mut col) = row_group.next_column().unwrap() {
        col.typed::<DoubleType>()
            .write_batch(values, None, None)
            .unwrap();
        col.close().unwrap();
    }
    row_group.close().unwrap();
    writer.close().unwrap();
}

/// Row A: segment 1, train/source/normal, waveform [1, 2, 3, 4].
/// Row B: segment 2, test/target/anomaly, unreadable waveform file.
fn fixture(root: &Path) -> PipelineConfig {
    let train = root.join("train");
    let test = root.join("test");
    fs::create_dir_all(&train).unwrap();
    fs::create_dir_all(&test).unwrap();

    write_waveform(&train.join("seg_1.parquet"), &[1.0, 2.0, 3.0, 4.0]);
    fs::write(test.join("seg_2.parquet"), b"corrupted").unwrap();

    fs::write(
        train.join("attributes_normal_source_train.csv"),
        "segment_id,imp23absu_mic,ism330dhcx_acc\n1,seg_1.parquet,acc_1.parquet\n",
    )
    .unwrap();
    fs::write(
        test.join("attributes_anomaly_target_test.csv"),
        "segment_id,imp23absu_mic,ism330dhcx_acc\n2,seg_2.parquet,acc_2.parquet\n",
    )
    .unwrap();

    PipelineConfig {
        train_root: train.clone(),
        test_root: test.clone(),
        output_dir: root.join("out"),
        sources: vec![
            MetadataSource::new(
                train.join("attributes_normal_source_train.csv"),
                Split::Train,
                Domain::Source,
                Label::Normal,
            ),
            MetadataSource::new(
                test.join("attributes_anomaly_target_test.csv"),
                Split::Test,
                Domain::Target,
                Label::Anomaly,
            ),
        ],
        ..Default::default()
    }
}

#[test]
fn test_failed_row_is_skipped_and_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture(dir.path());

    let report = run(&config).unwrap();

    assert_eq!(report.metadata_rows, 2);
    assert_eq!(report.loaded, 1);
    assert_eq!(report.train_rows, 1);
    assert_eq!(report.test_rows, 0);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].segment_id, "2");
    assert_eq!(report.failures[0].split, Split::Test);

    let train = FeatureTable::read_csv(&config.train_table_path(), Split::Train).unwrap();
    assert_eq!(train.len(), 1);
    let row = &train.rows()[0];
    assert_eq!(row.segment_id, "1");
    assert_eq!(row.domain, Domain::Source);
    assert_eq!(row.label, Label::Normal);

    // Normalized [1, 2, 3, 4] is ±0.4472, ±1.3416
    let f = row.features;
    assert!(f.mean.abs() < 1e-9);
    assert!((f.std - 1.0).abs() < 1e-6);
    assert!(f.skew.abs() < 1e-9);
    assert!((f.kurtosis + 1.36).abs() < 1e-6);
    assert!((f.max - 1.3416407865).abs() < 1e-6);
    assert!((f.min + 1.3416407865).abs() < 1e-6);
    assert_eq!(f.freq_peak, 1.0);
    assert!((f.signal_energy - 16.0).abs() < 1e-5);

    let test = FeatureTable::read_csv(&config.test_table_path(), Split::Test).unwrap();
    assert!(test.is_empty());

    let header = fs::read_to_string(config.test_table_path()).unwrap();
    assert_eq!(
        header.trim_end(),
        "segment_id,split,domain,label,mean,std,skew,kurt,max,min,freq_peak,signal_energy"
    );

    let report_json = fs::read_to_string(config.report_path()).unwrap();
    assert!(report_json.contains("\"segment_id\": \"2\""));
}

#[test]
fn test_rerun_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture(dir.path());

    run(&config).unwrap();
    let first = (
        fs::read(config.train_table_path()).unwrap(),
        fs::read(config.test_table_path()).unwrap(),
        fs::read(config.report_path()).unwrap(),
    );

    run(&config).unwrap();
    let second = (
        fs::read(config.train_table_path()).unwrap(),
        fs::read(config.test_table_path()).unwrap(),
        fs::read(config.report_path()).unwrap(),
    );

    assert_eq!(first, second);
}

#[test]
fn test_no_loadable_rows_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = fixture(dir.path());
    config.sources.truncate(0);
    config.sources.push(MetadataSource::new(
        config.test_root.join("attributes_anomaly_target_test.csv"),
        Split::Test,
        Domain::Target,
        Label::Anomaly,
    ));

    let err = run(&config).unwrap_err();
    assert!(err.to_string().contains("No waveforms loaded"));
    assert!(!config.train_table_path().exists());
}

#[test]
fn test_missing_metadata_table_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = fixture(dir.path());
    config.sources.push(MetadataSource::new(
        dir.path().join("absent.csv"),
        Split::Test,
        Domain::Source,
        Label::Normal,
    ));

    assert!(run(&config).is_err());
}
