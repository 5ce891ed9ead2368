use anyhow::Result;
use std::fs;
use std::path::Path;
use tempfile::tempdir;
use trip_scrubber::config::Config;
use trip_scrubber::error::ScrubberError;
use trip_scrubber::pipeline::Pipeline;

const TIMESTAMP_RICH_HEADER: &str = "id,pickup_datetime,dropoff_datetime,passenger_count,\
pickup_longitude,pickup_latitude,dropoff_longitude,dropoff_latitude";

fn write_source(dir: &Path, content: &str) -> Config {
    let source_path = dir.join("train.csv");
    fs::write(&source_path, content).unwrap();
    Config {
        source_path,
        output_path: dir.join("out/cleaned_taxi_data.csv"),
        log_path: dir.join("logs/removed_records.csv"),
    }
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|l| l.to_string())
        .collect()
}

#[test]
fn full_run_over_timestamp_rich_source() -> Result<()> {
    let dir = tempdir()?;
    let source = format!(
        "{TIMESTAMP_RICH_HEADER}\n\
         t1,2016-03-14 17:24:55,2016-03-14 17:26:55,2,-73.0,40.0,-73.0,40.0\n\
         t2,2016-03-14 08:00:00,2016-03-14 08:30:00,1,-73.98,40.75,-73.95,40.78\n\
         t3,not-a-date,2016-03-14 09:00:00,1,-73.98,40.75,-73.95,40.78\n\
         t4,2016-03-14 10:00:00,2016-03-14 10:00:10,1,-73.98,40.75,-73.95,40.78\n"
    );
    let config = write_source(dir.path(), &source);

    let result = Pipeline::run(&config)?;
    assert_eq!(result.total_rows, 4);
    assert_eq!(result.kept_rows, 2);
    assert_eq!(result.rejected_rows, 2);

    let output = read_lines(&config.output_path);
    let header = &output[0];
    for derived in [
        "trip_duration",
        "trip_duration_min",
        "trip_distance_km",
        "trip_speed_kmh",
        "distance_per_passenger",
        "pickup_hour",
        "pickup_day",
        "pickup_month",
    ] {
        assert!(header.contains(derived), "missing {derived} in {header}");
    }
    assert_eq!(output.len(), 3); // header + 2 kept rows

    // t1: zero displacement, 120s duration
    assert!(output[1].starts_with("t1,"));
    assert!(output[1].contains(",120,2,0,0,0,17,Monday,March"));

    // unparsable pickup lands in the rejection log
    let log = read_lines(&config.log_path);
    assert_eq!(log.len(), 3); // header + 2 rejected rows
    assert!(log.iter().any(|l| l.starts_with("t3,")));
    assert!(log.iter().any(|l| l.starts_with("t4,")));

    Ok(())
}

#[test]
fn duplicates_are_kept_once_and_logged_once() -> Result<()> {
    let dir = tempdir()?;
    let row = "t1,2016-03-14 17:00:00,2016-03-14 17:10:00,1,-73.98,40.75,-73.95,40.78";
    let source = format!("{TIMESTAMP_RICH_HEADER}\n{row}\n{row}\n{row}\n");
    let config = write_source(dir.path(), &source);

    let result = Pipeline::run(&config)?;
    assert_eq!(result.kept_rows, 1);
    assert_eq!(result.rejected_rows, 1);

    let output = read_lines(&config.output_path);
    assert_eq!(
        output.iter().filter(|l| l.starts_with("t1,")).count(),
        1
    );
    let log = read_lines(&config.log_path);
    assert_eq!(log.iter().filter(|l| l.starts_with("t1,")).count(), 1);

    Ok(())
}

#[test]
fn source_trip_duration_column_is_recomputed_not_duplicated() -> Result<()> {
    let dir = tempdir()?;
    let source = format!(
        "{TIMESTAMP_RICH_HEADER},trip_duration\n\
         t1,2016-03-14 17:00:00,2016-03-14 17:10:00,1,-73.98,40.75,-73.95,40.78,999\n"
    );
    let config = write_source(dir.path(), &source);

    Pipeline::run(&config)?;
    let output = read_lines(&config.output_path);
    let headers: Vec<&str> = output[0].split(',').collect();
    assert_eq!(
        headers.iter().filter(|h| **h == "trip_duration").count(),
        1
    );
    // the stale source value gives way to the computed 600s
    let idx = headers.iter().position(|h| *h == "trip_duration").unwrap();
    assert_eq!(output[1].split(',').nth(idx).unwrap(), "600");

    Ok(())
}

#[test]
fn value_schema_source_gets_range_checks_and_categories() -> Result<()> {
    let dir = tempdir()?;
    let source = "pickup_datetime,dropoff_datetime,trip_distance,fare_amount\n\
                  2016-03-14 17:00:00,2016-03-14 17:10:00,0.8,6.5\n\
                  2016-03-14 18:00:00,2016-03-14 18:20:00,15.0,42.0\n\
                  2016-03-14 19:00:00,2016-03-14 19:20:00,150.0,42.0\n\
                  2016-03-14 20:00:00,2016-03-14 20:20:00,5.0,999.0\n";
    let config = write_source(dir.path(), source);

    let result = Pipeline::run(&config)?;
    assert_eq!(result.kept_rows, 2);
    assert_eq!(result.rejected_rows, 2);

    let output = read_lines(&config.output_path);
    assert!(output[0].ends_with("distance_category"));
    assert!(output[1].ends_with("very short"));
    assert!(output[2].ends_with("long"));
    // no coordinate columns, so no haversine-derived features
    assert!(!output[0].contains("trip_distance_km"));

    Ok(())
}

#[test]
fn clean_source_produces_no_rejection_log() -> Result<()> {
    let dir = tempdir()?;
    let source = format!(
        "{TIMESTAMP_RICH_HEADER}\n\
         t1,2016-03-14 17:00:00,2016-03-14 17:10:00,1,-73.98,40.75,-73.95,40.78\n"
    );
    let config = write_source(dir.path(), &source);

    let result = Pipeline::run(&config)?;
    assert_eq!(result.rejected_rows, 0);
    assert!(result.log_file.is_none());
    assert!(!config.log_path.exists());

    Ok(())
}

#[test]
fn running_twice_is_byte_identical() -> Result<()> {
    let dir = tempdir()?;
    let source = format!(
        "{TIMESTAMP_RICH_HEADER}\n\
         t1,2016-03-14 17:00:00,2016-03-14 17:10:00,1,-73.98,40.75,-73.95,40.78\n\
         t2,bad,2016-03-14 18:00:00,1,-73.98,40.75,-73.95,40.78\n"
    );
    let config = write_source(dir.path(), &source);

    Pipeline::run(&config)?;
    let first_output = fs::read(&config.output_path)?;
    let first_log = fs::read(&config.log_path)?;

    Pipeline::run(&config)?;
    assert_eq!(fs::read(&config.output_path)?, first_output);
    assert_eq!(fs::read(&config.log_path)?, first_log);

    Ok(())
}

#[test]
fn missing_source_aborts_with_not_found() {
    let dir = tempdir().unwrap();
    let config = Config {
        source_path: dir.path().join("absent.csv"),
        output_path: dir.path().join("out.csv"),
        log_path: dir.path().join("log.csv"),
    };

    let err = Pipeline::run(&config).unwrap_err();
    assert!(matches!(err, ScrubberError::SourceNotFound(_)));
    assert!(!config.output_path.exists());
}

#[test]
fn unrecognized_columns_pass_through_unchanged() -> Result<()> {
    let dir = tempdir()?;
    let source = "vendor_id,pickup_datetime,dropoff_datetime,store_and_fwd_flag\n\
                  2,2016-03-14 17:00:00,2016-03-14 17:10:00,N\n";
    let config = write_source(dir.path(), source);

    Pipeline::run(&config)?;
    let output = read_lines(&config.output_path);
    assert!(output[0].starts_with("vendor_id,pickup_datetime,dropoff_datetime,store_and_fwd_flag"));
    assert!(output[1].starts_with("2,2016-03-14 17:00:00,2016-03-14 17:10:00,N"));

    Ok(())
}

#[test]
fn inspect_reports_schema_without_writing() -> Result<()> {
    let dir = tempdir()?;
    let source = format!(
        "{TIMESTAMP_RICH_HEADER}\n\
         t1,2016-03-14 17:00:00,2016-03-14 17:10:00,1,-73.98,40.75,-73.95,40.78\n"
    );
    let config = write_source(dir.path(), &source);

    let table = Pipeline::inspect(&config)?;
    assert_eq!(table.len(), 1);
    assert!(!config.output_path.exists());
    assert!(!config.log_path.exists());

    Ok(())
}

#[test]
fn run_summary_is_written_next_to_the_log() -> Result<()> {
    let dir = tempdir()?;
    let source = format!(
        "{TIMESTAMP_RICH_HEADER}\n\
         t1,2016-03-14 17:00:00,2016-03-14 17:10:00,1,-73.98,40.75,-73.95,40.78\n\
         t2,bad,2016-03-14 18:00:00,1,-73.98,40.75,-73.95,40.78\n"
    );
    let config = write_source(dir.path(), &source);

    Pipeline::run(&config)?;
    let summary_path = config.log_path.parent().unwrap().join("run_summary.json");
    let summary: serde_json::Value = serde_json::from_str(&fs::read_to_string(summary_path)?)?;
    assert_eq!(summary["total_rows"], 2);
    assert_eq!(summary["kept_rows"], 1);
    assert_eq!(summary["rejected_rows"], 1);

    Ok(())
}
