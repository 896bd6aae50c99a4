use chrono::NaiveDate;
use noaa_cdo::{CsvSink, NoaaClient, NoaaError, QueryParameters};
use std::env;
use std::path::PathBuf;

fn main() -> Result<(), NoaaError> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let out_dir = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));

    let client = NoaaClient::from_env()?;
    let query = QueryParameters::builder()
        .dataset_id("GSOM")
        .location_id("ZIP:80435")
        .start_date(NaiveDate::from_ymd_opt(2013, 10, 6).unwrap())
        .end_date(NaiveDate::from_ymd_opt(2016, 11, 11).unwrap())
        .build()?;

    let mut sink = CsvSink::builder()
        .output(out_dir.join("NOAA_data.csv"))
        .checkpoint_dir(out_dir.join("checkpoints"))
        .build()?;

    for window in client.plan(&query) {
        println!("window {}", window);
    }
    let summary = client.get_data(&query, &mut sink)?;
    println!(
        "{} records written to {}",
        summary.records(),
        sink.output().display()
    );

    Ok(())
}
