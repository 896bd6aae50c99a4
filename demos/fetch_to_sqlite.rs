use chrono::NaiveDate;
use noaa_cdo::{NoaaClient, NoaaError, QueryParameters, SinkConfig};

fn main() -> Result<(), NoaaError> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let client = NoaaClient::from_env()?;
    let query = QueryParameters::builder()
        .dataset_id("GSOM")
        .location_id("ZIP:80435")
        .start_date(NaiveDate::from_ymd_opt(2010, 1, 1).unwrap())
        .end_date(NaiveDate::from_ymd_opt(2015, 1, 1).unwrap())
        .build()?;

    let config = SinkConfig::default_document()?;
    println!("Storing documents in {:?}", config);
    let mut sink = config.open()?;

    let summary = client.get_data(&query, sink.as_mut())?;
    let report = summary.report();
    println!(
        "{} windows, {} requests: {} inserted, {} duplicates, {} failed",
        summary.windows.len(),
        summary.requests(),
        report.inserted,
        report.duplicates,
        report.failed
    );

    Ok(())
}
