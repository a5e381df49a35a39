use anyhow::Context;
use jsonsink::IngestConfig;
use tracing_subscriber::EnvFilter;

const INPUT_PATH: &str = "data/usurdb.json";
const DB_PATH: &str = "data/usurdb.db";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = IngestConfig::new(INPUT_PATH, DB_PATH);
    let report = jsonsink::run(&config)
        .with_context(|| format!("ingesting {INPUT_PATH} into {DB_PATH}"))?;

    println!(
        "ingested {} rows into table '{}' ({} data columns, {} added)",
        report.rows_inserted, report.table, report.data_columns, report.columns_added
    );
    Ok(())
}
