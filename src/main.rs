use anyhow::{bail, Context, Result};
use hat_lookup::{HatLookup, LookupOptions};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

const USAGE: &str = "usage: hat_lookup <WORKBOOK.xlsx> [QUERY]...";

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    // ─── 2) arguments ────────────────────────────────────────────────
    let mut args = std::env::args().skip(1);
    let Some(workbook) = args.next().map(PathBuf::from) else {
        bail!(USAGE);
    };
    let queries: Vec<String> = args.collect();

    // ─── 3) upload & load ────────────────────────────────────────────
    let lookup = HatLookup::new(LookupOptions::from_env())?;
    info!(workbook = %workbook.display(), sheet = %lookup.options().sheet_name, "startup");

    let bytes = std::fs::read(&workbook)
        .with_context(|| format!("Failed to read workbook '{}'", workbook.display()))?;
    let file_name = workbook
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("Workbook path '{}' has no file name", workbook.display()))?;
    let summary = lookup.upload(file_name, &bytes)?;
    println!(
        "Loaded {} records in {} containers from {}",
        summary.records,
        summary.containers,
        summary.path.display()
    );

    // ─── 4) searches ─────────────────────────────────────────────────
    for query in &queries {
        println!();
        println!("{}", lookup.search(query)?);
    }
    Ok(())
}
