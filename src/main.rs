use std::process;

use anyhow::Result;
use chrono::Utc;
use log::info;

use gapnights::calendar::build_calendars;
use gapnights::config::ScrapeConfig;
use gapnights::gaps::extract_gaps;
use gapnights::models::CabinAvailability;
use gapnights::output::{write_gap_report, write_html, write_raw_snapshot};
use gapnights::provider::{await_session, fetch_season, BrowserSession, InnroadClient};
use gapnights::report::{build_report, render_report};
use gapnights::stats::GapSummary;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    if let Err(err) = run().await {
        eprintln!("error: {err:#}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = ScrapeConfig::default();
    let window = config.season()?;

    let mut session = BrowserSession::launch(&config).await?;
    println!("Click the Turnstile checkbox in the browser...");

    let token = match await_session(
        &mut session,
        config.auth_poll_attempts,
        config.auth_poll_interval,
    )
    .await
    {
        Ok(token) => token,
        Err(err) => {
            // Release the browser before surfacing the failure.
            session.close().await;
            return Err(err.into());
        }
    };
    println!("Authenticated");
    session.close().await;

    let client = InnroadClient::new(config.api_base.clone(), token)?;
    let chunks = fetch_season(&client, &window).await;
    write_raw_snapshot(&config.out_dir, &chunks)?;

    let feeds: Vec<Vec<CabinAvailability>> =
        chunks.into_iter().map(|chunk| chunk.cabins).collect();
    let calendars = build_calendars(&window, &feeds);
    let gaps = extract_gaps(&window, &calendars, &config.booking_base);
    let report = build_report(&window, gaps, Utc::now());

    let summary = GapSummary::from_gaps(&report.gaps);
    println!("\n{}", summary.headline());

    write_gap_report(&config.out_dir, &report)?;
    let html = render_report(&report, &config.property_name)?;
    write_html(&config.out_dir, &html)?;

    info!(
        "finished: {} cabins scanned, {} gaps found",
        calendars.cabins.len(),
        report.total_gaps
    );
    Ok(())
}
