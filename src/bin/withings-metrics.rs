// ABOUTME: CLI for fetching Withings body-composition measurements
// ABOUTME: Drives the OAuth2 session, persists tokens, and prints measurement groups
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 withings-metrics contributors

//! # Withings Metrics CLI
//!
//! Loads the app credentials and user tokens, drives the OAuth2 session to
//! the authorized state (running the one-time interactive authorization
//! step when needed), persists the token state back to disk, and prints the
//! measurement groups for the requested date range.

use anyhow::Result;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{error, info};
use withings_metrics::{
    config::TokenStore,
    constants::config_files,
    errors::Error,
    logging,
    measurements::MeasurementClient,
    oauth2_client::OAuth2Session,
};

#[derive(Parser)]
#[command(name = "withings-metrics")]
#[command(about = "Fetch Withings body-composition measurements over OAuth2")]
struct Cli {
    /// Path to the app credentials document
    #[arg(long, default_value = config_files::APP_CONFIG)]
    app_config: PathBuf,

    /// Path to the user token document
    #[arg(long, default_value = config_files::USER_CONFIG)]
    user_config: PathBuf,

    /// First day of the range (YYYY-MM-DD); defaults to the lookback window
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// Last day of the range (YYYY-MM-DD), inclusive; defaults to today
    #[arg(long)]
    end_date: Option<NaiveDate>,

    /// Lookback in days when no start date is given
    #[arg(long, default_value_t = 30)]
    days: i64,

    /// Skip the refresh call that historically follows a fresh code exchange
    #[arg(long)]
    skip_redundant_refresh: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    logging::init_from_env()?;
    let cli = Cli::parse();

    let store = TokenStore::new(&cli.app_config, &cli.user_config);
    let app = store.load_app();
    let mut session = OAuth2Session::new(app.clone(), store.load_user())
        .skip_redundant_refresh(cli.skip_redundant_refresh);

    if session.needs_authorization_code() {
        let code = prompt_for_authorization_code(&session)?;
        session.complete_authorization(&code);
    }

    let outcome = session.ensure_authorized().await;

    // Written back in every case: a cleared authorization code only enables
    // a retry on the next run if it reaches disk.
    store.save_app(&app)?;
    store.save_user(session.tokens())?;

    if let Err(err) = outcome {
        error!("authentication failed: {err}");
        println!();
        println!("If the error mentions an invalid code, run the program again to obtain a fresh link.");
        return Err(err.into());
    }

    let (start, end) = resolve_range(&cli);
    info!(
        "fetching measurements from {} to {}",
        start.format("%Y-%m-%d"),
        end.format("%Y-%m-%d")
    );

    let client = MeasurementClient::new(&session);
    let groups = match client.get_measurements(start, end).await {
        Ok(groups) => groups,
        // Only authentication failures carry the non-zero exit contract; a
        // failed fetch is reported as "no data available".
        Err(err @ Error::MeasurementFetchFailed { .. }) => {
            error!("{err}");
            println!("No measurements available.");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    println!("{} measurement groups received", groups.len());
    for group in &groups {
        println!("{}", group.datetime().format("%Y-%m-%d %H:%M:%S"));
        for measure in group {
            println!("  {measure}");
        }
    }

    Ok(())
}

/// One-time human-in-the-loop step: show the authorization URL and block on
/// the pasted code. The vendor expires the code roughly 30 seconds after
/// granting it; that window is a documented constraint, not enforced here.
fn prompt_for_authorization_code(session: &OAuth2Session) -> Result<String> {
    let url = session.authorization_url()?;

    println!("***************************************");
    println!("*         W A R N I N G               *");
    println!("***************************************");
    println!();
    println!("User interaction needed to obtain an authorization code from Withings.");
    println!();
    println!("Open the following URL in your web browser and copy the code back.");
    println!("You will have roughly *30 seconds* before the code expires. Hurry up!");
    println!("(This is a one-time activity.)");
    println!();
    println!("{url}");
    println!();
    print!("Code: ");
    io::stdout().flush()?;

    let mut code = String::new();
    io::stdin().read_line(&mut code)?;
    Ok(code.trim().to_owned())
}

/// Resolve the requested date range to UTC instants. The end day is
/// included in full by ranging up to the following midnight.
fn resolve_range(cli: &Cli) -> (DateTime<Utc>, DateTime<Utc>) {
    let today = Utc::now().date_naive();
    let end_date = cli.end_date.unwrap_or(today);
    let start_date = cli
        .start_date
        .unwrap_or_else(|| end_date - Duration::days(cli.days));

    let start = start_date.and_time(NaiveTime::MIN).and_utc();
    let end = (end_date + Duration::days(1)).and_time(NaiveTime::MIN).and_utc();
    (start, end)
}
