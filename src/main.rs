mod cli;
mod tables;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, crate_version};
use kcwater::{Session, api::client, reading::retain_settled};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{cli::Args, tables::build_readings_table};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .without_time()
        .compact()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    info!(version = crate_version!(), "starting…");

    let args = Args::parse();
    let http_client = client::try_new(args.connection.timeout())?;
    let mut session =
        Session::new(&http_client, &args.credentials.username, &args.credentials.password)
            .with_base_url(&args.connection.base_url);
    session.login().await.context("failed to log in")?;
    info!(
        account_number = session.account_number(),
        service_id = session.service_id(),
        customer_id = session.customer_id(),
        "account",
    );

    let mut readings = session
        .get_hourly_usage(args.date())
        .await
        .context("failed to fetch the hourly usage")?;
    if args.settled_only {
        retain_settled(&mut readings, Local::now().naive_local());
        info!(n_settled = readings.len(), "filtered");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&readings)?);
    } else {
        println!("{}", build_readings_table(&readings));
    }
    Ok(())
}
