use std::time::Duration;

use chrono::{Local, NaiveDate};
use clap::Parser;
use reqwest::Url;

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
pub struct Args {
    #[clap(flatten)]
    pub credentials: CredentialsArgs,

    #[clap(flatten)]
    pub connection: ConnectionArgs,

    /// Day to fetch the hourly usage for, defaults to today.
    #[clap(long, env = "KCWATER_DATE")]
    pub date: Option<NaiveDate>,

    /// Drop the readings whose hour has not ended yet.
    #[clap(long)]
    pub settled_only: bool,

    /// Print the readings as JSON instead of a table.
    #[clap(long)]
    pub json: bool,
}

impl Args {
    pub fn date(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| Local::now().date_naive())
    }
}

#[derive(Parser)]
pub struct CredentialsArgs {
    #[clap(long, env = "KCWATER_USERNAME")]
    pub username: String,

    #[clap(long, env = "KCWATER_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Parser)]
pub struct ConnectionArgs {
    /// Customer portal origin.
    #[clap(long, env = "KCWATER_BASE_URL", default_value = kcwater::api::DEFAULT_BASE_URL)]
    pub base_url: Url,

    /// Request timeout, in seconds.
    #[clap(long = "timeout-secs", env = "KCWATER_TIMEOUT_SECS", default_value = "10")]
    pub timeout_secs: u64,
}

impl ConnectionArgs {
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
