use std::time::Duration;

use reqwest::Client;

/// Build a default client for the CLI.
///
/// [`Session`](crate::api::Session) itself never sets timeouts, so they live here.
pub fn try_new(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(concat!("kcwater/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
}
