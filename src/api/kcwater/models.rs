use serde::{Deserialize, Deserializer, Serialize};

use crate::reading::RawReading;

#[derive(Serialize)]
pub struct TokenRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub grant_type: &'a str,
}

#[derive(Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub user: User,
}

#[derive(Deserialize)]
pub struct User {
    #[serde(rename = "customerId", deserialize_with = "deserialize_identifier")]
    pub customer_id: String,
}

#[derive(Serialize)]
pub struct CustomerInfoRequest<'a> {
    #[serde(rename = "customerId")]
    pub customer_id: &'a str,
}

#[derive(Deserialize)]
pub struct CustomerInfoResponse {
    #[serde(rename = "accountSummaryType")]
    pub account_summary: AccountSummary,

    #[serde(rename = "accountContext")]
    pub account_context: AccountContextResponse,
}

#[derive(Deserialize)]
pub struct AccountSummary {
    pub services: Vec<Service>,
}

#[derive(Deserialize)]
pub struct Service {
    #[serde(rename = "serviceId", deserialize_with = "deserialize_identifier")]
    pub service_id: String,
}

#[derive(Deserialize)]
pub struct AccountContextResponse {
    #[serde(rename = "accountNumber", deserialize_with = "deserialize_identifier")]
    pub account_number: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyUsageRequest<'a> {
    pub customer_id: &'a str,
    pub account_context: AccountContext<'a>,

    /// Formatted date, the portal wants it in both `month` and `day`.
    pub month: &'a str,
    pub day: &'a str,

    pub port: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountContext<'a> {
    pub account_number: &'a str,
    pub service_id: &'a str,
}

#[derive(Deserialize)]
pub struct HourlyUsageResponse {
    pub history: Vec<RawReading>,
}

/// Identifiers are opaque: the portal sends some of them as numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum Identifier {
    String(String),
    Number(serde_json::Number),
}

impl From<Identifier> for String {
    fn from(identifier: Identifier) -> Self {
        match identifier {
            Identifier::String(identifier) => identifier,
            Identifier::Number(identifier) => identifier.to_string(),
        }
    }
}

fn deserialize_identifier<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Identifier::deserialize(deserializer).map(String::from)
}
