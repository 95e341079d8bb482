//! [KC Water](https://my.kcwater.us) customer portal client.

mod models;

use chrono::{Local, NaiveDate};
use reqwest::{
    Client,
    Url,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue},
};

use self::models::{
    AccountContext,
    CustomerInfoRequest,
    CustomerInfoResponse,
    HourlyUsageRequest,
    HourlyUsageResponse,
    TokenRequest,
    TokenResponse,
};
use crate::{prelude::*, reading::Reading};

pub const DEFAULT_BASE_URL: &str = "https://my.kcwater.us";

/// The portal's own web client credentials, the same for every customer.
const CLIENT_AUTHORIZATION: &str = "Basic d2ViQ2xpZW50SWRQYXNzd29yZDpzZWNyZXQ=";

const DEFAULT_ACCOUNT_PORT: &str = "1";

const TOKEN_PATH: &str = "rest/oauth/token";
const CUSTOMER_INFO_PATH: &str = "rest/account/customer/";
const HOURLY_USAGE_PATH: &str = "rest/usage/month/day";

/// Format of `month` and `day` in usage requests, for example `05-Jan-2024`.
const USAGE_DATE_FORMAT: &str = "%d-%b-%Y";

/// Authenticated session with the portal.
///
/// The HTTP client is borrowed from the caller, who owns the connection pool and
/// any timeout or retry policy. A session is meant for one sequential flow:
/// log in once, then fetch the usage.
pub struct Session<'c> {
    client: &'c Client,
    base_url: String,
    username: String,
    password: String,

    /// Authorized request headers, built by the token exchange.
    headers: HeaderMap,

    logged_in: bool,
    access_token: Option<String>,
    customer_id: Option<String>,
    account_number: Option<String>,
    service_id: Option<String>,
    account_port: &'static str,
}

impl<'c> Session<'c> {
    pub fn new(
        client: &'c Client,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_owned(),
            username: username.into(),
            password: password.into(),
            headers: HeaderMap::new(),
            logged_in: false,
            access_token: None,
            customer_id: None,
            account_number: None,
            service_id: None,
            account_port: DEFAULT_ACCOUNT_PORT,
        }
    }

    /// Talk to another portal origin. Endpoint paths stay the same.
    pub fn with_base_url(mut self, base_url: &Url) -> Self {
        self.base_url = base_url.as_str().trim_end_matches('/').to_owned();
        self
    }

    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    #[must_use]
    pub fn customer_id(&self) -> Option<&str> {
        self.customer_id.as_deref()
    }

    #[must_use]
    pub fn account_number(&self) -> Option<&str> {
        self.account_number.as_deref()
    }

    #[must_use]
    pub fn service_id(&self) -> Option<&str> {
        self.service_id.as_deref()
    }

    #[must_use]
    pub const fn account_port(&self) -> &str {
        self.account_port
    }

    /// Exchange the credentials for an access token and discover the account.
    ///
    /// Nothing is rolled back on failure: identifiers obtained by the token exchange stay
    /// set when the customer lookup fails, but the session is not logged in.
    #[instrument(skip_all, fields(username = %self.username))]
    pub async fn login(&mut self) -> Result {
        self.get_token().await?;
        self.get_customer_info().await?;
        self.logged_in = self.account_number.is_some()
            && self.service_id.is_some()
            && self.customer_id.is_some()
            && self.access_token.is_some();
        if !self.logged_in {
            return Err(Error::authentication("incomplete account identifiers"));
        }
        info!(
            customer_id = ?self.customer_id,
            account_number = ?self.account_number,
            service_id = ?self.service_id,
            "Logged in",
        );
        Ok(())
    }

    /// Fetch the hourly readings for today.
    pub async fn get_hourly_usage_today(&self) -> Result<Vec<Reading>> {
        self.get_hourly_usage(Local::now().date_naive()).await
    }

    /// Fetch the hourly readings on the specified day, in the order the portal returns them.
    #[instrument(skip_all, fields(on = %on))]
    pub async fn get_hourly_usage(&self, on: NaiveDate) -> Result<Vec<Reading>> {
        let (true, Some(customer_id), Some(account_number), Some(service_id)) = (
            self.logged_in,
            self.customer_id.as_deref(),
            self.account_number.as_deref(),
            self.service_id.as_deref(),
        ) else {
            error!("Must login first");
            return Err(Error::NotLoggedIn);
        };

        info!("Fetching…");
        let formatted_date = on.format(USAGE_DATE_FORMAT).to_string();
        let request = HourlyUsageRequest {
            customer_id,
            account_context: AccountContext { account_number, service_id },
            month: &formatted_date,
            day: &formatted_date,
            port: self.account_port,
        };
        let response = self
            .client
            .post(self.url(HOURLY_USAGE_PATH))
            .headers(self.headers.clone())
            .json(&request)
            .send()
            .await?;
        debug!(status = %response.status(), "Hourly usage response");
        let body = response.error_for_status()?.text().await?;
        let response = serde_json::from_str::<HourlyUsageResponse>(&body).map_err(|error| {
            Error::ResponseParse(format!("invalid hourly usage response: {error}"))
        })?;
        let readings = response
            .history
            .into_iter()
            .map(Reading::try_from)
            .collect::<Result<Vec<_>>>()?;
        info!(n_readings = readings.len(), "Fetched");
        Ok(readings)
    }

    #[instrument(skip_all, level = Level::DEBUG)]
    async fn get_token(&mut self) -> Result {
        info!("Requesting an access token…");
        let response = self
            .client
            .post(self.url(TOKEN_PATH))
            .header(AUTHORIZATION, CLIENT_AUTHORIZATION)
            .form(&TokenRequest {
                username: &self.username,
                password: &self.password,
                grant_type: "password",
            })
            .send()
            .await
            .map_err(Error::authentication_failed("failed to call the token endpoint"))?;
        debug!(status = %response.status(), "Token response");
        let token = response
            .error_for_status()
            .map_err(Error::authentication_failed("token request failed"))?
            .json::<TokenResponse>()
            .await
            .map_err(Error::authentication_failed("unexpected token response"))?;

        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", token.access_token))
            .map_err(|_| Error::authentication("access token is not a valid header value"))?;
        authorization.set_sensitive(true);
        self.headers.insert(AUTHORIZATION, authorization);
        self.headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self.access_token = Some(token.access_token);
        self.customer_id = Some(token.user.customer_id);
        Ok(())
    }

    #[instrument(skip_all, level = Level::DEBUG)]
    async fn get_customer_info(&mut self) -> Result {
        let customer_id = self
            .customer_id
            .as_deref()
            .ok_or_else(|| Error::authentication("no customer ID"))?;
        info!("Fetching the customer info…");
        let response = self
            .client
            .post(self.url(CUSTOMER_INFO_PATH))
            .headers(self.headers.clone())
            .json(&CustomerInfoRequest { customer_id })
            .send()
            .await
            .map_err(Error::authentication_failed("failed to call the customer info endpoint"))?;
        debug!(status = %response.status(), "Customer info response");
        let customer_info = response
            .error_for_status()
            .map_err(Error::authentication_failed("customer info request failed"))?
            .json::<CustomerInfoResponse>()
            .await
            .map_err(Error::authentication_failed("unexpected customer info response"))?;

        let service = customer_info
            .account_summary
            .services
            .into_iter()
            .next()
            .ok_or_else(|| Error::authentication("the account has no services"))?;
        self.service_id = Some(service.service_id);
        self.account_number = Some(customer_info.account_context.account_number);
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }
}
