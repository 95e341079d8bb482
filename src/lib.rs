//! Client for the KC Water customer portal.
//!
//! Log in with [`api::Session::login`], then fetch hourly water readings with
//! [`api::Session::get_hourly_usage`]. Historical billing records can be checked with
//! [`charge_date::strip_future_data`], which drops the ones still in progress.

pub mod api;
pub mod charge_date;
pub mod error;
mod prelude;
pub mod reading;

pub use self::{
    api::Session,
    charge_date::{ChargeHistoryRecord, is_settled, strip_future_data, strip_future_data_at},
    error::{Error, Result},
    reading::Reading,
};
