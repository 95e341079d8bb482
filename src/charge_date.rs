//! Settledness of historical billing records.
//!
//! A record is settled once its billing period can no longer change: any past date,
//! or today's hours that have already ended.

use std::cmp::Ordering;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_with::{DefaultOnNull, NoneAsEmptyString, serde_as};

use crate::{
    prelude::*,
    reading::{ClockHour, Meridiem, READ_DATE_FORMAT},
};

/// Accepted `chargeDateRaw` formats, in the order they are tried.
const CHARGE_DATE_FORMATS: [&str; 2] = ["%d-%b-%Y", READ_DATE_FORMAT];

/// Raw history record, before parsing.
#[must_use]
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChargeHistoryRecord {
    #[serde(rename = "chargeDateRaw")]
    pub charge_date_raw: String,

    /// Hour of the record, like `7 AM`. Empty and `null` are treated as absent.
    #[serde_as(as = "DefaultOnNull<NoneAsEmptyString>")]
    #[serde(rename = "readDateTime", default)]
    pub read_date_time: Option<String>,

    /// Everything else the portal sent along.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Parse the charge date, trying each of [`CHARGE_DATE_FORMATS`] in order.
pub fn parse_charge_date(raw: &str) -> Result<NaiveDate> {
    CHARGE_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .ok_or_else(|| Error::DateFormat(raw.to_owned()))
}

/// Check whether the record's period has ended by `now`.
///
/// For a record dated `today` with an hour, the cutoff is the hour converted by adding 12
/// for PM, plus one more hour: the hour in progress is never settled. A record dated
/// `today` without an hour is not settled.
pub fn is_settled(
    record: &ChargeHistoryRecord,
    today: NaiveDate,
    now: NaiveDateTime,
) -> Result<bool> {
    let charge_date = parse_charge_date(&record.charge_date_raw)?;
    match charge_date.cmp(&today) {
        Ordering::Less => Ok(true),
        Ordering::Greater => Ok(false),
        Ordering::Equal => {
            let Some(read_date_time) = &record.read_date_time else {
                return Ok(false);
            };
            let clock_hour = read_date_time.parse::<ClockHour>()?;
            let hours = match clock_hour.meridiem {
                Meridiem::Am => clock_hour.hour,
                Meridiem::Pm => clock_hour.hour + 12,
            };
            let cutoff =
                charge_date.and_time(NaiveTime::MIN) + TimeDelta::hours(i64::from(hours) + 1);
            Ok(now >= cutoff)
        }
    }
}

/// Keep only the settled records as of the current local time.
pub fn strip_future_data(
    records: impl IntoIterator<Item = ChargeHistoryRecord>,
) -> Result<Vec<ChargeHistoryRecord>> {
    strip_future_data_at(records, Local::now().naive_local())
}

/// Keep only the records settled by `now`, preserving their order.
#[instrument(skip_all, level = Level::DEBUG, fields(now = %now))]
pub fn strip_future_data_at(
    records: impl IntoIterator<Item = ChargeHistoryRecord>,
    now: NaiveDateTime,
) -> Result<Vec<ChargeHistoryRecord>> {
    let today = now.date();
    records
        .into_iter()
        .map(|record| is_settled(&record, today, now).map(|settled| (settled, record)))
        .filter_map_ok(|(settled, record)| settled.then_some(record))
        .try_collect()
}
