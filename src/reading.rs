//! Hourly metering samples.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Format of the `readDate` field in the usage history.
pub const READ_DATE_FORMAT: &str = "%m-%d-%Y";

/// One hourly consumption sample.
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub read_date_time: NaiveDateTime,

    /// Unit of measure, for example `GAL`.
    pub uom: String,

    pub meter_number: Option<String>,

    /// Kept as text, the portal returns it so.
    pub gallons_consumption: String,

    pub raw_consumption: String,

    pub scaled_read: String,

    pub port: String,
}

/// Usage history entry as returned by the portal.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReading {
    pub read_date: String,

    /// Hour of the reading, for example `7 AM`.
    pub read_date_time: String,

    pub uom: String,

    #[serde(default)]
    pub meter_number: Option<String>,

    pub gallons_consumption: String,

    pub raw_consumption: String,

    pub scaled_read: String,

    pub port: String,
}

impl TryFrom<RawReading> for Reading {
    type Error = Error;

    fn try_from(raw: RawReading) -> Result<Self> {
        let date = NaiveDate::parse_from_str(&raw.read_date, READ_DATE_FORMAT).map_err(|error| {
            Error::ResponseParse(format!("invalid read date `{}`: {error}", raw.read_date))
        })?;
        let hour = raw.read_date_time.parse::<ClockHour>()?;
        let read_date_time = date.and_hms_opt(hour.hour_of_day(), 0, 0).ok_or_else(|| {
            Error::ResponseParse(format!("invalid read time `{}`", raw.read_date_time))
        })?;
        Ok(Self {
            read_date_time,
            uom: raw.uom,
            meter_number: raw.meter_number,
            gallons_consumption: raw.gallons_consumption,
            raw_consumption: raw.raw_consumption,
            scaled_read: raw.scaled_read,
            port: raw.port,
        })
    }
}

impl Reading {
    /// Whether the reading's hour has fully elapsed by `now`.
    #[must_use]
    pub fn is_settled(&self, now: NaiveDateTime) -> bool {
        self.read_date_time + TimeDelta::hours(1) <= now
    }
}

/// Keep only the readings whose hour has elapsed by `now`, preserving their order.
pub fn retain_settled(readings: &mut Vec<Reading>, now: NaiveDateTime) {
    readings.retain(|reading| reading.is_settled(now));
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, derive_more::Display)]
pub enum Meridiem {
    #[display("AM")]
    Am,

    #[display("PM")]
    Pm,
}

/// Hour on a 12-hour clock, as in `7 AM` or `3 PM`.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq, derive_more::Display)]
#[display("{hour} {meridiem}")]
pub struct ClockHour {
    /// `1..=12`.
    pub hour: u32,

    pub meridiem: Meridiem,
}

impl ClockHour {
    /// Hour of day in `0..=23`: `12 AM` is midnight and `12 PM` is noon.
    #[must_use]
    pub const fn hour_of_day(self) -> u32 {
        match (self.meridiem, self.hour) {
            (Meridiem::Am, 12) => 0,
            (Meridiem::Am, hour) | (Meridiem::Pm, hour @ 12) => hour,
            (Meridiem::Pm, hour) => hour + 12,
        }
    }
}

impl FromStr for ClockHour {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::ResponseParse(format!("invalid hour `{s}`"));

        let mut parts = s.split_whitespace();
        let (Some(hour), Some(meridiem), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid());
        };
        let hour = hour.parse::<u32>().map_err(|_| invalid())?;
        if !(1..=12).contains(&hour) {
            return Err(invalid());
        }
        let meridiem = if meridiem.eq_ignore_ascii_case("AM") {
            Meridiem::Am
        } else if meridiem.eq_ignore_ascii_case("PM") {
            Meridiem::Pm
        } else {
            return Err(invalid());
        };
        Ok(Self { hour, meridiem })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;
    use serde_json::json;

    use super::*;

    fn parse(value: serde_json::Value) -> Result<Reading> {
        let raw: RawReading =
            serde_json::from_value(value).map_err(|error| Error::ResponseParse(error.to_string()))?;
        Reading::try_from(raw)
    }

    #[test]
    fn test_parse_reading_ok() -> Result {
        let reading = parse(json!({
            "readDate": "01-15-2024",
            "readDateTime": "7 AM",
            "uom": "GAL",
            "meterNumber": "123",
            "gallonsConsumption": "50",
            "rawConsumption": "1000",
            "scaledRead": "1050",
            "port": "1",
        }))?;
        assert_eq!(
            reading.read_date_time,
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap().and_hms_opt(7, 0, 0).unwrap(),
        );
        assert_eq!(reading.uom, "GAL");
        assert_eq!(reading.meter_number.as_deref(), Some("123"));
        assert_eq!(reading.gallons_consumption, "50");
        assert_eq!(reading.raw_consumption, "1000");
        assert_eq!(reading.scaled_read, "1050");
        assert_eq!(reading.port, "1");
        Ok(())
    }

    #[test]
    fn test_parse_reading_without_meter_number_ok() -> Result {
        let reading = parse(json!({
            "readDate": "12-31-2023",
            "readDateTime": "11 PM",
            "uom": "GAL",
            "meterNumber": null,
            "gallonsConsumption": "0.5",
            "rawConsumption": "7",
            "scaledRead": "00012",
            "port": "1",
        }))?;
        assert_eq!(reading.meter_number, None);
        assert_eq!(reading.read_date_time.time(), NaiveTime::from_hms_opt(23, 0, 0).unwrap());
        assert_eq!(reading.scaled_read, "00012");
        Ok(())
    }

    #[test]
    fn test_parse_reading_missing_field_fails() {
        let result = parse(json!({
            "readDate": "01-15-2024",
            "readDateTime": "7 AM",
            "uom": "GAL",
            "meterNumber": "123",
            "rawConsumption": "1000",
            "scaledRead": "1050",
            "port": "1",
        }));
        assert!(matches!(result, Err(Error::ResponseParse(_))));
    }

    #[test]
    fn test_parse_reading_invalid_date_fails() {
        let result = parse(json!({
            "readDate": "15-Jan-2024",
            "readDateTime": "7 AM",
            "uom": "GAL",
            "gallonsConsumption": "50",
            "rawConsumption": "1000",
            "scaledRead": "1050",
            "port": "1",
        }));
        assert!(matches!(result, Err(Error::ResponseParse(_))));
    }

    #[test]
    fn test_clock_hour_of_day() -> Result {
        assert_eq!("12 AM".parse::<ClockHour>()?.hour_of_day(), 0);
        assert_eq!("1 AM".parse::<ClockHour>()?.hour_of_day(), 1);
        assert_eq!("12 PM".parse::<ClockHour>()?.hour_of_day(), 12);
        assert_eq!("3 pm".parse::<ClockHour>()?.hour_of_day(), 15);
        assert_eq!("11 PM".parse::<ClockHour>()?.hour_of_day(), 23);
        assert_eq!(" 3 pm ".parse::<ClockHour>()?.to_string(), "3 PM");
        Ok(())
    }

    fn reading_at(hour: u32) -> Reading {
        Reading {
            read_date_time: NaiveDate::from_ymd_opt(2024, 1, 15)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            uom: "GAL".to_owned(),
            meter_number: None,
            gallons_consumption: "1".to_owned(),
            raw_consumption: "1".to_owned(),
            scaled_read: "1".to_owned(),
            port: "1".to_owned(),
        }
    }

    #[test]
    fn test_reading_is_settled_after_its_hour() {
        let now = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap().and_hms_opt(12, 30, 0).unwrap();
        for hour in 0..12 {
            assert!(reading_at(hour).is_settled(now), "{hour}");
        }
        assert!(!reading_at(12).is_settled(now));
        assert!(!reading_at(13).is_settled(now));
        assert!(reading_at(12).is_settled(now + TimeDelta::minutes(30)));
        assert!(reading_at(23).is_settled(now + TimeDelta::hours(12)));
    }

    #[test]
    fn test_retain_settled_keeps_midnight_and_order() {
        let now = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap().and_hms_opt(12, 30, 0).unwrap();
        let mut readings =
            vec![reading_at(0), reading_at(13), reading_at(11), reading_at(12), reading_at(1)];
        retain_settled(&mut readings, now);
        let hours = readings
            .iter()
            .map(|reading| reading.read_date_time.format("%H").to_string())
            .collect::<Vec<_>>();
        assert_eq!(hours, ["00", "11", "01"]);
    }

    #[test]
    fn test_parse_clock_hour_fails() {
        for invalid in ["", "7", "AM", "0 AM", "13 PM", "7 XM", "7 AM extra", "seven AM"] {
            assert!(invalid.parse::<ClockHour>().is_err(), "{invalid}");
        }
    }
}
