//! Calendar arithmetic for installment due dates and the `DD-MM-YYYY` text form
//! dates are stored and exchanged in.

use std::fmt;

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};
use crate::types::Frequency;

/// advance `date` by `count` periods of `frequency`.
///
/// Month-based frequencies clamp the day to the last valid day of the target
/// month, so Jan 31 + 1 month lands on Feb 28 (or 29) and Feb 29 + 1 year on Feb 28.
/// The offset is always taken from `date` itself, never chained, so a schedule
/// anchored on the 31st keeps returning to the 31st whenever the month allows it.
pub fn add_period(date: NaiveDate, frequency: Frequency, count: u32) -> Result<NaiveDate> {
    let shifted = match frequency {
        Frequency::Weekly => date.checked_add_signed(Duration::days(7 * count as i64)),
        Frequency::Biweekly => date.checked_add_signed(Duration::days(14 * count as i64)),
        Frequency::Monthly => add_months(date, count),
        Frequency::Quarterly => count.checked_mul(3).and_then(|m| add_months(date, m)),
        Frequency::Yearly => count.checked_mul(12).and_then(|m| add_months(date, m)),
    };

    shifted.ok_or_else(|| LedgerError::InvalidDate {
        message: format!(
            "{} + {} {} periods is out of range",
            format_date(date),
            count,
            frequency.label()
        ),
    })
}

fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

/// signed day count `b - a`
pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    b.signed_duration_since(a).num_days()
}

/// format as `DD-MM-YYYY`
pub fn format_date(date: NaiveDate) -> String {
    format!("{:02}-{:02}-{:04}", date.day(), date.month(), date.year())
}

/// parse a strict `DD-MM-YYYY` string
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let parts: Vec<&str> = input.split('-').collect();
    if parts.len() != 3 {
        return Err(LedgerError::parse(input, "expected DD-MM-YYYY"));
    }

    for (part, width) in parts.iter().zip([2usize, 2, 4]) {
        if part.len() != width || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(LedgerError::parse(
                input,
                format!("segment {:?} is not a {}-digit number", part, width),
            ));
        }
    }

    let day: u32 = parts[0]
        .parse()
        .map_err(|_| LedgerError::parse(input, "day is not numeric"))?;
    let month: u32 = parts[1]
        .parse()
        .map_err(|_| LedgerError::parse(input, "month is not numeric"))?;
    let year: i32 = parts[2]
        .parse()
        .map_err(|_| LedgerError::parse(input, "year is not numeric"))?;

    if !(1..=12).contains(&month) {
        return Err(LedgerError::parse(input, format!("month {} out of range", month)));
    }

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| LedgerError::parse(input, format!("day {} out of range", day)))
}

/// calendar month a date falls in, used as the grouping key for report rollups
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        YearMonth::of(date) == *self
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:04}", self.month, self.year)
    }
}

/// serde adapter storing a `NaiveDate` as `DD-MM-YYYY`
pub mod dmy {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_date(&raw).map_err(serde::de::Error::custom)
    }
}

/// serde adapter for optional `DD-MM-YYYY` dates
pub mod dmy_option {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => serializer.serialize_some(&super::format_date(*d)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|s| super::parse_date(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}
