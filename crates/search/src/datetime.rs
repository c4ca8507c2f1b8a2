use crate::{Error, Result};
use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};

/// Marks the open side of a datetime interval.
pub const OPEN: &str = "..";

/// One side of a datetime interval.
///
/// Strings are used as-is, [DateTime]s are converted to UTC, and
/// [NaiveDateTime]s are assumed to already be in UTC. `None` is an open
/// bound.
pub trait DatetimeBound {
    /// Converts this value into its canonical string form.
    fn into_bound(self) -> String;
}

/// Converts a value into a canonical datetime or datetime interval string.
pub trait IntoDatetime {
    /// Converts this value into a datetime string.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac_search::IntoDatetime;
    ///
    /// let datetime = ("2020-01-01T00:00:00Z", None::<&str>).into_datetime().unwrap();
    /// assert_eq!(datetime, "2020-01-01T00:00:00Z/..");
    /// ```
    fn into_datetime(self) -> Result<String>;
}

/// Normalizes an optional datetime or datetime interval.
///
/// # Examples
///
/// ```
/// use chrono::{FixedOffset, TimeZone};
/// use stac_search::normalize_datetime;
///
/// let offset = FixedOffset::east_opt(2 * 3600).unwrap();
/// let datetime = offset.with_ymd_and_hms(2020, 6, 1, 12, 0, 0).unwrap();
/// assert_eq!(
///     normalize_datetime(Some(datetime)).unwrap().unwrap(),
///     "2020-06-01T10:00:00Z"
/// );
/// ```
pub fn normalize_datetime<D: IntoDatetime>(value: Option<D>) -> Result<Option<String>> {
    value.map(IntoDatetime::into_datetime).transpose()
}

fn format_utc(datetime: DateTime<Utc>) -> String {
    let format = if datetime.timestamp_subsec_nanos() == 0 {
        SecondsFormat::Secs
    } else {
        SecondsFormat::Micros
    };
    datetime.to_rfc3339_opts(format, true)
}

fn join(bounds: Vec<String>) -> Result<String> {
    if bounds.is_empty() || bounds.len() > 2 {
        Err(Error::InvalidDatetime(format!(
            "expected one or two values, got {}",
            bounds.len()
        )))
    } else {
        Ok(bounds.join("/"))
    }
}

impl DatetimeBound for &str {
    fn into_bound(self) -> String {
        self.to_string()
    }
}

impl DatetimeBound for String {
    fn into_bound(self) -> String {
        self
    }
}

impl<Tz: TimeZone> DatetimeBound for DateTime<Tz> {
    fn into_bound(self) -> String {
        format_utc(self.with_timezone(&Utc))
    }
}

impl DatetimeBound for NaiveDateTime {
    fn into_bound(self) -> String {
        format_utc(Utc.from_utc_datetime(&self))
    }
}

impl<T: DatetimeBound> DatetimeBound for Option<T> {
    fn into_bound(self) -> String {
        self.map(DatetimeBound::into_bound)
            .unwrap_or_else(|| OPEN.to_string())
    }
}

impl IntoDatetime for &str {
    fn into_datetime(self) -> Result<String> {
        join(self.split('/').map(String::from).collect())
            .map_err(|_| Error::InvalidDatetime(self.to_string()))
    }
}

impl IntoDatetime for String {
    fn into_datetime(self) -> Result<String> {
        self.as_str().into_datetime()
    }
}

impl<Tz: TimeZone> IntoDatetime for DateTime<Tz> {
    fn into_datetime(self) -> Result<String> {
        Ok(self.into_bound())
    }
}

impl IntoDatetime for NaiveDateTime {
    fn into_datetime(self) -> Result<String> {
        Ok(self.into_bound())
    }
}

impl<A: DatetimeBound, B: DatetimeBound> IntoDatetime for (A, B) {
    fn into_datetime(self) -> Result<String> {
        join(vec![self.0.into_bound(), self.1.into_bound()])
    }
}

impl<T: DatetimeBound> IntoDatetime for [T; 2] {
    fn into_datetime(self) -> Result<String> {
        join(self.into_iter().map(DatetimeBound::into_bound).collect())
    }
}

impl<T: DatetimeBound> IntoDatetime for Vec<T> {
    fn into_datetime(self) -> Result<String> {
        join(self.into_iter().map(DatetimeBound::into_bound).collect())
    }
}
