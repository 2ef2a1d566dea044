#![forbid(unsafe_code)]

//! Flight parameter extraction: identifiers and the UTC flight window.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use permart_core::{ns, Error};
use permart_xml::find_element;

/// Length of `YYYY-MM-DDTHH:MM:SS`.
pub const TIMESTAMP_LEN: usize = 19;

/// Hours subtracted to move IST to UTC.
pub const IST_OFFSET_HOURS: i32 = 5;
/// Minutes subtracted to move IST to UTC.
pub const IST_OFFSET_MINUTES: i32 = 30;

/// Calendar fields after the flat IST to UTC correction.
///
/// Fields are not wrapped: `hour` and `minute` may be negative, and `month`
/// is 1-based exactly as written in the artifact. Use [`RawDateTime::normalize`]
/// for a real calendar value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawDateTime {
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub hour: i32,
    pub minute: i32,
    pub second: i32,
}

impl RawDateTime {
    /// Resolve the raw fields into a calendar date and time, borrowing across
    /// day boundaries. `None` if year/month/day do not name a real date.
    pub fn normalize(&self) -> Option<NaiveDateTime> {
        let month = u32::try_from(self.month).ok()?;
        let day = u32::try_from(self.day).ok()?;
        let midnight = NaiveDate::from_ymd_opt(self.year, month, day)?.and_hms_opt(0, 0, 0)?;
        let offset = Duration::hours(i64::from(self.hour))
            + Duration::minutes(i64::from(self.minute))
            + Duration::seconds(i64::from(self.second));
        midnight.checked_add_signed(offset)
    }
}

impl std::fmt::Display for RawDateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// Operator and aircraft identifiers plus the permitted flight window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightParams {
    pub uin_number: String,
    pub adc_number: String,
    pub fic_number: String,
    pub flight_start_time: RawDateTime,
    pub flight_end_time: RawDateTime,
}

impl FlightParams {
    /// Normalized UTC start of the flight window.
    pub fn start_utc(&self) -> Option<NaiveDateTime> {
        self.flight_start_time.normalize()
    }

    /// Normalized UTC end of the flight window.
    pub fn end_utc(&self) -> Option<NaiveDateTime> {
        self.flight_end_time.normalize()
    }
}

/// Read identifiers and the flight window from a verified artifact.
/// Only [`crate::Handle`] calls this, after the fence was extracted.
pub(crate) fn extract_params(doc: &roxmltree::Document<'_>) -> Result<FlightParams, Error> {
    let details = find_element(doc, ns::node::UA_DETAILS)
        .ok_or_else(|| Error::InvalidFlightParams("UADetails element missing".into()))?;
    let params = find_element(doc, ns::node::FLIGHT_PARAMETERS)
        .ok_or_else(|| Error::InvalidFlightParams("FlightParameters element missing".into()))?;

    let uin_number = required_attr(details, ns::attr::UIN_NO)?.to_owned();
    let adc_number = required_attr(params, ns::attr::ADC_NUMBER)?.to_owned();
    let fic_number = required_attr(params, ns::attr::FIC_NUMBER)?.to_owned();
    let flight_start_time =
        parse_ist_timestamp(required_attr(params, ns::attr::FLIGHT_START_TIME)?)?;
    let flight_end_time = parse_ist_timestamp(required_attr(params, ns::attr::FLIGHT_END_TIME)?)?;

    log::debug!("flight window {flight_start_time} .. {flight_end_time} (UTC, raw)");
    Ok(FlightParams {
        uin_number,
        adc_number,
        fic_number,
        flight_start_time,
        flight_end_time,
    })
}

/// Parse a fixed-width `YYYY-MM-DDTHH:MM:SS` IST timestamp into raw UTC fields.
///
/// Separator positions are not checked; each numeric field must be digits.
pub fn parse_ist_timestamp(text: &str) -> Result<RawDateTime, Error> {
    let bytes = text.as_bytes();
    if bytes.len() != TIMESTAMP_LEN {
        return Err(Error::InvalidFlightParams(format!(
            "timestamp {text:?} is not {TIMESTAMP_LEN} characters"
        )));
    }
    let field = |start: usize, end: usize| -> Result<i32, Error> {
        let digits = &bytes[start..end];
        if !digits.iter().all(u8::is_ascii_digit) {
            return Err(Error::InvalidFlightParams(format!(
                "timestamp {text:?}: non-numeric field at {start}"
            )));
        }
        Ok(digits
            .iter()
            .fold(0i32, |acc, d| acc * 10 + i32::from(d - b'0')))
    };

    Ok(RawDateTime {
        year: field(0, 4)?,
        month: field(5, 7)?,
        day: field(8, 10)?,
        hour: field(11, 13)? - IST_OFFSET_HOURS,
        minute: field(14, 16)? - IST_OFFSET_MINUTES,
        second: field(17, 19)?,
    })
}

fn required_attr<'a>(node: roxmltree::Node<'a, '_>, name: &str) -> Result<&'a str, Error> {
    node.attribute(name)
        .ok_or_else(|| Error::InvalidFlightParams(format!("{name} missing")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ist_offset_is_raw_subtraction() {
        let t = parse_ist_timestamp("2020-01-01T10:00:00").unwrap();
        assert_eq!(
            t,
            RawDateTime {
                year: 2020,
                month: 1,
                day: 1,
                hour: 5,
                minute: -30,
                second: 0,
            }
        );
        let utc = t.normalize().unwrap();
        assert_eq!(utc.to_string(), "2020-01-01 04:30:00");
    }

    #[test]
    fn test_normalize_borrows_across_midnight() {
        let t = parse_ist_timestamp("2021-03-01T02:10:05").unwrap();
        assert_eq!(t.hour, -3);
        assert_eq!(t.minute, -20);
        assert_eq!(t.normalize().unwrap().to_string(), "2021-02-28 20:40:05");
    }

    #[test]
    fn test_normalize_impossible_date() {
        let t = parse_ist_timestamp("2021-02-30T12:00:00").unwrap();
        assert!(t.normalize().is_none());
        let t = parse_ist_timestamp("2021-00-10T12:00:00").unwrap();
        assert!(t.normalize().is_none());
    }

    #[test]
    fn test_separators_not_validated() {
        let t = parse_ist_timestamp("2020/06/15 18:45:30").unwrap();
        assert_eq!((t.year, t.month, t.day), (2020, 6, 15));
        assert_eq!((t.hour, t.minute, t.second), (13, 15, 30));
    }

    #[test]
    fn test_bad_timestamps() {
        for text in ["2020-01-01T10:00", "2020-01-01T10:00:00Z", "", "20x0-01-01T10:00:00"] {
            assert!(
                matches!(parse_ist_timestamp(text), Err(Error::InvalidFlightParams(_))),
                "{text}"
            );
        }
    }

    const PARAMS: &str = concat!(
        "<UAPermission><Permission><Owner><Pilot/></Owner>",
        "<FlightDetails><UADetails uinNo=\"UIN0001\"/>",
        "<FlightParameters adcNumber=\"ADC-9\" ficNumber=\"FIC-7\" ",
        "flightStartTime=\"2020-01-01T10:00:00\" flightEndTime=\"2020-01-01T11:30:00\"/>",
        "</FlightDetails></Permission></UAPermission>"
    );

    #[test]
    fn test_extract_params() {
        let doc = roxmltree::Document::parse(PARAMS).unwrap();
        let params = extract_params(&doc).unwrap();
        assert_eq!(params.uin_number, "UIN0001");
        assert_eq!(params.adc_number, "ADC-9");
        assert_eq!(params.fic_number, "FIC-7");
        assert_eq!(params.flight_end_time.hour, 6);
        assert_eq!(params.flight_end_time.minute, 0);
        assert_eq!(params.end_utc().unwrap().to_string(), "2020-01-01 06:00:00");
    }

    #[test]
    fn test_missing_identifier_or_element() {
        let xml = PARAMS.replace(" ficNumber=\"FIC-7\"", "");
        let doc = roxmltree::Document::parse(&xml).unwrap();
        assert!(matches!(extract_params(&doc), Err(Error::InvalidFlightParams(_))));

        let xml = PARAMS.replace("<UADetails uinNo=\"UIN0001\"/>", "");
        let doc = roxmltree::Document::parse(&xml).unwrap();
        assert!(matches!(extract_params(&doc), Err(Error::InvalidFlightParams(_))));
    }
}
