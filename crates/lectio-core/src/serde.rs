// Module name shadows the `serde` crate; use `::serde` for the external crate.
use ::serde::Serializer;
use chrono::{DateTime, SecondsFormat, Utc};

/// Serialize `DateTime<Utc>` as RFC 3339 with 3-digit fractional seconds.
pub fn to_rfc3339_ms<S>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[derive(::serde::Serialize)]
    struct Stamped {
        #[serde(serialize_with = "to_rfc3339_ms")]
        at: DateTime<Utc>,
    }

    #[test]
    fn should_format_datetime_as_rfc3339_with_millis() {
        let at = Utc.with_ymd_and_hms(2016, 2, 2, 11, 9, 0).unwrap();
        let json = serde_json::to_value(Stamped { at }).unwrap();
        assert_eq!(json["at"], "2016-02-02T11:09:00.000Z");
    }
}
