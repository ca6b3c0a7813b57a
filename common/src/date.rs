//! Calendar date utilities.

#[cfg(feature = "postgres")]
use std::error::Error as StdError;

use derive_more::{Display, Error};
#[cfg(feature = "postgres")]
use postgres_types::{
    accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql, Type,
};
use time::{
    format_description::well_known::Rfc3339, macros::format_description,
};

/// Calendar date, optionally carrying a time of day.
///
/// Accepts either an ISO 8601 calendar date (`YYYY-MM-DD`) or an [RFC 3339]
/// date and time. The original textual form is preserved as is, so no
/// timezone normalization happens on the way through.
///
/// [RFC 3339]: https://tools.ietf.org/html/rfc3339
#[derive(Clone, Debug, Display, Eq, Hash, PartialEq)]
#[display("{raw}")]
pub struct Date {
    /// Textual form this [`Date`] was parsed from.
    raw: String,
}

impl Date {
    /// Parses a new [`Date`] out of the provided `input`.
    ///
    /// # Errors
    ///
    /// If the `input` is neither a `YYYY-MM-DD` calendar date nor an
    /// [RFC 3339] date and time.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    pub fn parse(input: impl Into<String>) -> Result<Self, ParseError> {
        let raw = input.into();

        let valid = time::Date::parse(
            &raw,
            format_description!("[year]-[month]-[day]"),
        )
        .map(drop)
        .or_else(|_| time::OffsetDateTime::parse(&raw, &Rfc3339).map(drop))
        .map_err(ParseError);

        valid.map(|()| Self { raw })
    }

    /// Returns the textual form of this [`Date`].
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl AsRef<str> for Date {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl std::str::FromStr for Date {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Date> for String {
    fn from(date: Date) -> Self {
        date.raw
    }
}

/// Error of parsing [`Date`] from a string.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("invalid date: {_0}")]
pub struct ParseError(time::error::Parse);

#[cfg(feature = "postgres")]
impl FromSql<'_> for Date {
    accepts!(TEXT, VARCHAR);

    fn from_sql(
        ty: &Type,
        raw: &[u8],
    ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
        Self::parse(String::from_sql(ty, raw)?).map_err(Box::from)
    }
}

#[cfg(feature = "postgres")]
impl ToSql for Date {
    accepts!(TEXT, VARCHAR);
    to_sql_checked!();

    fn to_sql(
        &self,
        ty: &Type,
        w: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
        self.raw.to_sql(ty, w)
    }
}

#[cfg(feature = "serde")]
mod serde {
    //! Module providing integration with [`serde`] crate.

    use serde::{
        de::Error as _, Deserialize, Deserializer, Serialize, Serializer,
    };

    use super::Date;

    impl Serialize for Date {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.serialize_str(&self.raw)
        }
    }

    impl<'de> Deserialize<'de> for Date {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            Self::parse(String::deserialize(deserializer)?)
                .map_err(D::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Date;

    #[test]
    fn parses_calendar_date() {
        let d = Date::parse("2024-01-07").unwrap();

        assert_eq!(d.as_str(), "2024-01-07");
        assert_eq!(d, "2024-01-07".parse().unwrap());
    }

    #[test]
    fn parses_rfc3339_without_normalizing() {
        let d = Date::parse("2024-03-01T23:30:00-05:00").unwrap();

        assert_eq!(d.as_str(), "2024-03-01T23:30:00-05:00");
        assert_eq!(d.to_string(), "2024-03-01T23:30:00-05:00");
        assert_eq!(String::from(d), "2024-03-01T23:30:00-05:00");
    }

    #[test]
    fn rejects_garbage() {
        assert!(Date::parse("").is_err());
        assert!(Date::parse("tomorrow").is_err());
        assert!(Date::parse("2024-13-01").is_err());
        assert!(Date::parse("2024-02-30").is_err());
        assert!(Date::parse("01/07/2024").is_err());
    }
}
