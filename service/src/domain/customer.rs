//! [`Customer`] definitions.

use std::sync::LazyLock;

use common::Date;
use derive_more::{AsRef, Display, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name of the primary key constraint upon [`Customer::id`].
pub const ID_CONSTRAINT: &str = "customers_pkey";

/// Name of the uniqueness constraint upon [`Customer::email`].
pub const EMAIL_CONSTRAINT: &str = "customers_email_key";

/// Name of the uniqueness constraint upon [`Customer::drivers_license_id`].
pub const DRIVERS_LICENSE_CONSTRAINT: &str = "customers_drivers_license_id_key";

/// Customer renting cars.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Customer {
    /// ID of this [`Customer`].
    pub id: Id,

    /// [`FullName`] of this [`Customer`].
    pub full_name: FullName,

    /// [`Email`] of this [`Customer`].
    pub email: Email,

    /// [`Phone`] of this [`Customer`], if any.
    pub phone: Option<Phone>,

    /// [`DriversLicenseId`] of this [`Customer`].
    pub drivers_license_id: DriversLicenseId,

    /// [`Date`] of birth of this [`Customer`], if known.
    pub date_of_birth: Option<Date>,
}

/// ID of a [`Customer`].
#[derive(
    AsRef,
    Clone,
    Debug,
    Deserialize,
    Display,
    Eq,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[as_ref(str)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(String);

impl Id {
    /// Prefix of every generated [`Id`].
    pub const PREFIX: &'static str = "cust";

    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(format!("{}_{}", Self::PREFIX, Uuid::new_v4()))
    }
}

impl Default for Id {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for Id {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// Full name of a [`Customer`].
#[derive(
    AsRef, Clone, Debug, Display, Eq, Into, Ord, PartialEq, PartialOrd,
)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct FullName(String);

impl FullName {
    /// Creates a new [`FullName`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        super::is_valid_text(&name).then_some(Self(name))
    }
}

impl FromStr for FullName {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `FullName`")
    }
}

/// Email address of a [`Customer`].
#[derive(AsRef, Clone, Debug, Display, Eq, Into, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Email(String);

impl Email {
    /// Creates a new [`Email`] if the given `address` is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Email`].
    fn check(address: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Email`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[^@\s]+@[^@\s]+$").expect("valid regex")
        });

        let address = address.as_ref();
        super::is_valid_text(address) && REGEX.is_match(address)
    }
}

impl FromStr for Email {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Email`")
    }
}

/// Phone number of a [`Customer`].
#[derive(AsRef, Clone, Debug, Display, Eq, Into, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Phone(String);

impl Phone {
    /// Creates a new [`Phone`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        super::is_valid_text(&number).then_some(Self(number))
    }
}

impl FromStr for Phone {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Phone`")
    }
}

/// ID of a [`Customer`]'s driver's license.
#[derive(AsRef, Clone, Debug, Display, Eq, Into, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct DriversLicenseId(String);

impl DriversLicenseId {
    /// Creates a new [`DriversLicenseId`] if the given `id` is valid.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        super::is_valid_text(&id).then_some(Self(id))
    }
}

impl FromStr for DriversLicenseId {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `DriversLicenseId`")
    }
}

#[cfg(test)]
mod tests {
    use super::{Email, FullName, Id};

    #[test]
    fn generated_ids_are_prefixed_and_unique() {
        let (a, b) = (Id::new(), Id::new());

        assert!(a.as_ref().starts_with("cust_"));
        assert_ne!(a, b);
    }

    #[test]
    fn email_requires_single_at_sign() {
        assert!(Email::new("jane@example.com").is_some());
        assert!(Email::new("jane.example.com").is_none());
        assert!(Email::new("jane@@example.com").is_none());
        assert!(Email::new(" jane@example.com").is_none());
    }

    #[test]
    fn full_name_rejects_blank() {
        assert!(FullName::new("Jane Doe").is_some());
        assert!(FullName::new("").is_none());
        assert!(FullName::new("   ").is_none());
        assert!(FullName::new("x".repeat(513)).is_none());
    }
}
