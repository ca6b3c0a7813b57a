//! [`Car`] definitions.

use derive_more::{AsRef, Display, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name of the primary key constraint upon [`Car::id`].
pub const ID_CONSTRAINT: &str = "cars_pkey";

/// Name of the uniqueness constraint upon [`Car::license_plate`].
pub const LICENSE_PLATE_CONSTRAINT: &str = "cars_license_plate_key";

/// Car of the rental fleet.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Car {
    /// ID of this [`Car`].
    pub id: Id,

    /// [`Make`] of this [`Car`].
    pub make: Make,

    /// [`Model`] of this [`Car`].
    pub model: Model,

    /// Production [`Year`] of this [`Car`], if known.
    pub year: Option<Year>,

    /// [`LicensePlate`] of this [`Car`].
    pub license_plate: LicensePlate,

    /// Availability [`Status`] of this [`Car`].
    pub status: Status,
}

/// ID of a [`Car`].
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
    pub const PREFIX: &'static str = "car";

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

/// Manufacturer of a [`Car`].
#[derive(
    AsRef, Clone, Debug, Display, Eq, Into, Ord, PartialEq, PartialOrd,
)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Make(String);

impl Make {
    /// Creates a new [`Make`] if the given `make` is valid.
    #[must_use]
    pub fn new(make: impl Into<String>) -> Option<Self> {
        let make = make.into();
        super::is_valid_text(&make).then_some(Self(make))
    }
}

impl FromStr for Make {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Make`")
    }
}

/// Model name of a [`Car`].
#[derive(
    AsRef, Clone, Debug, Display, Eq, Into, Ord, PartialEq, PartialOrd,
)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Model(String);

impl Model {
    /// Creates a new [`Model`] if the given `model` is valid.
    #[must_use]
    pub fn new(model: impl Into<String>) -> Option<Self> {
        let model = model.into();
        super::is_valid_text(&model).then_some(Self(model))
    }
}

impl FromStr for Model {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Model`")
    }
}

/// Production year of a [`Car`].
#[derive(Clone, Copy, Debug, Display, Eq, Into, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Year(i32);

impl Year {
    /// Creates a new [`Year`] if the given `year` is plausible.
    #[must_use]
    pub fn new(year: i32) -> Option<Self> {
        // First production automobile.
        (1886..=9999).contains(&year).then_some(Self(year))
    }
}

/// License plate of a [`Car`].
#[derive(AsRef, Clone, Debug, Display, Eq, Into, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct LicensePlate(String);

impl LicensePlate {
    /// Creates a new [`LicensePlate`] if the given `plate` is valid.
    #[must_use]
    pub fn new(plate: impl Into<String>) -> Option<Self> {
        let plate = plate.into();
        super::is_valid_text(&plate).then_some(Self(plate))
    }
}

impl FromStr for LicensePlate {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `LicensePlate`")
    }
}

/// Availability status of a [`Car`].
///
/// Only [`Status::available()`] and [`Status::rented()`] are ever assigned
/// by rentals. Any other value (`maintenance`, for example) may be set by a
/// direct [`Car`] edit and blocks booking the same way [`Status::rented()`]
/// does.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, Into, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Status(String);

impl Status {
    /// Textual form of [`Status::available()`].
    pub const AVAILABLE: &'static str = "available";

    /// Textual form of [`Status::rented()`].
    pub const RENTED: &'static str = "rented";

    /// [`Car`] may be booked.
    #[must_use]
    pub fn available() -> Self {
        Self(Self::AVAILABLE.to_owned())
    }

    /// [`Car`] is booked by an active rental.
    #[must_use]
    pub fn rented() -> Self {
        Self(Self::RENTED.to_owned())
    }

    /// Creates a new [`Status`] if the given `status` is valid.
    #[must_use]
    pub fn new(status: impl Into<String>) -> Option<Self> {
        let status = status.into();
        super::is_valid_text(&status).then_some(Self(status))
    }

    /// Indicates whether this [`Status`] allows booking a [`Car`].
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.0 == Self::AVAILABLE
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::available()
    }
}

impl FromStr for Status {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Status`")
    }
}

/// Change of a [`Car`]'s [`Status`] caused by a rental transition.
#[derive(Clone, Debug)]
pub struct StatusChange {
    /// ID of the [`Car`] to change the [`Status`] of.
    pub car_id: Id,

    /// [`Status`] the [`Car`] must currently have for the change to apply.
    ///
    /// [`None`] applies the change unconditionally.
    pub from: Option<Status>,

    /// [`Status`] to assign.
    pub to: Status,
}

impl StatusChange {
    /// Books the [`Car`]: [`Status::available()`] becomes
    /// [`Status::rented()`].
    #[must_use]
    pub fn book(car_id: Id) -> Self {
        Self {
            car_id,
            from: Some(Status::available()),
            to: Status::rented(),
        }
    }

    /// Frees the [`Car`], whatever its current [`Status`] is.
    #[must_use]
    pub fn free(car_id: Id) -> Self {
        Self {
            car_id,
            from: None,
            to: Status::available(),
        }
    }
}
