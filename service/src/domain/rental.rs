//! [`Rental`] definitions.

use common::Date;
use derive_more::{AsRef, Display, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{car, customer};
#[cfg(doc)]
use super::{Car, Customer};

/// Name of the primary key constraint upon [`Rental::id`].
pub const ID_CONSTRAINT: &str = "rentals_pkey";

/// Name of the foreign key constraint upon [`Rental::customer_id`].
pub const CUSTOMER_CONSTRAINT: &str = "rentals_customer_id_fkey";

/// Name of the foreign key constraint upon [`Rental::car_id`].
pub const CAR_CONSTRAINT: &str = "rentals_car_id_fkey";

/// Agreement of a [`Customer`] renting a [`Car`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Rental {
    /// ID of this [`Rental`].
    pub id: Id,

    /// ID of the [`Customer`] renting the [`Car`].
    pub customer_id: customer::Id,

    /// ID of the rented [`Car`].
    pub car_id: car::Id,

    /// [`Date`] this [`Rental`] starts at.
    pub start_date: Date,

    /// [`Date`] this [`Rental`] ends at.
    pub end_date: Date,

    /// [`Status`] of this [`Rental`].
    pub status: Status,
}

impl Rental {
    /// Indicates whether this [`Rental`] currently holds its [`Car`].
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == Status::Active
    }
}

/// ID of a [`Rental`].
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
    pub const PREFIX: &'static str = "rent";

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

/// Lifecycle status of a [`Rental`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Eq,
    Hash,
    PartialEq,
    Serialize,
    strum::AsRefStr,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Status {
    /// [`Rental`] is ongoing and holds its [`Car`].
    #[default]
    Active,

    /// [`Rental`] has been finished and its [`Car`] returned.
    Completed,

    /// [`Rental`] has been called off and its [`Car`] released.
    Cancelled,
}

impl Status {
    /// Indicates whether transitioning a [`Rental`] into this [`Status`]
    /// releases its [`Car`].
    #[must_use]
    pub fn releases_car(self) -> bool {
        match self {
            Self::Completed | Self::Cancelled => true,
            Self::Active => false,
        }
    }
}

#[cfg(feature = "postgres")]
mod postgres {
    //! Module providing integration with [`postgres_types`] crate.

    use std::error::Error as StdError;

    use postgres_types::{
        accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql,
        Type,
    };

    use super::Status;

    impl FromSql<'_> for Status {
        accepts!(TEXT, VARCHAR);

        fn from_sql(
            ty: &Type,
            raw: &[u8],
        ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
            let s = <&str>::from_sql(ty, raw)?;
            s.parse().map_err(|_| {
                format!("invalid `rental::Status` value: {s}").into()
            })
        }
    }

    impl ToSql for Status {
        accepts!(TEXT, VARCHAR);
        to_sql_checked!();

        fn to_sql(
            &self,
            ty: &Type,
            w: &mut BytesMut,
        ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
            self.as_ref().to_sql(ty, w)
        }
    }
}

/// Revision of a [`Rental`]'s [`Status`] and end [`Date`].
#[derive(Clone, Debug)]
pub struct Revision {
    /// ID of the [`Rental`] to revise.
    pub rental_id: Id,

    /// New [`Status`] of the [`Rental`].
    pub status: Status,

    /// New end [`Date`] of the [`Rental`].
    pub end_date: Date,
}

#[cfg(test)]
mod tests {
    use super::Status;

    #[test]
    fn status_textual_form() {
        assert_eq!(Status::Active.to_string(), "active");
        assert_eq!("completed".parse::<Status>().unwrap(), Status::Completed);
        assert_eq!("cancelled".parse::<Status>().unwrap(), Status::Cancelled);
        assert!("returned".parse::<Status>().is_err());
        assert!("Active".parse::<Status>().is_err());
    }

    #[test]
    fn only_closing_statuses_release_car() {
        assert!(Status::Completed.releases_car());
        assert!(Status::Cancelled.releases_car());
        assert!(!Status::Active.releases_car());
    }
}
