//! [`Rental`] read model definitions.

use crate::domain::{car, customer, Rental};
#[cfg(doc)]
use crate::domain::{Car, Customer};

/// [`Rental`] joined with the essentials of its [`Customer`] and [`Car`].
///
/// A [`Rental`] whose [`Customer`] or [`Car`] is missing has no [`Listed`]
/// representation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Listed {
    /// Listed [`Rental`] itself.
    pub rental: Rental,

    /// [`customer::FullName`] of the renting [`Customer`].
    pub customer_name: customer::FullName,

    /// [`car::Make`] of the rented [`Car`].
    pub make: car::Make,

    /// [`car::Model`] of the rented [`Car`].
    pub model: car::Model,

    /// [`car::LicensePlate`] of the rented [`Car`].
    pub license_plate: car::LicensePlate,
}

/// Detailed view of a single [`Rental`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Detail {
    /// Everything a [`Listed`] [`Rental`] carries.
    pub listed: Listed,

    /// [`customer::Email`] of the renting [`Customer`].
    pub customer_email: customer::Email,
}
