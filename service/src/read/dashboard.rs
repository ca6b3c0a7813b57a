//! Dashboard read model definitions.

#[cfg(doc)]
use crate::domain::{Car, Customer, Rental};

/// Fleet and customer base overview.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Stats {
    /// Total number of registered [`Customer`]s.
    pub total_customers: u64,

    /// Number of [`Car`]s which may be booked right now.
    pub available_cars: u64,

    /// Number of [`Rental`]s holding a [`Car`].
    pub active_rentals: u64,
}
