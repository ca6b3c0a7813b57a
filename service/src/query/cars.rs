//! [`Query`] collection related to the multiple [`Car`]s.

use common::operations::By;

use crate::domain::Car;
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries the whole fleet of [`Car`]s.
pub type All = DatabaseQuery<By<Vec<Car>, ()>>;
