//! [`Query`] collection related to the multiple [`Rental`]s.

use common::operations::By;

use crate::read;
#[cfg(doc)]
use crate::{domain::Rental, Query};

use super::DatabaseQuery;

/// Queries all the [`Rental`]s joined with their customers and cars.
pub type All = DatabaseQuery<By<Vec<read::rental::Listed>, ()>>;
