//! [`Query`] collection related to the multiple [`Customer`]s.

use common::operations::By;

use crate::domain::Customer;
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries all the [`Customer`]s.
pub type All = DatabaseQuery<By<Vec<Customer>, ()>>;
