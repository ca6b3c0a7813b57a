//! [`Query`] collection related to the dashboard overview.

use common::operations::By;

use crate::read;
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries [`read::dashboard::Stats`].
pub type Stats = DatabaseQuery<By<read::dashboard::Stats, ()>>;
