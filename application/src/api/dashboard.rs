//! Dashboard REST API definitions.

use axum::{Extension, Json};
use serde::Serialize;
use service::{query, read, Query as _};

use crate::{AsError, Error, Service};

/// Overall statistics of the car rental.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Number of registered customers.
    pub total_customers: u64,

    /// Number of cars available for rent.
    pub available_cars: u64,

    /// Number of ongoing rentals.
    pub active_rentals: u64,
}

impl From<read::dashboard::Stats> for Stats {
    fn from(stats: read::dashboard::Stats) -> Self {
        let read::dashboard::Stats {
            total_customers,
            available_cars,
            active_rentals,
        } = stats;
        Self {
            total_customers,
            available_cars,
            active_rentals,
        }
    }
}

/// Returns the current [`Stats`].
///
/// # Errors
///
/// If the storage fails.
pub async fn stats(
    Extension(service): Extension<Service>,
) -> Result<Json<Stats>, Error> {
    service
        .execute(query::dashboard::Stats::by(()))
        .await
        .map(|s| Json(s.into()))
        .map_err(AsError::into_error)
}
