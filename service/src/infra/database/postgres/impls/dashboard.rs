//! [`read::dashboard`]-related [`Database`] implementations.

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::{car, rental},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

impl<C> Database<Select<By<read::dashboard::Stats, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = read::dashboard::Stats;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<read::dashboard::Stats, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT (SELECT COUNT(*) FROM customers) AS total_customers, \
                   (SELECT COUNT(*) FROM cars \
                    WHERE status = $1::TEXT) AS available_cars, \
                   (SELECT COUNT(*) FROM rentals \
                    WHERE status = $2::TEXT) AS active_rentals";
        let available = car::Status::available();
        let row = self
            .query_opt(SQL, &[&available, &rental::Status::Active])
            .await
            .map_err(tracerr::wrap!())?;

        let count = |column: &str| {
            row.as_ref()
                .and_then(|r| u64::try_from(r.get::<_, i64>(column)).ok())
                .unwrap_or_default()
        };
        Ok(read::dashboard::Stats {
            total_customers: count("total_customers"),
            available_cars: count("available_cars"),
            active_rentals: count("active_rentals"),
        })
    }
}
