//! [`Rental`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Lock, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{rental, Rental},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

/// Builds a [`Rental`] out of the provided [`Row`].
fn from_row(row: &Row) -> Rental {
    Rental {
        id: row.get("id"),
        customer_id: row.get("customer_id"),
        car_id: row.get("car_id"),
        start_date: row.get("rental_start_date"),
        end_date: row.get("rental_end_date"),
        status: row.get("status"),
    }
}

/// Builds a [`read::rental::Listed`] out of the provided [`Row`].
fn listed_from_row(row: &Row) -> read::rental::Listed {
    read::rental::Listed {
        rental: from_row(row),
        customer_name: row.get("full_name"),
        make: row.get("make"),
        model: row.get("model"),
        license_plate: row.get("license_plate"),
    }
}

impl<C> Database<Select<By<Option<Rental>, rental::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Rental>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Rental>, rental::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            SELECT id, customer_id, car_id, \
                   rental_start_date, rental_end_date, status \
            FROM rentals \
            WHERE id = $1::TEXT";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Lock<By<Rental, rental::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Rental, rental::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM rentals \
            WHERE id = $1::TEXT \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Insert<Rental>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(rental): Insert<Rental>,
    ) -> Result<Self::Ok, Self::Err> {
        let Rental {
            id,
            customer_id,
            car_id,
            start_date,
            end_date,
            status,
        } = rental;

        const SQL: &str = "\
            INSERT INTO rentals (\
                id, customer_id, car_id, \
                rental_start_date, rental_end_date, status\
            ) \
            VALUES (\
                $1::TEXT, $2::TEXT, $3::TEXT, \
                $4::TEXT, $5::TEXT, $6::TEXT\
            )";
        self.exec(
            SQL,
            &[&id, &customer_id, &car_id, &start_date, &end_date, &status],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Update<rental::Revision>> for Postgres<C>
where
    C: Connection,
{
    type Ok = u64;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(revision): Update<rental::Revision>,
    ) -> Result<Self::Ok, Self::Err> {
        let rental::Revision {
            rental_id,
            status,
            end_date,
        } = revision;

        const SQL: &str = "\
            UPDATE rentals \
            SET status = $2::TEXT, \
                rental_end_date = $3::TEXT \
            WHERE id = $1::TEXT";
        self.exec(SQL, &[&rental_id, &status, &end_date])
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Delete<By<Rental, rental::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = u64;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Rental, rental::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM rentals \
            WHERE id = $1::TEXT";
        self.exec(SQL, &[&id]).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Vec<read::rental::Listed>, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<read::rental::Listed>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<read::rental::Listed>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT r.id, r.customer_id, r.car_id, \
                   r.rental_start_date, r.rental_end_date, r.status, \
                   cu.full_name, \
                   ca.make, ca.model, ca.license_plate \
            FROM rentals AS r \
            INNER JOIN customers AS cu ON cu.id = r.customer_id \
            INNER JOIN cars AS ca ON ca.id = r.car_id \
            ORDER BY r.rental_start_date DESC, r.id ASC";
        Ok(self
            .query(SQL, &[])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(listed_from_row)
            .collect())
    }
}

impl<C> Database<Select<By<Option<read::rental::Detail>, rental::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<read::rental::Detail>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<read::rental::Detail>, rental::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            SELECT r.id, r.customer_id, r.car_id, \
                   r.rental_start_date, r.rental_end_date, r.status, \
                   cu.full_name, cu.email, \
                   ca.make, ca.model, ca.license_plate \
            FROM rentals AS r \
            INNER JOIN customers AS cu ON cu.id = r.customer_id \
            INNER JOIN cars AS ca ON ca.id = r.car_id \
            WHERE r.id = $1::TEXT";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| read::rental::Detail {
                listed: listed_from_row(&row),
                customer_email: row.get("email"),
            }))
    }
}
