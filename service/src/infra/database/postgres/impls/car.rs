//! [`Car`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Lock, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{car, Car},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Builds a [`Car`] out of the provided [`Row`].
fn from_row(row: &Row) -> Car {
    Car {
        id: row.get("id"),
        make: row.get("make"),
        model: row.get("model"),
        year: row.get("year"),
        license_plate: row.get("license_plate"),
        status: row.get("status"),
    }
}

impl<C> Database<Select<By<Option<Car>, car::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Car>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Car>, car::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            SELECT id, make, model, year, license_plate, status \
            FROM cars \
            WHERE id = $1::TEXT";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Select<By<Vec<Car>, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Car>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Car>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT id, make, model, year, license_plate, status \
            FROM cars \
            ORDER BY make ASC, model ASC, id ASC";
        Ok(self
            .query(SQL, &[])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Insert<Car>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(car): Insert<Car>,
    ) -> Result<Self::Ok, Self::Err> {
        let Car {
            id,
            make,
            model,
            year,
            license_plate,
            status,
        } = car;

        const SQL: &str = "\
            INSERT INTO cars (\
                id, make, model, year, license_plate, status\
            ) \
            VALUES (\
                $1::TEXT, $2::TEXT, $3::TEXT, $4::INT4, $5::TEXT, $6::TEXT\
            )";
        self.exec(SQL, &[&id, &make, &model, &year, &license_plate, &status])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Update<Car>> for Postgres<C>
where
    C: Connection,
{
    type Ok = u64;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(car): Update<Car>,
    ) -> Result<Self::Ok, Self::Err> {
        let Car {
            id,
            make,
            model,
            year,
            license_plate,
            status,
        } = car;

        const SQL: &str = "\
            UPDATE cars \
            SET make = $2::TEXT, \
                model = $3::TEXT, \
                year = $4::INT4, \
                license_plate = $5::TEXT, \
                status = $6::TEXT \
            WHERE id = $1::TEXT";
        self.exec(SQL, &[&id, &make, &model, &year, &license_plate, &status])
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<car::StatusChange>> for Postgres<C>
where
    C: Connection,
{
    type Ok = u64;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(change): Update<car::StatusChange>,
    ) -> Result<Self::Ok, Self::Err> {
        let car::StatusChange { car_id, from, to } = change;

        // `NULL` expected status matches any current one.
        const SQL: &str = "\
            UPDATE cars \
            SET status = $3::TEXT \
            WHERE id = $1::TEXT \
              AND ($2::TEXT IS NULL OR status = $2::TEXT)";
        self.exec(SQL, &[&car_id, &from, &to])
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Lock<By<Car, car::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Car, car::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM cars \
            WHERE id = $1::TEXT \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Delete<By<Car, car::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = u64;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Car, car::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM cars \
            WHERE id = $1::TEXT";
        self.exec(SQL, &[&id]).await.map_err(tracerr::wrap!())
    }
}
