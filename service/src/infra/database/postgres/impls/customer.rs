//! [`Customer`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{customer, Customer},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Builds a [`Customer`] out of the provided [`Row`].
fn from_row(row: &Row) -> Customer {
    Customer {
        id: row.get("id"),
        full_name: row.get("full_name"),
        email: row.get("email"),
        phone: row.get("phone"),
        drivers_license_id: row.get("drivers_license_id"),
        date_of_birth: row.get("date_of_birth"),
    }
}

impl<C> Database<Select<By<Option<Customer>, customer::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Customer>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Customer>, customer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            SELECT id, full_name, email, phone, \
                   drivers_license_id, date_of_birth \
            FROM customers \
            WHERE id = $1::TEXT";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Select<By<Vec<Customer>, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Customer>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Customer>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT id, full_name, email, phone, \
                   drivers_license_id, date_of_birth \
            FROM customers \
            ORDER BY full_name ASC, id ASC";
        Ok(self
            .query(SQL, &[])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Insert<Customer>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(customer): Insert<Customer>,
    ) -> Result<Self::Ok, Self::Err> {
        let Customer {
            id,
            full_name,
            email,
            phone,
            drivers_license_id,
            date_of_birth,
        } = customer;

        const SQL: &str = "\
            INSERT INTO customers (\
                id, full_name, email, phone, \
                drivers_license_id, date_of_birth\
            ) \
            VALUES (\
                $1::TEXT, $2::TEXT, $3::TEXT, $4::TEXT, \
                $5::TEXT, $6::TEXT\
            )";
        self.exec(
            SQL,
            &[
                &id,
                &full_name,
                &email,
                &phone,
                &drivers_license_id,
                &date_of_birth,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Update<Customer>> for Postgres<C>
where
    C: Connection,
{
    type Ok = u64;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(customer): Update<Customer>,
    ) -> Result<Self::Ok, Self::Err> {
        let Customer {
            id,
            full_name,
            email,
            phone,
            drivers_license_id,
            date_of_birth,
        } = customer;

        const SQL: &str = "\
            UPDATE customers \
            SET full_name = $2::TEXT, \
                email = $3::TEXT, \
                phone = $4::TEXT, \
                drivers_license_id = $5::TEXT, \
                date_of_birth = $6::TEXT \
            WHERE id = $1::TEXT";
        self.exec(
            SQL,
            &[
                &id,
                &full_name,
                &email,
                &phone,
                &drivers_license_id,
                &date_of_birth,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Delete<By<Customer, customer::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = u64;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Customer, customer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM customers \
            WHERE id = $1::TEXT";
        self.exec(SQL, &[&id]).await.map_err(tracerr::wrap!())
    }
}
