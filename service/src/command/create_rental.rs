//! [`Command`] for booking a [`Car`] by a [`Customer`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted, Update},
    Date,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{car, customer, rental, Customer, Rental},
    infra::{database, database::Violation, Database},
    Service,
};
#[cfg(doc)]
use crate::domain::Car;

use super::Command;

/// [`Command`] for booking a [`Car`] by a [`Customer`].
///
/// Creates a new [`rental::Status::Active`] [`Rental`] and marks its [`Car`]
/// as [`car::Status::rented()`] atomically. Only a
/// [`car::Status::available()`] [`Car`] may be booked.
#[derive(Clone, Debug)]
pub struct CreateRental {
    /// ID of the [`Customer`] renting the [`Car`].
    pub customer_id: customer::Id,

    /// ID of the [`Car`] to rent.
    pub car_id: car::Id,

    /// [`Date`] the new [`Rental`] starts at.
    pub start_date: Date,

    /// [`Date`] the new [`Rental`] ends at.
    pub end_date: Date,
}

impl<Db> Command<CreateRental> for Service<Db>
where
    Db: Database<
            Select<By<Option<Customer>, customer::Id>>,
            Ok = Option<Customer>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Update<car::StatusChange>,
            Ok = u64,
            Err = Traced<database::Error>,
        > + Database<Insert<Rental>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Rental;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateRental) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateRental {
            customer_id,
            car_id,
            start_date,
            end_date,
        } = cmd;

        self.database()
            .execute(Select(By::<Option<Customer>, _>::new(
                customer_id.clone(),
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| E::CustomerNotExists(customer_id.clone()))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let rental = Rental {
            id: rental::Id::new(),
            customer_id,
            car_id,
            start_date,
            end_date,
            status: rental::Status::Active,
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Affects nothing unless the `Car` exists and is available.
        let booked = tx
            .execute(Update(car::StatusChange::book(rental.car_id.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if booked == 0 {
            return Err(tracerr::new!(E::CarUnavailable(rental.car_id)));
        }

        tx.execute(Insert(rental.clone()))
            .await
            .map_err(|e| {
                super::map_violation(e, |v| match v {
                    Violation::ForeignKey(rental::CUSTOMER_CONSTRAINT) => {
                        Some(E::CustomerNotExists(rental.customer_id.clone()))
                    }
                    Violation::Unique(rental::ID_CONSTRAINT) => {
                        Some(E::RentalExists(rental.id.clone()))
                    }
                    Violation::Unique(_) | Violation::ForeignKey(_) => None,
                })
            })?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!(
            rental_id = %rental.id,
            customer_id = %rental.customer_id,
            car_id = %rental.car_id,
            "`Car` booked",
        );

        Ok(rental)
    }
}

/// Error of [`CreateRental`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Car`] does not exist or is not [`car::Status::available()`].
    #[display("`Car(id: {_0})` is not available for rent")]
    #[from(ignore)]
    CarUnavailable(#[error(not(source))] car::Id),

    /// [`Customer`] with the provided ID does not exist.
    #[display("`Customer(id: {_0})` does not exist")]
    #[from(ignore)]
    CustomerNotExists(#[error(not(source))] customer::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Rental`] with the generated ID exists already.
    #[display("`Rental(id: {_0})` exists already")]
    #[from(ignore)]
    RentalExists(#[error(not(source))] rental::Id),
}
