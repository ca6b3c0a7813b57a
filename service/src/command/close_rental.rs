//! [`Command`] for completing or cancelling a [`Rental`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    Date,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{car, rental, Rental},
    infra::{database, Database},
    Service,
};
#[cfg(doc)]
use crate::domain::Car;

use super::Command;

/// [`Command`] for completing or cancelling a [`Rental`].
///
/// Revises the [`Rental`] and makes its [`Car`]
/// [`car::Status::available()`] atomically.
#[derive(Clone, Debug)]
pub struct CloseRental {
    /// ID of the [`Rental`] to close.
    pub rental_id: rental::Id,

    /// New [`rental::Status`] of the [`Rental`].
    ///
    /// Must be either [`rental::Status::Completed`] or
    /// [`rental::Status::Cancelled`].
    pub status: rental::Status,

    /// [`Date`] the [`Rental`] actually ends at.
    pub end_date: Date,

    /// ID of the [`Car`] the caller expects the [`Rental`] to hold, if any.
    ///
    /// The [`Car`] to free is always the one stored in the [`Rental`].
    pub car_id: Option<car::Id>,
}

impl<Db> Command<CloseRental> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Rental, rental::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Rental>, rental::Id>>,
            Ok = Option<Rental>,
            Err = Traced<database::Error>,
        > + Database<
            Update<rental::Revision>,
            Ok = u64,
            Err = Traced<database::Error>,
        > + Database<
            Update<car::StatusChange>,
            Ok = u64,
            Err = Traced<database::Error>,
        > + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Rental;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CloseRental) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CloseRental {
            rental_id,
            status,
            end_date,
            car_id,
        } = cmd;

        if !status.releases_car() {
            return Err(tracerr::new!(E::NotClosingStatus(status)));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent transitions of the same `Rental`.
        tx.execute(Lock(By::new(rental_id.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut rental = tx
            .execute(Select(By::<Option<Rental>, _>::new(rental_id.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| E::RentalNotExists(rental_id.clone()))
            .map_err(tracerr::wrap!())?;
        if let Some(expected) = car_id {
            if expected != rental.car_id {
                return Err(tracerr::new!(E::CarMismatch {
                    expected,
                    actual: rental.car_id,
                }));
            }
        }

        rental.status = status;
        rental.end_date = end_date;
        let revised = tx
            .execute(Update(rental::Revision {
                rental_id: rental.id.clone(),
                status: rental.status,
                end_date: rental.end_date.clone(),
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if revised == 0 {
            return Err(tracerr::new!(E::RentalNotExists(rental_id)));
        }

        let freed = tx
            .execute(Update(car::StatusChange::free(rental.car_id.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if freed == 0 {
            return Err(tracerr::new!(E::CarNotExists(rental.car_id)));
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!(
            rental_id = %rental.id,
            car_id = %rental.car_id,
            status = %rental.status,
            "`Rental` closed",
        );

        Ok(rental)
    }
}

/// Error of [`CloseRental`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Provided [`Car`] ID differs from the one of the [`Rental`].
    #[display("`Rental` holds `Car(id: {actual})`, not `Car(id: {expected})`")]
    #[from(ignore)]
    CarMismatch {
        /// ID of the [`Car`] expected by the caller.
        expected: car::Id,

        /// ID of the [`Car`] stored in the [`Rental`].
        actual: car::Id,
    },

    /// [`Car`] of an existing [`Rental`] does not exist.
    #[display("`Car(id: {_0})` of the `Rental` does not exist")]
    #[from(ignore)]
    CarNotExists(#[error(not(source))] car::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`rental::Status`] does not close a [`Rental`].
    #[display("`{_0}` status does not close a `Rental`")]
    #[from(ignore)]
    NotClosingStatus(#[error(not(source))] rental::Status),

    /// [`Rental`] with the provided ID does not exist.
    #[display("`Rental(id: {_0})` does not exist")]
    #[from(ignore)]
    RentalNotExists(#[error(not(source))] rental::Id),
}
