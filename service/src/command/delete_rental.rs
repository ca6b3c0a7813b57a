//! [`Command`] for deleting a [`Rental`].

use common::operations::{
    By, Commit, Delete, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::Car;
use crate::{
    domain::{car, rental, Rental},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Rental`].
///
/// Deletes the [`Rental`] and makes its [`Car`] [`car::Status::available()`]
/// atomically, whatever the [`rental::Status`] of the [`Rental`] is.
#[derive(Clone, Debug)]
pub struct DeleteRental {
    /// ID of the [`Rental`] to delete.
    pub rental_id: rental::Id,
}

impl<Db> Command<DeleteRental> for Service<Db>
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
            Delete<By<Rental, rental::Id>>,
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

    async fn execute(&self, cmd: DeleteRental) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteRental { rental_id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent transitions of the same `Rental`.
        tx.execute(Lock(By::new(rental_id.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let rental = tx
            .execute(Select(By::<Option<Rental>, _>::new(rental_id.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| E::RentalNotExists(rental_id.clone()))
            .map_err(tracerr::wrap!())?;

        let deleted = tx
            .execute(Delete(By::new(rental_id.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if deleted == 0 {
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
            "`Rental` deleted",
        );

        Ok(rental)
    }
}

/// Error of [`DeleteRental`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Car`] of an existing [`Rental`] does not exist.
    #[display("`Car(id: {_0})` of the `Rental` does not exist")]
    #[from(ignore)]
    CarNotExists(#[error(not(source))] car::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Rental`] with the provided ID does not exist.
    #[display("`Rental(id: {_0})` does not exist")]
    #[from(ignore)]
    RentalNotExists(#[error(not(source))] rental::Id),
}
