//! [`Command`] for removing a [`Car`] from the fleet.

use common::operations::{By, Delete};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::Rental;
use crate::{
    domain::{car, rental, Car},
    infra::{database, database::Violation, Database},
    Service,
};

use super::Command;

/// [`Command`] for removing a [`Car`] from the fleet.
///
/// A [`Car`] referenced by any [`Rental`] cannot be removed.
#[derive(Clone, Debug)]
pub struct DeleteCar {
    /// ID of the [`Car`] to remove.
    pub car_id: car::Id,
}

impl<Db> Command<DeleteCar> for Service<Db>
where
    Db: Database<
        Delete<By<Car, car::Id>>,
        Ok = u64,
        Err = Traced<database::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeleteCar) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteCar { car_id } = cmd;

        let deleted = self
            .database()
            .execute(Delete(By::new(car_id.clone())))
            .await
            .map_err(|e| {
                super::map_violation(e, |v| match v {
                    Violation::ForeignKey(rental::CAR_CONSTRAINT) => {
                        Some(E::CarHasRentals(car_id.clone()))
                    }
                    Violation::Unique(_) | Violation::ForeignKey(_) => None,
                })
            })?;
        if deleted == 0 {
            return Err(tracerr::new!(E::CarNotExists(car_id)));
        }

        log::info!(%car_id, "`Car` deleted");

        Ok(())
    }
}

/// Error of [`DeleteCar`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Car`] is referenced by [`Rental`]s.
    #[display("`Car(id: {_0})` has rentals")]
    #[from(ignore)]
    CarHasRentals(#[error(not(source))] car::Id),

    /// [`Car`] with the provided ID does not exist.
    #[display("`Car(id: {_0})` does not exist")]
    #[from(ignore)]
    CarNotExists(#[error(not(source))] car::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),
}
