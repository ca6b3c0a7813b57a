//! [`Command`] for replacing the details of an existing [`Car`].

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{car, Car},
    infra::{database, database::Violation, Database},
    Service,
};

use super::Command;

/// [`Command`] for replacing the details of an existing [`Car`].
///
/// Every detail is overwritten, so an omitted [`car::Year`] is cleared. The
/// [`car::Status`] is kept as is, unless a new one is provided.
#[derive(Clone, Debug)]
pub struct UpdateCar {
    /// ID of the [`Car`] to update.
    pub car_id: car::Id,

    /// New [`car::Make`] of the [`Car`].
    pub make: car::Make,

    /// New [`car::Model`] of the [`Car`].
    pub model: car::Model,

    /// New production [`car::Year`] of the [`Car`].
    pub year: Option<car::Year>,

    /// New [`car::LicensePlate`] of the [`Car`].
    pub license_plate: car::LicensePlate,

    /// New [`car::Status`] of the [`Car`], if it should be overridden.
    pub status: Option<car::Status>,
}

impl<Db> Command<UpdateCar> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Car, car::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Car>, car::Id>>,
            Ok = Option<Car>,
            Err = Traced<database::Error>,
        > + Database<Update<Car>, Ok = u64, Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Car;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateCar) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateCar {
            car_id,
            make,
            model,
            year,
            license_plate,
            status,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid racing with a rental transition of the same `Car`.
        tx.execute(Lock(By::new(car_id.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let current = tx
            .execute(Select(By::<Option<Car>, _>::new(car_id.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| E::CarNotExists(car_id.clone()))
            .map_err(tracerr::wrap!())?;

        let car = Car {
            id: car_id,
            make,
            model,
            year,
            license_plate,
            status: status.unwrap_or(current.status),
        };

        tx.execute(Update(car.clone()))
            .await
            .map_err(|e| {
                super::map_violation(e, |v| match v {
                    Violation::Unique(car::LICENSE_PLATE_CONSTRAINT) => {
                        Some(E::LicensePlateOccupied(car.license_plate.clone()))
                    }
                    Violation::Unique(_) | Violation::ForeignKey(_) => None,
                })
            })
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!(car_id = %car.id, status = %car.status, "`Car` updated");

        Ok(car)
    }
}

/// Error of [`UpdateCar`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Car`] with the provided ID does not exist.
    #[display("`Car(id: {_0})` does not exist")]
    #[from(ignore)]
    CarNotExists(#[error(not(source))] car::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`car::LicensePlate`] is registered for another [`Car`].
    #[display("`{_0}` license plate is already registered")]
    #[from(ignore)]
    LicensePlateOccupied(#[error(not(source))] car::LicensePlate),
}
