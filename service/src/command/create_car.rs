//! [`Command`] for adding a new [`Car`] to the fleet.

use common::operations::Insert;
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{car, Car},
    infra::{database, database::Violation, Database},
    Service,
};

use super::Command;

/// [`Command`] for adding a new [`Car`] to the fleet.
///
/// A new [`Car`] is always [`car::Status::available()`].
#[derive(Clone, Debug)]
pub struct CreateCar {
    /// [`car::Make`] of a new [`Car`].
    pub make: car::Make,

    /// [`car::Model`] of a new [`Car`].
    pub model: car::Model,

    /// Production [`car::Year`] of a new [`Car`], if known.
    pub year: Option<car::Year>,

    /// [`car::LicensePlate`] of a new [`Car`].
    pub license_plate: car::LicensePlate,
}

impl<Db> Command<CreateCar> for Service<Db>
where
    Db: Database<Insert<Car>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Car;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateCar) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateCar {
            make,
            model,
            year,
            license_plate,
        } = cmd;

        let car = Car {
            id: car::Id::new(),
            make,
            model,
            year,
            license_plate,
            status: car::Status::available(),
        };

        self.database()
            .execute(Insert(car.clone()))
            .await
            .map_err(|e| {
                super::map_violation(e, |v| match v {
                    Violation::Unique(car::LICENSE_PLATE_CONSTRAINT) => {
                        Some(E::LicensePlateOccupied(car.license_plate.clone()))
                    }
                    Violation::Unique(_) | Violation::ForeignKey(_) => None,
                })
            })?;

        log::info!(car_id = %car.id, "`Car` created");

        Ok(car)
    }
}

/// Error of [`CreateCar`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`car::LicensePlate`] is registered for another [`Car`].
    #[display("`{_0}` license plate is already registered")]
    #[from(ignore)]
    LicensePlateOccupied(#[error(not(source))] car::LicensePlate),
}
