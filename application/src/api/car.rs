//! [`Car`] REST API definitions.

use axum::{
    extract::{rejection::JsonRejection, Path},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use service::{
    command::{
        create_car, delete_car, update_car, CreateCar, DeleteCar, UpdateCar,
    },
    domain::{self, car},
    query, Command as _, Query as _,
};

use crate::{define_error, AsError, Error, Service};

use super::{parse, parse_opt, present, Message};

/// Car of the rental fleet.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    /// ID of this [`Car`].
    pub id: car::Id,

    /// Manufacturer of this [`Car`].
    pub make: String,

    /// Model of this [`Car`].
    pub model: String,

    /// Production year of this [`Car`], if known.
    pub year: Option<i32>,

    /// License plate of this [`Car`].
    pub license_plate: String,

    /// Availability status of this [`Car`].
    pub status: String,
}

impl From<domain::Car> for Car {
    fn from(car: domain::Car) -> Self {
        let domain::Car {
            id,
            make,
            model,
            year,
            license_plate,
            status,
        } = car;
        Self {
            id,
            make: make.into(),
            model: model.into(),
            year: year.map(Into::into),
            license_plate: license_plate.into(),
            status: status.into(),
        }
    }
}

/// Details of a [`Car`] to be created or replaced with.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Input {
    /// Manufacturer of the [`Car`].
    pub make: Option<String>,

    /// Model of the [`Car`].
    pub model: Option<String>,

    /// Production year of the [`Car`].
    pub year: Option<i32>,

    /// License plate of the [`Car`].
    pub license_plate: Option<String>,

    /// Availability status of the [`Car`].
    ///
    /// Ignored on creation.
    pub status: Option<String>,
}

/// Validated [`Input`].
struct Details {
    make: car::Make,
    model: car::Model,
    year: Option<car::Year>,
    license_plate: car::LicensePlate,
    status: Option<car::Status>,
}

impl TryFrom<Input> for Details {
    type Error = Error;

    fn try_from(input: Input) -> Result<Self, Self::Error> {
        define_error! {
            enum InputError {
                #[code = "INVALID_INPUT"]
                #[status = BAD_REQUEST]
                #[message = "Missing required fields: make, model, licensePlate"]
                MissingFields,

                #[code = "INVALID_INPUT"]
                #[status = BAD_REQUEST]
                #[message = "`year` is out of range"]
                InvalidYear,
            }
        }

        let Input {
            make,
            model,
            year,
            license_plate,
            status,
        } = input;
        let (Some(make), Some(model), Some(license_plate)) =
            (present(make), present(model), present(license_plate))
        else {
            return Err(InputError::MissingFields.into());
        };

        Ok(Self {
            make: parse("make", &make)?,
            model: parse("model", &model)?,
            year: year
                .map(|y| car::Year::new(y).ok_or(InputError::InvalidYear))
                .transpose()?,
            license_plate: parse("licensePlate", &license_plate)?,
            status: parse_opt("status", status)?,
        })
    }
}

/// Lists all the [`Car`]s of the fleet.
///
/// # Errors
///
/// If the storage fails.
pub async fn list(
    Extension(service): Extension<Service>,
) -> Result<Json<Vec<Car>>, Error> {
    let cars = service
        .execute(query::cars::All::by(()))
        .await
        .map_err(AsError::into_error)?;
    Ok(Json(cars.into_iter().map(Into::into).collect()))
}

/// Adds a new [`Car`] to the fleet.
///
/// # Errors
///
/// If the input is invalid or the license plate is taken.
pub async fn create(
    Extension(service): Extension<Service>,
    input: Result<Json<Input>, JsonRejection>,
) -> Result<(http::StatusCode, Json<Car>), Error> {
    let Json(input) = input.map_err(AsError::into_error)?;
    let Details {
        make,
        model,
        year,
        license_plate,
        status: _,
    } = input.try_into()?;

    let car = service
        .execute(CreateCar {
            make,
            model,
            year,
            license_plate,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok((http::StatusCode::CREATED, Json(car.into())))
}

/// Returns the [`Car`] with the provided ID.
///
/// # Errors
///
/// If the [`Car`] does not exist.
pub async fn by_id(
    Extension(service): Extension<Service>,
    Path(id): Path<car::Id>,
) -> Result<Json<Car>, Error> {
    define_error! {
        enum QueryError {
            #[code = "NOT_FOUND"]
            #[status = NOT_FOUND]
            #[message = "Car not found"]
            CarNotFound,
        }
    }

    service
        .execute(query::car::ById::by(id))
        .await
        .map_err(AsError::into_error)?
        .map(|c| Json(c.into()))
        .ok_or_else(|| QueryError::CarNotFound.into())
}

/// Replaces the details of the [`Car`] with the provided ID.
///
/// # Errors
///
/// If the input is invalid, the [`Car`] does not exist, or the license
/// plate is taken.
pub async fn update(
    Extension(service): Extension<Service>,
    Path(car_id): Path<car::Id>,
    input: Result<Json<Input>, JsonRejection>,
) -> Result<Json<Message>, Error> {
    let Json(input) = input.map_err(AsError::into_error)?;
    let Details {
        make,
        model,
        year,
        license_plate,
        status,
    } = input.try_into()?;

    service
        .execute(UpdateCar {
            car_id,
            make,
            model,
            year,
            license_plate,
            status,
        })
        .await
        .map(drop)
        .map_err(AsError::into_error)?;

    Ok(Message::json("Car updated successfully"))
}

/// Removes the [`Car`] with the provided ID from the fleet.
///
/// # Errors
///
/// If the [`Car`] does not exist or still has rentals.
pub async fn delete(
    Extension(service): Extension<Service>,
    Path(car_id): Path<car::Id>,
) -> Result<Json<Message>, Error> {
    service
        .execute(DeleteCar { car_id })
        .await
        .map_err(AsError::into_error)?;

    Ok(Message::json("Car removed successfully"))
}

define_error! {
    enum CommandError {
        #[code = "NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "Car not found"]
        CarNotFound,

        #[code = "CONSTRAINT_VIOLATION"]
        #[status = CONFLICT]
        #[message = "Error: License plate already exists."]
        LicensePlateOccupied,

        #[code = "CONSTRAINT_VIOLATION"]
        #[status = CONFLICT]
        #[message = "Car has rentals and cannot be removed"]
        CarHasRentals,
    }
}

impl AsError for create_car::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::LicensePlateOccupied(_) => {
                Some(CommandError::LicensePlateOccupied.into())
            }
        }
    }
}

impl AsError for update_car::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::CarNotExists(_) => Some(CommandError::CarNotFound.into()),
            Self::Db(e) => e.try_as_error(),
            Self::LicensePlateOccupied(_) => {
                Some(CommandError::LicensePlateOccupied.into())
            }
        }
    }
}

impl AsError for delete_car::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::CarHasRentals(_) => Some(CommandError::CarHasRentals.into()),
            Self::CarNotExists(_) => Some(CommandError::CarNotFound.into()),
            Self::Db(e) => e.try_as_error(),
        }
    }
}
