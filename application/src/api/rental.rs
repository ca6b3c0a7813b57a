//! [`Rental`] REST API definitions.

use axum::{
    extract::{rejection::JsonRejection, Path},
    Extension, Json,
};
use common::Date;
use serde::{Deserialize, Serialize};
use service::{
    command::{
        close_rental, create_rental, delete_rental, update_rental,
        CloseRental, CreateRental, DeleteRental, UpdateRental,
    },
    domain::{self, car, customer},
    query, read, Command as _, Query as _,
};
use tracing as log;

use crate::{define_error, AsError, Error, Service};

use super::{parse, present, Message};

pub use service::domain::rental::{Id, Status};

/// Agreement of a customer renting a car.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rental {
    /// ID of this [`Rental`].
    pub id: Id,

    /// ID of the customer renting the car.
    pub customer_id: customer::Id,

    /// ID of the rented car.
    pub car_id: car::Id,

    /// Date this [`Rental`] starts at.
    pub rental_start_date: Date,

    /// Date this [`Rental`] ends at.
    pub rental_end_date: Date,

    /// Lifecycle status of this [`Rental`].
    pub status: Status,
}

impl From<domain::Rental> for Rental {
    fn from(rental: domain::Rental) -> Self {
        let domain::Rental {
            id,
            customer_id,
            car_id,
            start_date,
            end_date,
            status,
        } = rental;
        Self {
            id,
            customer_id,
            car_id,
            rental_start_date: start_date,
            rental_end_date: end_date,
            status,
        }
    }
}

/// [`Rental`] joined with its customer name and car description.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listed {
    /// Listed [`Rental`] itself.
    #[serde(flatten)]
    pub rental: Rental,

    /// Full name of the renting customer.
    pub customer_name: String,

    /// Manufacturer of the rented car.
    pub make: String,

    /// Model of the rented car.
    pub model: String,

    /// License plate of the rented car.
    pub license_plate: String,
}

impl From<read::rental::Listed> for Listed {
    fn from(listed: read::rental::Listed) -> Self {
        let read::rental::Listed {
            rental,
            customer_name,
            make,
            model,
            license_plate,
        } = listed;
        Self {
            rental: rental.into(),
            customer_name: customer_name.into(),
            make: make.into(),
            model: model.into(),
            license_plate: license_plate.into(),
        }
    }
}

/// [`Listed`] rental extended with the customer contacts.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Detail {
    /// [`Listed`] view of the [`Rental`].
    #[serde(flatten)]
    pub listed: Listed,

    /// Email address of the renting customer.
    pub customer_email: String,
}

impl From<read::rental::Detail> for Detail {
    fn from(detail: read::rental::Detail) -> Self {
        let read::rental::Detail {
            listed,
            customer_email,
        } = detail;
        Self {
            listed: listed.into(),
            customer_email: customer_email.into(),
        }
    }
}

/// Booking request of a car.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Booking {
    /// ID of the customer renting the car.
    pub customer_id: Option<String>,

    /// ID of the car to rent.
    pub car_id: Option<String>,

    /// Date the [`Rental`] starts at.
    pub rental_start_date: Option<String>,

    /// Date the [`Rental`] ends at.
    pub rental_end_date: Option<String>,
}

/// Revision of an existing [`Rental`].
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Revision {
    /// New [`Status`] of the [`Rental`].
    pub status: Option<String>,

    /// New end date of the [`Rental`].
    pub rental_end_date: Option<String>,

    /// ID of the car held by the [`Rental`].
    pub car_id: Option<String>,
}

/// Lists all the [`Rental`]s, most recently started first.
///
/// # Errors
///
/// If the storage fails.
pub async fn list(
    Extension(service): Extension<Service>,
) -> Result<Json<Vec<Listed>>, Error> {
    let rentals = service
        .execute(query::rentals::All::by(()))
        .await
        .map_err(AsError::into_error)?;
    Ok(Json(rentals.into_iter().map(Into::into).collect()))
}

/// Books a car for a customer.
///
/// # Errors
///
/// If the input is invalid, the customer does not exist, or the car is not
/// available for rent.
pub async fn create(
    Extension(service): Extension<Service>,
    input: Result<Json<Booking>, JsonRejection>,
) -> Result<(http::StatusCode, Json<Rental>), Error> {
    define_error! {
        enum InputError {
            #[code = "INVALID_INPUT"]
            #[status = BAD_REQUEST]
            #[message = "Missing required fields"]
            MissingFields,
        }
    }

    let Json(Booking {
        customer_id,
        car_id,
        rental_start_date,
        rental_end_date,
    }) = input.map_err(AsError::into_error)?;
    let (Some(customer_id), Some(car_id), Some(start), Some(end)) = (
        present(customer_id),
        present(car_id),
        present(rental_start_date),
        present(rental_end_date),
    ) else {
        return Err(InputError::MissingFields.into());
    };

    let rental = service
        .execute(CreateRental {
            customer_id: customer_id.as_str().into(),
            car_id: car_id.as_str().into(),
            start_date: parse("rentalStartDate", &start)?,
            end_date: parse("rentalEndDate", &end)?,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok((http::StatusCode::CREATED, Json(rental.into())))
}

/// Returns the [`Detail`]s of the [`Rental`] with the provided ID.
///
/// # Errors
///
/// If the [`Rental`] does not exist.
pub async fn by_id(
    Extension(service): Extension<Service>,
    Path(id): Path<Id>,
) -> Result<Json<Detail>, Error> {
    service
        .execute(query::rental::ById::by(id))
        .await
        .map_err(AsError::into_error)?
        .map(|r| Json(r.into()))
        .ok_or_else(|| CommandError::RentalNotFound.into())
}

/// Revises the [`Rental`] with the provided ID.
///
/// A closing [`Status`] completes or cancels the [`Rental`] and makes its
/// car available again.
///
/// # Errors
///
/// If the input is invalid or the [`Rental`] does not exist.
pub async fn update(
    Extension(service): Extension<Service>,
    Path(rental_id): Path<Id>,
    input: Result<Json<Revision>, JsonRejection>,
) -> Result<Json<Message>, Error> {
    define_error! {
        enum InputError {
            #[code = "INVALID_INPUT"]
            #[status = BAD_REQUEST]
            #[message = "Missing required fields: status, rentalEndDate, carId"]
            MissingFields,
        }
    }

    let Json(Revision {
        status,
        rental_end_date,
        car_id,
    }) = input.map_err(AsError::into_error)?;
    let (Some(status), Some(end), Some(car_id)) =
        (present(status), present(rental_end_date), present(car_id))
    else {
        return Err(InputError::MissingFields.into());
    };
    let status = parse::<Status>("status", &status)?;
    let end_date = parse("rentalEndDate", &end)?;

    if status.releases_car() {
        let rental = service
            .execute(CloseRental {
                rental_id,
                status,
                end_date,
                car_id: Some(car_id.as_str().into()),
            })
            .await
            .map_err(AsError::into_error)?;
        log::debug!(
            rental_id = %rental.id,
            car_id = %rental.car_id,
            "`Rental` closed via API",
        );
        Ok(Message::json(format!(
            "Rental {status} and car set to available",
        )))
    } else {
        service
            .execute(UpdateRental {
                rental_id,
                status,
                end_date,
            })
            .await
            .map(drop)
            .map_err(AsError::into_error)?;
        Ok(Message::json("Rental updated"))
    }
}

/// Removes the [`Rental`] with the provided ID and makes its car available
/// again.
///
/// # Errors
///
/// If the [`Rental`] does not exist.
pub async fn delete(
    Extension(service): Extension<Service>,
    Path(rental_id): Path<Id>,
) -> Result<Json<Message>, Error> {
    service
        .execute(DeleteRental { rental_id })
        .await
        .map(drop)
        .map_err(AsError::into_error)?;

    Ok(Message::json("Rental removed and car set to available"))
}

define_error! {
    enum CommandError {
        #[code = "NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "Rental not found"]
        RentalNotFound,

        #[code = "INVALID_INPUT"]
        #[status = BAD_REQUEST]
        #[message = "Customer does not exist"]
        UnknownCustomer,

        #[code = "CAR_UNAVAILABLE"]
        #[status = CONFLICT]
        #[message = "Car is not available for rent"]
        CarUnavailable,

        #[code = "INVALID_INPUT"]
        #[status = BAD_REQUEST]
        #[message = "`carId` does not match the car of the rental"]
        CarMismatch,

        #[code = "INVALID_INPUT"]
        #[status = BAD_REQUEST]
        #[message = "`status` must be `completed` or `cancelled`"]
        NotClosingStatus,

        #[code = "INVALID_INPUT"]
        #[status = BAD_REQUEST]
        #[message = "`status` must be `active`"]
        ClosingStatus,
    }
}

impl AsError for create_rental::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::CarUnavailable(_) => {
                Some(CommandError::CarUnavailable.into())
            }
            Self::CustomerNotExists(_) => {
                Some(CommandError::UnknownCustomer.into())
            }
            Self::Db(e) => e.try_as_error(),
            Self::RentalExists(_) => None,
        }
    }
}

impl AsError for close_rental::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::CarMismatch { .. } => Some(CommandError::CarMismatch.into()),
            Self::CarNotExists(_) => None,
            Self::Db(e) => e.try_as_error(),
            Self::NotClosingStatus(_) => {
                Some(CommandError::NotClosingStatus.into())
            }
            Self::RentalNotExists(_) => {
                Some(CommandError::RentalNotFound.into())
            }
        }
    }
}

impl AsError for update_rental::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::ClosingStatus(_) => Some(CommandError::ClosingStatus.into()),
            Self::Db(e) => e.try_as_error(),
            Self::RentalNotExists(_) => {
                Some(CommandError::RentalNotFound.into())
            }
        }
    }
}

impl AsError for delete_rental::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::CarNotExists(_) => None,
            Self::Db(e) => e.try_as_error(),
            Self::RentalNotExists(_) => {
                Some(CommandError::RentalNotFound.into())
            }
        }
    }
}
