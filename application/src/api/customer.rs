//! [`Customer`] REST API definitions.

use axum::{
    extract::{rejection::JsonRejection, Path},
    Extension, Json,
};
use common::Date;
use serde::{Deserialize, Serialize};
use service::{
    command::{
        create_customer, delete_customer, update_customer,
        CreateCustomer, DeleteCustomer, UpdateCustomer,
    },
    domain::{self, customer},
    query, Command as _, Query as _,
};

use crate::{define_error, AsError, Error, Service};

use super::{parse, parse_opt, present, Message};

/// Customer of the car rental.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// ID of this [`Customer`].
    pub id: customer::Id,

    /// Full name of this [`Customer`].
    pub full_name: String,

    /// Email address of this [`Customer`].
    pub email: String,

    /// Phone number of this [`Customer`], if any.
    pub phone: Option<String>,

    /// Driver's license ID of this [`Customer`].
    pub drivers_license_id: String,

    /// Date of birth of this [`Customer`], if any.
    pub date_of_birth: Option<Date>,
}

impl From<domain::Customer> for Customer {
    fn from(customer: domain::Customer) -> Self {
        let domain::Customer {
            id,
            full_name,
            email,
            phone,
            drivers_license_id,
            date_of_birth,
        } = customer;
        Self {
            id,
            full_name: full_name.into(),
            email: email.into(),
            phone: phone.map(Into::into),
            drivers_license_id: drivers_license_id.into(),
            date_of_birth,
        }
    }
}

/// Details of a [`Customer`] to be created or replaced with.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Input {
    /// Full name of the [`Customer`].
    pub full_name: Option<String>,

    /// Email address of the [`Customer`].
    pub email: Option<String>,

    /// Phone number of the [`Customer`].
    pub phone: Option<String>,

    /// Driver's license ID of the [`Customer`].
    pub drivers_license_id: Option<String>,

    /// Date of birth of the [`Customer`].
    pub date_of_birth: Option<String>,
}

/// Validated [`Input`].
struct Details {
    full_name: customer::FullName,
    email: customer::Email,
    phone: Option<customer::Phone>,
    drivers_license_id: customer::DriversLicenseId,
    date_of_birth: Option<Date>,
}

impl TryFrom<Input> for Details {
    type Error = Error;

    fn try_from(input: Input) -> Result<Self, Self::Error> {
        define_error! {
            enum InputError {
                #[code = "INVALID_INPUT"]
                #[status = BAD_REQUEST]
                #[message = "Missing required fields"]
                MissingFields,
            }
        }

        let Input {
            full_name,
            email,
            phone,
            drivers_license_id,
            date_of_birth,
        } = input;
        let (Some(full_name), Some(email), Some(drivers_license_id)) = (
            present(full_name),
            present(email),
            present(drivers_license_id),
        ) else {
            return Err(InputError::MissingFields.into());
        };

        Ok(Self {
            full_name: parse("fullName", &full_name)?,
            email: parse("email", &email)?,
            phone: parse_opt("phone", phone)?,
            drivers_license_id: parse(
                "driversLicenseId",
                &drivers_license_id,
            )?,
            date_of_birth: parse_opt("dateOfBirth", date_of_birth)?,
        })
    }
}

/// Lists all the registered [`Customer`]s.
///
/// # Errors
///
/// If the storage fails.
pub async fn list(
    Extension(service): Extension<Service>,
) -> Result<Json<Vec<Customer>>, Error> {
    let customers = service
        .execute(query::customers::All::by(()))
        .await
        .map_err(AsError::into_error)?;
    Ok(Json(customers.into_iter().map(Into::into).collect()))
}

/// Registers a new [`Customer`].
///
/// # Errors
///
/// If the input is invalid or clashes with an existing [`Customer`].
pub async fn create(
    Extension(service): Extension<Service>,
    input: Result<Json<Input>, JsonRejection>,
) -> Result<(http::StatusCode, Json<Customer>), Error> {
    let Json(input) = input.map_err(AsError::into_error)?;
    let Details {
        full_name,
        email,
        phone,
        drivers_license_id,
        date_of_birth,
    } = input.try_into()?;

    let customer = service
        .execute(CreateCustomer {
            full_name,
            email,
            phone,
            drivers_license_id,
            date_of_birth,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok((http::StatusCode::CREATED, Json(customer.into())))
}

/// Returns the [`Customer`] with the provided ID.
///
/// # Errors
///
/// If the [`Customer`] does not exist.
pub async fn by_id(
    Extension(service): Extension<Service>,
    Path(id): Path<customer::Id>,
) -> Result<Json<Customer>, Error> {
    define_error! {
        enum QueryError {
            #[code = "NOT_FOUND"]
            #[status = NOT_FOUND]
            #[message = "Customer not found"]
            CustomerNotFound,
        }
    }

    service
        .execute(query::customer::ById::by(id))
        .await
        .map_err(AsError::into_error)?
        .map(|c| Json(c.into()))
        .ok_or_else(|| QueryError::CustomerNotFound.into())
}

/// Replaces the details of the [`Customer`] with the provided ID.
///
/// # Errors
///
/// If the input is invalid, the [`Customer`] does not exist, or the new
/// details clash with another [`Customer`].
pub async fn update(
    Extension(service): Extension<Service>,
    Path(customer_id): Path<customer::Id>,
    input: Result<Json<Input>, JsonRejection>,
) -> Result<Json<Message>, Error> {
    let Json(input) = input.map_err(AsError::into_error)?;
    let Details {
        full_name,
        email,
        phone,
        drivers_license_id,
        date_of_birth,
    } = input.try_into()?;

    service
        .execute(UpdateCustomer {
            customer_id,
            full_name,
            email,
            phone,
            drivers_license_id,
            date_of_birth,
        })
        .await
        .map(drop)
        .map_err(AsError::into_error)?;

    Ok(Message::json("Customer updated successfully"))
}

/// Removes the [`Customer`] with the provided ID.
///
/// # Errors
///
/// If the [`Customer`] does not exist or still has rentals.
pub async fn delete(
    Extension(service): Extension<Service>,
    Path(customer_id): Path<customer::Id>,
) -> Result<Json<Message>, Error> {
    service
        .execute(DeleteCustomer { customer_id })
        .await
        .map_err(AsError::into_error)?;

    Ok(Message::json("Customer removed successfully"))
}

define_error! {
    enum CommandError {
        #[code = "NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "Customer not found"]
        CustomerNotFound,

        #[code = "CONSTRAINT_VIOLATION"]
        #[status = CONFLICT]
        #[message = "Error: Email already exists."]
        EmailOccupied,

        #[code = "CONSTRAINT_VIOLATION"]
        #[status = CONFLICT]
        #[message = "Error: Driver's License already exists."]
        DriversLicenseOccupied,

        #[code = "CONSTRAINT_VIOLATION"]
        #[status = CONFLICT]
        #[message = "Customer has rentals and cannot be removed"]
        CustomerHasRentals,
    }
}

impl AsError for create_customer::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::DriversLicenseOccupied(_) => {
                Some(CommandError::DriversLicenseOccupied.into())
            }
            Self::EmailOccupied(_) => Some(CommandError::EmailOccupied.into()),
        }
    }
}

impl AsError for update_customer::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::CustomerNotExists(_) => {
                Some(CommandError::CustomerNotFound.into())
            }
            Self::Db(e) => e.try_as_error(),
            Self::DriversLicenseOccupied(_) => {
                Some(CommandError::DriversLicenseOccupied.into())
            }
            Self::EmailOccupied(_) => Some(CommandError::EmailOccupied.into()),
        }
    }
}

impl AsError for delete_customer::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::CustomerHasRentals(_) => {
                Some(CommandError::CustomerHasRentals.into())
            }
            Self::CustomerNotExists(_) => {
                Some(CommandError::CustomerNotFound.into())
            }
            Self::Db(e) => e.try_as_error(),
        }
    }
}
