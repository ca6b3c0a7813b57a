//! [`Command`] for creating a new [`Customer`].

use common::{operations::Insert, Date};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{customer, Customer},
    infra::{database, database::Violation, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Customer`].
#[derive(Clone, Debug)]
pub struct CreateCustomer {
    /// [`customer::FullName`] of a new [`Customer`].
    pub full_name: customer::FullName,

    /// [`customer::Email`] of a new [`Customer`].
    pub email: customer::Email,

    /// [`customer::Phone`] of a new [`Customer`], if any.
    pub phone: Option<customer::Phone>,

    /// [`customer::DriversLicenseId`] of a new [`Customer`].
    pub drivers_license_id: customer::DriversLicenseId,

    /// [`Date`] of birth of a new [`Customer`], if known.
    pub date_of_birth: Option<Date>,
}

impl<Db> Command<CreateCustomer> for Service<Db>
where
    Db: Database<Insert<Customer>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Customer;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateCustomer,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateCustomer {
            full_name,
            email,
            phone,
            drivers_license_id,
            date_of_birth,
        } = cmd;

        let customer = Customer {
            id: customer::Id::new(),
            full_name,
            email,
            phone,
            drivers_license_id,
            date_of_birth,
        };

        self.database()
            .execute(Insert(customer.clone()))
            .await
            .map_err(|e| {
                super::map_violation(e, |v| match v {
                    Violation::Unique(customer::EMAIL_CONSTRAINT) => {
                        Some(E::EmailOccupied(customer.email.clone()))
                    }
                    Violation::Unique(customer::DRIVERS_LICENSE_CONSTRAINT) => {
                        Some(E::DriversLicenseOccupied(
                            customer.drivers_license_id.clone(),
                        ))
                    }
                    Violation::Unique(_) | Violation::ForeignKey(_) => None,
                })
            })?;

        log::info!(customer_id = %customer.id, "`Customer` created");

        Ok(customer)
    }
}

/// Error of [`CreateCustomer`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`customer::DriversLicenseId`] is registered by another [`Customer`].
    #[display("`{_0}` driver's license is already registered")]
    #[from(ignore)]
    DriversLicenseOccupied(#[error(not(source))] customer::DriversLicenseId),

    /// [`customer::Email`] is registered by another [`Customer`].
    #[display("`{_0}` email is already registered")]
    #[from(ignore)]
    EmailOccupied(#[error(not(source))] customer::Email),
}
