//! [`Command`] for replacing the details of an existing [`Customer`].

use common::{operations::Update, Date};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{customer, Customer},
    infra::{database, database::Violation, Database},
    Service,
};

use super::Command;

/// [`Command`] for replacing the details of an existing [`Customer`].
///
/// Every detail is overwritten, so an omitted optional one is cleared.
#[derive(Clone, Debug)]
pub struct UpdateCustomer {
    /// ID of the [`Customer`] to update.
    pub customer_id: customer::Id,

    /// New [`customer::FullName`] of the [`Customer`].
    pub full_name: customer::FullName,

    /// New [`customer::Email`] of the [`Customer`].
    pub email: customer::Email,

    /// New [`customer::Phone`] of the [`Customer`].
    pub phone: Option<customer::Phone>,

    /// New [`customer::DriversLicenseId`] of the [`Customer`].
    pub drivers_license_id: customer::DriversLicenseId,

    /// New [`Date`] of birth of the [`Customer`].
    pub date_of_birth: Option<Date>,
}

impl<Db> Command<UpdateCustomer> for Service<Db>
where
    Db: Database<Update<Customer>, Ok = u64, Err = Traced<database::Error>>,
{
    type Ok = Customer;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateCustomer,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateCustomer {
            customer_id,
            full_name,
            email,
            phone,
            drivers_license_id,
            date_of_birth,
        } = cmd;

        let customer = Customer {
            id: customer_id,
            full_name,
            email,
            phone,
            drivers_license_id,
            date_of_birth,
        };

        let updated = self
            .database()
            .execute(Update(customer.clone()))
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
        if updated == 0 {
            return Err(tracerr::new!(E::CustomerNotExists(customer.id)));
        }

        log::info!(customer_id = %customer.id, "`Customer` updated");

        Ok(customer)
    }
}

/// Error of [`UpdateCustomer`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Customer`] with the provided ID does not exist.
    #[display("`Customer(id: {_0})` does not exist")]
    #[from(ignore)]
    CustomerNotExists(#[error(not(source))] customer::Id),

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
