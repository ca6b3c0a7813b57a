//! [`Command`] for deleting a [`Customer`].

use common::operations::{By, Delete};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::Rental;
use crate::{
    domain::{customer, rental, Customer},
    infra::{database, database::Violation, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Customer`].
///
/// A [`Customer`] referenced by any [`Rental`] cannot be deleted.
#[derive(Clone, Debug)]
pub struct DeleteCustomer {
    /// ID of the [`Customer`] to delete.
    pub customer_id: customer::Id,
}

impl<Db> Command<DeleteCustomer> for Service<Db>
where
    Db: Database<
        Delete<By<Customer, customer::Id>>,
        Ok = u64,
        Err = Traced<database::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteCustomer,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteCustomer { customer_id } = cmd;

        let deleted = self
            .database()
            .execute(Delete(By::new(customer_id.clone())))
            .await
            .map_err(|e| {
                super::map_violation(e, |v| match v {
                    Violation::ForeignKey(rental::CUSTOMER_CONSTRAINT) => {
                        Some(E::CustomerHasRentals(customer_id.clone()))
                    }
                    Violation::Unique(_) | Violation::ForeignKey(_) => None,
                })
            })?;
        if deleted == 0 {
            return Err(tracerr::new!(E::CustomerNotExists(customer_id)));
        }

        log::info!(%customer_id, "`Customer` deleted");

        Ok(())
    }
}

/// Error of [`DeleteCustomer`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Customer`] is referenced by [`Rental`]s.
    #[display("`Customer(id: {_0})` has rentals")]
    #[from(ignore)]
    CustomerHasRentals(#[error(not(source))] customer::Id),

    /// [`Customer`] with the provided ID does not exist.
    #[display("`Customer(id: {_0})` does not exist")]
    #[from(ignore)]
    CustomerNotExists(#[error(not(source))] customer::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),
}
