//! [`Command`] for revising an ongoing [`Rental`].

use common::{operations::Update, Date};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::{Car, Rental};
use crate::{
    domain::rental,
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for revising the [`rental::Status`] and end [`Date`] of a
/// [`Rental`] without touching its [`Car`].
///
/// [`rental::Status`]es releasing the [`Car`] are rejected, as closing a
/// [`Rental`] is done by the [`CloseRental`] [`Command`].
///
/// [`CloseRental`]: super::CloseRental
#[derive(Clone, Debug)]
pub struct UpdateRental {
    /// ID of the [`Rental`] to revise.
    pub rental_id: rental::Id,

    /// New [`rental::Status`] of the [`Rental`].
    pub status: rental::Status,

    /// New end [`Date`] of the [`Rental`].
    pub end_date: Date,
}

impl<Db> Command<UpdateRental> for Service<Db>
where
    Db: Database<
        Update<rental::Revision>,
        Ok = u64,
        Err = Traced<database::Error>,
    >,
{
    type Ok = rental::Revision;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateRental) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateRental {
            rental_id,
            status,
            end_date,
        } = cmd;

        if status.releases_car() {
            return Err(tracerr::new!(E::ClosingStatus(status)));
        }

        let revision = rental::Revision {
            rental_id,
            status,
            end_date,
        };
        let revised = self
            .database()
            .execute(Update(revision.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if revised == 0 {
            return Err(tracerr::new!(E::RentalNotExists(revision.rental_id)));
        }

        log::info!(
            rental_id = %revision.rental_id,
            status = %revision.status,
            "`Rental` revised",
        );

        Ok(revision)
    }
}

/// Error of [`UpdateRental`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`rental::Status`] closes a [`Rental`].
    #[display("`{_0}` status closes a `Rental`")]
    #[from(ignore)]
    ClosingStatus(#[error(not(source))] rental::Status),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Rental`] with the provided ID does not exist.
    #[display("`Rental(id: {_0})` does not exist")]
    #[from(ignore)]
    RentalNotExists(#[error(not(source))] rental::Id),
}
