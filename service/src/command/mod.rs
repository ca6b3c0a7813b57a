//! [`Command`] definition.

pub mod close_rental;
pub mod create_car;
pub mod create_customer;
pub mod create_rental;
pub mod delete_car;
pub mod delete_customer;
pub mod delete_rental;
pub mod update_car;
pub mod update_customer;
pub mod update_rental;

#[cfg(test)]
mod tests;

use tracerr::Traced;

use crate::infra::database::{self, Violation};

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    close_rental::CloseRental, create_car::CreateCar,
    create_customer::CreateCustomer, create_rental::CreateRental,
    delete_car::DeleteCar, delete_customer::DeleteCustomer,
    delete_rental::DeleteRental, update_car::UpdateCar,
    update_customer::UpdateCustomer, update_rental::UpdateRental,
};

/// Converts the provided [`database::Error`] into the error `violated`
/// returns for the [`Violation`] it reports, or wraps it as is otherwise.
fn map_violation<E>(
    err: Traced<database::Error>,
    violated: impl FnOnce(Violation<'_>) -> Option<E>,
) -> Traced<E>
where
    E: From<database::Error>,
{
    let mapped = err.as_ref().violation().and_then(violated);
    match mapped {
        Some(e) => tracerr::new!(e),
        None => tracerr::map_from(err),
    }
}
