//! [`Database`]-related implementations.

#[cfg(any(test, feature = "memory"))]
pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

use derive_more::{Display, Error as StdError, From};
// Used by database backends only.
#[cfg(not(any(test, feature = "memory", feature = "postgres")))]
use tokio as _;

#[cfg(any(test, feature = "memory"))]
pub use self::memory::Memory;
#[cfg(feature = "postgres")]
pub use self::postgres::Postgres;

/// Database operation.
pub use common::Handler as Database;

/// [`Database`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    #[cfg(feature = "postgres")]
    /// [`Postgres`] error.
    Postgres(postgres::Error),

    #[cfg(any(test, feature = "memory"))]
    /// [`Memory`] error.
    Memory(memory::Error),
}

impl Error {
    /// Returns the integrity constraint this [`Error`] reports a violation
    /// of, if any.
    #[must_use]
    pub fn violation(&self) -> Option<Violation<'_>> {
        match self {
            #[cfg(feature = "postgres")]
            Self::Postgres(e) => e.violation(),
            #[cfg(any(test, feature = "memory"))]
            Self::Memory(e) => e.violation(),
            #[cfg(not(any(test, feature = "memory", feature = "postgres")))]
            _ => None,
        }
    }
}

/// Violation of a named integrity constraint.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Violation<'c> {
    /// Uniqueness constraint violation.
    #[display("unique constraint `{_0}` violated")]
    Unique(&'c str),

    /// Foreign key constraint violation.
    #[display("foreign key constraint `{_0}` violated")]
    ForeignKey(&'c str),
}
