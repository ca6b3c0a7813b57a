//! Postgres [`Database`] implementation.

pub mod client;
pub mod connection;
mod impls;

use deadpool_postgres::Runtime;
use derive_more::{Deref, Display, Error as StdError, From};
use tokio_postgres::{error::SqlState, NoTls};
use tracerr::Traced;

use crate::infra::database::{self, Violation};
#[cfg(doc)]
use crate::infra::Database;

pub use refinery::embed_migrations;

pub use self::{
    client::{NonTx, Tx},
    connection::Connection,
};

pub use deadpool_postgres::Config;

/// Postgres [`Database`] client.
#[derive(Clone, Debug, Deref)]
pub struct Postgres<T = NonTx>(T);

impl Postgres {
    /// Creates a new [`Postgres`] client with the provided [`Config`].
    ///
    /// No connection is established until the first statement is executed.
    ///
    /// # Errors
    ///
    /// If failed to create a new [`Postgres`] client.
    pub fn new(conf: &Config) -> Result<Self, Traced<database::Error>> {
        let pool = conf
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        Ok(Self(NonTx::from_pool(pool)))
    }
}

/// Postgres database [`Error`].
#[derive(Debug, Display, StdError, From)]
pub enum Error {
    /// [`Connection`] error.
    #[display("`Connection` error: {_0}")]
    Connection(connection::Error),

    /// Error of creating a new [`connection::Pool`] client.
    #[display("Failed to create a new `connection::Pool`: {_0}")]
    PoolCreationError(connection::PoolCreationError),

    /// [`connection::Pool`] error.
    #[display("`connection::Pool` error: {_0}")]
    PoolError(connection::PoolError),

    /// Statement was issued upon an already finished [`Tx`].
    #[display("Transaction is already finished")]
    #[from(ignore)]
    TxFinished,
}

impl Error {
    /// Returns the integrity constraint this [`Error`] reports a violation
    /// of, if any.
    #[must_use]
    pub fn violation(&self) -> Option<Violation<'_>> {
        match self {
            Self::Connection(e) => {
                let constraint = e.as_db_error()?.constraint()?;
                match e.code()? {
                    c if *c == SqlState::UNIQUE_VIOLATION => {
                        Some(Violation::Unique(constraint))
                    }
                    c if *c == SqlState::FOREIGN_KEY_VIOLATION => {
                        Some(Violation::ForeignKey(constraint))
                    }
                    _ => None,
                }
            }
            Self::PoolError(..)
            | Self::PoolCreationError(..)
            | Self::TxFinished => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, Postgres};

    #[tokio::test]
    async fn pool_connects_lazily() {
        let conf = Config {
            host: Some("127.0.0.1".to_owned()),
            dbname: Some("rental".to_owned()),
            ..Config::default()
        };

        assert!(Postgres::new(&conf).is_ok());
    }
}
