//! In-memory [`Database`] implementation.
//!
//! Emulates the relational constraints of the Postgres schema: primary and
//! unique keys, and foreign keys restricting deletion. Transactions are
//! serializable: a [`Tx`] holds the whole store exclusively until committed
//! or dropped.

mod impls;

use std::{future::Future, sync::Arc, time::Duration};

use derive_more::{Deref, Display, Error as StdError};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracerr::Traced;

use crate::{
    domain::{car, customer, rental, Car, Customer, Rental},
    infra::database::{self, Violation},
};
#[cfg(doc)]
use crate::infra::Database;

/// In-memory [`Database`].
#[derive(Clone, Debug, Deref)]
pub struct Memory<T = NonTx>(T);

impl Memory {
    /// Default duration to wait for a lock upon the store.
    pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

    /// Creates a new empty [`Memory`] database, failing operations that wait
    /// for a lock longer than the provided `lock_timeout`.
    #[must_use]
    pub fn new(lock_timeout: Duration) -> Self {
        Self(NonTx {
            tables: Arc::new(Mutex::new(Tables::default())),
            lock_timeout,
        })
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LOCK_TIMEOUT)
    }
}

/// Access to the [`Tables`] of a [`Memory`] database.
pub trait Access {
    /// Reads the [`Tables`] with the provided function.
    ///
    /// # Errors
    ///
    /// If failed to access the [`Tables`].
    fn read<R>(
        &self,
        f: impl FnOnce(&Tables) -> R,
    ) -> impl Future<Output = Result<R, Traced<database::Error>>>;

    /// Modifies the [`Tables`] with the provided function.
    ///
    /// # Errors
    ///
    /// If failed to access the [`Tables`], or the provided function fails.
    fn write<R>(
        &self,
        f: impl FnOnce(&mut Tables) -> Result<R, Error>,
    ) -> impl Future<Output = Result<R, Traced<database::Error>>>;
}

/// Non-transactional access to a [`Memory`] database.
///
/// Every operation is applied atomically on its own.
#[derive(Clone, Debug)]
pub struct NonTx {
    /// Committed [`Tables`].
    tables: Arc<Mutex<Tables>>,

    /// Duration to wait for a lock upon the [`Tables`].
    lock_timeout: Duration,
}

impl NonTx {
    /// Acquires exclusive ownership of the committed [`Tables`].
    async fn acquire(
        &self,
    ) -> Result<OwnedMutexGuard<Tables>, Traced<database::Error>> {
        tokio::time::timeout(
            self.lock_timeout,
            Arc::clone(&self.tables).lock_owned(),
        )
        .await
        .map_err(|_| tracerr::new!(database::Error::from(Error::LockTimeout)))
    }
}

impl Access for NonTx {
    async fn read<R>(
        &self,
        f: impl FnOnce(&Tables) -> R,
    ) -> Result<R, Traced<database::Error>> {
        let tables = self.acquire().await.map_err(tracerr::wrap!())?;
        Ok(f(&*tables))
    }

    async fn write<R>(
        &self,
        f: impl FnOnce(&mut Tables) -> Result<R, Error>,
    ) -> Result<R, Traced<database::Error>> {
        let mut tables = self.acquire().await.map_err(tracerr::wrap!())?;
        f(&mut *tables).map_err(tracerr::from_and_wrap!(=> database::Error))
    }
}

/// Transactional access to a [`Memory`] database.
///
/// Changes are applied to a staged copy of the [`Tables`] and become visible
/// on [`Tx::commit()`] only. Dropping the last clone of an uncommitted [`Tx`]
/// discards them.
#[derive(Clone, Debug)]
pub struct Tx {
    /// [`Staged`] changes, if this [`Tx`] is not finished yet.
    staged: Arc<Mutex<Option<Staged>>>,
}

/// Changes staged by a [`Tx`].
#[derive(Debug)]
struct Staged {
    /// Exclusively owned committed [`Tables`].
    committed: OwnedMutexGuard<Tables>,

    /// Working copy of the committed [`Tables`].
    tables: Tables,
}

impl Tx {
    /// Starts a new [`Tx`] upon the provided [`NonTx`] access, waiting until
    /// any other [`Tx`] is finished.
    ///
    /// # Errors
    ///
    /// If timed out waiting for the other [`Tx`] to finish.
    pub async fn begin(
        client: &NonTx,
    ) -> Result<Self, Traced<database::Error>> {
        let committed = client.acquire().await.map_err(tracerr::wrap!())?;
        let tables = Tables::clone(&committed);
        Ok(Self {
            staged: Arc::new(Mutex::new(Some(Staged { committed, tables }))),
        })
    }

    /// Commits this [`Tx`].
    ///
    /// # Errors
    ///
    /// If this [`Tx`] is finished already.
    pub async fn commit(&self) -> Result<(), Traced<database::Error>> {
        let Staged {
            mut committed,
            tables,
        } = self
            .staged
            .lock()
            .await
            .take()
            .ok_or(Error::TxFinished)
            .map_err(tracerr::from_and_wrap!(=> database::Error))?;
        *committed = tables;
        Ok(())
    }
}

impl Access for Tx {
    async fn read<R>(
        &self,
        f: impl FnOnce(&Tables) -> R,
    ) -> Result<R, Traced<database::Error>> {
        let staged = self.staged.lock().await;
        let staged = staged
            .as_ref()
            .ok_or(Error::TxFinished)
            .map_err(tracerr::from_and_wrap!(=> database::Error))?;
        Ok(f(&staged.tables))
    }

    async fn write<R>(
        &self,
        f: impl FnOnce(&mut Tables) -> Result<R, Error>,
    ) -> Result<R, Traced<database::Error>> {
        let mut staged = self.staged.lock().await;
        let staged = staged
            .as_mut()
            .ok_or(Error::TxFinished)
            .map_err(tracerr::from_and_wrap!(=> database::Error))?;
        f(&mut staged.tables)
            .map_err(tracerr::from_and_wrap!(=> database::Error))
    }
}

/// Records stored in a [`Memory`] database.
#[derive(Clone, Debug, Default)]
pub struct Tables {
    /// Stored [`Customer`]s.
    customers: Vec<Customer>,

    /// Stored [`Car`]s.
    cars: Vec<Car>,

    /// Stored [`Rental`]s.
    rentals: Vec<Rental>,
}

impl Tables {
    /// Returns the [`Customer`] with the provided ID, if any.
    fn customer(&self, id: &customer::Id) -> Option<&Customer> {
        self.customers.iter().find(|c| &c.id == id)
    }

    /// Returns the [`Car`] with the provided ID, if any.
    fn car(&self, id: &car::Id) -> Option<&Car> {
        self.cars.iter().find(|c| &c.id == id)
    }

    /// Returns the [`Rental`] with the provided ID, if any.
    fn rental(&self, id: &rental::Id) -> Option<&Rental> {
        self.rentals.iter().find(|r| &r.id == id)
    }

    /// Checks the unique keys of the provided [`Customer`] against all the
    /// other stored ones.
    fn check_customer(&self, customer: &Customer) -> Result<(), Error> {
        for other in self.customers.iter().filter(|c| c.id != customer.id) {
            if other.email == customer.email {
                return Err(Error::UniqueViolation(customer::EMAIL_CONSTRAINT));
            }
            if other.drivers_license_id == customer.drivers_license_id {
                return Err(Error::UniqueViolation(
                    customer::DRIVERS_LICENSE_CONSTRAINT,
                ));
            }
        }
        Ok(())
    }

    /// Inserts the provided [`Customer`].
    fn insert_customer(&mut self, customer: Customer) -> Result<(), Error> {
        if self.customer(&customer.id).is_some() {
            return Err(Error::UniqueViolation(customer::ID_CONSTRAINT));
        }
        self.check_customer(&customer)?;
        self.customers.push(customer);
        Ok(())
    }

    /// Replaces the stored [`Customer`] having the same ID.
    fn update_customer(&mut self, customer: Customer) -> Result<u64, Error> {
        let Some(idx) = self.customers.iter().position(|c| c.id == customer.id)
        else {
            return Ok(0);
        };
        self.check_customer(&customer)?;
        self.customers[idx] = customer;
        Ok(1)
    }

    /// Deletes the [`Customer`] with the provided ID, unless referenced by a
    /// [`Rental`].
    fn delete_customer(&mut self, id: &customer::Id) -> Result<u64, Error> {
        if self.customer(id).is_none() {
            return Ok(0);
        }
        if self.rentals.iter().any(|r| &r.customer_id == id) {
            return Err(Error::ForeignKeyViolation(
                rental::CUSTOMER_CONSTRAINT,
            ));
        }
        self.customers.retain(|c| &c.id != id);
        Ok(1)
    }

    /// Checks the unique keys of the provided [`Car`] against all the other
    /// stored ones.
    fn check_car(&self, car: &Car) -> Result<(), Error> {
        if self
            .cars
            .iter()
            .any(|c| c.id != car.id && c.license_plate == car.license_plate)
        {
            return Err(Error::UniqueViolation(car::LICENSE_PLATE_CONSTRAINT));
        }
        Ok(())
    }

    /// Inserts the provided [`Car`].
    fn insert_car(&mut self, car: Car) -> Result<(), Error> {
        if self.car(&car.id).is_some() {
            return Err(Error::UniqueViolation(car::ID_CONSTRAINT));
        }
        self.check_car(&car)?;
        self.cars.push(car);
        Ok(())
    }

    /// Replaces the stored [`Car`] having the same ID.
    fn update_car(&mut self, car: Car) -> Result<u64, Error> {
        let Some(idx) = self.cars.iter().position(|c| c.id == car.id) else {
            return Ok(0);
        };
        self.check_car(&car)?;
        self.cars[idx] = car;
        Ok(1)
    }

    /// Applies the provided [`car::StatusChange`], if the [`Car`] has the
    /// expected [`car::Status`].
    fn change_car_status(&mut self, change: car::StatusChange) -> u64 {
        let car::StatusChange { car_id, from, to } = change;
        self.cars
            .iter_mut()
            .find(|c| {
                c.id == car_id && from.as_ref().is_none_or(|s| &c.status == s)
            })
            .map_or(0, |c| {
                c.status = to;
                1
            })
    }

    /// Deletes the [`Car`] with the provided ID, unless referenced by a
    /// [`Rental`].
    fn delete_car(&mut self, id: &car::Id) -> Result<u64, Error> {
        if self.car(id).is_none() {
            return Ok(0);
        }
        if self.rentals.iter().any(|r| &r.car_id == id) {
            return Err(Error::ForeignKeyViolation(rental::CAR_CONSTRAINT));
        }
        self.cars.retain(|c| &c.id != id);
        Ok(1)
    }

    /// Inserts the provided [`Rental`].
    fn insert_rental(&mut self, rental: Rental) -> Result<(), Error> {
        if self.rental(&rental.id).is_some() {
            return Err(Error::UniqueViolation(rental::ID_CONSTRAINT));
        }
        if self.customer(&rental.customer_id).is_none() {
            return Err(Error::ForeignKeyViolation(
                rental::CUSTOMER_CONSTRAINT,
            ));
        }
        if self.car(&rental.car_id).is_none() {
            return Err(Error::ForeignKeyViolation(rental::CAR_CONSTRAINT));
        }
        self.rentals.push(rental);
        Ok(())
    }

    /// Applies the provided [`rental::Revision`].
    fn revise_rental(&mut self, revision: rental::Revision) -> u64 {
        let rental::Revision {
            rental_id,
            status,
            end_date,
        } = revision;
        self.rentals
            .iter_mut()
            .find(|r| r.id == rental_id)
            .map_or(0, |r| {
                r.status = status;
                r.end_date = end_date;
                1
            })
    }

    /// Deletes the [`Rental`] with the provided ID.
    fn delete_rental(&mut self, id: &rental::Id) -> u64 {
        let before = self.rentals.len();
        self.rentals.retain(|r| &r.id != id);
        u64::from(before != self.rentals.len())
    }
}

/// [`Memory`] database error.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// Uniqueness constraint is violated.
    #[display("Unique constraint `{_0}` violated")]
    UniqueViolation(#[error(not(source))] &'static str),

    /// Foreign key constraint is violated.
    #[display("Foreign key constraint `{_0}` violated")]
    ForeignKeyViolation(#[error(not(source))] &'static str),

    /// Timed out waiting for a lock.
    #[display("Timed out waiting for a lock")]
    LockTimeout,

    /// Operation was issued upon an already finished [`Tx`].
    #[display("Transaction is already finished")]
    TxFinished,
}

impl Error {
    /// Returns the integrity constraint this [`Error`] reports a violation
    /// of, if any.
    #[must_use]
    pub fn violation(&self) -> Option<Violation<'_>> {
        match self {
            Self::UniqueViolation(c) => Some(Violation::Unique(c)),
            Self::ForeignKeyViolation(c) => Some(Violation::ForeignKey(c)),
            Self::LockTimeout | Self::TxFinished => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use common::operations::{By, Commit, Insert, Select, Transact};

    use crate::{
        domain::{car, Car},
        infra::{database, Database},
    };

    use super::{Error, Memory};

    fn car(plate: &str) -> Car {
        Car {
            id: car::Id::new(),
            make: car::Make::new("Toyota").unwrap(),
            model: car::Model::new("Corolla").unwrap(),
            year: car::Year::new(2020),
            license_plate: car::LicensePlate::new(plate).unwrap(),
            status: car::Status::available(),
        }
    }

    async fn all_cars(db: &Memory) -> Vec<Car> {
        db.execute(Select(By::<Vec<Car>, _>::new(()))).await.unwrap()
    }

    #[tokio::test]
    async fn uncommitted_tx_is_rolled_back_on_drop() {
        let db = Memory::default();

        let tx = db.execute(Transact).await.unwrap();
        tx.execute(Insert(car("AB-123"))).await.unwrap();
        drop(tx);

        assert!(all_cars(&db).await.is_empty());
    }

    #[tokio::test]
    async fn committed_tx_is_visible() {
        let db = Memory::default();
        let car = car("AB-123");

        let tx = db.execute(Transact).await.unwrap();
        tx.execute(Insert(car.clone())).await.unwrap();
        tx.execute(Commit).await.unwrap();

        assert_eq!(all_cars(&db).await, [car]);
    }

    #[tokio::test]
    async fn tx_cannot_be_committed_twice() {
        let db = Memory::default();

        let tx = db.execute(Transact).await.unwrap();
        tx.execute(Commit).await.unwrap();
        let err = tx.execute(Commit).await.unwrap_err();

        assert!(matches!(
            err.as_ref(),
            database::Error::Memory(Error::TxFinished),
        ));
    }

    #[tokio::test]
    async fn waiting_for_tx_times_out() {
        let db = Memory::new(Duration::from_millis(10));

        let tx = db.execute(Transact).await.unwrap();
        let err = db
            .execute(Select(By::<Vec<Car>, _>::new(())))
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            database::Error::Memory(Error::LockTimeout),
        ));

        drop(tx);
        assert!(all_cars(&db).await.is_empty());
    }

    #[tokio::test]
    async fn failed_insert_changes_nothing() {
        let db = Memory::default();
        let first = car("AB-123");
        db.execute(Insert(first.clone())).await.unwrap();

        let err = db.execute(Insert(car("AB-123"))).await.unwrap_err();

        assert!(matches!(
            err.as_ref().violation(),
            Some(database::Violation::Unique(car::LICENSE_PLATE_CONSTRAINT)),
        ));
        assert_eq!(all_cars(&db).await, [first]);
    }
}
