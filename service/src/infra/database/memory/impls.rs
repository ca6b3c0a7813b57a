//! [`Database`] implementations.

use common::operations::{
    By, Commit, Delete, Insert, Lock, Select, Transact, Update,
};
use tracerr::Traced;

use crate::{
    domain::{car, customer, rental, Car, Customer, Rental},
    infra::{database, Database},
    read,
};

use super::{Access, Memory, NonTx, Tables, Tx};

impl Database<Transact> for Memory<NonTx> {
    type Ok = Memory<Tx>;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Tx::begin(&self.0)
            .await
            .map(Memory)
            .map_err(tracerr::wrap!())
    }
}

impl Database<Transact> for Memory<Tx> {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl Database<Commit> for Memory<Tx> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        self.commit().await.map_err(tracerr::wrap!())
    }
}

impl<C: Access> Database<Select<By<Option<Customer>, customer::Id>>>
    for Memory<C>
{
    type Ok = Option<Customer>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Customer>, customer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|t| t.customer(&id).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C: Access> Database<Select<By<Vec<Customer>, ()>>> for Memory<C> {
    type Ok = Vec<Customer>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Customer>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.read(|t| {
            let mut all = t.customers.clone();
            all.sort_by(|a, b| {
                (&a.full_name, &a.id).cmp(&(&b.full_name, &b.id))
            });
            all
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C: Access> Database<Insert<Customer>> for Memory<C> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(customer): Insert<Customer>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|t| t.insert_customer(customer))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C: Access> Database<Update<Customer>> for Memory<C> {
    type Ok = u64;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(customer): Update<Customer>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|t| t.update_customer(customer))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C: Access> Database<Delete<By<Customer, customer::Id>>> for Memory<C> {
    type Ok = u64;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Customer, customer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.write(|t| t.delete_customer(&id))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C: Access> Database<Select<By<Option<Car>, car::Id>>> for Memory<C> {
    type Ok = Option<Car>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Car>, car::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|t| t.car(&id).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C: Access> Database<Select<By<Vec<Car>, ()>>> for Memory<C> {
    type Ok = Vec<Car>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Car>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.read(|t| {
            let mut all = t.cars.clone();
            all.sort_by(|a, b| {
                (&a.make, &a.model, &a.id).cmp(&(&b.make, &b.model, &b.id))
            });
            all
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C: Access> Database<Insert<Car>> for Memory<C> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(car): Insert<Car>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|t| t.insert_car(car))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C: Access> Database<Update<Car>> for Memory<C> {
    type Ok = u64;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(car): Update<Car>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|t| t.update_car(car))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C: Access> Database<Update<car::StatusChange>> for Memory<C> {
    type Ok = u64;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(change): Update<car::StatusChange>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|t| Ok(t.change_car_status(change)))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C: Access> Database<Lock<By<Car, car::Id>>> for Memory<C> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Lock<By<Car, car::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // `Tx` holds the whole store already.
        Ok(())
    }
}

impl<C: Access> Database<Delete<By<Car, car::Id>>> for Memory<C> {
    type Ok = u64;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Car, car::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.write(|t| t.delete_car(&id))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C: Access> Database<Select<By<Option<Rental>, rental::Id>>>
    for Memory<C>
{
    type Ok = Option<Rental>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Rental>, rental::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|t| t.rental(&id).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C: Access> Database<Lock<By<Rental, rental::Id>>> for Memory<C> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Lock<By<Rental, rental::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // `Tx` holds the whole store already.
        Ok(())
    }
}

impl<C: Access> Database<Insert<Rental>> for Memory<C> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(rental): Insert<Rental>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|t| t.insert_rental(rental))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C: Access> Database<Update<rental::Revision>> for Memory<C> {
    type Ok = u64;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(revision): Update<rental::Revision>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|t| Ok(t.revise_rental(revision)))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C: Access> Database<Delete<By<Rental, rental::Id>>> for Memory<C> {
    type Ok = u64;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Rental, rental::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.write(|t| Ok(t.delete_rental(&id)))
            .await
            .map_err(tracerr::wrap!())
    }
}

/// Joins the provided [`Rental`] with its [`Customer`] and [`Car`].
fn listed(t: &Tables, rental: &Rental) -> Option<read::rental::Listed> {
    let customer = t.customer(&rental.customer_id)?;
    let car = t.car(&rental.car_id)?;
    Some(read::rental::Listed {
        rental: rental.clone(),
        customer_name: customer.full_name.clone(),
        make: car.make.clone(),
        model: car.model.clone(),
        license_plate: car.license_plate.clone(),
    })
}

impl<C: Access> Database<Select<By<Vec<read::rental::Listed>, ()>>>
    for Memory<C>
{
    type Ok = Vec<read::rental::Listed>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<read::rental::Listed>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.read(|t| {
            let mut all = t
                .rentals
                .iter()
                .filter_map(|r| listed(t, r))
                .collect::<Vec<_>>();
            all.sort_by(|a, b| {
                b.rental
                    .start_date
                    .as_str()
                    .cmp(a.rental.start_date.as_str())
                    .then_with(|| a.rental.id.cmp(&b.rental.id))
            });
            all
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C: Access> Database<Select<By<Option<read::rental::Detail>, rental::Id>>>
    for Memory<C>
{
    type Ok = Option<read::rental::Detail>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<read::rental::Detail>, rental::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|t| {
            let rental = t.rental(&id)?;
            let customer_email = t.customer(&rental.customer_id)?.email.clone();
            Some(read::rental::Detail {
                listed: listed(t, rental)?,
                customer_email,
            })
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C: Access> Database<Select<By<read::dashboard::Stats, ()>>>
    for Memory<C>
{
    type Ok = read::dashboard::Stats;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<read::dashboard::Stats, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.read(|t| read::dashboard::Stats {
            total_customers: t.customers.len() as u64,
            available_cars: t
                .cars
                .iter()
                .filter(|c| c.status.is_available())
                .count() as u64,
            active_rentals: t.rentals.iter().filter(|r| r.is_active()).count()
                as u64,
        })
        .await
        .map_err(tracerr::wrap!())
    }
}
