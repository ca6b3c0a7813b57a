use common::Date;

use crate::{
    domain::{car, customer, rental, Car, Customer, Rental},
    infra::Memory,
    query, read, Command as _, Service,
};

use super::{
    close_rental, create_car, create_customer, create_rental, delete_car,
    delete_customer, delete_rental, update_car, update_customer,
    update_rental, CloseRental, CreateCar, CreateCustomer, CreateRental,
    DeleteCar, DeleteCustomer, DeleteRental, UpdateCar, UpdateCustomer,
    UpdateRental,
};

fn service() -> Service<Memory> {
    Service::new(Memory::default())
}

fn date(s: &str) -> Date {
    s.parse().unwrap()
}

fn new_customer(email: &str, license: &str) -> CreateCustomer {
    CreateCustomer {
        full_name: customer::FullName::new("Jane Doe").unwrap(),
        email: customer::Email::new(email).unwrap(),
        phone: customer::Phone::new("+1 555 0100"),
        drivers_license_id: customer::DriversLicenseId::new(license).unwrap(),
        date_of_birth: Some(date("1990-04-12")),
    }
}

fn new_car(plate: &str) -> CreateCar {
    CreateCar {
        make: car::Make::new("Toyota").unwrap(),
        model: car::Model::new("Corolla").unwrap(),
        year: car::Year::new(2020),
        license_plate: car::LicensePlate::new(plate).unwrap(),
    }
}

async fn register(
    svc: &Service<Memory>,
    email: &str,
    license: &str,
) -> Customer {
    svc.execute(new_customer(email, license)).await.unwrap()
}

async fn add_car(svc: &Service<Memory>, plate: &str) -> Car {
    svc.execute(new_car(plate)).await.unwrap()
}

fn booking(customer: &Customer, car: &Car) -> CreateRental {
    CreateRental {
        customer_id: customer.id.clone(),
        car_id: car.id.clone(),
        start_date: date("2024-01-01"),
        end_date: date("2024-01-07"),
    }
}

async fn car_by_id(svc: &Service<Memory>, id: &car::Id) -> Option<Car> {
    svc.execute(query::car::ById::by(id.clone())).await.unwrap()
}

async fn car_status(svc: &Service<Memory>, id: &car::Id) -> car::Status {
    car_by_id(svc, id).await.unwrap().status
}

async fn rentals(svc: &Service<Memory>) -> Vec<read::rental::Listed> {
    svc.execute(query::rentals::All::by(())).await.unwrap()
}

async fn rental_by_id(
    svc: &Service<Memory>,
    id: &rental::Id,
) -> Option<read::rental::Detail> {
    svc.execute(query::rental::ById::by(id.clone())).await.unwrap()
}

/// Registers a customer and a car, and books the car for the customer.
async fn booked(svc: &Service<Memory>) -> (Customer, Car, Rental) {
    let customer = register(svc, "jane@example.com", "DL-1").await;
    let car = add_car(svc, "AB-123").await;
    let rental = svc.execute(booking(&customer, &car)).await.unwrap();
    (customer, car, rental)
}

#[tokio::test]
async fn created_records_are_fetched_unchanged() {
    let svc = service();

    let customer = register(&svc, "jane@example.com", "DL-1").await;
    let car = add_car(&svc, "AB-123").await;

    assert!(customer.id.as_ref().starts_with("cust_"));
    assert!(car.id.as_ref().starts_with("car_"));
    assert_eq!(
        svc.execute(query::customer::ById::by(customer.id.clone()))
            .await
            .unwrap(),
        Some(customer.clone()),
    );
    assert_eq!(car_by_id(&svc, &car.id).await, Some(car.clone()));
    assert_eq!(car.status, car::Status::available());
    assert_eq!(
        svc.execute(query::customers::All::by(())).await.unwrap(),
        [customer],
    );
    assert_eq!(svc.execute(query::cars::All::by(())).await.unwrap(), [car]);
}

#[tokio::test]
async fn booking_rents_available_car() {
    let svc = service();

    let (customer, car, rental) = booked(&svc).await;

    assert!(rental.id.as_ref().starts_with("rent_"));
    assert_eq!(rental.status, rental::Status::Active);
    assert_eq!(rental.customer_id, customer.id);
    assert_eq!(rental.car_id, car.id);
    assert_eq!(rental.start_date.as_str(), "2024-01-01");
    assert_eq!(rental.end_date.as_str(), "2024-01-07");
    assert_eq!(car_status(&svc, &car.id).await, car::Status::rented());

    let detail = rental_by_id(&svc, &rental.id).await.unwrap();
    assert_eq!(detail.listed.rental, rental);
    assert_eq!(detail.listed.customer_name, customer.full_name);
    assert_eq!(detail.listed.license_plate, car.license_plate);
    assert_eq!(detail.customer_email, customer.email);
}

#[tokio::test]
async fn booking_rented_car_fails() {
    let svc = service();
    let (_, car, rental) = booked(&svc).await;
    let other = register(&svc, "john@example.com", "DL-2").await;

    let err = svc.execute(booking(&other, &car)).await.unwrap_err();

    assert!(matches!(
        err.as_ref(),
        create_rental::ExecutionError::CarUnavailable(id) if *id == car.id,
    ));
    let all = rentals(&svc).await;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].rental, rental);
    assert_eq!(car_status(&svc, &car.id).await, car::Status::rented());
}

#[tokio::test]
async fn booking_missing_car_fails() {
    let svc = service();
    let customer = register(&svc, "jane@example.com", "DL-1").await;

    let err = svc
        .execute(CreateRental {
            customer_id: customer.id,
            car_id: car::Id::from("car_missing"),
            start_date: date("2024-01-01"),
            end_date: date("2024-01-07"),
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err.as_ref(),
        create_rental::ExecutionError::CarUnavailable(_),
    ));
    assert!(rentals(&svc).await.is_empty());
}

#[tokio::test]
async fn booking_car_in_maintenance_fails() {
    let svc = service();
    let customer = register(&svc, "jane@example.com", "DL-1").await;
    let car = add_car(&svc, "AB-123").await;
    let maintenance = car::Status::new("maintenance").unwrap();
    _ = svc
        .execute(UpdateCar {
            car_id: car.id.clone(),
            make: car.make.clone(),
            model: car.model.clone(),
            year: car.year,
            license_plate: car.license_plate.clone(),
            status: Some(maintenance.clone()),
        })
        .await
        .unwrap();

    let err = svc.execute(booking(&customer, &car)).await.unwrap_err();

    assert!(matches!(
        err.as_ref(),
        create_rental::ExecutionError::CarUnavailable(_),
    ));
    assert_eq!(car_status(&svc, &car.id).await, maintenance);
}

#[tokio::test]
async fn booking_by_unknown_customer_leaves_car_available() {
    let svc = service();
    let car = add_car(&svc, "AB-123").await;

    let err = svc
        .execute(CreateRental {
            customer_id: customer::Id::from("cust_missing"),
            car_id: car.id.clone(),
            start_date: date("2024-01-01"),
            end_date: date("2024-01-07"),
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err.as_ref(),
        create_rental::ExecutionError::CustomerNotExists(_),
    ));
    assert_eq!(car_status(&svc, &car.id).await, car::Status::available());
}

#[tokio::test]
async fn concurrent_bookings_of_same_car_admit_one() {
    let svc = service();
    let first = register(&svc, "jane@example.com", "DL-1").await;
    let second = register(&svc, "john@example.com", "DL-2").await;
    let car = add_car(&svc, "AB-123").await;

    let (a, b) = tokio::join!(
        svc.execute(booking(&first, &car)),
        svc.execute(booking(&second, &car)),
    );

    assert_eq!(u8::from(a.is_ok()) + u8::from(b.is_ok()), 1);
    let err = a.err().or(b.err()).unwrap();
    assert!(matches!(
        err.as_ref(),
        create_rental::ExecutionError::CarUnavailable(_),
    ));
    assert_eq!(rentals(&svc).await.len(), 1);
    assert_eq!(car_status(&svc, &car.id).await, car::Status::rented());
}

#[tokio::test]
async fn closing_rental_frees_car() {
    let svc = service();
    let (_, car, rental) = booked(&svc).await;

    let closed = svc
        .execute(CloseRental {
            rental_id: rental.id.clone(),
            status: rental::Status::Completed,
            end_date: date("2024-01-05"),
            car_id: Some(car.id.clone()),
        })
        .await
        .unwrap();

    assert_eq!(closed.status, rental::Status::Completed);
    assert_eq!(closed.end_date.as_str(), "2024-01-05");
    assert_eq!(car_status(&svc, &car.id).await, car::Status::available());
    let detail = rental_by_id(&svc, &rental.id).await.unwrap();
    assert_eq!(detail.listed.rental, closed);
}

#[tokio::test]
async fn cancelling_rental_frees_car() {
    let svc = service();
    let (_, car, rental) = booked(&svc).await;

    _ = svc
        .execute(CloseRental {
            rental_id: rental.id.clone(),
            status: rental::Status::Cancelled,
            end_date: date("2024-01-02T10:00:00+02:00"),
            car_id: None,
        })
        .await
        .unwrap();

    assert_eq!(car_status(&svc, &car.id).await, car::Status::available());
    let detail = rental_by_id(&svc, &rental.id).await.unwrap();
    assert_eq!(detail.listed.rental.status, rental::Status::Cancelled);
    assert_eq!(
        detail.listed.rental.end_date.as_str(),
        "2024-01-02T10:00:00+02:00",
    );
}

#[tokio::test]
async fn closing_with_mismatched_car_changes_nothing() {
    let svc = service();
    let (_, car, rental) = booked(&svc).await;
    let other = add_car(&svc, "CD-456").await;

    let err = svc
        .execute(CloseRental {
            rental_id: rental.id.clone(),
            status: rental::Status::Completed,
            end_date: date("2024-01-05"),
            car_id: Some(other.id.clone()),
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err.as_ref(),
        close_rental::ExecutionError::CarMismatch { .. },
    ));
    assert_eq!(car_status(&svc, &car.id).await, car::Status::rented());
    assert_eq!(car_status(&svc, &other.id).await, car::Status::available());
    let detail = rental_by_id(&svc, &rental.id).await.unwrap();
    assert_eq!(detail.listed.rental, rental);
}

#[tokio::test]
async fn closing_requires_closing_status() {
    let svc = service();
    let (_, car, rental) = booked(&svc).await;

    let err = svc
        .execute(CloseRental {
            rental_id: rental.id,
            status: rental::Status::Active,
            end_date: date("2024-01-05"),
            car_id: Some(car.id),
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err.as_ref(),
        close_rental::ExecutionError::NotClosingStatus(rental::Status::Active),
    ));
}

#[tokio::test]
async fn closing_missing_rental_fails() {
    let svc = service();

    let err = svc
        .execute(CloseRental {
            rental_id: rental::Id::from("rent_missing"),
            status: rental::Status::Completed,
            end_date: date("2024-01-05"),
            car_id: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err.as_ref(),
        close_rental::ExecutionError::RentalNotExists(_),
    ));
}

#[tokio::test]
async fn revising_rental_keeps_car_rented() {
    let svc = service();
    let (_, car, rental) = booked(&svc).await;

    let revision = svc
        .execute(UpdateRental {
            rental_id: rental.id.clone(),
            status: rental::Status::Active,
            end_date: date("2024-01-10"),
        })
        .await
        .unwrap();

    assert_eq!(revision.end_date.as_str(), "2024-01-10");
    let detail = rental_by_id(&svc, &rental.id).await.unwrap();
    assert_eq!(detail.listed.rental.end_date.as_str(), "2024-01-10");
    assert_eq!(detail.listed.rental.status, rental::Status::Active);
    assert_eq!(car_status(&svc, &car.id).await, car::Status::rented());
}

#[tokio::test]
async fn revising_rejects_closing_status_and_missing_rental() {
    let svc = service();
    let (_, _, rental) = booked(&svc).await;

    let err = svc
        .execute(UpdateRental {
            rental_id: rental.id,
            status: rental::Status::Completed,
            end_date: date("2024-01-10"),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_ref(),
        update_rental::ExecutionError::ClosingStatus(_),
    ));

    let err = svc
        .execute(UpdateRental {
            rental_id: rental::Id::from("rent_missing"),
            status: rental::Status::Active,
            end_date: date("2024-01-10"),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_ref(),
        update_rental::ExecutionError::RentalNotExists(_),
    ));
}

#[tokio::test]
async fn deleting_rental_frees_car() {
    let svc = service();
    let (_, car, rental) = booked(&svc).await;

    let deleted = svc
        .execute(DeleteRental {
            rental_id: rental.id.clone(),
        })
        .await
        .unwrap();

    assert_eq!(deleted, rental);
    assert!(rental_by_id(&svc, &rental.id).await.is_none());
    assert!(rentals(&svc).await.is_empty());
    assert_eq!(car_status(&svc, &car.id).await, car::Status::available());
}

#[tokio::test]
async fn deleting_closed_rental_frees_car_anyway() {
    let svc = service();
    let (_, car, rental) = booked(&svc).await;
    _ = svc
        .execute(CloseRental {
            rental_id: rental.id.clone(),
            status: rental::Status::Completed,
            end_date: date("2024-01-05"),
            car_id: None,
        })
        .await
        .unwrap();

    _ = svc
        .execute(DeleteRental {
            rental_id: rental.id,
        })
        .await
        .unwrap();

    assert_eq!(car_status(&svc, &car.id).await, car::Status::available());
}

#[tokio::test]
async fn deleting_missing_rental_fails() {
    let svc = service();

    let err = svc
        .execute(DeleteRental {
            rental_id: rental::Id::from("rent_missing"),
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err.as_ref(),
        delete_rental::ExecutionError::RentalNotExists(_),
    ));
}

#[tokio::test]
async fn duplicate_customer_details_are_rejected() {
    let svc = service();
    let first = register(&svc, "jane@example.com", "DL-1").await;

    let err = svc
        .execute(new_customer("jane@example.com", "DL-2"))
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_ref(),
        create_customer::ExecutionError::EmailOccupied(_),
    ));

    let err = svc
        .execute(new_customer("john@example.com", "DL-1"))
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_ref(),
        create_customer::ExecutionError::DriversLicenseOccupied(_),
    ));

    assert_eq!(
        svc.execute(query::customers::All::by(())).await.unwrap(),
        [first],
    );
}

#[tokio::test]
async fn duplicate_license_plate_is_rejected() {
    let svc = service();
    let first = add_car(&svc, "AB-123").await;

    let err = svc.execute(new_car("AB-123")).await.unwrap_err();

    assert!(matches!(
        err.as_ref(),
        create_car::ExecutionError::LicensePlateOccupied(_),
    ));
    assert_eq!(svc.execute(query::cars::All::by(())).await.unwrap(), [first]);
}

#[tokio::test]
async fn updating_customer_replaces_every_detail() {
    let svc = service();
    let customer = register(&svc, "jane@example.com", "DL-1").await;

    let updated = svc
        .execute(UpdateCustomer {
            customer_id: customer.id.clone(),
            full_name: customer::FullName::new("Jane Roe").unwrap(),
            email: customer::Email::new("roe@example.com").unwrap(),
            phone: None,
            drivers_license_id: customer.drivers_license_id.clone(),
            date_of_birth: None,
        })
        .await
        .unwrap();

    let stored = svc
        .execute(query::customer::ById::by(customer.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored, updated);
    assert!(stored.phone.is_none());
    assert!(stored.date_of_birth.is_none());
}

#[tokio::test]
async fn updating_customer_checks_existence_and_uniqueness() {
    let svc = service();
    let jane = register(&svc, "jane@example.com", "DL-1").await;
    let john = register(&svc, "john@example.com", "DL-2").await;

    let mut cmd = UpdateCustomer {
        customer_id: john.id.clone(),
        full_name: john.full_name.clone(),
        email: john.email.clone(),
        phone: None,
        drivers_license_id: jane.drivers_license_id.clone(),
        date_of_birth: None,
    };
    let err = svc.execute(cmd.clone()).await.unwrap_err();
    assert!(matches!(
        err.as_ref(),
        update_customer::ExecutionError::DriversLicenseOccupied(_),
    ));

    cmd.customer_id = customer::Id::from("cust_missing");
    cmd.drivers_license_id = customer::DriversLicenseId::new("DL-3").unwrap();
    let err = svc.execute(cmd).await.unwrap_err();
    assert!(matches!(
        err.as_ref(),
        update_customer::ExecutionError::CustomerNotExists(_),
    ));
}

#[tokio::test]
async fn updating_car_keeps_status_unless_provided() {
    let svc = service();
    let (_, car, _) = booked(&svc).await;

    let updated = svc
        .execute(UpdateCar {
            car_id: car.id.clone(),
            make: car::Make::new("Honda").unwrap(),
            model: car::Model::new("Civic").unwrap(),
            year: None,
            license_plate: car.license_plate.clone(),
            status: None,
        })
        .await
        .unwrap();
    assert_eq!(updated.status, car::Status::rented());
    assert!(updated.year.is_none());
    assert_eq!(car_by_id(&svc, &car.id).await, Some(updated));

    let err = svc
        .execute(UpdateCar {
            car_id: car::Id::from("car_missing"),
            make: car.make,
            model: car.model,
            year: car.year,
            license_plate: car::LicensePlate::new("ZZ-999").unwrap(),
            status: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_ref(),
        update_car::ExecutionError::CarNotExists(_),
    ));
}

#[tokio::test]
async fn referenced_records_cannot_be_deleted() {
    let svc = service();
    let (customer, car, _) = booked(&svc).await;

    let err = svc
        .execute(DeleteCustomer {
            customer_id: customer.id.clone(),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_ref(),
        delete_customer::ExecutionError::CustomerHasRentals(_),
    ));

    let err = svc
        .execute(DeleteCar {
            car_id: car.id.clone(),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_ref(),
        delete_car::ExecutionError::CarHasRentals(_),
    ));

    assert_eq!(rentals(&svc).await.len(), 1);
    assert!(car_by_id(&svc, &car.id).await.is_some());
}

#[tokio::test]
async fn unreferenced_records_are_deleted() {
    let svc = service();
    let customer = register(&svc, "jane@example.com", "DL-1").await;
    let car = add_car(&svc, "AB-123").await;

    svc.execute(DeleteCustomer {
        customer_id: customer.id.clone(),
    })
    .await
    .unwrap();
    svc.execute(DeleteCar {
        car_id: car.id.clone(),
    })
    .await
    .unwrap();

    assert!(car_by_id(&svc, &car.id).await.is_none());
    let err = svc
        .execute(DeleteCustomer {
            customer_id: customer.id,
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_ref(),
        delete_customer::ExecutionError::CustomerNotExists(_),
    ));
    let err = svc.execute(DeleteCar { car_id: car.id }).await.unwrap_err();
    assert!(matches!(
        err.as_ref(),
        delete_car::ExecutionError::CarNotExists(_),
    ));
}

#[tokio::test]
async fn dashboard_counts_customers_cars_and_rentals() {
    let svc = service();
    _ = booked(&svc).await;
    _ = register(&svc, "john@example.com", "DL-2").await;
    _ = add_car(&svc, "CD-456").await;
    _ = add_car(&svc, "EF-789").await;

    let stats = svc.execute(query::dashboard::Stats::by(())).await.unwrap();

    assert_eq!(
        stats,
        read::dashboard::Stats {
            total_customers: 2,
            available_cars: 2,
            active_rentals: 1,
        },
    );
}
