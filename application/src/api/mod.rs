//! REST API definitions.

pub mod car;
pub mod customer;
pub mod dashboard;
pub mod rental;

use std::{fmt, str::FromStr};

use axum::Json;
use serde::Serialize;

use crate::Error;

/// Liveness banner served at the root path.
#[expect(
    clippy::unused_async,
    reason = "`async` is required to match signature"
)]
pub async fn banner() -> &'static str {
    "Car Rental System API is running!"
}

/// Confirmation of a successfully performed operation.
#[derive(Clone, Debug, Serialize)]
pub struct Message {
    /// Human-readable description of the performed operation.
    pub message: String,
}

impl Message {
    /// Wraps the provided `message` into a JSON response body.
    fn json(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

/// Returns the provided input `value` unless it's absent or empty.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Parses the provided `value` of the named input `field`.
fn parse<T>(field: &str, value: &str) -> Result<T, Error>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value
        .parse()
        .map_err(|e| Error::invalid_input(&format!("`{field}`: {e}")))
}

/// Parses the provided optional `value` of the named input `field`.
fn parse_opt<T>(field: &str, value: Option<String>) -> Result<Option<T>, Error>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    present(value).map(|v| parse(field, &v)).transpose()
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, Router};
    use http::{header, Method, Request, StatusCode};
    use http_body_util::BodyExt as _;
    use serde_json::{json, Value};
    use service::infra::Memory;
    use tower::ServiceExt as _;

    use crate::Service;

    /// Builds a [`Router`] upon an empty in-memory database.
    fn router() -> Router {
        crate::router(Service::new(Memory::default()))
    }

    /// Sends the provided JSON `body` to the `router` and returns the
    /// response status along with its JSON body.
    async fn send(
        router: &Router,
        method: Method,
        uri: &str,
        body: &str,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap();
        (status, json)
    }

    async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
        send(router, Method::GET, uri, "").await
    }

    /// Registers a customer and a car, returning their IDs.
    async fn customer_and_car(router: &Router) -> (String, String) {
        let (status, customer) = send(
            router,
            Method::POST,
            "/api/customers",
            r#"{
                "fullName": "Jane Doe",
                "email": "jane@example.com",
                "phone": "555-0100",
                "driversLicenseId": "DL-1"
            }"#,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, car) = send(
            router,
            Method::POST,
            "/api/cars",
            r#"{
                "make": "Toyota",
                "model": "Corolla",
                "year": 2020,
                "licensePlate": "ABC-123"
            }"#,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        (
            customer["id"].as_str().unwrap().to_owned(),
            car["id"].as_str().unwrap().to_owned(),
        )
    }

    /// Books the car for the customer and returns the response.
    async fn book(
        router: &Router,
        customer_id: &str,
        car_id: &str,
    ) -> (StatusCode, Value) {
        let body = json!({
            "customerId": customer_id,
            "carId": car_id,
            "rentalStartDate": "2024-01-01",
            "rentalEndDate": "2024-01-10",
        });
        send(router, Method::POST, "/api/rentals", &body.to_string()).await
    }

    #[tokio::test]
    async fn serves_banner() {
        let request = Request::get("/").body(Body::empty()).unwrap();
        let response = router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"Car Rental System API is running!");
    }

    #[tokio::test]
    async fn creates_records() {
        let router = router();

        let (status, customer) = send(
            &router,
            Method::POST,
            "/api/customers",
            r#"{
                "fullName": "Jane Doe",
                "email": "jane@example.com",
                "driversLicenseId": "DL-1",
                "dateOfBirth": "1990-05-17"
            }"#,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(customer["id"].as_str().unwrap().starts_with("cust_"));
        assert_eq!(customer["fullName"], "Jane Doe");
        assert_eq!(customer["phone"], Value::Null);
        assert_eq!(customer["dateOfBirth"], "1990-05-17");

        let (status, car) = send(
            &router,
            Method::POST,
            "/api/cars",
            r#"{
                "make": "Toyota",
                "model": "Corolla",
                "licensePlate": "ABC-123",
                "status": "maintenance"
            }"#,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(car["id"].as_str().unwrap().starts_with("car_"));
        assert_eq!(car["status"], "available");
        assert_eq!(car["year"], Value::Null);

        let (status, cars) = get(&router, "/api/cars").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cars.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rejects_duplicates_with_conflict() {
        let router = router();
        _ = customer_and_car(&router).await;

        let (status, body) = send(
            &router,
            Method::POST,
            "/api/customers",
            r#"{
                "fullName": "John Roe",
                "email": "jane@example.com",
                "driversLicenseId": "DL-2"
            }"#,
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "CONSTRAINT_VIOLATION");

        let (status, body) = send(
            &router,
            Method::POST,
            "/api/cars",
            r#"{"make": "Honda", "model": "Civic", "licensePlate": "ABC-123"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "CONSTRAINT_VIOLATION");
    }

    #[tokio::test]
    async fn updates_and_removes_records() {
        let router = router();
        let (customer_id, car_id) = customer_and_car(&router).await;

        let (status, body) = send(
            &router,
            Method::PUT,
            &format!("/api/customers/{customer_id}"),
            r#"{
                "fullName": "Jane Smith",
                "email": "jane.smith@example.com",
                "driversLicenseId": "DL-1"
            }"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Customer updated successfully"}));

        let (_, customer) =
            get(&router, &format!("/api/customers/{customer_id}")).await;
        assert_eq!(customer["fullName"], "Jane Smith");
        assert_eq!(customer["phone"], Value::Null);

        let (status, body) = send(
            &router,
            Method::PUT,
            &format!("/api/cars/{car_id}"),
            r#"{
                "make": "Toyota",
                "model": "Yaris",
                "licensePlate": "ABC-123",
                "status": "maintenance"
            }"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Car updated successfully"}));

        let (_, car) = get(&router, &format!("/api/cars/{car_id}")).await;
        assert_eq!(car["model"], "Yaris");
        assert_eq!(car["status"], "maintenance");

        let (status, body) =
            send(&router, Method::DELETE, &format!("/api/cars/{car_id}"), "")
                .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Car removed successfully"}));

        let (status, body) =
            get(&router, &format!("/api/cars/{car_id}")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn reports_missing_records() {
        let router = router();

        let (status, body) = get(&router, "/api/customers/cust_missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Customer not found");

        let (status, body) = send(
            &router,
            Method::PUT,
            "/api/customers/cust_missing",
            r#"{
                "fullName": "Jane Doe",
                "email": "jane@example.com",
                "driversLicenseId": "DL-1"
            }"#,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");

        let (status, body) =
            send(&router, Method::DELETE, "/api/rentals/rent_missing", "")
                .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Rental not found");

        let (status, _) = get(&router, "/api/rentals/rent_missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn runs_rental_lifecycle() {
        let router = router();
        let (customer_id, car_id) = customer_and_car(&router).await;

        let (status, rental) = book(&router, &customer_id, &car_id).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(rental["status"], "active");
        assert_eq!(rental["carId"], car_id.as_str());
        let rental_id = rental["id"].as_str().unwrap().to_owned();

        let (_, car) = get(&router, &format!("/api/cars/{car_id}")).await;
        assert_eq!(car["status"], "rented");

        let (status, body) = book(&router, &customer_id, &car_id).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "CAR_UNAVAILABLE");

        let (_, stats) = get(&router, "/api/dashboard").await;
        assert_eq!(
            stats,
            json!({
                "totalCustomers": 1,
                "availableCars": 0,
                "activeRentals": 1,
            }),
        );

        let (status, rentals) = get(&router, "/api/rentals").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(rentals[0]["id"], rental_id.as_str());
        assert_eq!(rentals[0]["customerName"], "Jane Doe");
        assert_eq!(rentals[0]["licensePlate"], "ABC-123");

        let (status, detail) =
            get(&router, &format!("/api/rentals/{rental_id}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(detail["customerEmail"], "jane@example.com");
        assert_eq!(detail["make"], "Toyota");

        let (status, body) = send(
            &router,
            Method::PUT,
            &format!("/api/rentals/{rental_id}"),
            &json!({
                "status": "active",
                "rentalEndDate": "2024-01-12",
                "carId": car_id,
            })
            .to_string(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Rental updated"}));

        let (status, body) = send(
            &router,
            Method::PUT,
            &format!("/api/rentals/{rental_id}"),
            &json!({
                "status": "completed",
                "rentalEndDate": "2024-01-12",
                "carId": car_id,
            })
            .to_string(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"message": "Rental completed and car set to available"}),
        );

        let (_, car) = get(&router, &format!("/api/cars/{car_id}")).await;
        assert_eq!(car["status"], "available");
        let (_, detail) =
            get(&router, &format!("/api/rentals/{rental_id}")).await;
        assert_eq!(detail["status"], "completed");
        assert_eq!(detail["rentalEndDate"], "2024-01-12");
    }

    #[tokio::test]
    async fn removing_rental_frees_car() {
        let router = router();
        let (customer_id, car_id) = customer_and_car(&router).await;
        let (_, rental) = book(&router, &customer_id, &car_id).await;
        let rental_id = rental["id"].as_str().unwrap();

        let (status, body) = send(
            &router,
            Method::DELETE,
            &format!("/api/rentals/{rental_id}"),
            "",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"message": "Rental removed and car set to available"}),
        );

        let (_, car) = get(&router, &format!("/api/cars/{car_id}")).await;
        assert_eq!(car["status"], "available");
        let (_, rentals) = get(&router, "/api/rentals").await;
        assert_eq!(rentals, json!([]));
    }

    #[tokio::test]
    async fn forbids_removing_rented_records() {
        let router = router();
        let (customer_id, car_id) = customer_and_car(&router).await;
        let (status, _) = book(&router, &customer_id, &car_id).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(
            &router,
            Method::DELETE,
            &format!("/api/customers/{customer_id}"),
            "",
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "CONSTRAINT_VIOLATION");

        let (status, body) =
            send(&router, Method::DELETE, &format!("/api/cars/{car_id}"), "")
                .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "CONSTRAINT_VIOLATION");

        let (_, rentals) = get(&router, "/api/rentals").await;
        assert_eq!(rentals.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rejects_booking_for_unknown_customer() {
        let router = router();
        let (_, car_id) = customer_and_car(&router).await;

        let (status, body) = book(&router, "cust_missing", &car_id).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_INPUT");

        let (_, car) = get(&router, &format!("/api/cars/{car_id}")).await;
        assert_eq!(car["status"], "available");
    }

    #[tokio::test]
    async fn rejects_closing_with_foreign_car() {
        let router = router();
        let (customer_id, car_id) = customer_and_car(&router).await;
        let (_, rental) = book(&router, &customer_id, &car_id).await;
        let rental_id = rental["id"].as_str().unwrap();

        let (status, body) = send(
            &router,
            Method::PUT,
            &format!("/api/rentals/{rental_id}"),
            r#"{
                "status": "cancelled",
                "rentalEndDate": "2024-01-05",
                "carId": "car_other"
            }"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_INPUT");

        let (_, car) = get(&router, &format!("/api/cars/{car_id}")).await;
        assert_eq!(car["status"], "rented");
    }

    #[tokio::test]
    async fn rejects_customer_without_required_fields() {
        let (status, body) = send(
            &router(),
            Method::POST,
            "/api/customers",
            r#"{"fullName": "Jane Doe", "email": ""}"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_INPUT");
        assert_eq!(body["message"], "Missing required fields");
    }

    #[tokio::test]
    async fn rejects_customer_with_malformed_email() {
        let (status, body) = send(
            &router(),
            Method::POST,
            "/api/customers",
            r#"{
                "fullName": "Jane Doe",
                "email": "jane.example.com",
                "driversLicenseId": "DL-1"
            }"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn rejects_malformed_json() {
        let (status, body) =
            send(&router(), Method::POST, "/api/cars", r#"{"make": "#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn rejects_car_without_license_plate() {
        let (status, body) = send(
            &router(),
            Method::POST,
            "/api/cars",
            r#"{"make": "Toyota", "model": "Corolla", "year": 2020}"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            "Missing required fields: make, model, licensePlate",
        );
    }

    #[tokio::test]
    async fn rejects_rental_with_invalid_date() {
        let (status, body) = send(
            &router(),
            Method::POST,
            "/api/rentals",
            r#"{
                "customerId": "cust_1",
                "carId": "car_1",
                "rentalStartDate": "tomorrow",
                "rentalEndDate": "2024-01-10"
            }"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn rejects_rental_revision_without_end_date() {
        let (status, body) = send(
            &router(),
            Method::PUT,
            "/api/rentals/rent_1",
            r#"{"status": "completed", "carId": "car_1"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            "Missing required fields: status, rentalEndDate, carId",
        );
    }

    #[tokio::test]
    async fn rejects_unknown_rental_status() {
        let (status, body) = send(
            &router(),
            Method::PUT,
            "/api/rentals/rent_1",
            r#"{
                "status": "returned",
                "rentalEndDate": "2024-01-10",
                "carId": "car_1"
            }"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_INPUT");
    }
}
