//! Application provides REST API for interacting with the [`Service`].

#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod api;
pub mod args;
pub mod config;
pub mod error;

use axum::{routing::get, Extension, Router};
// Used in binary.
use axum_client_ip as _;
use refinery as _;
use tokio as _;
use tower_http as _;
use tracing_subscriber as _;
// Used in tests.
#[cfg(test)]
use http_body_util as _;
#[cfg(test)]
use serde_json as _;
#[cfg(test)]
use tower as _;

pub use self::{
    args::Args,
    config::Config,
    error::{AsError, Error},
};

/// [`Service`] with filled infrastructure dependencies.
///
/// [`Service`]: service::Service
#[cfg(not(test))]
pub type Service = service::Service<service::infra::Postgres>;

/// [`Service`] upon the in-memory database, driving the API in tests.
///
/// [`Service`]: service::Service
#[cfg(test)]
pub type Service = service::Service<service::infra::Memory>;

/// Builds the REST API [`Router`] upon the provided [`Service`].
pub fn router(service: Service) -> Router {
    Router::new()
        .route("/", get(api::banner))
        .route(
            "/api/customers",
            get(api::customer::list).post(api::customer::create),
        )
        .route(
            "/api/customers/:id",
            get(api::customer::by_id)
                .put(api::customer::update)
                .delete(api::customer::delete),
        )
        .route("/api/cars", get(api::car::list).post(api::car::create))
        .route(
            "/api/cars/:id",
            get(api::car::by_id)
                .put(api::car::update)
                .delete(api::car::delete),
        )
        .route(
            "/api/rentals",
            get(api::rental::list).post(api::rental::create),
        )
        .route(
            "/api/rentals/:id",
            get(api::rental::by_id)
                .put(api::rental::update)
                .delete(api::rental::delete),
        )
        .route("/api/dashboard", get(api::dashboard::stats))
        .layer(Extension(service))
}
