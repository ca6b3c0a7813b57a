//! [`Query`] collection related to a single [`Rental`].

use common::operations::By;

#[cfg(doc)]
use crate::{
    domain::{Car, Customer, Rental},
    Query,
};
use crate::{domain::rental, read};

use super::DatabaseQuery;

/// Queries a [`Rental`] by its [`rental::Id`] along with the details of its
/// [`Customer`] and [`Car`].
pub type ById = DatabaseQuery<By<Option<read::rental::Detail>, rental::Id>>;
