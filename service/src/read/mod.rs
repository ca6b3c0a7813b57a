//! Read entities definitions.

pub mod dashboard;
pub mod rental;
