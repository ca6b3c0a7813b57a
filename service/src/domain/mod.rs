//! Domain definitions.

pub mod car;
pub mod customer;
pub mod rental;

pub use self::{car::Car, customer::Customer, rental::Rental};

/// Checks whether the given free-form `text` is a valid domain value.
fn is_valid_text(text: &str) -> bool {
    text.trim() == text && !text.is_empty() && text.len() <= 512
}
