//! Newtype wrappers for type-safe IDs, emails, and prices.

mod email;
mod id;
mod price;

pub use email::{Email, EmailError};
pub use id::{OwnerId, ProductKey};
pub use price::{Price, PriceError};
