//! Punguin Core - Shared types library.
//!
//! This crate provides common types used across all Punguin components:
//! - `client` - Wrappers for the external auth provider and realtime store
//! - `app` - Terminal client (screens, navigation, list derivation)
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no HTTP
//! clients, no UI. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, and prices
//! - [`product`] - The product record and its client-side validation
//! - [`session`] - The authenticated session identity

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod product;
pub mod session;
pub mod types;

pub use product::*;
pub use session::Session;
pub use types::*;
