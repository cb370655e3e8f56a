//! Punguin Client - wrappers for the external managed backend.
//!
//! This crate holds everything that talks to the outside world:
//!
//! - [`config`] - Environment-driven configuration for the backend
//!   endpoints
//! - [`auth`] - The auth provider boundary and the session store that
//!   tracks the signed-in identity
//! - [`store`] - The realtime product store boundary: CRUD writes and
//!   live whole-collection subscriptions
//!
//! The app renders exclusively from subscription snapshots; nothing in
//! this crate caches store data locally.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod config;
pub mod store;

pub use auth::{AuthError, AuthProvider, IdentityClient, SessionStore, SessionWatcher};
pub use config::{ClientConfig, ConfigError};
pub use store::{
    MemoryStore, ProductStore, ProductSubscription, RealtimeStore, StoreError, WriteError,
};
