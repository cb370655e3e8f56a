//! In-memory product store.
//!
//! Implements the same contract as [`RealtimeStore`](super::RealtimeStore)
//! without any network: per-owner collections in a key-sorted map, with
//! generated keys that sort in insertion order. Used by unit and
//! integration tests, and handy as a scripted backend when exercising
//! the UI offline.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::watch;

use punguin_core::{OwnerId, Product, ProductFields, ProductKey};

use super::{ProductStore, ProductSubscription, StoreError, WriteError, ensure_complete};

/// An in-memory [`ProductStore`].
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    collections: HashMap<OwnerId, BTreeMap<String, ProductFields>>,
    watchers: HashMap<OwnerId, watch::Sender<Vec<Product>>>,
    next_key: u64,
    rejection: Option<String>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next write fail with the given message, simulating a
    /// store rejection.
    pub fn reject_next_write(&self, message: impl Into<String>) {
        self.lock().rejection = Some(message.into());
    }

    /// The current collection for an owner, in key order.
    #[must_use]
    pub fn products_of(&self, owner: &OwnerId) -> Vec<Product> {
        snapshot(&self.lock(), owner)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // Lock poisoning cannot outlive a test process in any useful
        // way; propagate the inner state regardless.
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn take_rejection(inner: &mut Inner) -> Result<(), WriteError> {
        match inner.rejection.take() {
            Some(message) => Err(WriteError::Rejected { message }),
            None => Ok(()),
        }
    }

    fn notify(inner: &Inner, owner: &OwnerId) {
        if let Some(tx) = inner.watchers.get(owner) {
            tx.send_replace(snapshot(inner, owner));
        }
    }
}

fn snapshot(inner: &Inner, owner: &OwnerId) -> Vec<Product> {
    inner
        .collections
        .get(owner)
        .map(|collection| {
            collection
                .iter()
                .map(|(key, fields)| Product {
                    key: ProductKey::new(key.clone()),
                    fields: fields.clone(),
                })
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn subscribe(&self, owner: &OwnerId) -> Result<ProductSubscription, StoreError> {
        let mut inner = self.lock();
        let current = snapshot(&inner, owner);
        let rx = match inner.watchers.get(owner) {
            Some(tx) => tx.subscribe(),
            None => {
                let (tx, rx) = watch::channel(current);
                inner.watchers.insert(owner.clone(), tx);
                rx
            }
        };
        Ok(ProductSubscription::new(rx, None))
    }

    async fn create(
        &self,
        owner: &OwnerId,
        fields: &ProductFields,
    ) -> Result<ProductKey, WriteError> {
        ensure_complete(fields)?;

        let mut inner = self.lock();
        Self::take_rejection(&mut inner)?;

        inner.next_key += 1;
        // Zero-padded counter keys sort in insertion order, like the
        // store's push keys.
        let key = format!("-K{:012}", inner.next_key);
        inner
            .collections
            .entry(owner.clone())
            .or_default()
            .insert(key.clone(), fields.clone());
        Self::notify(&inner, owner);

        Ok(ProductKey::new(key))
    }

    async fn update(
        &self,
        owner: &OwnerId,
        key: &ProductKey,
        fields: &ProductFields,
    ) -> Result<(), WriteError> {
        ensure_complete(fields)?;

        let mut inner = self.lock();
        Self::take_rejection(&mut inner)?;

        inner
            .collections
            .entry(owner.clone())
            .or_default()
            .insert(key.as_str().to_owned(), fields.clone());
        Self::notify(&inner, owner);

        Ok(())
    }

    async fn remove(&self, owner: &OwnerId, key: &ProductKey) -> Result<(), WriteError> {
        let mut inner = self.lock();
        Self::take_rejection(&mut inner)?;

        if let Some(collection) = inner.collections.get_mut(owner) {
            collection.remove(key.as_str());
        }
        Self::notify(&inner, owner);

        Ok(())
    }
}
