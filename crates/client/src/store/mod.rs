//! Realtime product store boundary.
//!
//! [`ProductStore`] is the port every screen works against: scoped CRUD
//! writes plus a live whole-collection subscription. [`RealtimeStore`]
//! is the HTTP/SSE adapter for the managed document store;
//! [`MemoryStore`] implements the same contract in memory for tests.
//!
//! There is no optimistic local cache anywhere: a write's success only
//! unblocks the submitting screen, and rendered data always comes from
//! the latest subscription snapshot.

mod error;
mod memory;
mod realtime;
mod sse;

pub use error::{StoreError, WriteError};
pub use memory::MemoryStore;
pub use realtime::RealtimeStore;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use punguin_core::{OwnerId, Product, ProductField, ProductFields, ProductKey};

/// The product repository contract.
///
/// Every operation is scoped by an explicit owner identity supplied by
/// the caller; nothing here infers the owner from ambient state.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Observe an owner's full collection.
    ///
    /// The returned subscription holds the current list immediately and
    /// updates on every remote change. Dropping it releases the remote
    /// listener.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the initial snapshot cannot be fetched.
    async fn subscribe(&self, owner: &OwnerId) -> Result<ProductSubscription, StoreError>;

    /// Create a product; the store assigns and returns its key.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::IncompleteFields`] locally, without
    /// contacting the store, if any field is empty; otherwise the
    /// store's rejection or a transport error.
    async fn create(&self, owner: &OwnerId, fields: &ProductFields)
    -> Result<ProductKey, WriteError>;

    /// Overwrite all fields of an existing product. The key is
    /// immutable.
    ///
    /// # Errors
    ///
    /// Same contract as [`ProductStore::create`].
    async fn update(
        &self,
        owner: &OwnerId,
        key: &ProductKey,
        fields: &ProductFields,
    ) -> Result<(), WriteError>;

    /// Delete a product by key.
    ///
    /// # Errors
    ///
    /// Returns the store's rejection or a transport error.
    async fn remove(&self, owner: &OwnerId, key: &ProductKey) -> Result<(), WriteError>;
}

/// A live view of one owner's product collection.
///
/// Holds the latest snapshot and a cancellable listener: dropping the
/// subscription aborts the background task feeding it, releasing the
/// remote listener (scoped acquisition/release).
pub struct ProductSubscription {
    rx: watch::Receiver<Vec<Product>>,
    task: Option<JoinHandle<()>>,
}

impl ProductSubscription {
    /// Build a subscription from a snapshot receiver and the task that
    /// feeds it.
    pub(crate) const fn new(rx: watch::Receiver<Vec<Product>>, task: Option<JoinHandle<()>>) -> Self {
        Self { rx, task }
    }

    /// The latest snapshot of the collection.
    ///
    /// Available immediately after subscribing.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Product> {
        self.rx.borrow().clone()
    }

    /// Wait for the next remote change and return the new snapshot.
    ///
    /// Returns `None` once the feeding side has gone away (store
    /// dropped or listener cancelled).
    pub async fn changed(&mut self) -> Option<Vec<Product>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}

impl Drop for ProductSubscription {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Local completeness check shared by the store implementations.
///
/// The forms validate drafts before constructing [`ProductFields`], so
/// this normally never fires; it keeps the fail-fast contract honest for
/// payloads built by other callers.
pub(crate) fn ensure_complete(fields: &ProductFields) -> Result<(), WriteError> {
    if fields.name.is_empty() {
        return Err(WriteError::IncompleteFields(ProductField::Name));
    }
    if fields.category.is_empty() {
        return Err(WriteError::IncompleteFields(ProductField::Category));
    }
    if fields.image.is_empty() {
        return Err(WriteError::IncompleteFields(ProductField::Image));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use punguin_core::Price;

    #[test]
    fn test_ensure_complete_rejects_empty_name() {
        let fields = ProductFields {
            name: String::new(),
            category: "Hoa".to_owned(),
            price: Price::parse("1").unwrap(),
            image: "file:///a.png".to_owned(),
        };
        assert!(matches!(
            ensure_complete(&fields),
            Err(WriteError::IncompleteFields(ProductField::Name))
        ));
    }

    #[test]
    fn test_ensure_complete_accepts_full_fields() {
        let fields = ProductFields {
            name: "Hoa hồng".to_owned(),
            category: "Hoa".to_owned(),
            price: Price::parse("20000").unwrap(),
            image: "file:///a.png".to_owned(),
        };
        assert!(ensure_complete(&fields).is_ok());
    }
}
