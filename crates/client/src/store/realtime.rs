//! HTTP/SSE adapter for the managed realtime document store.
//!
//! Collections are path-addressed JSON documents:
//!
//! - `POST {base}/products/{owner}.json` creates a child with a
//!   store-generated key, returned as `{"name": key}`
//! - `PUT {base}/products/{owner}/{key}.json` overwrites one product
//! - `DELETE {base}/products/{owner}/{key}.json` removes it
//! - `GET` with `Accept: text/event-stream` opens a live subscription
//!   delivering `put`/`patch` change events addressed by path
//!
//! The subscription task mirrors the collection as a JSON tree, applies
//! change events to it, and publishes a typed snapshot after each one.
//! Keys are kept in sorted order; store-generated push keys sort
//! chronologically, so snapshots render in insertion order.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::ACCEPT;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Map, Value};
use tokio::sync::watch;
use tracing::{debug, warn};

use punguin_core::{OwnerId, Product, ProductFields, ProductKey};

use crate::config::ClientConfig;

use super::sse::{SseParser, StreamEvent};
use super::{ProductStore, ProductSubscription, StoreError, WriteError, ensure_complete};

/// Delay before re-establishing a dropped subscription stream.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Client for the realtime document store's REST API.
#[derive(Clone)]
pub struct RealtimeStore {
    client: reqwest::Client,
    base_url: String,
    auth: Option<SecretString>,
}

#[derive(Deserialize)]
struct PushResponse {
    /// The store-generated child key.
    name: String,
}

#[derive(Deserialize)]
struct RejectionBody {
    error: String,
}

impl RealtimeStore {
    /// Create a new store client from configuration.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.database_url.as_str().trim_end_matches('/').to_owned(),
            auth: None,
        }
    }

    /// Attach a session token; subsequent requests carry it as the
    /// `auth` query parameter.
    #[must_use]
    pub fn with_auth(mut self, token: SecretString) -> Self {
        self.auth = Some(token);
        self
    }

    fn collection_url(&self, owner: &OwnerId) -> String {
        self.with_auth_param(format!("{}/products/{}.json", self.base_url, owner))
    }

    fn product_url(&self, owner: &OwnerId, key: &ProductKey) -> String {
        self.with_auth_param(format!("{}/products/{}/{}.json", self.base_url, owner, key))
    }

    fn with_auth_param(&self, url: String) -> String {
        match &self.auth {
            Some(token) => format!("{url}?auth={}", token.expose_secret()),
            None => url,
        }
    }

    /// Fetch the current collection as a JSON tree.
    async fn fetch_collection(
        &self,
        owner: &OwnerId,
    ) -> Result<BTreeMap<String, Value>, StoreError> {
        let response = self.client.get(self.collection_url(owner)).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(StoreError::Rejected {
                message: rejection_message(status, &text),
            });
        }

        let value: Value = serde_json::from_str(&text)?;
        Ok(tree_from_value(value))
    }

    /// Check a write response, surfacing the store's message verbatim.
    async fn check_write(response: reqwest::Response) -> Result<String, WriteError> {
        let status = response.status();
        let text = response.text().await?;
        if status.is_success() {
            Ok(text)
        } else {
            Err(WriteError::Rejected {
                message: rejection_message(status, &text),
            })
        }
    }
}

#[async_trait]
impl ProductStore for RealtimeStore {
    async fn subscribe(&self, owner: &OwnerId) -> Result<ProductSubscription, StoreError> {
        // Seed with a plain fetch so the subscription observes the
        // current list immediately, then keep it live over SSE.
        let tree = self.fetch_collection(owner).await?;
        debug!(owner = %owner, products = tree.len(), "subscription seeded");

        let (tx, rx) = watch::channel(snapshot_from_tree(&tree));
        let task = tokio::spawn(stream_collection(
            self.client.clone(),
            self.collection_url(owner),
            owner.clone(),
            tree,
            tx,
        ));

        Ok(ProductSubscription::new(rx, Some(task)))
    }

    async fn create(
        &self,
        owner: &OwnerId,
        fields: &ProductFields,
    ) -> Result<ProductKey, WriteError> {
        ensure_complete(fields)?;

        let response = self
            .client
            .post(self.collection_url(owner))
            .json(fields)
            .send()
            .await?;
        let text = Self::check_write(response).await?;
        let payload: PushResponse = serde_json::from_str(&text)?;

        debug!(owner = %owner, key = %payload.name, "product created");
        Ok(ProductKey::new(payload.name))
    }

    async fn update(
        &self,
        owner: &OwnerId,
        key: &ProductKey,
        fields: &ProductFields,
    ) -> Result<(), WriteError> {
        ensure_complete(fields)?;

        let response = self
            .client
            .put(self.product_url(owner, key))
            .json(fields)
            .send()
            .await?;
        Self::check_write(response).await?;

        debug!(owner = %owner, key = %key, "product updated");
        Ok(())
    }

    async fn remove(&self, owner: &OwnerId, key: &ProductKey) -> Result<(), WriteError> {
        let response = self
            .client
            .delete(self.product_url(owner, key))
            .send()
            .await?;
        Self::check_write(response).await?;

        debug!(owner = %owner, key = %key, "product removed");
        Ok(())
    }
}

/// Background task: keep the collection tree live over SSE, publishing
/// a typed snapshot after every applied change.
async fn stream_collection(
    client: reqwest::Client,
    url: String,
    owner: OwnerId,
    mut tree: BTreeMap<String, Value>,
    tx: watch::Sender<Vec<Product>>,
) {
    loop {
        if tx.is_closed() {
            return;
        }

        match open_stream(&client, &url).await {
            Ok(response) => {
                let mut parser = SseParser::new();
                let mut body = response.bytes_stream();
                let mut cancelled = false;

                while !cancelled {
                    let Some(chunk) = body.next().await else {
                        break;
                    };
                    if tx.is_closed() {
                        return;
                    }
                    let bytes = match chunk {
                        Ok(bytes) => bytes,
                        Err(e) => {
                            warn!(owner = %owner, error = %e, "subscription stream failed");
                            break;
                        }
                    };

                    for record in parser.feed(&bytes) {
                        match StreamEvent::from_record(&record) {
                            Some(Ok(StreamEvent::Put { path, data })) => {
                                apply_put(&mut tree, &path, data);
                                tx.send_replace(snapshot_from_tree(&tree));
                            }
                            Some(Ok(StreamEvent::Patch { path, data })) => {
                                apply_patch(&mut tree, &path, data);
                                tx.send_replace(snapshot_from_tree(&tree));
                            }
                            Some(Ok(StreamEvent::KeepAlive)) => {}
                            Some(Ok(StreamEvent::Cancel | StreamEvent::AuthRevoked)) => {
                                warn!(owner = %owner, event = %record.event, "stream cancelled by server");
                                cancelled = true;
                                break;
                            }
                            Some(Err(e)) => {
                                warn!(owner = %owner, error = %e, "malformed change event");
                            }
                            None => {}
                        }
                    }
                }
            }
            Err(e) => {
                warn!(owner = %owner, error = %e, "could not open subscription stream");
            }
        }

        tokio::time::sleep(RECONNECT_DELAY).await;
    }
}

async fn open_stream(
    client: &reqwest::Client,
    url: &str,
) -> Result<reqwest::Response, StoreError> {
    let response = client
        .get(url)
        .header(ACCEPT, "text/event-stream")
        .send()
        .await?;
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let text = response.text().await.unwrap_or_default();
        Err(StoreError::Rejected {
            message: rejection_message(status, &text),
        })
    }
}

fn rejection_message(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<RejectionBody>(body)
        .map_or_else(|_| format!("HTTP {status}"), |b| b.error)
}

/// Interpret a collection document: `null` means empty, an object maps
/// keys to product values.
fn tree_from_value(value: Value) -> BTreeMap<String, Value> {
    match value {
        Value::Object(map) => map.into_iter().collect(),
        _ => BTreeMap::new(),
    }
}

/// Convert the JSON tree into the typed snapshot, skipping entries that
/// do not deserialize as products.
fn snapshot_from_tree(tree: &BTreeMap<String, Value>) -> Vec<Product> {
    tree.iter()
        .filter_map(|(key, value)| {
            match serde_json::from_value::<ProductFields>(value.clone()) {
                Ok(fields) => Some(Product {
                    key: ProductKey::new(key.clone()),
                    fields,
                }),
                Err(e) => {
                    warn!(key = %key, error = %e, "skipping malformed product entry");
                    None
                }
            }
        })
        .collect()
}

/// Replace the value at `path` within the collection tree. A `null`
/// value removes the addressed node.
fn apply_put(tree: &mut BTreeMap<String, Value>, path: &str, data: Value) {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    match segments.split_first() {
        // Whole-collection replacement.
        None => {
            *tree = tree_from_value(data);
        }
        Some((key, rest)) => {
            if rest.is_empty() {
                if data.is_null() {
                    tree.remove(*key);
                } else {
                    tree.insert((*key).to_owned(), data);
                }
            } else {
                let entry = tree
                    .entry((*key).to_owned())
                    .or_insert_with(|| Value::Object(Map::new()));
                set_nested(entry, rest, data);
            }
        }
    }
}

/// Merge the children of `data` at `path`, child by child.
fn apply_patch(tree: &mut BTreeMap<String, Value>, path: &str, data: Value) {
    let Value::Object(children) = data else {
        return;
    };
    let prefix = path.trim_end_matches('/');
    for (child, value) in children {
        apply_put(tree, &format!("{prefix}/{child}"), value);
    }
}

/// Set a nested field inside a product value, creating intermediate
/// objects as needed.
fn set_nested(value: &mut Value, segments: &[&str], data: Value) {
    let Some((first, rest)) = segments.split_first() else {
        *value = data;
        return;
    };

    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    let Some(map) = value.as_object_mut() else {
        return;
    };

    if rest.is_empty() {
        if data.is_null() {
            map.remove(*first);
        } else {
            map.insert((*first).to_owned(), data);
        }
    } else {
        let child = map
            .entry((*first).to_owned())
            .or_insert_with(|| Value::Object(Map::new()));
        set_nested(child, rest, data);
    }
}
