//! The product record and its client-side validation.
//!
//! A product lives in the remote store under
//! `products/{owner}/{key}` as a plain JSON object. The store assigns the
//! key on create; the key never changes and is not part of the stored
//! object itself.

use serde::{Deserialize, Serialize};

use crate::types::{Price, PriceError, ProductKey};

/// Bucket label used for products whose category is empty or absent.
pub const OTHER_CATEGORY: &str = "Other";

/// The stored fields of a product, without its key.
///
/// This is the exact wire payload for create and update calls: every
/// write overwrites all four fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductFields {
    /// Display name.
    pub name: String,
    /// Category label, free-form. Stored under `type` for compatibility
    /// with existing collections.
    #[serde(rename = "type", default)]
    pub category: String,
    /// Price, persisted as a JSON number.
    pub price: Price,
    /// Local `file://` image URI. Never uploaded; referenced as-is.
    pub image: String,
}

/// A product as observed in an owner's collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Store-assigned key, unique within the owner's collection.
    pub key: ProductKey,
    /// The stored fields.
    pub fields: ProductFields,
}

impl Product {
    /// The category bucket this product belongs to.
    ///
    /// Empty categories map to [`OTHER_CATEGORY`].
    #[must_use]
    pub fn bucket_label(&self) -> &str {
        if self.fields.category.is_empty() {
            OTHER_CATEGORY
        } else {
            &self.fields.category
        }
    }
}

/// A required product field, used in validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductField {
    Name,
    Category,
    Price,
    Image,
}

impl ProductField {
    /// Human-readable field name for notices.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Category => "category",
            Self::Price => "price",
            Self::Image => "image",
        }
    }
}

/// Errors produced by client-side form validation.
///
/// A draft failing validation never reaches the store.
#[derive(thiserror::Error, Debug, Clone)]
pub enum ValidationError {
    /// A required field was left empty.
    #[error("missing required field: {}", .0.label())]
    MissingField(ProductField),

    /// The price input did not parse as a number.
    #[error(transparent)]
    InvalidPrice(#[from] PriceError),
}

/// Unvalidated form input for the add/edit product screens.
///
/// All inputs are captured as text; `validate` converts the draft into
/// the wire payload or reports the first problem.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDraft {
    /// Name input.
    pub name: String,
    /// Category selection.
    pub category: String,
    /// Price input, as typed.
    pub price: String,
    /// Picked image URI, if any.
    pub image: Option<String>,
}

impl ProductDraft {
    /// Pre-fill a draft from an existing product, for the edit screen.
    #[must_use]
    pub fn from_fields(fields: &ProductFields) -> Self {
        Self {
            name: fields.name.clone(),
            category: fields.category.clone(),
            price: fields.price.to_string(),
            image: Some(fields.image.clone()),
        }
    }

    /// Validate the draft into a store-ready payload.
    ///
    /// All four fields are required; the price must parse as a decimal
    /// number.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered, in field order
    /// (name, category, price, image).
    pub fn validate(&self) -> Result<ProductFields, ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField(ProductField::Name));
        }
        if self.category.trim().is_empty() {
            return Err(ValidationError::MissingField(ProductField::Category));
        }

        let price = Price::parse(&self.price).map_err(|e| match e {
            PriceError::Empty => ValidationError::MissingField(ProductField::Price),
            other => ValidationError::InvalidPrice(other),
        })?;

        let image = self
            .image
            .as_deref()
            .filter(|uri| !uri.is_empty())
            .ok_or(ValidationError::MissingField(ProductField::Image))?;

        Ok(ProductFields {
            name: self.name.trim().to_owned(),
            category: self.category.trim().to_owned(),
            price,
            image: image.to_owned(),
        })
    }
}
