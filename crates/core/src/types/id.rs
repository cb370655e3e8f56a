//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. Both IDs in this
//! system are opaque strings minted by the external backend: the auth
//! provider assigns owner IDs, the document store assigns product keys.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>` and `From<&str>` implementations
///
/// # Example
///
/// ```rust
/// # use punguin_core::define_id;
/// define_id!(OwnerId);
/// define_id!(ProductKey);
///
/// let owner = OwnerId::new("u-1");
/// let key = ProductKey::new("-Nx7Qc");
///
/// // These are different types, so this won't compile:
/// // let _: OwnerId = key;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns true if the ID is empty (never the case for a
            /// persisted entity).
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Consume the ID and return its inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// The two entity IDs in the system.
define_id!(OwnerId);
define_id!(ProductKey);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip() {
        let owner = OwnerId::new("abc123");
        assert_eq!(owner.as_str(), "abc123");
        assert_eq!(owner.to_string(), "abc123");
        assert_eq!(String::from(owner), "abc123");
    }

    #[test]
    fn test_id_equality() {
        assert_eq!(ProductKey::new("-Nx7"), ProductKey::from("-Nx7"));
        assert_ne!(ProductKey::new("-Nx7"), ProductKey::new("-Nx8"));
    }

    #[test]
    fn test_id_serde_transparent() {
        let key = ProductKey::new("-Nx7Qc");
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"-Nx7Qc\"");

        let parsed: ProductKey = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, key);
    }

    #[test]
    fn test_push_keys_sort_chronologically() {
        // Store-generated push keys encode their creation time in the
        // prefix, so lexicographic order is insertion order.
        let mut keys = vec![
            ProductKey::new("-NxB00000000000000"),
            ProductKey::new("-NxA00000000000000"),
            ProductKey::new("-NxC00000000000000"),
        ];
        keys.sort();
        assert_eq!(keys[0].as_str(), "-NxA00000000000000");
        assert_eq!(keys[2].as_str(), "-NxC00000000000000");
    }
}
