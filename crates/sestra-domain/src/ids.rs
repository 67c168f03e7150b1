//! Identifiers
//!
//! Annotations are identified by a caller-supplied UUID that is unique across
//! the whole store. Projects, layers, documents and stored annotation rows are
//! identified by opaque storage keys handed out by the repository.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Globally unique identifier of an annotation
///
/// Clients generate these themselves, so a retried create carrying the same
/// id is reported as already existing instead of being stored twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationId(Uuid);

impl AnnotationId {
    /// Generate a fresh random (v4) identifier
    ///
    /// # Examples
    ///
    /// ```
    /// use sestra_domain::AnnotationId;
    ///
    /// let a = AnnotationId::new();
    /// let b = AnnotationId::new();
    /// assert_ne!(a, b);
    /// ```
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Rebuild an identifier from its 16 big-endian bytes
    ///
    /// This is primarily for storage layer deserialization.
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// Parse an identifier from its hyphenated string form
    ///
    /// # Examples
    ///
    /// ```
    /// use sestra_domain::AnnotationId;
    ///
    /// let id = AnnotationId::new();
    /// let parsed = AnnotationId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| format!("Invalid annotation id: {}", e))
    }

    /// Borrow the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// The 16 big-endian bytes of the identifier
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for AnnotationId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for AnnotationId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! storage_key {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw storage key
            pub fn from_value(value: i64) -> Self {
                Self(value)
            }

            /// Get the raw storage key
            pub fn value(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

storage_key!(
    /// Storage key of a persisted project
    ProjectId
);

storage_key!(
    /// Storage key of a persisted layer
    LayerId
);

storage_key!(
    /// Storage key of a persisted document
    DocumentId
);

storage_key!(
    /// Storage key of a persisted annotation row
    ///
    /// Relation roles are persisted against this key rather than the UUID.
    AnnotationKey
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotation_id_display_and_parse() {
        let id = AnnotationId::new();
        let id_str = id.to_string();

        // 8-4-4-4-12 with hyphens
        assert_eq!(id_str.len(), 36);
        assert_eq!(AnnotationId::from_string(&id_str).unwrap(), id);
    }

    #[test]
    fn test_annotation_id_invalid_string() {
        assert!(AnnotationId::from_string("not-a-valid-uuid").is_err());
        assert!(AnnotationId::from_string("").is_err());
    }

    #[test]
    fn test_annotation_id_serializes_as_plain_string() {
        let id = AnnotationId::from_string("6f1c0a52-6a52-4c8e-9a8e-2d0f4b9a1c11").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"6f1c0a52-6a52-4c8e-9a8e-2d0f4b9a1c11\"");
    }

    #[test]
    fn test_storage_keys_are_distinct_types() {
        let project = ProjectId::from_value(7);
        let layer = LayerId::from_value(7);
        assert_eq!(project.value(), layer.value());
        assert_eq!(project.to_string(), "7");
    }
}
