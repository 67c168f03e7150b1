//! Documents attached to a project

use serde::{Deserialize, Serialize};

/// Raw text attached to a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Name, unique within the project
    pub name: String,

    /// Text annotations are laid over
    pub text: String,
}

impl Document {
    /// Create a new document
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Length of the text in UTF-16 code units
    ///
    /// Span offsets are UTF-16 offsets, as computed by browser clients, so
    /// this is the upper bound for any span end. Characters outside the
    /// Basic Multilingual Plane count twice.
    pub fn text_len(&self) -> usize {
        self.text.encode_utf16().count()
    }
}

/// Addresses the project a document operation targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentContainer {
    /// Name of the owning project
    pub project_name: String,
}

impl DocumentContainer {
    /// Create a new container
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
        }
    }
}
